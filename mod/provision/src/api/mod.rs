use std::sync::Arc;

use axum::Router;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;

use crate::model::ProvisioningRequest;
use crate::service::ProvisionService;

/// Shared application state.
pub type AppState = Arc<ProvisionService>;

/// Header carrying the client certificate subject, set by the
/// TLS-terminating proxy.
const SSL_SUBJECT_HEADER: &str = "x-ssl-subject";

/// Build the provisioning router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/:manufacturer/:model/:account/:mac_address",
            get(get_provisioning_file),
        )
        .with_state(state)
}

/// GET /{manufacturer}/{model}/{account}/{mac_address}.xml
///
/// The `.xml` suffix is captured as part of the last segment and
/// stripped here; a request without it does not name a provisioning
/// file and is a 404.
async fn get_provisioning_file(
    State(svc): State<AppState>,
    Path((manufacturer, model, account, mac_segment)): Path<(String, String, String, String)>,
    headers: HeaderMap,
) -> Response {
    let Some(mac_address) = mac_segment.strip_suffix(".xml") else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let ssl_subject = headers
        .get(SSL_SUBJECT_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let request = ProvisioningRequest {
        manufacturer,
        model,
        account,
        mac_address: mac_address.to_owned(),
        ssl_subject,
    };

    match svc.provision(&request).await {
        Ok(body) => ([(header::CONTENT_TYPE, "application/xml")], body).into_response(),
        Err(e) => e.into_response(),
    }
}
