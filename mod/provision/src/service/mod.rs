pub mod identity;

use std::sync::Arc;

use commission_core::ServiceError;
use commission_kazoo::{AccountStore, DeviceStore};
use tracing::debug;

use crate::model::{MacAddress, ProvisioningRequest, TemplateSettings, render_context};
use crate::template::{TemplateEngine, TemplateError};

/// Provisioning service — resolves a request's identity and renders the
/// device's configuration file.
///
/// Stages run strictly in order, each failure terminal: path-segment
/// validation, MAC normalization, account lookup, device lookup,
/// client-subject check, render. Nothing is retried here; backend
/// retries belong to the store client.
pub struct ProvisionService {
    accounts: Arc<dyn AccountStore>,
    devices: Arc<dyn DeviceStore>,
    templates: Arc<dyn TemplateEngine>,
    validate_client_subject: bool,
    settings: TemplateSettings,
}

impl ProvisionService {
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        devices: Arc<dyn DeviceStore>,
        templates: Arc<dyn TemplateEngine>,
        validate_client_subject: bool,
        settings: TemplateSettings,
    ) -> Self {
        Self {
            accounts,
            devices,
            templates,
            validate_client_subject,
            settings,
        }
    }

    /// Run the full pipeline and return the rendered configuration body.
    pub async fn provision(&self, request: &ProvisioningRequest) -> Result<String, ServiceError> {
        check_segment("manufacturer", &request.manufacturer)?;
        check_segment("model", &request.model)?;

        let mac = MacAddress::normalize(&request.mac_address)
            .map_err(|e| ServiceError::Validation(e.to_string()))?;

        let account = self
            .accounts
            .get_account_by_name(&request.account)
            .await
            .map_err(|e| ServiceError::Storage(e.to_string()))?
            .ok_or_else(|| ServiceError::NotFound(format!("account {}", request.account)))?;

        let device = self
            .devices
            .get_device_by_mac_address(&account.id, mac.as_str())
            .await
            .map_err(|e| ServiceError::Storage(e.to_string()))?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("device {mac} in account {}", account.id))
            })?;

        identity::check_client_subject(
            &request.mac_address,
            request.ssl_subject.as_deref(),
            self.validate_client_subject,
        )?;

        let template = format!("{}/{}", request.manufacturer, request.model);
        debug!(%template, account = %account.id, device = %device.id, "rendering");
        let context = render_context(&self.settings, &account, &device, &request.mac_address);
        self.templates
            .render(&template, &context)
            .map_err(|e| match e {
                TemplateError::NotFound(name) => ServiceError::NotFound(format!("template {name}")),
                TemplateError::Render(msg) => ServiceError::Internal(msg),
            })
    }
}

/// Manufacturer/model segments become part of a template lookup key that
/// the engine resolves against the filesystem, so anything outside a
/// conservative character set is rejected before the key is built.
fn check_segment(what: &str, value: &str) -> Result<(), ServiceError> {
    let safe = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if safe {
        Ok(())
    } else {
        Err(ServiceError::Validation(format!("unsafe {what} segment {value:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;
    use axum::http::StatusCode;
    use commission_kazoo::{AccountRecord, DeviceRecord, MemoryStore, StoreError};

    struct EchoTemplates;

    impl TemplateEngine for EchoTemplates {
        fn render(&self, name: &str, context: &serde_json::Value) -> Result<String, TemplateError> {
            if name == "cisco/7960" {
                Ok(format!("<mac>{}</mac>", context["device"]["mac_address"]))
            } else {
                Err(TemplateError::NotFound(name.to_owned()))
            }
        }
    }

    fn request() -> ProvisioningRequest {
        ProvisioningRequest {
            manufacturer: "cisco".into(),
            model: "7960".into(),
            account: "acme".into(),
            mac_address: "aabbccddeeff".into(),
            ssl_subject: Some("MAC=aabbccddeeff,O=Acme".into()),
        }
    }

    fn populated_store() -> Arc<MemoryStore> {
        Arc::new(
            MemoryStore::new()
                .with_account(AccountRecord::new("42", "acme"))
                .with_device("42", DeviceRecord::new("dev1", "aa:bb:cc:dd:ee:ff")),
        )
    }

    fn service(store: Arc<MemoryStore>, validate: bool) -> ProvisionService {
        ProvisionService::new(
            store.clone(),
            store,
            Arc::new(EchoTemplates),
            validate,
            TemplateSettings::default(),
        )
    }

    #[tokio::test]
    async fn resolves_and_renders() {
        let body = service(populated_store(), true).provision(&request()).await.unwrap();
        assert_eq!(body, "<mac>\"aa:bb:cc:dd:ee:ff\"</mac>");
    }

    #[tokio::test]
    async fn unknown_account_is_not_found() {
        let svc = service(Arc::new(MemoryStore::new()), true);
        let err = svc.provision(&request()).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unknown_device_is_not_found() {
        let store = Arc::new(MemoryStore::new().with_account(AccountRecord::new("42", "acme")));
        let err = service(store, true).provision(&request()).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn missing_template_is_not_found_not_fault() {
        let mut req = request();
        req.manufacturer = "polycom".into();
        req.ssl_subject = None;
        let err = service(populated_store(), false).provision(&req).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn rejected_subject_is_forbidden() {
        let mut req = request();
        req.ssl_subject = Some("CN=other".into());
        let err = service(populated_store(), true).provision(&req).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn disabled_validation_skips_subject() {
        let mut req = request();
        req.ssl_subject = None;
        let body = service(populated_store(), false).provision(&req).await.unwrap();
        assert!(body.starts_with("<mac>"));
    }

    #[tokio::test]
    async fn malformed_mac_is_rejected() {
        let mut req = request();
        req.mac_address = "aabbccddeef".into();
        let err = service(populated_store(), true).provision(&req).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn traversal_segment_is_rejected() {
        let mut req = request();
        req.manufacturer = "..".into();
        let err = service(populated_store(), true).provision(&req).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    // Failing account store plus a device store that records whether it
    // was ever consulted.
    struct FailingAccounts;

    #[async_trait]
    impl AccountStore for FailingAccounts {
        async fn get_account_by_name(
            &self,
            _name: &str,
        ) -> Result<Option<AccountRecord>, StoreError> {
            Err(StoreError::Backend("couch is down".into()))
        }
    }

    #[derive(Default)]
    struct TrackingDevices {
        called: AtomicBool,
    }

    #[async_trait]
    impl DeviceStore for TrackingDevices {
        async fn get_device_by_mac_address(
            &self,
            _account_id: &str,
            _mac_address: &str,
        ) -> Result<Option<DeviceRecord>, StoreError> {
            self.called.store(true, Ordering::SeqCst);
            Ok(None)
        }
    }

    #[tokio::test]
    async fn store_fault_is_server_error() {
        let devices = Arc::new(TrackingDevices::default());
        let svc = ProvisionService::new(
            Arc::new(FailingAccounts),
            devices.clone(),
            Arc::new(EchoTemplates),
            true,
            TemplateSettings::default(),
        );
        let err = svc.provision(&request()).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!devices.called.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn account_miss_short_circuits_device_lookup() {
        let devices = Arc::new(TrackingDevices::default());
        let svc = ProvisionService::new(
            Arc::new(MemoryStore::new()),
            devices.clone(),
            Arc::new(EchoTemplates),
            true,
            TemplateSettings::default(),
        );
        let err = svc.provision(&request()).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert!(!devices.called.load(Ordering::SeqCst));
    }
}
