/// Everything a single provisioning request carries: the four URL path
/// segments plus the transport-derived client certificate subject, if
/// the terminating proxy forwarded one. Built at request entry,
/// discarded with the response, never persisted.
#[derive(Debug, Clone)]
pub struct ProvisioningRequest {
    pub manufacturer: String,
    pub model: String,
    /// Account name (not id) as it appears in the URL.
    pub account: String,
    /// Raw undelimited hex MAC, exactly as requested.
    pub mac_address: String,
    /// `X-SSL-Subject` header value, when present.
    pub ssl_subject: Option<String>,
}
