use commission_kazoo::{AccountRecord, DeviceRecord};
use serde::Serialize;

/// Process-wide settings that are injected into every render context
/// but not otherwise interpreted by the pipeline. Read-only after
/// startup.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateSettings {
    /// SIP outbound proxy host handed to the phone.
    pub sip_outbound_proxy: String,
    /// Whether templates should emit DNS SRV transport config.
    pub sip_dns_srv: bool,
    /// Base URL firmware is served from.
    pub firmware_server_url: String,
}

impl Default for TemplateSettings {
    fn default() -> Self {
        Self {
            sip_outbound_proxy: "localhost".to_owned(),
            sip_dns_srv: true,
            firmware_server_url: "http://localhost/firmware".to_owned(),
        }
    }
}

/// Build the read-only context a template renders against.
///
/// `mac_address` is the raw request MAC (undelimited); templates that
/// need the delimited form read it from `device.mac_address`.
pub fn render_context(
    settings: &TemplateSettings,
    account: &AccountRecord,
    device: &DeviceRecord,
    mac_address: &str,
) -> serde_json::Value {
    serde_json::json!({
        "config": settings,
        "account": account,
        "device": device,
        "mac_address": mac_address,
    })
}
