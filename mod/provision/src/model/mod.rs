pub mod context;
pub mod mac;
pub mod request;

pub use context::{TemplateSettings, render_context};
pub use mac::{MacAddress, MacError};
pub use request::ProvisioningRequest;
