//! Server configuration, loaded from a TOML file.
//!
//! Every key has a default, so an empty file (or empty sections) is a
//! valid configuration for a local CouchDB with templates in
//! `./templates`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub kazoo: KazooSection,
    #[serde(default)]
    pub provisioning: ProvisioningSection,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KazooSection {
    /// CouchDB base URL of the Kazoo installation.
    #[serde(default = "default_couch_db_url")]
    pub couch_db_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProvisioningSection {
    /// Directory of per-manufacturer template trees.
    #[serde(default = "default_template_dir")]
    pub template_dir: PathBuf,

    /// Skip the X-SSL-Subject identity check. Disabling the check means
    /// any caller can fetch any device's configuration; the server
    /// warns loudly at startup when this is set.
    #[serde(default)]
    pub disable_ssl_client_subject_validation: bool,

    #[serde(default = "default_sip_outbound_proxy")]
    pub sip_outbound_proxy: String,

    #[serde(default = "default_true")]
    pub sip_dns_srv: bool,

    #[serde(default = "default_firmware_server_url")]
    pub firmware_server_url: String,
}

fn default_listen() -> String {
    "0.0.0.0:8080".to_owned()
}

fn default_couch_db_url() -> String {
    "http://localhost:5984".to_owned()
}

fn default_template_dir() -> PathBuf {
    PathBuf::from("templates")
}

fn default_sip_outbound_proxy() -> String {
    "localhost".to_owned()
}

fn default_true() -> bool {
    true
}

fn default_firmware_server_url() -> String {
    "http://localhost/firmware".to_owned()
}

impl Default for ServerSection {
    fn default() -> Self {
        Self { listen: default_listen() }
    }
}

impl Default for KazooSection {
    fn default() -> Self {
        Self { couch_db_url: default_couch_db_url() }
    }
}

impl Default for ProvisioningSection {
    fn default() -> Self {
        Self {
            template_dir: default_template_dir(),
            disable_ssl_client_subject_validation: false,
            sip_outbound_proxy: default_sip_outbound_proxy(),
            sip_dns_srv: true,
            firmware_server_url: default_firmware_server_url(),
        }
    }
}

impl ServerConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("reading {}: {e}", path.display()))?;
        let config = toml::from_str(&text)
            .map_err(|e| anyhow::anyhow!("parsing {}: {e}", path.display()))?;
        Ok(config)
    }
}
