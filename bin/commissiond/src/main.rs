//! `commissiond` — the phone provisioning server binary.
//!
//! Usage:
//!   commissiond -c /etc/commission/config.toml [--listen <addr>]

mod config;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use commission_core::Module;
use commission_kazoo::{AccountStore, CouchStore, DeviceStore};
use provision::ProvisionModule;
use provision::model::TemplateSettings;
use provision::service::ProvisionService;
use provision::template::DirTemplates;
use tracing::{info, warn};

use config::ServerConfig;

/// Phone provisioning server.
#[derive(Parser, Debug)]
#[command(name = "commissiond", about = "Kazoo phone provisioning server")]
struct Cli {
    /// Path to the TOML config file.
    #[arg(short = 'c', long = "config", required = true)]
    config: PathBuf,

    /// Listen address (overrides the config file).
    #[arg(long = "listen")]
    listen: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    info!("Loading configuration from {}", cli.config.display());
    let server_config = ServerConfig::load(&cli.config)?;
    let listen = cli.listen.unwrap_or(server_config.server.listen);

    // Store client, shared by both lookup roles.
    let couch = Arc::new(CouchStore::new(&server_config.kazoo.couch_db_url)?);
    let accounts: Arc<dyn AccountStore> = couch.clone();
    let devices: Arc<dyn DeviceStore> = couch;
    info!(url = %server_config.kazoo.couch_db_url, "Kazoo CouchDB store configured");

    let templates = Arc::new(DirTemplates::load(&server_config.provisioning.template_dir)?);

    let validate_client_subject = !server_config
        .provisioning
        .disable_ssl_client_subject_validation;
    if validate_client_subject {
        info!("SSL client subject validation enabled");
    } else {
        warn!("SSL client subject validation is DISABLED — device identity will not be checked");
    }

    let settings = TemplateSettings {
        sip_outbound_proxy: server_config.provisioning.sip_outbound_proxy,
        sip_dns_srv: server_config.provisioning.sip_dns_srv,
        firmware_server_url: server_config.provisioning.firmware_server_url,
    };

    let service = ProvisionService::new(
        accounts,
        devices,
        templates,
        validate_client_subject,
        settings,
    );
    let modules: Vec<Box<dyn Module>> = vec![Box::new(ProvisionModule::new(service))];

    let mut app = axum::Router::new();
    for m in &modules {
        app = app.merge(m.routes());
        info!(module = m.name(), "module mounted");
    }

    let listener = tokio::net::TcpListener::bind(&listen).await?;
    info!(address = %listen, "commissiond listening");
    axum::serve(listener, app).await?;
    Ok(())
}
