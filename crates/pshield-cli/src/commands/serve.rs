use anyhow::Result;
use pshield_config::Config;
use pshield_server::ShieldServer;

use super::build_shield;

pub async fn handle(config: &Config, host: Option<String>, port: Option<u16>) -> Result<()> {
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    let server = ShieldServer::new(build_shield(config)?, config.protect_options());

    println!("Starting pshield server on {}:{}", host, port);
    server.serve(&host, port).await
}
