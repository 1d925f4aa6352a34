use anyhow::Result;
use pshield_config::Config;
use std::path::Path;

pub fn handle(config: &Config, explicit: Option<&Path>) -> Result<()> {
    let path = explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(Config::config_path);

    println!("Config: {}", path.display());
    println!();
    print!("{}", toml::to_string_pretty(config)?);

    Ok(())
}
