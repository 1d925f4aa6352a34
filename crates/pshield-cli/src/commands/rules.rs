use anyhow::Result;
use pshield_config::Config;

use super::build_rules;

pub fn handle(config: &Config, json: bool) -> Result<()> {
    let table = build_rules(config)?;
    let rules = table.describe();

    if json {
        println!("{}", serde_json::to_string_pretty(&rules)?);
        return Ok(());
    }

    println!("Rules ({}):", rules.len());
    for rule in rules {
        println!(
            "  {:<24} priority {:>4}  {:<11} {}",
            rule.entity_type,
            rule.priority,
            format!("{:?}", rule.mode).to_lowercase(),
            rule.detection
        );
    }

    Ok(())
}
