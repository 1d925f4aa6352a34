use anyhow::{Result, bail};
use pshield_config::Config;
use pshield_core::NumberingOrder;

use super::{MappingFile, build_shield, read_input, write_output};
use crate::cli::ProtectArgs;

pub async fn handle(args: ProtectArgs, config: &Config) -> Result<()> {
    let text = read_input(&args.input)?;
    if text.trim().is_empty() {
        bail!("Nothing to protect: input is empty");
    }

    let shield = build_shield(config)?;

    let mut options = config.protect_options();
    if args.no_translate {
        options.translate_placeholders = false;
    }
    if let Some(lang) = args.lang {
        options.target_language = Some(lang);
    }
    if args.text_order {
        options.numbering = NumberingOrder::Text;
    }

    let (outcome, summary) = shield.protect_detailed(&text, &options).await;

    if let Some(path) = &args.mapping {
        MappingFile::from_outcome(&outcome).save(path)?;
        eprintln!("✓ Mapping saved to {}", path.display());
    }

    if args.copy {
        let mut clipboard = arboard::Clipboard::new()?;
        clipboard.set_text(outcome.result.clone())?;
        eprintln!("✓ Copied to clipboard");
    }

    let rendered = if args.json {
        let mut json = serde_json::to_value(&outcome)?;
        json["summary"] = serde_json::to_value(&summary)?;
        format!("{}\n", serde_json::to_string_pretty(&json)?)
    } else {
        if !summary.is_empty() {
            let counts: Vec<String> = summary
                .iter()
                .map(|info| format!("{} {}", info.count, info.entity_type))
                .collect();
            eprintln!("Redacted {} entities ({})", outcome.entity_count, counts.join(", "));
        }
        outcome.result.clone()
    };

    write_output(args.output.as_deref(), &rendered)
}
