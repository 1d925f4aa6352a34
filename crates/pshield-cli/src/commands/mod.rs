pub mod completions;
pub mod config;
pub mod protect;
pub mod reveal;
pub mod rules;
pub mod serve;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::path::Path;
use std::sync::Arc;
use time::OffsetDateTime;
use tracing::debug;

use pshield_config::{Config, TranslatorBackend, TranslatorConfig};
use pshield_core::{Aliases, MappingStore, ProtectOutcome};
use pshield_engine::Shield;
use pshield_locale::{DictionaryTranslator, HttpTranslator, Translator};
use pshield_security::{GazetteerRecognizer, Redactor, Rule, RuleTable};

use crate::cli::InputArgs;

/// Rule table described by the config: built-ins, minus disabled, plus custom and names
pub fn build_rules(config: &Config) -> Result<RuleTable> {
    let mut builder = RuleTable::builder().with_builtin();

    for entity_type in &config.rules.disabled {
        builder = builder.without(entity_type);
    }

    for custom in &config.rules.custom {
        let rule = Rule::patterns(&custom.name, custom.priority, custom.mode, &custom.patterns)
            .with_context(|| format!("Invalid custom rule '{}'", custom.name))?;
        builder = builder.rule(rule);
    }

    if !config.rules.names.is_empty() {
        let recognizer = Arc::new(GazetteerRecognizer::new(&config.rules.names)?);
        builder = builder.recognizer("name", config.rules.name_priority, recognizer)?;
    }

    Ok(builder.build())
}

fn build_translator(config: &TranslatorConfig) -> Result<Arc<dyn Translator>> {
    Ok(match config.backend {
        TranslatorBackend::Dictionary => {
            let translator = config.labels.iter().fold(
                DictionaryTranslator::builtin(),
                |translator, (language, labels)| {
                    let entries = labels.iter().map(|(k, v)| (k.as_str(), v.as_str()));
                    translator.with_labels(language, entries)
                },
            );
            Arc::new(translator)
        }
        TranslatorBackend::Http => Arc::new(HttpTranslator::new(
            &config.endpoint,
            config.api_key.clone(),
            config.timeout(),
        )?),
    })
}

pub fn build_shield(config: &Config) -> Result<Shield> {
    let rules = build_rules(config)?;
    let translator = build_translator(&config.translator)?;
    debug!(
        rules = rules.len(),
        translator = translator.name(),
        default_language = %config.default_language,
        "shield configured"
    );

    let shield = Shield::new(Redactor::with_rules(rules))
        .with_translator(translator)
        .with_default_language(&config.default_language)
        .with_translation_timeout(config.translator.timeout());
    Ok(shield)
}

/// Read text from `--text`, `--file` or stdin
pub fn read_input(input: &InputArgs) -> Result<String> {
    if let Some(text) = &input.text {
        return Ok(text.clone());
    }
    if let Some(path) = &input.file {
        return std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()));
    }

    let mut buffer = String::new();
    std::io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer)
}

pub fn write_output(path: Option<&Path>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("✓ Written to {}", path.display());
        }
        None => emit(&mut std::io::stdout().lock(), content)?,
    }
    Ok(())
}

/// Write `content` byte for byte, without adding a trailing newline
fn emit(writer: &mut impl Write, content: &str) -> Result<()> {
    writer.write_all(content.as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// What `protect --mapping` saves for a later `reveal`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingFile {
    #[serde(with = "time::serde::timestamp")]
    pub created_at: OffsetDateTime,
    pub mapping: MappingStore,
    #[serde(default)]
    pub aliases: Aliases,
}

impl MappingFile {
    pub fn from_outcome(outcome: &ProtectOutcome) -> Self {
        Self {
            created_at: OffsetDateTime::now_utc(),
            mapping: outcome.mapping.clone(),
            aliases: outcome.aliases.clone(),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write mapping {}", path.display()))?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read mapping {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid mapping file {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pshield_config::CustomRule;
    use pshield_core::{ProtectOptions, SubstitutionMode};

    #[test]
    fn test_build_rules_from_config() {
        let mut config = Config::default();
        config.rules.disabled = vec!["ssn".to_string(), "phone".to_string()];
        config.rules.names = vec!["Anna Nowak".to_string()];
        config.rules.custom = vec![CustomRule {
            name: "employee_id".to_string(),
            priority: 65,
            mode: SubstitutionMode::Normalize,
            patterns: vec![r"\bEMP\d{6}\b".to_string()],
        }];

        let table = build_rules(&config).unwrap();
        assert!(table.get("ssn").is_none());
        assert!(table.get("phone").is_none());
        assert_eq!(table.get("employee_id").unwrap().priority(), 65);
        assert_eq!(table.get("name").unwrap().priority(), 10);
    }

    #[test]
    fn test_bad_custom_pattern_fails() {
        let mut config = Config::default();
        config.rules.custom = vec![CustomRule {
            name: "broken".to_string(),
            priority: 1,
            mode: SubstitutionMode::Placeholder,
            patterns: vec!["(".to_string()],
        }];
        assert!(build_rules(&config).is_err());
    }

    #[tokio::test]
    async fn test_config_labels_extend_dictionary() {
        let mut config = Config::default();
        config
            .translator
            .labels
            .entry("fr".to_string())
            .or_default()
            .insert("email".to_string(), "courriel".to_string());

        let shield = build_shield(&config).unwrap();
        let outcome = shield
            .protect("to a@x.com", &ProtectOptions::default().with_language("fr"))
            .await;
        assert_eq!(outcome.result, "to [COURRIEL_1]");
    }

    #[test]
    fn test_mapping_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mapping.json");

        let mut mapping = MappingStore::new();
        mapping.record("[EMAIL_1]", "a@x.com");
        let mut aliases = Aliases::new();
        aliases.insert("[E-MAIL_1]".to_string(), "[EMAIL_1]".to_string());
        let file = MappingFile {
            created_at: OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap(),
            mapping,
            aliases,
        };

        file.save(&path).unwrap();
        let loaded = MappingFile::load(&path).unwrap();
        assert_eq!(loaded, file);

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["created_at"], 1_700_000_000);
        assert_eq!(raw["mapping"]["[EMAIL_1]"], "a@x.com");
    }

    #[test]
    fn test_output_is_written_unchanged() {
        let mut buffer = Vec::new();
        emit(&mut buffer, "line one\n[EMAIL_1]\n").unwrap();
        assert_eq!(buffer, b"line one\n[EMAIL_1]\n");

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        write_output(Some(&path), "no newline").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "no newline");
    }

    #[test]
    fn test_read_input_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.txt");
        std::fs::write(&path, "mail a@x.com").unwrap();

        let input = InputArgs {
            text: None,
            file: Some(path),
        };
        assert_eq!(read_input(&input).unwrap(), "mail a@x.com");

        let inline = InputArgs {
            text: Some("inline".to_string()),
            file: None,
        };
        assert_eq!(read_input(&inline).unwrap(), "inline");
    }
}
