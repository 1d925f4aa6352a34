//! Rule table
//!
//! A rule names an entity type, its priority (higher wins overlaps), how its
//! matches are substituted, and how it detects: a set of regex patterns or a
//! call into an external recognizer. Tables are built once and then shared
//! read-only across runs.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use pshield_core::{CoreError, EntityType, Result, SubstitutionMode};

use crate::recognizer::EntityRecognizer;

/// Priority of the built-in name rule
pub const NAME_PRIORITY: i32 = 10;

#[derive(Clone)]
pub enum Detection {
    Patterns(Vec<Regex>),
    Recognizer(Arc<dyn EntityRecognizer>),
}

impl fmt::Debug for Detection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Detection::Patterns(patterns) => f
                .debug_tuple("Patterns")
                .field(&patterns.iter().map(Regex::as_str).collect::<Vec<_>>())
                .finish(),
            Detection::Recognizer(recognizer) => {
                f.debug_tuple("Recognizer").field(&recognizer.name()).finish()
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Rule {
    entity_type: EntityType,
    priority: i32,
    mode: SubstitutionMode,
    detection: Detection,
}

impl Rule {
    /// Build a pattern rule. Fails if there are no patterns or one does not compile.
    pub fn patterns<S: AsRef<str>>(
        name: &str,
        priority: i32,
        mode: SubstitutionMode,
        patterns: &[S],
    ) -> Result<Self> {
        let entity_type = EntityType::new(name)?;
        if patterns.is_empty() {
            return Err(CoreError::InvalidRule {
                rule: entity_type.to_string(),
                reason: "a pattern rule needs at least one pattern".to_string(),
            });
        }

        let compiled = patterns
            .iter()
            .map(|p| {
                Regex::new(p.as_ref()).map_err(|source| CoreError::InvalidPattern {
                    rule: entity_type.to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            entity_type,
            priority,
            mode,
            detection: Detection::Patterns(compiled),
        })
    }

    /// Build a rule backed by an external recognizer; always placeholder mode
    pub fn recognizer(
        name: &str,
        priority: i32,
        recognizer: Arc<dyn EntityRecognizer>,
    ) -> Result<Self> {
        Ok(Self {
            entity_type: EntityType::new(name)?,
            priority,
            mode: SubstitutionMode::Placeholder,
            detection: Detection::Recognizer(recognizer),
        })
    }

    pub fn entity_type(&self) -> &EntityType {
        &self.entity_type
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn mode(&self) -> SubstitutionMode {
        self.mode
    }

    pub fn detection(&self) -> &Detection {
        &self.detection
    }

    pub fn describe(&self) -> RuleDescription {
        RuleDescription {
            entity_type: self.entity_type.to_string(),
            priority: self.priority,
            mode: self.mode,
            detection: match &self.detection {
                Detection::Patterns(p) => format!("{} pattern(s)", p.len()),
                Detection::Recognizer(r) => format!("recognizer:{}", r.name()),
            },
        }
    }
}

/// Serializable summary of a rule for listings
#[derive(Debug, Clone, Serialize)]
pub struct RuleDescription {
    #[serde(rename = "type")]
    pub entity_type: String,
    pub priority: i32,
    pub mode: SubstitutionMode,
    pub detection: String,
}

// (type, priority, mode, patterns)
type BuiltinDef = (&'static str, i32, SubstitutionMode, &'static [&'static str]);

const BUILTIN_DEFS: &[BuiltinDef] = &[
    (
        "email",
        110,
        SubstitutionMode::Placeholder,
        &[r"(?i)\b[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}\b"],
    ),
    (
        "ip",
        106,
        SubstitutionMode::Placeholder,
        &[
            r"\b(?:\d{1,3}\.){3}\d{1,3}\b",
            r"\b(?:[0-9a-fA-F]{1,4}:){7}[0-9a-fA-F]{1,4}\b",
        ],
    ),
    (
        "token",
        105,
        SubstitutionMode::Placeholder,
        &[
            // JWT-style header.payload.signature
            r"\b[A-Za-z0-9_-]+\.[A-Za-z0-9_-]+\.[A-Za-z0-9_-]+\b",
            r"e[yw][A-Za-z0-9_-]+\.(?:e[yw][A-Za-z0-9_-]+)?\.[A-Za-z0-9_-]{2,}",
        ],
    ),
    (
        "url",
        100,
        SubstitutionMode::Placeholder,
        &[
            r"https?://(?:www\.)?[-a-zA-Z0-9@:%._+~#=]{1,256}\.[a-zA-Z0-9()]{1,6}\b[-a-zA-Z0-9()@:%_+.~#?&/=]*",
            r"[-a-zA-Z0-9@:%._+~#=]{1,256}\.[a-zA-Z]{2,10}\b[-a-zA-Z0-9()@:%_+.~#?&/=]*",
        ],
    ),
    (
        "address",
        95,
        SubstitutionMode::Placeholder,
        &[r"\d{1,5}\s\w+(?:\s\w+){0,5},?\s\w+,\s[A-Z]{2}\s\d{5}"],
    ),
    (
        "cryptocurrency_address",
        80,
        SubstitutionMode::Placeholder,
        &[
            r"\b[13][a-km-zA-HJ-NP-Z1-9]{25,34}\b",
            r"\bX[1-9A-HJ-NP-Za-km-z]{33}\b",
            r"\b0x[0-9a-fA-F]{40}\b",
            r"\bL[a-km-zA-HJ-NP-Z1-9]{26,33}\b",
            r"\br[1-9A-HJ-NP-Za-km-z]{25,33}\b",
        ],
    ),
    (
        "credit_card",
        75,
        SubstitutionMode::Placeholder,
        &[
            r"\b(?:\d[ -]*?){13,16}\b",
            // IBAN
            r"\b[A-Z]{2}\d{2}[A-Z0-9]{4}\d{7}[A-Z0-9]{0,16}\b",
            // SWIFT/BIC
            r"\b[A-Z]{6}[A-Z0-9]{2}(?:[A-Z0-9]{3})?\b",
        ],
    ),
    (
        "ssn",
        70,
        SubstitutionMode::Placeholder,
        &[r"\b\d{3}-\d{2}-\d{4}\b"],
    ),
    ("username", 60, SubstitutionMode::Placeholder, &[r"@\w+"]),
    (
        "date",
        50,
        SubstitutionMode::Placeholder,
        &[
            r"\b\d{1,2}[/-]\d{1,2}[/-]\d{2,4}\b",
            r"\b\d{4}-\d{2}-\d{2}\b",
        ],
    ),
    (
        "amount",
        40,
        SubstitutionMode::Placeholder,
        &[
            r"\$\s?\d+(?:,\d{3})*(?:\.\d{2})?",
            r"\b\d+(?:,\d{3})*(?:\.\d{2})?\s?(?:USD|EUR|GBP|PLN|dollars?|euros?|pounds?)\b",
            r"\b\d+[.,]\d{2}\s?zł",
            r"\b(?:USD|EUR|GBP|PLN)\s?\d+(?:,\d{3})*(?:\.\d{2})?",
        ],
    ),
    (
        "phone",
        30,
        SubstitutionMode::Placeholder,
        &[r"(?:\+?\d{1,3}[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}"],
    ),
    (
        "code",
        20,
        SubstitutionMode::Normalize,
        &[r"\b[A-Z]{2,5}-\d{3,10}\b"],
    ),
];

lazy_static! {
    static ref BUILTIN_RULES: Vec<Rule> = BUILTIN_DEFS
        .iter()
        .map(|&(name, priority, mode, patterns)| {
            Rule::patterns(name, priority, mode, patterns).unwrap()
        })
        .collect();
}

/// Immutable, ordered set of rules, at most one per entity type
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

impl RuleTable {
    /// The built-in pattern rules (no recognizer rules)
    pub fn builtin() -> Self {
        Self {
            rules: BUILTIN_RULES.clone(),
        }
    }

    pub fn builder() -> RuleTableBuilder {
        RuleTableBuilder::default()
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn get(&self, entity_type: &str) -> Option<&Rule> {
        self.rules
            .iter()
            .find(|r| r.entity_type.as_str() == entity_type)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn describe(&self) -> Vec<RuleDescription> {
        self.rules.iter().map(Rule::describe).collect()
    }
}

#[derive(Debug, Default)]
pub struct RuleTableBuilder {
    rules: Vec<Rule>,
}

impl RuleTableBuilder {
    pub fn with_builtin(mut self) -> Self {
        for rule in BUILTIN_RULES.iter() {
            self = self.rule(rule.clone());
        }
        self
    }

    /// Add a rule, replacing any rule with the same entity type
    pub fn rule(mut self, rule: Rule) -> Self {
        match self
            .rules
            .iter_mut()
            .find(|r| r.entity_type == rule.entity_type)
        {
            Some(existing) => *existing = rule,
            None => self.rules.push(rule),
        }
        self
    }

    /// Drop the rule for `entity_type`, if any
    pub fn without(mut self, entity_type: &str) -> Self {
        if let Ok(ty) = EntityType::new(entity_type) {
            self.rules.retain(|r| r.entity_type != ty);
        }
        self
    }

    pub fn recognizer(
        self,
        name: &str,
        priority: i32,
        recognizer: Arc<dyn EntityRecognizer>,
    ) -> Result<Self> {
        Ok(self.rule(Rule::recognizer(name, priority, recognizer)?))
    }

    pub fn build(self) -> RuleTable {
        RuleTable { rules: self.rules }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognizer::GazetteerRecognizer;

    #[test]
    fn test_builtin_table_compiles() {
        let table = RuleTable::builtin();
        assert_eq!(table.len(), BUILTIN_DEFS.len());
        assert_eq!(table.get("email").unwrap().priority(), 110);
        assert_eq!(table.get("credit_card").unwrap().priority(), 75);
        assert_eq!(
            table.get("code").unwrap().mode(),
            SubstitutionMode::Normalize
        );
        assert!(table.get("name").is_none());
    }

    #[test]
    fn test_rule_without_patterns_fails_fast() {
        let err = Rule::patterns::<&str>("empty", 1, SubstitutionMode::Placeholder, &[]);
        assert!(matches!(err, Err(CoreError::InvalidRule { .. })));
    }

    #[test]
    fn test_rule_with_bad_pattern_fails_fast() {
        let err = Rule::patterns("broken", 1, SubstitutionMode::Placeholder, &["(unclosed"]);
        assert!(matches!(err, Err(CoreError::InvalidPattern { .. })));
    }

    #[test]
    fn test_builder_replaces_and_removes() {
        let custom =
            Rule::patterns("email", 5, SubstitutionMode::Placeholder, &[r"\S+@\S+"]).unwrap();
        let table = RuleTable::builder()
            .with_builtin()
            .rule(custom)
            .without("ssn")
            .build();

        assert_eq!(table.get("email").unwrap().priority(), 5);
        assert!(table.get("ssn").is_none());
        assert_eq!(table.len(), BUILTIN_DEFS.len() - 1);
    }

    #[test]
    fn test_builder_adds_recognizer_rule() {
        let recognizer = Arc::new(GazetteerRecognizer::new(["Bob"]).unwrap());
        let table = RuleTable::builder()
            .with_builtin()
            .recognizer("name", NAME_PRIORITY, recognizer)
            .unwrap()
            .build();

        let name = table.get("name").unwrap();
        assert_eq!(name.priority(), NAME_PRIORITY);
        assert!(matches!(name.detection(), Detection::Recognizer(_)));
        assert_eq!(name.describe().detection, "recognizer:gazetteer");
    }

    #[test]
    fn test_describe_serializes_type_field() {
        let table = RuleTable::builtin();
        let json = serde_json::to_value(table.describe()).unwrap();
        assert_eq!(json[0]["type"], "email");
        assert_eq!(json[0]["mode"], "placeholder");
    }
}
