//! Detection and substitution engine
//!
//! `Redactor::redact` runs the synchronous pipeline for one text:
//! rules -> candidates -> conflict resolution -> right-to-left substitution.

pub mod allocator;
pub mod detector;
pub mod recognizer;
pub mod resolver;
pub mod rules;
pub mod substitute;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::Range;
use tracing::debug;

use pshield_core::{
    AcceptedMatch, MappingStore, NumberingOrder, SubstitutionMode, find_placeholders,
};

pub use allocator::PlaceholderAllocator;
pub use recognizer::{EntityRecognizer, GazetteerRecognizer, RecognizedSpan};
pub use rules::{Detection, NAME_PRIORITY, Rule, RuleDescription, RuleTable, RuleTableBuilder};
pub use substitute::normalize_shape;

/// Per-type count of substitutions made in one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedactionInfo {
    pub entity_type: String,
    pub mode: SubstitutionMode,
    pub count: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Redaction {
    pub text: String,
    pub mapping: MappingStore,
    pub accepted: Vec<AcceptedMatch>,
}

impl Redaction {
    pub fn entity_count(&self) -> usize {
        self.accepted.len()
    }

    /// Counts per entity type, sorted by type name
    pub fn summary(&self) -> Vec<RedactionInfo> {
        let mut counts: BTreeMap<&str, (SubstitutionMode, usize)> = BTreeMap::new();
        for m in &self.accepted {
            counts.entry(m.entity_type.as_str()).or_insert((m.mode, 0)).1 += 1;
        }

        counts
            .into_iter()
            .map(|(entity_type, (mode, count))| RedactionInfo {
                entity_type: entity_type.to_string(),
                mode,
                count,
            })
            .collect()
    }
}

/// Redaction engine over a fixed rule table.
///
/// Holds no per-run state: each `redact` call builds its own allocator and
/// mapping, so one `Redactor` can serve any number of documents concurrently.
#[derive(Debug, Clone)]
pub struct Redactor {
    rules: RuleTable,
}

impl Redactor {
    pub fn new() -> Self {
        Self::with_rules(RuleTable::builtin())
    }

    pub fn with_rules(rules: RuleTable) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// Redact entities from `content`
    pub fn redact(&self, content: &str, numbering: NumberingOrder) -> Redaction {
        if content.is_empty() {
            return Redaction::default();
        }

        // Placeholders already in the input are never redacted again, and new
        // ones are numbered past them
        let existing = find_placeholders(content);
        let reserved: Vec<Range<usize>> = existing.iter().map(|p| p.start..p.end).collect();

        let candidates = detector::detect(&self.rules, content);
        let candidate_count = candidates.len();
        let accepted = resolver::resolve(candidates, &reserved);
        debug!(
            candidates = candidate_count,
            accepted = accepted.len(),
            reserved = reserved.len(),
            "resolved candidates"
        );

        let allocator = PlaceholderAllocator::after(&existing);
        let substitution = substitute::substitute_with(content, &accepted, numbering, allocator);

        Redaction {
            text: substitution.text,
            mapping: substitution.mapping,
            accepted,
        }
    }
}

impl Default for Redactor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pshield_core::Aliases;
    use std::sync::Arc;

    fn redact(content: &str) -> Redaction {
        Redactor::new().redact(content, NumberingOrder::Processing)
    }

    #[test]
    fn test_email_redaction() {
        let redaction = redact("Contact me at john.doe@example.com");

        assert_eq!(redaction.text, "Contact me at [EMAIL_1]");
        assert_eq!(redaction.mapping.get("[EMAIL_1]"), Some("john.doe@example.com"));
        assert_eq!(redaction.entity_count(), 1);
    }

    #[test]
    fn test_repeated_email_shares_placeholder() {
        let redaction = redact("Email: a@x.com, again: a@x.com");

        assert_eq!(redaction.text, "Email: [EMAIL_1], again: [EMAIL_1]");
        assert_eq!(redaction.mapping.len(), 1);
        assert_eq!(redaction.entity_count(), 2);
    }

    #[test]
    fn test_card_beats_phone() {
        let redaction = redact("card 4111111111111111 ok");

        assert_eq!(redaction.text, "card [CREDIT_CARD_1] ok");
        assert_eq!(redaction.summary().len(), 1);
    }

    #[test]
    fn test_spaced_card_number() {
        let redaction = redact("My card number is 4111 1111 1111 1111.");
        assert_eq!(redaction.text, "My card number is [CREDIT_CARD_1].");
    }

    #[test]
    fn test_phone_amount_ssn_and_date() {
        let redaction = redact("Call +1 (123) 456-7890 about $1,234.56, SSN 123-45-6789, due 2025-12-31.");

        assert_eq!(
            redaction.text,
            "Call [PHONE_1] about [AMOUNT_1], SSN [SSN_1], due [DATE_1]."
        );
    }

    #[test]
    fn test_ip_addresses() {
        let redaction = redact(
            "Server IPs are 192.168.0.1 and 2001:0db8:85a3:0000:0000:8a2e:0370:7334.",
        );
        assert_eq!(redaction.text, "Server IPs are [IP_2] and [IP_1].");
    }

    #[test]
    fn test_urls() {
        let redaction = redact("Visit https://example.com or example.org for details.");
        assert_eq!(redaction.text, "Visit [URL_2] or [URL_1] for details.");
    }

    #[test]
    fn test_crypto_addresses() {
        let redaction = redact(
            "Send BTC to 1BoatSLRHtKNngkdXEeobR76b53LETtpyT or ETH to 0x32be343b94f860124dc4fee278fdcbd38c102d88.",
        );
        assert_eq!(
            redaction.text,
            "Send BTC to [CRYPTOCURRENCY_ADDRESS_2] or ETH to [CRYPTOCURRENCY_ADDRESS_1]."
        );
    }

    #[test]
    fn test_address_and_username() {
        let redaction = redact("Send it to 123 Main St, Springfield, IL 62704. Ping @john_doe123");
        assert_eq!(redaction.text, "Send it to [ADDRESS_1]. Ping [USERNAME_1]");
    }

    #[test]
    fn test_order_code_is_normalized() {
        let redaction = redact("Ticket ORD-123456 was closed");

        assert_eq!(redaction.text, "Ticket XXX-000000 was closed");
        assert!(redaction.mapping.is_empty());
        assert_eq!(
            redaction.summary(),
            vec![RedactionInfo {
                entity_type: "code".to_string(),
                mode: SubstitutionMode::Normalize,
                count: 1,
            }]
        );
    }

    #[test]
    fn test_name_recognizer_rule() {
        let recognizer = Arc::new(GazetteerRecognizer::new(["Bob"]).unwrap());
        let table = RuleTable::builder()
            .with_builtin()
            .recognizer("name", NAME_PRIORITY, recognizer)
            .unwrap()
            .build();

        let redaction = Redactor::with_rules(table).redact(
            "Bob sent $50 to bob@example.com and called 1234567890.",
            NumberingOrder::Processing,
        );
        assert_eq!(
            redaction.text,
            "[NAME_1] sent [AMOUNT_1] to [EMAIL_1] and called [PHONE_1]."
        );
        assert_eq!(redaction.mapping.len(), 4);
    }

    #[test]
    fn test_existing_placeholders_are_kept() {
        let redactor = Redactor::new();
        let first = redactor.redact("Write to a@x.com", NumberingOrder::Processing);
        let second = redactor.redact(&first.text, NumberingOrder::Processing);

        assert_eq!(second.text, first.text);
        assert!(second.mapping.is_empty());
    }

    #[test]
    fn test_new_values_do_not_reuse_existing_placeholders() {
        let content = "Template [EMAIL_1] then mail a@x.com";
        let redaction = redact(content);

        assert_eq!(redaction.text, "Template [EMAIL_1] then mail [EMAIL_2]");
        assert_eq!(redaction.mapping.get("[EMAIL_1]"), None);
        assert_eq!(redaction.mapping.get("[EMAIL_2]"), Some("a@x.com"));
        assert_eq!(redaction.mapping.restore(&redaction.text, &Aliases::new()), content);
    }

    #[test]
    fn test_no_entities() {
        let content = "Just some normal prose here";
        let redaction = redact(content);

        assert_eq!(redaction.text, content);
        assert!(redaction.mapping.is_empty());
        assert_eq!(redaction.entity_count(), 0);
    }

    #[test]
    fn test_empty_input() {
        let redaction = redact("");
        assert_eq!(redaction.text, "");
        assert!(redaction.mapping.is_empty());
        assert_eq!(redaction.entity_count(), 0);
    }

    #[test]
    fn test_runs_do_not_share_numbering() {
        let redactor = Redactor::new();
        let a = redactor.redact("first a@x.com", NumberingOrder::Processing);
        let b = redactor.redact("second b@y.org", NumberingOrder::Processing);

        assert_eq!(a.text, "first [EMAIL_1]");
        assert_eq!(b.text, "second [EMAIL_1]");
        assert_eq!(b.mapping.get("[EMAIL_1]"), Some("b@y.org"));
    }
}
