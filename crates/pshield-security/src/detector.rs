//! Candidate detection
//!
//! Every rule runs against the unmodified input, independently of the others.
//! All matches of all patterns in a rule are collected; patterns within one
//! rule never suppress each other. A failing rule is logged and contributes
//! nothing for this run.

use anyhow::{Context, Result};
use tracing::{debug, warn};

use pshield_core::CandidateMatch;

use crate::recognizer::clip_span;
use crate::rules::{Detection, Rule, RuleTable};

pub fn detect(table: &RuleTable, text: &str) -> Vec<CandidateMatch> {
    let mut candidates = Vec::new();

    for rule in table.rules() {
        match detect_rule(rule, text) {
            Ok(found) => {
                if !found.is_empty() {
                    debug!(
                        entity_type = %rule.entity_type(),
                        count = found.len(),
                        "rule produced candidates"
                    );
                }
                candidates.extend(found);
            }
            Err(e) => {
                warn!(entity_type = %rule.entity_type(), "rule skipped: {:#}", e);
            }
        }
    }

    candidates
}

fn detect_rule(rule: &Rule, text: &str) -> Result<Vec<CandidateMatch>> {
    let candidate = |start: usize, end: usize| CandidateMatch {
        start,
        end,
        value: text[start..end].to_string(),
        entity_type: rule.entity_type().clone(),
        priority: rule.priority(),
        mode: rule.mode(),
    };

    match rule.detection() {
        Detection::Patterns(patterns) => Ok(patterns
            .iter()
            .flat_map(|pattern| pattern.find_iter(text))
            .filter(|m| !m.is_empty())
            .map(|m| candidate(m.start(), m.end()))
            .collect()),
        Detection::Recognizer(recognizer) => {
            let spans = recognizer
                .recognize(text)
                .with_context(|| format!("recognizer '{}' failed", recognizer.name()))?;

            let mut found = Vec::with_capacity(spans.len());
            for span in &spans {
                if let Some((start, end)) = clip_span(text, span)
                    .with_context(|| format!("recognizer '{}' returned a bad span", recognizer.name()))?
                {
                    found.push(candidate(start, end));
                }
            }
            Ok(found)
        }
    }
}
