//! Substitution of accepted matches
//!
//! Matches are applied rightmost first so the offsets of matches still to be
//! applied stay valid while the buffer changes length.

use pshield_core::{AcceptedMatch, MappingStore, NumberingOrder, SubstitutionMode};

use crate::allocator::PlaceholderAllocator;

/// Replaces every letter in a normalized value
pub const LETTER_MARKER: char = 'X';
/// Replaces every digit in a normalized value
pub const DIGIT_MARKER: char = '0';

#[derive(Debug, Clone, Default)]
pub struct Substitution {
    pub text: String,
    pub mapping: MappingStore,
}

/// Apply `accepted` (pairwise disjoint, any order) to `text`
pub fn substitute(text: &str, accepted: &[AcceptedMatch], numbering: NumberingOrder) -> Substitution {
    substitute_with(text, accepted, numbering, PlaceholderAllocator::new())
}

/// `substitute` with a caller-provided allocator
pub fn substitute_with(
    text: &str,
    accepted: &[AcceptedMatch],
    numbering: NumberingOrder,
    mut allocator: PlaceholderAllocator,
) -> Substitution {
    let mut mapping = MappingStore::new();

    let mut order: Vec<&AcceptedMatch> = accepted.iter().collect();
    order.sort_by_key(|m| m.start);

    if numbering == NumberingOrder::Text {
        for m in order.iter().filter(|m| m.mode == SubstitutionMode::Placeholder) {
            allocator.allocate(&m.entity_type, &m.value);
        }
    }

    let mut result = text.to_string();
    for m in order.iter().rev() {
        let replacement = match m.mode {
            SubstitutionMode::Placeholder => {
                let placeholder = allocator.allocate(&m.entity_type, &m.value).to_string();
                mapping.record(placeholder.clone(), m.value.clone());
                placeholder
            }
            SubstitutionMode::Normalize => normalize_shape(&m.value),
        };
        result.replace_range(m.start..m.end, &replacement);
    }

    Substitution {
        text: result,
        mapping,
    }
}

/// Keep the character-class shape of `value`, dropping its content.
///
/// `ORD-2024/17b` becomes `XXX-0000/00X`.
pub fn normalize_shape(value: &str) -> String {
    value
        .chars()
        .map(|c| {
            if c.is_alphabetic() {
                LETTER_MARKER
            } else if c.is_numeric() {
                DIGIT_MARKER
            } else {
                c
            }
        })
        .collect()
}
