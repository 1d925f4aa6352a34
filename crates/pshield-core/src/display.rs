//! Reversible display toggle
//!
//! A viewer shows each placeholder occurrence either as the placeholder or as
//! the original value, switching occurrences independently. Switching to the
//! original needs a mapping entry (directly or through a localization alias);
//! without one the toggle does nothing.

use serde::{Deserialize, Serialize};

use crate::mapping::{Aliases, MappingStore};
use crate::placeholder::find_display_placeholders;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayState {
    #[default]
    Placeholder,
    Original,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    pub start: usize,
    pub end: usize,
    pub token: String,
    pub state: DisplayState,
}

pub struct RevealView<'a> {
    text: &'a str,
    mapping: &'a MappingStore,
    aliases: &'a Aliases,
    occurrences: Vec<Occurrence>,
}

impl<'a> RevealView<'a> {
    pub fn new(text: &'a str, mapping: &'a MappingStore, aliases: &'a Aliases) -> Self {
        let occurrences = find_display_placeholders(text)
            .into_iter()
            .map(|span| Occurrence {
                start: span.start,
                end: span.end,
                token: span.token,
                state: DisplayState::Placeholder,
            })
            .collect();

        Self {
            text,
            mapping,
            aliases,
            occurrences,
        }
    }

    pub fn occurrences(&self) -> &[Occurrence] {
        &self.occurrences
    }

    /// Flip one occurrence. Returns the new state, or `None` when the index is
    /// out of range or the occurrence cannot be revealed.
    pub fn toggle(&mut self, index: usize) -> Option<DisplayState> {
        let occurrence = self.occurrences.get(index)?;
        let next = match occurrence.state {
            DisplayState::Placeholder => {
                self.mapping.resolve(&occurrence.token, self.aliases)?;
                DisplayState::Original
            }
            DisplayState::Original => DisplayState::Placeholder,
        };

        self.occurrences[index].state = next;
        Some(next)
    }

    /// Reveal every occurrence that has a mapping entry; returns how many changed
    pub fn reveal_all(&mut self) -> usize {
        let mut changed = 0;
        for index in 0..self.occurrences.len() {
            if self.occurrences[index].state == DisplayState::Placeholder
                && self.toggle(index).is_some()
            {
                changed += 1;
            }
        }
        changed
    }

    /// Current text as the viewer would show it
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.text.len());
        let mut cursor = 0;

        for occurrence in &self.occurrences {
            out.push_str(&self.text[cursor..occurrence.start]);
            match occurrence.state {
                DisplayState::Original => out.push_str(
                    self.mapping
                        .resolve(&occurrence.token, self.aliases)
                        .unwrap_or(occurrence.token.as_str()),
                ),
                DisplayState::Placeholder => out.push_str(&occurrence.token),
            }
            cursor = occurrence.end;
        }

        out.push_str(&self.text[cursor..]);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> MappingStore {
        let mut store = MappingStore::new();
        store.record("[EMAIL_1]", "a@x.com");
        store.record("[NAME_1]", "Bob");
        store
    }

    #[test]
    fn test_toggle_single_occurrence() {
        let mapping = store();
        let aliases = Aliases::new();
        let mut view = RevealView::new("[NAME_1] -> [EMAIL_1], cc [EMAIL_1]", &mapping, &aliases);

        assert_eq!(view.occurrences().len(), 3);
        assert_eq!(view.toggle(1), Some(DisplayState::Original));
        assert_eq!(view.render(), "[NAME_1] -> a@x.com, cc [EMAIL_1]");

        assert_eq!(view.toggle(1), Some(DisplayState::Placeholder));
        assert_eq!(view.render(), "[NAME_1] -> [EMAIL_1], cc [EMAIL_1]");
    }

    #[test]
    fn test_toggle_without_entry_is_noop() {
        let mapping = store();
        let aliases = Aliases::new();
        let mut view = RevealView::new("[PHONE_1] and [NOM_1]", &mapping, &aliases);

        assert_eq!(view.toggle(0), None);
        assert_eq!(view.toggle(1), None);
        assert_eq!(view.toggle(7), None);
        assert_eq!(view.render(), "[PHONE_1] and [NOM_1]");
    }

    #[test]
    fn test_alias_makes_localized_placeholder_revealable() {
        let mapping = store();
        let mut aliases = Aliases::new();
        aliases.insert("[NOM_1]".to_string(), "[NAME_1]".to_string());
        let mut view = RevealView::new("[NOM_1] a écrit", &mapping, &aliases);

        assert_eq!(view.reveal_all(), 1);
        assert_eq!(view.render(), "Bob a écrit");
    }
}
