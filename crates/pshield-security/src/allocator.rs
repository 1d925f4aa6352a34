//! Placeholder allocation for a single run

use std::collections::HashMap;

use pshield_core::{EntityType, Placeholder, PlaceholderSpan};

#[derive(Debug, Default)]
struct TypeCache {
    assigned: HashMap<String, Placeholder>,
    counter: u32,
}

/// Hands out `[TYPE_n]` placeholders, one per distinct `(type, value)`.
///
/// Values are compared exactly. Counters start at 1 per type and only grow.
/// An allocator lives for one run; create a new one per document.
#[derive(Debug, Default)]
pub struct PlaceholderAllocator {
    types: HashMap<EntityType, TypeCache>,
    /// Highest index already present in the input, per label
    taken: HashMap<String, u32>,
}

impl PlaceholderAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// An allocator that numbers past the placeholders already in a text
    pub fn after(existing: &[PlaceholderSpan]) -> Self {
        let mut taken: HashMap<String, u32> = HashMap::new();
        for span in existing {
            let highest = taken.entry(span.label.clone()).or_default();
            *highest = (*highest).max(span.index);
        }
        Self {
            types: HashMap::new(),
            taken,
        }
    }

    pub fn allocate(&mut self, entity_type: &EntityType, value: &str) -> Placeholder {
        let taken = &self.taken;
        let cache = self.types.entry(entity_type.clone()).or_insert_with(|| TypeCache {
            assigned: HashMap::new(),
            counter: taken.get(&entity_type.label()).copied().unwrap_or(0),
        });
        if let Some(existing) = cache.assigned.get(value) {
            return existing.clone();
        }

        cache.counter += 1;
        let placeholder = Placeholder::new(entity_type, cache.counter);
        cache.assigned.insert(value.to_string(), placeholder.clone());
        placeholder
    }

    /// Number of distinct values seen for `entity_type`
    pub fn count(&self, entity_type: &EntityType) -> u32 {
        self.types.get(entity_type).map_or(0, |c| c.assigned.len() as u32)
    }
}
