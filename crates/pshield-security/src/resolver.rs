//! Conflict resolution
//!
//! Candidates are ordered by priority (descending), then start offset
//! (ascending), then span length (descending), with the entity type name as a
//! final tie-break so the order is total. Walking that order, a candidate is
//! accepted only if none of its bytes is already claimed. Reserved ranges are
//! claimed before the walk starts.

use std::cmp::Reverse;
use std::ops::Range;

use pshield_core::{AcceptedMatch, CandidateMatch};

/// Reduce candidates to a pairwise disjoint set, returned in text order
pub fn resolve(mut candidates: Vec<CandidateMatch>, reserved: &[Range<usize>]) -> Vec<AcceptedMatch> {
    candidates.sort_by(|a, b| {
        Reverse(a.priority)
            .cmp(&Reverse(b.priority))
            .then(a.start.cmp(&b.start))
            .then(Reverse(a.len()).cmp(&Reverse(b.len())))
            .then_with(|| a.entity_type.cmp(&b.entity_type))
    });

    let limit = candidates
        .iter()
        .map(|c| c.end)
        .chain(reserved.iter().map(|r| r.end))
        .max()
        .unwrap_or(0);
    let mut claimed = vec![false; limit];

    for range in reserved {
        claimed[range.clone()].fill(true);
    }

    let mut accepted: Vec<AcceptedMatch> = Vec::new();
    for candidate in candidates {
        if claimed[candidate.span()].iter().any(|&taken| taken) {
            continue;
        }
        claimed[candidate.span()].fill(true);
        accepted.push(AcceptedMatch::accept(candidate));
    }

    accepted.sort_by_key(|m| m.start);
    accepted
}
