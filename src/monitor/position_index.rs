//! Membership test of (market, outcome) pairs against a position list.

use std::collections::HashSet;

use crate::models::{Position, PositionKey};

/// Keys of every position that carries both identifiers.
pub fn build_key_set(positions: &[Position]) -> HashSet<PositionKey> {
    positions.iter().filter_map(Position::key).collect()
}

/// True iff some position matches `condition_id` and `outcome_index` exactly.
pub fn already_has_position(positions: &[Position], condition_id: &str, outcome_index: i32) -> bool {
    build_key_set(positions).contains(&PositionKey::new(condition_id, outcome_index))
}
