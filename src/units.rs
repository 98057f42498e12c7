//! Unit section visibility
//!
//! A unit is visible iff at least one of its member cards is visible; its
//! displayed count is the number of visible members. Pure functions of the
//! current card visibility, recomputed after every pass.

use crate::model::{CardResult, NoteCard, UnitState};
use std::collections::HashMap;

/// Recompute one unit's state from its members' visibility
///
/// Cards without a result entry count as hidden.
pub fn recompute_unit(
    unit_id: &str,
    cards: &[NoteCard],
    results: &HashMap<String, CardResult>,
) -> UnitState {
    let display_count = cards
        .iter()
        .filter(|card| card.unit == unit_id)
        .filter(|card| {
            results
                .get(&card.id)
                .map(CardResult::is_visible)
                .unwrap_or(false)
        })
        .count();

    UnitState {
        visible: display_count > 0,
        display_count,
    }
}

/// Fold all cards into a unit-state map in one walk
pub fn unit_states(
    cards: &[NoteCard],
    results: &HashMap<String, CardResult>,
) -> HashMap<String, UnitState> {
    let mut states: HashMap<String, UnitState> = HashMap::new();
    for card in cards {
        let visible = results
            .get(&card.id)
            .map(CardResult::is_visible)
            .unwrap_or(false);
        let state = states.entry(card.unit.clone()).or_insert(UnitState {
            visible: false,
            display_count: 0,
        });
        if visible {
            state.visible = true;
            state.display_count += 1;
        }
    }
    states
}
