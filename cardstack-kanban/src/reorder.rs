//! Reorder engine
//!
//! Translates a "drop at lane X, position P" gesture into a new backing
//! order. This is a pure planning step over an item slice; the relocate
//! operation owns applying the plan to the store and persisting it.

use crate::error::{BoardError, Result};
use crate::types::{Item, ItemId, Lane};
use tracing::debug;

/// A computed relocation: the full new ID order for the backing sequence
/// and where the moved item landed in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelocationPlan {
    pub order: Vec<ItemId>,
    pub insert_index: usize,
}

/// Plan moving `id` to `target_lane` at `position` within that lane.
///
/// Returns `Ok(None)` when the drop would not actually move anything (the
/// no-op rule), so callers can skip the mutation and the remote write
/// entirely. Out-of-range positions clamp to append-to-lane.
///
/// An unknown `id` is a programming/desync error; nothing is planned.
pub fn plan_relocation(
    items: &[Item],
    id: &ItemId,
    target_lane: Lane,
    position: usize,
) -> Result<Option<RelocationPlan>> {
    let from = items
        .iter()
        .position(|it| &it.id == id)
        .ok_or_else(|| BoardError::item_not_found(id.as_str()))?;
    let moving = &items[from];

    // Working sequence W: everything except the item being moved.
    let working: Vec<&Item> = items
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != from)
        .map(|(_, it)| it)
        .collect();

    // Indices in W of the items already in the target lane, in their
    // existing relative order. Archived items are not drop targets.
    let peers: Vec<usize> = working
        .iter()
        .enumerate()
        .filter(|(_, it)| it.lane == target_lane && !it.archived)
        .map(|(i, _)| i)
        .collect();

    let insert_index = if peers.is_empty() {
        // The lane is momentarily empty: keep lane grouping by inserting at
        // the slot where the lane logically lives, i.e. before the first
        // item of any later-ordered lane. No such item means append.
        working
            .iter()
            .position(|it| it.lane.order() > target_lane.order())
            .unwrap_or(working.len())
    } else if position == 0 {
        peers[0]
    } else {
        // After the peer at position - 1, clamped to after the last peer.
        let peer = (position - 1).min(peers.len() - 1);
        peers[peer] + 1
    };
    let insert_index = insert_index.min(working.len());

    // No-op rule: same lane, same effective position. Re-inserting at the
    // removal point reproduces the input sequence exactly.
    if moving.lane == target_lane && insert_index == from {
        debug!(id = %id, "relocation is a no-op, skipping");
        return Ok(None);
    }

    let mut order: Vec<ItemId> = working.iter().map(|it| it.id.clone()).collect();
    order.insert(insert_index, moving.id.clone());

    Ok(Some(RelocationPlan {
        order,
        insert_index,
    }))
}

/// Reorder `items` in place to match `order`. IDs absent from `order`
/// (items that appeared concurrently) keep their relative order at the end.
pub(crate) fn apply_order(items: &mut [Item], order: &[ItemId]) {
    let rank = |id: &ItemId| {
        order
            .iter()
            .position(|o| o == id)
            .unwrap_or(usize::MAX)
    };
    items.sort_by_key(|it| rank(&it.id));
}
