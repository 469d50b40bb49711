//! Status transition handler
//!
//! The mandatory timestamp side effects that accompany a lane change,
//! applied in the same synchronous step as the lane write so no partially
//! applied state (lane changed, timestamp not) is ever observable.
//!
//! Archiving is deliberately not handled here: dragging a card back out of
//! Completed must not have to fight an archival flag.

use crate::types::{Item, Lane};
use chrono::{DateTime, Utc};

/// Move `item` to `lane`, applying the timestamp coupling:
/// entering Completed stamps `completed_at`, leaving it clears it.
/// A same-lane call changes nothing.
pub fn apply_lane_change(item: &mut Item, lane: Lane, now: DateTime<Utc>) {
    if item.lane == lane {
        return;
    }
    item.lane = lane;
    item.completed_at = if lane == Lane::Completed {
        Some(now)
    } else {
        None
    };
}
