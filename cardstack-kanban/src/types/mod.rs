//! Core types for the board engine

mod ids;
mod item;
mod patch;

// Re-export all types
pub use ids::{ChecklistEntryId, ItemId, UserId};
pub use item::{ChecklistEntry, Item, Lane, Priority, TagRef};
pub use patch::ItemPatch;
