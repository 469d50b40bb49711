//! Partial-update type for items
//!
//! An `ItemPatch` is both the edit surface handed to `UpdateItem` and the
//! body shipped to the remote service's Update call: absent fields are left
//! untouched, double-Option fields distinguish "leave alone" from "clear".

use super::item::{ChecklistEntry, Item, Lane, Priority, TagRef};
use crate::error::{BoardError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A partial field set to apply to an item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lane: Option<Lane>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    /// `Some(None)` clears the due date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Option<DateTime<Utc>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<TagRef>>,
    /// Replaces the checklist verbatim, order included
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checklist: Option<Vec<ChecklistEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_description_on_card: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_checklist_on_card: Option<bool>,
    /// Lifecycle fields, written only by the archive operations and the
    /// status-transition handler when they build outbound patches.
    /// [`validate`](Self::validate) rejects them on the edit surface.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived_at: Option<Option<DateTime<Utc>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<Option<DateTime<Utc>>>,
}

impl ItemPatch {
    /// A patch that changes nothing
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Move the item to a lane (status-transition side effects applied by
    /// the update operation, not by the patch itself)
    pub fn lane(mut self, lane: Lane) -> Self {
        self.lane = Some(lane);
        self
    }

    /// Set the priority
    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Set the due date
    pub fn due_date(mut self, due: DateTime<Utc>) -> Self {
        self.due_date = Some(Some(due));
        self
    }

    /// Clear the due date
    pub fn clear_due_date(mut self) -> Self {
        self.due_date = Some(None);
        self
    }

    /// Replace the tags
    pub fn tags(mut self, tags: Vec<TagRef>) -> Self {
        self.tags = Some(tags);
        self
    }

    /// Replace the checklist verbatim
    pub fn checklist(mut self, checklist: Vec<ChecklistEntry>) -> Self {
        self.checklist = Some(checklist);
        self
    }

    /// Set the show-description display flag
    pub fn show_description_on_card(mut self, show: bool) -> Self {
        self.show_description_on_card = Some(show);
        self
    }

    /// Set the show-checklist display flag
    pub fn show_checklist_on_card(mut self, show: bool) -> Self {
        self.show_checklist_on_card = Some(show);
        self
    }

    /// Whether the patch changes nothing
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Validate the patch against the item it will be applied to.
    /// Runs before any mutation is dispatched; the store stays untouched on
    /// failure.
    pub fn validate(&self, target: &Item) -> Result<()> {
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err(BoardError::validation("title", "must not be empty"));
            }
        }

        // Lifecycle fields are not part of the edit surface: the archival
        // flags change only through the archive operations and the
        // completion timestamp only through a lane change.
        if self.archived.is_some() || self.archived_at.is_some() {
            return Err(BoardError::validation(
                "archived",
                "changes through the archive operations",
            ));
        }
        if self.completed_at.is_some() {
            return Err(BoardError::validation(
                "completed_at",
                "set by lane changes, not directly",
            ));
        }

        let show_description = self
            .show_description_on_card
            .unwrap_or(target.show_description_on_card);
        let show_checklist = self
            .show_checklist_on_card
            .unwrap_or(target.show_checklist_on_card);
        if show_description && show_checklist {
            return Err(BoardError::validation(
                "show_description_on_card",
                "display flags are mutually exclusive",
            ));
        }

        Ok(())
    }

    /// Apply every field of the patch except `lane`/`completed_at`, which
    /// are owned by the status-transition handler so a lane change and its
    /// timestamp are written in one step.
    pub fn apply_fields(&self, item: &mut Item) {
        if let Some(title) = &self.title {
            item.title = title.clone();
        }
        if let Some(description) = &self.description {
            item.description = description.clone();
        }
        if let Some(priority) = self.priority {
            item.priority = priority;
        }
        if let Some(due) = &self.due_date {
            item.due_date = *due;
        }
        if let Some(tags) = &self.tags {
            item.tags = tags.clone();
        }
        if let Some(checklist) = &self.checklist {
            item.checklist = checklist.clone();
        }
        if let Some(show) = self.show_description_on_card {
            item.show_description_on_card = show;
        }
        if let Some(show) = self.show_checklist_on_card {
            item.show_checklist_on_card = show;
        }
        if let Some(archived) = self.archived {
            item.archived = archived;
        }
        if let Some(archived_at) = &self.archived_at {
            item.archived_at = *archived_at;
        }
    }
}
