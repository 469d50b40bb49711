//! Item types: Item, Lane, Priority, TagRef, ChecklistEntry

use super::ids::{ChecklistEntryId, ItemId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The three ordered workflow lanes an item can occupy.
///
/// Serde spellings match the remote service's `status` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lane {
    Planned,
    #[serde(rename = "In-Progress")]
    InProgress,
    Completed,
}

impl Lane {
    /// Workflow order of the lane, used for lane grouping in the backing
    /// sequence when a lane is momentarily empty.
    pub fn order(self) -> u8 {
        match self {
            Self::Planned => 0,
            Self::InProgress => 1,
            Self::Completed => 2,
        }
    }
}

/// Item priority. Serde spellings match the remote service's `priority` field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    #[serde(rename = "No Rush")]
    NoRush,
    #[default]
    Normal,
    Urgent,
    Critical,
}

/// Reference to an externally-owned tag. The engine treats these as opaque
/// labels; tag CRUD lives in a separate flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRef {
    pub name: String,
    pub color: String,
}

impl TagRef {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
        }
    }
}

/// An ordered checklist sub-item. Order is significant and preserved
/// verbatim across updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistEntry {
    pub id: ChecklistEntryId,
    pub text: String,
    pub completed: bool,
}

impl ChecklistEntry {
    /// Create a new, not-yet-completed entry
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: ChecklistEntryId::new(),
            text: text.into(),
            completed: false,
        }
    }
}

/// A work item (card) on the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub lane: Lane,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tags: Vec<TagRef>,
    #[serde(default)]
    pub checklist: Vec<ChecklistEntry>,

    /// Presentation hints, mutually exclusive by construction
    #[serde(default)]
    pub show_description_on_card: bool,
    #[serde(default)]
    pub show_checklist_on_card: bool,

    #[serde(default)]
    pub archived: bool,
    /// Present iff `archived == true`
    #[serde(default)]
    pub archived_at: Option<DateTime<Utc>>,
    /// Present iff `lane == Completed`
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,

    /// Maintained by the remote authority; None until the server confirms
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Item {
    /// Create a new item in the Planned lane with a client-generated ID
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: ItemId::new(),
            lane: Lane::Planned,
            title: title.into(),
            description: String::new(),
            priority: Priority::default(),
            due_date: None,
            tags: Vec::new(),
            checklist: Vec::new(),
            show_description_on_card: false,
            show_checklist_on_card: false,
            archived: false,
            archived_at: None,
            completed_at: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the priority
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Set the due date
    pub fn with_due_date(mut self, due: DateTime<Utc>) -> Self {
        self.due_date = Some(due);
        self
    }

    /// Set the tags
    pub fn with_tags(mut self, tags: Vec<TagRef>) -> Self {
        self.tags = tags;
        self
    }

    /// Set the checklist
    pub fn with_checklist(mut self, checklist: Vec<ChecklistEntry>) -> Self {
        self.checklist = checklist;
        self
    }

    /// Calculate progress as the fraction of completed checklist entries.
    /// Returns 0.0 for an empty checklist.
    pub fn progress(&self) -> f64 {
        if self.checklist.is_empty() {
            return 0.0;
        }
        let completed = self.checklist.iter().filter(|e| e.completed).count();
        completed as f64 / self.checklist.len() as f64
    }

    /// Find a checklist entry by ID
    pub fn find_checklist_entry(&self, id: &ChecklistEntryId) -> Option<&ChecklistEntry> {
        self.checklist.iter().find(|e| &e.id == id)
    }

    /// Whether the lane/timestamp coupling invariant holds:
    /// `lane == Completed` exactly when `completed_at` is set.
    pub fn timestamps_consistent(&self) -> bool {
        (self.lane == Lane::Completed) == self.completed_at.is_some()
            && self.archived == self.archived_at.is_some()
    }
}
