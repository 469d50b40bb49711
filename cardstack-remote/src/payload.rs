//! Wire representations of items and partial updates.
//!
//! The service speaks camelCase JSON and calls the title `task`; the engine's
//! domain types keep Rust spellings. Lane and priority enum spellings already
//! match the wire, so they serialize directly.

use cardstack_kanban::{ChecklistEntry, Item, ItemId, ItemPatch, Lane, Priority, TagRef, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One item as the service stores it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPayload {
    pub id: ItemId,
    pub user_id: UserId,
    /// The item title travels under this historical field name
    #[serde(rename = "task")]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: Lane,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tags: Vec<TagRef>,
    #[serde(default)]
    pub checklist: Vec<ChecklistEntry>,
    #[serde(default)]
    pub show_description_on_card: bool,
    #[serde(default)]
    pub show_checklist_on_card: bool,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub archived_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ItemPayload {
    /// Wire form of a domain item, stamped with the owning user
    pub fn from_item(item: &Item, user_id: &UserId) -> Self {
        Self {
            id: item.id.clone(),
            user_id: user_id.clone(),
            title: item.title.clone(),
            description: item.description.clone(),
            status: item.lane,
            priority: item.priority,
            due_date: item.due_date,
            tags: item.tags.clone(),
            checklist: item.checklist.clone(),
            show_description_on_card: item.show_description_on_card,
            show_checklist_on_card: item.show_checklist_on_card,
            archived: item.archived,
            archived_at: item.archived_at,
            completed_at: item.completed_at,
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }

    /// Domain form of a wire item. The owning user is dropped; the client is
    /// scoped to one user and the engine never needs it.
    pub fn into_item(self) -> Item {
        let mut item = Item::new(self.title);
        item.id = self.id;
        item.lane = self.status;
        item.description = self.description;
        item.priority = self.priority;
        item.due_date = self.due_date;
        item.tags = self.tags;
        item.checklist = self.checklist;
        item.show_description_on_card = self.show_description_on_card;
        item.show_checklist_on_card = self.show_checklist_on_card;
        item.archived = self.archived;
        item.archived_at = self.archived_at;
        item.completed_at = self.completed_at;
        item.created_at = self.created_at;
        item.updated_at = self.updated_at;
        item
    }
}

/// Body of a partial update. Absent fields are omitted; the nullable
/// timestamps serialize as explicit `null` when the patch clears them.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateBody {
    #[serde(rename = "task", skip_serializing_if = "Option::is_none")]
    task: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<Lane>,
    #[serde(skip_serializing_if = "Option::is_none")]
    priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    due_date: Option<Option<DateTime<Utc>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tags: Option<Vec<TagRef>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    checklist: Option<Vec<ChecklistEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    show_description_on_card: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    show_checklist_on_card: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    archived: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    archived_at: Option<Option<DateTime<Utc>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    completed_at: Option<Option<DateTime<Utc>>>,
}

impl From<&ItemPatch> for UpdateBody {
    fn from(patch: &ItemPatch) -> Self {
        Self {
            task: patch.title.clone(),
            description: patch.description.clone(),
            status: patch.lane,
            priority: patch.priority,
            due_date: patch.due_date,
            tags: patch.tags.clone(),
            checklist: patch.checklist.clone(),
            show_description_on_card: patch.show_description_on_card,
            show_checklist_on_card: patch.show_checklist_on_card,
            archived: patch.archived,
            archived_at: patch.archived_at,
            completed_at: patch.completed_at,
        }
    }
}
