//! CreateItem operation

use crate::error::{BoardError, Result};
use crate::execute::Execute;
use crate::service::ItemService;
use crate::sync::{BoardContext, Snapshot};
use crate::types::{ChecklistEntry, Item, ItemId, Priority, TagRef};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Create a new item in the Planned lane
#[derive(Debug, Clone)]
pub struct CreateItem {
    title: String,
    description: String,
    priority: Priority,
    due_date: Option<DateTime<Utc>>,
    tags: Vec<TagRef>,
    checklist: Vec<ChecklistEntry>,
    show_description_on_card: bool,
    show_checklist_on_card: bool,
    id: Option<ItemId>,
}

impl CreateItem {
    /// Create a new CreateItem operation
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            priority: Priority::default(),
            due_date: None,
            tags: Vec::new(),
            checklist: Vec::new(),
            show_description_on_card: false,
            show_checklist_on_card: false,
            id: None,
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

    /// Show the description on the card face
    pub fn show_description(mut self) -> Self {
        self.show_description_on_card = true;
        self
    }

    /// Show the checklist on the card face
    pub fn show_checklist(mut self) -> Self {
        self.show_checklist_on_card = true;
        self
    }

    /// Reuse an ID instead of generating one. A retried create with the
    /// same ID is a no-op once the item is in the store.
    pub fn with_id(mut self, id: impl Into<ItemId>) -> Self {
        self.id = Some(id.into());
        self
    }

    fn build(&self) -> Result<Item> {
        if self.title.trim().is_empty() {
            return Err(BoardError::validation("title", "must not be empty"));
        }
        if self.show_description_on_card && self.show_checklist_on_card {
            return Err(BoardError::validation(
                "show_description_on_card",
                "display flags are mutually exclusive",
            ));
        }

        let mut item = Item::new(&self.title)
            .with_description(&self.description)
            .with_priority(self.priority)
            .with_tags(self.tags.clone())
            .with_checklist(self.checklist.clone());
        item.due_date = self.due_date;
        item.show_description_on_card = self.show_description_on_card;
        item.show_checklist_on_card = self.show_checklist_on_card;
        if let Some(id) = &self.id {
            item.id = id.clone();
        }
        Ok(item)
    }
}

#[async_trait]
impl<S: ItemService> Execute<S> for CreateItem {
    type Output = Item;

    async fn execute(&self, ctx: &BoardContext<S>) -> Result<Item> {
        let item = self.build()?;
        let id = item.id.clone();
        let optimistic = item.clone();

        let settled = ctx
            .commit_optimistic(
                "create item",
                &id,
                |items| {
                    // Creates are idempotent by client-generated ID: a
                    // retried create finds its item already present.
                    if items.iter().any(|it| it.id == item.id) {
                        return Ok(None);
                    }
                    items.push(item.clone());
                    Ok(Some((Snapshot::absent(item.id.clone()), ())))
                },
                |()| async move {
                    ctx.service().create_item(&optimistic).await.map(Some)
                },
            )
            .await?;

        settled.ok_or_else(|| BoardError::item_not_found(id.as_str()))
    }
}
