//! Item record types and the suggested category/priority vocabularies.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use time::OffsetDateTime;
use utoipa::ToSchema;

/// Category suggested by the UI.
///
/// Items store their category as a free-form string; this enum only names
/// the values the form offers and the ones that get a dedicated badge.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, AsRefStr, Default,
)]
pub enum Category {
    /// Catch-all default.
    #[default]
    General,
    /// Study and courses.
    Learning,
    /// Software work.
    Development,
    /// Visual and product design.
    Design,
    /// Private errands.
    Personal,
    /// Job tasks. Drawn with the fallback badge.
    Work,
}

/// Priority suggested by the UI.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, AsRefStr, Default,
)]
#[strum(serialize_all = "lowercase")]
pub enum Priority {
    /// Whenever convenient.
    Low,
    /// Default priority.
    #[default]
    Medium,
    /// Needs attention first.
    High,
}

/// A single manageable record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Store-assigned unique identifier.
    pub id: String,
    /// Short title, never blank.
    pub title: String,
    /// Longer description, never blank.
    pub description: String,
    /// Category name (open-ended).
    pub category: String,
    /// Completion flag.
    pub completed: bool,
    /// Priority name (open-ended).
    pub priority: String,
    /// Creation time, immutable.
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: OffsetDateTime,
    /// Last modification time, never earlier than `created_at`.
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: OffsetDateTime,
}

/// Caller-supplied fields for a new item.
///
/// Identifier and timestamps are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    /// Trimmed, non-blank title.
    pub title: String,
    /// Trimmed, non-blank description.
    pub description: String,
    /// Category name.
    pub category: String,
    /// Initial completion flag.
    pub completed: bool,
    /// Priority name.
    pub priority: String,
}

impl NewItem {
    /// New item with the default category, priority and completion flag.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            category: Category::default().to_string(),
            completed: false,
            priority: Priority::default().to_string(),
        }
    }
}

/// Partial update merged over an existing item. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemPatch {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New category.
    pub category: Option<String>,
    /// New completion flag.
    pub completed: Option<bool>,
    /// New priority.
    pub priority: Option<String>,
}

impl ItemPatch {
    /// Merge the supplied fields into `item`. Timestamps and id are untouched.
    pub fn apply_to(self, item: &mut Item) {
        if let Some(title) = self.title {
            item.title = title;
        }
        if let Some(description) = self.description {
            item.description = description;
        }
        if let Some(category) = self.category {
            item.category = category;
        }
        if let Some(completed) = self.completed {
            item.completed = completed;
        }
        if let Some(priority) = self.priority {
            item.priority = priority;
        }
    }

    /// Whether the patch carries no field at all.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.completed.is_none()
            && self.priority.is_none()
    }
}

/// Summary counts over the current item list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ItemStats {
    /// Number of items.
    pub total: usize,
    /// Items marked completed.
    pub completed: usize,
    /// Items not yet completed.
    pub pending: usize,
    /// Distinct category names in use.
    pub categories: usize,
}

impl ItemStats {
    /// Compute the counts from a snapshot.
    pub fn from_items(items: &[Item]) -> Self {
        let completed = items.iter().filter(|i| i.completed).count();
        let categories = items
            .iter()
            .map(|i| i.category.as_str())
            .collect::<HashSet<_>>()
            .len();

        Self {
            total: items.len(),
            completed,
            pending: items.len() - completed,
            categories,
        }
    }
}
