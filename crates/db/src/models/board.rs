use serde::{Deserialize, Serialize};

use super::user::UserId;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub created_by: String,
    #[serde(default)]
    pub assigned_to: Vec<UserId>,
    #[serde(default)]
    pub task_list: Vec<TaskList>,
    /// Id of the stored document. Never written as a field; filled in on every load.
    #[serde(skip)]
    pub document_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskList {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub created_by: UserId,
    #[serde(default)]
    pub cards: Vec<Card>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    #[serde(default)]
    pub name: String,
    /// Swatch colour such as `#43C86F`. Empty means no swatch.
    #[serde(default)]
    pub label_color: String,
    #[serde(default)]
    pub created_by: UserId,
    #[serde(default)]
    pub assigned_to: Vec<UserId>,
}

impl Board {
    pub fn new(name: String, image: String, created_by: String, creator_id: UserId) -> Self {
        Self {
            name,
            image,
            created_by,
            assigned_to: vec![creator_id],
            task_list: Vec::new(),
            document_id: String::new(),
        }
    }

    pub fn is_assigned(&self, user_id: &str) -> bool {
        self.assigned_to.iter().any(|id| id == user_id)
    }
}

impl TaskList {
    pub fn new(title: String, created_by: UserId) -> Self {
        Self {
            title,
            created_by,
            cards: Vec::new(),
        }
    }
}

impl Card {
    /// A fresh card is assigned to whoever created it.
    pub fn new(name: String, created_by: UserId) -> Self {
        Self {
            name,
            label_color: String::new(),
            assigned_to: vec![created_by.clone()],
            created_by,
        }
    }

    pub fn has_label(&self) -> bool {
        !self.label_color.is_empty()
    }
}
