use serde::{Deserialize, Serialize};

pub type UserId = String;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default)]
    pub id: UserId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub mobile: i64,
    #[serde(default)]
    pub fcm_token: String,
}

impl User {
    pub fn new(id: UserId, name: String, email: String) -> Self {
        Self {
            id,
            name,
            email,
            ..Self::default()
        }
    }
}

/// Avatar shown in a card's member strip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedMembers {
    pub id: UserId,
    pub image: String,
}

impl From<&User> for SelectedMembers {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            image: user.image.clone(),
        }
    }
}
