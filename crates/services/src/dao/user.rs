use std::sync::Arc;

use bson::{Bson, Document};
use taskboard_db::fields;
use taskboard_db::models::{User, UserId};
use tracing::info;

use super::base::{BaseDao, DaoError, DaoResult};
use crate::identity::Identity;
use crate::store::DocumentStore;

pub struct UserDao {
    pub base: BaseDao<User>,
    identity: Arc<dyn Identity>,
}

/// Profile fields a user may change about themselves.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub image: Option<String>,
    pub mobile: Option<i64>,
    pub fcm_token: Option<String>,
}

impl UserDao {
    pub fn new(store: Arc<dyn DocumentStore>, identity: Arc<dyn Identity>) -> Self {
        Self {
            base: BaseDao::new(store),
            identity,
        }
    }

    fn current_user_id(&self) -> DaoResult<UserId> {
        self.identity
            .current_user_id()
            .ok_or(DaoError::Unauthenticated)
    }

    /// Stores the profile of a freshly signed-up user under their own id.
    pub async fn register(&self, mut user: User) -> DaoResult<User> {
        let user_id = self.current_user_id()?;
        user.id = user_id.clone();

        self.base.upsert(Some(&user_id), &user).await?;
        info!(%user_id, "User registered");
        Ok(user)
    }

    pub async fn load_current(&self) -> DaoResult<User> {
        let user_id = self.current_user_id()?;
        self.base.find_by_id(&user_id).await
    }

    /// Returns `false` when there was nothing to change.
    pub async fn update_profile(&self, changes: ProfileChanges) -> DaoResult<bool> {
        let user_id = self.current_user_id()?;

        let mut update = Document::new();
        if let Some(name) = changes.name {
            update.insert(fields::NAME, name);
        }
        if let Some(image) = changes.image {
            update.insert(fields::IMAGE, image);
        }
        if let Some(mobile) = changes.mobile {
            update.insert(fields::MOBILE, mobile);
        }
        if let Some(token) = changes.fcm_token {
            update.insert(fields::FCM_TOKEN, token);
        }

        if update.is_empty() {
            return Ok(false);
        }

        self.base.update_fields(&user_id, update).await?;
        Ok(true)
    }

    pub async fn find_by_email(&self, email: &str) -> DaoResult<User> {
        self.base
            .find_equal(fields::EMAIL, email)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DaoError::NotFound(format!("User with email {email}")))
    }

    /// Users whose id is in `ids`, in store order. Unknown ids are skipped.
    pub async fn find_by_ids(&self, ids: &[UserId]) -> DaoResult<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let values = ids.iter().map(|id| Bson::String(id.clone())).collect();
        self.base.find_in(fields::ID, values).await
    }
}
