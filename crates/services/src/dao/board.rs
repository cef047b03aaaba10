use std::sync::Arc;

use bson::{Document, to_bson};
use taskboard_db::fields;
use taskboard_db::models::{Board, TaskList, UserId};
use tracing::info;

use super::base::{BaseDao, DaoError, DaoResult};
use crate::identity::Identity;
use crate::store::DocumentStore;

pub struct BoardDao {
    pub base: BaseDao<Board>,
    identity: Arc<dyn Identity>,
}

impl BoardDao {
    pub fn new(store: Arc<dyn DocumentStore>, identity: Arc<dyn Identity>) -> Self {
        Self {
            base: BaseDao::new(store),
            identity,
        }
    }

    /// Creates a board owned by the signed-in user, who becomes its only member.
    ///
    /// `created_by` is the creator's display name; `image` is an already uploaded
    /// asset URL (or empty).
    pub async fn create(&self, name: String, image: String, created_by: String) -> DaoResult<Board> {
        let creator_id = self
            .identity
            .current_user_id()
            .ok_or(DaoError::Unauthenticated)?;

        let board = Board::new(name, image, created_by, creator_id);
        let id = self.base.upsert(None, &board).await?;

        info!(board_id = %id, name = %board.name, "Board created");
        self.base.find_by_id(&id).await
    }

    pub async fn find_by_id(&self, id: &str) -> DaoResult<Board> {
        self.base.find_by_id(id).await
    }

    /// Boards the signed-in user is assigned to.
    pub async fn list_for_current_user(&self) -> DaoResult<Vec<Board>> {
        let user_id = self
            .identity
            .current_user_id()
            .ok_or(DaoError::Unauthenticated)?;
        self.base.find_containing(fields::ASSIGNED_TO, user_id).await
    }

    /// Rewrites the whole `taskList` array of a board.
    pub async fn update_task_list(&self, id: &str, task_list: &[TaskList]) -> DaoResult<()> {
        let mut update = Document::new();
        update.insert(fields::TASK_LIST, to_bson(task_list)?);
        self.base.update_fields(id, update).await
    }

    /// Rewrites the whole `assignedTo` array of a board.
    pub async fn update_assigned_to(&self, id: &str, assigned_to: &[UserId]) -> DaoResult<()> {
        let mut update = Document::new();
        update.insert(fields::ASSIGNED_TO, to_bson(assigned_to)?);
        self.base.update_fields(id, update).await
    }
}
