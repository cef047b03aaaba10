use taskboard_db::models::{Board, User};

use super::test_app::TestApp;

/// A registered user as stored.
pub struct SeededUser {
    pub id: String,
    pub user: User,
}

/// A board created by `owner`, who is its only member.
pub struct SeededBoard {
    pub board_id: String,
    pub board: Board,
    pub owner: SeededUser,
}

impl TestApp {
    /// Registers a user with a predictable email and push token, then leaves them signed in.
    pub async fn register_user(&self, id: &str, name: &str) -> SeededUser {
        self.sign_in(id);

        let mut user = User::new(String::new(), name.to_string(), format!("{id}@example.com"));
        user.image = format!("https://img.example.com/{id}.png");
        user.fcm_token = format!("token-{id}");

        let user = self
            .services
            .users
            .register(user)
            .await
            .expect("Failed to register user");

        SeededUser {
            id: user.id.clone(),
            user,
        }
    }

    /// Registers `owner_id` and creates an empty board named `name` as them.
    pub async fn seed_board(&self, owner_id: &str, name: &str) -> SeededBoard {
        let owner = self.register_user(owner_id, &format!("Owner {owner_id}")).await;

        let board = self
            .services
            .boards
            .create(name.to_string(), String::new(), owner.user.name.clone())
            .await
            .expect("Failed to create board");

        SeededBoard {
            board_id: board.document_id.clone(),
            board,
            owner,
        }
    }
}
