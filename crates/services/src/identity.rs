use taskboard_db::models::UserId;

/// Who is signed in. Authentication itself happens elsewhere.
pub trait Identity: Send + Sync + 'static {
    fn current_user_id(&self) -> Option<UserId>;
}

/// Identity fixed at construction, e.g. from configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity {
    user_id: Option<UserId>,
}

impl StaticIdentity {
    pub fn new(user_id: Option<UserId>) -> Self {
        // An empty id means nobody is signed in
        Self {
            user_id: user_id.filter(|id| !id.is_empty()),
        }
    }

    pub fn signed_in(user_id: impl Into<UserId>) -> Self {
        Self::new(Some(user_id.into()))
    }

    pub fn anonymous() -> Self {
        Self { user_id: None }
    }
}

impl Identity for StaticIdentity {
    fn current_user_id(&self) -> Option<UserId> {
        self.user_id.clone()
    }
}
