//! Collection and field names as they appear in stored documents.

pub const USERS: &str = "users";
pub const BOARDS: &str = "boards";

pub const ID: &str = "id";
pub const NAME: &str = "name";
pub const EMAIL: &str = "email";
pub const IMAGE: &str = "image";
pub const MOBILE: &str = "mobile";
pub const FCM_TOKEN: &str = "fcmToken";

pub const ASSIGNED_TO: &str = "assignedTo";
pub const TASK_LIST: &str = "taskList";
