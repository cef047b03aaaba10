pub mod board;
pub mod user;

pub use board::*;
pub use user::*;
