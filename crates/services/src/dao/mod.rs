pub mod base;
pub mod board;
pub mod user;

pub use base::{BaseDao, DaoError, DaoResult};
pub use board::BoardDao;
pub use user::{ProfileChanges, UserDao};
