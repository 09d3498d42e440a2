//! # Storage Layer
//!
//! Repository traits and the SQLite implementation behind them. The domain
//! layer only depends on the traits, so a different backend can be swapped
//! in without touching business logic.

pub mod sqlite;
pub mod traits;

pub use sqlite::SqliteConnection;
pub use traits::{LearnerStorage, PayrollStorage, UserStorage};
