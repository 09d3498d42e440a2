//! SQLite storage backend: one shared connection, one repository per
//! entity, explicit transactions for every multi-row write.

mod connection;
mod learner_repository;
mod payroll_repository;
mod user_repository;

pub use connection::SqliteConnection;
pub use learner_repository::LearnerRepository;
pub use payroll_repository::PayrollRepository;
pub use user_repository::UserRepository;
