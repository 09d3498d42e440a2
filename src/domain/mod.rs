//! Domain layer: payroll semantics, calendar grid, learner and user
//! management. All business rules live here; storage is reached through
//! the repository traits in [`crate::storage`].

pub mod calendar;
pub mod commands;
pub mod currency;
pub mod errors;
pub mod export_service;
pub mod learner_service;
pub mod models;
pub mod payroll_service;
pub mod user_service;

pub use errors::{DomainError, DomainResult};
pub use export_service::ExportService;
pub use learner_service::LearnerService;
pub use payroll_service::PayrollService;
pub use user_service::UserService;
