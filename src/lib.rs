//! # TutorPay Backend
//!
//! Domain and storage layers for a tutoring attendance / payroll tracker.
//! The backend:
//! - Uses synchronous operations (no async/await)
//! - Provides direct access to domain services
//! - Leaves all rendering (screens, PDF drawing) to the embedding frontend

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

pub mod domain;
pub mod storage;

// Re-export commonly used types
pub use storage::sqlite::SqliteConnection;

/// Main backend struct that orchestrates all services
pub struct Backend {
    pub user_service: domain::UserService,
    pub learner_service: domain::LearnerService,
    pub payroll_service: domain::PayrollService,
    pub export_service: domain::ExportService,
}

impl Backend {
    /// Create a backend storing its database under the platform-local
    /// application data directory.
    pub fn new() -> Result<Self> {
        let connection = Arc::new(SqliteConnection::new_default()?);
        Ok(Self::with_connection(connection))
    }

    /// Create a backend storing its database under an explicit base
    /// directory (used by tests and portable installs).
    pub fn with_base_directory(base_directory: impl AsRef<Path>) -> Result<Self> {
        let connection = Arc::new(SqliteConnection::new(base_directory)?);
        Ok(Self::with_connection(connection))
    }

    fn with_connection(connection: Arc<SqliteConnection>) -> Self {
        let user_service = domain::UserService::new(connection.clone());
        let learner_service = domain::LearnerService::new(connection.clone());
        let payroll_service = domain::PayrollService::new(connection.clone());
        let export_service = domain::ExportService::new(connection);

        Backend {
            user_service,
            learner_service,
            payroll_service,
            export_service,
        }
    }
}
