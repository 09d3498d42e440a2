//! Learner management: each learner belongs to exactly one user account
//! and carries its own payroll ledgers, which are removed with it.

use log::{info, warn};
use std::sync::Arc;

use crate::domain::commands::learner::{
    CreateLearnerCommand, CreateLearnerResult, DeleteLearnerCommand, RenameLearnerCommand,
};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::learner::Learner;
use crate::storage::sqlite::{LearnerRepository, SqliteConnection};
use crate::storage::traits::LearnerStorage;

/// Service for managing learners.
#[derive(Clone)]
pub struct LearnerService {
    learner_repository: LearnerRepository,
}

impl LearnerService {
    /// Create a new LearnerService
    pub fn new(connection: Arc<SqliteConnection>) -> Self {
        Self {
            learner_repository: LearnerRepository::new(connection),
        }
    }

    /// Create a learner for a user.
    pub fn create_learner(&self, command: CreateLearnerCommand) -> DomainResult<CreateLearnerResult> {
        let name = Self::validate_name(&command.name)?;
        let learner = self
            .learner_repository
            .insert_learner(&command.username, &name)?;
        info!("Created learner '{}' for {}", learner.name, command.username);
        Ok(CreateLearnerResult { learner })
    }

    /// Retrieve a learner by id.
    pub fn get_learner(&self, learner_id: i64) -> DomainResult<Option<Learner>> {
        Ok(self.learner_repository.get_learner(learner_id)?)
    }

    /// All learners belonging to a user.
    pub fn list_learners(&self, username: &str) -> DomainResult<Vec<Learner>> {
        Ok(self.learner_repository.list_learners(username)?)
    }

    /// Rename a learner.
    pub fn rename_learner(&self, command: RenameLearnerCommand) -> DomainResult<()> {
        let name = Self::validate_name(&command.name)?;
        if !self.learner_repository.rename_learner(command.learner_id, &name)? {
            return Err(DomainError::NotFound);
        }
        Ok(())
    }

    /// Delete a learner, cascading to all of their ledgers.
    pub fn delete_learner(&self, command: DeleteLearnerCommand) -> DomainResult<()> {
        if !self.learner_repository.delete_learner(command.learner_id)? {
            warn!("Learner {} not found", command.learner_id);
            return Err(DomainError::NotFound);
        }
        Ok(())
    }

    fn validate_name(name: &str) -> DomainResult<String> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidInput(
                "learner name cannot be empty".to_string(),
            ));
        }
        Ok(trimmed.to_string())
    }
}
