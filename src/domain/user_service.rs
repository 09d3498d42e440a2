//! User account management: registration, login, password changes and the
//! admin-side account CRUD. Credentials are opaque strings; the service
//! only checks exact matches.

use log::{info, warn};
use std::sync::Arc;

use crate::domain::commands::user::{
    ChangePasswordCommand, LoginCommand, RegisterUserCommand, RegisterUserResult,
    UpdateUserCommand,
};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::user::User;
use crate::storage::sqlite::{SqliteConnection, UserRepository};
use crate::storage::traits::UserStorage;

/// Service for managing user accounts.
#[derive(Clone)]
pub struct UserService {
    user_repository: UserRepository,
}

impl UserService {
    /// Create a new UserService
    pub fn new(connection: Arc<SqliteConnection>) -> Self {
        Self {
            user_repository: UserRepository::new(connection),
        }
    }

    /// Register a new account. Duplicate usernames fail with
    /// `AlreadyExists` and change nothing.
    pub fn register(&self, command: RegisterUserCommand) -> DomainResult<RegisterUserResult> {
        Self::validate_fields(&[
            ("username", &command.username),
            ("full name", &command.fullname),
            ("password", &command.password),
        ])?;

        let inserted = self.user_repository.insert_user(
            &command.username,
            &command.fullname,
            &command.password,
        )?;
        if !inserted {
            return Err(DomainError::AlreadyExists);
        }

        let user = self
            .user_repository
            .get_user(&command.username)?
            .ok_or(DomainError::NotFound)?;
        Ok(RegisterUserResult { user })
    }

    /// Authenticate a username/password pair. A wrong pair yields `None`,
    /// not an error.
    pub fn login(&self, command: LoginCommand) -> DomainResult<Option<User>> {
        Self::validate_fields(&[
            ("username", &command.username),
            ("password", &command.password),
        ])?;
        let user = self
            .user_repository
            .authenticate(&command.username, &command.password)?;
        if user.is_some() {
            info!("User {} logged in", command.username);
        } else {
            warn!("Failed login for {}", command.username);
        }
        Ok(user)
    }

    /// Change a user's password after verifying the current one.
    pub fn change_password(&self, command: ChangePasswordCommand) -> DomainResult<()> {
        Self::validate_fields(&[("new password", &command.new_password)])?;

        let verified = self
            .user_repository
            .authenticate(&command.username, &command.current_password)?;
        if verified.is_none() {
            return Err(DomainError::InvalidInput(
                "current password is incorrect".to_string(),
            ));
        }

        if !self
            .user_repository
            .update_password(&command.username, &command.new_password)?
        {
            return Err(DomainError::NotFound);
        }
        Ok(())
    }

    /// Retrieve an account by username.
    pub fn get_user(&self, username: &str) -> DomainResult<Option<User>> {
        Ok(self.user_repository.get_user(username)?)
    }

    /// All accounts (admin view).
    pub fn list_users(&self) -> DomainResult<Vec<User>> {
        Ok(self.user_repository.list_users()?)
    }

    /// Admin-side edit of an account. The new username must not collide
    /// with another account.
    pub fn update_user(&self, command: UpdateUserCommand) -> DomainResult<()> {
        Self::validate_fields(&[
            ("username", &command.username),
            ("full name", &command.fullname),
            ("password", &command.password),
        ])?;

        // Reject a username collision with a different account up front.
        if let Some(existing) = self.user_repository.get_user(&command.username)? {
            if existing.id != command.user_id {
                return Err(DomainError::AlreadyExists);
            }
        }

        if !self.user_repository.update_user(
            command.user_id,
            &command.username,
            &command.fullname,
            &command.password,
        )? {
            return Err(DomainError::NotFound);
        }
        Ok(())
    }

    /// Delete an account and everything it owns: learners and all of
    /// their ledgers.
    pub fn delete_account(&self, username: &str) -> DomainResult<()> {
        if !self.user_repository.delete_user(username)? {
            return Err(DomainError::NotFound);
        }
        Ok(())
    }

    /// Admin-side deletion by row id, with the same cascade.
    pub fn delete_user_by_id(&self, user_id: i64) -> DomainResult<()> {
        if !self.user_repository.delete_user_by_id(user_id)? {
            return Err(DomainError::NotFound);
        }
        Ok(())
    }

    fn validate_fields(fields: &[(&str, &str)]) -> DomainResult<()> {
        for (label, value) in fields {
            if value.trim().is_empty() {
                return Err(DomainError::InvalidInput(format!(
                    "{} cannot be empty",
                    label
                )));
            }
        }
        Ok(())
    }
}
