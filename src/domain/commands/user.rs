use crate::domain::models::user::User;

#[derive(Debug, Clone)]
pub struct RegisterUserCommand {
    pub username: String,
    pub fullname: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct RegisterUserResult {
    pub user: User,
}

#[derive(Debug, Clone)]
pub struct LoginCommand {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct ChangePasswordCommand {
    pub username: String,
    pub current_password: String,
    pub new_password: String,
}

/// Admin-side edit of an existing account, addressed by row id.
#[derive(Debug, Clone)]
pub struct UpdateUserCommand {
    pub user_id: i64,
    pub username: String,
    pub fullname: String,
    pub password: String,
}
