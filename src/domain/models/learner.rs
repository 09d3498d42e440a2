use serde::{Deserialize, Serialize};

/// A learner (student) owned by exactly one user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Learner {
    pub id: i64,
    pub name: String,
    /// Owning user account.
    pub username: String,
}
