use crate::domain::models::learner::Learner;

#[derive(Debug, Clone)]
pub struct CreateLearnerCommand {
    /// Owning user account.
    pub username: String,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct CreateLearnerResult {
    pub learner: Learner,
}

#[derive(Debug, Clone)]
pub struct RenameLearnerCommand {
    pub learner_id: i64,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct DeleteLearnerCommand {
    pub learner_id: i64,
}
