pub mod learner;
pub mod payroll;
pub mod user;
