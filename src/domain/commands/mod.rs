//! Command and result types for the domain services. Mutating operations
//! take a command struct and return a result struct; reads take their key
//! directly.

pub mod learner;
pub mod payroll;
pub mod user;
