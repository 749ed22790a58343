//! Goals module - allocation goals and the goal collaborator trait.

mod goals_model;
mod goals_traits;

#[cfg(test)]
mod goals_model_tests;

pub use goals_model::{validate_allocation_targets, AllocationTarget, Goal};
pub use goals_traits::GoalRepositoryTrait;
