use crate::errors::Result;
use crate::goals::goals_model::Goal;

/// Goal collaborator. At most one allocation goal is active per user.
pub trait GoalRepositoryTrait: Send + Sync {
    fn get_active_allocation_goal(&self, user_id: &str) -> Result<Option<Goal>>;
}
