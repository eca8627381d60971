use async_trait::async_trait;
use approvia_core::{AppResult, Principal};
use approvia_domain::ProjectId;

/// Port answering project-membership questions for the project
/// visibility tier.
///
/// Membership data lives in an external collaborator; deployments must
/// supply a real implementation. The permissive default shipped in the
/// infrastructure crate is a placeholder, not the intended long-term
/// behavior.
#[async_trait]
pub trait ProjectDirectory: Send + Sync {
    /// Returns whether the principal is a member of the project.
    async fn is_project_member(
        &self,
        principal: &Principal,
        project_id: ProjectId,
    ) -> AppResult<bool>;
}
