use async_trait::async_trait;
use approvia_application::ProjectDirectory;
use approvia_core::{AppResult, Principal};
use approvia_domain::ProjectId;

/// Project directory that treats every principal as a member.
///
/// Deployment placeholder until a real membership source is wired in; the
/// project visibility tier is only as strict as this collaborator.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAllProjectDirectory;

impl AllowAllProjectDirectory {
    /// Creates the permissive directory.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProjectDirectory for AllowAllProjectDirectory {
    async fn is_project_member(
        &self,
        _principal: &Principal,
        _project_id: ProjectId,
    ) -> AppResult<bool> {
        Ok(true)
    }
}
