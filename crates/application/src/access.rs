use std::sync::Arc;

use approvia_core::{AppError, AppResult, Principal};
use approvia_domain::{Record, can_access};

use crate::project_ports::ProjectDirectory;

/// Visibility resolution shared by every read and write path.
///
/// Resolves project membership through the directory collaborator, then
/// delegates to the ordered rules in [`approvia_domain::can_access`].
#[derive(Clone)]
pub struct AccessPolicy {
    directory: Arc<dyn ProjectDirectory>,
}

impl AccessPolicy {
    /// Creates an access policy over a project directory.
    #[must_use]
    pub fn new(directory: Arc<dyn ProjectDirectory>) -> Self {
        Self { directory }
    }

    /// Returns whether the principal may read the record.
    pub async fn allows(&self, principal: &Principal, record: &Record) -> AppResult<bool> {
        let is_project_member = match record.project_id() {
            Some(project_id) => {
                self.directory
                    .is_project_member(principal, project_id)
                    .await?
            }
            None => false,
        };

        Ok(can_access(principal, record, is_project_member))
    }

    /// Fails with `Forbidden` when the principal may not read the record.
    pub async fn require(&self, principal: &Principal, record: &Record) -> AppResult<()> {
        if self.allows(principal, record).await? {
            return Ok(());
        }

        Err(AppError::Forbidden(format!(
            "user '{}' may not access record '{}'",
            principal.user_id(),
            record.id()
        )))
    }
}
