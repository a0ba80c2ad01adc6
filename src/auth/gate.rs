//! Role checks applied after a session has been read.

use uuid::Uuid;

use super::extractors::AuthUser;
use super::repo_types::Role;
use crate::error::{ApiError, ApiResult};

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn require_admin(&self) -> ApiResult<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(ApiError::Forbidden("Admin access required".into()))
        }
    }

    /// A resource is mutable by its author or by any admin.
    pub fn can_modify(&self, owner_id: Uuid) -> bool {
        self.id == owner_id || self.is_admin()
    }

    pub fn require_owner_or_admin(&self, owner_id: Uuid) -> ApiResult<()> {
        if self.can_modify(owner_id) {
            Ok(())
        } else {
            Err(ApiError::Forbidden(
                "Only the author or an admin can modify this resource".into(),
            ))
        }
    }
}
