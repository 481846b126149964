use crate::domain::errors::{PortalError, PortalResult};
use crate::domain::models::admin::{AdminAccount, Permission, PermissionSet};

/// Identity and permissions of the admin behind the current request.
/// Built from storage on every request, so permission edits apply at once.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthContext {
    pub admin_id: i64,
    pub username: String,
    pub permissions: PermissionSet,
}

impl AuthContext {
    pub fn require(&self, permission: Permission) -> PortalResult<()> {
        if self.permissions.allows(permission) {
            Ok(())
        } else {
            Err(PortalError::Forbidden(permission))
        }
    }
}

impl From<AdminAccount> for AuthContext {
    fn from(account: AdminAccount) -> Self {
        Self {
            admin_id: account.id,
            username: account.username,
            permissions: account.permissions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_checks_single_flag() {
        let context = AuthContext {
            admin_id: 2,
            username: "clerk".to_string(),
            permissions: PermissionSet {
                payments: true,
                ..Default::default()
            },
        };

        assert!(context.require(Permission::Payments).is_ok());
        assert!(matches!(
            context.require(Permission::Users),
            Err(PortalError::Forbidden(Permission::Users))
        ));
    }
}
