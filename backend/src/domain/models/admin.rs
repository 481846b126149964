use serde::{Deserialize, Serialize};

/// One of the five independent admin capabilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Permission {
    Payments,
    Blocklist,
    Reports,
    Configuration,
    Users,
}

impl Permission {
    /// Message shown when an admin lacks the permission
    pub fn denial_message(self) -> &'static str {
        match self {
            Permission::Payments => "No tienes permiso para acceder a PAGOS.",
            Permission::Users => "Solo Super Admin.",
            Permission::Blocklist | Permission::Reports | Permission::Configuration => "Sin permiso.",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionSet {
    pub payments: bool,
    pub blocklist: bool,
    pub reports: bool,
    pub configuration: bool,
    pub users: bool,
}

impl PermissionSet {
    pub fn all() -> Self {
        Self {
            payments: true,
            blocklist: true,
            reports: true,
            configuration: true,
            users: true,
        }
    }

    pub fn allows(&self, permission: Permission) -> bool {
        match permission {
            Permission::Payments => self.payments,
            Permission::Blocklist => self.blocklist,
            Permission::Reports => self.reports,
            Permission::Configuration => self.configuration,
            Permission::Users => self.users,
        }
    }
}

/// Stored administrator account
#[derive(Debug, Clone, PartialEq)]
pub struct AdminAccount {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub permissions: PermissionSet,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_are_independent() {
        let set = PermissionSet {
            reports: true,
            ..Default::default()
        };
        assert!(set.allows(Permission::Reports));
        assert!(!set.allows(Permission::Payments));
        assert!(!set.allows(Permission::Users));
        assert!(PermissionSet::all().allows(Permission::Users));
    }
}
