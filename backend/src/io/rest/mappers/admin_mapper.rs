use shared::{AdminAccount as SharedAdmin, AdminAccountForm, Permissions};

use crate::domain::commands::admin::SaveAdminCommand;
use crate::domain::models::admin::{AdminAccount, PermissionSet};

pub struct AdminMapper;

impl AdminMapper {
    /// Never exposes the password hash
    pub fn to_dto(domain: AdminAccount) -> SharedAdmin {
        SharedAdmin {
            id: domain.id,
            username: domain.username,
            permissions: Self::to_permissions_dto(domain.permissions),
        }
    }

    pub fn to_permissions_dto(domain: PermissionSet) -> Permissions {
        Permissions {
            payments: domain.payments,
            blocklist: domain.blocklist,
            reports: domain.reports,
            configuration: domain.configuration,
            users: domain.users,
        }
    }

    pub fn to_save_command(form: AdminAccountForm) -> SaveAdminCommand {
        let permissions = form.permissions();
        SaveAdminCommand {
            username: form.username,
            password: form.password,
            permissions: PermissionSet {
                payments: permissions.payments,
                blocklist: permissions.blocklist,
                reports: permissions.reports,
                configuration: permissions.configuration,
                users: permissions.users,
            },
        }
    }
}
