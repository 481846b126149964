use chrono::{Duration, Utc};
use rand::RngCore;
use tracing::{info, warn};

use crate::domain::audit_service::AuditService;
use crate::domain::auth::AuthContext;
use crate::domain::commands::admin::SaveAdminCommand;
use crate::domain::errors::{PortalError, PortalResult};
use crate::domain::intake_service::required;
use crate::domain::models::admin::{AdminAccount, PermissionSet};
use crate::domain::models::audit::AuditAction;
use crate::domain::password::{hash_password, verify_password};
use crate::storage::connection::DbConnection;
use crate::storage::repositories::{AdminRepository, SessionRepository};

/// Username of the account created on first start
pub const BOOTSTRAP_USERNAME: &str = "admin";

/// Admin accounts, login sessions and per-request authentication
#[derive(Clone)]
pub struct AdminService {
    admins: AdminRepository,
    sessions: SessionRepository,
    audit: AuditService,
    session_ttl: Duration,
}

impl AdminService {
    pub fn new(db: DbConnection, session_ttl_hours: i64) -> Self {
        Self {
            admins: AdminRepository::new(db.clone()),
            sessions: SessionRepository::new(db.clone()),
            audit: AuditService::new(db),
            session_ttl: Duration::hours(session_ttl_hours),
        }
    }

    /// Create the `admin` account with every permission when it is missing
    pub async fn ensure_bootstrap_admin(&self, password: &str) -> PortalResult<()> {
        if self.admins.find_by_username(BOOTSTRAP_USERNAME).await?.is_some() {
            return Ok(());
        }

        let hash = hash_password(password)?;
        self.admins
            .insert(BOOTSTRAP_USERNAME, &hash, PermissionSet::all())
            .await?;
        info!("👤 Created bootstrap admin account '{}'", BOOTSTRAP_USERNAME);
        Ok(())
    }

    /// Check credentials and open a session; returns the session token
    pub async fn login(&self, username: &str, password: &str) -> PortalResult<(String, AuthContext)> {
        let username = username.trim();
        let account = match self.admins.find_by_username(username).await? {
            Some(account) if verify_password(password, &account.password_hash) => account,
            _ => {
                warn!("Failed login for '{}'", username);
                self.audit.record(username, AuditAction::LoginFailed, "").await;
                return Err(PortalError::InvalidCredentials);
            }
        };

        let now = Utc::now();
        let purged = self.sessions.purge_expired(now.timestamp()).await?;
        if purged > 0 {
            info!("Purged {} expired sessions", purged);
        }

        let token = new_session_token();
        let expires_at = (now + self.session_ttl).timestamp();
        self.sessions.create(&token, account.id, expires_at).await?;

        info!("🔑 '{}' logged in", account.username);
        self.audit
            .record(&account.username, AuditAction::LoginSucceeded, "")
            .await;

        Ok((token, AuthContext::from(account)))
    }

    /// The admin behind a session token, loaded fresh from storage.
    /// Unknown, expired or orphaned sessions resolve to `None`.
    pub async fn resolve_session(&self, token: &str) -> PortalResult<Option<AuthContext>> {
        let Some(admin_id) = self.sessions.find_admin_id(token, Utc::now().timestamp()).await? else {
            return Ok(None);
        };

        Ok(self.admins.find_by_id(admin_id).await?.map(AuthContext::from))
    }

    pub async fn logout(&self, token: &str) -> PortalResult<()> {
        if let Some(context) = self.resolve_session(token).await? {
            self.audit.record(&context.username, AuditAction::Logout, "").await;
        }
        self.sessions.delete(token).await?;
        Ok(())
    }

    pub async fn list(&self) -> PortalResult<Vec<AdminAccount>> {
        Ok(self.admins.list().await?)
    }

    pub async fn create(&self, actor: &AuthContext, command: SaveAdminCommand) -> PortalResult<AdminAccount> {
        let username = required(&command.username, "usuario")?;
        let password = required(&command.password, "contraseña")?;
        if self.admins.find_by_username(username).await?.is_some() {
            return Err(PortalError::DuplicateUsername(username.to_string()));
        }

        let hash = hash_password(password)?;
        let id = self.admins.insert(username, &hash, command.permissions).await?;
        self.audit
            .record(&actor.username, AuditAction::AdminCreated, username)
            .await;

        self.find(id).await
    }

    /// Rename, optionally re-password and re-permission an account
    pub async fn update(
        &self,
        actor: &AuthContext,
        id: i64,
        command: SaveAdminCommand,
    ) -> PortalResult<AdminAccount> {
        let mut account = self.find(id).await?;
        let username = required(&command.username, "usuario")?;

        if username != account.username {
            if let Some(other) = self.admins.find_by_username(username).await? {
                if other.id != id {
                    return Err(PortalError::DuplicateUsername(username.to_string()));
                }
            }
            account.username = username.to_string();
        }
        let password = command.password.trim();
        if !password.is_empty() {
            account.password_hash = hash_password(password)?;
        }
        account.permissions = command.permissions;

        self.admins.update(&account).await?;
        self.audit
            .record(&actor.username, AuditAction::AdminUpdated, &account.username)
            .await;

        self.find(id).await
    }

    pub async fn delete(&self, actor: &AuthContext, id: i64) -> PortalResult<()> {
        if actor.admin_id == id {
            return Err(PortalError::SelfDeletion);
        }

        let account = self.find(id).await?;
        self.admins.delete(id).await?;
        self.audit
            .record(&actor.username, AuditAction::AdminDeleted, &account.username)
            .await;
        Ok(())
    }

    async fn find(&self, id: i64) -> PortalResult<AdminAccount> {
        self.admins
            .find_by_id(id)
            .await?
            .ok_or_else(|| PortalError::not_found("Usuario", id))
    }
}

fn new_session_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
