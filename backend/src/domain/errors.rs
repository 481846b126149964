use std::path::PathBuf;

use crate::domain::models::admin::Permission;

/// Every failure a portal operation can report. The `Display` text is the
/// message shown to the student or administrator.
#[derive(Debug, thiserror::Error)]
pub enum PortalError {
    #[error("ACCESO DENEGADO: {kind} bloqueado por '{reason}'.")]
    Blocked { kind: String, reason: String },

    #[error("Datos incorrectos.")]
    IncorrectData,

    #[error("El monto pagado es insuficiente (S/ {amount:.2}, mínimo S/ {minimum:.2}).")]
    InsufficientAmount { amount: f64, minimum: f64 },

    #[error("El monto debe ser numérico: '{0}'.")]
    InvalidAmount(String),

    #[error("Voucher ya existe: {0}.")]
    DuplicateVoucher(String),

    #[error("Ya en lista negra: {0}.")]
    DuplicateIdentifier(String),

    #[error("Ya existe: {0}.")]
    DuplicateName(String),

    #[error("El usuario ya existe: {0}.")]
    DuplicateUsername(String),

    #[error("No puede eliminar su propia cuenta.")]
    SelfDeletion,

    #[error("Campo obligatorio: {0}.")]
    MissingField(&'static str),

    #[error("{entity} no encontrado: {id}.")]
    NotFound { entity: &'static str, id: i64 },

    #[error("El registro aún no ha sido completado.")]
    NotCompleted,

    #[error("Falta la plantilla {}.", .0.display())]
    MissingTemplate(PathBuf),

    #[error("Error al procesar el archivo: {0}")]
    ImportFailed(String),

    #[error("Error al generar el documento: {0}")]
    Render(String),

    #[error("Usuario o contraseña incorrectos.")]
    InvalidCredentials,

    #[error("Sesión no iniciada.")]
    Unauthenticated,

    #[error("{}", .0.denial_message())]
    Forbidden(Permission),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

pub type PortalResult<T> = Result<T, PortalError>;

impl PortalError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        PortalError::NotFound { entity, id }
    }

    /// Stable machine-readable code for API clients
    pub fn code(&self) -> &'static str {
        match self {
            PortalError::Blocked { .. } => "BLOCKED",
            PortalError::IncorrectData => "INCORRECT_DATA",
            PortalError::InsufficientAmount { .. } => "INSUFFICIENT_AMOUNT",
            PortalError::InvalidAmount(_) => "INVALID_AMOUNT",
            PortalError::DuplicateVoucher(_) => "DUPLICATE_VOUCHER",
            PortalError::DuplicateIdentifier(_) => "DUPLICATE_IDENTIFIER",
            PortalError::DuplicateName(_) => "DUPLICATE_NAME",
            PortalError::DuplicateUsername(_) => "DUPLICATE_USERNAME",
            PortalError::SelfDeletion => "SELF_DELETION",
            PortalError::MissingField(_) => "MISSING_FIELD",
            PortalError::NotFound { .. } => "NOT_FOUND",
            PortalError::NotCompleted => "NOT_COMPLETED",
            PortalError::MissingTemplate(_) => "MISSING_TEMPLATE",
            PortalError::ImportFailed(_) => "IMPORT_FAILED",
            PortalError::Render(_) => "RENDER_FAILED",
            PortalError::InvalidCredentials => "INVALID_CREDENTIALS",
            PortalError::Unauthenticated => "UNAUTHENTICATED",
            PortalError::Forbidden(_) => "FORBIDDEN",
            PortalError::Storage(_) => "STORAGE_ERROR",
        }
    }
}
