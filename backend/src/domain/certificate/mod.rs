//! Certificate documents built from a completed payment record.

pub mod docx;
pub mod format;
pub mod pdf;

use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::clock::Clock;
use crate::domain::errors::{PortalError, PortalResult};
use crate::domain::models::payment::Payment;
use crate::storage::connection::DbConnection;
use crate::storage::repositories::PaymentRepository;

pub use docx::DocxRenderer;
pub use format::{date_in_words, format_correlative, strip_faculty_prefix};
pub use pdf::PdfRenderer;

/// Everything printed on a certificate
#[derive(Debug, Clone, PartialEq)]
pub struct CertificateData {
    pub voucher: String,
    pub correlative: String,
    pub full_name: String,
    /// Faculty name without its "FACULTAD DE" prefix
    pub faculty: String,
    pub school: String,
    pub degree: String,
    pub place: String,
    pub date_words: String,
}

/// Turns a template plus certificate data into a finished document
pub trait CertificateRenderer: Send + Sync {
    fn content_type(&self) -> &'static str;
    fn extension(&self) -> &'static str;
    fn render(&self, template: &[u8], data: &CertificateData) -> PortalResult<Vec<u8>>;
}

#[derive(Debug, Clone)]
pub struct CertificateSettings {
    pub suffix: String,
    pub place: String,
    pub pdf_template: PathBuf,
    pub docx_template: PathBuf,
}

/// A rendered file ready to be sent to the browser
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

#[derive(Clone)]
pub struct CertificateService {
    payments: PaymentRepository,
    clock: Arc<dyn Clock>,
    settings: CertificateSettings,
}

impl CertificateService {
    pub fn new(db: DbConnection, clock: Arc<dyn Clock>, settings: CertificateSettings) -> Self {
        Self {
            payments: PaymentRepository::new(db),
            clock,
            settings,
        }
    }

    pub fn suffix(&self) -> &str {
        &self.settings.suffix
    }

    pub async fn certificate_data(&self, payment_id: i64) -> PortalResult<CertificateData> {
        let payment = self
            .payments
            .find_by_id(payment_id)
            .await?
            .ok_or_else(|| PortalError::not_found("Registro", payment_id))?;

        if !payment.is_completed() {
            return Err(PortalError::NotCompleted);
        }

        Ok(self.build_data(payment))
    }

    pub async fn render_pdf(&self, payment_id: i64) -> PortalResult<RenderedDocument> {
        let template = self.settings.pdf_template.clone();
        self.render_with(&PdfRenderer, template, payment_id).await
    }

    pub async fn render_docx(&self, payment_id: i64) -> PortalResult<RenderedDocument> {
        let template = self.settings.docx_template.clone();
        self.render_with(&DocxRenderer, template, payment_id).await
    }

    async fn render_with(
        &self,
        renderer: &dyn CertificateRenderer,
        template_path: PathBuf,
        payment_id: i64,
    ) -> PortalResult<RenderedDocument> {
        let data = self.certificate_data(payment_id).await?;
        let template = match tokio::fs::read(&template_path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("Template {} is missing", template_path.display());
                return Err(PortalError::MissingTemplate(template_path));
            }
            Err(e) => return Err(PortalError::Storage(e.into())),
        };

        let bytes = renderer.render(&template, &data)?;
        info!(
            "📄 Rendered {} certificate {} ({} bytes)",
            renderer.extension(),
            data.correlative,
            bytes.len()
        );

        Ok(RenderedDocument {
            file_name: format!("Constancia_{}.{}", data.voucher, renderer.extension()),
            content_type: renderer.content_type(),
            bytes,
        })
    }

    fn build_data(&self, payment: Payment) -> CertificateData {
        let today = self.clock.today();
        // Records numbered before correlatives existed fall back to their id
        let number = payment.correlative_number.unwrap_or(payment.id);
        let year = payment.registration_year.unwrap_or_else(|| self.clock.current_year());
        let faculty = payment.faculty.unwrap_or_default();

        CertificateData {
            correlative: format_correlative(number, year, &self.settings.suffix),
            full_name: payment.full_name.unwrap_or_default(),
            faculty: strip_faculty_prefix(&faculty).to_string(),
            school: payment.school.unwrap_or_default(),
            degree: payment.degree.unwrap_or_default(),
            place: self.settings.place.clone(),
            date_words: date_in_words(today),
            voucher: payment.voucher,
        }
    }
}
