use shared::ImportSummary;
use tracing::info;

use crate::domain::audit_service::AuditService;
use crate::domain::commands::payments::{CreatePaymentCommand, ImportPaymentsCommand};
use crate::domain::errors::{PortalError, PortalResult};
use crate::domain::intake_service::required;
use crate::domain::models::audit::AuditAction;
use crate::domain::models::payment::{NewPayment, Payment};
use crate::domain::payment_import::{parse_amount, plan_import, read_rows};
use crate::storage::connection::DbConnection;
use crate::storage::repositories::PaymentRepository;

/// How many payments the admin list shows
const RECENT_LIMIT: u32 = 100;

/// Admin-side management of the payments register
#[derive(Clone)]
pub struct PaymentService {
    payments: PaymentRepository,
    audit: AuditService,
    min_amount: f64,
}

impl PaymentService {
    pub fn new(db: DbConnection, min_amount: f64) -> Self {
        Self {
            payments: PaymentRepository::new(db.clone()),
            audit: AuditService::new(db),
            min_amount,
        }
    }

    pub async fn list_recent(&self) -> PortalResult<Vec<Payment>> {
        Ok(self.payments.list_recent(RECENT_LIMIT).await?)
    }

    pub async fn create(&self, actor: &str, command: CreatePaymentCommand) -> PortalResult<Payment> {
        info!("POST payment - voucher: {}", command.voucher);

        let voucher = required(&command.voucher, "voucher")?;
        let dni = required(&command.dni, "dni")?;
        let date = required(&command.date, "fecha")?;
        let amount =
            parse_amount(&command.amount).ok_or_else(|| PortalError::InvalidAmount(command.amount.clone()))?;

        if amount < self.min_amount {
            return Err(PortalError::InsufficientAmount {
                amount,
                minimum: self.min_amount,
            });
        }
        if self.payments.voucher_exists(voucher).await? {
            return Err(PortalError::DuplicateVoucher(voucher.to_string()));
        }

        let id = self
            .payments
            .insert(&NewPayment {
                voucher: voucher.to_string(),
                dni: dni.to_string(),
                payment_date: date.to_string(),
                amount,
            })
            .await?;

        self.audit
            .record(actor, AuditAction::PaymentCreated, format!("voucher {} monto {:.2}", voucher, amount))
            .await;

        self.payments
            .find_by_id(id)
            .await?
            .ok_or_else(|| PortalError::not_found("Pago", id))
    }

    /// Parse and insert an uploaded file in one transaction
    pub async fn import(&self, actor: &str, command: ImportPaymentsCommand) -> PortalResult<ImportSummary> {
        info!("Importing payments from {} ({} bytes)", command.file_name, command.content.len());

        let rows = read_rows(&command.file_name, &command.content)?;
        let plan = plan_import(rows, self.min_amount);
        let outcome = self.payments.insert_batch_skipping_existing(&plan.payments).await?;

        let summary = ImportSummary {
            created: outcome.inserted,
            skipped_duplicate: outcome.duplicates,
            ..plan.summary
        };

        info!(
            "📥 Import of {}: {} created, {} skipped of {} rows",
            command.file_name,
            summary.created,
            summary.skipped(),
            summary.total_rows
        );
        self.audit
            .record(
                actor,
                AuditAction::PaymentsImported,
                format!(
                    "{}: {} creados, {} omitidos",
                    command.file_name,
                    summary.created,
                    summary.skipped()
                ),
            )
            .await;

        Ok(summary)
    }

    pub async fn delete(&self, actor: &str, id: i64) -> PortalResult<()> {
        let payment = self
            .payments
            .find_by_id(id)
            .await?
            .ok_or_else(|| PortalError::not_found("Pago", id))?;

        if !self.payments.delete(id).await? {
            return Err(PortalError::not_found("Pago", id));
        }

        self.audit
            .record(actor, AuditAction::PaymentDeleted, format!("voucher {}", payment.voucher))
            .await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn service() -> PaymentService {
        let db = DbConnection::init_test().await.unwrap();
        PaymentService::new(db, 57.50)
    }

    fn create(voucher: &str, amount: &str) -> CreatePaymentCommand {
        CreatePaymentCommand {
            voucher: voucher.to_string(),
            dni: "12345678".to_string(),
            date: "2025-03-05".to_string(),
            amount: amount.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let service = service().await;

        let payment = service.create("admin", create(" V1 ", "60")).await.unwrap();
        assert_eq!(payment.voucher, "V1");
        assert_eq!(payment.amount, 60.0);

        let listed = service.list_recent().await.unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[tokio::test]
    async fn test_create_rejections() {
        let service = service().await;
        service.create("admin", create("V1", "60")).await.unwrap();

        assert!(matches!(
            service.create("admin", create("V2", "sesenta")).await,
            Err(PortalError::InvalidAmount(_))
        ));
        assert!(matches!(
            service.create("admin", create("V2", "inf")).await,
            Err(PortalError::InvalidAmount(_))
        ));
        assert!(matches!(
            service.create("admin", create("V2", "20")).await,
            Err(PortalError::InsufficientAmount { .. })
        ));
        assert!(matches!(
            service.create("admin", create("V1", "60")).await,
            Err(PortalError::DuplicateVoucher(_))
        ));
    }

    #[tokio::test]
    async fn test_import_reports_every_skip() {
        let service = service().await;
        service.create("admin", create("V1", "60")).await.unwrap();

        let content = "V1,1,2025-01-10,60\n\
                       V2,2,2025-01-10,60\n\
                       V2,2,2025-01-10,60\n\
                       V3,3,2025-01-10,abc\n\
                       V4,4\n\
                       V5,5,2025-01-10,58\n";
        let summary = service
            .import(
                "admin",
                ImportPaymentsCommand {
                    file_name: "pagos.csv".to_string(),
                    content: content.as_bytes().to_vec(),
                },
            )
            .await
            .unwrap();

        assert_eq!(summary.total_rows, 6);
        assert_eq!(summary.created, 2);
        assert_eq!(summary.skipped_duplicate, 2);
        assert_eq!(summary.skipped_invalid_amount, 1);
        assert_eq!(summary.skipped_malformed, 1);
        assert_eq!(summary.created + summary.skipped(), summary.total_rows);
        assert_eq!(service.list_recent().await.unwrap().len(), 3);
    }

    /// Minimal xlsx: one sheet, header row, style 1 is the built-in date format
    fn workbook(rows: &[&str]) -> Vec<u8> {
        use std::io::{Cursor, Write};
        use zip::write::FileOptions;
        use zip::ZipWriter;

        let sheet = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{}</sheetData></worksheet>"#,
            rows.join("")
        );
        let parts = [
            (
                "[Content_Types].xml",
                r#"<?xml version="1.0" encoding="UTF-8"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
<Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
<Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>
</Types>"#
                    .to_string(),
            ),
            (
                "_rels/.rels",
                r#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#
                    .to_string(),
            ),
            (
                "xl/workbook.xml",
                r#"<?xml version="1.0" encoding="UTF-8"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<sheets><sheet name="Pagos" sheetId="1" r:id="rId1"/></sheets>
</workbook>"#
                    .to_string(),
            ),
            (
                "xl/_rels/workbook.xml.rels",
                r#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
</Relationships>"#
                    .to_string(),
            ),
            (
                "xl/styles.xml",
                r#"<?xml version="1.0" encoding="UTF-8"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<cellXfs count="2"><xf numFmtId="0"/><xf numFmtId="14" applyNumberFormat="1"/></cellXfs>
</styleSheet>"#
                    .to_string(),
            ),
            ("xl/worksheets/sheet1.xml", sheet),
        ];

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, xml) in parts {
            writer.start_file(name, FileOptions::default()).unwrap();
            writer.write_all(xml.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    fn text(cell: &str, value: &str) -> String {
        format!(r#"<c r="{}" t="inlineStr"><is><t>{}</t></is></c>"#, cell, value)
    }

    fn number(cell: &str, value: &str) -> String {
        format!(r#"<c r="{}"><v>{}</v></c>"#, cell, value)
    }

    fn date(cell: &str, serial: u32) -> String {
        format!(r#"<c r="{}" s="1"><v>{}</v></c>"#, cell, serial)
    }

    #[tokio::test]
    async fn test_import_spreadsheet_skips_header_and_normalizes_cells() {
        let service = service().await;

        // 45717 is 2025-03-01 as an Excel serial date
        let rows = [
            format!(
                r#"<row r="1">{}{}{}{}</row>"#,
                text("A1", "Voucher"),
                text("B1", "DNI"),
                text("C1", "Fecha"),
                text("D1", "Monto")
            ),
            format!(
                r#"<row r="2">{}{}{}{}</row>"#,
                text("A2", "X100"),
                number("B2", "12345678"),
                date("C2", 45717),
                number("D2", "60")
            ),
            format!(
                r#"<row r="3">{}{}{}{}</row>"#,
                number("A3", "900200"),
                number("B3", "87654321"),
                date("C3", 45718),
                number("D3", "57.5")
            ),
            format!(
                r#"<row r="4">{}{}{}{}</row>"#,
                text("A4", "X101"),
                number("B4", "11111111"),
                date("C4", 45717),
                number("D4", "10")
            ),
            format!(
                r#"<row r="5">{}{}{}{}</row>"#,
                text("A5", "X100"),
                number("B5", "22222222"),
                date("C5", 45717),
                number("D5", "70")
            ),
        ];
        let rows: Vec<&str> = rows.iter().map(String::as_str).collect();

        let summary = service
            .import(
                "admin",
                ImportPaymentsCommand {
                    file_name: "pagos.xlsx".to_string(),
                    content: workbook(&rows),
                },
            )
            .await
            .unwrap();

        assert_eq!(summary.total_rows, 4);
        assert_eq!(summary.created, 2);
        assert_eq!(summary.skipped_invalid_amount, 1);
        assert_eq!(summary.skipped_duplicate, 1);
        assert_eq!(summary.skipped_malformed, 0);

        let stored = service.list_recent().await.unwrap();
        assert_eq!(stored.len(), 2);

        let first = stored.iter().find(|p| p.voucher == "X100").unwrap();
        assert_eq!(first.dni, "12345678");
        assert_eq!(first.payment_date, "2025-03-01");
        assert_eq!(first.amount, 60.0);

        let second = stored.iter().find(|p| p.voucher == "900200").unwrap();
        assert_eq!(second.dni, "87654321");
        assert_eq!(second.payment_date, "2025-03-02");
        assert_eq!(second.amount, 57.5);
    }

    #[tokio::test]
    async fn test_delete_unknown_payment() {
        let service = service().await;
        let payment = service.create("admin", create("V1", "60")).await.unwrap();

        service.delete("admin", payment.id).await.unwrap();
        assert!(matches!(
            service.delete("admin", payment.id).await,
            Err(PortalError::NotFound { .. })
        ));
    }
}
