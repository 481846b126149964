//! Parsing of bulk payment uploads.
//!
//! Delimited text (`.csv`, `.txt`) has no header row and one of `,` `;` or tab
//! as separator. Anything else is opened as a spreadsheet whose first row is a
//! header. Every row is voucher, DNI, date, amount.

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, DataType, Reader};
use shared::ImportSummary;

use crate::domain::errors::{PortalError, PortalResult};
use crate::domain::models::payment::NewPayment;

/// Rows accepted for insertion plus the counts of rows rejected on parsing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportPlan {
    pub payments: Vec<NewPayment>,
    pub summary: ImportSummary,
}

pub fn read_rows(file_name: &str, content: &[u8]) -> PortalResult<Vec<Vec<String>>> {
    let file_name = file_name.trim();
    if file_name.is_empty() {
        return Err(PortalError::ImportFailed("no se seleccionó ningún archivo".to_string()));
    }

    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    let rows = match extension.as_str() {
        "csv" | "txt" => read_delimited(content)?,
        _ => read_spreadsheet(content)?,
    };

    Ok(rows
        .into_iter()
        .filter(|row| row.iter().any(|field| !field.is_empty()))
        .collect())
}

/// Sort rows into insertable payments and malformed/invalid-amount rejects.
/// Duplicate vouchers are detected later, against the database.
pub fn plan_import(rows: Vec<Vec<String>>, min_amount: f64) -> ImportPlan {
    let mut plan = ImportPlan::default();
    plan.summary.total_rows = rows.len();

    for row in rows {
        if row.len() < 4 || row[..3].iter().any(|field| field.is_empty()) {
            plan.summary.skipped_malformed += 1;
            continue;
        }

        match parse_amount(&row[3]) {
            Some(amount) if amount >= min_amount => plan.payments.push(NewPayment {
                voucher: row[0].clone(),
                dni: row[1].clone(),
                payment_date: row[2].clone(),
                amount,
            }),
            _ => plan.summary.skipped_invalid_amount += 1,
        }
    }

    plan
}

/// A finite number, accepting a decimal comma when no dot is present
pub fn parse_amount(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    let normalized = if raw.contains('.') {
        raw.to_string()
    } else {
        raw.replace(',', ".")
    };

    normalized.parse::<f64>().ok().filter(|amount| amount.is_finite())
}

fn read_delimited(content: &[u8]) -> PortalResult<Vec<Vec<String>>> {
    let content = content.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(content);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(sniff_delimiter(content))
        .from_reader(content);

    let mut rows = Vec::new();
    for record in reader.byte_records() {
        let record = record.map_err(|e| PortalError::ImportFailed(e.to_string()))?;
        rows.push(record.iter().map(decode_field).collect());
    }
    Ok(rows)
}

/// UTF-8 when valid, otherwise Latin-1 as exported by older spreadsheet tools
fn decode_field(raw: &[u8]) -> String {
    let text = match std::str::from_utf8(raw) {
        Ok(text) => text.to_string(),
        Err(_) => raw.iter().map(|&byte| byte as char).collect(),
    };
    text.trim().to_string()
}

fn sniff_delimiter(content: &[u8]) -> u8 {
    let first_line = content.split(|&byte| byte == b'\n').next().unwrap_or_default();
    let count = |delimiter: u8| first_line.iter().filter(|&&byte| byte == delimiter).count();

    [b';', b'\t']
        .into_iter()
        .fold((b',', count(b',')), |best, candidate| {
            let hits = count(candidate);
            if hits > best.1 {
                (candidate, hits)
            } else {
                best
            }
        })
        .0
}

fn read_spreadsheet(content: &[u8]) -> PortalResult<Vec<Vec<String>>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(content.to_vec()))
        .map_err(|e| PortalError::ImportFailed(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| PortalError::ImportFailed("el archivo no contiene hojas".to_string()))?
        .map_err(|e| PortalError::ImportFailed(e.to_string()))?;

    Ok(range
        .rows()
        .skip(1)
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect())
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(text) => text.trim().to_string(),
        Data::Int(value) => value.to_string(),
        // Voucher and DNI columns often come back as floats
        Data::Float(value) if value.fract() == 0.0 && value.abs() < 1e15 => format!("{}", *value as i64),
        Data::Float(value) => value.to_string(),
        Data::DateTime(_) | Data::DateTimeIso(_) => cell
            .as_date()
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| cell.to_string()),
        other => other.to_string().trim().to_string(),
    }
}
