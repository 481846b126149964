use chrono::{Datelike, NaiveDate};

const MONTHS: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// "007-2025-UB/DBU-UNAP"
pub fn format_correlative(number: i64, year: i32, suffix: &str) -> String {
    format!("{:03}-{}-{}", number, year, suffix)
}

/// "5 de marzo de 2025"
pub fn date_in_words(date: NaiveDate) -> String {
    format!("{} de {} de {}", date.day(), MONTHS[date.month0() as usize], date.year())
}

/// Drop a leading "FACULTAD DE " or "FACULTAD " from a faculty name
pub fn strip_faculty_prefix(faculty: &str) -> &str {
    faculty
        .strip_prefix("FACULTAD DE ")
        .or_else(|| faculty.strip_prefix("FACULTAD "))
        .unwrap_or(faculty)
}
