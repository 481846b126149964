use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The three lookup tables used to populate forms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReferenceKind {
    Faculty,
    School,
    Degree,
}

impl ReferenceKind {
    pub fn table(self) -> &'static str {
        match self {
            ReferenceKind::Faculty => "faculties",
            ReferenceKind::School => "schools",
            ReferenceKind::Degree => "degrees",
        }
    }

    /// Rows inserted on first start when the table is empty
    pub fn defaults(self) -> &'static [&'static str] {
        match self {
            ReferenceKind::Faculty => &[
                "FACULTAD DE CIENCIAS ECONÓMICAS Y DE NEGOCIOS",
                "FACULTAD DE INGENIERÍA DE SISTEMAS E INFORMÁTICA",
            ],
            ReferenceKind::School => &[
                "INGENIERÍA DE SISTEMAS",
                "DERECHO",
                "ENFERMERÍA",
                "CONTABILIDAD",
            ],
            ReferenceKind::Degree => &[
                "BACHILLER",
                "TÍTULO PROFESIONAL",
                "MAESTRÍA",
                "DOCTORADO",
                "SEGUNDA ESPECIALIDAD",
            ],
        }
    }

    pub fn all() -> [ReferenceKind; 3] {
        [ReferenceKind::Faculty, ReferenceKind::School, ReferenceKind::Degree]
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table())
    }
}

impl FromStr for ReferenceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "faculties" => Ok(ReferenceKind::Faculty),
            "schools" => Ok(ReferenceKind::School),
            "degrees" => Ok(ReferenceKind::Degree),
            other => Err(format!("Unknown reference list: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReferenceEntry {
    pub id: i64,
    pub name: String,
    pub faculty_id: Option<i64>,
}
