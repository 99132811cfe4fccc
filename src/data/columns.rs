//! Column Resolver Module
//! Maps recognized field roles to the concrete column names of a loaded table.

use polars::prelude::*;
use std::collections::HashMap;

/// Age in whole years, derived from the birth date.
pub const AGE_COL: &str = "EDAD";
/// Age bracket label, derived from the age.
pub const AGE_BRACKET_COL: &str = "RANGO_EDAD";
/// Hire year, derived from the hire date.
pub const HIRE_YEAR_COL: &str = "AÑO";
/// Hire month number (1-12), derived from the hire date.
pub const HIRE_MONTH_NUM_COL: &str = "MES_NUM";
/// Hire month name, derived from the hire date.
pub const HIRE_MONTH_COL: &str = "MES";
/// Birth month name, derived from the birth date.
pub const BIRTH_MONTH_COL: &str = "MES_CUMPLEAÑOS";

/// Semantic role of a source column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldRole {
    BusinessUnit,
    Gender,
    JobTitle,
    Country,
    BirthDate,
    HireDate,
}

impl FieldRole {
    pub const ALL: [FieldRole; 6] = [
        FieldRole::BusinessUnit,
        FieldRole::Gender,
        FieldRole::JobTitle,
        FieldRole::Country,
        FieldRole::BirthDate,
        FieldRole::HireDate,
    ];

    /// Candidate column names, highest priority first.
    pub fn candidates(self) -> &'static [&'static str] {
        match self {
            FieldRole::BusinessUnit => &[
                "UNIDAD DE NEGOCIO",
                "Unidad de Negocio",
                "unidad de negocio",
                "UNIDAD_NEGOCIO",
                "BUSINESS UNIT",
            ],
            FieldRole::Gender => &[
                "GENERO (F/M)",
                "GENERO",
                "GÉNERO",
                "Genero",
                "SEXO",
                "GENDER",
            ],
            FieldRole::JobTitle => &[
                "POSICION / PUESTO / CARGO",
                "PUESTO",
                "CARGO",
                "POSICION",
                "JOB TITLE",
            ],
            FieldRole::Country => &["pais", "PAIS", "PAÍS", "País", "COUNTRY"],
            FieldRole::BirthDate => &[
                "FECHA DE NACIMIENTO (DD/MM/YYYY)",
                "FECHA DE NACIMIENTO",
                "FECHA_NACIMIENTO",
                "fecha_nacimiento",
            ],
            FieldRole::HireDate => &[
                "FECHA DE INGRESO (DD/MM/YYYY)",
                "FECHA DE INGRESO",
                "FECHA_INGRESO",
                "fecha_ingreso",
            ],
        }
    }

    /// Human readable label used in the sidebar and notices.
    pub fn label(self) -> &'static str {
        match self {
            FieldRole::BusinessUnit => "Unidad de Negocio",
            FieldRole::Gender => "Género",
            FieldRole::JobTitle => "Puesto",
            FieldRole::Country => "País",
            FieldRole::BirthDate => "Fecha de nacimiento",
            FieldRole::HireDate => "Fecha de ingreso",
        }
    }
}

/// Resolved column name per role. Roles with no matching column are absent.
#[derive(Debug, Clone, Default)]
pub struct ColumnMap {
    resolved: HashMap<FieldRole, String>,
}

impl ColumnMap {
    /// Resolve every role against the table's column names.
    ///
    /// The first candidate name present in the table wins, whether or not
    /// that column holds any non-null values.
    pub fn resolve(df: &DataFrame) -> Self {
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        let resolved = FieldRole::ALL
            .iter()
            .filter_map(|&role| {
                role.candidates()
                    .iter()
                    .find(|candidate| names.iter().any(|n| n == *candidate))
                    .map(|name| (role, name.to_string()))
            })
            .collect();

        Self { resolved }
    }

    /// Column name bound to `role`, if the table has one.
    pub fn get(&self, role: FieldRole) -> Option<&str> {
        self.resolved.get(&role).map(String::as_str)
    }

    pub fn is_resolved(&self, role: FieldRole) -> bool {
        self.resolved.contains_key(&role)
    }
}

/// Whether `df` has a column called `name`.
pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.column(name).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_present_candidate_wins() {
        let df = df!(
            "GENERO" => &["F", "M"],
            "GENERO (F/M)" => &[None::<&str>, None],
            "pais" => &["Chile", "Peru"]
        )
        .unwrap();

        let map = ColumnMap::resolve(&df);

        // The higher priority name wins even though its column is all null.
        assert_eq!(map.get(FieldRole::Gender), Some("GENERO (F/M)"));
        assert_eq!(map.get(FieldRole::Country), Some("pais"));
        assert!(!map.is_resolved(FieldRole::BirthDate));
        assert_eq!(map.get(FieldRole::HireDate), None);
    }

    #[test]
    fn matching_is_exact() {
        let df = df!("Pais " => &["Chile"], "FECHA DE INGRESO" => &["01/01/2020"]).unwrap();

        let map = ColumnMap::resolve(&df);

        assert_eq!(map.get(FieldRole::Country), None);
        assert_eq!(map.get(FieldRole::HireDate), Some("FECHA DE INGRESO"));
    }
}
