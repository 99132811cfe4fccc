//! Field Deriver Module
//! Adds computed columns (age, age bracket, hire year/month, birth month)
//! from the raw date columns.

use crate::data::columns::{
    ColumnMap, FieldRole, AGE_BRACKET_COL, AGE_COL, BIRTH_MONTH_COL, HIRE_MONTH_COL,
    HIRE_MONTH_NUM_COL, HIRE_YEAR_COL,
};
use crate::data::DataLoader;
use chrono::{Datelike, NaiveDate};
use polars::prelude::*;

/// Spanish month names, January first.
pub const MONTHS_ES: &[&str] = &[
    "Enero",
    "Febrero",
    "Marzo",
    "Abril",
    "Mayo",
    "Junio",
    "Julio",
    "Agosto",
    "Septiembre",
    "Octubre",
    "Noviembre",
    "Diciembre",
];

/// Age bracket labels in their natural order.
pub const AGE_BRACKETS: &[&str] = &["18-25", "26-35", "36-45", "46-55", "56-65", "65+"];

/// Right-closed bin edges for [`AGE_BRACKETS`].
const AGE_BIN_EDGES: [i32; 7] = [18, 25, 35, 45, 55, 65, 100];

const DATE_SEPARATORS: [char; 3] = ['/', '-', '.'];
/// Day-first formats, picked by the digit count of the trailing year.
const FOUR_DIGIT_YEAR_FORMATS: [&str; 3] = ["%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y"];
const TWO_DIGIT_YEAR_FORMATS: [&str; 3] = ["%d/%m/%y", "%d-%m-%y", "%d.%m.%y"];
const ISO_FORMATS: [&str; 1] = ["%Y-%m-%d"];

/// Derived working table plus everything learned while building it.
#[derive(Debug, Clone)]
pub struct DerivedTable {
    pub df: DataFrame,
    pub columns: ColumnMap,
    pub warnings: Vec<String>,
}

/// Month name for a 1-based month number.
pub fn month_name(month: u32) -> Option<&'static str> {
    MONTHS_ES.get(month.checked_sub(1)? as usize).copied()
}

/// Parse a textual date with day-before-month precedence.
///
/// A trailing time part ("15/03/2024 00:00:00", "2024-03-15T08:00") is ignored.
/// Two-digit years ("15/03/24") follow chrono's `%y` pivot.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    let date_part = trimmed
        .split(|c: char| c == ' ' || c == 'T')
        .next()
        .unwrap_or(trimmed);

    // `%Y` accepts 1-4 digits, so the year token length picks the format set.
    let first = date_part.split(DATE_SEPARATORS).next().unwrap_or("");
    let last = date_part.rsplit(DATE_SEPARATORS).next().unwrap_or("");
    let formats: &[&str] = match (first.len(), last.len()) {
        (4, _) => &ISO_FORMATS,
        (_, 4) => &FOUR_DIGIT_YEAR_FORMATS,
        (_, 2) => &TWO_DIGIT_YEAR_FORMATS,
        _ => return None,
    };

    formats
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}

/// Whole years between `birth` and `today`.
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age
}

/// Bracket label for an age, from the right-closed bins (18,25], (25,35], ...
///
/// Ages of 18 or below, or at/above 100, have none.
pub fn age_bracket(age: i32) -> Option<&'static str> {
    AGE_BIN_EDGES
        .windows(2)
        .position(|edge| age > edge[0] && age <= edge[1] && age < 100)
        .map(|i| AGE_BRACKETS[i])
}

/// Handles derivation of computed columns.
pub struct FieldDeriver;

impl FieldDeriver {
    /// Build the derived table from a raw table without mutating it.
    pub fn derive(raw: &DataFrame, today: NaiveDate) -> DerivedTable {
        let columns = ColumnMap::resolve(raw);
        let mut df = raw.clone();
        let mut warnings = Vec::new();

        match columns.get(FieldRole::BirthDate) {
            Some(birth_col) => {
                let dates = Self::parse_column(raw, birth_col, &mut warnings);
                let ages: Vec<Option<i32>> = dates
                    .iter()
                    .map(|d| d.map(|d| age_on(d, today)))
                    .collect();
                let brackets: Vec<Option<&str>> = ages
                    .iter()
                    .map(|a| a.and_then(age_bracket))
                    .collect();
                let birth_months: Vec<Option<&str>> = dates
                    .iter()
                    .map(|d| d.and_then(|d| month_name(d.month())))
                    .collect();

                Self::add_column(&mut df, Column::new(AGE_COL.into(), ages), &mut warnings);
                Self::add_column(
                    &mut df,
                    Column::new(AGE_BRACKET_COL.into(), brackets),
                    &mut warnings,
                );
                Self::add_column(
                    &mut df,
                    Column::new(BIRTH_MONTH_COL.into(), birth_months),
                    &mut warnings,
                );
            }
            None => warnings.push(
                "No birth date column found; age fields are unavailable".to_string(),
            ),
        }

        match columns.get(FieldRole::HireDate) {
            Some(hire_col) => {
                let dates = Self::parse_column(raw, hire_col, &mut warnings);
                let years: Vec<Option<i32>> = dates.iter().map(|d| d.map(|d| d.year())).collect();
                let month_nums: Vec<Option<i32>> =
                    dates.iter().map(|d| d.map(|d| d.month() as i32)).collect();
                let month_names: Vec<Option<&str>> = dates
                    .iter()
                    .map(|d| d.and_then(|d| month_name(d.month())))
                    .collect();

                Self::add_column(&mut df, Column::new(HIRE_YEAR_COL.into(), years), &mut warnings);
                Self::add_column(
                    &mut df,
                    Column::new(HIRE_MONTH_NUM_COL.into(), month_nums),
                    &mut warnings,
                );
                Self::add_column(
                    &mut df,
                    Column::new(HIRE_MONTH_COL.into(), month_names),
                    &mut warnings,
                );
            }
            None => warnings.push(
                "No hire date column found; hire year and month are unavailable".to_string(),
            ),
        }

        for warning in &warnings {
            log::warn!("{}", warning);
        }

        DerivedTable {
            df,
            columns,
            warnings,
        }
    }

    /// Parse every row of a date column; unparseable values become `None`.
    fn parse_column(
        df: &DataFrame,
        column: &str,
        warnings: &mut Vec<String>,
    ) -> Vec<Option<NaiveDate>> {
        let Some(values) = DataLoader::string_values(df, column) else {
            warnings.push(format!("Column '{}' could not be read as dates", column));
            return vec![None; df.height()];
        };

        let mut unparseable = 0usize;
        let dates = values
            .iter()
            .map(|v| {
                let raw = v.as_deref()?;
                let parsed = parse_date(raw);
                if parsed.is_none() {
                    unparseable += 1;
                }
                parsed
            })
            .collect();

        if unparseable > 0 {
            warnings.push(format!(
                "{} value(s) in '{}' are not valid dates and were left empty",
                unparseable, column
            ));
        }

        dates
    }

    fn add_column(df: &mut DataFrame, column: Column, warnings: &mut Vec<String>) {
        let name = column.name().to_string();
        if let Err(e) = df.with_column(column) {
            warnings.push(format!("Could not add derived column '{}': {}", name, e));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn str_at(df: &DataFrame, col: &str, i: usize) -> Option<String> {
        df.column(col)
            .unwrap()
            .str()
            .unwrap()
            .get(i)
            .map(str::to_string)
    }

    fn i32_at(df: &DataFrame, col: &str, i: usize) -> Option<i32> {
        df.column(col).unwrap().i32().unwrap().get(i)
    }

    #[test]
    fn age_accounts_for_birthday_not_yet_reached() {
        let birth = NaiveDate::from_ymd_opt(1990, 6, 16).unwrap();
        assert_eq!(age_on(birth, today()), 33);

        let birth = NaiveDate::from_ymd_opt(1990, 6, 15).unwrap();
        assert_eq!(age_on(birth, today()), 34);
    }

    #[test]
    fn bracket_boundaries() {
        assert_eq!(age_bracket(17), None);
        assert_eq!(age_bracket(18), None);
        assert_eq!(age_bracket(19), Some("18-25"));
        assert_eq!(age_bracket(25), Some("18-25"));
        assert_eq!(age_bracket(26), Some("26-35"));
        assert_eq!(age_bracket(35), Some("26-35"));
        assert_eq!(age_bracket(45), Some("36-45"));
        assert_eq!(age_bracket(55), Some("46-55"));
        assert_eq!(age_bracket(65), Some("56-65"));
        assert_eq!(age_bracket(66), Some("65+"));
        assert_eq!(age_bracket(99), Some("65+"));
        assert_eq!(age_bracket(100), None);
        assert_eq!(age_bracket(130), None);
        assert_eq!(age_bracket(-1), None);
    }

    #[test]
    fn every_bracket_is_a_known_label() {
        for age in -5..140 {
            if let Some(label) = age_bracket(age) {
                assert!(AGE_BRACKETS.contains(&label));
                assert!((19..100).contains(&age));
            } else {
                assert!(!(19..100).contains(&age));
            }
        }
    }

    #[test]
    fn parse_date_is_day_first() {
        assert_eq!(parse_date("02/03/2024"), NaiveDate::from_ymd_opt(2024, 3, 2));
        assert_eq!(parse_date("2024-03-02"), NaiveDate::from_ymd_opt(2024, 3, 2));
        assert_eq!(
            parse_date(" 15/03/2024 00:00:00 "),
            NaiveDate::from_ymd_opt(2024, 3, 15)
        );
        assert_eq!(parse_date("02/13/2024"), None);
        assert_eq!(parse_date("2024/03/15"), None);
        assert_eq!(parse_date("n/a"), None);
    }

    #[test]
    fn parse_date_expands_two_digit_years() {
        assert_eq!(parse_date("15/03/24"), NaiveDate::from_ymd_opt(2024, 3, 15));
        assert_eq!(parse_date("05.05.85"), NaiveDate::from_ymd_opt(1985, 5, 5));
        assert_eq!(parse_date("15-03-24"), NaiveDate::from_ymd_opt(2024, 3, 15));
        assert_eq!(parse_date("15/03/024"), None);
    }

    #[test]
    fn two_digit_hire_year_is_not_year_24() {
        let raw = df!("FECHA DE INGRESO (DD/MM/YYYY)" => &["15/03/24"]).unwrap();

        let derived = FieldDeriver::derive(&raw, today());

        assert_eq!(i32_at(&derived.df, HIRE_YEAR_COL, 0), Some(2024));
        assert_eq!(
            str_at(&derived.df, HIRE_MONTH_COL, 0).as_deref(),
            Some("Marzo")
        );
    }

    #[test]
    fn hire_fields_tolerate_invalid_dates() {
        let raw = df!(
            "FECHA DE INGRESO (DD/MM/YYYY)" => &["15/03/2024", "02/13/2024"]
        )
        .unwrap();

        let derived = FieldDeriver::derive(&raw, today());
        let df = &derived.df;

        assert_eq!(i32_at(df, HIRE_YEAR_COL, 0), Some(2024));
        assert_eq!(str_at(df, HIRE_MONTH_COL, 0).as_deref(), Some("Marzo"));
        assert_eq!(i32_at(df, HIRE_MONTH_NUM_COL, 0), Some(3));
        assert_eq!(i32_at(df, HIRE_YEAR_COL, 1), None);
        assert_eq!(str_at(df, HIRE_MONTH_COL, 1), None);
        assert!(derived.warnings.iter().any(|w| w.contains("not valid dates")));
    }

    #[test]
    fn age_and_bracket_are_null_together() {
        let raw = df!(
            "FECHA DE NACIMIENTO" => &[
                Some("16/06/1990"),
                Some("bad"),
                None,
                Some("01/01/2010"),
                Some("01/01/1900")
            ]
        )
        .unwrap();

        let derived = FieldDeriver::derive(&raw, today());
        let df = &derived.df;

        assert_eq!(i32_at(df, AGE_COL, 0), Some(33));
        assert_eq!(str_at(df, AGE_BRACKET_COL, 0).as_deref(), Some("26-35"));
        assert_eq!(str_at(df, BIRTH_MONTH_COL, 0).as_deref(), Some("Junio"));

        assert_eq!(i32_at(df, AGE_COL, 1), None);
        assert_eq!(str_at(df, AGE_BRACKET_COL, 1), None);
        assert_eq!(i32_at(df, AGE_COL, 2), None);
        assert_eq!(str_at(df, AGE_BRACKET_COL, 2), None);

        // Out-of-range ages keep their age but get no bracket.
        assert_eq!(i32_at(df, AGE_COL, 3), Some(14));
        assert_eq!(str_at(df, AGE_BRACKET_COL, 3), None);
        assert_eq!(i32_at(df, AGE_COL, 4), Some(124));
        assert_eq!(str_at(df, AGE_BRACKET_COL, 4), None);
    }

    #[test]
    fn missing_source_columns_are_not_fatal() {
        let raw = df!("UNIDAD DE NEGOCIO" => &["Ventas"]).unwrap();

        let derived = FieldDeriver::derive(&raw, today());

        assert_eq!(derived.df.width(), 1);
        assert!(derived.df.column(AGE_COL).is_err());
        assert!(derived.df.column(HIRE_YEAR_COL).is_err());
        assert_eq!(derived.warnings.len(), 2);
    }

    #[test]
    fn raw_table_is_untouched() {
        let raw = df!("FECHA DE INGRESO" => &["15/03/2024"]).unwrap();

        let derived = FieldDeriver::derive(&raw, today());

        assert_eq!(raw.width(), 1);
        assert_eq!(derived.df.width(), 4);
    }
}
