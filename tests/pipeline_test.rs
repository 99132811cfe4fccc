use chrono::NaiveDate;
use people_dashboard::charts::ChartPayload;
use people_dashboard::config::DashboardConfig;
use people_dashboard::dashboard::{Dashboard, Notice};
use people_dashboard::data::{export, redactor, DataLoader, FilterSelection, LoaderError};
use std::collections::BTreeSet;
use std::path::Path;

const FIXTURE: &str = "\
DNI,UNIDAD DE NEGOCIO,GENERO (F/M),PUESTO,pais,FECHA DE NACIMIENTO (DD/MM/YYYY),FECHA DE INGRESO (DD/MM/YYYY)
1001,Ventas,F,Analista,Chile,10/02/1990,15/03/2020
1002,Ventas,M,Analista,Chile,20/07/1980,01/01/2021
1003,TI,M,Desarrollador,Peru,05/05/2000,20/03/2020
1004,TI,F,Desarrollador,Chile,30/12/1960,10/08/2022
1005,RRHH,F,Analista,Peru,01/01/1995,02/02/2023
";

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
}

fn open_fixture(dir: &Path) -> Dashboard {
    let csv = dir.join("activos.csv");
    std::fs::write(&csv, FIXTURE).unwrap();
    let config = DashboardConfig {
        csv_path: csv,
        ..DashboardConfig::default()
    };
    Dashboard::open(config, today()).unwrap()
}

fn select(pairs: &[(&str, &[&str])]) -> FilterSelection {
    pairs
        .iter()
        .map(|(col, vals)| {
            let set: BTreeSet<String> = vals.iter().map(|v| v.to_string()).collect();
            (col.to_string(), set)
        })
        .collect()
}

#[test]
fn full_view_has_every_chart_and_no_identity_column() {
    let dir = tempfile::tempdir().unwrap();
    let dash = open_fixture(dir.path());

    let view = dash.view(&FilterSelection::new());

    assert_eq!(view.total_rows, 5);
    assert_eq!(view.table.height(), 5);
    assert_eq!(view.charts.len(), 9);
    assert!(view.charts.iter().all(|c| c.is_available()));
    assert!(view
        .table
        .get_column_names()
        .iter()
        .all(|name| !redactor::is_sensitive(name.as_str())));
    assert!(view.notices.contains(&Notice::Redacted(1)));
    assert!(!view.notices.contains(&Notice::AllFilteredOut));

    let ages = view.charts.iter().find(|c| c.id == "age_brackets").unwrap();
    match &ages.payload {
        ChartPayload::Counts(counts) => assert_eq!(counts.counts, vec![1, 2, 1, 0, 1, 0]),
        other => panic!("unexpected payload {:?}", other),
    }
}

#[test]
fn filter_options_follow_calendar_and_numeric_order() {
    let dir = tempfile::tempdir().unwrap();
    let dash = open_fixture(dir.path());

    let options = dash.options();

    assert_eq!(options.values("MES"), ["Enero", "Febrero", "Marzo", "Agosto"]);
    assert_eq!(options.values("AÑO"), ["2020", "2021", "2022", "2023"]);
    assert_eq!(options.values("UNIDAD DE NEGOCIO"), ["RRHH", "TI", "Ventas"]);
}

#[test]
fn selections_narrow_and_impossible_ones_fall_back() {
    let dir = tempfile::tempdir().unwrap();
    let dash = open_fixture(dir.path());

    let view = dash.view(&select(&[
        ("UNIDAD DE NEGOCIO", &["Ventas", "TI"]),
        ("GENERO (F/M)", &["F"]),
    ]));
    assert_eq!(view.matched_rows, 2);
    assert_eq!(view.table.height(), 2);

    let view = dash.view(&select(&[
        ("UNIDAD DE NEGOCIO", &["RRHH"]),
        ("GENERO (F/M)", &["M"]),
    ]));
    assert_eq!(view.matched_rows, 0);
    assert_eq!(view.table.height(), 5);
    assert!(view.notices.contains(&Notice::AllFilteredOut));
}

#[test]
fn export_writes_filtered_rows_without_identity_column() {
    let dir = tempfile::tempdir().unwrap();
    let dash = open_fixture(dir.path());
    let view = dash.view(&select(&[("pais", &["Peru"])]));
    let out = dir.path().join(export::SAFE_EXPORT_FILE_NAME);

    let rows = export::export_safe_csv(&view.table, &out).unwrap();
    let reloaded = DataLoader::load_csv(&out).unwrap();

    assert_eq!(rows, 2);
    assert_eq!(reloaded.height(), 2);
    assert!(reloaded.column("DNI").is_err());
    assert!(reloaded.column("RANGO_EDAD").is_ok());

    let session_out = dir.path().join("descarga.csv");
    let session_rows = dash
        .export_csv(&select(&[("pais", &["Peru"])]), &session_out)
        .unwrap();
    let text = std::fs::read_to_string(&session_out).unwrap();
    assert_eq!(session_rows, 2);
    assert!(!text.lines().next().unwrap().contains("DNI"));
}

#[test]
fn missing_file_is_reported_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let config = DashboardConfig {
        csv_path: dir.path().join("missing.csv"),
        ..DashboardConfig::default()
    };

    let result = Dashboard::open(config, today());

    assert!(matches!(result, Err(LoaderError::NotFound(_))));
}
