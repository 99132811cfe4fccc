//! People Analytics Dashboard - HR headcount reporting over a CSV export
//!
//! Loads a personnel CSV, derives age and hiring fields, filters rows by
//! user selection and aggregates the result into the dashboard charts.
//! Identity-document columns are removed from every table, chart and export.

pub mod charts;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod stats;
