//! Charts module - Chart catalog and rendering

mod catalog;
mod plotter;

pub use catalog::{
    dashboard_charts, ChartBuilder, ChartData, ChartKind, ChartPayload, ChartSource, ChartSpec,
    ColumnSource,
};
pub use plotter::ChartPlotter;
