//! Stats module - Counting, cross-tabulation and descriptive statistics

mod aggregator;
mod summary;

pub use aggregator::{Aggregator, CategoryCounts, CategoryOrder, CrossTab};
pub use summary::{
    CategoricalSummary, ColumnSummary, NumericSummary, SummaryCalculator, SummaryKind,
};
