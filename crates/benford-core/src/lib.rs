pub mod audit;
pub mod config;
pub mod digits;
pub mod error;
pub mod report;
pub mod sample;
pub mod statistics;
pub mod tables;
pub mod types;

#[cfg(feature = "synthetic")]
pub mod synthetic;

pub use audit::*;
pub use config::{AnalysisConfig, BenfordInput};
pub use error::BenfordError;
pub use report::{DigitPlotSeries, PlotSink, ReportSink, SessionSummary, TracingReporter};
pub use sample::{ColumnData, Number, Sample, Tabular};
pub use statistics::{HighZ, TestResult};
pub use tables::{CriticalTables, MadConformity, MadThresholds};
pub use types::*;

/// Standard result type for all Benford operations
pub type BenfordResult<T> = Result<T, BenfordError>;
