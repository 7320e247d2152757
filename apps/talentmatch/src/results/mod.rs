// Everything derived from a successful scan: ranking, summary metrics,
// per-row disclosure state and export. None of it feeds back into the scan.

pub mod expansion;
pub mod export;
pub mod metrics;
pub mod ranking;

pub use expansion::{RowExpansionState, COLLAPSED_SKILL_LIMIT};
pub use export::{to_delimited_text, write_report, DEFAULT_REPORT_NAME};
pub use metrics::{compute_metrics, AggregateMetrics};
pub use ranking::{rank, ResultSet, RowKey, TopN};
