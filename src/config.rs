//! Constants shared by the CLI and the renderers.

/// Selector value that disables the class filter.
pub const ALL_SELECTOR: &str = "All";

/// Profile cards per grid row.
pub const CARDS_PER_ROW: usize = 4;

/// Environment variable pointing at a CSV dataset to use instead of the sample.
pub const DATA_ENV: &str = "STUDENT_DASHBOARD_DATA";

pub const DEFAULT_REPORT_PATH: &str = "report.md";
pub const DEFAULT_DASHBOARD_PATH: &str = "dashboard.html";
pub const DEFAULT_EXPORT_PATH: &str = "view.json";
pub const DEFAULT_SEED_PATH: &str = "students.csv";

/// Rendered in place of a metric that has no value for an empty selection.
pub const EMPTY_METRIC: &str = "n/a";
