use plotters::drawing::DrawingAreaErrorKind;
use thiserror::Error;

/// Failures while loading or writing a student dataset.
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("{student} has a {subject} score of {score}, expected 0-100")]
    ScoreOutOfRange {
        student: String,
        subject: &'static str,
        score: u8,
    },

    #[error("{student} is in class \"{class}\", which is reserved for the unfiltered view")]
    ReservedClass { student: String, class: String },

    #[error("dataset contains no students")]
    Empty,
}

/// Failures while drawing charts or filling the dashboard page.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("chart drawing failed: {0}")]
    Chart(String),

    #[error("template rendering failed: {0}")]
    Template(#[from] askama::Error),
}

impl<E> From<DrawingAreaErrorKind<E>> for RenderError
where
    E: std::error::Error + Send + Sync,
{
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        RenderError::Chart(err.to_string())
    }
}
