use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    #[serde(rename = "student")]
    pub name: String,
    pub class: String,
    pub maths: u8,
    pub science: u8,
    pub english: u8,
    pub grade: String,
    pub month: String,
    pub profile: String,
}

impl StudentRecord {
    /// Mean of the three subject scores. Always derived, never stored.
    pub fn average(&self) -> f64 {
        Subject::ALL
            .iter()
            .map(|subject| self.score(*subject) as f64)
            .sum::<f64>()
            / Subject::ALL.len() as f64
    }

    pub fn score(&self, subject: Subject) -> u8 {
        match subject {
            Subject::Maths => self.maths,
            Subject::Science => self.science,
            Subject::English => self.english,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Subject {
    Maths,
    Science,
    English,
}

impl Subject {
    pub const ALL: [Subject; 3] = [Subject::Maths, Subject::Science, Subject::English];

    pub fn label(self) -> &'static str {
        match self {
            Subject::Maths => "Maths",
            Subject::Science => "Science",
            Subject::English => "English",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Kpis<'a> {
    pub count: usize,
    pub mean_average: Option<f64>,
    pub max_average: Option<f64>,
    pub top_student: Option<&'a StudentRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectAverage {
    pub subject: Subject,
    pub average: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeCount {
    pub grade: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyAverage {
    pub month: String,
    pub average: f64,
}

/// Everything derived from one filtered set. Rebuilt on every selection.
#[derive(Debug, Clone)]
pub struct DerivedView<'a> {
    pub kpis: Kpis<'a>,
    pub subject_averages: Vec<SubjectAverage>,
    pub grade_counts: Vec<GradeCount>,
    pub monthly_averages: Vec<MonthlyAverage>,
}

impl DerivedView<'_> {
    pub fn is_empty(&self) -> bool {
        self.kpis.count == 0
    }

    /// Share of the filtered set holding `count` records, in percent.
    pub fn share(&self, count: usize) -> f64 {
        if self.kpis.count == 0 {
            0.0
        } else {
            count as f64 / self.kpis.count as f64 * 100.0
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileCard {
    pub name: String,
    pub class: String,
    pub profile: String,
    pub average: f64,
}
