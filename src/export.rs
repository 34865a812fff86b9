use serde::Serialize;
use serde_json::Value;

use crate::aggregate::round2;
use crate::models::{GradeCount, MonthlyAverage, ProfileCard, SubjectAverage};
use crate::session::Cycle;

#[derive(Debug, Serialize)]
struct ExportedKpis {
    count: usize,
    mean_average: Option<f64>,
    max_average: Option<f64>,
    top_student: Option<String>,
}

#[derive(Debug, Serialize)]
struct ExportedView<'c> {
    selector: &'c str,
    options: &'c [String],
    kpis: ExportedKpis,
    subject_averages: &'c [SubjectAverage],
    grade_counts: &'c [GradeCount],
    monthly_averages: &'c [MonthlyAverage],
    profiles: Vec<ProfileCard>,
}

/// Structured form of one cycle. Empty metrics serialize as `null`.
pub fn export_value(cycle: &Cycle<'_>) -> serde_json::Result<Value> {
    let kpis = &cycle.view.kpis;
    let exported = ExportedView {
        selector: cycle.selector.label(),
        options: cycle.options,
        kpis: ExportedKpis {
            count: kpis.count,
            mean_average: kpis.mean_average.map(round2),
            max_average: kpis.max_average.map(round2),
            top_student: kpis.top_student.map(|r| r.name.clone()),
        },
        subject_averages: &cycle.view.subject_averages,
        grade_counts: &cycle.view.grade_counts,
        monthly_averages: &cycle.view.monthly_averages,
        profiles: cycle.profile_cards(),
    };

    serde_json::to_value(exported)
}

pub fn export_json(cycle: &Cycle<'_>) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&export_value(cycle)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::sample_dataset;
    use crate::filter::ClassSelector;
    use crate::session::Session;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn exports_kpis_for_selection() {
        let records = sample_dataset();
        let mut session = Session::new(&records);
        let value = export_value(&session.select("10B".parse().unwrap())).unwrap();

        assert_eq!(value["selector"], json!("10B"));
        assert_eq!(value["kpis"]["count"], json!(3));
        assert_eq!(value["kpis"]["max_average"], json!(92.0));
        assert_eq!(value["kpis"]["top_student"], json!("Sneha"));
        assert_eq!(value["subject_averages"][0]["subject"], json!("Maths"));
        assert_eq!(
            value["grade_counts"],
            json!([{ "grade": "C", "count": 1 }, { "grade": "A", "count": 2 }])
        );
        assert_eq!(value["profiles"].as_array().map(Vec::len), Some(3));
    }

    #[test]
    fn empty_selection_exports_nulls() {
        let records = sample_dataset();
        let mut session = Session::new(&records);
        let cycle = session.select(ClassSelector::Class("none".to_string()));
        let value = export_value(&cycle).unwrap();

        assert_eq!(value["kpis"]["count"], json!(0));
        assert_eq!(value["kpis"]["mean_average"], Value::Null);
        assert_eq!(value["kpis"]["top_student"], Value::Null);
        assert_eq!(value["monthly_averages"], json!([]));
        assert_eq!(value["options"], json!(["All", "10A", "10B", "10C"]));
    }

    #[test]
    fn pretty_output_parses_back() {
        let records = sample_dataset();
        let session = Session::new(&records);
        let text = export_json(&session.current()).unwrap();
        let parsed: Value = serde_json::from_str(&text).unwrap();

        assert_eq!(parsed["kpis"]["count"], json!(8));
    }
}
