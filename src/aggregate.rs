use indexmap::IndexMap;
use log::debug;

use crate::models::{
    DerivedView, GradeCount, Kpis, MonthlyAverage, StudentRecord, Subject, SubjectAverage,
};

/// Compute every dashboard aggregate for one filtered set.
///
/// Pure and total: an empty input yields an empty view with `None` metrics.
pub fn aggregate<'a>(records: &[&'a StudentRecord]) -> DerivedView<'a> {
    let averages: Vec<f64> = records.iter().map(|r| r.average()).collect();

    let view = DerivedView {
        kpis: kpis(records, &averages),
        subject_averages: subject_averages(records),
        grade_counts: grade_counts(records),
        monthly_averages: monthly_averages(records, &averages),
    };

    debug!(
        "Aggregated {} students into {} grades and {} months",
        view.kpis.count,
        view.grade_counts.len(),
        view.monthly_averages.len()
    );
    view
}

fn kpis<'a>(records: &[&'a StudentRecord], averages: &[f64]) -> Kpis<'a> {
    let mut top: Option<(&'a StudentRecord, f64)> = None;
    for (record, average) in records.iter().zip(averages.iter()) {
        // Strictly greater, so ties resolve to the earliest record.
        if top.map_or(true, |(_, best)| *average > best) {
            top = Some((*record, *average));
        }
    }

    Kpis {
        count: records.len(),
        mean_average: mean(averages.iter().copied()),
        max_average: top.map(|(_, best)| best),
        top_student: top.map(|(record, _)| record),
    }
}

fn subject_averages(records: &[&StudentRecord]) -> Vec<SubjectAverage> {
    if records.is_empty() {
        return Vec::new();
    }

    Subject::ALL
        .iter()
        .filter_map(|subject| {
            mean(records.iter().map(|r| r.score(*subject) as f64)).map(|average| {
                SubjectAverage {
                    subject: *subject,
                    average,
                }
            })
        })
        .collect()
}

fn grade_counts(records: &[&StudentRecord]) -> Vec<GradeCount> {
    group_first_seen(records.iter().map(|r| (r.grade.as_str(), ())))
        .into_iter()
        .map(|(grade, members)| GradeCount {
            grade: grade.to_string(),
            count: members.len(),
        })
        .collect()
}

fn monthly_averages(records: &[&StudentRecord], averages: &[f64]) -> Vec<MonthlyAverage> {
    group_first_seen(
        records
            .iter()
            .zip(averages.iter())
            .map(|(r, average)| (r.month.as_str(), *average)),
    )
    .into_iter()
    .filter_map(|(month, values)| {
        mean(values.into_iter()).map(|average| MonthlyAverage {
            month: month.to_string(),
            average,
        })
    })
    .collect()
}

/// Group values by key in one pass; groups iterate in the order keys first appear.
fn group_first_seen<'k, V>(
    items: impl Iterator<Item = (&'k str, V)>,
) -> IndexMap<&'k str, Vec<V>> {
    let mut groups: IndexMap<&'k str, Vec<V>> = IndexMap::new();
    for (key, value) in items {
        groups.entry(key).or_default().push(value);
    }
    groups
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Round to two decimals for display.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
