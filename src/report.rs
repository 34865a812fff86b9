use std::fmt::Write;

use chrono::{DateTime, Local};

use crate::aggregate::round2;
use crate::config::{CARDS_PER_ROW, EMPTY_METRIC};
use crate::session::Cycle;

/// Metric value for display, or the placeholder when the selection is empty.
pub fn format_metric(value: Option<f64>) -> String {
    match value {
        Some(value) => format!("{:.2}", round2(value)),
        None => EMPTY_METRIC.to_string(),
    }
}

pub fn top_student_name(cycle: &Cycle<'_>) -> String {
    cycle
        .view
        .kpis
        .top_student
        .map(|r| r.name.clone())
        .unwrap_or_else(|| EMPTY_METRIC.to_string())
}

/// Plain-text rendering for the terminal.
pub fn render_summary(cycle: &Cycle<'_>) -> String {
    let view = &cycle.view;
    let mut output = String::new();

    let _ = writeln!(output, "Student Performance ({})", cycle.selector);
    let _ = writeln!(output, "  Total Students: {}", view.kpis.count);
    let _ = writeln!(
        output,
        "  Avg Score:      {}",
        format_metric(view.kpis.mean_average)
    );
    let _ = writeln!(
        output,
        "  Top Score:      {}",
        format_metric(view.kpis.max_average)
    );
    let _ = writeln!(output, "  Top Student:    {}", top_student_name(cycle));

    if view.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(output, "No students match this selection.");
        return output;
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "Average score by subject:");
    for subject in view.subject_averages.iter() {
        let _ = writeln!(
            output,
            "  {:<8} {:>6.2}",
            subject.subject.label(),
            subject.average
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "Grade distribution:");
    for grade in view.grade_counts.iter() {
        let _ = writeln!(
            output,
            "  {:<8} {:>3} ({:.1}%)",
            grade.grade,
            grade.count,
            view.share(grade.count)
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "Monthly trend:");
    for point in view.monthly_averages.iter() {
        let _ = writeln!(output, "  {:<8} {:>6.2}", point.month, point.average);
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "Profiles:");
    for row in cycle.profile_cards().chunks(CARDS_PER_ROW) {
        let cells: Vec<String> = row
            .iter()
            .map(|card| format!("{} [{}] {:.2}", card.name, card.class, card.average))
            .collect();
        let _ = writeln!(output, "  {}", cells.join(" | "));
    }

    output
}

/// Markdown report for one selection.
pub fn build_report(cycle: &Cycle<'_>, generated_at: DateTime<Local>) -> String {
    let view = &cycle.view;
    let mut output = String::new();

    let _ = writeln!(output, "# Student Performance Report");
    let _ = writeln!(
        output,
        "Generated for class {} on {}",
        cycle.selector,
        generated_at.format("%Y-%m-%d %H:%M")
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Key Metrics");
    let _ = writeln!(output, "- Total Students: {}", view.kpis.count);
    let _ = writeln!(output, "- Avg Score: {}", format_metric(view.kpis.mean_average));
    let _ = writeln!(output, "- Top Score: {}", format_metric(view.kpis.max_average));
    let _ = writeln!(output, "- Top Student: {}", top_student_name(cycle));

    let _ = writeln!(output);
    let _ = writeln!(output, "## Average Score by Subject");
    if view.subject_averages.is_empty() {
        let _ = writeln!(output, "No students match this selection.");
    } else {
        let _ = writeln!(output, "| Subject | Average Score |");
        let _ = writeln!(output, "| --- | ---: |");
        for subject in view.subject_averages.iter() {
            let _ = writeln!(
                output,
                "| {} | {:.2} |",
                subject.subject.label(),
                subject.average
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Grade Distribution");
    if view.grade_counts.is_empty() {
        let _ = writeln!(output, "No grades recorded for this selection.");
    } else {
        for grade in view.grade_counts.iter() {
            let _ = writeln!(
                output,
                "- {}: {} students ({:.1}%)",
                grade.grade,
                grade.count,
                view.share(grade.count)
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Monthly Performance Trend");
    if view.monthly_averages.is_empty() {
        let _ = writeln!(output, "No monthly data for this selection.");
    } else {
        for point in view.monthly_averages.iter() {
            let _ = writeln!(output, "- {}: {:.2}", point.month, point.average);
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Student Profiles");
    let cards = cycle.profile_cards();
    if cards.is_empty() {
        let _ = writeln!(output, "No students match this selection.");
    } else {
        for card in cards.iter() {
            let _ = writeln!(
                output,
                "- ![{}]({}) **{}** (Class {}) avg score {:.2}",
                card.name, card.profile, card.name, card.class, card.average
            );
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::sample_dataset;
    use crate::filter::ClassSelector;
    use crate::session::Session;

    #[test]
    fn metric_placeholder_for_empty_values() {
        assert_eq!(format_metric(None), "n/a");
        assert_eq!(format_metric(Some(78.3333)), "78.33");
        assert_eq!(format_metric(Some(92.0)), "92.00");
    }

    #[test]
    fn summary_lists_kpis_and_rows_of_four() {
        let records = sample_dataset();
        let session = Session::new(&records);
        let summary = render_summary(&session.current());

        assert!(summary.contains("Total Students: 8"));
        assert!(summary.contains("Top Student:    Sneha"));
        assert!(summary.contains("Top Score:      92.00"));
        let profile_rows: Vec<&str> = summary
            .lines()
            .skip_while(|line| *line != "Profiles:")
            .skip(1)
            .collect();
        assert_eq!(profile_rows.len(), 2);
        assert!(profile_rows[0].starts_with("  Amit [10A] 78.33"));
        assert_eq!(profile_rows[1].matches(" | ").count(), 3);
    }

    #[test]
    fn summary_handles_empty_selection() {
        let records = sample_dataset();
        let mut session = Session::new(&records);
        let summary = render_summary(&session.select(ClassSelector::Class("12X".to_string())));

        assert!(summary.contains("Total Students: 0"));
        assert!(summary.contains("Avg Score:      n/a"));
        assert!(summary.contains("Top Student:    n/a"));
        assert!(summary.contains("No students match this selection."));
    }

    #[test]
    fn report_sections_follow_selection() {
        let records = sample_dataset();
        let mut session = Session::new(&records);
        let report = build_report(&session.select("10B".parse().unwrap()), Local::now());

        assert!(report.starts_with("# Student Performance Report"));
        assert!(report.contains("Generated for class 10B"));
        assert!(report.contains("- Total Students: 3"));
        assert!(report.contains("- Top Student: Sneha"));
        assert!(report.contains("- Feb: "));
        assert!(report.contains("- Apr: "));
        assert!(!report.contains("- Jan: "));
        assert!(report.contains("**Sneha** (Class 10B) avg score 92.00"));
    }

    #[test]
    fn report_renders_placeholders_when_empty() {
        let records = sample_dataset();
        let mut session = Session::new(&records);
        let cycle = session.select(ClassSelector::Class("none".to_string()));
        let report = build_report(&cycle, Local::now());

        assert!(report.contains("- Avg Score: n/a"));
        assert!(report.contains("No grades recorded for this selection."));
        assert!(report.contains("No monthly data for this selection."));
    }
}
