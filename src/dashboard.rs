//! Self-contained HTML dashboard with inline SVG charts.
//!
//! Every chart is drawn from an already computed [`DerivedView`]; this module
//! does no aggregation of its own.

use std::path::Path;

use askama::Template;
use chrono::{DateTime, Local};
use log::{debug, info};
use plotters::coord::Shift;
use plotters::element::Pie;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::config::CARDS_PER_ROW;
use crate::error::RenderError;
use crate::models::{DerivedView, ProfileCard};
use crate::report::{format_metric, top_student_name};
use crate::session::Cycle;

const CHART_WIDTH: u32 = 440;
const CHART_HEIGHT: u32 = 280;
/// Headroom above 100 so value labels on top of full bars stay inside the plot.
const SCORE_AXIS_MAX: f64 = 110.0;
const PALETTE: [RGBColor; 6] = [
    RGBColor(0x63, 0x6e, 0xfa),
    RGBColor(0xef, 0x55, 0x3b),
    RGBColor(0x00, 0xcc, 0x96),
    RGBColor(0xab, 0x63, 0xfa),
    RGBColor(0xff, 0xa1, 0x5a),
    RGBColor(0x19, 0xd3, 0xf3),
];

struct SelectorOption {
    label: String,
    active: bool,
}

struct Kpi {
    label: &'static str,
    value: String,
}

/// `svg` is empty when the selection has nothing to plot.
struct ChartPanel {
    title: &'static str,
    svg: String,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardPage<'c> {
    selector: &'c str,
    options: Vec<SelectorOption>,
    kpis: Vec<Kpi>,
    charts: Vec<ChartPanel>,
    profiles: Vec<ProfileCard>,
    cards_per_row: usize,
    generated_at: String,
}

pub fn render_dashboard(
    cycle: &Cycle<'_>,
    generated_at: DateTime<Local>,
) -> Result<String, RenderError> {
    let view = &cycle.view;
    let selector = cycle.selector.label();

    let page = DashboardPage {
        selector,
        options: cycle
            .options
            .iter()
            .map(|option| SelectorOption {
                label: option.clone(),
                active: option == selector,
            })
            .collect(),
        kpis: vec![
            Kpi {
                label: "Total Students",
                value: view.kpis.count.to_string(),
            },
            Kpi {
                label: "Avg Score",
                value: format_metric(view.kpis.mean_average),
            },
            Kpi {
                label: "Top Score",
                value: format_metric(view.kpis.max_average),
            },
            Kpi {
                label: "Top Student",
                value: top_student_name(cycle),
            },
        ],
        charts: vec![
            ChartPanel {
                title: "Average Score by Subject",
                svg: subject_bar_chart(view)?.unwrap_or_default(),
            },
            ChartPanel {
                title: "Grade Distribution",
                svg: grade_donut_chart(view)?.unwrap_or_default(),
            },
            ChartPanel {
                title: "Monthly Performance Trend",
                svg: monthly_line_chart(view)?.unwrap_or_default(),
            },
        ],
        profiles: cycle.profile_cards(),
        cards_per_row: CARDS_PER_ROW,
        generated_at: generated_at.format("%Y-%m-%d %H:%M").to_string(),
    };

    Ok(page.render()?)
}

/// Draw onto an in-memory SVG canvas and return the markup.
fn render_svg<F>(draw: F) -> Result<String, RenderError>
where
    F: FnOnce(&DrawingArea<SVGBackend<'_>, Shift>) -> Result<(), RenderError>,
{
    let mut svg = String::new();
    {
        let root =
            SVGBackend::with_string(&mut svg, (CHART_WIDTH, CHART_HEIGHT)).into_drawing_area();
        root.fill(&WHITE)?;
        draw(&root)?;
        root.present()?;
    }
    Ok(svg)
}

fn value_label_style() -> TextStyle<'static> {
    TextStyle::from(("sans-serif", 13).into_font()).pos(Pos::new(HPos::Center, VPos::Bottom))
}

fn category_label(labels: &[String], value: &SegmentValue<i32>) -> String {
    match value {
        SegmentValue::CenterOf(i) => usize::try_from(*i)
            .ok()
            .and_then(|i| labels.get(i))
            .cloned()
            .unwrap_or_default(),
        _ => String::new(),
    }
}

fn subject_bar_chart(view: &DerivedView<'_>) -> Result<Option<String>, RenderError> {
    if view.subject_averages.is_empty() {
        return Ok(None);
    }

    let labels: Vec<String> = view
        .subject_averages
        .iter()
        .map(|s| s.subject.label().to_string())
        .collect();
    let slots = labels.len() as i32;

    let svg = render_svg(|root| {
        let mut chart = ChartBuilder::on(root)
            .margin(10)
            .x_label_area_size(30)
            .y_label_area_size(40)
            .build_cartesian_2d((0..slots).into_segmented(), 0f64..SCORE_AXIS_MAX)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(labels.len())
            .x_label_formatter(&|v| category_label(&labels, v))
            .y_desc("Average Score")
            .draw()?;

        chart.draw_series(view.subject_averages.iter().enumerate().map(|(i, subject)| {
            let i = i as i32;
            let mut bar = Rectangle::new(
                [
                    (SegmentValue::Exact(i), 0.0),
                    (SegmentValue::Exact(i + 1), subject.average),
                ],
                PALETTE[i as usize % PALETTE.len()].filled(),
            );
            bar.set_margin(0, 0, 14, 14);
            bar
        }))?;

        chart.draw_series(view.subject_averages.iter().enumerate().map(|(i, subject)| {
            Text::new(
                format!("{:.2}", subject.average),
                (SegmentValue::CenterOf(i as i32), subject.average),
                value_label_style(),
            )
        }))?;

        Ok(())
    })?;

    Ok(Some(svg))
}

fn grade_donut_chart(view: &DerivedView<'_>) -> Result<Option<String>, RenderError> {
    if view.grade_counts.is_empty() {
        return Ok(None);
    }

    let sizes: Vec<f64> = view.grade_counts.iter().map(|g| g.count as f64).collect();
    let colors: Vec<RGBColor> = (0..sizes.len())
        .map(|i| PALETTE[i % PALETTE.len()])
        .collect();
    let labels: Vec<String> = view
        .grade_counts
        .iter()
        .map(|g| format!("{} ({:.1}%)", g.grade, view.share(g.count)))
        .collect();

    let svg = render_svg(|root| {
        let center = (CHART_WIDTH as i32 / 2, CHART_HEIGHT as i32 / 2);
        let radius = f64::from(CHART_HEIGHT) * 0.32;

        let mut donut = Pie::new(&center, &radius, &sizes[..], &colors[..], &labels[..]);
        donut.start_angle(-90.0);
        donut.donut_hole(radius * 0.5);
        donut.label_style(("sans-serif", 13).into_font());
        root.draw(&donut)?;
        Ok(())
    })?;

    Ok(Some(svg))
}

fn monthly_line_chart(view: &DerivedView<'_>) -> Result<Option<String>, RenderError> {
    if view.monthly_averages.is_empty() {
        return Ok(None);
    }

    let labels: Vec<String> = view.monthly_averages.iter().map(|m| m.month.clone()).collect();
    let points: Vec<(SegmentValue<i32>, f64)> = view
        .monthly_averages
        .iter()
        .enumerate()
        .map(|(i, m)| (SegmentValue::CenterOf(i as i32), m.average))
        .collect();
    let slots = labels.len() as i32;
    let color = PALETTE[0];

    let svg = render_svg(|root| {
        let mut chart = ChartBuilder::on(root)
            .margin(10)
            .x_label_area_size(30)
            .y_label_area_size(40)
            .build_cartesian_2d((0..slots).into_segmented(), 0f64..SCORE_AXIS_MAX)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(labels.len())
            .x_label_formatter(&|v| category_label(&labels, v))
            .y_desc("Average")
            .draw()?;

        chart.draw_series(LineSeries::new(points.iter().cloned(), color.stroke_width(2)))?;
        chart.draw_series(
            points
                .iter()
                .map(|(x, y)| Circle::new((x.clone(), *y), 4, color.filled())),
        )?;
        chart.draw_series(points.iter().map(|(x, y)| {
            Text::new(format!("{:.2}", y), (x.clone(), *y + 2.0), value_label_style())
        }))?;

        Ok(())
    })?;

    Ok(Some(svg))
}

/// Write a rendered artifact, creating parent directories as needed.
pub fn write_output(path: &Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent)?;
        }
    }

    std::fs::write(path, contents)?;
    info!("Wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}
