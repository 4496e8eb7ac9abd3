//! Reports page: summary cards, doctors-per-specialty bar chart, status pie,
//! and PDF export of what was last shown.

use axum::extract::State;
use axum::http::header;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use serde::Deserialize;

use crate::config;
use crate::db;
use crate::models::ThemeMode;
use crate::reports::region::{
    integer_axis, ACTIVE_CHIP, ACTIVE_COLOR, BAR_COLOR, SUSPENDED_CHIP, SUSPENDED_CHIP_TEXT,
    SUSPENDED_COLOR,
};
use crate::reports::{compute_stats, export_region_to_pdf, AggregateStats, ReportRegion};
use crate::web::error::WebError;
use crate::web::pages::layout::{escape, render_page, Nav};
use crate::web::types::WebContext;

const REPORTS_PATH: &str = "/reports";

/// Export button payload: the id of the snapshot this page was rendered from.
#[derive(Debug, Default, Deserialize)]
pub struct ExportForm {
    #[serde(default)]
    pub snapshot: String,
}

/// `GET /reports`: aggregate, render, and keep this page's region for export.
pub async fn show(State(ctx): State<WebContext>) -> Result<Html<String>, WebError> {
    let conn = ctx.core.open_db()?;
    let doctors = db::list_doctors(&conn)?;
    let specialties = db::list_specialties(&conn)?;
    let stats = compute_stats(&doctors, &specialties);
    let theme = ctx.core.theme();

    let body = render_region(&stats, theme);
    let snapshot = ctx.core.store_report(ReportRegion::new(stats, theme))?;
    let body = format!("{}\n{body}", export_form(&snapshot));
    Ok(Html(render_page(theme, Nav::Reports, "Reports", &body)))
}

/// `POST /reports/export`: download the region the submitting page showed as
/// a PDF. Redirects back when that page is unknown or has expired.
pub async fn export(
    State(ctx): State<WebContext>,
    Form(form): Form<ExportForm>,
) -> Result<Response, WebError> {
    let region = ctx.core.report(&form.snapshot)?;
    let exported = export_region_to_pdf(
        region.as_ref(),
        config::DEFAULT_REPORT_FILENAME,
        &ctx.core.exports_dir,
    )
    .await?;

    match exported {
        Some(report) => {
            let headers = [
                (header::CONTENT_TYPE, "application/pdf".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!(
                        "attachment; filename=\"{}\"",
                        config::DEFAULT_REPORT_FILENAME
                    ),
                ),
            ];
            Ok((headers, report.bytes).into_response())
        }
        None => Ok(Redirect::to(REPORTS_PATH).into_response()),
    }
}

fn export_form(snapshot: &str) -> String {
    format!(
        r#"<form method="post" action="{REPORTS_PATH}/export"><input type="hidden" name="snapshot" value="{}"><p><button type="submit">Export to PDF</button></p></form>"#,
        escape(snapshot)
    )
}

fn render_region(stats: &AggregateStats, theme: ThemeMode) -> String {
    format!(
        r#"<section id="report-region">
<h2>Summary</h2>
<div class="cards">
  <div class="paper"><p class="muted">Total Doctors</p><p style="font-size:2.5rem;margin:0">{total}</p></div>
  <div class="paper"><p class="muted">Active</p><span class="chip" style="background:{ACTIVE_CHIP}">Active</span><p style="font-size:1.5rem;margin:.5rem 0 0">{active}</p></div>
  <div class="paper"><p class="muted">Suspended</p><span class="chip" style="background:{SUSPENDED_CHIP};color:{SUSPENDED_CHIP_TEXT}">Suspended</span><p style="font-size:1.5rem;margin:.5rem 0 0">{suspended}</p></div>
</div>
<h2>Doctors by Specialty</h2>
<div class="paper">{bar}</div>
<h2>Status Breakdown</h2>
<div class="paper">{pie}</div>
</section>"#,
        total = stats.total,
        active = stats.active,
        suspended = stats.suspended,
        bar = bar_chart_svg(stats, theme),
        pie = pie_chart_svg(stats, theme),
    )
}

const BAR_W: f64 = 800.0;
const BAR_H: f64 = 300.0;
const AXIS_LEFT: f64 = 50.0;
const AXIS_BOTTOM: f64 = 40.0;
const PLOT_TOP: f64 = 16.0;

fn bar_chart_svg(stats: &AggregateStats, theme: ThemeMode) -> String {
    let (axis_max, step) = integer_axis(stats.max_specialty_count());
    let plot_bottom = BAR_H - AXIS_BOTTOM;
    let plot_h = plot_bottom - PLOT_TOP;
    let plot_w = BAR_W - AXIS_LEFT - 16.0;
    let text = theme.text();
    let y_of = |v: u32| plot_bottom - f64::from(v) / f64::from(axis_max) * plot_h;

    let mut out = format!(
        r#"<svg viewBox="0 0 {BAR_W} {BAR_H}" width="100%" role="img" aria-label="Doctors by specialty">"#
    );

    let mut tick = 0;
    while tick <= axis_max {
        let y = y_of(tick);
        out.push_str(&format!(
            r##"<line x1="{AXIS_LEFT}" y1="{y:.1}" x2="{x2:.1}" y2="{y:.1}" stroke="#bdbdbd" stroke-dasharray="3 3"/><text x="{tx}" y="{ty:.1}" text-anchor="end" font-size="12" fill="{text}">{tick}</text>"##,
            x2 = AXIS_LEFT + plot_w,
            tx = AXIS_LEFT - 8.0,
            ty = y + 4.0,
        ));
        tick += step;
    }

    let bars = &stats.per_specialty;
    if !bars.is_empty() {
        let slot = plot_w / bars.len() as f64;
        let bar_w = slot * 0.6;
        for (i, bar) in bars.iter().enumerate() {
            let cx = AXIS_LEFT + slot * (i as f64 + 0.5);
            let top = y_of(bar.count);
            let name = escape(&bar.specialty_name);
            out.push_str(&format!(
                r#"<rect x="{x:.1}" y="{top:.1}" width="{bar_w:.1}" height="{h:.1}" fill="{BAR_COLOR}"><title>{name}: {count}</title></rect><text x="{cx:.1}" y="{ly:.1}" text-anchor="middle" font-size="12" fill="{text}">{name}</text>"#,
                x = cx - bar_w / 2.0,
                h = plot_bottom - top,
                count = bar.count,
                ly = plot_bottom + 18.0,
            ));
        }
    }

    out.push_str(&format!(
        r#"<line x1="{AXIS_LEFT}" y1="{plot_bottom}" x2="{x2}" y2="{plot_bottom}" stroke="{text}"/></svg>"#,
        x2 = AXIS_LEFT + plot_w,
    ));
    out
}

fn pie_chart_svg(stats: &AggregateStats, theme: ThemeMode) -> String {
    let (cx, cy, r) = (200.0_f64, 130.0_f64, 100.0_f64);
    let text = theme.text();
    let slices = [
        (stats.status_breakdown()[0], ACTIVE_COLOR),
        (stats.status_breakdown()[1], SUSPENDED_COLOR),
    ];
    let sum: u32 = slices.iter().map(|((_, v), _)| v).sum();

    let mut out = String::from(
        r#"<svg viewBox="0 0 400 300" width="400" role="img" aria-label="Status breakdown">"#,
    );

    if sum == 0 {
        out.push_str(&format!(
            r##"<circle cx="{cx}" cy="{cy}" r="{r}" fill="none" stroke="#bdbdbd"/>"##
        ));
    } else {
        let point = |a: f64| (cx + r * a.sin(), cy - r * a.cos());
        let mut start = 0.0_f64;
        for ((label, value), color) in slices {
            if value == 0 {
                continue;
            }
            let sweep = f64::from(value) / f64::from(sum) * std::f64::consts::TAU;
            if value == sum {
                out.push_str(&format!(
                    r#"<circle cx="{cx}" cy="{cy}" r="{r}" fill="{color}"><title>{label}: {value}</title></circle>"#
                ));
            } else {
                let (x0, y0) = point(start);
                let (x1, y1) = point(start + sweep);
                let large = u8::from(sweep > std::f64::consts::PI);
                out.push_str(&format!(
                    r#"<path d="M{cx},{cy} L{x0:.2},{y0:.2} A{r},{r} 0 {large} 1 {x1:.2},{y1:.2} Z" fill="{color}"><title>{label}: {value}</title></path>"#
                ));
            }
            let (lx, ly) = {
                let mid = start + sweep / 2.0;
                (cx + (r + 18.0) * mid.sin(), cy - (r + 18.0) * mid.cos())
            };
            out.push_str(&format!(
                r#"<text x="{lx:.1}" y="{ly:.1}" text-anchor="middle" font-size="12" fill="{text}">{value}</text>"#
            ));
            start += sweep;
        }
    }

    // Legend
    out.push_str(&format!(
        r#"<rect x="120" y="262" width="12" height="12" fill="{ACTIVE_COLOR}"/><text x="138" y="273" font-size="12" fill="{text}">Active</text><rect x="210" y="262" width="12" height="12" fill="{SUSPENDED_COLOR}"/><text x="228" y="273" font-size="12" fill="{text}">Suspended</text></svg>"#
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::SpecialtyCount;

    fn stats(active: u32, suspended: u32) -> AggregateStats {
        AggregateStats {
            total: active + suspended,
            active,
            suspended,
            per_specialty: vec![
                SpecialtyCount { specialty_name: "Cardiology".into(), count: active },
                SpecialtyCount { specialty_name: "Neuro & Spine".into(), count: suspended },
            ],
        }
    }

    #[test]
    fn bar_chart_has_one_bar_per_specialty() {
        let svg = bar_chart_svg(&stats(2, 1), ThemeMode::Light);
        assert_eq!(svg.matches("<rect").count(), 2);
        assert!(svg.contains("Neuro &amp; Spine"));
        assert!(svg.contains(r#"stroke-dasharray="3 3""#));
    }

    #[test]
    fn pie_uses_status_colours() {
        let svg = pie_chart_svg(&stats(2, 1), ThemeMode::Light);
        assert_eq!(svg.matches("<path").count(), 2);
        assert!(svg.contains(r##"fill="#1976d2""##));
        assert!(svg.contains(r##"fill="#f44336""##));
    }

    #[test]
    fn single_status_pie_is_a_full_circle() {
        let svg = pie_chart_svg(&stats(3, 0), ThemeMode::Light);
        assert_eq!(svg.matches("<path").count(), 0);
        assert!(svg.contains("<title>Active: 3</title>"));
    }

    #[test]
    fn empty_pie_draws_outline_only() {
        let svg = pie_chart_svg(&AggregateStats::default(), ThemeMode::Dark);
        assert!(svg.contains(r#"fill="none""#));
        assert!(!svg.contains("<path"));
    }

    #[test]
    fn region_shows_summary_counts() {
        let html = render_region(&stats(2, 1), ThemeMode::Light);
        assert!(html.contains("Total Doctors"));
        assert!(html.contains(">3</p>"));
    }

    #[test]
    fn status_cards_show_labelled_chip_above_count() {
        let html = render_region(&stats(2, 1), ThemeMode::Light);
        let active = html.find(">Active</span>").unwrap();
        assert!(html[active..].starts_with(">Active</span><p"));
        assert!(html[active..].contains(">2</p>"));
        let suspended = html.find(">Suspended</span>").unwrap();
        assert!(html[suspended..].starts_with(">Suspended</span><p"));
        assert!(!html.contains("#9c27b0"));
    }

    #[test]
    fn export_form_carries_snapshot_id() {
        let html = export_form("abc-123");
        assert!(html.contains(r#"name="snapshot" value="abc-123""#));
        assert!(html.contains("Export to PDF"));
    }
}
