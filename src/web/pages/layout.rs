//! Shared page chrome: sidebar navigation, theme palette and HTML helpers.

use crate::config;
use crate::models::{DoctorStatus, ThemeMode};
use crate::reports::region::{ACTIVE_CHIP, SUSPENDED_CHIP, SUSPENDED_CHIP_TEXT};

/// Sidebar entries, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nav {
    Dashboard,
    ViewDoctors,
    ManageDoctors,
    AddDoctor,
    Specialties,
    Reports,
    Users,
}

impl Nav {
    const ALL: [Nav; 7] = [
        Nav::Dashboard,
        Nav::ViewDoctors,
        Nav::ManageDoctors,
        Nav::AddDoctor,
        Nav::Specialties,
        Nav::Reports,
        Nav::Users,
    ];

    pub fn href(&self) -> &'static str {
        match self {
            Nav::Dashboard => "/",
            Nav::ViewDoctors => "/doctors",
            Nav::ManageDoctors => "/doctors/manage",
            Nav::AddDoctor => "/doctors/new",
            Nav::Specialties => "/specialties",
            Nav::Reports => "/reports",
            Nav::Users => "/users",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Nav::Dashboard => "Dashboard",
            Nav::ViewDoctors => "View Doctors",
            Nav::ManageDoctors => "Manage Doctors",
            Nav::AddDoctor => "Add Doctor",
            Nav::Specialties => "Specialties",
            Nav::Reports => "Reports",
            Nav::Users => "Manage Users",
        }
    }
}

/// Escape text for HTML element content and quoted attribute values.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Coloured chip for a doctor status. Unknown statuses render as a grey
/// `Unknown` chip.
pub fn status_chip(status: Option<DoctorStatus>) -> String {
    let (label, style) = match status {
        Some(DoctorStatus::Active) => {
            (DoctorStatus::Active.label(), format!("background:{ACTIVE_CHIP}"))
        }
        Some(DoctorStatus::Suspended) => (
            DoctorStatus::Suspended.label(),
            format!("background:{SUSPENDED_CHIP};color:{SUSPENDED_CHIP_TEXT}"),
        ),
        None => ("Unknown", "background:#757575".to_string()),
    };
    format!(r#"<span class="chip" style="{style}">{label}</span>"#)
}

/// Local redirect target from a form field. Anything that is not a plain
/// absolute path on this host falls back to `/`.
pub fn local_target(back: Option<&str>) -> &str {
    match back {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path
        }
        _ => "/",
    }
}

/// Wrap `body` in the full page: head, palette, sidebar and theme toggle.
pub fn render_page(theme: ThemeMode, active: Nav, title: &str, body: &str) -> String {
    let nav: String = Nav::ALL
        .iter()
        .map(|item| {
            let class = if *item == active { " class=\"active\"" } else { "" };
            format!(r#"<a href="{}"{class}>{}</a>"#, item.href(), item.label())
        })
        .collect::<Vec<_>>()
        .join("\n    ");

    let toggle_label = match theme {
        ThemeMode::Light => "Dark mode",
        ThemeMode::Dark => "Light mode",
    };
    let muted = match theme {
        ThemeMode::Light => "#616161",
        ThemeMode::Dark => "#bdbdbd",
    };
    let border = match theme {
        ThemeMode::Light => "#e0e0e0",
        ThemeMode::Dark => "#424242",
    };

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} · {app}</title>
<style>
*,*::before,*::after{{box-sizing:border-box}}
body{{margin:0;font-family:Roboto,Helvetica,Arial,sans-serif;background:{bg};color:{text};display:flex;min-height:100vh}}
nav{{width:220px;background:{paper};border-right:1px solid {border};padding:16px 0;display:flex;flex-direction:column}}
nav .brand{{font-weight:700;padding:8px 20px 16px}}
nav a{{color:{text};text-decoration:none;padding:10px 20px}}
nav a.active{{background:rgba(25,118,210,.12);color:#1976d2;font-weight:600}}
nav form{{margin-top:auto;padding:16px 20px}}
main{{flex:1;padding:32px}}
.paper{{background:{paper};border:1px solid {border};border-radius:8px;padding:20px;margin-bottom:24px}}
.cards{{display:grid;grid-template-columns:repeat(3,1fr);gap:24px;margin-bottom:24px}}
.muted{{color:{muted}}}
.chip{{display:inline-block;color:#fff;border-radius:16px;padding:2px 12px;font-size:.85rem}}
.chips a{{display:inline-block;border:1px solid #1976d2;border-radius:16px;padding:4px 12px;margin:0 8px 8px 0;color:#1976d2;text-decoration:none}}
.chips a.selected{{background:#1976d2;color:#fff}}
table{{width:100%;border-collapse:collapse}}
th,td{{text-align:left;padding:8px;border-bottom:1px solid {border};vertical-align:middle}}
input,select,textarea{{font:inherit;padding:6px 8px;border:1px solid {border};border-radius:4px;background:{paper};color:{text}}}
label{{display:block;margin:12px 0 4px}}
button,.button{{font:inherit;border:none;border-radius:4px;padding:6px 14px;background:#1976d2;color:#fff;cursor:pointer;text-decoration:none;display:inline-block}}
button.danger{{background:#d32f2f}}
button.secondary{{background:#757575}}
.inline{{display:inline}}
.error{{color:#d32f2f;font-weight:600}}
.avatar{{width:72px;height:72px;border-radius:50%;object-fit:cover;background:#1976d2;color:#fff;display:inline-flex;align-items:center;justify-content:center;font-size:2rem}}
</style>
</head>
<body>
<nav>
    <div class="brand">{app}</div>
    {nav}
    <form method="post" action="/theme/toggle">
      <input type="hidden" name="back" value="{back}">
      <button type="submit" class="secondary">{toggle_label}</button>
    </form>
</nav>
<main>
<h1>{title}</h1>
{body}
</main>
</body>
</html>"##,
        title = escape(title),
        app = config::APP_NAME,
        bg = theme.background(),
        paper = theme.paper(),
        text = theme.text(),
        back = active.href(),
    )
}
