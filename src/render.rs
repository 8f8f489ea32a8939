#![cfg(feature = "web")]
//! HTML rendering of the dashboard
//!
//! The page is self-contained: charts are inlined as SVG and the tabs are
//! plain CSS, so the same markup works when served and when exported to a
//! file.

use crate::downloader::DownloadFile;
use crate::error::Result;
use crate::graph::{self, GraphOptions};
use crate::highlight::highlight_row;
use crate::loader::{CriteriaRow, DashboardData, ScoreRow};
use chrono::{DateTime, Local};
use std::path::{Component, Path, PathBuf};

/// Static text of the "Author Information" tab
#[derive(Clone, Debug, Default)]
pub struct InfoPanel {
    pub author: Option<String>,
    pub contacts: Vec<String>,
}

/// Everything a render needs: the immutable tables plus where they came from
#[derive(Clone, Debug)]
pub struct Dashboard {
    pub data: DashboardData,
    pub info: InfoPanel,
    pub source: PathBuf,
    pub loaded_at: DateTime<Local>,
    pub download_path: PathBuf,
}

impl Dashboard {
    pub fn new(data: DashboardData, source: PathBuf, download_path: PathBuf, info: InfoPanel) -> Self {
        Dashboard {
            data,
            info,
            source,
            loaded_at: Local::now(),
            download_path,
        }
    }

    /// Current state of the download file. Checked anew on each call.
    pub fn download(&self) -> DownloadFile {
        DownloadFile::locate(&self.download_path)
    }

    /// Render the full page; `download_href` is where the download button points
    pub fn render(&self, download_href: &str) -> String {
        let download = self.download();
        if !download.is_available() {
            log::warn!(
                "download file {} not found",
                self.download_path.display()
            );
        }
        render_dashboard(self, &download, download_href)
    }

    /// Write the page to `page` as a standalone file.
    ///
    /// The download button links to the download file relative to the
    /// directory the page lands in, so the pair can be opened from disk.
    ///
    /// # Errors
    /// * `Io` if the page cannot be written
    pub fn export(&self, page: impl AsRef<Path>) -> Result<()> {
        let page = page.as_ref();
        let page_dir = match page.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let href = relative_href(page_dir, &self.download_path);
        std::fs::write(page, self.render(&href))?;
        log::info!("dashboard written to {}", page.display());
        Ok(())
    }
}

/// Link from a page in `page_dir` to `target`, with `/` separators.
///
/// Falls back to the absolute target when the two share no root.
pub fn relative_href(page_dir: &Path, target: &Path) -> String {
    let (Ok(base), Ok(target)) = (std::path::absolute(page_dir), std::path::absolute(target)) else {
        return target.display().to_string();
    };
    let base: Vec<Component> = base.components().filter(|c| *c != Component::CurDir).collect();
    let target: Vec<Component> = target.components().filter(|c| *c != Component::CurDir).collect();

    let common = base.iter().zip(&target).take_while(|(a, b)| a == b).count();
    if common == 0 {
        return target
            .iter()
            .collect::<PathBuf>()
            .display()
            .to_string();
    }

    let ups = std::iter::repeat_n("..".to_string(), base.len() - common);
    let downs = target[common..]
        .iter()
        .map(|c| c.as_os_str().to_string_lossy().into_owned());
    ups.chain(downs).collect::<Vec<_>>().join("/")
}

const TABS: [&str; 5] = [
    "🏆 Scores",
    "⚠️ Unmet Criteria",
    "📊 Bar Chart",
    "📈 Radar Chart",
    "ℹ️ Author Information",
];

/// Render the five-tab dashboard page
pub fn render_dashboard(dashboard: &Dashboard, download: &DownloadFile, download_href: &str) -> String {
    let scores = &dashboard.data.scores;
    let panels = [
        section("EOR Method Scores", render_scores_table(scores)),
        section("Criteria Not Met", render_criteria_table(&dashboard.data.criteria)),
        section("Bar Chart - Scores by EOR Method", render_chart(scores, &GraphOptions::bar())),
        section("Radar Chart - Method Comparison", render_chart(scores, &GraphOptions::radar())),
        section("Author Information", render_info_panel(&dashboard.info, download, download_href)),
    ];

    let mut tabs = String::new();
    for (i, label) in TABS.iter().enumerate() {
        tabs.push_str(&format!(
            r#"<input type="radio" name="tab" id="tab{n}"{checked}><label for="tab{n}">{label}</label>"#,
            n = i + 1,
            checked = if i == 0 { " checked" } else { "" },
            label = html_escape(label),
        ));
    }
    for (i, panel) in panels.iter().enumerate() {
        tabs.push_str(&format!(
            r#"<div class="panel" id="panel{n}">{panel}</div>"#,
            n = i + 1
        ));
    }

    let author = dashboard
        .info
        .author
        .as_deref()
        .map(|a| format!(r#"<h6 class="author">Author: {}</h6>"#, html_escape(a)))
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>EOR Method Evaluation</title>
    <style>{css}</style>
</head>
<body>
    {author}
    <h1>EOR Method Evaluation</h1>
    <div class="tabs">{tabs}</div>
    <footer>Data from {source}, loaded {loaded_at}</footer>
</body>
</html>"#,
        css = inline_css(),
        author = author,
        tabs = tabs,
        source = html_escape(&dashboard.source.display().to_string()),
        loaded_at = dashboard.loaded_at.format("%Y-%m-%d %H:%M:%S"),
    )
}

fn section(title: &str, body: String) -> String {
    format!("<h3>{}</h3>\n{}", html_escape(title), body)
}

/// Score table with the validation highlight and one-decimal scores
pub fn render_scores_table(rows: &[ScoreRow]) -> String {
    let mut html = String::from(
        "<table>\n<thead><tr><th></th><th>EOR Method</th><th>Validation</th><th>Final Score</th></tr></thead>\n<tbody>\n",
    );
    for (i, row) in rows.iter().enumerate() {
        let styles = highlight_row(row);
        let cells = [
            html_escape(&row.method),
            row.validation.map(|v| v.to_string()).unwrap_or_default(),
            row.final_score.map(graph::score_label).unwrap_or_default(),
        ];
        html.push_str(&format!("<tr><th>{}</th>", i));
        for (cell, style) in cells.iter().zip(styles) {
            if style.css().is_empty() {
                html.push_str(&format!("<td>{}</td>", cell));
            } else {
                html.push_str(&format!(r#"<td style="{}">{}</td>"#, style.css(), cell));
            }
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody>\n</table>");
    html
}

/// Failing criteria as a plain table
pub fn render_criteria_table(rows: &[CriteriaRow]) -> String {
    let mut html = String::from(
        "<table>\n<thead><tr><th>EOR Method</th><th>Criterion</th><th>Value</th><th>Meets</th></tr></thead>\n<tbody>\n",
    );
    for row in rows {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            html_escape(&row.method.to_string()),
            html_escape(&row.criterion.to_string()),
            html_escape(&row.value.to_string()),
            html_escape(row.status),
        ));
    }
    html.push_str("</tbody>\n</table>");
    html
}

/// Inline SVG chart, or a notice when there is nothing to draw
pub fn render_chart(rows: &[ScoreRow], options: &GraphOptions) -> String {
    if !graph::has_plottable_scores(rows) {
        return notice("info", "No final scores to plot.");
    }
    match graph::create_graph(rows, options) {
        Ok(svg) => format!(r#"<div class="chart">{}</div>"#, svg),
        Err(e) => {
            log::error!("{}", e);
            notice("error", &format!("Chart could not be drawn: {}", e))
        }
    }
}

/// Author text plus the download button, or the not-found notice
pub fn render_info_panel(info: &InfoPanel, download: &DownloadFile, download_href: &str) -> String {
    let mut html = String::new();
    if let Some(author) = &info.author {
        html.push_str(&format!("<p>👨‍🏫 <strong>{}</strong></p>\n", html_escape(author)));
    }
    if !info.contacts.is_empty() {
        html.push_str("<p>📧 <strong>Contact:</strong></p>\n<ul>\n");
        for contact in &info.contacts {
            html.push_str(&format!("<li>{}</li>\n", html_escape(contact)));
        }
        html.push_str("</ul>\n");
    }

    match download {
        DownloadFile::Available { file_name, .. } => {
            html.push_str(&notice(
                "success",
                &format!("📄 File '{}' is ready for download.", file_name),
            ));
            html.push_str(&format!(
                r#"<a class="button" href="{href}" download="{name}">📥 Download {name}</a>"#,
                href = html_escape(download_href),
                name = html_escape(file_name),
            ));
        }
        DownloadFile::Missing { path } => {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            html.push_str(&notice(
                "error",
                &format!("⚠️ File '{}' was not found next to the dashboard.", name),
            ));
        }
    }
    html
}

fn notice(kind: &str, text: &str) -> String {
    format!(r#"<div class="notice {}">{}</div>"#, kind, html_escape(text))
}

fn inline_css() -> &'static str {
    r#"
body { font-family: Arial, sans-serif; font-size: 14px; margin: 24px 40px; color: #222; }
h6.author { text-align: left; color: gray; margin: 0; }
.tabs { display: flex; flex-wrap: wrap; }
.tabs > input { display: none; }
.tabs > label { padding: 8px 16px; cursor: pointer; border-bottom: 2px solid transparent; }
.tabs > input:checked + label { border-bottom-color: #e04040; color: #e04040; }
.panel { display: none; width: 100%; order: 1; padding-top: 12px; }
#tab1:checked ~ #panel1, #tab2:checked ~ #panel2, #tab3:checked ~ #panel3,
#tab4:checked ~ #panel4, #tab5:checked ~ #panel5 { display: block; }
table { border-collapse: collapse; }
th, td { border: 1px solid #ddd; padding: 4px 10px; text-align: left; }
.notice { padding: 10px 14px; border-radius: 4px; margin: 8px 0; }
.notice.success { background: #e6f4ea; color: #1e6b34; }
.notice.error { background: #fdecea; color: #8a1c1c; }
.notice.info { background: #e8f0fe; color: #1a3f8a; }
a.button { display: inline-block; padding: 8px 14px; border: 1px solid #ccc; border-radius: 4px; text-decoration: none; color: #222; }
footer { margin-top: 32px; color: gray; font-size: 12px; }
"#
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
