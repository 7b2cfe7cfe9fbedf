//! Server-rendered workbench page.
//!
//! Renders a `UiController` snapshot as a full HTML document. Every piece of
//! model or user text goes through `html_escape`.

use crate::application::{Notice, UiController};
use crate::domain::transcript::{Presentation, RenderedInsight, RenderedSection};

/// Shown when the analyze action ran but produced no sections.
pub const NO_ANALYSIS_TEXT: &str = "분석 결과를 불러올 수 없습니다.";

/// Shown when the insight action ran but produced no insights.
pub const NO_INSIGHT_TEXT: &str = "인사이트 결과가 없습니다.";

/// The action a request just ran, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkbenchAction {
    Analyze,
    Insight,
}

/// Renders the whole workbench document.
pub fn render_page(
    controller: &UiController,
    notices: &[Notice],
    ran: Option<WorkbenchAction>,
) -> String {
    let mut body = String::new();

    for notice in notices {
        body.push_str(&format!(
            "<div class=\"notice\" role=\"alert\">{}</div>\n",
            html_escape(&notice.message)
        ));
    }

    body.push_str(&render_form(controller));

    body.push_str("<section id=\"analysis\">\n<h1>분석 결과</h1>\n");
    match controller.rendered_analysis() {
        Some(sections) => {
            for section in &sections {
                body.push_str(&render_section(section));
            }
        }
        None if ran == Some(WorkbenchAction::Analyze) => {
            body.push_str(&format!("<p class=\"empty\">{}</p>\n", NO_ANALYSIS_TEXT));
        }
        None => {}
    }
    body.push_str("</section>\n");

    body.push_str("<section id=\"insights\">\n<h1>인사이트</h1>\n");
    match controller.rendered_insights() {
        Some(insights) => {
            for insight in &insights {
                body.push_str(&render_insight(insight));
            }
        }
        None if ran == Some(WorkbenchAction::Insight) => {
            body.push_str(&format!("<p class=\"empty\">{}</p>\n", NO_INSIGHT_TEXT));
        }
        None => {}
    }
    body.push_str("</section>\n");

    wrap_html(&body)
}

fn render_form(controller: &UiController) -> String {
    let analysis_json = controller
        .analysis()
        .and_then(|sections| serde_json::to_string(sections).ok())
        .unwrap_or_default();

    format!(
        r#"<form method="post" action="/workbench/analyze">
<textarea name="text" rows="12" oninput="document.getElementById('analyze').disabled = !this.value;">
{input}</textarea>
<input type="hidden" name="analyzed_text" value="{input_attr}">
<input type="hidden" name="analysis" value="{analysis}">
<div class="actions">
<button id="analyze" type="submit"{analyze_disabled}>분석하기</button>
<button id="insight" type="submit" formaction="/workbench/insight"{insight_disabled}>인사이트 보기</button>
</div>
</form>
"#,
        input = html_escape(controller.input()),
        input_attr = html_escape(controller.input()),
        analysis = html_escape(&analysis_json),
        analyze_disabled = disabled_attr(!controller.can_analyze()),
        insight_disabled = disabled_attr(!controller.can_get_insight()),
    )
}

fn disabled_attr(disabled: bool) -> &'static str {
    if disabled {
        " disabled"
    } else {
        ""
    }
}

fn render_section(section: &RenderedSection) -> String {
    format!(
        "<article class=\"section\">\n<h2>{}</h2>\n{}</article>\n",
        html_escape(&section.title),
        presentation_html(&section.body)
    )
}

fn render_insight(insight: &RenderedInsight) -> String {
    format!(
        "<article class=\"insight\">\n<h3>{}</h3>\n<p class=\"text\">{}</p>\n</article>\n",
        html_escape(&insight.title),
        html_escape(&insight.body)
    )
}

/// Writes one presentation as an HTML fragment.
pub fn presentation_html(presentation: &Presentation) -> String {
    match presentation {
        Presentation::Table { columns, rows } => {
            let mut html = String::from("<table>\n<thead><tr>");
            for column in columns {
                html.push_str(&format!("<th>{}</th>", html_escape(column)));
            }
            html.push_str("</tr></thead>\n<tbody>\n");
            for row in rows {
                html.push_str("<tr>");
                for cell in row {
                    html.push_str(&format!("<td>{}</td>", html_escape(cell)));
                }
                html.push_str("</tr>\n");
            }
            html.push_str("</tbody>\n</table>\n");
            html
        }
        Presentation::List { items } => {
            let mut html = String::from("<ul>\n");
            for item in items {
                html.push_str(&format!("<li>{}</li>\n", html_escape(item)));
            }
            html.push_str("</ul>\n");
            html
        }
        Presentation::KeyValues { entries } => {
            let mut html = String::from("<ul class=\"key-values\">\n");
            for (key, value) in entries {
                html.push_str(&format!(
                    "<li><strong>{}</strong>: {}</li>\n",
                    html_escape(key),
                    html_escape(value)
                ));
            }
            html.push_str("</ul>\n");
            html
        }
        Presentation::Text { text } => format!("<p class=\"text\">{}</p>\n", html_escape(text)),
    }
}

fn wrap_html(body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="ko">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>수업 대화 분석</title>
    <style>
{css}
    </style>
</head>
<body>
{body}
</body>
</html>"#,
        css = PAGE_CSS,
        body = body
    )
}

/// Escape HTML special characters.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

const PAGE_CSS: &str = r#"
body {
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Noto Sans KR', sans-serif;
    line-height: 1.6;
    color: #1f2937;
    max-width: 960px;
    margin: 0 auto;
    padding: 2rem;
}

textarea {
    width: 100%;
    font-family: inherit;
}

.actions {
    margin: 0.75rem 0 2rem;
}

.notice {
    border: 1px solid #fca5a5;
    background: #fef2f2;
    padding: 0.75rem 1rem;
    margin-bottom: 1rem;
    white-space: pre-wrap;
}

table {
    border-collapse: collapse;
    width: 100%;
    margin: 0.5rem 0 1.5rem;
}

th, td {
    border: 1px solid #e5e7eb;
    padding: 0.4rem 0.6rem;
    text-align: left;
    vertical-align: top;
}

.text {
    white-space: pre-wrap;
}

.empty {
    color: #6b7280;
}
"#;
