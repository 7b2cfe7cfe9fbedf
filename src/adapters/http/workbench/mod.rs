//! HTTP adapter for the server-rendered workbench.

mod handlers;
mod page;
mod routes;

pub use handlers::{AnalyzeForm, InsightForm};
pub use page::{presentation_html, render_page, WorkbenchAction};
pub use routes::workbench_routes;
