//! Browser UI: a single page that drives the `/items` API.

pub mod presentation;

use axum::response::Html;

pub use presentation::{category_badge, presentation_table, priority_badge, Badge, Tone};

const INDEX_TEMPLATE: &str = include_str!("index.html");
const PRESENTATION_SLOT: &str = "/*PRESENTATION*/null";

/// Page HTML with the badge table filled in.
pub fn render_index() -> String {
    // `</` inside an inline script would end it early.
    let table = presentation_table().to_string().replace("</", "<\\/");
    INDEX_TEMPLATE.replacen(PRESENTATION_SLOT, &table, 1)
}

/// `GET /` handler.
pub async fn index() -> Html<String> {
    Html(render_index())
}
