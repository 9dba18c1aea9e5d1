//! Browser UI: page, stylesheet, logo and answer rendering

use axum::{
    extract::State,
    http::header,
    response::{Html, IntoResponse},
};
use pulldown_cmark::{html, Event, Options, Parser};

use crate::error::Result;
use crate::server::state::AppState;

const INDEX_HTML: &str = include_str!("../../assets/index.html");
const STYLES_CSS: &str = include_str!("../../assets/styles.css");

/// Render an answer to HTML.
///
/// Raw HTML in the model output is escaped rather than passed through.
pub fn render_markdown(text: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(text, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });

    let mut out = String::with_capacity(text.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// GET / - the question page
pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(INDEX_HTML.replace("{{AGENT_NAME}}", state.service().agent_name()))
}

/// GET /assets/styles.css
pub async fn styles() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], STYLES_CSS)
}

/// GET /assets/logo.png
pub async fn logo(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let bytes = tokio::fs::read(&state.config().export.logo_path).await?;
    Ok(([(header::CONTENT_TYPE, "image/png")], bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markdown_rendering() {
        let html =
            render_markdown("**Rate:** USD 210\n\n| Room | HB |\n|---|---|\n| Deluxe | 210 |");
        assert!(html.contains("<strong>Rate:</strong>"));
        assert!(html.contains("<table>"));
    }

    #[test]
    fn test_raw_html_is_escaped() {
        let html = render_markdown("<script>alert(1)</script>");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_page_has_controls() {
        for marker in [
            "{{AGENT_NAME}}",
            "Ask Arabiers AI",
            "Download PDF Quotation",
            "Clear History",
        ] {
            assert!(INDEX_HTML.contains(marker), "missing {}", marker);
        }
    }
}
