//! Static control panel page.
//!
//! A single HTML page with an embedded polling script; all state lives in
//! the browser and on the server, never here.

/// The panel page, served verbatim at `/`.
pub const INDEX_HTML: &str = include_str!("../assets/index.html");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_polls_the_status_endpoint() {
        assert!(INDEX_HTML.contains("fetch('/status')"));
        assert!(INDEX_HTML.contains("fetch('/engine-info')"));
        assert!(INDEX_HTML.contains("setInterval"));
    }
}
