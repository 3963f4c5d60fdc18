//! HTML content extraction: strips boilerplate and returns readable text.
//!
//! Parses raw HTML, removes non-content elements (scripts, styles,
//! navigation), finds the main content area and returns a single line of
//! clean text suitable as grounding context for answer generation.

use scraper::{Html, Selector};

/// Default maximum characters kept from a page.
pub const DEFAULT_MAX_CHARS: usize = 5000;

/// Elements removed together with everything inside them.
const BOILERPLATE_TAGS: &[&str] = &[
    "script", "style", "nav", "header", "footer", "iframe", "aside", "noscript", "svg",
];

/// Content roots tried in order before falling back to `<body>`.
const CONTENT_SELECTORS: &[&str] = &["main", "article", "#content", ".content", "[role=\"main\"]"];

/// Extract readable text from raw HTML, keeping at most `max_chars` characters.
///
/// Returns an empty string when the page has no extractable text.
pub fn extract_text(html: &str, max_chars: usize) -> String {
    let cleaned_html = strip_boilerplate_tags(html);
    let document = Html::parse_document(&cleaned_html);

    let raw_text = extract_main_text(&document);
    let text = collapse_whitespace(&raw_text);
    truncate_chars(&text, max_chars)
}

/// Extract text from the main content area of the document.
///
/// Tries content-specific selectors in priority order, falling back to
/// `<body>` and finally the whole document.
fn extract_main_text(document: &Html) -> String {
    for selector_str in CONTENT_SELECTORS.iter().chain(std::iter::once(&"body")) {
        let Ok(selector) = Selector::parse(selector_str) else {
            continue;
        };
        if let Some(element) = document.select(&selector).next() {
            let text: String = element.text().collect::<Vec<_>>().join(" ");
            if !text.trim().is_empty() {
                return text;
            }
        }
    }

    document.root_element().text().collect::<Vec<_>>().join(" ")
}

/// Remove boilerplate HTML tags and their content before parsing.
fn strip_boilerplate_tags(html: &str) -> String {
    let mut result = html.to_owned();
    for tag in BOILERPLATE_TAGS {
        result = strip_tag(&result, tag);
    }
    result
}

/// Remove all instances of a specific HTML tag and its content.
fn strip_tag(html: &str, tag: &str) -> String {
    let mut result = String::with_capacity(html.len());
    // ASCII lowercasing keeps byte offsets aligned with `html`.
    let lower = html.to_ascii_lowercase();
    let open_tag = format!("<{tag}");
    let close_tag = format!("</{tag}>");

    let mut pos = 0;
    loop {
        let start = match lower[pos..].find(&open_tag) {
            Some(offset) => pos + offset,
            None => {
                result.push_str(&html[pos..]);
                break;
            }
        };

        // Reject prefixes of longer tag names (e.g. <navigate> for <nav>).
        let after_tag = start + open_tag.len();
        if after_tag < lower.len() {
            let next_byte = lower.as_bytes()[after_tag];
            if !matches!(next_byte, b' ' | b'>' | b'/' | b'\n' | b'\r' | b'\t') {
                result.push_str(&html[pos..after_tag]);
                pos = after_tag;
                continue;
            }
        }

        result.push_str(&html[pos..start]);

        let end = match lower[start..].find(&close_tag) {
            Some(offset) => start + offset + close_tag.len(),
            None => match lower[start..].find('>') {
                Some(offset) => start + offset + 1,
                None => html.len(),
            },
        };

        pos = end;
    }

    result
}

/// Collapse every run of whitespace into a single space and trim the ends.
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Keep at most `max_chars` characters of `text`.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => text[..byte_idx].to_owned(),
        None => text.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_content_from_article() {
        let html = r#"<html><body>
            <nav>Navigation stuff</nav>
            <article>Article content here</article>
            <footer>Footer stuff</footer>
        </body></html>"#;
        let text = extract_text(html, DEFAULT_MAX_CHARS);
        assert_eq!(text, "Article content here");
    }

    #[test]
    fn main_preferred_over_body() {
        let html = r#"<html><body>
            <div>Sidebar text</div>
            <main>Main content area</main>
        </body></html>"#;
        let text = extract_text(html, DEFAULT_MAX_CHARS);
        assert_eq!(text, "Main content area");
    }

    #[test]
    fn content_id_and_class_are_content_roots() {
        let by_id = r#"<html><body><p>Other</p><div id="content">By id</div></body></html>"#;
        assert_eq!(extract_text(by_id, DEFAULT_MAX_CHARS), "By id");

        let by_class = r#"<html><body><p>Other</p><div class="content">By class</div></body></html>"#;
        assert_eq!(extract_text(by_class, DEFAULT_MAX_CHARS), "By class");
    }

    #[test]
    fn fallback_to_body() {
        let html = "<html><body>Body content only</body></html>";
        assert_eq!(extract_text(html, DEFAULT_MAX_CHARS), "Body content only");
    }

    #[test]
    fn strip_script_and_style_tags() {
        let html = r#"<html><body>
            <p>Real content</p>
            <script>var x = 1; alert('hi');</script>
            <style>.foo { color: red; }</style>
        </body></html>"#;
        let text = extract_text(html, DEFAULT_MAX_CHARS);
        assert!(text.contains("Real content"));
        assert!(!text.contains("alert"));
        assert!(!text.contains("color: red"));
    }

    #[test]
    fn strip_nav_footer_header_aside() {
        let html = r#"<html><body>
            <header>Header content</header>
            <nav>Nav links</nav>
            <div>Body text</div>
            <aside>Sidebar stuff</aside>
            <footer>Footer info</footer>
        </body></html>"#;
        let text = extract_text(html, DEFAULT_MAX_CHARS);
        assert_eq!(text, "Body text");
    }

    #[test]
    fn uppercase_tags_are_stripped() {
        let html = "<html><body><SCRIPT>evil()</SCRIPT><p>Kept</p></body></html>";
        assert_eq!(extract_text(html, DEFAULT_MAX_CHARS), "Kept");
    }

    #[test]
    fn similar_tag_names_not_stripped() {
        let html = "<html><body><navigate>Keep this</navigate></body></html>";
        let text = extract_text(html, DEFAULT_MAX_CHARS);
        assert!(text.contains("Keep this"));
    }

    #[test]
    fn whitespace_collapsed_to_single_spaces() {
        let html = "<html><body><p>one\n\n\n   two\t\tthree</p></body></html>";
        assert_eq!(extract_text(html, DEFAULT_MAX_CHARS), "one two three");
    }

    #[test]
    fn text_truncated_to_exact_char_limit() {
        let body = "lorem ".repeat(5000);
        let html = format!("<html><body><p>{body}</p></body></html>");
        let text = extract_text(&html, 100);
        assert_eq!(text.chars().count(), 100);
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let text = "é".repeat(10);
        let truncated = truncate_chars(&text, 3);
        assert_eq!(truncated, "ééé");
        assert_eq!(truncate_chars("short", 100), "short");
    }

    #[test]
    fn only_scripts_and_styles_returns_empty() {
        let html = r#"<html>
            <head><style>body{color:red}</style></head>
            <body>
                <script>console.log('hello');</script>
            </body>
        </html>"#;
        assert!(extract_text(html, DEFAULT_MAX_CHARS).is_empty());
    }

    #[test]
    fn unclosed_script_drops_only_the_open_tag() {
        let html = "<html><body><script src=\"x.js\">Visible</body></html>";
        let text = extract_text(html, DEFAULT_MAX_CHARS);
        assert!(text.contains("Visible"));
    }
}
