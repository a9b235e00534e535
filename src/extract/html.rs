// src/extract/html.rs
// =============================================================================
// This module turns a fetched HTML page into the two things the crawler needs:
// the visible text of the page and the in-scope links to follow next.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever (Mozilla's HTML parser)
//
// We also use the `url` crate to:
// - Resolve relative links against the page URL
// - Compare origins (scheme + host + port) so we never leave the site
//
// Rust concepts:
// - Iterators: walking the DOM tree lazily
// - Pattern matching with guards: picking out text nodes and elements
// - HashSet: keeping the first occurrence of each link
// =============================================================================

use scraper::{Html, Node, Selector};
use std::collections::HashSet;
use url::Url;

// Elements whose contents are never visible text
const SKIPPED_ELEMENTS: [&str; 2] = ["script", "style"];

/// Visible text and same-origin links of one page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPage {
    /// Whitespace-normalized text of `<body>`
    pub text: String,
    /// Absolute URLs on the crawl origin, in document order, without duplicates
    pub links: Vec<String>,
}

// Parses a page once and extracts both text and links
//
// Parameters:
//   html: the page body
//   page_url: the URL the page was fetched from (for resolving relative links)
//   origin: the crawl origin; links elsewhere are dropped
pub fn parse_page(html: &str, page_url: &Url, origin: &Url) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        text: visible_text(&document),
        links: same_origin_links(&document, page_url, origin),
    }
}

// Collects the text of <body>, skipping anything inside <script> or <style>
//
// Adjacent text nodes are separated by a single space and every whitespace
// run collapses to one space, so the result has no leading/trailing blanks.
fn visible_text(document: &Html) -> String {
    // Constant selector, known to be valid
    let body_selector = Selector::parse("body").unwrap();

    let mut words: Vec<&str> = Vec::new();

    // html5ever always synthesizes a <body>, but fall back to the whole tree
    // rather than returning nothing if it is ever missing
    let root = match document.select(&body_selector).next() {
        Some(body) => *body,
        None => document.tree.root(),
    };

    for node in root.descendants() {
        if let Node::Text(text) = node.value() {
            let hidden = node.ancestors().any(|ancestor| {
                matches!(ancestor.value(), Node::Element(el) if SKIPPED_ELEMENTS.contains(&el.name()))
            });
            if !hidden {
                words.extend(text.split_whitespace());
            }
        }
    }

    words.join(" ")
}

// Extracts every <a href> that points at the crawl origin
fn same_origin_links(document: &Html, page_url: &Url, origin: &Url) -> Vec<String> {
    // Constant selector, known to be valid
    let selector = Selector::parse("a[href]").unwrap();

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        let Some(url) = resolve_link(page_url, href) else {
            continue;
        };

        if !is_same_origin(&url, origin) {
            continue;
        }

        let url = url.to_string();
        if seen.insert(url.clone()) {
            links.push(url);
        }
    }

    log::debug!("{} in-scope links on {}", links.len(), page_url);
    links
}

// Resolves a link (possibly relative) to an absolute URL without its fragment
//
// Returns None for anchors, special protocols and unparseable hrefs.
fn resolve_link(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();

    // Skip anchors and special protocols
    if href.is_empty()
        || href.starts_with('#')
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("javascript:")
        || href.starts_with("data:")
    {
        return None;
    }

    // join() handles absolute hrefs too: they simply replace the base
    let mut url = base.join(href).ok()?;
    url.set_fragment(None);
    Some(url)
}

/// True when `url` has the same scheme, host and port as `origin`.
pub fn is_same_origin(url: &Url, origin: &Url) -> bool {
    url.origin() == origin.origin()
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why walk descendants() instead of calling .text()?
//    - ElementRef::text() yields every text node, including JavaScript inside
//      <script> and CSS inside <style>
//    - Walking the tree lets us look at each text node's ancestors and drop
//      the hidden ones
//
// 2. What is url.origin()?
//    - The (scheme, host, port) triple of a URL
//    - Comparing origins instead of string prefixes means
//      "https://site.example.evil.test" is NOT treated as "https://site.example"
//
// 3. What does let-else do?
//    - `let Some(x) = expr else { continue; };` binds x or runs the else block
//    - It keeps the happy path unindented inside the loop
//
// 4. Why strip fragments?
//    - "/about#staff" and "/about" are the same document
//    - Without stripping, the crawler would fetch the page twice
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> Url {
        Url::parse("https://site.example").unwrap()
    }

    fn parse(html: &str) -> ParsedPage {
        parse_page(html, &origin(), &origin())
    }

    #[test]
    fn test_text_skips_script_and_style() {
        let page = parse(
            r#"<html><head><style>p { color: red; }</style></head>
               <body><p>Hello</p><script>var x = 1;</script><p>World</p></body></html>"#,
        );
        assert_eq!(page.text, "Hello World");
    }

    #[test]
    fn test_text_collapses_whitespace() {
        let page = parse("<body>\n\n   Admissions \t open\n\n for   2024  </body>");
        assert_eq!(page.text, "Admissions open for 2024");
    }

    #[test]
    fn test_empty_body_has_empty_text() {
        let page = parse("<html><body>   </body></html>");
        assert_eq!(page.text, "");
        assert!(page.links.is_empty());
    }

    #[test]
    fn test_resolve_relative_link() {
        let page = parse(r#"<a href="/about">About</a>"#);
        assert_eq!(page.links, vec!["https://site.example/about"]);
    }

    #[test]
    fn test_relative_link_resolves_against_page() {
        let page_url = Url::parse("https://site.example/courses/").unwrap();
        let page = parse_page(r#"<a href="mba">MBA</a>"#, &page_url, &origin());
        assert_eq!(page.links, vec!["https://site.example/courses/mba"]);
    }

    #[test]
    fn test_external_links_are_dropped() {
        let page = parse(
            r#"<a href="https://other.example/x">Other</a>
               <a href="https://site.example.evil.test/">Lookalike</a>
               <a href="http://site.example/plain">Other scheme</a>
               <a href="https://site.example/ok">Ok</a>"#,
        );
        assert_eq!(page.links, vec!["https://site.example/ok"]);
    }

    #[test]
    fn test_skip_special_hrefs() {
        let page = parse(
            r##"<a href="mailto:info@site.example">Mail</a>
                <a href="tel:+910000">Call</a>
                <a href="javascript:void(0)">Menu</a>
                <a href="#top">Top</a>"##,
        );
        assert!(page.links.is_empty());
    }

    #[test]
    fn test_fragments_stripped_and_deduplicated() {
        let page = parse(
            r##"<a href="/about#staff">Staff</a>
                <a href="/contact">Contact</a>
                <a href="/about">About</a>"##,
        );
        assert_eq!(
            page.links,
            vec!["https://site.example/about", "https://site.example/contact"]
        );
    }

    #[test]
    fn test_same_origin_ignores_path() {
        let a = Url::parse("https://site.example/a/b?c=d").unwrap();
        assert!(is_same_origin(&a, &origin()));
        let b = Url::parse("https://site.example:8443/").unwrap();
        assert!(!is_same_origin(&b, &origin()));
    }
}
