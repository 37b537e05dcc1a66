//! DOM query capability used by the structural counters.
//!
//! The extractor only needs a handful of questions answered about a
//! document, so they are expressed as a trait. [`scraper::Html`] implements
//! it for parsed snapshots; tests can supply their own documents the same
//! way.

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

/// Read-only questions the feature counters ask of a document.
pub trait DomQuery {
    /// Number of elements matching a CSS selector. Invalid selectors count 0.
    fn count(&self, selector: &str) -> usize;

    /// Value of `attr` for every element matching `selector` that carries it.
    fn attr_values(&self, selector: &str, attr: &str) -> Vec<String>;

    /// Concatenated text content of every element matching `selector`.
    fn texts(&self, selector: &str) -> Vec<String>;

    /// Number of elements carrying at least one of `attrs`.
    fn count_with_any_attr(&self, attrs: &[&str]) -> usize;

    /// Total number of elements in the document.
    fn element_count(&self) -> usize;
}

fn parse_selector(selector: &str) -> Option<Selector> {
    match Selector::parse(selector) {
        Ok(sel) => Some(sel),
        Err(e) => {
            debug!("ignoring invalid selector {selector:?}: {e:?}");
            None
        }
    }
}

fn all_elements(doc: &Html) -> impl Iterator<Item = ElementRef<'_>> {
    doc.tree.nodes().filter_map(ElementRef::wrap)
}

impl DomQuery for Html {
    fn count(&self, selector: &str) -> usize {
        parse_selector(selector)
            .map(|sel| self.select(&sel).count())
            .unwrap_or(0)
    }

    fn attr_values(&self, selector: &str, attr: &str) -> Vec<String> {
        let Some(sel) = parse_selector(selector) else {
            return Vec::new();
        };
        self.select(&sel)
            .filter_map(|el| el.value().attr(attr))
            .map(str::to_string)
            .collect()
    }

    fn texts(&self, selector: &str) -> Vec<String> {
        let Some(sel) = parse_selector(selector) else {
            return Vec::new();
        };
        self.select(&sel).map(|el| el.text().collect()).collect()
    }

    fn count_with_any_attr(&self, attrs: &[&str]) -> usize {
        all_elements(self)
            .filter(|el| attrs.iter().any(|a| el.value().attr(a).is_some()))
            .count()
    }

    fn element_count(&self) -> usize {
        all_elements(self).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> Html {
        Html::parse_document(
            r#"<html><head><title>t</title></head><body>
            <div class="x" onclick="go()"><p>one</p><p>two</p></div>
            <a href="/a">a</a><a>b</a>
            <img src="i.png" onload="x()">
            </body></html>"#,
        )
    }

    #[test]
    fn test_count_and_invalid_selector() {
        let d = doc();
        assert_eq!(d.count("p"), 2);
        assert_eq!(d.count("h1, h2"), 0);
        assert_eq!(d.count("p[[["), 0);
    }

    #[test]
    fn test_attr_values_skips_missing() {
        let d = doc();
        assert_eq!(d.attr_values("a", "href"), vec!["/a".to_string()]);
    }

    #[test]
    fn test_texts() {
        let d = doc();
        assert_eq!(d.texts("p"), vec!["one".to_string(), "two".to_string()]);
    }

    #[test]
    fn test_attribute_scan() {
        let d = doc();
        assert_eq!(d.count_with_any_attr(&["onclick"]), 1);
        assert_eq!(d.count_with_any_attr(&["onclick", "onload"]), 2);
        assert_eq!(d.count_with_any_attr(&["onmouseover"]), 0);
    }

    #[test]
    fn test_element_count_includes_implied_elements() {
        let d = Html::parse_document("<p>hi</p>");
        // html, head, body, p
        assert_eq!(d.element_count(), 4);
    }
}
