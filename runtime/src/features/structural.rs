//! Element counts, handler scans and resource-origin checks.

use super::dom::DomQuery;
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;
use url::Url;

/// Attributes that make up the `onmouse` handler group.
pub const MOUSE_HANDLER_ATTRS: &[&str] = &["onmouseover", "onmouseout", "onmousedown", "onmouseup"];

/// `type` values an `<input>` can actually take; anything else behaves as
/// `text`.
const INPUT_TYPES: &[&str] = &[
    "button",
    "checkbox",
    "color",
    "date",
    "datetime-local",
    "email",
    "file",
    "hidden",
    "image",
    "month",
    "number",
    "password",
    "radio",
    "range",
    "reset",
    "search",
    "submit",
    "tel",
    "text",
    "time",
    "url",
    "week",
];

/// Plain element-category counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ElementCounts {
    pub forms: usize,
    pub inputs: usize,
    pub buttons: usize,
    pub selects: usize,
    pub textareas: usize,
    pub imgs: usize,
    pub embeds: usize,
    pub audios: usize,
    pub videos: usize,
    pub scripts: usize,
    pub anchors: usize,
    pub links: usize,
    pub iframes: usize,
    pub divs: usize,
    pub spans: usize,
    pub paragraphs: usize,
    pub headings: usize,
    pub tables: usize,
    pub table_rows: usize,
    pub table_cells: usize,
    pub ul_lists: usize,
    pub ol_lists: usize,
    pub list_items: usize,
    pub strongs: usize,
    pub ems: usize,
    pub canvas: usize,
    pub svgs: usize,
    pub metas: usize,
    pub styles: usize,
}

impl ElementCounts {
    pub fn collect(dom: &impl DomQuery) -> Self {
        Self {
            forms: dom.count("form"),
            inputs: dom.count("input"),
            buttons: dom.count("button"),
            selects: dom.count("select"),
            textareas: dom.count("textarea"),
            imgs: dom.count("img"),
            embeds: dom.count("embed"),
            audios: dom.count("audio"),
            videos: dom.count("video"),
            scripts: dom.count("script"),
            anchors: dom.count("a"),
            links: dom.count("link"),
            iframes: dom.count("iframe"),
            divs: dom.count("div"),
            spans: dom.count("span"),
            paragraphs: dom.count("p"),
            headings: dom.count("h1, h2, h3, h4, h5, h6"),
            tables: dom.count("table"),
            table_rows: dom.count("tr"),
            table_cells: dom.count("td, th"),
            ul_lists: dom.count("ul"),
            ol_lists: dom.count("ol"),
            list_items: dom.count("li"),
            strongs: dom.count("strong"),
            ems: dom.count("em"),
            canvas: dom.count("canvas"),
            svgs: dom.count("svg"),
            metas: dom.count("meta"),
            styles: dom.count("style"),
        }
    }

    /// Inputs, selects and textareas per form, with the form count floored
    /// to 1.
    pub fn form_complexity(&self) -> f64 {
        (self.inputs + self.selects + self.textareas) as f64 / self.forms.max(1) as f64
    }
}

/// Elements carrying inline event-handler attributes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HandlerCounts {
    pub onclick: usize,
    pub onmouse: usize,
    pub onload: usize,
}

impl HandlerCounts {
    pub fn collect(dom: &impl DomQuery) -> Self {
        Self {
            onclick: dom.count_with_any_attr(&["onclick"]),
            onmouse: dom.count_with_any_attr(MOUSE_HANDLER_ATTRS),
            onload: dom.count_with_any_attr(&["onload"]),
        }
    }
}

/// Absolute resource URLs pointing away from the page's host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExternalResources {
    pub links: usize,
    pub scripts: usize,
    pub images: usize,
}

impl ExternalResources {
    /// Values are resolved against `page_url` first, so `href="http-guide/x"`
    /// is a relative link on the page host, not an external one.
    pub fn collect(dom: &impl DomQuery, page_url: Option<&Url>, hostname: &str) -> Self {
        let count = |selector: &str, attr: &str| {
            dom.attr_values(selector, attr)
                .iter()
                .filter(|v| is_external(&resolve_href(page_url, v), hostname))
                .count()
        };
        Self {
            links: count("a[href^=\"http\"]", "href"),
            scripts: count("script[src^=\"http\"]", "src"),
            images: count("img[src^=\"http\"]", "src"),
        }
    }
}

/// Whether a resolved resource URL counts as external to `hostname`.
///
/// This is a plain substring test: any URL that mentions the hostname
/// anywhere is treated as internal, so
/// `http://site.example.com.evil.com/` is internal to `site.example.com`.
pub fn is_external(resolved_url: &str, hostname: &str) -> bool {
    !resolved_url.contains(hostname)
}

/// Resolve an href against the page URL the way `element.href` does.
pub fn resolve_href(page_url: Option<&Url>, href: &str) -> String {
    let href = href.trim();
    page_url
        .and_then(|base| base.join(href).ok())
        .or_else(|| Url::parse(href).ok())
        .map(|u| u.to_string())
        .unwrap_or_else(|| href.to_string())
}

/// Anchors whose resolved href mentions a major social network.
pub fn social_media_link_count(dom: &impl DomQuery, page_url: Option<&Url>) -> usize {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"facebook|twitter|instagram|linkedin|youtube|tiktok")
            .expect("social network regex is valid")
    });

    dom.attr_values("a[href]", "href")
        .iter()
        .map(|href| resolve_href(page_url, href).to_lowercase())
        .filter(|href| re.is_match(href))
        .count()
}

/// Number of distinct effective `<input>` types.
pub fn input_type_count(dom: &impl DomQuery) -> usize {
    let total = dom.count("input");
    let typed = dom.attr_values("input[type]", "type");
    let mut types: HashSet<String> = typed
        .iter()
        .map(|t| {
            let t = t.trim().to_ascii_lowercase();
            if INPUT_TYPES.contains(&t.as_str()) {
                t
            } else {
                "text".to_string()
            }
        })
        .collect();
    if total > typed.len() {
        types.insert("text".to_string());
    }
    types.len()
}

/// Any `<style>` using media queries, or a stylesheet link naming "mobile".
pub fn has_mobile_css(dom: &impl DomQuery, page_url: Option<&Url>) -> bool {
    dom.texts("style").iter().any(|css| css.contains("@media"))
        || dom
            .attr_values("link[rel=\"stylesheet\"]", "href")
            .iter()
            .any(|href| resolve_href(page_url, href).contains("mobile"))
}

/// 0/1 flag from a boolean.
pub fn flag(value: bool) -> u8 {
    u8::from(value)
}

/// 0/1 flag for "at least one element matches".
pub fn presence(dom: &impl DomQuery, selector: &str) -> u8 {
    flag(dom.count(selector) > 0)
}
