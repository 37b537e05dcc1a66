//! Feature extraction over a captured page snapshot.
//!
//! [`extract`] is a pure function: it never touches the network or the
//! filesystem and always returns a complete [`FeatureRecord`]. The browser
//! side hands over the serialized document and the URL it ended up on.

pub mod dom;
pub mod record;
pub mod structural;
pub mod text;

pub use record::FeatureRecord;

use crate::config::TextHeuristics;
use chrono::Datelike;
use dom::DomQuery;
use scraper::{Html, Selector};
use structural::{flag, presence, ElementCounts, ExternalResources, HandlerCounts};
use url::Url;

/// Read-only view of a loaded page, as seen by the extractor.
pub struct PageSnapshot {
    document: Html,
    body_text: String,
    outer_html_len: usize,
    page_url: String,
    title: String,
}

impl PageSnapshot {
    /// Parse the serialized document of a page loaded at `page_url`.
    pub fn from_html(html: &str, page_url: &str) -> Self {
        let document = Html::parse_document(html);
        let body_text = first_text(&document, "body");
        let title = first_text(&document, "title");
        Self {
            document,
            body_text,
            outer_html_len: html.chars().count(),
            page_url: page_url.to_string(),
            title,
        }
    }

    pub fn document(&self) -> &Html {
        &self.document
    }

    /// Whitespace-collapsed text content of `<body>`.
    pub fn body_text(&self) -> &str {
        &self.body_text
    }

    pub fn outer_html_len(&self) -> usize {
        self.outer_html_len
    }

    pub fn page_url(&self) -> &str {
        &self.page_url
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Hostname of the page URL, empty when it has none.
    pub fn hostname(&self) -> String {
        Url::parse(&self.page_url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_default()
    }
}

/// Whitespace-collapsed text of the first element matching `selector`.
fn first_text(doc: &Html, selector: &str) -> String {
    let Ok(sel) = Selector::parse(selector) else {
        return String::new();
    };
    doc.select(&sel)
        .next()
        .map(|el| text::normalize_whitespace(&el.text().collect::<String>()))
        .unwrap_or_default()
}

/// Inputs to the extractor that are not part of the page itself.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    pub heuristics: TextHeuristics,
    /// Year looked for by `has_copyright_year`.
    pub reference_year: i32,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            heuristics: TextHeuristics::default(),
            reference_year: chrono::Utc::now().year(),
        }
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// Compute the full feature record for a snapshot.
pub fn extract(snapshot: &PageSnapshot, options: &ExtractOptions) -> FeatureRecord {
    let dom = snapshot.document();
    let body = snapshot.body_text();
    let lower = body.to_lowercase();
    let body_len = body.chars().count();
    let page_url = Url::parse(snapshot.page_url()).ok();

    let counts = ElementCounts::collect(dom);
    let handlers = HandlerCounts::collect(dom);
    let external = ExternalResources::collect(dom, page_url.as_ref(), &snapshot.hostname());
    let total_elements = dom.element_count();

    let script_length: usize = dom.texts("script").iter().map(|s| s.chars().count()).sum();

    let segments = text::segment(body);
    let avg_words = segments.avg_words_per_sentence();

    let word_pieces = text::space_separated_len(body) as f64;
    let has_password = presence(dom, "input[type=\"password\"]");

    FeatureRecord {
        nb_forms: counts.forms,
        nb_inputs: counts.inputs,
        nb_buttons: counts.buttons,
        nb_selects: counts.selects,
        nb_textareas: counts.textareas,

        nb_imgs: counts.imgs,
        nb_embeds: counts.embeds,
        nb_audios: counts.audios,
        nb_videos: counts.videos,

        nb_scripts: counts.scripts,
        nb_a: counts.anchors,
        nb_links: counts.links,
        nb_iframes: counts.iframes,

        nb_divs: counts.divs,
        nb_spans: counts.spans,
        nb_paragraphs: counts.paragraphs,
        nb_headings: counts.headings,
        nb_tables: counts.tables,
        nb_table_rows: counts.table_rows,
        nb_table_cells: counts.table_cells,
        nb_ul_lists: counts.ul_lists,
        nb_ol_lists: counts.ol_lists,
        nb_list_items: counts.list_items,
        nb_strongs: counts.strongs,
        nb_ems: counts.ems,
        nb_canvas: counts.canvas,
        nb_svgs: counts.svgs,
        nb_metas: counts.metas,
        nb_styles: counts.styles,

        inner_text_len: body_len,
        body_length: body_len,
        script_length,
        is_empty_title: flag(snapshot.title().is_empty()),
        nb_special_char: text::special_char_count(body),

        elements_with_onclick: handlers.onclick,
        elements_with_onmouse: handlers.onmouse,
        elements_with_onload: handlers.onload,
        has_popup_window: flag(contains_any(&lower, &["prompt(", "alert(", "confirm("])),
        has_right_click: flag(contains_any(
            &lower,
            &["contextmenu", "event.button", "oncontextmenu"],
        )),

        nb_external_links: external.links,
        nb_external_scripts: external.scripts,
        nb_external_images: external.images,

        avg_sentence_len: avg_words,
        avg_words_per_sentence: avg_words,
        readability_score: text::flesch_reading_ease(body, &options.heuristics),

        txt_to_html_ratio: body_len as f64 / snapshot.outer_html_len().max(1) as f64,
        txt_to_tag_ratio: if total_elements == 0 {
            0.0
        } else {
            body_len as f64 / total_elements as f64
        },
        link_density: counts.anchors as f64 / word_pieces,
        img_density: counts.imgs as f64 / word_pieces,

        nb_input_types: structural::input_type_count(dom),
        form_complexity: counts.form_complexity(),
        has_password_field: has_password,
        has_file_upload: presence(dom, "input[type=\"file\"]"),

        has_ssl: flag(contains_any(&lower, &["secure", "ssl", "encrypted"])),
        has_captcha: flag(
            lower.contains("captcha")
                || dom.count("[class*=\"captcha\"], [id*=\"captcha\"]") > 0,
        ),
        has_login_form: has_password,

        has_date_stamps: dom.count("time, [datetime]"),
        has_new_badges: dom.count("[class*=\"new\"], [class*=\"badge\"]"),
        has_copyright_year: flag(body.contains(&options.reference_year.to_string())),

        nb_social_media_links: structural::social_media_link_count(dom, page_url.as_ref()),
        has_social_sharing: presence(dom, "[class*=\"share\"], [class*=\"social\"]"),
        nb_social_buttons: dom.count("[class*=\"facebook\"], [class*=\"twitter\"], [class*=\"share\"]"),

        has_ad_keywords: text::ad_keyword_count(&lower),
        has_sus_ad_class: dom.count("[class*=\"ad\"], [class*=\"banner\"], [id*=\"ad\"]"),
        has_popup_ad: flag(contains_any(&lower, &["popup", "pop-up"])),

        has_comment_sections: presence(dom, "[class*=\"comment\"], [id*=\"comment\"]"),
        has_rating_system: presence(
            dom,
            "[class*=\"rating\"], [class*=\"star\"], [class*=\"review\"]",
        ),
        has_search_box: presence(dom, "input[type=\"search\"], [class*=\"search\"]"),

        has_view_port_meta: presence(dom, "meta[name=\"viewport\"]"),
        has_responsive_imgs: dom.count("img[srcset], picture"),
        has_mobile_css: flag(structural::has_mobile_css(dom, page_url.as_ref())),

        unique_words_ratio: text::unique_words_ratio(body),
        punctuation_density: text::punctuation_density(body),
        avg_paragraph_len: if counts.paragraphs > 0 {
            body_len as f64 / counts.paragraphs as f64
        } else {
            0.0
        },

        total_elements,
        title: snapshot.title().to_string(),
        url: snapshot.page_url().to_string(),
    }
}
