//! The fixed-schema feature record.
//!
//! Field order is the serialized key order. Downstream consumers rely on
//! every key being present, so nothing here is optional.

use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FeatureRecord {
    // ── Forms and inputs ──
    pub nb_forms: usize,
    pub nb_inputs: usize,
    pub nb_buttons: usize,
    pub nb_selects: usize,
    pub nb_textareas: usize,

    // ── Media ──
    pub nb_imgs: usize,
    pub nb_embeds: usize,
    pub nb_audios: usize,
    pub nb_videos: usize,

    // ── Scripts and links ──
    pub nb_scripts: usize,
    pub nb_a: usize,
    pub nb_links: usize,
    pub nb_iframes: usize,

    // ── Structure ──
    pub nb_divs: usize,
    pub nb_spans: usize,
    pub nb_paragraphs: usize,
    pub nb_headings: usize,
    pub nb_tables: usize,
    pub nb_table_rows: usize,
    pub nb_table_cells: usize,
    pub nb_ul_lists: usize,
    pub nb_ol_lists: usize,
    pub nb_list_items: usize,
    pub nb_strongs: usize,
    pub nb_ems: usize,
    pub nb_canvas: usize,
    pub nb_svgs: usize,
    pub nb_metas: usize,
    pub nb_styles: usize,

    // ── Text content ──
    pub inner_text_len: usize,
    pub body_length: usize,
    pub script_length: usize,
    pub is_empty_title: u8,
    pub nb_special_char: usize,

    // ── Inline handlers and patterns ──
    pub elements_with_onclick: usize,
    pub elements_with_onmouse: usize,
    pub elements_with_onload: usize,
    pub has_popup_window: u8,
    pub has_right_click: u8,

    // ── External resources ──
    pub nb_external_links: usize,
    pub nb_external_scripts: usize,
    pub nb_external_images: usize,

    // ── Text quality ──
    pub avg_sentence_len: f64,
    pub avg_words_per_sentence: f64,
    pub readability_score: f64,

    // ── Ratios ──
    pub txt_to_html_ratio: f64,
    pub txt_to_tag_ratio: f64,
    pub link_density: f64,
    pub img_density: f64,

    // ── Form complexity ──
    pub nb_input_types: usize,
    pub form_complexity: f64,
    pub has_password_field: u8,
    pub has_file_upload: u8,

    // ── Security ──
    pub has_ssl: u8,
    pub has_captcha: u8,
    pub has_login_form: u8,

    // ── Temporal ──
    pub has_date_stamps: usize,
    pub has_new_badges: usize,
    pub has_copyright_year: u8,

    // ── Social ──
    pub nb_social_media_links: usize,
    pub has_social_sharing: u8,
    pub nb_social_buttons: usize,

    // ── Ads ──
    pub has_ad_keywords: usize,
    pub has_sus_ad_class: usize,
    pub has_popup_ad: u8,

    // ── UX elements ──
    pub has_comment_sections: u8,
    pub has_rating_system: u8,
    pub has_search_box: u8,

    // ── Responsiveness ──
    pub has_view_port_meta: u8,
    pub has_responsive_imgs: usize,
    pub has_mobile_css: u8,

    // ── Advanced text ──
    pub unique_words_ratio: f64,
    pub punctuation_density: f64,
    pub avg_paragraph_len: f64,

    // ── Page ──
    #[serde(rename = "totalElements")]
    pub total_elements: usize,
    pub title: String,
    pub url: String,
}

impl FeatureRecord {
    /// All-zero record for a page that never loaded.
    pub fn zeroed(url: &str) -> Self {
        Self {
            is_empty_title: 1,
            url: url.to_string(),
            ..Default::default()
        }
    }
}
