//! HTML extraction
//!
//! Pulls the SEO-relevant elements out of a fetched page: every title, H1,
//! H2, and meta description with measured lengths, plus the raw hrefs of all
//! anchors. Hrefs are returned exactly as written; resolution against the
//! page address is the normalizer's job, and duplicate occurrences are kept
//! because the inlink totals count edges, not distinct pairs.

use crate::store::{PageHeading, PageMetaDescription, PageTitle};
use scraper::{Html, Selector};

/// Everything extracted from one internal page
#[derive(Debug, Clone, Default)]
pub struct ExtractedPage {
    pub titles: Vec<PageTitle>,
    pub meta_descriptions: Vec<PageMetaDescription>,
    pub headings_one: Vec<PageHeading>,
    pub headings_two: Vec<PageHeading>,
    /// Raw href values, unresolved, in document order, duplicates kept
    pub links: Vec<String>,
}

/// Parses HTML and extracts all diagnostic elements
pub fn extract_page(html: &str) -> ExtractedPage {
    let document = Html::parse_document(html);

    ExtractedPage {
        titles: extract_titles(&document),
        meta_descriptions: extract_meta_descriptions(&document),
        headings_one: extract_headings(&document, "h1"),
        headings_two: extract_headings(&document, "h2"),
        links: extract_raw_links(&document),
    }
}

fn extract_titles(document: &Html) -> Vec<PageTitle> {
    let selector = match Selector::parse("title") {
        Ok(s) => s,
        Err(_) => return Vec::new(),
    };

    document
        .select(&selector)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
        .map(|text| PageTitle {
            char_length: text.chars().count() as u32,
            pixel_width: estimate_pixel_width(&text),
            text,
        })
        .collect()
}

fn extract_meta_descriptions(document: &Html) -> Vec<PageMetaDescription> {
    let selector = match Selector::parse(r#"meta[name="description"]"#) {
        Ok(s) => s,
        Err(_) => return Vec::new(),
    };

    document
        .select(&selector)
        .filter_map(|el| el.value().attr("content"))
        .map(|content| content.trim().to_string())
        .filter(|text| !text.is_empty())
        .map(|text| PageMetaDescription {
            char_length: text.chars().count() as u32,
            pixel_width: estimate_pixel_width(&text),
            text,
        })
        .collect()
}

fn extract_headings(document: &Html, tag: &str) -> Vec<PageHeading> {
    let selector = match Selector::parse(tag) {
        Ok(s) => s,
        Err(_) => return Vec::new(),
    };

    document
        .select(&selector)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
        .map(|text| PageHeading {
            char_length: text.chars().count() as u32,
            text,
        })
        .collect()
}

fn extract_raw_links(document: &Html) -> Vec<String> {
    let selector = match Selector::parse("a[href]") {
        Ok(s) => s,
        Err(_) => return Vec::new(),
    };

    document
        .select(&selector)
        .filter_map(|el| el.value().attr("href"))
        .map(|href| href.to_string())
        .collect()
}

/// Estimates the rendered width of a string in pixels
///
/// Approximation of an 18px sans-serif rendering, the size search results
/// draw titles at. The original tool measured with an actual GUI font; a
/// character-class table is close enough for thresholding, which only needs
/// to separate clearly-too-wide from clearly-too-narrow.
pub fn estimate_pixel_width(text: &str) -> u32 {
    text.chars().map(char_width).sum()
}

fn char_width(c: char) -> u32 {
    match c {
        'i' | 'j' | 'l' | '!' | '\'' | '.' | ',' | ':' | ';' | '|' => 5,
        'f' | 't' | 'r' | 'I' | '(' | ')' | '[' | ']' | '-' | '/' => 6,
        'm' | 'w' | 'M' | 'W' | '@' => 15,
        ' ' => 5,
        c if c.is_ascii_uppercase() || c.is_ascii_digit() => 11,
        _ => 9,
    }
}
