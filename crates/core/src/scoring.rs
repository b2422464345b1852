//! Per-element content scores used by the region locator.
//!
//! A score blends four signals: the tag itself, class/id hints, how much
//! prose the element holds, and how much of that prose sits inside links.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::parse::Element;

static POSITIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(article|body|content|entry|hentry|h-entry|main|page|post|text|blog|story|prose)").unwrap()
});

static NEGATIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(banner|breadcrumbs?|combx|comment|community|disqus|extra|foot|header|menu|related|remark|rss|shoutbox|sidebar|sponsor|ad-break|agegate|pagination|pager|popup|promo|newsletter|subscribe)",
    )
    .unwrap()
});

/// Tunables for [`calculate_score`].
#[derive(Debug, Clone)]
pub struct ScoreConfig {
    /// Lowest score a region may have and still count as readable
    pub min_score_threshold: f64,
    /// Bonus for content-looking class/id values
    pub positive_weight: f64,
    /// Penalty for chrome-looking class/id values
    pub negative_weight: f64,
    /// Cap on the character-count contribution
    pub max_char_density_score: f64,
    /// Cap on the comma-count contribution
    pub max_comma_density_score: f64,
    /// Characters needed per density point
    pub chars_per_point: usize,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            min_score_threshold: 20.0,
            positive_weight: 25.0,
            negative_weight: -25.0,
            max_char_density_score: 3.0,
            max_comma_density_score: 3.0,
            chars_per_point: 100,
        }
    }
}

/// Breakdown of one element's score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreResult {
    pub tag_name: String,
    pub base_score: f64,
    pub class_weight: f64,
    pub content_density: f64,
    /// Share of text inside links, 0.0 to 1.0
    pub link_density: f64,
    pub final_score: f64,
}

/// Score contributed by the tag name alone.
pub fn base_tag_score(element: &Element<'_>) -> f64 {
    match element.tag_name().as_str() {
        "article" | "main" => 10.0,
        "section" => 8.0,
        "div" => 5.0,
        "td" | "blockquote" => 3.0,
        "form" | "address" | "ol" | "ul" | "dl" | "dd" | "dt" | "li" => -3.0,
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "th" | "header" | "footer" | "nav" | "aside" => -5.0,
        _ => 0.0,
    }
}

/// Class/id adjustment; the id is checked before the classes and a positive
/// hint wins over a negative one on the same value.
pub fn class_id_weight(element: &Element<'_>, config: &ScoreConfig) -> f64 {
    let id = element.attr("id").into_iter();
    let classes = element.attr("class").into_iter().flat_map(str::split_whitespace);

    for marker in id.chain(classes) {
        if POSITIVE.is_match(marker) {
            return config.positive_weight;
        }
        if NEGATIVE.is_match(marker) {
            return config.negative_weight;
        }
    }
    0.0
}

/// Points for text length and comma count, each capped.
pub fn content_density_score(element: &Element<'_>, config: &ScoreConfig) -> f64 {
    let text = element.text();
    let char_score = ((text.chars().count() / config.chars_per_point) as f64).min(config.max_char_density_score);
    let comma_score = (text.matches(',').count() as f64).min(config.max_comma_density_score);

    char_score + comma_score
}

/// Ratio of link text to all text; 0.0 for elements without text.
pub fn link_density(element: &Element<'_>) -> f64 {
    let text_length = element.text().chars().count();
    if text_length == 0 {
        return 0.0;
    }

    let link_length: usize = element
        .select("a")
        .unwrap_or_default()
        .iter()
        .map(|link| link.text().chars().count())
        .sum();

    link_length as f64 / text_length as f64
}

/// Whether a block of text reads like source code rather than prose.
///
/// Code has lots of punctuation, few commas and relatively few spaces.
pub fn looks_like_code(text: &str) -> bool {
    let len = text.len();
    if len <= 50 {
        return false;
    }

    let ratio = |count: usize| count as f64 / len as f64;
    let special = text.chars().filter(|c| !c.is_alphanumeric() && !c.is_whitespace()).count();

    ratio(special) > 0.15 && ratio(text.matches(',').count()) < 0.01 && ratio(text.matches(' ').count()) < 0.15
}

/// Full score for one element.
///
/// The link penalty is halved for elements that look like content, either
/// through a positive class/id or through sheer amount of text.
pub fn calculate_score(element: &Element<'_>, config: &ScoreConfig) -> ScoreResult {
    let tag_name = element.tag_name();
    let base_score = base_tag_score(element);
    let class_weight = class_id_weight(element, config);
    let content_density = content_density_score(element, config);
    let link_density = link_density(element);

    let text = element.text();
    let code_penalty = if tag_name == "pre" && looks_like_code(&text) { -10.0 } else { 0.0 };
    let content_rich = class_weight > 0.0 || text.chars().count() > 500;
    let link_penalty = if content_rich { 1.0 - link_density * 0.5 } else { 1.0 - link_density };

    let final_score = (base_score + class_weight + content_density + code_penalty) * link_penalty;

    ScoreResult { tag_name, base_score, class_weight, content_density, link_density, final_score }
}
