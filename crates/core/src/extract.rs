//! Locating the main content region of a page.
//!
//! Candidate containers are scored with [`calculate_score`], their scores are
//! pushed up to the parent (half) and grandparent (a third), and the best
//! container wins. Siblings under the same parent that score well, or that
//! are plain prose paragraphs, are pulled in alongside it.

use std::collections::HashMap;

use crate::parse::{Document, Element};
use crate::scoring::{ScoreConfig, calculate_score, link_density};
use crate::{LinkpressError, Result};

/// Tunables for [`locate_region`].
#[derive(Debug, Clone)]
pub struct RegionConfig {
    /// Minimum score the winning container must reach
    pub min_score_threshold: f64,
    /// Text length below which non-sectioning candidates are skipped is a tenth of this
    pub char_threshold: usize,
    /// Upper bound on scanned elements, 0 for no limit
    pub max_elements: usize,
    /// Siblings scoring at least this fraction of the top score are kept
    pub sibling_threshold: f64,
    pub score: ScoreConfig,
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            min_score_threshold: 10.0,
            char_threshold: 500,
            max_elements: 2000,
            sibling_threshold: 0.2,
            score: ScoreConfig::default(),
        }
    }
}

/// The chosen content region, as raw HTML in document order.
#[derive(Debug, Clone)]
pub struct Region {
    pub html: String,
    pub top_score: f64,
    /// Top container plus kept siblings
    pub element_count: usize,
}

const CANDIDATE_TAGS: &[&str] = &["div", "article", "section", "main", "p", "td", "pre", "blockquote"];

#[derive(Debug, Clone, Copy)]
struct Scored<'a> {
    element: Element<'a>,
    score: f64,
}

/// Finds the main content region of `doc`.
///
/// # Errors
///
/// [`LinkpressError::NoContent`] when the page has no candidate at all and
/// [`LinkpressError::NotReadable`] when the best candidate scores too low.
pub fn locate_region(doc: &Document, config: &RegionConfig) -> Result<Region> {
    let mut scored = score_candidates(doc, config);
    propagate_scores(&mut scored, config);

    let top = select_top(&scored).ok_or(LinkpressError::NoContent)?;
    if top.score < config.min_score_threshold {
        return Err(LinkpressError::NotReadable { score: top.score, threshold: config.min_score_threshold });
    }

    let members = gather_siblings(top, &scored, config);
    let html = members.iter().map(Element::outer_html).collect::<Vec<_>>().join("\n");

    Ok(Region { html, top_score: top.score, element_count: members.len() })
}

fn score_candidates<'a>(doc: &'a Document, config: &RegionConfig) -> Vec<Scored<'a>> {
    let limit = if config.max_elements == 0 { usize::MAX } else { config.max_elements };
    let min_chars = config.char_threshold / 10;

    doc.body()
        .select("*")
        .unwrap_or_default()
        .into_iter()
        .take(limit)
        .filter(|el| CANDIDATE_TAGS.contains(&el.tag_name().as_str()))
        .filter(|el| {
            matches!(el.tag_name().as_str(), "article" | "section" | "main") || el.text().chars().count() >= min_chars
        })
        .map(|element| Scored { element, score: calculate_score(&element, &config.score).final_score })
        .collect()
}

/// Adds half of each candidate's own score to its parent and a third to its
/// grandparent. Ancestors that were not candidates themselves are scored and
/// added on first contact.
fn propagate_scores<'a>(scored: &mut Vec<Scored<'a>>, config: &RegionConfig) {
    let mut index = HashMap::new();
    for (i, entry) in scored.iter().enumerate() {
        index.insert(entry.element.element_ref().id(), i);
    }

    let originals: Vec<(Element<'a>, f64)> = scored.iter().map(|s| (s.element, s.score)).collect();
    for (element, score) in originals {
        let parent = element.parent();
        let grandparent = parent.and_then(|p| p.parent());

        for (ancestor, share) in [(parent, 2.0), (grandparent, 3.0)] {
            let Some(ancestor) = ancestor else { continue };
            if matches!(ancestor.tag_name().as_str(), "body" | "html") {
                continue;
            }

            let id = ancestor.element_ref().id();
            let slot = match index.get(&id) {
                Some(&slot) => slot,
                None => {
                    let base = calculate_score(&ancestor, &config.score).final_score;
                    scored.push(Scored { element: ancestor, score: base });
                    index.insert(id, scored.len() - 1);
                    scored.len() - 1
                }
            };
            scored[slot].score += score / share;
        }
    }
}

/// Highest score wins; ties go to sectioning tags, then longer text, then
/// whichever appears first in the document.
fn select_top<'s, 'a>(scored: &'s [Scored<'a>]) -> Option<&'s Scored<'a>> {
    scored.iter().fold(None, |best: Option<&Scored<'a>>, candidate| match best {
        Some(best) if !outranks(candidate, best) => Some(best),
        _ => Some(candidate),
    })
}

fn outranks(a: &Scored<'_>, b: &Scored<'_>) -> bool {
    if a.score != b.score {
        return a.score > b.score;
    }

    let (pa, pb) = (container_priority(&a.element), container_priority(&b.element));
    if pa != pb {
        return pa > pb;
    }

    let (la, lb) = (a.element.text().chars().count(), b.element.text().chars().count());
    la > lb
}

fn container_priority(element: &Element<'_>) -> u8 {
    match element.tag_name().as_str() {
        "article" | "main" | "section" => 3,
        "div" => 2,
        _ => 1,
    }
}

/// The top element plus qualifying siblings, in document order.
fn gather_siblings<'a>(top: &Scored<'a>, scored: &[Scored<'a>], config: &RegionConfig) -> Vec<Element<'a>> {
    let Some(parent) = top.element.parent() else { return vec![top.element] };
    if matches!(parent.tag_name().as_str(), "html") {
        return vec![top.element];
    }

    let threshold = (top.score * config.sibling_threshold).max(config.min_score_threshold / 2.0);
    let score_of = |el: &Element<'a>| scored.iter().find(|s| s.element.same_node(el)).map(|s| s.score);

    parent
        .child_elements()
        .into_iter()
        .filter(|child| {
            if child.same_node(&top.element) {
                return true;
            }
            if score_of(child).is_some_and(|score| score >= threshold) {
                return true;
            }
            child.tag_name() == "p" && is_prose_paragraph(child)
        })
        .collect()
}

fn is_prose_paragraph(element: &Element<'_>) -> bool {
    let text = element.text();
    let text = text.trim();
    let length = text.chars().count();
    let density = link_density(element);

    (length > 80 && density < 0.25) || (length > 0 && density == 0.0 && text.ends_with('.'))
}
