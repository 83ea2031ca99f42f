//! Relevance scoring for free-text catalog search.
//!
//! Each signal is evaluated independently and the points are summed, so a
//! name that equals the term also contains it and starts with it.

use crate::product::Product;
use crate::query::{SearchTerm, SortKey, fold};

pub const NAME_CONTAINS: u32 = 10;
pub const NAME_EXACT: u32 = 20;
pub const NAME_PREFIX: u32 = 15;
pub const CATEGORY_CONTAINS: u32 = 5;
pub const DESCRIPTION_CONTAINS: u32 = 2;

/// Additive relevance of `product` for `term`.
///
/// Short descriptions and tags take part in candidate selection but earn no points.
pub fn relevance_score(product: &Product, term: &SearchTerm) -> u32 {
    let p = &product.summary;
    let needle = term.folded();
    let name = fold(&p.name);

    let mut score = 0;
    if name.contains(needle) {
        score += NAME_CONTAINS;
    }
    if name == needle {
        score += NAME_EXACT;
    }
    if name.starts_with(needle) {
        score += NAME_PREFIX;
    }
    if term.found_in(p.category.label()) {
        score += CATEGORY_CONTAINS;
    }
    if term.found_in(&p.description) {
        score += DESCRIPTION_CONTAINS;
    }
    score
}

/// Score candidates, drop zero-score ones, and order by score then `sort`.
pub fn rank(candidates: Vec<Product>, term: &SearchTerm, sort: SortKey) -> Vec<Product> {
    let mut scored: Vec<(u32, Product)> = candidates
        .into_iter()
        .map(|p| (relevance_score(&p, term), p))
        .filter(|(score, _)| *score > 0)
        .collect();

    scored.sort_by(|(sa, a), (sb, b)| sb.cmp(sa).then_with(|| sort.compare(a, b)));
    scored.into_iter().map(|(_, p)| p).collect()
}
