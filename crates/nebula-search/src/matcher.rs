//! Fuzzy name matching.
//!
//! Scores are on a 0..=100 scale. The combined [`wratio`] picks the best of a
//! plain edit-distance ratio, token-order-insensitive ratios and, for strings
//! of quite different length, a best-window partial ratio.

use std::collections::BTreeSet;

use crate::error::{QueryKind, SearchError, SearchResult};

/// Default minimum score for a query to resolve.
pub const DEFAULT_MATCH_THRESHOLD: f64 = 60.0;

const TOKEN_WEIGHT: f64 = 0.95;
const PARTIAL_WEIGHT: f64 = 0.9;
const LONG_PARTIAL_WEIGHT: f64 = 0.6;

/// Queries are cut to this many characters before scoring.
pub const MAX_QUERY_CHARS: usize = 256;

/// The best candidate for a query.
#[derive(Debug, Clone, PartialEq)]
pub struct Match<'a> {
    /// Position of the candidate in the choice list.
    pub index: usize,
    pub choice: &'a str,
    pub score: f64,
}

/// Lowercase, map every non-alphanumeric character to a space, collapse
/// whitespace and trim.
#[must_use]
pub fn normalize(s: &str) -> String {
    let mapped: String = s
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    mapped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Edit-distance similarity of two already normalized strings.
fn raw_ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    strsim::normalized_levenshtein(a, b) * 100.0
}

fn sorted_tokens(s: &str) -> Vec<&str> {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens
}

fn raw_token_sort_ratio(a: &str, b: &str) -> f64 {
    raw_ratio(&sorted_tokens(a).join(" "), &sorted_tokens(b).join(" "))
}

fn raw_token_set_ratio(a: &str, b: &str) -> f64 {
    let ta: BTreeSet<&str> = a.split_whitespace().collect();
    let tb: BTreeSet<&str> = b.split_whitespace().collect();
    if ta.is_empty() || tb.is_empty() {
        return 0.0;
    }

    let common = ta.intersection(&tb).copied().collect::<Vec<_>>().join(" ");
    let only_a = ta.difference(&tb).copied().collect::<Vec<_>>().join(" ");
    let only_b = tb.difference(&ta).copied().collect::<Vec<_>>().join(" ");

    let join = |head: &str, tail: &str| match (head.is_empty(), tail.is_empty()) {
        (true, _) => tail.to_string(),
        (_, true) => head.to_string(),
        _ => format!("{head} {tail}"),
    };
    let combined_a = join(&common, &only_a);
    let combined_b = join(&common, &only_b);

    let mut best = raw_ratio(&combined_a, &combined_b);
    if !common.is_empty() {
        best = best
            .max(raw_ratio(&common, &combined_a))
            .max(raw_ratio(&common, &combined_b));
    }
    best
}

fn raw_partial_ratio(a: &str, b: &str) -> f64 {
    let (short, long) = if a.chars().count() <= b.chars().count() {
        (a, b)
    } else {
        (b, a)
    };
    if short.is_empty() {
        return 0.0;
    }

    let long_chars: Vec<char> = long.chars().collect();
    let window = short.chars().count();
    if window >= long_chars.len() {
        return raw_ratio(short, long);
    }

    let mut best: f64 = 0.0;
    for start in 0..=long_chars.len() - window {
        let slice: String = long_chars[start..start + window].iter().collect();
        best = best.max(raw_ratio(short, &slice));
        if best >= 100.0 {
            break;
        }
    }
    best
}

/// Plain similarity after normalization.
#[must_use]
pub fn ratio(a: &str, b: &str) -> f64 {
    raw_ratio(&normalize(a), &normalize(b))
}

/// Similarity of the best-aligned window of the longer string.
#[must_use]
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    raw_partial_ratio(&normalize(a), &normalize(b))
}

/// Similarity with tokens sorted, so word order does not matter.
#[must_use]
pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    raw_token_sort_ratio(&normalize(a), &normalize(b))
}

/// Similarity over shared and differing token sets.
#[must_use]
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    raw_token_set_ratio(&normalize(a), &normalize(b))
}

/// Weighted combination of the ratios above.
///
/// Identical normalized strings score exactly 100; an empty normalized
/// string scores 0.
#[must_use]
pub fn wratio(a: &str, b: &str) -> f64 {
    let a = normalize(a);
    let b = normalize(b);
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 100.0;
    }

    let base = raw_ratio(&a, &b);
    #[allow(clippy::cast_precision_loss)]
    let len_ratio = {
        let (la, lb) = (a.chars().count() as f64, b.chars().count() as f64);
        la.max(lb) / la.min(lb)
    };

    let token = raw_token_sort_ratio(&a, &b).max(raw_token_set_ratio(&a, &b));
    if len_ratio < 1.5 {
        return base.max(token * TOKEN_WEIGHT);
    }

    let partial_weight = if len_ratio < 8.0 {
        PARTIAL_WEIGHT
    } else {
        LONG_PARTIAL_WEIGHT
    };
    base.max(raw_partial_ratio(&a, &b) * partial_weight)
        .max(token * TOKEN_WEIGHT * partial_weight)
}

/// The first [`MAX_QUERY_CHARS`] characters of `query`.
fn bounded(query: &str) -> &str {
    match query.char_indices().nth(MAX_QUERY_CHARS) {
        Some((end, _)) => &query[..end],
        None => query,
    }
}

/// The highest-scoring choice. A choice equal to `query` wins outright;
/// otherwise the first one wins on equal scores.
/// Returns `None` for an empty choice list.
pub fn extract_one<'a, I>(query: &str, choices: I) -> Option<Match<'a>>
where
    I: IntoIterator<Item = &'a str>,
{
    let scored = bounded(query);
    let mut best: Option<Match<'a>> = None;
    for (index, choice) in choices.into_iter().enumerate() {
        if choice == query {
            return Some(Match {
                index,
                choice,
                score: 100.0,
            });
        }
        let score = wratio(scored, choice);
        if best.as_ref().is_none_or(|b| score > b.score) {
            best = Some(Match {
                index,
                choice,
                score,
            });
        }
    }
    best
}

/// Resolve `query` against `choices`, failing with
/// [`SearchError::NotFound`] when no choice reaches `threshold`.
pub fn best_match<'a, I>(
    query: &str,
    choices: I,
    threshold: f64,
    kind: QueryKind,
) -> SearchResult<Match<'a>>
where
    I: IntoIterator<Item = &'a str>,
{
    let not_found = |best_score| SearchError::NotFound {
        kind,
        query: query.to_string(),
        best_score,
    };

    match extract_one(query, choices) {
        Some(m) if m.score >= threshold => {
            log::debug!("Matched {kind} '{query}' to '{}' ({:.1})", m.choice, m.score);
            Ok(m)
        }
        Some(m) => Err(not_found(m.score)),
        None => Err(not_found(0.0)),
    }
}
