use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{SearchError, SearchResult};
use crate::text::stopwords::is_english_stop_word;
use crate::vector::SparseVector;

/// Tokens are runs of at least two word characters.
#[allow(clippy::expect_used)]
static TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?u)\b\w\w+\b").expect("token pattern is a valid regex"));

/// TF-IDF text vectorizer.
///
/// Weighting:
/// ```text
/// tfidf(t, d) = count(t, d) * idf(t)
/// idf(t)      = ln((1 + n) / (1 + df(t))) + 1
/// ```
/// and every output row is scaled to unit L2 norm.
///
/// The vocabulary keeps the `max_features` most frequent terms across the
/// corpus (ties broken alphabetically); column indices follow alphabetical
/// term order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    max_features: Option<usize>,
    stop_words: bool,
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
}

impl Default for TfidfVectorizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TfidfVectorizer {
    /// An unfitted vectorizer with no vocabulary cap and no stop words.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_features: None,
            stop_words: false,
            vocabulary: BTreeMap::new(),
            idf: Vec::new(),
        }
    }

    /// Cap the vocabulary at the `max_features` most frequent terms.
    #[must_use]
    pub fn with_max_features(mut self, max_features: usize) -> Self {
        self.max_features = Some(max_features);
        self
    }

    /// Drop English stop words before counting.
    #[must_use]
    pub fn with_english_stop_words(mut self) -> Self {
        self.stop_words = true;
        self
    }

    #[must_use]
    pub fn is_fitted(&self) -> bool {
        !self.vocabulary.is_empty()
    }

    /// Number of columns this vectorizer produces.
    #[must_use]
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    #[must_use]
    pub fn vocabulary(&self) -> &BTreeMap<String, usize> {
        &self.vocabulary
    }

    fn tokenize<'a>(&self, text: &'a str) -> impl Iterator<Item = String> + 'a {
        let stop_words = self.stop_words;
        TOKEN_PATTERN
            .find_iter(text)
            .map(|m| m.as_str().to_lowercase())
            .filter(move |t| !(stop_words && is_english_stop_word(t)))
    }

    /// Learn vocabulary and IDF weights from `documents`.
    ///
    /// # Errors
    /// Fails on an empty corpus or when no term survives tokenization.
    pub fn fit<S: AsRef<str>>(&mut self, documents: &[S]) -> SearchResult<()> {
        if documents.is_empty() {
            return Err(SearchError::InvalidInput(
                "cannot fit vectorizer on an empty corpus".to_string(),
            ));
        }

        let mut term_freq: HashMap<String, usize> = HashMap::new();
        let mut doc_freq: HashMap<String, usize> = HashMap::new();

        for doc in documents {
            let mut doc_terms = HashSet::new();
            for token in self.tokenize(doc.as_ref()) {
                *term_freq.entry(token.clone()).or_insert(0) += 1;
                doc_terms.insert(token);
            }
            for term in doc_terms {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        if term_freq.is_empty() {
            return Err(SearchError::InvalidInput(
                "empty vocabulary; documents contain only stop words".to_string(),
            ));
        }

        let mut ranked: Vec<(String, usize)> = term_freq.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        if let Some(max_features) = self.max_features {
            ranked.truncate(max_features);
        }

        let mut terms: Vec<String> = ranked.into_iter().map(|(term, _)| term).collect();
        terms.sort();

        #[allow(clippy::cast_precision_loss)]
        let n_docs = documents.len() as f64;
        self.idf = terms
            .iter()
            .map(|term| {
                #[allow(clippy::cast_precision_loss)]
                let df = doc_freq.get(term).copied().unwrap_or(0) as f64;
                ((1.0 + n_docs) / (1.0 + df)).ln() + 1.0
            })
            .collect();
        self.vocabulary = terms
            .into_iter()
            .enumerate()
            .map(|(idx, term)| (term, idx))
            .collect();

        log::debug!(
            "Fitted vectorizer: {} terms from {} documents",
            self.vocabulary.len(),
            documents.len()
        );
        Ok(())
    }

    /// Vectorize one document with the fitted vocabulary. Unknown terms are ignored.
    ///
    /// # Errors
    /// Fails if the vectorizer has not been fitted.
    pub fn transform(&self, document: &str) -> SearchResult<SparseVector> {
        if !self.is_fitted() {
            return Err(SearchError::Config("text vectorizer is not fitted".to_string()));
        }

        let pairs = self
            .tokenize(document)
            .filter_map(|token| self.vocabulary.get(&token).map(|&idx| (idx, self.idf[idx])))
            .collect();

        let mut vector = SparseVector::from_pairs(pairs);
        vector.normalize();
        Ok(vector)
    }
}
