//! Text feature extraction.

pub mod stopwords;
pub mod vectorizer;

pub use vectorizer::TfidfVectorizer;
