//! Linguistic normalization of offer text and keywords
//!
//! Text is tokenized with French elision handling, filtered down to purely
//! alphabetic non-stopword tokens, lowercased, stripped of diacritics and
//! lemmatized. Keywords go through the same filters but each keyword is kept
//! as a single unit so multi-word phrases stay intact.

use crate::lemmatizer::Lemmatizer;
use jobsort_core::{Error, Result};
use regex::Regex;
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

/// Elided French articles and pronouns split off the following word
const ELISIONS: &[&str] = &[
    "jusqu", "lorsqu", "puisqu", "qu", "c", "d", "j", "l", "m", "n", "s", "t",
];

/// Stopword list, one word per line
#[derive(Debug, Clone, Default)]
pub struct Stopwords {
    words: HashSet<String>,
}

impl Stopwords {
    /// Parse a newline-separated list; blank lines are ignored
    pub fn parse(content: &str) -> Self {
        Self {
            words: content
                .lines()
                .map(|l| l.trim().to_lowercase())
                .filter(|l| !l.is_empty())
                .collect(),
        }
    }

    /// Case-insensitive membership test
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(&word.to_lowercase())
    }

    /// Number of stopwords
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the list is empty
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Word tokenizer aware of French elisions (`l'`, `qu'`, `jusqu'`...)
#[derive(Debug, Clone)]
pub struct FrenchTokenizer {
    pattern: Regex,
}

impl FrenchTokenizer {
    /// Create a new tokenizer
    pub fn new() -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(r"\w+(?:['’\-]\w+)*|[^\w\s]")
                .map_err(|e| Error::config(format!("Failed to compile tokenizer regex: {}", e)))?,
        })
    }

    /// Split text into word and punctuation tokens
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let mut tokens = Vec::new();
        for m in self.pattern.find_iter(text) {
            let mut rest = m.as_str();
            while let Some((prefix, remainder)) = split_elision(rest) {
                tokens.push(prefix.to_string());
                rest = remainder;
            }
            tokens.push(rest.to_string());
        }
        tokens
    }
}

/// Split `l'école` into (`l'`, `école`) when the prefix is an elision
fn split_elision(token: &str) -> Option<(&str, &str)> {
    let (idx, apostrophe) = token.char_indices().find(|(_, c)| *c == '\'' || *c == '’')?;
    let prefix = &token[..idx];
    if !ELISIONS.contains(&prefix.to_lowercase().as_str()) {
        return None;
    }
    let split = idx + apostrophe.len_utf8();
    let remainder = &token[split..];
    (!remainder.is_empty()).then_some((&token[..split], remainder))
}

/// Compatibility-decompose (NFKD) and drop every non-ASCII character
/// (`étudiant` -> `etudiant`, `ﬁnance` -> `finance`, `cœur` -> `cur`)
pub fn strip_diacritics(text: &str) -> String {
    text.nfkd().filter(char::is_ascii).collect()
}

/// Normalized tokens of one document, in original order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedDocument {
    tokens: Vec<String>,
    text: String,
}

impl NormalizedDocument {
    /// Build from already-normalized tokens
    pub fn from_tokens(tokens: Vec<String>) -> Self {
        let text = tokens.join(" ");
        Self { tokens, text }
    }

    /// Tokens in document order
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Tokens joined by single spaces; the searchable form of the document
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of tokens
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether no token survived normalization
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Text and keyword normalizer
pub struct Normalizer {
    tokenizer: FrenchTokenizer,
    stopwords: Stopwords,
    lemmatizer: Box<dyn Lemmatizer>,
}

impl Normalizer {
    /// Create a normalizer from a stopword list and a lemmatizer
    pub fn new(stopwords: Stopwords, lemmatizer: Box<dyn Lemmatizer>) -> Result<Self> {
        Ok(Self {
            tokenizer: FrenchTokenizer::new()?,
            stopwords,
            lemmatizer,
        })
    }

    /// Name of the configured lemmatizer
    pub fn lemmatizer_name(&self) -> &str {
        self.lemmatizer.name()
    }

    /// Whether a word is a stopword
    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(word)
    }

    /// Normalize raw document text
    pub fn normalize(&self, text: &str) -> NormalizedDocument {
        let tokens = self
            .tokenizer
            .tokenize(text)
            .into_iter()
            .filter_map(|token| self.normalize_token(&token))
            .collect();
        NormalizedDocument::from_tokens(tokens)
    }

    /// Normalize one token, `None` if it must be dropped
    pub fn normalize_token(&self, token: &str) -> Option<String> {
        if token.is_empty() || !token.chars().all(char::is_alphabetic) {
            return None;
        }
        let lower = token.to_lowercase();
        if self.stopwords.contains(&lower) {
            return None;
        }
        // Compatibility forms may decompose to spaces (`ﷺ`), keep letters only
        let folded: String = strip_diacritics(&lower)
            .chars()
            .filter(char::is_ascii_alphabetic)
            .map(|c| c.to_ascii_lowercase())
            .collect();
        if folded.is_empty() {
            return None;
        }
        let lemma = self.lemmatizer.lemmatize(&folded);
        let lemma = if !lemma.is_empty() && lemma.chars().all(|c| c.is_ascii_lowercase()) {
            lemma
        } else {
            folded
        };
        // Folding or lemmatizing can land on a stopword (`où` -> `ou`)
        (!self.stopwords.contains(&lemma)).then_some(lemma)
    }

    /// Normalize one keyword or keyword phrase as a single unit
    pub fn normalize_keyword(&self, keyword: &str) -> Option<String> {
        let lower = keyword.trim().to_lowercase();
        if lower.is_empty() || self.stopwords.contains(&lower) {
            return None;
        }
        let folded = strip_diacritics(&lower);
        let lemma = self.lemmatizer.lemmatize(folded.trim());
        (!lemma.is_empty()).then_some(lemma)
    }

    /// Normalize a list of keywords, dropping empties and duplicates
    pub fn normalize_keywords<S: AsRef<str>>(&self, keywords: &[S]) -> Vec<String> {
        let mut seen = HashSet::new();
        keywords
            .iter()
            .filter_map(|k| self.normalize_keyword(k.as_ref()))
            .filter(|k| seen.insert(k.clone()))
            .collect()
    }
}

impl std::fmt::Debug for Normalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Normalizer")
            .field("stopwords", &self.stopwords.len())
            .field("lemmatizer", &self.lemmatizer.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lemmatizer::{FrenchPluralLemmatizer, IdentityLemmatizer};

    const STOPWORDS: &str = include_str!("../tests/fixtures/french_stopwords.txt");

    fn normalizer() -> Normalizer {
        Normalizer::new(Stopwords::parse(STOPWORDS), Box::new(IdentityLemmatizer)).unwrap()
    }

    #[test]
    fn test_tokenizer_splits_elisions() {
        let tokenizer = FrenchTokenizer::new().unwrap();
        assert_eq!(
            tokenizer.tokenize("L'entreprise qu'elle aime, jusqu'à demain."),
            vec!["L'", "entreprise", "qu'", "elle", "aime", ",", "jusqu'", "à", "demain", "."]
        );
    }

    #[test]
    fn test_tokenizer_keeps_compounds_whole() {
        let tokenizer = FrenchTokenizer::new().unwrap();
        assert_eq!(
            tokenizer.tokenize("porte-parole aujourd'hui"),
            vec!["porte-parole", "aujourd'hui"]
        );
    }

    #[test]
    fn test_strip_diacritics() {
        assert_eq!(strip_diacritics("étudiant"), "etudiant");
        assert_eq!(strip_diacritics("Génie Mécanique"), "Genie Mecanique");
        assert_eq!(strip_diacritics("cœur"), "cur");
        assert_eq!(strip_diacritics("ﬁnance"), "finance");
    }

    #[test]
    fn test_strip_diacritics_folds_compatibility_forms() {
        assert_eq!(strip_diacritics("Ａｇｅｎｃｅ"), "Agence");
        assert_eq!(strip_diacritics("ǎ ǹ ḿ"), "a n m");
        assert_eq!(strip_diacritics("İstanbul"), "Istanbul");
        assert_eq!(strip_diacritics("日本"), "");
    }

    #[test]
    fn test_compatibility_forms_never_leave_blank_tokens() {
        let normalizer = normalizer();
        assert!(normalizer.normalize("\u{FDFA}").is_empty());
        assert_eq!(normalizer.normalize("ＡＧＥＮＣＥ").tokens(), ["agence"]);
    }

    #[test]
    fn test_normalize_filters_and_folds() {
        let doc = normalizer().normalize("Nous recherchons un stagiaire développeur logiciel pour 6 mois");
        assert_eq!(
            doc.tokens(),
            &["recherchons", "stagiaire", "developpeur", "logiciel", "mois"]
        );
        assert_eq!(doc.text(), "recherchons stagiaire developpeur logiciel mois");
    }

    #[test]
    fn test_normalize_drops_non_alphabetic_tokens() {
        // `c` and `d` are stopwords on their own
        let doc = normalizer().normalize("C++ 2025 bac+5 R&D porte-parole l'école");
        assert_eq!(doc.tokens(), &["bac", "r", "ecole"]);
    }

    #[test]
    fn test_folded_stopwords_are_dropped() {
        // `où` is not a stopword but folds to `ou`, which is
        let doc = normalizer().normalize("où travailler");
        assert_eq!(doc.tokens(), &["travailler"]);
    }

    #[test]
    fn test_empty_text() {
        let doc = normalizer().normalize("");
        assert!(doc.is_empty());
        assert_eq!(doc.text(), "");
    }

    #[test]
    fn test_normalize_keywords_keeps_phrases() {
        let keywords = normalizer().normalize_keywords(&["Génie Civil", "génie civil", "  BTP ", "les", ""]);
        assert_eq!(keywords, vec!["genie civil".to_string(), "btp".to_string()]);
    }

    #[test]
    fn test_keywords_go_through_lemmatizer() {
        let normalizer =
            Normalizer::new(Stopwords::parse(STOPWORDS), Box::new(FrenchPluralLemmatizer)).unwrap();
        assert_eq!(normalizer.normalize_keyword("Réseaux"), Some("reseau".to_string()));
        assert_eq!(normalizer.normalize_keyword("avocats"), Some("avocat".to_string()));
        assert_eq!(normalizer.lemmatizer_name(), "french_plural");
    }

    #[test]
    fn test_stopwords_case_insensitive() {
        let stopwords = Stopwords::parse("le\nla\n\nÀ\n");
        assert_eq!(stopwords.len(), 3);
        assert!(stopwords.contains("LE"));
        assert!(stopwords.contains("à"));
        assert!(!stopwords.contains("stage"));
    }
}
