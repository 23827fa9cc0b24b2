//! Pluggable lemmatization
//!
//! The default [`WordNetLemmatizer`] reproduces the English noun lemmatizer
//! the keyword tables were originally tuned against, even though offers are
//! written in French. [`FrenchPluralLemmatizer`] is a drop-in alternative that
//! folds common French plurals.

use jobsort_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Reduces a word (or keyword phrase) to its dictionary form
pub trait Lemmatizer: Send + Sync {
    /// Lemmatize a lowercase, accent-free word or phrase
    fn lemmatize(&self, word: &str) -> String;

    /// Lemmatizer name, for logging
    fn name(&self) -> &str;
}

/// Lemmatizer selection in configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LemmatizerKind {
    /// English WordNet noun morphology
    #[default]
    Wordnet,
    /// French plural folding
    FrenchPlural,
    /// Leave words unchanged
    Identity,
}

impl LemmatizerKind {
    /// Whether this lemmatizer needs the WordNet bundle
    pub fn needs_wordnet(&self) -> bool {
        matches!(self, Self::Wordnet)
    }
}

/// No-op lemmatizer
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityLemmatizer;

impl Lemmatizer for IdentityLemmatizer {
    fn lemmatize(&self, word: &str) -> String {
        word.to_string()
    }

    fn name(&self) -> &str {
        "identity"
    }
}

/// Noun suffix substitutions, tried in this order
const NOUN_SUBSTITUTIONS: &[(&str, &str)] = &[
    ("s", ""),
    ("ses", "s"),
    ("ves", "f"),
    ("xes", "x"),
    ("zes", "z"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("men", "man"),
    ("ies", "y"),
];

/// WordNet noun lemmatizer.
///
/// A candidate form is accepted only if it is a WordNet noun lemma. The
/// exception list is consulted first, then suffix substitutions are applied
/// repeatedly until some candidate is a known lemma. The shortest accepted
/// candidate wins; unknown words are returned unchanged.
#[derive(Debug, Clone, Default)]
pub struct WordNetLemmatizer {
    lemmas: HashSet<String>,
    exceptions: HashMap<String, Vec<String>>,
}

impl WordNetLemmatizer {
    /// Build from a set of noun lemmas and an exception map
    pub fn from_parts(
        lemmas: impl IntoIterator<Item = String>,
        exceptions: HashMap<String, Vec<String>>,
    ) -> Self {
        Self {
            lemmas: lemmas.into_iter().collect(),
            exceptions,
        }
    }

    /// Load `index.noun` and `noun.exc` from a WordNet dictionary directory
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let index = std::fs::read_to_string(dir.join("index.noun")).map_err(|e| {
            Error::resource_missing(format!("Cannot read WordNet index.noun in {}: {}", dir.display(), e))
        })?;
        let exc = std::fs::read_to_string(dir.join("noun.exc")).map_err(|e| {
            Error::resource_missing(format!("Cannot read WordNet noun.exc in {}: {}", dir.display(), e))
        })?;

        Ok(Self::from_parts(parse_index(&index), parse_exceptions(&exc)))
    }

    /// Number of known noun lemmas
    pub fn len(&self) -> usize {
        self.lemmas.len()
    }

    /// Whether no lemma is known
    pub fn is_empty(&self) -> bool {
        self.lemmas.is_empty()
    }

    fn apply_rules(forms: &[String]) -> Vec<String> {
        forms
            .iter()
            .flat_map(|form| {
                NOUN_SUBSTITUTIONS.iter().filter_map(move |(old, new)| {
                    form.strip_suffix(old).map(|stem| format!("{}{}", stem, new))
                })
            })
            .collect()
    }

    fn known(&self, forms: Vec<String>) -> Vec<String> {
        let mut seen = HashSet::new();
        forms
            .into_iter()
            .filter(|form| self.lemmas.contains(form) && seen.insert(form.clone()))
            .collect()
    }

    /// Every accepted base form of a noun, in discovery order
    fn morphy(&self, form: &str) -> Vec<String> {
        if let Some(bases) = self.exceptions.get(form) {
            let mut forms = vec![form.to_string()];
            forms.extend(bases.iter().cloned());
            return self.known(forms);
        }

        let mut forms = Self::apply_rules(&[form.to_string()]);
        let mut candidates = vec![form.to_string()];
        candidates.extend(forms.iter().cloned());
        let found = self.known(candidates);
        if !found.is_empty() {
            return found;
        }

        while !forms.is_empty() {
            forms = Self::apply_rules(&forms);
            let found = self.known(forms.clone());
            if !found.is_empty() {
                return found;
            }
        }

        Vec::new()
    }
}

impl Lemmatizer for WordNetLemmatizer {
    fn lemmatize(&self, word: &str) -> String {
        let key = word.replace(' ', "_");
        self.morphy(&key)
            .into_iter()
            .reduce(|shortest, c| if c.len() < shortest.len() { c } else { shortest })
            .map(|lemma| lemma.replace('_', " "))
            .unwrap_or_else(|| word.to_string())
    }

    fn name(&self) -> &str {
        "wordnet"
    }
}

/// Lemma column of a WordNet `index.*` file; license header lines start with a space
fn parse_index(content: &str) -> impl Iterator<Item = String> + '_ {
    content
        .lines()
        .filter(|line| !line.starts_with(' '))
        .filter_map(|line| line.split_whitespace().next())
        .map(str::to_string)
}

/// `inflected base [base...]` lines of a WordNet `*.exc` file
fn parse_exceptions(content: &str) -> HashMap<String, Vec<String>> {
    content
        .lines()
        .filter_map(|line| {
            let mut parts = line.split_whitespace();
            let inflected = parts.next()?;
            let bases: Vec<String> = parts.map(str::to_string).collect();
            (!bases.is_empty()).then(|| (inflected.to_string(), bases))
        })
        .collect()
}

/// Folds regular French plurals to the singular.
///
/// `-eaux` becomes `-eau` (`reseaux` -> `reseau`), other `-aux` endings
/// become `-al` (`journaux` -> `journal`), otherwise a trailing `s`
/// or `x` is dropped from words longer than three letters, except `-ss`.
/// Phrases are folded word by word.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrenchPluralLemmatizer;

impl FrenchPluralLemmatizer {
    fn fold(word: &str) -> String {
        if let Some(stem) = word.strip_suffix("eaux") {
            return format!("{}eau", stem);
        }
        if word.len() > 4 {
            if let Some(stem) = word.strip_suffix("aux") {
                return format!("{}al", stem);
            }
        }
        if word.len() > 3 && !word.ends_with("ss") {
            if let Some(stem) = word.strip_suffix('s').or_else(|| word.strip_suffix('x')) {
                return stem.to_string();
            }
        }
        word.to_string()
    }
}

impl Lemmatizer for FrenchPluralLemmatizer {
    fn lemmatize(&self, word: &str) -> String {
        word.split(' ').map(Self::fold).collect::<Vec<_>>().join(" ")
    }

    fn name(&self) -> &str {
        "french_plural"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wordnet() -> WordNetLemmatizer {
        let lemmas = ["stage", "church", "man", "goose", "city", "wolf", "civil_engineering", "glass"]
            .iter()
            .map(|s| s.to_string());
        let mut exceptions = HashMap::new();
        exceptions.insert("geese".to_string(), vec!["goose".to_string()]);
        WordNetLemmatizer::from_parts(lemmas, exceptions)
    }

    #[test]
    fn test_wordnet_suffix_rules() {
        let lemmatizer = wordnet();
        assert_eq!(lemmatizer.lemmatize("stages"), "stage");
        assert_eq!(lemmatizer.lemmatize("churches"), "church");
        assert_eq!(lemmatizer.lemmatize("men"), "man");
        assert_eq!(lemmatizer.lemmatize("cities"), "city");
        assert_eq!(lemmatizer.lemmatize("wolves"), "wolf");
        assert_eq!(lemmatizer.lemmatize("glasses"), "glass");
    }

    #[test]
    fn test_wordnet_exceptions_and_known_words() {
        let lemmatizer = wordnet();
        assert_eq!(lemmatizer.lemmatize("geese"), "goose");
        assert_eq!(lemmatizer.lemmatize("stage"), "stage");
    }

    #[test]
    fn test_wordnet_unknown_words_unchanged() {
        let lemmatizer = wordnet();
        assert_eq!(lemmatizer.lemmatize("alternance"), "alternance");
        assert_eq!(lemmatizer.lemmatize("apprentis"), "apprentis");
        assert_eq!(lemmatizer.lemmatize("genie civil"), "genie civil");
    }

    #[test]
    fn test_wordnet_phrases_use_underscores() {
        let lemmatizer = wordnet();
        assert_eq!(lemmatizer.lemmatize("civil engineering"), "civil engineering");
    }

    #[test]
    fn test_parse_wordnet_files() {
        let index = "  1 This software and database is being provided\n\
                     stage n 8 5 @ ~ #p %p + 8 0 01\n\
                     civil_engineering n 1 2 @ ; 1 0 00\n";
        let lemmas: Vec<String> = parse_index(index).collect();
        assert_eq!(lemmas, vec!["stage", "civil_engineering"]);

        let exceptions = parse_exceptions("geese goose\nmice mouse\nlonely\n");
        assert_eq!(exceptions.len(), 2);
        assert_eq!(exceptions["mice"], vec!["mouse".to_string()]);
    }

    #[test]
    fn test_french_plural_folding() {
        let lemmatizer = FrenchPluralLemmatizer;
        assert_eq!(lemmatizer.lemmatize("journaux"), "journal");
        assert_eq!(lemmatizer.lemmatize("apprentis"), "apprenti");
        assert_eq!(lemmatizer.lemmatize("stages"), "stage");
        assert_eq!(lemmatizer.lemmatize("progres"), "progre");
        assert_eq!(lemmatizer.lemmatize("classes"), "classe");
        assert_eq!(lemmatizer.lemmatize("stress"), "stress");
        assert_eq!(lemmatizer.lemmatize("bus"), "bus");
        assert_eq!(lemmatizer.lemmatize("travaux publics"), "traval public");
    }

    #[test]
    fn test_french_plural_eaux_keeps_eau() {
        let lemmatizer = FrenchPluralLemmatizer;
        assert_eq!(lemmatizer.lemmatize("reseaux"), "reseau");
        assert_eq!(lemmatizer.lemmatize("bureaux"), "bureau");
        assert_eq!(lemmatizer.lemmatize("nouveaux"), "nouveau");
        assert_eq!(lemmatizer.lemmatize("jeux"), "jeu");
        assert_eq!(lemmatizer.lemmatize("eaux"), "eau");
        assert_eq!(lemmatizer.lemmatize("reseau"), "reseau");
    }

    #[test]
    fn test_identity() {
        assert_eq!(IdentityLemmatizer.lemmatize("stages"), "stages");
    }
}
