//! Category keyword tables

use crate::normalizer::Normalizer;
use jobsort_core::{ContractType, Error, Result};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Ordered mapping from category name to its keywords.
///
/// Categories keep the order in which they were first seen and keywords keep
/// first-seen order with duplicates removed. Earlier categories win ties.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordTable {
    entries: Vec<(String, Vec<String>)>,
}

/// One row of the keyword CSV
#[derive(Debug, Deserialize)]
struct KeywordRow {
    #[serde(rename = "Major")]
    major: String,
    #[serde(rename = "Keyword")]
    keyword: String,
}

impl KeywordTable {
    /// Build a table from keywords used verbatim
    pub fn new<C, K>(entries: impl IntoIterator<Item = (C, Vec<K>)>) -> Self
    where
        C: Into<String>,
        K: Into<String>,
    {
        let mut table = Self::default();
        for (category, keywords) in entries {
            let category = category.into();
            for keyword in keywords {
                table.insert(&category, keyword.into());
            }
        }
        table
    }

    /// The fixed contract type table; keywords are matched as written
    pub fn contract_types() -> Self {
        Self::new([
            (ContractType::Stage.as_str(), vec!["stage", "stagiaire"]),
            (
                ContractType::Alternance.as_str(),
                vec!["alternant", "alternance", "apprenti", "apprentie", "alternante"],
            ),
        ])
    }

    /// Build a table from `(major, raw keyword)` pairs, normalizing every keyword.
    ///
    /// Keywords that normalize to nothing are dropped, and a major with no
    /// surviving keyword is left out.
    pub fn from_rows<C, K>(rows: impl IntoIterator<Item = (C, K)>, normalizer: &Normalizer) -> Self
    where
        C: AsRef<str>,
        K: AsRef<str>,
    {
        let mut table = Self::default();
        for (major, keyword) in rows {
            let major = major.as_ref().trim();
            if major.is_empty() {
                continue;
            }
            match normalizer.normalize_keywords(&[keyword.as_ref().trim()]).pop() {
                Some(normalized) => table.insert(major, normalized),
                None => debug!("Dropping keyword {:?} of {}", keyword.as_ref(), major),
            }
        }
        table
    }

    /// Read a CSV with `Major` and `Keyword` columns
    pub fn from_reader<R: Read>(reader: R, normalizer: &Normalizer) -> Result<Self> {
        let mut csv = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
        let mut rows = Vec::new();
        for (line, row) in csv.deserialize::<KeywordRow>().enumerate() {
            let row = row.map_err(|e| {
                Error::config(format!("Malformed keyword row {}: {}", line + 2, e))
            })?;
            rows.push((row.major, row.keyword));
        }
        Ok(Self::from_rows(rows, normalizer))
    }

    /// Load the keyword CSV at `path`
    pub fn load(path: impl AsRef<Path>, normalizer: &Normalizer) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| {
            Error::config(format!("Cannot open keyword source {}: {}", path.display(), e))
        })?;
        let table = Self::from_reader(std::io::BufReader::new(file), normalizer)?;

        info!(
            "Loaded {} majors with {} keywords from {}",
            table.len(),
            table.keyword_count(),
            path.display()
        );
        Ok(table)
    }

    fn insert(&mut self, category: &str, keyword: String) {
        let position = match self.entries.iter().position(|(c, _)| c == category) {
            Some(position) => position,
            None => {
                self.entries.push((category.to_string(), Vec::new()));
                self.entries.len() - 1
            }
        };
        let keywords = &mut self.entries[position].1;
        if !keywords.contains(&keyword) {
            keywords.push(keyword);
        }
    }

    /// Category names in table order
    pub fn categories(&self) -> Vec<&str> {
        self.entries.iter().map(|(c, _)| c.as_str()).collect()
    }

    /// Keywords of one category
    pub fn keywords(&self, category: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(c, _)| c == category)
            .map(|(_, k)| k.as_slice())
    }

    /// `(category, keywords)` pairs in table order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(c, k)| (c.as_str(), k.as_slice()))
    }

    /// Number of categories
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no category
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of keywords across categories
    pub fn keyword_count(&self) -> usize {
        self.entries.iter().map(|(_, k)| k.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lemmatizer::IdentityLemmatizer;
    use crate::normalizer::Stopwords;

    fn normalizer() -> Normalizer {
        Normalizer::new(Stopwords::parse("le\nla\nles\nde\n"), Box::new(IdentityLemmatizer)).unwrap()
    }

    #[test]
    fn test_from_rows_groups_by_major() {
        let table = KeywordTable::from_rows(
            [
                ("Informatique", "développeur"),
                ("Informatique", "logiciel"),
                ("Droit", "avocat"),
            ],
            &normalizer(),
        );

        assert_eq!(table.len(), 2);
        assert_eq!(table.categories(), vec!["Informatique", "Droit"]);
        assert_eq!(
            table.keywords("Informatique").unwrap(),
            &["developpeur".to_string(), "logiciel".to_string()]
        );
        assert_eq!(table.keyword_count(), 3);
    }

    #[test]
    fn test_rows_normalizing_to_nothing_are_dropped() {
        let table = KeywordTable::from_rows(
            [("Droit", "les"), ("Droit", "  "), ("BTP", "Génie Civil"), ("BTP", "génie civil")],
            &normalizer(),
        );
        assert_eq!(table.categories(), vec!["BTP"]);
        assert_eq!(table.keywords("BTP").unwrap(), &["genie civil".to_string()]);
        assert!(table.keywords("Droit").is_none());
    }

    #[test]
    fn test_from_reader_csv() {
        let csv = "Major,Keyword,Source\n\
                   Informatique,Développeur,manual\n\
                   \"Génie Civil\",\"travaux publics\",manual\n\
                   Informatique,logiciel,\n";
        let table = KeywordTable::from_reader(csv.as_bytes(), &normalizer()).unwrap();

        assert_eq!(table.categories(), vec!["Informatique", "Génie Civil"]);
        assert_eq!(table.keywords("Génie Civil").unwrap(), &["travaux publics".to_string()]);
        assert_eq!(table.keywords("Informatique").unwrap().len(), 2);
    }

    #[test]
    fn test_missing_column_is_config_error() {
        let csv = "Major,Word\nDroit,avocat\n";
        let err = KeywordTable::from_reader(csv.as_bytes(), &normalizer()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = KeywordTable::load("/nonexistent/majors.csv", &normalizer()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_contract_types() {
        let table = KeywordTable::contract_types();
        assert_eq!(table.categories(), vec!["Stage", "Alternance"]);
        assert_eq!(table.keywords("Stage").unwrap().len(), 2);
        assert_eq!(table.keywords("Alternance").unwrap().len(), 5);
    }
}
