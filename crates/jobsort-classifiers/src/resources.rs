//! Linguistic resource bootstrap
//!
//! Stopword lists and the WordNet dictionary are NLTK data bundles. They are
//! looked up under the configured data directory and, when missing, downloaded
//! from the NLTK data mirror and unpacked in place. Call [`ensure_resources`]
//! once before building a pipeline.

use crate::lemmatizer::{
    FrenchPluralLemmatizer, IdentityLemmatizer, Lemmatizer, LemmatizerKind, WordNetLemmatizer,
};
use crate::normalizer::{Normalizer, Stopwords};
use jobsort_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Where linguistic data lives and where it is fetched from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceConfig {
    /// Root data directory; bundles are unpacked under `corpora/`
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Base URL of the NLTK package mirror
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Stopword list language
    #[serde(default = "default_language")]
    pub language: String,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            base_url: default_base_url(),
            language: default_language(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("jobsort")
}

fn default_base_url() -> String {
    "https://raw.githubusercontent.com/nltk/nltk_data/gh-pages/packages".to_string()
}

fn default_language() -> String {
    "french".to_string()
}

/// A downloadable data bundle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bundle {
    /// Stopword lists, one file per language
    Stopwords,
    /// WordNet dictionary files
    Wordnet,
}

impl Bundle {
    /// Bundle name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Stopwords => "stopwords",
            Self::Wordnet => "wordnet",
        }
    }

    /// Archive path relative to the mirror base URL
    pub fn archive(&self) -> &'static str {
        match self {
            Self::Stopwords => "corpora/stopwords.zip",
            Self::Wordnet => "corpora/wordnet.zip",
        }
    }

    /// Files whose presence under `corpora/` means the bundle is installed
    fn markers(&self, language: &str) -> Vec<PathBuf> {
        match self {
            Self::Stopwords => vec![Path::new("stopwords").join(language)],
            Self::Wordnet => vec![
                Path::new("wordnet").join("index.noun"),
                Path::new("wordnet").join("noun.exc"),
            ],
        }
    }

    /// Bundles needed for a lemmatizer choice
    pub fn required(lemmatizer: LemmatizerKind) -> Vec<Bundle> {
        let mut bundles = vec![Self::Stopwords];
        if lemmatizer.needs_wordnet() {
            bundles.push(Self::Wordnet);
        }
        bundles
    }
}

/// Downloads raw bundle archives
pub trait BundleFetcher: Send + Sync {
    /// Fetch the archive at `url`
    fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// Blocking HTTP fetcher
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    /// Create a fetcher with a 60 second timeout
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("jobsort/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| Error::resource_missing(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl BundleFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| Error::resource_missing(format!("Download of {} failed: {}", url, e)))?;

        let bytes = response
            .bytes()
            .map_err(|e| Error::resource_missing(format!("Download of {} failed: {}", url, e)))?;

        Ok(bytes.to_vec())
    }
}

/// Installed linguistic data, rooted at `<data_dir>/corpora`
#[derive(Debug, Clone)]
pub struct ResourceStore {
    corpora: PathBuf,
    language: String,
}

impl ResourceStore {
    /// Open a store without checking or downloading anything
    pub fn open(config: &ResourceConfig) -> Self {
        Self {
            corpora: config.data_dir.join("corpora"),
            language: config.language.clone(),
        }
    }

    /// Directory holding unpacked bundles
    pub fn corpora_dir(&self) -> &Path {
        &self.corpora
    }

    /// Whether every marker file of a bundle exists
    pub fn is_installed(&self, bundle: Bundle) -> bool {
        bundle
            .markers(&self.language)
            .iter()
            .all(|marker| self.corpora.join(marker).is_file())
    }

    /// Path of the stopword list for the configured language
    pub fn stopwords_path(&self) -> PathBuf {
        self.corpora.join("stopwords").join(&self.language)
    }

    /// WordNet dictionary directory
    pub fn wordnet_dir(&self) -> PathBuf {
        self.corpora.join("wordnet")
    }

    fn install(&self, bundle: Bundle, archive: Vec<u8>) -> Result<()> {
        std::fs::create_dir_all(&self.corpora)?;
        let mut zip = zip::ZipArchive::new(Cursor::new(archive)).map_err(|e| {
            Error::resource_missing(format!("Bundle {} is not a valid archive: {}", bundle.name(), e))
        })?;
        zip.extract(&self.corpora).map_err(|e| {
            Error::resource_missing(format!("Failed to unpack bundle {}: {}", bundle.name(), e))
        })?;

        if !self.is_installed(bundle) {
            return Err(Error::resource_missing(format!(
                "Bundle {} unpacked but expected files are missing under {}",
                bundle.name(),
                self.corpora.display()
            )));
        }
        Ok(())
    }
}

/// Make sure every bundle needed by `lemmatizer` is installed, downloading
/// missing ones over HTTP
pub fn ensure_resources(config: &ResourceConfig, lemmatizer: LemmatizerKind) -> Result<ResourceStore> {
    let store = ResourceStore::open(config);
    let missing: Vec<Bundle> = Bundle::required(lemmatizer)
        .into_iter()
        .filter(|b| !store.is_installed(*b))
        .collect();
    if missing.is_empty() {
        debug!("Linguistic resources present in {}", store.corpora_dir().display());
        return Ok(store);
    }

    let fetcher = HttpFetcher::new()?;
    ensure_resources_with(config, lemmatizer, &fetcher)
}

/// [`ensure_resources`] with an explicit fetcher
pub fn ensure_resources_with(
    config: &ResourceConfig,
    lemmatizer: LemmatizerKind,
    fetcher: &dyn BundleFetcher,
) -> Result<ResourceStore> {
    let store = ResourceStore::open(config);

    for bundle in Bundle::required(lemmatizer) {
        if store.is_installed(bundle) {
            debug!("Bundle {} already installed", bundle.name());
            continue;
        }

        let url = format!("{}/{}", config.base_url.trim_end_matches('/'), bundle.archive());
        info!("Downloading {} from {}", bundle.name(), url);
        let archive = fetcher.fetch(&url)?;
        store.install(bundle, archive)?;
        info!("Installed {} into {}", bundle.name(), store.corpora_dir().display());
    }

    Ok(store)
}

/// Stopwords and lemmatizer read from an installed store
pub struct LinguisticResources {
    stopwords: Stopwords,
    lemmatizer: Box<dyn Lemmatizer>,
}

impl LinguisticResources {
    /// Read the stopword list and lemmatizer data
    pub fn load(store: &ResourceStore, kind: LemmatizerKind) -> Result<Self> {
        let path = store.stopwords_path();
        let content = std::fs::read_to_string(&path).map_err(|e| {
            Error::resource_missing(format!("Cannot read stopwords {}: {}", path.display(), e))
        })?;
        let stopwords = Stopwords::parse(&content);

        let lemmatizer: Box<dyn Lemmatizer> = match kind {
            LemmatizerKind::Wordnet => {
                let wordnet = WordNetLemmatizer::from_dir(&store.wordnet_dir())?;
                debug!("Loaded {} WordNet noun lemmas", wordnet.len());
                Box::new(wordnet)
            }
            LemmatizerKind::FrenchPlural => Box::new(FrenchPluralLemmatizer),
            LemmatizerKind::Identity => Box::new(IdentityLemmatizer),
        };

        info!(
            "Loaded {} stopwords, lemmatizer {}",
            stopwords.len(),
            lemmatizer.name()
        );
        Ok(Self { stopwords, lemmatizer })
    }

    /// Build the normalizer
    pub fn into_normalizer(self) -> Result<Normalizer> {
        Normalizer::new(self.stopwords, self.lemmatizer)
    }
}
