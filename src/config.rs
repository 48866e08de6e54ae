use crate::schema::ResourcePaths;
use clap::Args;
use std::path::PathBuf;

pub const DEFAULT_ENGINE_URL: &str = "http://localhost:9200";
pub const DEFAULT_INDEX: &str = "mayoc-index";
pub const DEFAULT_DOCUMENTS: &str = "./documents";
pub const DEFAULT_CORPUS_FILE: &str = "mplus_topics.json";
pub const DEFAULT_SYNONYMS_FILE: &str = "synonyms.csv";
pub const DEFAULT_COMPILED_SYNONYMS_FILE: &str = "solr_synonyms.txt";
pub const DEFAULT_STOPLIST_PATH: &str = "./stoplist.txt";
pub const DEFAULT_ID_FIELD: &str = "@id";

/// Runtime configuration shared by every subcommand.
///
/// Each flag falls back to an environment variable, then to the default.
#[derive(Debug, Clone, Args)]
pub struct Settings {
    /// Base URL of the search engine
    #[arg(long, env = "ENGINE_URL", default_value = DEFAULT_ENGINE_URL, global = true)]
    pub engine_url: String,

    /// Name of the index holding the topics
    #[arg(long, env = "INDEX_NAME", default_value = DEFAULT_INDEX, global = true)]
    pub index: String,

    /// Directory holding the corpus and word lists
    #[arg(long, env = "DOCUMENT_DIR", default_value = DEFAULT_DOCUMENTS, global = true)]
    pub documents: PathBuf,

    /// Corpus file (JSON array of topics), relative to the documents directory
    #[arg(long, env = "CORPUS_FILE", default_value = DEFAULT_CORPUS_FILE, global = true)]
    pub corpus_file: String,

    /// Two-column key,term synonym source, relative to the documents directory
    #[arg(long, env = "SYNONYMS_FILE", default_value = DEFAULT_SYNONYMS_FILE, global = true)]
    pub synonyms_file: String,

    /// Compiled synonym list, written to the documents directory
    #[arg(
        long,
        env = "COMPILED_SYNONYMS_FILE",
        default_value = DEFAULT_COMPILED_SYNONYMS_FILE,
        global = true
    )]
    pub compiled_synonyms_file: String,

    /// Stopword list as the engine resolves it
    #[arg(long, env = "STOPLIST_PATH", default_value = DEFAULT_STOPLIST_PATH, global = true)]
    pub stoplist_path: String,

    /// Record attribute used as the document id
    #[arg(long, env = "ID_FIELD", default_value = DEFAULT_ID_FIELD, global = true)]
    pub id_field: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            engine_url: DEFAULT_ENGINE_URL.to_string(),
            index: DEFAULT_INDEX.to_string(),
            documents: PathBuf::from(DEFAULT_DOCUMENTS),
            corpus_file: DEFAULT_CORPUS_FILE.to_string(),
            synonyms_file: DEFAULT_SYNONYMS_FILE.to_string(),
            compiled_synonyms_file: DEFAULT_COMPILED_SYNONYMS_FILE.to_string(),
            stoplist_path: DEFAULT_STOPLIST_PATH.to_string(),
            id_field: DEFAULT_ID_FIELD.to_string(),
        }
    }
}

impl Settings {
    pub fn corpus_path(&self) -> PathBuf {
        self.documents.join(&self.corpus_file)
    }

    pub fn synonyms_source(&self) -> PathBuf {
        self.documents.join(&self.synonyms_file)
    }

    pub fn compiled_synonyms_path(&self) -> PathBuf {
        self.documents.join(&self.compiled_synonyms_file)
    }

    /// Engine-side references for the analysis filters.
    pub fn resource_paths(&self) -> ResourcePaths {
        ResourcePaths {
            stopwords_path: self.stoplist_path.clone(),
            synonyms_path: format!("./{}", self.compiled_synonyms_file),
        }
    }
}
