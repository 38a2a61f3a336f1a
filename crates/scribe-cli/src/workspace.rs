//! Everything a command needs: settings, reject list, word indices and the engine

use crate::error::{CliError, CliResult};
use scribe_completion::{
    CharacterClass, ContentIndexBuilder, DirectoryDocumentSource, DocumentSource, IndexBuilder,
    IndexRebuilder, IndexStore, ProviderChain, RejectList, Settings, SettingsLoader,
    StaticDocumentSource, SuggestionEngine, TextBuffer, WordListBuilder,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Paths shared by every subcommand
#[derive(Debug, Clone, Default)]
pub struct WorkspaceOptions {
    pub config: Option<PathBuf>,
    pub word_lists: Option<PathBuf>,
    pub vault: Option<PathBuf>,
    pub reject_list: Option<PathBuf>,
}

pub struct Workspace {
    pub settings: Settings,
    pub reject: Arc<RejectList>,
    pub scanned: Arc<IndexStore>,
    pub word_lists: Arc<IndexStore>,
}

impl Workspace {
    /// Load settings and the reject list. Indices start empty.
    pub fn open(options: &WorkspaceOptions) -> CliResult<Self> {
        let settings = match &options.config {
            Some(path) => {
                let settings = SettingsLoader::load_from_file(path)?;
                info!("Loaded settings from {}", path.display());
                settings
            }
            None => Settings::default(),
        };

        let reject = match &options.reject_list {
            Some(path) => {
                let reject = RejectList::with_path(path.clone());
                reject.load()?;
                debug!("Loaded {} rejected words from {}", reject.len(), path.display());
                reject
            }
            None => RejectList::new(),
        };

        Ok(Self {
            settings,
            reject: Arc::new(reject),
            scanned: Arc::new(IndexStore::new()),
            word_lists: Arc::new(IndexStore::new()),
        })
    }

    pub fn character_class(&self) -> CliResult<CharacterClass> {
        Ok(CharacterClass::new(&self.settings.character_class)?)
    }

    async fn rebuild(&self, store: &Arc<IndexStore>, builder: Arc<dyn IndexBuilder>) -> CliResult<()> {
        let rebuilder = IndexRebuilder::new(store.clone(), builder, self.reject.clone());
        rebuilder.rebuild().await?;
        Ok(())
    }

    /// Build the content index from the vault, or from `document` when no vault is given
    pub async fn index_documents(&self, options: &WorkspaceOptions, document: Option<(&Path, &str)>) -> CliResult<()> {
        let source: Arc<dyn DocumentSource> = match (&options.vault, document) {
            (Some(vault), _) => Arc::new(DirectoryDocumentSource::new(vault)),
            (None, Some((path, text))) => Arc::new(StaticDocumentSource::single(path.display().to_string(), text)),
            (None, None) => return Ok(()),
        };
        let builder = ContentIndexBuilder::new(source, self.character_class()?, self.settings.min_word_length);
        self.rebuild(&self.scanned, Arc::new(builder)).await
    }

    /// Build the word-list index when a directory was given
    pub async fn index_word_lists(&self, options: &WorkspaceOptions) -> CliResult<()> {
        let Some(directory) = &options.word_lists else {
            return Ok(());
        };
        let builder = WordListBuilder::new(directory, self.settings.min_word_length);
        self.rebuild(&self.word_lists, Arc::new(builder)).await
    }

    /// Engine over the built-in provider chain
    pub fn engine(&self) -> CliResult<SuggestionEngine> {
        let chain = ProviderChain::with_builtin_providers(self.scanned.clone(), self.word_lists.clone());
        Ok(SuggestionEngine::new(self.settings.clone(), chain, self.reject.clone())?)
    }
}

/// Read a document into a buffer
pub async fn read_document(path: &Path) -> CliResult<TextBuffer> {
    let text = tokio::fs::read_to_string(path).await.map_err(|e| {
        CliError::invalid_argument(format!("cannot read {}: {}", path.display(), e))
    })?;
    Ok(TextBuffer::new(&text))
}
