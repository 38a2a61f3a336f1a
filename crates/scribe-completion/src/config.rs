//! Settings loading and validation for the completion engine
use crate::error::{CompletionError, CompletionResult};
use crate::keymap::PopupKeymap;
use crate::trigger::CharacterClass;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// How a matched word is turned into inserted text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WordInsertionMode {
    /// Case-sensitive matching, insert the stored word
    MatchCaseReplace,
    /// Case-insensitive matching, insert the stored word
    #[default]
    IgnoreCaseReplace,
    /// Case-insensitive matching, keep what was typed and append the rest of the word
    IgnoreCaseAppend,
}

impl WordInsertionMode {
    pub fn ignores_case(&self) -> bool {
        !matches!(self, WordInsertionMode::MatchCaseReplace)
    }
}

/// Per-provider switches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    pub callout_enabled: bool,
    pub file_scanner_enabled: bool,
    pub word_list_enabled: bool,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            callout_enabled: true,
            file_scanner_enabled: true,
            word_list_enabled: true,
        }
    }
}

/// Key binding overrides for the popup, e.g. `select_next: ["Ctrl+j", "Down"]`.
/// `None` keeps the built-in bindings for that action.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindingSettings {
    pub select_next: Option<Vec<String>>,
    pub select_previous: Option<Vec<String>>,
    pub apply: Option<Vec<String>>,
    pub dismiss: Option<Vec<String>>,
}

/// Read-only engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Body of a regex character class defining word characters
    pub character_class: String,
    pub max_look_back_distance: usize,
    pub auto_trigger: bool,
    pub auto_focus: bool,
    /// Shortest word kept by the index builders
    pub min_word_length: usize,
    /// Shortest query for which word providers answer
    pub min_word_trigger_length: usize,
    pub word_insertion_mode: WordInsertionMode,
    pub ignore_diacritics_when_filtering: bool,
    pub insert_space_after_complete: bool,
    /// Characters that mark a replacement as a snippet
    pub snippet_markers: String,
    pub providers: ProviderSettings,
    pub key_bindings: KeyBindingSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            character_class: "a-zA-ZöäüÖÄÜß".to_string(),
            max_look_back_distance: 50,
            auto_trigger: true,
            auto_focus: true,
            min_word_length: 2,
            min_word_trigger_length: 3,
            word_insertion_mode: WordInsertionMode::default(),
            ignore_diacritics_when_filtering: false,
            insert_space_after_complete: false,
            snippet_markers: "#~".to_string(),
            providers: ProviderSettings::default(),
            key_bindings: KeyBindingSettings::default(),
        }
    }
}

impl Settings {
    pub fn is_snippet_marker(&self, c: char) -> bool {
        self.snippet_markers.contains(c)
    }
}

/// Settings file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsFormat {
    Yaml,
    Json,
}

/// Loads [`Settings`] from YAML or JSON
pub struct SettingsLoader;

impl SettingsLoader {
    /// Load settings from a YAML file
    pub fn load_from_yaml(path: &Path) -> CompletionResult<Settings> {
        let content = std::fs::read_to_string(path)?;
        Self::load_from_string(&content, SettingsFormat::Yaml)
    }

    /// Load settings from a JSON file
    pub fn load_from_json(path: &Path) -> CompletionResult<Settings> {
        let content = std::fs::read_to_string(path)?;
        Self::load_from_string(&content, SettingsFormat::Json)
    }

    /// Load settings, picking the format from the file extension
    pub fn load_from_file(path: &Path) -> CompletionResult<Settings> {
        debug!("Loading completion settings from {}", path.display());
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::load_from_yaml(path),
            Some("json") => Self::load_from_json(path),
            _ => Err(CompletionError::config_error(format!(
                "Unsupported settings file '{}'. Use .yaml, .yml, or .json",
                path.display()
            ))),
        }
    }

    pub fn load_from_string(content: &str, format: SettingsFormat) -> CompletionResult<Settings> {
        let settings: Settings = match format {
            SettingsFormat::Yaml => serde_yaml::from_str(content)?,
            SettingsFormat::Json => serde_json::from_str(content)?,
        };
        Self::validate(&settings)?;
        Ok(settings)
    }

    /// Check that the settings can actually drive an engine
    pub fn validate(settings: &Settings) -> CompletionResult<()> {
        if settings.character_class.is_empty() {
            return Err(CompletionError::config_error(
                "Character class cannot be empty",
            ));
        }
        CharacterClass::new(&settings.character_class)?;

        if settings.snippet_markers.chars().any(char::is_whitespace) {
            return Err(CompletionError::config_error(
                "Snippet markers cannot contain whitespace",
            ));
        }

        PopupKeymap::from_settings(&settings.key_bindings)?;
        Ok(())
    }
}
