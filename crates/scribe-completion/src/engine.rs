//! Suggestion engine
//!
//! Drives one editor surface: detects triggers, runs the aggregator, owns the popup and
//! applies the chosen suggestion. All operations are synchronous and run on the editor's
//! event path; word indices are rebuilt elsewhere and only read here.

use crate::aggregator::Aggregator;
use crate::chain::ProviderChain;
use crate::config::{Settings, SettingsLoader};
use crate::editor::{Editor, SnippetExpander};
use crate::error::CompletionResult;
use crate::keymap::{KeyCombo, PopupKeymap};
use crate::popup::{CloseReason, KeyOutcome, NavDirection, Popup};
use crate::reject::RejectList;
use crate::replace::{ApplyOutcome, ReplacementApplier};
use crate::trigger::{CharacterClass, TriggerDetector};
use crate::types::{Position, QueryContext, Span, Suggestion};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Result of a trigger attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// Swallowed by the just-closed guard
    Suppressed,
    /// No suggestions, or triggering is not allowed here; the popup is closed
    Closed,
    /// The popup shows this many suggestions
    Opened(usize),
}

/// Inline completion for a single editor
pub struct SuggestionEngine {
    settings: Settings,
    detector: TriggerDetector,
    aggregator: Aggregator,
    popup: Popup,
    applier: ReplacementApplier,
}

impl SuggestionEngine {
    /// Create an engine. Fails when the settings do not validate.
    pub fn new(settings: Settings, chain: ProviderChain, reject: Arc<RejectList>) -> CompletionResult<Self> {
        SettingsLoader::validate(&settings)?;
        let class = CharacterClass::new(&settings.character_class)?;
        let keymap = PopupKeymap::from_settings(&settings.key_bindings)?;
        info!(
            "Suggestion engine ready with providers {:?}",
            chain.names()
        );

        Ok(Self {
            detector: TriggerDetector::new(class, settings.max_look_back_distance),
            aggregator: Aggregator::new(chain, reject),
            popup: Popup::new(keymap),
            applier: ReplacementApplier::new(),
            settings,
        })
    }

    pub fn with_snippet_expander(mut self, expander: Arc<dyn SnippetExpander>) -> Self {
        self.applier = self.applier.with_snippet_expander(expander);
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn popup(&self) -> &Popup {
        &self.popup
    }

    pub fn reject_list(&self) -> &Arc<RejectList> {
        self.aggregator.reject_list()
    }

    /// Suggestions currently shown, empty while closed
    pub fn suggestions(&self) -> &[Suggestion] {
        self.popup.suggestions()
    }

    /// Called by the host after an edit that may start or continue a word
    pub fn on_trigger(&mut self, editor: &dyn Editor, cursor: Position, has_file: bool) -> TriggerOutcome {
        self.trigger(editor, cursor, has_file, false)
    }

    /// Explicit user request; ignores the auto-trigger setting
    pub fn trigger_manually(&mut self, editor: &dyn Editor, cursor: Position) -> TriggerOutcome {
        self.trigger(editor, cursor, true, true)
    }

    fn trigger(&mut self, editor: &dyn Editor, cursor: Position, has_file: bool, manual: bool) -> TriggerOutcome {
        if self.popup.take_just_closed() {
            debug!("Trigger at {} suppressed after close", cursor);
            return TriggerOutcome::Suppressed;
        }
        if !has_file || (!manual && !self.settings.auto_trigger) {
            self.popup.close(CloseReason::Invalidated);
            return TriggerOutcome::Closed;
        }

        let trigger = self.detector.detect(editor, cursor);
        let context = QueryContext {
            query: &trigger.query,
            separator: trigger.separator,
            cursor,
            has_file,
            editor,
        };

        match self.aggregator.aggregate(&context, &self.settings) {
            Some(aggregation) => {
                let span = Span::new(
                    aggregation.anchor_start.unwrap_or(trigger.span.start),
                    trigger.span.end,
                );
                let count = aggregation.suggestions.len();
                self.popup
                    .open(aggregation.suggestions, span, self.settings.auto_focus);
                debug!("Query {:?} at {} produced {} suggestions", trigger.query, cursor, count);
                TriggerOutcome::Opened(count)
            }
            None => {
                self.popup.close(CloseReason::Invalidated);
                TriggerOutcome::Closed
            }
        }
    }

    /// Offer a key press to the popup. Returns whether it was consumed.
    pub fn handle_key(&mut self, editor: &mut dyn Editor, combo: &KeyCombo) -> bool {
        match self.popup.handle_key(combo) {
            KeyOutcome::PassThrough => false,
            KeyOutcome::Navigated => true,
            KeyOutcome::Apply => {
                if let Err(e) = self.apply_selected(editor) {
                    warn!("Applying suggestion failed: {}", e);
                }
                true
            }
            KeyOutcome::Dismiss => {
                self.dismiss();
                true
            }
        }
    }

    pub fn navigate(&mut self, direction: NavDirection) -> bool {
        self.popup.navigate(direction)
    }

    /// Splice the highlighted suggestion into the editor and close the popup.
    /// `Ok(None)` when nothing is highlighted.
    pub fn apply_selected(&mut self, editor: &mut dyn Editor) -> CompletionResult<Option<ApplyOutcome>> {
        let Some(suggestion) = self.popup.selected().cloned() else {
            return Ok(None);
        };
        let trigger = self.popup.trigger_span();
        let result = self
            .applier
            .apply(editor, &suggestion, trigger, &self.settings);
        self.popup.close(CloseReason::Applied);

        let outcome = result?;
        info!("Applied {:?} at {}", suggestion.display_name, outcome.replaced.start);
        Ok(Some(outcome))
    }

    pub fn dismiss(&mut self) {
        self.popup.close(CloseReason::Dismissed);
    }

    /// Close the popup when the cursor left the trigger line or moved before the anchor.
    /// Returns whether it closed.
    pub fn on_cursor_moved(&mut self, cursor: Position) -> bool {
        if self.popup.invalidated_by(cursor) {
            self.popup.close(CloseReason::Invalidated);
            return true;
        }
        false
    }

    /// Add the highlighted suggestion to the reject list and drop it from the popup.
    /// The list is saved when it has a backing file.
    pub fn reject_selected(&mut self) -> CompletionResult<Option<String>> {
        let Some(removed) = self.popup.remove_selected() else {
            return Ok(None);
        };
        let reject = self.aggregator.reject_list();
        reject.add(removed.display_name.clone());
        if reject.path().is_some() {
            reject.save()?;
        }
        info!("Rejected suggestion {:?}", removed.display_name);
        Ok(Some(removed.display_name))
    }
}
