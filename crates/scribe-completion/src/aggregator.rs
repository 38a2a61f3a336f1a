//! Merging provider output into one suggestion list
use crate::chain::ProviderChain;
use crate::config::Settings;
use crate::error::{CompletionError, CompletionResult};
use crate::reject::RejectList;
use crate::types::{Position, QueryContext, Span, Suggestion};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

/// Result of one aggregation cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregation {
    pub suggestions: Vec<Suggestion>,
    /// Corrected popup anchor start set by a blocking provider
    pub anchor_start: Option<Position>,
}

/// Runs the provider chain in order and merges the answers
pub struct Aggregator {
    chain: ProviderChain,
    reject: Arc<RejectList>,
}

impl Aggregator {
    pub fn new(chain: ProviderChain, reject: Arc<RejectList>) -> Self {
        Self { chain, reject }
    }

    pub fn chain(&self) -> &ProviderChain {
        &self.chain
    }

    pub fn reject_list(&self) -> &Arc<RejectList> {
        &self.reject
    }

    /// Ask every provider in order. `None` when nothing survives filtering.
    pub fn aggregate(&self, context: &QueryContext<'_>, settings: &Settings) -> Option<Aggregation> {
        let mut merged = Vec::new();
        let mut anchor_start = None;
        let trigger = trigger_span(context);

        for provider in self.chain.iter() {
            let answered = match provider.suggestions(context, settings) {
                Ok(answered) => answered,
                Err(e) => {
                    warn!("Provider {} failed: {}", provider.name(), e);
                    continue;
                }
            };
            let valid: Vec<Suggestion> = answered
                .into_iter()
                .filter(|s| match validate_overrides(s, trigger) {
                    Ok(()) => true,
                    Err(e) => {
                        warn!("Dropping suggestion from {}: {}", provider.name(), e);
                        false
                    }
                })
                .collect();

            if provider.blocks_all_other_providers() && !valid.is_empty() {
                anchor_start = valid.iter().find_map(|s| s.override_start);
                debug!(
                    "Provider {} answered with {} suggestions and blocks the rest",
                    provider.name(),
                    valid.len()
                );
                merged.extend(valid);
                break;
            }
            merged.extend(valid);
        }

        let suggestions: Vec<Suggestion> = dedup_by_display_name(merged)
            .into_iter()
            .filter(|s| !self.reject.has(&s.display_name))
            .collect();

        if suggestions.is_empty() {
            return None;
        }
        Some(Aggregation {
            suggestions,
            anchor_start,
        })
    }
}

/// Keep the first suggestion for each display name, preserving order
pub fn dedup_by_display_name(suggestions: Vec<Suggestion>) -> Vec<Suggestion> {
    let mut seen = HashSet::new();
    suggestions
        .into_iter()
        .filter(|s| seen.insert(s.display_name.clone()))
        .collect()
}

/// The span the typed query occupies, ending at the cursor
fn trigger_span(context: &QueryContext<'_>) -> Span {
    let cursor = context.cursor;
    let start = cursor.ch.saturating_sub(context.query.chars().count());
    Span::new(Position::new(cursor.line, start), cursor)
}

/// Override positions must stay next to the cursor line, and the span they
/// resolve to against the trigger must not be inverted
fn validate_overrides(suggestion: &Suggestion, trigger: Span) -> CompletionResult<()> {
    let cursor = trigger.end;
    let invalid = |reason: String| CompletionError::invalid_suggestion(&suggestion.display_name, reason);
    for (label, position) in [
        ("start", suggestion.override_start),
        ("end", suggestion.override_end),
    ] {
        if let Some(position) = position {
            if position.line.abs_diff(cursor.line) > 1 {
                return Err(invalid(format!(
                    "override {} {} is not next to cursor line {}",
                    label, position, cursor.line
                )));
            }
        }
    }
    let span = suggestion.replacement_span(trigger);
    if span.start > span.end {
        return Err(invalid(format!(
            "override span {}..{} is inverted",
            span.start, span.end
        )));
    }
    Ok(())
}
