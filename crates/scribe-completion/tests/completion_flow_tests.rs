//! End-to-end completion flows through the engine
use parking_lot::Mutex;
use scribe_completion::*;
use std::sync::Arc;

fn engine_over(index: WordIndex, settings: Settings, reject: Arc<RejectList>) -> SuggestionEngine {
    let chain = ProviderChain::new().with(Arc::new(WordListProvider::new(Arc::new(
        IndexStore::with_index(index),
    ))));
    SuggestionEngine::new(settings, chain, reject).unwrap()
}

fn shown(engine: &SuggestionEngine) -> Vec<String> {
    engine
        .suggestions()
        .iter()
        .map(|s| s.display_name.clone())
        .collect()
}

#[test]
fn test_wor_scenario_keeps_index_order_and_drops_rejected() {
    let index = WordIndex::from_buckets([(
        'w',
        vec!["world".to_string(), "work".to_string(), "wore".to_string()],
    )]);
    let mut engine = engine_over(
        index,
        Settings::default(),
        Arc::new(RejectList::from_names(["work"])),
    );
    let buffer = TextBuffer::new("he wor there");

    let outcome = engine.on_trigger(&buffer, Position::new(0, 6), true);

    assert_eq!(outcome, TriggerOutcome::Opened(2));
    assert_eq!(shown(&engine), vec!["world", "wore"]);
    assert_eq!(
        engine.popup().trigger_span(),
        Span::new(Position::new(0, 3), Position::new(0, 6))
    );
}

#[test]
fn test_apply_replaces_span_and_moves_cursor() {
    let mut buffer = TextBuffer::new("he wor there");
    let outcome = ReplacementApplier::new()
        .apply(
            &mut buffer,
            &Suggestion::new("hello"),
            Span::new(Position::new(0, 3), Position::new(0, 6)),
            &Settings::default(),
        )
        .unwrap();

    assert_eq!(buffer.text(), "he hello there");
    assert_eq!(outcome.cursor, Position::new(0, 8));
    assert_eq!(buffer.cursor(), Position::new(0, 8));
}

#[test]
fn test_markup_parity_inside_bold() {
    let context = markup_context("**hello ", " world**");
    assert!(context.bold);
    assert!(!context.italic);
    assert!(!context.code);

    assert_eq!(normalize_replacement("foo", context), "foo");
    assert_eq!(normalize_replacement("**foo**", context), "foo");
}

#[test]
fn test_apply_inside_italic_underscores() {
    let index = WordIndex::from_words(vec!["_emphasis_".to_string()]);
    let settings = Settings {
        character_class: "a-z_".to_string(),
        ..Settings::default()
    };
    let mut engine = engine_over(index, settings, Arc::new(RejectList::new()));
    let mut buffer = TextBuffer::new("_some _emp text_");

    engine.on_trigger(&buffer, Position::new(0, 10), true);
    engine.apply_selected(&mut buffer).unwrap();

    assert_eq!(buffer.text(), "_some emphasis text_");
}

#[test]
fn test_just_closed_guard_swallows_one_trigger() {
    let mut engine = engine_over(
        WordIndex::from_words(vec!["hello".to_string()]),
        Settings::default(),
        Arc::new(RejectList::new()),
    );
    let buffer = TextBuffer::new("hel");
    let cursor = Position::new(0, 3);

    engine.on_trigger(&buffer, cursor, true);
    let mut scratch = buffer.clone();
    assert!(engine.handle_key(&mut scratch, &KeyCombo::plain(Key::Escape)));

    assert_eq!(engine.on_trigger(&buffer, cursor, true), TriggerOutcome::Suppressed);
    assert_eq!(engine.on_trigger(&buffer, cursor, true), TriggerOutcome::Opened(1));
}

#[test]
fn test_unfocused_popup_lets_enter_through() {
    let settings = Settings {
        auto_focus: false,
        ..Settings::default()
    };
    let mut engine = engine_over(
        WordIndex::from_words(vec!["hello".to_string()]),
        settings,
        Arc::new(RejectList::new()),
    );
    let mut buffer = TextBuffer::new("hel");
    engine.on_trigger(&buffer, Position::new(0, 3), true);

    assert!(!engine.handle_key(&mut buffer, &KeyCombo::plain(Key::Enter)));
    assert!(!engine.handle_key(&mut buffer, &KeyCombo::plain(Key::Tab)));
    assert!(engine.handle_key(&mut buffer, &KeyCombo::plain(Key::Up)));
    assert!(engine.handle_key(&mut buffer, &KeyCombo::plain(Key::Tab)));
    assert_eq!(buffer.text(), "hello");
}

#[test]
fn test_custom_key_bindings() {
    let mut settings = Settings::default();
    settings.key_bindings.select_next = Some(vec!["Ctrl+j".to_string()]);
    let mut engine = engine_over(
        WordIndex::from_words(vec!["help".to_string(), "hello".to_string()]),
        settings,
        Arc::new(RejectList::new()),
    );
    let mut buffer = TextBuffer::new("hel");
    engine.on_trigger(&buffer, Position::new(0, 3), true);

    assert!(!engine.handle_key(&mut buffer, &KeyCombo::plain(Key::Down)));
    assert!(engine.handle_key(&mut buffer, &KeyCombo::ctrl('j')));
    assert_eq!(engine.popup().selected().unwrap().display_name, "hello");
}

#[derive(Default)]
struct RecordingExpander {
    calls: Mutex<Vec<(String, Position)>>,
}

impl SnippetExpander for RecordingExpander {
    fn expand(&self, inserted: &str, start: Position, editor: &mut dyn Editor) -> CompletionResult<()> {
        self.calls.lock().push((inserted.to_string(), start));
        editor.set_cursor(start);
        Ok(())
    }
}

#[test]
fn test_snippet_suggestion_is_handed_off() {
    let expander = Arc::new(RecordingExpander::default());
    let mut engine = engine_over(
        WordIndex::from_words(vec!["table#rows#".to_string()]),
        Settings::default(),
        Arc::new(RejectList::new()),
    )
    .with_snippet_expander(expander.clone());
    let mut buffer = TextBuffer::new("a tab");

    engine.on_trigger(&buffer, Position::new(0, 5), true);
    let outcome = engine.apply_selected(&mut buffer).unwrap().unwrap();

    assert_eq!(outcome.snippet, SnippetStatus::Expanded);
    assert_eq!(buffer.text(), "a table#rows#");
    assert_eq!(
        *expander.calls.lock(),
        vec![("table#rows#".to_string(), Position::new(0, 2))]
    );
}

#[test]
fn test_snippet_unsupported_by_editor_places_cursor() {
    let expander = Arc::new(RecordingExpander::default());
    let mut engine = engine_over(
        WordIndex::from_words(vec!["table~x~".to_string()]),
        Settings::default(),
        Arc::new(RejectList::new()),
    )
    .with_snippet_expander(expander.clone());
    let mut buffer = TextBuffer::new("tab").with_snippet_support(false);

    engine.on_trigger(&buffer, Position::new(0, 3), true);
    let outcome = engine.apply_selected(&mut buffer).unwrap().unwrap();

    assert_eq!(outcome.snippet, SnippetStatus::Unsupported);
    assert_eq!(buffer.cursor(), Position::new(0, 8));
    assert!(expander.calls.lock().is_empty());
}

#[test]
fn test_reject_selected_persists_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reject.txt");
    let reject = Arc::new(RejectList::with_path(path.clone()));
    let mut engine = engine_over(
        WordIndex::from_words(vec!["help".to_string(), "hello".to_string()]),
        Settings::default(),
        reject,
    );
    let buffer = TextBuffer::new("hel");
    engine.on_trigger(&buffer, Position::new(0, 3), true);

    assert_eq!(engine.reject_selected().unwrap(), Some("help".to_string()));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "help\n");

    let reloaded = RejectList::with_path(path);
    reloaded.load().unwrap();
    assert!(reloaded.has("help"));
}

#[tokio::test]
async fn test_rebuild_makes_new_words_visible() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("note.md"), "The glacier glimmered.").unwrap();

    let store = Arc::new(IndexStore::new());
    let reject = Arc::new(RejectList::new());
    let builder = ContentIndexBuilder::new(
        Arc::new(DirectoryDocumentSource::new(dir.path())),
        CharacterClass::new("a-zA-Z").unwrap(),
        2,
    );
    let rebuilder = IndexRebuilder::new(store.clone(), Arc::new(builder), reject.clone());

    let chain = ProviderChain::new().with(Arc::new(FileScannerProvider::new(store.clone())));
    let mut engine = SuggestionEngine::new(Settings::default(), chain, reject).unwrap();
    let buffer = TextBuffer::new("gla");

    assert_eq!(engine.on_trigger(&buffer, Position::new(0, 3), true), TriggerOutcome::Closed);

    rebuilder.rebuild().await.unwrap();

    assert_eq!(engine.on_trigger(&buffer, Position::new(0, 3), true), TriggerOutcome::Opened(1));
    assert_eq!(shown(&engine), vec!["glacier"]);
}
