//! End-to-End Test Suite: Note Completion Workflows
//!
//! Drives the CLI commands over real files on disk: word lists, a notes vault, a settings
//! file and a persisted reject list, the way a user would combine them.

use clap::Parser;
use scribe_cli::{
    commands::{complete::CompleteCommand, scan::ScanCommand, suggest::SuggestCommand},
    router::{Cli, CommandRouter, Commands},
    workspace::{Workspace, WorkspaceOptions},
};
use scribe_completion::{
    Position, SettingsFormat, SettingsLoader, TextBuffer, TriggerOutcome,
};
use scribe_integration_tests::NotesFixture;

fn fixture() -> NotesFixture {
    NotesFixture::new().expect("Failed to create temp directory")
}

/// Word lists, a vault, and a reject list combine into one popup
#[tokio::test]
async fn test_vault_and_word_lists_with_reject_list() {
    let notes = fixture();
    let root = notes.root();
    notes.write("lists/en.txt", "wonder\nwonderful\nwork\n").unwrap();
    notes.write("vault/daily.md", "# Daily\n\nA wondrous day of work.").unwrap();
    notes.write("reject.txt", "work\n").unwrap();
    notes.write("draft.md", "Today I feel won").unwrap();

    let options = WorkspaceOptions {
        word_lists: Some(root.join("lists")),
        vault: Some(root.join("vault")),
        reject_list: Some(root.join("reject.txt")),
        ..WorkspaceOptions::default()
    };

    let report = SuggestCommand::new(root.join("draft.md"), 0, 16, options.clone())
        .run()
        .await
        .expect("suggest failed")
        .expect("expected suggestions");
    let names: Vec<_> = report
        .suggestions
        .iter()
        .map(|s| s.display_name.as_str())
        .collect();
    // vault words come before word-list words
    assert_eq!(names, vec!["wondrous", "wonder", "wonderful"]);

    let completed = CompleteCommand::new(root.join("draft.md"), 0, 16, 3, options)
        .run()
        .await
        .expect("complete failed")
        .expect("expected a completion");
    assert_eq!(completed.line, "Today I feel wonderful");
    assert_eq!(completed.cursor, Position::new(0, 22));
}

/// A settings file switches the insertion mode and the trigger length
#[tokio::test]
async fn test_settings_file_changes_behaviour() {
    let notes = fixture();
    let root = notes.root();
    let config = "min_word_trigger_length: 2\nword_insertion_mode: ignore_case_append\n";
    notes.write("scribe.yaml", config).unwrap();
    notes.write("lists/en.txt", "example\n").unwrap();
    notes.write("draft.md", "EX").unwrap();

    assert!(SettingsLoader::load_from_string(config, SettingsFormat::Yaml).is_ok());

    let options = WorkspaceOptions {
        config: Some(root.join("scribe.yaml")),
        word_lists: Some(root.join("lists")),
        ..WorkspaceOptions::default()
    };
    let completed = CompleteCommand::new(root.join("draft.md"), 0, 2, 1, options)
        .run()
        .await
        .expect("complete failed")
        .expect("expected a completion");

    // the typed casing survives append mode
    assert_eq!(completed.applied, "EXample");
    assert_eq!(completed.line, "EXample");
}

/// Callouts block word suggestions inside block quotes
#[tokio::test]
async fn test_callout_completion_in_block_quote() {
    let notes = fixture();
    let root = notes.root();
    notes.write("lists/en.txt", "tipping\n").unwrap();
    notes.write("draft.md", "> [!tip").unwrap();

    let options = WorkspaceOptions {
        word_lists: Some(root.join("lists")),
        ..WorkspaceOptions::default()
    };
    let completed = CompleteCommand::new(root.join("draft.md"), 0, 7, 1, options)
        .run()
        .await
        .expect("complete failed")
        .expect("expected a completion");

    assert_eq!(completed.applied, "tip");
    assert_eq!(completed.line, "> [!tip] ");
    assert_eq!(completed.cursor, Position::new(0, 9));
}

/// Rejecting from the popup is remembered by the next run
#[tokio::test]
async fn test_rejected_suggestion_stays_gone() {
    let notes = fixture();
    notes.write("lists/en.txt", "harbor\nharvest\nhardly\n").unwrap();
    let draft = notes.write("draft.md", "har").unwrap();
    let options = WorkspaceOptions {
        word_lists: Some(notes.path("lists")),
        reject_list: Some(notes.path("state/reject.txt")),
        ..WorkspaceOptions::default()
    };

    let workspace = Workspace::open(&options).expect("open failed");
    workspace.index_word_lists(&options).await.expect("word lists failed");
    workspace
        .index_documents(&options, Some((draft.as_path(), "har")))
        .await
        .expect("scan failed");
    let mut engine = workspace.engine().expect("engine failed");
    let buffer = TextBuffer::new("har");

    assert_eq!(
        engine.trigger_manually(&buffer, Position::new(0, 3)),
        TriggerOutcome::Opened(3)
    );
    let rejected = engine.reject_selected().expect("reject failed");
    assert_eq!(rejected.as_deref(), Some("harbor"));
    assert_eq!(
        std::fs::read_to_string(notes.path("state/reject.txt")).unwrap(),
        "harbor\n"
    );

    let report = SuggestCommand::new(draft, 0, 3, options)
        .run()
        .await
        .expect("suggest failed")
        .expect("expected suggestions");
    let names: Vec<_> = report
        .suggestions
        .iter()
        .map(|s| s.display_name.as_str())
        .collect();
    assert_eq!(names, vec!["hardly", "harvest"]);
}

/// `scribe scan` sees every note in the vault
#[tokio::test]
async fn test_scan_command_over_vault() {
    let notes = fixture();
    let root = notes.root();
    notes.write("vault/a.md", "apple apricot").unwrap();
    notes.write("vault/sub/b.md", "banana").unwrap();
    notes.write("vault/skip.png", "pear").unwrap();

    let report = ScanCommand::new(root.join("vault"), WorkspaceOptions::default())
        .run()
        .await
        .expect("scan failed");

    assert_eq!(report.words, 3);
    assert_eq!(report.buckets.len(), 2);
    assert_eq!(report.buckets[0].first, 'a');
}

/// The router builds and runs a command from parsed arguments
#[tokio::test]
async fn test_router_dispatches_scan() {
    let notes = fixture();
    notes.write("note.md", "words here").unwrap();
    let dir = notes.root().display().to_string();

    let cli = Cli::try_parse_from(["scribe", "scan", dir.as_str(), "--quiet"])
        .expect("arguments should parse");
    assert!(matches!(cli.command, Commands::Scan { .. }));
    CommandRouter::dispatch(&cli).await.expect("dispatch failed");
}

