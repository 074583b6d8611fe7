use super::*;
use crate::history::HistoryStatus;
use crate::model::{CardPosition, Relation};
use crate::oplog::OpStatus;
use crate::vfs::PhysicalFileSystem;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

fn create_test_engine(settings: Settings) -> (Engine, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let engine = Engine::new(settings, Arc::new(PhysicalFileSystem));
    (engine, temp_dir)
}

fn card(title: &str) -> AtomicCard {
    AtomicCard {
        title: title.to_string(),
        description: format!("{title} in one line"),
        tags: vec!["concept".to_string()],
        content: format!("{title} content"),
        explanation: format!("{title} explanation"),
        relations: Vec::new(),
        position: CardPosition::default(),
    }
}

#[test]
fn rebuild_index_picks_up_corpus_from_disk() {
    let (mut engine, temp_dir) = create_test_engine(Settings::default());

    fs::write(temp_dir.path().join("Affordance.md"), "# Affordance").unwrap();
    fs::write(temp_dir.path().join("Mental Model.md"), "# Mental Model").unwrap();
    fs::write(temp_dir.path().join("not-a-note.txt"), "ignored").unwrap();

    engine.rebuild_index(temp_dir.path());

    assert_eq!(engine.index.len(), 2);
    assert_eq!(
        engine.resolver().find_matches("mental model"),
        vec!["Mental Model"]
    );
}

#[test]
fn rebuild_is_idempotent_through_the_resolver() {
    let (mut engine, temp_dir) = create_test_engine(Settings::default());

    fs::write(temp_dir.path().join("Affordance.md"), "# A").unwrap();
    fs::write(temp_dir.path().join("Affordance Theory.md"), "# AT").unwrap();

    engine.rebuild_index(temp_dir.path());
    let first = engine.resolver().find_matches("affordance theor");

    engine.rebuild_index(temp_dir.path());
    let second = engine.resolver().find_matches("affordance theor");

    assert_eq!(first, second);
    assert!(!first.is_empty());
}

#[test]
fn materialize_creates_cards_banner_and_one_transaction() {
    let (mut engine, temp_dir) = create_test_engine(Settings::default());

    let source = temp_dir.path().join("Design Notes.md");
    fs::write(&source, "raw notes").unwrap();

    let cards = vec![card("Affordance"), card("Signifier")];
    let outcome = engine.materialize_cards(&source, &cards);

    assert_eq!(outcome.failed, 0);
    assert_eq!(outcome.created.len(), 2);
    let folder = temp_dir.path().join("Design Notes-atomic");
    assert_eq!(outcome.folder, folder);

    let affordance = folder.join("Affordance.md");
    let body = fs::read_to_string(&affordance).unwrap();
    assert!(body.contains("- **Content**: Affordance content"));

    let source_after = fs::read_to_string(&source).unwrap();
    assert!(source_after.starts_with("raw notes"));
    assert!(source_after.contains("- [[Affordance]]"));
    assert!(source_after.contains("- [[Signifier]]"));

    assert_eq!(engine.oplog.undo_depth(), 1);

    let history = engine.history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].cards_created, 2);
    assert_eq!(history[0].status, HistoryStatus::Completed);
}

#[test]
fn undo_reverts_whole_run_and_redo_replays_it() {
    let (mut engine, temp_dir) = create_test_engine(Settings::default());

    let source = temp_dir.path().join("Source.md");
    fs::write(&source, "original").unwrap();

    engine.materialize_cards(&source, &[card("Alpha"), card("Beta")]);
    let alpha = temp_dir.path().join("Source-atomic").join("Alpha.md");
    let beta = temp_dir.path().join("Source-atomic").join("Beta.md");
    let alpha_body = fs::read_to_string(&alpha).unwrap();

    let outcome = engine.undo();
    // Two card creates plus the banner modify.
    assert_eq!(outcome.affected, 3);
    assert!(!alpha.exists());
    assert!(!beta.exists());
    assert_eq!(fs::read_to_string(&source).unwrap(), "original");

    let outcome = engine.redo();
    assert_eq!(outcome.affected, 3);
    assert_eq!(fs::read_to_string(&alpha).unwrap(), alpha_body);
    assert!(fs::read_to_string(&source).unwrap().contains("- [[Beta]]"));
}

#[test]
fn undo_restores_source_before_deleting_cards() {
    let (mut engine, temp_dir) = create_test_engine(Settings::default());

    let source = temp_dir.path().join("Source.md");
    fs::write(&source, "original").unwrap();

    engine.materialize_cards(&source, &[card("Alpha")]);

    let outcome = engine.undo();
    // Reverse order: the banner modify is the last forward op, so it is
    // reversed first.
    assert_eq!(outcome.reports[0].path, source);
    assert_eq!(outcome.reports[0].status, OpStatus::Applied);
}

#[test]
fn canvas_written_and_included_in_transaction_when_enabled() {
    let settings = Settings {
        generate_canvas: true,
        ..Settings::default()
    };
    let (mut engine, temp_dir) = create_test_engine(settings);

    let source = temp_dir.path().join("Source.md");
    fs::write(&source, "original").unwrap();

    let outcome = engine.materialize_cards(&source, &[card("Alpha")]);
    let canvas_path = temp_dir.path().join("Source-atomic").join("Source.canvas");
    assert!(outcome.created.contains(&canvas_path));

    let canvas_json = fs::read_to_string(&canvas_path).unwrap();
    assert!(canvas_json.contains("\"fromNode\""));
    assert!(canvas_json.contains("Alpha.md"));

    engine.undo();
    assert!(!canvas_path.exists(), "undo must also remove the canvas file");
}

#[test]
fn default_folder_setting_overrides_source_parent() {
    let (mut engine, temp_dir) = create_test_engine(Settings::default());
    engine.settings.default_folder = temp_dir
        .path()
        .join("cards")
        .to_string_lossy()
        .into_owned();

    let source = temp_dir.path().join("Source.md");
    fs::write(&source, "original").unwrap();

    let outcome = engine.materialize_cards(&source, &[card("Alpha")]);
    assert_eq!(
        outcome.folder,
        temp_dir.path().join("cards").join("Source-atomic")
    );
    assert!(outcome.created[0].starts_with(&outcome.folder));
}

#[test]
fn banner_suppressed_when_disabled() {
    let settings = Settings {
        add_banner: false,
        ..Settings::default()
    };
    let (mut engine, temp_dir) = create_test_engine(settings);

    let source = temp_dir.path().join("Source.md");
    fs::write(&source, "original").unwrap();

    engine.materialize_cards(&source, &[card("Alpha")]);
    assert_eq!(fs::read_to_string(&source).unwrap(), "original");

    // The transaction then only contains the card create.
    let outcome = engine.undo();
    assert_eq!(outcome.affected, 1);
}

#[test]
fn empty_card_list_records_nothing() {
    let (mut engine, temp_dir) = create_test_engine(Settings::default());

    let source = temp_dir.path().join("Source.md");
    fs::write(&source, "original").unwrap();

    let outcome = engine.materialize_cards(&source, &[]);
    assert!(outcome.created.is_empty());
    assert!(!engine.oplog.can_undo());
    assert!(engine.history().is_empty());
}

#[test]
fn hostile_card_titles_become_safe_file_names() {
    let (mut engine, temp_dir) = create_test_engine(Settings::default());

    let source = temp_dir.path().join("Source.md");
    fs::write(&source, "original").unwrap();

    let outcome = engine.materialize_cards(&source, &[card("A/B: C")]);
    assert_eq!(outcome.failed, 0);
    assert_eq!(
        outcome.created[0],
        temp_dir.path().join("Source-atomic").join("A-B- C.md")
    );
}

#[test]
fn resolved_relations_flow_into_rendered_cards() {
    let (mut engine, temp_dir) = create_test_engine(Settings::default());

    fs::write(temp_dir.path().join("Affordance.md"), "# A").unwrap();
    engine.rebuild_index(temp_dir.path());

    let mut unresolved = card("Signifier");
    unresolved.relations = vec![Relation::new("contrast", "affordance")];
    unresolved.relations = engine.resolver().resolve_relations(&unresolved.relations);

    let source = temp_dir.path().join("Source.md");
    fs::write(&source, "original").unwrap();
    let outcome = engine.materialize_cards(&source, &[unresolved]);

    let body = fs::read_to_string(&outcome.created[0]).unwrap();
    assert!(body.contains("contrast [[Affordance]]"));
}

#[test]
fn new_materialization_invalidates_redo_history() {
    let (mut engine, temp_dir) = create_test_engine(Settings::default());

    let source = temp_dir.path().join("Source.md");
    fs::write(&source, "original").unwrap();

    engine.materialize_cards(&source, &[card("Alpha")]);
    engine.undo();
    assert!(engine.oplog.can_redo());

    engine.materialize_cards(&source, &[card("Beta")]);
    assert!(!engine.oplog.can_redo());
}
