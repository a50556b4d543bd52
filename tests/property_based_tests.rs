// Property-based tests using proptest
// Random documents and selections exercise the editing invariants

mod common;

use common::strategies::{document, document_with_selection};
use proptest::prelude::*;
use taskdesk::command::Command;
use taskdesk::commands;
use taskdesk::document::{Document, HeadingLevel, MarkKind};
use taskdesk::selection::Selection;
use taskdesk::state::EditorState;
use taskdesk::sync::{Reconcile, SyncBridge};

fn all_commands() -> Vec<Command> {
    let mut cmds = vec![
        Command::ToggleBold,
        Command::ToggleItalic,
        Command::ToggleBulletList,
        Command::SetParagraph,
        Command::SetFontSize(Some("20px".into())),
        Command::SetFontSize(None),
        Command::SetFontFamily(Some("Georgia, serif".into())),
        Command::SetFontFamily(None),
        Command::SetFontSize(Some(" 16px;".into())),
        Command::SetFontFamily(Some("'Times New Roman', serif".into())),
    ];
    cmds.extend(HeadingLevel::all().map(Command::ToggleHeading));
    cmds
}

fn assert_runs_normalized(doc: &Document) -> Result<(), TestCaseError> {
    for block in doc.text_blocks() {
        for run in &block.runs {
            prop_assert!(!run.text.is_empty(), "empty run in {:?}", block);
        }
        for pair in block.runs.windows(2) {
            prop_assert_ne!(&pair[0].marks, &pair[1].marks);
        }
    }
    Ok(())
}

// Property: parsing the serialized form gives back the same document
proptest! {
    #[test]
    fn serialize_parse_round_trip(doc in document()) {
        let html = doc.serialize();
        let reparsed = Document::parse(&html);
        prop_assert_eq!(&reparsed, &doc);
        prop_assert_eq!(reparsed.serialize(), html);
    }
}

// Property: feeding the editor its own output back changes nothing
proptest! {
    #[test]
    fn echo_is_suppressed((doc, selection) in document_with_selection()) {
        let mut bridge = SyncBridge::new(&doc.serialize(), |_| {});
        let selected = bridge.state().with_selection(selection).unwrap();
        bridge.commit(selected);
        let before = bridge.state().clone();

        let echo = bridge.html();
        prop_assert_eq!(bridge.external_change(&echo), Reconcile::Unchanged);
        prop_assert_eq!(bridge.state(), &before);
    }
}

// Property: a mark toggle removes the mark only when every run had it
proptest! {
    #[test]
    fn toggle_symmetry(
        (doc, selection) in document_with_selection(),
        kind in prop::sample::select(vec![MarkKind::Bold, MarkKind::Italic]),
    ) {
        let mut state = EditorState::new(doc);
        state.selection = selection;
        let runs = state.selected_runs();
        prop_assume!(!runs.is_empty());
        let had_everywhere = runs.iter().all(|run| run.marks.contains(kind));

        let cmd = if kind == MarkKind::Bold { Command::ToggleBold } else { Command::ToggleItalic };
        let next = cmd.apply(&state).unwrap();
        prop_assert_eq!(next.selection, selection);
        for run in next.selected_runs() {
            prop_assert_eq!(run.marks.contains(kind), !had_everywhere);
        }
        prop_assert_eq!(next.doc.text(), state.doc.text());
    }
}

// Property: no command leaves empty or mergeable runs behind
proptest! {
    #[test]
    fn commands_keep_runs_merged(
        (doc, selection) in document_with_selection(),
        picks in prop::collection::vec(0usize..14, 1..6),
    ) {
        let cmds = all_commands();
        let mut state = EditorState::new(doc);
        state.selection = selection;
        for pick in picks {
            state = cmds[pick % cmds.len()].apply(&state).unwrap();
            prop_assert!(state.selection.resolves_in(&state.doc));
            assert_runs_normalized(&state.doc)?;
            prop_assert_eq!(Document::parse(&state.doc.serialize()), state.doc.clone());
        }
    }
}

// Property: typing operations keep the selection valid and runs merged
proptest! {
    #[test]
    fn typing_keeps_invariants(
        (doc, selection) in document_with_selection(),
        keys in prop::collection::vec(
            prop::sample::select(vec!["a", "xy", "\n", "\u{8}", "e\u{301}"]),
            1..8
        ),
    ) {
        let mut state = EditorState::new(doc);
        state.selection = selection;
        for key in keys {
            state = match key {
                "\n" => commands::split_block(&state).unwrap(),
                "\u{8}" => commands::delete_backward(&state).unwrap(),
                text => commands::insert_text(&state, text).unwrap(),
            };
            prop_assert!(state.selection.resolves_in(&state.doc));
            assert_runs_normalized(&state.doc)?;
            prop_assert_eq!(Document::parse(&state.doc.serialize()), state.doc.clone());
        }
    }
}

// Property: clearing font size never leaves a font-size declaration
proptest! {
    #[test]
    fn cleared_font_size_is_not_serialized(doc in document()) {
        let mut state = EditorState::new(doc);
        state.selection = Selection::all(&state.doc);
        let cleared = Command::SetFontSize(None).apply(&state).unwrap();
        prop_assert!(!cleared.doc.serialize().contains("font-size"));
    }
}

// Property: a selection past the end of the document is always rejected
proptest! {
    #[test]
    fn stale_selection_never_edits(doc in document(), extra in 1usize..5) {
        let mut state = EditorState::new(doc);
        let end = Selection::all(&state.doc).to();
        state.selection = Selection::cursor(taskdesk::selection::Position::new(end.block + extra, 0));
        for cmd in all_commands() {
            prop_assert!(cmd.apply(&state).is_err());
        }
        prop_assert!(commands::insert_text(&state, "a").is_err());
    }
}
