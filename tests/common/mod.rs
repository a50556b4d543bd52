// Common test utilities: document strategies and editor fixtures

use proptest::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;
use taskdesk::document::{
    BlockKind, Document, FlatBlock, HeadingLevel, Mark, MarkSet, Run, TextBlock,
};
use taskdesk::editor::Editor;
use taskdesk::selection::{Position, Selection};
use taskdesk::state::EditorState;

/// State over `html` with the given selection.
#[allow(dead_code)]
pub fn state_at(html: &str, selection: Selection) -> EditorState {
    let mut state = EditorState::parse(html);
    state.selection = selection;
    state
}

#[allow(dead_code)]
pub fn span(from: (usize, usize), to: (usize, usize)) -> Selection {
    Selection::new(Position::new(from.0, from.1), Position::new(to.0, to.1))
}

/// Editor whose emitted values are collected in order.
#[allow(dead_code)]
pub fn recording_editor(value: &str) -> (Editor, Rc<RefCell<Vec<String>>>) {
    let emitted = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&emitted);
    let editor = Editor::new(value, move |html| sink.borrow_mut().push(html.to_string()));
    (editor, emitted)
}

#[allow(dead_code)]
pub mod strategies {
    use super::*;

    pub fn mark_set() -> impl Strategy<Value = MarkSet> {
        (
            any::<bool>(),
            any::<bool>(),
            prop::option::of(prop::sample::select(vec!["12px", "20px", "24px", "20px;", " 16px "])),
            prop::option::of(prop::sample::select(vec![
                "Georgia, serif",
                "Verdana",
                "'Times New Roman', serif",
                "\"Courier New\"; monospace",
            ])),
        )
            .prop_map(|(bold, italic, size, family)| {
                let mut marks = MarkSet::new();
                if bold {
                    marks.insert(Mark::bold());
                }
                if italic {
                    marks.insert(Mark::italic());
                }
                marks.set_attr("fontSize", size);
                marks.set_attr("fontFamily", family);
                marks
            })
    }

    pub fn run() -> impl Strategy<Value = Run> {
        (prop_oneof!["[a-z&<>]{1,4}( [a-z]{1,3})?", "\\PC{1,6}"], mark_set()).prop_map(|(text, marks)| Run::new(text, marks))
    }

    pub fn block_kind() -> impl Strategy<Value = BlockKind> {
        prop_oneof![
            3 => Just(BlockKind::Paragraph),
            1 => (HeadingLevel::MIN..=HeadingLevel::MAX)
                .prop_filter_map("heading level", HeadingLevel::new)
                .prop_map(BlockKind::Heading),
        ]
    }

    pub fn flat_block() -> impl Strategy<Value = FlatBlock> {
        (
            block_kind(),
            prop::collection::vec(run(), 0..4),
            0usize..3,
            any::<bool>(),
        )
            .prop_map(|(kind, runs, depth, starts_item)| FlatBlock {
                block: TextBlock::new(kind, runs),
                depth,
                starts_item,
            })
    }

    /// Normalized documents with nested lists, headings and marked runs.
    pub fn document() -> impl Strategy<Value = Document> {
        prop::collection::vec(flat_block(), 1..6).prop_map(Document::from_flat)
    }

    fn position_in(lens: Vec<usize>) -> impl Strategy<Value = Position> {
        (0..lens.len()).prop_flat_map(move |block| {
            (0..=lens[block]).prop_map(move |offset| Position::new(block, offset))
        })
    }

    /// A document together with a selection that resolves in it.
    pub fn document_with_selection() -> impl Strategy<Value = (Document, Selection)> {
        document().prop_flat_map(|doc| {
            let lens: Vec<usize> = doc.text_blocks().iter().map(|b| b.len()).collect();
            (Just(doc), position_in(lens.clone()), position_in(lens))
                .prop_map(|(doc, anchor, head)| (doc, Selection::new(anchor, head)))
        })
    }
}
