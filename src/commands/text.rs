// src/commands/text.rs - Typing: insertion, deletion and block splitting

use crate::command::CommandError;
use crate::document::{BlockKind, Document, FlatBlock, MarkSet, TextBlock};
use crate::selection::{Position, Selection};
use crate::state::EditorState;
use unicode_segmentation::UnicodeSegmentation;

/// Insert text at the selection, replacing selected content. The text takes
/// the stored marks, else the marks of the replaced or preceding text.
/// Newlines split the block.
pub fn insert_text(state: &EditorState, text: &str) -> Result<EditorState, CommandError> {
    state.check_selection()?;
    let marks = insertion_marks(state);
    let (mut doc, mut at) = delete_selection(&state.doc, &state.selection);

    for (idx, line) in text.split('\n').enumerate() {
        if idx > 0 {
            (doc, at) = split_at(&doc, at);
        }
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            continue;
        }
        doc = doc.apply_transform(|doc| {
            doc.edit_flat(|flat| {
                if let Some(entry) = flat.get_mut(at.block) {
                    entry.block.insert(at.offset, line, marks.clone());
                }
            })
        });
        at.offset += line.chars().count();
    }

    Ok(EditorState {
        doc,
        selection: Selection::cursor(at),
        stored_marks: None,
    })
}

/// Backspace: delete the selection, else the grapheme before the cursor.
/// At the start of a list item the item is lifted out one level; at the
/// start of any other block the block joins the previous one.
pub fn delete_backward(state: &EditorState) -> Result<EditorState, CommandError> {
    state.check_selection()?;
    let selection = state.selection;
    if !selection.is_collapsed() {
        let (doc, at) = delete_selection(&state.doc, &selection);
        return Ok(EditorState {
            doc,
            selection: Selection::cursor(at),
            stored_marks: None,
        });
    }

    let head = selection.head;
    let flat = state.doc.flatten();
    let Some(current) = flat.get(head.block) else {
        return Ok(state.clone());
    };

    if head.offset > 0 {
        let start = previous_grapheme_start(&current.block.text(), head.offset);
        let doc = state.doc.apply_transform(|doc| {
            doc.edit_flat(|flat| flat[head.block].block.remove(start..head.offset))
        });
        return Ok(EditorState {
            doc,
            selection: Selection::cursor(Position::new(head.block, start)),
            stored_marks: None,
        });
    }

    if current.depth > 0 && current.starts_item {
        let doc = state.doc.apply_transform(|doc| {
            doc.edit_flat(|flat| {
                let entry = &mut flat[head.block];
                entry.depth -= 1;
                entry.starts_item = entry.depth > 0;
            })
        });
        return Ok(EditorState {
            doc,
            selection,
            stored_marks: None,
        });
    }

    if head.block == 0 {
        return Ok(state.clone());
    }

    let prev_len = flat[head.block - 1].block.len();
    let doc = state.doc.apply_transform(|doc| {
        doc.edit_flat(|flat| {
            let removed = flat.remove(head.block);
            flat[head.block - 1].block.runs.extend(removed.block.runs);
        })
    });
    Ok(EditorState {
        doc,
        selection: Selection::cursor(Position::new(head.block - 1, prev_len)),
        stored_marks: None,
    })
}

/// Enter: split the block at the cursor. Splitting at the end of a block
/// starts a paragraph; inside a list the new block is a new item, and an
/// empty item is lifted out instead.
pub fn split_block(state: &EditorState) -> Result<EditorState, CommandError> {
    state.check_selection()?;
    let marks = state.cursor_marks();
    let (doc, at) = delete_selection(&state.doc, &state.selection);

    let in_empty_item = doc
        .flatten()
        .get(at.block)
        .is_some_and(|entry| entry.depth > 0 && entry.block.is_empty());
    if in_empty_item {
        let doc = doc.apply_transform(|doc| {
            doc.edit_flat(|flat| {
                let entry = &mut flat[at.block];
                entry.depth -= 1;
                entry.starts_item = entry.depth > 0;
            })
        });
        return Ok(EditorState {
            doc,
            selection: Selection::cursor(at),
            stored_marks: None,
        });
    }

    let (doc, at) = split_at(&doc, at);
    Ok(EditorState {
        doc,
        selection: Selection::cursor(at),
        stored_marks: (!marks.is_empty()).then_some(marks),
    })
}

pub fn select_all(state: &EditorState) -> EditorState {
    EditorState {
        doc: state.doc.clone(),
        selection: Selection::all(&state.doc),
        stored_marks: None,
    }
}

fn insertion_marks(state: &EditorState) -> MarkSet {
    if let Some(marks) = &state.stored_marks {
        return marks.clone();
    }
    match state.selected_runs().first() {
        Some(run) if !state.selection.is_collapsed() => run.marks.clone(),
        _ => state.cursor_marks(),
    }
}

/// Remove the selected content, joining the first and last touched blocks.
fn delete_selection(doc: &Document, selection: &Selection) -> (Document, Position) {
    let (from, to) = (selection.from(), selection.to());
    if selection.is_collapsed() {
        return (doc.clone(), from);
    }
    let doc = doc.apply_transform(|doc| {
        doc.edit_flat(|flat| {
            if from.block == to.block {
                flat[from.block].block.remove(from.offset..to.offset);
                return;
            }
            let tail = flat[to.block].block.split_off(to.offset);
            let first = &mut flat[from.block].block;
            first.split_off(from.offset);
            first.runs.extend(tail);
            flat.drain(from.block + 1..=to.block);
        })
    });
    (doc, from)
}

fn split_at(doc: &Document, at: Position) -> (Document, Position) {
    let doc = doc.apply_transform(|doc| {
        doc.edit_flat(|flat| {
            let Some(entry) = flat.get_mut(at.block) else {
                return;
            };
            let tail = entry.block.split_off(at.offset);
            let kind = if tail.iter().all(|r| r.text.is_empty()) {
                BlockKind::Paragraph
            } else {
                entry.block.kind
            };
            let next = FlatBlock {
                block: TextBlock::new(kind, tail),
                depth: entry.depth,
                starts_item: entry.depth > 0,
            };
            flat.insert(at.block + 1, next);
        })
    });
    (doc, Position::new(at.block + 1, 0))
}

/// Char offset where the grapheme cluster ending at `offset` begins.
fn previous_grapheme_start(text: &str, offset: usize) -> usize {
    let mut chars = 0;
    let mut start = 0;
    for grapheme in text.graphemes(true) {
        if chars >= offset {
            break;
        }
        start = chars;
        chars += grapheme.chars().count();
    }
    start
}
