// src/commands/blocks.rs - Block type and list commands

use crate::document::{BlockKind, FlatBlock, HeadingLevel};
use crate::state::EditorState;

/// Text blocks touched by the selection, with their list context.
fn selected_blocks(state: &EditorState) -> Vec<FlatBlock> {
    let flat = state.doc.flatten();
    state
        .selection
        .blocks()
        .filter_map(|idx| flat.get(idx).cloned())
        .collect()
}

fn edit_selected(state: &EditorState, f: impl Fn(&mut FlatBlock)) -> EditorState {
    let selection = state.selection;
    let doc = state.doc.apply_transform(|doc| {
        doc.edit_flat(|flat| {
            for idx in selection.blocks() {
                if let Some(entry) = flat.get_mut(idx) {
                    f(entry);
                }
            }
        })
    });
    EditorState {
        doc,
        selection,
        stored_marks: None,
    }
}

/// Turn the selected blocks into paragraphs, keeping list membership.
pub fn set_paragraph(state: &EditorState) -> EditorState {
    edit_selected(state, |entry| entry.block.kind = BlockKind::Paragraph)
}

/// Headings of `level` revert to paragraphs when every selected block
/// already is one; otherwise every selected block becomes a top-level
/// heading of `level`, leaving any bullet list.
pub fn toggle_heading(state: &EditorState, level: HeadingLevel) -> EditorState {
    let target = BlockKind::Heading(level);
    let revert = selected_blocks(state)
        .iter()
        .all(|entry| entry.block.kind == target);
    edit_selected(state, |entry| {
        if revert {
            entry.block.kind = BlockKind::Paragraph;
        } else {
            entry.block.kind = target;
            entry.depth = 0;
            entry.starts_item = false;
        }
    })
}

/// Lift the selection one list level when it is entirely inside lists;
/// otherwise wrap every top-level selected block in a list item.
/// Wrapped headings become paragraphs.
pub fn toggle_bullet_list(state: &EditorState) -> EditorState {
    let lift = selected_blocks(state).iter().all(|entry| entry.depth > 0);
    edit_selected(state, |entry| {
        if lift {
            entry.depth -= 1;
            entry.starts_item = entry.depth > 0;
        } else if entry.depth == 0 {
            entry.depth = 1;
            entry.starts_item = true;
            entry.block.kind = BlockKind::Paragraph;
        }
    })
}
