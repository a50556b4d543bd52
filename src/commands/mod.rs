// src/commands/mod.rs - State transforms behind the editing commands

pub mod blocks;
pub mod marks;
pub mod text;

pub use text::{delete_backward, insert_text, select_all, split_block};
