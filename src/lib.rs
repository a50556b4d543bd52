// lib.rs - Library root for the taskdesk description editor

pub mod cli;
pub mod command;
pub mod commands;
pub mod config;
pub mod config_discovery;
pub mod document;
pub mod editor;
pub mod extension;
pub mod selection;
pub mod state;
pub mod sync;
pub mod task;
pub mod toolbar;
