//! Core logic – the category table, the thumbnail scanner and host-OS
//! integration.
//!
//! Nothing in this module depends on any TUI or rendering crate.

pub mod category;
pub mod platform;
pub mod scan;
