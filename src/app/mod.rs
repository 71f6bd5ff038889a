//! Application orchestration — state management, event loop plumbing,
//! input handling and background thumbnail decoding.

pub mod event;
pub mod handler;
pub mod state;
pub mod thumbs;
