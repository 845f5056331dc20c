//! Rendering only: every widget reads from and writes to [`crate::state::AppState`].

pub mod map;
pub mod panels;
pub mod plot;
pub mod table;
