//! Holocron - Star Wars catalog store
//!
//! This library crate exposes the command-line rendering helpers for
//! integration testing. Storage lives in `holocron-db`.

pub mod render;
