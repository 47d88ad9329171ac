//! MusicXML → MSR WASM API
//!
//! This module provides the JavaScript-facing API of the translator.
//!
//! # Module Structure
//!
//! - `helpers`: Shared utilities for serialization, error handling, and logging
//! - `translate`: MusicXML → MSR translation entry points

pub mod helpers;
pub mod translate;

pub use translate::{translate_musicxml_to_msr_json, translate_musicxml_to_msr_object};
