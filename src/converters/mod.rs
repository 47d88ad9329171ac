//! Format converters
//!
//! This module contains converters from MusicXML to the MSR score model.

pub mod musicxml;
