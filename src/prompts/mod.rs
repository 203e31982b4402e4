//! Prompt module for LLM-based operations.
//!
//! This module provides the prompt templates used to draft an Introduction.

pub mod introduction;

pub use introduction::*;
