//! # article_introduction_generator
//!
//! Structured paper notes in, LLM-drafted Introduction section out.
//!
//! ## Modules
//!
//! - [`document`] - Paper metadata document and its JSON file format
//! - [`config`] - JSON configuration files with defaults filled in
//! - [`editor`] - Form state driven by [`editor::Action`]s
//! - [`prompts`] - System and user prompts for the introduction
//! - [`llm`] - OpenAI-compatible chat-completion client
//! - [`runner`] - Single-flight background generation
//! - [`desktop`] - Launcher entries, external opener and clipboard
//! - [`tui`] - Terminal front end
//! - [`error`] - Custom error types
//!
//! ## Usage
//!
//! ```rust,no_run
//! use article_introduction_generator::{document::PaperIntroductionDocument, prompts};
//!
//! fn main() -> article_introduction_generator::Result<()> {
//!     let document = PaperIntroductionDocument::load(std::path::Path::new("paper.intro.json"))?;
//!     println!("{}", prompts::build_text_only(&document)?);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod desktop;
pub mod document;
pub mod editor;
pub mod error;
pub mod llm;
pub mod prompts;
pub mod runner;
pub mod tui;

pub use error::{IntroError, Result};
