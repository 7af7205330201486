//! Pipeline stages for content summarization.
//!
//! Each submodule implements one part of the fetch → summarize sequence.
//! Stages return values rather than touching shared state, so each can be
//! tested on its own with a mock loader or model.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ fetch ──┬─▶ browser ──┐
//!                   └─▶ pdf ──────┴─▶ llm
//! (URL/path)   (text extraction)     (summary)
//! ```
//!
//! 1. [`input`]: validate URLs and paths, hold scoped temporary files
//! 2. [`browser`]: render a page in Chromium and read its visible text
//! 3. [`pdf`]: extract page text with lopdf on the blocking pool
//! 4. [`fetch`]: pick the right extractor and turn its result into a
//!    step outcome
//! 5. [`llm`]: truncate, prompt, and make the single model call

pub mod browser;
pub mod fetch;
pub mod input;
pub mod llm;
pub mod pdf;
