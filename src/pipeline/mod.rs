//! Message intake and content pipeline.
//!
//! Extraction, type filtering, text cleanup and chunking. Everything here is
//! free of I/O; the command handler wires the pieces to the store and the
//! chat transport.

mod chunk;
mod cleanup;
mod extract;
mod filter;

pub use chunk::{part_tag, split_message};
pub use cleanup::clean_text;
pub use extract::{ExtractedContent, extract_content};
pub use filter::{FilterDecision, MEDIA_ONLY_NOTICE, STICKER_BLOCKED_NOTICE, check_content};
