//! Bidirectional end-of-line translation for byte-stream channels.
//!
//! This is the core value-add layer of eolchan. A channel decorator
//! rewrites line terminators between a canonical in-memory form and
//! whatever convention the outside world expects:
//! - seven translation modes per direction, resolved against the host
//!   convention when configured as `environment`
//! - carry state so a terminator split across two I/O calls is never
//!   corrupted, with no look-ahead beyond the current buffer
//! - a consumable poll-time budget for cooperative readiness checks
//!
//! Byte-exact and total: every byte sequence has a defined output and
//! translation itself can never fail.

pub mod budget;
pub mod channel;
pub mod error;
pub mod flags;
pub mod input;
pub mod mode;
pub mod output;

pub use budget::{consume_poll_chunk, MIN_POLL_CHUNK};
pub use channel::EolChannel;
pub use error::{ChannelError, Result};
pub use flags::ChannelFlags;
pub use input::translate_input;
pub use mode::{Direction, TranslationMode, CANONICAL_NEWLINE};
pub use output::{eol_byte_count, translate_output};
