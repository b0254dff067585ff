//! Output-side EOL translation: canonical form to wire bytes.
//!
//! Each terminator byte can at most double during re-encoding, so the
//! destination reserve is `src.len() + 2 * (CR or LF bytes in src)`,
//! a safe upper bound for every growing mode.

use bytes::{BufMut, BytesMut};

use crate::flags::ChannelFlags;
use crate::mode::{Direction, TranslationMode, CANONICAL_NEWLINE, CARRIAGE_RETURN, LINE_FEED};

/// Number of CR or LF bytes in `src`; sizes the output reserve.
pub fn eol_byte_count(src: &[u8]) -> usize {
    src.iter()
        .filter(|&&byte| byte == CARRIAGE_RETURN || byte == LINE_FEED)
        .count()
}

/// Translate `src` (canonical-form bytes) into the wire terminator
/// convention, appending to `dst`. Returns the number of bytes appended.
pub fn translate_output(
    mode: TranslationMode,
    flags: &mut ChannelFlags,
    src: &[u8],
    dst: &mut BytesMut,
) -> usize {
    let mode = mode.resolve(Direction::Output);
    let before = dst.len();

    match mode {
        TranslationMode::Binary | TranslationMode::Lf => {
            dst.reserve(src.len());
            dst.put_slice(src);
        }
        TranslationMode::Cr => {
            dst.reserve(src.len());
            for &byte in src {
                dst.put_u8(if byte == CANONICAL_NEWLINE {
                    CARRIAGE_RETURN
                } else {
                    byte
                });
            }
        }
        TranslationMode::CrLf | TranslationMode::Platform | TranslationMode::Auto => {
            dst.reserve(src.len() + 2 * eol_byte_count(src));
            for &byte in src {
                if byte == CANONICAL_NEWLINE {
                    dst.put_u8(CARRIAGE_RETURN);
                }
                // Stray CR in canonical input passes through untouched;
                // this mode assumes canonical input contains none.
                dst.put_u8(byte);
            }
        }
        TranslationMode::Protocol => {
            dst.reserve(src.len() + 2 * eol_byte_count(src));
            translate_protocol(flags, src, dst);
        }
        // resolve() never yields Environment; an unresolved mode is a
        // caller logic error and translates nothing.
        TranslationMode::Environment => {}
    }

    dst.len() - before
}

/// Strict pairing: every terminator on the wire is exactly `\r\n`, even
/// when a `\r` and its paired `\n` arrive in separate write calls.
fn translate_protocol(flags: &mut ChannelFlags, src: &[u8], dst: &mut BytesMut) {
    for (i, &byte) in src.iter().enumerate() {
        match byte {
            CARRIAGE_RETURN => {
                if flags.output_saw_cr() {
                    // Close out the previous unfinished terminator first.
                    dst.put_u8(LINE_FEED);
                }
                dst.put_u8(CARRIAGE_RETURN);
                if i + 1 == src.len() {
                    // Chunk ends on the CR; complete the pair now rather
                    // than holding wire output back.
                    dst.put_u8(LINE_FEED);
                    flags.set_output_saw_cr(false);
                } else {
                    flags.set_output_saw_cr(true);
                }
            }
            LINE_FEED => {
                if !flags.output_saw_cr() {
                    dst.put_u8(CARRIAGE_RETURN);
                }
                dst.put_u8(LINE_FEED);
                flags.set_output_saw_cr(false);
            }
            other => {
                if flags.output_saw_cr() {
                    dst.put_u8(LINE_FEED);
                    flags.set_output_saw_cr(false);
                }
                dst.put_u8(other);
            }
        }
    }
}
