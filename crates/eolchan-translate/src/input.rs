//! Input-side EOL translation: wire bytes to canonical form.
//!
//! Translation never increases byte count on input (every multi-byte
//! terminator collapses to one canonical newline), so the destination
//! reserve is exactly `src.len()`. Carry state in `flags` makes the
//! rewrite correct when a terminator is split across two reads.

use bytes::{BufMut, BytesMut};

use crate::flags::ChannelFlags;
use crate::mode::{Direction, TranslationMode, CANONICAL_NEWLINE, CARRIAGE_RETURN, LINE_FEED};

/// Translate `src` (raw bytes from the wire) into canonical form,
/// appending to `dst`. Returns the number of bytes appended.
pub fn translate_input(
    mode: TranslationMode,
    flags: &mut ChannelFlags,
    src: &[u8],
    dst: &mut BytesMut,
) -> usize {
    let mode = mode.resolve(Direction::Input);
    dst.reserve(src.len());
    let before = dst.len();

    match mode {
        TranslationMode::Binary | TranslationMode::Lf | TranslationMode::Protocol => {
            dst.put_slice(src);
        }
        TranslationMode::Cr => {
            for &byte in src {
                dst.put_u8(if byte == CARRIAGE_RETURN {
                    CANONICAL_NEWLINE
                } else {
                    byte
                });
            }
        }
        TranslationMode::CrLf | TranslationMode::Platform => {
            translate_crlf(flags, src, dst);
        }
        TranslationMode::Auto => {
            translate_auto(flags, src, dst);
        }
        // resolve() never yields Environment; an unresolved mode is a
        // caller logic error and translates nothing.
        TranslationMode::Environment => {}
    }

    dst.len() - before
}

/// Exact `\r\n` recognition. A lone CR that is not followed by LF is
/// passed through literally, not canonicalized (unlike `Auto`).
fn translate_crlf(flags: &mut ChannelFlags, src: &[u8], dst: &mut BytesMut) {
    let mut i = 0;

    if flags.need_line_feed() && !src.is_empty() {
        if src[0] == LINE_FEED {
            // Completes the CR/LF pair split across the call boundary.
            dst.put_u8(CANONICAL_NEWLINE);
        } else {
            dst.put_u8(src[0]);
        }
        i = 1;
        flags.set_need_line_feed(false);
    }

    while i < src.len() {
        let byte = src[i];
        if byte != CARRIAGE_RETURN {
            dst.put_u8(byte);
            i += 1;
            continue;
        }

        // Advance past the CR; what gets emitted depends on what follows.
        i += 1;
        if i == src.len() {
            // CR held back until the next call resolves it.
            flags.set_need_line_feed(true);
            break;
        }
        if src[i] == LINE_FEED {
            dst.put_u8(CANONICAL_NEWLINE);
            i += 1;
        } else {
            dst.put_u8(CARRIAGE_RETURN);
            // The non-LF byte is re-examined on the next iteration.
        }
    }
}

/// CR, LF, or CR+LF each count as one terminator and normalize to the
/// canonical newline.
fn translate_auto(flags: &mut ChannelFlags, src: &[u8], dst: &mut BytesMut) {
    let mut i = 0;

    if flags.input_saw_cr() && !src.is_empty() {
        if src[0] == LINE_FEED {
            // The newline for this terminator went out last call.
            i = 1;
        }
        flags.set_input_saw_cr(false);
    }

    while i < src.len() {
        let byte = src[i];
        if byte == CARRIAGE_RETURN {
            i += 1;
            if i == src.len() {
                flags.set_input_saw_cr(true);
            } else if src[i] == LINE_FEED {
                i += 1;
            }
            dst.put_u8(CANONICAL_NEWLINE);
        } else {
            dst.put_u8(byte);
            i += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(mode: TranslationMode, flags: &mut ChannelFlags, src: &[u8]) -> Vec<u8> {
        let mut dst = BytesMut::new();
        let n = translate_input(mode, flags, src, &mut dst);
        assert_eq!(n, dst.len());
        assert!(n <= src.len(), "input translation must never grow");
        dst.to_vec()
    }

    #[test]
    fn binary_and_lf_are_identity() {
        let data = b"line1\r\nline2\rline3\n\x00\xff";
        for mode in [
            TranslationMode::Binary,
            TranslationMode::Lf,
            TranslationMode::Protocol,
        ] {
            let mut flags = ChannelFlags::empty();
            assert_eq!(run(mode, &mut flags, data), data.to_vec());
        }
    }

    #[test]
    fn cr_mode_rewrites_every_cr() {
        let mut flags = ChannelFlags::empty();
        let out = run(TranslationMode::Cr, &mut flags, b"a\rb\r\nc");
        assert_eq!(out, b"a\nb\n\nc".to_vec());
    }

    #[test]
    fn crlf_collapses_pairs() {
        let mut flags = ChannelFlags::empty();
        let out = run(TranslationMode::CrLf, &mut flags, b"one\r\ntwo\r\n");
        assert_eq!(out, b"one\ntwo\n".to_vec());
        assert!(!flags.need_line_feed());
    }

    #[test]
    fn lone_cr_mid_chunk_passes_through_in_crlf_mode() {
        // crlf mode recognizes only the exact platform terminator; a CR
        // not followed by LF is data, not a line ending. Auto mode
        // treats the same bytes differently (see below).
        let mut flags = ChannelFlags::empty();
        let out = run(TranslationMode::CrLf, &mut flags, b"a\rb");
        assert_eq!(out, b"a\rb".to_vec());
    }

    #[test]
    fn crlf_pair_split_across_calls() {
        let mut flags = ChannelFlags::empty();
        let mut out = run(TranslationMode::CrLf, &mut flags, b"line1\r");
        assert_eq!(out, b"line1".to_vec());
        assert!(flags.need_line_feed());

        out.extend(run(TranslationMode::CrLf, &mut flags, b"\nline2"));
        assert_eq!(out, b"line1\nline2".to_vec());
        assert!(!flags.need_line_feed());
    }

    #[test]
    fn crlf_held_cr_followed_by_non_lf_chunk() {
        // The held CR is resolved by the next call's first byte: not an
        // LF, so the byte passes through and the pairing is abandoned.
        let mut flags = ChannelFlags::empty();
        let mut out = run(TranslationMode::CrLf, &mut flags, b"x\r");
        out.extend(run(TranslationMode::CrLf, &mut flags, b"y"));
        assert_eq!(out, b"xy".to_vec());
        assert!(!flags.need_line_feed());
    }

    #[test]
    fn crlf_cr_cr_lf_sequence() {
        // First CR is lone (next byte is CR, not LF); second pairs.
        let mut flags = ChannelFlags::empty();
        let out = run(TranslationMode::CrLf, &mut flags, b"a\r\r\nb");
        assert_eq!(out, b"a\r\nb".to_vec());
    }

    #[test]
    fn auto_normalizes_every_terminator_kind() {
        let mut flags = ChannelFlags::empty();
        let out = run(TranslationMode::Auto, &mut flags, b"a\r\nb\rc\nd");
        assert_eq!(out, b"a\nb\nc\nd".to_vec());
    }

    #[test]
    fn auto_is_boundary_split_invariant() {
        let mut flags = ChannelFlags::empty();
        let mut out = run(TranslationMode::Auto, &mut flags, b"a\r");
        assert_eq!(out, b"a\n".to_vec());
        assert!(flags.input_saw_cr());

        out.extend(run(TranslationMode::Auto, &mut flags, b"\nb\rc\nd"));
        assert_eq!(out, b"a\nb\nc\nd".to_vec());
        assert!(!flags.input_saw_cr());
    }

    #[test]
    fn auto_chunk_final_cr_not_followed_by_lf() {
        let mut flags = ChannelFlags::empty();
        let mut out = run(TranslationMode::Auto, &mut flags, b"a\r");
        out.extend(run(TranslationMode::Auto, &mut flags, b"b"));
        assert_eq!(out, b"a\nb".to_vec());
    }

    #[test]
    fn auto_carry_survives_empty_chunk() {
        let mut flags = ChannelFlags::empty();
        let mut out = run(TranslationMode::Auto, &mut flags, b"a\r");
        out.extend(run(TranslationMode::Auto, &mut flags, b""));
        assert!(flags.input_saw_cr());
        out.extend(run(TranslationMode::Auto, &mut flags, b"\nb"));
        assert_eq!(out, b"a\nb".to_vec());
    }

    #[test]
    fn environment_mode_behaves_as_its_resolution() {
        let mut env_flags = ChannelFlags::empty();
        let mut concrete_flags = ChannelFlags::empty();
        let resolved = TranslationMode::Environment.resolve(Direction::Input);

        let data = b"a\r\nb\rc\n";
        assert_eq!(
            run(TranslationMode::Environment, &mut env_flags, data),
            run(resolved, &mut concrete_flags, data),
        );
    }
}
