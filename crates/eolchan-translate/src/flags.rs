//! Per-channel flag bitset.

use std::ops::BitOr;

/// Channel behavior flags plus translation-internal carry state.
///
/// The public constants can be combined with `|` and queried through
/// [`ChannelFlags::contains`]. The carry bits are deliberately not
/// reachable through the public set/query surface: callers must not be
/// able to observe or corrupt mid-sequence translation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChannelFlags(u8);

impl ChannelFlags {
    /// Closing the channel must not close the owned stream.
    pub const PREVENT_CLOSE: ChannelFlags = ChannelFlags(1 << 0);
    /// The channel wants a buffering layer inserted above the transport.
    pub const NEED_BUFFER: ChannelFlags = ChannelFlags(1 << 1);
    /// Line reads accept any EOL character, not just the canonical one.
    pub const USE_ANY_EOL_CHAR: ChannelFlags = ChannelFlags(1 << 2);
    /// Line reads keep the EOL bytes instead of stripping them.
    pub const KEEP_EOL_CHARS: ChannelFlags = ChannelFlags(1 << 3);

    // Carry state for terminators split across I/O calls, kept strictly
    // per direction so the two translators can never corrupt each other.
    // NEED_LINE_FEED: crlf/platform input holds a lone trailing CR whose
    // LF decision is still pending. INPUT_SAW_CR: auto input consumed a
    // chunk-final CR whose LF (if any) must be skipped next call.
    // OUTPUT_SAW_CR: protocol output emitted a CR still owed its LF.
    pub(crate) const NEED_LINE_FEED: ChannelFlags = ChannelFlags(1 << 5);
    pub(crate) const INPUT_SAW_CR: ChannelFlags = ChannelFlags(1 << 6);
    pub(crate) const OUTPUT_SAW_CR: ChannelFlags = ChannelFlags(1 << 7);

    const PUBLIC_MASK: u8 = 0b0000_1111;

    /// No flags set.
    pub const fn empty() -> Self {
        ChannelFlags(0)
    }

    /// Set or clear the public bits named in `flags`. Carry bits in the
    /// query are ignored.
    pub fn set(&mut self, flags: ChannelFlags, on: bool) {
        let bits = flags.0 & Self::PUBLIC_MASK;
        if on {
            self.0 |= bits;
        } else {
            self.0 &= !bits;
        }
    }

    /// Query the public bits named in `flags`.
    ///
    /// With `all = true` every named bit must be set; with `all = false`
    /// at least one. An empty query is never satisfied.
    pub fn contains(self, flags: ChannelFlags, all: bool) -> bool {
        let bits = flags.0 & Self::PUBLIC_MASK;
        if bits == 0 {
            return false;
        }
        if all {
            self.0 & bits == bits
        } else {
            self.0 & bits != 0
        }
    }

    pub(crate) fn need_line_feed(self) -> bool {
        self.0 & Self::NEED_LINE_FEED.0 != 0
    }

    pub(crate) fn set_need_line_feed(&mut self, on: bool) {
        if on {
            self.0 |= Self::NEED_LINE_FEED.0;
        } else {
            self.0 &= !Self::NEED_LINE_FEED.0;
        }
    }

    pub(crate) fn input_saw_cr(self) -> bool {
        self.0 & Self::INPUT_SAW_CR.0 != 0
    }

    pub(crate) fn set_input_saw_cr(&mut self, on: bool) {
        if on {
            self.0 |= Self::INPUT_SAW_CR.0;
        } else {
            self.0 &= !Self::INPUT_SAW_CR.0;
        }
    }

    pub(crate) fn output_saw_cr(self) -> bool {
        self.0 & Self::OUTPUT_SAW_CR.0 != 0
    }

    pub(crate) fn set_output_saw_cr(&mut self, on: bool) {
        if on {
            self.0 |= Self::OUTPUT_SAW_CR.0;
        } else {
            self.0 &= !Self::OUTPUT_SAW_CR.0;
        }
    }
}

impl BitOr for ChannelFlags {
    type Output = ChannelFlags;

    fn bitor(self, rhs: ChannelFlags) -> ChannelFlags {
        ChannelFlags(self.0 | rhs.0)
    }
}
