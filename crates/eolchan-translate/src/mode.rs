//! Translation modes and the environment-mode resolver.

use std::fmt;
use std::str::FromStr;

/// The single in-memory byte representing "end of line" inside a channel.
pub const CANONICAL_NEWLINE: u8 = b'\n';

pub(crate) const CARRIAGE_RETURN: u8 = b'\r';
pub(crate) const LINE_FEED: u8 = b'\n';

/// How line terminators are rewritten between the channel and the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslationMode {
    /// No rewriting in either direction.
    Binary,
    /// `\n` terminators; identity, since `\n` is already canonical.
    Lf,
    /// `\r` terminators.
    Cr,
    /// `\r\n` terminators, recognized exactly.
    CrLf,
    /// The platform's terminator convention.
    Platform,
    /// Input only: `\r`, `\n`, or `\r\n` all accepted as one terminator.
    Auto,
    /// Output only: strict `\r\n` pairing for line-oriented protocols.
    Protocol,
    /// Resolved per direction against the host convention; never seen
    /// by a translator.
    Environment,
}

/// Direction of a translate call, viewed from the channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
}

impl TranslationMode {
    /// Resolve `Environment` to a concrete mode for `direction`.
    ///
    /// Pure function of the configured mode and the host OS family;
    /// every concrete mode resolves to itself. Cheap enough to call
    /// once per translate invocation.
    pub fn resolve(self, direction: Direction) -> TranslationMode {
        match (self, direction) {
            (TranslationMode::Environment, Direction::Input) => {
                if cfg!(windows) {
                    TranslationMode::CrLf
                } else {
                    TranslationMode::Lf
                }
            }
            (TranslationMode::Environment, Direction::Output) => {
                if cfg!(windows) {
                    TranslationMode::Protocol
                } else {
                    TranslationMode::Lf
                }
            }
            (mode, _) => mode,
        }
    }

    /// Short lowercase name, matching what `FromStr` accepts.
    pub fn as_str(self) -> &'static str {
        match self {
            TranslationMode::Binary => "binary",
            TranslationMode::Lf => "lf",
            TranslationMode::Cr => "cr",
            TranslationMode::CrLf => "crlf",
            TranslationMode::Platform => "platform",
            TranslationMode::Auto => "auto",
            TranslationMode::Protocol => "protocol",
            TranslationMode::Environment => "environment",
        }
    }
}

impl fmt::Display for TranslationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TranslationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "binary" => Ok(TranslationMode::Binary),
            "lf" => Ok(TranslationMode::Lf),
            "cr" => Ok(TranslationMode::Cr),
            "crlf" => Ok(TranslationMode::CrLf),
            "platform" => Ok(TranslationMode::Platform),
            "auto" => Ok(TranslationMode::Auto),
            "protocol" => Ok(TranslationMode::Protocol),
            "environment" => Ok(TranslationMode::Environment),
            other => Err(format!("unknown translation mode: {other}")),
        }
    }
}
