use std::io::{ErrorKind, SeekFrom};
use std::time::Duration;

use bytes::BytesMut;
use eolchan_transport::RawStream;
use tracing::debug;

use crate::budget::consume_poll_chunk;
use crate::error::{ChannelError, Result};
use crate::flags::ChannelFlags;
use crate::input::translate_input;
use crate::mode::{Direction, TranslationMode};
use crate::output::translate_output;

/// Ceiling on a single raw read inside `populate_line_buffer`, so a
/// large seekable stream cannot force an unbounded allocation.
const LINE_READ_MAX: usize = 8 * 1024;

/// A stream decorator that translates line terminators in both
/// directions while carrying state across arbitrary chunk boundaries.
///
/// Sits between a script-visible channel and its byte transport:
/// everything read is rewritten into canonical newline form, everything
/// written is rewritten into the configured wire convention. The
/// decorator owns the stream; closing the channel closes it unless the
/// `PREVENT_CLOSE` flag hands it back instead.
///
/// Not thread-safe: a channel must not be driven concurrently for the
/// same direction from multiple threads.
pub struct EolChannel<T: RawStream> {
    stream: Option<T>,
    input_mode: TranslationMode,
    output_mode: TranslationMode,
    flags: ChannelFlags,
    poll_budget: Option<Duration>,
    scratch: BytesMut,
}

impl<T: RawStream> EolChannel<T> {
    /// Create a channel with both directions in `Environment` mode.
    pub fn new(stream: T) -> Self {
        Self::with_modes(
            stream,
            TranslationMode::Environment,
            TranslationMode::Environment,
        )
    }

    /// Create a channel with explicit per-direction modes.
    pub fn with_modes(stream: T, input_mode: TranslationMode, output_mode: TranslationMode) -> Self {
        Self {
            stream: Some(stream),
            input_mode,
            output_mode,
            flags: ChannelFlags::empty(),
            poll_budget: None,
            scratch: BytesMut::new(),
        }
    }

    /// Read from the stream and translate into canonical form.
    ///
    /// Returns the translated byte count, which is at most the raw
    /// count. A raw chunk consisting solely of a held-back terminator
    /// triggers another read rather than a misleading `Ok(0)`; zero is
    /// only returned at end of stream.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        loop {
            let stream = self.stream.as_mut().ok_or(ChannelError::Disposed)?;
            let read = loop {
                match stream.read(buf) {
                    Ok(n) => break n,
                    Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                    Err(err) => return Err(ChannelError::Io(err)),
                }
            };
            if read == 0 {
                return Ok(0);
            }

            self.scratch.clear();
            let produced =
                translate_input(self.input_mode, &mut self.flags, &buf[..read], &mut self.scratch);
            if produced == 0 {
                // Entire chunk was carry-held (e.g. a lone trailing CR).
                continue;
            }
            buf[..produced].copy_from_slice(&self.scratch);
            return Ok(produced);
        }
    }

    /// Translate canonical-form bytes and write them to the stream.
    ///
    /// Returns the canonical byte count consumed (all of `buf`); the
    /// wire may carry more bytes after terminator re-encoding.
    pub fn write(&mut self, buf: &[u8]) -> Result<usize> {
        let stream = self.stream.as_mut().ok_or(ChannelError::Disposed)?;

        self.scratch.clear();
        translate_output(self.output_mode, &mut self.flags, buf, &mut self.scratch);

        let mut offset = 0usize;
        while offset < self.scratch.len() {
            match stream.write(&self.scratch[offset..]) {
                Ok(0) => return Err(ChannelError::ConnectionClosed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(ChannelError::Io(err)),
            }
        }
        Ok(buf.len())
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        let stream = self.stream.as_mut().ok_or(ChannelError::Disposed)?;
        loop {
            match stream.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(ChannelError::Io(err)),
            }
        }
    }

    /// Seek, where the transport supports it.
    pub fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        let stream = self.stream.as_mut().ok_or(ChannelError::Disposed)?;
        stream.try_seek(pos).map_err(ChannelError::Io)
    }

    /// Current position, for seekable transports.
    pub fn position(&mut self) -> Result<u64> {
        self.seek(SeekFrom::Current(0))
    }

    /// Total stream length, for transports with a known length.
    pub fn len(&mut self) -> Result<Option<u64>> {
        let stream = self.stream.as_mut().ok_or(ChannelError::Disposed)?;
        match stream.remaining().map_err(ChannelError::Io)? {
            Some(remaining) => {
                let pos = stream.try_seek(SeekFrom::Current(0)).map_err(ChannelError::Io)?;
                Ok(Some(pos + remaining))
            }
            None => Ok(None),
        }
    }

    /// Configured mode for `direction` (possibly `Environment`).
    pub fn mode(&self, direction: Direction) -> TranslationMode {
        match direction {
            Direction::Input => self.input_mode,
            Direction::Output => self.output_mode,
        }
    }

    /// Reconfigure one direction. Carry state is deliberately not reset;
    /// changing modes mid-stream is the caller's responsibility.
    pub fn set_mode(&mut self, direction: Direction, mode: TranslationMode) {
        match direction {
            Direction::Input => self.input_mode = mode,
            Direction::Output => self.output_mode = mode,
        }
    }

    /// Set or clear public channel flags.
    pub fn set_flags(&mut self, flags: ChannelFlags, on: bool) {
        self.flags.set(flags, on);
    }

    /// Query public channel flags; `all` selects every-bit vs. any-bit.
    pub fn has_flags(&self, flags: ChannelFlags, all: bool) -> bool {
        self.flags.contains(flags, all)
    }

    /// Configure the readiness-poll budget. `None` disables polling.
    pub fn set_poll_budget(&mut self, budget: Option<Duration>) {
        self.poll_budget = budget;
    }

    /// Remaining readiness-poll budget.
    pub fn poll_budget(&self) -> Option<Duration> {
        self.poll_budget
    }

    /// Take one chunk out of the poll budget.
    pub fn consume_poll_chunk(&mut self) -> Option<Duration> {
        consume_poll_chunk(&mut self.poll_budget)
    }

    /// How many bytes, if any, are ready without blocking.
    ///
    /// Seekable streams report their known remaining length. Socket
    /// streams report immediately-ready bytes; when that is zero, one
    /// poll chunk is consumed to wait and re-check once. Everything
    /// else reports zero, meaning unknown: read one byte at a time.
    pub fn available_byte_count(&mut self) -> Result<usize> {
        let stream = self.stream.as_mut().ok_or(ChannelError::Disposed)?;

        if let Some(remaining) = stream.remaining().map_err(ChannelError::Io)? {
            return Ok(usize::try_from(remaining).unwrap_or(usize::MAX));
        }

        match stream.ready_bytes().map_err(ChannelError::Io)? {
            Some(0) => {
                if let Some(chunk) = consume_poll_chunk(&mut self.poll_budget) {
                    if stream.wait_readable(chunk).map_err(ChannelError::Io)? {
                        let ready = stream.ready_bytes().map_err(ChannelError::Io)?;
                        return Ok(ready.unwrap_or(0));
                    }
                }
                Ok(0)
            }
            Some(ready) => Ok(ready),
            None => Ok(0),
        }
    }

    /// Read up to `available_byte_count()` raw bytes (minimum one when
    /// availability is unknown), translate, and append to `out`.
    ///
    /// Returns `false` when the stream is gone or at end of stream.
    pub fn populate_line_buffer(&mut self, out: &mut BytesMut) -> Result<bool> {
        if self.stream.is_none() {
            return Ok(false);
        }
        let want = self.available_byte_count()?.clamp(1, LINE_READ_MAX);

        let Some(stream) = self.stream.as_mut() else {
            return Ok(false);
        };
        self.scratch.clear();
        self.scratch.resize(want, 0);
        let read = loop {
            match stream.read(&mut self.scratch[..want]) {
                Ok(n) => break n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(ChannelError::Io(err)),
            }
        };
        if read == 0 {
            return Ok(false);
        }

        let src = self.scratch.split_to(read);
        translate_input(self.input_mode, &mut self.flags, &src, out);
        Ok(true)
    }

    /// Close the channel and its owned stream. Idempotent.
    ///
    /// With `PREVENT_CLOSE` set, the stream is handed back un-closed
    /// instead; the channel is disposed either way.
    pub fn close(&mut self) -> Result<Option<T>> {
        match self.stream.take() {
            None => Ok(None),
            Some(mut stream) => {
                if self.flags.contains(ChannelFlags::PREVENT_CLOSE, true) {
                    debug!("close prevented; handing stream back");
                    Ok(Some(stream))
                } else {
                    stream.shutdown().map_err(ChannelError::Io)?;
                    debug!("channel closed");
                    Ok(None)
                }
            }
        }
    }

    /// Partial clone: a new channel over `stream`, copying modes, flags
    /// (carry state included) and the remaining poll budget.
    ///
    /// Used when a channel's transport is swapped, e.g. when a
    /// buffering layer is inserted above the raw stream.
    pub fn clone_onto_stream<U: RawStream>(&self, stream: U) -> EolChannel<U> {
        debug!("cloning channel state onto new stream");
        EolChannel {
            stream: Some(stream),
            input_mode: self.input_mode,
            output_mode: self.output_mode,
            flags: self.flags,
            poll_budget: self.poll_budget,
            scratch: BytesMut::new(),
        }
    }

    /// Borrow the underlying stream, if the channel is still open.
    pub fn get_ref(&self) -> Option<&T> {
        self.stream.as_ref()
    }

    /// Mutably borrow the underlying stream, if still open.
    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.stream.as_mut()
    }

    /// Consume the channel and return the stream, if still open.
    pub fn into_stream(mut self) -> Option<T> {
        self.stream.take()
    }
}

impl<T: RawStream> Drop for EolChannel<T> {
    fn drop(&mut self) {
        if let Some(stream) = self.stream.as_mut() {
            if !self.flags.contains(ChannelFlags::PREVENT_CLOSE, true) {
                let _ = stream.shutdown();
            }
        }
    }
}
