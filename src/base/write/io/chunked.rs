// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

use std::io::{Error, ErrorKind};
use std::pin::Pin;
use std::task::{ready, Context, Poll};

use futures_lite::io::AsyncWrite;
use pin_project::pin_project;

/// The outstanding byte count above which a producer should stop feeding a [`ChunkedWriter`].
pub const DEFAULT_HIGH_WATER: usize = 50 * 1024;

const LAST_CHUNK: &[u8] = b"0\r\n\r\n";

/// An [`AsyncWrite`] wrapper which frames each write using HTTP/1.1 chunked transfer encoding.
///
/// Each non-empty write becomes one chunk: its length in hex, CRLF, the data, CRLF. Closing the writer emits the
/// terminating zero-length chunk before closing the inner writer.
///
/// At most one framed chunk is held at a time; a new write is only accepted once the previous chunk has been fully
/// handed to the inner writer, so a saturated inner writer surfaces as [`Poll::Pending`].
#[pin_project]
pub struct ChunkedWriter<W> {
    #[pin]
    inner: W,
    pending: Vec<u8>,
    written: usize,
    finished: bool,
}

impl<W: AsyncWrite> ChunkedWriter<W> {
    /// Constructs a new chunked writer from an inner [`AsyncWrite`] writer.
    pub fn new(inner: W) -> Self {
        Self { inner, pending: Vec::new(), written: 0, finished: false }
    }

    /// Returns the number of framed bytes accepted but not yet handed to the inner writer.
    pub fn buffered(&self) -> usize {
        self.pending.len() - self.written
    }

    /// Returns whether more than `high_water` bytes are outstanding.
    pub fn is_saturated(&self, high_water: usize) -> bool {
        self.buffered() > high_water
    }

    /// Returns a reference to the inner writer.
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Consumes this wrapper and returns the inner writer, discarding any unwritten bytes.
    pub fn into_inner(self) -> W {
        self.inner
    }

    fn poll_drain(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<(), Error>> {
        let mut this = self.project();

        while *this.written < this.pending.len() {
            let written = ready!(this.inner.as_mut().poll_write(cx, &this.pending[*this.written..]))?;
            if written == 0 {
                return Poll::Ready(Err(ErrorKind::WriteZero.into()));
            }
            *this.written += written;
        }

        this.pending.clear();
        *this.written = 0;
        Poll::Ready(Ok(()))
    }
}

impl<W: AsyncWrite> AsyncWrite for ChunkedWriter<W> {
    fn poll_write(mut self: Pin<&mut Self>, cx: &mut Context<'_>, buf: &[u8]) -> Poll<Result<usize, Error>> {
        if self.finished {
            return Poll::Ready(Err(Error::new(ErrorKind::Other, "chunked stream has already been terminated")));
        }
        // An empty chunk would terminate the stream.
        if buf.is_empty() {
            return Poll::Ready(Ok(0));
        }

        ready!(self.as_mut().poll_drain(cx))?;

        let this = self.project();
        this.pending.extend_from_slice(format!("{:x}\r\n", buf.len()).as_bytes());
        this.pending.extend_from_slice(buf);
        this.pending.extend_from_slice(b"\r\n");

        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<(), Error>> {
        ready!(self.as_mut().poll_drain(cx))?;
        self.project().inner.poll_flush(cx)
    }

    fn poll_close(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<(), Error>> {
        ready!(self.as_mut().poll_drain(cx))?;

        if !self.finished {
            let this = self.as_mut().project();
            this.pending.extend_from_slice(LAST_CHUNK);
            *this.finished = true;
            ready!(self.as_mut().poll_drain(cx))?;
        }

        self.project().inner.poll_close(cx)
    }
}
