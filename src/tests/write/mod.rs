// Copyright (c) 2022 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

use futures_lite::io::AsyncWrite;
use std::io::{Error, ErrorKind};
use std::pin::Pin;
use std::task::{Context, Poll};

pub(crate) mod offset;
#[cfg(target_pointer_width = "64")]
mod zip64;

/// /dev/null for AsyncWrite.
/// Useful for tests that involve writing, but not reading, large amounts of data.
pub(crate) struct AsyncSink;

// AsyncSink is always ready to receive bytes and throw them away.
impl AsyncWrite for AsyncSink {
    fn poll_write(self: Pin<&mut Self>, _: &mut Context<'_>, buf: &[u8]) -> Poll<Result<usize, Error>> {
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<Result<(), Error>> {
        Poll::Ready(Ok(()))
    }

    fn poll_close(self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<Result<(), Error>> {
        Poll::Ready(Ok(()))
    }
}

/// A sink which accepts a fixed number of bytes and then fails as a dropped connection would.
pub(crate) struct FailingSink {
    pub(crate) remaining: usize,
}

impl AsyncWrite for FailingSink {
    fn poll_write(mut self: Pin<&mut Self>, _: &mut Context<'_>, buf: &[u8]) -> Poll<Result<usize, Error>> {
        if self.remaining == 0 {
            return Poll::Ready(Err(Error::new(ErrorKind::BrokenPipe, "connection closed")));
        }
        let accepted = buf.len().min(self.remaining);
        self.remaining -= accepted;
        Poll::Ready(Ok(accepted))
    }

    fn poll_flush(self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<Result<(), Error>> {
        Poll::Ready(Ok(()))
    }

    fn poll_close(self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<Result<(), Error>> {
        Poll::Ready(Ok(()))
    }
}

/// A sink which reports backpressure on every other call and accepts at most a few bytes at a time.
#[derive(Default)]
pub(crate) struct ThrottledSink {
    pub(crate) data: Vec<u8>,
    pub(crate) pending: usize,
    pub(crate) closed: bool,
    saturated: bool,
}

impl ThrottledSink {
    fn throttle(&mut self, cx: &mut Context<'_>) -> bool {
        self.saturated = !self.saturated;
        if self.saturated {
            self.pending += 1;
            cx.waker().wake_by_ref();
        }
        self.saturated
    }
}

impl AsyncWrite for ThrottledSink {
    fn poll_write(mut self: Pin<&mut Self>, cx: &mut Context<'_>, buf: &[u8]) -> Poll<Result<usize, Error>> {
        if self.throttle(cx) {
            return Poll::Pending;
        }
        let accepted = buf.len().min(7);
        self.data.extend_from_slice(&buf[..accepted]);
        Poll::Ready(Ok(accepted))
    }

    fn poll_flush(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<(), Error>> {
        if self.throttle(cx) {
            return Poll::Pending;
        }
        Poll::Ready(Ok(()))
    }

    fn poll_close(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<(), Error>> {
        if self.throttle(cx) {
            return Poll::Pending;
        }
        self.closed = true;
        Poll::Ready(Ok(()))
    }
}
