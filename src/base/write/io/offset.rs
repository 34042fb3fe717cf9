// Copyright (c) 2022 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

use std::io::Error;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_lite::io::{AsyncWrite, AsyncWriteExt};
use pin_project::pin_project;

/// A wrapper around an [`AsyncWrite`] implementation which tracks the number of bytes the inner writer accepted.
#[pin_project(project = OffsetWriterProj)]
pub struct AsyncOffsetWriter<W> {
    #[pin]
    inner: W,
    offset: u64,
}

impl<W: AsyncWrite + Unpin> AsyncOffsetWriter<W> {
    /// Constructs a new wrapper from an inner [`AsyncWrite`] writer.
    pub fn new(inner: W) -> Self {
        Self { inner, offset: 0 }
    }

    /// Returns the current byte offset.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Writes zero bytes until the offset is a multiple of `alignment`, returning the number written.
    pub async fn pad_to(&mut self, alignment: u64) -> Result<u64, Error> {
        let padding = (alignment - self.offset % alignment) % alignment;
        if padding > 0 {
            self.write_all(&vec![0; padding as usize]).await?;
        }
        Ok(padding)
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Consumes this wrapper and returns the inner [`AsyncWrite`] writer.
    pub fn into_inner(self) -> W {
        self.inner
    }

    pub fn inner_mut(&mut self) -> &mut W {
        &mut self.inner
    }
}

impl<W: AsyncWrite + Unpin> AsyncWrite for AsyncOffsetWriter<W> {
    fn poll_write(self: Pin<&mut Self>, cx: &mut Context, buf: &[u8]) -> Poll<Result<usize, Error>> {
        let this = self.project();
        let poll = this.inner.poll_write(cx, buf);

        if let Poll::Ready(Ok(written)) = &poll {
            *this.offset += *written as u64;
        }

        poll
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context) -> Poll<Result<(), Error>> {
        self.project().inner.poll_flush(cx)
    }

    fn poll_close(self: Pin<&mut Self>, cx: &mut Context) -> Poll<Result<(), Error>> {
        self.project().inner.poll_close(cx)
    }
}
