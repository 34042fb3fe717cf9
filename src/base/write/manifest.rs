// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

//! Writing a whole manifest while sharing the executor with other archive generations.
//!
//! Each entry write already suspends whenever the sink applies backpressure. Entries which are accepted immediately
//! never suspend though, so the driver additionally yields after every few entries to let other tasks on the same
//! executor make progress.
//!
//! A sink may also hold bytes it has accepted but not yet passed on, such as [`ChunkedWriter`]. At each yield point,
//! [`write_manifest_with()`] asks a predicate whether the sink is saturated and, if so, flushes it before continuing.
//!
//! ```no_run
//! # use async_zip64::base::write::{write_manifest_with, ChunkedWriter, ZipStreamWriter, DEFAULT_HIGH_WATER};
//! # use async_zip64::EntryOptionsBuilder;
//! # use async_zip64::error::Result;
//! #
//! # async fn run(entries: Vec<(EntryOptionsBuilder, &[u8])>) -> Result<()> {
//! let mut writer = ZipStreamWriter::new(ChunkedWriter::new(Vec::<u8>::new()));
//! write_manifest_with(&mut writer, entries, 4, |sink| sink.is_saturated(DEFAULT_HIGH_WATER)).await?;
//! writer.close().await?;
//! #   Ok(())
//! # }
//! ```
//!
//! [`ChunkedWriter`]: crate::base::write::ChunkedWriter

use crate::base::write::{WrittenEntry, ZipStreamWriter};
use crate::entry::EntryOptions;
use crate::error::Result;

use futures_lite::future::yield_now;
use futures_lite::io::{AsyncRead, AsyncWrite};

/// The default number of entries written between cooperative yields.
pub const DEFAULT_ENTRIES_PER_YIELD: usize = 4;

/// Writes every entry of a manifest in order, yielding to the executor after each `entries_per_yield` entries.
///
/// The writer is not finalized. On error, the entries written so far remain in the writer.
pub async fn write_manifest<W, R, E, I>(
    writer: &mut ZipStreamWriter<W>,
    entries: I,
    entries_per_yield: usize,
) -> Result<Vec<WrittenEntry>>
where
    W: AsyncWrite + Unpin,
    R: AsyncRead + Unpin,
    E: Into<EntryOptions>,
    I: IntoIterator<Item = (E, R)>,
{
    write_manifest_with(writer, entries, entries_per_yield, |_| false).await
}

/// Writes every entry of a manifest in order, flushing the sink at each yield point where `saturated` holds.
pub async fn write_manifest_with<W, R, E, I, F>(
    writer: &mut ZipStreamWriter<W>,
    entries: I,
    entries_per_yield: usize,
    mut saturated: F,
) -> Result<Vec<WrittenEntry>>
where
    W: AsyncWrite + Unpin,
    R: AsyncRead + Unpin,
    E: Into<EntryOptions>,
    I: IntoIterator<Item = (E, R)>,
    F: FnMut(&W) -> bool,
{
    let entries_per_yield = entries_per_yield.max(1);
    let mut written = Vec::new();

    for (index, (options, reader)) in entries.into_iter().enumerate() {
        if index > 0 && index % entries_per_yield == 0 {
            if saturated(writer.get_ref()) {
                tracing::trace!(index, "sink saturated, flushing");
                writer.flush().await?;
            }
            yield_now().await;
        }
        written.push(writer.add_entry(reader, options).await?);
    }

    Ok(written)
}
