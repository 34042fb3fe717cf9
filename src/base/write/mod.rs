// Copyright (c) 2021-2022 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

//! A module which supports writing ZIP files.
//!
//! # Example
//! ```no_run
//! # use async_zip64::{EntryOptionsBuilder, base::write::ZipStreamWriter};
//! # use async_zip64::error::ZipError;
//! #
//! # async fn run() -> Result<(), ZipError> {
//! let mut writer = ZipStreamWriter::new(Vec::<u8>::new());
//!
//! let data = b"This is an example file.";
//! let opts = EntryOptionsBuilder::new(String::from("foo.txt")).alias(String::from("copies/foo.txt"));
//!
//! writer.add_entry(&data[..], opts).await?;
//! let archive = writer.close().await?;
//! #   Ok(())
//! # }
//! ```
//!
//! # Layout
//! Entries are written as a local file header (with CRC and sizes filled in) immediately followed by the stored data;
//! no data descriptors are used. Each entry independently uses 32-bit or ZIP64 sizes depending on where it lands in
//! the stream. Aliases are embedded as nested local file headers within the extra field of the header before them, so
//! the data is written once but listed under every name in the central directory.

pub(crate) mod entry_whole;
pub(crate) mod io;
pub mod manifest;

pub use io::chunked::{ChunkedWriter, DEFAULT_HIGH_WATER};
pub use manifest::{write_manifest, write_manifest_with, DEFAULT_ENTRIES_PER_YIELD};

#[cfg(feature = "tokio")]
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};

use crate::entry::EntryOptions;
use crate::error::{Result, ZipError};
use crate::spec::consts::{CENTRAL_DIRECTORY_ALIGNMENT, NON_ZIP64_MAX_NUM_FILES, NON_ZIP64_MAX_SIZE};
use crate::spec::extra_field::Zip64CentralExtraField;
use crate::spec::header::{
    CentralDirectoryFileHeader, EndOfCentralDirectoryRecord, LocalFileHeader, Zip64EndOfCentralDirectoryLocator,
    Zip64EndOfCentralDirectoryRecord,
};
use crate::spec::record::Record;
use crate::spec::version;

#[cfg(feature = "tokio")]
use crate::tokio::write::ZipStreamWriter as TokioZipStreamWriter;

use entry_whole::EntryWholeWriter;
use io::offset::AsyncOffsetWriter;

use futures_lite::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// The default running offset past which entries switch to ZIP64 sizes, leaving headroom for header overhead.
pub const DEFAULT_ZIP64_THRESHOLD: u64 = (1 << 32) - 64 * 1024;

/// The default limit on the combined size of an entry's local header and its embedded alias headers.
pub const DEFAULT_ALIAS_LIMIT: usize = u16::MAX as usize;

/// An entry awaiting its central directory record.
pub(crate) struct DirectoryEntry {
    /// Where the entry's local file header starts.
    pub offset: u64,
    pub len: u64,
    pub header: Record<LocalFileHeader>,
    pub zip64: bool,
}

/// A summary of what [`ZipStreamWriter::add_entry()`] wrote.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WrittenEntry {
    pub filename: String,
    /// The offset of the entry's local file header.
    pub offset: u64,
    pub zip64: bool,
    pub aliases: Vec<String>,
    /// Aliases which were not embedded because they would have exceeded the writer's alias limit.
    pub dropped_aliases: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum WriterState {
    Open,
    Closed,
    /// The sink failed part way through a write.
    Aborted,
}

/// A streaming ZIP file writer which acts over AsyncWrite implementers.
///
/// # Note
/// - [`ZipStreamWriter::finalize()`] (or [`ZipStreamWriter::close()`]) must be called to produce a valid archive.
/// - A writer dropped before then simply stops; nothing further is written to the sink.
pub struct ZipStreamWriter<W> {
    pub(crate) writer: AsyncOffsetWriter<W>,
    pub(crate) entries: Vec<DirectoryEntry>,
    zip64_threshold: u64,
    alias_limit: usize,
    state: WriterState,
}

impl<W: AsyncWrite + Unpin> ZipStreamWriter<W> {
    /// Construct a new ZIP file writer from a writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer: AsyncOffsetWriter::new(writer),
            entries: Vec::new(),
            zip64_threshold: DEFAULT_ZIP64_THRESHOLD,
            alias_limit: DEFAULT_ALIAS_LIMIT,
            state: WriterState::Open,
        }
    }

    /// Sets the offset past which an entry's data must be described with ZIP64 structures.
    ///
    /// An entry uses ZIP64 if the offset of its header plus its size exceeds this threshold. Thresholds above
    /// `u32::MAX` are clamped to it, as a 32-bit entry could not otherwise describe its own offset.
    pub fn zip64_threshold(mut self, threshold: u64) -> Self {
        self.zip64_threshold = threshold.min(NON_ZIP64_MAX_SIZE as u64);
        self
    }

    /// Sets the limit on the combined size of an entry's local header and the alias headers embedded within it.
    pub fn alias_limit(mut self, limit: usize) -> Self {
        self.alias_limit = limit;
        self
    }

    /// Returns the number of bytes written so far.
    pub fn offset(&self) -> u64 {
        self.writer.offset()
    }

    /// Returns the number of central directory records which will be written, aliases included.
    pub fn directory_len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the writer accepts no further entries.
    pub fn is_closed(&self) -> bool {
        self.state != WriterState::Open
    }

    /// Returns a reference to the inner writer.
    pub fn get_ref(&self) -> &W {
        self.writer.get_ref()
    }

    /// Returns a mutable reference to the inner writer.
    ///
    /// Care should be taken when using this inner writer as doing so may invalidate internal state of this writer.
    pub fn inner_mut(&mut self) -> &mut W {
        self.writer.inner_mut()
    }

    pub(crate) fn needs_zip64(&self, offset: u64, len: u64, force: bool) -> bool {
        force || offset.saturating_add(len) > self.zip64_threshold
    }

    pub(crate) fn alias_limit_bytes(&self) -> usize {
        self.alias_limit
    }

    fn ensure_open(&self) -> Result<()> {
        match self.state {
            WriterState::Open => Ok(()),
            WriterState::Closed | WriterState::Aborted => Err(ZipError::WriterClosed),
        }
    }

    // A sink error leaves a partial record behind, so nothing more can be appended.
    fn track<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(ZipError::UpstreamIoError(_)) = &result {
            self.state = WriterState::Aborted;
        }
        result
    }

    /// Flushes the inner writer, waiting until it has accepted every byte written so far.
    pub async fn flush(&mut self) -> Result<()> {
        self.ensure_open()?;

        let result = self.writer.flush().await.map_err(ZipError::from);
        self.track(result)
    }

    /// Reads a payload to its end and writes it as a new entry.
    ///
    /// The whole payload is held in memory, as its CRC and size must be known before the local file header is written.
    pub async fn add_entry<R, E>(&mut self, mut reader: R, options: E) -> Result<WrittenEntry>
    where
        R: AsyncRead + Unpin,
        E: Into<EntryOptions>,
    {
        self.ensure_open()?;

        let mut data = Vec::new();
        reader.read_to_end(&mut data).await?;

        self.add_entry_whole(options, &data).await
    }

    /// Writes a new entry of known data.
    pub async fn add_entry_whole<E: Into<EntryOptions>>(&mut self, options: E, data: &[u8]) -> Result<WrittenEntry> {
        self.ensure_open()?;

        let result = EntryWholeWriter::from_raw(self, options.into(), data).write().await;
        self.track(result)
    }

    /// Reads a file and writes it as a new entry, named after the file unless the options name it.
    #[cfg(feature = "tokio-fs")]
    pub async fn add_path<P, E>(&mut self, path: P, options: E) -> Result<WrittenEntry>
    where
        P: AsRef<std::path::Path>,
        E: Into<EntryOptions>,
    {
        self.ensure_open()?;

        let path = path.as_ref();
        let data = tokio::fs::read(path).await?;

        let mut options = options.into();
        if options.filename.is_none() {
            options.filename = path.file_name().map(|name| name.to_string_lossy().into_owned());
        }

        self.add_entry_whole(options, &data).await
    }

    /// Completes the archive without consuming the writer.
    ///
    /// This includes:
    /// - Padding the stream to a 4 byte boundary.
    /// - Writing all central directory headers.
    /// - Writing the ZIP64 end of central directory record and locator, if needed.
    /// - Writing the end of central directory record.
    /// - Flushing and closing the inner writer.
    ///
    /// No further entries may be added afterwards. A failed finalize aborts the writer, and any later call fails with
    /// [`ZipError::WriterClosed`].
    #[tracing::instrument(skip(self), fields(entries = self.entries.len()))]
    pub async fn finalize(&mut self) -> Result<()> {
        self.ensure_open()?;

        // A failed trailer may be partially written, so the archive cannot be finalized again.
        let result = self.write_trailer().await;
        self.state = match result {
            Ok(_) => WriterState::Closed,
            Err(_) => WriterState::Aborted,
        };
        result
    }

    /// Consumes this ZIP writer, completes the archive, and returns the inner writer.
    pub async fn close(mut self) -> Result<W> {
        self.finalize().await?;
        Ok(self.writer.into_inner())
    }

    async fn write_trailer(&mut self) -> Result<()> {
        // Encode the whole central directory up front so an encoding error leaves the sink untouched.
        let mut directory = Vec::new();
        for entry in &self.entries {
            directory.extend_from_slice(&central_directory_record(entry)?);
        }

        let padding = self.writer.pad_to(CENTRAL_DIRECTORY_ALIGNMENT).await?;
        if padding > 0 {
            tracing::trace!(padding, "aligned central directory");
        }

        let cd_offset = self.writer.offset();
        self.writer.write_all(&directory).await?;

        let cd_size = directory.len() as u64;
        let num_entries = self.entries.len() as u64;

        let overflows = num_entries >= NON_ZIP64_MAX_NUM_FILES as u64
            || cd_size >= NON_ZIP64_MAX_SIZE as u64
            || cd_offset >= NON_ZIP64_MAX_SIZE as u64;
        let is_zip64 = overflows || self.entries.iter().any(|entry| entry.zip64);

        if is_zip64 {
            let eocdr_offset = self.writer.offset();

            let mut eocdr = Record::<Zip64EndOfCentralDirectoryRecord>::new()
                .with("total_no_entries_on_this_disk", num_entries)
                .with("total_no_entries", num_entries)
                .with("size_of_cd", cd_size)
                .with("offset_of_cd_wrt_disk_no", cd_offset);
            self.writer.write_all(&eocdr.derive().encode()?).await?;

            let eocdl = Record::<Zip64EndOfCentralDirectoryLocator>::new().with("relative_offset", eocdr_offset);
            self.writer.write_all(&eocdl.encode()?).await?;
        }

        let saturated_entries = num_entries.min(NON_ZIP64_MAX_NUM_FILES as u64);
        let eocdr = Record::<EndOfCentralDirectoryRecord>::new()
            .with("total_entries_in_local_cd", saturated_entries)
            .with("total_entries", saturated_entries)
            .with("cd_size", cd_size.min(NON_ZIP64_MAX_SIZE as u64))
            .with("offset_to_cd_start", cd_offset.min(NON_ZIP64_MAX_SIZE as u64));
        self.writer.write_all(&eocdr.encode()?).await?;

        self.writer.flush().await?;
        self.writer.close().await?;

        tracing::debug!(cd_offset, cd_size, zip64 = is_zip64, total = self.writer.offset(), "finalized archive");
        Ok(())
    }
}

/// Builds the central directory file header for an entry from its local file header.
fn central_directory_record(entry: &DirectoryEntry) -> Result<Vec<u8>> {
    let local = &entry.header;
    let field = |name: &'static str| {
        local.get(name).ok_or(ZipError::MissingFieldValue { record: "LocalFileHeader", field: name })
    };

    let mut header = Record::<CentralDirectoryFileHeader>::new()
        .with("made_by", version::as_made_by(entry.zip64))
        .with("version", field("version")?)
        .with("flags", field("flags")?)
        .with("compression", field("compression")?)
        .with("last_mod_file_time", field("last_mod_file_time")?)
        .with("last_mod_file_date", field("last_mod_file_date")?)
        .with("crc32", field("crc32")?)
        .with("compressed_size", field("compressed_size")?)
        .with("uncompressed_size", field("uncompressed_size")?)
        .with_bytes("filename", local.bytes("filename"));

    if entry.zip64 {
        let mut extra_field = Record::<Zip64CentralExtraField>::new()
            .with("uncompressed_size", entry.len)
            .with("compressed_size", entry.len)
            .with("relative_offset", entry.offset);

        header.set("disk_no", NON_ZIP64_MAX_NUM_FILES);
        header.set("rel_offset_of_local_header", NON_ZIP64_MAX_SIZE);
        header.set_bytes("extra_field", extra_field.derive().encode()?);
    } else {
        header.set("rel_offset_of_local_header", entry.offset);
    }

    header.encode()
}

#[cfg(feature = "tokio")]
impl<W> ZipStreamWriter<Compat<W>>
where
    W: tokio::io::AsyncWrite + Unpin,
{
    /// Construct a new ZIP file writer from a tokio writer.
    pub fn with_tokio(writer: W) -> TokioZipStreamWriter<W> {
        ZipStreamWriter::new(writer.compat_write())
    }
}
