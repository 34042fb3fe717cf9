// Copyright (c) 2021 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

use crate::base::write::{DirectoryEntry, WrittenEntry, ZipStreamWriter};
use crate::entry::EntryOptions;
use crate::error::{Result, ZipError};
use crate::spec::consts::{NON_ZIP64_MAX_SIZE, UTF8_FLAG};
use crate::spec::extra_field::{
    EmbeddedHeader, Zip64ExtraField, EMBEDDED_HEADER_PREFIX_LENGTH, ZIP64_EXTRA_FIELD_LENGTH,
};
use crate::spec::header::{LocalFileHeader, LFH_LENGTH};
use crate::spec::record::Record;
use crate::spec::version;

use crc32fast::Hasher;
use futures_lite::io::{AsyncWrite, AsyncWriteExt};

/// One name under which the entry's data is listed, and where its local header lands.
struct Link {
    filename: String,
    offset: u64,
    zip64: bool,
}

impl Link {
    /// The bytes this link's header contributes before the next link's header begins.
    fn prefix_len(&self) -> u64 {
        let zip64 = if self.zip64 { ZIP64_EXTRA_FIELD_LENGTH } else { 0 };
        (LFH_LENGTH + self.filename.len() + zip64) as u64
    }
}

pub struct EntryWholeWriter<'b, 'c, W: AsyncWrite + Unpin> {
    writer: &'b mut ZipStreamWriter<W>,
    options: EntryOptions,
    data: &'c [u8],
}

impl<'b, 'c, W: AsyncWrite + Unpin> EntryWholeWriter<'b, 'c, W> {
    pub fn from_raw(writer: &'b mut ZipStreamWriter<W>, options: EntryOptions, data: &'c [u8]) -> Self {
        Self { writer, options, data }
    }

    pub async fn write(mut self) -> Result<WrittenEntry> {
        let len = self.data.len() as u64;
        let force = self.options.force_zip64;

        // Placeholders number directory records from one, so earlier aliases advance the count.
        let filename = match self.options.filename.take() {
            Some(filename) => filename,
            None => format!("file-{}.dat", self.writer.entries.len() + 1),
        };
        if filename.len() > u16::MAX as usize {
            return Err(ZipError::FileNameTooLarge);
        }

        let offset = self.writer.offset();
        let primary = Link { zip64: self.writer.needs_zip64(offset, len, force), filename, offset };
        let (links, dropped) = self.chain(primary, len, force);

        let crc = compute_crc(self.data);
        let date = self.options.last_modification_date;

        // Build innermost first so each header can be embedded in the one before it.
        let mut headers = Vec::with_capacity(links.len());
        let mut embedded: Option<Vec<u8>> = None;
        for link in links.iter().rev() {
            let mut extra_field = Vec::new();
            if link.zip64 {
                let mut zip64 = Record::<Zip64ExtraField>::new()
                    .with("uncompressed_size", len)
                    .with("compressed_size", len);
                zip64.derive().encode_into(&mut extra_field)?;
            }
            if let Some(inner) = embedded.take() {
                let mut doll = Record::<EmbeddedHeader>::new().with_bytes("header", inner);
                doll.derive().encode_into(&mut extra_field)?;
            }

            let (size, flags) = match link.zip64 {
                true => (NON_ZIP64_MAX_SIZE as u64, 0),
                false => (len, UTF8_FLAG),
            };

            let mut header = Record::<LocalFileHeader>::new()
                .with("version", version::as_needed_to_extract(link.zip64))
                .with("flags", flags)
                .with("last_mod_file_time", date.time)
                .with("last_mod_file_date", date.date)
                .with("crc32", crc)
                .with("compressed_size", size)
                .with("uncompressed_size", size)
                .with_bytes("filename", link.filename.as_bytes())
                .with_bytes("extra_field", extra_field);

            embedded = Some(header.encode()?);

            // The central directory never needs the nested headers again.
            header.set_bytes("extra_field", Vec::new());
            headers.push(header);
        }
        headers.reverse();

        let outermost = embedded.unwrap_or_default();
        self.writer.writer.write_all(&outermost).await?;
        self.writer.writer.write_all(self.data).await?;

        for (link, header) in links.iter().zip(headers) {
            self.writer.entries.push(DirectoryEntry { offset: link.offset, len, header, zip64: link.zip64 });
        }

        let mut links = links.into_iter();
        let primary = links.next();
        let aliases: Vec<String> = links.map(|link| link.filename).collect();
        let (filename, offset, zip64) = match primary {
            Some(link) => (link.filename, link.offset, link.zip64),
            None => (String::new(), offset, false),
        };

        tracing::debug!(%filename, offset, len, zip64, aliases = aliases.len(), "wrote entry");

        Ok(WrittenEntry { filename, offset, zip64, aliases, dropped_aliases: dropped })
    }

    /// Lays out the alias chain behind the primary header, dropping every alias from the first which would take the
    /// outermost header past the writer's alias limit.
    fn chain(&self, primary: Link, len: u64, force: bool) -> (Vec<Link>, Vec<String>) {
        let limit = self.writer.alias_limit_bytes();
        let primary_name_len = primary.filename.len();

        let mut total = primary.prefix_len();
        let mut next_offset = primary.offset + primary.prefix_len() + EMBEDDED_HEADER_PREFIX_LENGTH as u64;
        let mut links = vec![primary];
        let mut dropped = Vec::new();

        for alias in &self.options.aliases {
            if !dropped.is_empty() {
                dropped.push(alias.clone());
                continue;
            }

            let link = Link {
                zip64: self.writer.needs_zip64(next_offset, len, force),
                filename: alias.clone(),
                offset: next_offset,
            };
            let grown = total + EMBEDDED_HEADER_PREFIX_LENGTH as u64 + link.prefix_len();
            let extra_field_len = grown - (LFH_LENGTH + primary_name_len) as u64;

            if grown > limit as u64 || extra_field_len > u16::MAX as u64 {
                let entry = links.first().map(|link| link.filename.clone()).unwrap_or_default();
                let error = ZipError::AliasOverflow { entry, alias: alias.clone(), limit };
                tracing::warn!(%error, "dropping aliases");
                dropped.push(alias.clone());
                continue;
            }

            total = grown;
            next_offset = link.offset + link.prefix_len() + EMBEDDED_HEADER_PREFIX_LENGTH as u64;
            links.push(link);
        }

        (links, dropped)
    }
}

fn compute_crc(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}
