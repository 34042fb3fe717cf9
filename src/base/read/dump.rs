// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

//! A diagnostic walker which prints every record of an in-memory archive.
//!
//! The walk is best-effort: unknown signatures are reported and skipped until the next even offset, so a damaged or
//! unusual archive still yields as much as can be recognised. Only a recognised record which runs off the end of the
//! buffer is fatal.
//!
//! ### Example
//! ```no_run
//! # use async_zip64::base::read::dump::dump_archive;
//! # use async_zip64::error::Result;
//! #
//! fn run(archive: &[u8]) -> Result<()> {
//!     let summary = dump_archive(archive, &mut std::io::stdout())?;
//!     eprintln!("{} records, {} unknown signatures", summary.records, summary.unknown_signatures);
//!     Ok(())
//! }
//! ```

use crate::error::{Result, ZipError};
use crate::spec::consts::SIGNATURE_LENGTH;
use crate::spec::extra_field::split_extra_fields;
use crate::spec::header::LocalFileHeader;
use crate::spec::record::Record;
use crate::spec::registry::{decode_extra_field, lookup_signature, AnyRecord};

use std::io::Write;

/// The number of payload bytes previewed for each entry.
const DATA_PREVIEW_LENGTH: usize = 50;

/// Counts of what [`dump_archive()`] came across.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DumpSummary {
    /// Top-level records recognised, not counting nested extra fields.
    pub records: usize,
    pub extra_fields: usize,
    pub unknown_signatures: usize,
}

/// Walks an archive from its first byte, describing each record to `out`.
pub fn dump_archive<W: Write + ?Sized>(archive: &[u8], out: &mut W) -> Result<DumpSummary> {
    let mut summary = DumpSummary::default();
    let mut position = 0;

    while let Some(signature) = archive.get(position..position + SIGNATURE_LENGTH) {
        let signature = u32::from_le_bytes([signature[0], signature[1], signature[2], signature[3]]);
        write!(out, ".{position:<16}")?;

        let Some(decode) = lookup_signature(signature) else {
            writeln!(out, "{signature:>16x} {signature:>16}")?;
            summary.unknown_signatures += 1;
            position += 2 - position % 2;
            continue;
        };

        let mut cursor = &archive[position + SIGNATURE_LENGTH..];
        let remaining = cursor.len();
        // The signature field keeps its declared default.
        let record = decode(&mut cursor, 1)?;
        position += SIGNATURE_LENGTH + (remaining - cursor.len());

        write!(out, "{record}")?;
        summary.records += 1;

        if let AnyRecord::LocalFileHeader(header) = &record {
            describe_extra_fields(header, out, 1, &mut summary)?;

            let len = header.payload_len()? as usize;
            let data = archive
                .get(position..position.saturating_add(len))
                .ok_or(ZipError::TruncatedRead { record: "LocalFileHeader", field: "data" })?;
            describe_data(data, out)?;
            position += len;
        }
    }

    tracing::debug!(?summary, "dumped archive");
    Ok(summary)
}

fn describe_extra_fields<W: Write + ?Sized>(
    header: &Record<LocalFileHeader>,
    out: &mut W,
    depth: usize,
    summary: &mut DumpSummary,
) -> Result<()> {
    for field in split_extra_fields(header.bytes("extra_field"))? {
        let Some(record) = decode_extra_field(&field) else {
            let indent = depth * 2;
            writeln!(out, "{:indent$}unknown extra field {:#06x} ({} bytes)", "", field.id, field.bytes.len())?;
            continue;
        };
        let record = record?;
        summary.extra_fields += 1;

        for line in record.to_string().lines() {
            writeln!(out, "{:indent$}{line}", "", indent = depth * 2)?;
        }

        if let AnyRecord::EmbeddedHeader(embedded) = &record {
            let nested = Record::<LocalFileHeader>::from_slice(embedded.bytes("header"))?;
            for line in nested.to_string().lines() {
                writeln!(out, "{:indent$}{line}", "", indent = (depth + 1) * 2)?;
            }
            describe_extra_fields(&nested, out, depth + 2, summary)?;
        }
    }

    Ok(())
}

fn describe_data<W: Write + ?Sized>(data: &[u8], out: &mut W) -> Result<()> {
    let preview = String::from_utf8_lossy(&data[..data.len().min(DATA_PREVIEW_LENGTH)]);
    if data.len() > DATA_PREVIEW_LENGTH {
        writeln!(out, "data {preview:?} ({} bytes, truncated)", data.len())?;
    } else {
        writeln!(out, "data {preview:?}")?;
    }
    Ok(())
}
