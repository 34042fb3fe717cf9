// Copyright (c) 2021 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

//! Signature-prefixed ZIP and ZIP64 records.

use crate::error::Result;
use crate::spec::consts::*;
use crate::spec::extra_field::{split_extra_fields, Zip64ExtraField};
use crate::spec::record::{fixed_len, BytesLen, Field, Record, Schema};
use crate::spec::version;

// https://github.com/Majored/rs-async-zip/blob/main/SPECIFICATION.md#437
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LocalFileHeader;

impl Schema for LocalFileHeader {
    const NAME: &'static str = "LocalFileHeader";
    const FIELDS: &'static [Field] = &[
        Field::u32("signature").with_default(LFH_SIGNATURE as u64),
        Field::u16("version").with_default(version::VERSION_DEFAULT as u64),
        Field::u16("flags").with_default(0),
        Field::u16("compression").with_default(0),
        Field::u16("last_mod_file_time"),
        Field::u16("last_mod_file_date"),
        Field::u32("crc32"),
        Field::u32("compressed_size"),
        Field::u32("uncompressed_size"),
        Field::u16("filename_len").len_of("filename"),
        Field::u16("extra_field_len").len_of("extra_field"),
        Field::bytes("filename", BytesLen::Field("filename_len")),
        Field::bytes("extra_field", BytesLen::Field("extra_field_len")),
    ];
}

// https://github.com/Majored/rs-async-zip/blob/main/SPECIFICATION.md#4312
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CentralDirectoryFileHeader;

impl Schema for CentralDirectoryFileHeader {
    const NAME: &'static str = "CentralDirectoryFileHeader";
    const FIELDS: &'static [Field] = &[
        Field::u32("signature").with_default(CDH_SIGNATURE as u64),
        Field::u16("made_by"),
        Field::u16("version").with_default(version::VERSION_DEFAULT as u64),
        Field::u16("flags").with_default(0),
        Field::u16("compression").with_default(0),
        Field::u16("last_mod_file_time"),
        Field::u16("last_mod_file_date"),
        Field::u32("crc32").with_default(0),
        Field::u32("compressed_size"),
        Field::u32("uncompressed_size"),
        Field::u16("filename_len").len_of("filename"),
        Field::u16("extra_field_len").len_of("extra_field"),
        Field::u16("file_comment_len").len_of("file_comment"),
        Field::u16("disk_no").with_default(0),
        Field::u16("internal_file_attributes").with_default(0),
        Field::u32("external_file_attributes").with_default(0),
        Field::u32("rel_offset_of_local_header"),
        Field::bytes("filename", BytesLen::Field("filename_len")),
        Field::bytes("extra_field", BytesLen::Field("extra_field_len")),
        Field::bytes("file_comment", BytesLen::Field("file_comment_len")),
    ];
}

// https://github.com/Majored/rs-async-zip/blob/main/SPECIFICATION.md#4316
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EndOfCentralDirectoryRecord;

impl Schema for EndOfCentralDirectoryRecord {
    const NAME: &'static str = "EndOfCentralDirectoryRecord";
    const FIELDS: &'static [Field] = &[
        Field::u32("signature").with_default(EOCDR_SIGNATURE as u64),
        Field::u16("disk_no").with_default(0),
        Field::u16("disk_with_cd_no").with_default(0),
        Field::u16("total_entries_in_local_cd"),
        Field::u16("total_entries"),
        Field::u32("cd_size"),
        Field::u32("offset_to_cd_start"),
        Field::u16("file_comment_len").len_of("file_comment"),
        Field::bytes("file_comment", BytesLen::Field("file_comment_len")),
    ];
}

// https://github.com/Majored/rs-async-zip/blob/main/SPECIFICATION.md#4314
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Zip64EndOfCentralDirectoryRecord;

impl Schema for Zip64EndOfCentralDirectoryRecord {
    const NAME: &'static str = "Zip64EndOfCentralDirectoryRecord";
    const FIELDS: &'static [Field] = &[
        Field::u32("signature").with_default(ZIP64_EOCDR_SIGNATURE as u64),
        Field::u64("record_len").size_of_rest(),
        Field::u16("made_by").with_default(version::VERSION_ZIP64 as u64),
        Field::u16("version").with_default(version::VERSION_ZIP64 as u64),
        Field::u32("this_disk_no").with_default(0),
        Field::u32("disk_with_cd_no").with_default(0),
        Field::u64("total_no_entries_on_this_disk"),
        Field::u64("total_no_entries"),
        Field::u64("size_of_cd"),
        Field::u64("offset_of_cd_wrt_disk_no"),
        Field::bytes("data", BytesLen::Remainder("record_len")),
    ];
}

// https://github.com/Majored/rs-async-zip/blob/main/SPECIFICATION.md#4315
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Zip64EndOfCentralDirectoryLocator;

impl Schema for Zip64EndOfCentralDirectoryLocator {
    const NAME: &'static str = "Zip64EndOfCentralDirectoryLocator";
    const FIELDS: &'static [Field] = &[
        Field::u32("signature").with_default(ZIP64_EOCDL_SIGNATURE as u64),
        Field::u32("disk_with_z64_eocdr").with_default(0),
        Field::u64("relative_offset"),
        Field::u32("no_disks").with_default(1),
    ];
}

// https://github.com/Majored/rs-async-zip/blob/main/SPECIFICATION.md#4313
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DigitalSignature;

impl Schema for DigitalSignature {
    const NAME: &'static str = "DigitalSignature";
    const FIELDS: &'static [Field] = &[
        Field::u32("signature").with_default(DIGITAL_SIGNATURE_SIGNATURE as u64),
        Field::u16("size").size_of_rest(),
        Field::bytes("data", BytesLen::Remainder("size")),
    ];
}

// https://github.com/Majored/rs-async-zip/blob/main/SPECIFICATION.md#439
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DataDescriptor64;

impl Schema for DataDescriptor64 {
    const NAME: &'static str = "DataDescriptor64";
    const FIELDS: &'static [Field] = &[
        Field::u32("signature").with_default(DATA_DESCRIPTOR_SIGNATURE as u64),
        Field::u32("crc32"),
        Field::u64("compressed_size"),
        Field::u64("uncompressed_size"),
    ];
}

/// The fixed portion of a local file header, signature included.
pub const LFH_LENGTH: usize = fixed_len(LocalFileHeader::FIELDS);
/// The fixed portion of a central directory file header, signature included.
pub const CDH_LENGTH: usize = fixed_len(CentralDirectoryFileHeader::FIELDS);
pub const EOCDR_LENGTH: usize = fixed_len(EndOfCentralDirectoryRecord::FIELDS);
pub const ZIP64_EOCDR_LENGTH: usize = fixed_len(Zip64EndOfCentralDirectoryRecord::FIELDS);
pub const ZIP64_EOCDL_LENGTH: usize = fixed_len(Zip64EndOfCentralDirectoryLocator::FIELDS);

/// Records which carry a file's sizes in 32-bit fields.
pub trait FileSizes: Schema {}

impl FileSizes for LocalFileHeader {}
impl FileSizes for CentralDirectoryFileHeader {}

impl<S: FileSizes> Record<S> {
    /// Returns whether both size fields hold the ZIP64 sentinel.
    pub fn is_zip64(&self) -> bool {
        let sentinel = Some(NON_ZIP64_MAX_SIZE as u64);
        self.get("compressed_size") == sentinel && self.get("uncompressed_size") == sentinel
    }

    /// Returns the version needed to extract, as implied by [`Record::is_zip64()`].
    pub fn version_needed(&self) -> u16 {
        version::as_needed_to_extract(self.is_zip64())
    }

    /// Returns the filename, lossily decoded.
    pub fn filename(&self) -> String {
        String::from_utf8_lossy(self.bytes("filename")).into_owned()
    }

    /// Returns the ZIP64 extra field held within this header's extra field buffer, if any.
    pub fn zip64_extra_field(&self) -> Result<Option<Record<Zip64ExtraField>>> {
        for field in split_extra_fields(self.bytes("extra_field"))? {
            if field.id == ZIP64_EXTRA_FIELD_ID {
                return Ok(Some(Record::from_slice(field.bytes)?));
            }
        }
        Ok(None)
    }
}

impl Record<LocalFileHeader> {
    /// Returns the number of payload bytes following this header, consulting the ZIP64 extra field when the size
    /// fields hold the sentinel.
    pub fn payload_len(&self) -> Result<u64> {
        let size = self.get("compressed_size").unwrap_or(0);
        if size != NON_ZIP64_MAX_SIZE as u64 {
            return Ok(size);
        }

        let extra = self.zip64_extra_field()?;
        Ok(extra.and_then(|extra| extra.get("compressed_size")).unwrap_or(size))
    }
}
