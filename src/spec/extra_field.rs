// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

//! Tagged extra field sub-records.
//!
//! Every extra field starts with a 2 byte id and a 2 byte size covering the rest of the sub-record.

use crate::error::{Result, ZipError};
use crate::spec::consts::*;
use crate::spec::record::{fixed_len, BytesLen, Field, Schema};

// https://github.com/Majored/rs-async-zip/blob/main/SPECIFICATION.md#453
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Zip64ExtraField;

impl Schema for Zip64ExtraField {
    const NAME: &'static str = "Zip64ExtraField";
    const FIELDS: &'static [Field] = &[
        Field::u16("header_id").with_default(ZIP64_EXTRA_FIELD_ID as u64),
        Field::u16("size").size_of_rest(),
        Field::u64("uncompressed_size"),
        Field::u64("compressed_size"),
    ];
}

/// The ZIP64 extra field as attached to a central directory file header, additionally carrying the local header
/// offset and starting disk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Zip64CentralExtraField;

impl Schema for Zip64CentralExtraField {
    const NAME: &'static str = "Zip64CentralExtraField";
    const FIELDS: &'static [Field] = &[
        Field::u16("header_id").with_default(ZIP64_EXTRA_FIELD_ID as u64),
        Field::u16("size").size_of_rest(),
        Field::u64("uncompressed_size"),
        Field::u64("compressed_size"),
        Field::u64("relative_offset"),
        Field::u32("disk_no").with_default(0),
    ];
}

// https://libzip.org/specifications/extrafld.txt (PKWARE Unix Extra Field)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UnixExtraField;

impl Schema for UnixExtraField {
    const NAME: &'static str = "UnixExtraField";
    const FIELDS: &'static [Field] = &[
        Field::u16("header_id").with_default(UNIX_EXTRA_FIELD_ID as u64),
        Field::u16("size").size_of_rest(),
        Field::u32("atime"),
        Field::u32("mtime"),
        Field::u16("uid").with_default(0),
        Field::u16("gid").with_default(0),
        Field::bytes("data", BytesLen::Remainder("size")),
    ];
}

/// The Info-ZIP extended timestamp field.
///
/// Each timestamp is only present when its bit is set in `info_bits`: bit 0 for `mtime`, bit 1 for `atime` and
/// bit 2 for `ctime`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExtendedTimestamp;

impl Schema for ExtendedTimestamp {
    const NAME: &'static str = "ExtendedTimestamp";
    const FIELDS: &'static [Field] = &[
        Field::u16("header_id").with_default(EXTENDED_TIMESTAMP_ID as u64),
        Field::u16("size").size_of_rest(),
        Field::u8("info_bits").with_default(0),
        Field::u32("mtime").present_if("info_bits", 0b001),
        Field::u32("atime").present_if("info_bits", 0b010),
        Field::u32("ctime").present_if("info_bits", 0b100),
    ];
}

/// The Info-ZIP "new Unix" field, whose UID and GID widths are given by their companion size fields.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NewUnixExtraField;

impl Schema for NewUnixExtraField {
    const NAME: &'static str = "NewUnixExtraField";
    const FIELDS: &'static [Field] = &[
        Field::u16("header_id").with_default(NEW_UNIX_EXTRA_FIELD_ID as u64),
        Field::u16("size").size_of_rest(),
        Field::u8("version").with_default(1),
        Field::u8("uid_size").with_default(4),
        Field::sized("uid", "uid_size"),
        Field::u8("gid_size").with_default(4),
        Field::sized("gid", "gid_size"),
    ];
}

/// An alias's local file header, embedded within the extra field of the header before it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EmbeddedHeader;

impl Schema for EmbeddedHeader {
    const NAME: &'static str = "EmbeddedHeader";
    const FIELDS: &'static [Field] = &[
        Field::u16("header_id").with_default(EMBEDDED_HEADER_ID as u64),
        Field::u16("size").size_of_rest(),
        Field::bytes("header", BytesLen::Remainder("size")),
    ];
}

pub const ZIP64_EXTRA_FIELD_LENGTH: usize = fixed_len(Zip64ExtraField::FIELDS);
pub const ZIP64_CENTRAL_EXTRA_FIELD_LENGTH: usize = fixed_len(Zip64CentralExtraField::FIELDS);
/// The prefix preceding each embedded alias header.
pub const EMBEDDED_HEADER_PREFIX_LENGTH: usize = fixed_len(EmbeddedHeader::FIELDS);

/// A single sub-record within an extra field buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawExtraField<'a> {
    pub id: u16,
    /// The whole sub-record, id and size included.
    pub bytes: &'a [u8],
}

/// Splits an extra field buffer into its tagged sub-records.
pub fn split_extra_fields(mut buffer: &[u8]) -> Result<Vec<RawExtraField<'_>>> {
    let mut fields = Vec::new();

    while !buffer.is_empty() {
        if buffer.len() < 4 {
            return Err(ZipError::TruncatedRead { record: "ExtraField", field: "size" });
        }

        let id = u16::from_le_bytes([buffer[0], buffer[1]]);
        let size = u16::from_le_bytes([buffer[2], buffer[3]]) as usize;
        let Some(bytes) = buffer.get(..4 + size) else {
            return Err(ZipError::TruncatedRead { record: "ExtraField", field: "data" });
        };

        fields.push(RawExtraField { id, bytes });
        buffer = &buffer[4 + size..];
    }

    Ok(fields)
}
