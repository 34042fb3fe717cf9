// Copyright (c) 2022 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

pub const SIGNATURE_LENGTH: usize = 4;

// https://github.com/Majored/rs-async-zip/blob/main/SPECIFICATION.md#437
pub const LFH_SIGNATURE: u32 = 0x04034b50;

// https://github.com/Majored/rs-async-zip/blob/main/SPECIFICATION.md#4312
pub const CDH_SIGNATURE: u32 = 0x02014b50;

// https://github.com/Majored/rs-async-zip/blob/main/SPECIFICATION.md#4313
pub const DIGITAL_SIGNATURE_SIGNATURE: u32 = 0x05054b50;

// https://github.com/Majored/rs-async-zip/blob/main/SPECIFICATION.md#439
pub const DATA_DESCRIPTOR_SIGNATURE: u32 = 0x08074b50;

// https://github.com/Majored/rs-async-zip/blob/main/SPECIFICATION.md#4314
pub const ZIP64_EOCDR_SIGNATURE: u32 = 0x06064b50;

// https://github.com/Majored/rs-async-zip/blob/main/SPECIFICATION.md#4315
pub const ZIP64_EOCDL_SIGNATURE: u32 = 0x07064b50;

// https://github.com/Majored/rs-async-zip/blob/main/SPECIFICATION.md#4316
pub const EOCDR_SIGNATURE: u32 = 0x06054b50;

// Extra field header ids
//
// https://github.com/Majored/rs-async-zip/blob/main/SPECIFICATION.md#452
pub const ZIP64_EXTRA_FIELD_ID: u16 = 0x0001;
pub const UNIX_EXTRA_FIELD_ID: u16 = 0x000d;
pub const EXTENDED_TIMESTAMP_ID: u16 = 0x5455;
pub const NEW_UNIX_EXTRA_FIELD_ID: u16 = 0x7875;
/// A private id under which alias local file headers are embedded.
pub const EMBEDDED_HEADER_ID: u16 = 0x4343;

/// The sentinel stored in 32-bit size and offset fields when the true value lives in a ZIP64 structure.
pub const NON_ZIP64_MAX_SIZE: u32 = 0xFFFFFFFF;
/// The sentinel stored in 16-bit count and disk fields when the true value lives in a ZIP64 structure.
pub const NON_ZIP64_MAX_NUM_FILES: u16 = 0xFFFF;

/// General purpose flag bit marking a UTF-8 encoded filename.
pub const UTF8_FLAG: u16 = 0x800;

/// The alignment of the start of the central directory.
pub const CENTRAL_DIRECTORY_ALIGNMENT: u64 = 4;
