// Copyright (c) 2021 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

// https://github.com/Majored/rs-async-zip/blob/main/SPECIFICATION.md#443

/// The minimum version which understands ZIP64 structures.
pub const VERSION_ZIP64: u16 = 45;
/// The minimum version for stored entries with UTF-8 names.
pub const VERSION_DEFAULT: u16 = 20;

pub fn as_needed_to_extract(zip64: bool) -> u16 {
    match zip64 {
        true => VERSION_ZIP64,
        false => VERSION_DEFAULT,
    }
}

// The upper byte (host system) is left as MS-DOS so readers don't interpret the zeroed external attributes as
// Unix permissions.
pub fn as_made_by(zip64: bool) -> u16 {
    as_needed_to_extract(zip64)
}
