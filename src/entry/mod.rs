// Copyright (c) 2022 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

pub mod builder;

use crate::date::ZipDateTime;
use crate::entry::builder::EntryOptionsBuilder;

/// Describes how a single logical file is written into an archive.
///
/// # Builder pattern
/// Options are constructed through [`EntryOptionsBuilder`]; non-allocating conversions between the two are provided
/// via the [`From`] implementations.
#[derive(Clone, Debug)]
pub struct EntryOptions {
    pub(crate) filename: Option<String>,
    pub(crate) last_modification_date: ZipDateTime,
    pub(crate) force_zip64: bool,
    pub(crate) aliases: Vec<String>,
}

impl From<EntryOptionsBuilder> for EntryOptions {
    fn from(builder: EntryOptionsBuilder) -> Self {
        let last_modification_date = builder.last_modification_date.unwrap_or_else(ZipDateTime::now);

        Self {
            filename: builder.filename,
            last_modification_date,
            force_zip64: builder.force_zip64,
            aliases: builder.aliases,
        }
    }
}

impl EntryOptions {
    /// Returns the entry's filename, if one was given.
    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    /// Returns the entry's last modification date.
    pub fn last_modification_date(&self) -> &ZipDateTime {
        &self.last_modification_date
    }

    /// Returns whether the entry is written using ZIP64 structures regardless of its size.
    pub fn force_zip64(&self) -> bool {
        self.force_zip64
    }

    /// Returns the additional names under which the entry's data is listed.
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }
}
