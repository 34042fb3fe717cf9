// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

//! Predicting the size of an archive before it is written.
//!
//! The prediction budgets every entry and alias as ZIP64, so it is exact for archives whose entries are all written
//! with [`EntryOptionsBuilder::force_zip64()`] and an upper bound on the header overhead otherwise.
//!
//! ```
//! # use async_zip64::predict::{predict_size, PlannedEntry};
//! let manifest = [PlannedEntry::new("bar.txt", 3)];
//! assert_eq!(predict_size(&manifest), 243);
//! ```
//!
//! [`EntryOptionsBuilder::force_zip64()`]: crate::EntryOptionsBuilder::force_zip64

use crate::spec::consts::CENTRAL_DIRECTORY_ALIGNMENT;
use crate::spec::extra_field::{
    EMBEDDED_HEADER_PREFIX_LENGTH, ZIP64_CENTRAL_EXTRA_FIELD_LENGTH, ZIP64_EXTRA_FIELD_LENGTH,
};
use crate::spec::header::{CDH_LENGTH, EOCDR_LENGTH, LFH_LENGTH, ZIP64_EOCDL_LENGTH, ZIP64_EOCDR_LENGTH};

/// A single entry of a manifest, as far as its size is concerned.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlannedEntry {
    pub name: String,
    pub size: u64,
    pub aliases: Vec<String>,
}

impl PlannedEntry {
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self { name: name.into(), size, aliases: Vec::new() }
    }

    /// Adds a name under which the entry is additionally listed.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }
}

/// Returns the number of bytes a writer produces for the manifest when every entry is forced to ZIP64.
pub fn predict_size(manifest: &[PlannedEntry]) -> u64 {
    let local = (LFH_LENGTH + ZIP64_EXTRA_FIELD_LENGTH) as u64;
    let embedded = EMBEDDED_HEADER_PREFIX_LENGTH as u64 + local;
    let central = (CDH_LENGTH + ZIP64_CENTRAL_EXTRA_FIELD_LENGTH) as u64;

    let mut entries = 0u64;
    let mut directory = 0u64;

    for entry in manifest {
        entries += local + entry.name.len() as u64 + entry.size;
        directory += central + entry.name.len() as u64;

        for alias in &entry.aliases {
            entries += embedded + alias.len() as u64;
            directory += central + alias.len() as u64;
        }
    }

    let trailer = (ZIP64_EOCDR_LENGTH + ZIP64_EOCDL_LENGTH + EOCDR_LENGTH) as u64;
    entries.next_multiple_of(CENTRAL_DIRECTORY_ALIGNMENT) + directory + trailer
}
