// Copyright (c) 2022 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

use crate::date::ZipDateTime;
use crate::entry::EntryOptions;

/// A builder for [`EntryOptions`].
#[derive(Clone, Debug, Default)]
pub struct EntryOptionsBuilder {
    pub(crate) filename: Option<String>,
    pub(crate) last_modification_date: Option<ZipDateTime>,
    pub(crate) force_zip64: bool,
    pub(crate) aliases: Vec<String>,
}

impl From<EntryOptions> for EntryOptionsBuilder {
    fn from(options: EntryOptions) -> Self {
        Self {
            filename: options.filename,
            last_modification_date: Some(options.last_modification_date),
            force_zip64: options.force_zip64,
            aliases: options.aliases,
        }
    }
}

impl EntryOptionsBuilder {
    /// Constructs a new builder for an entry with the given filename.
    pub fn new(filename: String) -> Self {
        Self { filename: Some(filename), ..Default::default() }
    }

    /// Constructs a new builder for an entry whose name is derived from its payload or generated by the writer.
    pub fn unnamed() -> Self {
        Self::default()
    }

    /// Sets the entry's filename.
    pub fn filename(mut self, filename: String) -> Self {
        self.filename = Some(filename);
        self
    }

    /// Sets the entry's last modification date.
    ///
    /// If unset, the current time is used.
    pub fn last_modification_date(mut self, date: ZipDateTime) -> Self {
        self.last_modification_date = Some(date);
        self
    }

    /// Forces the entry to be written with ZIP64 sizes and offsets, even if it would fit without them.
    pub fn force_zip64(mut self, force: bool) -> Self {
        self.force_zip64 = force;
        self
    }

    /// Adds a name under which the entry's data is additionally listed, without the data being written again.
    pub fn alias(mut self, alias: String) -> Self {
        self.aliases.push(alias);
        self
    }

    /// Adds several aliases in order.
    pub fn aliases<I: IntoIterator<Item = String>>(mut self, aliases: I) -> Self {
        self.aliases.extend(aliases);
        self
    }

    /// Consumes this builder and returns the final [`EntryOptions`].
    pub fn build(self) -> EntryOptions {
        self.into()
    }
}
