// Copyright (c) 2023 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

//! A set of [`tokio`]-specific type aliases and features.
//!
//! # Usage
//! With the `tokio` feature enabled, types from the [`base`] implementation will implement additional constructors
//! for use with [`tokio`]. These constructors internally implement conversion between the required async IO traits.
//! They are defined as:
//! - [`base::write::ZipStreamWriter::with_tokio()`]
//! - [`base::write::ZipStreamWriter::add_path()`] (with the `tokio-fs` feature)
//!
//! The types returned by these constructors contain a wrapping compatibility type provided by an external crate.
//! These compatibility types cannot be named unless you also pull in the [`tokio_util`] dependency manually, so type
//! aliases are provided within this module.

#[cfg(doc)]
use crate::base;
#[cfg(doc)]
use tokio;
#[cfg(doc)]
use tokio_util;

pub mod write {
    //! A module which supports writing ZIP files.

    #[cfg(doc)]
    use crate::base;
    use tokio_util::compat::Compat;

    /// A [`tokio`]-specific type alias for [`base::write::ZipStreamWriter`];
    pub type ZipStreamWriter<W> = crate::base::write::ZipStreamWriter<Compat<W>>;

    /// A [`tokio`]-specific type alias for [`base::write::ChunkedWriter`];
    pub type ChunkedWriter<W> = crate::base::write::ChunkedWriter<Compat<W>>;
}
