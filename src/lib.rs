// Copyright (c) 2021-2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

//! An asynchronous, streaming ZIP archive writer with per-entry ZIP64 support.
//!
//! ## Features
//! - A runtime-agnostic base implementation which acts over `futures-lite`'s IO traits.
//! - Per-entry selection between 32-bit and ZIP64 sizes, switching only once the running offset requires it.
//! - Aliased entries, listing one copy of data under several names without writing it again.
//! - Exact size prediction for archives written entirely as ZIP64.
//! - Optional `tokio` support via the `tokio` and `tokio-fs` features.
//!
//! ## Example
//! ```no_run
//! # use async_zip64::{EntryOptionsBuilder, base::write::ZipStreamWriter};
//! # use async_zip64::error::Result;
//! #
//! # async fn run() -> Result<()> {
//! let mut writer = ZipStreamWriter::new(Vec::<u8>::new());
//!
//! writer.add_entry(&b"Foo"[..], EntryOptionsBuilder::new(String::from("bar.txt"))).await?;
//! let archive = writer.close().await?;
//! #   Ok(())
//! # }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod base;
pub mod error;
pub mod predict;
pub mod spec;

#[cfg(feature = "tokio")]
pub mod tokio;

pub(crate) mod date;
pub(crate) mod entry;

pub use crate::base::write::{WrittenEntry, ZipStreamWriter};
pub use crate::date::{builder::ZipDateTimeBuilder, ZipDateTime};
pub use crate::entry::{builder::EntryOptionsBuilder, EntryOptions};
pub use crate::predict::{predict_size, PlannedEntry};
