// Copyright (c) 2021 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

//! A module which holds relevant error reporting structures/types.
//!
//! Note that sink backpressure is not represented here: a saturated sink returns [`Poll::Pending`] from its
//! [`AsyncWrite`] implementation and the writer's future simply resumes once the sink wakes it.
//!
//! [`Poll::Pending`]: std::task::Poll::Pending
//! [`AsyncWrite`]: futures_lite::io::AsyncWrite

use thiserror::Error;

/// A Result type alias over ZipError to minimise repetition.
pub type Result<V> = std::result::Result<V, ZipError>;

/// An enum of possible errors and their descriptions.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ZipError {
    #[error("field '{field}' of {record} has no value and no default")]
    MissingFieldValue { record: &'static str, field: &'static str },
    #[error("value {value:#x} does not fit the {width} byte field '{field}' of {record}")]
    FieldOverflow { record: &'static str, field: &'static str, value: u64, width: usize },
    #[error("field '{field}' of {record} has an unsupported width of {width} bytes")]
    InvalidFieldWidth { record: &'static str, field: &'static str, width: u64 },
    #[error("size field '{field}' of {record} is smaller than the bytes it covers")]
    InvalidRecordSize { record: &'static str, field: &'static str },

    #[error("no record type is registered for signature {0:#010x}")]
    UnknownRecordType(u32),
    #[error("ran out of bytes while reading field '{field}' of {record}")]
    TruncatedRead { record: &'static str, field: &'static str },

    #[error("the archive writer has been closed")]
    WriterClosed,
    #[error("alias '{alias}' of '{entry}' would grow the embedded headers past {limit} bytes")]
    AliasOverflow { entry: String, alias: String, limit: usize },
    #[error("filename too large")]
    FileNameTooLarge,

    #[error("an upstream reader or writer returned an error: {0}")]
    UpstreamIoError(#[from] std::io::Error),
}
