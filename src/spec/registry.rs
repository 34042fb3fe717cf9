// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

//! Static lookup tables from signatures and extra field ids to record decoders.

use crate::error::Result;
use crate::spec::consts::*;
use crate::spec::extra_field::*;
use crate::spec::header::*;
use crate::spec::record::{Record, Schema};

use std::fmt;
use std::io::Read;

macro_rules! any_record {
    ($($schema:ident),* $(,)?) => {
        /// A decoded record of any type within the catalog.
        #[derive(Clone, Debug, PartialEq, Eq)]
        pub enum AnyRecord {
            $($schema(Record<$schema>),)*
        }

        impl AnyRecord {
            /// Returns the name of the record's type.
            pub fn name(&self) -> &'static str {
                match self {
                    $(AnyRecord::$schema(_) => <$schema as Schema>::NAME,)*
                }
            }
        }

        impl fmt::Display for AnyRecord {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $(AnyRecord::$schema(record) => fmt::Display::fmt(record, f),)*
                }
            }
        }

        $(
            impl From<Record<$schema>> for AnyRecord {
                fn from(record: Record<$schema>) -> Self {
                    AnyRecord::$schema(record)
                }
            }
        )*
    };
}

any_record!(
    LocalFileHeader,
    CentralDirectoryFileHeader,
    EndOfCentralDirectoryRecord,
    Zip64EndOfCentralDirectoryRecord,
    Zip64EndOfCentralDirectoryLocator,
    DigitalSignature,
    DataDescriptor64,
    Zip64ExtraField,
    Zip64CentralExtraField,
    UnixExtraField,
    ExtendedTimestamp,
    NewUnixExtraField,
    EmbeddedHeader,
);

/// Decodes a record of a known type from `reader`, starting at the given field index.
pub type DecodeFn = fn(&mut dyn Read, usize) -> Result<AnyRecord>;

fn decode_as<S: Schema>(reader: &mut dyn Read, start: usize) -> Result<AnyRecord>
where
    AnyRecord: From<Record<S>>,
{
    Ok(Record::<S>::decode(reader, start)?.into())
}

/// Record types keyed by their leading 4 byte signature.
pub static SIGNATURES: &[(u32, DecodeFn)] = &[
    (LFH_SIGNATURE, decode_as::<LocalFileHeader>),
    (CDH_SIGNATURE, decode_as::<CentralDirectoryFileHeader>),
    (EOCDR_SIGNATURE, decode_as::<EndOfCentralDirectoryRecord>),
    (ZIP64_EOCDR_SIGNATURE, decode_as::<Zip64EndOfCentralDirectoryRecord>),
    (ZIP64_EOCDL_SIGNATURE, decode_as::<Zip64EndOfCentralDirectoryLocator>),
    (DIGITAL_SIGNATURE_SIGNATURE, decode_as::<DigitalSignature>),
    (DATA_DESCRIPTOR_SIGNATURE, decode_as::<DataDescriptor64>),
];

/// Extra field types keyed by their 2 byte id.
///
/// The ZIP64 id is shared between the local and central forms; see [`decode_extra_field()`].
pub static EXTRA_FIELDS: &[(u16, DecodeFn)] = &[
    (ZIP64_EXTRA_FIELD_ID, decode_as::<Zip64ExtraField>),
    (UNIX_EXTRA_FIELD_ID, decode_as::<UnixExtraField>),
    (EXTENDED_TIMESTAMP_ID, decode_as::<ExtendedTimestamp>),
    (NEW_UNIX_EXTRA_FIELD_ID, decode_as::<NewUnixExtraField>),
    (EMBEDDED_HEADER_ID, decode_as::<EmbeddedHeader>),
];

/// Returns the decoder registered for a signature.
pub fn lookup_signature(signature: u32) -> Option<DecodeFn> {
    SIGNATURES.iter().find(|(known, _)| *known == signature).map(|(_, decode)| *decode)
}

/// Decodes a whole extra field sub-record, returning `None` for unregistered ids.
pub fn decode_extra_field(field: &RawExtraField<'_>) -> Option<Result<AnyRecord>> {
    let mut bytes = field.bytes;

    if field.id == ZIP64_EXTRA_FIELD_ID && field.bytes.len() >= ZIP64_CENTRAL_EXTRA_FIELD_LENGTH {
        return Some(decode_as::<Zip64CentralExtraField>(&mut bytes, 0));
    }

    let (_, decode) = EXTRA_FIELDS.iter().find(|(id, _)| *id == field.id)?;
    Some(decode(&mut bytes, 0))
}
