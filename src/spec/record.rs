// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

//! A generic codec for typed binary records.
//!
//! A record type is described once by a static [`Schema`]: an ordered list of [`Field`] descriptors. A single
//! generic [`Record`] instance type holds the values for any schema, and encoding/decoding walks the descriptors in
//! order. All multi-byte integers are little-endian.
//!
//! Fields may be derived from other state rather than set directly:
//! - [`Derived::LenOf`] fields always report the length of their buffer and cannot be set.
//! - [`Derived::SizeOfRest`] fields are recomputed by the explicit pre-encode step [`Record::derive()`].

use crate::error::{Result, ZipError};

use std::fmt;
use std::io::{ErrorKind, Read};
use std::marker::PhantomData;

/// The wire representation of a single field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldType {
    U8,
    U16,
    U32,
    U64,
    /// An unsigned integer whose byte width is held by the named sibling field.
    Sized(&'static str),
    /// A variable-length byte buffer.
    Bytes(BytesLen),
}

impl FieldType {
    /// Returns the fixed encoded width of this type, or zero for variable-width types.
    pub const fn size(&self) -> usize {
        match self {
            FieldType::U8 => 1,
            FieldType::U16 => 2,
            FieldType::U32 => 4,
            FieldType::U64 => 8,
            FieldType::Sized(_) | FieldType::Bytes(_) => 0,
        }
    }
}

/// Where a variable-length field finds its length when decoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BytesLen {
    /// The length is held by the named `*_len` field.
    Field(&'static str),
    /// The buffer fills whatever the named size field counts beyond the fields already read after it.
    Remainder(&'static str),
}

/// How a field's value is computed, if it is not set directly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Derived {
    None,
    /// The byte length of the named buffer field.
    LenOf(&'static str),
    /// The number of encoded bytes following this field.
    SizeOfRest,
}

/// Whether a field is present on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Presence {
    Always,
    /// Present only when any bit of the mask is set in the named, earlier, field.
    FlagSet(&'static str, u64),
}

impl Presence {
    fn holds(&self, lookup: impl Fn(&str) -> Option<u64>) -> bool {
        match self {
            Presence::Always => true,
            Presence::FlagSet(flags, mask) => lookup(flags).unwrap_or(0) & mask != 0,
        }
    }
}

/// A single field descriptor within a [`Schema`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Field {
    pub ty: FieldType,
    pub name: &'static str,
    pub default: Option<u64>,
    pub derived: Derived,
    pub presence: Presence,
}

impl Field {
    const fn new(ty: FieldType, name: &'static str) -> Self {
        Self { ty, name, default: None, derived: Derived::None, presence: Presence::Always }
    }

    pub const fn u8(name: &'static str) -> Self {
        Self::new(FieldType::U8, name)
    }

    pub const fn u16(name: &'static str) -> Self {
        Self::new(FieldType::U16, name)
    }

    pub const fn u32(name: &'static str) -> Self {
        Self::new(FieldType::U32, name)
    }

    pub const fn u64(name: &'static str) -> Self {
        Self::new(FieldType::U64, name)
    }

    /// An integer field whose width (1, 2, 4 or 8 bytes) is read from `width_field`.
    pub const fn sized(name: &'static str, width_field: &'static str) -> Self {
        Self::new(FieldType::Sized(width_field), name)
    }

    pub const fn bytes(name: &'static str, len: BytesLen) -> Self {
        Self::new(FieldType::Bytes(len), name)
    }

    pub const fn with_default(mut self, value: u64) -> Self {
        self.default = Some(value);
        self
    }

    pub const fn len_of(mut self, buffer: &'static str) -> Self {
        self.derived = Derived::LenOf(buffer);
        self
    }

    pub const fn size_of_rest(mut self) -> Self {
        self.derived = Derived::SizeOfRest;
        self
    }

    pub const fn present_if(mut self, flags: &'static str, mask: u64) -> Self {
        self.presence = Presence::FlagSet(flags, mask);
        self
    }
}

/// Sums the widths of all fixed-width fields in a field list.
pub const fn fixed_len(fields: &[Field]) -> usize {
    let mut total = 0;
    let mut index = 0;
    while index < fields.len() {
        total += fields[index].ty.size();
        index += 1;
    }
    total
}

/// The static description of a record type.
pub trait Schema {
    /// The record type's name, used in diagnostics and errors.
    const NAME: &'static str;
    /// The ordered field descriptors.
    const FIELDS: &'static [Field];

    fn index_of(name: &str) -> Option<usize> {
        Self::FIELDS.iter().position(|field| field.name == name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Slot {
    Int(Option<u64>),
    Bytes(Vec<u8>),
}

/// An instance of a record described by the schema `S`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record<S> {
    slots: Vec<Slot>,
    _schema: PhantomData<S>,
}

impl<S: Schema> Default for Record<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Schema> Record<S> {
    /// Constructs a record holding each field's declared default.
    pub fn new() -> Self {
        let slots = S::FIELDS
            .iter()
            .map(|field| match field.ty {
                FieldType::Bytes(_) => Slot::Bytes(Vec::new()),
                _ => Slot::Int(field.default),
            })
            .collect();

        Self { slots, _schema: PhantomData }
    }

    /// Returns the field descriptors of this record's schema.
    pub fn fields(&self) -> &'static [Field] {
        S::FIELDS
    }

    /// Returns the current value of an integer field.
    ///
    /// `*_len` fields report the length of their buffer.
    pub fn get(&self, name: &str) -> Option<u64> {
        let index = S::index_of(name)?;
        match S::FIELDS[index].derived {
            Derived::LenOf(buffer) => Some(self.bytes(buffer).len() as u64),
            _ => match &self.slots[index] {
                Slot::Int(value) => *value,
                Slot::Bytes(_) => None,
            },
        }
    }

    /// Returns the contents of a variable-length field, or an empty slice for unknown names.
    pub fn bytes(&self, name: &str) -> &[u8] {
        match S::index_of(name).map(|index| &self.slots[index]) {
            Some(Slot::Bytes(buffer)) => buffer,
            _ => &[],
        }
    }

    /// Sets the value of an integer field.
    ///
    /// `*_len` fields follow their buffers and cannot be set.
    pub fn set(&mut self, name: &str, value: impl Into<u64>) -> &mut Self {
        let index = S::index_of(name);
        debug_assert!(index.is_some(), "{} has no field named '{name}'", S::NAME);

        if let Some(index) = index {
            let settable = !matches!(S::FIELDS[index].derived, Derived::LenOf(_));
            debug_assert!(settable, "'{name}' of {} is derived from its buffer", S::NAME);

            if let (true, Slot::Int(slot)) = (settable, &mut self.slots[index]) {
                *slot = Some(value.into());
            }
        }
        self
    }

    /// Sets the contents of a variable-length field, keeping its `*_len` field in step.
    pub fn set_bytes(&mut self, name: &str, value: impl Into<Vec<u8>>) -> &mut Self {
        let index = S::index_of(name);
        debug_assert!(index.is_some(), "{} has no field named '{name}'", S::NAME);

        if let Some(Slot::Bytes(buffer)) = index.map(|index| &mut self.slots[index]) {
            *buffer = value.into();
        }
        self
    }

    /// Consumes this record and returns it with an integer field set.
    pub fn with(mut self, name: &str, value: impl Into<u64>) -> Self {
        self.set(name, value);
        self
    }

    /// Consumes this record and returns it with a variable-length field set.
    pub fn with_bytes(mut self, name: &str, value: impl Into<Vec<u8>>) -> Self {
        self.set_bytes(name, value);
        self
    }

    /// Returns whether a field is written given the current values of its siblings.
    pub fn is_present(&self, field: &Field) -> bool {
        field.presence.holds(|name| self.get(name))
    }

    /// Recomputes every [`Derived::SizeOfRest`] field from the current contents of this record.
    ///
    /// This is the first phase of encoding a record with derived fields and must be called after the last mutation.
    pub fn derive(&mut self) -> &mut Self {
        for (index, field) in S::FIELDS.iter().enumerate() {
            if field.derived != Derived::SizeOfRest {
                continue;
            }

            let rest: usize = S::FIELDS[index + 1..]
                .iter()
                .filter(|field| self.is_present(field))
                .map(|field| self.encoded_width(field))
                .sum();

            if let Slot::Int(slot) = &mut self.slots[index] {
                *slot = Some(rest as u64);
            }
        }
        self
    }

    fn encoded_width(&self, field: &Field) -> usize {
        match field.ty {
            FieldType::Sized(width_field) => self.get(width_field).unwrap_or(0) as usize,
            FieldType::Bytes(_) => self.bytes(field.name).len(),
            ty => ty.size(),
        }
    }

    /// Returns the number of bytes this record encodes to.
    pub fn encoded_len(&self) -> usize {
        S::FIELDS.iter().filter(|field| self.is_present(field)).map(|field| self.encoded_width(field)).sum()
    }

    /// Serialises this record's present fields in declaration order.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::with_capacity(self.encoded_len());
        self.encode_into(&mut buffer)?;
        Ok(buffer)
    }

    /// Serialises this record onto the end of an existing buffer.
    pub fn encode_into(&self, buffer: &mut Vec<u8>) -> Result<()> {
        for (index, field) in S::FIELDS.iter().enumerate() {
            if !self.is_present(field) {
                continue;
            }

            let width = match field.ty {
                FieldType::Bytes(_) => {
                    buffer.extend_from_slice(self.bytes(field.name));
                    continue;
                }
                FieldType::Sized(width_field) => {
                    let width = self.get(width_field).ok_or(ZipError::MissingFieldValue {
                        record: S::NAME,
                        field: width_field,
                    })?;
                    check_width::<S>(field, width)?
                }
                ty => ty.size(),
            };

            let value = match field.derived {
                Derived::LenOf(buffer) => Some(self.bytes(buffer).len() as u64),
                _ => match &self.slots[index] {
                    Slot::Int(value) => *value,
                    Slot::Bytes(_) => None,
                },
            };
            let value = value.ok_or(ZipError::MissingFieldValue { record: S::NAME, field: field.name })?;

            if width < 8 && value >> (width * 8) != 0 {
                return Err(ZipError::FieldOverflow { record: S::NAME, field: field.name, value, width });
            }
            buffer.extend_from_slice(&value.to_le_bytes()[..width]);
        }

        Ok(())
    }

    /// Parses a record from a reader, starting at the field with index `start`.
    ///
    /// Fields before `start` keep their declared defaults; this is used when a caller has already consumed the
    /// signature in order to select the record type.
    pub fn decode<R: Read + ?Sized>(reader: &mut R, start: usize) -> Result<Self> {
        let mut record = Self::new();
        // Integer values as read, including `*_len` fields which are not stored.
        let mut raw: Vec<Option<u64>> = S::FIELDS.iter().map(|field| field.default).collect();
        // Bytes consumed so far, and the position at which each field ended.
        let mut consumed = 0usize;
        let mut ends = vec![0usize; S::FIELDS.len()];

        for (index, field) in S::FIELDS.iter().enumerate().skip(start) {
            let lookup = |name: &str| S::index_of(name).and_then(|index| raw[index]);

            if !field.presence.holds(lookup) {
                raw[index] = None;
                record.slots[index] = Slot::Int(None);
                ends[index] = consumed;
                continue;
            }

            let width = match field.ty {
                FieldType::Bytes(len) => {
                    let len = match len {
                        BytesLen::Field(len_field) => lookup(len_field).unwrap_or(0),
                        BytesLen::Remainder(size_field) => {
                            let size_index = S::index_of(size_field).unwrap_or(index);
                            let covered = (consumed - ends[size_index]) as u64;
                            let size = lookup(size_field).unwrap_or(0);
                            size.checked_sub(covered).ok_or(ZipError::InvalidRecordSize {
                                record: S::NAME,
                                field: size_field,
                            })?
                        }
                    };

                    let mut buffer = Vec::new();
                    (&mut *reader).take(len).read_to_end(&mut buffer)?;
                    if (buffer.len() as u64) < len {
                        return Err(ZipError::TruncatedRead { record: S::NAME, field: field.name });
                    }

                    consumed += buffer.len();
                    ends[index] = consumed;
                    record.slots[index] = Slot::Bytes(buffer);
                    continue;
                }
                FieldType::Sized(width_field) => {
                    let width = lookup(width_field)
                        .ok_or(ZipError::MissingFieldValue { record: S::NAME, field: width_field })?;
                    check_width::<S>(field, width)?
                }
                ty => ty.size(),
            };

            let mut bytes = [0u8; 8];
            reader.read_exact(&mut bytes[..width]).map_err(|err| match err.kind() {
                ErrorKind::UnexpectedEof => ZipError::TruncatedRead { record: S::NAME, field: field.name },
                _ => ZipError::UpstreamIoError(err),
            })?;
            let value = u64::from_le_bytes(bytes);

            consumed += width;
            ends[index] = consumed;
            raw[index] = Some(value);
            if !matches!(field.derived, Derived::LenOf(_)) {
                record.slots[index] = Slot::Int(Some(value));
            }
        }

        Ok(record)
    }

    /// Parses a whole record from a byte slice.
    pub fn from_slice(mut bytes: &[u8]) -> Result<Self> {
        Self::decode(&mut bytes, 0)
    }
}

fn check_width<S: Schema>(field: &Field, width: u64) -> Result<usize> {
    match width {
        1 | 2 | 4 | 8 => Ok(width as usize),
        width => Err(ZipError::InvalidFieldWidth { record: S::NAME, field: field.name, width }),
    }
}

impl<S: Schema> fmt::Display for Record<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", S::NAME)?;

        for field in S::FIELDS.iter().filter(|field| self.is_present(field)) {
            let width = self.encoded_width(field);
            match field.ty {
                FieldType::Bytes(_) => {
                    let preview = String::from_utf8_lossy(&self.bytes(field.name)[..width.min(48)]).into_owned();
                    writeln!(f, "{:>18} {:>20} {:>3} {} {:?}", "-", width, "var", field.name, preview)?;
                }
                _ => match self.get(field.name) {
                    Some(value) => writeln!(f, "{value:#018x} {value:>20} {width:>3} {}", field.name)?,
                    None => writeln!(f, "{:>18} {:>20} {width:>3} {}", "?", "?", field.name)?,
                },
            }
        }

        Ok(())
    }
}
