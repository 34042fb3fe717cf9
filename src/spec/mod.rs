// Copyright (c) 2021 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

//! Byte-level layouts of the ZIP and ZIP64 records this crate writes and inspects.

pub mod consts;
pub mod extra_field;
pub mod header;
pub mod record;
pub mod registry;
pub mod version;
