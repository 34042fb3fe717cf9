// Copyright (c) 2022-2023 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

//! A module which supports inspecting written ZIP files.

pub mod dump;

pub use dump::{dump_archive, DumpSummary};
