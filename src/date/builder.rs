// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

use crate::ZipDateTime;

/// A builder for [`ZipDateTime`].
pub struct ZipDateTimeBuilder(pub(crate) ZipDateTime);

impl Default for ZipDateTimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ZipDateTimeBuilder {
    /// Constructs a new builder at the MS-DOS epoch's zeroed representation.
    pub fn new() -> Self {
        Self(ZipDateTime { date: 0, time: 0 })
    }

    /// Sets the year, clamped to the representable range of 1980 to 2107.
    pub fn year(mut self, year: i32) -> Self {
        let year = (year.clamp(1980, 2107) - 1980) as u16;
        self.0.date = (self.0.date & !0xFE00) | (year << 9);
        self
    }

    pub fn month(mut self, month: u32) -> Self {
        self.0.date = (self.0.date & !0x1E0) | (((month & 0xF) as u16) << 5);
        self
    }

    pub fn day(mut self, day: u32) -> Self {
        self.0.date = (self.0.date & !0x1F) | (day & 0x1F) as u16;
        self
    }

    pub fn hour(mut self, hour: u32) -> Self {
        self.0.time = (self.0.time & !0xF800) | (((hour & 0x1F) as u16) << 11);
        self
    }

    pub fn minute(mut self, minute: u32) -> Self {
        self.0.time = (self.0.time & !0x7E0) | (((minute & 0x3F) as u16) << 5);
        self
    }

    /// Sets the second.
    ///
    /// Note that MS-DOS has a maximum granularity of two seconds.
    pub fn second(mut self, second: u32) -> Self {
        self.0.time = (self.0.time & !0x1F) | ((second >> 1) & 0x1F) as u16;
        self
    }

    /// Consumes this builder and returns a final [`ZipDateTime`].
    pub fn build(self) -> ZipDateTime {
        self.into()
    }
}
