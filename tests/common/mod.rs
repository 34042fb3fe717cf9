// Copyright (c) 2023 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

#![allow(dead_code)]

use async_zip64::base::write::ZipStreamWriter;
use async_zip64::{EntryOptionsBuilder, WrittenEntry};
use std::io::{Cursor, Read};

pub const FILE_LIST: &[(&str, &str)] = &[
    ("sample_data/alpha/back_to_front.txt", "zyxwvutsrqponmlkjihgfedcba"),
    ("sample_data/alpha/front_to_back.txt", "abcdefghijklmnopqrstuvwxyz"),
    ("sample_data/numeric/forward.txt", "0123456789"),
    ("sample_data/numeric/reverse.txt", "9876543210"),
    ("sample_data/empty.txt", ""),
];

pub async fn compress_to_mem(force_zip64: bool) -> (Vec<u8>, Vec<WrittenEntry>) {
    let mut bytes = Vec::with_capacity(10_000);
    let mut writer = ZipStreamWriter::new(&mut bytes);
    let mut written = Vec::new();

    for (fname, content) in FILE_LIST {
        let opts = EntryOptionsBuilder::new(fname.to_string()).force_zip64(force_zip64);
        written.push(writer.add_entry(content.as_bytes(), opts).await.unwrap());
    }
    writer.close().await.unwrap();
    (bytes, written)
}

pub fn check_decompress_mem(zip_data: Vec<u8>) {
    let mut zip = zip::ZipArchive::new(Cursor::new(zip_data)).unwrap();
    assert_eq!(zip.len(), FILE_LIST.len());

    for (fname, expected) in FILE_LIST {
        let mut file = zip.by_name(fname).unwrap();
        let mut output = String::new();
        file.read_to_string(&mut output).unwrap();
        assert_eq!(&output, expected, "for {fname}, expect zip data to match file data");
    }
}
