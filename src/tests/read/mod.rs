// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

use crate::base::read::{dump_archive, DumpSummary};
use crate::base::write::ZipStreamWriter;
use crate::error::ZipError;
use crate::tests::init_logger;
use crate::EntryOptionsBuilder;

async fn archive(data: &[u8], options: EntryOptionsBuilder) -> Vec<u8> {
    let mut writer = ZipStreamWriter::new(Vec::new());
    writer.add_entry_whole(options, data).await.unwrap();
    writer.close().await.unwrap()
}

fn dump(archive: &[u8]) -> (DumpSummary, String) {
    let mut out = Vec::new();
    let summary = dump_archive(archive, &mut out).unwrap();
    (summary, String::from_utf8(out).unwrap())
}

#[tokio::test]
async fn dump_classic_archive() {
    init_logger();

    let archive = archive(b"Foo", EntryOptionsBuilder::new("bar.txt".to_string())).await;
    let (summary, out) = dump(&archive);

    assert_eq!(summary, DumpSummary { records: 3, extra_fields: 0, unknown_signatures: 0 });
    assert!(out.starts_with(".0               LocalFileHeader\n"));
    assert!(out.contains("data \"Foo\"\n"));
    assert!(out.contains(".40              CentralDirectoryFileHeader\n"));
    assert!(out.contains(".93              EndOfCentralDirectoryRecord\n"));
}

#[tokio::test]
async fn dump_zip64_archive() {
    let archive = archive(b"Foo", EntryOptionsBuilder::new("bar.txt".to_string()).force_zip64(true)).await;
    let (summary, out) = dump(&archive);

    assert_eq!(summary, DumpSummary { records: 5, extra_fields: 1, unknown_signatures: 0 });
    assert!(out.contains("  Zip64ExtraField\n"));
    assert!(out.contains("Zip64EndOfCentralDirectoryRecord\n"));
    assert!(out.contains("Zip64EndOfCentralDirectoryLocator\n"));
    assert!(out.contains("data \"Foo\"\n"));
}

#[tokio::test]
async fn dump_nested_aliases() {
    let options = EntryOptionsBuilder::new("data.bin".to_string())
        .alias("alias-1.txt".to_string())
        .alias("alias-2.txt".to_string());
    let archive = archive(b"Foo", options).await;
    let (summary, out) = dump(&archive);

    // The data ends at 131, so one byte of padding precedes the central directory.
    assert_eq!(summary, DumpSummary { records: 5, extra_fields: 2, unknown_signatures: 1 });
    assert!(out.contains("  EmbeddedHeader\n"));
    assert!(out.contains("    LocalFileHeader\n"));
    assert!(out.contains("filename \"alias-2.txt\""));
    assert_eq!(out.matches("data \"Foo\"").count(), 1);
}

#[tokio::test]
async fn dump_skips_padding_and_unknown_bytes() {
    let archive = archive(b"Fo", EntryOptionsBuilder::new("bar.txt".to_string())).await;
    let (summary, _) = dump(&archive);
    assert_eq!(summary, DumpSummary { records: 3, extra_fields: 0, unknown_signatures: 1 });

    let mut prefixed = vec![0xde, 0xad, 0xbe, 0xef];
    prefixed.extend_from_slice(&archive);
    let (summary, out) = dump(&prefixed);
    assert_eq!(summary.records, 3);
    assert_eq!(summary.unknown_signatures, 3);
    assert!(out.starts_with(&format!(".{:<16}{:>16}", 0, "efbeadde")));
}

#[tokio::test]
async fn dump_truncated_data() {
    let archive = archive(b"Foo", EntryOptionsBuilder::new("bar.txt".to_string())).await;

    let result = dump_archive(&archive[..38], &mut Vec::new());
    assert!(matches!(result, Err(ZipError::TruncatedRead { field: "data", .. })));

    let result = dump_archive(&archive[..20], &mut Vec::new());
    assert!(matches!(result, Err(ZipError::TruncatedRead { record: "LocalFileHeader", .. })));
}
