// Copyright (c) 2023 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

use crate::base::write::ZipStreamWriter;
use crate::spec::consts::{CDH_SIGNATURE, NON_ZIP64_MAX_NUM_FILES, NON_ZIP64_MAX_SIZE, ZIP64_EOCDR_SIGNATURE};
use crate::spec::extra_field::Zip64CentralExtraField;
use crate::spec::header::{
    CentralDirectoryFileHeader, EndOfCentralDirectoryRecord, LocalFileHeader, Zip64EndOfCentralDirectoryLocator,
    Zip64EndOfCentralDirectoryRecord,
};
use crate::spec::record::Record;
use crate::tests::init_logger;
use crate::tests::write::AsyncSink;
use crate::{EntryOptionsBuilder, ZipDateTime, ZipDateTimeBuilder};

use std::io::{Cursor, Read};

fn fixed_date() -> ZipDateTime {
    ZipDateTimeBuilder::new().year(2024).month(5).day(17).hour(12).minute(30).second(10).build()
}

fn bar_txt(force_zip64: bool) -> EntryOptionsBuilder {
    EntryOptionsBuilder::new(String::from("bar.txt")).last_modification_date(fixed_date()).force_zip64(force_zip64)
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|window| window == needle)
}

/// Writes a single 3 byte entry with 32-bit sizes.
#[tokio::test]
async fn test_write_classic_entry() {
    init_logger();

    let mut writer = ZipStreamWriter::new(Vec::new());
    let written = writer.add_entry(&b"Foo"[..], bar_txt(false)).await.unwrap();
    let buffer = writer.close().await.unwrap();

    assert_eq!(written.offset, 0);
    assert!(!written.zip64);
    assert_eq!(buffer.len(), 115);
    assert_eq!(&buffer[..2], b"PK");
    assert!(contains(&buffer, b"bar.txtFoo"));
    assert!(!contains(&buffer, &ZIP64_EOCDR_SIGNATURE.to_le_bytes()));

    let header = Record::<LocalFileHeader>::from_slice(&buffer).unwrap();
    assert_eq!(header.get("flags"), Some(0x800));
    assert_eq!(header.get("version"), Some(20));
    assert_eq!(header.get("compressed_size"), Some(3));
    assert_eq!(header.get("crc32"), Some(crc32fast::hash(b"Foo") as u64));
    assert_eq!(header.get("last_mod_file_date"), Some(fixed_date().dos_date() as u64));
    assert!(header.bytes("extra_field").is_empty());

    let central = Record::<CentralDirectoryFileHeader>::from_slice(&buffer[40..]).unwrap();
    assert_eq!(central.get("made_by"), Some(20));
    assert_eq!(central.get("rel_offset_of_local_header"), Some(0));
    assert_eq!(central.get("disk_no"), Some(0));
    assert_eq!(central.filename(), "bar.txt");

    let end = Record::<EndOfCentralDirectoryRecord>::from_slice(&buffer[93..]).unwrap();
    assert_eq!(end.get("total_entries"), Some(1));
    assert_eq!(end.get("cd_size"), Some(53));
    assert_eq!(end.get("offset_to_cd_start"), Some(40));
}

/// Writes the same entry forced into ZIP64.
#[tokio::test]
async fn test_write_forced_zip64_entry() {
    init_logger();

    let mut writer = ZipStreamWriter::new(Vec::new());
    let written = writer.add_entry(&b"Foo"[..], bar_txt(true)).await.unwrap();
    let buffer = writer.close().await.unwrap();

    assert!(written.zip64);
    assert_eq!(buffer.len(), 243);
    assert_eq!(&buffer[..2], b"PK");
    assert!(contains(&buffer, &[0x50, 0x4b, 0x06, 0x06]));

    let header = Record::<LocalFileHeader>::from_slice(&buffer).unwrap();
    assert!(header.is_zip64());
    assert_eq!(header.get("flags"), Some(0));
    assert_eq!(header.version_needed(), 45);
    assert_eq!(header.get("version"), Some(45));
    assert_eq!(header.payload_len().unwrap(), 3);
    assert_eq!(&buffer[57..60], b"Foo");

    let extra = header.zip64_extra_field().unwrap().expect("no zip64 extra field");
    assert_eq!(extra.get("size"), Some(16));
    assert_eq!(extra.get("uncompressed_size"), Some(3));

    let central = Record::<CentralDirectoryFileHeader>::from_slice(&buffer[60..]).unwrap();
    assert_eq!(central.get("signature"), Some(CDH_SIGNATURE as u64));
    assert!(central.is_zip64());
    assert_eq!(central.get("disk_no"), Some(NON_ZIP64_MAX_NUM_FILES as u64));
    assert_eq!(central.get("rel_offset_of_local_header"), Some(NON_ZIP64_MAX_SIZE as u64));

    let extra = Record::<Zip64CentralExtraField>::from_slice(central.bytes("extra_field")).unwrap();
    assert_eq!(extra.get("size"), Some(28));
    assert_eq!(extra.get("compressed_size"), Some(3));
    assert_eq!(extra.get("relative_offset"), Some(0));
    assert_eq!(extra.get("disk_no"), Some(0));

    let record = Record::<Zip64EndOfCentralDirectoryRecord>::from_slice(&buffer[145..]).unwrap();
    assert_eq!(record.get("record_len"), Some(44));
    assert_eq!(record.get("total_no_entries"), Some(1));
    assert_eq!(record.get("size_of_cd"), Some(85));
    assert_eq!(record.get("offset_of_cd_wrt_disk_no"), Some(60));

    let locator = Record::<Zip64EndOfCentralDirectoryLocator>::from_slice(&buffer[201..]).unwrap();
    assert_eq!(locator.get("relative_offset"), Some(145));

    let end = Record::<EndOfCentralDirectoryRecord>::from_slice(&buffer[221..]).unwrap();
    assert_eq!(end.get("offset_to_cd_start"), Some(60));
}

/// Entries switch to ZIP64 individually once the running offset crosses the threshold.
#[tokio::test]
async fn test_zip64_threshold_per_entry() {
    init_logger();

    let mut writer = ZipStreamWriter::new(Vec::new()).zip64_threshold(100);
    let first = writer.add_entry_whole(EntryOptionsBuilder::new("a".to_string()), &[b'a'; 50]).await.unwrap();
    let second = writer.add_entry_whole(EntryOptionsBuilder::new("b".to_string()), &[b'b'; 50]).await.unwrap();
    assert_eq!(second.offset, 81);
    let buffer = writer.close().await.unwrap();

    assert!(!first.zip64);
    assert!(second.zip64);
    assert!(contains(&buffer, &ZIP64_EOCDR_SIGNATURE.to_le_bytes()));

    let mut zip = zip::read::ZipArchive::new(Cursor::new(buffer)).unwrap();
    assert_eq!(zip.len(), 2);

    for (name, byte) in [("a", b'a'), ("b", b'b')] {
        let mut file = zip.by_name(name).unwrap();
        let mut data = Vec::new();
        file.read_to_end(&mut data).unwrap();
        assert_eq!(data, vec![byte; 50]);
    }
}

/// The classic end record saturates and ZIP64 end records are written once there are too many entries, even though
/// every entry is 32-bit.
#[tokio::test]
async fn test_write_zip64_file_many_entries() {
    init_logger();

    // The generated file will likely be ~6MB in size.
    let mut buffer = Vec::with_capacity(6_000_000);

    let mut writer = ZipStreamWriter::new(&mut buffer);
    for i in 0..=u16::MAX as u32 + 1 {
        let entry = EntryOptionsBuilder::new(i.to_string());
        let written = writer.add_entry_whole(entry, &[]).await.unwrap();
        assert!(!written.zip64);
    }
    writer.close().await.unwrap();

    let mut zip = zip::read::ZipArchive::new(Cursor::new(buffer)).unwrap();
    assert_eq!(zip.len(), u16::MAX as usize + 2);

    for i in [0, 1000, u16::MAX as u32 + 1] {
        zip.by_name(&i.to_string()).unwrap();
    }
}

#[tokio::test]
async fn test_zip64_when_many_files_sink() {
    let mut sink = AsyncSink;
    let mut writer = ZipStreamWriter::new(&mut sink);
    for i in 0..=u16::MAX as u32 + 1 {
        let entry = EntryOptionsBuilder::new(format!("{i}"));
        writer.add_entry_whole(entry, &[]).await.unwrap();
    }
    assert_eq!(writer.directory_len(), u16::MAX as usize + 2);
    writer.finalize().await.unwrap();
    assert!(writer.is_closed());
}

/// Entries are read back with sizes above the 32-bit range reported through their extra fields.
#[tokio::test]
async fn test_forced_zip64_archive_reads_back() {
    init_logger();

    let mut writer = ZipStreamWriter::new(Vec::new());
    writer.add_entry(&b"Foo"[..], bar_txt(true)).await.unwrap();
    writer.add_entry(&b"Hello, World!"[..], bar_txt(false).filename("hello.txt".to_string())).await.unwrap();
    let buffer = writer.close().await.unwrap();

    let mut zip = zip::read::ZipArchive::new(Cursor::new(buffer)).unwrap();
    let mut data = String::new();
    zip.by_name("bar.txt").unwrap().read_to_string(&mut data).unwrap();
    assert_eq!(data, "Foo");

    data.clear();
    zip.by_name("hello.txt").unwrap().read_to_string(&mut data).unwrap();
    assert_eq!(data, "Hello, World!");
}
