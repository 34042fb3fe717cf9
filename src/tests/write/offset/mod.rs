// Copyright (c) 2022 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

use crate::base::write::io::offset::AsyncOffsetWriter;
use crate::tests::write::FailingSink;

use futures_lite::io::AsyncWriteExt;

#[tokio::test]
async fn basic() {
    let mut writer = AsyncOffsetWriter::new(Vec::new());
    assert_eq!(writer.offset(), 0);

    writer.write_all(b"Foo. Bar. Foo. Bar.").await.expect("failed to write data");
    assert_eq!(writer.offset(), 19);

    writer.write_all(b"Foo. Foo.").await.expect("failed to write data");
    assert_eq!(writer.offset(), 28);

    writer.write_all(b"Bar. Bar.").await.expect("failed to write data");
    assert_eq!(writer.offset(), 37);
}

#[tokio::test]
async fn pad_to_alignment() {
    let mut writer = AsyncOffsetWriter::new(Vec::new());

    assert_eq!(writer.pad_to(4).await.unwrap(), 0);

    writer.write_all(b"Foo").await.unwrap();
    assert_eq!(writer.pad_to(4).await.unwrap(), 1);
    assert_eq!(writer.offset(), 4);
    assert_eq!(writer.pad_to(4).await.unwrap(), 0);

    writer.write_all(b"F").await.unwrap();
    assert_eq!(writer.pad_to(16).await.unwrap(), 11);

    let inner = writer.into_inner();
    assert_eq!(inner.len(), 16);
    assert_eq!(&inner[..4], b"Foo\0");
}

#[tokio::test]
async fn only_accepted_bytes_are_counted() {
    let mut writer = AsyncOffsetWriter::new(FailingSink { remaining: 5 });

    assert!(writer.write_all(b"Foo. Bar.").await.is_err());
    assert_eq!(writer.offset(), 5);
}
