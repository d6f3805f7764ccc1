//! The same descriptions bound to file-backed sources.

use binview::config::IoConfig;
use binview::interpret::{FormatContext, Locale};
use binview::io::error::IoError;
use binview::io::{shared_handle, ByteSource, FileMode, SourceKind};
use binview::DataTree;
use std::fs::File;
use std::io::{Seek, SeekFrom};

use crate::common::*;

fn all_values(fixture: &ZipFixture, source: ByteSource, config: &IoConfig) -> Vec<String> {
    let data = DataTree::build_with_config(&fixture.tree, fixture.root, source, config).unwrap();
    let ctx = FormatContext::new(Locale::EnUs);
    fixture
        .tree
        .descendants(fixture.root)
        .map(|id| data.format(id, &ctx).unwrap().unwrap_or_default())
        .collect()
}

#[test]
fn test_memory_file_and_mmap_agree() {
    let fixture = zip_fixture("report.csv", b"a,b,c\n1,2,3\n", METHOD_STORED);
    let temp = create_temp_file(&fixture.bytes);

    let expected = all_values(
        &fixture,
        ByteSource::from(fixture.bytes.clone()),
        &IoConfig::default(),
    );

    let streamed_config = IoConfig {
        prefer_mmap: false,
        ..IoConfig::default()
    };
    let streamed = ByteSource::open(temp.path(), &streamed_config).unwrap();
    assert_eq!(streamed.kind(), SourceKind::File);
    assert_eq!(all_values(&fixture, streamed, &streamed_config), expected);

    let mapped = ByteSource::open(temp.path(), &IoConfig::default()).unwrap();
    assert_eq!(mapped.kind(), SourceKind::Memory);
    assert_eq!(all_values(&fixture, mapped, &IoConfig::default()), expected);
}

#[test]
fn test_small_refill_buffer() {
    // Every field spans several refills.
    let fixture = zip_fixture("a-longer-file-name.txt", b"payload bytes", METHOD_STORED);
    let temp = create_temp_file(&fixture.bytes);
    let config = IoConfig {
        file_buffer_size: 3,
        prefer_mmap: false,
        ..IoConfig::default()
    };
    let source = ByteSource::open(temp.path(), &config).unwrap();
    let values = all_values(&fixture, source, &config);
    assert!(values.contains(&"a-longer-file-name.txt".to_string()));
    assert!(values.contains(&"payload bytes".to_string()));
    assert!(values.contains(&"a-longer-file-name.txt (13 bytes)".to_string()));
}

#[test]
fn test_shared_handle_position_is_preserved() {
    let fixture = zip_fixture("test.txt", b"shared", METHOD_STORED);
    let temp = create_temp_file(&fixture.bytes);

    let handle = shared_handle(File::open(temp.path()).unwrap());
    handle.borrow_mut().seek(SeekFrom::Start(5)).unwrap();

    let source = ByteSource::from_handle(handle.clone());
    let data = DataTree::build(&fixture.tree, fixture.root, source).unwrap();
    let ctx = FormatContext::new(Locale::EnUs);
    assert_eq!(data.format(fixture.data, &ctx).unwrap().as_deref(), Some("shared"));
    assert_eq!(
        data.format(fixture.header, &ctx).unwrap().as_deref(),
        Some("test.txt (6 bytes)")
    );

    assert_eq!(handle.borrow_mut().stream_position().unwrap(), 5);
}

#[test]
fn test_subsets_of_exclusive_files_are_shared() {
    let fixture = zip_fixture("x", b"y", METHOD_STORED);
    let temp = create_temp_file(&fixture.bytes);
    let source = ByteSource::from_file(File::open(temp.path()).unwrap());
    let ByteSource::File(region) = &source else {
        panic!("expected a file source");
    };
    assert_eq!(region.mode(), FileMode::Exclusive);

    let sub = source.subset(4, 2).unwrap();
    let ByteSource::File(sub_region) = &sub else {
        panic!("expected a file source");
    };
    assert_eq!(sub_region.mode(), FileMode::Shared);
    assert_eq!(sub_region.offset(), 4);
    assert_eq!(sub.to_vec().unwrap(), 20u16.to_le_bytes());
}

#[test]
fn test_open_rejects_large_files() {
    let temp = create_temp_file(&[0u8; 64]);
    let config = IoConfig {
        max_file_size: 16,
        ..IoConfig::default()
    };
    let err = ByteSource::open(temp.path(), &config).unwrap_err();
    assert!(matches!(
        err,
        IoError::FileTooLarge {
            limit: 16,
            found: 64
        }
    ));
}

#[test]
fn test_open_empty_file() {
    let temp = create_temp_file(&[]);
    let source = ByteSource::open(temp.path(), &IoConfig::default()).unwrap();
    assert_eq!(source.size().unwrap(), 0);
    assert!(!source.cursor().unwrap().has_next());
}

#[test]
fn test_open_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = ByteSource::open(dir.path().join("missing.zip"), &IoConfig::default()).unwrap_err();
    assert!(matches!(err, IoError::Std(_)));
}
