//! Formatting every field of a described ZIP entry.

use binview::interpret::{FormatContext, Interpretation, Locale};
use binview::io::ByteSource;
use binview::{BinviewError, DataTree, Node};

use crate::common::*;

fn formatted(fixture: &ZipFixture, data: &DataTree<'_>) -> Vec<(String, String)> {
    let ctx = FormatContext::new(Locale::EnUs);
    fixture
        .tree
        .descendants(fixture.root)
        .map(|id| {
            let desc = fixture.tree.node(id).unwrap().description().to_string();
            let value = data.format(id, &ctx).unwrap().unwrap_or_default();
            (desc, value)
        })
        .collect()
}

fn value_of(rows: &[(String, String)], desc: &str) -> String {
    rows.iter()
        .find(|(d, _)| d == desc)
        .map(|(_, v)| v.clone())
        .unwrap_or_else(|| panic!("no row for {desc}"))
}

#[test]
fn test_local_file_header_fields() {
    let fixture = zip_fixture("test.txt", &[0x78, 0x9c, 0x01, 0x02], METHOD_DEFLATE);
    let data = DataTree::build(&fixture.tree, fixture.root, ByteSource::from(fixture.bytes.clone()))
        .unwrap();
    let rows = formatted(&fixture, &data);

    assert_eq!(value_of(&rows, "Signature"), "0x504B0304");
    assert_eq!(value_of(&rows, "Version"), "20 (0x0014)");
    assert_eq!(
        value_of(&rows, "Flags"),
        "000000000000 (unused), 0 (no data descriptor), 00 (compression options), 1 (encrypted)"
    );
    assert_eq!(value_of(&rows, "Compression method"), "8 (deflate)");
    assert_eq!(value_of(&rows, "File modification time"), "13:45:58");
    assert_eq!(value_of(&rows, "File modification date"), "7/15/2023");
    assert_eq!(value_of(&rows, "CRC-32 checksum"), "0xEFBEADDE");
    assert_eq!(value_of(&rows, "Compressed size"), "4");
    assert_eq!(value_of(&rows, "Uncompressed size"), "8");
    assert_eq!(value_of(&rows, "File name length"), "8");
    assert_eq!(value_of(&rows, "File name"), "test.txt");
    assert_eq!(value_of(&rows, "Local File Header"), "test.txt (4 bytes)");
    assert_eq!(value_of(&rows, "File Data"), "0x789C0102");
    // No interpretation on the root.
    assert_eq!(value_of(&rows, "Zip File"), "");
}

#[test]
fn test_header_summary_from_file_name_node() {
    let mut fixture = zip_fixture("test.txt", b"abc", METHOD_STORED);
    fixture
        .tree
        .set_interpretation(fixture.header, Some(Interpretation::node(fixture.name).shared()))
        .unwrap();
    let bare = fixture
        .tree
        .append(fixture.root, Node::contiguous("Bare", 0, 1))
        .unwrap();
    let mirror = fixture
        .tree
        .append(
            fixture.root,
            Node::contiguous("Mirror", 0, 1).with_interpretation(Interpretation::node(bare)),
        )
        .unwrap();

    let data = DataTree::build(&fixture.tree, fixture.root, ByteSource::from(fixture.bytes.clone()))
        .unwrap();
    let ctx = FormatContext::new(Locale::EnUs);
    assert_eq!(
        data.format(fixture.header, &ctx).unwrap().as_deref(),
        Some("test.txt")
    );
    assert_eq!(data.format(mirror, &ctx).unwrap().as_deref(), Some(""));
    assert_eq!(data.format(bare, &ctx).unwrap(), None);
}

#[test]
fn test_rows_follow_tree_order() {
    let fixture = zip_fixture("a", b"x", METHOD_STORED);
    let data = DataTree::build(&fixture.tree, fixture.root, ByteSource::from(fixture.bytes.clone()))
        .unwrap();
    let descriptions: Vec<String> = formatted(&fixture, &data)
        .into_iter()
        .map(|(d, _)| d)
        .collect();
    assert_eq!(descriptions.first().map(String::as_str), Some("Zip File"));
    assert_eq!(descriptions[1], "Local File Header");
    assert_eq!(descriptions[2], "Signature");
    assert_eq!(descriptions.last().map(String::as_str), Some("File Data"));
}

#[test]
fn test_conditional_picks_interpretation_from_method() {
    let stored = zip_fixture("note.txt", b"hello", METHOD_STORED);
    let data =
        DataTree::build(&stored.tree, stored.root, ByteSource::from(stored.bytes.clone())).unwrap();
    let ctx = FormatContext::new(Locale::EnUs);
    assert_eq!(data.format(stored.data, &ctx).unwrap().as_deref(), Some("hello"));
    assert_eq!(
        data.format(stored.method, &ctx).unwrap().as_deref(),
        Some("0 (stored)")
    );

    // An unknown method falls through to the default.
    let odd = zip_fixture("note.txt", b"hi", 99);
    let data = DataTree::build(&odd.tree, odd.root, ByteSource::from(odd.bytes.clone())).unwrap();
    assert_eq!(data.format(odd.data, &ctx).unwrap().as_deref(), Some("0x6869"));
    assert_eq!(
        data.format(odd.method, &ctx).unwrap().as_deref(),
        Some("99 (unknown)")
    );
}

#[test]
fn test_first_matching_case_wins() {
    let mut fixture = zip_fixture("n", b"ab", METHOD_STORED);
    let conditional = Interpretation::conditional(
        fixture.method,
        vec![
            (0, Interpretation::Hex.shared()),
            (0, Interpretation::Ascii.shared()),
        ],
        Interpretation::Asciz,
    );
    fixture
        .tree
        .set_interpretation(fixture.data, Some(conditional.shared()))
        .unwrap();

    let data = DataTree::build(&fixture.tree, fixture.root, ByteSource::from(fixture.bytes.clone()))
        .unwrap();
    let ctx = FormatContext::new(Locale::EnUs);
    assert_eq!(data.format(fixture.data, &ctx).unwrap().as_deref(), Some("0x6162"));
}

#[test]
fn test_subtree_binding_rejects_outside_references() {
    let fixture = zip_fixture("test.txt", b"abc", METHOD_STORED);

    // The file data consults the compression method, which lives in the
    // header's subtree.
    let data_bytes = ByteSource::from(fixture.bytes.clone())
        .subset(HEADER_LEN + 8, 3)
        .unwrap();
    let err = DataTree::build(&fixture.tree, fixture.data, data_bytes).unwrap_err();
    assert!(matches!(err, BinviewError::UnboundNode(id) if id == fixture.method));

    // The header alone is self-contained.
    let header_bytes = ByteSource::from(fixture.bytes.clone())
        .subset(0, HEADER_LEN + 8)
        .unwrap();
    let data = DataTree::build(&fixture.tree, fixture.header, header_bytes).unwrap();
    let ctx = FormatContext::new(Locale::EnUs);
    assert_eq!(
        data.format(fixture.header, &ctx).unwrap().as_deref(),
        Some("test.txt (3 bytes)")
    );
}

#[test]
fn test_rebuild_after_edit() {
    let mut fixture = zip_fixture("test.txt", b"abcdef", METHOD_STORED);
    let extra = fixture
        .tree
        .append(
            fixture.data,
            Node::contiguous("First half", 0, 3).with_interpretation(Interpretation::Ascii),
        )
        .unwrap();

    let data = DataTree::build(&fixture.tree, fixture.root, ByteSource::from(fixture.bytes.clone()))
        .unwrap();
    let ctx = FormatContext::new(Locale::EnUs);
    assert_eq!(data.format(extra, &ctx).unwrap().as_deref(), Some("abc"));
    assert_eq!(data.data_node(fixture.data).unwrap().children(), &[extra]);
}

#[test]
fn test_removed_node_is_gone() {
    let mut fixture = zip_fixture("test.txt", b"abc", METHOD_STORED);
    let before = fixture.tree.len();
    fixture.tree.remove(fixture.header).unwrap();
    // Header plus its twelve fields.
    assert_eq!(fixture.tree.len(), before - 13);
    assert!(!fixture.tree.contains(fixture.name));

    // The file data still refers to the removed compression method.
    let err = DataTree::build(&fixture.tree, fixture.root, ByteSource::from(fixture.bytes.clone()))
        .unwrap_err();
    assert!(matches!(err, BinviewError::UnboundNode(id) if id == fixture.method));
}

#[test]
fn test_truncated_file_fails_to_bind() {
    let fixture = zip_fixture("test.txt", b"abcdef", METHOD_STORED);
    let short = fixture.bytes[..fixture.bytes.len() - 2].to_vec();
    let err = DataTree::build(&fixture.tree, fixture.root, ByteSource::from(short)).unwrap_err();
    assert!(matches!(err, BinviewError::Io(_)));
}

#[test]
fn test_field_values_match_fixture_constants() {
    let fixture = zip_fixture("abc", b"", METHOD_STORED);
    let data = DataTree::build(&fixture.tree, fixture.root, ByteSource::from(fixture.bytes.clone()))
        .unwrap();
    let crc = data.source(fixture.crc).unwrap().to_vec().unwrap();
    assert_eq!(crc, CRC.to_le_bytes());
    let time = data.source(fixture.time).unwrap().to_vec().unwrap();
    assert_eq!(time, MOD_TIME.to_le_bytes());
    let date = data.source(fixture.date).unwrap().to_vec().unwrap();
    assert_eq!(date, MOD_DATE.to_le_bytes());
    // Empty payload: the data node binds to nothing and formats as nothing.
    let ctx = FormatContext::new(Locale::EnUs);
    assert!(data.source(fixture.data).unwrap().is_empty().unwrap());
    assert_eq!(data.format(fixture.data, &ctx).unwrap().as_deref(), Some(""));
    let signature = data.source(fixture.signature).unwrap().to_vec().unwrap();
    assert_eq!(signature, b"PK\x03\x04");
    let version = data.source(fixture.version).unwrap().to_vec().unwrap();
    assert_eq!(version, 20u16.to_le_bytes());
    let flags = data.source(fixture.flags).unwrap().to_vec().unwrap();
    assert_eq!(flags, [0x01, 0x00]);
    let compressed = data.source(fixture.compressed_size).unwrap().to_vec().unwrap();
    assert_eq!(compressed, 0u32.to_le_bytes());
}
