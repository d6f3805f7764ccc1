//! Coloring a hex window against the ZIP description.

use binview::coverage::{resolve, Highlight};

use crate::common::*;

#[test]
fn test_window_across_header_and_data() {
    let fixture = zip_fixture("test.txt", &[0u8; 18], METHOD_DEFLATE);
    // Header is 0x26 bytes; look at the last name bytes and the first data bytes.
    let coverage = resolve(&fixture.tree, fixture.root, 0x22, 8, None).unwrap();

    assert_eq!(coverage.offset(), 0x22);
    assert!(coverage.owners()[..4].iter().all(|o| *o == Some(fixture.name)));
    assert!(coverage.owners()[4..].iter().all(|o| *o == Some(fixture.data)));
}

#[test]
fn test_selection_colors_node_and_siblings() {
    let fixture = zip_fixture("test.txt", b"0123456789", METHOD_STORED);
    let coverage = resolve(&fixture.tree, fixture.root, 0, 0x34, Some(fixture.method)).unwrap();
    let highlights = coverage.highlights();

    // Compression method sits at 0x8..0xa.
    assert_eq!(highlights[0x8], Highlight::Selected);
    assert_eq!(highlights[0x9], Highlight::Selected);
    // Its siblings inside the header belong to the selected node's parent.
    assert_eq!(highlights[0x0], Highlight::SelectedParent);
    assert_eq!(highlights[0x25], Highlight::SelectedParent);
    // The file data is outside the header.
    assert_eq!(highlights[0x26], Highlight::Owned(fixture.data));
    // Past the end of the file nothing owns the slot.
    assert_eq!(highlights[0x2f], Highlight::Owned(fixture.data));
    assert_eq!(highlights[0x30], Highlight::None);
    assert_eq!(coverage.owner_at(0x33), None);
}

#[test]
fn test_selecting_the_root() {
    let fixture = zip_fixture("a", b"b", METHOD_STORED);
    let len = fixture.bytes.len();
    let coverage = resolve(&fixture.tree, fixture.root, 0, len, Some(fixture.root)).unwrap();
    assert!(coverage.highlights().iter().all(|h| *h == Highlight::Selected));
}

#[test]
fn test_header_subtree_only() {
    let fixture = zip_fixture("test.txt", b"zz", METHOD_STORED);
    let coverage = resolve(&fixture.tree, fixture.header, 0x1c, 12, Some(fixture.header)).unwrap();
    // Extra field length, then the name; nothing past the header.
    let extra_len = fixture.tree.children(fixture.header).nth(10).unwrap();
    assert_eq!(coverage.owner_at(0x1d), Some(extra_len));
    assert_eq!(coverage.owner_at(0x1e), Some(fixture.name));
    assert_eq!(coverage.owner_at(0x26), None);
    assert!(coverage.highlights()[..10]
        .iter()
        .all(|h| *h == Highlight::Selected));
}
