#![no_main]
use binview::interpret::Template;
use binview::NodeTree;
use binview::Node;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|text: &str| {
    let mut tree = NodeTree::new();
    let nodes = (0..3).map(|i| tree.insert(Node::empty(format!("n{i}")))).collect();
    let _ = Template::parse(text, nodes);
});
