//! Test-only reader for `.mudm` text, used to check writer output structurally

use mud_core::DocumentNode;

/// Parse a document back into a node tree, checking indentation and tag nesting
pub fn parse_document(text: &str) -> DocumentNode {
    let mut stack: Vec<DocumentNode> = Vec::new();
    let mut root = None;

    for (line_no, line) in text.lines().enumerate() {
        let depth = line.chars().take_while(|&c| c == '\t').count();
        let body = &line[depth..];

        if let Some(rest) = body.strip_prefix("</") {
            let name = rest.strip_suffix('>').expect("closing tag ends with '>'");
            let node = stack.pop().expect("closing tag without opening tag");
            assert_eq!(node.name, name, "line {}: mismatched closing tag", line_no + 1);
            assert_eq!(stack.len(), depth, "line {}: wrong closing indent", line_no + 1);
            match stack.last_mut() {
                Some(parent) => parent.children.push(node),
                None => root = Some(node),
            }
        } else {
            assert_eq!(stack.len(), depth, "line {}: wrong opening indent", line_no + 1);
            let inner = body
                .strip_prefix('<')
                .and_then(|b| b.strip_suffix('>'))
                .expect("opening tag is <...>");
            stack.push(parse_open_tag(inner));
        }
    }

    assert!(stack.is_empty(), "unclosed tags");
    root.expect("document has a root")
}

fn parse_open_tag(inner: &str) -> DocumentNode {
    let (name, mut rest) = match inner.find(' ') {
        Some(i) => (&inner[..i], &inner[i..]),
        None => (inner, ""),
    };

    let mut node = DocumentNode::new(name);
    while let Some(after_space) = rest.strip_prefix(' ') {
        let eq = after_space.find("=\"").expect("attribute has =\"");
        let key = &after_space[..eq];
        let value_start = &after_space[eq + 2..];
        let close = value_start.find('"').expect("attribute value is closed");
        node.push_attr(key, &value_start[..close]);
        rest = &value_start[close + 1..];
    }
    assert!(rest.is_empty(), "trailing text in tag: {:?}", rest);
    node
}

/// Parse a space-separated float vector
pub fn floats(value: &str) -> Vec<f32> {
    value
        .split(' ')
        .map(|t| t.parse().expect("float token"))
        .collect()
}

pub fn assert_close(actual: &[f32], expected: &[f32]) {
    assert_eq!(actual.len(), expected.len());
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() < 1e-5, "{:?} != {:?}", actual, expected);
    }
}
