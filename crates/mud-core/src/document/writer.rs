//! Text serialization of document trees
//!
//! Each node is written as an opening tag carrying its attributes, its
//! children one tab deeper, then a closing tag. Values are written verbatim,
//! without escaping.

use std::fmt;
use std::io::{self, Write};

use crate::constants::INDENT;

use super::DocumentNode;

/// Write a whole document rooted at `root` (depth 0)
pub fn write_document<W: Write>(writer: &mut W, root: &DocumentNode) -> io::Result<()> {
    write_node(writer, root, 0)
}

/// Write `node` and its subtree starting at indentation `depth`
pub fn write_node<W: Write>(writer: &mut W, node: &DocumentNode, depth: usize) -> io::Result<()> {
    write!(writer, "{}", Indented { node, depth })
}

struct Indented<'a> {
    node: &'a DocumentNode,
    depth: usize,
}

impl fmt::Display for Indented<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let indent = INDENT.repeat(self.depth);

        write!(f, "{}<{}", indent, self.node.name)?;
        for (key, value) in &self.node.attributes {
            write!(f, " {}=\"{}\"", key, value)?;
        }
        writeln!(f, ">")?;

        for child in &self.node.children {
            Indented {
                node: child,
                depth: self.depth + 1,
            }
            .fmt(f)?;
        }

        writeln!(f, "{}</{}>", indent, self.node.name)
    }
}

impl fmt::Display for DocumentNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Indented {
            node: self,
            depth: 0,
        }
        .fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_node() {
        let node = DocumentNode::named("model", "cube");
        assert_eq!(node.to_string(), "<model name=\"cube\">\n</model>\n");
    }

    #[test]
    fn test_nested_indentation() {
        let mut model = DocumentNode::named("model", "m");
        let mut mesh = DocumentNode::named("mesh", "a").with_attr("vertexcount", "1");
        let mut vertex = DocumentNode::new("vertex").with_attr("id", "0");
        vertex.push_child(DocumentNode::prop("position", "0.0 0.0 0.0"));
        mesh.push_child(vertex);
        model.push_child(mesh);

        let expected = "<model name=\"m\">\n\
                        \t<mesh name=\"a\" vertexcount=\"1\">\n\
                        \t\t<vertex id=\"0\">\n\
                        \t\t\t<position value=\"0.0 0.0 0.0\">\n\
                        \t\t\t</position>\n\
                        \t\t</vertex>\n\
                        \t</mesh>\n\
                        </model>\n";
        assert_eq!(model.to_string(), expected);
    }

    #[test]
    fn test_no_attributes() {
        let node = DocumentNode::new("empty");
        assert_eq!(node.to_string(), "<empty>\n</empty>\n");
    }

    #[test]
    fn test_write_node_at_depth() {
        let mut buf = Vec::new();
        write_node(&mut buf, &DocumentNode::prop("normal", "0.0 0.0 1.0"), 2).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "\t\t<normal value=\"0.0 0.0 1.0\">\n\t\t</normal>\n"
        );
    }

    #[test]
    fn test_write_document_matches_display() {
        let mut root = DocumentNode::named("model", "x");
        root.push_child(DocumentNode::new("aabb").with_attr("max_extent", "1.0 1.0 1.0"));

        let mut buf = Vec::new();
        write_document(&mut buf, &root).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), root.to_string());
    }

    #[test]
    fn test_values_written_verbatim() {
        let node = DocumentNode::prop("weights", "0.25 0.75");
        assert!(node.to_string().contains("value=\"0.25 0.75\""));
    }
}
