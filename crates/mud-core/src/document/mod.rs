//! Ordered document tree used for every construct in a `.mudm` file

mod writer;

pub use writer::{write_document, write_node};

/// A node in the exported document
///
/// Attribute order and child order are preserved verbatim on output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentNode {
    pub name: String,
    /// Attribute key/value pairs in output order
    pub attributes: Vec<(String, String)>,
    /// Child nodes in traversal order
    pub children: Vec<DocumentNode>,
}

impl DocumentNode {
    /// Create a node with no attributes and no children
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Node with a single `name` attribute (`model`, `mesh`, `skeleton`)
    pub fn named(tag: impl Into<String>, name_value: impl Into<String>) -> Self {
        Self::new(tag).with_attr("name", name_value)
    }

    /// Node with a single `value` attribute (`position`, `normal`, `uvcoord`, ...)
    pub fn prop(tag: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(tag).with_attr("value", value)
    }

    /// `bone` node with `id`, `name`, `translation` and `rotation`, in that order
    pub fn bone(
        id: usize,
        name: impl Into<String>,
        translation: impl Into<String>,
        rotation: impl Into<String>,
    ) -> Self {
        Self::new("bone")
            .with_attr("id", id.to_string())
            .with_attr("name", name)
            .with_attr("translation", translation)
            .with_attr("rotation", rotation)
    }

    /// Builder-style attribute append
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.push_attr(key, value);
        self
    }

    pub fn push_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.push((key.into(), value.into()));
    }

    pub fn push_child(&mut self, child: DocumentNode) {
        self.children.push(child);
    }

    /// Look up the first attribute with the given key
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Iterate children with the given node name
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a DocumentNode> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// First child with the given node name
    pub fn child(&self, name: &str) -> Option<&DocumentNode> {
        self.children.iter().find(|c| c.name == name)
    }
}
