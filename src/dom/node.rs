//! Node types: NodeId, NodeData.

use std::collections::BTreeMap;

use slotmap::{new_key_type, Key};

/// Attribute that ties an element to its [`NodeId`]; element selectors match on it.
pub const DATA_REF: &str = "data-ref";

new_key_type! {
    /// Unique identifier for a DOM element. Copy, lightweight (u64).
    pub struct NodeId;
}

impl NodeId {
    /// The value of this element's `data-ref` attribute.
    ///
    /// Stable for the lifetime of the node; a removed node's slot is reused
    /// with a new version, so the string is never handed out twice.
    pub fn data_ref(&self) -> String {
        self.data().as_ffi().to_string()
    }
}

/// Data associated with a single UI element.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeData {
    /// Element tag name (e.g. "button", "canvas").
    pub tag: String,
    /// Optional unique id (CSS #id selector).
    pub id: Option<String>,
    /// CSS classes (for .class selector).
    pub classes: Vec<String>,
    /// Other attributes, ordered by name.
    pub attributes: BTreeMap<String, String>,
}

impl NodeData {
    /// Create a new `NodeData` with the given tag and no id, classes or attributes.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            id: None,
            classes: Vec::new(),
            attributes: BTreeMap::new(),
        }
    }

    /// Set the CSS id (builder).
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Add a single CSS class (builder).
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        let class = class.into();
        if !self.classes.contains(&class) {
            self.classes.push(class);
        }
        self
    }

    /// Add multiple CSS classes (builder).
    pub fn with_classes(mut self, classes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        for class in classes {
            self = self.with_class(class);
        }
        self
    }

    /// Set an attribute (builder).
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Look up an attribute value.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Check whether this node has a given CSS class.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Add a CSS class. No-op if already present.
    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_owned());
        }
    }

    /// Remove a CSS class. No-op if not present.
    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }

    /// Toggle a CSS class: add if absent, remove if present.
    pub fn toggle_class(&mut self, class: &str) {
        if self.has_class(class) {
            self.remove_class(class);
        } else {
            self.add_class(class);
        }
    }
}
