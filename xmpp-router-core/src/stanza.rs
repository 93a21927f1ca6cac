//! In-memory stanza tree.
//!
//! The wire-level XML parser/serializer is an external collaborator (see
//! `xmpp-router`'s `xml` module for a concrete one); this type is the decoded
//! tree the router actually reasons about: attribute/namespace/CDATA
//! accessors, cheap to clone and drop.

/// Well-known router-namespace element and attribute names.
pub mod names {
    pub const COMPONENT_NS: &str = "jabber:component:accept";
    pub const CLIENT_NS: &str = "jabber:client";

    pub const HANDSHAKE: &str = "handshake";
    pub const BIND: &str = "bind";
    pub const UNBIND: &str = "unbind";
    pub const ROUTE: &str = "route";
    pub const THROTTLE: &str = "throttle";
    pub const PRESENCE: &str = "presence";
}

/// A child of a stanza: either a nested element or a run of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Stanza),
    Text(String),
}

/// A decoded XML element: name, optional namespace, attributes, children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stanza {
    pub name: String,
    pub namespace: Option<String>,
    attrs: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Stanza {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), namespace: None, attrs: Vec::new(), children: Vec::new() }
    }

    pub fn with_ns(name: impl Into<String>, ns: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: Some(ns.into()),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let key = key.into();
        let value = value.into();
        if let Some(slot) = self.attrs.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.attrs.push((key, value));
        }
        self
    }

    pub fn remove_attr(&mut self, key: &str) -> Option<String> {
        let pos = self.attrs.iter().position(|(k, _)| k == key)?;
        Some(self.attrs.remove(pos).1)
    }

    pub fn attrs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn push_child(&mut self, node: Node) -> &mut Self {
        self.children.push(node);
        self
    }

    pub fn push_element(&mut self, child: Stanza) -> &mut Self {
        self.children.push(Node::Element(child));
        self
    }

    /// First direct child element, if any.
    pub fn first_element(&self) -> Option<&Stanza> {
        self.children.iter().find_map(|c| match c {
            Node::Element(s) => Some(s),
            Node::Text(_) => None,
        })
    }

    /// Concatenated direct text content (CDATA), ignoring nested elements.
    pub fn cdata(&self) -> String {
        self.children
            .iter()
            .filter_map(|c| match c {
                Node::Text(t) => Some(t.as_str()),
                Node::Element(_) => None,
            })
            .collect()
    }

    /// Replace all direct text children with a single text node.
    pub fn set_cdata(&mut self, text: impl Into<String>) -> &mut Self {
        self.children.retain(|c| matches!(c, Node::Element(_)));
        self.children.insert(0, Node::Text(text.into()));
        self
    }

    /// Drop all direct text children, keeping only nested elements.
    pub fn clear_cdata(&mut self) -> &mut Self {
        self.children.retain(|c| matches!(c, Node::Element(_)));
        self
    }
}
