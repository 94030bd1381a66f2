//! In-memory host tree that records every mutation.

use std::fmt::Write as _;

use indexmap::IndexMap;

use crate::collections::{HashMap, HashSet};
use crate::error::HostError;
use crate::host::{Anchor, EventHandler, HostNodeId, HostTree};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    CreateElement {
        id: HostNodeId,
        tag: String,
    },
    CreateText {
        id: HostNodeId,
        text: String,
    },
    SetAttribute {
        id: HostNodeId,
        name: String,
        value: String,
    },
    AddListener {
        id: HostNodeId,
        event: String,
    },
    Insert {
        container: HostNodeId,
        index: usize,
        node: HostNodeId,
    },
    Remove {
        container: HostNodeId,
        index: usize,
        node: HostNodeId,
    },
}

#[derive(Debug)]
enum HostNodeKind {
    Element {
        tag: String,
        attributes: IndexMap<String, String>,
        listeners: Vec<(String, EventHandler)>,
    },
    Text {
        text: String,
    },
}

#[derive(Debug)]
struct HostNode {
    kind: HostNodeKind,
    parent: Option<HostNodeId>,
    children: Vec<HostNodeId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnchorRange {
    pub container: HostNodeId,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Default)]
pub struct MemoryHost {
    nodes: Vec<HostNode>, // detached nodes stay in the arena
    anchors: HashMap<Anchor, AnchorRange>,
    next_anchor: usize,
    mutations: Vec<Mutation>,
}

fn is_valid_tag(tag: &str) -> bool {
    let mut chars = tag.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '-')
        }
        _ => false,
    }
}

fn escape_into(output: &mut String, text: &str, quote: bool) {
    for c in text.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '"' if quote => output.push_str("&quot;"),
            _ => output.push(c),
        }
    }
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes ever created, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn node(&self, id: HostNodeId) -> Result<&HostNode, HostError> {
        self.nodes.get(id).ok_or(HostError::MissingNode { id })
    }

    fn node_mut(&mut self, id: HostNodeId) -> Result<&mut HostNode, HostError> {
        self.nodes.get_mut(id).ok_or(HostError::MissingNode { id })
    }

    fn container(&self, id: HostNodeId) -> Result<&HostNode, HostError> {
        let node = self.node(id)?;
        match node.kind {
            HostNodeKind::Element { .. } => Ok(node),
            HostNodeKind::Text { .. } => Err(HostError::NotAContainer { id }),
        }
    }

    fn range(&self, anchor: Anchor) -> Result<AnchorRange, HostError> {
        self.anchors
            .get(&anchor)
            .copied()
            .ok_or(HostError::MissingAnchor { anchor })
    }

    fn checked_range(&self, anchor: Anchor) -> Result<AnchorRange, HostError> {
        let range = self.range(anchor)?;
        let len = self.container(range.container)?.children.len();
        if range.start > range.end || range.end > len {
            return Err(HostError::AnchorOutOfBounds {
                container: range.container,
                start: range.start,
                end: range.end,
                len,
            });
        }
        Ok(range)
    }

    pub fn tag(&self, id: HostNodeId) -> Option<&str> {
        match &self.nodes.get(id)?.kind {
            HostNodeKind::Element { tag, .. } => Some(tag),
            HostNodeKind::Text { .. } => None,
        }
    }

    pub fn text(&self, id: HostNodeId) -> Option<&str> {
        match &self.nodes.get(id)?.kind {
            HostNodeKind::Text { text } => Some(text),
            HostNodeKind::Element { .. } => None,
        }
    }

    pub fn attribute(&self, id: HostNodeId, name: &str) -> Option<&str> {
        match &self.nodes.get(id)?.kind {
            HostNodeKind::Element { attributes, .. } => attributes.get(name).map(String::as_str),
            HostNodeKind::Text { .. } => None,
        }
    }

    pub fn attributes(&self, id: HostNodeId) -> Vec<(String, String)> {
        match self.nodes.get(id).map(|node| &node.kind) {
            Some(HostNodeKind::Element { attributes, .. }) => attributes
                .iter()
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn children(&self, id: HostNodeId) -> &[HostNodeId] {
        self.nodes
            .get(id)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn parent(&self, id: HostNodeId) -> Option<HostNodeId> {
        self.nodes.get(id)?.parent
    }

    pub fn listeners(&self, id: HostNodeId, event: &str) -> Vec<EventHandler> {
        match self.nodes.get(id).map(|node| &node.kind) {
            Some(HostNodeKind::Element { listeners, .. }) => listeners
                .iter()
                .filter(|(name, _)| name == event)
                .map(|(_, handler)| handler.clone())
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn listener_events(&self, id: HostNodeId) -> Vec<String> {
        match self.nodes.get(id).map(|node| &node.kind) {
            Some(HostNodeKind::Element { listeners, .. }) => {
                listeners.iter().map(|(name, _)| name.clone()).collect()
            }
            _ => Vec::new(),
        }
    }

    /// Number of anchors still tracked.
    pub fn anchor_count(&self) -> usize {
        self.anchors.len()
    }

    pub fn anchor_range(&self, anchor: Anchor) -> Option<AnchorRange> {
        self.anchors.get(&anchor).copied()
    }

    /// Host nodes currently spanned by `anchor`.
    pub fn anchor_nodes(&self, anchor: Anchor) -> Vec<HostNodeId> {
        let Ok(range) = self.checked_range(anchor) else {
            return Vec::new();
        };
        self.children(range.container)[range.start..range.end].to_vec()
    }

    /// Elements with `tag` below `root`, in document order.
    pub fn find_all(&self, root: HostNodeId, tag: &str) -> Vec<HostNodeId> {
        let mut found = Vec::new();
        self.collect_tag(root, tag, &mut found);
        found
    }

    fn collect_tag(&self, id: HostNodeId, tag: &str, found: &mut Vec<HostNodeId>) {
        for &child in self.children(id) {
            if self.tag(child) == Some(tag) {
                found.push(child);
            }
            self.collect_tag(child, tag, found);
        }
    }

    pub fn mutations(&self) -> &[Mutation] {
        &self.mutations
    }

    pub fn take_mutations(&mut self) -> Vec<Mutation> {
        std::mem::take(&mut self.mutations)
    }

    /// HTML-like serialization of the children of `container`.
    pub fn inner_markup(&self, container: HostNodeId) -> String {
        let mut output = String::new();
        for &child in self.children(container) {
            self.write_markup(&mut output, child);
        }
        output
    }

    /// HTML-like serialization of `id` and its subtree.
    pub fn markup(&self, id: HostNodeId) -> String {
        let mut output = String::new();
        self.write_markup(&mut output, id);
        output
    }

    fn write_markup(&self, output: &mut String, id: HostNodeId) {
        let Some(node) = self.nodes.get(id) else {
            let _ = write!(output, "<!--missing {id}-->");
            return;
        };
        match &node.kind {
            HostNodeKind::Text { text } => escape_into(output, text, false),
            HostNodeKind::Element {
                tag, attributes, ..
            } => {
                output.push('<');
                output.push_str(tag);
                for (name, value) in attributes {
                    let _ = write!(output, " {name}=\"");
                    escape_into(output, value, true);
                    output.push('"');
                }
                output.push('>');
                for &child in &node.children {
                    self.write_markup(output, child);
                }
                let _ = write!(output, "</{tag}>");
            }
        }
    }

    fn shift_anchors(&mut self, container: HostNodeId, index: usize, inserted: bool) {
        for range in self.anchors.values_mut() {
            if range.container != container {
                continue;
            }
            for offset in [&mut range.start, &mut range.end] {
                if *offset > index {
                    if inserted {
                        *offset += 1;
                    } else {
                        *offset -= 1;
                    }
                }
            }
        }
    }

    fn detach(&mut self, node: HostNodeId) -> Result<(), HostError> {
        let Some(parent) = self.node(node)?.parent else {
            return Ok(());
        };
        let index = self
            .node(parent)?
            .children
            .iter()
            .position(|&child| child == node)
            .ok_or(HostError::MissingNode { id: node })?;
        self.remove_child_at(parent, index).map(|_| ())
    }

    /// Forgets every anchor whose container lies in the subtree of `root`.
    /// The nodes stay in the arena but can no longer be reached.
    fn discard(&mut self, root: HostNodeId) {
        let mut subtree = HashSet::new();
        let mut pending = vec![root];
        while let Some(id) = pending.pop() {
            if subtree.insert(id) {
                pending.extend_from_slice(self.children(id));
            }
        }
        self.anchors
            .retain(|_, range| !subtree.contains(&range.container));
    }

    fn insert_child(
        &mut self,
        container: HostNodeId,
        index: usize,
        node: HostNodeId,
    ) -> Result<(), HostError> {
        self.container(container)?;
        self.node_mut(container)?.children.insert(index, node);
        self.node_mut(node)?.parent = Some(container);
        self.shift_anchors(container, index, true);
        self.mutations.push(Mutation::Insert {
            container,
            index,
            node,
        });
        Ok(())
    }

    fn remove_child_at(
        &mut self,
        container: HostNodeId,
        index: usize,
    ) -> Result<HostNodeId, HostError> {
        let node = self.node_mut(container)?.children.remove(index);
        self.node_mut(node)?.parent = None;
        self.shift_anchors(container, index, false);
        self.mutations.push(Mutation::Remove {
            container,
            index,
            node,
        });
        Ok(node)
    }

    fn element_mut(
        &mut self,
        id: HostNodeId,
    ) -> Result<
        (
            &mut IndexMap<String, String>,
            &mut Vec<(String, EventHandler)>,
        ),
        HostError,
    > {
        match &mut self.node_mut(id)?.kind {
            HostNodeKind::Element {
                attributes,
                listeners,
                ..
            } => Ok((attributes, listeners)),
            HostNodeKind::Text { .. } => Err(HostError::NotAnElement { id }),
        }
    }

    fn push_node(&mut self, kind: HostNodeKind) -> HostNodeId {
        let id = self.nodes.len();
        self.nodes.push(HostNode {
            kind,
            parent: None,
            children: Vec::new(),
        });
        id
    }
}

impl HostTree for MemoryHost {
    fn create_element(&mut self, tag: &str) -> Result<HostNodeId, HostError> {
        if !is_valid_tag(tag) {
            return Err(HostError::InvalidTag {
                tag: tag.to_owned(),
            });
        }
        let id = self.push_node(HostNodeKind::Element {
            tag: tag.to_owned(),
            attributes: IndexMap::new(),
            listeners: Vec::new(),
        });
        self.mutations.push(Mutation::CreateElement {
            id,
            tag: tag.to_owned(),
        });
        Ok(id)
    }

    fn create_text_node(&mut self, text: &str) -> Result<HostNodeId, HostError> {
        let id = self.push_node(HostNodeKind::Text {
            text: text.to_owned(),
        });
        self.mutations.push(Mutation::CreateText {
            id,
            text: text.to_owned(),
        });
        Ok(id)
    }

    fn set_attribute(
        &mut self,
        node: HostNodeId,
        name: &str,
        value: &str,
    ) -> Result<(), HostError> {
        let (attributes, _) = self.element_mut(node)?;
        attributes.insert(name.to_owned(), value.to_owned());
        self.mutations.push(Mutation::SetAttribute {
            id: node,
            name: name.to_owned(),
            value: value.to_owned(),
        });
        Ok(())
    }

    fn add_event_listener(
        &mut self,
        node: HostNodeId,
        event: &str,
        handler: EventHandler,
    ) -> Result<(), HostError> {
        let (_, listeners) = self.element_mut(node)?;
        listeners.push((event.to_owned(), handler));
        self.mutations.push(Mutation::AddListener {
            id: node,
            event: event.to_owned(),
        });
        Ok(())
    }

    fn child_count(&self, container: HostNodeId) -> Result<usize, HostError> {
        Ok(self.container(container)?.children.len())
    }

    fn create_anchor(
        &mut self,
        container: HostNodeId,
        start: usize,
        end: usize,
    ) -> Result<Anchor, HostError> {
        let len = self.container(container)?.children.len();
        if start > end || end > len {
            return Err(HostError::AnchorOutOfBounds {
                container,
                start,
                end,
                len,
            });
        }
        let anchor = Anchor::from_raw(self.next_anchor);
        self.next_anchor += 1;
        self.anchors.insert(
            anchor,
            AnchorRange {
                container,
                start,
                end,
            },
        );
        Ok(anchor)
    }

    fn anchor_after(&mut self, anchor: Anchor) -> Result<Anchor, HostError> {
        let range = self.checked_range(anchor)?;
        self.create_anchor(range.container, range.end, range.end)
    }

    fn replace_contents(&mut self, anchor: Anchor, node: HostNodeId) -> Result<(), HostError> {
        self.detach(node)?;
        let range = self.checked_range(anchor)?;
        let stale = range.end - range.start;
        self.insert_child(range.container, range.start, node)?;
        for _ in 0..stale {
            let removed = self.remove_child_at(range.container, range.start + 1)?;
            self.discard(removed);
        }
        self.anchors.insert(
            anchor,
            AnchorRange {
                container: range.container,
                start: range.start,
                end: range.start + 1,
            },
        );
        Ok(())
    }

    fn delete_contents(&mut self, anchor: Anchor) -> Result<(), HostError> {
        let range = self.checked_range(anchor)?;
        for _ in range.start..range.end {
            let removed = self.remove_child_at(range.container, range.start)?;
            self.discard(removed);
        }
        self.anchors.insert(
            anchor,
            AnchorRange {
                container: range.container,
                start: range.start,
                end: range.start,
            },
        );
        Ok(())
    }

    fn release_anchor(&mut self, anchor: Anchor) -> Result<(), HostError> {
        self.anchors
            .remove(&anchor)
            .map(|_| ())
            .ok_or(HostError::MissingAnchor { anchor })
    }
}

#[cfg(test)]
#[path = "tests/memory_host_tests.rs"]
mod tests;
