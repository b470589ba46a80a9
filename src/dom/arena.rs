//! Arena-based mutable DOM for the page template.
//!
//! html5ever parses into this tree once at startup. After that the router,
//! highlighter and card filter mutate it in place: toggling classes and
//! display styles, cloning post blocks, and splitting text nodes.

use std::collections::HashMap;

use html5ever::{LocalName, Namespace, QualName, ns};

/// Unique identifier for a node in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Sentinel value for no node.
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check if this is a valid node ID.
    pub fn is_some(&self) -> bool {
        self.0 != u32::MAX
    }

    /// Check if this is the sentinel value.
    pub fn is_none(&self) -> bool {
        self.0 == u32::MAX
    }
}

/// Node type in the arena DOM.
#[derive(Debug, Clone)]
pub enum NodeData {
    /// Document root.
    Document,
    /// Element with name and attributes.
    Element {
        name: QualName,
        attrs: Vec<Attribute>,
        /// Pre-extracted id for fast matching.
        id: Option<String>,
        /// Pre-extracted classes for fast matching.
        classes: Vec<String>,
    },
    /// Text content.
    Text(String),
    Comment(String),
    /// Document type declaration.
    Doctype {
        name: String,
        public_id: String,
        system_id: String,
    },
}

/// HTML attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: QualName,
    pub value: String,
}

impl Attribute {
    /// Create an attribute in the null namespace, as the HTML parser does.
    pub fn new(name: &str, value: impl Into<String>) -> Self {
        Self {
            name: QualName::new(None, ns!(), LocalName::from(name)),
            value: value.into(),
        }
    }
}

/// A node in the arena DOM.
#[derive(Debug)]
pub struct Node {
    pub data: NodeData,
    pub parent: NodeId,
    pub first_child: NodeId,
    pub last_child: NodeId,
    pub prev_sibling: NodeId,
    pub next_sibling: NodeId,
}

impl Node {
    fn new(data: NodeData) -> Self {
        Self {
            data,
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
        }
    }
}

/// Arena-based DOM tree.
///
/// [`Dom::detach`] only unlinks a subtree, so the caller can re-attach it.
/// [`Dom::remove`] also returns the subtree's slots to a free list; a
/// `NodeId` into a removed subtree resolves to nothing until its slot is
/// handed out again.
#[derive(Debug)]
pub struct Dom {
    nodes: Vec<Option<Node>>,
    free: Vec<NodeId>,
    document: NodeId,
    /// Map from id attribute to node ID. The first attached element wins.
    id_map: HashMap<String, NodeId>,
}

impl Dom {
    /// Create a new empty DOM with a document root.
    pub fn new() -> Self {
        let mut dom = Self {
            nodes: Vec::new(),
            free: Vec::new(),
            document: NodeId::NONE,
            id_map: HashMap::new(),
        };
        dom.document = dom.alloc(Node::new(NodeData::Document));
        dom
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        if let Some(id) = self.free.pop() {
            self.nodes[id.0 as usize] = Some(node);
            return id;
        }
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Some(node));
        id
    }

    /// Get the document root ID.
    pub fn document(&self) -> NodeId {
        self.document
    }

    /// Get a node by ID.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        if id.is_none() {
            return None;
        }
        self.nodes.get(id.0 as usize)?.as_ref()
    }

    /// Get a mutable node by ID.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if id.is_none() {
            return None;
        }
        self.nodes.get_mut(id.0 as usize)?.as_mut()
    }

    /// Create a new element node and register its id attribute.
    pub fn create_element(&mut self, name: QualName, attrs: Vec<Attribute>) -> NodeId {
        let node_id = self.alloc_element(name, attrs);
        self.register_id(node_id);
        node_id
    }

    /// Create an HTML element by tag name.
    pub fn create_html_element(&mut self, tag: &str, attrs: Vec<Attribute>) -> NodeId {
        self.create_element(QualName::new(None, ns!(html), LocalName::from(tag)), attrs)
    }

    /// Allocate an element without touching the id map.
    fn alloc_element(&mut self, name: QualName, attrs: Vec<Attribute>) -> NodeId {
        let (id, classes) = extract_id_and_classes(&attrs);
        self.alloc(Node::new(NodeData::Element {
            name,
            attrs,
            id,
            classes,
        }))
    }

    fn register_id(&mut self, node_id: NodeId) {
        let Some(id_str) = self.element_id(node_id).map(str::to_string) else {
            return;
        };
        let stale = self
            .id_map
            .get(&id_str)
            .is_none_or(|existing| *existing != node_id && !self.is_attached(*existing));
        if stale {
            self.id_map.insert(id_str, node_id);
        }
    }

    /// Create a new text node.
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(Node::new(NodeData::Text(text.into())))
    }

    /// Create a new comment node.
    pub fn create_comment(&mut self, text: String) -> NodeId {
        self.alloc(Node::new(NodeData::Comment(text)))
    }

    /// Create a doctype node.
    pub fn create_doctype(&mut self, name: String, public_id: String, system_id: String) -> NodeId {
        self.alloc(Node::new(NodeData::Doctype {
            name,
            public_id,
            system_id,
        }))
    }

    /// Append a child to a parent node. The child must be detached.
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        let last_child = self
            .get(parent)
            .map(|n| n.last_child)
            .unwrap_or(NodeId::NONE);

        if let Some(child_node) = self.get_mut(child) {
            child_node.parent = parent;
            child_node.prev_sibling = last_child;
            child_node.next_sibling = NodeId::NONE;
        }

        if last_child.is_some()
            && let Some(last_node) = self.get_mut(last_child)
        {
            last_node.next_sibling = child;
        }

        if let Some(parent_node) = self.get_mut(parent) {
            if parent_node.first_child.is_none() {
                parent_node.first_child = child;
            }
            parent_node.last_child = child;
        }
    }

    /// Insert a detached node before a sibling.
    pub fn insert_before(&mut self, sibling: NodeId, new_node: NodeId) {
        let parent = self.get(sibling).map(|n| n.parent).unwrap_or(NodeId::NONE);
        let prev = self
            .get(sibling)
            .map(|n| n.prev_sibling)
            .unwrap_or(NodeId::NONE);

        if let Some(new) = self.get_mut(new_node) {
            new.parent = parent;
            new.prev_sibling = prev;
            new.next_sibling = sibling;
        }

        if let Some(sib) = self.get_mut(sibling) {
            sib.prev_sibling = new_node;
        }

        if prev.is_some() {
            if let Some(p) = self.get_mut(prev) {
                p.next_sibling = new_node;
            }
        } else if let Some(par) = self.get_mut(parent) {
            par.first_child = new_node;
        }
    }

    /// Insert a detached node as the first child of `parent`.
    pub fn prepend(&mut self, parent: NodeId, child: NodeId) {
        match self.get(parent).map(|n| n.first_child) {
            Some(first) if first.is_some() => self.insert_before(first, child),
            _ => self.append(parent, child),
        }
    }

    /// Append text to an existing text node, or create new if last child isn't text.
    pub fn append_text(&mut self, parent: NodeId, text: &str) {
        let last_child = self
            .get(parent)
            .map(|n| n.last_child)
            .unwrap_or(NodeId::NONE);

        if let Some(last) = self.get_mut(last_child)
            && let NodeData::Text(ref mut existing) = last.data
        {
            existing.push_str(text);
            return;
        }

        let text_node = self.create_text(text);
        self.append(parent, text_node);
    }

    /// Unlink a node from its parent and siblings. Its subtree stays intact.
    pub fn detach(&mut self, target: NodeId) {
        let (parent, prev, next) = match self.get(target) {
            Some(n) => (n.parent, n.prev_sibling, n.next_sibling),
            None => return,
        };

        if prev.is_some() {
            if let Some(p) = self.get_mut(prev) {
                p.next_sibling = next;
            }
        } else if let Some(p) = self.get_mut(parent) {
            p.first_child = next;
        }

        if next.is_some() {
            if let Some(n) = self.get_mut(next) {
                n.prev_sibling = prev;
            }
        } else if let Some(p) = self.get_mut(parent) {
            p.last_child = prev;
        }

        if let Some(node) = self.get_mut(target) {
            node.parent = NodeId::NONE;
            node.prev_sibling = NodeId::NONE;
            node.next_sibling = NodeId::NONE;
        }
    }

    /// Detach `target` and free it together with its whole subtree.
    ///
    /// The document root is never removed.
    pub fn remove(&mut self, target: NodeId) {
        if target == self.document || self.get(target).is_none() {
            return;
        }
        self.detach(target);
        let mut stack = vec![target];
        while let Some(id) = stack.pop() {
            stack.extend(self.children(id));
            if let Some(key) = self.element_id(id)
                && self.id_map.get(key) == Some(&id)
            {
                let key = key.to_string();
                self.id_map.remove(&key);
            }
            self.nodes[id.0 as usize] = None;
            self.free.push(id);
        }
    }

    /// Remove every child of `parent`.
    pub fn clear_children(&mut self, parent: NodeId) {
        let children: Vec<_> = self.children(parent).collect();
        for child in children {
            self.remove(child);
        }
    }

    /// Replace `old` with a sequence of detached nodes, in order, and free `old`.
    pub fn replace_with(&mut self, old: NodeId, replacements: &[NodeId]) {
        for &node in replacements {
            self.insert_before(old, node);
        }
        self.remove(old);
    }

    /// Deep-copy a subtree. The copy is detached and its ids are not registered,
    /// so `get_by_id` keeps resolving to the template original.
    pub fn deep_clone(&mut self, source: NodeId) -> NodeId {
        let data = match self.get(source) {
            Some(n) => n.data.clone(),
            None => return NodeId::NONE,
        };
        let copy = self.alloc(Node::new(data));
        let children: Vec<_> = self.children(source).collect();
        for child in children {
            let child_copy = self.deep_clone(child);
            self.append(copy, child_copy);
        }
        copy
    }

    /// Deep-copy a subtree from another DOM into this one, registering ids
    /// whose previous owner is no longer attached.
    pub fn import(&mut self, from: &Dom, source: NodeId) -> NodeId {
        let Some(node) = from.get(source) else {
            return NodeId::NONE;
        };
        let copy = match &node.data {
            NodeData::Element { name, attrs, .. } => {
                let id = self.alloc_element(name.clone(), attrs.clone());
                self.register_id(id);
                id
            }
            other => self.alloc(Node::new(other.clone())),
        };
        for child in from.children(source) {
            let child_copy = self.import(from, child);
            self.append(copy, child_copy);
        }
        copy
    }

    /// Get element by id attribute, if that element is still in the document.
    pub fn get_by_id(&self, id: &str) -> Option<NodeId> {
        self.id_map
            .get(id)
            .copied()
            .filter(|node| self.is_attached(*node))
    }

    /// Check whether a node is reachable from the document root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut current = id;
        while let Some(node) = self.get(current) {
            if current == self.document {
                return true;
            }
            current = node.parent;
        }
        false
    }

    /// Number of live nodes, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    /// Check if the DOM is empty (only has document root).
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }

    /// Slots ever allocated, including those waiting on the free list.
    pub fn capacity(&self) -> usize {
        self.nodes.len()
    }

    /// Parent of a node, if any.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).map(|n| n.parent).filter(NodeId::is_some)
    }

    /// Iterate over children of a node.
    pub fn children(&self, parent: NodeId) -> ChildrenIter<'_> {
        let first = self
            .get(parent)
            .map(|n| n.first_child)
            .unwrap_or(NodeId::NONE);
        ChildrenIter {
            dom: self,
            current: first,
        }
    }

    /// Iterate over ancestors of a node, nearest first (excluding the node).
    pub fn ancestors(&self, id: NodeId) -> AncestorsIter<'_> {
        AncestorsIter {
            dom: self,
            current: self.parent(id).unwrap_or(NodeId::NONE),
        }
    }

    /// All descendants of `root` in document order, excluding `root`.
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(root).collect();
        stack.reverse();
        while let Some(id) = stack.pop() {
            out.push(id);
            let mut children: Vec<_> = self.children(id).collect();
            children.reverse();
            stack.extend(children);
        }
        out
    }

    /// Find the first node matching a predicate (DFS).
    pub fn find<F>(&self, predicate: F) -> Option<NodeId>
    where
        F: Fn(&Node) -> bool,
    {
        let mut stack = vec![self.document];
        while let Some(id) = stack.pop() {
            if let Some(node) = self.get(id) {
                if predicate(node) {
                    return Some(id);
                }
                let mut children: Vec<_> = self.children(id).collect();
                children.reverse();
                stack.extend(children);
            }
        }
        None
    }

    /// Find element by tag name (first match).
    pub fn find_by_tag(&self, tag: &str) -> Option<NodeId> {
        self.find(|node| {
            if let NodeData::Element { name, .. } = &node.data {
                name.local.as_ref() == tag
            } else {
                false
            }
        })
    }

    /// Nearest inclusive ancestor satisfying `predicate`.
    pub fn closest<F>(&self, id: NodeId, predicate: F) -> Option<NodeId>
    where
        F: Fn(&Dom, NodeId) -> bool,
    {
        if predicate(self, id) {
            return Some(id);
        }
        self.ancestors(id).find(|&a| predicate(self, a))
    }

    /// Check whether `node` is `ancestor` or lies inside it.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        node == ancestor || self.ancestors(node).any(|a| a == ancestor)
    }
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

fn extract_id_and_classes(attrs: &[Attribute]) -> (Option<String>, Vec<String>) {
    let mut id = None;
    let mut classes = Vec::new();
    for attr in attrs {
        if attr.name.local.as_ref() == "id" {
            id = Some(attr.value.clone());
        } else if attr.name.local.as_ref() == "class" {
            classes = attr.value.split_whitespace().map(str::to_string).collect();
        }
    }
    (id, classes)
}

/// Iterator over children of a node.
pub struct ChildrenIter<'a> {
    dom: &'a Dom,
    current: NodeId,
}

impl Iterator for ChildrenIter<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current.is_none() {
            return None;
        }
        let id = self.current;
        self.current = self
            .dom
            .get(id)
            .map(|n| n.next_sibling)
            .unwrap_or(NodeId::NONE);
        Some(id)
    }
}

/// Iterator over ancestors of a node.
pub struct AncestorsIter<'a> {
    dom: &'a Dom,
    current: NodeId,
}

impl Iterator for AncestorsIter<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current.is_none() {
            return None;
        }
        let id = self.current;
        self.current = self.dom.parent(id).unwrap_or(NodeId::NONE);
        Some(id)
    }
}

/// Convenience methods for element nodes.
impl Dom {
    pub fn qual_name(&self, id: NodeId) -> Option<&QualName> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Element { name, .. } => Some(name),
            _ => None,
        })
    }

    /// Get element's local name (tag).
    pub fn element_name(&self, id: NodeId) -> Option<&LocalName> {
        self.qual_name(id).map(|n| &n.local)
    }

    /// Check an element's tag name.
    pub fn is_tag(&self, id: NodeId, tag: &str) -> bool {
        self.element_name(id).is_some_and(|n| n.as_ref() == tag)
    }

    /// Get element's namespace.
    pub fn element_namespace(&self, id: NodeId) -> Option<&Namespace> {
        self.qual_name(id).map(|n| &n.ns)
    }

    /// Get an attribute value.
    pub fn get_attr(&self, id: NodeId, attr_name: &str) -> Option<&str> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Element { attrs, .. } => attrs
                .iter()
                .find(|a| a.name.local.as_ref() == attr_name)
                .map(|a| a.value.as_str()),
            _ => None,
        })
    }

    /// Set an attribute, keeping the id/class caches in sync.
    pub fn set_attr(&mut self, id: NodeId, attr_name: &str, value: &str) {
        let Some(node) = self.get_mut(id) else {
            return;
        };
        let NodeData::Element { attrs, .. } = &mut node.data else {
            return;
        };
        match attrs.iter_mut().find(|a| a.name.local.as_ref() == attr_name) {
            Some(attr) => attr.value = value.to_string(),
            None => attrs.push(Attribute::new(attr_name, value)),
        }
        self.refresh_caches(id);
        if attr_name == "id" {
            self.register_id(id);
        }
    }

    /// Remove an attribute if present.
    pub fn remove_attr(&mut self, id: NodeId, attr_name: &str) {
        if let Some(node) = self.get_mut(id)
            && let NodeData::Element { attrs, .. } = &mut node.data
        {
            attrs.retain(|a| a.name.local.as_ref() != attr_name);
        }
        self.refresh_caches(id);
    }

    fn refresh_caches(&mut self, id: NodeId) {
        if let Some(node) = self.get_mut(id)
            && let NodeData::Element {
                attrs, id, classes, ..
            } = &mut node.data
        {
            let (new_id, new_classes) = extract_id_and_classes(attrs);
            *id = new_id;
            *classes = new_classes;
        }
    }

    /// Get element's id attribute.
    pub fn element_id(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Element { id, .. } => id.as_deref(),
            _ => None,
        })
    }

    /// Get element's classes.
    pub fn element_classes(&self, id: NodeId) -> &[String] {
        static EMPTY: &[String] = &[];
        self.get(id)
            .and_then(|n| match &n.data {
                NodeData::Element { classes, .. } => Some(classes.as_slice()),
                _ => None,
            })
            .unwrap_or(EMPTY)
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element_classes(id).iter().any(|c| c == class)
    }

    /// Add or remove a class. Returns whether the class is now present.
    pub fn toggle_class(&mut self, id: NodeId, class: &str, on: bool) -> bool {
        if self.has_class(id, class) == on {
            return on;
        }
        let mut classes: Vec<String> = self.element_classes(id).to_vec();
        if on {
            classes.push(class.to_string());
        } else {
            classes.retain(|c| c != class);
        }
        if classes.is_empty() {
            self.remove_attr(id, "class");
        } else {
            self.set_attr(id, "class", &classes.join(" "));
        }
        on
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) {
        self.toggle_class(id, class, true);
    }

    pub fn remove_class(&mut self, id: NodeId, class: &str) {
        self.toggle_class(id, class, false);
    }

    /// Inline `display` value, if the element carries one.
    pub fn display(&self, id: NodeId) -> Option<&str> {
        let style = self.get_attr(id, "style")?;
        style.split(';').find_map(|decl| {
            let (prop, value) = decl.split_once(':')?;
            (prop.trim() == "display").then(|| value.trim())
        })
    }

    /// Set (or clear, with `None`) the inline `display` value, leaving other
    /// declarations in the style attribute alone.
    pub fn set_display(&mut self, id: NodeId, value: Option<&str>) {
        let mut decls: Vec<String> = self
            .get_attr(id, "style")
            .unwrap_or("")
            .split(';')
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .filter(|d| d.split_once(':').is_none_or(|(p, _)| p.trim() != "display"))
            .map(str::to_string)
            .collect();
        if let Some(value) = value {
            decls.push(format!("display: {value}"));
        }
        if decls.is_empty() {
            self.remove_attr(id, "style");
        } else {
            self.set_attr(id, "style", &decls.join("; "));
        }
    }

    /// Whether an element would take part in layout: attached, and neither it
    /// nor any ancestor is `.hidden` or `display: none`.
    pub fn is_rendered(&self, id: NodeId) -> bool {
        if !self.is_attached(id) {
            return false;
        }
        std::iter::once(id)
            .chain(self.ancestors(id))
            .filter(|&n| self.is_element(n))
            .all(|n| !self.has_class(n, "hidden") && self.display(n) != Some("none"))
    }

    /// Check if node is an element.
    pub fn is_element(&self, id: NodeId) -> bool {
        self.get(id)
            .is_some_and(|n| matches!(n.data, NodeData::Element { .. }))
    }

    /// Check if node is a text node.
    pub fn is_text(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(|n| matches!(n.data, NodeData::Text(_)))
    }

    /// Get text of a text node.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// Concatenated text of every descendant text node (`textContent`).
    pub fn text_content(&self, id: NodeId) -> String {
        if let Some(t) = self.text(id) {
            return t.to_string();
        }
        self.descendants(id)
            .into_iter()
            .filter_map(|n| self.text(n))
            .collect()
    }

    /// Replace an element's children with a single text node.
    pub fn set_text_content(&mut self, id: NodeId, text: &str) {
        self.clear_children(id);
        if !text.is_empty() {
            let node = self.create_text(text);
            self.append(id, node);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_qname(local: &str) -> QualName {
        QualName::new(None, ns!(html), LocalName::from(local))
    }

    #[test]
    fn test_create_elements() {
        let mut dom = Dom::new();

        let div = dom.create_element(make_qname("div"), vec![Attribute::new("id", "main")]);
        dom.append(dom.document(), div);

        assert_eq!(dom.element_name(div).unwrap().as_ref(), "div");
        assert_eq!(dom.element_id(div), Some("main"));
        assert_eq!(dom.get_by_id("main"), Some(div));
    }

    #[test]
    fn test_append_children() {
        let mut dom = Dom::new();

        let parent = dom.create_element(make_qname("div"), vec![]);
        let child1 = dom.create_element(make_qname("p"), vec![]);
        let child2 = dom.create_element(make_qname("p"), vec![]);

        dom.append(dom.document(), parent);
        dom.append(parent, child1);
        dom.append(parent, child2);

        let children: Vec<_> = dom.children(parent).collect();
        assert_eq!(children, vec![child1, child2]);
    }

    #[test]
    fn test_text_merging() {
        let mut dom = Dom::new();

        let p = dom.create_element(make_qname("p"), vec![]);
        dom.append(dom.document(), p);

        dom.append_text(p, "Hello, ");
        dom.append_text(p, "World!");

        let children: Vec<_> = dom.children(p).collect();
        assert_eq!(children.len(), 1);
        assert_eq!(dom.text(children[0]), Some("Hello, World!"));
    }

    #[test]
    fn test_detach_and_replace() {
        let mut dom = Dom::new();
        let p = dom.create_html_element("p", vec![]);
        dom.append(dom.document(), p);
        let a = dom.create_text("a");
        let b = dom.create_text("b");
        let c = dom.create_text("c");
        dom.append(p, a);
        dom.append(p, b);
        dom.append(p, c);

        let x = dom.create_text("x");
        let y = dom.create_text("y");
        dom.replace_with(b, &[x, y]);
        assert_eq!(dom.text_content(p), "axyc");
        assert!(!dom.is_attached(b));

        dom.detach(a);
        assert_eq!(dom.text_content(p), "xyc");
        dom.clear_children(p);
        assert_eq!(dom.children(p).count(), 0);
    }

    #[test]
    fn test_class_toggling_updates_cache() {
        let mut dom = Dom::new();
        let div = dom.create_html_element("div", vec![Attribute::new("class", "page-content")]);
        dom.append(dom.document(), div);

        dom.add_class(div, "hidden");
        assert!(dom.has_class(div, "hidden"));
        assert_eq!(dom.get_attr(div, "class"), Some("page-content hidden"));

        dom.add_class(div, "hidden");
        assert_eq!(dom.element_classes(div).len(), 2);

        dom.remove_class(div, "hidden");
        assert!(!dom.has_class(div, "hidden"));
        assert_eq!(dom.get_attr(div, "class"), Some("page-content"));
    }

    #[test]
    fn test_display_style() {
        let mut dom = Dom::new();
        let div = dom.create_html_element("div", vec![Attribute::new("style", "color: red")]);
        dom.append(dom.document(), div);

        dom.set_display(div, Some("grid"));
        assert_eq!(dom.display(div), Some("grid"));
        assert_eq!(dom.get_attr(div, "style"), Some("color: red; display: grid"));

        dom.set_display(div, Some("none"));
        assert_eq!(dom.display(div), Some("none"));
        assert!(!dom.is_rendered(div));

        dom.set_display(div, None);
        assert_eq!(dom.get_attr(div, "style"), Some("color: red"));
        assert!(dom.is_rendered(div));
    }

    #[test]
    fn test_deep_clone_keeps_template_id() {
        let mut dom = Dom::new();
        let div = dom.create_html_element("div", vec![Attribute::new("id", "post-1-content")]);
        dom.append(dom.document(), div);
        let h1 = dom.create_html_element("h1", vec![]);
        dom.append(div, h1);
        dom.append_text(h1, "Title");

        let copy = dom.deep_clone(div);
        dom.append(dom.document(), copy);

        assert_eq!(dom.text_content(copy), "Title");
        assert_eq!(dom.get_by_id("post-1-content"), Some(div));
    }

    #[test]
    fn test_removed_slots_are_reused() {
        let mut dom = Dom::new();
        let div = dom.create_html_element("div", vec![Attribute::new("id", "box")]);
        dom.append(dom.document(), div);
        let p = dom.create_html_element("p", vec![]);
        dom.append(div, p);
        dom.append_text(p, "text");
        let live = dom.len();

        dom.remove(div);
        assert_eq!(dom.len(), live - 3);
        assert!(dom.get(p).is_none());
        assert_eq!(dom.get_by_id("box"), None);

        dom.create_html_element("section", vec![]);
        assert_eq!(dom.capacity(), live);
        assert_eq!(dom.len(), live - 2);

        dom.remove(dom.document());
        assert!(dom.get(dom.document()).is_some());
    }

    #[test]
    fn test_get_by_id_ignores_detached() {
        let mut dom = Dom::new();
        let div = dom.create_html_element("div", vec![Attribute::new("id", "gone")]);
        dom.append(dom.document(), div);
        dom.detach(div);
        assert_eq!(dom.get_by_id("gone"), None);
    }
}
