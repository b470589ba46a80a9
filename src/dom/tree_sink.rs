//! Feeds html5ever's tree-construction events into a [`Dom`].

use std::borrow::Cow;
use std::cell::{Ref, RefCell};

use html5ever::tendril::StrTendril;
use html5ever::tree_builder::{ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::{QualName, local_name, ns};
use tracing::trace;

use super::arena::{Attribute, Dom, NodeId};

static NO_NAME: QualName = QualName {
    prefix: None,
    ns: ns!(),
    local: local_name!(""),
};

/// Where a parsed node or text run goes.
enum Position {
    LastChildOf(NodeId),
    Before(NodeId),
}

/// Parser sink. The tree builder only hands out `&self`, so the arena lives
/// in a `RefCell`; element names are lent out as `Ref`s and html5ever drops
/// them before it mutates the tree again.
pub(super) struct PageSink {
    dom: RefCell<Dom>,
}

impl PageSink {
    pub(super) fn new() -> Self {
        Self {
            dom: RefCell::new(Dom::new()),
        }
    }

    fn place(&self, position: Position, child: NodeOrText<NodeId>) {
        let mut dom = self.dom.borrow_mut();
        let node = match (child, &position) {
            (NodeOrText::AppendText(text), Position::LastChildOf(parent)) => {
                dom.append_text(*parent, &text);
                return;
            }
            (NodeOrText::AppendText(text), Position::Before(_)) => dom.create_text(text.to_string()),
            (NodeOrText::AppendNode(node), _) => node,
        };
        match position {
            Position::LastChildOf(parent) => dom.append(parent, node),
            Position::Before(sibling) => dom.insert_before(sibling, node),
        }
    }
}

impl TreeSink for PageSink {
    type Handle = NodeId;
    type Output = Dom;
    type ElemName<'a>
        = Ref<'a, QualName>
    where
        Self: 'a;

    fn finish(self) -> Dom {
        self.dom.into_inner()
    }

    fn parse_error(&self, msg: Cow<'static, str>) {
        trace!(%msg, "recovered from malformed markup");
    }

    fn get_document(&self) -> NodeId {
        self.dom.borrow().document()
    }

    fn elem_name<'a>(&'a self, target: &'a NodeId) -> Ref<'a, QualName> {
        Ref::map(self.dom.borrow(), |dom| {
            dom.qual_name(*target).unwrap_or(&NO_NAME)
        })
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<html5ever::Attribute>,
        _flags: ElementFlags,
    ) -> NodeId {
        let attrs = attrs
            .into_iter()
            .map(|a| Attribute {
                name: a.name,
                value: a.value.to_string(),
            })
            .collect();
        self.dom.borrow_mut().create_element(name, attrs)
    }

    fn create_comment(&self, text: StrTendril) -> NodeId {
        self.dom.borrow_mut().create_comment(text.to_string())
    }

    // Only the XML tokenizer emits processing instructions.
    fn create_pi(&self, _target: StrTendril, data: StrTendril) -> NodeId {
        self.create_comment(data)
    }

    fn append(&self, parent: &NodeId, child: NodeOrText<NodeId>) {
        self.place(Position::LastChildOf(*parent), child);
    }

    fn append_based_on_parent_node(
        &self,
        element: &NodeId,
        prev_element: &NodeId,
        child: NodeOrText<NodeId>,
    ) {
        let attached = self.dom.borrow().parent(*element).is_some();
        if attached {
            self.place(Position::Before(*element), child);
        } else {
            self.place(Position::LastChildOf(*prev_element), child);
        }
    }

    fn append_doctype_to_document(&self, name: StrTendril, public_id: StrTendril, system_id: StrTendril) {
        let mut dom = self.dom.borrow_mut();
        let doctype = dom.create_doctype(name.to_string(), public_id.to_string(), system_id.to_string());
        let document = dom.document();
        dom.append(document, doctype);
    }

    // Template contents stay inline as ordinary children.
    fn get_template_contents(&self, target: &NodeId) -> NodeId {
        *target
    }

    fn same_node(&self, x: &NodeId, y: &NodeId) -> bool {
        x == y
    }

    fn set_quirks_mode(&self, _mode: QuirksMode) {}

    fn append_before_sibling(&self, sibling: &NodeId, new_node: NodeOrText<NodeId>) {
        self.place(Position::Before(*sibling), new_node);
    }

    fn add_attrs_if_missing(&self, target: &NodeId, attrs: Vec<html5ever::Attribute>) {
        let mut dom = self.dom.borrow_mut();
        for attr in attrs {
            if dom.get_attr(*target, &attr.name.local).is_none() {
                dom.set_attr(*target, &attr.name.local, &attr.value);
            }
        }
    }

    // The adoption agency re-attaches removed nodes, so they are only unlinked.
    fn remove_from_parent(&self, target: &NodeId) {
        self.dom.borrow_mut().detach(*target);
    }

    fn reparent_children(&self, node: &NodeId, new_parent: &NodeId) {
        let mut dom = self.dom.borrow_mut();
        let children: Vec<NodeId> = dom.children(*node).collect();
        for child in children {
            dom.detach(child);
            dom.append(*new_parent, child);
        }
    }
}
