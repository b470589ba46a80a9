//! Lets the `selectors` crate match against the page [`Dom`].
//!
//! Anchor lookups, search scan targets and highlight candidates are plain
//! selectors: type, class, id, attribute, combinators and `:not()`. Every
//! identifier is interned as an html5ever atom.

use std::fmt;

use html5ever::{LocalName, Namespace};
use precomputed_hash::PrecomputedHash;
use selectors::attr::{AttrSelectorOperation, CaseSensitivity, NamespaceConstraint};
use selectors::bloom::BloomFilter;
use selectors::context::MatchingContext;
use selectors::matching::ElementSelectorFlags;
use selectors::parser::SelectorParseErrorKind;
use selectors::{OpaqueElement, SelectorImpl};

use super::arena::{Dom, NodeData, NodeId};

/// Selector dialect used for page queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSelectors;

impl SelectorImpl for PageSelectors {
    type ExtraMatchingData<'a> = ();
    type AttrValue = CssAtom;
    type Identifier = CssAtom;
    type LocalName = CssAtom;
    type NamespacePrefix = CssAtom;
    type NamespaceUrl = CssNamespace;
    type BorrowedLocalName = CssAtom;
    type BorrowedNamespaceUrl = CssNamespace;
    type NonTSPseudoClass = NoPseudo;
    type PseudoElement = NoPseudo;
}

// The default hooks reject every `:hover`-style pseudo-class and every
// pseudo-element at parse time.
impl<'i> selectors::parser::Parser<'i> for PageSelectors {
    type Impl = PageSelectors;
    type Error = SelectorParseErrorKind<'i>;
}

/// An interned identifier, tag name or attribute value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CssAtom(LocalName);

impl From<&str> for CssAtom {
    fn from(s: &str) -> Self {
        Self(LocalName::from(s))
    }
}

impl AsRef<str> for CssAtom {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PrecomputedHash for CssAtom {
    fn precomputed_hash(&self) -> u32 {
        self.0.precomputed_hash()
    }
}

impl cssparser::ToCss for CssAtom {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        cssparser::serialize_identifier(&self.0, dest)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CssNamespace(Namespace);

impl From<&str> for CssNamespace {
    fn from(s: &str) -> Self {
        Self(Namespace::from(s))
    }
}

impl PrecomputedHash for CssNamespace {
    fn precomputed_hash(&self) -> u32 {
        self.0.precomputed_hash()
    }
}

impl cssparser::ToCss for CssNamespace {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        dest.write_str(&self.0)
    }
}

/// Uninhabited: no pseudo-class beyond the tree-structural ones, and no
/// pseudo-element, ever parses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoPseudo {}

impl cssparser::ToCss for NoPseudo {
    fn to_css<W: fmt::Write>(&self, _dest: &mut W) -> fmt::Result {
        match *self {}
    }
}

impl selectors::parser::NonTSPseudoClass for NoPseudo {
    type Impl = PageSelectors;

    fn is_active_or_hover(&self) -> bool {
        match *self {}
    }

    fn is_user_action_state(&self) -> bool {
        match *self {}
    }
}

impl selectors::parser::PseudoElement for NoPseudo {
    type Impl = PageSelectors;
}

/// An element of the [`Dom`], as seen by the matcher.
#[derive(Clone, Copy)]
pub struct ElementRef<'a> {
    dom: &'a Dom,
    id: NodeId,
}

impl<'a> ElementRef<'a> {
    pub fn new(dom: &'a Dom, id: NodeId) -> Self {
        Self { dom, id }
    }

    fn wrap(&self, id: NodeId) -> Option<Self> {
        self.dom.is_element(id).then_some(Self::new(self.dom, id))
    }

    fn sibling_element(&self, forward: bool) -> Option<Self> {
        let step = |id: NodeId| {
            self.dom
                .get(id)
                .map(|n| if forward { n.next_sibling } else { n.prev_sibling })
                .filter(|s| s.is_some())
        };
        let mut current = step(self.id)?;
        loop {
            if let Some(found) = self.wrap(current) {
                return Some(found);
            }
            current = step(current)?;
        }
    }
}

impl fmt::Debug for ElementRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.dom.element_name(self.id).map_or("?", |n| n.as_ref());
        write!(f, "<{name}#{}>", self.id.0)
    }
}

impl selectors::Element for ElementRef<'_> {
    type Impl = PageSelectors;

    fn opaque(&self) -> OpaqueElement {
        OpaqueElement::new(self)
    }

    fn parent_element(&self) -> Option<Self> {
        self.wrap(self.dom.parent(self.id)?)
    }

    fn prev_sibling_element(&self) -> Option<Self> {
        self.sibling_element(false)
    }

    fn next_sibling_element(&self) -> Option<Self> {
        self.sibling_element(true)
    }

    fn first_element_child(&self) -> Option<Self> {
        self.dom.children(self.id).find_map(|c| self.wrap(c))
    }

    fn is_html_element_in_html_document(&self) -> bool {
        true
    }

    fn has_local_name(&self, name: &CssAtom) -> bool {
        self.dom.element_name(self.id) == Some(&name.0)
    }

    fn has_namespace(&self, ns: &CssNamespace) -> bool {
        self.dom.element_namespace(self.id) == Some(&ns.0)
    }

    fn is_same_type(&self, other: &Self) -> bool {
        self.dom.qual_name(self.id) == other.dom.qual_name(other.id)
    }

    fn attr_matches(
        &self,
        ns: &NamespaceConstraint<&CssNamespace>,
        local_name: &CssAtom,
        operation: &AttrSelectorOperation<&CssAtom>,
    ) -> bool {
        let Some(NodeData::Element { attrs, .. }) = self.dom.get(self.id).map(|n| &n.data) else {
            return false;
        };
        attrs.iter().any(|attr| {
            attr.name.local == local_name.0
                && match ns {
                    NamespaceConstraint::Any => true,
                    NamespaceConstraint::Specific(ns) => attr.name.ns == ns.0,
                }
                && operation.eval_str(&attr.value)
        })
    }

    fn has_id(&self, id: &CssAtom, case_sensitivity: CaseSensitivity) -> bool {
        self.dom
            .element_id(self.id)
            .is_some_and(|own| case_sensitivity.eq(own.as_bytes(), id.0.as_bytes()))
    }

    fn has_class(&self, name: &CssAtom, case_sensitivity: CaseSensitivity) -> bool {
        self.dom
            .element_classes(self.id)
            .iter()
            .any(|c| case_sensitivity.eq(c.as_bytes(), name.0.as_bytes()))
    }

    fn is_empty(&self) -> bool {
        self.dom
            .children(self.id)
            .all(|c| !self.dom.is_element(c) && self.dom.text(c).is_none_or(str::is_empty))
    }

    fn is_root(&self) -> bool {
        self.dom.parent(self.id) == Some(self.dom.document())
    }

    fn match_non_ts_pseudo_class(
        &self,
        pc: &NoPseudo,
        _: &mut MatchingContext<'_, PageSelectors>,
    ) -> bool {
        match *pc {}
    }

    fn match_pseudo_element(
        &self,
        pe: &NoPseudo,
        _: &mut MatchingContext<'_, PageSelectors>,
    ) -> bool {
        match *pe {}
    }

    // A static template has no links state, shadow trees, slots, parts or
    // custom states.
    fn is_link(&self) -> bool {
        false
    }

    fn parent_node_is_shadow_root(&self) -> bool {
        false
    }

    fn containing_shadow_host(&self) -> Option<Self> {
        None
    }

    fn is_pseudo_element(&self) -> bool {
        false
    }

    fn is_html_slot_element(&self) -> bool {
        false
    }

    fn imported_part(&self, _: &CssAtom) -> Option<CssAtom> {
        None
    }

    fn is_part(&self, _: &CssAtom) -> bool {
        false
    }

    fn has_custom_state(&self, _: &CssAtom) -> bool {
        false
    }

    fn apply_selector_flags(&self, _: ElementSelectorFlags) {}

    fn add_element_unique_hashes(&self, _: &mut BloomFilter) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use crate::dom::{SelectorSet, parse_html};

    #[test]
    fn test_pseudo_classes_are_rejected() {
        assert!(SelectorSet::parse("a:hover").is_err());
        assert!(SelectorSet::parse("p::before").is_err());
        assert!(SelectorSet::parse("li:first-child").is_ok());
    }

    #[test]
    fn test_structural_pseudo_classes_use_element_siblings() {
        let dom = parse_html("<ul id='l'><li>a</li> text <li>b</li><!-- c --><li>c</li></ul>");
        let list = dom.get_by_id("l").unwrap();
        let first = dom.query_all(list, "li:first-child").unwrap();
        let adjacent = dom.query_all(list, "li + li").unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(dom.text_content(first[0]), "a");
        assert_eq!(adjacent.len(), 2);
    }

    #[test]
    fn test_attribute_operators() {
        let dom = parse_html(r#"<div id='w'><b data-tags="cat kitten">x</b></div>"#);
        let wrap = dom.get_by_id("w").unwrap();
        assert!(dom.query(wrap, r#"[data-tags~="kitten"]"#).unwrap().is_some());
        assert!(dom.query(wrap, r#"[data-tags*="itt"]"#).unwrap().is_some());
        assert!(dom.query(wrap, r#"[data-tags="cat"]"#).unwrap().is_none());
    }
}
