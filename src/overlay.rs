//! Fullscreen image viewer.
//!
//! Clicking a card, blog or home image shows it in a
//! `div.fullscreen-overlay > img.fullscreen-image` appended to the body.
//! Only one overlay exists at a time and clicking it closes it.

use tracing::debug;

use crate::dom::{Attribute, Dom, NodeId, SelectorSet};
use crate::error::Result;

pub const OVERLAY_CLASS: &str = "fullscreen-overlay";
pub const OVERLAY_IMAGE_CLASS: &str = "fullscreen-image";

/// Images that open in the overlay when clicked.
const ZOOMABLE: &str = ".card-image-placeholder img, .blog-image-placeholder img, \
     #full-blog-post-view img.placeholder-image, #home-content .image-container img.home-main-image";

const DEFAULT_ALT: &str = "Fullscreen Image";

#[derive(Debug)]
pub struct ImageOverlay {
    zoomable: SelectorSet,
    open: Option<NodeId>,
}

impl ImageOverlay {
    pub fn new() -> Result<Self> {
        Ok(Self {
            zoomable: SelectorSet::parse(ZOOMABLE)?,
            open: None,
        })
    }

    /// Whether `target` is a zoomable image under `container`.
    pub fn is_zoomable(&self, dom: &Dom, container: NodeId, target: NodeId) -> bool {
        dom.contains(container, target) && self.zoomable.matches(dom, target)
    }

    /// Show `image` fullscreen, replacing any overlay already open.
    pub fn open(&mut self, dom: &mut Dom, body: NodeId, image: NodeId) -> NodeId {
        self.close(dom);

        let src = dom.get_attr(image, "src").unwrap_or_default().to_string();
        let alt = dom
            .get_attr(image, "alt")
            .filter(|alt| !alt.is_empty())
            .unwrap_or(DEFAULT_ALT)
            .to_string();
        debug!(%src, "opening image overlay");

        let overlay = dom.create_html_element("div", vec![Attribute::new("class", OVERLAY_CLASS)]);
        let full = dom.create_html_element(
            "img",
            vec![
                Attribute::new("src", src),
                Attribute::new("alt", alt),
                Attribute::new("class", OVERLAY_IMAGE_CLASS),
            ],
        );
        dom.append(overlay, full);
        dom.append(body, overlay);
        self.open = Some(overlay);
        overlay
    }

    /// Remove the open overlay. Returns whether one was open.
    pub fn close(&mut self, dom: &mut Dom) -> bool {
        match self.open.take() {
            Some(overlay) => {
                dom.remove(overlay);
                true
            }
            None => false,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// Whether `target` is the open overlay or inside it.
    pub fn contains(&self, dom: &Dom, target: NodeId) -> bool {
        self.open.is_some_and(|overlay| dom.contains(overlay, target))
    }
}
