//! [`Element`] for documents parsed by roxmltree.

use crate::scene::{Element, ElementKind, SceneInfo};
use crate::walker::{walk, Walk};
use crate::options::Options;

use roxmltree::{Document, Node};

use std::vec::Vec;

pub const SVG_NS: &str = "http://www.w3.org/2000/svg";

impl<'a, 'input> Element for Node<'a, 'input> {
    fn tag(&self) -> &str {
        self.tag_name().name()
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        Node::attribute(self, name)
    }

    fn children(&self) -> Vec<Self> {
        Node::children(self).filter(Node::is_element).collect()
    }

    /// Elements from other vocabularies (Inkscape, Sodipodi...) are never
    /// drawn.
    fn kind(&self) -> ElementKind {
        match self.tag_name().namespace() {
            None | Some(SVG_NS) => ElementKind::from_tag(self.tag()),
            Some(_) => ElementKind::Other,
        }
    }
}

/// Placement and commands of one parsed document.
///
/// `info` overrides the document's own viewBox, so that all frames of a
/// sequence share the placement of the first one.
pub fn convert_document(document: &Document, info: Option<SceneInfo>, options: &Options) -> (SceneInfo, Walk) {
    let root = document.root_element();
    let info = info.unwrap_or_else(|| SceneInfo::from_root(&root));
    (info, walk(&root, info.translate, options))
}

pub fn convert_str(text: &str, info: Option<SceneInfo>, options: &Options) -> Result<(SceneInfo, Walk), roxmltree::Error> {
    let document = Document::parse(text)?;
    Ok(convert_document(&document, info, options))
}
