// Page types disagree on what the comment and like collections are called.
// Each logical field maps to its raw keys in priority order; the first one
// present on the node wins.

use crate::raw::{EdgeCollection, RawNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalField {
    Comments,
    Likes,
}

pub const SYNONYMS: &[(LogicalField, &[&str])] = &[
    (
        LogicalField::Comments,
        &[
            "edge_media_to_comment",
            "edge_media_to_parent_comment",
            "edge_media_preview_comment",
        ],
    ),
    (
        LogicalField::Likes,
        &["edge_liked_by", "edge_media_preview_like"],
    ),
];

impl LogicalField {
    pub fn candidates(self) -> &'static [&'static str] {
        SYNONYMS
            .iter()
            .find(|(field, _)| *field == self)
            .map(|(_, keys)| *keys)
            .unwrap_or(&[])
    }
}

/// First present synonym of `field` on `node`, as an edge collection.
pub fn resolve<'a>(node: &RawNode<'a>, field: LogicalField) -> Option<EdgeCollection<'a>> {
    field
        .candidates()
        .iter()
        .find_map(|key| node.edges(key))
}
