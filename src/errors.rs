use thiserror::Error;

use crate::node::NodeId;

/// Failures surfaced to the caller. Everything else degrades to a fallback and
/// at most a log line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Paint was asked for nodes whose layout was never resolved. Their
    /// subtrees produced no commands; the rest of the tree painted normally.
    #[error("layout not resolved for {} node(s), first {:?}", nodes.len(), nodes.first())]
    LayoutNotResolved { nodes: Vec<NodeId> },
    #[error("ancestor search from {node:?} exceeded {max_depth} levels")]
    AncestorDepthExceeded { node: NodeId, max_depth: usize },
    #[error("node {0:?} does not belong to this tree")]
    UnknownNode(NodeId),
}

/// One-shot flags so each resource warning is logged once per pass.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Warnings {
    pub(crate) text_measurement_fn_not_set: bool,
    pub(crate) opacity_depth_exceeded: bool,
    pub(crate) opacity_underflow: bool,
    pub(crate) max_overlays_exceeded: bool,
    pub(crate) ancestor_depth_exceeded: bool,
}
