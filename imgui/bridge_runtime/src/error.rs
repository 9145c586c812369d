use thiserror::Error;

use crate::native::SurfaceError;
use crate::tree::{NodeId, NodeKind};

/// A frame that could not be completed. The cleanup stack has already been unwound
/// when this is returned.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Surface(#[from] SurfaceError),
    #[error("<{kind}> node {id} failed to render")]
    Node {
        id: NodeId,
        kind: String,
        #[source]
        source: Box<RenderError>,
    },
}

impl RenderError {
    /// Attributes a native failure to the node that issued the call. Errors that
    /// already name a node keep naming it.
    pub(crate) fn within(self, id: NodeId, kind: &NodeKind) -> Self {
        match self {
            Self::Surface(_) => Self::Node {
                id,
                kind: kind.to_string(),
                source: Box::new(self),
            },
            Self::Node { .. } => self,
        }
    }

    /// The node the failure is attributed to, if any.
    pub fn node(&self) -> Option<NodeId> {
        match self {
            Self::Node { id, .. } => Some(*id),
            Self::Surface(_) => None,
        }
    }

    pub fn surface(&self) -> &SurfaceError {
        match self {
            Self::Surface(err) => err,
            Self::Node { source, .. } => source.surface(),
        }
    }
}
