use crate::host::HostId;
use crate::node::RenderNodeId;

/// Failures surfaced by a render or update pass.
///
/// Host mutations are applied incrementally while the tree is walked, so an
/// error leaves the host tree in a mixed old/new state; there is no rollback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    Missing {
        id: RenderNodeId,
    },
    NotAComponent {
        id: RenderNodeId,
    },
    DetachedHost {
        host: HostId,
    },
    /// A component changed the number of hook calls between two renders of
    /// the same instance. Slot state is positional, so this would silently
    /// shift values into the wrong hooks if it went undetected.
    HookCountMismatch {
        id: RenderNodeId,
        previous: usize,
        current: usize,
    },
}

impl std::fmt::Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderError::Missing { id } => write!(f, "render node {id} missing"),
            RenderError::NotAComponent { id } => {
                write!(f, "render node {id} is not a component")
            }
            RenderError::DetachedHost { host } => {
                write!(f, "host node {host} has no parent in the host tree")
            }
            RenderError::HookCountMismatch {
                id,
                previous,
                current,
            } => {
                write!(
                    f,
                    "component node {id} used {current} hook slots; the previous render used {previous}"
                )
            }
        }
    }
}

impl std::error::Error for RenderError {}
