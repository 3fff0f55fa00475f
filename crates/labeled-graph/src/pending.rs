use crate::scene::NodeId;

/// Nodes waiting to be paired by the streaming edge policy.
///
/// Holds at most one node between calls: pushing the second one hands the
/// pair back and empties the queue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingPair {
    first: Option<NodeId>,
}

impl PendingPair {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: NodeId) -> Option<(NodeId, NodeId)> {
        match self.first.take() {
            Some(first) if first != node => Some((first, node)),
            _ => {
                self.first = Some(node);
                None
            }
        }
    }

    pub fn waiting(&self) -> Option<NodeId> {
        self.first
    }

    /// Drop a node that no longer exists.
    pub fn forget(&mut self, node: NodeId) {
        if self.first == Some(node) {
            self.first = None;
        }
    }

    pub fn clear(&mut self) {
        self.first = None;
    }
}
