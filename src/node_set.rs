use super::*;

/// What [`Page::select`] should wrap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target<'a, N> {
    Document,
    Window,
    Selector(&'a str),
    Node(N),
    Nodes(Vec<N>),
}

impl<'a, N> From<&'a str> for Target<'a, N> {
    /// `"document"` and `"window"` name the globals; anything else is a selector.
    fn from(value: &'a str) -> Self {
        match value {
            "document" => Self::Document,
            "window" => Self::Window,
            selector => Self::Selector(selector),
        }
    }
}

impl<'a, N> From<&'a String> for Target<'a, N> {
    fn from(value: &'a String) -> Self {
        Self::from(value.as_str())
    }
}

impl<'a, N> From<Vec<N>> for Target<'a, N> {
    fn from(nodes: Vec<N>) -> Self {
        Self::Nodes(nodes)
    }
}

impl<'a, N: Copy> From<&[N]> for Target<'a, N> {
    fn from(nodes: &[N]) -> Self {
        Self::Nodes(nodes.to_vec())
    }
}

impl<'a, N> From<NodeSet<N>> for Target<'a, N> {
    fn from(set: NodeSet<N>) -> Self {
        Self::Nodes(set.nodes)
    }
}

impl<'a> From<NodeId> for Target<'a, NodeId> {
    fn from(node: NodeId) -> Self {
        Self::Node(node)
    }
}

/// Ordered, fixed collection of nodes. Membership never changes after
/// construction; operations that filter or traverse build a new set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSet<N> {
    nodes: Vec<N>,
}

impl<N> Default for NodeSet<N> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

impl<N: Copy + PartialEq> NodeSet<N> {
    pub fn new(nodes: Vec<N>) -> Self {
        Self { nodes }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<N> {
        self.nodes.get(index).copied()
    }

    pub fn first(&self) -> Option<N> {
        self.get(0)
    }

    pub fn contains(&self, node: N) -> bool {
        self.nodes.contains(&node)
    }

    pub fn as_slice(&self) -> &[N] {
        &self.nodes
    }

    pub fn iter(&self) -> impl Iterator<Item = N> + '_ {
        self.nodes.iter().copied()
    }

    pub fn into_vec(self) -> Vec<N> {
        self.nodes
    }

    /// Calls `callback(node, index)` for every node in order.
    pub fn each(&self, mut callback: impl FnMut(N, usize)) -> &Self {
        for (index, node) in self.nodes.iter().enumerate() {
            callback(*node, index);
        }
        self
    }

    /// Every node except those identical to `other`'s first node.
    ///
    /// Only the first node of `other` is compared; the rest of `other` is
    /// ignored. An empty `other` keeps everything.
    pub fn not(&self, other: &NodeSet<N>) -> NodeSet<N> {
        let excluded = other.first();
        self.nodes
            .iter()
            .copied()
            .filter(|node| Some(*node) != excluded)
            .collect()
    }
}

impl<N> FromIterator<N> for NodeSet<N> {
    fn from_iter<I: IntoIterator<Item = N>>(iter: I) -> Self {
        Self {
            nodes: iter.into_iter().collect(),
        }
    }
}

impl<N> IntoIterator for NodeSet<N> {
    type Item = N;
    type IntoIter = std::vec::IntoIter<N>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.into_iter()
    }
}

impl<N> From<Vec<N>> for NodeSet<N> {
    fn from(nodes: Vec<N>) -> Self {
        Self { nodes }
    }
}
