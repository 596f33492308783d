use super::*;

impl Dom {
    pub(crate) fn is_connected(&self, node_id: NodeId) -> bool {
        std::iter::successors(Some(node_id), |node| self.parent(*node)).any(|node| node == self.root)
    }

    /// The first element child of the document, usually `<html>`.
    pub fn document_element(&self) -> Option<NodeId> {
        self.children(self.root)
            .iter()
            .copied()
            .find(|child| self.element(*child).is_some())
    }

    /// `<body>` as the document element or as one of its children.
    pub(crate) fn body_element(&self) -> Option<NodeId> {
        let html = self.document_element()?;
        std::iter::once(html)
            .chain(self.children(html).iter().copied())
            .find(|node| self.tag_name(*node) == Some("body"))
    }

    /// Elements under and including `node_id`, in document order.
    pub(crate) fn collect_elements_dfs(&self, node_id: NodeId, out: &mut Vec<NodeId>) {
        let mut pending = vec![node_id];
        while let Some(node) = pending.pop() {
            if self.element(node).is_some() {
                out.push(node);
            }
            pending.extend(self.children(node).iter().rev().copied());
        }
    }

    /// Target first, then each ancestor; documents hand the event on to the window.
    pub(crate) fn bubble_path(&self, target: NodeId) -> Vec<NodeId> {
        if self.node(target).is_none() {
            return Vec::new();
        }
        let mut path: Vec<NodeId> =
            std::iter::successors(Some(target), |node| self.parent(*node)).collect();
        if path.last() == Some(&self.root) {
            path.push(self.window);
        }
        path
    }
}
