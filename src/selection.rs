use super::*;

/// A [`NodeSet`] bound to the [`Page`] it was selected from.
///
/// Class operations apply to every node in the set and return the same
/// selection, so calls can be chained with `?`.
pub struct Selection<'p, H: DomHost> {
    page: &'p Page<H>,
    nodes: NodeSet<H::Node>,
}

impl<'p, H: DomHost> Clone for Selection<'p, H> {
    fn clone(&self) -> Self {
        Self {
            page: self.page,
            nodes: self.nodes.clone(),
        }
    }
}

impl<'p, H: DomHost> fmt::Debug for Selection<'p, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Selection")
            .field("nodes", &self.nodes)
            .finish()
    }
}

impl<'p, H: DomHost> Selection<'p, H> {
    pub(crate) fn new(page: &'p Page<H>, nodes: NodeSet<H::Node>) -> Self {
        Self { page, nodes }
    }

    pub fn page(&self) -> &'p Page<H> {
        self.page
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<H::Node> {
        self.nodes.get(index)
    }

    pub fn first(&self) -> Option<H::Node> {
        self.nodes.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = H::Node> + '_ {
        self.nodes.iter()
    }

    pub fn nodes(&self) -> &NodeSet<H::Node> {
        &self.nodes
    }

    pub fn into_node_set(self) -> NodeSet<H::Node> {
        self.nodes
    }

    /// Calls `callback(node, index)` for every node in order.
    pub fn each(&self, callback: impl FnMut(H::Node, usize)) -> &Self {
        self.nodes.each(callback);
        self
    }

    /// See [`NodeSet::not`]: only `other`'s first node is excluded.
    pub fn not(&self, other: &Selection<'_, H>) -> Selection<'p, H> {
        Selection::new(self.page, self.nodes.not(&other.nodes))
    }

    /// True when at least one node carries every token in `tokens`.
    pub fn has_class(&self, tokens: &str) -> Result<bool> {
        let strategy = self.page.class_strategy();
        let host = self.page.host();
        for node in self.nodes.iter() {
            if strategy.has(&*host, node, tokens)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    pub fn add_class(&self, tokens: &str) -> Result<&Self> {
        let strategy = self.page.class_strategy();
        let mut host = self.page.host_mut();
        for node in self.nodes.iter() {
            strategy.add(&mut *host, node, tokens)?;
        }
        Ok(self)
    }

    pub fn remove_class(&self, tokens: &str) -> Result<&Self> {
        let strategy = self.page.class_strategy();
        let mut host = self.page.host_mut();
        for node in self.nodes.iter() {
            strategy.remove(&mut *host, node, tokens)?;
        }
        Ok(self)
    }

    /// Toggles each node on its own: a node carrying all of `tokens` loses
    /// them, any other node gains them.
    pub fn toggle_class(&self, tokens: &str) -> Result<&Self> {
        let strategy = self.page.class_strategy();
        let mut host = self.page.host_mut();
        for node in self.nodes.iter() {
            strategy.toggle(&mut *host, node, tokens)?;
        }
        Ok(self)
    }

    /// Parent element of every node, or with a selector the nearest matching
    /// ancestor. Nodes without one contribute nothing; duplicates are kept.
    pub fn parent(&self, selector: Option<&str>) -> Result<Selection<'p, H>> {
        let host = self.page.host();
        let mut out = Vec::with_capacity(self.nodes.len());
        for node in self.nodes.iter() {
            if let Some(parent) = traversal::parent(&*host, node, selector)? {
                out.push(parent);
            }
        }
        Ok(Selection::new(self.page, NodeSet::new(out)))
    }

    /// Ancestor elements of every node, nearest first, concatenated in node
    /// order.
    pub fn parents(&self, selector: Option<&str>) -> Result<Selection<'p, H>> {
        let host = self.page.host();
        let mut out = Vec::new();
        for node in self.nodes.iter() {
            out.extend(traversal::parents(&*host, node, selector)?);
        }
        Ok(Selection::new(self.page, NodeSet::new(out)))
    }

    /// Same as [`Page::ready`]; the selected nodes are not involved.
    pub fn ready<F>(&self, callback: F) -> &Self
    where
        F: FnOnce(&Page<H>) -> Result<()> + 'static,
    {
        self.page.ready(callback);
        self
    }

    /// Listens for `event_type` on every selected node and calls `callback`
    /// with the nearest node between the event target and the listening node
    /// that matches `selector`.
    ///
    /// The listening node itself is never a match candidate, and the walk
    /// stops after the body. A malformed selector fails here, before any
    /// listener is registered.
    pub fn on<F>(&self, event_type: &str, selector: &str, callback: F) -> Result<Delegation<H::Node>>
    where
        F: Fn(&Page<H>, H::Node, &Event<H::Node>) -> Result<()> + 'static,
    {
        delegate::register(self.page, &self.nodes, event_type, selector, callback)
    }
}
