use super::*;
use std::rc::Rc;
use tracing::{debug, trace};

/// Handle for listeners registered by [`Selection::on`]; pass it to
/// [`Page::off`] to remove them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delegation<N> {
    event_type: String,
    selector: String,
    registrations: Vec<(N, ListenerId)>,
}

impl<N: Copy> Delegation<N> {
    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// Nodes carrying one of this delegation's listeners.
    pub fn roots(&self) -> impl Iterator<Item = N> + '_ {
        self.registrations.iter().map(|(root, _)| *root)
    }

    pub(crate) fn registrations(&self) -> impl Iterator<Item = (N, ListenerId)> + '_ {
        self.registrations.iter().copied()
    }
}

/// Walks from `origin` towards `root` and returns the first node matching
/// `selector`. `root` itself is never tested; the body is the last node tested.
pub(crate) fn delegate_target<H: DomHost>(
    host: &H,
    root: H::Node,
    origin: H::Node,
    selector: &str,
) -> Result<Option<H::Node>> {
    let body = host.body();
    let mut cursor = Some(origin);
    while let Some(node) = cursor {
        if node == root {
            trace!(?root, selector, "delegation reached root");
            return Ok(None);
        }
        if host.matches_selector(node, selector)? {
            trace!(?node, selector, "delegation matched");
            return Ok(Some(node));
        }
        if Some(node) == body {
            trace!(?node, selector, "delegation reached body");
            return Ok(None);
        }
        cursor = host.parent_node(node);
    }
    Ok(None)
}

/// Registers one listener per root. The selector is checked before anything
/// is registered.
pub(crate) fn register<H, F>(
    page: &Page<H>,
    roots: &NodeSet<H::Node>,
    event_type: &str,
    selector: &str,
    callback: F,
) -> Result<Delegation<H::Node>>
where
    H: DomHost,
    F: Fn(&Page<H>, H::Node, &Event<H::Node>) -> Result<()> + 'static,
{
    page.host().validate_selector(selector)?;

    let callback = Rc::new(callback);
    let mut registrations = Vec::with_capacity(roots.len());
    for root in roots.iter() {
        let callback = Rc::clone(&callback);
        let selector = selector.to_string();
        let id = page.listen(root, event_type, move |page, event| {
            let matched = delegate_target(&*page.host(), root, event.target(), &selector)?;
            match matched {
                Some(node) => (*callback)(page, node, event),
                None => Ok(()),
            }
        });
        registrations.push((root, id));
    }

    debug!(
        event_type,
        selector,
        roots = registrations.len(),
        "delegated listener registered"
    );
    Ok(Delegation {
        event_type: event_type.to_string(),
        selector: selector.to_string(),
        registrations,
    })
}
