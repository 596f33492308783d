use super::*;
use std::cell::{Cell, Ref, RefCell, RefMut};
use std::rc::Rc;
use tracing::debug;

const DISPATCH_RED_ZONE: usize = 64 * 1024;
const DISPATCH_STACK_SIZE: usize = 32 * 1024 * 1024;

type Listener<H> = Rc<dyn Fn(&Page<H>, &Event<<H as DomHost>::Node>) -> Result<()>>;
type Task<H> = Box<dyn FnOnce(&Page<H>) -> Result<()>>;

/// An event travelling along its propagation path.
pub struct Event<N> {
    event_type: String,
    target: N,
    current_target: Cell<N>,
    propagation_stopped: Cell<bool>,
}

impl<N: Copy + fmt::Debug> fmt::Debug for Event<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("event_type", &self.event_type)
            .field("target", &self.target)
            .field("current_target", &self.current_target.get())
            .field("propagation_stopped", &self.propagation_stopped.get())
            .finish()
    }
}

impl<N: Copy> Event<N> {
    fn new(event_type: &str, target: N) -> Self {
        Self {
            event_type: event_type.to_string(),
            target,
            current_target: Cell::new(target),
            propagation_stopped: Cell::new(false),
        }
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// The node the event was fired at.
    pub fn target(&self) -> N {
        self.target
    }

    /// The node whose listeners are currently running.
    pub fn current_target(&self) -> N {
        self.current_target.get()
    }

    /// Listeners on the current node still run; later nodes are skipped.
    pub fn stop_propagation(&self) {
        self.propagation_stopped.set(true);
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped.get()
    }
}

/// Entry point of the library: owns a DOM host plus the callbacks registered
/// against it.
///
/// The host is only borrowed for the length of a single host call, so
/// callbacks receive `&Page` and may select, mutate and dispatch freely.
pub struct Page<H: DomHost> {
    host: RefCell<H>,
    class_strategy: ClassStrategy,
    listeners: RefCell<HashMap<ListenerId, Listener<H>>>,
    next_listener_id: Cell<u64>,
    ready_waiters: RefCell<Vec<Task<H>>>,
    tasks: RefCell<VecDeque<Task<H>>>,
}

impl<H: DomHost> Page<H> {
    pub fn new(host: H) -> Self {
        let strategy = ClassStrategy::detect(&host);
        Self::with_class_strategy(host, strategy)
    }

    /// Skips class list detection and always uses `class_strategy`.
    pub fn with_class_strategy(host: H, class_strategy: ClassStrategy) -> Self {
        debug!(?class_strategy, "page created");
        Self {
            host: RefCell::new(host),
            class_strategy,
            listeners: RefCell::new(HashMap::new()),
            next_listener_id: Cell::new(1),
            ready_waiters: RefCell::new(Vec::new()),
            tasks: RefCell::new(VecDeque::new()),
        }
    }

    pub fn class_strategy(&self) -> ClassStrategy {
        self.class_strategy
    }

    /// Shared access to the host.
    ///
    /// # Panics
    ///
    /// Panics when a [`Page::host_mut`] guard is still alive.
    pub fn host(&self) -> Ref<'_, H> {
        self.host.borrow()
    }

    /// Exclusive access to the host. Drop the guard before calling back into
    /// the page.
    pub fn host_mut(&self) -> RefMut<'_, H> {
        self.host.borrow_mut()
    }

    pub fn into_host(self) -> H {
        self.host.into_inner()
    }

    /// Wraps `target` into a [`Selection`]. Selector targets are resolved
    /// once, in document order; an empty selector selects nothing.
    pub fn select<'a>(&self, target: impl Into<Target<'a, H::Node>>) -> Result<Selection<'_, H>> {
        let nodes = {
            let host = self.host();
            match target.into() {
                Target::Document => vec![host.document()],
                Target::Window => vec![host.window()],
                Target::Selector(selector) if selector.trim().is_empty() => Vec::new(),
                Target::Selector(selector) => host.query_selector_all(selector)?,
                Target::Node(node) => vec![node],
                Target::Nodes(nodes) => nodes,
            }
        };
        Ok(Selection::new(self, NodeSet::new(nodes)))
    }

    /// Registers a plain listener for `event_type` on `node`.
    pub fn listen<F>(&self, node: H::Node, event_type: &str, listener: F) -> ListenerId
    where
        F: Fn(&Page<H>, &Event<H::Node>) -> Result<()> + 'static,
    {
        let id = ListenerId(self.next_listener_id.get());
        self.next_listener_id.set(id.0 + 1);
        self.listeners.borrow_mut().insert(id, Rc::new(listener));
        self.host_mut().add_event_listener(node, event_type, id);
        id
    }

    /// Returns `false` when `listener` was not registered on `node`.
    pub fn remove_listener(&self, node: H::Node, event_type: &str, listener: ListenerId) -> bool {
        let removed = self
            .host_mut()
            .remove_event_listener(node, event_type, listener);
        if removed {
            self.listeners.borrow_mut().remove(&listener);
        }
        removed
    }

    /// Removes every registration of `delegation`, returning how many were
    /// still active.
    pub fn off(&self, delegation: &Delegation<H::Node>) -> usize {
        let mut removed = 0usize;
        for (root, id) in delegation.registrations() {
            if self.remove_listener(root, delegation.event_type(), id) {
                removed += 1;
            }
        }
        debug!(
            event_type = delegation.event_type(),
            selector = delegation.selector(),
            removed,
            "delegation removed"
        );
        removed
    }

    /// Fires `event_type` at `target` and lets it bubble. The first listener
    /// error aborts the dispatch and is returned.
    pub fn dispatch(&self, target: H::Node, event_type: &str) -> Result<Event<H::Node>> {
        stacker::maybe_grow(DISPATCH_RED_ZONE, DISPATCH_STACK_SIZE, || {
            self.dispatch_inner(target, event_type)
        })
    }

    fn dispatch_inner(&self, target: H::Node, event_type: &str) -> Result<Event<H::Node>> {
        let event = Event::new(event_type, target);
        let path = self.host().propagation_path(target);
        for node in path {
            event.current_target.set(node);
            let ids = self.host().event_listeners(node, event_type);
            for id in ids {
                // A listener removed by an earlier one in this dispatch is skipped.
                let listener = self.listeners.borrow().get(&id).cloned();
                if let Some(listener) = listener {
                    (*listener)(self, &event)?;
                }
            }
            if event.is_propagation_stopped() {
                debug!(event_type, ?target, stopped_at = ?node, "event propagation stopped");
                return Ok(event);
            }
        }
        debug!(event_type, ?target, "event dispatched");
        Ok(event)
    }

    /// Runs `callback` once the document is `interactive` or `complete`.
    ///
    /// The callback never runs synchronously: it is queued and executed by
    /// [`Page::run_pending`]. Registering after the document is already ready
    /// queues it immediately.
    pub fn ready<F>(&self, callback: F)
    where
        F: FnOnce(&Page<H>) -> Result<()> + 'static,
    {
        if self.host().ready_state().is_ready() {
            self.tasks.borrow_mut().push_back(Box::new(callback));
        } else {
            self.ready_waiters.borrow_mut().push(Box::new(callback));
        }
    }

    /// Moves waiting `ready` callbacks to the task queue if the host has
    /// become ready. Call after changing the host's ready state directly.
    pub fn notify_ready_state(&self) {
        let state = self.host().ready_state();
        if !state.is_ready() {
            return;
        }
        let waiters = std::mem::take(&mut *self.ready_waiters.borrow_mut());
        if waiters.is_empty() {
            return;
        }
        debug!(
            ready_state = state.as_str(),
            count = waiters.len(),
            "ready callbacks queued"
        );
        self.tasks.borrow_mut().extend(waiters);
    }

    /// Number of queued callbacks that have not run yet.
    pub fn pending_tasks(&self) -> usize {
        self.tasks.borrow().len()
    }

    /// Drains the task queue, including tasks queued while draining.
    /// Returns how many ran. On error the remaining tasks stay queued.
    pub fn run_pending(&self) -> Result<usize> {
        self.notify_ready_state();
        let mut ran = 0usize;
        loop {
            let task = self.tasks.borrow_mut().pop_front();
            let Some(task) = task else {
                break;
            };
            task(self)?;
            ran += 1;
            self.notify_ready_state();
        }
        Ok(ran)
    }
}

impl Page<Dom> {
    pub fn from_html(html: &str) -> Result<Self> {
        Ok(Self::new(Dom::from_html(html)?))
    }

    /// Advances the document's ready state and queues `ready` callbacks
    /// that were waiting for it.
    pub fn set_ready_state(&self, state: ReadyState) {
        self.host_mut().set_ready_state(state);
        self.notify_ready_state();
    }

    /// Fires `event_type` at the first element matching `selector`.
    pub fn trigger(&self, selector: &str, event_type: &str) -> Result<Event<NodeId>> {
        let target = self
            .host()
            .query_selector(selector)?
            .ok_or_else(|| Error::SelectorNotFound(selector.to_string()))?;
        self.dispatch(target, event_type)
    }

    pub fn click(&self, selector: &str) -> Result<Event<NodeId>> {
        self.trigger(selector, "click")
    }
}
