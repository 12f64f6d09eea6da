use std::rc::Rc;
use tracing::debug;
use super::callback::Counts;
use super::machine::{Inner, State};
use super::promise::Scope;

/// Open access to a deferred's internals, handed out only for deferreds
/// built with [`Builder::inspectable`](super::Builder::inspectable).
pub struct Inspector<T, S = ()> {
    inner: Rc<Inner<T, S>>,
}

#[derive(Debug)]
pub struct Snapshot<T, S = ()> {
    pub state:     State,
    pub data:      Option<T>,
    pub scope:     Option<Scope<T, S>>,
    pub callbacks: Counts,
}

impl<T: Clone, S: Clone> Inspector<T, S> {
    pub(crate) fn new(inner: Rc<Inner<T, S>>) -> Self {
        Self { inner }
    }

    pub fn snapshot(&self) -> Snapshot<T, S> {
        let settlement = self.inner.settlement.borrow();
        Snapshot {
            state:     settlement.state,
            data:      settlement.data.clone(),
            scope:     settlement.scope.clone(),
            callbacks: settlement.registry.counts(),
        }
    }

    /// Forces the raw state, bypassing monotonicity. Values outside
    /// `0..=2` are ignored. Forcing a terminal state on a deferred that never
    /// received a payload leaves nothing to replay, so later `done`, `fail`
    /// and `always` registrations are dropped.
    pub fn set_state(&self, raw: u8) -> State {
        let state = self.inner.settlement.borrow_mut().set_state(raw);
        debug!("state forced to {state}");
        state
    }

    pub fn set_data(&self, data: T) {
        self.inner.settlement.borrow_mut().data = Some(data);
    }
}
