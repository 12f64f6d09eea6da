use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use tracing::trace;
use super::callback::{Callback, Kind, Registry};
use super::channel::{oneshot, Rx};
use super::inspect::Inspector;
use super::promise::{Promise, Promised, Scope, Thenable};
use super::scheduler::Handle;
use super::when::{when, Item, Truthy};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum State {
    Pending,
    Resolved,
    Rejected,
}

/// The producer side: the only handle that can settle.
pub struct Deferred<T, S = ()> {
    inner: Rc<Inner<T, S>>,
}

pub struct Builder<T, S = ()> {
    handle:      Handle,
    init:        Option<Box<dyn FnOnce(&Deferred<T, S>)>>,
    inspectable: bool,
}

pub(crate) struct Inner<T, S> {
    pub handle:      Handle,
    pub inspectable: bool,
    pub settlement:  RefCell<Settlement<T, S>>,
}

pub(crate) struct Settlement<T, S> {
    pub state:    State,
    pub scope:    Option<Scope<T, S>>,
    pub data:     Option<T>,
    pub registry: Registry<T, S>,
}

impl<T, S> Deferred<T, S>
where
    T: Clone + 'static,
    S: Clone + 'static,
{
    pub fn new(handle: &Handle) -> Self {
        Self::builder(handle).build()
    }

    /// Runs `init` against the new deferred before it is returned.
    pub fn with_init<F>(handle: &Handle, init: F) -> Self
    where
        F: FnOnce(&Self) + 'static,
    {
        Self::builder(handle).init(init).build()
    }

    pub fn builder(handle: &Handle) -> Builder<T, S> {
        Builder {
            handle:      handle.clone(),
            init:        None,
            inspectable: false,
        }
    }

    pub fn resolve(&self, data: T) {
        self.inner.settle(State::Resolved, None, data);
    }

    pub fn resolve_with(&self, scope: S, data: T) {
        self.inner.settle(State::Resolved, Some(Scope::With(scope)), data);
    }

    pub fn reject(&self, data: T) {
        self.inner.settle(State::Rejected, None, data);
    }

    pub fn reject_with(&self, scope: S, data: T) {
        self.inner.settle(State::Rejected, Some(Scope::With(scope)), data);
    }

    pub fn notify(&self, data: T) {
        self.inner.notify(None, data);
    }

    pub fn notify_with(&self, scope: S, data: T) {
        self.inner.notify(Some(Scope::With(scope)), data);
    }

    pub fn when<I>(&self, items: I) -> Promise<T, S>
    where
        T: Truthy + From<Vec<T>>,
        I: IntoIterator<Item = Item<T, S>>,
    {
        when(&self.inner.handle, items)
    }

    /// Attaches the observation methods to `target` instead of returning
    /// a fresh view.
    pub fn promise_onto<O>(&self, target: O) -> Promised<O, T, S> {
        Promised::new(target, self.promise())
    }

    /// Returns `None` unless built with [`Builder::inspectable`].
    pub fn inspector(&self) -> Option<Inspector<T, S>> {
        match self.inner.inspectable {
            true  => Some(Inspector::new(self.inner.clone())),
            false => None,
        }
    }

    pub fn handle(&self) -> &Handle {
        &self.inner.handle
    }

    pub(crate) fn settle_in(&self, state: State, scope: Scope<T, S>, data: T) {
        match state {
            State::Pending => self.inner.notify(Some(scope), data),
            state          => self.inner.settle(state, Some(scope), data),
        }
    }
}

impl<T, S> Builder<T, S>
where
    T: Clone + 'static,
    S: Clone + 'static,
{
    pub fn init<F>(mut self, init: F) -> Self
    where
        F: FnOnce(&Deferred<T, S>) + 'static,
    {
        self.init = Some(Box::new(init));
        self
    }

    /// Leaves the internals reachable through [`Deferred::inspector`].
    pub fn inspectable(mut self) -> Self {
        self.inspectable = true;
        self
    }

    pub fn build(self) -> Deferred<T, S> {
        let Self { handle, init, inspectable } = self;

        let settlement = Settlement {
            state:    State::Pending,
            scope:    None,
            data:     None,
            registry: Registry::new(),
        };

        let deferred = Deferred {
            inner: Rc::new(Inner {
                handle:      handle,
                inspectable: inspectable,
                settlement:  RefCell::new(settlement),
            }),
        };

        if let Some(init) = init {
            init(&deferred);
        }

        deferred
    }
}

impl<T, S> Inner<T, S>
where
    T: Clone + 'static,
    S: Clone + 'static,
{
    pub fn settle(self: &Rc<Self>, state: State, scope: Option<Scope<T, S>>, data: T) {
        let (scope, callbacks) = {
            let mut settlement = self.settlement.borrow_mut();
            if settlement.state != State::Pending {
                return;
            }

            if let Some(scope) = scope {
                settlement.scope = Some(scope);
            }
            settlement.data = Some(data.clone());
            settlement.state = state;

            let callbacks = settlement.registry.consume(state);
            (settlement.scope.clone(), callbacks)
        };

        trace!("{state}, dispatching {} callbacks", callbacks.len());

        self.dispatch(scope, data, callbacks);
    }

    pub fn notify(self: &Rc<Self>, scope: Option<Scope<T, S>>, data: T) {
        let (scope, callbacks) = {
            let mut settlement = self.settlement.borrow_mut();
            if settlement.state != State::Pending {
                return;
            }

            // The firing deferred of a chain is passed to this batch only;
            // storing it would keep a pending parent and child alive.
            let scope = match scope {
                Some(Scope::With(scope)) => {
                    settlement.scope = Some(Scope::With(scope));
                    settlement.scope.clone()
                }
                Some(scope) => Some(scope),
                None        => settlement.scope.clone(),
            };
            settlement.data = Some(data.clone());

            (scope, settlement.registry.progress())
        };

        self.dispatch(scope, data, callbacks);
    }

    pub fn register(self: &Rc<Self>, kind: Kind, callbacks: Vec<Callback<T, S>>) {
        if callbacks.is_empty() {
            return;
        }

        let (scope, data) = {
            let mut settlement = self.settlement.borrow_mut();
            if settlement.state == State::Pending {
                settlement.registry.append(kind, callbacks);
                return;
            }

            if !kind.fires_on(settlement.state) {
                return;
            }

            match settlement.data.clone() {
                Some(data) => (settlement.scope.clone(), data),
                None       => return,
            }
        };

        self.dispatch(scope, data, callbacks);
    }

    pub fn settled(self: &Rc<Self>) -> Rx<T> {
        let (tx, rx) = oneshot();
        let tx = Rc::new(RefCell::new(Some(tx)));
        let rejected = tx.clone();

        self.register(Kind::Done, vec![Callback::new(move |_, data: &T| {
            if let Some(tx) = tx.borrow_mut().take() {
                tx.send(Ok(data.clone()));
            }
        })]);

        self.register(Kind::Fail, vec![Callback::new(move |_, data: &T| {
            if let Some(tx) = rejected.borrow_mut().take() {
                tx.send(Err(data.clone()));
            }
        })]);

        rx
    }

    // An unbound scope means the deferred itself.
    fn dispatch(self: &Rc<Self>, scope: Option<Scope<T, S>>, data: T, callbacks: Vec<Callback<T, S>>) {
        let scope = match scope {
            Some(scope) => scope,
            None        => Scope::Deferred(Promise::new(self.clone())),
        };
        self.handle.dispatch(scope, data, callbacks);
    }
}

impl<T, S> Settlement<T, S> {
    /// Accepts only the raw values of the three states; anything else is
    /// ignored and the current state returned.
    pub fn set_state(&mut self, raw: u8) -> State {
        if let Ok(state) = State::try_from(raw) {
            self.state = state;
        }
        self.state
    }
}

impl<T, S> Thenable<T, S> for Deferred<T, S>
where
    T: Clone + 'static,
    S: Clone + 'static,
{
    fn promise(&self) -> Promise<T, S> {
        Promise::new(self.inner.clone())
    }
}

impl TryFrom<u8> for State {
    type Error = u8;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(State::Pending),
            1 => Ok(State::Resolved),
            2 => Ok(State::Rejected),
            n => Err(n),
        }
    }
}

impl From<State> for u8 {
    fn from(state: State) -> Self {
        match state {
            State::Pending  => 0,
            State::Resolved => 1,
            State::Rejected => 2,
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            State::Pending  => f.write_str("pending"),
            State::Resolved => f.write_str("resolved"),
            State::Rejected => f.write_str("rejected"),
        }
    }
}

impl<T, S> Clone for Deferred<T, S> {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone() }
    }
}

impl<T, S> fmt::Display for Deferred<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[object Deferred]")
    }
}

impl<T, S> fmt::Debug for Deferred<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.settlement.borrow().state;
        f.debug_struct("Deferred").field("state", &state).finish_non_exhaustive()
    }
}
