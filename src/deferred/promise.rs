use std::fmt;
use std::ops::{Deref, DerefMut};
use std::rc::Rc;
use super::callback::{Callback, Kind};
use super::channel::Rx;
use super::machine::{Inner, State};

/// Read-only view of a [`Deferred`](super::Deferred). It can observe the
/// settlement but never trigger it.
pub struct Promise<T, S = ()> {
    pub(crate) inner: Rc<Inner<T, S>>,
}

/// Context handed to every callback alongside the payload. Unless a
/// `*_with` operation supplied one, it is the deferred that fired.
pub enum Scope<T, S = ()> {
    Deferred(Promise<T, S>),
    With(S),
}

/// A caller-owned value carrying the observation methods of a promise.
pub struct Promised<O, T, S = ()> {
    target:  O,
    promise: Promise<T, S>,
}

/// Anything that can hand out the promise it observes. Implement it on a
/// host type to make that type observable.
pub trait Thenable<T, S = ()>
where
    T: Clone + 'static,
    S: Clone + 'static,
{
    fn promise(&self) -> Promise<T, S>;

    fn done<F>(&self, f: F)
    where
        F: Fn(&Scope<T, S>, &T) + 'static,
    {
        self.done_all([Callback::new(f)]);
    }

    fn done_all<I: IntoIterator<Item = Callback<T, S>>>(&self, callbacks: I) {
        self.promise().inner.register(Kind::Done, callbacks.into_iter().collect());
    }

    fn fail<F>(&self, f: F)
    where
        F: Fn(&Scope<T, S>, &T) + 'static,
    {
        self.fail_all([Callback::new(f)]);
    }

    fn fail_all<I: IntoIterator<Item = Callback<T, S>>>(&self, callbacks: I) {
        self.promise().inner.register(Kind::Fail, callbacks.into_iter().collect());
    }

    fn always<F>(&self, f: F)
    where
        F: Fn(&Scope<T, S>, &T) + 'static,
    {
        self.always_all([Callback::new(f)]);
    }

    fn always_all<I: IntoIterator<Item = Callback<T, S>>>(&self, callbacks: I) {
        self.promise().inner.register(Kind::Always, callbacks.into_iter().collect());
    }

    fn progress<F>(&self, f: F)
    where
        F: Fn(&Scope<T, S>, &T) + 'static,
    {
        self.progress_all([Callback::new(f)]);
    }

    fn progress_all<I: IntoIterator<Item = Callback<T, S>>>(&self, callbacks: I) {
        self.promise().inner.register(Kind::Progress, callbacks.into_iter().collect());
    }

    /// Chains a new promise whose settlement is the output of the filter
    /// matching this one's event. The firing scope carries over.
    fn then<D, R, P>(&self, done: D, fail: R, progress: P) -> Promise<T, S>
    where
        D: Fn(&Scope<T, S>, &T) -> T + 'static,
        R: Fn(&Scope<T, S>, &T) -> T + 'static,
        P: Fn(&Scope<T, S>, &T) -> T + 'static,
    {
        self.promise().inner.then(done, fail, progress)
    }

    fn state(&self) -> State {
        let promise = self.promise();
        let state = promise.inner.settlement.borrow().state;
        state
    }

    /// A one-shot receiver for the settlement: `Ok` when resolved, `Err`
    /// when rejected.
    fn settled(&self) -> Rx<T> {
        self.promise().inner.settled()
    }
}

impl<T, S> Promise<T, S> {
    pub(crate) fn new(inner: Rc<Inner<T, S>>) -> Self {
        Self { inner }
    }

    /// Whether both views observe the same deferred.
    pub fn same(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T, S> Scope<T, S> {
    pub fn with(&self) -> Option<&S> {
        match self {
            Scope::With(scope) => Some(scope),
            Scope::Deferred(_) => None,
        }
    }

    pub fn deferred(&self) -> Option<&Promise<T, S>> {
        match self {
            Scope::Deferred(promise) => Some(promise),
            Scope::With(_)           => None,
        }
    }
}

impl<O, T, S> Promised<O, T, S> {
    pub(crate) fn new(target: O, promise: Promise<T, S>) -> Self {
        Self { target, promise }
    }

    pub fn into_inner(self) -> O {
        self.target
    }
}

impl<T, S> Thenable<T, S> for Promise<T, S>
where
    T: Clone + 'static,
    S: Clone + 'static,
{
    fn promise(&self) -> Promise<T, S> {
        self.clone()
    }
}

impl<O, T, S> Thenable<T, S> for Promised<O, T, S>
where
    T: Clone + 'static,
    S: Clone + 'static,
{
    fn promise(&self) -> Promise<T, S> {
        self.promise.clone()
    }
}

impl<O, T, S> Deref for Promised<O, T, S> {
    type Target = O;

    fn deref(&self) -> &O {
        &self.target
    }
}

impl<O, T, S> DerefMut for Promised<O, T, S> {
    fn deref_mut(&mut self) -> &mut O {
        &mut self.target
    }
}

impl<T, S> Clone for Promise<T, S> {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone() }
    }
}

impl<T, S: Clone> Clone for Scope<T, S> {
    fn clone(&self) -> Self {
        match self {
            Scope::Deferred(promise) => Scope::Deferred(promise.clone()),
            Scope::With(scope)       => Scope::With(scope.clone()),
        }
    }
}

impl<T, S> fmt::Display for Promise<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[object Promise]")
    }
}

impl<T, S> fmt::Debug for Promise<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.settlement.borrow().state;
        f.debug_struct("Promise").field("state", &state).finish_non_exhaustive()
    }
}

impl<T, S: fmt::Debug> fmt::Debug for Scope<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Deferred(promise) => f.debug_tuple("Deferred").field(promise).finish(),
            Scope::With(scope)       => f.debug_tuple("With").field(scope).finish(),
        }
    }
}

impl<O: fmt::Debug, T, S> fmt::Debug for Promised<O, T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Promised")
            .field("target", &self.target)
            .field("promise", &self.promise)
            .finish()
    }
}
