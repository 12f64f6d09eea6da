use std::fmt;
use std::mem::take;
use std::rc::Rc;
use super::machine::State;
use super::promise::Scope;

/// A registered observer, invoked with the settlement scope and payload.
pub struct Callback<T, S = ()>(Rc<dyn Fn(&Scope<T, S>, &T)>);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Kind {
    Done,
    Fail,
    Always,
    Progress,
}

pub(crate) struct Registry<T, S> {
    done:     Vec<Callback<T, S>>,
    fail:     Vec<Callback<T, S>>,
    always:   Vec<Callback<T, S>>,
    progress: Vec<Callback<T, S>>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Counts {
    pub done:     usize,
    pub fail:     usize,
    pub always:   usize,
    pub progress: usize,
}

impl<T, S> Callback<T, S> {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Scope<T, S>, &T) + 'static,
    {
        Self(Rc::new(f))
    }

    pub(crate) fn call(&self, scope: &Scope<T, S>, data: &T) {
        (self.0)(scope, data)
    }
}

impl Kind {
    // Whether a late registration of this kind replays against `state`.
    pub fn fires_on(self, state: State) -> bool {
        match (self, state) {
            (Kind::Done,   State::Resolved) => true,
            (Kind::Fail,   State::Rejected) => true,
            (Kind::Always, State::Resolved) => true,
            (Kind::Always, State::Rejected) => true,
            _                               => false,
        }
    }
}

impl<T, S> Registry<T, S> {
    pub fn new() -> Self {
        Self {
            done:     Vec::new(),
            fail:     Vec::new(),
            always:   Vec::new(),
            progress: Vec::new(),
        }
    }

    pub fn append(&mut self, kind: Kind, callbacks: Vec<Callback<T, S>>) {
        let list = match kind {
            Kind::Done     => &mut self.done,
            Kind::Fail     => &mut self.fail,
            Kind::Always   => &mut self.always,
            Kind::Progress => &mut self.progress,
        };
        list.extend(callbacks);
    }

    /// Drains the registry for a terminal dispatch: the matching list
    /// followed by `always`. Lists that can no longer fire are dropped.
    pub fn consume(&mut self, state: State) -> Vec<Callback<T, S>> {
        let Self { done, fail, always, progress } = self;

        let (taken, dropped) = match state {
            State::Resolved => (done, fail),
            State::Rejected => (fail, done),
            State::Pending  => return Vec::new(),
        };

        let mut batch = take(taken);
        batch.append(always);

        dropped.clear();
        progress.clear();

        batch
    }

    pub fn progress(&self) -> Vec<Callback<T, S>> {
        self.progress.clone()
    }

    pub fn counts(&self) -> Counts {
        Counts {
            done:     self.done.len(),
            fail:     self.fail.len(),
            always:   self.always.len(),
            progress: self.progress.len(),
        }
    }
}

impl<T, S> Clone for Callback<T, S> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T, S> fmt::Debug for Callback<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callback")
    }
}
