use std::rc::Rc;
use super::callback::{Callback, Kind};
use super::machine::{Deferred, Inner, State};
use super::promise::{Promise, Scope, Thenable};

impl<T, S> Inner<T, S>
where
    T: Clone + 'static,
    S: Clone + 'static,
{
    pub fn then<D, R, P>(self: &Rc<Self>, done: D, fail: R, progress: P) -> Promise<T, S>
    where
        D: Fn(&Scope<T, S>, &T) -> T + 'static,
        R: Fn(&Scope<T, S>, &T) -> T + 'static,
        P: Fn(&Scope<T, S>, &T) -> T + 'static,
    {
        let child = Deferred::new(&self.handle);

        self.register(Kind::Done,     vec![filter(&child, State::Resolved, done)]);
        self.register(Kind::Fail,     vec![filter(&child, State::Rejected, fail)]);
        self.register(Kind::Progress, vec![filter(&child, State::Pending,  progress)]);

        child.promise()
    }
}

// Filters run inside the parent's dispatch; a panic unwinds out of the
// scheduler and leaves the child pending.
fn filter<T, S, F>(child: &Deferred<T, S>, state: State, f: F) -> Callback<T, S>
where
    T: Clone + 'static,
    S: Clone + 'static,
    F: Fn(&Scope<T, S>, &T) -> T + 'static,
{
    let child = child.clone();
    Callback::new(move |scope, data| {
        let data = f(scope, data);
        child.settle_in(state, scope.clone(), data);
    })
}
