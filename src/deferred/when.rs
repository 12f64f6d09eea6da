use std::cell::RefCell;
use std::rc::Rc;
use serde_json::Value;
use super::machine::Deferred;
use super::promise::{Promise, Thenable};
use super::scheduler::Handle;

/// One input to [`when`]: either something still settling or a plain value
/// that counts as settled already, resolved if truthy and failed if not.
pub enum Item<T, S = ()> {
    Promise(Promise<T, S>),
    Value(T),
}

/// Truthiness of plain values passed to [`when`].
pub trait Truthy {
    fn is_truthy(&self) -> bool;
}

struct Tally<T> {
    resolved: usize,
    handled:  usize,
    data:     Vec<Option<T>>,
}

/// Fans `items` into one promise. It resolves once every item resolved, and
/// rejects once every item reported when the last report is a failure. Both
/// carry the positional payloads. Plain values are counted before returning,
/// so an input without pending promises settles synchronously.
///
/// A falsy plain value counts as reported but never as resolved. If the last
/// item to report is a promise that resolves, the composite stays pending.
pub fn when<T, S, I>(handle: &Handle, items: I) -> Promise<T, S>
where
    T: Truthy + From<Vec<T>> + Clone + 'static,
    S: Clone + 'static,
    I: IntoIterator<Item = Item<T, S>>,
{
    let items = items.into_iter().collect::<Vec<_>>();
    let total = items.len();

    let composite = Deferred::new(handle);
    let tally = Rc::new(RefCell::new(Tally {
        resolved: 0,
        handled:  0,
        data:     (0..total).map(|_| None).collect(),
    }));

    for (index, item) in items.into_iter().enumerate() {
        let promise = match item {
            Item::Promise(promise) => promise,
            Item::Value(value)     => {
                tally.borrow_mut().value(index, value);
                continue;
            }
        };

        let (dfd, state) = (composite.clone(), tally.clone());
        promise.done(move |_, data| {
            let mut tally = state.borrow_mut();
            tally.data[index] = Some(data.clone());
            tally.resolved += 1;
            tally.handled  += 1;

            if tally.resolved == total {
                let data = tally.collect();
                drop(tally);
                dfd.resolve(data);
            }
        });

        let (dfd, state) = (composite.clone(), tally.clone());
        promise.fail(move |_, data| {
            let mut tally = state.borrow_mut();
            tally.data[index] = Some(data.clone());
            tally.handled += 1;

            if tally.handled == total {
                let data = tally.collect();
                drop(tally);
                dfd.reject(data);
            }
        });

        let dfd = composite.clone();
        promise.progress(move |_, data| {
            dfd.notify(data.clone());
        });
    }

    let tally = tally.borrow();
    if tally.resolved == total {
        composite.resolve(tally.collect());
    } else if tally.handled == total {
        composite.reject(tally.collect());
    }

    composite.promise()
}

impl<T: Truthy> Tally<T> {
    fn value(&mut self, index: usize, value: T) {
        if value.is_truthy() {
            self.resolved += 1;
        }
        self.handled += 1;
        self.data[index] = Some(value);
    }
}

impl<T: From<Vec<T>> + Clone> Tally<T> {
    fn collect(&self) -> T {
        T::from(self.data.iter().flatten().cloned().collect())
    }
}

impl<T, S> From<Promise<T, S>> for Item<T, S> {
    fn from(promise: Promise<T, S>) -> Self {
        Item::Promise(promise)
    }
}

impl<S> From<Value> for Item<Value, S> {
    fn from(value: Value) -> Self {
        Item::Value(value)
    }
}

// ECMAScript truthiness.
impl Truthy for Value {
    fn is_truthy(&self) -> bool {
        match self {
            Value::Null      => false,
            Value::Bool(b)   => *b,
            Value::Number(n) => n.as_f64().map_or(false, |n| n != 0.0 && !n.is_nan()),
            Value::String(s) => !s.is_empty(),
            Value::Array(_)  => true,
            Value::Object(_) => true,
        }
    }
}
