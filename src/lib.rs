//! Deferreds and the promises that observe them.
//!
//! A [`Deferred`] is settled once, resolved or rejected, by whoever owns it.
//! Its [`Promise`] can be handed to anyone: it registers observers but
//! cannot settle. Observers never run inside the call that triggered them;
//! they are queued on a [`Scheduler`] and run when its owner drives it.
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use dfd::{Scheduler, Thenable};
//!
//! let scheduler = Scheduler::new();
//! let deferred  = scheduler.deferred::<i64, ()>();
//!
//! let seen = Rc::new(Cell::new(0));
//! let sink = seen.clone();
//! deferred.promise().done(move |_, n| sink.set(*n));
//!
//! deferred.resolve(5);
//! assert_eq!(seen.get(), 0);
//!
//! scheduler.run();
//! assert_eq!(seen.get(), 5);
//! ```

pub use deferred::*;

pub mod deferred;
