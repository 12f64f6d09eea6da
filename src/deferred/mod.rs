pub use callback::Callback;
pub use callback::Counts;
pub use channel::Rx;
pub use channel::Settled;
pub use inspect::Inspector;
pub use inspect::Snapshot;
pub use machine::Builder;
pub use machine::Deferred;
pub use machine::State;
pub use promise::Promise;
pub use promise::Promised;
pub use promise::Scope;
pub use promise::Thenable;
pub use scheduler::Handle;
pub use scheduler::Scheduler;
pub use scheduler::Task;
pub use scheduler::Tick;
pub use when::when;
pub use when::Item;
pub use when::Truthy;

mod callback;
mod chain;
mod channel;
mod inspect;
mod machine;
mod promise;
mod scheduler;
mod when;
