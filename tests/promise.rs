use dfd::{Promise, Scheduler, State, Thenable};
use common::Log;
mod common;

#[derive(Debug, PartialEq)]
struct Job {
    name:  String,
    tries: u32,
}

struct Upload {
    promise: Promise<String>,
}

impl Thenable<String> for Upload {
    fn promise(&self) -> Promise<String> {
        self.promise.clone()
    }
}

#[test]
fn promise_onto_keeps_target() {
    common::init();

    let scheduler = Scheduler::new();
    let deferred  = scheduler.deferred::<String, ()>();
    let log       = Log::default();

    let job = Job { name: "sync".to_owned(), tries: 0 };
    let mut job = deferred.promise_onto(job);

    job.tries += 1;
    assert_eq!(job.name, "sync");

    job.done(log.record("done"));
    assert_eq!(job.state(), State::Pending);

    deferred.resolve("ok".to_owned());
    scheduler.run();

    assert_eq!(job.state(), State::Resolved);
    assert_eq!(log.entries(), ["done:ok"]);
    assert_eq!(job.into_inner(), Job { name: "sync".to_owned(), tries: 1 });
}

#[test]
fn host_types_observe_through_thenable() {
    let scheduler = Scheduler::new();
    let deferred  = scheduler.deferred::<String, ()>();
    let log       = Log::default();

    let upload = Upload { promise: deferred.promise() };
    upload.fail(log.record("fail"));
    upload.always(log.record("always"));

    deferred.reject("timeout".to_owned());
    scheduler.run();

    assert_eq!(upload.state(), State::Rejected);
    assert_eq!(log.entries(), ["fail:timeout", "always:timeout"]);
}

#[test]
fn views_share_one_deferred() {
    let scheduler = Scheduler::new();
    let deferred  = scheduler.deferred::<i32, ()>();
    let other     = scheduler.deferred::<i32, ()>();

    let a = deferred.promise();
    let b = a.clone();

    assert!(a.same(&b));
    assert!(a.same(&deferred.promise()));
    assert!(!a.same(&other.promise()));

    deferred.resolve(1);
    assert_eq!(b.state(), State::Resolved);
    assert_eq!(other.state(), State::Pending);
}

#[test]
fn promise_outlives_dropped_owner() {
    let scheduler = Scheduler::new();
    let deferred  = scheduler.deferred::<i32, ()>();
    let promise   = deferred.promise();

    deferred.resolve(2);
    drop(deferred);

    assert_eq!(scheduler.block_on(promise.settled()).unwrap(), Ok(2));
}
