use serde_json::{json, Value};
use dfd::{when, Deferred, Item, Scheduler, State, Thenable, Truthy};
use common::Log;
mod common;

#[derive(Clone, Debug, PartialEq)]
enum Flag {
    On,
    Off,
    All(Vec<Flag>),
}

impl Truthy for Flag {
    fn is_truthy(&self) -> bool {
        !matches!(self, Flag::Off)
    }
}

impl From<Vec<Flag>> for Flag {
    fn from(flags: Vec<Flag>) -> Self {
        Flag::All(flags)
    }
}

#[test]
fn empty_resolves_synchronously() {
    common::init();

    let scheduler = Scheduler::new();
    let composite = scheduler.handle().when(Vec::<Item<Value>>::new());

    assert_eq!(composite.state(), State::Resolved);
    assert_eq!(scheduler.block_on(composite.settled()).unwrap(), Ok(json!([])));
}

#[test]
fn falsy_value_rejects_synchronously() {
    let scheduler = Scheduler::new();
    let items     = vec![Item::from(json!(true)), Item::from(json!(false))];
    let composite = when::<_, (), _>(&scheduler.handle(), items);

    assert_eq!(composite.state(), State::Rejected);
    assert_eq!(scheduler.block_on(composite.settled()).unwrap(), Err(json!([true, false])));
}

#[test]
fn rejects_only_after_every_item_reports() {
    let scheduler = Scheduler::new();
    let p1        = scheduler.deferred::<Value, ()>();
    let p2        = scheduler.deferred::<Value, ()>();

    let composite = p1.when([p1.promise().into(), p2.promise().into()]);

    p1.resolve(json!(1));
    scheduler.run();
    assert_eq!(composite.state(), State::Pending);

    p2.reject(json!("e"));
    scheduler.run();
    assert_eq!(composite.state(), State::Rejected);

    assert_eq!(scheduler.block_on(composite.settled()).unwrap(), Err(json!([1, "e"])));
}

#[test]
fn resolve_after_failure_never_completes() {
    let scheduler = Scheduler::new();
    let p1        = scheduler.deferred::<Value, ()>();
    let p2        = scheduler.deferred::<Value, ()>();

    let composite = scheduler.handle().when(vec![p1.promise().into(), p2.promise().into()]);

    p1.reject(json!("first"));
    scheduler.run();
    assert_eq!(composite.state(), State::Pending);

    p2.resolve(json!("second"));
    scheduler.run();
    assert_eq!(composite.state(), State::Pending);

    let error = scheduler.block_on(composite.settled()).unwrap_err();
    assert_eq!(error.to_string(), "promise never settled");
}

#[test]
fn falsy_value_never_resolves() {
    let scheduler = Scheduler::new();
    let pending   = scheduler.deferred::<Value, ()>();

    let composite = scheduler.handle().when(vec![
        Item::Value(json!(0)),
        pending.promise().into(),
    ]);

    pending.resolve(json!(1));
    scheduler.run();

    assert_eq!(pending.state(), State::Resolved);
    assert_eq!(composite.state(), State::Pending);
}

#[test]
fn resolves_with_positional_payloads() {
    let scheduler = Scheduler::new();
    let p1        = scheduler.deferred::<Value, ()>();
    let p2        = scheduler.deferred::<Value, ()>();

    let composite = scheduler.handle().when(vec![
        p1.promise().into(),
        Item::Value(json!("plain")),
        p2.promise().into(),
    ]);

    p2.resolve(json!(2));
    p1.resolve(json!(1));

    assert_eq!(scheduler.block_on(composite.settled()).unwrap(), Ok(json!([1, "plain", 2])));
}

#[test]
fn progress_passes_through() {
    let scheduler = Scheduler::new();
    let p1        = scheduler.deferred::<Value, ()>();
    let p2        = scheduler.deferred::<Value, ()>();
    let log       = Log::default();

    let composite = scheduler.handle().when(vec![p1.promise().into(), p2.promise().into()]);
    composite.progress(log.record("progress"));

    p1.notify(json!(10));
    p2.notify(json!("half"));
    scheduler.run();

    assert_eq!(log.entries(), ["progress:10", r#"progress:"half""#]);
}

#[test]
fn custom_payloads() {
    let scheduler = Scheduler::new();
    let pending   = Deferred::<Flag>::new(&scheduler.handle());

    let composite = scheduler.handle().when(vec![
        Item::Value(Flag::On),
        Item::Promise(pending.promise()),
    ]);

    pending.resolve(Flag::On);
    let settled = scheduler.block_on(composite.settled()).unwrap();
    assert_eq!(settled, Ok(Flag::All(vec![Flag::On, Flag::On])));

    let composite = scheduler.handle().when(vec![Item::<Flag>::Value(Flag::Off)]);
    assert_eq!(composite.state(), State::Rejected);
}

#[test]
fn json_truthiness() {
    for value in [json!(null), json!(false), json!(0), json!(0.0), json!("")] {
        assert!(!value.is_truthy(), "{value}");
    }
    for value in [json!(true), json!(-1), json!(0.5), json!("0"), json!([]), json!({})] {
        assert!(value.is_truthy(), "{value}");
    }
}
