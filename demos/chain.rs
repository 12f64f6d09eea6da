use anyhow::Result;
use serde_json::{json, Value};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, registry};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use dfd::{Deferred, Item, Scheduler, Thenable};

fn main() -> Result<()> {
    let mut filter = EnvFilter::from_default_env();
    filter = filter.add_directive(LevelFilter::WARN.into());
    let print = fmt::layer().compact();
    registry().with(filter).with(print).init();

    let scheduler = Scheduler::new();
    let handle    = scheduler.handle();

    let fetch = Deferred::<Value, &str>::with_init(&handle, |dfd| {
        dfd.notify(json!("connecting"));
    });

    fetch.progress(|_, status| println!("progress: {status}"));

    let parsed = fetch.then(
        |scope, body| json!({ "from": scope.with().copied().unwrap_or("?"), "body": body }),
        |_, error| json!({ "error": error }),
        |_, status| status.clone(),
    );

    let all = handle.when(vec![
        Item::Promise(parsed),
        Item::Value(json!("cached")),
    ]);

    all.always(|_, data| println!("when -> {data}"));

    fetch.resolve_with("origin", json!([1, 2, 3]));

    match scheduler.block_on(all.settled())? {
        Ok(data)  => println!("resolved: {data}"),
        Err(data) => println!("rejected: {data}"),
    }

    Ok(())
}
