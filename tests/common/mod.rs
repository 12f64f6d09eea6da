#![allow(dead_code)]

use std::cell::RefCell;
use std::fmt::Display;
use std::rc::Rc;
use dfd::Scope;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, registry};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

pub fn init() {
    let mut filter = EnvFilter::from_default_env();
    filter = filter.add_directive(LevelFilter::WARN.into());
    let print = fmt::layer().compact();
    let _ = registry().with(filter).with(print).try_init();
}

#[derive(Clone, Default)]
pub struct Log(Rc<RefCell<Vec<String>>>);

impl Log {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.borrow_mut().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    pub fn record<T: Display + 'static, S: 'static>(&self, tag: &str) -> impl Fn(&Scope<T, S>, &T) + 'static {
        let log = self.clone();
        let tag = tag.to_owned();
        move |_: &Scope<T, S>, data: &T| log.push(format!("{tag}:{data}"))
    }
}
