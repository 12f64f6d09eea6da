use anyhow::{anyhow, Result};
use crossbeam_channel::{unbounded, Receiver, Sender};
use tracing::{debug, trace};
use super::callback::Callback;
use super::channel::{Rx, Settled};
use super::machine::Deferred;
use super::promise::{Promise, Scope};
use super::when::{self, Item, Truthy};

pub type Task = Box<dyn FnOnce()>;

/// Single-threaded FIFO of dispatch tasks. Nothing runs until the owner
/// drives the queue with [`tick`](Scheduler::tick), [`run`](Scheduler::run)
/// or [`block_on`](Scheduler::block_on).
pub struct Scheduler {
    receiver: Receiver<Task>,
    handle:   Handle,
}

#[derive(Clone)]
pub struct Handle {
    sender: Sender<Task>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick {
    Progress,
    Idle,
}

impl Scheduler {
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        let handle = Handle { sender };
        Self { receiver, handle }
    }

    pub fn handle(&self) -> Handle {
        self.handle.clone()
    }

    pub fn deferred<T, S>(&self) -> Deferred<T, S>
    where
        T: Clone + 'static,
        S: Clone + 'static,
    {
        Deferred::new(&self.handle)
    }

    pub fn pending(&self) -> usize {
        self.receiver.len()
    }

    pub fn tick(&self) -> Tick {
        match self.receiver.try_recv() {
            Ok(task) => {
                task();
                Tick::Progress
            }
            Err(_) => Tick::Idle,
        }
    }

    /// Runs tasks until the queue is empty, including any that running
    /// tasks enqueue. Returns the number of tasks run.
    pub fn run(&self) -> usize {
        let mut count = 0;
        while let Tick::Progress = self.tick() {
            count += 1;
        }
        trace!("ran {count} tasks");
        count
    }

    pub fn block_on<T>(&self, mut rx: Rx<T>) -> Result<Settled<T>> {
        loop {
            if let Some(settled) = rx.try_recv()? {
                return Ok(settled);
            }

            if let Tick::Idle = self.tick() {
                return Err(anyhow!("promise never settled"));
            }
        }
    }
}

impl Handle {
    pub fn schedule<F: FnOnce() + 'static>(&self, task: F) -> Result<()> {
        match self.sender.send(Box::new(task)) {
            Ok(()) => Ok(()),
            Err(_) => Err(anyhow!("scheduler terminated")),
        }
    }

    /// Queues one batch: every callback runs in order with the same scope
    /// and payload, on a later turn of the scheduler.
    pub fn dispatch<T, S>(&self, scope: Scope<T, S>, data: T, callbacks: Vec<Callback<T, S>>)
    where
        T: 'static,
        S: 'static,
    {
        let count = callbacks.len();

        let result = self.schedule(move || {
            for callback in &callbacks {
                callback.call(&scope, &data);
            }
        });

        match result {
            Ok(()) => trace!("dispatch of {count} callbacks queued"),
            Err(e) => debug!("dispatch of {count} callbacks dropped: {e}"),
        }
    }

    pub fn deferred<T, S>(&self) -> Deferred<T, S>
    where
        T: Clone + 'static,
        S: Clone + 'static,
    {
        Deferred::new(self)
    }

    pub fn when<T, S, I>(&self, items: I) -> Promise<T, S>
    where
        T: Truthy + From<Vec<T>> + Clone + 'static,
        S: Clone + 'static,
        I: IntoIterator<Item = Item<T, S>>,
    {
        when::when(self, items)
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}
