#[cfg(not(feature = "tokio"))]
use crossbeam_channel::{unbounded as channel, Sender, Receiver, TryRecvError};
#[cfg(feature = "tokio")]
use std::{future::Future, pin::Pin, task::{Context, Poll}};
use anyhow::{anyhow, Result};
#[cfg(feature = "tokio")]
use tokio::sync::oneshot::{channel, Sender, Receiver, error::TryRecvError};

/// `Ok` for a resolved payload, `Err` for a rejected one.
pub type Settled<T> = Result<T, T>;

pub struct Tx<T>(Sender<Settled<T>>);
pub struct Rx<T>(Receiver<Settled<T>>);

pub fn oneshot<T>() -> (Tx<T>, Rx<T>) {
    let (tx, rx) = channel();
    (Tx(tx), Rx(rx))
}

impl<T> Tx<T> {
    pub fn send(self, settled: Settled<T>) {
        match self.0.send(settled) {
            Ok(()) => (),
            Err(_) => (),
        }
    }
}

impl<T> Rx<T> {
    /// `Ok(None)` while the promise is pending; an error once it was
    /// dropped without ever settling.
    pub fn try_recv(&mut self) -> Result<Option<Settled<T>>> {
        match self.0.try_recv() {
            Ok(settled)                 => Ok(Some(settled)),
            Err(TryRecvError::Empty)    => Ok(None),
            Err(_)                      => Err(anyhow!("promise dropped")),
        }
    }
}

#[cfg(feature = "tokio")]
impl<T> Future for Rx<T> {
    type Output = Result<Settled<T>>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.0).poll(cx) {
            Poll::Ready(Ok(r))  => Poll::Ready(Ok(r)),
            Poll::Ready(Err(_)) => Poll::Ready(Err(anyhow!("promise dropped"))),
            Poll::Pending       => Poll::Pending,
        }
    }
}
