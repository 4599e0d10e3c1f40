//! Synchronous and asynchronous event-stream wrappers (§10.4).
//!
//! Both share the same decoding logic in [`crate::codec::decoder`]; the only
//! difference is how the underlying lines are obtained. [`ToonEventIter`]
//! wraps an already-known line sequence. [`ToonEventStream`] instead wraps
//! any `futures_core::Stream<Item = String>`, pulling lines from it (and
//! genuinely suspending while the caller is pending) before decoding the
//! accumulated input in one pass.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;

use crate::codec::decoder::decode_events;
use crate::codec::event::ToonEvent;
use crate::codec::options::StreamDecodeOptions;
use crate::Result;

/// A pull-based iterator over the events decoded from a known, finite
/// sequence of lines. Returned by [`crate::codec::decode_stream_sync`].
pub struct ToonEventIter {
    events: std::vec::IntoIter<Result<ToonEvent>>,
}

impl ToonEventIter {
    pub(crate) fn new(events: Vec<Result<ToonEvent>>) -> Self {
        ToonEventIter { events: events.into_iter() }
    }
}

impl Iterator for ToonEventIter {
    type Item = Result<ToonEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        self.events.next()
    }
}

/// An asynchronous event stream driven by an upstream line source.
///
/// `S` must be [`Unpin`]; callers with a `!Unpin` source can box and pin it
/// first (`Box::pin(source)` implements `Stream + Unpin`).
pub struct ToonEventStream<S> {
    inner: Option<S>,
    collected: Vec<String>,
    options: StreamDecodeOptions,
    events: Option<std::vec::IntoIter<Result<ToonEvent>>>,
}

impl<S> ToonEventStream<S> {
    pub(crate) fn new(inner: S, options: StreamDecodeOptions) -> Self {
        ToonEventStream { inner: Some(inner), collected: Vec::new(), options, events: None }
    }
}

impl<S: Stream<Item = String> + Unpin> Stream for ToonEventStream<S> {
    type Item = Result<ToonEvent>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            if let Some(events) = this.events.as_mut() {
                return Poll::Ready(events.next());
            }
            match this.inner.as_mut() {
                Some(inner) => match Pin::new(inner).poll_next(cx) {
                    Poll::Ready(Some(line)) => this.collected.push(line),
                    Poll::Ready(None) => {
                        let refs: Vec<&str> = this.collected.iter().map(String::as_str).collect();
                        let events = decode_events(&refs, &this.options);
                        this.inner = None;
                        this.events = Some(events.into_iter());
                    }
                    Poll::Pending => return Poll::Pending,
                },
                None => unreachable!("inner stream consumed without ever producing an event iterator"),
            }
        }
    }
}
