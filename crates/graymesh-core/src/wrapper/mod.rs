//! Wrappers carrying a [`TrafficTag`] snapshot across execution-unit handoffs.
//!
//! A handoff moves a pending computation from the worker that created it to
//! the worker that runs it. The wrappers here capture the ambient tag at
//! wrap time and install it around the body's execution on the receiving
//! worker, restoring the worker's prior slot value on every exit path —
//! success, panic, or cancellation after install. The wrapper never
//! swallows a failure raised by the body.
//!
//! Re-wrapping is harmless: install/restore pairs nest LIFO and compose to
//! the identity, and a nested handoff created inside a wrapped body
//! captures the innermost ambient tag at its own wrap time.
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use graymesh_model::TrafficTag;

use crate::context::{self, TagScope};

/// One unit of work (fire-and-forget or value-returning) bound to a tag
/// snapshot taken at wrap time.
pub struct TaggedWork<F> {
    body: F,
    tag: Option<TrafficTag>,
    cannot_transmit: bool,
}

impl<F, R> TaggedWork<F>
where
    F: FnOnce() -> R,
{
    /// Wrap `body`, capturing the ambient tag of the current worker.
    pub fn capture(body: F) -> Self {
        Self {
            body,
            tag: context::current(),
            cannot_transmit: false,
        }
    }

    /// Wrap `body` with an explicit tag snapshot.
    pub fn with_tag(body: F, tag: TrafficTag) -> Self {
        Self {
            body,
            tag: Some(tag),
            cannot_transmit: false,
        }
    }

    /// Wrap `body` so it runs tag-free regardless of the receiving
    /// worker's slot (the `cannot_transmit` inversion).
    pub fn suppressed(body: F) -> Self {
        Self {
            body,
            tag: None,
            cannot_transmit: true,
        }
    }

    /// Run the body on the current worker under the captured tag.
    ///
    /// The worker's prior slot value is restored when this returns,
    /// whether the body returns normally or panics.
    pub fn run(self) -> R {
        let _scope = enter(&self.tag, self.cannot_transmit);
        (self.body)()
    }
}

/// Future adapter installing the captured tag around every `poll`.
///
/// The body observes the tag on whichever worker polls it; the worker's
/// slot is restored as soon as the poll returns. Dropping the future
/// before its first poll touches no slot at all, and a poll interrupted
/// by cancellation has already restored (install/restore are paired
/// within each poll).
pub struct Tagged<F> {
    inner: Pin<Box<F>>,
    tag: Option<TrafficTag>,
    cannot_transmit: bool,
}

/// Wrap `fut`, capturing the ambient tag of the current worker.
pub fn tagged<F: Future>(fut: F) -> Tagged<F> {
    Tagged {
        inner: Box::pin(fut),
        tag: context::current(),
        cannot_transmit: false,
    }
}

/// Wrap `fut` with an explicit tag snapshot.
pub fn tagged_with<F: Future>(fut: F, tag: TrafficTag) -> Tagged<F> {
    Tagged {
        inner: Box::pin(fut),
        tag: Some(tag),
        cannot_transmit: false,
    }
}

/// Wrap `fut` so it is polled tag-free (the `cannot_transmit` inversion).
pub fn tag_free<F: Future>(fut: F) -> Tagged<F> {
    Tagged {
        inner: Box::pin(fut),
        tag: None,
        cannot_transmit: true,
    }
}

impl<F: Future> Future for Tagged<F> {
    type Output = F::Output;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        // `Tagged` is Unpin: the inner future is boxed.
        let this = self.get_mut();
        let _scope = enter(&this.tag, this.cannot_transmit);
        this.inner.as_mut().poll(cx)
    }
}

/// Install the snapshot (or clear the slot for suppressed units).
///
/// A wrapped unit whose wrap-time ambient was empty still clears the
/// receiving worker's slot, so stray tags from earlier units on a pooled
/// worker never leak into the body.
fn enter(tag: &Option<TrafficTag>, cannot_transmit: bool) -> TagScope {
    if cannot_transmit {
        return context::suppress();
    }
    match tag {
        Some(t) => context::install(t.clone()),
        None => context::suppress(),
    }
}
