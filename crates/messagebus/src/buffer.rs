//! Per-session event buffers.

use std::collections::VecDeque;

/// Accumulates events produced while handling one message.
///
/// Reading is destructive: [`EventBuffer::get_events`] removes every event it
/// yields, so each buffered event reaches the dispatcher exactly once.
#[derive(Debug)]
pub struct EventBuffer<E> {
    events: VecDeque<E>,
}

impl<E> EventBuffer<E> {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self {
            events: VecDeque::new(),
        }
    }

    /// Appends one event.
    pub fn add_event(&mut self, event: E) {
        self.events.push_back(event);
    }

    /// Appends every event of the iterator, preserving order.
    pub fn extend(&mut self, events: impl IntoIterator<Item = E>) {
        self.events.extend(events);
    }

    /// Drains all buffered events in insertion order.
    pub fn get_events(&mut self) -> impl Iterator<Item = E> + '_ {
        self.events.drain(..)
    }

    /// Returns the buffered events without consuming them.
    pub fn peek(&self) -> impl Iterator<Item = &E> {
        self.events.iter()
    }

    /// Returns the number of buffered events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns true if nothing is buffered.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Discards every buffered event.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl<E> Default for EventBuffer<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// The pair of buffers handed to every handler invocation.
///
/// `domain` receives facts produced by aggregates; `infra` receives
/// notifications produced by the use-case layer for outside consumers.
#[derive(Debug)]
pub struct EventBuffers<E> {
    pub domain: EventBuffer<E>,
    pub infra: EventBuffer<E>,
}

impl<E> EventBuffers<E> {
    /// Creates a fresh, empty pair.
    pub fn new() -> Self {
        Self {
            domain: EventBuffer::new(),
            infra: EventBuffer::new(),
        }
    }

    /// Drains the domain buffer, then the infra buffer.
    pub fn drain_all(&mut self) -> Vec<E> {
        self.domain
            .get_events()
            .chain(self.infra.get_events())
            .collect()
    }

    /// Returns true if both buffers are empty.
    pub fn is_empty(&self) -> bool {
        self.domain.is_empty() && self.infra.is_empty()
    }

    /// Discards the content of both buffers.
    pub fn clear(&mut self) {
        self.domain.clear();
        self.infra.clear();
    }
}

impl<E> Default for EventBuffers<E> {
    fn default() -> Self {
        Self::new()
    }
}
