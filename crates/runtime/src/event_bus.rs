use crate::frame::Frame;

/// A payload stamped with the frame it was emitted in.
#[derive(Debug, Clone, PartialEq)]
pub struct Event<E> {
    pub frame_index: u64,
    pub payload: E,
}

/// Frame-indexed event log.
///
/// Subsystems push typed events while they run; the host drains them once
/// per frame. Nothing is delivered asynchronously.
#[derive(Debug)]
pub struct EventBus<E> {
    events: Vec<Event<E>>,
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self { events: Vec::new() }
    }
}

impl<E> EventBus<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, frame: Frame, payload: E) {
        self.events.push(Event {
            frame_index: frame.index,
            payload,
        });
    }

    pub fn events(&self) -> &[Event<E>] {
        &self.events
    }

    pub fn payloads(&self) -> impl Iterator<Item = &E> {
        self.events.iter().map(|e| &e.payload)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn drain(&mut self) -> Vec<Event<E>> {
        std::mem::take(&mut self.events)
    }
}
