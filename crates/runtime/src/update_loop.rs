use crate::frame::Frame;

type Handler<C> = Box<dyn FnMut(Frame, &mut C)>;

/// Identifies a registered handler so it can be removed later.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

struct Entry<C> {
    id: HandlerId,
    name: &'static str,
    priority: i32,
    handler: Handler<C>,
}

/// Per-frame model updates (camera-driven uniforms, animated overlays, ...).
///
/// Handlers run in `(priority, registration order)` order, lower priority
/// first. Each receives the frame and a mutable context owned by the caller.
pub struct UpdateLoop<C> {
    next_id: u64,
    entries: Vec<Entry<C>>,
}

impl<C> Default for UpdateLoop<C> {
    fn default() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }
}

impl<C> std::fmt::Debug for UpdateLoop<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<_> = self.entries.iter().map(|e| e.name).collect();
        f.debug_struct("UpdateLoop").field("handlers", &names).finish()
    }
}

impl<C> UpdateLoop<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<F>(&mut self, name: &'static str, handler: F) -> HandlerId
    where
        F: FnMut(Frame, &mut C) + 'static,
    {
        self.add_with_priority(name, 0, handler)
    }

    pub fn add_with_priority<F>(&mut self, name: &'static str, priority: i32, handler: F) -> HandlerId
    where
        F: FnMut(Frame, &mut C) + 'static,
    {
        let id = HandlerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        // Stable insert keeps registration order among equal priorities.
        let at = self.entries.partition_point(|e| e.priority <= priority);
        self.entries.insert(
            at,
            Entry {
                id,
                name,
                priority,
                handler: Box::new(handler),
            },
        );
        id
    }

    pub fn remove(&mut self, id: HandlerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        before != self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn tick(&mut self, frame: Frame, ctx: &mut C) {
        for entry in &mut self.entries {
            tracing::trace!(handler = entry.name, frame = frame.index, "update");
            (entry.handler)(frame, ctx);
        }
    }
}
