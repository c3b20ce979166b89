/// Camera input the viewer understands.
/// The host converts device events (keys, mouse, touch) into these deltas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Free-flight movement intent for this frame, each axis in [-1, 1].
    Fly { right: f32, up: f32, forward: f32 },
    /// Free-flight look delta in input units (e.g. pixels of mouse motion).
    Look { yaw: f32, pitch: f32 },
    /// Orbit-camera drag delta around the current focus.
    Orbit { dx: f32, dy: f32 },
    /// Zoom delta; positive moves away from the focus.
    Zoom { delta: f32 },
}

/// A queue of input events.
/// JS writes events into the queue; Rust reads and drains them each frame.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    /// Push a new input event (called from JS via wasm-bindgen).
    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_drain() {
        let mut q = InputQueue::new();
        q.push(InputEvent::Orbit { dx: 10.0, dy: 20.0 });
        q.push(InputEvent::Zoom { delta: -1.0 });
        assert_eq!(q.len(), 2);
        let events = q.drain();
        assert_eq!(events[1], InputEvent::Zoom { delta: -1.0 });
        assert!(q.is_empty());
    }
}
