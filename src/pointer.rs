//! Click-versus-drag detection for container pointer events.

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerState {
    Idle,
    Pressed { x: f64, y: f64 },
    Dragging,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    Click,
    Drag,
}

/// A press becomes a drag once the pointer travels further than
/// `threshold` pixels from where it went down.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerTracker {
    state: PointerState,
    threshold: f64,
}

impl PointerTracker {
    pub fn new(threshold: f64) -> Self {
        Self {
            state: PointerState::Idle,
            threshold: threshold.max(0.0),
        }
    }

    pub fn state(&self) -> PointerState {
        self.state
    }

    fn beyond_threshold(&self, from: (f64, f64), to: (f64, f64)) -> bool {
        (to.0 - from.0).hypot(to.1 - from.1) > self.threshold
    }

    pub fn press(&mut self, x: f64, y: f64) {
        self.state = PointerState::Pressed { x, y };
    }

    pub fn move_to(&mut self, x: f64, y: f64) {
        if let PointerState::Pressed { x: x0, y: y0 } = self.state {
            if self.beyond_threshold((x0, y0), (x, y)) {
                self.state = PointerState::Dragging;
            }
        }
    }

    /// Ends the gesture; `None` when no press was seen.
    pub fn release(&mut self, x: f64, y: f64) -> Option<Gesture> {
        let gesture = match self.state {
            PointerState::Idle => None,
            PointerState::Pressed { x: x0, y: y0 } => {
                if self.beyond_threshold((x0, y0), (x, y)) {
                    Some(Gesture::Drag)
                } else {
                    Some(Gesture::Click)
                }
            }
            PointerState::Dragging => Some(Gesture::Drag),
        };
        self.state = PointerState::Idle;
        gesture
    }
}
