use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::state::{PointerId, TouchPhase, TouchSample};
use crate::geometry::{AffineTransform, Point};

/// Configuration for gesture recognition
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureConfig {
    /// Displacement in input pixels before a single touch becomes a drag
    pub drag_slop_px: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self { drag_slop_px: 8.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GesturePhase {
    Start,
    Move,
    Stop,
}

/// Positions of the two pinching fingers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PinchPointers {
    /// Input (parent) space positions
    pub parent: [Point; 2],
    /// The same positions mapped into canvas space with the transform current
    /// at emission
    pub canvas: [Point; 2],
}

/// Semantic gesture events. Drag and tap points are in canvas-local space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GestureEvent {
    GestureStart,
    Drag {
        phase: GesturePhase,
        point: Point,
        timestamp_ms: u64,
    },
    Pinch {
        phase: GesturePhase,
        pointers: PinchPointers,
    },
    Tap {
        point: Point,
        timestamp_ms: u64,
    },
    GestureStop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RecognizerState {
    #[default]
    Idle,
    Drag,
    Pinch,
}

/// Turns raw multi-pointer samples into drag, pinch and tap events.
///
/// At most one of the drag or pinch streams is open at a time, and every
/// `GestureStart` is matched by exactly one `GestureStop`. Samples that do not
/// fit the current gesture are dropped without error.
#[derive(Debug)]
pub struct GestureRecognizer {
    config: GestureConfig,
    state: RecognizerState,
    /// A `Down` has been seen and its `Up`/`Cancel` has not
    active: bool,
    /// Live pointers in arrival order
    pointers: Vec<(PointerId, Point)>,
    /// Input-space anchor the slop check measures from
    start_point: Point,
    /// Canvas-space position of the last drag event
    last_drag_point: Point,
    could_be_tap: bool,
    max_pointers: usize,
    /// Canvas-to-parent transform, updated as pinches change it
    canvas_transform: AffineTransform,
    /// Parent-to-canvas mapping captured at gesture start for drags and taps
    gesture_mapping: AffineTransform,
    pinch_pair: [PointerId; 2],
}

impl Default for GestureRecognizer {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}

impl GestureRecognizer {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            state: RecognizerState::Idle,
            active: false,
            pointers: Vec::new(),
            start_point: Point::ZERO,
            last_drag_point: Point::ZERO,
            could_be_tap: false,
            max_pointers: 0,
            canvas_transform: AffineTransform::IDENTITY,
            gesture_mapping: AffineTransform::IDENTITY,
            pinch_pair: [0, 0],
        }
    }

    pub fn state(&self) -> RecognizerState {
        self.state
    }

    pub fn is_gesture_active(&self) -> bool {
        self.active
    }

    pub fn active_pointer_count(&self) -> usize {
        self.pointers.len()
    }

    pub fn canvas_transform(&self) -> AffineTransform {
        self.canvas_transform
    }

    /// Sets the canvas-to-parent transform. Drags already in progress keep the
    /// mapping captured when they started.
    pub fn set_canvas_transform(&mut self, transform: AffineTransform) {
        self.canvas_transform = transform;
    }

    /// Drops any gesture in progress without emitting events
    pub fn reset(&mut self) {
        self.state = RecognizerState::Idle;
        self.active = false;
        self.pointers.clear();
        self.could_be_tap = false;
        self.max_pointers = 0;
    }

    /// Feed one sample and collect the events it produces, in order
    pub fn handle(&mut self, sample: &TouchSample) -> Vec<GestureEvent> {
        let mut events = Vec::new();
        match sample.phase {
            TouchPhase::Down => self.on_down(sample, &mut events),
            TouchPhase::PointerDown => self.on_pointer_down(sample, &mut events),
            TouchPhase::Move => self.on_move(sample, &mut events),
            TouchPhase::PointerUp => self.on_pointer_up(sample, &mut events),
            TouchPhase::Up | TouchPhase::Cancel => self.on_up(sample, &mut events),
        }
        events
    }

    fn on_down(&mut self, sample: &TouchSample, events: &mut Vec<GestureEvent>) {
        if self.active {
            warn!("Down while a gesture is active; closing the previous gesture");
            let last = self.pointer_position(sample.pointer_id).unwrap_or(sample.position);
            self.finish(last, sample.timestamp_ms, false, events);
        }

        self.gesture_mapping = self.inverse_transform();
        self.pointers.clear();
        self.pointers.push((sample.pointer_id, sample.position));
        self.state = RecognizerState::Idle;
        self.active = true;
        self.could_be_tap = true;
        self.max_pointers = 1;
        self.start_point = sample.position;
        debug!("Gesture started by pointer {}", sample.pointer_id);
        events.push(GestureEvent::GestureStart);
    }

    fn on_pointer_down(&mut self, sample: &TouchSample, events: &mut Vec<GestureEvent>) {
        if !self.active {
            warn!("PointerDown for pointer {} without an active gesture", sample.pointer_id);
            return;
        }
        if self.pointer_position(sample.pointer_id).is_some() {
            warn!("PointerDown for pointer {} that is already down", sample.pointer_id);
            return;
        }

        self.pointers.push((sample.pointer_id, sample.position));
        self.max_pointers = self.max_pointers.max(self.pointers.len());
        self.could_be_tap = false;

        if self.pointers.len() != 2 {
            debug!("Ignoring pointer {} ({} pointers down)", sample.pointer_id, self.pointers.len());
            return;
        }

        match self.state {
            RecognizerState::Drag => events.push(GestureEvent::Drag {
                phase: GesturePhase::Stop,
                point: self.last_drag_point,
                timestamp_ms: sample.timestamp_ms,
            }),
            RecognizerState::Pinch => events.push(self.pinch_event(GesturePhase::Stop)),
            RecognizerState::Idle => {}
        }
        self.begin_pinch(events);
    }

    fn on_move(&mut self, sample: &TouchSample, events: &mut Vec<GestureEvent>) {
        if !self.active {
            return;
        }
        let Some(slot) = self.pointers.iter_mut().find(|(id, _)| *id == sample.pointer_id) else {
            return;
        };
        slot.1 = sample.position;

        match self.state {
            RecognizerState::Idle => {
                if self.pointers.len() != 1 {
                    return;
                }
                if sample.position.distance(self.start_point) < self.config.drag_slop_px {
                    return;
                }
                self.state = RecognizerState::Drag;
                self.could_be_tap = false;
                // anchor at the current point so the stroke does not jump
                self.last_drag_point = self.gesture_mapping.map_point(sample.position);
                debug!("Drag started at {:?}", self.last_drag_point);
                events.push(GestureEvent::Drag {
                    phase: GesturePhase::Start,
                    point: self.last_drag_point,
                    timestamp_ms: sample.timestamp_ms,
                });
            }
            RecognizerState::Drag => {
                self.last_drag_point = self.gesture_mapping.map_point(sample.position);
                events.push(GestureEvent::Drag {
                    phase: GesturePhase::Move,
                    point: self.last_drag_point,
                    timestamp_ms: sample.timestamp_ms,
                });
            }
            RecognizerState::Pinch => {
                if self.pinch_pair.contains(&sample.pointer_id) {
                    events.push(self.pinch_event(GesturePhase::Move));
                }
            }
        }
    }

    fn on_pointer_up(&mut self, sample: &TouchSample, events: &mut Vec<GestureEvent>) {
        if !self.active || self.pointer_position(sample.pointer_id).is_none() {
            return;
        }

        if self.state != RecognizerState::Pinch {
            self.pointers.retain(|(id, _)| *id != sample.pointer_id);
            return;
        }

        let departing = self.pinch_event(GesturePhase::Stop);
        self.pointers.retain(|(id, _)| *id != sample.pointer_id);
        events.push(departing);

        if self.pointers.len() >= 2 {
            self.begin_pinch(events);
        } else {
            debug!("Pinch ended, back to idle");
            self.state = RecognizerState::Idle;
            // a later drag maps through the transform the pinch left behind
            self.gesture_mapping = self.inverse_transform();
            if let Some(&(_, remaining)) = self.pointers.first() {
                self.start_point = remaining;
            }
        }
    }

    fn on_up(&mut self, sample: &TouchSample, events: &mut Vec<GestureEvent>) {
        if !self.active {
            return;
        }
        if let Some(slot) = self.pointers.iter_mut().find(|(id, _)| *id == sample.pointer_id) {
            slot.1 = sample.position;
        }
        self.finish(sample.position, sample.timestamp_ms, true, events);
    }

    /// Emits the terminal event for the current state followed by `GestureStop`
    fn finish(&mut self, position: Point, timestamp_ms: u64, allow_tap: bool, events: &mut Vec<GestureEvent>) {
        match self.state {
            RecognizerState::Drag => events.push(GestureEvent::Drag {
                phase: GesturePhase::Stop,
                point: self.gesture_mapping.map_point(position),
                timestamp_ms,
            }),
            RecognizerState::Pinch => events.push(self.pinch_event(GesturePhase::Stop)),
            RecognizerState::Idle => {
                if allow_tap && self.could_be_tap && self.max_pointers == 1 {
                    debug!("Tap at {:?}", self.start_point);
                    events.push(GestureEvent::Tap {
                        point: self.gesture_mapping.map_point(self.start_point),
                        timestamp_ms,
                    });
                }
            }
        }
        events.push(GestureEvent::GestureStop);
        self.reset();
    }

    fn begin_pinch(&mut self, events: &mut Vec<GestureEvent>) {
        self.pinch_pair = [self.pointers[0].0, self.pointers[1].0];
        self.state = RecognizerState::Pinch;
        debug!("Pinch started with pointers {:?}", self.pinch_pair);
        events.push(self.pinch_event(GesturePhase::Start));
    }

    fn pinch_event(&self, phase: GesturePhase) -> GestureEvent {
        let first = self.pointer_position(self.pinch_pair[0]).unwrap_or_default();
        let second = self.pointer_position(self.pinch_pair[1]).unwrap_or_default();
        let to_canvas = self.inverse_transform();
        GestureEvent::Pinch {
            phase,
            pointers: PinchPointers {
                parent: [first, second],
                canvas: [to_canvas.map_point(first), to_canvas.map_point(second)],
            },
        }
    }

    fn pointer_position(&self, pointer_id: PointerId) -> Option<Point> {
        self.pointers
            .iter()
            .find(|(id, _)| *id == pointer_id)
            .map(|(_, position)| *position)
    }

    fn inverse_transform(&self) -> AffineTransform {
        self.canvas_transform.invert().unwrap_or_else(|| {
            warn!("Canvas transform is singular; mapping input points unchanged");
            AffineTransform::IDENTITY
        })
    }
}
