//! Pointer position, press state and the decaying pointer trail.
//!
//! Mouse and touch feed the same [`PointerTracker`]. Browsers emit synthetic
//! mouse events after a touch, so each touch opens a cool-down window during
//! which mouse input is dropped; one physical touch never counts twice.

use std::collections::VecDeque;

/// Parked pointer position. Far enough away that no particle is ever "near".
pub const POINTER_SENTINEL: f64 = -100_000.0;

/// Trail samples fainter than this are dropped.
const TRAIL_MIN_ALPHA: f64 = 0.02;
/// Trail sample size per pixel of pointer travel in one event.
const TRAIL_SIZE_PER_SPEED: f64 = 0.8;
const TRAIL_SIZE_MIN: f64 = 2.0;
const TRAIL_SIZE_MAX: f64 = 40.0;

/// Where an input event came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputSource {
	Mouse,
	Touch,
}

/// Current and previous pointer position plus press state.
#[derive(Clone, Debug, PartialEq)]
pub struct PointerState {
	pub x: f64,
	pub y: f64,
	pub prev_x: f64,
	pub prev_y: f64,
	pub pressed: bool,
}

impl Default for PointerState {
	fn default() -> Self {
		Self {
			x: POINTER_SENTINEL,
			y: POINTER_SENTINEL,
			prev_x: POINTER_SENTINEL,
			prev_y: POINTER_SENTINEL,
			pressed: false,
		}
	}
}

impl PointerState {
	/// Whether the pointer is parked at the sentinel.
	pub fn is_parked(&self) -> bool {
		self.x <= POINTER_SENTINEL && self.y <= POINTER_SENTINEL
	}
}

/// One remembered pointer position.
#[derive(Clone, Debug, PartialEq)]
pub struct TrailSample {
	pub x: f64,
	pub y: f64,
	pub alpha: f64,
	pub size: f64,
	/// Pointer delta that produced this sample.
	pub vx: f64,
	pub vy: f64,
}

/// Bounded, decaying sequence of recent pointer positions. Oldest first.
#[derive(Clone, Debug)]
pub struct Trail {
	samples: VecDeque<TrailSample>,
	capacity: usize,
	alpha_decay: f64,
	size_decay: f64,
}

impl Trail {
	pub fn new(capacity: usize, alpha_decay: f64, size_decay: f64) -> Self {
		Self {
			samples: VecDeque::with_capacity(capacity),
			capacity,
			alpha_decay,
			size_decay,
		}
	}

	pub fn push(&mut self, sample: TrailSample) {
		if self.capacity == 0 {
			return;
		}
		self.samples.push_back(sample);
		while self.samples.len() > self.capacity {
			self.samples.pop_front();
		}
	}

	/// Fade every sample by one frame and drop the invisible ones.
	pub fn decay(&mut self) {
		for s in self.samples.iter_mut() {
			s.alpha *= self.alpha_decay;
			s.size *= self.size_decay;
		}
		self.samples.retain(|s| s.alpha >= TRAIL_MIN_ALPHA);
	}

	pub fn clear(&mut self) {
		self.samples.clear();
	}

	pub fn iter(&self) -> impl Iterator<Item = &TrailSample> {
		self.samples.iter()
	}

	pub fn len(&self) -> usize {
		self.samples.len()
	}

	pub fn is_empty(&self) -> bool {
		self.samples.is_empty()
	}
}

/// Accumulates raw pointer input between frames.
#[derive(Clone, Debug)]
pub struct PointerTracker {
	pub state: PointerState,
	pub trail: Trail,
	trail_enabled: bool,
	touch_cooldown_ms: f64,
	last_touch_ms: Option<f64>,
}

impl PointerTracker {
	pub fn new(trail: Trail, trail_enabled: bool, touch_cooldown_ms: f64) -> Self {
		Self {
			state: PointerState::default(),
			trail,
			trail_enabled,
			touch_cooldown_ms,
			last_touch_ms: None,
		}
	}

	/// Returns false when the event is a synthetic mouse echo of a recent touch.
	fn accept(&mut self, source: InputSource, now_ms: f64) -> bool {
		match source {
			InputSource::Touch => {
				self.last_touch_ms = Some(now_ms);
				true
			}
			InputSource::Mouse => self
				.last_touch_ms
				.is_none_or(|t| now_ms - t >= self.touch_cooldown_ms),
		}
	}

	/// Record a pointer move. Returns whether the event was accepted.
	pub fn move_to(&mut self, x: f64, y: f64, source: InputSource, now_ms: f64) -> bool {
		if !self.accept(source, now_ms) {
			return false;
		}

		let s = &mut self.state;
		// Coming back from the sentinel is a jump, not a movement.
		if s.is_parked() {
			s.x = x;
			s.y = y;
		}
		let (dx, dy) = (x - s.x, y - s.y);
		s.prev_x = s.x;
		s.prev_y = s.y;
		s.x = x;
		s.y = y;

		if self.trail_enabled {
			let speed = dx.hypot(dy);
			self.trail.push(TrailSample {
				x,
				y,
				alpha: 1.0,
				size: (speed * TRAIL_SIZE_PER_SPEED).clamp(TRAIL_SIZE_MIN, TRAIL_SIZE_MAX),
				vx: dx,
				vy: dy,
			});
		}
		true
	}

	/// Pointer went down at `(x, y)`. Returns whether the event was accepted.
	pub fn press(&mut self, x: f64, y: f64, source: InputSource, now_ms: f64) -> bool {
		if !self.accept(source, now_ms) {
			return false;
		}
		self.state.prev_x = x;
		self.state.prev_y = y;
		self.state.x = x;
		self.state.y = y;
		self.state.pressed = true;
		true
	}

	pub fn release(&mut self) {
		self.state.pressed = false;
	}

	/// Pointer left the surface or the touch was cancelled.
	pub fn leave(&mut self) {
		self.state = PointerState::default();
		self.trail.clear();
	}

	/// Finger lifted or the touch was cancelled. Restarts the mouse cool-down
	/// so the browser's emulated mouse events after the lift are dropped too.
	pub fn touch_end(&mut self, now_ms: f64) {
		self.accept(InputSource::Touch, now_ms);
		self.leave();
	}

	pub fn decay_trail(&mut self) {
		self.trail.decay();
	}
}
