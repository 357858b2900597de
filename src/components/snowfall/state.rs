//! Simulation state and the engine that owns it.
//!
//! The engine is the single owner of particles, the density grid, and pointer
//! input. Input handlers call into it; the frame loop calls [`SimulationEngine::step`];
//! resize handlers call [`SimulationEngine::resize`]. Nothing else mutates state.

use log::{debug, info};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::burst::spawn_burst;
use super::config::{RenderQuality, SimulationConfig};
use super::grid::DensityGrid;
use super::particles::{Particle, StepContext, StepOutcome, neighbor_pull};
use super::pointer::{InputSource, PointerTracker, Trail};
use super::scale::{ScaleConfig, SurfaceMetrics};

/// Everything that changes from frame to frame.
pub struct SimulationState {
	pub metrics: SurfaceMetrics,
	pub particles: Vec<Particle>,
	pub grid: DensityGrid,
	pub pointer: PointerTracker,
	/// Landed particles. Always equal to the number of `landed` flags.
	pub pile_count: usize,
	pub frame: u64,
}

/// Owns the simulation and exposes the operations the host drives it with.
///
/// Created once the sprite is ready, then stepped every animation frame until
/// [`stop`](Self::stop) is called.
pub struct SimulationEngine {
	state: SimulationState,
	config: SimulationConfig,
	scale: ScaleConfig,
	quality: RenderQuality,
	rng: SmallRng,
	running: bool,
}

impl SimulationEngine {
	pub fn new(config: SimulationConfig, quality: RenderQuality, width: f64, height: f64) -> Self {
		Self::with_rng(config, quality, width, height, SmallRng::from_entropy())
	}

	pub fn with_rng(
		config: SimulationConfig,
		quality: RenderQuality,
		width: f64,
		height: f64,
		mut rng: SmallRng,
	) -> Self {
		let config = config.sanitized();
		let scale = ScaleConfig::default();
		let metrics = SurfaceMetrics::compute(width, height, quality, &config, &scale);
		let particles = (0..metrics.particle_count)
			.map(|_| Particle::new(&metrics, &mut rng))
			.collect();
		let trail = Trail::new(
			config.trail_length,
			config.trail_alpha_decay,
			config.trail_size_decay,
		);
		let pointer = PointerTracker::new(trail, config.trail_enabled, config.touch_cooldown_ms);

		info!(
			"snowdrift: {}x{} surface, {} particles, pile capacity {}, {:?} quality",
			width, height, metrics.particle_count, metrics.max_pile_count, quality
		);

		Self {
			state: SimulationState {
				metrics,
				particles,
				grid: DensityGrid::new(),
				pointer,
				pile_count: 0,
				frame: 0,
			},
			config,
			scale,
			quality,
			rng,
			running: true,
		}
	}

	/// Advance the simulation by one frame.
	pub fn step(&mut self) {
		if !self.running {
			return;
		}

		let SimulationState {
			metrics,
			particles,
			grid,
			pointer,
			pile_count,
			frame,
		} = &mut self.state;
		let config = &self.config;
		let rng = &mut self.rng;

		grid.rebuild(particles, metrics.width);

		let attraction = config.neighbor_attraction_enabled && !self.quality.is_reduced();
		let attraction_chance = config.attraction_probability.clamp(0.0, 1.0);

		let mut ctx = StepContext {
			metrics,
			config,
			pointer: &pointer.state,
			trail: &pointer.trail,
			grid,
			pile_count: *pile_count,
			population: particles.len(),
			baseline: metrics.particle_count,
		};

		let mut outcomes = Vec::with_capacity(particles.len());
		for i in 0..particles.len() {
			let pull = if attraction && rng.gen_bool(attraction_chance) {
				neighbor_pull(particles, i, config)
			} else {
				None
			};
			outcomes.push(particles[i].update(&mut ctx, pull, rng));
		}
		*pile_count = ctx.pile_count;

		if outcomes.contains(&StepOutcome::Cull) {
			*particles = particles
				.drain(..)
				.zip(outcomes)
				.filter_map(|(p, outcome)| (outcome == StepOutcome::Keep).then_some(p))
				.collect();
		}

		pointer.decay_trail();
		*frame += 1;
	}

	/// Recompute metrics for a new surface size and reconcile the population.
	pub fn resize(&mut self, width: f64, height: f64) {
		let metrics =
			SurfaceMetrics::compute(width, height, self.quality, &self.config, &self.scale);
		let target = metrics.particle_count;
		let particles = &mut self.state.particles;
		let before = particles.len();

		if particles.len() > target {
			particles.truncate(target);
		} else {
			while particles.len() < target {
				particles.push(Particle::new(&metrics, &mut self.rng));
			}
		}

		// The pile was built against the old floor.
		for p in particles.iter_mut().filter(|p| p.landed) {
			if !metrics.piling() || p.x > metrics.width - p.size {
				p.reset(false, &metrics, &mut self.rng);
			} else {
				p.y = metrics.height - p.size;
			}
		}

		let mut landed = particles.iter().filter(|p| p.landed).count();
		for p in particles.iter_mut().rev() {
			if landed <= metrics.max_pile_count {
				break;
			}
			if p.landed {
				p.reset(false, &metrics, &mut self.rng);
				landed -= 1;
			}
		}

		info!(
			"snowdrift: resized to {}x{}, population {} -> {}, pile {}/{}",
			width, height, before, target, landed, metrics.max_pile_count
		);

		self.state.pile_count = landed;
		self.state.metrics = metrics;
	}

	pub fn pointer_move(&mut self, x: f64, y: f64, source: InputSource, now_ms: f64) {
		self.state.pointer.move_to(x, y, source, now_ms);
	}

	/// Press at `(x, y)`; spawns a burst when enabled. Returns particles added.
	pub fn pointer_down(&mut self, x: f64, y: f64, source: InputSource, now_ms: f64) -> usize {
		if !self.state.pointer.press(x, y, source, now_ms) || !self.config.burst_enabled {
			return 0;
		}
		let added = spawn_burst(
			&mut self.state.particles,
			x,
			y,
			&self.state.metrics,
			&self.config,
			&mut self.rng,
		);
		debug!(
			"snowdrift: burst at ({x:.0}, {y:.0}) added {added}, population {}",
			self.state.particles.len()
		);
		added
	}

	pub fn pointer_up(&mut self) {
		self.state.pointer.release();
	}

	pub fn pointer_leave(&mut self) {
		self.state.pointer.leave();
	}

	/// Touch lifted or cancelled: release, park, and restart the mouse cool-down.
	pub fn touch_end(&mut self, now_ms: f64) {
		self.state.pointer.touch_end(now_ms);
	}

	/// Stop stepping for good. The host stops scheduling frames after this.
	pub fn stop(&mut self) {
		if self.running {
			info!("snowdrift: stopped after {} frames", self.state.frame);
		}
		self.running = false;
	}

	pub fn is_running(&self) -> bool {
		self.running
	}

	pub fn state(&self) -> &SimulationState {
		&self.state
	}

	pub fn metrics(&self) -> &SurfaceMetrics {
		&self.state.metrics
	}

	pub fn particles(&self) -> &[Particle] {
		&self.state.particles
	}

	pub fn pile_count(&self) -> usize {
		self.state.pile_count
	}

	pub fn config(&self) -> &SimulationConfig {
		&self.config
	}

	pub fn quality(&self) -> RenderQuality {
		self.quality
	}
}
