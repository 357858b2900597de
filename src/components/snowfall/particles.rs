//! Snowflake kinematics, settling, and liquid self-leveling of the pile.
//!
//! A particle is either flying or landed. Burst particles carry a countdown
//! on top of either regime and use their own lighter gravity and air drag.

use std::f64::consts::TAU;

use rand::Rng;

use super::config::{SimulationConfig, WallPolicy};
use super::grid::DensityGrid;
use super::pointer::{PointerState, Trail};
use super::scale::SurfaceMetrics;

/// A single snowflake.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	/// Degrees. Unbounded; wraps only when drawn.
	pub rot: f64,
	pub rot_speed: f64,
	pub size: f64,
	/// Fixed at spawn.
	pub alpha: f64,
	/// Settled on the floor and part of the pile.
	pub landed: bool,
	/// Frames of burst physics remaining.
	pub burst_life: Option<u32>,
	pub sway_speed: f64,
	pub sway_offset: f64,
}

impl Default for Particle {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			vx: 0.0,
			vy: 0.0,
			rot: 0.0,
			rot_speed: 0.0,
			size: 10.0,
			alpha: 1.0,
			landed: false,
			burst_life: None,
			sway_speed: 0.02,
			sway_offset: 0.0,
		}
	}
}

/// Whether a particle survives the frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
	Keep,
	/// Drop from the population at the end of the frame.
	Cull,
}

/// Everything a particle reads (and the two counters it writes) in one frame.
pub struct StepContext<'a> {
	pub metrics: &'a SurfaceMetrics,
	pub config: &'a SimulationConfig,
	pub pointer: &'a PointerState,
	pub trail: &'a Trail,
	pub grid: &'a DensityGrid,
	/// Landed particles, kept in step with every land/kick/cull.
	pub pile_count: usize,
	/// Live particles, excluding those already culled this frame.
	pub population: usize,
	/// Baseline population target; bursts above it are culled, not recycled.
	pub baseline: usize,
}

impl Particle {
	/// A fresh particle scattered somewhere inside the viewport.
	pub fn new(metrics: &SurfaceMetrics, rng: &mut impl Rng) -> Self {
		let mut p = Self::default();
		p.reset(true, metrics, rng);
		p
	}

	pub fn is_burst(&self) -> bool {
		self.burst_life.is_some()
	}

	/// Re-randomize every transient field.
	///
	/// `initial` places the particle inside the viewport; otherwise it starts
	/// above the top edge, staggered by `respawn_spread` viewport heights.
	pub fn reset(&mut self, initial: bool, metrics: &SurfaceMetrics, rng: &mut impl Rng) {
		let flake = metrics.flake_size;
		self.size = (0.5 + rng.r#gen::<f64>() * 0.5) * flake;
		self.x = rng.r#gen::<f64>() * (metrics.width - self.size).max(0.0);
		self.y = if initial {
			rng.r#gen::<f64>() * metrics.height
		} else {
			-flake - rng.r#gen::<f64>() * metrics.height * metrics.respawn_spread
		};

		self.vx = (rng.r#gen::<f64>() - 0.5) * 2.0;
		self.vy = 2.0 + rng.r#gen::<f64>() * 2.0;
		self.rot = rng.r#gen::<f64>() * 360.0;
		self.rot_speed = (rng.r#gen::<f64>() - 0.5) * 4.0;
		self.alpha = 0.6 + rng.r#gen::<f64>() * 0.4;
		self.landed = false;
		self.burst_life = None;

		self.sway_speed = 0.02 + rng.r#gen::<f64>() * 0.03;
		self.sway_offset = rng.r#gen::<f64>() * TAU;
	}

	/// Advance one frame.
	///
	/// `neighbor_pull` is the clumping velocity sampled by the engine for this
	/// frame, if any.
	pub fn update(
		&mut self,
		ctx: &mut StepContext,
		neighbor_pull: Option<(f64, f64)>,
		rng: &mut impl Rng,
	) -> StepOutcome {
		let cfg = ctx.config;

		if let Some(life) = self.burst_life {
			let life = life.saturating_sub(1);
			if life > 0 {
				self.burst_life = Some(life);
			} else if ctx.population > ctx.baseline {
				return self.cull(ctx);
			} else {
				self.burst_life = None;
			}
		}

		let kicked = self.apply_pointer(ctx, rng);

		if self.landed {
			self.flow(ctx, rng);
			return StepOutcome::Keep;
		}

		if let Some((ax, ay)) = neighbor_pull {
			self.vx += ax;
			self.vy += ay;
		}
		if cfg.trail_enabled {
			self.apply_trail(ctx.trail, cfg);
		}

		// Vertical
		if self.is_burst() {
			self.vy += cfg.gravity * cfg.burst_gravity_scale;
			self.vx *= cfg.burst_drag;
			self.vy *= cfg.burst_drag;
		} else {
			self.vy += cfg.gravity;
		}
		self.vy = self.vy.clamp(-cfg.terminal_velocity, cfg.terminal_velocity);
		self.y += self.vy;

		// Horizontal, with sway unless the particle was just flung
		if !kicked && self.vx.abs() < cfg.sway_velocity_limit {
			let sway = (self.y * self.sway_speed + self.sway_offset).sin() * cfg.sway_amplitude;
			self.x += self.vx + sway;
		} else {
			self.x += self.vx;
		}
		if self.vx.abs() > cfg.friction_threshold {
			self.vx *= cfg.friction_fast;
		} else {
			self.vx *= cfg.friction_slow;
		}

		self.rot += self.rot_speed;
		self.rot_speed = self.rot_speed.clamp(-cfg.max_rot_speed, cfg.max_rot_speed);

		self.handle_walls(ctx.metrics, cfg);
		self.handle_floor(ctx, rng)
	}

	/// Pointer proximity force. Returns true when a landed particle was kicked.
	fn apply_pointer(&mut self, ctx: &mut StepContext, rng: &mut impl Rng) -> bool {
		let radius = ctx.metrics.interaction_radius;
		let (dx, dy) = (self.x - ctx.pointer.x, self.y - ctx.pointer.y);
		let dist = dx.hypot(dy);
		if dist >= radius || radius <= 0.0 {
			return false;
		}

		let force = (radius - dist) / radius;
		let cfg = ctx.config;

		if self.landed {
			if force > cfg.kick_threshold {
				self.landed = false;
				ctx.pile_count = ctx.pile_count.saturating_sub(1);
				self.vy = -(cfg.kick_impulse_min + rng.r#gen::<f64>() * cfg.kick_impulse_range);
				self.vx += (rng.r#gen::<f64>() - 0.5) * cfg.kick_scatter;
				return true;
			}
			return false;
		}

		if dist > 0.0 {
			let press = if ctx.pointer.pressed {
				cfg.press_multiplier
			} else {
				1.0
			};
			let push = force * cfg.pointer_force * press * cfg.pointer_mode.sign();
			self.vx += dx / dist * push;
			self.vy += dy / dist * push;
		}
		false
	}

	fn apply_trail(&mut self, trail: &Trail, cfg: &SimulationConfig) {
		if cfg.trail_radius <= 0.0 {
			return;
		}
		for s in trail.iter() {
			let dist = (self.x - s.x).hypot(self.y - s.y);
			if dist >= cfg.trail_radius {
				continue;
			}
			let proximity = (cfg.trail_radius - dist) / cfg.trail_radius;
			let k = proximity * s.alpha * cfg.trail_force;
			self.vx += s.vx * k;
			self.vy += s.vy * k;
		}
	}

	fn handle_walls(&mut self, metrics: &SurfaceMetrics, cfg: &SimulationConfig) {
		let width = metrics.width;
		match cfg.wall_policy {
			WallPolicy::Bounce => {
				let max_x = (width - self.size).max(0.0);
				if self.x <= 0.0 || self.x >= max_x {
					self.vx *= -cfg.wall_damping;
					if self.x <= 0.0 {
						self.x = 1.0_f64.min(max_x);
					}
					if self.x >= max_x {
						self.x = (max_x - 1.0).max(0.0);
					}
				}
			}
			WallPolicy::Wrap => {
				if width > 0.0 && !(0.0..width).contains(&self.x) {
					self.x = self.x.rem_euclid(width);
					// Rounding sends tiny negatives to exactly `width`.
					if self.x >= width {
						self.x = 0.0;
					}
				}
			}
		}
	}

	fn handle_floor(&mut self, ctx: &mut StepContext, rng: &mut impl Rng) -> StepOutcome {
		let metrics = ctx.metrics;

		if !metrics.piling() {
			if self.y > metrics.height + self.size {
				if self.is_burst() && ctx.population > ctx.baseline {
					return self.cull(ctx);
				}
				self.reset(false, metrics, rng);
			}
			return StepOutcome::Keep;
		}

		let floor = metrics.height - self.size;
		if self.y >= floor && self.vy > 0.0 {
			let density = ctx.grid.density_at(DensityGrid::bin_of(self.x));
			if ctx.pile_count < metrics.max_pile_count || density < ctx.config.hole_fill_threshold {
				self.landed = true;
				self.y = floor;
				self.vx = 0.0;
				self.vy = 0.0;
				ctx.pile_count += 1;
			} else if self.is_burst() && ctx.population > ctx.baseline {
				return self.cull(ctx);
			} else {
				self.reset(false, metrics, rng);
			}
		}
		StepOutcome::Keep
	}

	/// Slide a landed particle toward the emptier neighboring bin.
	fn flow(&mut self, ctx: &StepContext, rng: &mut impl Rng) {
		let cfg = ctx.config;
		let bin = DensityGrid::bin_of(self.x);
		let mine = i64::from(ctx.grid.density_at(bin));
		let left_diff = mine - i64::from(ctx.grid.density_at(bin - 1));
		let right_diff = mine - i64::from(ctx.grid.density_at(bin + 1));
		let threshold = i64::from(cfg.flow_threshold);

		let direction = if left_diff > threshold && left_diff >= right_diff {
			-1.0
		} else if right_diff > threshold && right_diff > left_diff {
			1.0
		} else {
			0.0
		};

		if direction != 0.0 {
			let jitter = if cfg.flow_jitter {
				0.5 + rng.r#gen::<f64>()
			} else {
				1.0
			};
			self.x += direction * cfg.flow_speed * jitter;
		}

		self.x = self.x.clamp(0.0, (ctx.metrics.width - self.size).max(0.0));
	}

	fn cull(&mut self, ctx: &mut StepContext) -> StepOutcome {
		if self.landed {
			ctx.pile_count = ctx.pile_count.saturating_sub(1);
		}
		ctx.population = ctx.population.saturating_sub(1);
		StepOutcome::Cull
	}
}

/// Weak attraction toward non-burst particles within `clump_radius`.
///
/// Scans the whole population, so callers gate it behind a low sampling
/// probability. Returns `None` when no neighbor is close enough.
pub fn neighbor_pull(
	particles: &[Particle],
	index: usize,
	config: &SimulationConfig,
) -> Option<(f64, f64)> {
	let me = particles.get(index)?;
	let radius = config.clump_radius;
	let mut pull = None;

	for (j, other) in particles.iter().enumerate() {
		if j == index || other.is_burst() {
			continue;
		}
		let (dx, dy) = (other.x - me.x, other.y - me.y);
		let dist = dx.hypot(dy);
		if dist > 0.0 && dist < radius {
			let (ax, ay) = pull.get_or_insert((0.0, 0.0));
			*ax += dx * config.attraction_strength;
			*ay += dy * config.attraction_strength;
		}
	}
	pull
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::SmallRng;

	use super::super::config::RenderQuality;
	use super::super::pointer::{POINTER_SENTINEL, TrailSample};
	use super::super::scale::ScaleConfig;
	use super::*;

	struct Fixture {
		metrics: SurfaceMetrics,
		config: SimulationConfig,
		pointer: PointerState,
		trail: Trail,
		grid: DensityGrid,
		pile_count: usize,
		population: usize,
		baseline: usize,
		rng: SmallRng,
	}

	impl Fixture {
		fn new(config: SimulationConfig) -> Self {
			let metrics = SurfaceMetrics::compute(
				1920.0,
				1080.0,
				RenderQuality::Full,
				&config,
				&ScaleConfig::default(),
			);
			let baseline = metrics.particle_count;
			Self {
				metrics,
				config,
				pointer: PointerState::default(),
				trail: Trail::new(20, 0.9, 0.95),
				grid: DensityGrid::new(),
				pile_count: 0,
				population: baseline,
				baseline,
				rng: SmallRng::seed_from_u64(7),
			}
		}

		fn step(&mut self, p: &mut Particle) -> StepOutcome {
			let mut ctx = StepContext {
				metrics: &self.metrics,
				config: &self.config,
				pointer: &self.pointer,
				trail: &self.trail,
				grid: &self.grid,
				pile_count: self.pile_count,
				population: self.population,
				baseline: self.baseline,
			};
			let outcome = p.update(&mut ctx, None, &mut self.rng);
			self.pile_count = ctx.pile_count;
			self.population = ctx.population;
			outcome
		}

		fn floor(&self, p: &Particle) -> f64 {
			self.metrics.height - p.size
		}
	}

	fn landed_at(x: f64) -> Particle {
		Particle {
			x,
			landed: true,
			..Particle::default()
		}
	}

	fn flying_at(x: f64) -> Particle {
		Particle {
			x,
			y: 100.0,
			..Particle::default()
		}
	}

	fn falling_at(x: f64, y: f64) -> Particle {
		Particle {
			x,
			y,
			vy: 4.0,
			size: 20.0,
			..Particle::default()
		}
	}

	#[test]
	fn reset_initial_spawns_inside_viewport() {
		let mut fx = Fixture::new(SimulationConfig::classic());
		for _ in 0..200 {
			let p = Particle::new(&fx.metrics, &mut fx.rng);
			assert!(p.x >= 0.0 && p.x + p.size <= fx.metrics.width);
			assert!(p.y >= 0.0 && p.y <= fx.metrics.height);
			assert!(p.size >= 0.5 * fx.metrics.flake_size && p.size <= fx.metrics.flake_size);
			assert!(!p.landed && !p.is_burst());
		}
	}

	#[test]
	fn reset_respawns_above_top_edge() {
		let mut fx = Fixture::new(SimulationConfig::classic());
		let mut p = Particle {
			landed: true,
			burst_life: Some(5),
			..Particle::default()
		};
		for _ in 0..200 {
			p.reset(false, &fx.metrics, &mut fx.rng);
			let lowest = -fx.metrics.flake_size
				- fx.metrics.height * fx.metrics.respawn_spread;
			assert!(p.y <= -fx.metrics.flake_size && p.y >= lowest);
			assert!(!p.landed && p.burst_life.is_none());
		}
	}

	#[test]
	fn velocity_and_size_stay_bounded() {
		let mut fx = Fixture::new(SimulationConfig::drift());
		fx.pointer.x = 900.0;
		fx.pointer.y = 900.0;
		fx.pointer.pressed = true;
		let mut particles: Vec<_> = (0..300)
			.map(|_| Particle::new(&fx.metrics, &mut fx.rng))
			.collect();

		for _ in 0..400 {
			for p in particles.iter_mut() {
				fx.step(p);
				assert!(p.size >= 0.0);
				assert!(p.vy.abs() <= fx.config.terminal_velocity);
			}
		}
	}

	#[test]
	fn landing_zeroes_velocity_and_snaps_to_floor() {
		let mut fx = Fixture::new(SimulationConfig::classic());
		let mut p = falling_at(400.0, fx.metrics.height - 21.0);
		p.vx = 0.5;

		assert_eq!(fx.step(&mut p), StepOutcome::Keep);
		assert!(p.landed);
		assert_eq!(p.vx, 0.0);
		assert_eq!(p.vy, 0.0);
		assert_eq!(p.y, fx.floor(&p));
		assert_eq!(fx.pile_count, 1);
	}

	#[test]
	fn full_pile_recycles_unless_filling_a_hole() {
		let mut fx = Fixture::new(SimulationConfig::classic());
		fx.pile_count = fx.metrics.max_pile_count;

		// Bin 16 holds plenty of snow: the particle respawns above.
		let crowded: Vec<_> = (0..5)
			.map(|_| Particle {
				x: 410.0,
				landed: true,
				..Particle::default()
			})
			.collect();
		fx.grid.rebuild(&crowded, fx.metrics.width);
		let mut p = falling_at(405.0, fx.metrics.height - 21.0);
		fx.step(&mut p);
		assert!(!p.landed);
		assert!(p.y < 0.0);
		assert_eq!(fx.pile_count, fx.metrics.max_pile_count);

		// An empty bin still accepts snow beyond capacity.
		let mut q = falling_at(1005.0, fx.metrics.height - 21.0);
		fx.step(&mut q);
		assert!(q.landed);
		assert_eq!(fx.pile_count, fx.metrics.max_pile_count + 1);
	}

	#[test]
	fn kick_launches_landed_particle_upward() {
		let mut fx = Fixture::new(SimulationConfig::classic());
		let mut p = Particle {
			x: 500.0,
			size: 20.0,
			landed: true,
			..Particle::default()
		};
		p.y = fx.floor(&p);
		fx.pile_count = 10;
		fx.pointer.x = 510.0;
		fx.pointer.y = p.y;

		fx.step(&mut p);
		assert!(!p.landed);
		assert!(p.vy < 0.0);
		assert_eq!(fx.pile_count, 9);

		// Fly until it comes back down and lands again.
		fx.pointer = PointerState::default();
		for _ in 0..200 {
			fx.step(&mut p);
			if p.landed {
				break;
			}
		}
		assert!(p.landed);
		assert_eq!(fx.pile_count, 10);
	}

	#[test]
	fn weak_force_does_not_kick() {
		let mut fx = Fixture::new(SimulationConfig::classic());
		let mut p = Particle {
			x: 500.0,
			landed: true,
			..Particle::default()
		};
		p.y = fx.floor(&p);
		fx.pile_count = 1;
		// Force (150 - 140) / 150 is below the kick threshold.
		fx.pointer.x = 640.0;
		fx.pointer.y = p.y;

		fx.step(&mut p);
		assert!(p.landed);
		assert_eq!(fx.pile_count, 1);
	}

	#[test]
	fn pointer_force_fades_to_zero_at_radius() {
		let mut fx = Fixture::new(SimulationConfig::classic());
		fx.config.gravity = 0.0;
		fx.config.friction_slow = 1.0;
		let radius = fx.metrics.interaction_radius;

		let push_at = |fx: &mut Fixture, dist: f64| {
			fx.pointer.x = 500.0 - dist;
			fx.pointer.y = 500.0;
			let mut p = Particle {
				x: 500.0,
				y: 500.0,
				..Particle::default()
			};
			fx.step(&mut p);
			p.vx / fx.config.friction_slow
		};

		let at_edge = push_at(&mut fx, radius);
		let near_edge = push_at(&mut fx, radius - 1.0);
		let mid = push_at(&mut fx, radius / 2.0);
		let close = push_at(&mut fx, 1.0);

		assert_eq!(at_edge, 0.0);
		assert!(near_edge > 0.0 && near_edge < 0.01);
		assert!(mid > near_edge);
		assert!(close > mid);
	}

	#[test]
	fn attract_mode_pulls_toward_pointer() {
		let mut config = SimulationConfig::classic();
		config.pointer_mode = super::super::config::PointerMode::Attract;
		let mut fx = Fixture::new(config);
		fx.pointer.x = 450.0;
		fx.pointer.y = 500.0;
		let mut p = Particle {
			x: 500.0,
			y: 500.0,
			..Particle::default()
		};
		fx.step(&mut p);
		assert!(p.vx < 0.0);
	}

	#[test]
	fn parked_pointer_applies_no_force() {
		let mut fx = Fixture::new(SimulationConfig::classic());
		fx.config.gravity = 0.0;
		assert_eq!(fx.pointer.x, POINTER_SENTINEL);
		let mut p = Particle {
			x: 1.0,
			y: 1.0,
			vx: 0.0,
			vy: 0.0,
			..Particle::default()
		};
		fx.step(&mut p);
		assert_eq!(p.vy, 0.0);
		assert_eq!(p.vx, 0.0);
	}

	#[test]
	fn flow_moves_toward_emptier_side_only_above_threshold() {
		let mut config = SimulationConfig::classic();
		config.flow_jitter = false;
		let mut fx = Fixture::new(config);

		let mut pile: Vec<Particle> = Vec::new();
		// Bin 10 holds 6, bin 9 holds 1, bin 11 holds 4.
		pile.extend((0..6).map(|_| landed_at(260.0)));
		pile.push(landed_at(235.0));
		pile.extend((0..4).map(|_| landed_at(285.0)));
		fx.grid.rebuild(&pile, fx.metrics.width);

		let mut p = pile[0].clone();
		p.y = fx.floor(&p);
		fx.step(&mut p);
		assert_eq!(p.x, 260.0 - fx.config.flow_speed);

		// Bin 11 is denser than empty bin 12 by 4, and lighter than bin 10.
		let mut q = pile[7].clone();
		q.y = fx.floor(&q);
		fx.step(&mut q);
		assert_eq!(q.x, 285.0 + fx.config.flow_speed);

		// Flat pile: no neighbor differs by more than the threshold.
		let flat: Vec<_> = (0..30).map(|i| landed_at(200.0 + i as f64 * 2.5)).collect();
		fx.grid.rebuild(&flat, fx.metrics.width);
		let mut r = landed_at(226.0);
		r.y = fx.floor(&r);
		fx.step(&mut r);
		assert_eq!(r.x, 226.0);
	}

	#[test]
	fn flow_never_leaves_the_surface() {
		let mut fx = Fixture::new(SimulationConfig::classic());
		let pile: Vec<_> = (0..10).map(|_| landed_at(5.0)).collect();
		fx.grid.rebuild(&pile, fx.metrics.width);

		let mut p = pile[0].clone();
		for _ in 0..50 {
			fx.step(&mut p);
			assert!(p.x >= 0.0);
		}
		// The left wall reads as infinitely dense, so snow flows right.
		assert!(p.x > 5.0);
	}

	#[test]
	fn bounce_keeps_particles_inside() {
		let mut fx = Fixture::new(SimulationConfig::classic());
		let mut p = falling_at(fx.metrics.width + 50.0, 100.0);
		p.vx = 3.0;
		fx.step(&mut p);
		assert!(p.x >= 0.0 && p.x < fx.metrics.width);
		assert!(p.vx < 0.0);

		let mut q = falling_at(-30.0, 100.0);
		q.vx = -3.0;
		fx.step(&mut q);
		assert!(q.x >= 0.0 && q.x < fx.metrics.width);
		assert!(q.vx > 0.0);
	}

	#[test]
	fn wrap_reenters_from_opposite_edge() {
		let mut fx = Fixture::new(SimulationConfig::blizzard());
		let mut p = falling_at(fx.metrics.width - 0.5, 100.0);
		p.vx = 1.9;
		p.sway_offset = 0.0;
		fx.config.sway_amplitude = 0.0;
		fx.step(&mut p);
		assert!(p.x >= 0.0 && p.x < 5.0);
	}

	#[test]
	fn wrap_never_lands_on_the_far_edge() {
		let mut fx = Fixture::new(SimulationConfig::blizzard());
		fx.config.sway_amplitude = 0.0;
		let mut p = falling_at(1e-17, 100.0);
		p.vx = -2e-17;
		fx.step(&mut p);
		assert!(p.x >= 0.0 && p.x < fx.metrics.width, "x = {}", p.x);
	}

	#[test]
	fn without_piling_particles_recycle_off_screen() {
		let mut fx = Fixture::new(SimulationConfig::blizzard());
		let mut p = falling_at(300.0, fx.metrics.height + 25.0);
		assert_eq!(fx.step(&mut p), StepOutcome::Keep);
		assert!(!p.landed);
		assert!(p.y < 0.0);
		assert_eq!(fx.pile_count, 0);
	}

	#[test]
	fn expired_burst_is_culled_above_baseline() {
		let mut fx = Fixture::new(SimulationConfig::drift());
		fx.population = fx.baseline + 3;
		let mut p = Particle {
			x: 300.0,
			y: 300.0,
			burst_life: Some(1),
			..Particle::default()
		};
		assert_eq!(fx.step(&mut p), StepOutcome::Cull);
		assert_eq!(fx.population, fx.baseline + 2);
	}

	#[test]
	fn expired_burst_reverts_at_baseline() {
		let mut fx = Fixture::new(SimulationConfig::drift());
		let mut p = Particle {
			x: 300.0,
			y: 300.0,
			burst_life: Some(1),
			..Particle::default()
		};
		assert_eq!(fx.step(&mut p), StepOutcome::Keep);
		assert!(!p.is_burst());

		let mut q = Particle {
			x: 300.0,
			y: 300.0,
			burst_life: Some(10),
			..Particle::default()
		};
		fx.step(&mut q);
		assert_eq!(q.burst_life, Some(9));
	}

	#[test]
	fn burst_particles_feel_drag() {
		let mut fx = Fixture::new(SimulationConfig::drift());
		let mut p = Particle {
			x: 300.0,
			y: 300.0,
			vx: 5.0,
			burst_life: Some(50),
			..Particle::default()
		};
		fx.step(&mut p);
		let expected = 5.0 * fx.config.burst_drag * fx.config.friction_fast;
		assert!((p.vx - expected).abs() < 1e-9);
		assert!(p.vy < fx.config.gravity);
	}

	#[test]
	fn trail_drags_nearby_particles() {
		let mut fx = Fixture::new(SimulationConfig::drift());
		fx.config.gravity = 0.0;
		fx.trail.push(TrailSample {
			x: 510.0,
			y: 500.0,
			alpha: 1.0,
			size: 10.0,
			vx: 10.0,
			vy: 0.0,
		});
		let mut p = Particle {
			x: 500.0,
			y: 500.0,
			..Particle::default()
		};
		fx.step(&mut p);
		assert!(p.vx > 0.0);
	}

	#[test]
	fn neighbor_pull_skips_bursts_and_distant_particles() {
		let config = SimulationConfig::drift();
		let particles = vec![
			flying_at(100.0),
			flying_at(110.0),
			Particle {
				burst_life: Some(3),
				..flying_at(90.0)
			},
			flying_at(500.0),
		];

		let (ax, ay) = neighbor_pull(&particles, 0, &config).unwrap();
		assert!((ax - 10.0 * config.attraction_strength).abs() < 1e-12);
		assert_eq!(ay, 0.0);
		assert!(neighbor_pull(&particles, 3, &config).is_none());
		assert!(neighbor_pull(&particles, 99, &config).is_none());
	}
}
