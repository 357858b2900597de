//! Radial bursts of short-lived flakes at a pointer-down location.

use std::f64::consts::TAU;

use rand::Rng;

use super::config::SimulationConfig;
use super::particles::Particle;
use super::scale::SurfaceMetrics;

/// Angular jitter applied to each burst direction, in radians.
const ANGLE_JITTER: f64 = 0.3;

/// Append a ring of burst particles around `(x, y)`.
///
/// Stops silently at the overflow ceiling. Returns how many were added.
pub fn spawn_burst(
	particles: &mut Vec<Particle>,
	x: f64,
	y: f64,
	metrics: &SurfaceMetrics,
	config: &SimulationConfig,
	rng: &mut impl Rng,
) -> usize {
	let ceiling = metrics.overflow_ceiling(config.overflow_factor);
	let count = config.burst_count;
	let mut added = 0;

	for i in 0..count {
		if particles.len() >= ceiling {
			break;
		}

		let angle = i as f64 / count as f64 * TAU + (rng.r#gen::<f64>() - 0.5) * ANGLE_JITTER;
		let speed = config.burst_speed_min + rng.r#gen::<f64>() * config.burst_speed_range;

		particles.push(Particle {
			x,
			y,
			vx: angle.cos() * speed,
			vy: angle.sin() * speed,
			rot: rng.r#gen::<f64>() * 360.0,
			rot_speed: (rng.r#gen::<f64>() - 0.5) * 8.0,
			size: (0.3 + rng.r#gen::<f64>() * 0.4) * metrics.flake_size,
			alpha: 0.7 + rng.r#gen::<f64>() * 0.3,
			landed: false,
			burst_life: Some(config.burst_life.max(1)),
			sway_speed: 0.02 + rng.r#gen::<f64>() * 0.03,
			sway_offset: rng.r#gen::<f64>() * TAU,
		});
		added += 1;
	}
	added
}
