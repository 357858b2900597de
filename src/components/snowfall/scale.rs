//! Viewport-proportional scaling for the snow field.
//!
//! This module centralizes every size- and count-dependent parameter so the
//! effect looks the same on a phone and on a 4K monitor.
//!
//! # Density Model
//!
//! - **Population** is proportional to surface *area*: a reference desktop
//!   resolution holds a reference particle count, and other surfaces get the
//!   same particles-per-pixel ratio.
//! - **Pile capacity** is proportional to surface *width*, so the settled pile
//!   reaches roughly the same visual height regardless of screen size.
//! - **Flake size** and **interaction radius** step down below a width
//!   threshold instead of scaling continuously, to stay legible.
//!
//! Both counts are then clamped into a [`DeviceBand`]; the mobile band is
//! tighter than the desktop one.

use super::config::{RenderQuality, SimulationConfig};

/// Population band selected for a surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceBand {
	Desktop,
	Mobile,
}

/// Clamping limits for one [`DeviceBand`].
#[derive(Clone, Debug)]
pub struct BandLimits {
	pub min_particles: usize,
	pub max_particles: usize,
	/// Pile capacity never drops below this while piling is enabled.
	pub min_pile: usize,
}

/// Reference densities and step thresholds for the scaler.
#[derive(Clone, Debug)]
pub struct ScaleConfig {
	/// Reference surface the particle ratio is calibrated against.
	pub reference_width: f64,
	pub reference_height: f64,
	/// Particles shown on the reference surface.
	pub reference_particles: f64,
	/// Pile particles per lateral pixel.
	pub pile_ratio: f64,
	/// Below this width the surface counts as narrow.
	pub narrow_width: f64,
	pub flake_size: f64,
	pub flake_size_narrow: f64,
	pub interaction_radius: f64,
	pub interaction_radius_narrow: f64,
	/// Below this height respawns are spread tighter.
	pub short_height: f64,
	pub respawn_spread: f64,
	pub respawn_spread_short: f64,
	pub desktop: BandLimits,
	pub mobile: BandLimits,
}

impl Default for ScaleConfig {
	fn default() -> Self {
		Self {
			reference_width: 1920.0,
			reference_height: 1080.0,
			reference_particles: 1500.0,
			pile_ratio: 0.47,
			narrow_width: 600.0,
			flake_size: 25.0,
			flake_size_narrow: 18.0,
			interaction_radius: 150.0,
			interaction_radius_narrow: 100.0,
			short_height: 800.0,
			respawn_spread: 1.5,
			respawn_spread_short: 1.2,
			desktop: BandLimits {
				min_particles: 300,
				max_particles: 1500,
				min_pile: 150,
			},
			mobile: BandLimits {
				min_particles: 150,
				max_particles: 600,
				min_pile: 80,
			},
		}
	}
}

impl ScaleConfig {
	pub fn limits(&self, band: DeviceBand) -> &BandLimits {
		match band {
			DeviceBand::Desktop => &self.desktop,
			DeviceBand::Mobile => &self.mobile,
		}
	}
}

/// Everything derived from the current surface size.
///
/// Recomputed from scratch on every resize; nothing here accumulates.
#[derive(Clone, Debug, PartialEq)]
pub struct SurfaceMetrics {
	pub width: f64,
	pub height: f64,
	/// Baseline population target.
	pub particle_count: usize,
	/// Settle capacity. Zero disables piling.
	pub max_pile_count: usize,
	pub flake_size: f64,
	pub interaction_radius: f64,
	/// How far above the top edge (in viewport heights) respawns may start.
	pub respawn_spread: f64,
	pub band: DeviceBand,
}

impl SurfaceMetrics {
	/// Derive metrics for a `width` × `height` surface. Pure and idempotent.
	pub fn compute(
		width: f64,
		height: f64,
		quality: RenderQuality,
		config: &SimulationConfig,
		scale: &ScaleConfig,
	) -> Self {
		let width = width.max(0.0);
		let height = height.max(0.0);
		let narrow = width < scale.narrow_width;
		let band = if quality.is_reduced() || narrow {
			DeviceBand::Mobile
		} else {
			DeviceBand::Desktop
		};
		let limits = scale.limits(band);

		let reference_area = scale.reference_width * scale.reference_height;
		let proportional = (width * height * scale.reference_particles / reference_area).floor();
		let particle_count =
			(proportional as usize).clamp(limits.min_particles, limits.max_particles);

		let max_pile_count = if config.piling_enabled {
			((width * scale.pile_ratio).floor() as usize).max(limits.min_pile)
		} else {
			0
		};

		let (flake_size, interaction_radius) = if narrow {
			(scale.flake_size_narrow, scale.interaction_radius_narrow)
		} else {
			(scale.flake_size, scale.interaction_radius)
		};

		let respawn_spread = if height < scale.short_height {
			scale.respawn_spread_short
		} else {
			scale.respawn_spread
		};

		Self {
			width,
			height,
			particle_count,
			max_pile_count,
			flake_size,
			interaction_radius,
			respawn_spread,
			band,
		}
	}

	pub fn piling(&self) -> bool {
		self.max_pile_count > 0
	}

	/// Hard population ceiling for burst spawning.
	pub fn overflow_ceiling(&self, overflow_factor: f64) -> usize {
		(self.particle_count as f64 * overflow_factor.max(1.0)).floor() as usize
	}
}
