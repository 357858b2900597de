//! Simulation tuning and feature switches.
//!
//! A single [`SimulationConfig`] drives every behavior of the engine. The
//! presets reproduce the distinct flavors of the effect (plain piling snow,
//! interactive drifting snow, pile-less blizzard) as data rather than as
//! separate engines.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Capability level of the host device.
///
/// Consulted by the scaler (population band), the renderer (trail detail) and
/// the engine (neighbor attraction). Nothing else branches on device class.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RenderQuality {
	#[default]
	Full,
	/// Constrained devices: tighter population band, flat trail, no clumping.
	Reduced,
}

impl RenderQuality {
	pub fn from_constrained(constrained: bool) -> Self {
		if constrained { Self::Reduced } else { Self::Full }
	}

	pub fn is_reduced(self) -> bool {
		self == Self::Reduced
	}
}

/// Direction of the pointer force on flying particles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PointerMode {
	#[default]
	Repel,
	Attract,
}

impl PointerMode {
	pub fn sign(self) -> f64 {
		match self {
			PointerMode::Repel => 1.0,
			PointerMode::Attract => -1.0,
		}
	}
}

/// What happens when a flying particle crosses a lateral edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WallPolicy {
	/// Reflect `vx` with damping and clamp inside the surface.
	#[default]
	Bounce,
	/// Re-enter from the opposite edge.
	Wrap,
}

/// Named starting points for a configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Preset {
	Classic,
	#[default]
	Drift,
	Blizzard,
}

impl Preset {
	pub fn config(self) -> SimulationConfig {
		match self {
			Preset::Classic => SimulationConfig::classic(),
			Preset::Drift => SimulationConfig::drift(),
			Preset::Blizzard => SimulationConfig::blizzard(),
		}
	}
}

/// Every tunable of the simulation. Units are pixels and frames.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SimulationConfig {
	/// Particles may settle on the floor and form a pile.
	pub piling_enabled: bool,
	/// Pointer-down spawns a radial burst.
	pub burst_enabled: bool,
	/// Pointer movement leaves a force-carrying trail.
	pub trail_enabled: bool,
	/// Occasional weak attraction between nearby particles (clumping).
	pub neighbor_attraction_enabled: bool,

	pub gravity: f64,
	pub terminal_velocity: f64,
	/// `vx` multiplier applied above `friction_threshold`.
	pub friction_fast: f64,
	/// `vx` multiplier applied at or below `friction_threshold`.
	pub friction_slow: f64,
	pub friction_threshold: f64,
	pub sway_amplitude: f64,
	/// Sway only applies while `|vx|` stays under this.
	pub sway_velocity_limit: f64,
	pub max_rot_speed: f64,

	pub pointer_mode: PointerMode,
	pub pointer_force: f64,
	/// Force multiplier while the pointer is pressed.
	pub press_multiplier: f64,
	/// Minimum proximity force that flings a landed particle.
	pub kick_threshold: f64,
	pub kick_impulse_min: f64,
	pub kick_impulse_range: f64,
	pub kick_scatter: f64,

	pub wall_policy: WallPolicy,
	pub wall_damping: f64,

	/// A full pile still accepts a particle when its bin holds fewer than this.
	pub hole_fill_threshold: u32,
	pub flow_threshold: u32,
	pub flow_speed: f64,
	/// Randomize flow magnitude so neighbors don't move in lockstep.
	pub flow_jitter: bool,

	pub burst_count: usize,
	/// Frames a burst particle keeps its burst physics.
	pub burst_life: u32,
	pub burst_speed_min: f64,
	pub burst_speed_range: f64,
	pub burst_gravity_scale: f64,
	pub burst_drag: f64,
	/// Bursts stop once population reaches `particle_count * overflow_factor`.
	pub overflow_factor: f64,

	/// Per-particle, per-frame chance of scanning for neighbors.
	pub attraction_probability: f64,
	pub clump_radius: f64,
	pub attraction_strength: f64,

	pub trail_length: usize,
	pub trail_alpha_decay: f64,
	pub trail_size_decay: f64,
	pub trail_radius: f64,
	pub trail_force: f64,

	/// Mouse events within this window after a touch are ignored.
	pub touch_cooldown_ms: f64,
}

impl SimulationConfig {
	/// Piling snow with liquid self-leveling and nothing else.
	pub fn classic() -> Self {
		Self {
			piling_enabled: true,
			burst_enabled: false,
			trail_enabled: false,
			neighbor_attraction_enabled: false,

			gravity: 0.35,
			terminal_velocity: 8.0,
			friction_fast: 0.95,
			friction_slow: 0.995,
			friction_threshold: 1.0,
			sway_amplitude: 0.5,
			sway_velocity_limit: 2.0,
			max_rot_speed: 10.0,

			pointer_mode: PointerMode::Repel,
			pointer_force: 0.5,
			press_multiplier: 1.0,
			kick_threshold: 0.1,
			kick_impulse_min: 5.0,
			kick_impulse_range: 3.0,
			kick_scatter: 3.0,

			wall_policy: WallPolicy::Bounce,
			wall_damping: 0.8,

			hole_fill_threshold: 2,
			flow_threshold: 2,
			flow_speed: 1.5,
			flow_jitter: true,

			burst_count: 12,
			burst_life: 90,
			burst_speed_min: 2.0,
			burst_speed_range: 4.0,
			burst_gravity_scale: 0.3,
			burst_drag: 0.96,
			overflow_factor: 1.5,

			attraction_probability: 0.01,
			clump_radius: 30.0,
			attraction_strength: 0.002,

			trail_length: 20,
			trail_alpha_decay: 0.9,
			trail_size_decay: 0.95,
			trail_radius: 80.0,
			trail_force: 0.05,

			touch_cooldown_ms: 600.0,
		}
	}

	/// Interactive snow: piles, bursts on click, pointer trail and clumping.
	pub fn drift() -> Self {
		Self {
			burst_enabled: true,
			trail_enabled: true,
			neighbor_attraction_enabled: true,
			press_multiplier: 2.0,
			..Self::classic()
		}
	}

	/// No pile: flakes fall through the floor and respawn above.
	pub fn blizzard() -> Self {
		Self {
			piling_enabled: false,
			burst_enabled: true,
			trail_enabled: true,
			wall_policy: WallPolicy::Wrap,
			gravity: 0.3,
			press_multiplier: 2.0,
			pointer_force: 0.7,
			..Self::classic()
		}
	}

	/// Parses a JSON object of overrides on top of a preset.
	///
	/// An optional `"preset"` key picks the base; every other key replaces
	/// the matching field. Unknown keys are ignored.
	pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
		let mut overrides: Map<String, Value> = serde_json::from_str(text)?;
		let preset = match overrides.remove("preset") {
			Some(value) => serde_json::from_value(value)?,
			None => Preset::default(),
		};

		let mut base = serde_json::to_value(preset.config())?;
		if let Value::Object(ref mut fields) = base {
			fields.extend(overrides);
		}
		let config: Self = serde_json::from_value(base)?;
		Ok(config.sanitized())
	}

	/// Force every value into the range the simulation relies on.
	///
	/// Limits become non-negative magnitudes, chances and decay factors land
	/// in `[0, 1]`, and non-finite numbers fall back to zero.
	pub fn sanitized(self) -> Self {
		Self {
			gravity: finite(self.gravity),
			terminal_velocity: magnitude(self.terminal_velocity),
			friction_fast: unit(self.friction_fast),
			friction_slow: unit(self.friction_slow),
			friction_threshold: magnitude(self.friction_threshold),
			sway_amplitude: finite(self.sway_amplitude),
			sway_velocity_limit: magnitude(self.sway_velocity_limit),
			max_rot_speed: magnitude(self.max_rot_speed),

			pointer_force: finite(self.pointer_force),
			press_multiplier: finite(self.press_multiplier),
			kick_threshold: finite(self.kick_threshold),
			kick_impulse_min: magnitude(self.kick_impulse_min),
			kick_impulse_range: magnitude(self.kick_impulse_range),
			kick_scatter: magnitude(self.kick_scatter),

			wall_damping: magnitude(self.wall_damping),
			flow_speed: magnitude(self.flow_speed),

			burst_speed_min: magnitude(self.burst_speed_min),
			burst_speed_range: magnitude(self.burst_speed_range),
			burst_gravity_scale: finite(self.burst_gravity_scale),
			burst_drag: unit(self.burst_drag),
			overflow_factor: finite(self.overflow_factor).max(1.0),

			attraction_probability: unit(self.attraction_probability),
			clump_radius: magnitude(self.clump_radius),
			attraction_strength: finite(self.attraction_strength),

			trail_length: self.trail_length.min(MAX_TRAIL_LENGTH),
			trail_alpha_decay: unit(self.trail_alpha_decay),
			trail_size_decay: unit(self.trail_size_decay),
			trail_radius: magnitude(self.trail_radius),
			trail_force: finite(self.trail_force),

			touch_cooldown_ms: magnitude(self.touch_cooldown_ms),
			..self
		}
	}
}

/// Upper bound on trail samples kept per frame.
const MAX_TRAIL_LENGTH: usize = 200;

fn finite(v: f64) -> f64 {
	if v.is_finite() { v } else { 0.0 }
}

fn magnitude(v: f64) -> f64 {
	finite(v).abs()
}

fn unit(v: f64) -> f64 {
	finite(v).clamp(0.0, 1.0)
}

impl Default for SimulationConfig {
	fn default() -> Self {
		Self::drift()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn overrides_apply_on_top_of_preset() {
		let json = r#"{ "preset": "blizzard", "gravity": 0.5, "flowSpeed": 2.0 }"#;
		let config = SimulationConfig::from_json(json).unwrap();

		assert!(!config.piling_enabled);
		assert_eq!(config.wall_policy, WallPolicy::Wrap);
		assert_eq!(config.gravity, 0.5);
		assert_eq!(config.flow_speed, 2.0);
	}

	#[test]
	fn missing_preset_uses_default() {
		let config = SimulationConfig::from_json("{}").unwrap();
		assert_eq!(config, SimulationConfig::default());
	}

	#[test]
	fn bad_preset_is_an_error() {
		assert!(SimulationConfig::from_json(r#"{ "preset": "tornado" }"#).is_err());
		assert!(SimulationConfig::from_json("[1, 2]").is_err());
	}

	#[test]
	fn negative_limits_become_magnitudes() {
		let config = SimulationConfig::from_json(
			r#"{ "terminalVelocity": -3, "maxRotSpeed": -4, "attractionProbability": 7 }"#,
		)
		.unwrap();
		assert_eq!(config.terminal_velocity, 3.0);
		assert_eq!(config.max_rot_speed, 4.0);
		assert_eq!(config.attraction_probability, 1.0);
	}

	#[test]
	fn sanitizing_presets_changes_nothing() {
		for config in [
			SimulationConfig::classic(),
			SimulationConfig::drift(),
			SimulationConfig::blizzard(),
		] {
			assert_eq!(config.clone().sanitized(), config);
		}
	}

	#[test]
	fn non_finite_values_fall_back_to_zero() {
		let config = SimulationConfig {
			gravity: f64::NAN,
			terminal_velocity: f64::INFINITY,
			overflow_factor: f64::NAN,
			..SimulationConfig::drift()
		}
		.sanitized();
		assert_eq!(config.gravity, 0.0);
		assert_eq!(config.terminal_velocity, 0.0);
		assert_eq!(config.overflow_factor, 1.0);
	}

	#[test]
	fn enum_fields_use_camel_case() {
		let config =
			SimulationConfig::from_json(r#"{ "pointerMode": "attract", "wallPolicy": "wrap" }"#)
				.unwrap();
		assert_eq!(config.pointer_mode, PointerMode::Attract);
		assert_eq!(config.wall_policy, WallPolicy::Wrap);
	}
}
