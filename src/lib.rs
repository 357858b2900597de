//! snowdrift: interactive falling-snow canvas with self-leveling snow piles.
//!
//! This crate provides a WASM-based component that renders snow drifting over
//! the page, piling up along the bottom edge and reacting to mouse and touch.

#[cfg(target_arch = "wasm32")]
use getrandom as _;
use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::snowfall::{
	PointerMode, Preset, RenderQuality, SimulationConfig, SimulationEngine, SnowTheme,
	SnowfallCanvas, SurfaceMetrics, WallPolicy,
};

/// User-agent fragments that identify phones and tablets.
const MOBILE_AGENTS: [&str; 5] = ["android", "iphone", "ipad", "ipod", "mobile"];

/// Machines with this many logical cores or fewer are treated as constrained.
const CONSTRAINED_CORES: f64 = 4.0;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("snowdrift: logging initialized");
}

/// Load simulation settings from a script element with id="snow-config".
///
/// Expected format: JSON object with an optional `"preset"` key plus any
/// camelCase field overrides. Missing or malformed config yields `None`.
fn load_snow_config() -> Option<SimulationConfig> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("snow-config")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match SimulationConfig::from_json(&json_text) {
		Ok(config) => {
			info!(
				"snowdrift: loaded config (piling: {}, bursts: {}, trail: {})",
				config.piling_enabled, config.burst_enabled, config.trail_enabled
			);
			Some(config)
		}
		Err(e) => {
			warn!("snowdrift: failed to parse snow config: {}", e);
			None
		}
	}
}

/// Whether a device should run at reduced quality.
fn is_constrained(user_agent: &str, hardware_concurrency: f64) -> bool {
	let agent = user_agent.to_ascii_lowercase();
	let mobile = MOBILE_AGENTS.iter().any(|m| agent.contains(m));
	let low_cores = hardware_concurrency > 0.0 && hardware_concurrency <= CONSTRAINED_CORES;
	mobile || low_cores
}

/// Classify the current browser as full or reduced render quality.
pub fn detect_render_quality() -> RenderQuality {
	let Some(window) = web_sys::window() else {
		return RenderQuality::Full;
	};
	let navigator = window.navigator();
	let agent = navigator.user_agent().unwrap_or_default();
	let quality = RenderQuality::from_constrained(is_constrained(
		&agent,
		navigator.hardware_concurrency(),
	));
	info!("snowdrift: render quality {:?}", quality);
	quality
}

/// Main application component.
/// Loads settings from the DOM and renders the snow over the whole page.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = load_snow_config().unwrap_or_default();
	let quality = detect_render_quality();

	view! {
		<Html attr:lang="en" attr:dir="ltr" />
		<Title text="Snowdrift" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<SnowfallCanvas config=config quality=quality />
	}
}
