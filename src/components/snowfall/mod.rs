//! Falling-snow canvas with self-leveling piles.
//!
//! Flakes fall under gravity with sway and friction, land on the bottom edge
//! and build a pile that flows sideways wherever it is taller than its
//! neighbors. The pointer pushes or pulls flakes, kicks landed ones back into
//! the air, and can spawn short-lived bursts and a glowing trail.
//!
//! The simulation core ([`SimulationEngine`]) is independent of the browser
//! and is driven by [`SnowfallCanvas`], which owns the canvas, input events
//! and the animation loop.
//!
//! # Example
//!
//! ```ignore
//! use snowdrift::{RenderQuality, SimulationConfig, SnowfallCanvas};
//!
//! view! {
//!     <SnowfallCanvas config=SimulationConfig::classic() quality=RenderQuality::Reduced />
//! }
//! ```

mod burst;
mod component;
pub mod config;
mod grid;
mod particles;
pub mod pointer;
mod render;
pub mod scale;
mod state;
pub mod theme;

pub use component::SnowfallCanvas;
pub use config::{PointerMode, Preset, RenderQuality, SimulationConfig, WallPolicy};
pub use particles::Particle;
pub use scale::{ScaleConfig, SurfaceMetrics};
pub use state::{SimulationEngine, SimulationState};
pub use theme::SnowTheme;
