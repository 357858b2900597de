//! Canvas rendering for the snow field.
//!
//! The surface is cleared and fully redrawn every frame:
//! 1. Snowflakes (sprite, rotated and scaled per particle)
//! 2. Pointer trail
//! 3. Cursor glow

use std::f64::consts::PI;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlImageElement};

use super::config::RenderQuality;
use super::state::SimulationEngine;
use super::theme::{Color, SnowTheme};

/// Edge length the sprite is pre-rendered at, in pixels.
const SPRITE_RESOLUTION: u32 = 25;

/// The snowflake image pre-rendered once into an offscreen buffer.
pub struct Sprite {
	canvas: HtmlCanvasElement,
}

impl Sprite {
	/// Rasterize a loaded image into a fixed-size offscreen canvas.
	pub fn from_image(document: &Document, image: &HtmlImageElement) -> Result<Self, JsValue> {
		let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
		canvas.set_width(SPRITE_RESOLUTION);
		canvas.set_height(SPRITE_RESOLUTION);

		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")?
			.ok_or("2d context unavailable for sprite buffer")?
			.dyn_into()?;
		let edge = SPRITE_RESOLUTION as f64;
		ctx.draw_image_with_html_image_element_and_dw_and_dh(image, 0.0, 0.0, edge, edge)?;

		Ok(Self { canvas })
	}
}

/// Renders one complete frame.
///
/// Without a sprite the flakes are skipped; the rest of the frame still draws.
pub fn render(
	engine: &SimulationEngine,
	ctx: &CanvasRenderingContext2d,
	sprite: Option<&Sprite>,
	theme: &SnowTheme,
) {
	let metrics = engine.metrics();
	ctx.clear_rect(0.0, 0.0, metrics.width, metrics.height);

	if let Some(sprite) = sprite {
		draw_particles(engine, ctx, sprite);
	}

	if engine.config().trail_enabled {
		draw_trail(engine, ctx, theme);
		draw_cursor(engine, ctx, theme);
	}
}

fn draw_particles(engine: &SimulationEngine, ctx: &CanvasRenderingContext2d, sprite: &Sprite) {
	let burst_life = engine.config().burst_life.max(1) as f64;

	for p in engine.particles() {
		// Bursts fade out over their last stretch of life.
		let fade = p
			.burst_life
			.map_or(1.0, |life| (life as f64 / burst_life * 2.0).min(1.0));

		ctx.save();
		let _ = ctx.translate(p.x, p.y);
		let _ = ctx.rotate(p.rot.to_radians());
		ctx.set_global_alpha(p.alpha * fade);
		let _ = ctx.draw_image_with_html_canvas_element_and_dw_and_dh(
			&sprite.canvas,
			-p.size / 2.0,
			-p.size / 2.0,
			p.size,
			p.size,
		);
		ctx.restore();
	}
	ctx.set_global_alpha(1.0);
}

fn draw_trail(engine: &SimulationEngine, ctx: &CanvasRenderingContext2d, theme: &SnowTheme) {
	let trail = &engine.state().pointer.trail;

	match engine.quality() {
		RenderQuality::Full => {
			for s in trail.iter() {
				let color = theme.trail.with_alpha(theme.trail.a * s.alpha);
				let gradient = ctx.create_radial_gradient(s.x, s.y, 0.0, s.x, s.y, s.size);
				let Ok(gradient) = gradient else {
					continue;
				};
				let _ = gradient.add_color_stop(0.0, &color.to_css());
				let _ = gradient.add_color_stop(1.0, &color.with_alpha(0.0).to_css());

				ctx.begin_path();
				let _ = ctx.arc(s.x, s.y, s.size, 0.0, 2.0 * PI);
				ctx.set_fill_style(&gradient);
				ctx.fill();
			}
		}
		RenderQuality::Reduced => {
			for s in trail.iter() {
				fill_circle(
					ctx,
					s.x,
					s.y,
					s.size * 0.5,
					theme.trail.with_alpha(theme.trail.a * s.alpha),
				);
			}
		}
	}
}

fn draw_cursor(engine: &SimulationEngine, ctx: &CanvasRenderingContext2d, theme: &SnowTheme) {
	let pointer = &engine.state().pointer.state;
	if pointer.is_parked() {
		return;
	}

	let radius = if pointer.pressed {
		theme.cursor_radius * theme.cursor_pressed_scale
	} else {
		theme.cursor_radius
	};
	fill_circle(ctx, pointer.x, pointer.y, radius, theme.cursor);
}

fn fill_circle(ctx: &CanvasRenderingContext2d, x: f64, y: f64, radius: f64, color: Color) {
	ctx.set_fill_style_str(&color.to_css());
	ctx.begin_path();
	let _ = ctx.arc(x, y, radius.max(0.0), 0.0, 2.0 * PI);
	ctx.fill();
}
