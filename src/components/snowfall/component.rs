//! Leptos component hosting the snow simulation on a full-viewport canvas.
//!
//! The snowflake sprite is loaded first; the engine and the
//! `requestAnimationFrame` loop start only once it is ready. Mouse and touch
//! events feed the engine's pointer entry points, and window resizes are
//! debounced before the surface is rescaled.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement, MouseEvent, TouchEvent, Window,
};

use super::config::{RenderQuality, SimulationConfig};
use super::pointer::InputSource;
use super::render::{self, Sprite};
use super::state::SimulationEngine;
use super::theme::SnowTheme;

/// Quiet period after the last resize event before the surface is rescaled.
const RESIZE_DEBOUNCE_MS: i32 = 150;

/// Window events that change the drawing surface size.
const RESIZE_EVENTS: [&str; 2] = ["resize", "orientationchange"];

/// Engine plus everything needed to draw it.
struct SnowContext {
	engine: SimulationEngine,
	ctx: CanvasRenderingContext2d,
	sprite: Sprite,
	theme: SnowTheme,
}

type SharedClosure = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Shared handles the browser callbacks close over.
#[derive(Clone, Default)]
struct Handles {
	context: Rc<RefCell<Option<SnowContext>>>,
	animate: SharedClosure,
	on_load: SharedClosure,
	on_error: SharedClosure,
	on_resize: SharedClosure,
	debounced_resize: SharedClosure,
	pending_resize: Rc<Cell<Option<i32>>>,
	frame_request: Rc<Cell<Option<i32>>>,
}

/// Renders falling, piling snow over the whole viewport.
///
/// Nothing is simulated until `sprite_src` has loaded. Setting `stopped` to
/// `true` halts the loop and detaches the window listeners; it cannot be
/// restarted afterwards.
#[component]
pub fn SnowfallCanvas(
	#[prop(optional)] config: SimulationConfig,
	#[prop(default = RenderQuality::Full)] quality: RenderQuality,
	#[prop(optional)] theme: SnowTheme,
	#[prop(into, default = "/snowflake.png".to_string())] sprite_src: String,
	#[prop(into, default = Signal::stored(false))] stopped: Signal<bool>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let handles = Handles::default();
	let handles_init = handles.clone();

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			warn!("snowdrift: no window, snow disabled");
			return;
		};

		let (w, h) = viewport_size(&window);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx = match context_2d(&canvas) {
			Ok(ctx) => ctx,
			Err(e) => {
				warn!("snowdrift: canvas 2d context unavailable: {:?}", e);
				return;
			}
		};
		let image = match HtmlImageElement::new() {
			Ok(image) => image,
			Err(e) => {
				warn!("snowdrift: cannot create sprite image: {:?}", e);
				return;
			}
		};

		let (handles_load, image_load) = (handles_init.clone(), image.clone());
		let (config, theme, canvas_load) = (config.clone(), theme.clone(), canvas.clone());
		*handles_init.on_load.borrow_mut() = Some(Closure::new(move || {
			if stopped.get_untracked() || handles_load.context.borrow().is_some() {
				return;
			}
			let Some(window) = web_sys::window() else {
				return;
			};
			let Some(document) = window.document() else {
				return;
			};
			let sprite = match Sprite::from_image(&document, &image_load) {
				Ok(sprite) => sprite,
				Err(e) => {
					warn!("snowdrift: sprite buffer failed: {:?}", e);
					return;
				}
			};

			let (w, h) = viewport_size(&window);
			*handles_load.context.borrow_mut() = Some(SnowContext {
				engine: SimulationEngine::new(config.clone(), quality, w, h),
				ctx: ctx.clone(),
				sprite,
				theme: theme.clone(),
			});
			install_resize(&window, &canvas_load, &handles_load);
			start_animation(&window, &handles_load);
		}));

		let src = sprite_src.clone();
		*handles_init.on_error.borrow_mut() = Some(Closure::new(move || {
			warn!("snowdrift: sprite {} failed to load, snow disabled", src);
		}));

		if let Some(ref cb) = *handles_init.on_load.borrow() {
			image.set_onload(Some(cb.as_ref().unchecked_ref()));
		}
		if let Some(ref cb) = *handles_init.on_error.borrow() {
			image.set_onerror(Some(cb.as_ref().unchecked_ref()));
		}
		image.set_src(&sprite_src);
	});

	let handles_stop = handles.clone();
	Effect::new(move |_| {
		if stopped.get() {
			shutdown(&handles_stop);
		}
	});

	let context_mm = handles.context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = local_position(canvas_ref, ev.client_x(), ev.client_y()) else {
			return;
		};
		if let Some(ref mut c) = *context_mm.borrow_mut() {
			c.engine.pointer_move(x, y, InputSource::Mouse, js_sys::Date::now());
		}
	};

	let context_md = handles.context.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = local_position(canvas_ref, ev.client_x(), ev.client_y()) else {
			return;
		};
		if let Some(ref mut c) = *context_md.borrow_mut() {
			c.engine.pointer_down(x, y, InputSource::Mouse, js_sys::Date::now());
		}
	};

	let context_mu = handles.context.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_mu.borrow_mut() {
			c.engine.pointer_up();
		}
	};

	let context_ml = handles.context.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_ml.borrow_mut() {
			c.engine.pointer_leave();
		}
	};

	let context_ts = handles.context.clone();
	let on_touchstart = move |ev: TouchEvent| {
		ev.prevent_default();
		let Some((x, y)) = first_touch(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_ts.borrow_mut() {
			c.engine.pointer_down(x, y, InputSource::Touch, js_sys::Date::now());
		}
	};

	let context_tm = handles.context.clone();
	let on_touchmove = move |ev: TouchEvent| {
		ev.prevent_default();
		let Some((x, y)) = first_touch(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_tm.borrow_mut() {
			c.engine.pointer_move(x, y, InputSource::Touch, js_sys::Date::now());
		}
	};

	// A lifted finger leaves no pointer behind.
	let context_te = handles.context.clone();
	let on_touchend = move |ev: TouchEvent| {
		ev.prevent_default();
		if let Some(ref mut c) = *context_te.borrow_mut() {
			c.engine.touch_end(js_sys::Date::now());
		}
	};

	let context_tc = handles.context.clone();
	let on_touchcancel = move |_: TouchEvent| {
		if let Some(ref mut c) = *context_tc.borrow_mut() {
			c.engine.touch_end(js_sys::Date::now());
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="snowfall-canvas"
			on:mousemove=on_mousemove
			on:mousedown=on_mousedown
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:touchstart=on_touchstart
			on:touchmove=on_touchmove
			on:touchend=on_touchend
			on:touchcancel=on_touchcancel
			style="position: fixed; inset: 0; display: block; touch-action: none;"
		/>
	}
}

fn viewport_size(window: &Window) -> (f64, f64) {
	let dimension = |v: Result<JsValue, JsValue>, fallback: f64| {
		v.ok().and_then(|v| v.as_f64()).unwrap_or(fallback)
	};
	(
		dimension(window.inner_width(), 800.0),
		dimension(window.inner_height(), 600.0),
	)
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, JsValue> {
	Ok(canvas
		.get_context("2d")?
		.ok_or("2d context unavailable")?
		.dyn_into()?)
}

/// Converts client coordinates into canvas-local ones.
fn local_position(
	canvas_ref: NodeRef<leptos::html::Canvas>,
	client_x: i32,
	client_y: i32,
) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		client_x as f64 - rect.left(),
		client_y as f64 - rect.top(),
	))
}

fn first_touch(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &TouchEvent) -> Option<(f64, f64)> {
	let touch = ev.touches().get(0)?;
	local_position(canvas_ref, touch.client_x(), touch.client_y())
}

fn install_resize(window: &Window, canvas: &HtmlCanvasElement, handles: &Handles) {
	let (context, pending, canvas) = (
		handles.context.clone(),
		handles.pending_resize.clone(),
		canvas.clone(),
	);
	*handles.debounced_resize.borrow_mut() = Some(Closure::new(move || {
		pending.set(None);
		let Some(window) = web_sys::window() else {
			return;
		};
		let (w, h) = viewport_size(&window);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);
		if let Some(ref mut c) = *context.borrow_mut() {
			c.engine.resize(w, h);
		}
	}));

	let (debounced, pending) = (handles.debounced_resize.clone(), handles.pending_resize.clone());
	*handles.on_resize.borrow_mut() = Some(Closure::new(move || {
		let Some(window) = web_sys::window() else {
			return;
		};
		if let Some(id) = pending.take() {
			window.clear_timeout_with_handle(id);
		}
		if let Some(ref cb) = *debounced.borrow() {
			match window.set_timeout_with_callback_and_timeout_and_arguments_0(
				cb.as_ref().unchecked_ref(),
				RESIZE_DEBOUNCE_MS,
			) {
				Ok(id) => pending.set(Some(id)),
				Err(e) => warn!("snowdrift: resize timer failed: {:?}", e),
			}
		}
	}));

	if let Some(ref cb) = *handles.on_resize.borrow() {
		for event in RESIZE_EVENTS {
			let _ = window.add_event_listener_with_callback(event, cb.as_ref().unchecked_ref());
		}
	}
}

fn start_animation(window: &Window, handles: &Handles) {
	let (context, animate_inner, frame_request) = (
		handles.context.clone(),
		handles.animate.clone(),
		handles.frame_request.clone(),
	);
	*handles.animate.borrow_mut() = Some(Closure::new(move || {
		frame_request.set(None);
		let mut running = false;
		if let Some(ref mut c) = *context.borrow_mut() {
			c.engine.step();
			render::render(&c.engine, &c.ctx, Some(&c.sprite), &c.theme);
			running = c.engine.is_running();
		}
		if !running {
			return;
		}
		if let (Some(cb), Some(window)) = (&*animate_inner.borrow(), web_sys::window()) {
			if let Ok(id) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
				frame_request.set(Some(id));
			}
		}
	}));

	if let Some(ref cb) = *handles.animate.borrow() {
		match window.request_animation_frame(cb.as_ref().unchecked_ref()) {
			Ok(id) => {
				handles.frame_request.set(Some(id));
				info!("snowdrift: animation started");
			}
			Err(e) => warn!("snowdrift: requestAnimationFrame failed: {:?}", e),
		}
	}
}

fn shutdown(handles: &Handles) {
	if let Some(ref mut c) = *handles.context.borrow_mut() {
		c.engine.stop();
	}
	let Some(window) = web_sys::window() else {
		return;
	};
	if let Some(id) = handles.frame_request.take() {
		let _ = window.cancel_animation_frame(id);
	}
	if let Some(id) = handles.pending_resize.take() {
		window.clear_timeout_with_handle(id);
	}
	if let Some(ref cb) = *handles.on_resize.borrow() {
		for event in RESIZE_EVENTS {
			let _ = window.remove_event_listener_with_callback(event, cb.as_ref().unchecked_ref());
		}
	}
	debug!("snowdrift: host callbacks detached");
}
