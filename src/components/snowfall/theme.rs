//! Colors for the pointer effects drawn on top of the snow.

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Pointer trail and cursor styling.
#[derive(Clone, Debug)]
pub struct SnowTheme {
	/// Trail sample color; alpha is multiplied by the sample's own alpha.
	pub trail: Color,
	/// Cursor glow color.
	pub cursor: Color,
	/// Cursor glow radius in pixels.
	pub cursor_radius: f64,
	/// Glow radius multiplier while the pointer is pressed.
	pub cursor_pressed_scale: f64,
}

impl SnowTheme {
	/// Cold white glow (default)
	pub fn frost() -> Self {
		Self {
			trail: Color::rgba(220, 235, 255, 0.6),
			cursor: Color::rgba(235, 245, 255, 0.25),
			cursor_radius: 18.0,
			cursor_pressed_scale: 1.6,
		}
	}
}

impl Default for SnowTheme {
	fn default() -> Self {
		Self::frost()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn opaque_colors_use_hex() {
		assert_eq!(Color::rgb(255, 0, 16).to_css(), "#ff0010");
	}

	#[test]
	fn translucent_colors_use_rgba() {
		assert_eq!(
			Color::rgb(1, 2, 3).with_alpha(0.5).to_css(),
			"rgba(1, 2, 3, 0.5)"
		);
	}
}
