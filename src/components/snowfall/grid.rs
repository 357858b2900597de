//! Horizontal density histogram of settled snow.
//!
//! Rebuilt from scratch once per frame before any particle updates, so every
//! particle in a frame reads the same snapshot of the pile.

use super::particles::Particle;

/// Width of one density bin in pixels.
pub const GRID_SIZE: f64 = 25.0;

/// Density reported for bins off either edge of the surface.
///
/// Walls look infinitely full so pile material never flows off-screen.
pub const EDGE_DENSITY: u32 = u32::MAX;

/// Landed-particle counts per `GRID_SIZE`-wide strip of the surface.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DensityGrid {
	bins: Vec<u32>,
}

impl DensityGrid {
	pub fn new() -> Self {
		Self::default()
	}

	/// Bin index under a horizontal position. May be out of range.
	pub fn bin_of(x: f64) -> isize {
		(x / GRID_SIZE).floor() as isize
	}

	/// Zero every bin and recount landed particles inside `[0, width)`.
	pub fn rebuild(&mut self, particles: &[Particle], width: f64) {
		let bins = (width.max(0.0) / GRID_SIZE).ceil() as usize;
		self.bins.clear();
		self.bins.resize(bins, 0);

		for p in particles.iter().filter(|p| p.landed) {
			if p.x < 0.0 || p.x >= width {
				continue;
			}
			if let Some(count) = self.bins.get_mut(Self::bin_of(p.x) as usize) {
				*count += 1;
			}
		}
	}

	/// Count for `bin`, or [`EDGE_DENSITY`] when the bin is off-surface.
	pub fn density_at(&self, bin: isize) -> u32 {
		usize::try_from(bin)
			.ok()
			.and_then(|i| self.bins.get(i).copied())
			.unwrap_or(EDGE_DENSITY)
	}

	pub fn len(&self) -> usize {
		self.bins.len()
	}

	pub fn is_empty(&self) -> bool {
		self.bins.is_empty()
	}

	pub fn bins(&self) -> &[u32] {
		&self.bins
	}
}
