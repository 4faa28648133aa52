//! Pan + uniform-scale transform between screen pixels and world units.

use kurbo::{Affine, Point, Vec2};

/// Screen-from-world transform: `screen = world * k + (x, y)`.
///
/// Never persisted; a fresh canvas starts at identity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	/// Horizontal pan in screen pixels.
	pub x: f64,
	/// Vertical pan in screen pixels.
	pub y: f64,
	/// Scale factor, always finite and `> 0`.
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

impl ViewTransform {
	/// Map a screen point into world space using the current pan/scale.
	pub fn screen_to_world(&self, screen: Point) -> Point {
		Point::new((screen.x - self.x) / self.k, (screen.y - self.y) / self.k)
	}

	/// Map a world point onto the screen.
	#[cfg(test)]
	pub fn world_to_screen(&self, world: Point) -> Point {
		Point::new(world.x * self.k + self.x, world.y * self.k + self.y)
	}

	/// The transform as an affine matrix, for drawing.
	pub fn affine(&self) -> Affine {
		Affine::new([self.k, 0.0, 0.0, self.k, self.x, self.y])
	}

	/// Translate the view by a screen-space delta. Unbounded.
	pub fn pan(&mut self, delta: Vec2) {
		self.x += delta.x;
		self.y += delta.y;
	}

	/// Scale by `factor` while keeping the world point under `anchor` fixed on screen.
	///
	/// A step that would leave `k` non-finite or non-positive is dropped. With
	/// `limits` set, the new scale is clamped into `[min, max]`.
	pub fn zoom_at(&mut self, anchor: Point, factor: f64, limits: Option<(f64, f64)>) -> bool {
		let world = self.screen_to_world(anchor);
		let mut k = self.k * factor;
		if let Some((min, max)) = limits {
			k = k.clamp(min, max);
		}
		if !k.is_finite() || k <= 0.0 || !world.x.is_finite() || !world.y.is_finite() {
			return false;
		}
		self.k = k;
		self.x = anchor.x - world.x * k;
		self.y = anchor.y - world.y * k;
		true
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const EPS: f64 = 1e-9;

	fn close(a: Point, b: Point) -> bool {
		(a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS
	}

	#[test]
	fn identity_maps_points_to_themselves() {
		let view = ViewTransform::default();
		let p = Point::new(12.5, -4.0);
		assert_eq!(view.screen_to_world(p), p);
		assert_eq!(view.world_to_screen(p), p);
	}

	#[test]
	fn roundtrip_after_pan_and_zoom() {
		let mut view = ViewTransform::default();
		view.pan(Vec2::new(40.0, -15.0));
		assert!(view.zoom_at(Point::new(100.0, 80.0), 1.08, None));
		assert!(view.zoom_at(Point::new(-30.0, 5.0), 1.0 / 1.08, None));
		view.pan(Vec2::new(-3.0, 7.5));
		assert!(view.zoom_at(Point::new(250.0, 250.0), 3.0, None));

		for p in [
			Point::new(0.0, 0.0),
			Point::new(123.0, 456.0),
			Point::new(-78.25, 9.5),
		] {
			assert!(close(view.world_to_screen(view.screen_to_world(p)), p));
			assert!(close(view.screen_to_world(view.world_to_screen(p)), p));
		}
	}

	#[test]
	fn zoom_keeps_anchor_fixed() {
		let mut view = ViewTransform {
			x: 17.0,
			y: -9.0,
			k: 0.75,
		};
		let anchor = Point::new(320.0, 210.0);
		for factor in [1.08, 1.0 / 1.08, 2.5, 0.01] {
			let before = view.screen_to_world(anchor);
			assert!(view.zoom_at(anchor, factor, None));
			assert!(close(view.world_to_screen(before), anchor));
			assert!(close(view.screen_to_world(anchor), before));
		}
	}

	#[test]
	fn degenerate_factors_leave_view_untouched() {
		let mut view = ViewTransform::default();
		view.pan(Vec2::new(5.0, 5.0));
		let snapshot = view;
		assert!(!view.zoom_at(Point::new(1.0, 1.0), 0.0, None));
		assert!(!view.zoom_at(Point::new(1.0, 1.0), f64::INFINITY, None));
		assert!(!view.zoom_at(Point::new(1.0, 1.0), f64::NAN, None));
		assert_eq!(view, snapshot);
	}

	#[test]
	fn limits_clamp_scale() {
		let mut view = ViewTransform::default();
		view.zoom_at(Point::new(0.0, 0.0), 100.0, Some((0.5, 4.0)));
		assert_eq!(view.k, 4.0);
		view.zoom_at(Point::new(0.0, 0.0), 0.0001, Some((0.5, 4.0)));
		assert_eq!(view.k, 0.5);
	}

	#[test]
	fn affine_matches_world_to_screen() {
		let view = ViewTransform {
			x: 10.0,
			y: 20.0,
			k: 2.0,
		};
		let p = Point::new(3.0, 4.0);
		assert!(close(view.affine() * p, view.world_to_screen(p)));
	}
}
