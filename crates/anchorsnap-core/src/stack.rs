//! Stack layouts for items sharing an anchor.
//!
//! When several items rest on the same anchor, a [`StackLayout`] turns each
//! item's depth within that group into a visual transform so the items do
//! not hide each other completely.

use crate::anchor::Anchor;
use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use std::fmt;

/// Smallest scale a cascade will shrink an item to.
pub const MIN_CASCADE_SCALE: f64 = 0.1;

/// Default cascade spacing in points.
pub const DEFAULT_CASCADE_SPACING: f64 = 20.0;

/// Visual adjustment applied on top of an item's base position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StackTransform {
    /// Translation from the base position.
    pub offset: Vec2,
    /// Rotation in radians, clockwise in y-down coordinates.
    pub rotation: f64,
    /// Uniform scale factor.
    pub scale: f64,
}

impl StackTransform {
    pub const IDENTITY: StackTransform = StackTransform {
        offset: Vec2::ZERO,
        rotation: 0.0,
        scale: 1.0,
    };

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Affine transform placing an item whose local origin is its center.
    ///
    /// The item is scaled and rotated about its center, then moved to
    /// `base + offset`.
    pub fn to_affine(&self, base: Point) -> Affine {
        Affine::translate(base.to_vec2() + self.offset)
            * Affine::rotate(self.rotation)
            * Affine::scale(self.scale)
    }
}

impl Default for StackTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Maps an item's depth within a shared-anchor group to a transform.
///
/// `depth` is the item's rank in the group (0 for the oldest arrival),
/// `count` the group size, and `anchor` the anchor the group rests on.
/// Implementations must return [`StackTransform::IDENTITY`] when
/// `count <= 1`.
pub trait StackLayout: fmt::Debug {
    fn transform(&self, depth: usize, count: usize, anchor: Anchor) -> StackTransform;
}

/// Offsets each deeper item further along the anchor's inward direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CascadeStackLayout {
    pub spacing: f64,
    /// Scale reduction per depth step. Zero keeps every item at full size.
    #[serde(default)]
    pub scale_step: f64,
}

impl CascadeStackLayout {
    pub fn new(spacing: f64) -> Self {
        Self {
            spacing,
            scale_step: 0.0,
        }
    }

    pub fn with_scale_step(mut self, scale_step: f64) -> Self {
        self.scale_step = scale_step;
        self
    }
}

impl Default for CascadeStackLayout {
    fn default() -> Self {
        Self::new(DEFAULT_CASCADE_SPACING)
    }
}

impl StackLayout for CascadeStackLayout {
    fn transform(&self, depth: usize, count: usize, anchor: Anchor) -> StackTransform {
        if count <= 1 || depth == 0 {
            return StackTransform::IDENTITY;
        }
        let d = depth as f64;
        StackTransform {
            offset: anchor.spread_direction() * (d * self.spacing),
            rotation: 0.0,
            scale: (1.0 - self.scale_step * d).max(MIN_CASCADE_SCALE),
        }
    }
}

/// Rotates items symmetrically around the middle of the group, like a hand
/// of cards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FanStackLayout {
    /// Rotation between neighbouring items, in radians.
    pub angle: f64,
}

impl FanStackLayout {
    pub fn new(angle: f64) -> Self {
        Self { angle }
    }

    pub fn from_degrees(degrees: f64) -> Self {
        Self::new(degrees.to_radians())
    }
}

impl StackLayout for FanStackLayout {
    fn transform(&self, depth: usize, count: usize, anchor: Anchor) -> StackTransform {
        if count <= 1 {
            return StackTransform::IDENTITY;
        }
        let sign = anchor.spread_direction().x;
        let centered = depth as f64 - (count - 1) as f64 / 2.0;
        StackTransform {
            rotation: centered * self.angle * sign,
            ..StackTransform::IDENTITY
        }
    }
}

/// Lays items out along a circular arc bulging toward the canvas center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArchStackLayout {
    pub radius: f64,
    /// Total angle covered by the arc, in radians.
    pub spread: f64,
}

impl ArchStackLayout {
    pub fn new(radius: f64, spread: f64) -> Self {
        Self { radius, spread }
    }
}

impl StackLayout for ArchStackLayout {
    fn transform(&self, depth: usize, count: usize, anchor: Anchor) -> StackTransform {
        if count <= 1 {
            return StackTransform::IDENTITY;
        }
        let dir = anchor.spread_direction();
        let fraction = depth as f64 / (count - 1) as f64 - 0.5;
        let theta = fraction * self.spread;
        StackTransform {
            offset: Vec2::new(
                self.radius * theta.sin() * dir.x,
                self.radius * (1.0 - theta.cos()) * dir.y,
            ),
            rotation: theta * dir.x,
            scale: 1.0,
        }
    }
}

/// Spaces items evenly around a full circle, starting along the anchor's
/// inward direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CircleStackLayout {
    pub radius: f64,
}

impl CircleStackLayout {
    pub fn new(radius: f64) -> Self {
        Self { radius }
    }
}

impl StackLayout for CircleStackLayout {
    fn transform(&self, depth: usize, count: usize, anchor: Anchor) -> StackTransform {
        if count <= 1 {
            return StackTransform::IDENTITY;
        }
        let start = anchor.spread_direction().atan2();
        let angle = start + TAU * depth as f64 / count as f64;
        StackTransform {
            offset: Vec2::from_angle(angle) * self.radius,
            ..StackTransform::IDENTITY
        }
    }
}

/// One of the built-in layouts, selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StackLayoutKind {
    Cascade(CascadeStackLayout),
    Fan(FanStackLayout),
    Arch(ArchStackLayout),
    Circle(CircleStackLayout),
}

impl StackLayoutKind {
    /// Whether every parameter is finite and non-negative.
    pub fn is_valid(&self) -> bool {
        let params = match self {
            StackLayoutKind::Cascade(c) => vec![c.spacing, c.scale_step],
            StackLayoutKind::Fan(f) => vec![f.angle],
            StackLayoutKind::Arch(a) => vec![a.radius, a.spread],
            StackLayoutKind::Circle(c) => vec![c.radius],
        };
        params.iter().all(|p| p.is_finite() && *p >= 0.0)
    }
}

impl Default for StackLayoutKind {
    fn default() -> Self {
        StackLayoutKind::Cascade(CascadeStackLayout::default())
    }
}

impl StackLayout for StackLayoutKind {
    fn transform(&self, depth: usize, count: usize, anchor: Anchor) -> StackTransform {
        match self {
            StackLayoutKind::Cascade(c) => c.transform(depth, count, anchor),
            StackLayoutKind::Fan(f) => f.transform(depth, count, anchor),
            StackLayoutKind::Arch(a) => a.transform(depth, count, anchor),
            StackLayoutKind::Circle(c) => c.transform(depth, count, anchor),
        }
    }
}

impl From<CascadeStackLayout> for StackLayoutKind {
    fn from(layout: CascadeStackLayout) -> Self {
        StackLayoutKind::Cascade(layout)
    }
}

impl From<FanStackLayout> for StackLayoutKind {
    fn from(layout: FanStackLayout) -> Self {
        StackLayoutKind::Fan(layout)
    }
}

impl From<ArchStackLayout> for StackLayoutKind {
    fn from(layout: ArchStackLayout) -> Self {
        StackLayoutKind::Arch(layout)
    }
}

impl From<CircleStackLayout> for StackLayoutKind {
    fn from(layout: CircleStackLayout) -> Self {
        StackLayoutKind::Circle(layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn all_layouts() -> Vec<StackLayoutKind> {
        vec![
            CascadeStackLayout::new(20.0).with_scale_step(0.05).into(),
            FanStackLayout::from_degrees(8.0).into(),
            ArchStackLayout::new(120.0, 1.0).into(),
            CircleStackLayout::new(40.0).into(),
        ]
    }

    #[test]
    fn test_single_item_is_identity() {
        for layout in all_layouts() {
            for anchor in Anchor::ALL {
                assert!(layout.transform(0, 1, anchor).is_identity(), "{layout:?} {anchor:?}");
            }
        }
    }

    #[test]
    fn test_cascade_offsets_along_inward_direction() {
        let layout = CascadeStackLayout::new(20.0);
        assert!(layout.transform(0, 3, Anchor::TopLeading).is_identity());

        let t = layout.transform(1, 3, Anchor::TopLeading);
        assert_eq!(t.offset, Vec2::new(20.0, 20.0));
        assert_eq!(t.scale, 1.0);

        let t = layout.transform(2, 3, Anchor::BottomTrailing);
        assert_eq!(t.offset, Vec2::new(-40.0, -40.0));

        // Center column falls back to +1 on x.
        let t = layout.transform(1, 2, Anchor::Bottom);
        assert_eq!(t.offset, Vec2::new(20.0, -20.0));
    }

    #[test]
    fn test_cascade_scale_step() {
        let layout = CascadeStackLayout::new(10.0).with_scale_step(0.1);
        assert!((layout.transform(2, 3, Anchor::Center).scale - 0.8).abs() < EPS);
        assert!((layout.transform(50, 51, Anchor::Center).scale - MIN_CASCADE_SCALE).abs() < EPS);
    }

    #[test]
    fn test_fan_is_symmetric() {
        let layout = FanStackLayout::new(0.1);
        let first = layout.transform(0, 3, Anchor::TopLeading);
        let middle = layout.transform(1, 3, Anchor::TopLeading);
        let last = layout.transform(2, 3, Anchor::TopLeading);
        assert!((first.rotation + 0.1).abs() < EPS);
        assert!(middle.rotation.abs() < EPS);
        assert!((last.rotation - 0.1).abs() < EPS);
        assert_eq!(first.offset, Vec2::ZERO);

        // Trailing anchors fan the other way.
        let mirrored = layout.transform(2, 3, Anchor::TopTrailing);
        assert!((mirrored.rotation + 0.1).abs() < EPS);

        // Even counts straddle the middle.
        let t = layout.transform(0, 2, Anchor::Center);
        assert!((t.rotation + 0.05).abs() < EPS);
    }

    #[test]
    fn test_arch_middle_has_no_offset() {
        let layout = ArchStackLayout::new(100.0, 1.2);
        let middle = layout.transform(1, 3, Anchor::Bottom);
        assert!(middle.offset.hypot() < EPS);
        assert!(middle.rotation.abs() < EPS);

        let left = layout.transform(0, 3, Anchor::Bottom);
        let right = layout.transform(2, 3, Anchor::Bottom);
        assert!((left.offset.x + right.offset.x).abs() < EPS);
        assert!((left.offset.y - right.offset.y).abs() < EPS);
        // Bottom anchors bulge upward.
        assert!(left.offset.y < 0.0);
        assert!((left.rotation + right.rotation).abs() < EPS);
    }

    #[test]
    fn test_circle_starts_along_inward_direction() {
        let layout = CircleStackLayout::new(40.0);
        let t = layout.transform(0, 4, Anchor::Leading);
        // Leading spreads toward (+1, +1).
        let expected = Vec2::new(1.0, 1.0).normalize() * 40.0;
        assert!((t.offset - expected).hypot() < EPS);

        let t = layout.transform(0, 4, Anchor::Trailing);
        assert!(t.offset.x < 0.0 && t.offset.y > 0.0);

        // Opposite side of the circle halfway through the group.
        let a = layout.transform(0, 4, Anchor::TopLeading);
        let b = layout.transform(2, 4, Anchor::TopLeading);
        assert!((a.offset + b.offset).hypot() < EPS);
        for depth in 0..4 {
            let t = layout.transform(depth, 4, Anchor::TopLeading);
            assert!((t.offset.hypot() - 40.0).abs() < EPS);
        }
    }

    #[test]
    fn test_to_affine() {
        let t = StackTransform {
            offset: Vec2::new(10.0, 0.0),
            rotation: 0.0,
            scale: 2.0,
        };
        let mapped = t.to_affine(Point::new(100.0, 100.0)) * Point::new(5.0, 5.0);
        assert!((mapped.x - 120.0).abs() < EPS);
        assert!((mapped.y - 110.0).abs() < EPS);
        assert_eq!(
            StackTransform::IDENTITY.to_affine(Point::new(3.0, 4.0)),
            Affine::translate(Vec2::new(3.0, 4.0))
        );
    }

    #[test]
    fn test_kind_serde() {
        let kind: StackLayoutKind =
            serde_json::from_str(r#"{ "kind": "cascade", "spacing": 12.0 }"#).unwrap();
        assert_eq!(kind, StackLayoutKind::Cascade(CascadeStackLayout::new(12.0)));

        let kind: StackLayoutKind =
            serde_json::from_str(r#"{ "kind": "arch", "radius": 80.0, "spread": 0.5 }"#).unwrap();
        assert_eq!(kind, ArchStackLayout::new(80.0, 0.5).into());
        assert!(kind.is_valid());

        assert!(!StackLayoutKind::from(CircleStackLayout::new(-1.0)).is_valid());
        assert!(!StackLayoutKind::from(FanStackLayout::new(f64::NAN)).is_valid());
    }
}
