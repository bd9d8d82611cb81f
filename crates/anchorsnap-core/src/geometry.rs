//! Pure anchor geometry: anchor placement, nearest-anchor search, clamping,
//! overlap tests and release-velocity projection.
//!
//! Every function here is side-effect free. Sizes and points are in the
//! canvas coordinate space with the origin at the top-leading corner.

use crate::anchor::{Anchor, AnchorSet, Column, Row};
use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Margins between the canvas edges and the area anchors are computed in.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Insets {
    pub top: f64,
    pub leading: f64,
    pub bottom: f64,
    pub trailing: f64,
}

impl Insets {
    pub const ZERO: Insets = Insets::uniform(0.0);

    /// Create insets with an individual value per edge.
    pub const fn new(top: f64, leading: f64, bottom: f64, trailing: f64) -> Self {
        Self {
            top,
            leading,
            bottom,
            trailing,
        }
    }

    /// Create insets with the same value on every edge.
    pub const fn uniform(value: f64) -> Self {
        Self::new(value, value, value, value)
    }

    /// Sum of leading and trailing insets.
    pub fn horizontal(&self) -> f64 {
        self.leading + self.trailing
    }

    /// Sum of top and bottom insets.
    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }
}

/// An anchor together with the center point it resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnchorTarget {
    pub anchor: Anchor,
    pub position: Point,
}

/// Where an anchor sits along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AxisPlacement {
    Start,
    Middle,
    End,
}

impl From<Column> for AxisPlacement {
    fn from(column: Column) -> Self {
        match column {
            Column::Leading => AxisPlacement::Start,
            Column::Center => AxisPlacement::Middle,
            Column::Trailing => AxisPlacement::End,
        }
    }
}

impl From<Row> for AxisPlacement {
    fn from(row: Row) -> Self {
        match row {
            Row::Top => AxisPlacement::Start,
            Row::Center => AxisPlacement::Middle,
            Row::Bottom => AxisPlacement::End,
        }
    }
}

/// Center coordinate on one axis. Falls back to the canvas midpoint when
/// the content does not fit between the insets.
fn axis_position(
    placement: AxisPlacement,
    canvas: f64,
    content: f64,
    start_inset: f64,
    end_inset: f64,
) -> f64 {
    let available = canvas - content - start_inset - end_inset;
    if available < 0.0 {
        return canvas / 2.0;
    }
    match placement {
        AxisPlacement::Start => start_inset + content / 2.0,
        AxisPlacement::Middle => canvas / 2.0,
        AxisPlacement::End => canvas - end_inset - content / 2.0,
    }
}

/// Clamp a coordinate on one axis, or center it when the range is inverted.
fn axis_clamp(value: f64, canvas: f64, content: f64, start_inset: f64, end_inset: f64) -> f64 {
    let min = content / 2.0 + start_inset;
    let max = canvas - content / 2.0 - end_inset;
    if min > max {
        canvas / 2.0
    } else {
        value.clamp(min, max)
    }
}

/// Center point of `content` resting at `anchor` inside `canvas`.
pub fn anchor_position(anchor: Anchor, canvas: Size, content: Size, insets: Insets) -> Point {
    Point::new(
        axis_position(
            anchor.column().into(),
            canvas.width,
            content.width,
            insets.leading,
            insets.trailing,
        ),
        axis_position(
            anchor.row().into(),
            canvas.height,
            content.height,
            insets.top,
            insets.bottom,
        ),
    )
}

/// Positions of every anchor in `anchors`, in canonical order.
pub fn anchor_positions(
    anchors: AnchorSet,
    canvas: Size,
    content: Size,
    insets: Insets,
) -> Vec<AnchorTarget> {
    anchors
        .enabled_anchors()
        .into_iter()
        .map(|anchor| AnchorTarget {
            anchor,
            position: anchor_position(anchor, canvas, content, insets),
        })
        .collect()
}

/// The anchor in `anchors` whose position is closest to `point`.
///
/// Ties go to the anchor that comes first in canonical order. An empty set
/// resolves to [`Anchor::Center`] at the canvas midpoint.
pub fn nearest_anchor(
    point: Point,
    anchors: AnchorSet,
    canvas: Size,
    content: Size,
    insets: Insets,
) -> AnchorTarget {
    let mut best: Option<(AnchorTarget, f64)> = None;
    for target in anchor_positions(anchors, canvas, content, insets) {
        let dist = point.distance(target.position);
        match best {
            Some((_, best_dist)) if dist >= best_dist => {}
            _ => best = Some((target, dist)),
        }
    }

    match best {
        Some((target, _)) => target,
        None => AnchorTarget {
            anchor: Anchor::Center,
            position: Point::new(canvas.width / 2.0, canvas.height / 2.0),
        },
    }
}

/// Clamp `point` so that `content` centered on it stays inside the inset
/// canvas area. Axes where the content cannot fit are centered instead.
pub fn clamped(point: Point, canvas: Size, content: Size, insets: Insets) -> Point {
    Point::new(
        axis_clamp(point.x, canvas.width, content.width, insets.leading, insets.trailing),
        axis_clamp(point.y, canvas.height, content.height, insets.top, insets.bottom),
    )
}

/// Axis-aligned bounding box overlap of two centered items.
///
/// Touching edges do not count as overlapping.
pub fn items_overlap(a: Point, b: Point, size_a: Size, size_b: Size) -> bool {
    let dx = (a.x - b.x).abs();
    let dy = (a.y - b.y).abs();
    dx < (size_a.width + size_b.width) / 2.0 && dy < (size_a.height + size_b.height) / 2.0
}

/// Per-millisecond velocity retention used to project a released drag.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DecelerationRate(pub f64);

impl DecelerationRate {
    /// Standard scroll deceleration.
    pub const NORMAL: DecelerationRate = DecelerationRate(0.998);
    /// Faster stop, for short flings.
    pub const FAST: DecelerationRate = DecelerationRate(0.99);

    pub fn value(self) -> f64 {
        self.0
    }

    /// Whether the rate lies strictly between 0 and 1.
    pub fn is_valid(self) -> bool {
        self.0 > 0.0 && self.0 < 1.0
    }
}

impl Default for DecelerationRate {
    fn default() -> Self {
        Self::NORMAL
    }
}

/// Distance travelled by a release `velocity` (points per second) under
/// [`DecelerationRate::NORMAL`].
pub fn project(velocity: f64) -> f64 {
    project_with_rate(velocity, DecelerationRate::NORMAL)
}

/// Distance travelled by a release `velocity` under `rate`.
pub fn project_with_rate(velocity: f64, rate: DecelerationRate) -> f64 {
    let rate = rate.value();
    (velocity / 1000.0) * rate / (1.0 - rate)
}

/// `point` moved by the per-axis projection of `velocity`.
pub fn project_point(point: Point, velocity: Vec2, rate: DecelerationRate) -> Point {
    point
        + Vec2::new(
            project_with_rate(velocity.x, rate),
            project_with_rate(velocity.y, rate),
        )
}
