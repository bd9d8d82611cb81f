//! AnchorSnap Core Library
//!
//! Geometry and state engine for items that snap to a fixed grid of anchor
//! points inside a canvas, with pluggable layouts for items that share an
//! anchor.

pub mod anchor;
pub mod config;
pub mod container;
pub mod drag;
pub mod geometry;
pub mod stack;

pub use anchor::{Anchor, AnchorError, AnchorSet, Column, Row};
pub use config::{ConfigError, ContainerConfig};
pub use container::{ItemId, ItemRecord, SnapContainer};
pub use drag::{DragOutcome, DragSession};
pub use geometry::{
    anchor_position, anchor_positions, clamped, items_overlap, nearest_anchor, project,
    project_point, project_with_rate, AnchorTarget, DecelerationRate, Insets,
};
pub use stack::{
    ArchStackLayout, CascadeStackLayout, CircleStackLayout, FanStackLayout, StackLayout,
    StackLayoutKind, StackTransform,
};
