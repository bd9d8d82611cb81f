//! Scenario files and their replay against a container.
//!
//! A scenario is JSON with the container configuration and a list of steps:
//! ```json
//! {
//!   "config": { "anchors": 325, "layout": { "kind": "cascade", "spacing": 20.0 } },
//!   "steps": [
//!     { "type": "resize", "size": { "width": 800.0, "height": 600.0 } },
//!     { "type": "register", "id": "a", "size": { "width": 100.0, "height": 100.0 }, "anchor": "top_leading" },
//!     { "type": "drag", "id": "a", "translation": { "x": 600.0, "y": 0.0 }, "velocity": { "x": 0.0, "y": 0.0 } }
//!   ]
//! }
//! ```

use anchorsnap_core::{
    Anchor, AnchorError, ConfigError, ContainerConfig, DragSession, SnapContainer, StackTransform,
};
use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors from loading or replaying a scenario.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid scenario: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// An anchor written by name in scenario files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct AnchorName(pub Anchor);

impl TryFrom<String> for AnchorName {
    type Error = AnchorError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        name.parse().map(AnchorName)
    }
}

/// One operation applied to the container.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Step {
    Register {
        id: String,
        size: Size,
        anchor: AnchorName,
    },
    Unregister {
        id: String,
    },
    UpdateAnchor {
        id: String,
        anchor: AnchorName,
    },
    Resize {
        size: Size,
    },
    /// Full drag gesture: start, move by `translation`, release at `velocity`.
    Drag {
        id: String,
        translation: Vec2,
        #[serde(default)]
        velocity: Vec2,
    },
    BringToFront {
        id: String,
    },
    SetPosition {
        id: String,
        position: Point,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub config: ContainerConfig,
    pub steps: Vec<Step>,
}

impl Scenario {
    pub fn from_json(json: &str) -> Result<Self, CliError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CliError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

/// Final state of one item.
#[derive(Debug, Clone, Serialize)]
pub struct ItemReport {
    pub id: String,
    pub anchor: Anchor,
    pub anchor_name: &'static str,
    pub position: Option<Point>,
    pub z_index: u64,
    pub positioned: bool,
    pub transform: StackTransform,
}

/// Final state of the container after a replay.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub canvas: Size,
    pub revision: u64,
    /// Items back to front.
    pub items: Vec<ItemReport>,
}

/// Apply every step of `scenario` to a fresh container.
pub fn replay(scenario: &Scenario) -> Result<Report, CliError> {
    let mut container: SnapContainer<String> = SnapContainer::from_config(&scenario.config)?;

    for (index, step) in scenario.steps.iter().enumerate() {
        log::debug!("Step {}: {:?}", index, step);
        apply(&mut container, step);
    }

    Ok(report(&container))
}

fn apply(container: &mut SnapContainer<String>, step: &Step) {
    match step {
        Step::Register { id, size, anchor } => {
            container.register_item(id.clone(), *size, anchor.0);
        }
        Step::Unregister { id } => {
            container.unregister_item(id);
        }
        Step::UpdateAnchor { id, anchor } => container.update_anchor(id, anchor.0),
        Step::Resize { size } => container.update_canvas_size(*size),
        Step::Drag {
            id,
            translation,
            velocity,
        } => {
            let Some(mut session) = DragSession::begin(container, id.clone()) else {
                log::warn!("Skipping drag of unpositioned item {}", id);
                return;
            };
            session.update(container, *translation);
            if let Some(outcome) = session.finish(container, *velocity) {
                log::info!(
                    "Dropped {} at ({:.1}, {:.1}), settled on {}",
                    id,
                    outcome.released.x,
                    outcome.released.y,
                    outcome.target.anchor
                );
            }
        }
        Step::BringToFront { id } => container.bring_to_front(id),
        Step::SetPosition { id, position } => container.set_position(id, *position),
    }
}

fn report(container: &SnapContainer<String>) -> Report {
    let items = container
        .items_ordered()
        .into_iter()
        .map(|item| ItemReport {
            id: item.id().clone(),
            anchor: item.anchor(),
            anchor_name: item.anchor().name(),
            position: item.position(),
            z_index: item.z_index(),
            positioned: item.is_positioned(),
            transform: container.stack_transform(item.id()),
        })
        .collect();

    Report {
        canvas: container.canvas_size(),
        revision: container.revision(),
        items,
    }
}
