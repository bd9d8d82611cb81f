//! Anchor positions and anchor sets.
//!
//! An [`Anchor`] is one cell of the 3×3 grid an item can rest on. An
//! [`AnchorSet`] is a bitmask over those cells, used to describe which
//! anchors a container accepts as snap targets.

use kurbo::Vec2;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors produced when decoding anchors from their bit representation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnchorError {
    #[error("Unknown anchor bits: {0:#011b}")]
    UnknownBits(u16),
    #[error("Expected a single anchor, got bits {0:#011b}")]
    NotSingle(u16),
    #[error("Unknown anchor name: {0}")]
    UnknownName(String),
}

/// Horizontal placement of an anchor within its row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Leading,
    Center,
    Trailing,
}

/// Vertical placement of an anchor within its column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Row {
    Top,
    Center,
    Bottom,
}

/// A single anchor position in the 3×3 grid.
///
/// Serializes as its bit value (`1 << index`), the same representation
/// used by [`AnchorSet`], so a stored anchor can be read back as either.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum Anchor {
    TopLeading,
    Top,
    TopTrailing,
    Leading,
    Center,
    Trailing,
    BottomLeading,
    Bottom,
    BottomTrailing,
}

impl Anchor {
    /// All anchors in canonical (row-major) order.
    pub const ALL: [Anchor; 9] = [
        Anchor::TopLeading,
        Anchor::Top,
        Anchor::TopTrailing,
        Anchor::Leading,
        Anchor::Center,
        Anchor::Trailing,
        Anchor::BottomLeading,
        Anchor::Bottom,
        Anchor::BottomTrailing,
    ];

    /// Position of this anchor in canonical order (0..9).
    pub fn index(self) -> usize {
        self as usize
    }

    /// Bit value of this anchor.
    pub fn bits(self) -> u16 {
        1 << self.index()
    }

    /// Decode a single anchor from its bit value.
    pub fn from_bits(bits: u16) -> Result<Self, AnchorError> {
        if bits & !AnchorSet::ALL.bits() != 0 {
            return Err(AnchorError::UnknownBits(bits));
        }
        if bits.count_ones() != 1 {
            return Err(AnchorError::NotSingle(bits));
        }
        Ok(Self::ALL[bits.trailing_zeros() as usize])
    }

    /// Snake-case name, e.g. `"top_leading"`.
    pub fn name(self) -> &'static str {
        match self {
            Anchor::TopLeading => "top_leading",
            Anchor::Top => "top",
            Anchor::TopTrailing => "top_trailing",
            Anchor::Leading => "leading",
            Anchor::Center => "center",
            Anchor::Trailing => "trailing",
            Anchor::BottomLeading => "bottom_leading",
            Anchor::Bottom => "bottom",
            Anchor::BottomTrailing => "bottom_trailing",
        }
    }

    pub fn column(self) -> Column {
        match self.index() % 3 {
            0 => Column::Leading,
            1 => Column::Center,
            _ => Column::Trailing,
        }
    }

    pub fn row(self) -> Row {
        match self.index() / 3 {
            0 => Row::Top,
            1 => Row::Center,
            _ => Row::Bottom,
        }
    }

    /// Sign vector pointing from this anchor toward the canvas center.
    ///
    /// Each component is -1, 0 or 1. Center-column anchors have x = 0 and
    /// center-row anchors have y = 0.
    pub fn inward_direction(self) -> Vec2 {
        let x = match self.column() {
            Column::Leading => 1.0,
            Column::Center => 0.0,
            Column::Trailing => -1.0,
        };
        let y = match self.row() {
            Row::Top => 1.0,
            Row::Center => 0.0,
            Row::Bottom => -1.0,
        };
        Vec2::new(x, y)
    }

    /// Like [`inward_direction`](Self::inward_direction), with zero
    /// components replaced by +1.
    ///
    /// Stack layouts spread along this vector so that items at center-row
    /// or center-column anchors still get a visible displacement.
    pub fn spread_direction(self) -> Vec2 {
        let dir = self.inward_direction();
        Vec2::new(non_zero_sign(dir.x), non_zero_sign(dir.y))
    }
}

fn non_zero_sign(component: f64) -> f64 {
    if component == 0.0 { 1.0 } else { component }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Anchor {
    type Err = AnchorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Anchor::ALL
            .into_iter()
            .find(|anchor| anchor.name() == s)
            .ok_or_else(|| AnchorError::UnknownName(s.to_string()))
    }
}

impl From<Anchor> for u16 {
    fn from(anchor: Anchor) -> Self {
        anchor.bits()
    }
}

impl TryFrom<u16> for Anchor {
    type Error = AnchorError;

    fn try_from(bits: u16) -> Result<Self, Self::Error> {
        Anchor::from_bits(bits)
    }
}

bitflags::bitflags! {
    /// A set of anchors a container accepts as snap targets.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct AnchorSet: u16 {
        const TOP_LEADING     = 1 << 0;
        const TOP             = 1 << 1;
        const TOP_TRAILING    = 1 << 2;
        const LEADING         = 1 << 3;
        const CENTER          = 1 << 4;
        const TRAILING        = 1 << 5;
        const BOTTOM_LEADING  = 1 << 6;
        const BOTTOM          = 1 << 7;
        const BOTTOM_TRAILING = 1 << 8;

        const CORNERS = Self::TOP_LEADING.bits()
            | Self::TOP_TRAILING.bits()
            | Self::BOTTOM_LEADING.bits()
            | Self::BOTTOM_TRAILING.bits();
        const EDGES = Self::TOP.bits()
            | Self::LEADING.bits()
            | Self::TRAILING.bits()
            | Self::BOTTOM.bits();
        const ALL = Self::CORNERS.bits() | Self::EDGES.bits() | Self::CENTER.bits();
    }
}

impl AnchorSet {
    /// Check whether a single anchor is a member of this set.
    pub fn has(self, anchor: Anchor) -> bool {
        self.contains(AnchorSet::from(anchor))
    }

    /// Member anchors in canonical (row-major) order.
    pub fn enabled_anchors(self) -> Vec<Anchor> {
        Anchor::ALL.into_iter().filter(|&a| self.has(a)).collect()
    }

    /// Decode a set from its bit value, rejecting unknown bits.
    pub fn try_from_bits(bits: u16) -> Result<Self, AnchorError> {
        Self::from_bits(bits).ok_or(AnchorError::UnknownBits(bits))
    }
}

impl From<Anchor> for AnchorSet {
    fn from(anchor: Anchor) -> Self {
        AnchorSet::from_bits_retain(anchor.bits())
    }
}

impl FromIterator<Anchor> for AnchorSet {
    fn from_iter<I: IntoIterator<Item = Anchor>>(iter: I) -> Self {
        iter.into_iter()
            .fold(AnchorSet::empty(), |set, anchor| set | AnchorSet::from(anchor))
    }
}

impl Serialize for AnchorSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(self.bits())
    }
}

impl<'de> Deserialize<'de> for AnchorSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bits = u16::deserialize(deserializer)?;
        AnchorSet::try_from_bits(bits).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_bits_match_set_flags() {
        assert_eq!(AnchorSet::from(Anchor::TopLeading), AnchorSet::TOP_LEADING);
        assert_eq!(AnchorSet::from(Anchor::Center), AnchorSet::CENTER);
        assert_eq!(AnchorSet::from(Anchor::BottomTrailing), AnchorSet::BOTTOM_TRAILING);
        for anchor in Anchor::ALL {
            assert_eq!(anchor.bits().count_ones(), 1);
        }
    }

    #[test]
    fn test_presets() {
        assert_eq!(AnchorSet::CORNERS.enabled_anchors().len(), 4);
        assert_eq!(AnchorSet::EDGES.enabled_anchors().len(), 4);
        assert_eq!(AnchorSet::CENTER.enabled_anchors(), vec![Anchor::Center]);
        assert_eq!(AnchorSet::ALL.enabled_anchors().len(), 9);
        assert_eq!(AnchorSet::ALL, AnchorSet::all());
        assert!(AnchorSet::empty().enabled_anchors().is_empty());
    }

    #[test]
    fn test_enabled_anchors_canonical_order() {
        assert_eq!(
            AnchorSet::CORNERS.enabled_anchors(),
            vec![
                Anchor::TopLeading,
                Anchor::TopTrailing,
                Anchor::BottomLeading,
                Anchor::BottomTrailing,
            ]
        );
        assert_eq!(AnchorSet::ALL.enabled_anchors(), Anchor::ALL.to_vec());
    }

    #[test]
    fn test_union_and_membership() {
        let set = AnchorSet::CORNERS | AnchorSet::CENTER;
        assert!(set.has(Anchor::Center));
        assert!(set.has(Anchor::TopTrailing));
        assert!(!set.has(Anchor::Top));

        let collected: AnchorSet = [Anchor::Top, Anchor::Bottom].into_iter().collect();
        assert_eq!(collected, AnchorSet::TOP | AnchorSet::BOTTOM);
    }

    #[test]
    fn test_inward_direction() {
        assert_eq!(Anchor::TopLeading.inward_direction(), Vec2::new(1.0, 1.0));
        assert_eq!(Anchor::Top.inward_direction(), Vec2::new(0.0, 1.0));
        assert_eq!(Anchor::Trailing.inward_direction(), Vec2::new(-1.0, 0.0));
        assert_eq!(Anchor::Center.inward_direction(), Vec2::ZERO);
        assert_eq!(Anchor::BottomTrailing.inward_direction(), Vec2::new(-1.0, -1.0));
    }

    #[test]
    fn test_spread_direction_defaults_zero_to_positive() {
        assert_eq!(Anchor::Center.spread_direction(), Vec2::new(1.0, 1.0));
        assert_eq!(Anchor::Bottom.spread_direction(), Vec2::new(1.0, -1.0));
        assert_eq!(Anchor::Trailing.spread_direction(), Vec2::new(-1.0, 1.0));
    }

    #[test]
    fn test_from_bits_rejects_combined_and_unknown() {
        assert_eq!(Anchor::from_bits(1 << 4), Ok(Anchor::Center));
        assert_eq!(
            Anchor::from_bits(AnchorSet::CORNERS.bits()),
            Err(AnchorError::NotSingle(AnchorSet::CORNERS.bits()))
        );
        assert_eq!(Anchor::from_bits(0), Err(AnchorError::NotSingle(0)));
        assert_eq!(Anchor::from_bits(1 << 12), Err(AnchorError::UnknownBits(1 << 12)));
        assert!(AnchorSet::try_from_bits(1 << 9).is_err());
    }

    #[test]
    fn test_names() {
        assert_eq!("bottom_trailing".parse::<Anchor>(), Ok(Anchor::BottomTrailing));
        assert_eq!(Anchor::Leading.to_string(), "leading");
        for anchor in Anchor::ALL {
            assert_eq!(anchor.name().parse::<Anchor>(), Ok(anchor));
        }
        assert_eq!(
            "middle".parse::<Anchor>(),
            Err(AnchorError::UnknownName("middle".to_string()))
        );
    }

    #[test]
    fn test_serde_uses_bitmask() {
        let json = serde_json::to_string(&Anchor::BottomTrailing).unwrap();
        assert_eq!(json, "256");
        let anchor: Anchor = serde_json::from_str(&json).unwrap();
        assert_eq!(anchor, Anchor::BottomTrailing);

        let set = AnchorSet::CORNERS | AnchorSet::CENTER;
        let json = serde_json::to_string(&set).unwrap();
        let back: AnchorSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);

        assert!(serde_json::from_str::<Anchor>("3").is_err());
        assert!(serde_json::from_str::<AnchorSet>("1024").is_err());
    }

    #[test]
    fn test_single_anchor_readable_as_set() {
        for anchor in Anchor::ALL {
            let json = serde_json::to_string(&anchor).unwrap();
            let set: AnchorSet = serde_json::from_str(&json).unwrap();
            assert_eq!(set.enabled_anchors(), vec![anchor]);
        }
    }
}
