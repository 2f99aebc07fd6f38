//! Pool categories
//!
//! Each pooled instance belongs to exactly one category. Categories come in
//! two independent families: world-space effects and overlay (UI) effects.
//! Both sets are closed; add a variant here to introduce a new pool.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Instance family, one pool namespace each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Family {
    /// Instances placed in the world
    World,
    /// Instances drawn in the overlay/UI layer
    Overlay,
}

impl Family {
    /// Lowercase family name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::World => "world",
            Self::Overlay => "overlay",
        }
    }
}

/// World-space pooled effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorldEffect {
    /// Heart burst where something was liked
    Like,
    /// Impact flash on a hit
    HitEffect,
    /// Level completion celebration
    LevelComplete,
    /// Power-up pickup sparkle
    PowerUp,
}

impl WorldEffect {
    /// Every world category
    pub const ALL: &'static [Self] = &[
        Self::Like,
        Self::HitEffect,
        Self::LevelComplete,
        Self::PowerUp,
    ];

    /// Variant name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Like => "Like",
            Self::HitEffect => "HitEffect",
            Self::LevelComplete => "LevelComplete",
            Self::PowerUp => "PowerUp",
        }
    }
}

/// Overlay pooled effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OverlayEffect {
    /// Like feedback on the HUD
    LikeEffect,
    /// Combo counter text
    ComboText,
    /// Floating score number
    ScorePopup,
    /// Button press feedback
    ButtonPress,
}

impl OverlayEffect {
    /// Every overlay category
    pub const ALL: &'static [Self] = &[
        Self::LikeEffect,
        Self::ComboText,
        Self::ScorePopup,
        Self::ButtonPress,
    ];

    /// Variant name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::LikeEffect => "LikeEffect",
            Self::ComboText => "ComboText",
            Self::ScorePopup => "ScorePopup",
            Self::ButtonPress => "ButtonPress",
        }
    }
}

/// A category from either family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// World-space effect
    World(WorldEffect),
    /// Overlay effect
    Overlay(OverlayEffect),
}

impl Category {
    /// Family this category belongs to
    #[must_use]
    pub const fn family(self) -> Family {
        match self {
            Self::World(_) => Family::World,
            Self::Overlay(_) => Family::Overlay,
        }
    }

    /// Variant name without the family prefix
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::World(effect) => effect.name(),
            Self::Overlay(effect) => effect.name(),
        }
    }

    /// Every category of both families
    pub fn all() -> impl Iterator<Item = Self> {
        WorldEffect::ALL
            .iter()
            .copied()
            .map(Self::World)
            .chain(OverlayEffect::ALL.iter().copied().map(Self::Overlay))
    }
}

impl From<WorldEffect> for Category {
    fn from(effect: WorldEffect) -> Self {
        Self::World(effect)
    }
}

impl From<OverlayEffect> for Category {
    fn from(effect: OverlayEffect) -> Self {
        Self::Overlay(effect)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.family().name(), self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_family() {
        assert_eq!(
            Category::from(WorldEffect::HitEffect).to_string(),
            "world/HitEffect"
        );
        assert_eq!(
            Category::from(OverlayEffect::ComboText).to_string(),
            "overlay/ComboText"
        );
    }

    #[test]
    fn test_families_are_independent() {
        let world = Category::from(WorldEffect::Like);
        let overlay = Category::from(OverlayEffect::LikeEffect);
        assert_ne!(world, overlay);
        assert_eq!(world.family(), Family::World);
        assert_eq!(overlay.family(), Family::Overlay);
    }

    #[test]
    fn test_all_covers_both_families() {
        let all: Vec<_> = Category::all().collect();
        assert_eq!(all.len(), WorldEffect::ALL.len() + OverlayEffect::ALL.len());
    }
}
