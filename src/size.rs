//! Size tiers, their physical profiles, and the controller that switches
//! between them.
//!
//! ## Invariants
//!
//! - Exactly one [`SizeProfile`] is active: it is looked up from the single
//!   `tier` field, so no caller can observe a tier paired with another tier's
//!   profile.
//! - On a real transition the collider is swapped *before* the
//!   [`MovementEvent::SizeChanged`] event is pushed, so anything reacting to
//!   the event already sees the new shape.
//! - Velocity and position are never touched; the body keeps its momentum and
//!   the new capsule is built around the same centre.
//!
//! Growing performs no overlap check.  A capsule that grows into a ceiling is
//! pushed out by the physics engine's penetration recovery on its next step.

use bevy::prelude::*;
use serde::Deserialize;

use crate::body::ColliderSwap;
use crate::constants::*;
use crate::events::{MovementEvent, MovementEvents};

/// Discrete scale state of the player.  Ordered smallest to largest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Deserialize)]
pub enum SizeTier {
    Small,
    #[default]
    Normal,
    Large,
}

impl SizeTier {
    /// The next tier up, or `None` at `Large`.
    #[inline]
    pub fn larger(self) -> Option<Self> {
        match self {
            SizeTier::Small => Some(SizeTier::Normal),
            SizeTier::Normal => Some(SizeTier::Large),
            SizeTier::Large => None,
        }
    }

    /// The next tier down, or `None` at `Small`.
    #[inline]
    pub fn smaller(self) -> Option<Self> {
        match self {
            SizeTier::Small => None,
            SizeTier::Normal => Some(SizeTier::Small),
            SizeTier::Large => Some(SizeTier::Normal),
        }
    }

    #[inline]
    pub fn label(self) -> &'static str {
        match self {
            SizeTier::Small => "small",
            SizeTier::Normal => "normal",
            SizeTier::Large => "large",
        }
    }
}

/// Physical and movement parameters of one size tier.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct SizeProfile {
    /// Visual/physical scale relative to the Normal tier (1.0).
    pub scale: f32,
    /// Horizontal top speed (u/s).
    pub move_speed: f32,
    /// Jump impulse magnitude.
    pub jump_force: f32,
    pub capsule_radius: f32,
    /// Total capsule height, caps included.
    pub capsule_height: f32,
}

/// The immutable tier → profile table.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SizeProfiles {
    pub small: SizeProfile,
    pub normal: SizeProfile,
    pub large: SizeProfile,
}

impl Default for SizeProfiles {
    fn default() -> Self {
        Self {
            small: SizeProfile {
                scale: SMALL_SCALE,
                move_speed: SMALL_MOVE_SPEED,
                jump_force: SMALL_JUMP_FORCE,
                capsule_radius: SMALL_CAPSULE_RADIUS,
                capsule_height: SMALL_CAPSULE_HEIGHT,
            },
            normal: SizeProfile {
                scale: NORMAL_SCALE,
                move_speed: NORMAL_MOVE_SPEED,
                jump_force: NORMAL_JUMP_FORCE,
                capsule_radius: NORMAL_CAPSULE_RADIUS,
                capsule_height: NORMAL_CAPSULE_HEIGHT,
            },
            large: SizeProfile {
                scale: LARGE_SCALE,
                move_speed: LARGE_MOVE_SPEED,
                jump_force: LARGE_JUMP_FORCE,
                capsule_radius: LARGE_CAPSULE_RADIUS,
                capsule_height: LARGE_CAPSULE_HEIGHT,
            },
        }
    }
}

impl SizeProfiles {
    #[inline]
    pub fn get(&self, tier: SizeTier) -> &SizeProfile {
        match tier {
            SizeTier::Small => &self.small,
            SizeTier::Normal => &self.normal,
            SizeTier::Large => &self.large,
        }
    }
}

/// Direction of a requested size change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum SizeDirection {
    Grow,
    Shrink,
}

/// Ephemeral request to change size by one tier, produced by pickups or
/// debug input and consumed in the same frame.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeChangeRequest {
    pub direction: SizeDirection,
}

/// Result of a size operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeChange {
    Changed { from: SizeTier, to: SizeTier },
    /// Already at the extreme in the requested direction, or already at the
    /// reset tier.  Nothing was touched.
    Unchanged,
}

impl SizeChange {
    #[inline]
    pub fn is_changed(self) -> bool {
        matches!(self, SizeChange::Changed { .. })
    }
}

/// Owns the player's current size tier.
#[derive(Component, Debug, Clone)]
pub struct SizeController {
    tier: SizeTier,
    profiles: SizeProfiles,
}

impl Default for SizeController {
    fn default() -> Self {
        Self::new(SizeProfiles::default())
    }
}

impl SizeController {
    /// Starts at [`SizeTier::Normal`].
    pub fn new(profiles: SizeProfiles) -> Self {
        Self {
            tier: SizeTier::Normal,
            profiles,
        }
    }

    #[inline]
    pub fn tier(&self) -> SizeTier {
        self.tier
    }

    /// The profile of the active tier.
    #[inline]
    pub fn profile(&self) -> &SizeProfile {
        self.profiles.get(self.tier)
    }

    #[inline]
    pub fn profiles(&self) -> &SizeProfiles {
        &self.profiles
    }

    pub fn grow<C: ColliderSwap + ?Sized>(
        &mut self,
        collider: &mut C,
        events: &mut MovementEvents,
    ) -> SizeChange {
        match self.tier.larger() {
            Some(next) => self.transition(next, collider, events),
            None => SizeChange::Unchanged,
        }
    }

    pub fn shrink<C: ColliderSwap + ?Sized>(
        &mut self,
        collider: &mut C,
        events: &mut MovementEvents,
    ) -> SizeChange {
        match self.tier.smaller() {
            Some(next) => self.transition(next, collider, events),
            None => SizeChange::Unchanged,
        }
    }

    /// Force the Normal tier (respawn).
    pub fn reset<C: ColliderSwap + ?Sized>(
        &mut self,
        collider: &mut C,
        events: &mut MovementEvents,
    ) -> SizeChange {
        if self.tier == SizeTier::Normal {
            return SizeChange::Unchanged;
        }
        self.transition(SizeTier::Normal, collider, events)
    }

    /// Apply a [`SizeChangeRequest`].
    pub fn apply<C: ColliderSwap + ?Sized>(
        &mut self,
        request: SizeChangeRequest,
        collider: &mut C,
        events: &mut MovementEvents,
    ) -> SizeChange {
        match request.direction {
            SizeDirection::Grow => self.grow(collider, events),
            SizeDirection::Shrink => self.shrink(collider, events),
        }
    }

    fn transition<C: ColliderSwap + ?Sized>(
        &mut self,
        to: SizeTier,
        collider: &mut C,
        events: &mut MovementEvents,
    ) -> SizeChange {
        let from = self.tier;
        let profile = *self.profiles.get(to);

        collider.replace_capsule(profile.capsule_radius, profile.capsule_height);
        self.tier = to;
        events.push(MovementEvent::SizeChanged { tier: to, profile });

        SizeChange::Changed { from, to }
    }
}
