//! Outbound movement events.
//!
//! The core never calls into presentation or audio code.  Every observable
//! moment (jump, landing, footstep, size change) is pushed onto the player's
//! [`MovementEvents`] list in the order it happened within the tick.  The
//! simulation plugin drains that list into Bevy [`Message`]s once per frame,
//! where any number of consumers may read them.
//!
//! Keeping the list on the player instead of writing messages directly lets
//! tests assert the exact sequence produced by a single tick.

use bevy::prelude::*;

use crate::size::{SizeProfile, SizeTier};

/// Something the movement core wants the outside world to react to.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub enum MovementEvent {
    /// A jump impulse was applied.
    Jumped { double_jump: bool },
    /// The body touched down.  `fall_speed` is the downward speed (≥ 0).
    Landed { fall_speed: f32 },
    /// Cadence tick while walking on the ground.
    Footstep,
    /// The active size tier changed; the collider has already been swapped.
    SizeChanged { tier: SizeTier, profile: SizeProfile },
}

/// Per-tick event list owned by the player entity.
#[derive(Component, Debug, Default, Clone)]
pub struct MovementEvents(Vec<MovementEvent>);

impl MovementEvents {
    #[inline]
    pub fn push(&mut self, event: MovementEvent) {
        self.0.push(event);
    }

    #[inline]
    pub fn as_slice(&self) -> &[MovementEvent] {
        &self.0
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Remove and yield every pending event in emission order.
    pub fn drain(&mut self) -> impl Iterator<Item = MovementEvent> + '_ {
        self.0.drain(..)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}
