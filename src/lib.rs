//! Sizeshift: size-aware platformer movement on Bevy and Rapier3D.
//!
//! The movement core ([`size`], [`ground`], [`movement`], [`events`]) is plain
//! Rust over the [`body::PlayerBody`] trait and runs without a Bevy `App`.
//! [`simulation`], [`session`] and [`pickup`] wire it into the ECS; the
//! remaining modules are presentation and level content.

pub mod body;
pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod graphics;
pub mod ground;
pub mod level;
pub mod movement;
pub mod pickup;
pub mod player;
pub mod rapier_body;
pub mod session;
pub mod simulation;
pub mod size;
pub mod testing;
