//! Deterministic stand-ins for headless movement tests.
//!
//! [`FlatGroundBody`] is a point-mass capsule over an infinite horizontal
//! floor.  It integrates gravity explicitly and resolves floor penetration by
//! pushing the capsule out, which is all the movement core needs to exercise
//! its timing windows without a Rapier pipeline.
//!
//! [`Harness`] bundles a body with the controllers and runs the same
//! "update, then integrate" order the game loop uses:
//!
//! 1. `MovementController::update` writes velocity / impulses.
//! 2. [`FlatGroundBody::step`] integrates (standing in for Rapier's
//!    `PostUpdate` step).

use bevy::math::{Vec2, Vec3};

use crate::body::{ColliderSwap, PlayerBody};
use crate::config::MovementConfig;
use crate::events::{MovementEvent, MovementEvents};
use crate::ground::GroundSensor;
use crate::movement::{MovementController, MovementInput};
use crate::size::{SizeChange, SizeController, SizeProfile};

/// Capsule body over an optional flat floor.
#[derive(Debug, Clone)]
pub struct FlatGroundBody {
    pub position: Vec3,
    pub velocity: Vec3,
    pub mass: f32,
    /// Vertical acceleration (negative = down).
    pub gravity: f32,
    /// Floor height, or `None` for a bottomless void.
    pub floor: Option<f32>,
    /// `(radius, total height)` of the attached capsule.
    pub collider: Option<(f32, f32)>,
}

impl FlatGroundBody {
    /// A body whose capsule base rests exactly on a floor at `y = 0`.
    pub fn resting_on_floor(profile: &SizeProfile) -> Self {
        Self {
            position: Vec3::new(0.0, profile.capsule_height * 0.5, 0.0),
            velocity: Vec3::ZERO,
            mass: 1.0,
            gravity: crate::constants::GRAVITY,
            floor: Some(0.0),
            collider: Some((profile.capsule_radius, profile.capsule_height)),
        }
    }

    /// Explicit Euler step with floor penetration recovery.
    pub fn step(&mut self, dt: f32) {
        self.velocity.y += self.gravity * dt;
        self.position += self.velocity * dt;

        if let (Some(floor), Some((_, height))) = (self.floor, self.collider) {
            let half = height * 0.5;
            if self.position.y - half < floor {
                self.position.y = floor + half;
                if self.velocity.y < 0.0 {
                    self.velocity.y = 0.0;
                }
            }
        }
    }

    #[inline]
    pub fn horizontal_speed(&self) -> f32 {
        Vec2::new(self.velocity.x, self.velocity.z).length()
    }
}

impl PlayerBody for FlatGroundBody {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn linear_velocity(&self) -> Vec3 {
        self.velocity
    }

    fn set_linear_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    fn apply_impulse(&mut self, impulse: Vec3) {
        self.velocity += impulse / self.mass;
    }

    fn has_collider(&self) -> bool {
        self.collider.is_some()
    }

    fn probe_down(&self, max_distance: f32) -> Option<f32> {
        let floor = self.floor?;
        let distance = self.position.y - floor;
        (0.0..=max_distance).contains(&distance).then_some(distance)
    }
}

impl ColliderSwap for FlatGroundBody {
    fn replace_capsule(&mut self, radius: f32, height: f32) {
        self.collider = Some((radius, height));
    }
}

/// A complete headless player: body, controllers, config and event list.
pub struct Harness {
    pub body: FlatGroundBody,
    pub movement: MovementController,
    pub size: SizeController,
    pub config: MovementConfig,
    pub events: MovementEvents,
    pub dt: f32,
    /// Ticks run so far.
    pub ticks: u32,
}

impl Default for Harness {
    fn default() -> Self {
        Self::new(MovementConfig::default())
    }
}

impl Harness {
    /// Normal-tier player resting on the floor, ticking at 60 Hz.
    pub fn new(config: MovementConfig) -> Self {
        let size = SizeController::new(config.profiles);
        let mut body = FlatGroundBody::resting_on_floor(size.profile());
        body.gravity = config.gravity;
        body.mass = config.player_mass;
        Self {
            body,
            movement: MovementController::default(),
            size,
            config,
            events: MovementEvents::default(),
            dt: 1.0 / 60.0,
            ticks: 0,
        }
    }

    /// Run one frame and return the events it produced.
    pub fn tick(&mut self, input: MovementInput) -> Vec<MovementEvent> {
        self.movement.update(
            self.dt,
            &input,
            &mut self.body,
            &self.size,
            &self.config,
            &mut self.events,
        );
        self.body.step(self.dt);
        self.ticks += 1;
        self.events.drain().collect()
    }

    /// Run `n` frames with the same input; one event list per frame.
    pub fn run(&mut self, n: usize, input: MovementInput) -> Vec<Vec<MovementEvent>> {
        (0..n).map(|_| self.tick(input)).collect()
    }

    pub fn grow(&mut self) -> SizeChange {
        self.size.grow(&mut self.body, &mut self.events)
    }

    pub fn shrink(&mut self) -> SizeChange {
        self.size.shrink(&mut self.body, &mut self.events)
    }

    /// Ground check with the current profile, without advancing time.
    pub fn grounded_now(&self) -> bool {
        GroundSensor::new(self.config.ground_clearance).is_grounded(&self.body, self.size.profile())
    }
}
