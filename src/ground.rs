//! Size-aware grounded check.
//!
//! The probe runs straight down from the body centre.  The body counts as
//! grounded when a surface lies within half the *active* profile's capsule
//! height plus a fixed clearance, i.e. within `clearance` of the capsule base.
//! The profile is passed in on every call rather than cached, so a collider
//! swapped earlier in the frame is always matched by its own threshold.

use crate::body::PlayerBody;
use crate::size::SizeProfile;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundSensor {
    /// Distance below the capsule base still counted as contact.
    pub clearance: f32,
}

impl GroundSensor {
    pub fn new(clearance: f32) -> Self {
        Self { clearance }
    }

    /// Probe distance from the centre for `profile`.
    #[inline]
    pub fn threshold(&self, profile: &SizeProfile) -> f32 {
        profile.capsule_height * 0.5 + self.clearance
    }

    /// `false` when the body has no collider or the probe hits nothing.
    pub fn is_grounded<B: PlayerBody + ?Sized>(&self, body: &B, profile: &SizeProfile) -> bool {
        if !body.has_collider() {
            return false;
        }
        let threshold = self.threshold(profile);
        body.probe_down(threshold)
            .is_some_and(|distance| distance <= threshold)
    }
}
