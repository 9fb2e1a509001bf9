//! Vertical motion of the avatar
//!
//! Plain per-tick integration: velocity first, then position with the updated
//! velocity. No terminal velocity.

use super::state::Avatar;

/// Advance the avatar by one tick under constant gravity
#[inline]
pub fn integrate(avatar: Avatar, gravity: f32) -> Avatar {
    let velocity = avatar.velocity + gravity;
    Avatar {
        position: avatar.position + velocity,
        velocity,
    }
}

/// Replace the avatar's velocity with the jump impulse
#[inline]
pub fn apply_impulse(avatar: Avatar, jump_force: f32) -> Avatar {
    Avatar {
        position: avatar.position,
        velocity: jump_force,
    }
}
