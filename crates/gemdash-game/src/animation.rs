use serde::{Deserialize, Serialize};

use crate::physics::PlayerState;

/// Animation/behavior states for the player sprite. The host engine maps
/// these to frame sheets; the simulation only picks the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimState {
    Idle,
    Running,
    Jumping,
    Falling,
    Hurt,
}

/// Derive the animation state from velocity and invulnerability. Pure
/// function of the current frame, no hidden history; the priority order
/// is the contract: Hurt > Jumping > Falling > Running > Idle.
pub fn derive_state(player: &PlayerState) -> AnimState {
    if player.invulnerable() {
        AnimState::Hurt
    } else if player.vel.y < 0.0 {
        AnimState::Jumping
    } else if player.vel.y > 0.0 {
        AnimState::Falling
    } else if player.vel.x.abs() > 0.0 {
        AnimState::Running
    } else {
        AnimState::Idle
    }
}
