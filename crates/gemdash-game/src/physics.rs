use serde::{Deserialize, Serialize};

use gemdash_core::geometry::{Aabb, Vec2};
use gemdash_core::input::FrameInput;

use crate::config::{GemDashConfig, PhysicsConfig};

/// State of the player character. Created at level (re)spawn, mutated
/// every frame by the integrator and collision resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    /// AABB center.
    pub pos: Vec2,
    pub vel: Vec2,
    pub health: i32,
    /// Seconds of invulnerability left; 0 means vulnerable.
    pub invuln_remaining: f32,
    pub on_ground: bool,
    /// Horizontal facing, +1 right / -1 left.
    pub facing: i8,
    pub can_double_jump: bool,
    /// Set when the mid-air jump has been spent this airborne cycle.
    pub air_jump_used: bool,
}

impl PlayerState {
    pub fn spawn(pos: Vec2, cfg: &GemDashConfig) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            health: cfg.max_health,
            invuln_remaining: 0.0,
            on_ground: false,
            facing: 1,
            can_double_jump: cfg.allow_double_jump,
            air_jump_used: false,
        }
    }

    pub fn invulnerable(&self) -> bool {
        self.invuln_remaining > 0.0
    }

    pub fn aabb(&self, cfg: &PhysicsConfig) -> Aabb {
        Aabb::from_size(self.pos, cfg.player_width, cfg.player_height)
    }

    /// Bottom edge of the player box (y-down: the larger y).
    pub fn bottom(&self, cfg: &PhysicsConfig) -> f32 {
        self.pos.y + cfg.player_height / 2.0
    }

    /// Reset at a respawn point: fresh health, zero velocity, no carried
    /// jump or invulnerability state.
    pub fn respawn_at(&mut self, pos: Vec2, cfg: &GemDashConfig) {
        self.pos = pos;
        self.vel = Vec2::ZERO;
        self.health = cfg.max_health;
        self.invuln_remaining = 0.0;
        self.on_ground = false;
        self.air_jump_used = false;
    }
}

/// What a damage application did, so the session can react.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Invulnerability window absorbed the hit.
    Ignored,
    /// Non-lethal: invulnerability and knockback applied.
    Hurt,
    /// Health reached zero.
    Lethal,
}

/// One frame of kinematics: horizontal drive, gravity, clamp, position.
/// Pure numeric update, called exactly once per simulated frame.
pub fn integrate(player: &mut PlayerState, input: &FrameInput, cfg: &PhysicsConfig, dt: f32) {
    let axis = input.sanitized_axis();
    player.vel.x = axis * cfg.move_speed;
    if axis > 0.0 {
        player.facing = 1;
    } else if axis < 0.0 {
        player.facing = -1;
    }

    if !player.on_ground {
        player.vel.y += cfg.gravity * dt;
        player.vel.y = player.vel.y.clamp(-cfg.jump_speed, cfg.max_fall_speed);
    }

    player.pos.x += player.vel.x * dt;
    player.pos.y += player.vel.y * dt;
}

/// Advance the invulnerability window.
pub fn tick_invulnerability(player: &mut PlayerState, dt: f32) {
    if player.invuln_remaining > 0.0 {
        player.invuln_remaining = (player.invuln_remaining - dt).max(0.0);
    }
}

/// Handle a jump request edge. Grounded: takeoff. Airborne: the mid-air
/// jump, once per ground-contact cycle, if the capability is enabled.
/// Otherwise a no-op (not an error). Returns whether a jump happened.
pub fn try_jump(player: &mut PlayerState, cfg: &PhysicsConfig) -> bool {
    if player.on_ground {
        player.vel.y = -cfg.jump_speed;
        player.on_ground = false;
        true
    } else if player.can_double_jump && !player.air_jump_used {
        player.vel.y = -cfg.jump_speed;
        player.air_jump_used = true;
        true
    } else {
        false
    }
}

/// Snap the player onto a platform top after a landing contact.
pub fn land(player: &mut PlayerState, platform_top: f32, cfg: &PhysicsConfig) {
    player.pos.y = platform_top - cfg.player_height / 2.0;
    player.vel.y = 0.0;
    player.on_ground = true;
    player.air_jump_used = false;
}

/// Apply hazard damage at the given source x position.
///
/// Invulnerable hits are ignored. Non-lethal hits open the invulnerability
/// window and knock the player up and away from the source; knockback
/// overrides jump state (airborne, air jump not restored). Lethal hits
/// leave the death transition to the session.
pub fn apply_damage(
    player: &mut PlayerState,
    damage: i32,
    source_x: f32,
    cfg: &GemDashConfig,
) -> DamageOutcome {
    if player.invulnerable() {
        return DamageOutcome::Ignored;
    }
    player.health -= damage;
    if player.health > 0 {
        player.invuln_remaining = cfg.invuln_duration;
        let away = if player.pos.x < source_x { -1.0 } else { 1.0 };
        player.vel.x = away * cfg.physics.knockback_x;
        player.vel.y = -cfg.physics.jump_speed * 0.5;
        player.on_ground = false;
        DamageOutcome::Hurt
    } else {
        player.health = 0;
        DamageOutcome::Lethal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> GemDashConfig {
        GemDashConfig::default()
    }

    fn airborne_player(config: &GemDashConfig) -> PlayerState {
        PlayerState::spawn(Vec2::new(5.0, 5.0), config)
    }

    #[test]
    fn gravity_pulls_down() {
        let config = cfg();
        let mut player = airborne_player(&config);
        let y_before = player.pos.y;

        integrate(&mut player, &FrameInput::default(), &config.physics, 0.1);

        assert!(player.vel.y > 0.0, "Falling means positive vy in screen space");
        assert!(player.pos.y > y_before, "Player should move down the screen");
    }

    #[test]
    fn grounded_player_skips_gravity() {
        let config = cfg();
        let mut player = airborne_player(&config);
        player.on_ground = true;

        integrate(&mut player, &FrameInput::default(), &config.physics, 0.1);

        assert_eq!(player.vel.y, 0.0);
    }

    #[test]
    fn fall_speed_clamped_to_terminal() {
        let config = cfg();
        let mut player = airborne_player(&config);

        for _ in 0..200 {
            integrate(&mut player, &FrameInput::default(), &config.physics, 0.1);
        }

        assert!(
            player.vel.y <= config.physics.max_fall_speed,
            "vy {} must not exceed terminal {}",
            player.vel.y,
            config.physics.max_fall_speed
        );
    }

    #[test]
    fn horizontal_axis_drives_velocity_and_facing() {
        let config = cfg();
        let mut player = airborne_player(&config);

        let input = FrameInput {
            move_axis: -1.0,
            jump: false,
        };
        integrate(&mut player, &input, &config.physics, 0.1);

        assert_eq!(player.vel.x, -config.physics.move_speed);
        assert_eq!(player.facing, -1);
    }

    #[test]
    fn zero_axis_keeps_facing() {
        let config = cfg();
        let mut player = airborne_player(&config);
        player.facing = -1;

        integrate(&mut player, &FrameInput::default(), &config.physics, 0.1);

        assert_eq!(player.facing, -1);
    }

    #[test]
    fn nan_axis_treated_as_zero() {
        let config = cfg();
        let mut player = airborne_player(&config);
        player.on_ground = true;

        let input = FrameInput {
            move_axis: f32::NAN,
            jump: false,
        };
        integrate(&mut player, &input, &config.physics, 0.1);

        assert_eq!(player.vel.x, 0.0, "NaN axis must sanitize to 0");
        assert!(player.pos.x.is_finite());
    }

    #[test]
    fn grounded_jump_takes_off() {
        let config = cfg();
        let mut player = airborne_player(&config);
        player.on_ground = true;

        assert!(try_jump(&mut player, &config.physics));
        assert_eq!(player.vel.y, -config.physics.jump_speed);
        assert!(!player.on_ground);
        assert!(!player.air_jump_used, "Ground jump must not spend the air jump");
    }

    #[test]
    fn airborne_jump_without_capability_is_noop() {
        let mut config = cfg();
        config.allow_double_jump = false;
        let mut player = airborne_player(&config);
        player.vel.y = 3.0; // falling

        assert!(!try_jump(&mut player, &config.physics));
        assert_eq!(player.vel.y, 3.0, "vy must be unchanged by the rejected jump");
    }

    #[test]
    fn air_jump_spends_once_per_cycle() {
        let config = cfg();
        let mut player = airborne_player(&config);

        assert!(try_jump(&mut player, &config.physics), "First air jump allowed");
        assert!(player.air_jump_used);
        player.vel.y = 3.0;
        assert!(!try_jump(&mut player, &config.physics), "Second air jump rejected");
        assert_eq!(player.vel.y, 3.0);
    }

    #[test]
    fn landing_restores_air_jump() {
        let config = cfg();
        let mut player = airborne_player(&config);
        player.air_jump_used = true;
        player.vel.y = 5.0;

        land(&mut player, 10.0, &config.physics);

        assert!(player.on_ground);
        assert_eq!(player.vel.y, 0.0);
        assert!(!player.air_jump_used);
        assert_eq!(player.bottom(&config.physics), 10.0);
    }

    #[test]
    fn damage_while_invulnerable_is_ignored() {
        let config = cfg();
        let mut player = airborne_player(&config);
        player.invuln_remaining = 1.0;

        let outcome = apply_damage(&mut player, 1, 0.0, &config);

        assert_eq!(outcome, DamageOutcome::Ignored);
        assert_eq!(player.health, config.max_health, "Health must not change");
    }

    #[test]
    fn nonlethal_damage_knocks_back_and_protects() {
        let config = cfg();
        let mut player = airborne_player(&config);
        player.on_ground = true;
        player.air_jump_used = true;

        // Hazard to the right of the player
        let hazard_x = player.pos.x + 1.0;
        let outcome = apply_damage(&mut player, 1, hazard_x, &config);

        assert_eq!(outcome, DamageOutcome::Hurt);
        assert_eq!(player.health, config.max_health - 1);
        assert!(player.invulnerable());
        assert_eq!(player.vel.x, -config.physics.knockback_x, "Knocked away from hazard");
        assert_eq!(player.vel.y, -config.physics.jump_speed * 0.5, "Bounced upward");
        assert!(!player.on_ground, "Knockback overrides grounded state");
        assert!(
            player.air_jump_used,
            "Knockback must not restore the air-jump charge"
        );
    }

    #[test]
    fn knockback_direction_away_from_left_hazard() {
        let config = cfg();
        let mut player = airborne_player(&config);

        let hazard_x = player.pos.x - 1.0;
        apply_damage(&mut player, 1, hazard_x, &config);

        assert_eq!(player.vel.x, config.physics.knockback_x);
    }

    #[test]
    fn lethal_damage_floors_health_at_zero() {
        let config = cfg();
        let mut player = airborne_player(&config);
        player.health = 1;

        let outcome = apply_damage(&mut player, 3, 0.0, &config);

        assert_eq!(outcome, DamageOutcome::Lethal);
        assert_eq!(player.health, 0);
    }

    #[test]
    fn invulnerability_expires() {
        let config = cfg();
        let mut player = airborne_player(&config);
        player.invuln_remaining = 0.3;

        tick_invulnerability(&mut player, 0.2);
        assert!(player.invulnerable());
        tick_invulnerability(&mut player, 0.2);
        assert!(!player.invulnerable());
        assert_eq!(player.invuln_remaining, 0.0);
    }

    #[test]
    fn respawn_resets_motion_and_health() {
        let config = cfg();
        let mut player = airborne_player(&config);
        player.health = 1;
        player.vel = Vec2::new(4.0, -8.0);
        player.invuln_remaining = 0.5;
        player.air_jump_used = true;

        player.respawn_at(Vec2::new(2.0, 3.0), &config);

        assert_eq!(player.pos, Vec2::new(2.0, 3.0));
        assert_eq!(player.vel, Vec2::ZERO);
        assert_eq!(player.health, config.max_health);
        assert!(!player.invulnerable());
        assert!(!player.air_jump_used);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            // Airborne vy always stays within [-jump_speed, max_fall_speed],
            // whatever the input sequence does.
            #[test]
            fn airborne_velocity_stays_clamped(
                moves in proptest::collection::vec((-1.5f32..=1.5, any::<bool>()), 1..120)
            ) {
                let config = GemDashConfig::default();
                let mut player = PlayerState::spawn(Vec2::new(0.0, 0.0), &config);

                for (axis, jump) in moves {
                    let input = FrameInput { move_axis: axis, jump };
                    if input.jump {
                        try_jump(&mut player, &config.physics);
                    }
                    integrate(&mut player, &input, &config.physics, 1.0 / 60.0);

                    prop_assert!(
                        player.vel.y >= -config.physics.jump_speed
                            && player.vel.y <= config.physics.max_fall_speed,
                        "vy {} escaped [-{}, {}]",
                        player.vel.y,
                        config.physics.jump_speed,
                        config.physics.max_fall_speed
                    );
                }
            }

            // Damage during the invulnerability window never changes health.
            #[test]
            fn invulnerable_damage_is_idempotent(
                damage in 1i32..10,
                window in 0.01f32..5.0
            ) {
                let config = GemDashConfig::default();
                let mut player = PlayerState::spawn(Vec2::new(0.0, 0.0), &config);
                player.invuln_remaining = window;
                let health_before = player.health;

                for _ in 0..5 {
                    apply_damage(&mut player, damage, 1.0, &config);
                }

                prop_assert_eq!(player.health, health_before);
            }
        }
    }
}
