use gemdash_core::game_trait::DeathCause;
use gemdash_core::geometry::Vec2;

use crate::config::GemDashConfig;
use crate::level::{Entity, EntityKind, KILL_PLANE_Y};
use crate::physics::{self, DamageOutcome, PlayerState};

/// Signals reported by one frame of collision resolution. The session
/// controller applies them; entities never reach into the session.
#[derive(Debug, Clone, PartialEq)]
pub enum Contact {
    Landed,
    Damaged { remaining_health: i32 },
    Died { cause: DeathCause },
    GemCollected { value: u32 },
    CheckpointReached { pos: Vec2 },
    ExitReached,
}

/// Resolve the player against every live entity for this frame.
///
/// The one-way platform pass runs first because it establishes
/// `on_ground` for the rest of the frame. Hazards, gems, checkpoints, and
/// the exit then resolve independently: a hazard and a gem overlapped in
/// the same frame both apply.
///
/// `prev_bottom` is the player's bottom edge before this frame's
/// integration; landing requires having been at or above the platform top
/// on the previous frame, so the player passes through platforms from
/// below and from the side.
pub fn resolve_frame(
    player: &mut PlayerState,
    prev_bottom: f32,
    entities: &mut [Entity],
    cfg: &GemDashConfig,
) -> Vec<Contact> {
    let phys = &cfg.physics;
    let mut contacts = Vec::new();

    let was_grounded = player.on_ground;
    player.on_ground = false;

    for e in entities.iter() {
        let EntityKind::Platform { .. } = e.kind else {
            continue;
        };
        let top = e.rect.top();
        let player_box = player.aabb(phys);
        if player.vel.y >= 0.0
            && prev_bottom <= top + phys.land_tolerance
            && player.bottom(phys) >= top
            && player_box.right() > e.rect.left()
            && player_box.left() < e.rect.right()
        {
            physics::land(player, top, phys);
            if !was_grounded {
                contacts.push(Contact::Landed);
            }
        }
    }

    let player_box = player.aabb(phys);
    for e in entities.iter_mut() {
        match e.kind {
            EntityKind::Platform { .. } => {},
            EntityKind::Hazard { damage, .. } => {
                if player_box.overlaps(&e.rect) {
                    match physics::apply_damage(player, damage, e.rect.center.x, cfg) {
                        DamageOutcome::Ignored => {},
                        DamageOutcome::Hurt => contacts.push(Contact::Damaged {
                            remaining_health: player.health,
                        }),
                        DamageOutcome::Lethal => contacts.push(Contact::Died {
                            cause: DeathCause::Hazard,
                        }),
                    }
                }
            },
            EntityKind::Gem { value } => {
                if !e.collected && player_box.overlaps(&e.rect) {
                    // Idempotent: the flag flips once, repeat overlaps no-op.
                    // The scene despawn after the pickup effect is the
                    // renderer's business.
                    e.collected = true;
                    contacts.push(Contact::GemCollected { value });
                }
            },
            EntityKind::Checkpoint => {
                if !e.activated && player_box.overlaps(&e.rect) {
                    e.activated = true;
                    contacts.push(Contact::CheckpointReached { pos: player.pos });
                }
            },
            EntityKind::Exit => {
                if player_box.overlaps(&e.rect) {
                    contacts.push(Contact::ExitReached);
                }
            },
        }
    }

    if player.pos.y > KILL_PLANE_Y {
        contacts.push(Contact::Died {
            cause: DeathCause::Fall,
        });
    }

    contacts
}
