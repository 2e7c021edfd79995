use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use gemdash_core::assets::{AssetKey, VisualHandle};
use gemdash_core::game_trait::LevelError;
use gemdash_core::geometry::{Aabb, Vec2};

/// Number of authored level slots.
pub const LEVEL_COUNT: u32 = 30;
/// Top edge of the first platform (y-down world units).
const GROUND_Y: f32 = 16.0;
/// Players below this y have fallen out of the level.
pub const KILL_PLANE_Y: f32 = 24.0;
/// Platform slab thickness.
const PLATFORM_THICKNESS: f32 = 1.0;
/// Default damage for generated hazards.
const HAZARD_DAMAGE: i32 = 1;

/// Difficulty scalars, derived once per level index by monotonic formulas
/// and immutable for the lifetime of the level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    /// Widest gap the generator may leave between platforms.
    pub gap_distance: f32,
    pub moving_platform_speed: f32,
    pub hazard_count: u32,
    /// Patrolling hazards ("enemies").
    pub patroller_count: u32,
    pub gem_count: u32,
    /// Level time limit in seconds.
    pub time_limit: f32,
}

impl Difficulty {
    /// Monotonic in the level index, clamped so late levels stay playable.
    pub fn for_level(index: u32) -> Self {
        let n = index.saturating_sub(1) as f32;
        Self {
            gap_distance: (2.0 + n * 0.15).min(5.0),
            moving_platform_speed: (1.5 + n * 0.1).min(4.0),
            hazard_count: 2 + index.saturating_sub(1) / 2,
            patroller_count: index.saturating_sub(1) / 3,
            gem_count: 8 + index.saturating_sub(1).min(12),
            time_limit: (120.0 - n * 2.0).max(60.0),
        }
    }
}

/// Horizontal ping-pong path for a moving platform or patroller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatrolPath {
    pub min_x: f32,
    pub max_x: f32,
    pub speed: f32,
}

/// Closed set of collidable entity kinds. Collision dispatch is a match
/// over this enum, never a runtime type-name comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EntityKind {
    Platform { path: Option<PatrolPath> },
    Hazard { damage: i32, path: Option<PatrolPath> },
    Gem { value: u32 },
    Checkpoint,
    Exit,
}

/// One placed entity: where it sits and what it is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub rect: Aabb,
    pub kind: EntityKind,
}

/// A generated level ready to spawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub index: u32,
    /// Right edge of the last platform.
    pub width: f32,
    pub spawn: Vec2,
    pub time_limit: f32,
    pub total_gems: u32,
    pub placements: Vec<Placement>,
}

/// A live entity in a loaded level: a placement plus runtime flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub rect: Aabb,
    pub kind: EntityKind,
    /// Gems only: set once on pickup.
    pub collected: bool,
    /// Checkpoints only: set once on first touch.
    pub activated: bool,
    /// Patrol direction, +1 toward max_x.
    pub dir: f32,
    /// Resolved sprite, or a placeholder when the asset load failed.
    pub visual: VisualHandle,
}

impl Entity {
    pub fn from_placement(p: &Placement) -> Self {
        Self {
            rect: p.rect,
            kind: p.kind,
            collected: false,
            activated: false,
            dir: 1.0,
            visual: VisualHandle::Placeholder,
        }
    }
}

/// Catalog key for an entity kind's sprite.
pub fn asset_key_for(kind: &EntityKind) -> AssetKey {
    AssetKey::new(match kind {
        EntityKind::Platform { path: Some(_) } => "platform_moving",
        EntityKind::Platform { path: None } => "platform",
        EntityKind::Hazard { path: Some(_), .. } => "patroller",
        EntityKind::Hazard { path: None, .. } => "spikes",
        EntityKind::Gem { .. } => "gem",
        EntityKind::Checkpoint => "checkpoint",
        EntityKind::Exit => "exit",
    })
}

/// Instantiate all of a level's placements as live entities.
pub fn spawn_entities(level: &Level) -> Vec<Entity> {
    level.placements.iter().map(Entity::from_placement).collect()
}

/// Move patrolling entities along their paths, reversing at the bounds.
pub fn advance_entities(entities: &mut [Entity], dt: f32) {
    for e in entities.iter_mut() {
        let path = match e.kind {
            EntityKind::Platform { path: Some(path) } => path,
            EntityKind::Hazard {
                path: Some(path), ..
            } => path,
            _ => continue,
        };
        let mut x = e.rect.center.x + e.dir * path.speed * dt;
        if x >= path.max_x {
            x = path.max_x;
            e.dir = -1.0;
        } else if x <= path.min_x {
            x = path.min_x;
            e.dir = 1.0;
        }
        e.rect.center.x = x;
    }
}

/// Generate a level deterministically from (index, seed).
///
/// The seed is an explicit parameter so generation stays replayable in
/// tests; the index is folded in so consecutive levels differ under the
/// same session seed. Indices outside 1..=LEVEL_COUNT are rejected.
pub fn generate_level(index: u32, seed: u64) -> Result<Level, LevelError> {
    if index == 0 || index > LEVEL_COUNT {
        return Err(LevelError::UnknownLevel(index));
    }

    let diff = Difficulty::for_level(index);
    let mut rng = StdRng::seed_from_u64(seed ^ u64::from(index).wrapping_mul(0x9E37_79B9_7F4A_7C15));

    // Platform chain, left to right. The first slab is the spawn area and
    // stays flat and hazard-free.
    let mut platforms: Vec<Aabb> = Vec::new();
    let start = Aabb::from_size(
        Vec2::new(3.0, GROUND_Y + PLATFORM_THICKNESS / 2.0),
        6.0,
        PLATFORM_THICKNESS,
    );
    platforms.push(start);

    let target_width = 60.0 + index as f32 * 2.0;
    let mut cursor = start.right();
    let mut prev_top = GROUND_Y;
    while cursor < target_width {
        let gap = rng.random_range(1.2..diff.gap_distance.max(1.4));
        let len = rng.random_range(3.0f32..6.0);
        let top = (prev_top + rng.random_range(-2.0f32..2.0)).clamp(8.0, 17.0);
        let rect = Aabb::from_size(
            Vec2::new(cursor + gap + len / 2.0, top + PLATFORM_THICKNESS / 2.0),
            len,
            PLATFORM_THICKNESS,
        );
        cursor = rect.right();
        prev_top = top;
        platforms.push(rect);
    }

    let last = platforms.len() - 1;
    let mut placements: Vec<Placement> = Vec::new();

    // Some interior platforms become horizontal movers.
    for (i, rect) in platforms.iter().enumerate() {
        let path = if i != 0
            && i != last
            && rng.random_bool(f64::from((0.1 + diff.moving_platform_speed * 0.02).min(0.35)))
        {
            Some(PatrolPath {
                min_x: rect.center.x - 2.0,
                max_x: rect.center.x + 2.0,
                speed: diff.moving_platform_speed,
            })
        } else {
            None
        };
        placements.push(Placement {
            rect: *rect,
            kind: EntityKind::Platform { path },
        });
    }

    // Gems float above platforms.
    for _ in 0..diff.gem_count {
        let plat = platforms[rng.random_range(1..platforms.len())];
        let x = rng.random_range(plat.left() + 0.5..plat.right() - 0.5);
        placements.push(Placement {
            rect: Aabb::from_size(Vec2::new(x, plat.top() - 1.5), 0.6, 0.6),
            kind: EntityKind::Gem {
                value: crate::scoring::GEM_VALUE,
            },
        });
    }

    // Static hazards sit on interior platforms (never spawn or exit).
    if platforms.len() > 2 {
        for _ in 0..diff.hazard_count {
            let plat = platforms[rng.random_range(1..last)];
            let x = rng.random_range(plat.left() + 0.5..plat.right() - 0.5);
            placements.push(Placement {
                rect: Aabb::from_size(Vec2::new(x, plat.top() - 0.4), 0.8, 0.8),
                kind: EntityKind::Hazard {
                    damage: HAZARD_DAMAGE,
                    path: None,
                },
            });
        }

        for _ in 0..diff.patroller_count {
            let plat = platforms[rng.random_range(1..last)];
            placements.push(Placement {
                rect: Aabb::from_size(Vec2::new(plat.center.x, plat.top() - 0.5), 0.9, 0.9),
                kind: EntityKind::Hazard {
                    damage: HAZARD_DAMAGE,
                    path: Some(PatrolPath {
                        min_x: plat.left() + 0.5,
                        max_x: plat.right() - 0.5,
                        speed: diff.moving_platform_speed * 0.8,
                    }),
                },
            });
        }
    }

    // One checkpoint midway, one exit on the last platform.
    let mid = platforms[platforms.len() / 2];
    placements.push(Placement {
        rect: Aabb::from_size(Vec2::new(mid.center.x, mid.top() - 1.0), 1.0, 2.0),
        kind: EntityKind::Checkpoint,
    });
    let exit_plat = platforms[last];
    placements.push(Placement {
        rect: Aabb::from_size(Vec2::new(exit_plat.center.x, exit_plat.top() - 1.0), 1.0, 2.0),
        kind: EntityKind::Exit,
    });

    Ok(Level {
        index,
        width: exit_plat.right(),
        spawn: Vec2::new(start.center.x - 1.0, GROUND_Y - 1.0),
        time_limit: diff.time_limit,
        total_gems: diff.gem_count,
        placements,
    })
}
