/// Default score value of a single gem.
pub const GEM_VALUE: u32 = 10;

/// Flat score bonus for finishing a level.
pub const COMPLETION_BONUS: i64 = 250;

/// Bonus gems banked on top of the level's pickups when it is completed.
pub const COMPLETION_GEM_BONUS: u32 = 5;

/// Score for one collected gem.
pub fn gem_score(value: u32) -> i64 {
    i64::from(value)
}

/// Completion bonus for unspent time: 10 points per full second left.
pub fn time_bonus(remaining: f32) -> i64 {
    (remaining.max(0.0) as i64) * 10
}
