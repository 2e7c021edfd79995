use serde::{Deserialize, Serialize};

/// Input snapshot for one simulated frame: a continuous horizontal axis
/// and the discrete "jump requested" edge from a tap or press.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameInput {
    /// Horizontal axis in [-1, 1]. Left is negative.
    pub move_axis: f32,
    /// True on the frame a jump was requested.
    pub jump: bool,
}

impl Default for FrameInput {
    fn default() -> Self {
        Self {
            move_axis: 0.0,
            jump: false,
        }
    }
}

impl FrameInput {
    /// The horizontal axis with NaN/Inf sanitized to 0 and clamped to
    /// [-1, 1]. Host input layers are not trusted to deliver finite values.
    pub fn sanitized_axis(&self) -> f32 {
        if self.move_axis.is_finite() {
            self.move_axis.clamp(-1.0, 1.0)
        } else {
            0.0
        }
    }

    /// Merge a newer snapshot into this one, accumulating transient flags.
    /// Without this, a jump:true sampled between frames gets overwritten by
    /// jump:false from the next sample before the simulation processes it.
    /// Continuous values are always overwritten with the latest.
    pub fn merge(&mut self, newer: &FrameInput) {
        self.move_axis = newer.move_axis;
        if newer.jump {
            self.jump = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_axis_sanitized_to_zero() {
        let input = FrameInput {
            move_axis: f32::NAN,
            jump: false,
        };
        assert_eq!(input.sanitized_axis(), 0.0);
    }

    #[test]
    fn inf_axis_sanitized_to_zero() {
        let input = FrameInput {
            move_axis: f32::INFINITY,
            jump: false,
        };
        assert_eq!(input.sanitized_axis(), 0.0);
    }

    #[test]
    fn out_of_range_axis_clamped() {
        let input = FrameInput {
            move_axis: -3.0,
            jump: false,
        };
        assert_eq!(input.sanitized_axis(), -1.0);
    }

    #[test]
    fn merge_preserves_jump_edge() {
        let mut pending = FrameInput {
            move_axis: 1.0,
            jump: true,
        };
        pending.merge(&FrameInput {
            move_axis: 0.5,
            jump: false,
        });
        assert!(pending.jump, "Jump edge must survive a later jump:false sample");
        assert_eq!(pending.move_axis, 0.5, "Axis takes the latest sample");
    }

    #[test]
    fn merge_picks_up_new_jump() {
        let mut pending = FrameInput::default();
        pending.merge(&FrameInput {
            move_axis: 0.0,
            jump: true,
        });
        assert!(pending.jump);
    }
}
