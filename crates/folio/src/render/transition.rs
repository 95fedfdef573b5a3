use std::time::Duration;

use crate::deck::{DeckTiming, Direction};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ease {
    Power2In,
    Power2Out,
    Power4Out,
    Power4InOut,
}

impl Ease {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Power2In => t * t * t,
            Self::Power2Out => 1.0 - (1.0 - t).powi(3),
            Self::Power4Out => 1.0 - (1.0 - t).powi(5),
            Self::Power4InOut => {
                if t < 0.5 {
                    16.0 * t.powi(5)
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(5) / 2.0
                }
            }
        }
    }
}

/// Fraction of `duration` elapsed at `elapsed`, clamped to `[0, 1]`.
pub fn progress(elapsed: Duration, duration: Duration) -> f32 {
    if duration.is_zero() {
        return 1.0;
    }
    (elapsed.as_secs_f32() / duration.as_secs_f32()).clamp(0.0, 1.0)
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Visible window of a slide, in fractions of its own box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipInset {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl ClipInset {
    pub const FULL: Self = Self {
        left: 0.0,
        top: 0.0,
        right: 1.0,
        bottom: 1.0,
    };

    fn lerp(self, other: Self, t: f32) -> Self {
        Self {
            left: lerp(self.left, other.left, t),
            top: lerp(self.top, other.top, t),
            right: lerp(self.right, other.right, t),
            bottom: lerp(self.bottom, other.bottom, t),
        }
    }

    /// Reflect across the horizontal center line.
    pub fn flipped_vertically(self) -> Self {
        Self {
            left: self.left,
            top: 1.0 - self.bottom,
            right: self.right,
            bottom: 1.0 - self.top,
        }
    }
}

/// How a slide is drawn at one instant. Offsets are fractions of the
/// viewport height; rotation is in degrees around the slide center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlidePose {
    pub offset_y: f32,
    pub scale: f32,
    pub rotation_deg: f32,
    pub opacity: f32,
    pub clip: ClipInset,
}

impl SlidePose {
    pub const REST: Self = Self {
        offset_y: 0.0,
        scale: 1.0,
        rotation_deg: 0.0,
        opacity: 1.0,
        clip: ClipInset::FULL,
    };
}

const EXIT_SCALE: f32 = 0.25;
const EXIT_ROTATION_DEG: f32 = 30.0;
const EXIT_TRAVEL: f32 = 2.0;
const ENTRY_TRAVEL: f32 = 1.0;

/// Starting clip for a slide entering on `Next`. `Prev` is its mirror.
const ENTRY_CLIP_NEXT: ClipInset = ClipInset {
    left: 0.2,
    top: 0.2,
    right: 0.8,
    bottom: 1.0,
};

/// Clip a slide starts from when it enters for `direction`.
pub fn entry_clip(direction: Direction) -> ClipInset {
    match direction {
        Direction::Next => ENTRY_CLIP_NEXT,
        Direction::Prev => ENTRY_CLIP_NEXT.flipped_vertically(),
    }
}

/// Pose of the outgoing slide `elapsed` after the change was accepted.
/// `Next` sends it up and off-canvas, `Prev` sends it down.
pub fn exit_pose(direction: Direction, elapsed: Duration, timing: &DeckTiming) -> SlidePose {
    let t = Ease::Power4InOut.apply(progress(elapsed, timing.exit));
    SlidePose {
        offset_y: -direction.sign() * EXIT_TRAVEL * t,
        scale: lerp(1.0, EXIT_SCALE, t),
        rotation_deg: EXIT_ROTATION_DEG * t,
        opacity: 1.0 - t,
        clip: ClipInset::FULL,
    }
}

/// Pose of the incoming slide `elapsed` after it was mounted. It travels in
/// from the side opposite the exit and opens its clip to the full box.
pub fn entry_pose(direction: Direction, elapsed: Duration, timing: &DeckTiming) -> SlidePose {
    let t = Ease::Power4Out.apply(progress(elapsed, timing.entry));
    SlidePose {
        offset_y: direction.sign() * ENTRY_TRAVEL * (1.0 - t),
        scale: 1.0,
        rotation_deg: 0.0,
        opacity: 1.0,
        clip: entry_clip(direction).lerp(ClipInset::FULL, t),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EASES: [Ease; 4] = [
        Ease::Power2In,
        Ease::Power2Out,
        Ease::Power4Out,
        Ease::Power4InOut,
    ];

    #[test]
    fn test_ease_endpoints() {
        for ease in EASES {
            assert_eq!(ease.apply(0.0), 0.0, "{ease:?}");
            assert!((ease.apply(1.0) - 1.0).abs() < 1e-6, "{ease:?}");
        }
    }

    #[test]
    fn test_ease_monotonic() {
        for ease in EASES {
            let mut prev = 0.0;
            for i in 1..=20 {
                let v = ease.apply(i as f32 / 20.0);
                assert!(v >= prev, "{ease:?} at {i}");
                prev = v;
            }
        }
    }

    #[test]
    fn test_exit_endpoints() {
        let timing = DeckTiming::default();
        let start = exit_pose(Direction::Next, Duration::ZERO, &timing);
        assert_eq!(start, SlidePose::REST);

        let end = exit_pose(Direction::Next, timing.exit, &timing);
        assert!((end.offset_y + 2.0).abs() < 1e-6);
        assert!((end.scale - 0.25).abs() < 1e-6);
        assert!((end.rotation_deg - 30.0).abs() < 1e-4);
        assert!(end.opacity.abs() < 1e-6);
    }

    #[test]
    fn test_entry_endpoints() {
        let timing = DeckTiming::default();
        let start = entry_pose(Direction::Next, Duration::ZERO, &timing);
        assert_eq!(start.offset_y, 1.0);
        assert_eq!(start.clip, ENTRY_CLIP_NEXT);

        let end = entry_pose(Direction::Prev, timing.entry, &timing);
        assert!(end.offset_y.abs() < 1e-6);
        assert!((end.clip.top - 0.0).abs() < 1e-6);
        assert!((end.clip.bottom - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_directions_mirror() {
        let timing = DeckTiming::default();
        for ms in [0u64, 120, 600, 1100, 1500, 1999, 2500] {
            let t = Duration::from_millis(ms);

            let next = exit_pose(Direction::Next, t, &timing);
            let prev = exit_pose(Direction::Prev, t, &timing);
            assert_eq!(next.offset_y, -prev.offset_y);
            assert_eq!(next.scale, prev.scale);
            assert_eq!(next.rotation_deg, prev.rotation_deg);
            assert_eq!(next.opacity, prev.opacity);

            let next = entry_pose(Direction::Next, t, &timing);
            let prev = entry_pose(Direction::Prev, t, &timing);
            assert_eq!(next.offset_y, -prev.offset_y);
            let mirrored = prev.clip.flipped_vertically();
            assert!((next.clip.top - mirrored.top).abs() < 1e-6);
            assert!((next.clip.bottom - mirrored.bottom).abs() < 1e-6);
            assert_eq!(next.clip.left, prev.clip.left);
            assert_eq!(next.clip.right, prev.clip.right);
        }
    }

    #[test]
    fn test_entry_comes_from_the_side_opposite_the_exit() {
        let timing = DeckTiming::default();
        for dir in [Direction::Next, Direction::Prev] {
            let exit = exit_pose(dir, timing.exit, &timing);
            let entry = entry_pose(dir, Duration::ZERO, &timing);
            assert!(exit.offset_y * entry.offset_y < 0.0, "{dir:?}");
        }
    }

    #[test]
    fn test_prev_entry_clip() {
        assert_eq!(
            entry_clip(Direction::Prev),
            ClipInset {
                left: 0.2,
                top: 0.0,
                right: 0.8,
                bottom: 0.8
            }
        );
    }
}
