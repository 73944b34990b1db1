//! Frame index to model pose.
//!
//! Every frame maps deterministically to a rotation (a lerp between the
//! configured start and end Euler angles) and, when a clip is selected, a
//! normalized animation time. Loop count repeats the motion; ping-pong
//! reverses every odd loop.

use glam::Vec3;
use pixelsheet_spec::SheetConfig;

/// The pose applied to the model for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    /// Root rotation as Euler angles in degrees.
    pub rotation: Vec3,
    /// Normalized clip time in [0, 1], present when a clip is selected.
    pub normalized_time: Option<f32>,
}

/// Raw fraction through the whole sequence for a frame.
///
/// A single-frame sequence always yields 0.
pub fn sequence_fraction(frame_index: u32, frame_count: u32) -> f32 {
    if frame_count <= 1 {
        return 0.0;
    }
    frame_index as f32 / (frame_count - 1) as f32
}

/// Applies looping and ping-pong to a raw fraction.
///
/// Loop boundaries inside the sequence wrap to the start of the next loop,
/// but the final frame (`t = 1`) closes the last loop at its end.
pub fn loop_fraction(t: f32, loop_count: u32, ping_pong: bool) -> f32 {
    let looped = t * loop_count as f32;
    let mut whole = looped.floor();
    let mut local = looped - whole;

    if t >= 1.0 && whole > 0.0 && local == 0.0 {
        whole -= 1.0;
        local = 1.0;
    }

    if ping_pong && (whole as u32) % 2 == 1 {
        local = 1.0 - local;
    }
    local
}

/// Resolves the pose for a frame.
pub fn pose_for_frame(frame_index: u32, config: &SheetConfig) -> Pose {
    let t = sequence_fraction(frame_index, config.frame_count);
    let t = loop_fraction(t, config.loop_count, config.ping_pong);

    let start = Vec3::from_array(config.start_rotation);
    let end = Vec3::from_array(config.end_rotation);

    Pose {
        rotation: start.lerp(end, t),
        normalized_time: config.animation_clip.map(|_| t),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() < 1e-3
    }

    #[test]
    fn test_default_sequence() {
        let config = SheetConfig::default();

        let first = pose_for_frame(0, &config);
        assert!(approx(first.rotation, Vec3::ZERO));
        assert_eq!(first.normalized_time, None);

        let last = pose_for_frame(11, &config);
        assert!(approx(last.rotation, Vec3::new(0.0, 180.0, 0.0)));

        let middle = pose_for_frame(6, &config);
        assert!(approx(middle.rotation, Vec3::new(0.0, 98.1818, 0.0)));
    }

    #[test]
    fn test_single_frame_is_start() {
        let config = SheetConfig::new(1, 64, 64).with_clip(Some(0));
        let pose = pose_for_frame(0, &config);
        assert!(approx(pose.rotation, Vec3::ZERO));
        assert_eq!(pose.normalized_time, Some(0.0));
    }

    #[test]
    fn test_looping_wraps() {
        let config = SheetConfig::new(5, 64, 64).with_loop_count(2);
        // t = 0.5 -> looped 1.0 -> wraps to 0
        let pose = pose_for_frame(2, &config);
        assert!(approx(pose.rotation, Vec3::ZERO));
        // t = 0.25 -> looped 0.5
        let pose = pose_for_frame(1, &config);
        assert!(approx(pose.rotation, Vec3::new(0.0, 90.0, 0.0)));
    }

    #[test]
    fn test_ping_pong_is_symmetric() {
        for frame_count in [3u32, 8, 9, 12, 17] {
            let config = SheetConfig::new(frame_count, 64, 64)
                .with_loop_count(2)
                .with_ping_pong(true);

            for i in 0..frame_count {
                let a = pose_for_frame(i, &config).rotation;
                let b = pose_for_frame(frame_count - 1 - i, &config).rotation;
                assert!(
                    approx(a, b),
                    "frame {} and {} differ for count {}: {:?} vs {:?}",
                    i,
                    frame_count - 1 - i,
                    frame_count,
                    a,
                    b
                );
            }
        }
    }

    #[test]
    fn test_ping_pong_reverses_odd_loops() {
        assert!((loop_fraction(0.75, 2, true) - 0.5).abs() < 1e-6);
        assert!((loop_fraction(0.75, 2, false) - 0.5).abs() < 1e-6);
        assert!((loop_fraction(0.6, 2, true) - 0.8).abs() < 1e-6);
        assert!((loop_fraction(0.6, 2, false) - 0.2).abs() < 1e-6);
        assert_eq!(loop_fraction(1.0, 2, false), 1.0);
        assert_eq!(loop_fraction(1.0, 2, true), 0.0);
    }

    #[test]
    fn test_last_frame_closes_final_loop() {
        let start = Vec3::ZERO;
        let end = Vec3::new(0.0, 180.0, 0.0);
        let cases = [
            (1, false, end),
            (2, false, end),
            (3, false, end),
            (1, true, end),
            (2, true, start),
            (3, true, end),
        ];

        for (loop_count, ping_pong, expected) in cases {
            let config = SheetConfig::new(12, 64, 64)
                .with_loop_count(loop_count)
                .with_ping_pong(ping_pong);
            let last = pose_for_frame(11, &config).rotation;
            assert!(
                approx(last, expected),
                "loops {} ping-pong {}: {:?}",
                loop_count,
                ping_pong,
                last
            );
        }
    }

    #[test]
    fn test_two_frames_differ() {
        let config = SheetConfig::new(2, 64, 64).with_clip(Some(0));
        let first = pose_for_frame(0, &config);
        let last = pose_for_frame(1, &config);
        assert!(approx(first.rotation, Vec3::ZERO));
        assert!(approx(last.rotation, Vec3::new(0.0, 180.0, 0.0)));
        assert_eq!(last.normalized_time, Some(1.0));
    }

    #[test]
    fn test_normalized_time_tracks_fraction() {
        let config = SheetConfig::new(11, 64, 64).with_clip(Some(0));
        let pose = pose_for_frame(3, &config);
        assert!((pose.normalized_time.unwrap() - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_rotation_lerps_every_axis() {
        let config = SheetConfig::new(3, 64, 64).with_rotation([10.0, 0.0, -90.0], [30.0, 360.0, 90.0]);
        let pose = pose_for_frame(1, &config);
        assert!(approx(pose.rotation, Vec3::new(20.0, 180.0, 0.0)));
    }
}
