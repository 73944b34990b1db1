//! Triangle mesh model with rigid keyframed clips.

use glam::{EulerRot, Mat4, Quat, Vec3};

use crate::color::Color;
use crate::error::{RenderError, RenderResult};
use crate::scene::{Aabb, ClipInfo, PosableModel};

/// Converts Euler angles in degrees to a rotation, applying Z, then X,
/// then Y.
pub fn euler_degrees_to_quat(euler: Vec3) -> Quat {
    Quat::from_euler(
        EulerRot::YXZ,
        euler.y.to_radians(),
        euler.x.to_radians(),
        euler.z.to_radians(),
    )
}

/// A flat-colored triangle in model space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// Corner positions.
    pub vertices: [Vec3; 3],
    /// Base color before lighting.
    pub color: Color,
}

impl Triangle {
    /// Creates a triangle.
    pub fn new(a: Vec3, b: Vec3, c: Vec3, color: Color) -> Self {
        Self {
            vertices: [a, b, c],
            color,
        }
    }
}

/// One key of a rigid clip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe {
    /// Time in seconds.
    pub time: f32,
    /// Local translation.
    pub translation: Vec3,
    /// Local rotation as Euler degrees.
    pub rotation: Vec3,
}

impl Keyframe {
    /// Creates a keyframe.
    pub fn new(time: f32, translation: Vec3, rotation: Vec3) -> Self {
        Self {
            time,
            translation,
            rotation,
        }
    }
}

/// A rigid animation clip: the whole mesh moves as one body.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshClip {
    /// Display name and length.
    pub info: ClipInfo,
    /// Keys sorted by time.
    pub keys: Vec<Keyframe>,
}

impl MeshClip {
    /// Creates a clip, sorting its keys by time.
    pub fn new(name: impl Into<String>, duration: f32, mut keys: Vec<Keyframe>) -> Self {
        keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self {
            info: ClipInfo {
                name: name.into(),
                duration,
            },
            keys,
        }
    }

    /// Local transform at `time` seconds, linearly interpolated between keys
    /// and held at either end.
    pub fn sample(&self, time: f32) -> Mat4 {
        let (translation, rotation) = match self.keys.as_slice() {
            [] => return Mat4::IDENTITY,
            [only] => (only.translation, only.rotation),
            keys => {
                let next = keys.partition_point(|k| k.time <= time);
                if next == 0 {
                    (keys[0].translation, keys[0].rotation)
                } else if next == keys.len() {
                    let last = keys[keys.len() - 1];
                    (last.translation, last.rotation)
                } else {
                    let a = keys[next - 1];
                    let b = keys[next];
                    let span = b.time - a.time;
                    let t = if span > 0.0 { (time - a.time) / span } else { 0.0 };
                    (
                        a.translation.lerp(b.translation, t),
                        a.rotation.lerp(b.rotation, t),
                    )
                }
            }
        };

        Mat4::from_rotation_translation(euler_degrees_to_quat(rotation), translation)
    }
}

/// A triangle mesh that implements [`PosableModel`].
///
/// World transform: `root_rotation * translate(position) * scale * clip_pose`.
#[derive(Debug, Clone)]
pub struct MeshModel {
    triangles: Vec<Triangle>,
    clips: Vec<MeshClip>,
    clip_infos: Vec<ClipInfo>,
    scale: f32,
    position: Vec3,
    root_rotation: Vec3,
    active: bool,
    sampling: bool,
    clip_pose: Mat4,
}

impl MeshModel {
    /// Creates a hidden model at identity transform.
    pub fn from_triangles(triangles: Vec<Triangle>) -> Self {
        Self {
            triangles,
            clips: Vec::new(),
            clip_infos: Vec::new(),
            scale: 1.0,
            position: Vec3::ZERO,
            root_rotation: Vec3::ZERO,
            active: false,
            sampling: false,
            clip_pose: Mat4::IDENTITY,
        }
    }

    /// An axis-aligned box centered on the origin.
    pub fn cube(size: Vec3, color: Color) -> Self {
        let h = size * 0.5;
        let corner = |x: f32, y: f32, z: f32| Vec3::new(x * h.x, y * h.y, z * h.z);
        let quads = [
            // -Z (front, faces the default camera)
            [corner(-1., -1., -1.), corner(-1., 1., -1.), corner(1., 1., -1.), corner(1., -1., -1.)],
            // +Z
            [corner(1., -1., 1.), corner(1., 1., 1.), corner(-1., 1., 1.), corner(-1., -1., 1.)],
            // -X
            [corner(-1., -1., 1.), corner(-1., 1., 1.), corner(-1., 1., -1.), corner(-1., -1., -1.)],
            // +X
            [corner(1., -1., -1.), corner(1., 1., -1.), corner(1., 1., 1.), corner(1., -1., 1.)],
            // +Y
            [corner(-1., 1., -1.), corner(-1., 1., 1.), corner(1., 1., 1.), corner(1., 1., -1.)],
            // -Y
            [corner(-1., -1., 1.), corner(-1., -1., -1.), corner(1., -1., -1.), corner(1., -1., 1.)],
        ];

        let triangles = quads
            .iter()
            .flat_map(|q| {
                [
                    Triangle::new(q[0], q[1], q[2], color),
                    Triangle::new(q[0], q[2], q[3], color),
                ]
            })
            .collect();
        Self::from_triangles(triangles)
    }

    /// A latitude/longitude sphere centered on the origin.
    pub fn uv_sphere(radius: f32, segments: u32, rings: u32, color: Color) -> Self {
        let segments = segments.max(3);
        let rings = rings.max(2);
        let point = |ring: u32, seg: u32| {
            let theta = std::f32::consts::PI * ring as f32 / rings as f32;
            let phi = std::f32::consts::TAU * seg as f32 / segments as f32;
            Vec3::new(
                radius * theta.sin() * phi.cos(),
                radius * theta.cos(),
                radius * theta.sin() * phi.sin(),
            )
        };

        let mut triangles = Vec::with_capacity((segments * rings * 2) as usize);
        for ring in 0..rings {
            for seg in 0..segments {
                let a = point(ring, seg);
                let b = point(ring, seg + 1);
                let c = point(ring + 1, seg + 1);
                let d = point(ring + 1, seg);
                if ring != 0 {
                    triangles.push(Triangle::new(a, b, d, color));
                }
                if ring != rings - 1 {
                    triangles.push(Triangle::new(b, c, d, color));
                }
            }
        }
        Self::from_triangles(triangles)
    }

    /// Adds an animation clip.
    pub fn with_clip(mut self, clip: MeshClip) -> Self {
        self.clip_infos.push(clip.info.clone());
        self.clips.push(clip);
        self
    }

    /// Current uniform scale.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Current position inside the root.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Current root rotation in Euler degrees.
    pub fn root_rotation(&self) -> Vec3 {
        self.root_rotation
    }

    /// Returns true while between `begin_sampling` and `end_sampling`.
    pub fn is_sampling(&self) -> bool {
        self.sampling
    }

    /// Model-to-world matrix including any sampled clip pose.
    pub fn world_matrix(&self) -> Mat4 {
        Mat4::from_quat(euler_degrees_to_quat(self.root_rotation))
            * Mat4::from_translation(self.position)
            * Mat4::from_scale(Vec3::splat(self.scale))
            * self.clip_pose
    }

    /// Triangles transformed to world space.
    pub fn world_triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        let m = self.world_matrix();
        self.triangles.iter().map(move |t| Triangle {
            vertices: t.vertices.map(|v| m.transform_point3(v)),
            color: t.color,
        })
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }
}

impl PosableModel for MeshModel {
    fn world_bounds(&self) -> Option<Aabb> {
        Aabb::from_points(self.world_triangles().flat_map(|t| t.vertices))
    }

    fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn set_root_rotation(&mut self, euler_degrees: Vec3) {
        self.root_rotation = euler_degrees;
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn clips(&self) -> &[ClipInfo] {
        &self.clip_infos
    }

    fn begin_sampling(&mut self) {
        self.sampling = true;
    }

    fn sample_clip(&mut self, clip: usize, time: f32) -> RenderResult<()> {
        if !self.sampling {
            return Err(RenderError::clip_sampling(clip, time, "not in sampling mode"));
        }
        let Some(mesh_clip) = self.clips.get(clip) else {
            return Err(RenderError::clip_sampling(
                clip,
                time,
                format!("model has {} clip(s)", self.clips.len()),
            ));
        };
        self.clip_pose = mesh_clip.sample(time);
        Ok(())
    }

    /// Leaves sampling mode and restores the rest pose.
    fn end_sampling(&mut self) {
        self.sampling = false;
        self.clip_pose = Mat4::IDENTITY;
    }
}
