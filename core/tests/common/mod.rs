//! Shared fixtures for the assembly integration tests.

#![allow(dead_code)]

use skinmesh_core::math::nalgebra::UnitQuaternion;
use skinmesh_core::math::{Vec2, Vec3};
use skinmesh_core::mesh::{Surface, SurfaceVertex};
use skinmesh_core::skeleton::{BoneTransform, Skeleton, SkeletonBone};

/// Route `log` output through the test harness.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A chain of `count` bones, each offset one unit along +Y from its parent.
pub fn chain_skeleton(count: usize) -> Skeleton {
    let bones = (0..count)
        .map(|i| {
            SkeletonBone::new(format!("bone_{i}"), i.checked_sub(1))
                .with_local(BoneTransform::IDENTITY.with_translation([0.0, 1.0, 0.0]))
        })
        .collect();
    Skeleton::new(bones).expect("chain skeleton is valid")
}

/// `count` unparented bones.
pub fn flat_skeleton(count: usize) -> Skeleton {
    let bones = (0..count)
        .map(|i| SkeletonBone::new(format!("bone_{i}"), None))
        .collect();
    Skeleton::new(bones).expect("flat skeleton is valid")
}

/// A vertex with `channels` UVs derived from its position.
pub fn vertex(position: Vec3, channels: usize) -> SurfaceVertex {
    let uvs = (0..channels)
        .map(|c| Vec2::new(position.x + c as f32, position.y))
        .collect();
    SurfaceVertex::new(position).with_uvs(uvs)
}

/// A `columns` x `rows` grid of quads in the XY plane, skinned to two bones
/// whose weights blend across the grid.
pub fn grid_surface(
    columns: u32,
    rows: u32,
    offset: Vec3,
    material: u32,
    channels: usize,
    bones: (u32, u32),
) -> Surface {
    let mut surface = Surface::new(material);
    for y in 0..=rows {
        for x in 0..=columns {
            let t = x as f32 / columns.max(1) as f32;
            let position = offset + Vec3::new(x as f32, y as f32, 0.0);
            let flip = (x + y) % 2 == 1;
            surface.push_vertex(
                vertex(position, channels)
                    .with_tangent_frame(Vec3::x(), Vec3::z(), flip)
                    .with_influences(vec![(bones.0, 1.0 - t), (bones.1, t)]),
            );
        }
    }
    let stride = columns + 1;
    let mut indices = Vec::with_capacity((columns * rows * 6) as usize);
    for y in 0..rows {
        for x in 0..columns {
            let a = y * stride + x;
            let b = a + 1;
            let c = a + stride;
            let d = c + 1;
            indices.extend_from_slice(&[a, b, d, a, d, c]);
        }
    }
    surface.with_indices(indices)
}

/// A triangle fan whose vertices each carry a differently rotated unit
/// tangent frame, with alternating binormal flips.
pub fn rotated_frame_surface(corners: u32, material: u32) -> Surface {
    let mut surface = Surface::new(material).with_vertices([SurfaceVertex::new(Vec3::zeros())
        .with_uvs(vec![Vec2::zeros()])
        .with_influences(vec![(0, 1.0)])]);
    for i in 0..corners {
        let angle = i as f32 * 0.7;
        let rotation = UnitQuaternion::from_euler_angles(angle, angle * 0.5 + 0.3, -angle * 1.3);
        let position = Vec3::new(angle.cos(), angle.sin(), 0.0);
        surface.push_vertex(
            vertex(position, 1)
                .with_tangent_frame(rotation * Vec3::x(), rotation * Vec3::z(), i % 2 == 0)
                .with_influences(vec![(i % 3, 0.6), (3, 0.4)]),
        );
    }
    let indices = (1..corners).flat_map(|i| [0, i, i + 1]).collect();
    surface.with_indices(indices)
}

/// A single triangle with no influences.
pub fn triangle(material: u32, offset: Vec3) -> Surface {
    Surface::new(material)
        .with_vertices([
            SurfaceVertex::new(offset),
            SurfaceVertex::new(offset + Vec3::new(1.0, 0.0, 0.0)),
            SurfaceVertex::new(offset + Vec3::new(0.0, 1.0, 0.0)),
        ])
        .with_indices(vec![0, 1, 2])
}
