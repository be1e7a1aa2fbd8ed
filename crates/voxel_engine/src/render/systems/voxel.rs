//! # Voxel Mesher
//!
//! Emits the visible faces of an axis-aligned cube into a [`RenderBatch`].
//!
//! A voxel at `position` with edge `size` spans `position` to
//! `position + (size, -size, size)`: it hangs *down* from its corner. The
//! eight lattice corners are numbered
//!
//! ```text
//!       2 ---- 3
//!      /|     /|
//!     0 ---- 1 |        0..3 at y
//!     | 6 ---| 7        4..7 at y - size
//!     |/     |/
//!     4 ---- 5
//! ```
//!
//! Each face is a quad of four corners drawn as two triangles. Faces whose
//! corner order would otherwise face inward use the reversed winding so every
//! face culls consistently.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::foundation::math::{Vec2, Vec3, Vec4};
use crate::render::batch::{BatchResult, RenderBatch};

/// Quad indices in corner order
pub const WINDING_FORWARD: [u32; 6] = [0, 1, 2, 3, 2, 1];

/// Quad indices with the opposite facing
pub const WINDING_REVERSED: [u32; 6] = [2, 1, 0, 1, 2, 3];

const FACE_TEXCOORDS: [Vec2; 4] = [
    Vec2::new(0.0, 0.0),
    Vec2::new(1.0, 0.0),
    Vec2::new(0.0, 1.0),
    Vec2::new(1.0, 1.0),
];

bitflags! {
    /// Set of cube faces to emit
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Faces: u8 {
        /// +Y face
        const TOP = 1 << 0;
        /// -Y face
        const BOTTOM = 1 << 1;
        /// +Z face
        const FRONT = 1 << 2;
        /// -Z face
        const BACK = 1 << 3;
        /// -X face
        const LEFT = 1 << 4;
        /// +X face
        const RIGHT = 1 << 5;
    }
}

impl Faces {
    /// Build a mask from per-face switches, in top/bottom/front/back/left/right order
    pub fn from_switches(top: bool, bottom: bool, front: bool, back: bool, left: bool, right: bool) -> Self {
        let mut faces = Self::empty();
        faces.set(Self::TOP, top);
        faces.set(Self::BOTTOM, bottom);
        faces.set(Self::FRONT, front);
        faces.set(Self::BACK, back);
        faces.set(Self::LEFT, left);
        faces.set(Self::RIGHT, right);
        faces
    }

    /// Number of faces in the set
    pub fn face_count(self) -> usize {
        self.bits().count_ones() as usize
    }
}

/// One cube face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Face {
    /// +Y
    Top,
    /// -Y
    Bottom,
    /// +Z
    Front,
    /// -Z
    Back,
    /// -X
    Left,
    /// +X
    Right,
}

impl Face {
    /// All faces in emission order
    pub const ALL: [Face; 6] = [Face::Top, Face::Bottom, Face::Front, Face::Back, Face::Left, Face::Right];

    /// Mask bit for this face
    pub fn flag(self) -> Faces {
        match self {
            Face::Top => Faces::TOP,
            Face::Bottom => Faces::BOTTOM,
            Face::Front => Faces::FRONT,
            Face::Back => Faces::BACK,
            Face::Left => Faces::LEFT,
            Face::Right => Faces::RIGHT,
        }
    }

    /// Lattice corners making up the quad
    pub fn corners(self) -> [usize; 4] {
        match self {
            Face::Top => [0, 1, 2, 3],
            Face::Bottom => [4, 5, 6, 7],
            Face::Front => [2, 3, 6, 7],
            Face::Back => [0, 1, 4, 5],
            Face::Left => [0, 2, 4, 6],
            Face::Right => [1, 3, 5, 7],
        }
    }

    /// Local index order for the quad
    pub fn winding(self) -> [u32; 6] {
        match self {
            Face::Top | Face::Front | Face::Left => WINDING_FORWARD,
            Face::Bottom | Face::Back | Face::Right => WINDING_REVERSED,
        }
    }
}

/// Per-face brightness multipliers applied to the tint's RGB
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaceShading {
    /// Top face factor
    pub top: f32,
    /// Bottom face factor
    pub bottom: f32,
    /// Front face factor
    pub front: f32,
    /// Back face factor
    pub back: f32,
    /// Left face factor
    pub left: f32,
    /// Right face factor
    pub right: f32,
}

impl FaceShading {
    /// Standard table
    pub const CANONICAL: Self = Self {
        top: 1.0,
        bottom: 0.8,
        front: 0.9,
        back: 0.9,
        left: 0.85,
        right: 0.85,
    };

    /// Darker front/back variant used by the inline demo driver
    pub const INLINE_DRIVER: Self = Self {
        front: 0.8,
        back: 0.8,
        ..Self::CANONICAL
    };

    /// No shading; every face keeps the tint
    pub const FLAT: Self = Self {
        top: 1.0,
        bottom: 1.0,
        front: 1.0,
        back: 1.0,
        left: 1.0,
        right: 1.0,
    };

    /// Factor for `face`
    pub fn factor(&self, face: Face) -> f32 {
        match face {
            Face::Top => self.top,
            Face::Bottom => self.bottom,
            Face::Front => self.front,
            Face::Back => self.back,
            Face::Left => self.left,
            Face::Right => self.right,
        }
    }
}

impl Default for FaceShading {
    fn default() -> Self {
        Self::CANONICAL
    }
}

/// Lattice corners of a voxel
pub fn voxel_corners(position: Vec3, size: f32) -> [Vec3; 8] {
    let (x, y, z) = (position.x, position.y, position.z);
    [
        Vec3::new(x, y, z),
        Vec3::new(x + size, y, z),
        Vec3::new(x, y, z + size),
        Vec3::new(x + size, y, z + size),
        Vec3::new(x, y - size, z),
        Vec3::new(x + size, y - size, z),
        Vec3::new(x, y - size, z + size),
        Vec3::new(x + size, y - size, z + size),
    ]
}

/// Emits cuboid faces with a fixed shading table
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VoxelMesher {
    shading: FaceShading,
}

impl VoxelMesher {
    /// Mesher using `shading`
    pub fn new(shading: FaceShading) -> Self {
        Self { shading }
    }

    /// Active shading table
    pub fn shading(&self) -> &FaceShading {
        &self.shading
    }

    /// Push the requested faces of one voxel, returning how many were emitted
    ///
    /// Either every requested face fits and is pushed, or the batch is left
    /// untouched and a capacity error is returned.
    pub fn emit_cuboid(
        &self,
        batch: &mut RenderBatch,
        position: Vec3,
        size: f32,
        tint: Vec4,
        faces: Faces,
    ) -> BatchResult<usize> {
        let face_count = faces.face_count();
        if face_count == 0 {
            return Ok(0);
        }
        batch.ensure_capacity(face_count * 4, face_count * 6)?;

        let lattice = voxel_corners(position, size);

        for face in Face::ALL.into_iter().filter(|face| faces.contains(face.flag())) {
            let positions = face.corners().map(|corner| lattice[corner]);

            let factor = self.shading.factor(face);
            let color = Vec4::new(tint.x * factor, tint.y * factor, tint.z * factor, tint.w);
            let colors = [color; 4];

            batch.push_vertices(&positions, &colors, &FACE_TEXCOORDS, 0, 4)?;
            batch.push_indices(&face.winding(), 6)?;
        }

        log::trace!("Voxel at {:?} (size {}): {} faces", position, size, face_count);
        Ok(face_count)
    }
}

/// Push one voxel with the standard shading table
pub fn emit_cuboid(batch: &mut RenderBatch, position: Vec3, size: f32, tint: Vec4, faces: Faces) -> BatchResult<usize> {
    VoxelMesher::default().emit_cuboid(batch, position, size, tint, faces)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::backends::HeadlessBackend;
    use crate::render::batch::BatchError;

    const WHITE: Vec4 = Vec4::new(1.0, 1.0, 1.0, 1.0);

    fn batch(triangles: usize) -> RenderBatch {
        let mut backend = HeadlessBackend::new();
        RenderBatch::new(&mut backend, triangles).unwrap()
    }

    #[test]
    fn every_face_combination_yields_four_vertices_and_six_indices_per_face() {
        let mut batch = batch(64);
        for bits in 0..64u8 {
            let faces = Faces::from_bits_truncate(bits);
            batch.clear();

            let emitted = emit_cuboid(&mut batch, Vec3::zeros(), 16.0, WHITE, faces).unwrap();

            let expected = bits.count_ones() as usize;
            assert_eq!(emitted, expected);
            assert_eq!(batch.vertex_count(), 4 * expected, "mask {bits:#08b}");
            assert_eq!(batch.index_count(), 6 * expected, "mask {bits:#08b}");
        }
    }

    #[test]
    fn empty_mask_emits_nothing() {
        let mut batch = batch(4);
        assert_eq!(emit_cuboid(&mut batch, Vec3::zeros(), 1.0, WHITE, Faces::empty()).unwrap(), 0);
        assert!(batch.is_empty());
    }

    #[test]
    fn top_and_bottom_shading() {
        let mut batch = batch(8);
        emit_cuboid(&mut batch, Vec3::zeros(), 16.0, WHITE, Faces::TOP | Faces::BOTTOM).unwrap();

        let vertices = batch.vertices();
        for vertex in &vertices[..4] {
            assert_eq!(vertex.color, [1.0, 1.0, 1.0, 1.0]);
        }
        for vertex in &vertices[4..] {
            assert_eq!(vertex.color, [0.8, 0.8, 0.8, 1.0]);
        }
    }

    #[test]
    fn tint_alpha_is_not_shaded() {
        let mut batch = batch(8);
        let tint = Vec4::new(0.5, 1.0, 0.25, 0.5);
        emit_cuboid(&mut batch, Vec3::zeros(), 1.0, tint, Faces::LEFT).unwrap();

        assert_eq!(batch.vertices()[0].color, [0.5 * 0.85, 0.85, 0.25 * 0.85, 0.5]);
    }

    #[test]
    fn inline_driver_preset_darkens_front() {
        let mesher = VoxelMesher::new(FaceShading::INLINE_DRIVER);
        let mut batch = batch(8);
        mesher.emit_cuboid(&mut batch, Vec3::zeros(), 1.0, WHITE, Faces::FRONT).unwrap();

        assert_eq!(batch.vertices()[0].color, [0.8, 0.8, 0.8, 1.0]);
        assert_eq!(FaceShading::INLINE_DRIVER.left, FaceShading::CANONICAL.left);
    }

    #[test]
    fn faces_use_expected_corners_and_uvs() {
        let mut batch = batch(8);
        emit_cuboid(&mut batch, Vec3::new(16.0, 0.0, 32.0), 16.0, WHITE, Faces::TOP).unwrap();

        let positions: Vec<[f32; 3]> = batch.vertices().iter().map(|v| v.position).collect();
        assert_eq!(
            positions,
            vec![[16.0, 0.0, 32.0], [32.0, 0.0, 32.0], [16.0, 0.0, 48.0], [32.0, 0.0, 48.0]]
        );

        let texcoords: Vec<[f32; 2]> = batch.vertices().iter().map(|v| v.texcoord).collect();
        assert_eq!(texcoords, vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]]);
        assert!(batch.vertices().iter().all(|v| v.texture_id == 0));
    }

    #[test]
    fn right_face_hangs_below_position() {
        let mut batch = batch(8);
        emit_cuboid(&mut batch, Vec3::zeros(), 2.0, WHITE, Faces::RIGHT).unwrap();

        let positions: Vec<[f32; 3]> = batch.vertices().iter().map(|v| v.position).collect();
        assert_eq!(
            positions,
            vec![[2.0, 0.0, 0.0], [2.0, 0.0, 2.0], [2.0, -2.0, 0.0], [2.0, -2.0, 2.0]]
        );
    }

    #[test]
    fn windings_are_stitched_in_emission_order() {
        let mut batch = batch(16);
        emit_cuboid(&mut batch, Vec3::zeros(), 16.0, WHITE, Faces::TOP | Faces::BOTTOM | Faces::RIGHT).unwrap();

        assert_eq!(
            batch.indices(),
            &[0, 1, 2, 3, 2, 1, 6, 5, 4, 5, 6, 7, 10, 9, 8, 9, 10, 11]
        );
    }

    #[test]
    fn cuboid_is_all_or_nothing() {
        // 2 triangles = 6 vertex slots, two faces need 8
        let mut batch = batch(2);
        let err = emit_cuboid(&mut batch, Vec3::zeros(), 1.0, WHITE, Faces::TOP | Faces::BOTTOM).unwrap_err();

        assert!(matches!(err, BatchError::CapacityExceeded { requested: 8, available: 6, .. }));
        assert!(batch.is_empty());
    }

    #[test]
    fn switches_map_to_flags() {
        let faces = Faces::from_switches(true, true, false, true, true, false);
        assert_eq!(faces, Faces::TOP | Faces::BOTTOM | Faces::BACK | Faces::LEFT);
        assert_eq!(faces.face_count(), 4);
    }
}
