//! Batch vertex types and their interleaved device layout
//!
//! The batch keeps vertices in a host-friendly struct and interleaves them into
//! [`PackedVertex`] only at flush time. The packed form is ten floats:
//!
//! | location | attribute  | components | byte offset |
//! |----------|------------|------------|-------------|
//! | 0        | position   | 3          | 0           |
//! | 1        | color      | 4          | 12          |
//! | 2        | texcoord   | 2          | 28          |
//! | 3        | texture id | 1          | 36          |

use bytemuck::{Pod, Zeroable};

use crate::render::api::{VertexAttribute, VertexLayout};

/// Floats per packed vertex
pub const FLOATS_PER_VERTEX: usize = 3 + 4 + 2 + 1;

/// Bytes per packed vertex
pub const VERTEX_STRIDE: u32 = (FLOATS_PER_VERTEX * std::mem::size_of::<f32>()) as u32;

/// Attribute descriptions matching [`PackedVertex`]
pub const BATCH_ATTRIBUTES: [VertexAttribute; 4] = [
    VertexAttribute { location: 0, components: 3, offset: 0 },
    VertexAttribute { location: 1, components: 4, offset: 12 },
    VertexAttribute { location: 2, components: 2, offset: 28 },
    VertexAttribute { location: 3, components: 1, offset: 36 },
];

/// Layout handed to the backend when the batch is flushed
pub fn batch_layout() -> VertexLayout<'static> {
    VertexLayout {
        stride: VERTEX_STRIDE,
        attributes: &BATCH_ATTRIBUTES,
    }
}

/// A vertex as accumulated by the render batch
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BatchVertex {
    /// Position in world space
    pub position: [f32; 3],

    /// RGBA color, not clamped
    pub color: [f32; 4],

    /// Texture coordinates
    pub texcoord: [f32; 2],

    /// Texture selector (always 0 until atlasing exists)
    pub texture_id: i32,
}

impl BatchVertex {
    /// Interleave into the device layout
    pub fn pack(&self) -> PackedVertex {
        PackedVertex {
            position: self.position,
            color: self.color,
            texcoord: self.texcoord,
            texture_id: self.texture_id as f32,
        }
    }
}

/// Interleaved vertex exactly as uploaded to the vertex buffer
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PackedVertex {
    /// Position (location 0)
    pub position: [f32; 3],
    /// Color (location 1)
    pub color: [f32; 4],
    /// Texture coordinates (location 2)
    pub texcoord: [f32; 2],
    /// Texture selector as float (location 3)
    pub texture_id: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packed_vertex_is_ten_floats() {
        assert_eq!(std::mem::size_of::<PackedVertex>(), 40);
        assert_eq!(VERTEX_STRIDE, 40);
    }

    #[test]
    fn attribute_offsets_follow_field_order() {
        let mut expected_offset = 0;
        for attribute in &BATCH_ATTRIBUTES {
            assert_eq!(attribute.offset, expected_offset);
            expected_offset += attribute.components * 4;
        }
        assert_eq!(expected_offset, VERTEX_STRIDE);
    }

    #[test]
    fn packing_preserves_field_order_in_bytes() {
        let vertex = BatchVertex {
            position: [1.0, 2.0, 3.0],
            color: [0.1, 0.2, 0.3, 0.4],
            texcoord: [0.5, 0.6],
            texture_id: 7,
        };
        let packed = [vertex.pack()];
        let floats: &[f32] = bytemuck::cast_slice(&packed);

        assert_eq!(floats, &[1.0, 2.0, 3.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 7.0]);
    }
}
