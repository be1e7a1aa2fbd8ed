//! # Render Batch
//!
//! An append-only geometry accumulator. Many independent draw requests push
//! vertices and locally-numbered indices during a frame; [`RenderBatch::flush`]
//! uploads everything and issues a single indexed draw, then resets.
//!
//! ## Index stitching
//!
//! Each [`RenderBatch::push_indices`] call describes indices relative to its own
//! vertex group (a quad is always `0..4`). The batch offsets them by one past
//! the highest index pushed so far, so callers never track the running vertex
//! count.
//!
//! ## Capacity
//!
//! Capacity is fixed at creation (`triangle_capacity * 3` for both buffers) and
//! checked on every push. A rejected push leaves the batch untouched.

use crate::foundation::math::{Vec2, Vec3, Vec4};
use crate::render::api::{
    BufferHandle, BufferKind, BufferUsage, ProgramHandle, RenderBackend, VertexArrayHandle,
};
use crate::render::vertex_layout::{batch_layout, BatchVertex, PackedVertex};
use crate::render::{RenderError, RenderResult};

/// Result type for batch operations
pub type BatchResult<T> = Result<T, BatchError>;

/// Errors raised while filling a batch
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BatchError {
    /// The push would overflow the fixed-size buffer
    #[error("{buffer:?} buffer capacity exceeded: {requested} requested, {available} available")]
    CapacityExceeded {
        /// Which buffer overflowed
        buffer: BufferKind,
        /// Elements the push asked for
        requested: usize,
        /// Elements still free
        available: usize,
    },

    /// A parallel input slice is shorter than the requested count
    #[error("input `{input}` has {len} elements but {count} were requested")]
    MismatchedInputs {
        /// Name of the short input
        input: &'static str,
        /// Its length
        len: usize,
        /// Requested element count
        count: usize,
    },

    /// A stitched index does not refer to a populated vertex
    #[error("index {index} refers past the {vertex_count} vertices pushed so far")]
    IndexOutOfRange {
        /// Absolute index after stitching
        index: u64,
        /// Vertices currently in the batch
        vertex_count: usize,
    },
}

/// Summary of one flush
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DrawSubmission {
    /// Vertices uploaded
    pub vertex_count: usize,
    /// Indices drawn
    pub index_count: usize,
}

/// Cumulative batch statistics
#[derive(Debug, Clone, Default)]
pub struct BatchStats {
    /// Number of flushes (draw calls) issued
    pub flush_count: u64,

    /// Total vertices uploaded
    pub vertices_submitted: u64,

    /// Total indices drawn
    pub indices_submitted: u64,

    /// Largest single flush, in indices
    pub largest_flush: usize,
}

impl BatchStats {
    /// Average indices per draw call
    pub fn avg_indices_per_flush(&self) -> f32 {
        if self.flush_count == 0 {
            0.0
        } else {
            self.indices_submitted as f32 / self.flush_count as f32
        }
    }
}

/// Fixed-capacity vertex/index accumulator backed by one device buffer pair
#[derive(Debug)]
pub struct RenderBatch {
    vertices: Vec<BatchVertex>,
    indices: Vec<u32>,
    vertex_capacity: usize,
    index_capacity: usize,

    /// Highest index currently in `indices`
    max_index: Option<u32>,

    /// Interleave scratch reused across flushes
    packed: Vec<PackedVertex>,

    vertex_array: VertexArrayHandle,
    vertex_buffer: BufferHandle,
    index_buffer: BufferHandle,

    stats: BatchStats,
}

impl RenderBatch {
    /// Allocate host storage for `triangle_capacity` triangles and the device objects behind it
    pub fn new<B: RenderBackend + ?Sized>(backend: &mut B, triangle_capacity: usize) -> RenderResult<Self> {
        let capacity = triangle_capacity
            .checked_mul(3)
            .filter(|&capacity| capacity > 0 && u32::try_from(capacity).is_ok())
            .ok_or_else(|| {
                RenderError::InitializationFailed(format!(
                    "render batch triangle capacity {triangle_capacity} is not usable"
                ))
            })?;

        let vertex_array = backend
            .create_vertex_array()
            .map_err(|e| RenderError::InitializationFailed(format!("render batch vertex array: {e}")))?;

        let vertex_buffer = match backend.create_buffer(BufferKind::Vertex) {
            Ok(buffer) => buffer,
            Err(e) => {
                let _ = backend.delete_vertex_array(vertex_array);
                return Err(RenderError::InitializationFailed(format!("render batch vertex buffer: {e}")));
            }
        };

        let index_buffer = match backend.create_buffer(BufferKind::Index) {
            Ok(buffer) => buffer,
            Err(e) => {
                let _ = backend.delete_buffer(vertex_buffer);
                let _ = backend.delete_vertex_array(vertex_array);
                return Err(RenderError::InitializationFailed(format!("render batch index buffer: {e}")));
            }
        };

        log::info!(
            "Render batch allocated: {} triangles ({} vertices, {} indices)",
            triangle_capacity,
            capacity,
            capacity
        );

        Ok(Self {
            vertices: Vec::with_capacity(capacity),
            indices: Vec::with_capacity(capacity),
            vertex_capacity: capacity,
            index_capacity: capacity,
            max_index: None,
            packed: Vec::with_capacity(capacity),
            vertex_array,
            vertex_buffer,
            index_buffer,
            stats: BatchStats::default(),
        })
    }

    /// Append `count` vertices built from four parallel inputs
    pub fn push_vertices(
        &mut self,
        positions: &[Vec3],
        colors: &[Vec4],
        texcoords: &[Vec2],
        texture_id: i32,
        count: usize,
    ) -> BatchResult<()> {
        check_len("positions", positions.len(), count)?;
        check_len("colors", colors.len(), count)?;
        check_len("texcoords", texcoords.len(), count)?;
        self.ensure_capacity(count, 0)?;

        let new_vertices = positions
            .iter()
            .zip(colors)
            .zip(texcoords)
            .take(count)
            .map(|((position, color), texcoord)| BatchVertex {
                position: [position.x, position.y, position.z],
                color: [color.x, color.y, color.z, color.w],
                texcoord: [texcoord.x, texcoord.y],
                texture_id,
            });
        self.vertices.extend(new_vertices);

        log::trace!("Batch: +{} vertices ({}/{})", count, self.vertices.len(), self.vertex_capacity);
        Ok(())
    }

    /// Append `count` indices, offset past every index already in the batch
    pub fn push_indices(&mut self, index_offsets: &[u32], count: usize) -> BatchResult<()> {
        check_len("index_offsets", index_offsets.len(), count)?;
        self.ensure_capacity(0, count)?;

        let base = self.next_index_base();
        let vertex_count = self.vertices.len();

        // Validate the whole group before touching the buffer
        for &offset in &index_offsets[..count] {
            let index = u64::from(base) + u64::from(offset);
            if index >= vertex_count as u64 {
                return Err(BatchError::IndexOutOfRange { index, vertex_count });
            }
        }

        for &offset in &index_offsets[..count] {
            // Bounded by vertex_count above, which fits in u32
            let index = base + offset;
            self.max_index = Some(self.max_index.map_or(index, |max| max.max(index)));
            self.indices.push(index);
        }

        log::trace!(
            "Batch: +{} indices from base {} ({}/{})",
            count,
            base,
            self.indices.len(),
            self.index_capacity
        );
        Ok(())
    }

    /// Upload the accumulated geometry, draw it with `program`, and reset
    ///
    /// Flushing an empty batch is legal and issues a zero-count draw.
    pub fn flush<B: RenderBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        program: ProgramHandle,
    ) -> RenderResult<DrawSubmission> {
        let submission = DrawSubmission {
            vertex_count: self.vertices.len(),
            index_count: self.indices.len(),
        };
        let index_count = u32::try_from(submission.index_count)
            .map_err(|_| RenderError::RenderingFailed("index count exceeds u32".to_string()))?;

        self.packed.clear();
        self.packed.extend(self.vertices.iter().map(BatchVertex::pack));

        backend.upload_buffer(self.vertex_buffer, bytemuck::cast_slice(&self.packed), BufferUsage::Dynamic)?;
        backend.upload_buffer(self.index_buffer, bytemuck::cast_slice(&self.indices), BufferUsage::Dynamic)?;
        backend.configure_vertex_layout(self.vertex_array, self.vertex_buffer, self.index_buffer, batch_layout())?;
        backend.draw_indexed_triangles(self.vertex_array, program, index_count)?;

        self.stats.flush_count += 1;
        self.stats.vertices_submitted += submission.vertex_count as u64;
        self.stats.indices_submitted += submission.index_count as u64;
        self.stats.largest_flush = self.stats.largest_flush.max(submission.index_count);

        log::debug!(
            "Batch flushed: {} vertices, {} indices ({} triangles)",
            submission.vertex_count,
            submission.index_count,
            submission.index_count / 3
        );

        self.clear();
        Ok(submission)
    }

    /// Drop accumulated geometry without drawing it
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
        self.max_index = None;
    }

    /// Release the device objects; host storage is dropped with `self`
    pub fn teardown<B: RenderBackend + ?Sized>(self, backend: &mut B) -> RenderResult<()> {
        let results = [
            backend.delete_buffer(self.vertex_buffer),
            backend.delete_buffer(self.index_buffer),
            backend.delete_vertex_array(self.vertex_array),
        ];

        log::info!(
            "Render batch released after {} flushes ({} indices total)",
            self.stats.flush_count,
            self.stats.indices_submitted
        );

        results.into_iter().collect::<RenderResult<Vec<()>>>().map(|_| ())
    }

    /// Fail unless `vertices` more vertices and `indices` more indices fit
    pub fn ensure_capacity(&self, vertices: usize, indices: usize) -> BatchResult<()> {
        let free_vertices = self.remaining_vertices();
        if vertices > free_vertices {
            return Err(BatchError::CapacityExceeded {
                buffer: BufferKind::Vertex,
                requested: vertices,
                available: free_vertices,
            });
        }

        let free_indices = self.remaining_indices();
        if indices > free_indices {
            return Err(BatchError::CapacityExceeded {
                buffer: BufferKind::Index,
                requested: indices,
                available: free_indices,
            });
        }

        Ok(())
    }

    /// Offset applied to the next index group
    pub fn next_index_base(&self) -> u32 {
        self.max_index.map_or(0, |max| max + 1)
    }

    /// Vertices pushed since the last flush
    pub fn vertices(&self) -> &[BatchVertex] {
        &self.vertices
    }

    /// Stitched indices pushed since the last flush
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Current vertex fill level
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Current index fill level
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Fixed vertex capacity
    pub fn vertex_capacity(&self) -> usize {
        self.vertex_capacity
    }

    /// Fixed index capacity
    pub fn index_capacity(&self) -> usize {
        self.index_capacity
    }

    /// Vertices that can still be pushed before the next flush
    pub fn remaining_vertices(&self) -> usize {
        self.vertex_capacity - self.vertices.len()
    }

    /// Indices that can still be pushed before the next flush
    pub fn remaining_indices(&self) -> usize {
        self.index_capacity - self.indices.len()
    }

    /// True when nothing has been pushed since the last flush
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.indices.is_empty()
    }

    /// Cumulative statistics
    pub fn stats(&self) -> &BatchStats {
        &self.stats
    }
}

fn check_len(input: &'static str, len: usize, count: usize) -> BatchResult<()> {
    if len < count {
        Err(BatchError::MismatchedInputs { input, len, count })
    } else {
        Ok(())
    }
}
