//! # Headless Backend
//!
//! A [`RenderBackend`] that keeps every device object in memory and records
//! what a real device would have been asked to do. Draw calls capture the
//! indices and vertex data that were bound at the time, so tests can assert on
//! exactly what reached the "GPU".


use crate::foundation::collections::{key_to_raw, raw_to_key, HandleMap};
use crate::render::api::{
    BackendResult, BufferHandle, BufferKind, BufferUsage, ProgramHandle, RenderBackend, UniformLocation,
    VertexArrayHandle, VertexAttribute, VertexLayout,
};
use crate::render::RenderError;

#[derive(Debug)]
struct BufferObject {
    kind: BufferKind,
    data: Vec<u8>,
    usage: Option<BufferUsage>,
}

#[derive(Debug, Default)]
struct VertexArrayObject {
    vertex_buffer: Option<BufferHandle>,
    index_buffer: Option<BufferHandle>,
    stride: u32,
    attributes: Vec<VertexAttribute>,
}

#[derive(Debug)]
struct ProgramObject {
    uniforms: Vec<String>,
}

/// One recorded indexed draw
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    /// Program active for the draw
    pub program: ProgramHandle,
    /// Indices requested
    pub index_count: u32,
    /// The first `index_count` indices of the bound index buffer
    pub indices: Vec<u32>,
    /// Size of the bound vertex buffer in bytes
    pub vertex_bytes: usize,
    /// The bound vertex buffer reinterpreted as floats
    pub vertex_floats: Vec<f32>,
    /// Vertex stride configured on the vertex array
    pub stride: u32,
}

impl DrawCall {
    /// Floats of vertex `index`, `None` when it is past the buffer
    pub fn vertex(&self, index: usize) -> Option<&[f32]> {
        let floats_per_vertex = (self.stride / 4) as usize;
        let start = index.checked_mul(floats_per_vertex)?;
        self.vertex_floats.get(start..start + floats_per_vertex)
    }

    /// Number of whole vertices in the bound buffer
    pub fn vertex_count(&self) -> usize {
        if self.stride == 0 {
            0
        } else {
            self.vertex_bytes / self.stride as usize
        }
    }
}

/// One recorded matrix upload
#[derive(Debug, Clone, PartialEq)]
pub struct UniformUpload {
    /// Target program
    pub program: ProgramHandle,
    /// Target location
    pub location: UniformLocation,
    /// Column-major matrix
    pub value: [f32; 16],
}

/// In-memory rendering device
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    buffers: HandleMap<BufferObject>,
    vertex_arrays: HandleMap<VertexArrayObject>,
    programs: Vec<ProgramObject>,
    object_limit: Option<usize>,
    draw_calls: Vec<DrawCall>,
    uniform_uploads: Vec<UniformUpload>,
}

impl HeadlessBackend {
    /// Create an empty device with no allocation limit
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail any allocation that would push live objects above `limit`
    pub fn with_object_limit(mut self, limit: usize) -> Self {
        self.object_limit = Some(limit);
        self
    }

    /// Register a linked program exposing the given uniforms
    ///
    /// Uniform locations are assigned in the order the names are listed.
    pub fn register_program(&mut self, uniforms: &[&str]) -> ProgramHandle {
        let handle = ProgramHandle(self.programs.len() as u64);
        self.programs.push(ProgramObject {
            uniforms: uniforms.iter().map(|name| (*name).to_string()).collect(),
        });
        log::debug!("Headless program {:?} registered with uniforms {:?}", handle, uniforms);
        handle
    }

    /// Every draw issued so far, oldest first
    pub fn draw_calls(&self) -> &[DrawCall] {
        &self.draw_calls
    }

    /// Every matrix upload issued so far, oldest first
    pub fn uniform_uploads(&self) -> &[UniformUpload] {
        &self.uniform_uploads
    }

    /// Latest value uploaded to the uniform called `name` in `program`
    pub fn uniform_value(&self, program: ProgramHandle, name: &str) -> Option<[f32; 16]> {
        let location = self.uniform_location(program, name)?;
        self.uniform_uploads
            .iter()
            .rev()
            .find(|upload| upload.program == program && upload.location == location)
            .map(|upload| upload.value)
    }

    /// Buffers plus vertex arrays currently allocated
    pub fn live_object_count(&self) -> usize {
        self.buffers.len() + self.vertex_arrays.len()
    }

    /// Forget recorded draws and uploads; live objects are kept
    pub fn clear_recordings(&mut self) {
        self.draw_calls.clear();
        self.uniform_uploads.clear();
    }

    fn check_allocation(&self, what: &str) -> BackendResult<()> {
        match self.object_limit {
            Some(limit) if self.live_object_count() >= limit => {
                log::warn!("Headless allocation of {} refused: {} objects live", what, limit);
                Err(RenderError::ResourceCreationFailed(format!(
                    "{what}: device object limit of {limit} reached"
                )))
            }
            _ => Ok(()),
        }
    }

    fn buffer(&self, handle: BufferHandle) -> BackendResult<&BufferObject> {
        self.buffers
            .get(raw_to_key(handle.0))
            .ok_or_else(|| stale("buffer", handle.0))
    }

    fn program(&self, handle: ProgramHandle) -> Option<&ProgramObject> {
        usize::try_from(handle.0).ok().and_then(|index| self.programs.get(index))
    }
}

fn stale(what: &str, raw: u64) -> RenderError {
    RenderError::ResourceCreationFailed(format!("stale or unknown {what} handle {raw:#x}"))
}

impl RenderBackend for HeadlessBackend {
    fn create_vertex_array(&mut self) -> BackendResult<VertexArrayHandle> {
        self.check_allocation("vertex array")?;
        let key = self.vertex_arrays.insert(VertexArrayObject::default());
        Ok(VertexArrayHandle(key_to_raw(key)))
    }

    fn create_buffer(&mut self, kind: BufferKind) -> BackendResult<BufferHandle> {
        self.check_allocation("buffer")?;
        let key = self.buffers.insert(BufferObject {
            kind,
            data: Vec::new(),
            usage: None,
        });
        Ok(BufferHandle(key_to_raw(key)))
    }

    fn upload_buffer(&mut self, buffer: BufferHandle, data: &[u8], usage: BufferUsage) -> BackendResult<()> {
        let object = self
            .buffers
            .get_mut(raw_to_key(buffer.0))
            .ok_or_else(|| stale("buffer", buffer.0))?;

        object.data.clear();
        object.data.extend_from_slice(data);
        object.usage = Some(usage);
        log::trace!("Headless {:?} buffer {:#x}: {} bytes", object.kind, buffer.0, data.len());
        Ok(())
    }

    fn configure_vertex_layout(
        &mut self,
        vertex_array: VertexArrayHandle,
        vertex_buffer: BufferHandle,
        index_buffer: BufferHandle,
        layout: VertexLayout<'_>,
    ) -> BackendResult<()> {
        if self.buffer(vertex_buffer)?.kind != BufferKind::Vertex {
            return Err(RenderError::BackendError("vertex slot bound to an index buffer".to_string()));
        }
        if self.buffer(index_buffer)?.kind != BufferKind::Index {
            return Err(RenderError::BackendError("index slot bound to a vertex buffer".to_string()));
        }

        let vao = self
            .vertex_arrays
            .get_mut(raw_to_key(vertex_array.0))
            .ok_or_else(|| stale("vertex array", vertex_array.0))?;

        vao.vertex_buffer = Some(vertex_buffer);
        vao.index_buffer = Some(index_buffer);
        vao.stride = layout.stride;
        vao.attributes.clear();
        vao.attributes.extend_from_slice(layout.attributes);
        Ok(())
    }

    fn draw_indexed_triangles(
        &mut self,
        vertex_array: VertexArrayHandle,
        program: ProgramHandle,
        index_count: u32,
    ) -> BackendResult<()> {
        if self.program(program).is_none() {
            return Err(RenderError::RenderingFailed(format!("unknown program {program:?}")));
        }

        let vao = self
            .vertex_arrays
            .get(raw_to_key(vertex_array.0))
            .ok_or_else(|| stale("vertex array", vertex_array.0))?;

        let (Some(vertex_buffer), Some(index_buffer)) = (vao.vertex_buffer, vao.index_buffer) else {
            return Err(RenderError::RenderingFailed("draw with unconfigured vertex array".to_string()));
        };

        let index_data = &self.buffer(index_buffer)?.data;
        let available = index_data.len() / 4;
        if index_count as usize > available {
            return Err(RenderError::RenderingFailed(format!(
                "draw of {index_count} indices but only {available} uploaded"
            )));
        }

        let indices = index_data
            .chunks_exact(4)
            .take(index_count as usize)
            .map(|bytes| u32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
            .collect();

        let vertex_data = &self.buffer(vertex_buffer)?.data;
        let vertex_floats = vertex_data
            .chunks_exact(4)
            .map(|bytes| f32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
            .collect();

        let call = DrawCall {
            program,
            index_count,
            indices,
            vertex_bytes: vertex_data.len(),
            vertex_floats,
            stride: vao.stride,
        };

        log::trace!("Headless draw #{}: {} indices", self.draw_calls.len(), index_count);
        self.draw_calls.push(call);
        Ok(())
    }

    fn uniform_location(&self, program: ProgramHandle, name: &str) -> Option<UniformLocation> {
        self.program(program)?
            .uniforms
            .iter()
            .position(|uniform| uniform == name)
            .and_then(|index| i32::try_from(index).ok())
            .map(UniformLocation)
    }

    fn set_uniform_mat4(
        &mut self,
        program: ProgramHandle,
        location: UniformLocation,
        value: &[f32; 16],
    ) -> BackendResult<()> {
        let known = self
            .program(program)
            .zip(usize::try_from(location.0).ok())
            .is_some_and(|(object, index)| index < object.uniforms.len());
        if !known {
            return Err(RenderError::RenderingFailed(format!(
                "uniform location {location:?} is not part of program {program:?}"
            )));
        }

        self.uniform_uploads.push(UniformUpload {
            program,
            location,
            value: *value,
        });
        Ok(())
    }

    fn delete_buffer(&mut self, buffer: BufferHandle) -> BackendResult<()> {
        self.buffers
            .remove(raw_to_key(buffer.0))
            .map(|_| ())
            .ok_or_else(|| stale("buffer", buffer.0))
    }

    fn delete_vertex_array(&mut self, vertex_array: VertexArrayHandle) -> BackendResult<()> {
        self.vertex_arrays
            .remove(raw_to_key(vertex_array.0))
            .map(|_| ())
            .ok_or_else(|| stale("vertex array", vertex_array.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deleted_buffer_handle_is_stale() {
        let mut backend = HeadlessBackend::new();
        let buffer = backend.create_buffer(BufferKind::Vertex).unwrap();
        backend.delete_buffer(buffer).unwrap();

        assert!(backend.upload_buffer(buffer, &[0; 4], BufferUsage::Dynamic).is_err());
        assert!(backend.delete_buffer(buffer).is_err());
    }

    #[test]
    fn object_limit_refuses_allocation() {
        let mut backend = HeadlessBackend::new().with_object_limit(1);
        backend.create_vertex_array().unwrap();

        let err = backend.create_buffer(BufferKind::Index).unwrap_err();
        assert!(matches!(err, RenderError::ResourceCreationFailed(_)));
    }

    #[test]
    fn draw_requires_configured_layout() {
        let mut backend = HeadlessBackend::new();
        let program = backend.register_program(&[]);
        let vao = backend.create_vertex_array().unwrap();

        assert!(backend.draw_indexed_triangles(vao, program, 0).is_err());
    }

    #[test]
    fn draw_captures_bound_indices() {
        let mut backend = HeadlessBackend::new();
        let program = backend.register_program(&[]);
        let vao = backend.create_vertex_array().unwrap();
        let vbo = backend.create_buffer(BufferKind::Vertex).unwrap();
        let ebo = backend.create_buffer(BufferKind::Index).unwrap();

        let indices: [u32; 3] = [0, 2, 1];
        backend.upload_buffer(vbo, bytemuck::cast_slice(&[1.0f32; 6]), BufferUsage::Dynamic).unwrap();
        backend.upload_buffer(ebo, bytemuck::cast_slice(&indices), BufferUsage::Dynamic).unwrap();
        let layout = VertexLayout {
            stride: 8,
            attributes: &[VertexAttribute { location: 0, components: 2, offset: 0 }],
        };
        backend.configure_vertex_layout(vao, vbo, ebo, layout).unwrap();
        backend.draw_indexed_triangles(vao, program, 3).unwrap();

        let draw = &backend.draw_calls()[0];
        assert_eq!(draw.indices, vec![0, 2, 1]);
        assert_eq!(draw.vertex_count(), 3);
        assert_eq!(draw.vertex(2), Some(&[1.0, 1.0][..]));
        assert!(backend.draw_indexed_triangles(vao, program, 4).is_err());
    }

    #[test]
    fn swapped_buffer_kinds_are_rejected() {
        let mut backend = HeadlessBackend::new();
        let vao = backend.create_vertex_array().unwrap();
        let vbo = backend.create_buffer(BufferKind::Vertex).unwrap();
        let ebo = backend.create_buffer(BufferKind::Index).unwrap();
        let layout = VertexLayout { stride: 4, attributes: &[] };

        assert!(backend.configure_vertex_layout(vao, ebo, vbo, layout).is_err());
    }

    #[test]
    fn uniform_uploads_are_recorded_per_name() {
        let mut backend = HeadlessBackend::new();
        let program = backend.register_program(&["a", "b"]);
        let b = backend.uniform_location(program, "b").unwrap();

        let mut value = [0.0; 16];
        value[0] = 3.0;
        backend.set_uniform_mat4(program, b, &value).unwrap();

        assert_eq!(b, UniformLocation(1));
        assert_eq!(backend.uniform_value(program, "b"), Some(value));
        assert_eq!(backend.uniform_value(program, "a"), None);
        assert!(backend.uniform_location(program, "c").is_none());
        assert!(backend.set_uniform_mat4(program, UniformLocation(5), &value).is_err());
    }
}
