use approx::assert_relative_eq;

use crate::foundation::logging;
use crate::foundation::math::{utils, Mat4, Mat4Ext, Vec3, Vec4};
use crate::input::{HeadlessCursor, InputManager, KeyCode};
use crate::render::backends::HeadlessBackend;
use crate::render::primitives::camera::{PLANE_FAR, PLANE_NEAR};
use crate::render::uniforms::{PROJECTION_UNIFORM, VIEW_UNIFORM};
use crate::render::{Camera, CameraMode, Faces, MovementStep, RenderError, Renderer, Viewport};

const WHITE: Vec4 = Vec4::new(1.0, 1.0, 1.0, 1.0);
const VIEWPORT: Viewport = Viewport::new(640, 640);

fn renderer(triangles: usize) -> Renderer<HeadlessBackend> {
    logging::init_with_level("debug");
    let mut backend = HeadlessBackend::new();
    let program = backend.register_program(&[PROJECTION_UNIFORM, VIEW_UNIFORM]);
    Renderer::new(backend, program, triangles).unwrap()
}

#[test]
fn three_face_voxel_is_one_draw_of_eighteen_indices() {
    let mut renderer = renderer(1024);
    renderer.begin_frame(None, VIEWPORT).unwrap();
    renderer
        .draw_voxel(Vec3::zeros(), 16.0, WHITE, Faces::TOP | Faces::BOTTOM | Faces::RIGHT)
        .unwrap();

    let stats = renderer.end_frame().unwrap();

    assert_eq!(stats.draw_calls, 1);
    assert_eq!(stats.vertices, 12);
    assert_eq!(stats.indices, 18);
    assert_eq!(renderer.batch().vertex_count(), 0);
    assert_eq!(renderer.batch().index_count(), 0);

    let draws = renderer.backend().draw_calls();
    assert_eq!(draws.len(), 1);
    assert_eq!(draws[0].vertex_count(), 12);
    assert_eq!(draws[0].indices, vec![0, 1, 2, 3, 2, 1, 6, 5, 4, 5, 6, 7, 10, 9, 8, 9, 10, 11]);

    // Bottom face vertex 4: corner (0, -16, 0), shaded 0.8
    let vertex = draws[0].vertex(4).unwrap();
    assert_eq!(vertex, &[0.0, -16.0, 0.0, 0.8, 0.8, 0.8, 1.0, 0.0, 0.0, 0.0]);
}

#[test]
fn voxel_floor_batches_into_single_draw() {
    let mut renderer = renderer(1024);
    renderer.begin_frame(None, VIEWPORT).unwrap();

    let tiles = [
        (0.0, 0.0, Faces::from_switches(true, true, false, true, true, false)),
        (0.0, 1.0, Faces::from_switches(true, true, true, false, true, false)),
        (1.0, 0.0, Faces::from_switches(true, true, false, true, false, true)),
        (1.0, 1.0, Faces::from_switches(true, true, true, false, false, true)),
    ];
    for (x, z, faces) in tiles {
        renderer.draw_voxel(Vec3::new(x * 16.0, 0.0, z * 16.0), 16.0, WHITE, faces).unwrap();
    }

    let stats = renderer.end_frame().unwrap();
    assert_eq!(stats.voxels, 4);
    assert_eq!(stats.faces, 16);
    assert_eq!(stats.indices, 96);
    assert_eq!(renderer.backend().draw_calls().len(), 1);
    assert_eq!(*renderer.backend().draw_calls()[0].indices.iter().max().unwrap(), 63);
}

#[test]
fn frame_without_camera_uploads_default_matrices() {
    let mut renderer = renderer(16);
    renderer.begin_frame(None, Viewport::new(800, 600)).unwrap();

    let program = renderer.program();
    let projection = renderer.backend().uniform_value(program, PROJECTION_UNIFORM).unwrap();
    let view = renderer.backend().uniform_value(program, VIEW_UNIFORM).unwrap();

    let expected = Mat4::perspective(utils::deg_to_rad(45.0), 800.0 / 600.0, PLANE_NEAR, PLANE_FAR);
    assert_eq!(projection, utils::to_column_major(&expected));
    assert_eq!(view, utils::to_column_major(&Mat4::identity()));
}

#[test]
fn camera_frame_uploads_camera_matrices() {
    let mut renderer = renderer(16);
    let mut camera = Camera::new(CameraMode::Perspective, Vec3::new(0.0, 8.0, 40.0), 60.0);

    renderer.begin_frame(Some(&mut camera), VIEWPORT).unwrap();

    let program = renderer.program();
    assert_eq!(
        renderer.backend().uniform_value(program, VIEW_UNIFORM),
        Some(utils::to_column_major(camera.view()))
    );
    assert_eq!(
        renderer.backend().uniform_value(program, PROJECTION_UNIFORM),
        Some(utils::to_column_major(camera.projection()))
    );
}

#[test]
fn camera_moves_then_renders() {
    let mut renderer = renderer(64);
    let mut camera = Camera::new(CameraMode::Perspective, Vec3::zeros(), 60.0);
    let mut cursor = HeadlessCursor::new();
    let mut input = InputManager::new();
    input.handle_key_input(KeyCode::W, true);

    for _ in 0..3 {
        input.begin_frame();
        camera.apply_movement(true, &input, &mut cursor, VIEWPORT, MovementStep::PerSample);
        renderer.begin_frame(Some(&mut camera), VIEWPORT).unwrap();
        renderer.draw_voxel(Vec3::zeros(), 16.0, WHITE, Faces::all()).unwrap();
        renderer.end_frame().unwrap();
    }

    assert_relative_eq!(camera.position(), Vec3::new(0.0, 0.0, -3.0), epsilon = 1e-5);
    assert_eq!(renderer.frame_count(), 3);
    assert_eq!(renderer.backend().draw_calls().len(), 3);
    assert!(renderer.backend().draw_calls().iter().all(|draw| draw.index_count == 36));
}

#[test]
fn empty_frames_issue_zero_count_draws() {
    let mut renderer = renderer(16);
    for _ in 0..2 {
        renderer.begin_frame(None, VIEWPORT).unwrap();
        let stats = renderer.end_frame().unwrap();
        assert_eq!(stats.indices, 0);
    }
    assert_eq!(renderer.backend().draw_calls().len(), 2);
}

#[test]
fn mid_frame_flush_makes_room() {
    // 12 triangles hold exactly one full cube
    let mut renderer = renderer(12);
    renderer.begin_frame(None, VIEWPORT).unwrap();
    renderer.draw_voxel(Vec3::zeros(), 1.0, WHITE, Faces::all()).unwrap();

    let err = renderer.draw_voxel(Vec3::zeros(), 1.0, WHITE, Faces::TOP).unwrap_err();
    assert!(matches!(err, RenderError::Batch(_)));

    renderer.flush().unwrap();
    renderer.draw_voxel(Vec3::zeros(), 1.0, WHITE, Faces::TOP).unwrap();
    let stats = renderer.end_frame().unwrap();

    assert_eq!(stats.draw_calls, 2);
    assert_eq!(stats.indices, 42);
}

#[test]
fn zero_viewport_rejected_for_both_paths() {
    let mut renderer = renderer(16);
    let mut camera = Camera::new(CameraMode::Orthographic, Vec3::zeros(), 60.0);

    assert!(matches!(
        renderer.begin_frame(None, Viewport::new(0, 0)),
        Err(RenderError::InvalidViewport { .. })
    ));
    assert!(matches!(
        renderer.begin_frame(Some(&mut camera), Viewport::new(0, 10)),
        Err(RenderError::InvalidViewport { .. })
    ));
}

#[test]
fn program_without_view_uniform_fails_construction() {
    let mut backend = HeadlessBackend::new();
    let program = backend.register_program(&[PROJECTION_UNIFORM]);

    let err = Renderer::new(backend, program, 16).unwrap_err();
    assert!(matches!(err, RenderError::UniformNotFound(name) if name == VIEW_UNIFORM));
}

#[test]
fn allocation_failure_surfaces_at_construction() {
    let mut backend = HeadlessBackend::new().with_object_limit(1);
    let program = backend.register_program(&[PROJECTION_UNIFORM, VIEW_UNIFORM]);

    let err = Renderer::new(backend, program, 16).unwrap_err();
    assert!(matches!(err, RenderError::InitializationFailed(_)));
}

#[test]
fn shutdown_releases_everything() {
    let mut renderer = renderer(16);
    renderer.begin_frame(None, VIEWPORT).unwrap();
    renderer.draw_voxel(Vec3::zeros(), 1.0, WHITE, Faces::TOP).unwrap();
    renderer.end_frame().unwrap();

    let backend = renderer.shutdown().unwrap();
    assert_eq!(backend.live_object_count(), 0);
}
