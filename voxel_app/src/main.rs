//! Voxel floor demo
//!
//! Renders the 2x2 voxel floor through the headless backend while a scripted
//! input sequence flies the camera around it, logging what each frame
//! submitted. Pass a `.toml` or `.ron` configuration path as the first
//! argument to override the defaults.

use thiserror::Error;
use voxel_engine::core::config::{ApplicationConfig, Config, ConfigError};
use voxel_engine::foundation::math::{Vec3, Vec4};
use voxel_engine::foundation::time::FrameClock;
use voxel_engine::input::{HeadlessCursor, InputManager, KeyCode};
use voxel_engine::render::backends::HeadlessBackend;
use voxel_engine::render::uniforms::CameraUniforms;
use voxel_engine::render::{Camera, Faces, FrameStats, MovementStep, RenderError, Renderer, Viewport};

/// Frames the scripted run lasts
const FRAME_COUNT: u64 = 120;

/// Fixed timestep fed to timed movement
const FRAME_SECONDS: f32 = 1.0 / 60.0;

/// Floor tiles as (x, z) grid cell and visible faces
const FLOOR: [(f32, f32, [bool; 6]); 4] = [
    (0.0, 0.0, [true, true, false, true, true, false]),
    (0.0, 1.0, [true, true, true, false, true, false]),
    (1.0, 0.0, [true, true, false, true, false, true]),
    (1.0, 1.0, [true, true, true, false, false, true]),
];

#[derive(Debug, Error)]
enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("render error: {0}")]
    Render(#[from] RenderError),
}

struct VoxelApp {
    renderer: Renderer<HeadlessBackend>,
    camera: Camera,
    input: InputManager,
    cursor: HeadlessCursor,
    clock: FrameClock,
    viewport: Viewport,
    config: ApplicationConfig,
}

impl VoxelApp {
    fn new(config: ApplicationConfig) -> Result<Self, AppError> {
        log::info!("Creating headless device...");
        let mut backend = HeadlessBackend::new();
        let program = backend.register_program(&[
            config.renderer.projection_uniform.as_str(),
            config.renderer.view_uniform.as_str(),
        ]);

        let renderer = Renderer::from_config(backend, program, &config)?;
        let camera = Camera::from_config(&config.camera);
        let viewport = Viewport::new(config.window.width, config.window.height);
        viewport.validate()?;

        log::info!(
            "'{}' ready: {}x{} viewport, camera at {:?}",
            config.window.title,
            viewport.width,
            viewport.height,
            camera.position()
        );

        Ok(Self {
            renderer,
            camera,
            input: InputManager::new(),
            cursor: HeadlessCursor::new(),
            clock: FrameClock::new(),
            viewport,
            config,
        })
    }

    /// Feed the input a frame would have received from the window
    fn script_input(&mut self, frame: u64) {
        let (center_x, center_y) = self.viewport.center();

        let phase = frame / 30;
        self.input.handle_key_input(KeyCode::S, phase == 0);
        self.input.handle_key_input(KeyCode::D, phase == 1);
        self.input.handle_key_input(KeyCode::Space, phase == 2);

        match phase {
            1 => self.input.handle_mouse_move(center_x + 4.0, center_y),
            3 => self.input.handle_mouse_move(center_x, center_y + 3.0),
            _ => {}
        }

        if frame + 1 == FRAME_COUNT {
            self.input.handle_key_input(KeyCode::Escape, true);
        }
    }

    fn movement_step(&mut self) -> MovementStep {
        let delta_seconds = self.clock.advance(FRAME_SECONDS);
        if self.config.camera.frame_rate_independent {
            MovementStep::Timed { delta_seconds }
        } else {
            MovementStep::PerSample
        }
    }

    fn frame(&mut self, frame: u64) -> Result<FrameStats, AppError> {
        self.input.begin_frame();
        self.script_input(frame);

        let step = self.movement_step();
        self.camera
            .apply_movement(true, &self.input, &mut self.cursor, self.viewport, step);
        if self.camera.is_relative_mode() {
            self.input.set_anchor(Some(self.viewport.center()));
        }

        self.renderer.begin_frame(Some(&mut self.camera), self.viewport)?;

        let size = self.config.voxel.voxel_size;
        let tint = Vec4::new(1.0, 1.0, 1.0, 1.0);
        for (x, z, [top, bottom, front, back, left, right]) in FLOOR {
            let faces = Faces::from_switches(top, bottom, front, back, left, right);
            self.renderer
                .draw_voxel(Vec3::new(x * size, 0.0, z * size), size, tint, faces)?;
        }

        Ok(self.renderer.end_frame()?)
    }

    fn run(mut self) -> Result<(), AppError> {
        log::info!("Running {} scripted frames", FRAME_COUNT);

        let mut frame = 0;
        while !self.input.close_requested() && frame < FRAME_COUNT {
            let stats = self.frame(frame)?;
            if frame % 30 == 0 {
                log::info!(
                    "Frame {}: {} draw call(s), {} faces, {} vertices, {} indices; camera {:?} yaw {:.1} pitch {:.1}",
                    stats.frame,
                    stats.draw_calls,
                    stats.faces,
                    stats.vertices,
                    stats.indices,
                    self.camera.position(),
                    self.camera.yaw(),
                    self.camera.pitch()
                );
            }
            frame += 1;
        }

        let batch_stats = self.renderer.batch().stats().clone();
        log::info!(
            "Batch totals: {} flushes, {} vertices, {} indices ({:.1} indices per draw)",
            batch_stats.flush_count,
            batch_stats.vertices_submitted,
            batch_stats.indices_submitted,
            batch_stats.avg_indices_per_flush()
        );

        let uniforms: CameraUniforms = *self.renderer.uniforms();
        let backend = self.renderer.shutdown()?;
        log::info!(
            "Device recorded {} draws and {} uniform uploads to program {:?}; {} objects left",
            backend.draw_calls().len(),
            backend.uniform_uploads().len(),
            uniforms.program,
            backend.live_object_count()
        );
        Ok(())
    }
}

fn load_config() -> Result<ApplicationConfig, AppError> {
    let config = match std::env::args().nth(1) {
        Some(path) => ApplicationConfig::load_from_file(&path)?,
        None => ApplicationConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.engine.log_level.as_str()))
        .format_timestamp_millis()
        .init();

    log::info!("Starting voxel floor demo");
    VoxelApp::new(config)?.run()?;
    log::info!("Voxel floor demo finished");
    Ok(())
}
