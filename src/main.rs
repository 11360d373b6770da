use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use orrery::catalog::{load_catalog, Catalog};
use orrery::controls::{CameraDirector, CameraRig, ControlsConfig};
use orrery::input::MouseController;
use orrery::renderer::Renderer;
use orrery::scene::{SceneConfig, SolarScene, Starfield};

#[derive(Parser, Debug)]
#[command(name = "orrery")]
#[command(about = "Interactive solar system viewer")]
struct Args {
    /// Body catalog file (defaults to the built-in solar system)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Arrow-key movement speed (units per second)
    #[arg(long, default_value_t = orrery::controls::MOVE_SPEED)]
    move_speed: f32,

    /// +/- zoom speed (units per second)
    #[arg(long, default_value_t = orrery::controls::ZOOM_SPEED)]
    zoom_speed: f32,

    /// Focus transition length in seconds
    #[arg(long, default_value_t = orrery::controls::FOCUS_DURATION)]
    focus_duration: f32,

    /// Number of background stars
    #[arg(long, default_value_t = SceneConfig::default().star_count)]
    stars: usize,

    /// Star placement seed
    #[arg(long, default_value_t = SceneConfig::default().star_seed)]
    seed: u64,

    /// Orbit speed multiplier
    #[arg(long, default_value_t = 1.0)]
    time_scale: f32,
}

struct App {
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    catalog: Catalog,
    scene: SolarScene,
    stars: Starfield,
    director: CameraDirector,
    mouse: MouseController,
    started: Instant,
    last_frame: Instant,
}

impl App {
    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(window), Some(renderer)) = (self.window.as_ref(), self.renderer.as_mut()) else {
            return;
        };

        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        self.scene
            .update(now.duration_since(self.started).as_secs_f32(), dt);
        self.director.frame(dt, &mut renderer.camera);

        match renderer.render(window, &self.scene, &self.catalog, &self.director) {
            Ok(_) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                renderer.resize(renderer.size)
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Out of GPU memory, exiting");
                event_loop.exit();
            }
            Err(e) => log::warn!("Render error: {:?}", e),
        }

        window.request_redraw();
    }

    fn handle_key(&mut self, event: &KeyEvent) {
        let rig = self.renderer.as_ref().map(|r| &r.camera as &dyn CameraRig);
        self.director.handle_key(
            &event.logical_key,
            event.state,
            event.repeat,
            &self.catalog,
            &self.scene,
            rig,
        );
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes().with_title("orrery - Solar System");
        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        let mut renderer = match pollster::block_on(Renderer::new(window.clone())) {
            Ok(renderer) => renderer,
            Err(e) => {
                log::error!("Failed to initialize renderer: {:#}", e);
                event_loop.exit();
                return;
            }
        };
        renderer.upload_scene(&self.scene, &self.stars);

        self.window = Some(window);
        self.renderer = Some(renderer);
        self.last_frame = Instant::now();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        // egui gets first look at every event
        let consumed = match (self.window.as_ref(), self.renderer.as_mut()) {
            (Some(window), Some(renderer)) => renderer.handle_window_event(window, &event),
            _ => false,
        };

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                // Releases always reach the router so no key stays stuck
                if !consumed || event.state == ElementState::Released {
                    self.handle_key(&event);
                }
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.mouse.handle_shift(modifiers.state().shift_key());
            }
            WindowEvent::Focused(false) => {
                self.director.release_all();
                self.mouse.state.left_pressed = false;
                self.mouse.state.right_pressed = false;
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if !consumed || state == ElementState::Released {
                    self.mouse.handle_mouse_button(button, state);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if let Some(ref mut renderer) = self.renderer {
                    self.mouse.handle_mouse_move(
                        position.x as f32,
                        position.y as f32,
                        &mut renderer.camera,
                    );
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                if consumed {
                    return;
                }
                if let Some(ref mut renderer) = self.renderer {
                    self.mouse.handle_scroll(delta, &mut renderer.camera);
                }
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(ref mut renderer) = self.renderer {
                    renderer.resize(physical_size);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    let catalog = match &args.catalog {
        Some(path) => load_catalog(path)?,
        None => Catalog::solar_system(),
    };
    log::info!(
        "Loaded {} bodies, outermost orbit at {}",
        catalog.len(),
        catalog.max_distance()
    );

    let scene_config = SceneConfig {
        star_count: args.stars,
        star_seed: args.seed,
        time_scale: args.time_scale,
        ..SceneConfig::default()
    };
    let scene = SolarScene::new(&catalog, scene_config.time_scale);
    let stars = Starfield::generate(
        scene_config.star_count,
        scene_config.star_spread,
        scene_config.star_seed,
    );

    let controls = ControlsConfig {
        move_speed: args.move_speed,
        zoom_speed: args.zoom_speed,
        focus_duration: args.focus_duration,
        ..ControlsConfig::default()
    };
    let director = CameraDirector::new(&catalog, &controls);
    for (name, key) in director.keybinds().iter() {
        log::debug!("Key '{}' focuses {}", key, name);
    }

    // Create window and run
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App {
        window: None,
        renderer: None,
        catalog,
        scene,
        stars,
        director,
        mouse: MouseController::new(),
        started: Instant::now(),
        last_frame: Instant::now(),
    };

    event_loop.run_app(&mut app)?;

    Ok(())
}
