use std::num::NonZeroU32;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use log::{debug, error, info};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use maze_caster::config::EngineConfig;
use maze_caster::input::KeyState;
use maze_caster::level::{ATLAS_PATH, Level, builtin_atlas};
use maze_caster::logging;
use maze_caster::renderer::{Framebuffer, render_frame};
use maze_caster::scaler::{ScaleLut, blit_nearest_stretch, build_scale_lut};
use maze_caster::texture::{Atlas, TextureResource};
use maze_caster::world::{GameState, World};

const TITLE: &str = "Maze Caster";
const WINDOW_SCALE: f64 = 5.0;

/// First-person ray-cast maze
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Texture atlas image (PNG)
    #[arg(long, default_value = ATLAS_PATH)]
    atlas: PathBuf,

    /// Horizontal field of view in degrees
    #[arg(long, default_value_t = 60.0)]
    fov: f32,

    /// Maximum ray distance in world units
    #[arg(long, default_value_t = 20.0)]
    max_range: f32,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

struct App {
    window: Option<Rc<Window>>,
    surface: Option<softbuffer::Surface<Rc<Window>, Rc<Window>>>,

    config: EngineConfig,
    atlas: Atlas,
    texture: TextureResource,
    world: World,
    keys: KeyState,

    // HUD
    frame_counter: u32,
    last_fps_print: Instant,

    // Internal low-res buffer
    fb: Framebuffer,
    scale_lut: ScaleLut,
}

impl App {
    fn new(config: EngineConfig, atlas: Atlas, texture: TextureResource, world: World) -> Self {
        Self {
            window: None,
            surface: None,
            fb: Framebuffer::new(config.screen_width, config.screen_height),
            config,
            atlas,
            texture,
            world,
            keys: KeyState::default(),
            frame_counter: 0,
            last_fps_print: Instant::now(),
            scale_lut: ScaleLut::empty(),
        }
    }

    fn create_surface(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let attributes = Window::default_attributes()
            .with_title(TITLE)
            .with_inner_size(LogicalSize::new(
                self.config.screen_width as f64 * WINDOW_SCALE,
                self.config.screen_height as f64 * WINDOW_SCALE,
            ));

        let window = Rc::new(
            event_loop
                .create_window(attributes)
                .context("create window")?,
        );
        let context = softbuffer::Context::new(window.clone())
            .map_err(|e| anyhow::anyhow!("softbuffer context: {e}"))?;
        let surface = softbuffer::Surface::new(&context, window.clone())
            .map_err(|e| anyhow::anyhow!("softbuffer surface: {e}"))?;

        let size = window.inner_size();
        self.rebuild_lut(size.width as usize, size.height as usize);

        self.surface = Some(surface);
        window.request_redraw();
        self.window = Some(window);
        Ok(())
    }

    fn tick(&mut self) {
        self.texture.poll();

        let input = self.keys.snapshot();
        if let Some(state) = self.world.tick(&input) {
            self.on_state_change(state);
        }
    }

    fn on_state_change(&self, state: GameState) {
        let title = match state {
            GameState::Playing => TITLE.to_string(),
            _ => {
                info!("{}", state.message());
                format!("{TITLE} - {}", state.message())
            }
        };
        if let Some(window) = &self.window {
            window.set_title(&title);
        }
    }

    fn draw(&mut self, id: WindowId) -> anyhow::Result<()> {
        let (window, surface) = match (&self.window, &mut self.surface) {
            (Some(w), Some(s)) if w.id() == id => (w, s),
            _ => return Ok(()),
        };

        let size = window.inner_size();
        let (Some(w), Some(h)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
        else {
            return Ok(()); // Minimized window, skip drawing
        };
        let (dw, dh) = (size.width as usize, size.height as usize);
        if self.scale_lut.dst_size() != (dw, dh) {
            self.scale_lut = build_scale_lut(dw, dh, self.fb.width(), self.fb.height());
        }

        surface
            .resize(w, h)
            .map_err(|e| anyhow::anyhow!("resize surface: {e}"))?;

        render_frame(
            &mut self.fb,
            &self.world,
            self.texture.texture(),
            &self.atlas,
            &self.config,
        );

        let mut buf = surface
            .buffer_mut()
            .map_err(|e| anyhow::anyhow!("buffer_mut: {e}"))?;
        blit_nearest_stretch(&mut buf, dw, self.fb.pixels(), self.fb.width(), &self.scale_lut);
        buf.present()
            .map_err(|e| anyhow::anyhow!("present: {e}"))?;

        self.frame_counter += 1;
        let elapsed = self.last_fps_print.elapsed().as_secs_f32();
        if elapsed >= 1.0 {
            debug!("FPS: {:.1}", self.frame_counter as f32 / elapsed);
            self.frame_counter = 0;
            self.last_fps_print = Instant::now();
        }
        Ok(())
    }

    fn rebuild_lut(&mut self, dst_w: usize, dst_h: usize) {
        self.scale_lut = build_scale_lut(dst_w, dst_h, self.fb.width(), self.fb.height());
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.create_surface(event_loop) {
            error!("Failed to open window: {e:#}");
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested; stopping");
                event_loop.exit();
            }

            WindowEvent::KeyboardInput { event, .. } => self.keys.process_key(&event),

            WindowEvent::Focused(false) => self.keys.clear(),

            WindowEvent::RedrawRequested => {
                // One tick per display refresh: update, then render
                self.tick();
                if let Err(e) = self.draw(id) {
                    error!("Frame failed: {e:#}");
                    event_loop.exit();
                    return;
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            WindowEvent::Resized(new_size) => {
                self.rebuild_lut(new_size.width as usize, new_size.height as usize);
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let config = EngineConfig::default()
        .with_fov_degrees(args.fov)
        .with_max_range(args.max_range);
    config.validate().context("invalid engine configuration")?;

    let atlas = builtin_atlas().context("build texture atlas")?;
    let level = Level::builtin(&atlas).context("build level")?;
    let world = World::new(level);

    info!("Loading texture atlas from {}", args.atlas.display());
    let texture = TextureResource::spawn_load(args.atlas, atlas.clone());

    let event_loop = EventLoop::new().context("create event loop")?;

    // Redraw-driven: each RedrawRequested runs one tick and one frame
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(config, atlas, texture, world);
    event_loop.run_app(&mut app).context("event loop")?;
    Ok(())
}
