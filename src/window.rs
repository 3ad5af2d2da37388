//! Windowed host: winit event loop, wgpu renderer and mouse-driven camera.

use anyhow::{Context, Result};
use glam::Vec2;
use std::sync::Arc;
use std::time::Instant;
use winit::{
    event::{Event, MouseButton, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    keyboard::KeyCode,
    window::{Window, WindowBuilder},
};

use raypick_camera::{OrbitCamera, Viewport};
use raypick_input::{InputState, PointerPress};
use raypick_render::Renderer;
use raypick_scene::{AppContext, GraphicsApp, PointerButton, PointerEvent, Scene};

use crate::config::{AppConfig, CameraConfig};

/// Host state for one window.
struct Host<A: GraphicsApp> {
    app: A,
    scene: Scene,
    camera: OrbitCamera,
    viewport: Viewport,
    renderer: Renderer,
    input: InputState,
    controls: CameraConfig,
    last_frame: Instant,
}

impl<A: GraphicsApp> Host<A> {
    fn new(mut app: A, window: Arc<Window>, config: &AppConfig) -> Result<Self> {
        let size = window.inner_size();
        let viewport = Viewport::new(size.width, size.height);

        let mut scene = Scene::new();
        let mut camera = OrbitCamera::default();
        app.build_scene(&mut AppContext {
            scene: &mut scene,
            camera: &mut camera,
            viewport,
        })?;

        let renderer = pollster::block_on(Renderer::new(window))?;

        Ok(Self {
            app,
            scene,
            camera,
            viewport,
            renderer,
            input: InputState::new(),
            controls: config.camera.clone(),
            last_frame: Instant::now(),
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.renderer.resize((width, height));
        self.camera.set_aspect(width, height);
        self.viewport = Viewport::new(width, height);
    }

    /// Forward queued presses to the app, oldest first.
    fn dispatch_presses(&mut self) -> Result<()> {
        for press in self.input.take_presses() {
            let Some(event) = pointer_event(press) else {
                continue;
            };
            let mut ctx = AppContext {
                scene: &mut self.scene,
                camera: &mut self.camera,
                viewport: self.viewport,
            };
            self.app.on_pointer_down(&mut ctx, event)?;
        }
        Ok(())
    }

    fn update(&mut self) -> Result<()> {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;

        let (dx, dy) = self.input.drag_delta;
        if dx != 0.0 || dy != 0.0 {
            let sensitivity = self.controls.orbit_sensitivity;
            self.camera
                .rotate(-(dx as f32) * sensitivity, dy as f32 * sensitivity);
        }
        if self.input.mouse_wheel_delta != 0.0 {
            self.camera
                .zoom(self.input.mouse_wheel_delta * self.controls.zoom_speed);
        }
        self.input.begin_frame();

        let mut ctx = AppContext {
            scene: &mut self.scene,
            camera: &mut self.camera,
            viewport: self.viewport,
        };
        self.app.on_frame(&mut ctx, dt)?;
        Ok(())
    }
}

fn pointer_event(press: PointerPress) -> Option<PointerEvent> {
    let button = match press.button {
        MouseButton::Left => PointerButton::Primary,
        MouseButton::Right => PointerButton::Secondary,
        MouseButton::Middle => PointerButton::Middle,
        _ => return None,
    };
    Some(PointerEvent {
        position: Vec2::new(press.position.0 as f32, press.position.1 as f32),
        button,
    })
}

/// Open a window and drive `app` until it closes.
pub fn run<A: GraphicsApp + 'static>(app: A, config: &AppConfig) -> Result<()> {
    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.window.title.as_str())
            .with_inner_size(winit::dpi::PhysicalSize::new(
                config.window.width,
                config.window.height,
            ))
            .build(&event_loop)
            .context("failed to create window")?,
    );

    let mut host = Host::new(app, window.clone(), config)?;
    let size = window.inner_size();
    host.resize(size.width, size.height);

    tracing::info!("initialization complete, entering event loop");

    event_loop.run(move |event, target| {
        target.set_control_flow(ControlFlow::Poll);

        match event {
            Event::WindowEvent { event, .. } => {
                host.input.handle_event(&event);

                match event {
                    WindowEvent::CloseRequested => {
                        tracing::info!("close requested, shutting down");
                        target.exit();
                    }
                    WindowEvent::Resized(size) => {
                        host.resize(size.width, size.height);
                    }
                    WindowEvent::KeyboardInput { .. } => {
                        if host.input.key_just_pressed(KeyCode::Escape) {
                            tracing::info!("escape pressed, shutting down");
                            target.exit();
                        }
                    }
                    WindowEvent::MouseInput { .. } => {
                        if let Err(err) = host.dispatch_presses() {
                            tracing::error!("pointer handler failed: {err:#}");
                            target.exit();
                        }
                    }
                    WindowEvent::RedrawRequested => {
                        if let Err(err) = host.update() {
                            tracing::error!("frame update failed: {err:#}");
                            target.exit();
                            return;
                        }

                        match host.renderer.render(&host.scene, &host.camera) {
                            Ok(_) => {}
                            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                                host.renderer.recover_surface()
                            }
                            Err(wgpu::SurfaceError::OutOfMemory) => target.exit(),
                            Err(e) => tracing::error!("render error: {:?}", e),
                        }
                    }
                    _ => {}
                }
            }
            Event::AboutToWait => {
                window.request_redraw();
            }
            _ => {}
        }
    })?;

    Ok(())
}
