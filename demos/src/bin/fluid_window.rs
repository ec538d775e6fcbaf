//! Windowed demo: drives `FluidWindowBridge` from a winit event loop,
//! forwarding mouse drags as splats and P/Space as the pause/random-splat
//! keyboard commands (spec §6).

use fluid_api::{InputEvent, KeyCode, SimConfig};
use fluidsim_bridge::FluidWindowBridge;
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{Key, NamedKey};
use winit::window::WindowId;

struct App {
    window: Option<winit::window::Window>,
    bridge: Option<FluidWindowBridge>,
    size: (u32, u32),
    pointer_down: bool,
    last_frame: Option<std::time::Instant>,
}

impl App {
    fn new() -> Self {
        Self { window: None, bridge: None, size: (800, 600), pointer_down: false, last_frame: None }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let attrs = winit::window::WindowAttributes::default()
            .with_title("fluidsim")
            .with_inner_size(winit::dpi::LogicalSize::new(800, 600));
        let window = event_loop.create_window(attrs).expect("create window");
        let phys = window.inner_size();
        self.size = (phys.width.max(1), phys.height.max(1));
        self.window = Some(window);
        if let Some(ref w) = self.window {
            w.request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(physical) => {
                self.size = (physical.width.max(1), physical.height.max(1));
                if let Some(ref w) = self.window {
                    w.request_redraw();
                }
            }
            WindowEvent::MouseInput { state, button: MouseButton::Left, .. } => {
                if let Some(bridge) = &mut self.bridge {
                    let (x, y) = (self.size.0 as f32 / 2.0, self.size.1 as f32 / 2.0);
                    match state {
                        ElementState::Pressed => {
                            self.pointer_down = true;
                            bridge.handle_event(InputEvent::PointerDown { id: 0, x, y });
                        }
                        ElementState::Released => {
                            self.pointer_down = false;
                            bridge.handle_event(InputEvent::PointerUp { id: 0 });
                        }
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if self.pointer_down {
                    if let Some(bridge) = &mut self.bridge {
                        bridge.handle_event(InputEvent::PointerMove { id: 0, x: position.x as f32, y: position.y as f32 });
                    }
                }
            }
            WindowEvent::KeyboardInput { event: KeyEvent { logical_key, state: ElementState::Pressed, .. }, .. } => {
                if let Some(bridge) = &mut self.bridge {
                    match logical_key {
                        Key::Named(NamedKey::Space) => bridge.handle_event(InputEvent::Key { code: KeyCode::RandomSplats }),
                        Key::Character(c) if c == "p" || c == "P" => {
                            bridge.handle_event(InputEvent::Key { code: KeyCode::TogglePause })
                        }
                        _ => {}
                    }
                }
            }
            WindowEvent::RedrawRequested => {
                let window = match &self.window {
                    Some(w) => w,
                    None => return,
                };
                self.size = {
                    let phys = window.inner_size();
                    (phys.width.max(1), phys.height.max(1))
                };
                if self.bridge.is_none() {
                    match FluidWindowBridge::from_window(window, self.size.0, self.size.1, SimConfig::default()) {
                        Ok(bridge) => self.bridge = Some(bridge),
                        Err(e) => {
                            eprintln!("FluidWindowBridge::from_window failed: {e}");
                            return;
                        }
                    }
                }
                let (raw_window, raw_display) = match (window.window_handle(), window.display_handle()) {
                    (Ok(wh), Ok(dh)) => (wh.as_raw(), dh.as_raw()),
                    _ => return,
                };
                let now = std::time::Instant::now();
                let dt = self.last_frame.map(|prev| (now - prev).as_secs_f32()).unwrap_or(1.0 / 60.0);
                self.last_frame = Some(now);

                if let Some(bridge) = &mut self.bridge {
                    if let Err(e) = bridge.render_frame_to_window(raw_window, raw_display, self.size.0, self.size.1, dt) {
                        eprintln!("render_frame_to_window failed: {e}");
                    }
                }
                window.request_redraw();
            }
            _ => {}
        }
    }
}

fn main() -> Result<(), String> {
    env_logger::init();
    let event_loop = winit::event_loop::EventLoop::new().map_err(|e| e.to_string())?;
    let mut app = App::new();
    event_loop.run_app(&mut app).map_err(|e| e.to_string())?;
    Ok(())
}
