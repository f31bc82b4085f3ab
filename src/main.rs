//! Blob Drift entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, HtmlInputElement, MouseEvent, TouchEvent, WheelEvent};

    use blob_drift::OrbitCamera;
    use blob_drift::consts::*;
    use blob_drift::renderer::RenderState;
    use blob_drift::settings::Settings;
    use blob_drift::sim::{self, FrameInput, Swarm, SwarmParams};
    use glam::Vec2;

    /// Demo instance holding all state
    struct App {
        swarm: Swarm,
        params: SwarmParams,
        settings: Settings,
        camera: OrbitCamera,
        render_state: Option<RenderState>,
        /// Latest pointer sample in CSS pixels relative to the canvas
        pointer: (f32, f32),
        /// Canvas client size in CSS pixels
        viewport: (f32, f32),
        dragging: bool,
        start_time: f64,
        last_time: f64,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl App {
        fn new(seed: u64, settings: Settings) -> Self {
            let params = settings.swarm_params();
            Self {
                swarm: Swarm::new(seed, &params),
                params,
                settings,
                camera: OrbitCamera::default(),
                render_state: None,
                pointer: (0.0, 0.0),
                viewport: (1.0, 1.0),
                dragging: false,
                start_time: 0.0,
                last_time: 0.0,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        fn set_viewport(&mut self, w: f32, h: f32) {
            self.viewport = (w.max(1.0), h.max(1.0));
            self.camera.aspect = self.viewport.0 / self.viewport.1;
        }

        /// World-space x/y offset for the swarm this frame
        fn pointer_offset(&self) -> Vec2 {
            if !self.settings.follow_pointer {
                return Vec2::ZERO;
            }
            let world = self.camera.screen_to_world(
                Vec2::new(self.pointer.0, self.pointer.1),
                FOLLOW_DEPTH,
                Vec2::new(self.viewport.0, self.viewport.1),
            );
            Vec2::new(world.x, world.y)
        }

        /// Advance the swarm and the camera by one frame
        fn update(&mut self, dt: f32, time: f64) {
            if self.start_time == 0.0 {
                self.start_time = time;
            }
            let elapsed = ((time - self.start_time) / 1000.0) as f32;

            let input = FrameInput {
                offset: self.pointer_offset(),
            };
            sim::advance(&mut self.swarm, &self.params, &input, dt, elapsed);
            self.camera.update(dt);

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let window_ms = time - oldest_time;
                if window_ms > 0.0 {
                    self.fps = (60000.0 / window_ms).round() as u32;
                }
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&self.swarm, &self.camera, &self.settings) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let window = web_sys::window().unwrap();
            let document = window.document().unwrap();

            if let Some(el) = document.get_element_by_id("fps") {
                if self.settings.show_fps {
                    el.set_text_content(Some(&self.fps.to_string()));
                } else {
                    el.set_text_content(None);
                }
            }
        }

        /// Re-seed and rebuild the swarm with current parameters
        fn respawn(&mut self, seed: u64) {
            self.params = self.settings.swarm_params();
            self.swarm = Swarm::new(seed, &self.params);
            log::info!("Swarm respawned with seed: {}", seed);
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Blob Drift starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width();
        let client_h = canvas.client_height();
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        // Initialize the demo
        let seed = js_sys::Date::now() as u64;
        let settings = Settings::load();
        let app = Rc::new(RefCell::new(App::new(seed, settings)));
        app.borrow_mut()
            .set_viewport(client_w as f32, client_h as f32);

        log::info!("Swarm initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let settings = app.borrow().settings.clone();
        let render_state = RenderState::new(surface, &adapter, width, height, &settings).await;
        app.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(&canvas, app.clone());
        setup_controls(app.clone());
        setup_resize(canvas.clone(), app.clone());

        // Start the frame loop
        request_animation_frame(app);

        log::info!("Blob Drift running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        // Mouse move - pointer sample, plus damped orbit while dragging
        {
            let app = app.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut a = app.borrow_mut();
                let w = canvas_clone.client_width() as f32;
                let h = canvas_clone.client_height() as f32;
                a.set_viewport(w, h);
                a.pointer = (event.offset_x() as f32, event.offset_y() as f32);

                if a.dragging {
                    let dx = event.movement_x() as f32;
                    let dy = event.movement_y() as f32;
                    a.camera.orbit(dx, dy);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse down/up - orbit drag state
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().dragging = true;
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        for release in ["mouseup", "mouseleave"] {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().dragging = false;
            });
            let _ =
                canvas.add_event_listener_with_callback(release, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Wheel - zoom
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: WheelEvent| {
                event.prevent_default();
                app.borrow_mut().camera.zoom(event.delta_y() as f32);
            });
            let _ =
                canvas.add_event_listener_with_callback("wheel", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move - pointer sample only
        {
            let app = app.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let mut a = app.borrow_mut();
                    let w = canvas_clone.client_width() as f32;
                    let h = canvas_clone.client_height() as f32;
                    a.set_viewport(w, h);
                    let rect = canvas_clone.get_bounding_client_rect();
                    let x = touch.client_x() as f32 - rect.left() as f32;
                    let y = touch.client_y() as f32 - rect.top() as f32;
                    a.pointer = (x, y);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let app = app.clone();
            let window = web_sys::window().unwrap();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut a = app.borrow_mut();
                match event.key().as_str() {
                    "f" | "F" => {
                        a.settings.follow_pointer = !a.settings.follow_pointer;
                        a.settings.save();
                        log::info!("Follow pointer: {}", a.settings.follow_pointer);
                    }
                    "r" | "R" => {
                        let seed = js_sys::Date::now() as u64;
                        a.respawn(seed);
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Wire the DOM control panel (standing in for a GUI toolkit)
    fn setup_controls(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Follow-pointer checkbox
        if let Some(el) = document.get_element_by_id("follow-toggle") {
            if let Ok(input) = el.dyn_into::<HtmlInputElement>() {
                input.set_checked(app.borrow().settings.follow_pointer);

                let app = app.clone();
                let input_clone = input.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                    let mut a = app.borrow_mut();
                    a.settings.follow_pointer = input_clone.checked();
                    a.settings.save();
                });
                let _ = input
                    .add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }

        // Blob color picker
        if let Some(el) = document.get_element_by_id("blob-color") {
            if let Ok(input) = el.dyn_into::<HtmlInputElement>() {
                input.set_value(&format!("#{:06x}", app.borrow().settings.blob_color));

                let app = app.clone();
                let input_clone = input.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                    let value = input_clone.value();
                    if let Ok(color) = u32::from_str_radix(value.trim_start_matches('#'), 16) {
                        let mut a = app.borrow_mut();
                        a.settings.blob_color = color;
                        a.settings.save();
                    }
                });
                let _ = input
                    .add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    fn setup_resize(canvas: HtmlCanvasElement, app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let window = web_sys::window().unwrap();
            let dpr = window.device_pixel_ratio();
            let client_w = canvas.client_width();
            let client_h = canvas.client_height();
            let width = (client_w as f64 * dpr) as u32;
            let height = (client_h as f64 * dpr) as u32;
            canvas.set_width(width);
            canvas.set_height(height);

            let mut a = app.borrow_mut();
            a.set_viewport(client_w as f32, client_h as f32);
            if let Some(ref mut render_state) = a.render_state {
                render_state.resize(width, height);
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            frame_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut a = app.borrow_mut();

            let dt = if a.last_time > 0.0 {
                (((time - a.last_time) / 1000.0) as f32).min(0.1)
            } else {
                1.0 / 60.0
            };
            a.last_time = time;

            a.update(dt, time);
            a.render();
            a.update_hud();
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_app::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Blob Drift (native) starting...");
    log::info!("Native mode requires winit integration - run with `trunk serve` for web version");

    // Headless smoke run of the swarm core
    println!("\nRunning swarm smoke test...");
    smoke_test_swarm();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn smoke_test_swarm() {
    use blob_drift::sim::{self, FrameInput, Swarm, SwarmParams};

    let params = SwarmParams::default();
    let mut swarm = Swarm::new(42, &params);

    for step in 0..300 {
        let elapsed = step as f32 / 60.0;
        sim::advance(&mut swarm, &params, &FrameInput::default(), 1.0 / 60.0, elapsed);
    }

    let leader = swarm.blobs()[0].pos;
    let r2 = leader.x * leader.x + leader.y * leader.y;
    assert!((r2 - 1.0).abs() < 1e-4, "leader left its unit circle");
    println!("✓ Swarm smoke test passed! leader at {leader}");
}
