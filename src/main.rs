//! Rect Arcade entry point
//!
//! In the browser: canvas 2D renderer, DOM input and a `requestAnimationFrame`
//! frame host. Natively: a headless runner that drives the same scheduler from
//! a manual frame clock.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::{Rc, Weak};

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, MouseEvent, Window};

    use rect_arcade::sim::{EntityKind, InputEvent, Rect, RenderSnapshot};
    use rect_arcade::{EngineConfig, FrameHost, FrameScheduler, Renderer, Variant};

    const PLAYER_COLOR: &str = "#ff0";
    const PROJECTILE_COLOR: &str = "#fff";
    const OBSTACLE_COLOR: &str = "#f00";
    const ENEMY_COLOR: &str = "#0f0";

    type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

    /// `requestAnimationFrame` as a frame host; every request reuses one callback
    struct AnimationFrames {
        window: Window,
        callback: FrameCallback,
    }

    impl FrameHost for AnimationFrames {
        type Handle = i32;

        fn request_frame(&mut self) -> Option<i32> {
            let callback = self.callback.borrow();
            let callback = callback.as_ref()?;
            let handle = self
                .window
                .request_animation_frame(callback.as_ref().unchecked_ref())
                .ok();
            handle
        }

        fn cancel_frame(&mut self, handle: i32) {
            if let Err(e) = self.window.cancel_animation_frame(handle) {
                log::warn!("cancelAnimationFrame({}) failed: {:?}", handle, e);
            }
        }
    }

    struct CanvasRenderer {
        ctx: CanvasRenderingContext2d,
    }

    impl CanvasRenderer {
        fn fill(&self, color: &str, rect: &Rect) {
            self.ctx.set_fill_style_str(color);
            self.ctx.fill_rect(
                rect.pos.x as f64,
                rect.pos.y as f64,
                rect.size.x as f64,
                rect.size.y as f64,
            );
        }

        fn text(&self, text: &str, font: &str, x: f64, y: f64) {
            self.ctx.set_font(font);
            if let Err(e) = self.ctx.fill_text(text, x, y) {
                log::warn!("fillText failed: {:?}", e);
            }
        }
    }

    impl Renderer for CanvasRenderer {
        fn draw(&mut self, snapshot: &RenderSnapshot) {
            let (w, h) = (snapshot.field.x as f64, snapshot.field.y as f64);
            self.ctx.clear_rect(0.0, 0.0, w, h);

            self.fill(PLAYER_COLOR, &snapshot.player);
            for projectile in &snapshot.projectiles {
                self.fill(PROJECTILE_COLOR, projectile);
            }
            for hazard in &snapshot.hazards {
                let color = match hazard.kind {
                    EntityKind::Enemy => ENEMY_COLOR,
                    _ => OBSTACLE_COLOR,
                };
                self.fill(color, &hazard.rect);
            }

            let overlay = snapshot.overlay();
            self.ctx.set_fill_style_str("#fff");
            self.text(&overlay.hud, "20px sans-serif", 10.0, 20.0);

            if let Some((title, final_score)) = overlay.game_over {
                self.ctx.set_fill_style_str("rgba(0,0,0,0.5)");
                self.ctx.fill_rect(0.0, 0.0, w, h);
                self.ctx.set_fill_style_str("#fff");
                self.text(&title, "36px sans-serif", w / 2.0 - 80.0, h / 2.0);
                self.text(&final_score, "24px sans-serif", w / 2.0 - 80.0, h / 2.0 + 40.0);
            }
        }
    }

    struct App {
        scheduler: FrameScheduler<AnimationFrames>,
        renderer: CanvasRenderer,
    }

    /// Same clock as the timestamps `requestAnimationFrame` hands out
    fn now(window: &Window) -> f64 {
        window.performance().map(|p| p.now()).unwrap_or(0.0)
    }

    fn js_err(msg: &str) -> JsValue {
        JsValue::from_str(msg)
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&JsValue::from_str(&e.to_string()));
        }

        let window = web_sys::window().ok_or_else(|| js_err("no window"))?;
        let document = window.document().ok_or_else(|| js_err("no document"))?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| js_err("no canvas"))?
            .dyn_into()?;

        // <canvas id="canvas" data-variant="flapper">
        let variant = match canvas.get_attribute("data-variant") {
            Some(name) => Variant::parse(&name).unwrap_or_else(|e| {
                log::warn!("{}; falling back to {}", e, Variant::default().as_str());
                Variant::default()
            }),
            None => Variant::default(),
        };
        let config = EngineConfig::preset(variant);
        canvas.set_width(config.field.width as u32);
        canvas.set_height(config.field.height as u32);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| js_err("no 2d context"))?
            .dyn_into()?;

        let seed = js_sys::Date::now() as u64;
        let callback: FrameCallback = Rc::new(RefCell::new(None));
        let host = AnimationFrames {
            window: window.clone(),
            callback: callback.clone(),
        };
        let scheduler = FrameScheduler::new(config, seed, now(&window), host)
            .map_err(|e| js_err(&e.to_string()))?;
        let app = Rc::new(RefCell::new(App {
            scheduler,
            renderer: CanvasRenderer { ctx },
        }));

        let weak: Weak<RefCell<App>> = Rc::downgrade(&app);
        *callback.borrow_mut() = Some(Closure::<dyn FnMut(f64)>::new(move |time: f64| {
            if let Some(app) = weak.upgrade() {
                let mut app = app.borrow_mut();
                let App {
                    scheduler,
                    renderer,
                } = &mut *app;
                scheduler.on_frame(time, renderer);
            }
        }));

        setup_input_handlers(&window, &canvas, app.clone())?;
        setup_restart_button(&window, &document, app.clone())?;
        setup_teardown(&window, app.clone())?;

        app.borrow_mut().scheduler.start();
        log::info!("Rect Arcade running: {} (seed {})", variant.as_str(), seed);
        Ok(())
    }

    fn setup_input_handlers(
        window: &Window,
        canvas: &HtmlCanvasElement,
        app: Rc<RefCell<App>>,
    ) -> Result<(), JsValue> {
        // Keyboard
        {
            let app = app.clone();
            let window_clone = window.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut app = app.borrow_mut();
                let scheduler = &mut app.scheduler;
                match event.key().as_str() {
                    "ArrowLeft" | "a" | "A" => {
                        scheduler.handle_input(InputEvent::MoveLeft);
                    }
                    "ArrowRight" | "d" | "D" => {
                        scheduler.handle_input(InputEvent::MoveRight);
                    }
                    " " => {
                        event.prevent_default();
                        // Fire without projectiles and jump without gravity are no-ops
                        scheduler.handle_input(InputEvent::Fire);
                        scheduler.handle_input(InputEvent::Jump);
                    }
                    "ArrowUp" | "w" | "W" => {
                        event.prevent_default();
                        scheduler.handle_input(InputEvent::Jump);
                    }
                    "i" | "I" => {
                        scheduler.toggle_autopilot();
                    }
                    "Enter" | "r" | "R" => {
                        if scheduler.state().is_over() {
                            scheduler.reset(now(&window_clone));
                        }
                    }
                    _ => {}
                }
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Mouse: click/tap in field coordinates, also a flap
        {
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let bounds = canvas_clone.get_bounding_client_rect();
                if bounds.width() <= 0.0 || bounds.height() <= 0.0 {
                    return;
                }
                let mut app = app.borrow_mut();
                let field = app.scheduler.state().config.field_size();
                let x = (event.client_x() as f64 - bounds.left()) / bounds.width() * field.x as f64;
                let y = (event.client_y() as f64 - bounds.top()) / bounds.height() * field.y as f64;
                app.scheduler
                    .handle_input(InputEvent::Click(Vec2::new(x as f32, y as f32)));
                app.scheduler.handle_input(InputEvent::Jump);
            });
            canvas.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn setup_restart_button(
        window: &Window,
        document: &web_sys::Document,
        app: Rc<RefCell<App>>,
    ) -> Result<(), JsValue> {
        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let window = window.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().scheduler.reset(now(&window));
            });
            btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    /// Leaving the page must not leave a frame pending against the old canvas
    fn setup_teardown(window: &Window, app: Rc<RefCell<App>>) -> Result<(), JsValue> {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            app.borrow_mut().scheduler.cancel();
            log::info!("page hidden, frame loop cancelled");
        });
        window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::fs;
    use std::io::Write;
    use std::path::PathBuf;

    use anyhow::{Context, Result};
    use clap::Parser;

    use rect_arcade::consts::FRAME_MS;
    use rect_arcade::sim::RenderSnapshot;
    use rect_arcade::{EngineConfig, FrameScheduler, ManualFrames, Variant};

    #[derive(Parser, Debug)]
    #[command(name = "rect-arcade")]
    #[command(about = "Headless runner for the rect-arcade simulation")]
    pub struct Cli {
        /// Preset to play: shooter, dodger, flapper or clicker
        #[arg(long, default_value = "shooter", value_parser = Variant::parse)]
        variant: Variant,
        /// RNG seed for hazard placement
        #[arg(long, default_value_t = 1)]
        seed: u64,
        /// Maximum number of frames to run
        #[arg(long, default_value_t = 3600)]
        frames: u32,
        /// Simulated time between frames
        #[arg(long, default_value_t = FRAME_MS)]
        frame_ms: f64,
        /// JSON engine configuration (overrides --variant)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Print one JSON render snapshot per frame
        #[arg(long, default_value_t = false)]
        json: bool,
        /// Disable the demo autopilot (no input at all)
        #[arg(long, default_value_t = false)]
        no_autopilot: bool,
    }

    pub fn run(cli: Cli) -> Result<()> {
        let config = match &cli.config {
            Some(path) => {
                let json = fs::read_to_string(path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                EngineConfig::from_json(&json)
                    .with_context(|| format!("invalid config {}", path.display()))?
            }
            None => EngineConfig::preset(cli.variant),
        };
        let variant = config.variant;

        let mut host = ManualFrames::new();
        let mut scheduler = FrameScheduler::new(config, cli.seed, 0.0, &mut host)?;
        scheduler.set_autopilot(!cli.no_autopilot);
        scheduler.start();

        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        let mut now = 0.0;
        let mut frames = 0;
        while frames < cli.frames && scheduler.is_running() {
            now += cli.frame_ms;
            frames += 1;

            let mut drawn = None;
            scheduler.on_frame(now, &mut |s: &RenderSnapshot| drawn = Some(s.clone()));
            if cli.json {
                if let Some(snapshot) = drawn {
                    serde_json::to_writer(&mut out, &snapshot)?;
                    writeln!(out)?;
                }
            }
        }

        let snapshot = scheduler.snapshot();
        let overlay = snapshot.overlay();
        log::info!(
            "{} seed={} frames={} score={}",
            variant.as_str(),
            cli.seed,
            frames,
            snapshot.score
        );
        if !cli.json {
            writeln!(out, "{}", overlay.hud)?;
            if let Some((title, final_score)) = overlay.game_over {
                let cause = snapshot.cause.map(|c| c.as_str()).unwrap_or("unknown");
                writeln!(out, "{title} ({cause})")?;
                writeln!(out, "{final_score}")?;
            }
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use clap::Parser;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Rect Arcade (native, headless) starting...");
    headless::run(headless::Cli::parse())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
