//! # Browser Host
//!
//! Full-page `<canvas>` overlay for the task board.
//!
//! - The canvas is created on `start()`, fixed over the page with pointer
//!   events disabled, and removed when the session ends.
//! - Frames come from `requestAnimationFrame`; its timestamp shares the
//!   `performance.now()` timebase used for the start time.
//! - The `resize` listener only raises a flag. The next frame applies the new
//!   size before ticking, so ticks and resizes never interleave.
//!
//! JavaScript calls [`celebrate`] from the reward collect handler.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use choreboard_confetti::{
    ConfettiError, ConfettiResult, FrameBatch, Host, LifecycleController, RenderCommand,
    ResizeListener, StartOutcome, Surface, TickOutcome, TimeSource, Viewport,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::wasm_bindgen;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, Window};

use crate::error::warn_on_failure;

/// Overlay styling: covers the viewport, never intercepts input.
const OVERLAY_STYLE: [(&str, &str); 6] = [
    ("position", "fixed"),
    ("left", "0"),
    ("top", "0"),
    ("pointer-events", "none"),
    ("z-index", "9999"),
    ("display", "block"),
];

fn js_reason(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

fn check<T>(operation: &str, result: Result<T, JsValue>) -> Option<T> {
    warn_on_failure(operation, result.map_err(|e| js_reason(&e)))
}

/// `performance.now()` time source.
pub struct PerformanceClock {
    window: Window,
}

impl TimeSource for PerformanceClock {
    fn now_ms(&self) -> f64 {
        self.window
            .performance()
            .map_or_else(js_sys::Date::now, |p| p.now())
    }
}

/// A canvas element and its 2D context.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
}

impl Surface for CanvasSurface {
    fn resize(&mut self, viewport: Viewport, device_pixel_ratio: f32) {
        let dpr = f64::from(device_pixel_ratio);
        self.canvas
            .set_width((f64::from(viewport.width) * dpr).round() as u32);
        self.canvas
            .set_height((f64::from(viewport.height) * dpr).round() as u32);

        let style = self.canvas.style();
        check(
            "set canvas css width",
            style.set_property("width", &format!("{}px", viewport.width)),
        );
        check(
            "set canvas css height",
            style.set_property("height", &format!("{}px", viewport.height)),
        );

        // Setting the size resets the context; reapply the pixel ratio
        check(
            "apply device pixel ratio",
            self.context.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0),
        );
    }

    fn submit(&mut self, batch: &FrameBatch) {
        let ctx = &self.context;
        for command in batch.commands() {
            match *command {
                RenderCommand::Clear { width, height } => {
                    ctx.clear_rect(0.0, 0.0, f64::from(width), f64::from(height));
                }
                RenderCommand::Rect {
                    x,
                    y,
                    width,
                    height,
                    rotation,
                    color,
                } => {
                    ctx.save();
                    check("translate", ctx.translate(f64::from(x), f64::from(y)));
                    check("rotate", ctx.rotate(f64::from(rotation)));
                    ctx.set_fill_style_str(&color.to_css());
                    ctx.fill_rect(
                        -f64::from(width) / 2.0,
                        -f64::from(height) / 2.0,
                        f64::from(width),
                        f64::from(height),
                    );
                    ctx.restore();
                }
                RenderCommand::Circle {
                    x,
                    y,
                    radius,
                    color,
                } => {
                    ctx.set_fill_style_str(&color.to_css());
                    ctx.begin_path();
                    check(
                        "arc",
                        ctx.arc(
                            f64::from(x),
                            f64::from(y),
                            f64::from(radius),
                            0.0,
                            std::f64::consts::TAU,
                        ),
                    );
                    ctx.fill();
                }
            }
        }
    }
}

/// The browser window as a confetti host.
pub struct WebHost {
    window: Window,
    document: Document,
    resize_pending: Rc<Cell<bool>>,
    resize_callback: Option<Closure<dyn FnMut()>>,
    next_listener: u64,
}

impl WebHost {
    fn create_canvas(&self) -> Result<CanvasSurface, JsValue> {
        let canvas: HtmlCanvasElement = self.document.create_element("canvas")?.dyn_into()?;
        let style = canvas.style();
        for (property, value) in OVERLAY_STYLE {
            style.set_property(property, value)?;
        }

        let body = self
            .document
            .body()
            .ok_or_else(|| JsValue::from_str("document has no body"))?;
        body.append_child(&canvas)?;

        let context = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context not supported"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        Ok(CanvasSurface { canvas, context })
    }
}

impl Host for WebHost {
    type Surface = CanvasSurface;

    fn viewport(&self) -> Viewport {
        let width = self.window.inner_width().ok().and_then(|v| v.as_f64());
        let height = self.window.inner_height().ok().and_then(|v| v.as_f64());
        Viewport::new(
            width.unwrap_or_default() as f32,
            height.unwrap_or_default() as f32,
        )
    }

    fn device_pixel_ratio(&self) -> f32 {
        let dpr = self.window.device_pixel_ratio();
        if dpr > 0.0 {
            dpr as f32
        } else {
            1.0
        }
    }

    fn create_surface(
        &mut self,
        viewport: Viewport,
        device_pixel_ratio: f32,
    ) -> ConfettiResult<CanvasSurface> {
        let mut surface = self
            .create_canvas()
            .map_err(|e| ConfettiError::surface_unavailable(js_reason(&e)))?;
        surface.resize(viewport, device_pixel_ratio);
        Ok(surface)
    }

    fn release_surface(&mut self, surface: CanvasSurface) {
        surface.canvas.remove();
    }

    fn subscribe_resize(&mut self) -> ResizeListener {
        let pending = Rc::clone(&self.resize_pending);
        let callback = Closure::<dyn FnMut()>::new(move || pending.set(true));
        check(
            "attach resize listener",
            self.window
                .add_event_listener_with_callback("resize", callback.as_ref().unchecked_ref()),
        );
        self.resize_callback = Some(callback);
        self.next_listener += 1;
        ResizeListener(self.next_listener)
    }

    fn unsubscribe_resize(&mut self, _listener: ResizeListener) {
        if let Some(callback) = self.resize_callback.take() {
            check(
                "detach resize listener",
                self.window
                    .remove_event_listener_with_callback("resize", callback.as_ref().unchecked_ref()),
            );
        }
        self.resize_pending.set(false);
    }
}

type WebController = LifecycleController<WebHost, ChaCha8Rng, PerformanceClock>;

/// Page-wide controller and the resize flag its host raises.
struct Page {
    controller: Rc<RefCell<WebController>>,
    resize_pending: Rc<Cell<bool>>,
    window: Window,
}

thread_local! {
    static PAGE: RefCell<Option<Rc<Page>>> = const { RefCell::new(None) };
}

fn page() -> Result<Rc<Page>, JsValue> {
    if let Some(page) = PAGE.with(|p| p.borrow().clone()) {
        return Ok(page);
    }

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let resize_pending = Rc::new(Cell::new(false));

    let host = WebHost {
        window: window.clone(),
        document,
        resize_pending: Rc::clone(&resize_pending),
        resize_callback: None,
        next_listener: 0,
    };
    let seed = (js_sys::Math::random() * u64::MAX as f64) as u64;
    let clock = PerformanceClock {
        window: window.clone(),
    };
    let controller = LifecycleController::new(host, ChaCha8Rng::seed_from_u64(seed), clock);

    let page = Rc::new(Page {
        controller: Rc::new(RefCell::new(controller)),
        resize_pending,
        window,
    });
    PAGE.with(|p| *p.borrow_mut() = Some(Rc::clone(&page)));
    Ok(page)
}

/// Schedules frames until the session terminates.
fn run_frames(page: &Rc<Page>) -> Result<(), JsValue> {
    let callback: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let handle = Rc::clone(&callback);
    let frame_page = Rc::clone(page);

    *handle.borrow_mut() = Some(Closure::<dyn FnMut(f64)>::new(move |timestamp: f64| {
        let outcome = {
            let mut controller = frame_page.controller.borrow_mut();
            if frame_page.resize_pending.replace(false) {
                controller.handle_resize();
            }
            controller.tick(timestamp)
        };

        if let TickOutcome::Continue { active } = outcome {
            let scheduled = callback.borrow().as_ref().and_then(|next| {
                check(
                    "request animation frame",
                    frame_page
                        .window
                        .request_animation_frame(next.as_ref().unchecked_ref()),
                )
            });
            if scheduled.is_some() {
                return;
            }
            tracing::warn!(active, "confetti frame loop stopped with the session still running");
        }
        // Loop ends here: drop this closure
        let _ = callback.borrow_mut().take();
    }));

    let first = handle.borrow();
    if let Some(first) = first.as_ref() {
        page.window
            .request_animation_frame(first.as_ref().unchecked_ref())?;
    }
    Ok(())
}

/// Starts the reward confetti. Calls while it is already playing are ignored.
///
/// # Errors
///
/// Rejects if the page has no window/document or no 2D canvas context.
#[wasm_bindgen]
pub fn celebrate(spawn_duration_ms: u32) -> Result<(), JsValue> {
    let page = page()?;
    let outcome = page
        .controller
        .borrow_mut()
        .start(spawn_duration_ms)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    if outcome == StartOutcome::Started {
        if let Err(e) = run_frames(&page) {
            tracing::warn!(error = %js_reason(&e), "confetti frame loop not scheduled");
            return Err(e);
        }
    }
    Ok(())
}
