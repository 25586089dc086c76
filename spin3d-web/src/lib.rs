/// spin3d Web - canvas 2D host for the point-cloud animation
///
/// Draws onto a `<canvas>` through its 2D context and drives the frame loop
/// with `requestAnimationFrame`. The canvas tracks its container's size and
/// the loop pauses while the page is hidden. Form controls call the exported
/// methods.
use spin3d_core::{
    parse_command, Axis, Color, ControlValues, Controller, Error, FrameHandle, FrameScheduler,
    ShapeFamily, ShapeProperty, Surface,
};
use std::cell::{Cell, RefCell};
use std::f64::consts::TAU;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, EventTarget, HtmlCanvasElement, Window};

fn to_js(err: Error) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn unavailable(what: &str) -> JsValue {
    to_js(Error::SurfaceUnavailable(what.to_string()))
}

/// Canvas element plus its 2D context
struct CanvasSurface {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
    fill: Option<Color>,
}

impl Surface for CanvasSurface {
    fn size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }

    fn clear(&mut self) {
        let (width, height) = self.size();
        self.context.clear_rect(0.0, 0.0, width as f64, height as f64);
    }

    fn fill_disc(&mut self, x: f64, y: f64, radius: f64, color: Color) {
        if self.fill != Some(color) {
            self.context.set_fill_style_str(&color.to_hex());
            self.fill = Some(color);
        }
        self.context.begin_path();
        if self.context.arc(x, y, radius, 0.0, TAU).is_ok() {
            self.context.fill();
        }
    }
}

/// Size the canvas backing store to its parent element
fn fit_to_container(canvas: &HtmlCanvasElement) {
    if let Some(parent) = canvas.parent_element() {
        let (width, height) = (parent.client_width(), parent.client_height());
        if width > 0 && height > 0 {
            canvas.set_width(width as u32);
            canvas.set_height(height as u32);
        }
    }
}

/// An event listener that is removed again when dropped
struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut()>,
}

impl Listener {
    fn add(target: &EventTarget, kind: &'static str, callback: Closure<dyn FnMut()>) -> Result<Self, JsValue> {
        target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            kind,
            callback,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref());
    }
}

/// `requestAnimationFrame` / `cancelAnimationFrame` with one shared callback
struct AnimationFrames {
    window: Window,
    callback: Option<Closure<dyn FnMut(f64)>>,
}

impl FrameScheduler for AnimationFrames {
    fn request_frame(&mut self) -> spin3d_core::Result<FrameHandle> {
        let callback = self
            .callback
            .as_ref()
            .ok_or_else(|| Error::Scheduler("frame callback not installed".to_string()))?;
        let id = self
            .window
            .request_animation_frame(callback.as_ref().unchecked_ref())
            .map_err(|e| Error::Scheduler(format!("{e:?}")))?;
        Ok(FrameHandle(id as u64))
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        // Ids are never reused while pending; a failed cancel means it already ran
        let _ = self.window.cancel_animation_frame(handle.0 as i32);
    }
}

struct Inner {
    controller: Controller,
    surface: CanvasSurface,
    frames: AnimationFrames,
}

impl Inner {
    fn on_visibility(&mut self, document: &Document) {
        let Inner {
            controller, frames, ..
        } = self;
        if let Err(err) = controller.set_visible(!document.hidden(), frames) {
            web_sys::console::error_1(&to_js(err));
        }
    }

    fn on_frame(&mut self) {
        let Some(handle) = self.controller.driver().pending_frame() else {
            return;
        };
        if let Err(err) = self.controller.tick(handle, &mut self.surface, &mut self.frames) {
            web_sys::console::error_1(&to_js(err));
        }
    }
}

/// The running animation bound to one canvas
#[wasm_bindgen]
pub struct WebApp {
    inner: Rc<RefCell<Inner>>,
    listeners: RefCell<Vec<Listener>>,
    destroyed: Cell<bool>,
}

#[wasm_bindgen]
impl WebApp {
    /// Bind to the canvas with the given id and start animating
    ///
    /// Fails without starting anything when the canvas or its 2D context is
    /// missing. Window `resize` and document `visibilitychange` are handled
    /// until [`WebApp::destroy`].
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str) -> Result<WebApp, JsValue> {
        let window = web_sys::window().ok_or_else(|| unavailable("no window"))?;
        let document = window.document().ok_or_else(|| unavailable("no document"))?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| unavailable(&format!("canvas #{canvas_id} not found")))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| unavailable(&format!("#{canvas_id} is not a canvas")))?;
        let context = canvas
            .get_context("2d")?
            .ok_or_else(|| unavailable("2d context not supported"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| unavailable("2d context has unexpected type"))?;
        fit_to_container(&canvas);

        let inner = Rc::new(RefCell::new(Inner {
            controller: Controller::new(ControlValues::default()).map_err(to_js)?,
            surface: CanvasSurface {
                canvas,
                context,
                fill: None,
            },
            frames: AnimationFrames {
                window,
                callback: None,
            },
        }));

        let weak = Rc::downgrade(&inner);
        let callback = Closure::<dyn FnMut(f64)>::new(move |_timestamp: f64| {
            if let Some(inner) = weak.upgrade() {
                inner.borrow_mut().on_frame();
            }
        });

        let weak = Rc::downgrade(&inner);
        let on_resize = Closure::<dyn FnMut()>::new(move || {
            if let Some(inner) = weak.upgrade() {
                fit_to_container(&inner.borrow().surface.canvas);
            }
        });

        let weak = Rc::downgrade(&inner);
        let hidden_doc = document.clone();
        let on_visibility = Closure::<dyn FnMut()>::new(move || {
            if let Some(inner) = weak.upgrade() {
                if let Ok(mut inner) = inner.try_borrow_mut() {
                    inner.on_visibility(&hidden_doc);
                }
            }
        });

        let listeners = {
            let state = inner.borrow();
            vec![
                Listener::add(state.frames.window.as_ref(), "resize", on_resize)?,
                Listener::add(document.as_ref(), "visibilitychange", on_visibility)?,
            ]
        };

        {
            let mut state = inner.borrow_mut();
            state.frames.callback = Some(callback);
            let Inner {
                controller, frames, ..
            } = &mut *state;
            controller.start(frames).map_err(to_js)?;
        }

        Ok(WebApp {
            inner,
            listeners: RefCell::new(listeners),
            destroyed: Cell::new(false),
        })
    }

    /// Switch family by name; unknown names select the torus
    pub fn select_shape(&self, name: &str) {
        let family = ShapeFamily::from_name_or_default(name);
        self.inner.borrow_mut().controller.select_shape(family);
    }

    pub fn set_scale(&self, scale: f64) -> Result<(), JsValue> {
        self.set(ShapeProperty::Scale(scale))
    }

    pub fn set_resolution(&self, resolution: u32) -> Result<(), JsValue> {
        self.set(ShapeProperty::Resolution(resolution))
    }

    pub fn set_color(&self, color: &str) -> Result<(), JsValue> {
        let color = color.parse().map_err(to_js)?;
        self.set(ShapeProperty::Color(color))
    }

    /// String-keyed property update: `scale`, `resolution` or `color`
    pub fn set_property(&self, name: &str, value: &str) -> Result<(), JsValue> {
        let property = ShapeProperty::parse(name, value).map_err(to_js)?;
        self.set(property)
    }

    pub fn set_rotation_speed(&self, axis: &str, value: f64) -> Result<(), JsValue> {
        let axis: Axis = axis.parse().map_err(to_js)?;
        self.inner
            .borrow_mut()
            .controller
            .set_rotation_speed(axis, value)
            .map_err(to_js)
    }

    pub fn reset_to_defaults(&self) {
        self.inner.borrow_mut().controller.reset_to_defaults();
    }

    /// Run one text command, e.g. `speed y 0.05`
    pub fn apply_command(&self, line: &str) -> Result<(), JsValue> {
        let command = parse_command(line).map_err(to_js)?;
        self.inner.borrow_mut().controller.apply(command).map_err(to_js)
    }

    /// Current control values as JSON
    pub fn config_json(&self) -> Result<String, JsValue> {
        self.inner
            .borrow()
            .controller
            .config()
            .to_json_string()
            .map_err(to_js)
    }

    /// New backing-store size; the next frame draws at this size
    pub fn resize(&self, width: u32, height: u32) {
        let inner = self.inner.borrow();
        inner.surface.canvas.set_width(width);
        inner.surface.canvas.set_height(height);
    }

    /// Page visibility changed; ignored after [`WebApp::destroy`]
    pub fn set_visible(&self, visible: bool) -> Result<(), JsValue> {
        if self.destroyed.get() {
            return Ok(());
        }
        let mut state = self.inner.borrow_mut();
        let Inner {
            controller, frames, ..
        } = &mut *state;
        controller.set_visible(visible, frames).map_err(to_js)
    }

    /// Stop animating and detach page listeners; safe to call more than once
    pub fn destroy(&self) {
        self.destroyed.set(true);
        self.listeners.borrow_mut().clear();
        let mut state = self.inner.borrow_mut();
        let Inner {
            controller, frames, ..
        } = &mut *state;
        controller.teardown(frames);
    }

    pub fn is_running(&self) -> bool {
        self.inner.borrow().controller.driver().is_running()
    }
}

impl WebApp {
    fn set(&self, property: ShapeProperty) -> Result<(), JsValue> {
        self.inner
            .borrow_mut()
            .controller
            .set_property(property)
            .map_err(to_js)
    }
}

impl Drop for WebApp {
    fn drop(&mut self) {
        // A pending frame would otherwise call into a freed closure
        if let Ok(mut state) = self.inner.try_borrow_mut() {
            let Inner {
                controller, frames, ..
            } = &mut *state;
            controller.teardown(frames);
        }
    }
}
