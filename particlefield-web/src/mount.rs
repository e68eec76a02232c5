//! Mounting an engine onto a page
//!
//! Event listeners only queue intents into an inbox. The animation frame
//! callback drains the inbox into the engine before drawing, so no handler ever
//! borrows the engine while a frame is in progress.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use particlefield_core::config::DetectOn;
use particlefield_core::{Config, Engine, Intent, MountError};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Event, EventTarget, HtmlCanvasElement, MouseEvent, Window};

use crate::canvas::CanvasSurface;

/// Class given to canvases created by the mount
pub const CANVAS_CLASS: &str = "particles-js-canvas-el";

type FrameCallback = Closure<dyn FnMut(f64)>;

/// An event listener kept alive until the field stops
struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn detach(&self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref());
    }
}

/// State shared between the handle, the listeners and the frame loop
struct Field {
    engine: RefCell<Engine>,
    surface: RefCell<CanvasSurface>,
    inbox: RefCell<Vec<Intent>>,
    listeners: RefCell<Vec<Listener>>,
    alive: Cell<bool>,
}

impl Field {
    fn push(&self, intent: Intent) {
        if self.alive.get() {
            self.inbox.borrow_mut().push(intent);
        }
    }

    fn tick(&self, timestamp_ms: f64) {
        let pending: Vec<Intent> = self.inbox.borrow_mut().drain(..).collect();
        let mut engine = self.engine.borrow_mut();
        for intent in pending {
            engine.submit(intent);
        }
        let mut surface = self.surface.borrow_mut();
        engine.frame(&mut *surface, timestamp_ms);
    }

    fn stop(&self) {
        if !self.alive.replace(false) {
            return;
        }
        self.engine.borrow_mut().stop();
        for listener in self.listeners.borrow_mut().drain(..) {
            listener.detach();
        }
        self.inbox.borrow_mut().clear();
        log::info!("particle field stopped");
    }
}

/// Handle to a running particle field
#[wasm_bindgen]
pub struct ParticleField {
    field: Rc<Field>,
}

#[wasm_bindgen]
impl ParticleField {
    /// Stop the animation loop and detach every listener
    pub fn stop(&self) {
        self.field.stop();
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.field.alive.get()
    }

    #[wasm_bindgen(js_name = particleCount)]
    pub fn particle_count(&self) -> usize {
        self.field.engine.borrow().particles().len()
    }

    /// The resolved configuration as JSON text
    #[wasm_bindgen(js_name = configJson)]
    pub fn config_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.field.engine.borrow().config())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

/// Mount a particle field into the element with id `tag_id`
///
/// `overrides` is JSON text merged over the defaults; empty means defaults.
pub fn mount(tag_id: &str, overrides: &str) -> Result<ParticleField, MountError> {
    let config = Config::from_json_str(overrides)?;

    let window = web_sys::window()
        .ok_or_else(|| MountError::ContextUnavailable("no window".to_string()))?;
    let document = window
        .document()
        .ok_or_else(|| MountError::ContextUnavailable("no document".to_string()))?;
    let container = document
        .get_element_by_id(tag_id)
        .ok_or_else(|| MountError::MissingContainer(tag_id.to_string()))?;

    let canvas = find_or_create_canvas(&document, &container)?;
    let width = f64::from(canvas.offset_width());
    let height = f64::from(canvas.offset_height());
    let detect_on = config.interactivity.detect_on;
    let resize = config.interactivity.events.resize;

    let engine = Engine::new(config, width, height, window.device_pixel_ratio());
    let mut surface = CanvasSurface::new(canvas)?;
    engine.attach(&mut surface);
    log::info!(
        "mounted particle field on #{tag_id}: {} particles, {width}x{height}",
        engine.particles().len()
    );

    let field = Rc::new(Field {
        engine: RefCell::new(engine),
        surface: RefCell::new(surface),
        inbox: RefCell::new(Vec::new()),
        listeners: RefCell::new(Vec::new()),
        alive: Cell::new(true),
    });

    listen(&field, &window, detect_on, resize)?;
    start_loop(Rc::clone(&field), window);

    Ok(ParticleField { field })
}

/// Reuse a canvas that is a direct child of the container, or append one
fn find_or_create_canvas(
    document: &Document,
    container: &Element,
) -> Result<HtmlCanvasElement, MountError> {
    let existing = container
        .query_selector(":scope > canvas")
        .map_err(|e| MountError::ContextUnavailable(format!("{e:?}")))?;
    let element = match existing {
        Some(element) => element,
        None => {
            let element = document
                .create_element("canvas")
                .map_err(|e| MountError::ContextUnavailable(format!("{e:?}")))?;
            element.set_class_name(CANVAS_CLASS);
            element
                .set_attribute("style", "width: 100%; height: 100%;")
                .map_err(|e| MountError::ContextUnavailable(format!("{e:?}")))?;
            container
                .append_child(&element)
                .map_err(|e| MountError::ContextUnavailable(format!("{e:?}")))?;
            element
        }
    };
    element
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| MountError::ContextUnavailable("element is not a canvas".to_string()))
}

/// Register DOM listeners that feed the inbox
fn listen(
    field: &Rc<Field>,
    window: &Window,
    detect_on: DetectOn,
    resize: bool,
) -> Result<(), MountError> {
    let canvas = field.surface.borrow().element().clone();
    let pointer_target: EventTarget = match detect_on {
        DetectOn::Canvas => canvas.clone().into(),
        DetectOn::Window => window.clone().into(),
    };

    if resize {
        let weak = Rc::downgrade(field);
        let element = canvas.clone();
        let win = window.clone();
        add_listener(field, window.clone().into(), "resize", move |_| {
            if let Some(field) = weak.upgrade() {
                field.push(Intent::Resize {
                    width: f64::from(element.offset_width()),
                    height: f64::from(element.offset_height()),
                    device_pixel_ratio: win.device_pixel_ratio(),
                });
            }
        })?;
    }

    let weak = Rc::downgrade(field);
    let element = canvas.clone();
    add_listener(field, pointer_target.clone(), "mousemove", move |event| {
        if let (Some(field), Some((x, y))) = (weak.upgrade(), pointer_position(&element, &event)) {
            field.push(Intent::PointerMoved { x, y });
        }
    })?;

    let weak = Rc::downgrade(field);
    let leave_kind = match detect_on {
        DetectOn::Canvas => "mouseleave",
        DetectOn::Window => "mouseout",
    };
    add_listener(field, pointer_target.clone(), leave_kind, move |event| {
        // mouseout bubbles from every element; only leaving the page counts
        if leave_kind == "mouseout"
            && event
                .dyn_ref::<MouseEvent>()
                .is_some_and(|e| e.related_target().is_some())
        {
            return;
        }
        if let Some(field) = weak.upgrade() {
            field.push(Intent::PointerLeft);
        }
    })?;

    let weak = Rc::downgrade(field);
    let element = canvas;
    add_listener(field, pointer_target, "click", move |event| {
        if let (Some(field), Some((x, y))) = (weak.upgrade(), pointer_position(&element, &event)) {
            field.push(Intent::Click { x, y });
        }
    })?;

    Ok(())
}

fn add_listener(
    field: &Field,
    target: EventTarget,
    kind: &'static str,
    handler: impl FnMut(Event) + 'static,
) -> Result<(), MountError> {
    let callback = Closure::<dyn FnMut(Event)>::new(handler);
    target
        .add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())
        .map_err(|e| MountError::ContextUnavailable(format!("{e:?}")))?;
    field.listeners.borrow_mut().push(Listener {
        target,
        kind,
        callback,
    });
    Ok(())
}

/// Pointer position in canvas coordinates
fn pointer_position(canvas: &HtmlCanvasElement, event: &Event) -> Option<(f64, f64)> {
    let event = event.dyn_ref::<MouseEvent>()?;
    let rect = canvas.get_bounding_client_rect();
    Some(relative_to(
        f64::from(event.client_x()),
        f64::from(event.client_y()),
        rect.left(),
        rect.top(),
    ))
}

fn relative_to(client_x: f64, client_y: f64, left: f64, top: f64) -> (f64, f64) {
    (client_x - left, client_y - top)
}

/// Drive the field from `requestAnimationFrame` until it stops
fn start_loop(field: Rc<Field>, window: Window) {
    let slot: Rc<RefCell<Option<FrameCallback>>> = Rc::new(RefCell::new(None));
    let next = Rc::clone(&slot);
    let win = window.clone();

    *slot.borrow_mut() = Some(Closure::new(move |timestamp: f64| {
        if !field.alive.get() {
            // Dropping the callback ends the loop
            let _ = next.borrow_mut().take();
            return;
        }
        field.tick(timestamp);
        if let Some(callback) = next.borrow().as_ref() {
            request_frame(&win, callback);
        }
    }));

    if let Some(callback) = slot.borrow().as_ref() {
        request_frame(&window, callback);
    }
}

fn request_frame(window: &Window, callback: &FrameCallback) {
    if let Err(e) = window.request_animation_frame(callback.as_ref().unchecked_ref()) {
        log::error!("requestAnimationFrame failed: {e:?}");
    }
}
