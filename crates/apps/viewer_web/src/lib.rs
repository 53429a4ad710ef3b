use std::cell::{Cell, RefCell};
use std::rc::Rc;

use console_error_panic_hook::set_once;
use formats::{FeatureCollection, LoadError, StatTable, parse_feature_collection};
use gloo_net::http::Request;
use layers::ChoroplethConfig;
use runtime::{InputEvent, Readiness, Teardown};
use scene::ViewConfig;
use wasm_bindgen::JsCast;
use wasm_bindgen::convert::FromWasmAbi;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    AddEventListenerOptions, Document, Element, EventTarget, HtmlCanvasElement, MouseEvent,
    WheelEvent, Window,
};

mod dom;
mod session;
mod wgpu;

pub use dom::{OVERLAY_TEXT, Overlay};
pub use session::{FrameOutput, Session};
use wgpu::{WgpuContext, init_wgpu_from_canvas, render_frame, resize_wgpu, upload_scene};

pub const DEFAULT_DATASET_URL: &str = "prefectures.geojson";

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    set_once();
    Ok(())
}

struct Viewer {
    session: Session,
    gpu: WgpuContext,
}

/// A mounted map. Dropping it, or calling `unmount`, releases every listener,
/// the pending frame and the overlay.
#[wasm_bindgen]
pub struct MapViewer {
    viewer: Rc<RefCell<Viewer>>,
    teardown: Teardown,
}

#[wasm_bindgen]
impl MapViewer {
    pub fn unmount(&mut self) {
        self.teardown.run();
    }

    pub fn report(&self) -> String {
        self.viewer.borrow().session.summary()
    }

    /// `[rotation.x, rotation.y, rotation.z, zoom]`.
    pub fn view_state(&self) -> Vec<f64> {
        let viewer = self.viewer.borrow();
        let state = viewer.session.controller().state();
        let r = state.rotation;
        vec![r.x, r.y, r.z, state.zoom]
    }
}

fn report_error(context: &str, err: impl std::fmt::Display) -> JsValue {
    let msg = format!("{context}: {err}");
    web_sys::console::error_1(&JsValue::from_str(&msg));
    JsValue::from_str(&msg)
}

/// Loads the boundaries, brings up the renderer and starts drawing into the
/// canvas with id `canvas_id`. On failure an error panel stays over the
/// canvas and nothing else is left registered.
#[wasm_bindgen]
pub async fn mount(
    canvas_id: String,
    dataset_url: Option<String>,
    stats_url: Option<String>,
) -> Result<MapViewer, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("window missing"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("document missing"))?;
    let canvas = document
        .get_element_by_id(&canvas_id)
        .ok_or_else(|| JsValue::from_str("canvas missing"))?
        .dyn_into::<HtmlCanvasElement>()?;
    let parent = canvas
        .parent_element()
        .ok_or_else(|| JsValue::from_str("canvas has no parent"))?;

    let dataset_url = dataset_url.unwrap_or_else(|| DEFAULT_DATASET_URL.to_string());
    match mount_into(&window, &document, &parent, canvas, &dataset_url, stats_url).await {
        Ok(viewer) => Ok(viewer),
        Err(err) => {
            let message = err.as_string().unwrap_or_else(|| format!("{err:?}"));
            dom::show_error(&document, &parent, &message)?;
            Err(err)
        }
    }
}

async fn mount_into(
    window: &Window,
    document: &Document,
    parent: &Element,
    canvas: HtmlCanvasElement,
    dataset_url: &str,
    stats_url: Option<String>,
) -> Result<MapViewer, JsValue> {
    // Everything registered from here on is released on any early return.
    let mut teardown = Teardown::new();

    let overlay = Rc::new(Overlay::attach(document, parent)?);
    {
        let overlay = overlay.clone();
        teardown.defer("overlay", move || overlay.remove());
    }

    let collection = fetch_boundaries(dataset_url)
        .await
        .map_err(|e| report_error("boundary data", e))?;
    let stats = match stats_url {
        Some(url) => fetch_stats(&url)
            .await
            .map_err(|e| report_error("statistics", e))?,
        None => StatTable::japan_defaults(),
    };

    let viewport = viewport_size(&canvas);
    let dpr = window.device_pixel_ratio();
    set_canvas_size(&canvas, viewport, dpr);

    let view = ViewConfig::default();
    let session = Session::new(
        &collection,
        &stats,
        ChoroplethConfig::default(),
        &view,
        viewport,
    )
    .map_err(|e| report_error("scene", e))?;

    let mut gpu = wait_for_renderer(window, canvas.clone())
        .await
        .map_err(|e| report_error("renderer", e))?;
    upload_scene(&mut gpu, &session.buffers);

    let viewer = Rc::new(RefCell::new(Viewer { session, gpu }));

    let queue_event = {
        let viewer = viewer.clone();
        move |event: InputEvent| viewer.borrow_mut().session.input.push(event)
    };

    let canvas_target: &EventTarget = canvas.as_ref();
    let window_target: &EventTarget = window.as_ref();

    listen(canvas_target, "mousedown", &mut teardown, None, {
        let queue_event = queue_event.clone();
        move |e: MouseEvent| {
            queue_event(InputEvent::PointerDown {
                x: e.client_x() as f64,
                y: e.client_y() as f64,
            })
        }
    })?;
    listen(window_target, "mousemove", &mut teardown, None, {
        let queue_event = queue_event.clone();
        move |e: MouseEvent| {
            queue_event(InputEvent::PointerMove {
                x: e.client_x() as f64,
                y: e.client_y() as f64,
            })
        }
    })?;
    listen(window_target, "mouseup", &mut teardown, None, {
        let queue_event = queue_event.clone();
        move |_: MouseEvent| queue_event(InputEvent::PointerUp)
    })?;

    // Non-passive so the page doesn't scroll while zooming.
    let wheel_opts = AddEventListenerOptions::new();
    wheel_opts.set_passive(false);
    listen(canvas_target, "wheel", &mut teardown, Some(&wheel_opts), {
        let queue_event = queue_event.clone();
        move |e: WheelEvent| {
            e.prevent_default();
            queue_event(InputEvent::Wheel {
                delta_y: e.delta_y(),
            })
        }
    })?;
    listen(window_target, "resize", &mut teardown, None, {
        let queue_event = queue_event.clone();
        let canvas = canvas.clone();
        move |_: web_sys::Event| {
            let [width, height] = viewport_size(&canvas);
            queue_event(InputEvent::Resize { width, height })
        }
    })?;

    start_render_loop(window, viewer.clone(), overlay, canvas, &mut teardown)?;

    tracing::info!(summary = %viewer.borrow().session.summary(), "map mounted");
    Ok(MapViewer { viewer, teardown })
}

async fn fetch_text(url: &str) -> Result<String, LoadError> {
    let resp = Request::get(url)
        .send()
        .await
        .map_err(|e| LoadError::data_missing(url, e))?;
    if !resp.ok() {
        return Err(LoadError::data_missing(url, format!("HTTP {}", resp.status())));
    }
    resp.text().await.map_err(|e| LoadError::data_missing(url, e))
}

async fn fetch_boundaries(url: &str) -> Result<FeatureCollection, LoadError> {
    let payload = fetch_text(url).await?;
    parse_feature_collection(url, &payload)
}

async fn fetch_stats(url: &str) -> Result<StatTable, LoadError> {
    let payload = fetch_text(url).await?;
    StatTable::from_json_str(&payload).map_err(|source| LoadError::Stats {
        location: url.to_string(),
        source,
    })
}

async fn wait_for_renderer(
    window: &Window,
    canvas: HtmlCanvasElement,
) -> Result<WgpuContext, runtime::ReadinessError> {
    let readiness = Readiness::default();

    let mut timer_id = None;
    let timer = js_sys::Promise::new(&mut |resolve, _reject| {
        timer_id = window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                &resolve,
                readiness.timeout_ms as i32,
            )
            .ok();
    });
    let deadline = async move {
        let _ = JsFuture::from(timer).await;
    };
    let init = async move {
        init_wgpu_from_canvas(canvas)
            .await
            .map_err(|e| e.as_string().unwrap_or_else(|| format!("{e:?}")))
    };

    let result = readiness.wait(init, deadline).await;
    if let Some(id) = timer_id {
        window.clear_timeout_with_handle(id);
    }
    result
}

fn viewport_size(canvas: &HtmlCanvasElement) -> [f64; 2] {
    let rect = canvas.get_bounding_client_rect();
    [rect.width().max(1.0), rect.height().max(1.0)]
}

fn set_canvas_size(canvas: &HtmlCanvasElement, viewport: [f64; 2], dpr: f64) {
    let dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
    canvas.set_width((viewport[0] * dpr).round().max(1.0) as u32);
    canvas.set_height((viewport[1] * dpr).round().max(1.0) as u32);
}

/// Registers `handler` for `kind` on `target`; the teardown removes the
/// listener and drops the closure.
fn listen<E>(
    target: &EventTarget,
    kind: &'static str,
    teardown: &mut Teardown,
    options: Option<&AddEventListenerOptions>,
    handler: impl FnMut(E) + 'static,
) -> Result<(), JsValue>
where
    E: FromWasmAbi + 'static,
{
    let closure = Closure::<dyn FnMut(E)>::new(handler);
    let callback = closure.as_ref().unchecked_ref::<js_sys::Function>().clone();
    match options {
        Some(opts) => target.add_event_listener_with_callback_and_add_event_listener_options(
            kind, &callback, opts,
        )?,
        None => target.add_event_listener_with_callback(kind, &callback)?,
    }

    let target = target.clone();
    teardown.defer(kind, move || {
        let _ = target.remove_event_listener_with_callback(kind, &callback);
        drop(closure);
    });
    Ok(())
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn start_render_loop(
    window: &Window,
    viewer: Rc<RefCell<Viewer>>,
    overlay: Rc<Overlay>,
    canvas: HtmlCanvasElement,
    teardown: &mut Teardown,
) -> Result<(), JsValue> {
    let callback: FrameCallback = Rc::new(RefCell::new(None));
    let handle: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));

    {
        let callback_ref = callback.clone();
        let handle = handle.clone();
        let window = window.clone();
        *callback.borrow_mut() = Some(Closure::new(move |now_ms: f64| {
            handle.set(None);
            {
                let mut guard = viewer.borrow_mut();
                let Viewer { session, gpu } = &mut *guard;
                let out = session.step(now_ms);
                if let Some((w, h)) = out.resized {
                    set_canvas_size(&canvas, [w as f64, h as f64], window.device_pixel_ratio());
                    resize_wgpu(gpu, canvas.width(), canvas.height());
                }
                overlay.set_tooltip(out.tooltip.as_deref());
                if let Err(e) = render_frame(gpu, &out.render) {
                    web_sys::console::error_1(&e);
                }
            }
            if let Some(cb) = callback_ref.borrow().as_ref() {
                handle.set(
                    window
                        .request_animation_frame(cb.as_ref().unchecked_ref())
                        .ok(),
                );
            }
        }));
    }

    if let Some(cb) = callback.borrow().as_ref() {
        handle.set(Some(
            window.request_animation_frame(cb.as_ref().unchecked_ref())?,
        ));
    }

    let window = window.clone();
    teardown.defer("animation-frame", move || {
        if let Some(id) = handle.take() {
            let _ = window.cancel_animation_frame(id);
        }
        // Breaks the closure's reference to itself.
        callback.borrow_mut().take();
    });
    Ok(())
}
