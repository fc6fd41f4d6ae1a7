//! Chart canvas: scene frames drawn with Fast2D, pointer input fed back
//! into the dashboard.

pub mod animation;
pub mod canvas;

use std::cell::RefCell;
use std::rc::Rc;

use shared::{ChartLayout, Point};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use zoon::*;

use crate::dashboard::Dashboard;
use crate::debug_utils::{DEBUG_HOVER, debug_critical, debug_flagged};
use animation::{SceneClock, now_ms, start_frame_loop};

pub fn chart_canvas(dashboard: &Dashboard) -> impl Element + use<> {
    let layout = dashboard.layout;
    El::new()
        .s(Width::exact(layout.width as u32))
        .s(Height::exact(layout.height as u32))
        .child_signal(canvas_element(dashboard.clone()).into_signal_option())
}

async fn canvas_element(dashboard: Dashboard) -> impl Element {
    let layout = dashboard.layout;
    let mut zoon_canvas = Canvas::new()
        .width(layout.width as u32)
        .height(layout.height as u32)
        .s(Width::fill())
        .s(Height::fill());

    let dom_canvas = zoon_canvas.raw_el_mut().dom_element();
    let canvas_wrapper = Rc::new(RefCell::new(
        fast2d::CanvasWrapper::new_with_canvas(dom_canvas).await,
    ));
    let clock = Mutable::new(SceneClock::default());
    let frame_loop = start_frame_loop(&dashboard, canvas_wrapper.clone(), clock.clone());
    let pointer_listeners =
        listen_to_pointer(zoon_canvas.raw_el_mut().dom_element(), &dashboard, layout, clock);

    zoon_canvas
        .update_raw_el(move |raw_el| {
            raw_el.on_resize(move |width, height| {
                if width > 0 && height > 0 {
                    canvas_wrapper.borrow_mut().resized(width, height);
                }
            })
        })
        .after_remove(move |_| {
            drop(frame_loop);
            drop(pointer_listeners);
        })
}

/// Maps a viewport position into canvas coordinates of `layout`, accounting
/// for CSS scaling of the element.
pub(crate) fn canvas_point(
    client: (f64, f64),
    element_origin: (f64, f64),
    element_size: (f64, f64),
    layout: ChartLayout,
) -> Point {
    let scale = |size: f64, logical: f64| if size > 0.0 { logical / size } else { 1.0 };
    Point::new(
        (client.0 - element_origin.0) * scale(element_size.0, layout.width),
        (client.1 - element_origin.1) * scale(element_size.1, layout.height),
    )
}

type PointerClosure = Closure<dyn FnMut(web_sys::MouseEvent)>;
type PointerListeners = Detach<(web_sys::HtmlCanvasElement, Vec<(&'static str, PointerClosure)>)>;

/// Owns something attached to the page and runs `detach` on it when dropped.
pub(crate) struct Detach<T> {
    attached: Option<T>,
    detach: fn(T),
}

impl<T> Detach<T> {
    pub(crate) fn new(attached: T, detach: fn(T)) -> Self {
        Self {
            attached: Some(attached),
            detach,
        }
    }
}

impl<T> Drop for Detach<T> {
    fn drop(&mut self) {
        if let Some(attached) = self.attached.take() {
            (self.detach)(attached);
        }
    }
}

fn remove_pointer_listeners(
    (element, listeners): (web_sys::HtmlCanvasElement, Vec<(&'static str, PointerClosure)>),
) {
    for (event_name, closure) in &listeners {
        let _ = element.remove_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
    }
}

/// Time on the scene clock for a pointer event. Uses the generation the
/// dashboard has already published, which may be ahead of the frame loop.
fn pointer_time(dashboard: &Dashboard, clock: &Mutable<SceneClock>) -> f64 {
    clock.lock_mut().stamp(dashboard.scene_generation(), now_ms())
}

fn listen_to_pointer(
    element: web_sys::HtmlCanvasElement,
    dashboard: &Dashboard,
    layout: ChartLayout,
    clock: Mutable<SceneClock>,
) -> PointerListeners {
    let mousemove_closure: PointerClosure = Closure::wrap(Box::new({
        let dashboard = dashboard.clone();
        let clock = clock.clone();
        move |event: web_sys::MouseEvent| {
            let Some(target) = event
                .current_target()
                .and_then(|target| target.dyn_into::<web_sys::Element>().ok())
            else {
                return;
            };
            let rect = target.get_bounding_client_rect();
            let point = canvas_point(
                (event.client_x() as f64, event.client_y() as f64),
                (rect.left(), rect.top()),
                (rect.width(), rect.height()),
                layout,
            );
            let at_ms = pointer_time(&dashboard, &clock);
            debug_flagged(DEBUG_HOVER, &format!("Pointer at {:.0},{:.0}", point.x, point.y));
            dashboard.pointer_moved_relay.send((point, at_ms));
        }
    }) as Box<dyn FnMut(web_sys::MouseEvent)>);

    let mouseleave_closure: PointerClosure = Closure::wrap(Box::new({
        let dashboard = dashboard.clone();
        move |_event: web_sys::MouseEvent| {
            dashboard.pointer_left_relay.send(pointer_time(&dashboard, &clock));
        }
    }) as Box<dyn FnMut(web_sys::MouseEvent)>);

    let listeners = vec![("mousemove", mousemove_closure), ("mouseleave", mouseleave_closure)];
    for (event_name, closure) in &listeners {
        if let Err(error) =
            element.add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref())
        {
            debug_critical(&format!("Failed to listen to '{event_name}' on the chart: {error:?}"));
        }
    }

    Detach::new((element, listeners), remove_pointer_listeners)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detach_runs_once_when_dropped() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        static DETACHED: AtomicUsize = AtomicUsize::new(0);

        let listeners = Detach::new(2usize, |count| {
            DETACHED.fetch_add(count, Ordering::SeqCst);
        });
        assert_eq!(DETACHED.load(Ordering::SeqCst), 0);
        drop(listeners);
        assert_eq!(DETACHED.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn pointer_position_is_relative_to_the_canvas() {
        let point = canvas_point((150.0, 90.0), (100.0, 40.0), (680.0, 400.0), ChartLayout::default());
        assert_eq!(point, Point::new(50.0, 50.0));
    }

    #[test]
    fn pointer_position_follows_css_scaling() {
        let point = canvas_point((440.0, 240.0), (100.0, 40.0), (340.0, 200.0), ChartLayout::default());
        assert_eq!(point, Point::new(680.0, 400.0));
    }
}
