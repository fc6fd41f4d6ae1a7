//! Frame loop driving reveal and hover transitions.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use fast2d::CanvasWrapper;
use futures::{FutureExt, StreamExt, select};
use shared::sample_frame;
use zoon::*;

use super::canvas::frame_objects;
use crate::dashboard::{Dashboard, DashboardView};

/// 60 fps
const FRAME_INTERVAL_MS: u32 = 16;

/// Milliseconds since the current scene generation was first drawn.
///
/// Hover phases are stamped on this clock too, so reveal and hover
/// transitions share one timeline.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SceneClock {
    generation: Option<u64>,
    started_at_ms: f64,
}

impl SceneClock {
    /// Restarts the clock when `generation` differs from the running one.
    pub fn elapsed_for(&mut self, generation: u64, now_ms: f64) -> f64 {
        if self.generation != Some(generation) {
            self.generation = Some(generation);
            self.started_at_ms = now_ms;
        }
        (now_ms - self.started_at_ms).max(0.0)
    }

    /// Time for an input event. A known `generation` restarts the clock the
    /// same way the frame loop would, so events right after a rebuild are
    /// stamped on the new scene's timeline.
    pub fn stamp(&mut self, generation: Option<u64>, now_ms: f64) -> f64 {
        match generation {
            Some(generation) => self.elapsed_for(generation, now_ms),
            None => self.elapsed(now_ms),
        }
    }

    pub fn elapsed(&self, now_ms: f64) -> f64 {
        match self.generation {
            Some(_) => (now_ms - self.started_at_ms).max(0.0),
            None => 0.0,
        }
    }
}

pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Redraws on every view change and keeps drawing at frame rate until the
/// sampled frame is settled. A newer scene generation restarts the clock, so
/// transitions of a replaced scene are never drawn again.
pub fn start_frame_loop(
    dashboard: &Dashboard,
    canvas_wrapper: Rc<RefCell<CanvasWrapper>>,
    clock: Mutable<SceneClock>,
) -> TaskHandle {
    let mut views = dashboard.view_signal().to_stream().fuse();

    Task::start_droppable(async move {
        let mut latest: Option<Arc<DashboardView>> = None;
        let mut animating = false;

        loop {
            let next_view = if animating {
                select! {
                    view = views.next() => Some(view),
                    () = Timer::sleep(FRAME_INTERVAL_MS).fuse() => None,
                }
            } else {
                Some(views.next().await)
            };
            match next_view {
                Some(None) => break,
                Some(Some(view)) => latest = view,
                None => {}
            }

            let Some(view) = &latest else {
                animating = false;
                canvas_wrapper.borrow_mut().update_objects(|objects| objects.clear());
                continue;
            };
            let elapsed = clock.lock_mut().elapsed_for(view.scene.generation, now_ms());
            let frame = sample_frame(&view.scene, elapsed, &view.hover_phases);
            animating = !frame.settled;

            let mut new_objects = frame_objects(&frame);
            canvas_wrapper
                .borrow_mut()
                .update_objects(move |objects| std::mem::swap(objects, &mut new_objects));
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_restarts_for_a_new_generation() {
        let mut clock = SceneClock::default();
        assert_eq!(clock.elapsed(500.0), 0.0);

        assert_eq!(clock.elapsed_for(1, 1000.0), 0.0);
        assert_eq!(clock.elapsed_for(1, 1250.0), 250.0);
        assert_eq!(clock.elapsed(1300.0), 300.0);

        assert_eq!(clock.elapsed_for(2, 2000.0), 0.0);
        assert_eq!(clock.elapsed_for(2, 2100.0), 100.0);
    }

    #[test]
    fn input_after_a_rebuild_uses_the_new_timeline() {
        let mut clock = SceneClock::default();
        clock.elapsed_for(1, 1000.0);

        // Generation 2 is published but not drawn yet.
        assert_eq!(clock.stamp(Some(2), 3000.0), 0.0);
        assert_eq!(clock.elapsed_for(2, 3016.0), 16.0);
        assert_eq!(clock.stamp(None, 3100.0), 100.0);
    }

    #[test]
    fn clock_never_runs_backwards() {
        let mut clock = SceneClock::default();
        clock.elapsed_for(1, 1000.0);
        assert_eq!(clock.elapsed(900.0), 0.0);
    }
}
