use cgmath::{Point2, Vector3};
use quarterturn_core::{Face, OrthographicCamera};
use quarterturn_prefs::Preferences;
use web_time::Duration;

use crate::{Pipeline, PipelineEvent, PointerSample};

mod gestures;

const FRAME: Duration = Duration::from_millis(16);

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn sample(id: u32, x: f32, y: f32, time: Duration) -> PointerSample {
    PointerSample {
        id,
        position: Point2::new(x, y),
        time,
    }
}

fn pipeline_facing(face: Face) -> Pipeline {
    Pipeline::with_camera(Preferences::default(), OrthographicCamera::facing(face))
}

/// Camera looking at the corner between the up, right, and front faces.
fn corner_camera() -> OrthographicCamera {
    OrthographicCamera::new(Vector3::new(-1.0, -1.0, -1.0), Vector3::unit_y(), 1.0)
        .expect("valid camera")
}

/// Drags from `from` to `to` on screen in a few steps with pointer 0, then
/// releases.
fn drag(p: &mut Pipeline, from: (f32, f32), to: (f32, f32), start: Duration) {
    p.pointer_down(sample(0, from.0, from.1, start)).unwrap();
    for i in 1..=4 {
        let t = i as f32 / 4.0;
        let x = from.0 + (to.0 - from.0) * t;
        let y = from.1 + (to.1 - from.1) * t;
        p.pointer_move(sample(0, x, y, start + FRAME * i)).unwrap();
    }
    p.pointer_up(sample(0, to.0, to.1, start + FRAME * 5)).unwrap();
}

/// Steps until no animation is running.
fn settle(p: &mut Pipeline) {
    for _ in 0..1000 {
        if !p.step(FRAME) {
            return;
        }
    }
    panic!("pipeline did not settle");
}

fn committed(events: &[PipelineEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| match e {
            PipelineEvent::Committed(m) => Some(m.to_string()),
            _ => None,
        })
        .collect()
}
