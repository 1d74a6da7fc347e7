//! Replaying scripted pointer gestures.

use eyre::{Result, eyre};
use quarterturn_core::cgmath::Point2;
use quarterturn_core::{Face, OrthographicCamera};
use quarterturn_prefs::Preferences;
use quarterturn_view::{Duration, Pipeline, PipelineEvent, PointerSample};
use serde::{Deserialize, Serialize};

/// Pointer samples to feed through the pipeline, as read from YAML.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub(crate) struct GestureScript {
    /// Face the camera looks at, as a move symbol such as `F`.
    #[serde(default = "default_face")]
    pub face: String,
    /// Samples in time order.
    pub samples: Vec<ScriptSample>,
}

fn default_face() -> String {
    "F".to_owned()
}

#[derive(Deserialize, Debug, Copy, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub(crate) enum SampleKind {
    Down,
    Move,
    Up,
}

#[derive(Deserialize, Debug, Copy, Clone, PartialEq)]
pub(crate) struct ScriptSample {
    pub kind: SampleKind,
    #[serde(default)]
    pub id: u32,
    pub x: f32,
    pub y: f32,
    /// Seconds since the start of the script.
    pub t: f32,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub(crate) enum EventReport {
    Feedback {
        face: String,
        state: &'static str,
        #[serde(skip_serializing_if = "Option::is_none")]
        overlay: Option<[f32; 4]>,
    },
    Started { id: u64, r#move: String },
    Committed { r#move: String },
    Solved,
    Error { t: f32, message: String },
}
impl From<PipelineEvent> for EventReport {
    fn from(event: PipelineEvent) -> Self {
        match event {
            PipelineEvent::Feedback { face, feedback } => Self::Feedback {
                face: face.to_string(),
                state: feedback.name(),
                overlay: feedback.overlay(1.0),
            },
            PipelineEvent::Started { id, command } => Self::Started {
                id: id.0,
                r#move: command.to_move().to_string(),
            },
            PipelineEvent::Committed(m) => Self::Committed {
                r#move: m.to_string(),
            },
            PipelineEvent::Solved => Self::Solved,
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub(crate) struct GestureReport {
    pub events: Vec<EventReport>,
    pub committed: Vec<String>,
    pub solved: bool,
}

/// Length of the frames used to finish animations after the last sample.
const FRAME: Duration = Duration::from_millis(16);

/// Feeds every sample through a pipeline with a camera facing the scripted
/// face, then lets animations and feedback settle.
///
/// Errors from individual samples are reported as events rather than
/// stopping the replay.
pub(crate) fn run(prefs: Preferences, script: &GestureScript) -> Result<GestureReport> {
    let face = script
        .face
        .chars()
        .next()
        .and_then(Face::from_symbol)
        .ok_or_else(|| eyre!("unknown face {:?}", script.face))?;
    let mut pipeline = Pipeline::with_camera(prefs, OrthographicCamera::facing(face));
    let mut events = vec![];

    for s in &script.samples {
        let time = Duration::try_from_secs_f32(s.t)
            .map_err(|e| eyre!("bad timestamp {}: {e}", s.t))?;
        // Bring animations up to the sample's time before handling it.
        let gap = time.saturating_sub(pipeline.now());
        if !gap.is_zero() {
            pipeline.step(gap);
        }

        let sample = PointerSample {
            id: s.id,
            position: Point2::new(s.x, s.y),
            time,
        };
        let result = match s.kind {
            SampleKind::Down => pipeline.pointer_down(sample),
            SampleKind::Move => pipeline.pointer_move(sample),
            SampleKind::Up => pipeline.pointer_up(sample).map(|_| ()),
        };
        events.extend(pipeline.drain_events().into_iter().map(EventReport::from));
        if let Err(e) = result {
            log::warn!("sample at {}s failed: {e}", s.t);
            events.push(EventReport::Error {
                t: s.t,
                message: e.to_string(),
            });
        }
    }

    while pipeline.step(FRAME) {}
    events.extend(pipeline.drain_events().into_iter().map(EventReport::from));

    Ok(GestureReport {
        events,
        committed: pipeline.history().iter().map(|m| m.to_string()).collect(),
        solved: pipeline.cube().is_solved(),
    })
}
