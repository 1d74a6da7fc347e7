use pretty_assertions::assert_eq;
use quarterturn_core::{Face, Relationship, SurfaceError, TurnDirection};
use quarterturn_prefs::Preferences;

use super::*;
use crate::{FaceFeedback, GestureError, PipelineError};

#[test]
fn test_missing_camera() {
    let mut p = Pipeline::new(Preferences::default());
    assert_eq!(
        p.pointer_down(sample(0, 0.0, 0.0, ms(0))),
        Err(PipelineError::RaycastingFailed(SurfaceError::MissingCamera)),
    );
    assert!(!p.tracker().is_active());
    // The failed contact was not recorded, so the camera can be attached and
    // the same pointer can go down.
    p.set_camera(OrthographicCamera::facing(Face::Front));
    p.pointer_down(sample(0, 0.0, 0.0, ms(10))).unwrap();
    assert!(p.tracker().is_active());
}

#[test]
fn test_miss_is_not_an_error() {
    let mut p = pipeline_facing(Face::Front);
    p.pointer_down(sample(0, 5.0, 5.0, ms(0))).unwrap();
    assert!(!p.tracker().is_active());
    p.pointer_move(sample(0, 0.0, 0.0, ms(16))).unwrap();
    assert_eq!(p.pointer_up(sample(0, 0.0, 0.0, ms(32))), Ok(None));
    assert!(p.drain_events().is_empty());
}

#[test]
fn test_timeout() {
    let mut p = pipeline_facing(Face::Front);
    p.pointer_down(sample(0, 0.0, 0.0, ms(0))).unwrap();
    assert_eq!(
        p.pointer_move(sample(0, 1.0, 0.0, ms(3500))),
        Err(PipelineError::GestureTimeout(ms(3500))),
    );
    assert!(!p.tracker().is_active());
    assert!(matches!(p.feedback(Face::Front), FaceFeedback::Blocked { .. }));
    assert_eq!(p.pointer_up(sample(0, 1.0, 0.0, ms(3600))), Ok(None));
    assert!(p.history().is_empty());
}

#[test]
fn test_step_clears_stale_selection() {
    let mut p = pipeline_facing(Face::Front);
    p.pointer_down(sample(0, 0.0, 0.0, ms(0))).unwrap();
    p.step(ms(3000));
    assert!(p.tracker().is_active());
    p.step(ms(1));
    assert!(!p.tracker().is_active());
    assert_eq!(p.feedback(Face::Front), FaceFeedback::Normal);
}

#[test]
fn test_bad_samples() {
    let mut p = pipeline_facing(Face::Front);
    p.pointer_down(sample(0, 0.0, 0.0, ms(100))).unwrap();
    assert_eq!(
        p.pointer_move(sample(0, 1.0, 0.0, ms(50))),
        Err(PipelineError::InvalidGesture(GestureError::TimeWentBackwards {
            last: ms(100),
            now: ms(50),
        })),
    );
    assert_eq!(
        p.pointer_move(sample(0, f32::NAN, 0.0, ms(150))),
        Err(PipelineError::InvalidGesture(GestureError::NonFinite)),
    );
    assert_eq!(
        p.pointer_down(sample(0, 0.0, 0.0, ms(150))),
        Err(PipelineError::InvalidGesture(GestureError::DuplicateContact(0))),
    );
    // The gesture survives bad samples.
    assert!(p.tracker().is_active());
}

#[test]
fn test_drag_directions() {
    let cases = [
        ((0.0, 0.0), (1.2, 0.0), "F"),
        ((0.0, 0.0), (-1.2, 0.0), "F'"),
        // Where the face is gripped does not matter.
        ((0.0, -1.0), (1.2, -1.0), "F"),
        ((-1.0, 1.0), (0.2, 1.0), "F"),
        ((1.0, 1.0), (-0.2, 1.0), "F'"),
        ((1.0, 0.0), (1.0, 1.2), "F'"),
        ((-1.0, 0.0), (-1.0, -1.2), "F"),
    ];
    for (from, to, expected) in cases {
        let mut p = pipeline_facing(Face::Front);
        drag(&mut p, from, to, ms(0));
        settle(&mut p);
        assert_eq!(committed(&p.drain_events()), vec![expected], "{from:?} -> {to:?}");
    }
}

#[test]
fn test_radial_drag_twists() {
    let mut p = pipeline_facing(Face::Front);
    drag(&mut p, (1.0, 0.0), (2.2, 0.0), ms(0));
    settle(&mut p);
    assert_eq!(committed(&p.drain_events()), vec!["F"]);
}

#[test]
fn test_grip_sensitive_drag() {
    let mut prefs = Preferences::default();
    prefs.direction.grip_sensitive = true;
    let facing_front = || Pipeline::with_camera(prefs.clone(), OrthographicCamera::facing(Face::Front));

    let mut p = facing_front();
    drag(&mut p, (0.0, -1.0), (1.2, -1.0), ms(0));
    settle(&mut p);
    assert_eq!(committed(&p.drain_events()), vec!["F'"]);

    // Dragging straight away from the center has no torque.
    let mut p = facing_front();
    drag(&mut p, (1.0, 0.0), (2.0, 0.0), ms(0));
    assert!(p.history().is_empty());
    assert!(!p.is_animating());
    assert!(matches!(p.feedback(Face::Front), FaceFeedback::Blocked { .. }));
}

#[test]
fn test_drag_across_edge() {
    let mut p = Pipeline::with_camera(Preferences::default(), corner_camera());
    // Starts on the front facelet next to the right face, halfway up.
    p.pointer_down(sample(0, -0.2, -0.8, ms(0))).unwrap();
    let state = p.tracker().state().unwrap();
    assert_eq!(state.reference_face, Face::Front);
    assert_eq!(state.facelet.pos, quarterturn_core::GridPos([1, 0, 1]));

    // Ends on the right face.
    p.pointer_move(sample(0, 0.2, -0.8, ms(16))).unwrap();
    let candidate = *p.candidate().unwrap();
    assert_eq!(candidate.target, Face::Right);
    assert_eq!(candidate.direction, TurnDirection::Clockwise);
    assert!(p.tracker().state().unwrap().has_valid_adjacency);

    // Keeps going onto the middle of the right face.
    p.pointer_move(sample(0, 1.0, -0.8, ms(32))).unwrap();
    let candidate = *p.candidate().unwrap();
    assert_eq!(candidate.target, Face::Right);
    assert!(p.tracker().state().unwrap().has_valid_adjacency);

    p.pointer_up(sample(0, 1.0, -0.8, ms(48))).unwrap();
    settle(&mut p);
    assert_eq!(committed(&p.drain_events()), vec!["F"]);
}

#[test]
fn test_drag_from_center_across_edge() {
    let mut p = Pipeline::with_camera(Preferences::default(), corner_camera());
    p.pointer_down(sample(0, -1.4, -0.4, ms(0))).unwrap();
    let state = p.tracker().state().unwrap();
    assert_eq!(state.reference_face, Face::Front);
    assert_eq!(state.facelet.pos, quarterturn_core::GridPos([0, 0, 1]));

    // Sweep right across the front face, over the edge, and onto the middle
    // of the right face.
    let mut time = ms(0);
    for i in 1..=11 {
        let x = -1.4 + 0.2 * i as f32;
        time += FRAME;
        p.pointer_move(sample(0, x, -0.4, time)).unwrap();
        if x > -1.0 {
            let candidate = p.candidate().copied();
            assert_eq!(candidate.map(|c| c.to_move().to_string()), Some("F".to_owned()), "x = {x}");
            assert!(p.tracker().state().unwrap().has_valid_adjacency, "x = {x}");
        }
    }

    p.pointer_up(sample(0, 0.8, -0.4, time + FRAME)).unwrap();
    settle(&mut p);
    assert_eq!(committed(&p.drain_events()), vec!["F"]);
}

#[test]
fn test_across_edge_needs_adjacent_facelets() {
    let prefs = Preferences::default();
    // From the front facelet below the top-right corner to the right facelet
    // at the top-back corner.
    let start = quarterturn_core::Facelet {
        face: Face::Front,
        pos: quarterturn_core::GridPos([1, 0, 1]),
    };
    let far = quarterturn_core::Facelet {
        face: Face::Right,
        pos: quarterturn_core::GridPos([1, 1, -1]),
    };
    let c = quarterturn_core::classify(start, far, &prefs.adjacency).unwrap();
    assert_eq!(c.relationship, Relationship::NonAdjacent);
}

#[test]
fn test_hover() {
    let mut p = pipeline_facing(Face::Front);
    p.pointer_move(sample(7, 0.0, 0.0, ms(0))).unwrap();
    assert!(matches!(p.feedback(Face::Front), FaceFeedback::Hover { .. }));
    p.pointer_move(sample(7, 3.0, 0.0, ms(16))).unwrap();
    assert_eq!(p.feedback(Face::Front), FaceFeedback::Normal);

    p.pointer_move(sample(7, 0.0, 0.0, ms(32))).unwrap();
    p.pointer_down(sample(7, 0.0, 0.0, ms(48))).unwrap();
    assert!(matches!(p.feedback(Face::Front), FaceFeedback::Selected { .. }));
}

#[test]
fn test_cancel_gesture() {
    let mut p = pipeline_facing(Face::Front);
    p.pointer_down(sample(0, 0.0, 0.0, ms(0))).unwrap();
    p.pointer_move(sample(0, 1.0, 0.0, ms(16))).unwrap();
    assert!(p.candidate().is_some());
    p.cancel_gesture();
    assert!(p.candidate().is_none());
    assert!(!p.tracker().is_active());
    assert_eq!(p.feedback(Face::Front), FaceFeedback::Normal);
    assert_eq!(p.pointer_up(sample(0, 1.0, 0.0, ms(32))), Ok(None));
    assert!(p.cube().is_solved());
}

#[test]
fn test_do_moves() {
    let mut p = Pipeline::new(Preferences::default());
    // B and F share no pieces, so both can animate at once.
    assert_eq!(p.do_moves("F B").unwrap().len(), 2);
    assert!(matches!(
        p.do_moves("U"),
        Err(PipelineError::AnimationInProgress(_)),
    ));
    assert!(matches!(p.do_moves("Q"), Err(PipelineError::InvalidMove(_))));
    p.finish_animations();
    assert_eq!(p.history().len(), 2);
    p.cube().check_invariants().unwrap();
}
