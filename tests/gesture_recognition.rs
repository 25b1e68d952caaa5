use sketch_input::geometry::{AffineTransform, Point};
use sketch_input::input::{
    GestureConfig, GestureEvent, GesturePhase, GestureRecognizer, RecognizerState, TouchPhase, TouchSample,
};

fn feed(recognizer: &mut GestureRecognizer, samples: &[TouchSample]) -> Vec<GestureEvent> {
    samples.iter().flat_map(|sample| recognizer.handle(sample)).collect()
}

fn sample(id: u32, x: f64, y: f64, phase: TouchPhase, ts: u64) -> TouchSample {
    TouchSample::new(id, x, y, phase, ts)
}

fn count_matching(events: &[GestureEvent], predicate: impl Fn(&GestureEvent) -> bool) -> usize {
    events.iter().filter(|event| predicate(event)).count()
}

#[test]
fn test_short_touch_is_a_tap() {
    let mut recognizer = GestureRecognizer::default();
    let events = feed(
        &mut recognizer,
        &[
            sample(0, 100.0, 100.0, TouchPhase::Down, 0),
            sample(0, 103.0, 102.0, TouchPhase::Move, 10),
            sample(0, 103.0, 102.0, TouchPhase::Up, 20),
        ],
    );

    assert_eq!(
        events,
        vec![
            GestureEvent::GestureStart,
            GestureEvent::Tap {
                point: Point::new(100.0, 100.0),
                timestamp_ms: 20,
            },
            GestureEvent::GestureStop,
        ]
    );
    assert_eq!(recognizer.state(), RecognizerState::Idle);
    assert!(!recognizer.is_gesture_active());
}

#[test]
fn test_drag_starts_once_slop_is_crossed() {
    let mut recognizer = GestureRecognizer::new(GestureConfig { drag_slop_px: 8.0 });
    let events = feed(
        &mut recognizer,
        &[
            sample(0, 0.0, 0.0, TouchPhase::Down, 0),
            sample(0, 5.0, 0.0, TouchPhase::Move, 10),
            sample(0, 10.0, 0.0, TouchPhase::Move, 20),
            sample(0, 20.0, 0.0, TouchPhase::Move, 30),
            sample(0, 25.0, 0.0, TouchPhase::Up, 40),
        ],
    );

    assert_eq!(
        events,
        vec![
            GestureEvent::GestureStart,
            GestureEvent::Drag {
                phase: GesturePhase::Start,
                point: Point::new(10.0, 0.0),
                timestamp_ms: 20,
            },
            GestureEvent::Drag {
                phase: GesturePhase::Move,
                point: Point::new(20.0, 0.0),
                timestamp_ms: 30,
            },
            GestureEvent::Drag {
                phase: GesturePhase::Stop,
                point: Point::new(25.0, 0.0),
                timestamp_ms: 40,
            },
            GestureEvent::GestureStop,
        ]
    );
}

#[test]
fn test_drag_points_are_mapped_into_canvas_space() {
    let mut recognizer = GestureRecognizer::default();
    recognizer.set_canvas_transform(AffineTransform::scaling(2.0, 2.0).post_translate(100.0, 0.0));

    let events = feed(
        &mut recognizer,
        &[
            sample(0, 100.0, 0.0, TouchPhase::Down, 0),
            sample(0, 140.0, 20.0, TouchPhase::Move, 10),
        ],
    );
    let GestureEvent::Drag { point, .. } = events[1] else {
        panic!("expected a drag start, got {:?}", events[1]);
    };
    assert!(point.distance(Point::new(20.0, 10.0)) < 1e-9);
}

#[test]
fn test_second_pointer_turns_drag_into_pinch() {
    let mut recognizer = GestureRecognizer::default();
    let events = feed(
        &mut recognizer,
        &[
            sample(0, 0.0, 0.0, TouchPhase::Down, 0),
            sample(0, 30.0, 0.0, TouchPhase::Move, 10),
            sample(1, 100.0, 0.0, TouchPhase::PointerDown, 20),
            sample(1, 120.0, 0.0, TouchPhase::Move, 30),
            sample(1, 120.0, 0.0, TouchPhase::PointerUp, 40),
            sample(0, 30.0, 0.0, TouchPhase::Up, 50),
        ],
    );

    let drag_stop = events
        .iter()
        .position(|e| matches!(e, GestureEvent::Drag { phase: GesturePhase::Stop, .. }))
        .unwrap();
    let pinch_start = events
        .iter()
        .position(|e| matches!(e, GestureEvent::Pinch { phase: GesturePhase::Start, .. }))
        .unwrap();
    assert!(drag_stop < pinch_start);

    // never both open, and no tap once a second pointer appeared
    assert_eq!(count_matching(&events, |e| matches!(e, GestureEvent::Tap { .. })), 0);
    assert_eq!(
        count_matching(&events, |e| matches!(e, GestureEvent::Pinch { phase: GesturePhase::Stop, .. })),
        1
    );
    assert_eq!(events.last(), Some(&GestureEvent::GestureStop));
}

#[test]
fn test_pinch_move_reports_both_spaces() {
    let mut recognizer = GestureRecognizer::default();
    recognizer.set_canvas_transform(AffineTransform::translation(50.0, 0.0));
    let events = feed(
        &mut recognizer,
        &[
            sample(0, 50.0, 0.0, TouchPhase::Down, 0),
            sample(1, 150.0, 0.0, TouchPhase::PointerDown, 10),
            sample(1, 170.0, 0.0, TouchPhase::Move, 20),
        ],
    );

    let Some(GestureEvent::Pinch {
        phase: GesturePhase::Move,
        pointers,
    }) = events.last()
    else {
        panic!("expected a pinch move, got {:?}", events.last());
    };
    assert_eq!(pointers.parent, [Point::new(50.0, 0.0), Point::new(170.0, 0.0)]);
    assert_eq!(pointers.canvas, [Point::new(0.0, 0.0), Point::new(120.0, 0.0)]);
}

#[test]
fn test_third_pointer_is_ignored() {
    let mut recognizer = GestureRecognizer::default();
    feed(
        &mut recognizer,
        &[
            sample(0, 0.0, 0.0, TouchPhase::Down, 0),
            sample(1, 100.0, 0.0, TouchPhase::PointerDown, 10),
        ],
    );

    let events = feed(
        &mut recognizer,
        &[
            sample(2, 50.0, 50.0, TouchPhase::PointerDown, 20),
            sample(2, 60.0, 60.0, TouchPhase::Move, 30),
        ],
    );
    assert!(events.is_empty());
    assert_eq!(recognizer.state(), RecognizerState::Pinch);
    assert_eq!(recognizer.active_pointer_count(), 3);
}

#[test]
fn test_lifting_one_of_three_reanchors_pinch() {
    let mut recognizer = GestureRecognizer::default();
    feed(
        &mut recognizer,
        &[
            sample(0, 0.0, 0.0, TouchPhase::Down, 0),
            sample(1, 100.0, 0.0, TouchPhase::PointerDown, 10),
            sample(2, 50.0, 50.0, TouchPhase::PointerDown, 20),
        ],
    );

    let events = recognizer.handle(&sample(0, 0.0, 0.0, TouchPhase::PointerUp, 30));
    assert_eq!(events.len(), 2);
    assert!(matches!(events[0], GestureEvent::Pinch { phase: GesturePhase::Stop, .. }));
    let GestureEvent::Pinch {
        phase: GesturePhase::Start,
        pointers,
    } = events[1]
    else {
        panic!("expected a new pinch start, got {:?}", events[1]);
    };
    assert_eq!(pointers.parent, [Point::new(100.0, 0.0), Point::new(50.0, 50.0)]);
}

#[test]
fn test_pinch_down_to_one_finger_returns_to_idle() {
    let mut recognizer = GestureRecognizer::default();
    let events = feed(
        &mut recognizer,
        &[
            sample(0, 0.0, 0.0, TouchPhase::Down, 0),
            sample(1, 100.0, 0.0, TouchPhase::PointerDown, 10),
            sample(1, 100.0, 0.0, TouchPhase::PointerUp, 20),
        ],
    );
    assert_eq!(recognizer.state(), RecognizerState::Idle);
    assert!(recognizer.is_gesture_active());
    assert!(matches!(events.last(), Some(GestureEvent::Pinch { phase: GesturePhase::Stop, .. })));

    // the remaining finger can still start a drag, but never a tap
    let events = feed(
        &mut recognizer,
        &[
            sample(0, 30.0, 0.0, TouchPhase::Move, 30),
            sample(0, 30.0, 0.0, TouchPhase::Up, 40),
        ],
    );
    assert!(matches!(events[0], GestureEvent::Drag { phase: GesturePhase::Start, .. }));
    assert_eq!(count_matching(&events, |e| matches!(e, GestureEvent::Tap { .. })), 0);
}

#[test]
fn test_drag_after_pinch_maps_through_transform_set_during_pinch() {
    let mut recognizer = GestureRecognizer::default();
    feed(
        &mut recognizer,
        &[
            sample(0, 100.0, 0.0, TouchPhase::Down, 0),
            sample(1, 300.0, 0.0, TouchPhase::PointerDown, 10),
        ],
    );
    recognizer.set_canvas_transform(AffineTransform::scaling(2.0, 2.0).post_translate(100.0, 0.0));
    feed(&mut recognizer, &[sample(1, 300.0, 0.0, TouchPhase::PointerUp, 20)]);

    let events = feed(&mut recognizer, &[sample(0, 140.0, 20.0, TouchPhase::Move, 30)]);
    let GestureEvent::Drag { point, .. } = events[0] else {
        panic!("expected a drag start, got {:?}", events[0]);
    };
    assert!(point.distance(Point::new(20.0, 10.0)) < 1e-9);
}

#[test]
fn test_cancel_closes_like_up_without_tap_after_drag() {
    let mut recognizer = GestureRecognizer::default();
    let events = feed(
        &mut recognizer,
        &[
            sample(0, 0.0, 0.0, TouchPhase::Down, 0),
            sample(0, 40.0, 0.0, TouchPhase::Move, 10),
            sample(0, 40.0, 0.0, TouchPhase::Cancel, 20),
        ],
    );
    assert!(matches!(events[events.len() - 2], GestureEvent::Drag { phase: GesturePhase::Stop, .. }));
    assert_eq!(events.last(), Some(&GestureEvent::GestureStop));
}

#[test]
fn test_start_and_stop_pair_up_on_noisy_input() {
    let mut recognizer = GestureRecognizer::default();
    let events = feed(
        &mut recognizer,
        &[
            sample(0, 0.0, 0.0, TouchPhase::Up, 0),
            sample(1, 0.0, 0.0, TouchPhase::PointerUp, 1),
            sample(0, 0.0, 0.0, TouchPhase::Down, 2),
            sample(0, 0.0, 0.0, TouchPhase::Down, 3),
            sample(0, 50.0, 0.0, TouchPhase::Move, 4),
            sample(1, 80.0, 0.0, TouchPhase::PointerDown, 5),
            sample(1, 80.0, 0.0, TouchPhase::PointerDown, 6),
            sample(0, 50.0, 0.0, TouchPhase::Up, 7),
            sample(0, 50.0, 0.0, TouchPhase::Up, 8),
            sample(0, 50.0, 0.0, TouchPhase::Move, 9),
        ],
    );

    let starts = count_matching(&events, |e| *e == GestureEvent::GestureStart);
    let stops = count_matching(&events, |e| *e == GestureEvent::GestureStop);
    assert_eq!(starts, 2);
    assert_eq!(starts, stops);
    assert!(!recognizer.is_gesture_active());
}
