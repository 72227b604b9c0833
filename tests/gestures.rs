use relative_touch::{Config, MouseButton, RecordingSink, SinkCommand, TouchSession};

use MouseButton::{Left, Right};
use SinkCommand::{ButtonDown, ButtonUp, Move, Scroll};

fn session() -> TouchSession<RecordingSink> {
    // Surface matches the reference, so deltas pass through 1:1.
    TouchSession::new(Config::default(), RecordingSink::new()).with_surface(1920, 1080)
}

fn buttons(s: &TouchSession<RecordingSink>) -> Vec<SinkCommand> {
    s.sink()
        .commands()
        .iter()
        .copied()
        .filter(|c| matches!(c, ButtonDown(_) | ButtonUp(_)))
        .collect()
}

#[test]
fn single_tap_presses_then_releases_after_window() {
    let mut s = session();
    s.touch_down(1, 100, 100, 1_000);
    s.touch_up(1, 102, 101, 1_080);

    assert_eq!(s.sink().commands(), &[ButtonDown(Left)]);

    s.advance_to(1_279);
    assert_eq!(s.sink().commands(), &[ButtonDown(Left)]);

    s.advance_to(1_280);
    assert_eq!(s.sink().commands(), &[ButtonDown(Left), ButtonUp(Left)]);
    assert_eq!(s.next_deadline(), None);
}

#[test]
fn double_tap_yields_two_clean_clicks() {
    let mut s = session();
    s.touch_down(1, 100, 100, 0);
    s.touch_up(1, 100, 100, 60);
    s.touch_down(2, 130, 90, 150);
    assert!(s.coordinator().quick_tap_detected());
    s.touch_up(2, 130, 90, 210);

    assert_eq!(s.sink().commands(), &[ButtonDown(Left), ButtonUp(Left)]);

    s.advance_to(1_000);
    assert_eq!(
        s.sink().commands(),
        &[
            ButtonDown(Left),
            ButtonUp(Left),
            ButtonDown(Left),
            ButtonUp(Left)
        ]
    );
    assert!(!s.sink().is_held(Left));
    assert!(!s.coordinator().quick_tap_detected());
}

#[test]
fn compensating_click_is_held_for_fifty_ms() {
    let mut s = session();
    s.touch_down(1, 0, 0, 0);
    s.touch_up(1, 0, 0, 40);
    s.touch_down(2, 0, 0, 100);
    s.touch_up(2, 0, 0, 150);

    s.advance_to(199);
    assert_eq!(buttons(&s).len(), 2);
    s.advance_to(200);
    assert_eq!(buttons(&s).last(), Some(&ButtonDown(Left)));
    s.advance_to(249);
    assert!(s.sink().is_held(Left));
    s.advance_to(250);
    assert!(!s.sink().is_held(Left));
}

#[test]
fn tap_then_quick_touch_drags_with_button_held() {
    let mut s = session();
    s.touch_down(1, 500, 500, 0);
    s.touch_up(1, 500, 500, 50);
    s.touch_down(2, 510, 505, 120);

    // The single-tap release fires while the second touch is down and is skipped.
    s.advance_to(300);
    assert!(s.sink().is_held(Left));

    s.touch_move(2, 560, 505, 320);
    s.touch_move(2, 620, 540, 340);
    assert!(s.sink().is_held(Left));

    s.touch_up(2, 620, 540, 400);
    s.advance_to(2_000);
    assert_eq!(
        s.sink().commands(),
        &[
            ButtonDown(Left),
            Move { dx: 50, dy: 0 },
            Move { dx: 60, dy: 35 },
            ButtonUp(Left)
        ]
    );
}

#[test]
fn slow_second_tap_is_an_independent_click() {
    let mut s = session();
    s.touch_down(1, 100, 100, 0);
    s.touch_up(1, 100, 100, 50);
    s.touch_down(2, 100, 100, 400);
    assert!(!s.coordinator().quick_tap_detected());
    s.touch_up(2, 100, 100, 450);
    s.advance_to(1_000);

    assert_eq!(
        buttons(&s),
        vec![
            ButtonDown(Left),
            ButtonUp(Left),
            ButtonDown(Left),
            ButtonUp(Left)
        ]
    );
}

#[test]
fn path_length_confirms_move_and_suppresses_click() {
    let mut s = session();
    s.touch_down(1, 0, 0, 0);
    s.touch_move(1, 10, 0, 10);
    s.touch_move(1, 20, 0, 20);
    assert!(!s.context(1).unwrap().confirmed_move());
    s.touch_move(1, 30, 0, 30);
    assert!(s.context(1).unwrap().confirmed_move());

    s.touch_up(1, 30, 0, 40);
    s.advance_to(1_000);
    assert!(buttons(&s).is_empty());
    assert_eq!(
        s.sink().commands(),
        &[
            Move { dx: 10, dy: 0 },
            Move { dx: 10, dy: 0 },
            Move { dx: 10, dy: 0 }
        ]
    );
}

#[test]
fn single_jump_past_bounds_confirms_move() {
    let mut s = session();
    s.touch_down(1, 0, 0, 0);
    s.touch_move(1, 0, 150, 10);
    assert!(s.context(1).unwrap().confirmed_move());
    assert_eq!(s.context(1).unwrap().distance_moved(), 0.0);
}

#[test]
fn two_finger_motion_scrolls_without_clicks() {
    let mut s = session();
    s.touch_down(1, 100, 100, 0);
    s.touch_down(2, 400, 100, 10);
    s.touch_move(1, 100, 110, 20);
    s.touch_move(2, 400, 110, 20);
    s.touch_move(1, 100, 104, 30);
    s.touch_move(2, 400, 104, 30);
    assert!(s.coordinator().is_scrolling());

    s.touch_up(2, 400, 104, 100);
    s.touch_up(1, 100, 104, 110);
    s.advance_to(1_000);

    assert_eq!(s.sink().commands(), &[Scroll(50), Scroll(-30)]);
}

#[test]
fn scroll_follows_scale_factor() {
    let mut s = TouchSession::new(Config::default(), RecordingSink::new()).with_surface(960, 540);
    s.touch_down(1, 100, 100, 0);
    s.touch_down(2, 400, 100, 10);
    s.touch_move(1, 100, 103, 20);
    assert_eq!(s.sink().commands(), &[Scroll(30)]);
}

#[test]
fn two_finger_tap_right_clicks_once() {
    let mut s = session();
    s.touch_down(1, 100, 100, 0);
    s.touch_down(2, 400, 100, 10);
    s.touch_up(2, 400, 100, 60);
    s.touch_up(1, 100, 100, 70);
    s.advance_to(1_000);

    let sink = s.sink();
    assert_eq!(sink.count(ButtonDown(Right)), 1);
    assert_eq!(sink.count(ButtonUp(Right)), 1);
    assert!(!sink.is_held(Right));
    assert!(!sink.is_held(Left));
}

#[test]
fn close_two_finger_tap_has_balanced_buttons() {
    let mut s = session();
    s.touch_down(1, 100, 100, 0);
    // Close enough to be a quick tap if a joining finger were scored.
    s.touch_down(2, 180, 100, 10);
    assert!(!s.coordinator().quick_tap_detected());
    s.touch_up(2, 180, 100, 60);
    s.touch_up(1, 100, 100, 70);
    s.advance_to(1_000);

    assert_eq!(
        s.sink().commands(),
        &[
            ButtonDown(Left),
            ButtonDown(Right),
            ButtonDown(Left),
            ButtonUp(Right),
            ButtonUp(Left),
            ButtonUp(Left)
        ]
    );
}

#[test]
fn finger_that_outlives_lock_and_moves_does_not_click() {
    let mut s = session();
    s.touch_down(1, 100, 100, 0);
    s.touch_down(2, 600, 600, 10);
    s.touch_up(1, 100, 100, 20);
    s.advance_to(1_000);
    s.sink_mut().clear();

    s.touch_move(2, 650, 600, 1_010);
    s.touch_move(2, 800, 600, 1_020);
    assert!(s.context(2).unwrap().confirmed_move());
    s.touch_up(2, 800, 600, 1_030);
    s.advance_to(3_000);

    assert!(s.sink().commands().is_empty());
}

#[test]
fn third_finger_freezes_motion() {
    let mut s = session();
    s.touch_down(1, 100, 100, 0);
    s.touch_down(2, 400, 100, 10);
    s.touch_down(3, 700, 100, 20);
    s.touch_move(1, 100, 200, 30);
    s.touch_move(2, 400, 200, 30);
    s.touch_move(3, 700, 200, 30);

    assert!(s.sink().commands().is_empty());
    assert!(!s.coordinator().is_scrolling());
    assert_eq!(s.context(1).unwrap().latest_touch(), (100, 100));
}

#[test]
fn lock_follows_first_finger_and_clears_on_up() {
    let mut s = session();
    s.touch_down(7, 0, 0, 0);
    s.touch_down(8, 400, 0, 10);
    assert_eq!(s.coordinator().locked_pointer(), Some(7));

    s.touch_up(8, 400, 0, 20);
    assert_eq!(s.coordinator().locked_pointer(), Some(7));

    s.touch_move(7, 40, 0, 30);
    assert!(s.coordinator().locked_pointer_moved());
    s.touch_up(7, 40, 0, 40);
    assert_eq!(s.coordinator().locked_pointer(), None);
    assert!(!s.coordinator().locked_pointer_moved());
}

#[test]
fn lock_clears_on_cancel() {
    let mut s = session();
    s.touch_down(7, 0, 0, 0);
    s.touch_move(7, 40, 0, 30);
    s.touch_cancel(7);
    assert_eq!(s.coordinator().locked_pointer(), None);
    assert!(!s.coordinator().locked_pointer_moved());
}

#[test]
fn new_gesture_after_scroll_moves_again() {
    let mut s = session();
    s.touch_down(1, 100, 100, 0);
    s.touch_down(2, 400, 100, 10);
    s.touch_move(1, 100, 120, 20);
    s.touch_up(2, 400, 100, 30);
    s.touch_up(1, 100, 120, 40);
    s.sink_mut().clear();

    s.touch_down(3, 100, 100, 1_000);
    assert!(!s.coordinator().is_scrolling());
    s.touch_move(3, 130, 100, 1_010);
    assert_eq!(s.sink().commands(), &[Move { dx: 30, dy: 0 }]);
}

#[test]
fn small_deltas_accumulate_until_they_scale_to_non_zero() {
    // Reference 1920 over 9600 px gives 0.2.
    let mut s =
        TouchSession::new(Config::default(), RecordingSink::new()).with_surface(9_600, 1_080);
    s.touch_down(1, 1_000, 500, 0);
    s.touch_move(1, 1_001, 500, 10);
    s.touch_move(1, 1_002, 500, 20);
    assert_eq!(s.context(1).unwrap().latest_touch(), (1_000, 500));

    s.touch_move(1, 1_003, 500, 30);
    assert_eq!(s.context(1).unwrap().latest_touch(), (1_003, 500));
    assert_eq!(s.sink().commands().last(), Some(&Move { dx: 1, dy: 0 }));
}

#[test]
fn absolute_mode_reports_surface_size() {
    let config = Config {
        absolute_mouse_mode: true,
        ..Config::default()
    };
    let mut s = TouchSession::new(config, RecordingSink::new()).with_surface(1920, 1080);
    s.touch_down(1, 0, 0, 0);
    s.touch_move(1, 10, 20, 10);
    assert_eq!(
        s.sink().commands(),
        &[SinkCommand::MoveAsPosition {
            dx: 10,
            dy: 20,
            width: 1920,
            height: 1080
        }]
    );
}

#[test]
fn hold_starts_drag_when_enabled() {
    let config = Config {
        drag_hold_ms: Some(650),
        ..Config::default()
    };
    let mut s = TouchSession::new(config, RecordingSink::new()).with_surface(1920, 1080);
    s.touch_down(1, 200, 200, 0);
    s.advance_to(649);
    assert!(s.sink().commands().is_empty());
    s.advance_to(650);
    assert!(s.context(1).unwrap().confirmed_drag());
    assert!(s.sink().is_held(Left));

    s.touch_move(1, 260, 200, 700);
    s.touch_up(1, 260, 200, 800);
    s.advance_to(2_000);
    assert_eq!(
        s.sink().commands(),
        &[ButtonDown(Left), Move { dx: 60, dy: 0 }, ButtonUp(Left)]
    );
}

#[test]
fn hold_then_cancel_releases_drag_button() {
    let config = Config {
        drag_hold_ms: Some(650),
        ..Config::default()
    };
    let mut s = TouchSession::new(config, RecordingSink::new()).with_surface(1920, 1080);
    s.touch_down(1, 200, 200, 0);
    s.advance_to(650);
    assert!(s.sink().is_held(Left));

    s.touch_cancel(1);
    s.advance_to(5_000);
    assert_eq!(s.sink().commands(), &[ButtonDown(Left), ButtonUp(Left)]);
    assert_eq!(s.coordinator().locked_pointer(), None);
    assert_eq!(s.next_deadline(), None);
}

#[test]
fn lifted_finger_drag_timer_is_harmless() {
    let config = Config {
        drag_hold_ms: Some(650),
        ..Config::default()
    };
    let mut s = TouchSession::new(config, RecordingSink::new()).with_surface(1920, 1080);
    s.touch_down(1, 200, 200, 0);
    s.touch_up(1, 200, 200, 100);
    s.advance_to(5_000);
    assert_eq!(s.sink().commands(), &[ButtonDown(Left), ButtonUp(Left)]);
}

#[test]
fn sessions_are_isolated() {
    let mut a = session();
    let mut b = session();
    a.touch_down(1, 0, 0, 0);
    a.touch_up(1, 0, 0, 10);
    b.touch_down(1, 0, 0, 100);
    assert!(!b.coordinator().quick_tap_detected());
    assert_eq!(b.coordinator().locked_pointer(), Some(1));
    assert_eq!(a.coordinator().locked_pointer(), None);
}

#[test]
fn session_drives_a_borrowed_sink() {
    let mut sink = RecordingSink::new();
    {
        let mut s = TouchSession::new(Config::default(), &mut sink).with_surface(1920, 1080);
        s.touch_down(1, 0, 0, 0);
        s.touch_move(1, 5, 5, 10);
    }
    assert_eq!(sink.commands(), &[Move { dx: 5, dy: 5 }]);
}
