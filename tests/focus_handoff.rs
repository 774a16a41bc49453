use padnav::controller::{Action, DeviceSnapshot};
use padnav::dispatch::{Consumer, ConsumerOptions, KeyBindings, KeyChannel, KeyPress};
use padnav::focus::{FocusRouter, GridCursor, NavOutcome, Zone};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

type Log = Rc<RefCell<Vec<(&'static str, Action)>>>;

/// Library grid, sidebar list and a confirmation dialog sharing one router
struct Launcher {
    router: FocusRouter,
    consumers: Vec<Consumer>,
    log: Log,
    now: u64,
}

impl Launcher {
    fn new(sidebar_first: bool) -> Self {
        let router = FocusRouter::launcher();
        let log: Log = Rc::default();

        let library = {
            let (router, log) = (router.clone(), log.clone());
            let mut grid = GridCursor::new(10, 4);
            Consumer::new(
                ConsumerOptions::labeled("library"),
                router.gate(Zone::Library),
                move |action: Action| {
                    log.borrow_mut().push(("library", action));
                    match grid.apply(action) {
                        NavOutcome::Edge(direction) => {
                            router.hand_off(Zone::Library, direction);
                        }
                        NavOutcome::Pass(Action::A) => router.open_overlay(Zone::Dialog),
                        _ => {}
                    }
                },
            )
        };
        let sidebar = {
            let (router, log) = (router.clone(), log.clone());
            let mut list = GridCursor::list(4);
            Consumer::new(
                ConsumerOptions::labeled("sidebar"),
                router.gate(Zone::Sidebar),
                move |action: Action| {
                    log.borrow_mut().push(("sidebar", action));
                    if let NavOutcome::Edge(direction) = list.apply(action) {
                        router.hand_off(Zone::Sidebar, direction);
                    }
                },
            )
        };
        let dialog = {
            let (router, log) = (router.clone(), log.clone());
            Consumer::new(
                ConsumerOptions::labeled("dialog"),
                router.gate(Zone::Dialog),
                move |action: Action| {
                    log.borrow_mut().push(("dialog", action));
                    if matches!(action, Action::A | Action::B) {
                        router.close_overlay();
                    }
                },
            )
        };

        let consumers = if sidebar_first {
            vec![sidebar, library, dialog]
        } else {
            vec![library, sidebar, dialog]
        };
        let mut launcher = Self {
            router,
            consumers,
            log,
            now: 0,
        };
        launcher.frame(None);
        launcher
    }

    /// Advances one 16ms frame with `held` down on a single pad
    fn frame(&mut self, held: Option<usize>) {
        let pad = DeviceSnapshot::idle(17);
        let devices = vec![Some(match held {
            Some(index) => pad.with_button(index, true),
            None => pad,
        })];
        self.now += 16;
        for consumer in &mut self.consumers {
            consumer.tick(Duration::from_millis(self.now), &devices);
        }
    }

    fn hold(&mut self, button: usize, millis: u64) {
        for _ in 0..millis / 16 {
            self.frame(Some(button));
        }
    }

    fn tap(&mut self, button: usize) {
        self.frame(Some(button));
        self.frame(None);
    }

    fn key(&mut self, press: &KeyPress) {
        for consumer in &mut self.consumers {
            consumer.on_key(press);
        }
    }

    fn entries(&self) -> Vec<(&'static str, Action)> {
        self.log.borrow().clone()
    }
}

const UP: usize = 12;
const DOWN: usize = 13;
const LEFT: usize = 14;
const RIGHT: usize = 15;
const A: usize = 0;
const B: usize = 1;

fn button_for(action: Action) -> usize {
    match action {
        Action::Up => UP,
        Action::Down => DOWN,
        Action::Left => LEFT,
        Action::Right => RIGHT,
        Action::A => A,
        Action::B => B,
        Action::Lb => 4,
        Action::Rb => 5,
    }
}

fn check_transfer_mid_hold(sidebar_first: bool) {
    let mut launcher = Launcher::new(sidebar_first);

    // Left at column 0 hands the library over to the sidebar
    launcher.hold(LEFT, 1_500);
    assert_eq!(launcher.router.owner(), Zone::Sidebar);
    assert_eq!(launcher.entries(), vec![("library", Action::Left)]);

    launcher.frame(None);
    launcher.hold(RIGHT, 1_000);
    assert_eq!(launcher.router.owner(), Zone::Library);
    assert_eq!(
        launcher.entries(),
        vec![("library", Action::Left), ("sidebar", Action::Right)]
    );

    // A fresh press reaches the library again
    launcher.frame(None);
    launcher.tap(RIGHT);
    assert_eq!(launcher.entries().last(), Some(&("library", Action::Right)));
}

#[test]
fn zone_transfer_mid_hold_library_ticks_first() {
    check_transfer_mid_hold(false);
}

#[test]
fn zone_transfer_mid_hold_sidebar_ticks_first() {
    check_transfer_mid_hold(true);
}

#[test]
fn confirming_a_dialog_does_not_retrigger_the_grid() {
    let mut launcher = Launcher::new(false);

    launcher.frame(Some(A));
    assert_eq!(launcher.router.owner(), Zone::Dialog);
    // A still down while the dialog takes over
    launcher.hold(A, 800);
    launcher.frame(None);

    // Confirming hands back to the grid, which must ignore the same hold
    launcher.hold(A, 800);
    assert_eq!(launcher.router.owner(), Zone::Library);

    assert_eq!(
        launcher.entries(),
        vec![("library", Action::A), ("dialog", Action::A)]
    );
}

const SESSION: [Action; 11] = [
    Action::Right,
    Action::Right,
    Action::Left,
    Action::Left,
    Action::Left,
    Action::Down,
    Action::Down,
    Action::A,
    Action::Right,
    Action::A,
    Action::B,
];

fn expected_session() -> Vec<(&'static str, Action)> {
    vec![
        ("library", Action::Right),
        ("library", Action::Right),
        ("library", Action::Left),
        ("library", Action::Left),
        ("library", Action::Left),
        ("sidebar", Action::Down),
        ("sidebar", Action::Down),
        ("sidebar", Action::A),
        ("sidebar", Action::Right),
        ("library", Action::A),
        ("dialog", Action::B),
    ]
}

#[test]
fn gamepad_and_keys_produce_the_same_actions() {
    let mut pad = Launcher::new(false);
    for action in SESSION {
        pad.tap(button_for(action));
    }

    let mut keyboard = Launcher::new(false);
    let channel = KeyChannel::new(KeyBindings::default());
    for action in SESSION {
        let press = channel.press(action);
        keyboard.key(&press);
        assert!(press.is_claimed(), "{} went unhandled", action);
    }

    assert_eq!(pad.entries(), expected_session());
    assert_eq!(keyboard.entries(), expected_session());
    assert_eq!(pad.router.owner(), keyboard.router.owner());
}

#[test]
fn key_press_is_handled_once_across_a_hand_off() {
    let mut launcher = Launcher::new(false);
    let press = KeyPress::new(Action::Left);
    launcher.key(&press);

    assert_eq!(launcher.router.owner(), Zone::Sidebar);
    assert_eq!(launcher.entries(), vec![("library", Action::Left)]);
}
