use padnav::controller::{Action, DeviceSnapshot};
use padnav::dispatch::{Consumer, ConsumerOptions};
use proptest::prelude::*;
use std::time::Duration;

/// Button index for each action in the default profile
fn button_for(action: Action) -> usize {
    match action {
        Action::A => 0,
        Action::B => 1,
        Action::Lb => 4,
        Action::Rb => 5,
        Action::Up => 12,
        Action::Down => 13,
        Action::Left => 14,
        Action::Right => 15,
    }
}

fn frame(held: Option<Action>) -> Vec<Option<DeviceSnapshot>> {
    let pad = DeviceSnapshot::idle(17);
    vec![Some(match held {
        Some(action) => pad.with_button(button_for(action), true),
        None => pad,
    })]
}

fn any_action() -> impl Strategy<Value = Action> {
    prop::sample::select(Action::ALL.to_vec())
}

proptest! {
    #[test]
    fn continuous_hold_follows_repeat_schedule(
        action in any_action(),
        start in 1u64..500,
        gaps in prop::collection::vec(1u64..60, 1..120),
        trailing in prop::collection::vec(1u64..60, 0..20),
    ) {
        let mut consumer = Consumer::new(ConsumerOptions::labeled("prop"), true, |_: Action| {});
        consumer.tick(Duration::ZERO, &frame(None));

        let mut now = start;
        let mut fires = Vec::new();
        if consumer.tick(Duration::from_millis(now), &frame(Some(action))) > 0 {
            fires.push(now);
        }
        for gap in &gaps {
            now += gap;
            if consumer.tick(Duration::from_millis(now), &frame(Some(action))) > 0 {
                fires.push(now);
            }
        }

        prop_assert_eq!(fires.first().copied(), Some(start));
        for fire in &fires[1..] {
            prop_assert!(fire - start > 400, "repeat at {} after press at {}", fire, start);
        }
        for pair in fires.windows(2) {
            prop_assert!(pair[1] - pair[0] >= 150, "fires {:?} too close", pair);
        }

        for gap in &trailing {
            now += gap;
            prop_assert_eq!(consumer.tick(Duration::from_millis(now), &frame(None)), 0);
        }
    }

    #[test]
    fn release_then_repress_always_fires(
        action in any_action(),
        hold in 1u64..1_000,
        pause in 1u64..40,
    ) {
        let mut consumer = Consumer::new(ConsumerOptions::labeled("prop"), true, |_: Action| {});
        consumer.tick(Duration::ZERO, &frame(None));

        prop_assert_eq!(consumer.tick(Duration::from_millis(1), &frame(Some(action))), 1);
        consumer.tick(Duration::from_millis(1 + hold), &frame(None));
        prop_assert_eq!(
            consumer.tick(Duration::from_millis(1 + hold + pause), &frame(Some(action))),
            1
        );
    }
}

#[test]
fn documented_schedule() {
    let mut consumer = Consumer::new(ConsumerOptions::labeled("schedule"), true, |_: Action| {});
    consumer.tick(Duration::ZERO, &frame(None));

    // press lands on the same tick as t=0 in the schedule below
    let expected = [(0, 1), (399, 0), (401, 1), (550, 0), (551, 1)];
    let base = 1_000;
    for (offset, fired) in expected {
        assert_eq!(
            consumer.tick(Duration::from_millis(base + offset), &frame(Some(Action::Right))),
            fired,
            "t={}",
            offset
        );
    }
}

#[test]
fn disable_then_reenable_scenario() {
    use std::cell::Cell;
    use std::rc::Rc;

    let enabled = Rc::new(Cell::new(true));
    let gate = enabled.clone();
    let fires = Rc::new(Cell::new(0));
    let sink = fires.clone();

    let mut consumer = Consumer::new(
        ConsumerOptions::labeled("scenario"),
        padnav::dispatch::EnableGate::from_fn(move || gate.get()),
        move |_: Action| sink.set(sink.get() + 1),
    );
    let held = frame(Some(Action::A));
    let released = frame(None);

    // Prime with nothing held so the t=0 press is a real press
    consumer.prime(&released);
    let mut t = 0;
    while t < 950 {
        if t == 100 {
            enabled.set(false);
        }
        if t == 900 {
            enabled.set(true);
            fires.set(0);
        }
        consumer.tick(Duration::from_millis(t), &held);
        t += 10;
    }
    assert_eq!(fires.get(), 0, "no fires between re-enable and release");

    consumer.tick(Duration::from_millis(950), &released);
    consumer.tick(Duration::from_millis(1_000), &held);
    assert_eq!(fires.get(), 1);
    consumer.tick(Duration::from_millis(1_010), &held);
    assert_eq!(fires.get(), 1);
}

#[test]
fn two_pads_repeat_independently() {
    let mut consumer = Consumer::new(ConsumerOptions::labeled("pads"), true, |_: Action| {});
    let idle = DeviceSnapshot::idle(17);
    let down = idle.clone().with_button(13, true);
    consumer.tick(Duration::ZERO, &[Some(idle.clone()), Some(idle.clone())]);

    assert_eq!(
        consumer.tick(Duration::from_millis(10), &[Some(down.clone()), Some(idle.clone())]),
        1
    );
    assert_eq!(
        consumer.tick(Duration::from_millis(300), &[Some(down.clone()), Some(down.clone())]),
        1
    );
    // device 0 past its delay, device 1 still within it
    assert_eq!(
        consumer.tick(Duration::from_millis(420), &[Some(down.clone()), Some(down.clone())]),
        1
    );
    // device 1 crosses its own delay
    assert_eq!(
        consumer.tick(Duration::from_millis(701), &[Some(down.clone()), Some(down)]),
        2
    );
}
