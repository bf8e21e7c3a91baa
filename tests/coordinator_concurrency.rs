use std::sync::Arc;
use std::thread;

use modeswitch::harness::{ActuatorCall, RecordingActuator};
use modeswitch::{Coordinator, DeviceState, Orientation, Posture};

/// Replay the actuator log and check every call was legal at the time.
fn replay(calls: &[ActuatorCall]) -> DeviceState {
    let mut model = DeviceState::default();
    let mut expect_reset = false;
    for call in calls {
        match *call {
            ActuatorCall::Posture(p) => {
                assert!(!expect_reset, "posture call between laptop and its reset");
                assert_ne!(p, model.posture, "no-op posture was actuated");
                model.posture = p;
                if p == Posture::Laptop {
                    model.orientation = Orientation::Normal;
                    expect_reset = true;
                }
            }
            ActuatorCall::Orientation(o) => {
                if expect_reset {
                    assert_eq!(o, Orientation::Normal);
                    expect_reset = false;
                } else {
                    assert_eq!(model.posture, Posture::Tablet, "rotation applied in laptop");
                    assert_ne!(o, model.orientation, "no-op rotation was actuated");
                    model.orientation = o;
                }
            }
        }
    }
    assert!(!expect_reset);
    model
}

#[test]
fn three_callers_never_tear_state() {
    let c = Arc::new(Coordinator::new(RecordingActuator::default()));

    let posture = {
        let c = Arc::clone(&c);
        thread::spawn(move || {
            for i in 0..2_000 {
                let p = if i % 3 == 0 { Posture::Laptop } else { Posture::Tablet };
                c.set_posture(p);
            }
        })
    };
    let sensor = {
        let c = Arc::clone(&c);
        thread::spawn(move || {
            for i in 0..5_000 {
                c.set_orientation(Orientation::ALL[i % 4]);
                let s = c.state();
                assert!(s.posture == Posture::Tablet || s.orientation == Orientation::Normal);
            }
        })
    };
    let menu = {
        let c = Arc::clone(&c);
        thread::spawn(move || {
            for i in 0..1_000 {
                if i % 2 == 0 {
                    c.set_orientation(Orientation::Inverted);
                } else {
                    c.set_posture(Posture::Tablet);
                }
            }
        })
    };

    posture.join().unwrap();
    sensor.join().unwrap();
    menu.join().unwrap();

    let calls = c.actuator().calls();
    assert!(!calls.is_empty());
    assert_eq!(replay(&calls), c.state());
}
