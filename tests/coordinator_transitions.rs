use modeswitch::harness::{ActuatorCall, RecordingActuator};
use modeswitch::menu::{Menu, MenuAction};
use modeswitch::{Coordinator, DeviceState, Orientation, Posture};

#[test]
fn orientation_is_ignored_in_laptop() {
    let c = Coordinator::new(RecordingActuator::default());
    assert_eq!(c.state(), DeviceState::default());
    c.set_orientation(Orientation::Left);
    assert_eq!(c.state().orientation, Orientation::Normal);
}

#[test]
fn laptop_resets_orientation_once() {
    let c = Coordinator::new(RecordingActuator::default());
    c.set_posture(Posture::Tablet);
    c.set_orientation(Orientation::Left);
    assert_eq!(
        c.state(),
        DeviceState {
            posture: Posture::Tablet,
            orientation: Orientation::Left
        }
    );

    c.set_posture(Posture::Laptop);
    assert_eq!(
        c.state(),
        DeviceState {
            posture: Posture::Laptop,
            orientation: Orientation::Normal
        }
    );
    let resets = c
        .actuator()
        .calls()
        .iter()
        .filter(|call| **call == ActuatorCall::Orientation(Orientation::Normal))
        .count();
    assert_eq!(resets, 1);
}

#[test]
fn repeated_tablet_posture_actuates_once() {
    let c = Coordinator::new(RecordingActuator::default());
    c.set_posture(Posture::Tablet);
    c.set_posture(Posture::Tablet);
    assert_eq!(c.actuator().calls(), vec![ActuatorCall::Posture(Posture::Tablet)]);
}

#[test]
fn repeated_orientation_actuates_once() {
    let c = Coordinator::new(RecordingActuator::default());
    c.set_posture(Posture::Tablet);
    assert!(c.set_orientation(Orientation::Right));
    assert!(!c.set_orientation(Orientation::Right));
    assert!(!c.set_orientation(Orientation::Right));
    assert_eq!(
        c.actuator().calls(),
        vec![
            ActuatorCall::Posture(Posture::Tablet),
            ActuatorCall::Orientation(Orientation::Right)
        ]
    );
}

#[test]
fn orientation_persists_while_tablet_and_resets_on_return() {
    let c = Coordinator::new(RecordingActuator::default());
    c.set_posture(Posture::Tablet);
    c.set_orientation(Orientation::Inverted);
    c.set_posture(Posture::Laptop);
    c.set_posture(Posture::Tablet);
    // Re-entering tablet does not restore the previous rotation.
    assert_eq!(c.state().orientation, Orientation::Normal);
    assert_eq!(
        c.actuator().calls().last(),
        Some(&ActuatorCall::Posture(Posture::Tablet))
    );
}

#[test]
fn failing_actuator_does_not_block_transitions() {
    let c = Coordinator::new(RecordingActuator::failing());
    for _ in 0..3 {
        assert!(c.set_posture(Posture::Tablet));
        assert!(c.set_orientation(Orientation::Left));
        assert!(c.set_posture(Posture::Laptop));
    }
    assert_eq!(c.state(), DeviceState::default());
    assert_eq!(c.actuator().calls().len(), 12);
}

#[test]
fn menu_overrides_share_the_same_rules() {
    let menu = Menu::standard();
    let c = Coordinator::new(RecordingActuator::default());
    let laptop = menu.entry_for(MenuAction::SetPosture(Posture::Laptop)).unwrap();
    let top = menu
        .entry_for(MenuAction::SetOrientation(Orientation::Inverted))
        .unwrap();

    assert!(!menu.activate(laptop, &c));
    assert!(!menu.activate(top, &c));
    assert!(c.actuator().calls().is_empty());
    assert_eq!(menu.checked(&c.state()).len(), 2);
}
