use modeswitch::channel::ChannelDescriptor;
use modeswitch::harness::{FakeIio, RecordingActuator};
use modeswitch::invariant_ppt::{
    contract_test, BUFFER_DISARMED, DESCRIPTOR_FITS_STORAGE, LAPTOP_RESETS_ORIENTATION,
    LAYOUT_ALIGNED, LAYOUT_MONOTONIC, ORIENTATION_REQUIRES_TABLET, RECORD_COVERS_LAYOUT,
};
use modeswitch::iio::IioDevice;
use modeswitch::layout::ScanLayout;
use modeswitch::{Coordinator, Orientation, Posture};

#[test]
fn decode_pipeline_enforces_layout_invariants() {
    let layout = ScanLayout::compute([
        (0, ChannelDescriptor::parse("a", "le:u16/16>>0").unwrap()),
        (1, ChannelDescriptor::parse("b", "be:s32/32>>0").unwrap()),
    ])
    .unwrap();
    layout.decode(&vec![0u8; layout.record_size]).unwrap();

    contract_test(
        "decode pipeline",
        &[
            DESCRIPTOR_FITS_STORAGE,
            LAYOUT_ALIGNED,
            LAYOUT_MONOTONIC,
            RECORD_COVERS_LAYOUT,
        ],
    );
}

#[test]
fn coordinator_enforces_state_invariants() {
    let c = Coordinator::new(RecordingActuator::default());
    c.set_posture(Posture::Tablet);
    c.set_orientation(Orientation::Right);
    c.set_posture(Posture::Laptop);

    contract_test(
        "coordinator",
        &[LAPTOP_RESETS_ORIENTATION, ORIENTATION_REQUIRES_TABLET],
    );
}

#[test]
fn buffer_guard_records_release() {
    let root = tempfile::tempdir().unwrap();
    let fake = FakeIio::builder("accel_3d")
        .accelerometer()
        .create(root.path())
        .unwrap();
    let device = IioDevice::find(&fake.sysfs_root, &fake.dev_root, "accel_3d").unwrap();
    drop(device.arm(2, None).unwrap());

    contract_test("buffer guard", &[BUFFER_DISARMED]);
}
