//! Test harness: recording actuator, channel encoder and a fake IIO tree.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::actuator::Actuator;
use crate::channel::ChannelDescriptor;
use crate::error::ActuatorError;
use crate::state::{Orientation, Posture};

/// One recorded actuator invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorCall {
    Posture(Posture),
    Orientation(Orientation),
}

/// Actuator that records every call, optionally failing each one.
#[derive(Debug, Default)]
pub struct RecordingActuator {
    calls: Mutex<Vec<ActuatorCall>>,
    fail: bool,
}

impl RecordingActuator {
    /// Records calls and reports failure for each of them.
    pub fn failing() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn calls(&self) -> Vec<ActuatorCall> {
        self.calls.lock().clone()
    }

    fn record(&self, call: ActuatorCall) -> Result<(), ActuatorError> {
        self.calls.lock().push(call);
        if self.fail {
            Err(ActuatorError(format!("{:?} rejected", call)))
        } else {
            Ok(())
        }
    }
}

impl Actuator for RecordingActuator {
    fn apply_posture(&self, posture: Posture) -> Result<(), ActuatorError> {
        self.record(ActuatorCall::Posture(posture))
    }

    fn apply_orientation(&self, orientation: Orientation) -> Result<(), ActuatorError> {
        self.record(ActuatorCall::Orientation(orientation))
    }
}

/// Encode `value` into a storage word the way the kernel would.
///
/// The low `bits_used` bits of `value` are shifted left by `shift` and
/// written in the descriptor's byte order.
pub fn encode_channel(descriptor: &ChannelDescriptor, value: i64) -> Vec<u8> {
    let mask = if descriptor.bits_used == 64 {
        u64::MAX
    } else {
        (1u64 << descriptor.bits_used) - 1
    };
    let raw = ((value as u64) & mask) << descriptor.shift;
    let bytes = raw.to_le_bytes();
    let mut word = bytes[..descriptor.storage_bytes as usize].to_vec();
    if descriptor.big_endian {
        word.reverse();
    }
    word
}

/// A fake `/sys/bus/iio/devices` + `/dev` pair rooted in a scratch directory.
///
/// The data node is a regular file: it always polls readable and reads
/// return whatever was appended with [`FakeIio::push`].
#[derive(Debug, Clone)]
pub struct FakeIio {
    pub sysfs_root: PathBuf,
    pub dev_root: PathBuf,
    pub device_dir: PathBuf,
    pub dev_node: PathBuf,
}

/// Builder for [`FakeIio`].
#[derive(Debug, Clone)]
pub struct FakeIioBuilder {
    name: String,
    number: u32,
    channels: Vec<(String, String, String)>,
    trigger: bool,
}

impl FakeIio {
    pub fn builder(name: &str) -> FakeIioBuilder {
        FakeIioBuilder {
            name: name.to_string(),
            number: 0,
            channels: Vec::new(),
            trigger: true,
        }
    }

    /// Read a control attribute relative to the device directory.
    pub fn attr(&self, rel: &str) -> String {
        fs::read_to_string(self.device_dir.join(rel))
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default()
    }

    /// Append raw scan bytes to the data node.
    pub fn push(&self, bytes: &[u8]) -> io::Result<()> {
        let mut file = fs::OpenOptions::new().append(true).open(&self.dev_node)?;
        file.write_all(bytes)
    }
}

impl FakeIioBuilder {
    pub fn number(mut self, number: u32) -> Self {
        self.number = number;
        self
    }

    pub fn channel(mut self, id: &str, index: impl ToString, descriptor: &str) -> Self {
        self.channels
            .push((id.to_string(), index.to_string(), descriptor.to_string()));
        self
    }

    /// X/Y/Z as `le:s16/32>>0` plus a 64-bit timestamp.
    pub fn accelerometer(self) -> Self {
        self.channel("in_accel_x", 0, "le:s16/32>>0")
            .channel("in_accel_y", 1, "le:s16/32>>0")
            .channel("in_accel_z", 2, "le:s16/32>>0")
            .channel("in_timestamp", 3, "le:s64/64>>0")
    }

    pub fn without_trigger(mut self) -> Self {
        self.trigger = false;
        self
    }

    pub fn create(self, root: &Path) -> io::Result<FakeIio> {
        let sysfs_root = root.join("sys");
        let dev_root = root.join("dev");
        let device = format!("iio:device{}", self.number);
        let device_dir = sysfs_root.join(&device);
        let scan_dir = device_dir.join("scan_elements");
        fs::create_dir_all(&scan_dir)?;
        fs::create_dir_all(device_dir.join("buffer"))?;
        fs::create_dir_all(&dev_root)?;

        fs::write(device_dir.join("name"), format!("{}\n", self.name))?;
        fs::write(device_dir.join("buffer/length"), "2\n")?;
        fs::write(device_dir.join("buffer/enable"), "0\n")?;
        if self.trigger {
            fs::create_dir_all(device_dir.join("trigger"))?;
            fs::write(device_dir.join("trigger/current_trigger"), "\n")?;
        }
        for (id, index, descriptor) in &self.channels {
            fs::write(scan_dir.join(format!("{id}_en")), "0\n")?;
            fs::write(scan_dir.join(format!("{id}_index")), format!("{index}\n"))?;
            fs::write(scan_dir.join(format!("{id}_type")), format!("{descriptor}\n"))?;
        }

        let dev_node = dev_root.join(&device);
        fs::write(&dev_node, b"")?;
        Ok(FakeIio {
            sysfs_root,
            dev_root,
            device_dir,
            dev_node,
        })
    }
}
