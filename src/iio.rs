//! Accelerometer polling through the IIO buffered interface.
//!
//! Setup walks `<sysfs_root>/iio:deviceN` for the device whose `name`
//! matches, enables every scan element, computes the scan layout, sizes the
//! ring buffer, attaches the trigger and enables the buffer. Samples are then
//! read from `<dev_root>/iio:deviceN`.
//!
//! The buffer and trigger are released by [`BufferGuard`] on every exit path.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read};
use std::os::fd::AsFd;
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use nix::errno::Errno;
use nix::fcntl::OFlag;
use nix::poll::{poll, PollFd, PollFlags, PollTimeout};

use crate::actuator::Actuator;
use crate::channel::ChannelDescriptor;
use crate::classify::Classifier;
use crate::config::Config;
use crate::coordinator::Coordinator;
use crate::error::{Error, Result};
use crate::invariant_ppt::{record_invariant, BUFFER_DISARMED};
use crate::layout::ScanLayout;

const DEVICE_PREFIX: &str = "iio:device";

/// A located IIO device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IioDevice {
    pub name: String,
    pub number: u32,
    /// Control directory under sysfs.
    pub sysfs_dir: PathBuf,
    /// Character device delivering buffered scans.
    pub dev_node: PathBuf,
}

impl IioDevice {
    /// Find the device whose `name` attribute equals `name`.
    ///
    /// When several match, the lowest device number wins.
    pub fn find(sysfs_root: &Path, dev_root: &Path, name: &str) -> Result<Self> {
        let entries = fs::read_dir(sysfs_root).map_err(|source| Error::Sysfs {
            path: sysfs_root.to_path_buf(),
            source,
        })?;

        let mut candidates: Vec<(u32, PathBuf)> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let file_name = entry.file_name();
                let number = file_name.to_str()?.strip_prefix(DEVICE_PREFIX)?.parse().ok()?;
                Some((number, entry.path()))
            })
            .collect();
        candidates.sort();

        for (number, sysfs_dir) in candidates {
            match read_attr(&sysfs_dir.join("name")) {
                Ok(found) if found == name => {
                    let dev_node = dev_root.join(format!("{DEVICE_PREFIX}{number}"));
                    log::info!("found {} at {}", name, sysfs_dir.display());
                    return Ok(Self {
                        name: name.to_string(),
                        number,
                        sysfs_dir,
                        dev_node,
                    });
                }
                Ok(_) => {}
                Err(e) => log::debug!("skipping {}: {}", sysfs_dir.display(), e),
            }
        }
        Err(Error::DeviceNotFound {
            name: name.to_string(),
        })
    }

    /// Enable every scan element and return `(index, descriptor)` pairs.
    pub fn enable_channels(&self) -> Result<Vec<(u32, ChannelDescriptor)>> {
        let scan_dir = self.sysfs_dir.join("scan_elements");
        let entries = fs::read_dir(&scan_dir).map_err(|source| Error::Sysfs {
            path: scan_dir.clone(),
            source,
        })?;

        let mut ids: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                entry
                    .file_name()
                    .to_str()?
                    .strip_suffix("_en")
                    .map(str::to_string)
            })
            .collect();
        ids.sort();

        let mut channels = Vec::with_capacity(ids.len());
        for id in ids {
            write_attr(&scan_dir.join(format!("{id}_en")), "1")?;
            let index_path = scan_dir.join(format!("{id}_index"));
            let index_text = read_attr(&index_path)?;
            let index: u32 = index_text.parse().map_err(|_| Error::Sysfs {
                path: index_path.clone(),
                source: io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("scan index {index_text:?} is not a number"),
                ),
            })?;
            let descriptor = read_attr(&scan_dir.join(format!("{id}_type")))?;
            channels.push((index, ChannelDescriptor::parse(id, &descriptor)?));
        }
        Ok(channels)
    }

    /// Default trigger name for hid-sensor devices.
    pub fn default_trigger(&self) -> String {
        format!("{}-dev{}", self.name, self.number)
    }

    /// Size the ring buffer, attach the trigger and start streaming.
    ///
    /// `trigger` is only written when the device exposes a trigger
    /// attribute. The returned guard undoes both on drop.
    pub fn arm(&self, capacity: usize, trigger: Option<&str>) -> Result<BufferGuard> {
        write_attr(&self.sysfs_dir.join("buffer/length"), &capacity.to_string())?;

        let trigger_path = self.sysfs_dir.join("trigger/current_trigger");
        let trigger_path = if trigger_path.exists() {
            let name = trigger.map_or_else(|| self.default_trigger(), str::to_string);
            write_attr(&trigger_path, &name)?;
            Some(trigger_path)
        } else {
            None
        };

        let guard = BufferGuard {
            enable: self.sysfs_dir.join("buffer/enable"),
            trigger: trigger_path,
        };
        write_attr(&guard.enable, "1")?;
        log::info!("buffer armed: {} scans", capacity);
        Ok(guard)
    }
}

/// Disables the buffer and detaches the trigger when dropped.
#[derive(Debug)]
pub struct BufferGuard {
    enable: PathBuf,
    trigger: Option<PathBuf>,
}

impl BufferGuard {
    /// Disable the buffer and detach the trigger. Returns whether both
    /// writes succeeded.
    fn disarm(&self) -> bool {
        let mut clean = true;
        if let Err(e) = write_attr(&self.enable, "0") {
            log::error!("failed to disable buffer: {}", e);
            clean = false;
        }
        if let Some(trigger) = &self.trigger {
            if let Err(e) = write_attr(trigger, "\n") {
                log::error!("failed to detach trigger: {}", e);
                clean = false;
            }
        }
        clean
    }
}

impl Drop for BufferGuard {
    fn drop(&mut self) {
        if self.disarm() {
            record_invariant(BUFFER_DISARMED);
            log::info!("buffer disarmed");
        } else {
            log::warn!("buffer left armed at {}", self.enable.display());
        }
    }
}

/// Reads scans from an armed device and feeds orientations to the coordinator.
pub struct SensorPoller<A: Actuator> {
    layout: ScanLayout,
    classifier: Classifier,
    coordinator: Arc<Coordinator<A>>,
    data: File,
    buf: Vec<u8>,
    // Dropped after `data` is closed.
    _guard: BufferGuard,
}

impl<A: Actuator> SensorPoller<A> {
    /// Locate, configure and arm the accelerometer named in `config`.
    pub fn open(config: &Config, coordinator: Arc<Coordinator<A>>) -> Result<Self> {
        let device = IioDevice::find(&config.sysfs_root, &config.dev_root, &config.accel_name)?;
        let layout = ScanLayout::compute(device.enable_channels()?)?;
        layout.require(&config.x_channel)?;
        layout.require(&config.y_channel)?;
        log::info!(
            "scan layout: {} channels, {} bytes per record",
            layout.channels.len(),
            layout.record_size
        );

        let guard = device.arm(config.buffer_capacity, config.trigger.as_deref())?;
        let data = OpenOptions::new()
            .read(true)
            .custom_flags(OFlag::O_NONBLOCK.bits())
            .open(&device.dev_node)?;
        let buf = vec![0u8; layout.record_size * config.buffer_capacity.max(1)];

        Ok(Self {
            layout,
            classifier: config.classifier(),
            coordinator,
            data,
            buf,
            _guard: guard,
        })
    }

    pub fn layout(&self) -> &ScanLayout {
        &self.layout
    }

    /// Wait for data, read one batch and classify each record in order.
    ///
    /// Returns the number of records processed; zero when the wakeup carried
    /// no data.
    pub fn poll_once(&mut self) -> Result<usize> {
        {
            let mut fds = [PollFd::new(self.data.as_fd(), PollFlags::POLLIN)];
            match poll(&mut fds, PollTimeout::NONE) {
                Ok(_) => {}
                Err(Errno::EINTR) => {
                    log::debug!("sensor poll interrupted");
                    return Ok(0);
                }
                Err(e) => return Err(io::Error::from(e).into()),
            }
        }

        let n = match self.data.read(&mut self.buf) {
            Ok(0) => {
                log::warn!("sensor readable but returned no data");
                return Ok(0);
            }
            Ok(n) => n,
            Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted) => {
                log::debug!("sensor read returned no data: {}", e);
                return Ok(0);
            }
            Err(e) => return Err(e.into()),
        };

        let samples = self.layout.decode_all(&self.buf[..n])?;
        log::debug!("read {} records", samples.len());
        for sample in &samples {
            let posture = self.coordinator.state().posture;
            if let Some(orientation) = self.classifier.classify_sample(sample, posture) {
                self.coordinator.set_orientation(orientation);
            }
        }
        Ok(samples.len())
    }

    /// Poll forever. Only returns on error.
    pub fn run(mut self) -> Result<()> {
        loop {
            self.poll_once()?;
        }
    }
}

fn read_attr(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .map(|s| s.trim_end().to_string())
        .map_err(|source| Error::Sysfs {
            path: path.to_path_buf(),
            source,
        })
}

fn write_attr(path: &Path, value: &str) -> Result<()> {
    fs::write(path, value).map_err(|source| Error::Sysfs {
        path: path.to_path_buf(),
        source,
    })
}
