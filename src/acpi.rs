//! Posture events from the `acpid` notification socket.
//!
//! `acpid` broadcasts one event per line as four whitespace separated
//! fields: `module source code state`, e.g.
//! `video/tabletmode TBLT 0000008A 00000001`. Only the tablet-mode switch is
//! of interest; everything else is skipped.
//!
//! The connection is not re-established when it fails or the daemon closes
//! it. The event sequence simply ends.

use std::io::{BufRead, BufReader, Read};
use std::os::unix::net::UnixStream;
use std::path::Path;

use crate::actuator::Actuator;
use crate::config::Config;
use crate::coordinator::Coordinator;
use crate::error::{Error, Result};
use crate::state::Posture;

/// One ACPI event record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcpiEvent {
    pub module: String,
    pub source: String,
    pub code: String,
    pub state: String,
}

impl AcpiEvent {
    /// Parse a record; `None` unless it has exactly four fields.
    pub fn parse(line: &str) -> Option<Self> {
        let mut fields = line.split_whitespace();
        let event = Self {
            module: fields.next()?.to_string(),
            source: fields.next()?.to_string(),
            code: fields.next()?.to_string(),
            state: fields.next()?.to_string(),
        };
        match fields.next() {
            Some(_) => None,
            None => Some(event),
        }
    }
}

/// Selects tablet-mode switch events and maps their state to a posture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostureFilter {
    module: String,
    source: String,
    tablet_state: String,
}

impl PostureFilter {
    pub fn new(
        module: impl Into<String>,
        source: impl Into<String>,
        tablet_state: impl Into<String>,
    ) -> Self {
        Self {
            module: module.into(),
            source: source.into(),
            tablet_state: tablet_state.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.tablet_module,
            &config.tablet_source,
            &config.tablet_state,
        )
    }

    pub fn posture(&self, event: &AcpiEvent) -> Option<Posture> {
        if event.module != self.module || event.source != self.source {
            return None;
        }
        if event.state == self.tablet_state {
            Some(Posture::Tablet)
        } else {
            Some(Posture::Laptop)
        }
    }
}

impl Default for PostureFilter {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Lazy sequence of posture changes read from an event stream.
///
/// Ends at EOF. Records that are not UTF-8 are skipped. Read errors are
/// yielded once and end the sequence.
pub struct PostureEvents<R> {
    reader: BufReader<R>,
    filter: PostureFilter,
    line: Vec<u8>,
    done: bool,
}

impl<R: Read> PostureEvents<R> {
    pub fn new(stream: R, filter: PostureFilter) -> Self {
        Self {
            reader: BufReader::new(stream),
            filter,
            line: Vec::new(),
            done: false,
        }
    }
}

impl<R: Read> Iterator for PostureEvents<R> {
    type Item = Result<Posture>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            self.line.clear();
            match self.reader.read_until(b'\n', &mut self.line) {
                Ok(0) => self.done = true,
                Ok(_) => {
                    let Ok(line) = std::str::from_utf8(&self.line) else {
                        log::debug!(
                            "skipping non-utf8 acpi record {:?}",
                            String::from_utf8_lossy(&self.line).trim_end()
                        );
                        continue;
                    };
                    if line.trim().is_empty() {
                        continue;
                    }
                    let Some(event) = AcpiEvent::parse(line) else {
                        log::debug!("skipping malformed acpi record {:?}", line.trim_end());
                        continue;
                    };
                    match self.filter.posture(&event) {
                        Some(posture) => return Some(Ok(posture)),
                        None => log::debug!("ignoring acpi event {} {}", event.module, event.source),
                    }
                }
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
                Err(e) => {
                    self.done = true;
                    return Some(Err(e.into()));
                }
            }
        }
        None
    }
}

/// Connect to the notification socket.
pub fn connect(path: &Path) -> Result<UnixStream> {
    UnixStream::connect(path).map_err(|source| Error::ConnectionFailed {
        path: path.to_path_buf(),
        source,
    })
}

/// Feed every posture event into the coordinator until the stream ends.
pub fn drive<R: Read, A: Actuator>(
    events: PostureEvents<R>,
    coordinator: &Coordinator<A>,
) -> Result<()> {
    for posture in events {
        coordinator.set_posture(posture?);
    }
    log::info!("acpi event stream closed");
    Ok(())
}
