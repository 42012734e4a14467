// OS counter source: link state and cumulative rx/tx byte counters per
// interface, read from sysfs on Linux.

use crate::models::DeviceStats;
use std::path::{Path, PathBuf};

/// Loopback is never monitored.
const LOOPBACK: &str = "lo";

/// Platform boundary for interface enumeration and counter reads.
///
/// No method can fail observably: enumeration problems yield an empty list
/// and unreadable counters yield the `u64::MAX` sentinel, so a transient
/// read miss never interrupts the sampling loop.
pub trait CounterSource {
    /// Every interface currently up, excluding loopback, sorted ascending
    /// by name (bytewise). Empty when the enumeration mechanism is
    /// unavailable; that simply means no auto-discovered devices this tick.
    fn enumerate_up_devices(&self) -> Vec<String>;

    /// Point-in-time read of one interface's link state and counters.
    fn read_counters(&self, name: &str) -> DeviceStats;
}

/// Linux implementation over `/sys/class/net`.
///
/// An interface is up iff `<root>/<name>/operstate` reads exactly `"up\n"`;
/// counters come from `<root>/<name>/statistics/{rx_bytes,tx_bytes}` as
/// decimal text. The root is injectable so tests can stage a fake sysfs
/// tree in a temporary directory.
pub struct SysfsCounterRepo {
    root: PathBuf,
}

impl Default for SysfsCounterRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl SysfsCounterRepo {
    pub fn new() -> Self {
        Self::with_root("/sys/class/net")
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn device_is_up(&self, name: &str) -> bool {
        match std::fs::read_to_string(self.root.join(name).join("operstate")) {
            Ok(contents) => contents == "up\n",
            Err(_) => false,
        }
    }

    fn read_u64_counter(&self, path: &Path) -> u64 {
        let Ok(contents) = std::fs::read_to_string(path) else {
            tracing::debug!(path = %path.display(), "counter unreadable, substituting sentinel");
            return u64::MAX;
        };
        contents.trim().parse().unwrap_or(0)
    }
}

impl CounterSource for SysfsCounterRepo {
    fn enumerate_up_devices(&self) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(&self.root) else {
            tracing::debug!(root = %self.root.display(), "interface enumeration unavailable");
            return Vec::new();
        };

        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| name != LOOPBACK)
            .filter(|name| self.device_is_up(name))
            .collect();
        names.sort();
        names
    }

    fn read_counters(&self, name: &str) -> DeviceStats {
        let statistics = self.root.join(name).join("statistics");
        DeviceStats {
            is_up: self.device_is_up(name),
            rx_bytes: self.read_u64_counter(&statistics.join("rx_bytes")),
            tx_bytes: self.read_u64_counter(&statistics.join("tx_bytes")),
        }
    }
}
