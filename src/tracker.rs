// Tracked-device set: auto-discovery reconciliation, per-tick updates,
// down-aging eviction, and the display-scale aggregation.

use crate::counter_repo::CounterSource;
use crate::format::format_bytes;
use crate::models::{Direction, GraphSnapshot};
use crate::netdev::NetworkDevice;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TrackerError {
    #[error("history capacity must be at least 1")]
    ZeroCapacity,
}

/// Merges the sorted list of live (up) interface names into the tracked set,
/// which is kept sorted by name in auto-discovery mode. New names are
/// inserted in order with zeroed history; tracked devices with no live
/// counterpart are left alone so they can age out via their down count
/// instead of losing history to a briefly-flapping link.
pub fn reconcile(
    mut devs: Vec<NetworkDevice>,
    live: &[String],
    hist_len: usize,
) -> Vec<NetworkDevice> {
    let mut i = 0;
    let mut j = 0;
    while i < live.len() && j < devs.len() {
        match live[i].as_str().cmp(devs[j].name.as_str()) {
            std::cmp::Ordering::Equal => {
                i += 1;
                j += 1;
            }
            std::cmp::Ordering::Less => {
                tracing::debug!(device = %live[i], "new interface appeared");
                devs.insert(j, NetworkDevice::new(&live[i], hist_len));
                i += 1;
                j += 1;
            }
            std::cmp::Ordering::Greater => {
                // Not up this tick; eviction is deferred to down-aging.
                j += 1;
            }
        }
    }
    for name in &live[i..] {
        tracing::debug!(device = %name, "new interface appeared");
        devs.push(NetworkDevice::new(name, hist_len));
    }
    devs
}

/// Splits a user-supplied device list on runs of comma, space, tab, or
/// newline, discarding empty tokens.
pub fn parse_dev_names(filter: &str) -> Vec<String> {
    filter
        .split([',', ' ', '\t', '\n'])
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Owns every monitored interface record and drives one sampling cycle per
/// `tick` call. Single-threaded by contract: the host must not overlap
/// ticks or reconfiguration calls (wrap the tracker in a mutex if it needs
/// multi-threaded access, as the worker does).
#[derive(Debug)]
pub struct DeviceTracker {
    devs: Vec<NetworkDevice>,
    hist_len: usize,
    /// `None` = auto-discovery mode (tracked set mirrors all up interfaces).
    dev_names: Option<Vec<String>>,
    min_scale: u64,
    scale: u64,
}

impl DeviceTracker {
    pub fn new(hist_len: usize, min_scale: u64) -> Result<Self, TrackerError> {
        if hist_len == 0 {
            return Err(TrackerError::ZeroCapacity);
        }
        Ok(Self {
            devs: Vec::new(),
            hist_len,
            dev_names: None,
            min_scale,
            scale: min_scale.max(1),
        })
    }

    /// One sampling cycle: reconcile the tracked set against the live
    /// interface list (auto mode), update every device from the counter
    /// source, evict devices that have been down for a full history window
    /// (auto mode), then recompute the display scale.
    pub fn tick(&mut self, source: &dyn CounterSource) {
        if self.dev_names.is_none() {
            let live = source.enumerate_up_devices();
            self.devs = reconcile(std::mem::take(&mut self.devs), &live, self.hist_len);
        }

        for dev in &mut self.devs {
            dev.update(source.read_counters(&dev.name));
        }

        if self.dev_names.is_none() {
            let hist_len = self.hist_len;
            self.devs.retain(|dev| {
                let keep = dev.down_count < hist_len;
                if !keep {
                    tracing::debug!(device = %dev.name, "interface down for a full window, dropping");
                }
                keep
            });
        }

        self.scale = self.compute_scale();
    }

    fn compute_scale(&self) -> u64 {
        let summed: u64 = self
            .devs
            .iter()
            .fold(0u64, |acc, dev| {
                acc.saturating_add(dev.max_rx.saturating_add(dev.max_tx))
            });
        summed.max(self.min_scale).max(1)
    }

    /// Fraction of the current scale occupied by the summed traffic in one
    /// history slot. Slot 0 is the newest sample; out-of-range slots read
    /// as 0.
    pub fn per_slot_fraction(&self, direction: Direction, slot: usize) -> f64 {
        if slot >= self.hist_len {
            return 0.0;
        }
        let summed: u64 = self.devs.iter().fold(0u64, |acc, dev| {
            let hist = match direction {
                Direction::Rx => &dev.hist_rx,
                Direction::Tx => &dev.hist_tx,
            };
            acc.saturating_add(hist[slot])
        });
        summed as f64 / self.scale.max(1) as f64
    }

    /// Tooltip text: one line per tracked device with its latest rx/tx
    /// deltas, then the current scale.
    pub fn tooltip(&self) -> String {
        let mut lines: Vec<String> = self
            .devs
            .iter()
            .map(|dev| {
                format!(
                    "{}: {}B down, {}B up",
                    dev.name,
                    format_bytes(dev.hist_rx[0]),
                    format_bytes(dev.hist_tx[0]),
                )
            })
            .collect();
        lines.push(format!("scale: {}B", format_bytes(self.scale)));
        lines.join("\n")
    }

    /// Assembles the renderable output for one tick.
    pub fn snapshot(&self, timestamp: u64) -> GraphSnapshot {
        GraphSnapshot {
            timestamp,
            scale: self.scale,
            rx_fractions: (0..self.hist_len)
                .map(|slot| self.per_slot_fraction(Direction::Rx, slot))
                .collect(),
            tx_fractions: (0..self.hist_len)
                .map(|slot| self.per_slot_fraction(Direction::Tx, slot))
                .collect(),
            tooltip: self.tooltip(),
        }
    }

    /// Changes the history capacity (display width). Applies to every
    /// tracked device immediately and to all future device creation. A
    /// capacity of 0 would corrupt the buffer invariants, so it is rejected.
    pub fn set_capacity(&mut self, new_len: usize) -> Result<(), TrackerError> {
        if new_len == 0 {
            return Err(TrackerError::ZeroCapacity);
        }
        if new_len != self.hist_len {
            for dev in &mut self.devs {
                dev.resize(new_len);
            }
            self.hist_len = new_len;
        }
        Ok(())
    }

    /// Sets the monitored-device filter. An empty (or all-separator) string
    /// selects auto-discovery; otherwise the tracked set is cleared and
    /// rebuilt from the listed names in order. Any filter change discards
    /// existing history.
    pub fn set_device_filter(&mut self, filter: &str) {
        let names = parse_dev_names(filter);
        self.devs.clear();
        if names.is_empty() {
            self.dev_names = None;
        } else {
            self.devs = names
                .iter()
                .map(|name| NetworkDevice::new(name, self.hist_len))
                .collect();
            self.dev_names = Some(names);
        }
    }

    /// Canonical re-joined form of the device filter for display and
    /// persistence; empty in auto-discovery mode.
    pub fn device_filter(&self) -> String {
        match &self.dev_names {
            Some(names) => names.join(", "),
            None => String::new(),
        }
    }

    pub fn set_min_scale(&mut self, bytes: u64) {
        self.min_scale = bytes;
    }

    pub fn is_auto_discovery(&self) -> bool {
        self.dev_names.is_none()
    }

    pub fn hist_len(&self) -> usize {
        self.hist_len
    }

    pub fn scale(&self) -> u64 {
        self.scale
    }

    pub fn devices(&self) -> &[NetworkDevice] {
        &self.devs
    }
}
