// Shared test helpers

use netgraph::counter_repo::CounterSource;
use netgraph::models::DeviceStats;
use std::collections::HashMap;
use std::sync::Mutex;

pub fn stats(is_up: bool, rx_bytes: u64, tx_bytes: u64) -> DeviceStats {
    DeviceStats {
        is_up,
        rx_bytes,
        tx_bytes,
    }
}

/// Scripted counter source: tests stage the up-interface list and per-device
/// reads between ticks. Unknown devices read like a vanished sysfs entry
/// (down, sentinel counters).
#[derive(Default)]
pub struct MockCounterSource {
    up_names: Mutex<Vec<String>>,
    device_stats: Mutex<HashMap<String, DeviceStats>>,
}

impl MockCounterSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_up_devices(&self, names: &[&str]) {
        let mut sorted: Vec<String> = names.iter().map(|n| n.to_string()).collect();
        sorted.sort();
        *self.up_names.lock().unwrap() = sorted;
    }

    pub fn set_stats(&self, name: &str, value: DeviceStats) {
        self.device_stats
            .lock()
            .unwrap()
            .insert(name.to_string(), value);
    }

    pub fn remove_device(&self, name: &str) {
        self.up_names.lock().unwrap().retain(|n| n != name);
        self.device_stats.lock().unwrap().remove(name);
    }
}

impl CounterSource for MockCounterSource {
    fn enumerate_up_devices(&self) -> Vec<String> {
        self.up_names.lock().unwrap().clone()
    }

    fn read_counters(&self, name: &str) -> DeviceStats {
        self.device_stats
            .lock()
            .unwrap()
            .get(name)
            .copied()
            .unwrap_or(DeviceStats {
                is_up: false,
                rx_bytes: u64::MAX,
                tx_bytes: u64::MAX,
            })
    }
}
