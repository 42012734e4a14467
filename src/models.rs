// Domain models shared by the sampler core and the host layer.

use serde::{Deserialize, Serialize};

/// Point-in-time read of one interface's link state and cumulative counters.
///
/// Counters are cumulative since boot (or since the interface was
/// re-initialized); an unreadable counter is reported as `u64::MAX` rather
/// than an error, which the delta computation treats as a reset on the
/// following sample.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceStats {
    pub is_up: bool,
    pub rx_bytes: u64,
    pub tx_bytes: u64,
}

/// Traffic direction, used to select a history buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Rx,
    Tx,
}

/// One tick's renderable output: per-slot fractions of the current scale
/// (index 0 = newest sample) plus the tooltip text. Handed to the rendering
/// layer; the core keeps no reference to it after the tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphSnapshot {
    pub timestamp: u64,
    pub scale: u64,
    pub rx_fractions: Vec<f64>,
    pub tx_fractions: Vec<f64>,
    pub tooltip: String,
}
