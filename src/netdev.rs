// Per-interface history record: scrolling rx/tx delta buffers with running
// maxima and down-aging state.

use crate::models::DeviceStats;

/// One monitored interface. Owned exclusively by the tracker; nothing else
/// holds a reference across a tick boundary.
#[derive(Debug, Clone)]
pub struct NetworkDevice {
    pub name: String,

    /// Last observed cumulative counters.
    pub rx_bytes_total: u64,
    pub tx_bytes_total: u64,

    /// Per-tick deltas, slot 0 = newest, slot `len - 1` = oldest.
    /// Both buffers always have exactly the tracker's configured capacity.
    pub hist_rx: Vec<u64>,
    pub hist_tx: Vec<u64>,

    /// Running maxima over the current history window.
    pub max_rx: u64,
    pub max_tx: u64,

    /// Consecutive ticks the link has been reported not-up. Reset to 0 on
    /// any up sample; the tracker evicts at `down_count >= capacity`.
    pub down_count: usize,
}

/// Delta between two cumulative counter reads. A read lower than the
/// previous one means the counter reset (wrapped, or the interface was
/// re-initialized), so the previous value is taken as effectively 0. This
/// under-counts one interval instead of producing a huge spurious spike.
pub fn counter_delta(previous: u64, current: u64) -> u64 {
    if current >= previous {
        current - previous
    } else {
        current
    }
}

impl NetworkDevice {
    pub fn new(name: &str, hist_len: usize) -> Self {
        Self {
            name: name.to_string(),
            rx_bytes_total: 0,
            tx_bytes_total: 0,
            hist_rx: vec![0; hist_len],
            hist_tx: vec![0; hist_len],
            max_rx: 0,
            max_tx: 0,
            down_count: 0,
        }
    }

    /// Applies one tick's counter read.
    ///
    /// The history is shifted one slot toward the oldest end, dropping the
    /// sample that falls off; the maximum over the retained window is
    /// recomputed in the same linear pass. A down interface contributes a
    /// zero sample and keeps its stale counters so a later up sample deltas
    /// against the last real read.
    pub fn update(&mut self, stats: DeviceStats) {
        let kept_max_rx = shift_in(&mut self.hist_rx, 0);
        let kept_max_tx = shift_in(&mut self.hist_tx, 0);

        if !stats.is_up {
            self.down_count += 1;
            self.max_rx = kept_max_rx;
            self.max_tx = kept_max_tx;
            return;
        }
        self.down_count = 0;

        let rx_delta = counter_delta(self.rx_bytes_total, stats.rx_bytes);
        let tx_delta = counter_delta(self.tx_bytes_total, stats.tx_bytes);
        self.hist_rx[0] = rx_delta;
        self.hist_tx[0] = tx_delta;
        self.max_rx = kept_max_rx.max(rx_delta);
        self.max_tx = kept_max_tx.max(tx_delta);
        self.rx_bytes_total = stats.rx_bytes;
        self.tx_bytes_total = stats.tx_bytes;
    }

    /// Resizes both history buffers to `new_len`. Growing zero-fills at the
    /// oldest end; shrinking drops the oldest samples. Maxima are recomputed
    /// since samples may have aged out.
    pub fn resize(&mut self, new_len: usize) {
        if new_len == self.hist_rx.len() {
            return;
        }
        self.hist_rx.resize(new_len, 0);
        self.hist_tx.resize(new_len, 0);
        self.max_rx = self.hist_rx.iter().copied().max().unwrap_or(0);
        self.max_tx = self.hist_tx.iter().copied().max().unwrap_or(0);
    }
}

/// Shifts every slot one position toward the oldest end, writes `newest`
/// into slot 0, and returns the maximum of the retained (shifted) samples.
fn shift_in(hist: &mut [u64], newest: u64) -> u64 {
    let mut kept_max = 0;
    for i in (1..hist.len()).rev() {
        hist[i] = hist[i - 1];
        kept_max = kept_max.max(hist[i]);
    }
    if let Some(slot) = hist.first_mut() {
        *slot = newest;
    }
    kept_max
}
