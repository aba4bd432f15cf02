//! Per-second rates between two blkio snapshots.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::{BlkioStats, StatFile};

/// Per-second rates keyed like [`BlkioStats`].
///
/// `queued` is a gauge: it holds the queue depth of the later snapshot
/// rather than a rate.
#[derive(Clone, Serialize, Debug, PartialEq, Default)]
pub struct BlkioRates {
    pub sectors: BTreeMap<String, f64>,
    pub service_bytes: BTreeMap<String, f64>,
    pub serviced: BTreeMap<String, f64>,
    pub queued: BTreeMap<String, u64>,
}

impl BlkioRates {
    /// Computes rates from `prev` to `curr` taken `dt_secs` apart.
    ///
    /// Counter regressions are skipped (see [`BlkioStats::delta`]).
    /// Counter rates are empty if `dt_secs` is not a positive finite number.
    pub fn between(prev: &BlkioStats, curr: &BlkioStats, dt_secs: f64) -> Self {
        let mut rates = BlkioRates {
            queued: curr.queued.clone(),
            ..Default::default()
        };
        if !dt_secs.is_finite() || dt_secs <= 0.0 {
            return rates;
        }

        let delta = curr.delta(prev);
        for file in StatFile::ALL {
            let Some(out) = rates.rate_map_mut(file) else {
                continue;
            };
            for (key, &d) in delta.map(file) {
                out.insert(key.clone(), d as f64 / dt_secs);
            }
        }
        rates
    }

    /// Per-second rates for a counter file, `None` for the queue depth.
    pub fn rate_map(&self, file: StatFile) -> Option<&BTreeMap<String, f64>> {
        match file {
            StatFile::Sectors => Some(&self.sectors),
            StatFile::ServiceBytes => Some(&self.service_bytes),
            StatFile::Serviced => Some(&self.serviced),
            StatFile::Queued => None,
        }
    }

    fn rate_map_mut(&mut self, file: StatFile) -> Option<&mut BTreeMap<String, f64>> {
        match file {
            StatFile::Sectors => Some(&mut self.sectors),
            StatFile::ServiceBytes => Some(&mut self.service_bytes),
            StatFile::Serviced => Some(&mut self.serviced),
            StatFile::Queued => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sectors.is_empty()
            && self.service_bytes.is_empty()
            && self.serviced.is_empty()
            && self.queued.is_empty()
    }
}
