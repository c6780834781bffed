use chrono::{DateTime, Utc};
use serde::Serialize;

use super::band::{CpuBand, RamBand};

/// One system-stats snapshot. Replaced wholesale on every poll.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemStats {
    pub cpu_usage: f64,
    pub ram_usage: f64,
    pub ram_used: String,
    pub ram_total: String,
    pub fetched_at: DateTime<Utc>,
}

impl SystemStats {
    pub fn cpu_band(&self) -> CpuBand {
        CpuBand::from_usage(self.cpu_usage)
    }

    pub fn ram_band(&self) -> RamBand {
        RamBand::from_usage(self.ram_usage)
    }
}
