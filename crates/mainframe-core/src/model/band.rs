// Display labels derived from utilization percentages.

use serde::Serialize;
use strum::{Display, EnumIter, IntoStaticStr};

/// CPU load label. Boundaries are closed on the upper band: 65.0 is `High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, EnumIter, IntoStaticStr)]
pub enum CpuBand {
    Idle,
    Moderate,
    High,
    Critical,
}

impl CpuBand {
    pub fn from_usage(pct: f64) -> Self {
        if pct < 35.0 {
            Self::Idle
        } else if pct < 65.0 {
            Self::Moderate
        } else if pct < 85.0 {
            Self::High
        } else {
            Self::Critical
        }
    }
}

/// Memory pressure label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, EnumIter, IntoStaticStr)]
pub enum RamBand {
    Plenty,
    Healthy,
    Busy,
    #[strum(serialize = "Near Capacity")]
    #[serde(rename = "Near Capacity")]
    NearCapacity,
}

impl RamBand {
    pub fn from_usage(pct: f64) -> Self {
        if pct < 40.0 {
            Self::Plenty
        } else if pct < 70.0 {
            Self::Healthy
        } else if pct < 85.0 {
            Self::Busy
        } else {
            Self::NearCapacity
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn cpu_band_boundaries() {
        assert_eq!(CpuBand::from_usage(0.0), CpuBand::Idle);
        assert_eq!(CpuBand::from_usage(34.99), CpuBand::Idle);
        assert_eq!(CpuBand::from_usage(35.0), CpuBand::Moderate);
        assert_eq!(CpuBand::from_usage(64.99), CpuBand::Moderate);
        assert_eq!(CpuBand::from_usage(65.0), CpuBand::High);
        assert_eq!(CpuBand::from_usage(84.99), CpuBand::High);
        assert_eq!(CpuBand::from_usage(85.0), CpuBand::Critical);
        assert_eq!(CpuBand::from_usage(100.0), CpuBand::Critical);
    }

    #[test]
    fn ram_band_boundaries() {
        assert_eq!(RamBand::from_usage(39.99), RamBand::Plenty);
        assert_eq!(RamBand::from_usage(40.0), RamBand::Healthy);
        assert_eq!(RamBand::from_usage(69.99), RamBand::Healthy);
        assert_eq!(RamBand::from_usage(70.0), RamBand::Busy);
        assert_eq!(RamBand::from_usage(84.99), RamBand::Busy);
        assert_eq!(RamBand::from_usage(85.0), RamBand::NearCapacity);
    }

    #[test]
    fn labels() {
        assert_eq!(CpuBand::Critical.to_string(), "Critical");
        assert_eq!(RamBand::NearCapacity.to_string(), "Near Capacity");
        assert_eq!(RamBand::Healthy.to_string(), "Healthy");
    }
}
