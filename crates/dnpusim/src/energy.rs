//! Conversion of access counts into energy, and the analog vs digital report.
//!
//! Default per-access figures:
//! - ADC: 5.4 fJ per conversion step (12 bit 250 MS/s SAR ADC, 28 nm CMOS)
//! - DAC: 1.2 fJ per conversion step (relaxation DAC, 40 nm CMOS)
//! - DNPU: 5 nW for 10 ns
//! - digital MAC: 5.173 uW for 0.97 ns

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::counts::AccessCounts;

/// Joules charged per access of each resource
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnergyTable {
    pub adc: f64,
    pub dac: f64,
    pub dnpu: f64,
    pub digital_mac: f64,
}

impl Default for EnergyTable {
    fn default() -> Self {
        EnergyTable {
            adc: 5.4e-15,
            dac: 1.2e-15,
            dnpu: 5e-9 * 10e-9,
            digital_mac: 5.173e-6 * 0.97e-9,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyReport {
    pub counts: AccessCounts,
    pub dnpu: f64,
    pub dac: f64,
    pub adc: f64,
    pub digital_mac: f64,
}

impl EnergyReport {
    pub fn from_counts(counts: &AccessCounts, table: &EnergyTable) -> Self {
        EnergyReport {
            counts: *counts,
            dnpu: counts.dnpu as f64 * table.dnpu,
            dac: counts.dac as f64 * table.dac,
            adc: counts.adc as f64 * table.adc,
            digital_mac: counts.digital_mac as f64 * table.digital_mac,
        }
    }

    /// DNPU + DAC + ADC
    pub fn analog_total(&self) -> f64 {
        self.dnpu + self.dac + self.adc
    }

    /// How many times less energy the crossbar spends than the digital MACs.
    /// `None` when the crossbar spent nothing.
    pub fn improvement(&self) -> Option<f64> {
        let analog = self.analog_total();
        (analog > 0.0).then(|| self.digital_mac / analog)
    }
}

const RULE: &str =
    "----------------------------------------------------------------------------------------------------";

impl fmt::Display for EnergyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{RULE}")?;
        writeln!(
            f,
            "Number of DNPU access is {}, consuming {:e} J of energy",
            self.counts.dnpu, self.dnpu
        )?;
        writeln!(
            f,
            "Number of DAC access is {}, consuming {:e} J of energy",
            self.counts.dac, self.dac
        )?;
        writeln!(
            f,
            "Number of ADC access is {}, consuming {:e} J of energy",
            self.counts.adc, self.adc
        )?;
        writeln!(f, "{RULE}")?;
        writeln!(
            f,
            "The total energy consumption of the DNPU crossbar array is {:e} J",
            self.analog_total()
        )?;
        writeln!(
            f,
            "While in digital, the number of access is {}, consuming {:e} J",
            self.counts.digital_mac, self.digital_mac
        )?;
        writeln!(f, "{RULE}")?;
        match self.improvement() {
            Some(ratio) => write!(
                f,
                "This shows {ratio:.3}X improvement when using the DNPU crossbar array compared to a similar digital counterpart."
            ),
            None => write!(f, "The DNPU crossbar array consumed no energy; no comparison possible."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-12 * a.abs().max(b.abs())
    }

    #[test]
    fn default_table_matches_published_figures() {
        let t = EnergyTable::default();
        assert!(close(t.adc, 5.4e-15));
        assert!(close(t.dac, 1.2e-15));
        assert!(close(t.dnpu, 5e-17));
        assert!(close(t.digital_mac, 5.01781e-15));
    }

    #[test]
    fn report_scales_counts() {
        let counts = AccessCounts {
            adc: 2,
            dac: 18,
            dnpu: 12,
            digital_mac: 4,
        };
        let report = EnergyReport::from_counts(&counts, &EnergyTable::default());
        assert!(close(report.adc, 2.0 * 5.4e-15));
        assert!(close(report.dac, 18.0 * 1.2e-15));
        assert!(close(report.dnpu, 12.0 * 5e-17));
        assert!(close(report.analog_total(), report.adc + report.dac + report.dnpu));
        let ratio = report.improvement().unwrap();
        assert!(close(ratio, report.digital_mac / report.analog_total()));
    }

    #[test]
    fn zero_counts_have_no_ratio() {
        let report = EnergyReport::from_counts(&AccessCounts::default(), &EnergyTable::default());
        assert_eq!(report.improvement(), None);
        assert!(report.to_string().contains("no comparison possible"));
    }

    #[test]
    fn partial_table_falls_back_to_defaults() {
        let table: EnergyTable = toml::from_str("adc = 3.4e-14").unwrap();
        assert_eq!(table.adc, 3.4e-14);
        assert_eq!(table.dac, EnergyTable::default().dac);
    }
}
