//! Frequency report and export functionality

use crate::pipeline::PipelineStats;
use crate::stats::FrequencyTable;
use crate::utils::TimeWindow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Complete frequency report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrequencyReport {
    /// Report metadata
    pub metadata: ReportMetadata,
    /// Summary statistics
    pub summary: ReportSummary,
    /// Labels by descending count
    pub frequencies: Vec<FrequencyEntry>,
}

/// Report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Report generation timestamp
    pub generated_at: String,
    /// Application version
    pub version: String,
    /// Start of the analysed window (seconds since the epoch)
    pub window_start: f64,
    /// End of the analysed window, absent when unbounded
    pub window_end: Option<f64>,
}

/// Summary statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Total key presses counted
    pub total_presses: u64,
    /// Number of distinct labels
    pub distinct_labels: usize,
    /// Raw events read
    pub events_read: u64,
    /// Key presses dropped during resolution
    pub dropped: u64,
    /// Modifiers force-released after exceeding their max age
    pub modifier_expiries: u64,
}

/// Single label count
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FrequencyEntry {
    pub label: String,
    pub count: u64,
    /// Fraction of all presses
    pub share: f64,
}

impl FrequencyReport {
    /// Create a new report
    pub fn new(
        window: TimeWindow,
        table: &FrequencyTable,
        stats: PipelineStats,
        modifier_expiries: u64,
    ) -> Self {
        let now: DateTime<Utc> = Utc::now();
        let total = table.total();

        let frequencies = table
            .sorted()
            .into_iter()
            .map(|(label, count)| FrequencyEntry {
                label: label.to_string(),
                count,
                share: if total > 0 {
                    count as f64 / total as f64
                } else {
                    0.0
                },
            })
            .collect();

        Self {
            metadata: ReportMetadata {
                generated_at: now.to_rfc3339(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                window_start: window.start,
                window_end: window.end.is_finite().then_some(window.end),
            },
            summary: ReportSummary {
                total_presses: total,
                distinct_labels: table.len(),
                events_read: stats.events_seen,
                dropped: stats.dropped,
                modifier_expiries,
            },
            frequencies,
        }
    }

    /// Export report to JSON file
    pub fn export_json(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }

    /// Export report to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::ResolvedKeyPress;

    fn table(labels: &[&str]) -> FrequencyTable {
        let presses: Vec<ResolvedKeyPress> = labels
            .iter()
            .map(|label| ResolvedKeyPress::new(*label, 0.0))
            .collect();
        FrequencyTable::from_presses(&presses)
    }

    #[test]
    fn report_sorted_with_shares() {
        let report = FrequencyReport::new(
            TimeWindow::new(0.0, 86_400.0),
            &table(&["a", "b", "a", "a"]),
            PipelineStats::default(),
            0,
        );

        assert_eq!(report.summary.total_presses, 4);
        assert_eq!(report.summary.distinct_labels, 2);
        assert_eq!(report.frequencies[0].label, "a");
        assert_eq!(report.frequencies[0].count, 3);
        assert!((report.frequencies[0].share - 0.75).abs() < 1e-12);
        assert_eq!(report.metadata.window_end, Some(86_400.0));
    }

    #[test]
    fn unbounded_window_has_no_end() {
        let report = FrequencyReport::new(
            TimeWindow::all(),
            &FrequencyTable::new(),
            PipelineStats::default(),
            0,
        );
        assert_eq!(report.metadata.window_end, None);
        assert!(report.frequencies.is_empty());
    }

    #[test]
    fn report_json_contains_fields() {
        let stats = PipelineStats {
            events_seen: 10,
            presses_emitted: 2,
            modifier_transitions: 2,
            dropped: 1,
        };
        let report = FrequencyReport::new(TimeWindow::all(), &table(&["x", "y"]), stats, 3);
        let json = report.to_json().unwrap();

        assert!(json.contains("\"total_presses\": 2"));
        assert!(json.contains("\"dropped\": 1"));
        assert!(json.contains("\"modifier_expiries\": 3"));
        assert!(json.contains("\"label\": \"x\""));

        let parsed: FrequencyReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.frequencies, report.frequencies);
    }
}
