use crate::entity::{FarmOut, QC_FAILED, QC_REWORK, QcInspection};
use chrono::{DateTime, Utc};
use erpdb_core::db::aggregate::{
    average_by, count_where, distinct_count, group_by, percent_of, round_to, sum_by,
};
use serde::{Serialize, Serializer};

///
/// FarmOutStats
///

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmOutStats {
    pub total: usize,

    /// Anything not cancelled.
    pub active: usize,
    pub completed: usize,

    /// Open past the expected date.
    pub overdue: usize,
    pub subcontractors: usize,
    pub total_value_sent: f64,

    /// Mean approval rate of completed batches that received anything,
    /// whole percent.
    pub average_quality_rate: f64,
}

impl FarmOutStats {
    #[must_use]
    pub fn compute(farm_outs: &[FarmOut], now: DateTime<Utc>) -> Self {
        let rates: Vec<f64> = farm_outs
            .iter()
            .filter(|f| f.is_completed())
            .filter_map(FarmOut::approval_rate)
            .collect();

        Self {
            total: farm_outs.len(),
            active: count_where(farm_outs, FarmOut::is_active),
            completed: count_where(farm_outs, FarmOut::is_completed),
            overdue: count_where(farm_outs, |f| f.is_overdue(now)),
            subcontractors: distinct_count(farm_outs, |f| f.subcontractor.as_str()),
            total_value_sent: sum_by(farm_outs, |f| f.total_value),
            average_quality_rate: round_to(average_by(&rates, |rate| *rate), 0),
        }
    }
}

///
/// QcStats
///

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QcStats {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub rework: usize,

    /// Pieces passed in passing inspections over all pieces sampled,
    /// whole percent.
    pub quality_rate: f64,

    /// How many inspections cite each reason, in first-seen order.
    #[serde(serialize_with = "counts_as_map")]
    pub rejection_reasons: Vec<(String, usize)>,
}

impl QcStats {
    #[must_use]
    pub fn compute(inspections: &[QcInspection]) -> Self {
        let passed_qty = sum_by(inspections.iter().filter(|i| i.is_passed()), |i| i.passed_qty);
        let reasons: Vec<&str> = inspections
            .iter()
            .flat_map(|i| i.rejection_reasons.iter().map(String::as_str))
            .collect();

        Self {
            total: inspections.len(),
            passed: count_where(inspections, QcInspection::is_passed),
            failed: count_where(inspections, |i| i.qc_status == QC_FAILED),
            rework: count_where(inspections, |i| i.qc_status == QC_REWORK),
            quality_rate: percent_of(passed_qty, sum_by(inspections, |i| i.sample_size)),
            rejection_reasons: group_by(&reasons, |reason| (*reason).to_string()).counts(),
        }
    }
}

fn counts_as_map<S: Serializer>(
    counts: &[(String, usize)],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_map(counts.iter().map(|(reason, count)| (reason, count)))
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn farm_out(id: u64, status: &str, received: f64, approved: f64, expected: &str) -> FarmOut {
        serde_json::from_value(json!({
            "id": id,
            "subcontractor": format!("Sub {}", id % 2),
            "status": status,
            "totalReceived": received,
            "totalApproved": approved,
            "totalValue": 100.0,
            "expectedDate": expected,
        }))
        .unwrap()
    }

    fn inspection(
        id: u64,
        status: &str,
        sample: f64,
        passed: f64,
        reasons: &[&str],
    ) -> QcInspection {
        serde_json::from_value(json!({
            "id": id,
            "orderNumber": format!("ORD-{id}"),
            "inspectionDate": "2024-03-09",
            "qcStatus": status,
            "sampleSize": sample,
            "passedQty": passed,
            "rejectionReasons": reasons,
        }))
        .unwrap()
    }

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-03-09T16:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn quality_rate_averages_completed_batches_with_receipts() {
        let stats = FarmOutStats::compute(
            &[
                farm_out(1, "completed", 200.0, 190.0, "2024-01-01T00:00:00Z"),
                farm_out(2, "completed", 100.0, 80.0, "2024-01-01T00:00:00Z"),
                farm_out(3, "completed", 0.0, 0.0, "2024-01-01T00:00:00Z"),
                farm_out(4, "in_production", 100.0, 10.0, "2024-01-01T00:00:00Z"),
            ],
            now(),
        );

        assert_eq!(stats.average_quality_rate, 88.0);
        assert_eq!(stats.completed, 3);
        assert_eq!(stats.total_value_sent, 400.0);
        assert_eq!(stats.subcontractors, 2);
    }

    #[test]
    fn overdue_skips_closed_and_future_batches() {
        let stats = FarmOutStats::compute(
            &[
                farm_out(1, "sent", 0.0, 0.0, "2024-03-01T17:00:00Z"),
                farm_out(2, "sent", 0.0, 0.0, "2024-04-01T17:00:00Z"),
                farm_out(3, "cancelled", 0.0, 0.0, "2024-03-01T17:00:00Z"),
                farm_out(4, "completed", 0.0, 0.0, "2024-03-01T17:00:00Z"),
                farm_out(5, "sent", 0.0, 0.0, "soon"),
            ],
            now(),
        );

        assert_eq!(stats.overdue, 1);
        assert_eq!(stats.active, 4);
    }

    #[test]
    fn qc_rate_counts_only_passing_inspections() {
        let stats = QcStats::compute(&[
            inspection(1, "passed", 100.0, 95.0, &["stitchingDefect", "colorIssue"]),
            inspection(2, "failed", 100.0, 60.0, &["colorIssue"]),
            inspection(3, "rework", 50.0, 45.0, &[]),
        ]);

        assert_eq!(stats.passed, 1);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.rework, 1);
        assert_eq!(stats.quality_rate, 38.0);
        assert_eq!(
            stats.rejection_reasons,
            [("stitchingDefect".to_string(), 1), ("colorIssue".to_string(), 2)]
        );
        assert_eq!(
            serde_json::to_value(&stats).unwrap()["rejectionReasons"],
            json!({ "stitchingDefect": 1, "colorIssue": 2 })
        );
    }

    #[test]
    fn empty_collections_yield_zeroes() {
        assert_eq!(FarmOutStats::compute(&[], now()), FarmOutStats::default());
        assert_eq!(QcStats::compute(&[]), QcStats::default());
    }
}
