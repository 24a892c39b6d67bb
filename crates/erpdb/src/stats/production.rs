use crate::entity::{HourlyOutputReport, HourlyProduction, SHIFT_DAY, SHIFT_NIGHT};
use erpdb_core::db::aggregate::{average_by, round_to, sum_by, unique_in_order};
use serde::Serialize;

///
/// ShiftStats
///

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftStats {
    pub total_output: f64,
    pub total_amount: f64,

    /// Whole units.
    pub average_output: f64,
}

impl ShiftStats {
    fn compute<'a>(reports: impl Iterator<Item = &'a HourlyOutputReport> + Clone) -> Self {
        Self {
            total_output: sum_by(reports.clone(), |r| r.daily_output),
            total_amount: sum_by(reports.clone(), |r| r.daily_amount),
            average_output: round_to(average_by(reports, |r| r.daily_output), 0),
        }
    }
}

///
/// HourlyOutputStats
///

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyOutputStats {
    pub total_output: f64,
    pub total_amount: f64,
    pub total_target: f64,

    /// Whole units.
    pub average_output: f64,

    /// `totalOutput / (1 + totalTarget) * 100`, one decimal place.
    pub efficiency_rate: f64,

    pub day_shift: ShiftStats,
    pub night_shift: ShiftStats,
}

impl HourlyOutputStats {
    #[must_use]
    pub fn compute(reports: &[HourlyOutputReport]) -> Self {
        let all = ShiftStats::compute(reports.iter());
        let total_target = sum_by(reports, |r| r.target);
        let efficiency_rate = if reports.is_empty() {
            0.0
        } else {
            round_to(all.total_output / (1.0 + total_target) * 100.0, 1)
        };

        Self {
            total_output: all.total_output,
            total_amount: all.total_amount,
            total_target,
            average_output: all.average_output,
            efficiency_rate,
            day_shift: ShiftStats::compute(reports.iter().filter(|r| r.shift == SHIFT_DAY)),
            night_shift: ShiftStats::compute(reports.iter().filter(|r| r.shift == SHIFT_NIGHT)),
        }
    }
}

///
/// HourlyProductionStats
///

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyProductionStats {
    /// Number of team reports, not distinct teams.
    pub total_teams: usize,

    pub total_output: f64,
    pub total_amount: f64,

    // first-appearance order
    pub teams: Vec<String>,
    pub styles: Vec<String>,
    pub colors: Vec<String>,

    /// Whole units.
    pub average_team_output: f64,
}

impl HourlyProductionStats {
    #[must_use]
    pub fn compute(productions: &[HourlyProduction]) -> Self {
        Self {
            total_teams: productions.len(),
            total_output: sum_by(productions, |p| p.total.output),
            total_amount: sum_by(productions, |p| p.total.amount),
            teams: unique_in_order(productions, |p| p.team.clone()),
            styles: unique_in_order(productions, |p| p.style.clone()),
            colors: unique_in_order(productions, |p| p.color.clone()),
            average_team_output: round_to(average_by(productions, |p| p.total.output), 0),
        }
    }
}

///
/// TESTS
///
