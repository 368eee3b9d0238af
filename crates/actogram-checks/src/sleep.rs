//! Sleep plausibility checks
//!
//! Rule-based sanity checks on sparse profiles: everybody sleeps, nobody
//! sleeps half the day at a stretch, and nobody stays awake for days.

use std::collections::HashMap;

use actogram_core::{ActivityLabel, ActogramResult};
use actogram_timeline::{Run, Timeline};

use crate::report::{CheckResult, PlausibilityReport, ResultCollection};

/// Thresholds for the sleep checks.
#[derive(Clone, Debug)]
pub struct SleepCheckConfig {
    pub sleep_label: ActivityLabel,
    /// Longest plausible single sleep stretch, in seconds
    pub max_sleep_secs: i64,
    /// Longest plausible stretch awake between two sleeps, in seconds
    pub max_awake_secs: i64,
    /// Minimum share of the whole profile spent sleeping
    pub min_sleep_share: f64,
}

impl Default for SleepCheckConfig {
    fn default() -> Self {
        SleepCheckConfig {
            sleep_label: ActivityLabel::new("sleep"),
            max_sleep_secs: 12 * 3600,
            max_awake_secs: 24 * 3600,
            min_sleep_share: 0.2,
        }
    }
}

/// Run all sleep checks on one profile, appending the results to
/// `report`.
pub fn check_sleep(
    timeline: &Timeline,
    config: &SleepCheckConfig,
    report: &mut ResultCollection,
) -> ActogramResult<()> {
    let sleep_runs: Vec<&Run> = timeline
        .runs()
        .iter()
        .filter(|run| run.name == config.sleep_label)
        .collect();
    if sleep_runs.is_empty() {
        report.add(CheckResult::failed(
            "sleep",
            "did not find a single sleep activity",
        ));
        // the remaining checks are meaningless without any sleep
        return Ok(());
    }
    check_overall_sleep_share(timeline, &sleep_runs, config, report)?;
    check_sleep_durations(timeline, &sleep_runs, config, report);
    check_awake_durations(timeline, sleep_runs.len(), config, report)?;
    Ok(())
}

fn check_overall_sleep_share(
    timeline: &Timeline,
    sleep_runs: &[&Run],
    config: &SleepCheckConfig,
    report: &mut ResultCollection,
) -> ActogramResult<()> {
    let sleep_ticks: usize = sleep_runs.iter().filter_map(|run| run.duration()).sum();
    let share = sleep_ticks as f64 / timeline.length()? as f64;
    if share < config.min_sleep_share {
        report.add(CheckResult::failed(
            "sleep - overall ratio",
            format!("overall sleeping time is too low at {:.1}%", share * 100.0),
        ));
    } else {
        report.add(CheckResult::passed("sleep - overall ratio"));
    }
    Ok(())
}

fn check_sleep_durations(
    timeline: &Timeline,
    sleep_runs: &[&Run],
    config: &SleepCheckConfig,
    report: &mut ResultCollection,
) {
    let resolution_secs = timeline.resolution().as_secs() as i64;
    let too_long = sleep_runs
        .iter()
        .filter(|run| {
            matches!(run.duration(), Some(ticks) if ticks as i64 * resolution_secs > config.max_sleep_secs)
        })
        .count();
    if too_long > 0 {
        report.add(CheckResult::failed_with_stats(
            "sleep - duration",
            format!(
                "person slept for longer than {}h at a stretch",
                config.max_sleep_secs / 3600
            ),
            too_long,
            too_long as f64 / sleep_runs.len() as f64,
        ));
    } else {
        report.add(CheckResult::passed("sleep - duration"));
    }
}

fn check_awake_durations(
    timeline: &Timeline,
    sleep_run_count: usize,
    config: &SleepCheckConfig,
    report: &mut ResultCollection,
) -> ActogramResult<()> {
    let resolution_secs = timeline.resolution().as_secs() as i64;
    let max_awake_ticks = config.max_awake_secs / resolution_secs.max(1);
    let mut wake_time: HashMap<ActivityLabel, usize> = HashMap::new();
    let mut too_long_awake = 0usize;
    let mut last_sleep: Option<usize> = None;
    for (index, run) in timeline.runs().iter().enumerate() {
        if run.name != config.sleep_label {
            continue;
        }
        if let Some(last) = last_sleep {
            let awake = run.start as i64 - timeline.runs()[last].end()? as i64;
            if awake > max_awake_ticks {
                too_long_awake += 1;
                // attribute the awake time to the responsible activities
                for wake_run in &timeline.runs()[last + 1..index] {
                    *wake_time.entry(wake_run.name.clone()).or_default() +=
                        wake_run.duration().unwrap_or(0);
                }
            }
        }
        last_sleep = Some(index);
    }
    if too_long_awake == 0 {
        report.add(CheckResult::passed("sleep - time awake"));
        return Ok(());
    }
    let mut breakdown: Vec<(ActivityLabel, usize)> = wake_time.into_iter().collect();
    breakdown.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    let detail = breakdown
        .iter()
        .map(|(name, ticks)| format!("{}: {}min", name, *ticks as i64 * resolution_secs / 60))
        .collect::<Vec<_>>()
        .join(", ");
    report.add(CheckResult::failed_with_stats(
        "sleep - time awake",
        format!(
            "person was awake for longer than {}h ({})",
            config.max_awake_secs / 3600,
            detail
        ),
        too_long_awake,
        too_long_awake as f64 / sleep_run_count as f64,
    ));
    Ok(())
}

/// Run the full check suite on one profile.
pub fn check_profile(
    timeline: &Timeline,
    config: &SleepCheckConfig,
) -> ActogramResult<ResultCollection> {
    let description = timeline.source_id().unwrap_or("unnamed profile");
    let mut report = ResultCollection::new(format!("profile {}", description));
    check_sleep(timeline, config, &mut report)?;
    tracing::info!(
        profile = description,
        fail_rate = report.fail_rate(),
        "checked profile plausibility"
    );
    Ok(report)
}

/// Check a whole batch, collecting one report per profile.
pub fn check_profiles(
    timelines: &[Timeline],
    config: &SleepCheckConfig,
) -> ActogramResult<PlausibilityReport> {
    let mut full = PlausibilityReport::new();
    for timeline in timelines {
        full.add_report(check_profile(timeline, config)?);
    }
    Ok(full)
}
