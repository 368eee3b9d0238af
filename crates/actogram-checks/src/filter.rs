//! Threshold filters for day profiles
//!
//! Downstream consumers only want fully covered, meaningfully varied
//! day profiles; these filters drop the rest. All thresholds are call
//! parameters.

use std::collections::HashSet;

use actogram_core::{ActogramResult, DayTime, SECS_PER_DAY};
use actogram_timeline::Timeline;

/// Keep only profiles that cover exactly one day.
///
/// Profiles with a pending final duration cannot cover a full day and
/// are dropped as well.
pub fn filter_complete_days(profiles: Vec<Timeline>) -> Vec<Timeline> {
    profiles
        .into_iter()
        .filter(|profile| matches!(profile.total_duration_secs(), Ok(secs) if secs == SECS_PER_DAY))
        .collect()
}

/// Keep only profiles with at least `min_runs` activities, dropping
/// e.g. vacation days consisting of a single "away" run.
pub fn filter_min_run_count(profiles: Vec<Timeline>, min_runs: usize) -> Vec<Timeline> {
    profiles
        .into_iter()
        .filter(|profile| profile.runs().len() >= min_runs)
        .collect()
}

/// Keep only profiles featuring at least `min_distinct` different
/// activity names.
pub fn filter_min_distinct_activities(
    profiles: Vec<Timeline>,
    min_distinct: usize,
) -> Vec<Timeline> {
    profiles
        .into_iter()
        .filter(|profile| {
            let distinct: HashSet<&str> = profile
                .runs()
                .iter()
                .map(|run| run.name.as_str())
                .collect();
            distinct.len() >= min_distinct
        })
        .collect()
}

/// Keep only profiles in which every derived run lasts at least
/// `min_ticks`.
pub fn filter_min_run_duration(profiles: Vec<Timeline>, min_ticks: usize) -> Vec<Timeline> {
    profiles
        .into_iter()
        .filter(|profile| {
            profile
                .runs()
                .iter()
                .all(|run| run.duration().map(|ticks| ticks >= min_ticks).unwrap_or(false))
        })
        .collect()
}

/// Split a long profile into complete single-day profiles: partial days
/// and days with fewer than `min_runs` activities are dropped.
pub fn extract_day_profiles(
    profile: &Timeline,
    day_change_time: DayTime,
    min_runs: usize,
) -> ActogramResult<Vec<Timeline>> {
    let days = profile.split_into_days(day_change_time)?;
    let days = filter_complete_days(days);
    Ok(filter_min_run_count(days, min_runs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actogram_core::{ProfileCategory, Resolution};
    use actogram_timeline::Run;

    fn hour_timeline(runs: Vec<Run>) -> Timeline {
        Timeline::new(
            runs,
            DayTime::from_hours(4),
            Resolution::from_hours(1),
            ProfileCategory::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_filter_complete_days() {
        let full = hour_timeline(vec![Run::new("sleep", 0, 24)]);
        let short = hour_timeline(vec![Run::new("sleep", 0, 20)]);
        let long = hour_timeline(vec![Run::new("sleep", 0, 30)]);
        let kept = filter_complete_days(vec![full.clone(), short, long]);
        assert_eq!(kept, vec![full]);
    }

    #[test]
    fn test_filter_min_run_count() {
        let single = hour_timeline(vec![Run::new("away", 0, 24)]);
        let varied = hour_timeline(vec![Run::new("sleep", 0, 8), Run::new("work", 8, 16)]);
        let kept = filter_min_run_count(vec![single, varied.clone()], 2);
        assert_eq!(kept, vec![varied]);
    }

    #[test]
    fn test_filter_min_distinct_activities() {
        // three runs but only two distinct names
        let repetitive = hour_timeline(vec![
            Run::new("sleep", 0, 8),
            Run::new("work", 8, 8),
            Run::new("sleep", 16, 8),
        ]);
        let varied = hour_timeline(vec![
            Run::new("sleep", 0, 8),
            Run::new("work", 8, 8),
            Run::new("leisure", 16, 8),
        ]);
        let kept = filter_min_distinct_activities(vec![repetitive, varied.clone()], 3);
        assert_eq!(kept, vec![varied]);
    }

    #[test]
    fn test_filter_min_run_duration() {
        let with_blip = hour_timeline(vec![
            Run::new("sleep", 0, 8),
            Run::new("eat", 8, 1),
            Run::new("work", 9, 15),
        ]);
        let steady = hour_timeline(vec![Run::new("sleep", 0, 8), Run::new("work", 8, 16)]);
        let kept = filter_min_run_duration(vec![with_blip, steady.clone()], 2);
        assert_eq!(kept, vec![steady]);
    }

    #[test]
    fn test_extract_day_profiles_drops_partial_and_trivial_days() {
        // two full days plus a partial third: first day has two runs,
        // second day is one long "away" run
        let profile = hour_timeline(vec![
            Run::new("sleep", 0, 8),
            Run::new("work", 8, 16),
            Run::new("away", 24, 24),
            Run::new("eat", 48, 3),
        ]);
        let days = extract_day_profiles(&profile, DayTime::from_hours(4), 2).unwrap();
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].runs().len(), 2);
        assert_eq!(days[0].length().unwrap(), 24);
    }
}
