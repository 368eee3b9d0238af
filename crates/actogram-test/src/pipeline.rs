//! End-to-end pipeline helpers
//!
//! Mirrors the production validation chain: ingested profiles are
//! normalized, remapped onto a common activity vocabulary, resampled to
//! the statistics resolution, and split into single-day profiles.

use actogram_core::{ActivityMapping, ActogramResult, DayTime, Resolution};
use actogram_timeline::{Timeline, UnmappedPolicy};

/// Run the standard transformation chain on one profile and return its
/// single-day children.
pub fn run_standard_pipeline(
    mut timeline: Timeline,
    mapping: &ActivityMapping,
    target_resolution: Resolution,
    day_change_time: DayTime,
) -> ActogramResult<Vec<Timeline>> {
    timeline.normalize_offset();
    timeline.apply_label_mapping(mapping, UnmappedPolicy::Keep)?;
    timeline.resample(target_resolution)?;
    timeline.split_into_days(day_change_time)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{GeneratorConfig, ProfileGenerator};
    use actogram_checks::{check_profiles, filter_complete_days, SleepCheckConfig};
    use actogram_timeline::TimelineGrid;

    fn coarse_mapping() -> ActivityMapping {
        [
            ("sleep", "rest"),
            ("work", "busy"),
            ("eat", "rest"),
            ("travel", "busy"),
            ("leisure", "rest"),
        ]
        .into_iter()
        .map(|(from, to)| (from.into(), to.into()))
        .collect()
    }

    #[test]
    fn test_full_chain_conserves_duration() {
        let mut generator = ProfileGenerator::new(GeneratorConfig::heavy());
        let timeline = generator.next_profile();
        let original_length = timeline.length().unwrap();

        let days = run_standard_pipeline(
            timeline,
            &coarse_mapping(),
            Resolution::from_minutes(10),
            DayTime::from_hours(4),
        )
        .unwrap();

        assert!(!days.is_empty());
        let total: usize = days.iter().map(|day| day.length().unwrap()).sum();
        assert_eq!(total, original_length / 10);
        for day in &days {
            day.check_contiguity().unwrap();
            assert!(day.length().unwrap() <= 144);
            assert_eq!(day.resolution(), Resolution::from_minutes(10));
            assert_eq!(day.offset(), DayTime::from_hours(4));
        }
    }

    #[test]
    fn test_remapped_days_use_the_coarse_vocabulary() {
        let mut generator = ProfileGenerator::new(GeneratorConfig::heavy());
        let days = run_standard_pipeline(
            generator.next_profile(),
            &coarse_mapping(),
            Resolution::from_minutes(10),
            DayTime::from_hours(4),
        )
        .unwrap();
        for day in &days {
            for run in day.runs() {
                assert!(matches!(run.name.as_str(), "rest" | "busy"));
            }
        }
    }

    #[test]
    fn test_complete_days_export_as_one_grid() {
        let mut generator = ProfileGenerator::new(GeneratorConfig::default());
        let mut days = Vec::new();
        for _ in 0..5 {
            let mut day = generator.day_profile();
            day.resample(Resolution::from_minutes(10)).unwrap();
            // resampling can drop a run and leave equal neighbours, which
            // the dense round trip would fold anyway
            day.merge_adjacent_same_name().unwrap();
            days.push(day);
        }
        let days = filter_complete_days(days);
        assert_eq!(days.len(), 5);

        let grid = TimelineGrid::from_timelines(&days).unwrap();
        assert_eq!(grid.row_count(), 5);
        assert_eq!(grid.tick_count(), 144);

        // the dense rows round-trip back to the same sparse profiles
        let restored = grid.to_timelines().unwrap();
        for (restored, original) in restored.iter().zip(&days) {
            assert_eq!(restored.runs(), original.runs());
        }
    }

    #[test]
    fn test_generated_days_pass_plausibility_reporting() {
        let mut generator = ProfileGenerator::new(GeneratorConfig::default());
        let days: Vec<_> = (0..10).map(|_| generator.day_profile()).collect();
        let report = check_profiles(&days, &SleepCheckConfig::default()).unwrap();
        assert_eq!(report.reports().len(), 10);
        // random profiles may fail plausibility, but every check must
        // have produced a grouped fail rate in 0..=1
        for (_, rate) in report.fail_rate_by_check() {
            assert!((0.0..=1.0).contains(&rate));
        }
    }
}
