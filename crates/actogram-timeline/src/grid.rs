//! Dense grids of expanded activity profiles

use actogram_core::{
    ActivityLabel, ActogramError, ActogramResult, DayTime, ProfileCategory, Resolution,
};

use crate::run::Run;
use crate::timeline::Timeline;

/// A homogeneous set of expanded timelines: one row of per-tick labels
/// per source timeline, all sharing the same offset, resolution and
/// category. This is the shape handed to the statistics collaborator.
///
/// Rows are keyed by their index, which follows the order of the source
/// timelines.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimelineGrid {
    rows: Vec<Vec<ActivityLabel>>,
    offset: DayTime,
    resolution: Resolution,
    category: ProfileCategory,
}

impl TimelineGrid {
    /// Expand a collection of sparse timelines into a dense grid.
    ///
    /// Fails if any member disagrees on offset, resolution, category or
    /// expanded length; the error names the first mismatching field and
    /// member.
    pub fn from_timelines(timelines: &[Timeline]) -> ActogramResult<Self> {
        let first = timelines.first().ok_or(ActogramError::EmptyGrid)?;
        let offset = first.offset();
        let resolution = first.resolution();
        let category = first.category().clone();
        let mut rows: Vec<Vec<ActivityLabel>> = Vec::with_capacity(timelines.len());
        for (index, timeline) in timelines.iter().enumerate() {
            if timeline.offset() != offset {
                return Err(ActogramError::MismatchedGridMember {
                    field: "offset",
                    index,
                    expected: offset.to_string(),
                    found: timeline.offset().to_string(),
                });
            }
            if timeline.resolution() != resolution {
                return Err(ActogramError::MismatchedGridMember {
                    field: "resolution",
                    index,
                    expected: resolution.to_string(),
                    found: timeline.resolution().to_string(),
                });
            }
            if timeline.category() != &category {
                return Err(ActogramError::MismatchedGridMember {
                    field: "category",
                    index,
                    expected: category.to_string(),
                    found: timeline.category().to_string(),
                });
            }
            let row = timeline.expand()?;
            if let Some(previous) = rows.first() {
                if row.len() != previous.len() {
                    return Err(ActogramError::MismatchedGridMember {
                        field: "length",
                        index,
                        expected: previous.len().to_string(),
                        found: row.len().to_string(),
                    });
                }
            }
            rows.push(row);
        }
        Ok(TimelineGrid {
            rows,
            offset,
            resolution,
            category,
        })
    }

    /// Run-length encode every row back into a sparse timeline.
    ///
    /// Inverse of [`from_timelines`](Self::from_timelines) up to merging:
    /// adjacent equal labels in a row always collapse into a single run.
    pub fn to_timelines(&self) -> ActogramResult<Vec<Timeline>> {
        self.rows.iter().map(|row| self.row_to_timeline(row)).collect()
    }

    fn row_to_timeline(&self, row: &[ActivityLabel]) -> ActogramResult<Timeline> {
        let mut runs: Vec<Run> = Vec::new();
        let mut index = 0usize;
        while index < row.len() {
            let mut next = index + 1;
            while next < row.len() && row[next] == row[index] {
                next += 1;
            }
            runs.push(Run::new(row[index].clone(), index, next - index));
            index = next;
        }
        Timeline::new(runs, self.offset, self.resolution, self.category.clone())
    }

    /// Number of contained profiles.
    #[inline]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Shared row length in ticks.
    pub fn tick_count(&self) -> usize {
        self.rows.first().map(|row| row.len()).unwrap_or(0)
    }

    #[inline]
    pub fn rows(&self) -> &[Vec<ActivityLabel>] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&[ActivityLabel]> {
        self.rows.get(index).map(|row| row.as_slice())
    }

    #[inline]
    pub fn offset(&self) -> DayTime {
        self.offset
    }

    #[inline]
    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    #[inline]
    pub fn category(&self) -> &ProfileCategory {
        &self.category
    }
}


#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    const LABELS: &[&str] = &["sleep", "work", "eat", "travel"];

    fn arb_distinct_adjacent_timeline() -> impl Strategy<Value = Timeline> {
        prop::collection::vec((0..LABELS.len(), 1usize..20), 1..25).prop_map(|pairs| {
            let mut runs = Vec::with_capacity(pairs.len());
            let mut start = 0usize;
            let mut previous = usize::MAX;
            for (label_index, duration) in pairs {
                let index = if label_index == previous {
                    (label_index + 1) % LABELS.len()
                } else {
                    label_index
                };
                runs.push(Run::new(LABELS[index], start, duration));
                start += duration;
                previous = index;
            }
            Timeline::new(
                runs,
                DayTime::from_hours(4),
                Resolution::from_minutes(10),
                ProfileCategory::default(),
            )
            .unwrap()
        })
    }

    proptest! {
        #[test]
        fn prop_grid_round_trip(timeline in arb_distinct_adjacent_timeline()) {
            let grid = TimelineGrid::from_timelines(std::slice::from_ref(&timeline)).unwrap();
            let restored = grid.to_timelines().unwrap();
            prop_assert_eq!(restored[0].runs(), timeline.runs());
        }

        #[test]
        fn prop_grid_rows_match_expansion(timeline in arb_distinct_adjacent_timeline()) {
            let grid = TimelineGrid::from_timelines(std::slice::from_ref(&timeline)).unwrap();
            let expanded = timeline.expand().unwrap();
            prop_assert_eq!(grid.row(0).unwrap(), expanded.as_slice());
            prop_assert_eq!(grid.tick_count(), timeline.length().unwrap());
        }
    }
}
