//! Sparse activity timelines and their transformations

use actogram_core::{
    ActivityLabel, ActivityMapping, ActogramError, ActogramResult, DayTime, ProfileCategory,
    Resolution,
};

use crate::run::Run;

/// How [`Timeline::apply_label_mapping`] treats labels missing from the
/// mapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnmappedPolicy {
    /// Fail on the first label without a mapping entry.
    Fail,
    /// Keep the original label unchanged.
    Keep,
}

/// A single sparse activity profile: one person's consecutive activities
/// over one or more days, stored as contiguous labeled runs on a tick
/// axis.
///
/// Invariants (validated on construction and re-checked after every
/// transformation that could disturb them):
/// - at least one run
/// - runs are contiguous: each run ends exactly where the next one starts
/// - all durations are positive, except that the final run's duration may
///   still be pending before derivation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Timeline {
    runs: Vec<Run>,
    offset: DayTime,
    resolution: Resolution,
    category: ProfileCategory,
    source_id: Option<String>,
}

impl Timeline {
    /// Create a timeline from a pre-built run list, validating the
    /// timeline invariants.
    pub fn new(
        runs: Vec<Run>,
        offset: DayTime,
        resolution: Resolution,
        category: ProfileCategory,
    ) -> ActogramResult<Self> {
        Self::check_runs(&runs)?;
        Ok(Timeline {
            runs,
            offset,
            resolution,
            category,
            source_id: None,
        })
    }

    /// Build a timeline from the ingestion shape: ordered
    /// `(label, start_tick)` pairs plus an optional explicit profile end.
    ///
    /// The tick axis is shifted so the first activity starts at tick 0
    /// and all durations are derived. Without an explicit end the length
    /// of the final activity is unknowable, so that run is discarded.
    pub fn from_starts(
        starts: impl IntoIterator<Item = (ActivityLabel, usize)>,
        offset: DayTime,
        resolution: Resolution,
        category: ProfileCategory,
        profile_end: Option<usize>,
    ) -> ActogramResult<Self> {
        if resolution.ticks_in(offset.as_secs()).is_none() {
            return Err(ActogramError::MisalignedTime {
                what: "profile offset",
                time: offset,
                resolution,
            });
        }
        let runs: Vec<Run> = starts
            .into_iter()
            .map(|(name, start)| Run::pending(name, start))
            .collect();
        if runs.is_empty() {
            return Err(ActogramError::EmptyTimeline);
        }
        let mut timeline = Timeline {
            runs,
            offset,
            resolution,
            category,
            source_id: None,
        };
        timeline.normalize_offset();
        timeline.derive_durations(profile_end)?;
        if profile_end.is_none() {
            timeline.runs.pop();
            if timeline.runs.is_empty() {
                return Err(ActogramError::EmptyTimeline);
            }
        }
        Ok(timeline)
    }

    /// Attach a diagnostic source label (e.g. the originating file name).
    pub fn with_source_id(mut self, source_id: impl Into<String>) -> Self {
        self.source_id = Some(source_id.into());
        self
    }

    #[inline]
    pub fn runs(&self) -> &[Run] {
        &self.runs
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

    #[inline]
    pub fn source_id(&self) -> Option<&str> {
        self.source_id.as_deref()
    }

    /// First covered tick.
    pub fn start(&self) -> usize {
        self.runs.first().map(|run| run.start).unwrap_or(0)
    }

    /// One past the last covered tick.
    pub fn end(&self) -> ActogramResult<usize> {
        match self.runs.last() {
            Some(run) => run.end(),
            None => Err(ActogramError::EmptyTimeline),
        }
    }

    /// Number of covered ticks.
    pub fn length(&self) -> ActogramResult<usize> {
        Ok(self.end()? - self.start())
    }

    /// Covered wall-clock time in seconds.
    pub fn total_duration_secs(&self) -> ActogramResult<i64> {
        Ok(self.length()? as i64 * self.resolution.as_secs() as i64)
    }

    /// Shift all runs so that the first one starts at tick 0.
    pub fn normalize_offset(&mut self) {
        let shift = self.start();
        if shift == 0 {
            return;
        }
        for run in &mut self.runs {
            run.start -= shift;
        }
    }

    /// Derive every run's duration from the start of its successor.
    ///
    /// Must run exactly once, before any other transform touches
    /// durations; a non-last run with a duration already set is an error.
    /// The final run's duration is only set when `profile_end` is given;
    /// otherwise it stays pending and the caller is expected to discard
    /// that run.
    pub fn derive_durations(&mut self, profile_end: Option<usize>) -> ActogramResult<()> {
        if self.runs.is_empty() {
            return Err(ActogramError::EmptyTimeline);
        }
        let count = self.runs.len();
        for i in 0..count - 1 {
            if let Some(duration) = self.runs[i].duration() {
                return Err(ActogramError::DurationAlreadySet(duration));
            }
            let start = self.runs[i].start;
            let next_start = self.runs[i + 1].start;
            if next_start <= start {
                return Err(ActogramError::UnorderedStarts { index: i + 1 });
            }
            self.runs[i].set_duration(next_start - start);
        }
        if let (Some(end), Some(last)) = (profile_end, self.runs.last_mut()) {
            if end <= last.start {
                return Err(ActogramError::ProfileEndTooEarly {
                    end,
                    last_start: last.start,
                });
            }
            last.set_duration(end - last.start);
        }
        Ok(())
    }

    /// Whether the first and last run share the same activity, i.e. an
    /// activity such as sleep straddles the axis boundary of a daily
    /// profile.
    pub fn is_wraparound_same(&self) -> bool {
        match (self.runs.first(), self.runs.last()) {
            (Some(first), Some(last)) => first.name == last.name,
            _ => false,
        }
    }

    /// Run list with the first and last run fused into one, if they share
    /// an activity.
    ///
    /// The merged run sits at the last run's start with the combined
    /// duration, so total covered duration is unchanged, but the list no
    /// longer starts at tick 0. It is meant for aggregate consumption,
    /// not for further splitting. Does not mutate the timeline.
    pub fn merged_wraparound_runs(&self) -> ActogramResult<Vec<Run>> {
        if !self.is_wraparound_same() || self.runs.len() == 1 {
            return Ok(self.runs.clone());
        }
        let first = &self.runs[0];
        let last = &self.runs[self.runs.len() - 1];
        let first_duration = first.duration().ok_or(ActogramError::DurationPending)?;
        let last_duration = last.duration().ok_or(ActogramError::DurationPending)?;
        let merged = Run::new(first.name.clone(), last.start, first_duration + last_duration);
        let mut runs = self.runs[1..self.runs.len() - 1].to_vec();
        runs.push(merged);
        Ok(runs)
    }

    /// Merge every stretch of consecutive runs sharing the same name into
    /// a single run. Necessary after label remapping, which commonly maps
    /// formerly distinct labels onto the same target.
    pub fn merge_adjacent_same_name(&mut self) -> ActogramResult<()> {
        let before_start = self.start();
        let before_end = self.end()?;
        let mut merged: Vec<Run> = Vec::with_capacity(self.runs.len());
        for run in self.runs.drain(..) {
            match merged.last_mut() {
                Some(previous) if previous.name == run.name => {
                    let end = run.end()?;
                    match end.checked_sub(previous.start) {
                        Some(duration) if duration > 0 => previous.set_duration(duration),
                        _ => {
                            return Err(ActogramError::BrokenContiguity {
                                index: merged.len() - 1,
                                end,
                                next_start: run.start,
                            })
                        }
                    }
                }
                _ => merged.push(run),
            }
        }
        self.runs = merged;
        Self::check_runs(&self.runs)?;
        if self.start() != before_start || self.end()? != before_end {
            return Err(ActogramError::BrokenContiguity {
                index: 0,
                end: self.end()?,
                next_start: before_end,
            });
        }
        Ok(())
    }

    /// Replace every run's activity name through `mapping`, then merge
    /// adjacent runs that ended up with the same name.
    ///
    /// With [`UnmappedPolicy::Fail`] the timeline is left untouched if
    /// any label has no mapping entry.
    pub fn apply_label_mapping(
        &mut self,
        mapping: &ActivityMapping,
        policy: UnmappedPolicy,
    ) -> ActogramResult<()> {
        if policy == UnmappedPolicy::Fail {
            if let Some(run) = self
                .runs
                .iter()
                .find(|run| !mapping.contains_key(run.name.as_str()))
            {
                return Err(ActogramError::UnmappedLabel(run.name.clone()));
            }
        }
        for run in &mut self.runs {
            if let Some(target) = mapping.get(run.name.as_str()) {
                run.name = target.clone();
            }
        }
        self.merge_adjacent_same_name()
    }

    /// Downsample in place to a coarser resolution by majority-duration
    /// vote per frame of `frame_length = target / current` ticks.
    ///
    /// The timeline must already be normalized to start at tick 0, the
    /// target resolution must be an integer multiple of the current one
    /// and a divisor of one day, and the timeline must cover at least one
    /// full frame. Trailing ticks beyond the last complete frame are
    /// discarded. Ties are broken in favor of the run encountered first.
    pub fn resample(&mut self, target: Resolution) -> ActogramResult<()> {
        let frame_length =
            self.resolution
                .frame_length(target)
                .ok_or(ActogramError::NotAMultiple {
                    current: self.resolution,
                    target,
                })?;
        if !target.divides_day() {
            return Err(ActogramError::NotADayDivisor(target));
        }
        if self.start() != 0 {
            return Err(ActogramError::NotNormalized(self.start()));
        }
        self.check_contiguity()?;
        let length = self.length()?;
        if length < frame_length {
            return Err(ActogramError::TooShortForResampling {
                length,
                frame_length,
            });
        }
        if frame_length == 1 {
            self.resolution = target;
            return Ok(());
        }
        let original_count = self.runs.len();
        // new end tick: only complete frames survive
        let end = length / frame_length * frame_length;
        // walk over the run list by index; winners and losers of a frame
        // are mutated through their index to keep the bookkeeping simple
        let mut index = 0usize;
        let mut winners: Vec<usize> = Vec::new();
        let mut frame_start = 0usize;
        while frame_start < end {
            let frame_end = frame_start + frame_length;
            // collect the runs intersecting this frame
            let first = index;
            let mut last = index;
            while self.runs[last].end()? < frame_end {
                last += 1;
                if last >= self.runs.len() {
                    return Err(ActogramError::ResamplingFrameUnderrun { frame_start });
                }
            }
            if self.runs[last].end()? == frame_end {
                // this run is not relevant for the next frame anymore
                index = last + 1;
            } else {
                index = last;
            }
            if first == last {
                // a single run spans the whole frame and wins it outright
                if winners.last() != Some(&first) {
                    winners.push(first);
                }
                frame_start = frame_end;
                continue;
            }
            // find the run with the largest time share inside the frame;
            // ties go to the earliest run
            let mut winner = first;
            let mut winner_share = 0i64;
            for i in first..=last {
                let run = &self.runs[i];
                let mut share = run.duration().ok_or(ActogramError::DurationPending)? as i64;
                if i == first {
                    share -= frame_start as i64 - run.start as i64;
                }
                if i == last {
                    share -= run.end()? as i64 - frame_end as i64;
                }
                if share > winner_share {
                    winner_share = share;
                    winner = i;
                }
            }
            // the winning run is stretched to cover the frame exactly
            let new_start = self.runs[winner].start.min(frame_start);
            let new_end = self.runs[winner].end()?.max(frame_end);
            self.runs[winner].start = new_start;
            self.runs[winner].set_duration(new_end - new_start);
            // losers crossing the frame boundaries are trimmed back
            if winner != first && self.runs[first].start < frame_start {
                let trimmed = frame_start - self.runs[first].start;
                self.runs[first].set_duration(trimmed);
            }
            if winner != last && self.runs[last].end()? > frame_end {
                let overhang = self.runs[last].end()? - frame_end;
                self.runs[last].start = frame_end;
                self.runs[last].set_duration(overhang);
            }
            if winners.last() != Some(&winner) {
                winners.push(winner);
            }
            frame_start = frame_end;
        }
        let mut new_runs: Vec<Run> = winners.iter().map(|&i| self.runs[i].clone()).collect();
        // the last winner may overhang into the discarded remainder
        if let Some(last) = new_runs.last_mut() {
            if last.end()? != end {
                last.set_duration(end - last.start);
            }
        }
        // re-express starts and durations in target-resolution ticks;
        // non-exact divisions mean the frame bookkeeping above is broken
        for run in &mut new_runs {
            let duration = run.duration().ok_or(ActogramError::DurationPending)?;
            if run.start % frame_length != 0 || duration % frame_length != 0 {
                return Err(ActogramError::FrameMisaligned {
                    start: run.start,
                    duration,
                    frame_length,
                });
            }
            run.start /= frame_length;
            run.set_duration(duration / frame_length);
        }
        Self::check_runs(&new_runs)?;
        let dropped = original_count - new_runs.len();
        self.runs = new_runs;
        self.resolution = target;
        tracing::info!(dropped_runs = dropped, "resampled timeline to {}", target);
        Ok(())
    }

    /// Split into consecutive segments of `segment_period` ticks at a
    /// recurring boundary whose first occurrence lies `phase_offset`
    /// ticks after tick 0 (normalized into the first period if outside
    /// it).
    ///
    /// Every emitted child timeline starts at a boundary, except that the
    /// first child keeps the parent's leading partial segment and the
    /// last child carries the trailing partial segment, so the children
    /// cover the parent exactly.
    pub fn split_into_segments(
        &self,
        segment_period: usize,
        phase_offset: i64,
    ) -> ActogramResult<Vec<Timeline>> {
        if segment_period == 0 {
            return Err(ActogramError::ZeroSegmentPeriod);
        }
        let child_offset = self.offset.advanced_by_ticks(phase_offset, self.resolution);
        let mut next_split = phase_offset.rem_euclid(segment_period as i64);
        if next_split == 0 {
            // a boundary at tick 0 splits nothing; the first one is a
            // full period later
            next_split = segment_period as i64;
        }
        let mut segments: Vec<Timeline> = Vec::new();
        let mut buffer: Vec<Run> = Vec::new();
        for run in &self.runs {
            let run_end = run.end()? as i64;
            if run_end < next_split {
                buffer.push(run.clone());
                continue;
            }
            // the run lasts over or until the boundary
            let pieces = run.split(next_split as usize, segment_period)?;
            buffer.push(pieces[0].clone());
            segments.push(self.child(std::mem::take(&mut buffer), child_offset)?);
            let interior: &[Run] = if (run_end - next_split) % segment_period as i64 == 0 {
                // the run ends exactly on a boundary: nothing carries
                // over into the next segment
                next_split += (segment_period * pieces.len()) as i64;
                &pieces[1..]
            } else {
                // the final piece seeds the next segment
                buffer.push(pieces[pieces.len() - 1].clone());
                next_split += (segment_period * (pieces.len() - 1)) as i64;
                &pieces[1..pieces.len() - 1]
            };
            // whole-period middle pieces become single-run children
            for piece in interior {
                segments.push(self.child(vec![piece.clone()], child_offset)?);
            }
        }
        // the trailing partial segment is still a valid child
        if !buffer.is_empty() {
            segments.push(self.child(buffer, child_offset)?);
        }
        Ok(segments)
    }

    /// Split a multi-day timeline into single-day children at the given
    /// wall-clock day change time (e.g. 04:00 each day).
    pub fn split_into_days(&self, day_change_time: DayTime) -> ActogramResult<Vec<Timeline>> {
        let ticks_per_day = self
            .resolution
            .ticks_per_day()
            .ok_or(ActogramError::NotADayDivisor(self.resolution))?;
        let phase_secs = day_change_time.signed_secs_since(self.offset);
        let phase =
            self.resolution
                .ticks_in(phase_secs)
                .ok_or(ActogramError::MisalignedTime {
                    what: "day change time",
                    time: day_change_time,
                    resolution: self.resolution,
                })?;
        self.split_into_segments(ticks_per_day, phase)
    }

    /// Dense form of the timeline: one label per covered tick.
    pub fn expand(&self) -> ActogramResult<Vec<ActivityLabel>> {
        self.check_contiguity()?;
        let length = self.length()?;
        let mut slots = Vec::with_capacity(length);
        for run in &self.runs {
            slots.extend(run.expand());
        }
        Ok(slots)
    }

    /// Lazy variant of [`expand`](Self::expand): yields one label per
    /// tick without materializing the row.
    pub fn iter_slots(&self) -> impl Iterator<Item = ActivityLabel> + '_ {
        self.runs.iter().flat_map(|run| run.expand())
    }

    /// Verify the run contiguity invariant end-to-end.
    pub fn check_contiguity(&self) -> ActogramResult<()> {
        Self::check_runs(&self.runs)
    }

    fn check_runs(runs: &[Run]) -> ActogramResult<()> {
        if runs.is_empty() {
            return Err(ActogramError::EmptyTimeline);
        }
        for (index, pair) in runs.windows(2).enumerate() {
            let end = pair[0].end()?;
            if end != pair[1].start {
                return Err(ActogramError::BrokenContiguity {
                    index,
                    end,
                    next_start: pair[1].start,
                });
            }
        }
        if let Some(last) = runs.last() {
            if last.duration() == Some(0) {
                return Err(ActogramError::DurationPending);
            }
        }
        Ok(())
    }

    fn child(&self, runs: Vec<Run>, offset: DayTime) -> ActogramResult<Timeline> {
        Timeline::new(runs, offset, self.resolution, self.category.clone())
    }
}


#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    const LABELS: &[&str] = &["sleep", "work", "eat", "travel", "leisure"];

    fn build_timeline(pairs: Vec<(usize, usize)>, resolution: Resolution) -> Timeline {
        let mut runs = Vec::with_capacity(pairs.len());
        let mut start = 0usize;
        let mut previous = usize::MAX;
        for (label_index, duration) in pairs {
            // avoid pre-merged adjacent duplicates, which a single
            // unmapped timeline never contains
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
            resolution,
            ProfileCategory::default(),
        )
        .unwrap()
    }

    fn arb_minute_timeline() -> impl Strategy<Value = Timeline> {
        prop::collection::vec((0..LABELS.len(), 1usize..40), 1..30)
            .prop_map(|pairs| build_timeline(pairs, Resolution::from_minutes(1)))
    }

    fn arb_hour_timeline() -> impl Strategy<Value = Timeline> {
        prop::collection::vec((0..LABELS.len(), 1usize..30), 1..20)
            .prop_map(|pairs| build_timeline(pairs, Resolution::from_hours(1)))
    }

    proptest! {
        #[test]
        fn prop_resample_conserves_length_and_contiguity(
            timeline in arb_minute_timeline(),
            frame in prop::sample::select(vec![2usize, 3, 4, 5, 6, 8, 10]),
        ) {
            let mut timeline = timeline;
            let length = timeline.length().unwrap();
            prop_assume!(length >= frame);
            timeline.resample(Resolution::from_minutes(frame as u32)).unwrap();
            prop_assert_eq!(timeline.length().unwrap(), length / frame);
            prop_assert_eq!(timeline.start(), 0);
            timeline.check_contiguity().unwrap();
        }

        #[test]
        fn prop_day_split_conserves_duration(timeline in arb_hour_timeline()) {
            let days = timeline.split_into_days(DayTime::from_hours(4)).unwrap();
            let total: usize = days.iter().map(|d| d.length().unwrap()).sum();
            prop_assert_eq!(total, timeline.length().unwrap());
            for day in &days {
                day.check_contiguity().unwrap();
                prop_assert!(day.length().unwrap() <= 24);
            }
        }

        #[test]
        fn prop_merge_adjacent_is_idempotent(timeline in arb_minute_timeline()) {
            let mut mapped = timeline;
            // collapse the label alphabet so adjacent duplicates appear
            let mapping: ActivityMapping = LABELS
                .iter()
                .map(|&label| {
                    let target = if label == "sleep" { "rest" } else { "active" };
                    (label.into(), target.into())
                })
                .collect();
            mapped.apply_label_mapping(&mapping, UnmappedPolicy::Fail).unwrap();
            let once = mapped.runs().to_vec();
            mapped.merge_adjacent_same_name().unwrap();
            prop_assert_eq!(mapped.runs(), &once[..]);
        }

        #[test]
        fn prop_expand_length_matches(timeline in arb_minute_timeline()) {
            let slots = timeline.expand().unwrap();
            prop_assert_eq!(slots.len(), timeline.length().unwrap());
        }
    }
}
