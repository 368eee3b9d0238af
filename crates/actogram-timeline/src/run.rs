//! A single labeled run of ticks

use actogram_core::{ActivityLabel, ActogramError, ActogramResult};

/// One run in a sparse timeline: a maximal block of consecutive ticks
/// sharing a single activity label.
///
/// The duration is `None` on freshly ingested runs and is filled in by
/// [`crate::Timeline::derive_durations`]; `end()` is only defined once a
/// positive duration is set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Run {
    /// Activity name of this run
    pub name: ActivityLabel,
    /// Tick index of the first slot of the run
    pub start: usize,
    duration: Option<usize>,
}

impl Run {
    /// Create a run with a known duration in ticks.
    pub fn new(name: impl Into<ActivityLabel>, start: usize, duration: usize) -> Self {
        Run {
            name: name.into(),
            start,
            duration: Some(duration),
        }
    }

    /// Create a run whose duration has not been derived yet.
    pub fn pending(name: impl Into<ActivityLabel>, start: usize) -> Self {
        Run {
            name: name.into(),
            start,
            duration: None,
        }
    }

    #[inline]
    pub fn duration(&self) -> Option<usize> {
        self.duration
    }

    pub(crate) fn set_duration(&mut self, duration: usize) {
        self.duration = Some(duration);
    }

    /// End tick of the run (exclusive).
    pub fn end(&self) -> ActogramResult<usize> {
        match self.duration {
            Some(duration) if duration > 0 => Ok(self.start + duration),
            _ => Err(ActogramError::DurationPending),
        }
    }

    /// Expanded form of the run: its label repeated once per tick.
    ///
    /// The iterator is finite and can be restarted by calling `expand`
    /// again; it is empty while the duration is still pending.
    pub fn expand(&self) -> impl Iterator<Item = ActivityLabel> + '_ {
        std::iter::repeat_with(move || self.name.clone()).take(self.duration.unwrap_or(0))
    }

    /// Split at `boundary` and then at every `period` ticks up to the end
    /// of the run.
    ///
    /// The run must start before `boundary` but may end exactly on it.
    /// The returned pieces are contiguous, share this run's label, cover
    /// exactly the original range, and the last piece absorbs any
    /// remainder shorter than `period`.
    pub fn split(&self, boundary: usize, period: usize) -> ActogramResult<Vec<Run>> {
        if period == 0 {
            return Err(ActogramError::ZeroSegmentPeriod);
        }
        let end = self.end()?;
        if !(self.start < boundary && boundary <= end) {
            return Err(ActogramError::SplitBoundaryOutOfRange {
                boundary,
                start: self.start,
                end,
            });
        }
        let mut pieces = vec![Run::new(self.name.clone(), self.start, boundary - self.start)];
        let mut cursor = boundary;
        while cursor < end {
            let length = period.min(end - cursor);
            pieces.push(Run::new(self.name.clone(), cursor, length));
            cursor += length;
        }
        Ok(pieces)
    }
}
