//! Error types for the actogram engine

use thiserror::Error;

use crate::{ActivityLabel, DayTime, Resolution};

/// Engine errors, grouped by failure contract.
///
/// Argument errors are violated caller preconditions, state errors are
/// internal invariant violations on the current object, collection errors
/// are mismatches across a set of timelines. None of them are retried;
/// callers decide whether to skip the offending timeline.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActogramError {
    // Argument errors
    #[error("split boundary {boundary} outside of run range ({start}..={end}]")]
    SplitBoundaryOutOfRange {
        boundary: usize,
        start: usize,
        end: usize,
    },

    #[error("segment period must be positive")]
    ZeroSegmentPeriod,

    #[error("target resolution {target} is not an integer multiple of {current}")]
    NotAMultiple {
        current: Resolution,
        target: Resolution,
    },

    #[error("resolution {0} is not a divisor of one day")]
    NotADayDivisor(Resolution),

    #[error("{what} {time} is not aligned to resolution {resolution}")]
    MisalignedTime {
        what: &'static str,
        time: DayTime,
        resolution: Resolution,
    },

    #[error("no mapping for activity label {0:?}")]
    UnmappedLabel(ActivityLabel),

    #[error("timeline of {length} ticks is too short for resampling frames of {frame_length}")]
    TooShortForResampling { length: usize, frame_length: usize },

    #[error("run starts are not strictly ascending at index {index}")]
    UnorderedStarts { index: usize },

    #[error("profile end {end} does not lie after the last run start {last_start}")]
    ProfileEndTooEarly { end: usize, last_start: usize },

    // State errors
    #[error("timeline has no runs")]
    EmptyTimeline,

    #[error("run duration has not been derived yet")]
    DurationPending,

    #[error("run duration was already set to {0}")]
    DurationAlreadySet(usize),

    #[error("timeline must start at tick 0 but starts at {0}")]
    NotNormalized(usize),

    #[error(
        "run at tick {start} (duration {duration}) is not aligned to resampling frames of {frame_length}"
    )]
    FrameMisaligned {
        start: usize,
        duration: usize,
        frame_length: usize,
    },

    #[error("broken contiguity at run {index}: run ends at tick {end}, next starts at {next_start}")]
    BrokenContiguity {
        index: usize,
        end: usize,
        next_start: usize,
    },

    #[error("ran out of runs while filling the resampling frame starting at tick {frame_start}")]
    ResamplingFrameUnderrun { frame_start: usize },

    // Collection errors
    #[error("cannot build a grid from an empty set of timelines")]
    EmptyGrid,

    #[error("timeline {index} has mismatching {field}: expected {expected}, found {found}")]
    MismatchedGridMember {
        field: &'static str,
        index: usize,
        expected: String,
        found: String,
    },
}

/// Result type for actogram operations.
pub type ActogramResult<T> = Result<T, ActogramError>;
