//! Profile categories - passthrough demographic tags
//!
//! A category tag identifies the group a person-day belongs to (sex, work
//! status, day type, country). The timeline engine never interprets the
//! fields; it only clones and compares whole tags when grouping timelines.

use std::fmt;

/// Sex of a person.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sex {
    Female,
    Male,
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sex::Female => write!(f, "female"),
            Sex::Male => write!(f, "male"),
        }
    }
}

/// Working status of a person.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WorkStatus {
    FullTime,
    PartTime,
    Unemployed,
    Retired,
    Student,
    Undetermined,
}

impl WorkStatus {
    pub fn is_determined(&self) -> bool {
        !matches!(self, WorkStatus::Undetermined)
    }
}

impl fmt::Display for WorkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WorkStatus::FullTime => "full time",
            WorkStatus::PartTime => "part time",
            WorkStatus::Unemployed => "unemployed",
            WorkStatus::Retired => "retired",
            WorkStatus::Student => "student",
            WorkStatus::Undetermined => "undetermined",
        };
        f.write_str(s)
    }
}

/// Whether a diary day is a working day.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DayType {
    Work,
    NoWork,
    Undetermined,
}

impl fmt::Display for DayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DayType::Work => "work",
            DayType::NoWork => "no work",
            DayType::Undetermined => "undetermined",
        };
        f.write_str(s)
    }
}

/// Category of an activity profile: the characteristics of the person-day
/// it belongs to. Unset attributes are simply left out.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ProfileCategory {
    pub country: Option<String>,
    pub sex: Option<Sex>,
    pub work_status: Option<WorkStatus>,
    pub day_type: Option<DayType>,
}

impl ProfileCategory {
    pub fn new(
        country: Option<String>,
        sex: Option<Sex>,
        work_status: Option<WorkStatus>,
        day_type: Option<DayType>,
    ) -> Self {
        ProfileCategory {
            country,
            sex,
            work_status,
            day_type,
        }
    }

    /// Attribute values that are set, in canonical order.
    pub fn parts(&self) -> Vec<String> {
        let mut parts = Vec::new();
        if let Some(country) = &self.country {
            parts.push(country.clone());
        }
        if let Some(sex) = self.sex {
            parts.push(sex.to_string());
        }
        if let Some(work_status) = self.work_status {
            parts.push(work_status.to_string());
        }
        if let Some(day_type) = self.day_type {
            parts.push(day_type.to_string());
        }
        parts
    }
}

impl fmt::Display for ProfileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.parts().join("_"))
    }
}
