//! Activity labels

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Name of an activity type, e.g. "sleep" or "work".
///
/// Labels are reference-counted so that expanding a timeline into one
/// label per tick stays cheap.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ActivityLabel(Arc<str>);

impl ActivityLabel {
    pub fn new(name: &str) -> Self {
        ActivityLabel(Arc::from(name))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ActivityLabel {
    fn from(name: &str) -> Self {
        ActivityLabel::new(name)
    }
}

impl From<String> for ActivityLabel {
    fn from(name: String) -> Self {
        ActivityLabel(Arc::from(name))
    }
}

impl Borrow<str> for ActivityLabel {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActivityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for ActivityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", &*self.0)
    }
}

/// Mapping from source activity names to target names, e.g. from
/// simulator-specific codes to a common activity vocabulary.
pub type ActivityMapping = HashMap<ActivityLabel, ActivityLabel>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_equality() {
        let a = ActivityLabel::new("sleep");
        let b: ActivityLabel = "sleep".into();
        assert_eq!(a, b);
        assert_ne!(a, ActivityLabel::new("work"));
    }

    #[test]
    fn test_label_clone_shares_storage() {
        let a = ActivityLabel::new("sleep");
        let b = a.clone();
        assert!(Arc::ptr_eq(&a.0, &b.0));
    }

    #[test]
    fn test_mapping_lookup_by_str() {
        let mut mapping = ActivityMapping::new();
        mapping.insert("A1".into(), "work".into());
        assert_eq!(mapping.get("A1").unwrap().as_str(), "work");
        assert!(mapping.get("A2").is_none());
    }
}
