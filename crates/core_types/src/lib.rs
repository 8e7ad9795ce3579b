use std::fmt;
use std::sync::Arc;

pub type UnixSeconds = u64;

/// DOM element identifier. Unique process-wide while the owning view is
/// mounted; cheap to clone and hash.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElemId(Arc<str>);

impl ElemId {
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ElemId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ElemId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for ElemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elem_id_round_trip() {
        let id = ElemId::from("banner");
        assert_eq!(id.as_str(), "banner");
        assert_eq!(id.to_string(), "banner");
    }

    #[test]
    fn elem_id_equality_and_hash() {
        use std::collections::HashSet;

        let mut set = HashSet::new();
        set.insert(ElemId::from("a"));
        set.insert(ElemId::from("b"));
        set.insert(ElemId::from("a"));
        assert_eq!(set.len(), 2);
    }
}
