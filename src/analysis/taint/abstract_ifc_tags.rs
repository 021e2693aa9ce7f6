use std::collections::BTreeSet;

use itertools::Itertools;

use crate::analysis::fixpoint::AbstractDomain;

pub type TagId = u64;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct TagSets {
    secrecy: BTreeSet<TagId>,
    integrity: BTreeSet<TagId>,
}

/// Secrecy and integrity tags of a single value, or `Bottom` when nothing is
/// known about it. `Bottom` is never equal to the empty pair.
///
/// Values are replaced, never updated in place: every modifier returns a
/// new element and leaves `Bottom` untouched.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AbstractIfcTags(Option<TagSets>);

impl AbstractIfcTags {
    pub fn new(
        secrecy: impl IntoIterator<Item = TagId>,
        integrity: impl IntoIterator<Item = TagId>,
    ) -> Self {
        AbstractIfcTags(Some(TagSets {
            secrecy: secrecy.into_iter().collect(),
            integrity: integrity.into_iter().collect(),
        }))
    }

    pub fn empty() -> Self {
        Self::new([], [])
    }

    pub fn bottom() -> Self {
        AbstractIfcTags(None)
    }

    pub fn is_bottom(&self) -> bool {
        self.0.is_none()
    }

    pub fn is_equivalent_to(&self, other: &AbstractIfcTags) -> bool {
        self == other
    }

    fn sets(&self, what: &str) -> &TagSets {
        match &self.0 {
            Some(sets) => sets,
            None => panic!("Cannot read {} tags of Bottom", what),
        }
    }

    pub fn secrecy_tags(&self) -> &BTreeSet<TagId> {
        &self.sets("secrecy").secrecy
    }

    pub fn integrity_tags(&self) -> &BTreeSet<TagId> {
        &self.sets("integrity").integrity
    }

    pub fn has_integrity(&self, tag: TagId) -> bool {
        self.integrity_tags().contains(&tag)
    }

    pub fn has_no_secrecy(&self) -> bool {
        self.secrecy_tags().is_empty()
    }

    fn map_sets(&self, f: impl FnOnce(&mut TagSets)) -> Self {
        match &self.0 {
            Some(sets) => {
                let mut sets = sets.clone();
                f(&mut sets);
                AbstractIfcTags(Some(sets))
            }
            None => AbstractIfcTags::bottom(),
        }
    }

    pub fn add_secrecy(&self, tag: TagId) -> Self {
        self.map_sets(|s| {
            s.secrecy.insert(tag);
        })
    }

    pub fn remove_secrecy(&self, tag: TagId) -> Self {
        self.map_sets(|s| {
            s.secrecy.remove(&tag);
        })
    }

    pub fn add_integrity(&self, tag: TagId) -> Self {
        self.map_sets(|s| {
            s.integrity.insert(tag);
        })
    }

    pub fn remove_integrity(&self, tag: TagId) -> Self {
        self.map_sets(|s| {
            s.integrity.remove(&tag);
        })
    }

    pub fn with_integrity(&self, integrity: BTreeSet<TagId>) -> Self {
        self.map_sets(|s| s.integrity = integrity)
    }

    pub fn clear_integrity(&self) -> Self {
        self.with_integrity(BTreeSet::new())
    }

    /// Least upper bound. Secrecy grows by union while integrity shrinks by
    /// intersection; `Bottom` is the identity.
    pub fn join(&self, other: &AbstractIfcTags) -> AbstractIfcTags {
        match (&self.0, &other.0) {
            (None, _) => other.clone(),
            (_, None) => self.clone(),
            (Some(a), Some(b)) => AbstractIfcTags(Some(TagSets {
                secrecy: a.secrecy.union(&b.secrecy).copied().collect(),
                integrity: a.integrity.intersection(&b.integrity).copied().collect(),
            })),
        }
    }

    pub fn to_string(&self, tag_names: &[String]) -> String {
        let render = |tags: &BTreeSet<TagId>| {
            tags.iter()
                .map(|t| {
                    tag_names
                        .get(*t as usize)
                        .cloned()
                        .unwrap_or_else(|| format!("#{t}"))
                })
                .join(", ")
        };
        match &self.0 {
            None => "Bottom".to_string(),
            Some(sets) => format!("({{{}}}, {{{}}})", render(&sets.secrecy), render(&sets.integrity)),
        }
    }
}

impl AbstractDomain for AbstractIfcTags {
    fn bottom() -> Self {
        AbstractIfcTags::bottom()
    }

    fn join(&self, other: &Self) -> Self {
        AbstractIfcTags::join(self, other)
    }

    fn is_equivalent_to(&self, other: &Self) -> bool {
        AbstractIfcTags::is_equivalent_to(self, other)
    }
}
