// src/skills/types.rs
use serde::{Deserialize, Serialize};
use std::collections::btree_map;
use std::collections::{BTreeMap, BTreeSet};

/// Lower-cases, trims and collapses inner whitespace.
pub fn normalize_skill(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Corpus key for a role: same rules as skills.
pub fn normalize_role(raw: &str) -> String {
    normalize_skill(raw)
}

/// Normalized, deduplicated skills.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct SkillSet(BTreeSet<String>);

impl SkillSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a skill; blank input is ignored.
    pub fn insert(&mut self, raw: &str) -> bool {
        let skill = normalize_skill(raw);
        if skill.is_empty() {
            return false;
        }
        self.0.insert(skill)
    }

    pub fn merge(&mut self, other: &SkillSet) {
        self.0.extend(other.0.iter().cloned());
    }

    pub fn contains(&self, raw: &str) -> bool {
        self.0.contains(&normalize_skill(raw))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }
}

impl<S: AsRef<str>> FromIterator<S> for SkillSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = SkillSet::new();
        for skill in iter {
            set.insert(skill.as_ref());
        }
        set
    }
}

impl From<Vec<String>> for SkillSet {
    fn from(skills: Vec<String>) -> Self {
        skills.into_iter().collect()
    }
}

impl From<SkillSet> for Vec<String> {
    fn from(set: SkillSet) -> Self {
        set.0.into_iter().collect()
    }
}

/// Role → skills, as persisted on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Corpus(BTreeMap<String, SkillSet>);

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the role's entry; never merges with what was there.
    pub fn replace(&mut self, role: &str, skills: SkillSet) -> Option<SkillSet> {
        self.0.insert(normalize_role(role), skills)
    }

    pub fn get(&self, role: &str) -> Option<&SkillSet> {
        self.0.get(&normalize_role(role))
    }

    pub fn roles(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, SkillSet> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
