// src/skills/aggregator.rs
use super::types::{normalize_role, normalize_skill, Corpus};
use crate::error::ScrapeError;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Skills the user already has versus the ones the market asks for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AggregationResult {
    pub common: BTreeSet<String>,
    pub missing: BTreeSet<String>,
}

/// Compares against the union of every role in the corpus.
pub fn aggregate<S: AsRef<str>>(user_skills: &[S], corpus: &Corpus) -> AggregationResult {
    diff(
        user_skills,
        corpus.iter().flat_map(|(_, skills)| skills.iter()),
    )
}

/// Compares against a single role's entry.
pub fn aggregate_for_role<S: AsRef<str>>(
    user_skills: &[S],
    corpus: &Corpus,
    role: &str,
) -> Result<AggregationResult, ScrapeError> {
    let skills = corpus
        .get(role)
        .ok_or_else(|| ScrapeError::NotFound(normalize_role(role)))?;
    Ok(diff(user_skills, skills.iter()))
}

fn diff<'a, S: AsRef<str>>(
    user_skills: &[S],
    market: impl Iterator<Item = &'a String>,
) -> AggregationResult {
    let user: BTreeSet<String> = user_skills
        .iter()
        .map(|s| normalize_skill(s.as_ref()))
        .filter(|s| !s.is_empty())
        .collect();

    // normalized key -> lexicographically first corpus spelling
    let mut spellings: BTreeMap<String, &String> = BTreeMap::new();
    for skill in market {
        let key = normalize_skill(skill);
        if key.is_empty() {
            continue;
        }
        spellings
            .entry(key)
            .and_modify(|kept| {
                if skill < *kept {
                    *kept = skill;
                }
            })
            .or_insert(skill);
    }

    let mut result = AggregationResult::default();
    for (key, spelling) in spellings {
        if user.contains(&key) {
            result.common.insert(spelling.clone());
        } else {
            result.missing.insert(spelling.clone());
        }
    }
    result
}
