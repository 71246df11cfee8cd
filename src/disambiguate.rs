// monojust/src/disambiguate.rs

use serde::Serialize;
use std::{
    collections::{HashMap, HashSet},
    path::{Path, PathBuf},
};
use tracing::debug;

use crate::{index::IndexedTarget, location};

/// One completion entry and the target it stands for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub display: String,
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub location: PathBuf,
}

/// Display strings are unique within a set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CandidateSet {
    entries: Vec<Candidate>,
}

impl CandidateSet {
    pub fn iter(&self) -> impl Iterator<Item = &Candidate> { self.entries.iter() }
    pub fn len(&self) -> usize { self.entries.len() }
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
    pub fn displays(&self) -> Vec<String> { self.entries.iter().map(|c| c.display.clone()).collect() }
    pub fn get(&self, display: &str) -> Option<&Candidate> { self.entries.iter().find(|c| c.display == display) }
}

impl IntoIterator for CandidateSet {
    type Item = Candidate;
    type IntoIter = std::vec::IntoIter<Candidate>;
    fn into_iter(self) -> Self::IntoIter { self.entries.into_iter() }
}

pub fn qualified_display(name: &str, token: &str) -> String { format!("{name} ({token})") }

/// Splits `name (@token)` back into its parts; anything else is a bare name.
pub fn split_display(display: &str) -> (&str, Option<&str>) {
    if let Some(rest) = display.strip_suffix(')')
        && let Some((name, token)) = rest.split_once(" (")
        && location::is_token(token)
    {
        return (name, Some(token));
    }
    (display, None)
}

/// Names declared once stay bare; names declared in several locations become
/// `name (@rel/path)`, except at the root which stays bare. Groups are emitted
/// in order of first appearance. A display string already emitted (two root
/// declarations of one name) is not repeated.
pub fn disambiguate(entries: &[IndexedTarget], repo_root: &Path) -> CandidateSet {
    let mut order: Vec<&str> = vec![];
    let mut groups: HashMap<&str, Vec<&IndexedTarget>> = HashMap::new();
    for e in entries {
        let name = e.target.name.as_str();
        groups.entry(name).or_insert_with(|| { order.push(name); vec![] }).push(e);
    }

    let mut seen = HashSet::new();
    let mut out = CandidateSet::default();
    for name in order {
        let group = &groups[name];
        for e in group {
            let display = if group.len() == 1 || e.location == repo_root {
                name.to_string()
            } else {
                match location::qualify(&e.location, repo_root) {
                    Some(token) => qualified_display(name, &token),
                    None => {
                        debug!(location = %e.location.display(), "location outside repository root; skipped");
                        continue;
                    }
                }
            };
            if !seen.insert(display.clone()) { continue; }
            out.entries.push(Candidate {
                display,
                name: name.to_string(),
                description: e.target.description.clone(),
                location: e.location.clone(),
            });
        }
    }
    out
}
