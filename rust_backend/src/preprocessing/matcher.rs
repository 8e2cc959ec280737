//! Roster index and agent matching.
//!
//! The roster is indexed once per run by normalized identifier. Matching is
//! exact by default; the token fallback is only consulted when the caller opts
//! into [`MatchMode::FuzzyFallback`] and no exact entry exists.

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::core::domain::{MatchKind, RosterEntry};
use crate::parsing::names::{name_tokens, normalize_name};

/// How dialer identifiers are resolved against the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Normalized identifiers must be equal.
    #[default]
    Exact,
    /// Exact first, then a contiguous token-run match in roster order.
    FuzzyFallback,
}

/// Counts collected while building a [`RosterIndex`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterIndexStats {
    pub total_entries: usize,
    pub inactive_entries: usize,
    pub blank_identifiers: usize,
    pub missing_agent_keys: usize,
    pub duplicate_identifiers: usize,
    pub indexed_entries: usize,
}

/// Active roster entries keyed by normalized identifier.
///
/// Entries keep roster order so the fuzzy fallback is deterministic. When two
/// active rows normalize to the same identifier the first one wins.
#[derive(Debug, Clone, Default)]
pub struct RosterIndex {
    entries: Vec<RosterEntry>,
    tokens: Vec<Vec<String>>,
    by_name: HashMap<String, usize>,
    stats: RosterIndexStats,
}

impl RosterIndex {
    pub fn build(roster: &[RosterEntry]) -> Self {
        let mut index = RosterIndex {
            stats: RosterIndexStats {
                total_entries: roster.len(),
                ..RosterIndexStats::default()
            },
            ..RosterIndex::default()
        };

        for entry in roster {
            if !entry.active {
                index.stats.inactive_entries += 1;
                continue;
            }

            let key = normalize_name(&entry.identifier);
            if key.is_empty() {
                index.stats.blank_identifiers += 1;
                continue;
            }
            if entry.agent_key.trim().is_empty() {
                index.stats.missing_agent_keys += 1;
                continue;
            }
            if index.by_name.contains_key(&key) {
                debug!("Duplicate roster identifier '{}' ignored", key);
                index.stats.duplicate_identifiers += 1;
                continue;
            }

            index.by_name.insert(key.clone(), index.entries.len());
            index.tokens.push(name_tokens(&key));
            index.entries.push(entry.clone());
        }

        index.stats.indexed_entries = index.entries.len();
        index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> &RosterIndexStats {
        &self.stats
    }

    /// Indexed entries in roster order.
    pub fn entries(&self) -> &[RosterEntry] {
        &self.entries
    }

    pub fn get_exact(&self, normalized: &str) -> Option<&RosterEntry> {
        self.by_name.get(normalized).map(|&i| &self.entries[i])
    }

    /// First entry, in roster order, whose identifier tokens appear as a
    /// contiguous run inside `normalized`, or that contain it as one.
    pub fn find_fuzzy(&self, normalized: &str) -> Option<&RosterEntry> {
        let wanted = name_tokens(normalized);
        if wanted.is_empty() {
            return None;
        }
        self.tokens
            .iter()
            .position(|candidate| {
                contains_token_run(&wanted, candidate) || contains_token_run(candidate, &wanted)
            })
            .map(|i| &self.entries[i])
    }
}

fn contains_token_run(haystack: &[String], needle: &[String]) -> bool {
    !needle.is_empty()
        && needle.len() <= haystack.len()
        && haystack.windows(needle.len()).any(|w| w == needle)
}

/// A resolved roster entry together with the rule that found it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentMatch<'a> {
    pub entry: &'a RosterEntry,
    pub kind: MatchKind,
}

/// Resolves normalized dialer identifiers against a roster index.
#[derive(Debug, Clone)]
pub struct AgentMatcher<'a> {
    index: &'a RosterIndex,
    mode: MatchMode,
}

impl<'a> AgentMatcher<'a> {
    pub fn new(index: &'a RosterIndex, mode: MatchMode) -> Self {
        Self { index, mode }
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Matches an already-normalized identifier. Empty names never match.
    pub fn match_name(&self, normalized: &str) -> Option<AgentMatch<'a>> {
        if normalized.is_empty() {
            return None;
        }
        if let Some(entry) = self.index.get_exact(normalized) {
            return Some(AgentMatch {
                entry,
                kind: MatchKind::Exact,
            });
        }
        match self.mode {
            MatchMode::Exact => None,
            MatchMode::FuzzyFallback => self.index.find_fuzzy(normalized).map(|entry| AgentMatch {
                entry,
                kind: MatchKind::Fuzzy,
            }),
        }
    }
}

/// Exact lookup of a normalized name.
///
/// # Examples
///
/// ```
/// use cre_dialer::core::domain::RosterEntry;
/// use cre_dialer::preprocessing::matcher::{match_agent, RosterIndex};
///
/// let roster = vec![RosterEntry::new("Jane Doe", "J1", "Jane Doe", "A", "X")];
/// let index = RosterIndex::build(&roster);
///
/// assert_eq!(match_agent("jane doe", &index).map(|e| e.agent_key.as_str()), Some("J1"));
/// assert!(match_agent("john", &index).is_none());
/// ```
pub fn match_agent<'a>(normalized: &str, index: &'a RosterIndex) -> Option<&'a RosterEntry> {
    AgentMatcher::new(index, MatchMode::Exact)
        .match_name(normalized)
        .map(|m| m.entry)
}
