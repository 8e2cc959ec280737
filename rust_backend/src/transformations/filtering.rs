use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::core::domain::CreSummaryRow;

/// Dashboard selections over summary rows.
///
/// Each list is a set of accepted values; an empty list accepts everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryFilter {
    #[serde(default)]
    pub team_leads: Vec<String>,
    #[serde(default)]
    pub pools: Vec<String>,
    #[serde(default)]
    pub cres: Vec<String>,
}

impl SummaryFilter {
    pub fn is_empty(&self) -> bool {
        self.team_leads.is_empty() && self.pools.is_empty() && self.cres.is_empty()
    }

    pub fn matches(&self, row: &CreSummaryRow) -> bool {
        accepts(&self.team_leads, &row.agent.team_lead)
            && accepts(&self.pools, &row.agent.pool)
            && accepts(&self.cres, &row.agent.full_name)
    }
}

fn accepts(selection: &[String], value: &str) -> bool {
    selection.is_empty() || selection.iter().any(|s| s == value)
}

/// Rows accepted by `filter`, in their original order.
pub fn filter_summary<'a>(rows: &'a [CreSummaryRow], filter: &SummaryFilter) -> Vec<&'a CreSummaryRow> {
    rows.iter().filter(|row| filter.matches(row)).collect()
}

/// Sorted distinct values offered by the dashboard selectors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub team_leads: Vec<String>,
    pub pools: Vec<String>,
    pub cres: Vec<String>,
}

pub fn distinct_options(rows: &[CreSummaryRow]) -> FilterOptions {
    let mut team_leads = BTreeSet::new();
    let mut pools = BTreeSet::new();
    let mut cres = BTreeSet::new();
    for row in rows {
        team_leads.insert(row.agent.team_lead.as_str());
        pools.insert(row.agent.pool.as_str());
        cres.insert(row.agent.full_name.as_str());
    }

    let owned = |set: BTreeSet<&str>| -> Vec<String> { set.into_iter().map(str::to_string).collect() };
    FilterOptions {
        team_leads: owned(team_leads),
        pools: owned(pools),
        cres: owned(cres),
    }
}
