use serde::Serialize;

use crate::core::domain::CreSummaryRow;

/// Headline figures shown above the CRE summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct KpiSummary {
    pub cre_count: usize,
    pub total_dials: u64,
    pub total_connected: u64,
    pub total_talk_secs: u64,
    pub avg_dials_per_cre: f64,
    /// Average talk seconds per connected call.
    pub avg_talk_secs: f64,
}

/// Computes KPIs over summary rows, typically after filtering.
///
/// # Examples
///
/// ```
/// use cre_dialer::transformations::kpis::compute_kpis;
///
/// let kpis = compute_kpis(Vec::new());
/// assert_eq!(kpis.total_dials, 0);
/// assert_eq!(kpis.avg_dials_per_cre, 0.0);
/// ```
pub fn compute_kpis<'a, I>(rows: I) -> KpiSummary
where
    I: IntoIterator<Item = &'a CreSummaryRow>,
{
    let mut kpis = KpiSummary::default();
    for row in rows {
        kpis.cre_count += 1;
        kpis.total_dials += u64::from(row.total_calls());
        kpis.total_connected += u64::from(row.connected_calls);
        kpis.total_talk_secs += row.total_talk_time().seconds();
    }

    if kpis.cre_count > 0 {
        kpis.avg_dials_per_cre = kpis.total_dials as f64 / kpis.cre_count as f64;
    }
    if kpis.total_connected > 0 {
        kpis.avg_talk_secs = kpis.total_talk_secs as f64 / kpis.total_connected as f64;
    }
    kpis
}
