//! Aggregate resolution statistics.
//!
//! Each document produces its own [`AggregateStats`] (with `docs == 1`);
//! a corpus run reduces them with [`AggregateStats::merge`] or
//! [`merge_statistics`]. Keeping accumulation per-document lets a driver
//! parallelize across documents and merge afterwards without shared state.

use crate::resolver::DocumentResult;
use crate::Result;
use serde::{Deserialize, Serialize};

/// Default rank-histogram depth.
pub const DEFAULT_RANK_BUCKETS: usize = 20;

/// Counters for a document or a whole corpus run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateStats {
    /// Documents processed.
    pub docs: u64,
    /// Mentions whose evoked entity appeared among the candidates.
    pub resolved: u64,
    /// Mentions whose evoked entity was not covered by the phrase table.
    pub unknown: u64,
    /// Resolved mentions where raw phrase-table order alone would have
    /// ranked the evoked entity first but context re-ranking did not.
    pub prior_losses: u64,
    /// Count of resolved mentions per rank; ranks beyond the histogram
    /// depth share the last bucket.
    pub rank_histogram: Vec<u64>,
}

impl AggregateStats {
    /// Create empty statistics with a rank histogram of `buckets` buckets.
    #[must_use]
    pub fn with_buckets(buckets: usize) -> Self {
        Self {
            rank_histogram: vec![0; buckets.max(1)],
            ..Self::default()
        }
    }

    /// Record a resolved mention at a zero-based rank, capping at the last
    /// histogram bucket.
    pub fn record_rank(&mut self, rank: usize) {
        if self.rank_histogram.is_empty() {
            self.rank_histogram = vec![0; DEFAULT_RANK_BUCKETS];
        }
        let bucket = rank.min(self.rank_histogram.len() - 1);
        self.rank_histogram[bucket] += 1;
        self.resolved += 1;
    }

    /// Merge another set of counters into this one.
    ///
    /// The histogram grows to the longer of the two depths.
    pub fn merge(&mut self, other: &AggregateStats) {
        self.docs += other.docs;
        self.resolved += other.resolved;
        self.unknown += other.unknown;
        self.prior_losses += other.prior_losses;
        if self.rank_histogram.len() < other.rank_histogram.len() {
            self.rank_histogram.resize(other.rank_histogram.len(), 0);
        }
        for (bucket, &count) in other.rank_histogram.iter().enumerate() {
            self.rank_histogram[bucket] += count;
        }
    }

    /// Total mentions seen, resolved or not.
    #[must_use]
    pub fn total_mentions(&self) -> u64 {
        self.resolved + self.unknown
    }

    /// Fraction of mentions whose evoked entity was among the candidates.
    ///
    /// `None` when no mentions were seen at all; the degenerate case is
    /// explicit rather than a NaN.
    #[must_use]
    pub fn coverage(&self) -> Option<f64> {
        let total = self.total_mentions();
        if total == 0 {
            None
        } else {
            Some(self.resolved as f64 / total as f64)
        }
    }

    /// Cumulative precision at each rank with a nonzero histogram bucket.
    ///
    /// Returns `(rank, fraction)` pairs with one-based ranks: `(1, p)`
    /// means a fraction `p` of resolved mentions ranked first. Empty when
    /// nothing resolved.
    #[must_use]
    pub fn precision_at(&self) -> Vec<(usize, f64)> {
        if self.resolved == 0 {
            return Vec::new();
        }
        let mut out = Vec::new();
        let mut cumulative = 0u64;
        for (rank, &count) in self.rank_histogram.iter().enumerate() {
            if count == 0 {
                continue;
            }
            cumulative += count;
            out.push((rank + 1, cumulative as f64 / self.resolved as f64));
        }
        out
    }

    /// Format as a markdown table.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let mut table = String::from("| Metric | Value |\n|--------|-------|\n");
        table.push_str(&format!("| Documents | {} |\n", self.docs));
        table.push_str(&format!("| Resolved mentions | {} |\n", self.resolved));
        table.push_str(&format!("| Unknown mentions | {} |\n", self.unknown));
        table.push_str(&format!("| Prior losses | {} |\n", self.prior_losses));
        match self.coverage() {
            Some(coverage) => {
                table.push_str(&format!("| Coverage | {:.1}% |\n", coverage * 100.0));
            }
            None => table.push_str("| Coverage | n/a |\n"),
        }
        for (rank, precision) in self.precision_at() {
            table.push_str(&format!("| P@{rank} | {:.2}% |\n", precision * 100.0));
        }
        table
    }

    /// Serialize to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Report`] if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Reduce per-document results into corpus-level statistics.
pub fn merge_statistics<'a, I>(results: I) -> AggregateStats
where
    I: IntoIterator<Item = &'a DocumentResult>,
{
    let mut total = AggregateStats::default();
    for result in results {
        total.merge(&result.stats);
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coverage_degenerate() {
        let stats = AggregateStats::default();
        assert_eq!(stats.coverage(), None);
        assert!(stats.precision_at().is_empty());
    }

    #[test]
    fn test_coverage_full_when_no_unknown() {
        let mut stats = AggregateStats::with_buckets(5);
        stats.record_rank(0);
        stats.record_rank(1);
        assert_eq!(stats.coverage(), Some(1.0));
    }

    #[test]
    fn test_coverage_ratio() {
        let mut stats = AggregateStats::with_buckets(5);
        stats.record_rank(0);
        stats.unknown = 3;
        assert_eq!(stats.coverage(), Some(0.25));
    }

    #[test]
    fn test_rank_cap() {
        let mut stats = AggregateStats::with_buckets(3);
        stats.record_rank(0);
        stats.record_rank(7);
        stats.record_rank(100);
        assert_eq!(stats.rank_histogram, vec![1, 0, 2]);
        assert_eq!(stats.resolved, 3);
    }

    #[test]
    fn test_precision_at_is_cumulative() {
        let mut stats = AggregateStats::with_buckets(5);
        stats.record_rank(0);
        stats.record_rank(0);
        stats.record_rank(2);
        stats.record_rank(4);

        let p = stats.precision_at();
        assert_eq!(p, vec![(1, 0.5), (3, 0.75), (5, 1.0)]);
    }

    #[test]
    fn test_merge_grows_histogram() {
        let mut a = AggregateStats::with_buckets(2);
        a.record_rank(0);
        let mut b = AggregateStats::with_buckets(5);
        b.record_rank(4);
        b.unknown = 2;
        b.docs = 1;

        a.merge(&b);
        assert_eq!(a.rank_histogram.len(), 5);
        assert_eq!(a.resolved, 2);
        assert_eq!(a.unknown, 2);
        assert_eq!(a.docs, 1);
        assert_eq!(a.rank_histogram[0], 1);
        assert_eq!(a.rank_histogram[4], 1);
    }

    #[test]
    fn test_markdown_report() {
        let mut stats = AggregateStats::with_buckets(5);
        stats.docs = 2;
        stats.record_rank(0);
        stats.unknown = 1;

        let md = stats.to_markdown();
        assert!(md.contains("| Documents | 2 |"));
        assert!(md.contains("| Coverage | 50.0% |"));
        assert!(md.contains("| P@1 | 100.00% |"));
    }

    #[test]
    fn test_json_report_roundtrip() {
        let mut stats = AggregateStats::with_buckets(3);
        stats.record_rank(1);
        let json = stats.to_json().unwrap();
        let back: AggregateStats = serde_json::from_str(&json).unwrap();
        assert_eq!(back, stats);
    }
}
