//! Property tests for statistics accumulation and reduction.

use evoke::AggregateStats;
use proptest::prelude::*;

proptest! {
    #[test]
    fn histogram_sum_equals_resolved(ranks in proptest::collection::vec(0usize..64, 0..200)) {
        let mut stats = AggregateStats::with_buckets(20);
        for rank in ranks {
            stats.record_rank(rank);
        }
        let sum: u64 = stats.rank_histogram.iter().sum();
        prop_assert_eq!(sum, stats.resolved);
    }

    #[test]
    fn coverage_bounded(resolved_ranks in proptest::collection::vec(0usize..30, 0..100), unknown in 0u64..100) {
        let mut stats = AggregateStats::with_buckets(20);
        for rank in resolved_ranks {
            stats.record_rank(rank);
        }
        stats.unknown = unknown;

        match stats.coverage() {
            Some(coverage) => {
                prop_assert!((0.0..=1.0).contains(&coverage));
                if unknown == 0 {
                    prop_assert_eq!(coverage, 1.0);
                }
            }
            None => prop_assert_eq!(stats.total_mentions(), 0),
        }
    }

    #[test]
    fn precision_at_is_monotone_and_ends_at_one(
        ranks in proptest::collection::vec(0usize..25, 1..100)
    ) {
        let mut stats = AggregateStats::with_buckets(20);
        for rank in ranks {
            stats.record_rank(rank);
        }

        let points = stats.precision_at();
        prop_assert!(!points.is_empty());
        let mut previous = 0.0;
        for &(_, precision) in &points {
            prop_assert!(precision >= previous);
            prop_assert!(precision <= 1.0 + 1e-12);
            previous = precision;
        }
        // The last cumulative point covers every resolved mention.
        let Some(&(_, last)) = points.last() else { unreachable!() };
        prop_assert!((last - 1.0).abs() < 1e-12);
    }

    #[test]
    fn merge_is_order_insensitive(
        a_ranks in proptest::collection::vec(0usize..20, 0..50),
        b_ranks in proptest::collection::vec(0usize..20, 0..50),
        a_unknown in 0u64..20,
        b_unknown in 0u64..20,
    ) {
        let mut a = AggregateStats::with_buckets(10);
        for rank in a_ranks { a.record_rank(rank); }
        a.unknown = a_unknown;
        a.docs = 1;

        let mut b = AggregateStats::with_buckets(15);
        for rank in b_ranks { b.record_rank(rank); }
        b.unknown = b_unknown;
        b.docs = 1;

        let mut ab = a.clone();
        ab.merge(&b);
        let mut ba = b.clone();
        ba.merge(&a);

        prop_assert_eq!(ab, ba);
    }

    #[test]
    fn merge_matches_sequential_accumulation(
        batches in proptest::collection::vec(
            proptest::collection::vec(0usize..20, 0..20),
            0..10
        )
    ) {
        // Recording everything into one accumulator must equal recording
        // per batch and merging, which is what parallel drivers do.
        let mut sequential = AggregateStats::with_buckets(20);
        let mut merged = AggregateStats::with_buckets(20);
        for batch in &batches {
            let mut per_batch = AggregateStats::with_buckets(20);
            for &rank in batch {
                sequential.record_rank(rank);
                per_batch.record_rank(rank);
            }
            per_batch.docs = 1;
            merged.merge(&per_batch);
        }
        merged.docs = 0; // sequential never counted documents
        prop_assert_eq!(sequential, merged);
    }
}
