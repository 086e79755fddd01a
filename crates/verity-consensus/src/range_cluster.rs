//! Interval-overlap clustering of numeric answers

use std::collections::HashMap;
use verity_domain::NumericRange;

/// A connected group of overlapping ranges
#[derive(Debug, Clone, PartialEq)]
pub struct RangeCluster {
    /// Positions of the member responses, ascending
    pub member_indices: Vec<usize>,

    /// Canonical lower bound (rounded)
    pub low: f64,

    /// Canonical upper bound (rounded)
    pub high: f64,
}

impl RangeCluster {
    /// Number of members
    pub fn len(&self) -> usize {
        self.member_indices.len()
    }

    /// True when the cluster has no members
    pub fn is_empty(&self) -> bool {
        self.member_indices.is_empty()
    }

    /// Canonical bounds as a plausible range, if they are one
    pub fn canonical_range(&self) -> Option<NumericRange> {
        NumericRange::new(self.low, self.high)
    }
}

/// Interval-over-union of two ranges
///
/// Symmetric, 1.0 for identical ranges and 0.0 for disjoint ones.
///
/// # Examples
///
/// ```
/// use verity_consensus::range_cluster::iou;
/// use verity_domain::NumericRange;
///
/// let a = NumericRange::new(100_000.0, 110_000.0).unwrap();
/// let b = NumericRange::new(102_500.0, 107_500.0).unwrap();
/// assert_eq!(iou(&a, &b), 0.5);
/// ```
pub fn iou(a: &NumericRange, b: &NumericRange) -> f64 {
    let union = a.high.max(b.high) - a.low.min(b.low);
    if union <= 0.0 {
        return 0.0;
    }
    a.overlap(b) / union
}

/// Cluster ranges whose IoU reaches `threshold` into connected components
///
/// `ranges` pairs each parsed range with its response position. Canonical
/// bounds are rounded to multiples of `step`. Clusters are ordered by size,
/// largest first; equal sizes keep first-seen order.
pub fn cluster_ranges(ranges: &[(usize, NumericRange)], threshold: f64, step: f64) -> Vec<RangeCluster> {
    if ranges.is_empty() {
        return Vec::new();
    }

    let mut components = UnionFind::new(ranges.len());
    for i in 0..ranges.len() {
        for j in (i + 1)..ranges.len() {
            if iou(&ranges[i].1, &ranges[j].1) >= threshold {
                components.union(i, j);
            }
        }
    }

    // Group by root, remembering first appearance for a stable order
    let mut order: Vec<usize> = Vec::new();
    let mut groups: HashMap<usize, Vec<usize>> = HashMap::new();
    for i in 0..ranges.len() {
        let root = components.find(i);
        groups
            .entry(root)
            .or_insert_with(|| {
                order.push(root);
                Vec::new()
            })
            .push(i);
    }

    let mut clusters: Vec<RangeCluster> = order
        .into_iter()
        .filter_map(|root| groups.remove(&root))
        .map(|slots| {
            let members: Vec<&NumericRange> = slots.iter().map(|&s| &ranges[s].1).collect();
            let (low, high) = canonical_bounds(&members, step);
            let mut member_indices: Vec<usize> = slots.iter().map(|&s| ranges[s].0).collect();
            member_indices.sort_unstable();
            RangeCluster {
                member_indices,
                low,
                high,
            }
        })
        .collect();

    clusters.sort_by(|a, b| b.len().cmp(&a.len()));
    clusters
}

fn canonical_bounds(members: &[&NumericRange], step: f64) -> (f64, f64) {
    let lows: Vec<f64> = members.iter().map(|r| r.low).collect();
    let highs: Vec<f64> = members.iter().map(|r| r.high).collect();

    let mut low = median(&lows);
    let mut high = median(&highs);
    if high <= low {
        low = lows.iter().copied().fold(f64::INFINITY, f64::min);
        high = highs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    }

    let low = round_to_step(low, step);
    let high = round_to_step(high, step).max(low + step);
    (low, high)
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

fn round_to_step(value: f64, step: f64) -> f64 {
    (value / step).round() * step
}

struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
        }
    }

    fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut node = x;
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }
        root
    }

    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != rb {
            // Keep the earlier slot as root
            let (keep, merge) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.parent[merge] = keep;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(low: f64, high: f64) -> NumericRange {
        NumericRange::new(low, high).unwrap()
    }

    #[test]
    fn test_iou_identical_and_disjoint() {
        let a = range(100_000.0, 110_000.0);
        assert_eq!(iou(&a, &a), 1.0);
        assert_eq!(iou(&a, &range(120_000.0, 130_000.0)), 0.0);
    }

    #[test]
    fn test_two_overlapping_ranges_cluster() {
        let ranges = vec![
            (0, range(100_000.0, 110_000.0)),
            (1, range(102_500.0, 107_500.0)),
        ];
        let clusters = cluster_ranges(&ranges, 0.5, 5000.0);

        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].member_indices, vec![0, 1]);
        // Medians: low 101_250, high 108_750
        assert_eq!(clusters[0].low, 100_000.0);
        assert_eq!(clusters[0].high, 110_000.0);
    }

    #[test]
    fn test_transitive_components() {
        // a~b and b~c but a and c barely overlap
        let ranges = vec![
            (0, range(100_000.0, 110_000.0)),
            (1, range(103_000.0, 113_000.0)),
            (2, range(106_000.0, 116_000.0)),
            (3, range(200_000.0, 210_000.0)),
        ];
        let clusters = cluster_ranges(&ranges, 0.5, 5000.0);

        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].member_indices, vec![0, 1, 2]);
        assert_eq!(clusters[1].member_indices, vec![3]);
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let ranges = vec![
            (4, range(200_000.0, 210_000.0)),
            (7, range(100_000.0, 110_000.0)),
        ];
        let clusters = cluster_ranges(&ranges, 0.5, 5000.0);
        assert_eq!(clusters[0].member_indices, vec![4]);
        assert_eq!(clusters[1].member_indices, vec![7]);
    }

    #[test]
    fn test_narrow_range_is_widened_to_one_step() {
        let ranges = vec![(0, range(101_000.0, 102_000.0))];
        let clusters = cluster_ranges(&ranges, 0.5, 5000.0);
        assert_eq!(clusters[0].low, 100_000.0);
        assert_eq!(clusters[0].high, 105_000.0);
    }

    #[test]
    fn test_empty_input() {
        assert!(cluster_ranges(&[], 0.5, 5000.0).is_empty());
    }

    #[test]
    fn test_median_even_and_odd() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(&[4.0, 1.0, 2.0, 3.0]), 2.5);
    }

    #[test]
    fn test_round_half_away_from_zero() {
        assert_eq!(round_to_step(127_500.0, 5000.0), 130_000.0);
        assert_eq!(round_to_step(122_499.0, 5000.0), 120_000.0);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_range() -> impl Strategy<Value = NumericRange> {
        (10_000.0f64..1_000_000.0, 1.0f64..100_000.0)
            .prop_map(|(low, width)| NumericRange::new(low, low + width).unwrap())
    }

    proptest! {
        /// Property: IoU is symmetric, bounded, and 1 on the diagonal
        #[test]
        fn test_iou_symmetric(a in arb_range(), b in arb_range()) {
            let ab = iou(&a, &b);
            prop_assert_eq!(ab, iou(&b, &a));
            prop_assert!((0.0..=1.0).contains(&ab));
            prop_assert_eq!(iou(&a, &a), 1.0);
        }

        /// Property: every range lands in exactly one cluster
        #[test]
        fn test_cluster_partition(ranges in prop::collection::vec(arb_range(), 0..12)) {
            let indexed: Vec<(usize, NumericRange)> = ranges.into_iter().enumerate().collect();
            let clusters = cluster_ranges(&indexed, 0.5, 5000.0);

            let mut seen: Vec<usize> = clusters.iter().flat_map(|c| c.member_indices.clone()).collect();
            seen.sort_unstable();
            prop_assert_eq!(seen, (0..indexed.len()).collect::<Vec<_>>());

            for cluster in &clusters {
                prop_assert!(cluster.high >= cluster.low + 5000.0);
            }
        }
    }
}
