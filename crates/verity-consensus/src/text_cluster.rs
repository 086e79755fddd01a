//! Greedy similarity clustering of free-text answers

use crate::text::{jaccard, token_set};
use std::collections::HashSet;

/// A group of answers that say roughly the same thing
#[derive(Debug, Clone, PartialEq)]
pub struct TextCluster {
    /// Positions of the member responses, in join order
    pub member_indices: Vec<usize>,

    /// Longest member raw text
    pub representative: String,
}

impl TextCluster {
    /// Number of members
    pub fn len(&self) -> usize {
        self.member_indices.len()
    }

    /// True when the cluster has no members
    pub fn is_empty(&self) -> bool {
        self.member_indices.is_empty()
    }
}

/// Cluster texts in a single greedy pass
///
/// Each text joins the first cluster whose representative reaches
/// `threshold` similarity, otherwise it opens a new one. The result depends on
/// input order; it is a partition of the input either way.
pub fn cluster_texts(texts: &[&str], threshold: f64) -> Vec<TextCluster> {
    struct Building {
        cluster: TextCluster,
        tokens: HashSet<String>,
    }

    let mut building: Vec<Building> = Vec::new();

    for (position, text) in texts.iter().enumerate() {
        let tokens = token_set(text);
        let joined = building
            .iter_mut()
            .find(|b| jaccard(&tokens, &b.tokens) >= threshold);

        match joined {
            Some(b) => {
                b.cluster.member_indices.push(position);
                if text.chars().count() > b.cluster.representative.chars().count() {
                    b.cluster.representative = (*text).to_string();
                    b.tokens = tokens;
                }
            }
            None => building.push(Building {
                cluster: TextCluster {
                    member_indices: vec![position],
                    representative: (*text).to_string(),
                },
                tokens,
            }),
        }
    }

    let mut clusters: Vec<TextCluster> = building.into_iter().map(|b| b.cluster).collect();
    clusters.sort_by(|a, b| b.len().cmp(&a.len()));
    clusters
}
