// Copyright (c) 2025 CodeDNA Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Relationship reports over a labelled tree.

use std::fmt;

use serde::Serialize;

use super::SimilarityTree;
use crate::data_structures::similarity_trie::SimilarityTrieResult;

/// Score between two labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PairScore {
    pub a: String,
    pub b: String,
    pub score: usize,
}

/// One line of the family report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportLine {
    /// Display path of the label's node
    pub tree_path: String,

    pub label: String,

    /// Labels sharing history with this one, sorted
    pub family: Vec<String>,
}

impl fmt::Display for ReportLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t( {} ):\t{}", self.tree_path, self.label, self.family.join(" "))
    }
}

impl SimilarityTree {
    /// One line per label, sorted by tree path and then label.
    pub fn report(&self) -> SimilarityTrieResult<Vec<ReportLine>> {
        let mut lines = Vec::with_capacity(self.labels.len());
        for (label, _) in self.leaves() {
            lines.push(ReportLine {
                tree_path: self.tree_path(label)?,
                label: label.to_string(),
                family: self.family(label)?.into_iter().map(str::to_string).collect(),
            });
        }
        lines.sort_by(|x, y| (&x.tree_path, &x.label).cmp(&(&y.tree_path, &y.label)));
        Ok(lines)
    }

    /// Every other label scored against `label`, closest first.
    ///
    /// Ties are broken by label so the order is stable.
    pub fn ranked_matches(&self, label: &str) -> SimilarityTrieResult<Vec<PairScore>> {
        let node = self.node_for(label)?;
        let mut matches = Vec::with_capacity(self.labels.len().saturating_sub(1));
        for (other, other_node) in self.leaves() {
            if other == label {
                continue;
            }
            matches.push(PairScore {
                a: label.to_string(),
                b: other.to_string(),
                score: self.trie.similarity_score(node, other_node)?,
            });
        }
        matches.sort_by(|x, y| x.score.cmp(&y.score).then_with(|| x.b.cmp(&y.b)));
        Ok(matches)
    }

    /// Scores for every unordered pair of labels, in label order.
    pub fn pairwise_scores(&self) -> SimilarityTrieResult<Vec<PairScore>> {
        let leaves = self.leaves();
        let mut scores = Vec::new();
        for (i, (a, node_a)) in leaves.iter().enumerate() {
            for (b, node_b) in &leaves[i + 1..] {
                scores.push(PairScore {
                    a: a.to_string(),
                    b: b.to_string(),
                    score: self.trie.similarity_score(*node_a, *node_b)?,
                });
            }
        }
        Ok(scores)
    }
}
