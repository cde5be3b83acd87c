//! Per-chart aggregations over a [`FilteredView`].
//!
//! Every function here is a pure transform of the view; they can run in any
//! order and share nothing.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::filter::FilteredView;
use super::model::{Column, Transaction};

/// Order by `f64` descending, then label ascending.
fn desc_then_label(a: (f64, &str), b: (f64, &str)) -> Ordering {
    b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1))
}

fn value_sum<'a>(rows: impl IntoIterator<Item = &'a Transaction>) -> f64 {
    rows.into_iter().filter_map(|r| r.value).sum()
}

// ---------------------------------------------------------------------------
// Counts by category
// ---------------------------------------------------------------------------

/// Row count of one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountEntry {
    pub label: String,
    pub count: usize,
    /// Fraction of all counted rows, in `0.0..=1.0`.
    pub share: f64,
}

/// Count rows per value of `column`, most frequent first.
pub fn value_counts(view: &FilteredView<'_>, column: Column) -> Vec<CountEntry> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for row in view.rows() {
        *counts.entry(row.get(column)).or_default() += 1;
    }

    let total = view.len().max(1) as f64;
    let mut entries: Vec<CountEntry> = counts
        .into_iter()
        .map(|(label, count)| CountEntry {
            label: label.to_string(),
            count,
            share: count as f64 / total,
        })
        .collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    entries
}

// ---------------------------------------------------------------------------
// Two-level counts
// ---------------------------------------------------------------------------

/// A dense `rows × columns` count table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossCounts {
    /// Outer labels, ascending.
    pub rows: Vec<String>,
    /// Inner labels, ascending. Every row has a cell for each.
    pub columns: Vec<String>,
    pub cells: BTreeMap<String, BTreeMap<String, usize>>,
}

impl CrossCounts {
    pub fn get(&self, row: &str, column: &str) -> usize {
        self.cells
            .get(row)
            .and_then(|r| r.get(column))
            .copied()
            .unwrap_or(0)
    }

    /// Sum over all cells.
    pub fn total(&self) -> usize {
        self.cells.values().flat_map(|r| r.values()).sum()
    }
}

/// Count rows per `(outer, inner)` pair; combinations that never occur are
/// present with a count of zero.
pub fn cross_counts(view: &FilteredView<'_>, outer: Column, inner: Column) -> CrossCounts {
    let columns: BTreeSet<&str> = view.rows().map(|r| r.get(inner)).collect();
    let empty_row: BTreeMap<String, usize> =
        columns.iter().map(|c| (c.to_string(), 0)).collect();

    let mut cells: BTreeMap<String, BTreeMap<String, usize>> = BTreeMap::new();
    for row in view.rows() {
        let counts = cells
            .entry(row.get(outer).to_string())
            .or_insert_with(|| empty_row.clone());
        if let Some(count) = counts.get_mut(row.get(inner)) {
            *count += 1;
        }
    }

    CrossCounts {
        rows: cells.keys().cloned().collect(),
        columns: columns.into_iter().map(str::to_string).collect(),
        cells,
    }
}

// ---------------------------------------------------------------------------
// Top-N ranking by summed value
// ---------------------------------------------------------------------------

/// One ranked entity with its per-breakdown sums.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntity {
    pub label: String,
    pub total: f64,
    /// Sum per breakdown label; zero-filled over [`TopRanking::breakdown`].
    pub by_breakdown: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopRanking {
    /// Breakdown labels (stack order), ascending.
    pub breakdown: Vec<String>,
    /// At most `n` entities, highest total first.
    pub entries: Vec<RankedEntity>,
}

/// Sum `Value` per `entity`, split by `breakdown`, and keep the `n` largest
/// totals. Entities below rank `n` are dropped.
pub fn top_by_value(
    view: &FilteredView<'_>,
    entity: Column,
    breakdown: Column,
    n: usize,
) -> TopRanking {
    let labels: BTreeSet<&str> = view.rows().map(|r| r.get(breakdown)).collect();
    let zeroes: BTreeMap<String, f64> = labels.iter().map(|l| (l.to_string(), 0.0)).collect();

    let mut sums: BTreeMap<&str, BTreeMap<String, f64>> = BTreeMap::new();
    for row in view.rows() {
        let split = sums
            .entry(row.get(entity))
            .or_insert_with(|| zeroes.clone());
        if let (Some(v), Some(slot)) = (row.value, split.get_mut(row.get(breakdown))) {
            *slot += v;
        }
    }

    let mut entries: Vec<RankedEntity> = sums
        .into_iter()
        .map(|(label, by_breakdown)| RankedEntity {
            label: label.to_string(),
            total: by_breakdown.values().sum(),
            by_breakdown,
        })
        .collect();
    entries.sort_by(|a, b| {
        desc_then_label((a.total, a.label.as_str()), (b.total, b.label.as_str()))
    });
    entries.truncate(n);

    TopRanking {
        breakdown: labels.into_iter().map(str::to_string).collect(),
        entries,
    }
}

// ---------------------------------------------------------------------------
// Hierarchical value sums
// ---------------------------------------------------------------------------

/// A node of a value hierarchy. `value` is the sum over all rows below it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HierarchyNode {
    pub label: String,
    pub value: f64,
    pub children: Vec<HierarchyNode>,
}

impl HierarchyNode {
    /// Depth of the deepest leaf below this node (a leaf has depth 0).
    pub fn depth(&self) -> usize {
        self.children
            .iter()
            .map(|c| c.depth() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Follow `path` labels down from this node.
    pub fn find(&self, path: &[&str]) -> Option<&HierarchyNode> {
        match path.split_first() {
            None => Some(self),
            Some((head, rest)) => self
                .children
                .iter()
                .find(|c| c.label == *head)
                .and_then(|c| c.find(rest)),
        }
    }
}

/// Sum `Value` along `path` (outer → inner).
///
/// Outer levels contain only observed groups. The innermost level of every
/// branch lists each leaf label observed anywhere in the view, with zero for
/// combinations that do not occur. Labels ascend at every level.
pub fn value_hierarchy(
    view: &FilteredView<'_>,
    root_label: &str,
    path: &[Column],
) -> HierarchyNode {
    let rows: Vec<&Transaction> = view.rows().collect();
    let leaf_labels: BTreeSet<&str> = match path.last() {
        Some(&leaf) => rows.iter().map(|r| r.get(leaf)).collect(),
        None => BTreeSet::new(),
    };

    let children = hierarchy_level(&rows, path, &leaf_labels);
    HierarchyNode {
        label: root_label.to_string(),
        value: children.iter().map(|c| c.value).sum(),
        children,
    }
}

fn hierarchy_level(
    rows: &[&Transaction],
    path: &[Column],
    leaf_labels: &BTreeSet<&str>,
) -> Vec<HierarchyNode> {
    let Some((&column, rest)) = path.split_first() else {
        return Vec::new();
    };

    let mut groups: BTreeMap<&str, Vec<&Transaction>> = BTreeMap::new();
    for &row in rows {
        groups.entry(row.get(column)).or_default().push(row);
    }

    if rest.is_empty() {
        return leaf_labels
            .iter()
            .map(|&label| HierarchyNode {
                label: label.to_string(),
                value: groups
                    .get(label)
                    .map(|g| value_sum(g.iter().copied()))
                    .unwrap_or(0.0),
                children: Vec::new(),
            })
            .collect();
    }

    groups
        .into_iter()
        .map(|(label, group)| {
            let children = hierarchy_level(&group, rest, leaf_labels);
            HierarchyNode {
                label: label.to_string(),
                value: children.iter().map(|c| c.value).sum(),
                children,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Raw values grouped for the bubble chart
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BubblePoint {
    pub x_label: String,
    pub value: f64,
}

/// The points of one colour group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BubbleSeries {
    pub label: String,
    pub points: Vec<BubblePoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BubbleGroups {
    /// Distinct x-axis labels, ascending.
    pub x_labels: Vec<String>,
    pub series: Vec<BubbleSeries>,
    /// Largest absolute value, for bubble sizing.
    pub max_value: f64,
}

impl BubbleGroups {
    /// Position of `label` on the x axis.
    pub fn x_position(&self, label: &str) -> Option<usize> {
        self.x_labels.iter().position(|l| l == label)
    }
}

/// One point per row with a value, placed at its `x` label and grouped into
/// series by `color`. Rows without a value are skipped.
pub fn bubble_groups(view: &FilteredView<'_>, x: Column, color: Column) -> BubbleGroups {
    let mut x_labels: BTreeSet<&str> = BTreeSet::new();
    let mut series: BTreeMap<&str, Vec<BubblePoint>> = BTreeMap::new();
    let mut max_value: f64 = 0.0;

    for row in view.rows() {
        let Some(value) = row.value else { continue };
        x_labels.insert(row.get(x));
        max_value = max_value.max(value.abs());
        series.entry(row.get(color)).or_default().push(BubblePoint {
            x_label: row.get(x).to_string(),
            value,
        });
    }

    BubbleGroups {
        x_labels: x_labels.into_iter().map(str::to_string).collect(),
        series: series
            .into_iter()
            .map(|(label, points)| BubbleSeries {
                label: label.to_string(),
                points,
            })
            .collect(),
        max_value,
    }
}

// ---------------------------------------------------------------------------
// Mean per group
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupMean {
    pub label: String,
    pub mean: f64,
    /// Number of rows with a value that went into the mean.
    pub count: usize,
}

/// Arithmetic mean of `Value` per `column` group, highest mean first.
///
/// Missing values are excluded; a group without any value is omitted.
pub fn mean_by(view: &FilteredView<'_>, column: Column) -> Vec<GroupMean> {
    let mut acc: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for row in view.rows() {
        if let Some(v) = row.value {
            let (sum, count) = acc.entry(row.get(column)).or_default();
            *sum += v;
            *count += 1;
        }
    }

    let mut means: Vec<GroupMean> = acc
        .into_iter()
        .map(|(label, (sum, count))| GroupMean {
            label: label.to_string(),
            mean: sum / count as f64,
            count,
        })
        .collect();
    means.sort_by(|a, b| {
        desc_then_label((a.mean, a.label.as_str()), (b.mean, b.label.as_str()))
    });
    means
}
