//! Geometry for the charts egui_plot does not draw: pie, treemap, sunburst
//! and bubble sizing.
//!
//! Angles are expressed in turns (`0.0..=1.0`) and rectangles in whatever unit
//! the caller passes in; the UI converts to screen space.

use crate::data::aggregate::HierarchyNode;

/// Split `0.0..1.0` into consecutive spans proportional to `values`.
///
/// Non-positive values get an empty span. If nothing is positive every span
/// is empty.
pub fn partition(values: &[f64]) -> Vec<(f64, f64)> {
    let total: f64 = values.iter().filter(|v| **v > 0.0).sum();
    let mut cursor = 0.0;
    values
        .iter()
        .map(|&v| {
            let width = if total > 0.0 && v > 0.0 { v / total } else { 0.0 };
            let span = (cursor, cursor + width);
            cursor += width;
            span
        })
        .collect()
}

/// Radius of a bubble whose area is proportional to `value`, the largest
/// value getting `max_radius`.
pub fn bubble_radius(value: f64, max_value: f64, max_radius: f64) -> f64 {
    if max_value <= 0.0 {
        return 0.0;
    }
    (value.abs() / max_value).sqrt() * max_radius
}

// ---------------------------------------------------------------------------
// Treemap
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Rect { x, y, width, height }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    fn shrink(self, by: f64) -> Rect {
        let dx = by.min(self.width / 2.0);
        let dy = by.min(self.height / 2.0);
        Rect::new(self.x + dx, self.y + dy, self.width - 2.0 * dx, self.height - 2.0 * dy)
    }
}

/// A placed hierarchy node.
#[derive(Debug, Clone)]
pub struct Tile<'a> {
    pub node: &'a HierarchyNode,
    /// Labels from the first level down to `node`.
    pub path: Vec<&'a str>,
    pub rect: Rect,
}

impl Tile<'_> {
    /// Level below the root, starting at 1.
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    pub fn is_leaf(&self) -> bool {
        self.node.children.is_empty()
    }
}

/// Slice-and-dice treemap of `root` inside `bounds`.
///
/// The first level splits along x, the next along y, and so on. Children of a
/// tile are laid out inside it, inset by `padding`. Nodes without a positive
/// value are skipped. Parents come before their children in the output.
pub fn treemap(root: &HierarchyNode, bounds: Rect, padding: f64) -> Vec<Tile<'_>> {
    let mut tiles = Vec::new();
    place_children(root, bounds, 0, &[], padding, &mut tiles);
    tiles
}

fn place_children<'a>(
    node: &'a HierarchyNode,
    bounds: Rect,
    level: usize,
    path: &[&'a str],
    padding: f64,
    out: &mut Vec<Tile<'a>>,
) {
    let values: Vec<f64> = node.children.iter().map(|c| c.value).collect();
    let horizontal = level % 2 == 0;

    for (child, (start, end)) in node.children.iter().zip(partition(&values)) {
        if end <= start {
            continue;
        }
        let rect = if horizontal {
            Rect::new(
                bounds.x + start * bounds.width,
                bounds.y,
                (end - start) * bounds.width,
                bounds.height,
            )
        } else {
            Rect::new(
                bounds.x,
                bounds.y + start * bounds.height,
                bounds.width,
                (end - start) * bounds.height,
            )
        };

        let mut child_path = path.to_vec();
        child_path.push(child.label.as_str());
        out.push(Tile {
            node: child,
            path: child_path.clone(),
            rect,
        });
        place_children(child, rect.shrink(padding), level + 1, &child_path, padding, out);
    }
}

// ---------------------------------------------------------------------------
// Sunburst
// ---------------------------------------------------------------------------

/// A ring segment: ring `depth` (1 = innermost) from `start` to `end` turns.
#[derive(Debug, Clone)]
pub struct Sector<'a> {
    pub node: &'a HierarchyNode,
    pub path: Vec<&'a str>,
    pub start: f64,
    pub end: f64,
}

impl Sector<'_> {
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    pub fn sweep(&self) -> f64 {
        self.end - self.start
    }
}

/// Angular partition of `root`: every node gets the share of its parent's
/// span proportional to its value. Empty sectors are skipped.
pub fn sunburst(root: &HierarchyNode) -> Vec<Sector<'_>> {
    let mut sectors = Vec::new();
    place_ring(root, 0.0, 1.0, &[], &mut sectors);
    sectors
}

fn place_ring<'a>(
    node: &'a HierarchyNode,
    start: f64,
    end: f64,
    path: &[&'a str],
    out: &mut Vec<Sector<'a>>,
) {
    let values: Vec<f64> = node.children.iter().map(|c| c.value).collect();
    let span = end - start;
    for (child, (a, b)) in node.children.iter().zip(partition(&values)) {
        if b <= a {
            continue;
        }
        let mut child_path = path.to_vec();
        child_path.push(child.label.as_str());
        let (child_start, child_end) = (start + a * span, start + b * span);
        out.push(Sector {
            node: child,
            path: child_path.clone(),
            start: child_start,
            end: child_end,
        });
        place_ring(child, child_start, child_end, &child_path, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(label: &str, value: f64) -> HierarchyNode {
        HierarchyNode {
            label: label.to_string(),
            value,
            children: Vec::new(),
        }
    }

    fn branch(label: &str, children: Vec<HierarchyNode>) -> HierarchyNode {
        HierarchyNode {
            label: label.to_string(),
            value: children.iter().map(|c| c.value).sum(),
            children,
        }
    }

    fn sample_tree() -> HierarchyNode {
        branch(
            "All",
            vec![
                branch("Net 30", vec![leaf("Food", 30.0), leaf("Toys", 0.0)]),
                branch("Prepaid", vec![leaf("Food", 10.0), leaf("Toys", 60.0)]),
            ],
        )
    }

    #[test]
    fn partition_is_proportional_and_contiguous() {
        let spans = partition(&[1.0, 3.0, 0.0, -2.0]);
        assert_eq!(spans[0], (0.0, 0.25));
        assert_eq!(spans[1], (0.25, 1.0));
        assert_eq!(spans[2], (1.0, 1.0));
        assert_eq!(spans[3], (1.0, 1.0));
    }

    #[test]
    fn partition_of_nothing_is_empty_spans() {
        assert_eq!(partition(&[0.0, 0.0]), vec![(0.0, 0.0), (0.0, 0.0)]);
        assert!(partition(&[]).is_empty());
    }

    #[test]
    fn bubble_area_scales_with_value() {
        assert_eq!(bubble_radius(100.0, 100.0, 60.0), 60.0);
        assert_eq!(bubble_radius(25.0, 100.0, 60.0), 30.0);
        assert_eq!(bubble_radius(5.0, 0.0, 60.0), 0.0);
    }

    #[test]
    fn treemap_skips_zero_nodes_and_conserves_area() {
        let tree = sample_tree();
        let tiles = treemap(&tree, Rect::new(0.0, 0.0, 100.0, 50.0), 0.0);

        let paths: Vec<Vec<&str>> = tiles.iter().map(|t| t.path.clone()).collect();
        assert_eq!(
            paths,
            vec![
                vec!["Net 30"],
                vec!["Net 30", "Food"],
                vec!["Prepaid"],
                vec!["Prepaid", "Food"],
                vec!["Prepaid", "Toys"],
            ]
        );

        let net30 = &tiles[0];
        assert!((net30.rect.width - 30.0).abs() < 1e-9);
        assert_eq!(net30.depth(), 1);

        let leaf_area: f64 = tiles.iter().filter(|t| t.is_leaf()).map(|t| t.rect.area()).sum();
        assert!((leaf_area - 5000.0).abs() < 1e-9);

        // Second level splits vertically.
        let prepaid_toys = &tiles[4];
        assert!((prepaid_toys.rect.height - 50.0 * 6.0 / 7.0).abs() < 1e-9);
    }

    #[test]
    fn sunburst_children_nest_inside_parents() {
        let tree = sample_tree();
        let sectors = sunburst(&tree);
        assert_eq!(sectors.len(), 5);

        let prepaid = sectors.iter().find(|s| s.path == ["Prepaid"]).unwrap();
        assert!((prepaid.start - 0.3).abs() < 1e-9);
        assert!((prepaid.end - 1.0).abs() < 1e-9);

        for child in sectors.iter().filter(|s| s.depth() == 2 && s.path[0] == "Prepaid") {
            assert!(child.start >= prepaid.start - 1e-9 && child.end <= prepaid.end + 1e-9);
        }
        let total: f64 = sectors.iter().filter(|s| s.depth() == 2).map(Sector::sweep).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }
}
