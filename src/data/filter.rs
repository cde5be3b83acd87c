use std::collections::BTreeSet;

use serde::Serialize;

use super::model::{Column, Dataset, Transaction};

// ---------------------------------------------------------------------------
// Filterable columns
// ---------------------------------------------------------------------------

/// The four columns exposed as sidebar multi-selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum FilterColumn {
    Category,
    ImportExport,
    PaymentTerms,
    ShippingMethod,
}

impl FilterColumn {
    pub const ALL: [FilterColumn; 4] = [
        FilterColumn::Category,
        FilterColumn::ImportExport,
        FilterColumn::PaymentTerms,
        FilterColumn::ShippingMethod,
    ];

    pub fn column(self) -> Column {
        match self {
            FilterColumn::Category => Column::Category,
            FilterColumn::ImportExport => Column::ImportExport,
            FilterColumn::PaymentTerms => Column::PaymentTerms,
            FilterColumn::ShippingMethod => Column::ShippingMethod,
        }
    }

    /// Sidebar label.
    pub fn label(self) -> &'static str {
        match self {
            FilterColumn::Category => "Select Categories",
            FilterColumn::ImportExport => "Select Import/Export",
            FilterColumn::PaymentTerms => "Select Payment Terms",
            FilterColumn::ShippingMethod => "Select Shipping Method",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

// ---------------------------------------------------------------------------
// Filter selection: which values are selected per column
// ---------------------------------------------------------------------------

/// Per-column selection state. Every filterable column always has a set;
/// an empty set selects nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    selected: [BTreeSet<String>; 4],
}

impl FilterSelection {
    /// All distinct values of `dataset` selected (i.e., show everything).
    pub fn all(dataset: &Dataset) -> Self {
        let mut selection = FilterSelection::default();
        for column in FilterColumn::ALL {
            selection.select_all(column, dataset);
        }
        selection
    }

    pub fn selected(&self, column: FilterColumn) -> &BTreeSet<String> {
        &self.selected[column.index()]
    }

    pub fn is_selected(&self, column: FilterColumn, value: &str) -> bool {
        self.selected(column).contains(value)
    }

    /// Replace the selection of one column.
    pub fn set<I, S>(&mut self, column: FilterColumn, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected[column.index()] = values.into_iter().map(Into::into).collect();
    }

    /// Builder form of [`FilterSelection::set`].
    pub fn with<I, S>(mut self, column: FilterColumn, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set(column, values);
        self
    }

    /// Toggle a single value in a column's selection.
    pub fn toggle(&mut self, column: FilterColumn, value: &str) {
        let set = &mut self.selected[column.index()];
        if !set.remove(value) {
            set.insert(value.to_string());
        }
    }

    pub fn select_all(&mut self, column: FilterColumn, dataset: &Dataset) {
        self.set(column, dataset.distinct_values(column.column()).iter().cloned());
    }

    pub fn select_none(&mut self, column: FilterColumn) {
        self.selected[column.index()].clear();
    }
}

// ---------------------------------------------------------------------------
// Filtered view
// ---------------------------------------------------------------------------

/// The rows of a dataset that passed a [`FilterSelection`].
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    dataset: &'a Dataset,
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    /// A view over every row of `dataset`.
    pub fn whole(dataset: &'a Dataset) -> Self {
        FilteredView {
            dataset,
            indices: (0..dataset.len()).collect(),
        }
    }

    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    /// Indices into [`FilteredView::dataset`], in dataset order.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn rows(&self) -> impl Iterator<Item = &'a Transaction> + '_ {
        let rows = self.dataset.rows();
        self.indices.iter().map(move |&i| &rows[i])
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Keep the rows whose value in every filterable column is a member of that
/// column's selected set.
///
/// * A column with an empty selection → no row passes.
/// * A selected value absent from the dataset matches nothing.
pub fn apply_filters<'a>(sample: &'a Dataset, selection: &FilterSelection) -> FilteredView<'a> {
    FilteredView {
        dataset: sample,
        indices: filtered_indices(sample, selection),
    }
}

/// Return indices of rows that pass all filters.
pub fn filtered_indices(dataset: &Dataset, selection: &FilterSelection) -> Vec<usize> {
    if FilterColumn::ALL
        .iter()
        .any(|&c| selection.selected(c).is_empty())
    {
        // Nothing selected for some column → hide everything
        return Vec::new();
    }

    // Columns whose selection covers every distinct value need no check.
    let active: Vec<FilterColumn> = FilterColumn::ALL
        .into_iter()
        .filter(|&c| {
            let selected = selection.selected(c);
            !dataset
                .distinct_values(c.column())
                .iter()
                .all(|v| selected.contains(v))
        })
        .collect();

    dataset
        .rows()
        .iter()
        .enumerate()
        .filter(|(_, row)| {
            active
                .iter()
                .all(|&c| selection.is_selected(c, row.get(c.column())))
        })
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tx;

    fn scenario() -> Dataset {
        Dataset::from_rows(vec![
            tx("Electronics", "Import", 100.0),
            tx("Electronics", "Export", 50.0),
            tx("Food", "Import", 30.0),
        ])
    }

    #[test]
    fn full_selection_keeps_every_row() {
        let ds = scenario();
        let view = apply_filters(&ds, &FilterSelection::all(&ds));
        assert_eq!(view.indices(), [0, 1, 2]);
    }

    #[test]
    fn single_category_selection() {
        let ds = scenario();
        let selection = FilterSelection::all(&ds).with(FilterColumn::Category, ["Electronics"]);
        let view = apply_filters(&ds, &selection);
        assert_eq!(view.len(), 2);
        assert!(view.rows().all(|r| r.category == "Electronics"));
    }

    #[test]
    fn empty_selection_in_any_column_hides_everything() {
        let ds = scenario();
        for column in FilterColumn::ALL {
            let mut selection = FilterSelection::all(&ds);
            selection.select_none(column);
            assert!(apply_filters(&ds, &selection).is_empty(), "{column:?}");
        }
    }

    #[test]
    fn unknown_values_match_nothing() {
        let ds = scenario();
        let selection = FilterSelection::all(&ds).with(FilterColumn::Category, ["Furniture"]);
        assert!(apply_filters(&ds, &selection).is_empty());

        let selection =
            FilterSelection::all(&ds).with(FilterColumn::Category, ["Food", "Furniture"]);
        assert_eq!(apply_filters(&ds, &selection).indices(), [2]);
    }

    #[test]
    fn selections_combine_across_columns() {
        let ds = scenario();
        let selection = FilterSelection::all(&ds)
            .with(FilterColumn::Category, ["Electronics", "Food"])
            .with(FilterColumn::ImportExport, ["Import"]);
        assert_eq!(apply_filters(&ds, &selection).indices(), [0, 2]);
    }

    #[test]
    fn toggle_removes_then_restores() {
        let ds = scenario();
        let mut selection = FilterSelection::all(&ds);
        selection.toggle(FilterColumn::ImportExport, "Export");
        assert!(!selection.is_selected(FilterColumn::ImportExport, "Export"));
        selection.toggle(FilterColumn::ImportExport, "Export");
        assert_eq!(selection, FilterSelection::all(&ds));
    }
}
