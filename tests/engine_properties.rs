//! Property tests for filtering and aggregation over arbitrary small datasets.

use std::collections::BTreeSet;

use proptest::prelude::*;

use trade_dash::data::aggregate::{cross_counts, mean_by, top_by_value, value_hierarchy};
use trade_dash::data::dashboard::{evaluate, DashboardOutcome, DEFAULT_TOP_N};
use trade_dash::data::filter::{apply_filters, FilterColumn, FilterSelection};
use trade_dash::data::model::{Column, Dataset, Transaction};

const CATEGORIES: [&str; 4] = ["Electronics", "Food", "Toys", "Machinery"];
const DIRECTIONS: [&str; 2] = ["Import", "Export"];
const TERMS: [&str; 3] = ["Prepaid", "Net 30", "Net 60"];
const SHIPPING: [&str; 3] = ["Air", "Sea", "Land"];
const COUNTRIES: [&str; 3] = ["Chile", "Peru", "Kenya"];

fn transaction() -> impl Strategy<Value = Transaction> {
    (
        0..CATEGORIES.len(),
        0..DIRECTIONS.len(),
        0..TERMS.len(),
        0..SHIPPING.len(),
        0..25usize,
        0..COUNTRIES.len(),
        proptest::option::weighted(0.9, 0.0..10_000.0f64),
    )
        .prop_map(|(c, d, t, s, cust, country, value)| Transaction {
            category: CATEGORIES[c].to_string(),
            import_export: DIRECTIONS[d].to_string(),
            payment_terms: TERMS[t].to_string(),
            shipping_method: SHIPPING[s].to_string(),
            customer: format!("Customer {cust}"),
            country: COUNTRIES[country].to_string(),
            value,
        })
}

fn dataset() -> impl Strategy<Value = Dataset> {
    prop::collection::vec(transaction(), 0..120).prop_map(Dataset::from_rows)
}

/// A selection drawing each column's set from the full domain plus one value
/// that never occurs.
fn selection() -> impl Strategy<Value = FilterSelection> {
    fn subset(domain: &'static [&'static str]) -> impl Strategy<Value = Vec<String>> {
        let mut values: Vec<&'static str> = domain.to_vec();
        values.push("Unlisted");
        prop::sample::subsequence(values.clone(), 0..=values.len())
            .prop_map(|v| v.into_iter().map(str::to_string).collect())
    }
    (
        subset(&CATEGORIES),
        subset(&DIRECTIONS),
        subset(&TERMS),
        subset(&SHIPPING),
    )
        .prop_map(|(c, d, t, s)| {
            FilterSelection::default()
                .with(FilterColumn::Category, c)
                .with(FilterColumn::ImportExport, d)
                .with(FilterColumn::PaymentTerms, t)
                .with(FilterColumn::ShippingMethod, s)
        })
}

proptest! {
    #[test]
    fn filtered_rows_satisfy_every_selection(ds in dataset(), sel in selection()) {
        let view = apply_filters(&ds, &sel);
        prop_assert!(view.len() <= ds.len());
        for row in view.rows() {
            for column in FilterColumn::ALL {
                prop_assert!(sel.is_selected(column, row.get(column.column())));
            }
        }
        // Every row that satisfies the predicate is kept.
        let expected = ds
            .rows()
            .iter()
            .filter(|r| FilterColumn::ALL.iter().all(|&c| sel.is_selected(c, r.get(c.column()))))
            .count();
        prop_assert_eq!(view.len(), expected);
    }

    #[test]
    fn full_selection_is_the_whole_sample(ds in dataset()) {
        let view = apply_filters(&ds, &FilterSelection::all(&ds));
        let all: Vec<usize> = (0..ds.len()).collect();
        prop_assert_eq!(view.indices(), all.as_slice());
    }

    #[test]
    fn empty_column_selection_empties_the_view(
        ds in dataset(),
        column in prop::sample::select(FilterColumn::ALL.to_vec()),
    ) {
        let mut sel = FilterSelection::all(&ds);
        sel.select_none(column);
        let view = apply_filters(&ds, &sel);
        prop_assert!(view.is_empty());
        prop_assert_eq!(evaluate(&view, DEFAULT_TOP_N), DashboardOutcome::NoData);
    }

    #[test]
    fn filtering_is_idempotent(ds in dataset(), sel in selection()) {
        let first = apply_filters(&ds, &sel);
        let second = apply_filters(&ds, &sel);
        prop_assert_eq!(first.indices(), second.indices());
        prop_assert_eq!(evaluate(&first, DEFAULT_TOP_N), evaluate(&second, DEFAULT_TOP_N));
    }

    #[test]
    fn cross_count_cells_sum_to_row_count(ds in dataset(), sel in selection()) {
        let view = apply_filters(&ds, &sel);
        let table = cross_counts(&view, Column::Category, Column::ImportExport);
        prop_assert_eq!(table.total(), view.len());
        for row in table.cells.values() {
            prop_assert_eq!(row.len(), table.columns.len());
        }
    }

    #[test]
    fn top_ranking_is_the_true_top(ds in dataset(), sel in selection(), n in 1usize..15) {
        let view = apply_filters(&ds, &sel);
        let ranking = top_by_value(&view, Column::Customer, Column::ImportExport, n);

        let distinct: BTreeSet<&str> = view.rows().map(|r| r.customer.as_str()).collect();
        prop_assert_eq!(ranking.entries.len(), n.min(distinct.len()));

        for pair in ranking.entries.windows(2) {
            prop_assert!(pair[0].total >= pair[1].total);
        }

        // No dropped entity beats the last one kept.
        if let Some(last) = ranking.entries.last() {
            let kept: BTreeSet<&str> = ranking.entries.iter().map(|e| e.label.as_str()).collect();
            for customer in distinct.difference(&kept) {
                let total: f64 = view
                    .rows()
                    .filter(|r| r.customer == *customer)
                    .filter_map(|r| r.value)
                    .sum();
                prop_assert!(total <= last.total + 1e-6);
            }
        }
    }

    #[test]
    fn hierarchy_root_equals_total_value(ds in dataset(), sel in selection()) {
        let view = apply_filters(&ds, &sel);
        let root = value_hierarchy(
            &view,
            "All",
            &[Column::Category, Column::Country, Column::ImportExport],
        );
        let total: f64 = view.rows().filter_map(|r| r.value).sum();
        prop_assert!((root.value - total).abs() < 1e-6 * total.max(1.0));
        for child in &root.children {
            let sum: f64 = child.children.iter().map(|c| c.value).sum();
            prop_assert!((child.value - sum).abs() < 1e-6 * sum.max(1.0));
        }
    }

    #[test]
    fn means_are_sorted_and_within_group_range(ds in dataset(), sel in selection()) {
        let view = apply_filters(&ds, &sel);
        let means = mean_by(&view, Column::Category);
        for pair in means.windows(2) {
            prop_assert!(pair[0].mean >= pair[1].mean);
        }
        for m in &means {
            let values: Vec<f64> = view
                .rows()
                .filter(|r| r.category == m.label)
                .filter_map(|r| r.value)
                .collect();
            prop_assert_eq!(values.len(), m.count);
            let lo = values.iter().cloned().fold(f64::INFINITY, f64::min);
            let hi = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            prop_assert!(m.mean >= lo - 1e-6 && m.mean <= hi + 1e-6);
        }
    }
}
