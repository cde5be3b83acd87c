use serde::Serialize;

use super::aggregate::{
    bubble_groups, cross_counts, mean_by, top_by_value, value_counts, value_hierarchy,
    BubbleGroups, CountEntry, CrossCounts, GroupMean, HierarchyNode, TopRanking,
};
use super::filter::{apply_filters, FilterSelection, FilteredView};
use super::model::{Column, Dataset};

/// Number of customers in the ranking chart.
pub const DEFAULT_TOP_N: usize = 10;

/// Shown instead of the charts when no row passes the filters.
pub const NO_DATA_MESSAGE: &str =
    "No data available for the selected filters. Please select at least 1 item from each filter.";

/// Every aggregate the dashboard renders, computed from one filtered view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartViews {
    pub row_count: usize,
    /// Pie: transactions per direction.
    pub transaction_types: Vec<CountEntry>,
    /// Stacked bar: Category × Import_Export counts.
    pub category_direction: CrossCounts,
    /// Stacked bar: customers with the highest summed value.
    pub top_customers: TopRanking,
    /// Treemap: Payment_Terms → Category value sums.
    pub payment_category: HierarchyNode,
    /// Bubble: values per Shipping_Method, coloured by Category.
    pub shipping_bubbles: BubbleGroups,
    /// Sunburst: Category → Country → Import_Export value sums.
    pub category_country_direction: HierarchyNode,
    /// Line: mean value per Category.
    pub category_means: Vec<GroupMean>,
}

/// Result of one recomputation pass.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DashboardOutcome {
    /// The filters left no rows; no chart is computed.
    #[default]
    NoData,
    Ready(Box<ChartViews>),
}

impl DashboardOutcome {
    pub fn views(&self) -> Option<&ChartViews> {
        match self {
            DashboardOutcome::NoData => None,
            DashboardOutcome::Ready(views) => Some(views),
        }
    }
}

/// Run every aggregation over `view`, or report [`DashboardOutcome::NoData`]
/// when it is empty.
pub fn evaluate(view: &FilteredView<'_>, top_n: usize) -> DashboardOutcome {
    if view.is_empty() {
        return DashboardOutcome::NoData;
    }

    DashboardOutcome::Ready(Box::new(ChartViews {
        row_count: view.len(),
        transaction_types: value_counts(view, Column::ImportExport),
        category_direction: cross_counts(view, Column::Category, Column::ImportExport),
        top_customers: top_by_value(view, Column::Customer, Column::ImportExport, top_n),
        payment_category: value_hierarchy(
            view,
            "All",
            &[Column::PaymentTerms, Column::Category],
        ),
        shipping_bubbles: bubble_groups(view, Column::ShippingMethod, Column::Category),
        category_country_direction: value_hierarchy(
            view,
            "All",
            &[Column::Category, Column::Country, Column::ImportExport],
        ),
        category_means: mean_by(view, Column::Category),
    }))
}

/// One full pass: filter the sample, then aggregate.
///
/// Returns the indices of the visible rows alongside the outcome.
pub fn refresh(
    sample: &Dataset,
    selection: &FilterSelection,
    top_n: usize,
) -> (Vec<usize>, DashboardOutcome) {
    let view = apply_filters(sample, selection);
    let outcome = evaluate(&view, top_n);
    log::debug!("Filter pass: {} of {} rows visible", view.len(), sample.len());
    (view.indices().to_vec(), outcome)
}
