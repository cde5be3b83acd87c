use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Column – the categorical attributes of a transaction
// ---------------------------------------------------------------------------

/// Categorical columns of the transactions table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Column {
    Category,
    ImportExport,
    PaymentTerms,
    ShippingMethod,
    Customer,
    Country,
}

impl Column {
    pub const ALL: [Column; 6] = [
        Column::Category,
        Column::ImportExport,
        Column::PaymentTerms,
        Column::ShippingMethod,
        Column::Customer,
        Column::Country,
    ];

    /// Header name as it appears in the source file.
    pub fn header(self) -> &'static str {
        match self {
            Column::Category => "Category",
            Column::ImportExport => "Import_Export",
            Column::PaymentTerms => "Payment_Terms",
            Column::ShippingMethod => "Shipping_Method",
            Column::Customer => "Customer",
            Column::Country => "Country",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

/// Header of the numeric column.
pub const VALUE_HEADER: &str = "Value";

// ---------------------------------------------------------------------------
// Transaction – one row of the source table
// ---------------------------------------------------------------------------

/// A single import/export transaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    pub category: String,
    pub import_export: String,
    pub payment_terms: String,
    pub shipping_method: String,
    pub customer: String,
    pub country: String,
    /// Transaction value; `None` when the cell was empty.
    pub value: Option<f64>,
}

impl Transaction {
    /// Value of a categorical column for this row.
    pub fn get(&self, column: Column) -> &str {
        match column {
            Column::Category => &self.category,
            Column::ImportExport => &self.import_export,
            Column::PaymentTerms => &self.payment_terms,
            Column::ShippingMethod => &self.shipping_method,
            Column::Customer => &self.customer,
            Column::Country => &self.country,
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – an immutable, indexed collection of transactions
// ---------------------------------------------------------------------------

/// Loaded transactions with pre-computed distinct values per column.
///
/// Fields are private: once built, a dataset is read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    rows: Vec<Transaction>,
    /// For each column the distinct values in order of first appearance.
    distinct: BTreeMap<Column, Vec<String>>,
}

impl Dataset {
    /// Build column indices from the given rows.
    pub fn from_rows(rows: Vec<Transaction>) -> Self {
        let mut distinct = BTreeMap::new();
        for column in Column::ALL {
            let mut seen: HashSet<&str> = HashSet::new();
            let values: Vec<String> = rows
                .iter()
                .map(|row| row.get(column))
                .filter(|v| seen.insert(*v))
                .map(str::to_string)
                .collect();
            distinct.insert(column, values);
        }
        Dataset { rows, distinct }
    }

    pub fn rows(&self) -> &[Transaction] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&Transaction> {
        self.rows.get(index)
    }

    /// Distinct values of `column`, in order of first appearance.
    pub fn distinct_values(&self, column: Column) -> &[String] {
        self.distinct.get(&column).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of transactions.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
pub(crate) fn tx(category: &str, direction: &str, value: f64) -> Transaction {
    Transaction {
        category: category.to_string(),
        import_export: direction.to_string(),
        payment_terms: "Prepaid".to_string(),
        shipping_method: "Sea".to_string(),
        customer: format!("{category} Ltd"),
        country: "Chile".to_string(),
        value: Some(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distinct_values_keep_first_appearance_order() {
        let ds = Dataset::from_rows(vec![
            tx("Toys", "Export", 1.0),
            tx("Electronics", "Import", 2.0),
            tx("Toys", "Import", 3.0),
        ]);
        assert_eq!(ds.distinct_values(Column::Category), ["Toys", "Electronics"]);
        assert_eq!(ds.distinct_values(Column::ImportExport), ["Export", "Import"]);
        assert_eq!(ds.len(), 3);
    }

    #[test]
    fn empty_dataset_has_no_distinct_values() {
        let ds = Dataset::from_rows(Vec::new());
        assert!(ds.is_empty());
        assert!(ds.distinct_values(Column::Country).is_empty());
    }
}
