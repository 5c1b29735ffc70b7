//! Tabular input for the estimator.
//!
//! A thin stand-in for a data-mining example set: a dense `samples × attributes`
//! matrix of doubles plus a name and kind per column. Nominal columns carry
//! their category codes as doubles; they can be stored but never analysed.

use ndarray::{Array2, ArrayView2};

use crate::error::{Error, Result};

/// Value kind of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    /// Real-valued column.
    Numeric,
    /// Categorical column stored as category codes.
    Nominal,
}

/// A named column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Column name.
    pub name: String,
    /// Value kind.
    pub kind: AttributeKind,
}

impl Attribute {
    /// A numeric attribute.
    pub fn numeric(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: AttributeKind::Numeric,
        }
    }

    /// A nominal attribute.
    pub fn nominal(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: AttributeKind::Nominal,
        }
    }
}

/// Samples × attributes table.
#[derive(Debug, Clone, PartialEq)]
pub struct ExampleTable {
    attributes: Vec<Attribute>,
    values: Array2<f64>,
}

impl ExampleTable {
    /// Create a table; the column count of `values` must match `attributes`.
    pub fn new(attributes: Vec<Attribute>, values: Array2<f64>) -> Result<Self> {
        if attributes.len() != values.ncols() {
            return Err(Error::DimensionMismatch {
                expected: attributes.len(),
                found: values.ncols(),
            });
        }
        Ok(Self { attributes, values })
    }

    /// Create an all-numeric table from column names.
    pub fn from_numeric<S: Into<String>>(
        names: impl IntoIterator<Item = S>,
        values: Array2<f64>,
    ) -> Result<Self> {
        let attributes = names.into_iter().map(Attribute::numeric).collect();
        Self::new(attributes, values)
    }

    /// Column metadata.
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Column names in order.
    pub fn attribute_names(&self) -> Vec<String> {
        self.attributes.iter().map(|a| a.name.clone()).collect()
    }

    /// Number of rows.
    pub fn n_samples(&self) -> usize {
        self.values.nrows()
    }

    /// Number of columns.
    pub fn n_attributes(&self) -> usize {
        self.values.ncols()
    }

    /// Raw values, regardless of column kinds.
    pub fn values(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }

    /// The value matrix, provided every column is numeric.
    pub fn numeric_values(&self) -> Result<ArrayView2<'_, f64>> {
        if let Some(attr) = self
            .attributes
            .iter()
            .find(|a| a.kind != AttributeKind::Numeric)
        {
            return Err(Error::NonNumericAttribute {
                name: attr.name.clone(),
            });
        }
        Ok(self.values.view())
    }
}
