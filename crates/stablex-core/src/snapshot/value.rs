//! Typed value model for captured workflow variables.
//!
//! Every captured variable is one [`Value`]: a scalar, an n-d array with a
//! typed element buffer, a heterogeneous sequence, a string-keyed mapping, or
//! a dataframe-like table. Comparison and flattening dispatch on these
//! variants, never on runtime type names.

use crate::errors::StablexError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single leaf value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Scalar {
    None,
    Bool(bool),
    Int(i64),
    Float(#[serde(with = "crate::snapshot::float_repr")] f64),
    Text(String),
}

/// Typed element storage shared by arrays and table columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "dtype", content = "values", rename_all = "snake_case")]
pub enum ArrayData {
    Bool(Vec<bool>),
    Int(Vec<i64>),
    Float(#[serde(with = "crate::snapshot::float_repr::vec")] Vec<f64>),
    Text(Vec<String>),
    /// Non-uniform elements; each may itself be a container.
    Object(Vec<Value>),
}

impl ArrayData {
    pub fn len(&self) -> usize {
        match self {
            ArrayData::Bool(v) => v.len(),
            ArrayData::Int(v) => v.len(),
            ArrayData::Float(v) => v.len(),
            ArrayData::Text(v) => v.len(),
            ArrayData::Object(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element type name, as shown in reports.
    pub fn dtype_name(&self) -> &'static str {
        match self {
            ArrayData::Bool(_) => "bool",
            ArrayData::Int(_) => "int",
            ArrayData::Float(_) => "float",
            ArrayData::Text(_) => "text",
            ArrayData::Object(_) => "object",
        }
    }
}

/// An n-dimensional array stored flat in row-major order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NdArray {
    shape: Vec<usize>,
    data: ArrayData,
}

impl NdArray {
    /// Build an array, checking that the element count matches the shape.
    ///
    /// # Errors
    ///
    /// Returns `StablexError::ArrayShape` when `data.len()` differs from the
    /// product of `shape`, `StablexError::ArrayShapeOverflow` when that
    /// product does not fit in `usize`.
    pub fn new(shape: Vec<usize>, data: ArrayData) -> Result<Self, StablexError> {
        let array = Self { shape, data };
        array.check_shape()?;
        Ok(array)
    }

    /// One-dimensional array over `data`.
    pub fn vector(data: ArrayData) -> Self {
        Self {
            shape: vec![data.len()],
            data,
        }
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn data(&self) -> &ArrayData {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn check_shape(&self) -> Result<(), StablexError> {
        let expected = self
            .shape
            .iter()
            .try_fold(1usize, |acc, d| acc.checked_mul(*d))
            .ok_or_else(|| StablexError::ArrayShapeOverflow {
                shape: self.shape.clone(),
            })?;
        if expected != self.data.len() {
            return Err(StablexError::ArrayShape {
                shape: self.shape.clone(),
                expected,
                found: self.data.len(),
            });
        }
        Ok(())
    }
}

/// A named, typed table column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub data: ArrayData,
}

impl Column {
    pub fn new(name: impl Into<String>, data: ArrayData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}

/// A dataframe-like table: row labels plus equally long named columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    index: Vec<String>,
    columns: Vec<Column>,
}

impl Table {
    /// # Errors
    ///
    /// Returns `StablexError::TableShape` when a column's length differs from
    /// the index length.
    pub fn new(index: Vec<String>, columns: Vec<Column>) -> Result<Self, StablexError> {
        let table = Self { index, columns };
        table.check_shape()?;
        Ok(table)
    }

    pub fn index(&self) -> &[String] {
        &self.index
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.index.len()
    }

    fn check_shape(&self) -> Result<(), StablexError> {
        for column in &self.columns {
            if column.data.len() != self.index.len() {
                return Err(StablexError::TableShape {
                    column: column.name.clone(),
                    expected: self.index.len(),
                    found: column.data.len(),
                });
            }
        }
        Ok(())
    }
}

/// A captured variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Value {
    Scalar(Scalar),
    Array(NdArray),
    /// Ordered heterogeneous list (lists and tuples alike).
    Sequence(Vec<Value>),
    Mapping(BTreeMap<String, Value>),
    Table(Table),
}

impl Value {
    pub fn none() -> Self {
        Value::Scalar(Scalar::None)
    }

    pub fn float(v: f64) -> Self {
        Value::Scalar(Scalar::Float(v))
    }

    pub fn int(v: i64) -> Self {
        Value::Scalar(Scalar::Int(v))
    }

    pub fn bool(v: bool) -> Self {
        Value::Scalar(Scalar::Bool(v))
    }

    pub fn text(v: impl Into<String>) -> Self {
        Value::Scalar(Scalar::Text(v.into()))
    }

    pub fn float_array(values: Vec<f64>) -> Self {
        Value::Array(NdArray::vector(ArrayData::Float(values)))
    }

    pub fn text_array(values: Vec<String>) -> Self {
        Value::Array(NdArray::vector(ArrayData::Text(values)))
    }

    pub fn object_array(values: Vec<Value>) -> Self {
        Value::Array(NdArray::vector(ArrayData::Object(values)))
    }

    pub fn sequence(items: Vec<Value>) -> Self {
        Value::Sequence(items)
    }

    /// Variant name, as shown in reports.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Scalar(_) => "scalar",
            Value::Array(_) => "array",
            Value::Sequence(_) => "sequence",
            Value::Mapping(_) => "mapping",
            Value::Table(_) => "table",
        }
    }

    /// True for arrays, sequences and mappings.
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            Value::Array(_) | Value::Sequence(_) | Value::Mapping(_)
        )
    }

    /// Re-check shape invariants recursively.
    ///
    /// Values built through the constructors are always valid; this exists
    /// for values that arrive through deserialization.
    ///
    /// # Errors
    ///
    /// Returns the first shape violation found.
    pub fn validate(&self) -> Result<(), StablexError> {
        match self {
            Value::Scalar(_) => Ok(()),
            Value::Array(array) => {
                array.check_shape()?;
                validate_data(&array.data)
            }
            Value::Sequence(items) => items.iter().try_for_each(Value::validate),
            Value::Mapping(map) => map.values().try_for_each(Value::validate),
            Value::Table(table) => {
                table.check_shape()?;
                table
                    .columns
                    .iter()
                    .try_for_each(|column| validate_data(&column.data))
            }
        }
    }
}

fn validate_data(data: &ArrayData) -> Result<(), StablexError> {
    match data {
        ArrayData::Object(items) => items.iter().try_for_each(Value::validate),
        _ => Ok(()),
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::float(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::int(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::text(v)
    }
}

impl From<Table> for Value {
    fn from(t: Table) -> Self {
        Value::Table(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_shape_checked() {
        let ok = NdArray::new(vec![2, 2], ArrayData::Int(vec![1, 2, 3, 4]));
        assert!(ok.is_ok());

        let err = NdArray::new(vec![2, 3], ArrayData::Int(vec![1, 2, 3, 4])).unwrap_err();
        assert_eq!(
            err,
            StablexError::ArrayShape {
                shape: vec![2, 3],
                expected: 6,
                found: 4
            }
        );
    }

    #[test]
    fn test_oversized_shape_rejected_without_overflow() {
        let shape = vec![usize::MAX / 2 + 1, 2];
        let err = NdArray::new(shape.clone(), ArrayData::Int(vec![1])).unwrap_err();
        assert_eq!(err, StablexError::ArrayShapeOverflow { shape });

        let zero_dim = NdArray::new(vec![usize::MAX, 0], ArrayData::Int(vec![]));
        assert!(zero_dim.is_ok());
    }

    #[test]
    fn test_table_column_length_checked() {
        let err = Table::new(
            vec!["r0".into(), "r1".into()],
            vec![Column::new("y", ArrayData::Float(vec![1.0]))],
        )
        .unwrap_err();
        assert!(matches!(err, StablexError::TableShape { ref column, .. } if column == "y"));
    }

    #[test]
    fn test_serialized_form_is_tagged() {
        let json = serde_json::to_value(Value::float(f64::NAN)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"kind": "scalar", "value": {"kind": "float", "value": "nan"}})
        );

        let json = serde_json::to_value(Value::float_array(vec![1.0, 2.0])).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "kind": "array",
                "value": {"shape": [2], "data": {"dtype": "float", "values": [1.0, 2.0]}}
            })
        );
    }

    #[test]
    fn test_validate_catches_deserialized_bad_shape() {
        let raw = serde_json::json!({
            "kind": "sequence",
            "value": [{
                "kind": "array",
                "value": {"shape": [3], "data": {"dtype": "int", "values": [1, 2]}}
            }]
        });
        let value: Value = serde_json::from_value(raw).unwrap();
        assert!(value.validate().is_err());
    }

    #[test]
    fn test_none_scalar_round_trips() {
        let json = serde_json::to_string(&Value::none()).unwrap();
        let back: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Value::none());
    }
}
