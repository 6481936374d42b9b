//! Recursive-descent flattening of nested values into leaf scalars.
//!
//! Containers are skipped and only leaves are kept, depth-first:
//! - arrays yield their elements in storage order (object elements recurse)
//! - sequences recurse in order
//! - mappings yield each key as a text leaf, then that entry's leaves
//! - tables yield column values column by column

use crate::snapshot::value::{ArrayData, Scalar, Value};

/// A borrowed leaf scalar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Leaf<'a> {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(&'a str),
}

impl<'a> Leaf<'a> {
    pub fn from_scalar(scalar: &'a Scalar) -> Self {
        match scalar {
            Scalar::None => Leaf::None,
            Scalar::Bool(b) => Leaf::Bool(*b),
            Scalar::Int(i) => Leaf::Int(*i),
            Scalar::Float(f) => Leaf::Float(*f),
            Scalar::Text(s) => Leaf::Text(s),
        }
    }

    /// Numeric view of bool/int/float leaves.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Leaf::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Leaf::Int(i) => Some(*i as f64),
            Leaf::Float(f) => Some(*f),
            Leaf::None | Leaf::Text(_) => None,
        }
    }
}

impl std::fmt::Display for Leaf<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Leaf::None => write!(f, "None"),
            Leaf::Bool(b) => write!(f, "{}", b),
            Leaf::Int(i) => write!(f, "{}", i),
            Leaf::Float(x) => write!(f, "{:?}", x),
            Leaf::Text(s) => write!(f, "{:?}", s),
        }
    }
}

/// Flatten `value` into its ordered leaves.
pub fn flatten(value: &Value) -> Vec<Leaf<'_>> {
    let mut out = Vec::new();
    descend(value, &mut out);
    out
}

/// Flatten a typed element buffer (array storage or a table column).
pub fn flatten_data(data: &ArrayData) -> Vec<Leaf<'_>> {
    let mut out = Vec::with_capacity(data.len());
    descend_data(data, &mut out);
    out
}

fn descend<'a>(value: &'a Value, out: &mut Vec<Leaf<'a>>) {
    match value {
        Value::Scalar(s) => out.push(Leaf::from_scalar(s)),
        Value::Array(array) => descend_data(array.data(), out),
        Value::Sequence(items) => {
            for item in items {
                descend(item, out);
            }
        }
        Value::Mapping(map) => {
            for (k, v) in map {
                out.push(Leaf::Text(k));
                descend(v, out);
            }
        }
        Value::Table(table) => {
            for column in table.columns() {
                descend_data(&column.data, out);
            }
        }
    }
}

fn descend_data<'a>(data: &'a ArrayData, out: &mut Vec<Leaf<'a>>) {
    match data {
        ArrayData::Bool(v) => out.extend(v.iter().map(|b| Leaf::Bool(*b))),
        ArrayData::Int(v) => out.extend(v.iter().map(|i| Leaf::Int(*i))),
        ArrayData::Float(v) => out.extend(v.iter().map(|f| Leaf::Float(*f))),
        ArrayData::Text(v) => out.extend(v.iter().map(|s| Leaf::Text(s))),
        ArrayData::Object(items) => {
            for item in items {
                descend(item, out);
            }
        }
    }
}
