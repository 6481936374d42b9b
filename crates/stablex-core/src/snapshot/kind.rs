//! Element kind classification.
//!
//! Decides whether NaN substitution is meaningful for a value. Only values
//! whose elements are uniformly numeric get NaN-equal treatment; text and
//! non-uniform object contents are compared exactly.

use crate::snapshot::value::{ArrayData, Scalar, Value};

/// Uniform element type of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ElementKind {
    Numeric,
    Text,
    Object,
}

impl ElementKind {
    /// NaN cannot be decided equal for text or object contents.
    pub fn is_nan_undecidable(self) -> bool {
        !matches!(self, ElementKind::Numeric)
    }

    pub fn name(self) -> &'static str {
        match self {
            ElementKind::Numeric => "numeric",
            ElementKind::Text => "text",
            ElementKind::Object => "object",
        }
    }
}

/// Classify the elements of `value`.
///
/// Sequences are numeric or text only when rectangular and uniform; an empty
/// sequence counts as numeric.
pub fn element_kind(value: &Value) -> ElementKind {
    match value {
        Value::Scalar(s) => scalar_kind(s),
        Value::Array(array) => data_kind(array.data()),
        Value::Sequence(items) => sequence_kind(items),
        Value::Mapping(_) | Value::Table(_) => ElementKind::Object,
    }
}

fn scalar_kind(scalar: &Scalar) -> ElementKind {
    match scalar {
        Scalar::Bool(_) | Scalar::Int(_) | Scalar::Float(_) => ElementKind::Numeric,
        Scalar::Text(_) => ElementKind::Text,
        Scalar::None => ElementKind::Object,
    }
}

fn data_kind(data: &ArrayData) -> ElementKind {
    match data {
        ArrayData::Bool(_) | ArrayData::Int(_) | ArrayData::Float(_) => ElementKind::Numeric,
        ArrayData::Text(_) => ElementKind::Text,
        ArrayData::Object(_) => ElementKind::Object,
    }
}

fn sequence_kind(items: &[Value]) -> ElementKind {
    if items.is_empty() {
        return ElementKind::Numeric;
    }
    if !is_rectangular(items) {
        return ElementKind::Object;
    }
    let mut kinds = items.iter().map(element_kind);
    let first = kinds.next().unwrap_or(ElementKind::Numeric);
    if kinds.all(|k| k == first) {
        first
    } else {
        ElementKind::Object
    }
}

/// All items are scalars, or all are containers of one common length.
fn is_rectangular(items: &[Value]) -> bool {
    let lens: Vec<Option<usize>> = items.iter().map(outer_len).collect();
    match lens.first() {
        Some(first) => lens.iter().all(|l| l == first),
        None => true,
    }
}

fn outer_len(value: &Value) -> Option<usize> {
    match value {
        Value::Scalar(_) => None,
        Value::Array(array) => array.shape().first().copied().or(Some(0)),
        Value::Sequence(items) => Some(items.len()),
        Value::Mapping(map) => Some(map.len()),
        Value::Table(table) => Some(table.row_count()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_kinds() {
        assert_eq!(element_kind(&Value::float(f64::NAN)), ElementKind::Numeric);
        assert_eq!(element_kind(&Value::text("x")), ElementKind::Text);
        assert_eq!(element_kind(&Value::none()), ElementKind::Object);
    }

    #[test]
    fn test_uniform_sequences() {
        let nums = Value::sequence(vec![Value::int(1), Value::float(2.0), Value::bool(true)]);
        assert_eq!(element_kind(&nums), ElementKind::Numeric);

        let texts = Value::sequence(vec![Value::text("a"), Value::text("b")]);
        assert_eq!(element_kind(&texts), ElementKind::Text);

        assert_eq!(element_kind(&Value::sequence(vec![])), ElementKind::Numeric);
    }

    #[test]
    fn test_mixed_sequence_is_object() {
        let mixed = Value::sequence(vec![Value::int(1), Value::text("b")]);
        assert_eq!(element_kind(&mixed), ElementKind::Object);
    }

    #[test]
    fn test_ragged_sequence_is_object() {
        let ragged = Value::sequence(vec![
            Value::float_array(vec![1.0, 2.0]),
            Value::float_array(vec![1.0]),
        ]);
        assert_eq!(element_kind(&ragged), ElementKind::Object);

        let square = Value::sequence(vec![
            Value::float_array(vec![1.0, 2.0]),
            Value::float_array(vec![3.0, f64::NAN]),
        ]);
        assert_eq!(element_kind(&square), ElementKind::Numeric);
    }

    #[test]
    fn test_array_dtype_decides() {
        assert_eq!(
            element_kind(&Value::text_array(vec!["a".into()])),
            ElementKind::Text
        );
        assert_eq!(
            element_kind(&Value::object_array(vec![Value::float(1.0)])),
            ElementKind::Object
        );
        assert!(ElementKind::Object.is_nan_undecidable());
        assert!(!ElementKind::Numeric.is_nan_undecidable());
    }
}
