//! Serde representation for floats that may be non-finite.
//!
//! JSON has no NaN or infinity, and NaN placement is exactly what the
//! comparator cares about, so non-finite floats are written as the tokens
//! `"nan"`, `"inf"` and `"-inf"`. Finite floats stay plain JSON numbers.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub const NAN_TOKEN: &str = "nan";
pub const POS_INF_TOKEN: &str = "inf";
pub const NEG_INF_TOKEN: &str = "-inf";

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum Repr {
    Number(f64),
    Token(String),
}

impl From<f64> for Repr {
    fn from(v: f64) -> Self {
        if v.is_nan() {
            Repr::Token(NAN_TOKEN.to_string())
        } else if v == f64::INFINITY {
            Repr::Token(POS_INF_TOKEN.to_string())
        } else if v == f64::NEG_INFINITY {
            Repr::Token(NEG_INF_TOKEN.to_string())
        } else {
            Repr::Number(v)
        }
    }
}

impl Repr {
    fn into_f64(self) -> Result<f64, String> {
        match self {
            Repr::Number(v) => Ok(v),
            Repr::Token(t) => match t.as_str() {
                NAN_TOKEN => Ok(f64::NAN),
                POS_INF_TOKEN => Ok(f64::INFINITY),
                NEG_INF_TOKEN => Ok(f64::NEG_INFINITY),
                other => Err(format!("unknown float token `{}`", other)),
            },
        }
    }
}

pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    Repr::from(*value).serialize(serializer)
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Repr::deserialize(deserializer)?
        .into_f64()
        .map_err(D::Error::custom)
}

/// Same encoding for a whole float buffer.
pub mod vec {
    use super::Repr;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(values: &[f64], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(values.iter().map(|v| Repr::from(*v)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<f64>, D::Error> {
        Vec::<Repr>::deserialize(deserializer)?
            .into_iter()
            .map(|r| r.into_f64().map_err(D::Error::custom))
            .collect()
    }
}
