use crate::error::{Error, Result};

/// A homogeneous value column.
#[derive(Debug, Clone, PartialEq)]
pub enum Values {
    Integer(Vec<i64>),
    Float(Vec<f64>),
    Bool(Vec<bool>),
    Str(Vec<String>),
}

impl Values {
    pub fn len(&self) -> usize {
        match self {
            Self::Integer(values) => values.len(),
            Self::Float(values) => values.len(),
            Self::Bool(values) => values.len(),
            Self::Str(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::Bool(_) => "boolean",
            Self::Str(_) => "string",
        }
    }

    /// Builds a column from dynamically typed scalars. Every datum must be of
    /// the same type as the first; an empty input yields an empty boolean
    /// column.
    pub fn from_data(data: Vec<Datum>) -> Result<Self> {
        let values = match data.first() {
            None => Values::Bool(vec![]),
            Some(Datum::Integer(_)) => Values::Integer(collect(data, "integer", |d| match d {
                Datum::Integer(v) => Ok(v),
                d => Err(d),
            })?),
            Some(Datum::Float(_)) => Values::Float(collect(data, "float", |d| match d {
                Datum::Float(v) => Ok(v),
                d => Err(d),
            })?),
            Some(Datum::Bool(_)) => Values::Bool(collect(data, "boolean", |d| match d {
                Datum::Bool(v) => Ok(v),
                d => Err(d),
            })?),
            Some(Datum::Str(_)) => Values::Str(collect(data, "string", |d| match d {
                Datum::Str(v) => Ok(v),
                d => Err(d),
            })?),
        };

        Ok(values)
    }
}

fn collect<T>(
    data: Vec<Datum>,
    column: &'static str,
    unwrap: impl Fn(Datum) -> std::result::Result<T, Datum>,
) -> Result<Vec<T>> {
    data.into_iter()
        .enumerate()
        .map(|(i, d)| {
            unwrap(d).map_err(|d| {
                Error::malformed(format!(
                    "value at position {} is {}, column is {}",
                    i,
                    d.type_name(),
                    column
                ))
            })
        })
        .collect()
}

impl From<Vec<f64>> for Values {
    fn from(v: Vec<f64>) -> Self {
        Values::Float(v)
    }
}

impl From<Vec<bool>> for Values {
    fn from(v: Vec<bool>) -> Self {
        Values::Bool(v)
    }
}

impl From<Vec<String>> for Values {
    fn from(v: Vec<String>) -> Self {
        Values::Str(v)
    }
}

impl From<Vec<i64>> for Values {
    fn from(v: Vec<i64>) -> Self {
        Values::Integer(v)
    }
}

/// A single dynamically typed value.
#[derive(Debug, Clone, PartialEq)]
pub enum Datum {
    Integer(i64),
    Float(f64),
    Bool(bool),
    Str(String),
}

impl Datum {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::Bool(_) => "boolean",
            Self::Str(_) => "string",
        }
    }
}

/// Series pairs a timestamp column with a value column of the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    timestamps: Vec<u64>,
    values: Values,
}

impl Series {
    pub fn new(timestamps: Vec<u64>, values: impl Into<Values>) -> Result<Self> {
        let values = values.into();
        if timestamps.len() != values.len() {
            return Err(Error::malformed(format!(
                "{} timestamps but {} values",
                timestamps.len(),
                values.len()
            )));
        }

        Ok(Self { timestamps, values })
    }

    pub fn timestamps(&self) -> &[u64] {
        &self.timestamps
    }

    pub fn values(&self) -> &Values {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn into_parts(self) -> (Vec<u64>, Values) {
        (self.timestamps, self.values)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::ErrorKind;
    use crate::value::{Datum, Series, Values};

    #[test]
    fn test_from_data() {
        let values = Values::from_data(vec![Datum::Float(1.0), Datum::Float(-2.5)]).unwrap();
        assert_eq!(values, Values::Float(vec![1.0, -2.5]));

        let values =
            Values::from_data(vec![Datum::Str("a".into()), Datum::Str("".into())]).unwrap();
        assert_eq!(values, Values::Str(vec!["a".to_string(), String::new()]));

        let values = Values::from_data(vec![Datum::Integer(-3)]).unwrap();
        assert_eq!(values.type_name(), "integer");
    }

    #[test]
    fn test_from_data_empty_is_bool() {
        let values = Values::from_data(vec![]).unwrap();
        assert_eq!(values, Values::Bool(vec![]));
        assert!(values.is_empty());
    }

    #[test]
    fn test_from_data_mixed() {
        let err = Values::from_data(vec![Datum::Bool(true), Datum::Float(1.0)]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);

        let err = Values::from_data(vec![Datum::Str("x".into()), Datum::Bool(false)]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
    }

    #[test]
    fn test_series_length_mismatch() {
        let err = Series::new(vec![1, 2, 3], vec![1.0, 2.0]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);

        let s = Series::new(vec![1, 2], vec![true, false]).unwrap();
        assert_eq!(s.len(), 2);
        let (ts, values) = s.into_parts();
        assert_eq!(ts, vec![1, 2]);
        assert_eq!(values, Values::Bool(vec![true, false]));
    }
}
