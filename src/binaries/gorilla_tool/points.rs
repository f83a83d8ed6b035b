use anyhow::{anyhow, Context};
use gorilla_codec::{Datum, Series, Values};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The JSON shape read by `encode` and printed by `decode`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Points {
    pub timestamps: Vec<u64>,
    pub values: Vec<Value>,
}

impl Points {
    /// Numbers become floats, as every JSON number is a double.
    pub fn into_series(self) -> anyhow::Result<Series> {
        let data = self
            .values
            .into_iter()
            .enumerate()
            .map(|(i, v)| match v {
                Value::Bool(b) => Ok(Datum::Bool(b)),
                Value::String(s) => Ok(Datum::Str(s)),
                Value::Number(n) => n
                    .as_f64()
                    .map(Datum::Float)
                    .ok_or_else(|| anyhow!("value {} is not representable as a float", i)),
                other => Err(anyhow!("value {} has unsupported type: {}", i, other)),
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        let values = Values::from_data(data).context("values must share one type")?;
        Ok(Series::new(self.timestamps, values)?)
    }

    pub fn from_series(series: Series) -> Self {
        let (timestamps, values) = series.into_parts();
        let values = match values {
            Values::Float(values) => values.into_iter().map(float_value).collect(),
            Values::Bool(values) => values.into_iter().map(Value::Bool).collect(),
            Values::Str(values) => values.into_iter().map(Value::String).collect(),
            Values::Integer(values) => values.into_iter().map(Value::from).collect(),
        };

        Self { timestamps, values }
    }
}

// JSON has no NaN or infinities
fn float_value(v: f64) -> Value {
    serde_json::Number::from_f64(v)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}
