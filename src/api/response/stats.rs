use serde::de;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::Error;
use crate::schema::{Schema, Shape};
use crate::utils::to_snake_case;

lazy_static! {
    /* The portal spells the grid channel both `Gc` and `gc` in the same
     * payload; both keys feed the one `gc` field, capitalized first. Other
     * channels (kwh, solar yield, ...) pass through undeclared. */
    pub static ref CONSUMPTION_RECORDS: Schema = Schema::permissive("ConsumptionRecords")
        .optional("pc")
        .wire("Pc")
        .shape(Shape::StatsChannel)
        .optional("bc")
        .wire("Bc")
        .shape(Shape::StatsChannel)
        .field("gc")
        .wire("Gc")
        .shape(Shape::StatsChannel)
        .finish();

    pub static ref CONSUMPTION_STATS_RESPONSE: Schema =
        Schema::strict("ConsumptionStatsResponse")
            .field("success")
            .field("records")
            .shape(Shape::Model(&CONSUMPTION_RECORDS))
            .field("totals")
            .finish();
}

/// One sample of a statistics channel. On the wire this is a two-element
/// `[timestamp, value]` array with the timestamp in epoch milliseconds;
/// the value is `null` for gaps.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsPoint {
    pub timestamp: i64,
    pub value: Option<f64>,
}

impl<'de> serde::Deserialize<'de> for StatsPoint {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(d)?;
        match &raw {
            Value::Array(pair) if pair.len() == 2 => Ok(StatsPoint {
                timestamp: pair[0]
                    .as_i64()
                    .ok_or_else(|| de::Error::custom("point timestamp must be an integer"))?,
                value: point_value(&pair[1])?,
            }),
            Value::Object(map) => Ok(StatsPoint {
                timestamp: map
                    .get("timestamp")
                    .and_then(Value::as_i64)
                    .ok_or_else(|| de::Error::missing_field("timestamp"))?,
                value: point_value(map.get("value").unwrap_or(&Value::Null))?,
            }),
            _ => Err(de::Error::custom("expected a [timestamp, value] pair")),
        }
    }
}

fn point_value<E: de::Error>(raw: &Value) -> Result<Option<f64>, E> {
    match raw {
        Value::Null => Ok(None),
        other => other
            .as_f64()
            .map(Some)
            .ok_or_else(|| de::Error::custom("point value must be a number or null")),
    }
}

/// A statistics channel. The portal returns the literal `false` for a
/// channel that carries no data of the requested type; that is kept
/// distinct from an empty (and from a populated) point list.
#[derive(Debug, Clone, PartialEq)]
pub enum StatsSeries {
    Unavailable,
    Points(Vec<StatsPoint>),
}

impl StatsSeries {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, StatsSeries::Unavailable)
    }

    /// The points of the series; empty when the channel is unavailable.
    pub fn points(&self) -> &[StatsPoint] {
        match self {
            StatsSeries::Unavailable => &[],
            StatsSeries::Points(points) => points,
        }
    }
}

impl<'de> serde::Deserialize<'de> for StatsSeries {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        match Value::deserialize(d)? {
            Value::Bool(false) => Ok(StatsSeries::Unavailable),
            Value::Array(items) => {
                let mut points = Vec::with_capacity(items.len());
                for item in items {
                    points.push(StatsPoint::deserialize(item).map_err(de::Error::custom)?);
                }
                Ok(StatsSeries::Points(points))
            }
            other => Err(de::Error::custom(format!(
                "expected a point list or the literal false, got {}",
                other
            ))),
        }
    }
}

/// The `records` block of a consumption stats response.
#[derive(Debug, Deserialize)]
pub struct ConsumptionRecords {
    #[serde(default)]
    pub pc: Option<StatsSeries>,
    #[serde(default)]
    pub bc: Option<StatsSeries>,
    pub gc: StatsSeries,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ConsumptionRecords {
    /// Look up a channel under any spelling of its name (`"Pc"`, `"pc"`,
    /// `"PC"` all resolve to the same channel). Undeclared channels are
    /// read out of the retained extras and validated on the fly.
    pub fn channel(&self, name: &str) -> Result<Option<StatsSeries>, Error> {
        let folded = to_snake_case(name);
        match folded.as_str() {
            "pc" => Ok(self.pc.clone()),
            "bc" => Ok(self.bc.clone()),
            "gc" => Ok(Some(self.gc.clone())),
            _ => match self.extra.iter().find(|(key, _)| to_snake_case(key) == folded) {
                None => Ok(None),
                Some((key, value)) => serde_json::from_value(value.clone()).map(Some).map_err(|e| {
                    Error::Validation {
                        path: format!("ConsumptionRecords.{}", key),
                        detail: e.to_string(),
                    }
                }),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ConsumptionStatsResponse {
    pub success: bool,
    pub records: ConsumptionRecords,
    pub totals: Map<String, Value>,
}

impl ConsumptionStatsResponse {
    /// Look up a totals entry under any spelling of its channel name.
    pub fn total(&self, name: &str) -> Option<&Value> {
        let folded = to_snake_case(name);
        self.totals
            .iter()
            .find(|(key, _)| to_snake_case(key) == folded)
            .map(|(_, value)| value)
    }
}
