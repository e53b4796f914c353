//! Decoding of datagetter JSON documents.
//!
//! The API reports numbers as strings and uses an empty string for a missing
//! value; a row missing one of its keys is malformed. Errors come back as
//! `{"error": {"message": "..."}}`, usually with a 200 status.

use chrono::NaiveDateTime;
use serde::Deserialize;
use serde_json::Value;

use crate::{
    error::{Result, TidesError},
    model::{
        DataResult, DataRow, Metadata, PredictionsResult, PredictionsRow, Product,
        ROW_TIME_FORMAT, TidesResponse,
    },
};

/// Returns the API error message if `body` is an error document.
pub fn api_error(body: &Value) -> Option<String> {
    let error = body.get("error")?;
    let message = error
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| error.to_string());
    Some(message)
}

/// Turns a decoded document into rows for `product`.
///
/// Predictions are read from `predictions`, every other product from `data`.
pub fn parse(product: Product, body: Value) -> Result<TidesResponse> {
    if let Some(message) = api_error(&body) {
        return Err(TidesError::Api(message));
    }

    if product == Product::Predictions {
        let doc: RawPredictionsDocument = serde_json::from_value(body).map_err(malformed)?;
        let rows = doc
            .predictions
            .ok_or_else(|| TidesError::Parse("response has no 'predictions' array".into()))?
            .into_iter()
            .map(PredictionsRow::try_from)
            .collect::<Result<Vec<_>>>()?;
        let metadata = doc.metadata.map(Metadata::from);
        Ok(TidesResponse::Predictions(PredictionsResult::new(metadata, rows)))
    } else {
        let doc: RawDataDocument = serde_json::from_value(body).map_err(malformed)?;
        let rows = doc
            .data
            .ok_or_else(|| TidesError::Parse("response has no 'data' array".into()))?
            .into_iter()
            .map(DataRow::try_from)
            .collect::<Result<Vec<_>>>()?;
        let metadata = doc.metadata.map(Metadata::from);
        Ok(TidesResponse::Data(DataResult::new(metadata, rows)))
    }
}

#[derive(Debug, Deserialize)]
struct RawMetadata {
    #[serde(default)]
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    lat: String,
    #[serde(default)]
    lon: String,
}

#[derive(Debug, Deserialize)]
struct RawDataRow {
    t: String,
    v: String,
    s: String,
    f: String,
    q: String,
}

#[derive(Debug, Deserialize)]
struct RawPredictionsRow {
    t: String,
    v: String,
    #[serde(rename = "type")]
    kind: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawDataDocument {
    metadata: Option<RawMetadata>,
    data: Option<Vec<RawDataRow>>,
}

#[derive(Debug, Deserialize)]
struct RawPredictionsDocument {
    metadata: Option<RawMetadata>,
    predictions: Option<Vec<RawPredictionsRow>>,
}

impl From<RawMetadata> for Metadata {
    fn from(raw: RawMetadata) -> Self {
        Metadata {
            id: raw.id,
            name: raw.name,
            lat: raw.lat.trim().parse().ok(),
            lon: raw.lon.trim().parse().ok(),
        }
    }
}

impl TryFrom<RawDataRow> for DataRow {
    type Error = TidesError;

    fn try_from(raw: RawDataRow) -> Result<Self> {
        let flags = if raw.f.trim().is_empty() {
            Vec::new()
        } else {
            raw.f
                .split(',')
                .map(|flag| match flag.trim() {
                    "0" => Ok(false),
                    "1" => Ok(true),
                    other => Err(TidesError::Parse(format!("bad flag '{other}' at {}", raw.t))),
                })
                .collect::<Result<Vec<_>>>()?
        };

        Ok(DataRow {
            time: parse_time(&raw.t)?,
            value: parse_optional(&raw.v, "v")?,
            sigma: parse_optional(&raw.s, "s")?,
            flags,
            quality: raw.q,
        })
    }
}

impl TryFrom<RawPredictionsRow> for PredictionsRow {
    type Error = TidesError;

    fn try_from(raw: RawPredictionsRow) -> Result<Self> {
        let value = parse_optional(&raw.v, "v")?
            .ok_or_else(|| TidesError::Parse(format!("prediction at {} has no value", raw.t)))?;

        Ok(PredictionsRow {
            time: parse_time(&raw.t)?,
            value,
            kind: raw.kind.filter(|k| !k.is_empty()),
        })
    }
}

fn malformed(e: serde_json::Error) -> TidesError {
    TidesError::Parse(format!("malformed document: {e}"))
}

fn parse_time(t: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(t.trim(), ROW_TIME_FORMAT)
        .map_err(|e| TidesError::Parse(format!("bad time '{t}': {e}")))
}

fn parse_optional(raw: &str, field: &str) -> Result<Option<f64>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse()
        .map(Some)
        .map_err(|_| TidesError::Parse(format!("bad number '{raw}' in field '{field}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_observed_data_with_metadata() {
        let body = json!({
            "metadata": {"id": "8454000", "name": "Providence", "lat": "41.8072", "lon": "-71.4007"},
            "data": [
                {"t": "2019-04-15 00:00", "v": "1.154", "s": "0.003", "f": "1,0,0,0", "q": "v"},
                {"t": "2019-04-15 00:06", "v": "", "s": "", "f": "0,0,0,0", "q": "p"}
            ]
        });

        let TidesResponse::Data(result) = parse(Product::WaterLevel, body).unwrap() else {
            panic!("expected observed data");
        };

        assert_eq!(result.len(), 2);
        let meta = result.metadata().unwrap();
        assert_eq!(meta.name, "Providence");
        assert_eq!(meta.lat, Some(41.8072));

        let first = &result[0];
        assert_eq!(first.time.to_string(), "2019-04-15 00:00:00");
        assert_eq!(first.value, Some(1.154));
        assert_eq!(first.sigma, Some(0.003));
        assert_eq!(first.flags, vec![true, false, false, false]);
        assert_eq!(first.quality, "v");

        assert_eq!(result[1].value, None);
        assert_eq!(result[1].quality, "p");
    }

    #[test]
    fn parses_high_low_predictions() {
        let body = json!({
            "predictions": [
                {"t": "2019-04-15 04:12", "v": "1.412", "type": "H"},
                {"t": "2019-04-15 10:30", "v": "-0.051", "type": "L"}
            ]
        });

        let TidesResponse::Predictions(result) = parse(Product::Predictions, body).unwrap() else {
            panic!("expected predictions");
        };

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].kind.as_deref(), Some("H"));
        assert_eq!(result[1].value, -0.051);
        assert!(result.metadata().is_none());
    }

    #[test]
    fn predictions_without_type_have_no_kind() {
        let body = json!({"predictions": [{"t": "2019-04-15 00:00", "v": "0.5"}]});
        let TidesResponse::Predictions(result) = parse(Product::Predictions, body).unwrap() else {
            panic!("expected predictions");
        };
        assert_eq!(result[0].kind, None);
    }

    #[test]
    fn error_document_becomes_api_error() {
        let body = json!({"error": {"message": "No data was found."}});
        let err = parse(Product::WaterLevel, body).unwrap_err();
        assert!(matches!(err, TidesError::Api(ref m) if m == "No data was found."));
    }

    #[test]
    fn row_missing_a_field_is_rejected() {
        let body = json!({
            "data": [{"t": "2019-04-15 00:00", "s": "5.2", "d": "180", "dr": "S", "g": "7.0", "f": "0,0"}]
        });
        let err = parse(Product::Wind, body).unwrap_err();
        assert!(matches!(err, TidesError::Parse(_)));
        assert!(err.to_string().contains("missing field `v`"));
    }

    #[test]
    fn missing_array_is_parse_error() {
        let err = parse(Product::Predictions, json!({"data": []})).unwrap_err();
        assert!(err.to_string().contains("no 'predictions' array"));
    }

    #[test]
    fn malformed_row_is_parse_error() {
        let body = json!({"data": [{"t": "yesterday", "v": "1.0", "s": "0", "f": "0", "q": "p"}]});
        let err = parse(Product::WaterLevel, body).unwrap_err();
        assert!(err.to_string().contains("bad time 'yesterday'"));

        let body = json!({"data": [{"t": "2019-04-15 00:00", "v": "abc", "s": "", "f": "0", "q": "p"}]});
        let err = parse(Product::WaterLevel, body).unwrap_err();
        assert!(err.to_string().contains("bad number 'abc'"));
    }
}
