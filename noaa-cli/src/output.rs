use noaa_core::{DataResult, PredictionsResult, TidesResponse};
use std::io::{self, Write};

pub fn write_response<W: Write>(out: &mut W, response: &TidesResponse) -> io::Result<()> {
    if let Some(meta) = response.metadata() {
        write!(out, "Station {} {}", meta.id, meta.name)?;
        if let (Some(lat), Some(lon)) = (meta.lat, meta.lon) {
            write!(out, " ({lat:.4}, {lon:.4})")?;
        }
        writeln!(out)?;
    }

    match response {
        TidesResponse::Data(data) => write_data(out, data),
        TidesResponse::Predictions(predictions) => write_predictions(out, predictions),
    }
}

/// Typed rows as pretty JSON, numbers and timestamps already decoded.
pub fn write_json<W: Write>(out: &mut W, response: &TidesResponse) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, response)?;
    writeln!(out)
}

fn write_data<W: Write>(out: &mut W, data: &DataResult) -> io::Result<()> {
    writeln!(out, "{:<16}  {:>8}  {:>7}  {:<8}  Q", "Time", "Value", "Sigma", "Flags")?;
    for row in data {
        let flags: String = row
            .flags
            .iter()
            .map(|&f| if f { '1' } else { '0' })
            .collect();
        writeln!(
            out,
            "{:<16}  {:>8}  {:>7}  {:<8}  {}",
            row.time.format("%Y-%m-%d %H:%M"),
            fmt_opt(row.value, 3),
            fmt_opt(row.sigma, 3),
            flags,
            row.quality,
        )?;
    }
    Ok(())
}

fn write_predictions<W: Write>(out: &mut W, predictions: &PredictionsResult) -> io::Result<()> {
    writeln!(out, "{:<16}  {:>8}  Type", "Time", "Value")?;
    for row in predictions {
        writeln!(
            out,
            "{:<16}  {:>8.3}  {}",
            row.time.format("%Y-%m-%d %H:%M"),
            row.value,
            row.kind.as_deref().unwrap_or("-"),
        )?;
    }
    Ok(())
}

fn fmt_opt(value: Option<f64>, precision: usize) -> String {
    value
        .map(|v| format!("{v:.precision$}"))
        .unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use noaa_core::{DataRow, Metadata, PredictionsRow};

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    fn render(response: &TidesResponse) -> String {
        let mut buf = Vec::new();
        write_response(&mut buf, response).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn data_table_shows_missing_values_as_dash() {
        let meta = Metadata {
            id: "8454000".into(),
            name: "Providence".into(),
            lat: Some(41.8072),
            lon: Some(-71.4007),
        };
        let rows = vec![
            DataRow {
                time: at("2019-04-15 00:00"),
                value: Some(1.154),
                sigma: Some(0.003),
                flags: vec![true, false, false, false],
                quality: "v".into(),
            },
            DataRow {
                time: at("2019-04-15 00:06"),
                value: None,
                sigma: None,
                flags: vec![],
                quality: "p".into(),
            },
        ];

        let text = render(&TidesResponse::Data(DataResult::new(Some(meta), rows)));
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines[0], "Station 8454000 Providence (41.8072, -71.4007)");
        assert!(lines[2].starts_with("2019-04-15 00:00"));
        assert!(lines[2].contains("1.154"));
        assert!(lines[2].contains("1000"));
        assert!(lines[3].contains(" - "));
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn predictions_table_shows_kind() {
        let rows = vec![PredictionsRow {
            time: at("2019-04-15 04:12"),
            value: 4.4,
            kind: Some("H".into()),
        }];

        let text = render(&TidesResponse::Predictions(PredictionsResult::new(None, rows)));
        let lines: Vec<_> = text.lines().collect();

        assert!(lines[0].starts_with("Time"));
        assert_eq!(lines[1], "2019-04-15 04:12     4.400  H");
    }

    #[test]
    fn json_output_keeps_typed_rows() {
        let rows = vec![
            PredictionsRow {
                time: at("2019-04-15 04:12"),
                value: 1.412,
                kind: Some("H".into()),
            },
            PredictionsRow {
                time: at("2019-04-15 10:30"),
                value: -0.051,
                kind: None,
            },
        ];

        let mut buf = Vec::new();
        write_json(&mut buf, &TidesResponse::Predictions(PredictionsResult::new(None, rows)))
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();

        assert!(value["metadata"].is_null());
        assert_eq!(value["rows"][0]["time"], "2019-04-15T04:12:00");
        assert_eq!(value["rows"][0]["value"], 1.412);
        assert_eq!(value["rows"][0]["kind"], "H");
        assert!(value["rows"][1]["kind"].is_null());
    }

    #[test]
    fn json_output_of_data_has_no_variant_tag() {
        let rows = vec![DataRow {
            time: at("2019-04-15 00:06"),
            value: None,
            sigma: Some(0.003),
            flags: vec![false, true],
            quality: "p".into(),
        }];

        let mut buf = Vec::new();
        write_json(&mut buf, &TidesResponse::Data(DataResult::new(None, rows))).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();

        assert!(value.get("Data").is_none());
        let row = &value["rows"][0];
        assert!(row["value"].is_null());
        assert_eq!(row["sigma"], 0.003);
        assert_eq!(row["flags"], serde_json::json!([false, true]));
        assert_eq!(row["quality"], "p");
    }
}
