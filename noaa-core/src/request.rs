use chrono::NaiveDateTime;
use reqwest::Url;

use crate::{
    error::{Result, TidesError},
    model::{Datum, Interval, NamedDate, Product, TimeZone, Unit},
    time_range::TimeRange,
};

/// Identifies this client to NOAA unless the caller picks another name.
pub const DEFAULT_APPLICATION: &str = "noaa_rs";

/// Builder for one query against the datagetter endpoint.
///
/// Setters take and return `self` so calls can be chained. Setters with a
/// `_str` suffix accept the wire spelling of a value instead of the enum.
///
/// ```
/// use noaa_core::{Datum, NamedDate, Product, TidesRequest, TimeZone, Unit};
///
/// let request = TidesRequest::new()
///     .station("8454000")
///     .product(Product::WaterLevel)
///     .datum(Datum::MeanLowerLowWater)
///     .units(Unit::English)
///     .timezone(TimeZone::Gmt)
///     .date(NamedDate::Latest);
///
/// assert!(request.is_ready());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TidesRequest {
    time_range: TimeRange,
    product: Option<Product>,
    datum: Option<Datum>,
    units: Option<Unit>,
    station: Option<String>,
    interval: Option<Interval>,
    timezone: Option<TimeZone>,
    application: Option<String>,
}

impl TidesRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Beginning of the range; combine with `end_date` or `range`, not both.
    pub fn begin_date(mut self, begin: NaiveDateTime) -> Self {
        self.time_range.begin = Some(begin);
        self
    }

    /// End of the range; combine with `begin_date` or `range`, not both.
    pub fn end_date(mut self, end: NaiveDateTime) -> Self {
        self.time_range.end = Some(end);
        self
    }

    /// Length of the range in hours. On its own it looks back from now.
    pub fn range(mut self, hours: u32) -> Self {
        self.time_range.hours = Some(hours);
        self
    }

    /// Named range. Cannot be combined with any other time setting.
    pub fn date(mut self, date: NamedDate) -> Self {
        self.time_range.date = Some(date);
        self
    }

    pub fn date_str(self, date: &str) -> Result<Self> {
        Ok(self.date(date.parse()?))
    }

    pub fn product(mut self, product: Product) -> Self {
        self.product = Some(product);
        self
    }

    pub fn product_str(self, product: &str) -> Result<Self> {
        Ok(self.product(product.parse()?))
    }

    /// Required for water level products, see [`Product::requires_datum`].
    pub fn datum(mut self, datum: Datum) -> Self {
        self.datum = Some(datum);
        self
    }

    pub fn datum_str(self, datum: &str) -> Result<Self> {
        Ok(self.datum(datum.parse()?))
    }

    pub fn units(mut self, units: Unit) -> Self {
        self.units = Some(units);
        self
    }

    pub fn units_str(self, units: &str) -> Result<Self> {
        Ok(self.units(units.parse()?))
    }

    pub fn station(mut self, station: impl Into<String>) -> Self {
        self.station = Some(station.into());
        self
    }

    /// Optional; the API defaults to six-minute data.
    pub fn interval(mut self, interval: Interval) -> Self {
        self.interval = Some(interval);
        self
    }

    pub fn interval_str(self, interval: &str) -> Result<Self> {
        Ok(self.interval(interval.parse()?))
    }

    pub fn timezone(mut self, timezone: TimeZone) -> Self {
        self.timezone = Some(timezone);
        self
    }

    pub fn timezone_str(self, timezone: &str) -> Result<Self> {
        Ok(self.timezone(timezone.parse()?))
    }

    /// Name reported to NOAA in the `application` parameter.
    pub fn application(mut self, application: impl Into<String>) -> Self {
        self.application = Some(application.into());
        self
    }

    pub fn time_range(&self) -> &TimeRange {
        &self.time_range
    }

    pub fn get_product(&self) -> Option<Product> {
        self.product
    }

    pub fn get_datum(&self) -> Option<Datum> {
        self.datum
    }

    pub fn get_units(&self) -> Option<Unit> {
        self.units
    }

    pub fn get_station(&self) -> Option<&str> {
        self.station.as_deref()
    }

    pub fn get_timezone(&self) -> Option<TimeZone> {
        self.timezone
    }

    /// Application name sent to NOAA, [`DEFAULT_APPLICATION`] unless set.
    pub fn get_application(&self) -> &str {
        self.application.as_deref().unwrap_or(DEFAULT_APPLICATION)
    }

    pub fn has_application(&self) -> bool {
        self.application.is_some()
    }

    pub fn is_ready(&self) -> bool {
        self.validate().is_ok()
    }

    /// Rejects requests the server is guaranteed to refuse.
    ///
    /// Checks run in a fixed order and the first failure is reported.
    pub fn validate(&self) -> Result<()> {
        self.time_range.validate()?;

        let product = self
            .product
            .ok_or_else(|| missing("no NOAA product given"))?;

        if product.requires_datum() && self.datum.is_none() {
            return Err(missing(&format!("product '{product}' requires a datum")));
        }
        if self.units.is_none() {
            return Err(missing("no unit system given"));
        }
        if self.timezone.is_none() {
            return Err(missing("no time zone given"));
        }
        match self.station.as_deref() {
            Some(s) if !s.trim().is_empty() => {}
            _ => return Err(missing("no station id given")),
        }

        Ok(())
    }

    /// Query parameters in the order they are sent. Unset optional values
    /// are left out.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = self.time_range.query_pairs();

        if let Some(product) = self.product {
            pairs.push(("product", product.as_str().to_string()));
        }
        if let Some(datum) = self.datum {
            pairs.push(("datum", datum.as_str().to_string()));
        }
        if let Some(units) = self.units {
            pairs.push(("units", units.as_str().to_string()));
        }
        if let Some(tz) = self.timezone {
            pairs.push(("time_zone", tz.as_str().to_string()));
        }
        if let Some(interval) = self.interval {
            pairs.push(("interval", interval.as_str().to_string()));
        }
        if let Some(station) = &self.station {
            pairs.push(("station", station.trim().to_string()));
        }
        pairs.push(("application", self.get_application().to_string()));
        pairs.push(("format", "json".to_string()));

        pairs
    }

    /// Full URL for this request against `base_url`, after validation.
    pub fn url(&self, base_url: &str) -> Result<Url> {
        self.validate()?;
        Url::parse_with_params(base_url, self.query_pairs())
            .map_err(|e| TidesError::InvalidRequest(format!("invalid base URL '{base_url}': {e}")))
    }
}

fn missing(msg: &str) -> TidesError {
    TidesError::InvalidRequest(msg.to_string())
}
