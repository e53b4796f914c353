use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::{fmt, ops::Index, slice, str::FromStr};

use crate::error::TidesError;

/// Format of the `t` field in every row the API returns.
pub const ROW_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Declares a closed set of API values with its wire spelling.
///
/// Every generated enum gets `as_str`, `all`, `Display`, `FromStr`, and serde
/// support through the wire strings.
macro_rules! api_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident as $kind:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $wire, )+
                }
            }

            pub const fn all() -> &'static [$name] {
                &[ $( $name::$variant, )+ ]
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = TidesError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value {
                    $( $wire => Ok($name::$variant), )+
                    _ => Err(TidesError::UnknownValue {
                        kind: $kind,
                        value: value.to_string(),
                    }),
                }
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let value = String::deserialize(deserializer)?;
                value.parse().map_err(de::Error::custom)
            }
        }
    };
}

api_enum! {
    /// Time zone the returned time stamps are expressed in.
    pub enum TimeZone as "time zone" {
        Gmt => "gmt",
        /// Local standard time of the station, never shifted for DST.
        Local => "lst",
        /// Local time of the station, daylight time when it is observed.
        LocalDst => "lst_ldt",
    }
}

api_enum! {
    /// Sampling interval. Without one the API returns six-minute data.
    pub enum Interval as "interval" {
        /// Only the high and low tides.
        HighLow => "hilo",
        Hour => "h",
    }
}

api_enum! {
    /// Vertical reference for water level products.
    ///
    /// See <https://tidesandcurrents.noaa.gov/api/#datum>.
    pub enum Datum as "datum" {
        ColumbiaRiver => "CRD",
        GreatLakes => "IGLD",
        GreatLakesLowWater => "LWD",
        MeanHigherHighWater => "MHHW",
        MeanHighWater => "MHW",
        MeanTideLevel => "MTL",
        MeanSeaLevel => "MSL",
        MeanLowWater => "MLW",
        MeanLowerLowWater => "MLLW",
        NorthAmericanVertical => "NAVD",
        Station => "STND",
    }
}

api_enum! {
    /// Data products served by the datagetter endpoint.
    ///
    /// See <https://tidesandcurrents.noaa.gov/api/#products>.
    pub enum Product as "product" {
        WaterLevel => "water_level",
        AirTemperature => "air_temperature",
        WaterTemperature => "water_temperature",
        Wind => "wind",
        AirPressure => "air_pressure",
        AirGap => "air_gap",
        Conductivity => "conductivity",
        Visibility => "visibility",
        Humidity => "humidity",
        Salinity => "salinity",
        HourlyHeight => "hourly_height",
        HighLow => "high_low",
        DailyMean => "daily_mean",
        MonthlyMean => "monthly_mean",
        OneMinuteWaterLevel => "one_minute_water_level",
        Predictions => "predictions",
        Datums => "datums",
        Currents => "currents",
    }
}

impl Product {
    /// Water level products are measured against a datum, which the API
    /// then insists on.
    pub fn requires_datum(&self) -> bool {
        matches!(
            self,
            Product::WaterLevel
                | Product::HourlyHeight
                | Product::HighLow
                | Product::DailyMean
                | Product::MonthlyMean
                | Product::OneMinuteWaterLevel
                | Product::Predictions
                | Product::AirGap
        )
    }
}

api_enum! {
    /// Unit system: feet, knots and Fahrenheit or meters, cm/s and Celsius.
    pub enum Unit as "unit" {
        English => "english",
        Metric => "metric",
    }
}

api_enum! {
    /// Named time ranges understood by the API in place of explicit dates.
    pub enum NamedDate as "date" {
        /// The 24 hours starting at the most recent midnight.
        Today => "today",
        /// The most recent data point.
        Latest => "latest",
        /// The 72 hours ending at the most recent data point.
        Recent => "recent",
    }
}

/// Station information the API attaches to observed data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metadata {
    pub id: String,
    pub name: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

/// A single point of a standard (observed) product.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataRow {
    pub time: NaiveDateTime,
    /// `None` when the station reported no value for this time.
    pub value: Option<f64>,
    /// Standard deviation of the samples behind `value`.
    pub sigma: Option<f64>,
    pub flags: Vec<bool>,
    /// `p` for preliminary, `v` for verified.
    pub quality: String,
}

/// A single point of a tide prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionsRow {
    pub time: NaiveDateTime,
    pub value: f64,
    /// `H` or `L` on high/low requests, absent otherwise.
    pub kind: Option<String>,
}

/// Immutable, ordered rows returned by one request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series<R> {
    metadata: Option<Metadata>,
    rows: Vec<R>,
}

pub type DataResult = Series<DataRow>;
pub type PredictionsResult = Series<PredictionsRow>;

impl<R> Series<R> {
    pub fn new(metadata: Option<Metadata>, rows: Vec<R>) -> Self {
        Self { metadata, rows }
    }

    pub fn metadata(&self) -> Option<&Metadata> {
        self.metadata.as_ref()
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn get(&self, index: usize) -> Option<&R> {
        self.rows.get(index)
    }

    pub fn iter(&self) -> slice::Iter<'_, R> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<R> Index<usize> for Series<R> {
    type Output = R;

    fn index(&self, index: usize) -> &R {
        &self.rows[index]
    }
}

impl<'a, R> IntoIterator for &'a Series<R> {
    type Item = &'a R;
    type IntoIter = slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Typed result of a request; which variant depends on the product asked for.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TidesResponse {
    Data(DataResult),
    Predictions(PredictionsResult),
}

impl TidesResponse {
    pub fn metadata(&self) -> Option<&Metadata> {
        match self {
            TidesResponse::Data(d) => d.metadata(),
            TidesResponse::Predictions(p) => p.metadata(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            TidesResponse::Data(d) => d.len(),
            TidesResponse::Predictions(p) => p.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
