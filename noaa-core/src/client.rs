use async_trait::async_trait;
use serde_json::Value;
use std::{fmt::Debug, time::Duration};

use crate::{
    Config, TidesRequest, TidesResponse,
    client::noaa::NoaaClient,
    error::{Result, TidesError},
    response,
};

pub mod noaa;

/// Something that can answer datagetter requests.
#[async_trait]
pub trait TidesApi: Send + Sync + Debug {
    /// Sends `request` and returns the JSON document as received.
    ///
    /// Invalid requests fail before anything is sent, and error documents
    /// are turned into [`TidesError::Api`].
    async fn fetch_json(&self, request: &TidesRequest) -> Result<Value>;

    /// Sends `request` and decodes the rows for its product.
    async fn fetch(&self, request: &TidesRequest) -> Result<TidesResponse> {
        let product = request
            .get_product()
            .ok_or_else(|| TidesError::InvalidRequest("no NOAA product given".into()))?;
        let body = self.fetch_json(request).await?;
        response::parse(product, body)
    }
}

/// Construct the NOAA client using the endpoint and timeout from config.
pub fn client_from_config(config: &Config) -> anyhow::Result<Box<dyn TidesApi>> {
    let client = NoaaClient::with_settings(
        config.base_url(),
        Duration::from_secs(config.timeout_secs()),
    )?;
    Ok(Box::new(client))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NamedDate, Product, TimeZone, Unit};
    use serde_json::json;
    use std::sync::Mutex;

    /// Serves a fixed document and remembers what it was asked for.
    #[derive(Debug)]
    struct CannedApi {
        body: Value,
        seen: Mutex<Vec<TidesRequest>>,
    }

    #[async_trait]
    impl TidesApi for CannedApi {
        async fn fetch_json(&self, request: &TidesRequest) -> Result<Value> {
            request.validate()?;
            self.seen.lock().unwrap().push(request.clone());
            Ok(self.body.clone())
        }
    }

    fn air_temperature() -> TidesRequest {
        TidesRequest::new()
            .date(NamedDate::Latest)
            .product(Product::AirTemperature)
            .units(Unit::Metric)
            .timezone(TimeZone::Gmt)
            .station("8454000")
    }

    #[tokio::test]
    async fn default_fetch_decodes_by_product() {
        let api = CannedApi {
            body: json!({"data": [{"t": "2019-04-15 00:00", "v": "12.1", "s": "", "f": "0,0,0", "q": "p"}]}),
            seen: Mutex::new(Vec::new()),
        };

        let response = api.fetch(&air_temperature()).await.unwrap();
        assert!(matches!(response, TidesResponse::Data(ref d) if d[0].value == Some(12.1)));
        assert_eq!(api.seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn default_fetch_needs_product() {
        let api = CannedApi {
            body: json!({}),
            seen: Mutex::new(Vec::new()),
        };

        let err = api.fetch(&TidesRequest::new()).await.unwrap_err();
        assert!(err.to_string().contains("no NOAA product"));
        assert!(api.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn client_from_default_config() {
        let cfg = Config::default();
        assert!(client_from_config(&cfg).is_ok());
    }

    #[test]
    fn client_from_config_rejects_bad_base_url() {
        let cfg = Config {
            base_url: Some("not a url".into()),
            ..Config::default()
        };
        let err = client_from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("invalid base URL"));
    }
}
