//! HTTP client for fixer-compatible `latest` rate endpoints.
//!
//! Sends `GET {base_url}?base=USD&symbols=ZAR` and reads the requested
//! symbol out of the `rates` map in the JSON response. Rates may arrive as
//! JSON numbers or numeric strings.

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use gearcat_core::Currency;
use reqwest::{Client, Url};
use rust_decimal::Decimal;
use serde::Deserialize;

use super::RateProvider;
use crate::error::RateSourceError;

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    #[serde(default)]
    base: Option<String>,
    rates: HashMap<String, RateValue>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RateValue {
    Number(serde_json::Number),
    Text(String),
}

impl RateValue {
    fn to_decimal(&self) -> Option<Decimal> {
        match self {
            RateValue::Number(n) => {
                let s = n.to_string();
                Decimal::from_str(&s)
                    .or_else(|_| Decimal::from_scientific(&s))
                    .ok()
            }
            RateValue::Text(s) => Decimal::from_str(s.trim()).ok(),
        }
    }

    fn raw(&self) -> String {
        match self {
            RateValue::Number(n) => n.to_string(),
            RateValue::Text(s) => s.clone(),
        }
    }
}

/// Live rate provider backed by an HTTP rate API.
///
/// Use [`HttpRateProvider::new`] with the configured source URL; in tests,
/// point it at a wiremock server.
pub struct HttpRateProvider {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
}

impl HttpRateProvider {
    /// Creates a provider for the endpoint at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`RateSourceError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`RateSourceError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, RateSourceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
            .user_agent(user_agent)
            .build()?;

        let base_url = Url::parse(base_url.trim()).map_err(|e| RateSourceError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            api_key: None,
        })
    }

    /// Sends `access_key` with every request (fixer.io style).
    #[must_use]
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    /// Builds the request URL with properly percent-encoded query parameters.
    fn build_url(&self, from: &Currency, to: &Currency) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("base", from.as_str());
            pairs.append_pair("symbols", to.as_str());
            if let Some(key) = &self.api_key {
                pairs.append_pair("access_key", key);
            }
        }
        url
    }

    /// Performs a single lookup; retries and time bounds belong to the caller.
    async fn fetch_rate(&self, from: &Currency, to: &Currency) -> Result<Decimal, RateSourceError> {
        let url = self.build_url(from, to);
        // Never echo the query string: it may carry the API key.
        let endpoint = self.base_url.as_str().to_owned();

        tracing::debug!(%from, %to, endpoint = %endpoint, "fetching conversion rate");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RateSourceError::UnexpectedStatus {
                status: status.as_u16(),
                url: endpoint,
            });
        }

        let body = response.text().await?;
        let parsed: LatestRatesResponse =
            serde_json::from_str(&body).map_err(|e| RateSourceError::Deserialize {
                context: format!("rates {from} -> {to} from {endpoint}"),
                source: e,
            })?;

        if let Some(base) = parsed.base.as_deref() {
            if !base.eq_ignore_ascii_case(from.as_str()) {
                tracing::warn!(%from, response_base = base, "rate source answered for a different base");
                return Err(RateSourceError::MissingCurrency {
                    from: from.clone(),
                    to: to.clone(),
                });
            }
        }

        let value = parsed
            .rates
            .iter()
            .find(|(code, _)| code.eq_ignore_ascii_case(to.as_str()))
            .map(|(_, v)| v)
            .ok_or_else(|| RateSourceError::MissingCurrency {
                from: from.clone(),
                to: to.clone(),
            })?;

        match value.to_decimal() {
            Some(rate) if rate > Decimal::ZERO => Ok(rate),
            _ => Err(RateSourceError::InvalidRate {
                from: from.clone(),
                to: to.clone(),
                rate: value.raw(),
            }),
        }
    }
}

impl RateProvider for HttpRateProvider {
    async fn rate(&self, from: &Currency, to: &Currency) -> Result<Decimal, RateSourceError> {
        if from == to {
            return Ok(Decimal::ONE);
        }
        self.fetch_rate(from, to).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zar() -> Currency {
        Currency::new("ZAR").unwrap()
    }

    fn provider(base_url: &str) -> HttpRateProvider {
        HttpRateProvider::new(base_url, 5, "gearcat-test/0.1")
            .expect("provider construction should not fail")
    }

    #[test]
    fn build_url_adds_base_and_symbols() {
        let p = provider("https://api.frankfurter.app/latest");
        let url = p.build_url(&Currency::usd(), &zar());
        assert_eq!(
            url.as_str(),
            "https://api.frankfurter.app/latest?base=USD&symbols=ZAR"
        );
    }

    #[test]
    fn build_url_appends_access_key_when_set() {
        let p = provider("http://data.fixer.io/api/latest").with_api_key(Some("k3y".into()));
        let url = p.build_url(&Currency::usd(), &zar());
        assert_eq!(
            url.as_str(),
            "http://data.fixer.io/api/latest?base=USD&symbols=ZAR&access_key=k3y"
        );
    }

    #[test]
    fn new_rejects_unparseable_url() {
        let err = HttpRateProvider::new("not a url", 5, "ua").err().unwrap();
        assert!(matches!(err, RateSourceError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn rate_value_parses_numbers_and_strings() {
        let from_number: RateValue = serde_json::from_str("18.2531").unwrap();
        assert_eq!(from_number.to_decimal(), Decimal::from_str("18.2531").ok());

        let from_text: RateValue = serde_json::from_str("\"0.0548\"").unwrap();
        assert_eq!(from_text.to_decimal(), Decimal::from_str("0.0548").ok());

        let garbage: RateValue = serde_json::from_str("\"n/a\"").unwrap();
        assert!(garbage.to_decimal().is_none());
    }
}
