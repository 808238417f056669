use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::Url;
use serde::{Deserialize, Deserializer};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{Error, Result};

const USER_AGENT: &str = concat!("wxnow/", env!("CARGO_PKG_VERSION"));

/// Body of a `forecast.json` response. Only the parts we display are kept.
#[derive(Deserialize, Debug, Default)]
pub struct Response {
    pub location: Location,

    pub current: Current,

    #[serde(default)]
    pub alerts: Option<Alerts>,
}

impl Response {
    pub fn alerts(&self) -> &[Alert] {
        self.alerts.as_ref().map_or(&[][..], |a| a.alert.as_slice())
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct Location {
    pub name: String,
    pub country: String,
}

#[derive(Deserialize, Debug, Default)]
pub struct Current {
    #[serde(default)]
    pub last_updated: String,

    pub temp_c: f32,

    #[serde(default)]
    pub temp_f: f32,

    pub feelslike_c: f32,

    #[serde(default)]
    pub feelslike_f: f32,

    /// 1 during daylight at the location, 0 otherwise.
    pub is_day: u8,

    pub condition: Condition,

    pub wind_kph: f32,

    #[serde(default)]
    pub wind_mph: f32,

    #[serde(default)]
    pub wind_degree: Option<f32>,

    #[serde(default)]
    pub wind_dir: String,

    #[serde(default)]
    pub humidity: Option<f32>,
}

#[derive(Deserialize, Debug, Default)]
pub struct Condition {
    pub text: String,

    pub code: u16,
}

#[derive(Deserialize, Debug, Default)]
pub struct Alerts {
    #[serde(default)]
    pub alert: Vec<Alert>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(default)]
pub struct Alert {
    #[serde(deserialize_with = "null_as_empty")]
    pub headline: String,

    #[serde(deserialize_with = "null_as_empty")]
    pub severity: String,

    #[serde(deserialize_with = "null_as_empty")]
    pub effective: String,

    #[serde(deserialize_with = "null_as_empty")]
    pub desc: String,
}

/// The alert feed sends `null` for fields it has nothing for.
fn null_as_empty<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<String, D::Error> {
    Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
}

/// Client for the WeatherAPI.com forecast endpoint at one fixed location.
#[derive(Debug)]
pub struct WeatherApi {
    client: Client,
    base_url: String,
    api_key: String,
    latitude: f64,
    longitude: f64,
    alerts: bool,
}

impl WeatherApi {
    pub fn new(config: &Config) -> Result<Self> {
        if !config.has_api_key() {
            return Err(Error::MissingApiKey);
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.trim().to_string(),
            latitude: config.latitude,
            longitude: config.longitude,
            alerts: config.alerts,
        })
    }

    pub fn forecast_url(&self) -> Result<Url> {
        let alerts = if self.alerts { "yes" } else { "no" };
        let q = format!("{},{}", self.latitude, self.longitude);
        Url::parse_with_params(
            &format!("{}/forecast.json", self.base_url),
            &[("key", self.api_key.as_str()), ("q", &q), ("alerts", alerts)],
        )
        .map_err(|e| Error::InvalidUrl(e.to_string()))
    }

    /// One GET, no retry. Any non-2xx status is an error.
    pub fn fetch(&self) -> Result<Response> {
        let url = self.forecast_url()?;
        debug!(
            lat = self.latitude,
            lon = self.longitude,
            alerts = self.alerts,
            "requesting forecast"
        );

        let response = self.client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            warn!(%status, "weather request rejected");
            return Err(Error::Status(status));
        }

        let body: Response = response.json()?;
        debug!(
            location = %body.location.name,
            code = body.current.condition.code,
            alerts = body.alerts().len(),
            "forecast received"
        );
        Ok(body)
    }
}

#[cfg(test)]
pub(crate) const SAMPLE_RESPONSE: &str = r#"{
    "location": {
        "name": "Sutton",
        "region": "Greater London",
        "country": "United Kingdom",
        "lat": 51.36,
        "lon": -0.19,
        "tz_id": "Europe/London",
        "localtime_epoch": 1760697600,
        "localtime": "2025-10-17 11:40"
    },
    "current": {
        "last_updated_epoch": 1760697000,
        "last_updated": "2025-10-17 11:30",
        "temp_c": 14.2,
        "temp_f": 57.6,
        "is_day": 1,
        "condition": {
            "text": "Light rain",
            "icon": "//cdn.weatherapi.com/weather/64x64/day/296.png",
            "code": 1183
        },
        "wind_mph": 9.4,
        "wind_kph": 15.1,
        "wind_degree": 225,
        "wind_dir": "SW",
        "humidity": 88,
        "feelslike_c": 12.9,
        "feelslike_f": 55.2
    },
    "forecast": { "forecastday": [] },
    "alerts": {
        "alert": [
            {
                "headline": "Yellow warning for rain",
                "msgtype": null,
                "severity": "Moderate",
                "urgency": "Expected",
                "areas": "London & South East England",
                "category": "Met",
                "certainty": "Likely",
                "event": "Rain",
                "note": null,
                "effective": "2025-10-17T09:00:00+00:00",
                "expires": "2025-10-17T21:00:00+00:00",
                "desc": "Heavy rain may cause some travel disruption.",
                "instruction": null
            },
            {
                "headline": "Yellow warning for wind",
                "severity": "Minor",
                "effective": "not a date",
                "desc": "Gusty winds."
            }
        ]
    }
}"#;

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(base_url: &str) -> Config {
        Config {
            api_key: "test-key".to_string(),
            base_url: base_url.to_string(),
            timeout_secs: 5,
            ..Config::default()
        }
    }

    /// The blocking client must not run on the async test runtime.
    async fn fetch(config: Config) -> Result<Response> {
        tokio::task::spawn_blocking(move || -> Result<Response> {
            WeatherApi::new(&config)?.fetch()
        })
        .await
        .unwrap()
    }

    #[test]
    fn test_parse_sample() {
        let response: Response = serde_json::from_str(SAMPLE_RESPONSE).unwrap();
        assert_eq!(response.location.name, "Sutton");
        assert_eq!(response.current.condition.code, 1183);
        assert_eq!(response.current.wind_degree, Some(225.0));
        assert_eq!(response.alerts().len(), 2);
        assert_eq!(response.alerts()[1].headline, "Yellow warning for wind");
    }

    #[test]
    fn test_parse_without_alerts() {
        let json = r#"{
            "location": {"name": "Nowhere", "country": "Atlantis"},
            "current": {
                "temp_c": 1.0, "feelslike_c": -2.0, "is_day": 0, "wind_kph": 3.0,
                "condition": {"text": "Clear", "code": 1000}
            }
        }"#;
        let response: Response = serde_json::from_str(json).unwrap();
        assert!(response.alerts().is_empty());
        assert_eq!(response.current.humidity, None);
    }

    #[test]
    fn test_null_alert_fields_are_empty() {
        let json = r#"{
            "location": {"name": "Sutton", "country": "United Kingdom"},
            "current": {
                "temp_c": 9.0, "feelslike_c": 7.0, "is_day": 1, "wind_kph": 10.0,
                "condition": {"text": "Overcast", "code": 1009}
            },
            "alerts": {"alert": [
                {"headline": null, "severity": "Minor", "effective": null, "desc": null}
            ]}
        }"#;
        let response: Response = serde_json::from_str(json).unwrap();
        let alert = &response.alerts()[0];
        assert_eq!(alert.headline, "");
        assert_eq!(alert.desc, "");
        assert_eq!(alert.effective, "");
        assert_eq!(alert.severity, "Minor");
    }

    #[test]
    fn test_forecast_url() {
        let mut config = config("https://api.weatherapi.com/v1/");
        config.latitude = -48.3319;
        config.longitude = 0.7446;
        let url = WeatherApi::new(&config).unwrap().forecast_url().unwrap();

        assert_eq!(url.path(), "/v1/forecast.json");
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("key".to_string(), "test-key".to_string()),
                ("q".to_string(), "-48.3319,0.7446".to_string()),
                ("alerts".to_string(), "yes".to_string()),
            ]
        );

        config.alerts = false;
        let url = WeatherApi::new(&config).unwrap().forecast_url().unwrap();
        assert!(url.query().unwrap().ends_with("alerts=no"));
    }

    #[test]
    fn test_unparsable_base_url() {
        let api = WeatherApi::new(&config("not a url")).unwrap();
        assert!(matches!(api.forecast_url(), Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn test_missing_key_rejected() {
        let mut config = config("http://localhost");
        config.api_key = crate::config::PLACEHOLDER_KEY.to_string();
        assert!(matches!(WeatherApi::new(&config), Err(Error::MissingApiKey)));
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast.json"))
            .and(query_param("key", "test-key"))
            .and(query_param("q", "51.3616,-0.19"))
            .and(query_param("alerts", "yes"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(SAMPLE_RESPONSE, "application/json"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let response = fetch(config(&format!("{}/v1", server.uri()))).await.unwrap();
        assert_eq!(response.location.country, "United Kingdom");
        assert_eq!(response.alerts()[0].headline, "Yellow warning for rain");
    }

    #[tokio::test]
    async fn test_fetch_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forecast.json"))
            .respond_with(ResponseTemplate::new(401).set_body_string(
                r#"{"error":{"code":2006,"message":"API key is invalid."}}"#,
            ))
            .expect(1)
            .mount(&server)
            .await;

        let err = fetch(config(&server.uri())).await.unwrap_err();
        assert!(matches!(err, Error::Status(s) if s.as_u16() == 401));
    }

    #[tokio::test]
    async fn test_fetch_bad_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forecast.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = fetch(config(&server.uri())).await.unwrap_err();
        assert!(matches!(err, Error::Http(_)));
    }
}
