//! What gets shown: a [`Screen`] built from one forecast response.

use std::fmt;

use chrono::{DateTime, Local};
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::Error;
use crate::icons::{icon_file_name, icon_url};
use crate::units::{direction::degree_to_compass, Units};
use crate::weatherapi::{Alert, Response, WeatherApi};

pub const MISSING_KEY_TITLE: &str = "API Key Missing";
pub const MISSING_KEY_MESSAGE: &str =
    "Please add your WeatherAPI.com key to the config file or pass --api-key";
pub const FAILED_TITLE: &str = "Error";
pub const FAILED_MESSAGE: &str =
    "Could not load weather data. Please check your API key and network connection.";

const DATE_FORMAT: &str = "%d-%m-%Y %H:%M";

#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    MissingKey,
    Failed,
    Loaded(Report),
}

impl Screen {
    pub fn location_name(&self) -> &str {
        match self {
            Screen::MissingKey => MISSING_KEY_TITLE,
            Screen::Failed => FAILED_TITLE,
            Screen::Loaded(report) => &report.location_name,
        }
    }

    /// The explanation shown in place of weather data, if nothing loaded.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            Screen::MissingKey => Some(MISSING_KEY_MESSAGE),
            Screen::Failed => Some(FAILED_MESSAGE),
            Screen::Loaded(_) => None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, Screen::Loaded(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub location_name: String,
    pub updated: String,
    pub condition: String,
    pub details: Vec<Detail>,
    pub icon: Icon,
    pub alerts: Vec<AlertView>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Detail {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Icon {
    pub name: &'static str,
    pub url: String,
    pub alt: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlertView {
    pub headline: String,
    pub severity: String,
    pub effective: String,
    pub desc: String,
}

impl Report {
    pub fn from_response(response: &Response, units: Units) -> Self {
        let location = &response.location;
        let current = &response.current;

        let temp = |c: f32, f: f32| {
            format!("{}{}", units.pick(c, f), units.temperature_suffix())
        };

        let direction = match current.wind_degree {
            Some(deg) => degree_to_compass(deg).to_string(),
            None => current.wind_dir.clone(),
        };
        let speed = units.pick(current.wind_kph, current.wind_mph);
        let mut wind = format!("{speed} {}", units.speed_suffix());
        if !direction.is_empty() {
            wind = format!("{wind} {direction}");
        }

        let mut details = vec![
            Detail {
                label: "Temp",
                value: temp(current.temp_c, current.temp_f),
            },
            Detail {
                label: "Feels Like",
                value: temp(current.feelslike_c, current.feelslike_f),
            },
            Detail {
                label: "Wind",
                value: wind,
            },
        ];
        if let Some(humidity) = current.humidity {
            details.push(Detail {
                label: "Humidity",
                value: format!("{humidity:.0}%"),
            });
        }

        let name = icon_file_name(current.condition.code, current.is_day == 1);

        Self {
            location_name: format!("{}, {}", location.name, location.country),
            updated: current.last_updated.clone(),
            condition: current.condition.text.clone(),
            details,
            icon: Icon {
                name,
                url: icon_url(name),
                alt: current.condition.text.clone(),
            },
            alerts: response.alerts().iter().map(AlertView::from).collect(),
        }
    }
}

impl From<&Alert> for AlertView {
    fn from(alert: &Alert) -> Self {
        Self {
            headline: alert.headline.clone(),
            severity: alert.severity.clone(),
            effective: local_time(&alert.effective),
            desc: alert.desc.clone(),
        }
    }
}

/// RFC 3339 timestamps in local time; anything else is passed through.
fn local_time(timestamp: &str) -> String {
    match DateTime::parse_from_rfc3339(timestamp) {
        Ok(date) => DateTime::<Local>::from(date).format(DATE_FORMAT).to_string(),
        Err(_) => timestamp.to_string(),
    }
}

/// Fetch and build the screen for the configured location.
pub fn load(config: &Config) -> Screen {
    if !config.has_api_key() {
        warn!("no WeatherAPI.com key configured");
        return Screen::MissingKey;
    }

    match WeatherApi::new(config).and_then(|api| api.fetch()) {
        Ok(response) => {
            let report = Report::from_response(&response, config.units);
            info!(
                location = %report.location_name,
                icon = report.icon.name,
                alerts = report.alerts.len(),
                "weather loaded"
            );
            Screen::Loaded(report)
        }
        Err(Error::MissingApiKey) => Screen::MissingKey,
        Err(err) => {
            error!(error = %err, "error fetching weather data");
            Screen::Failed
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.location_name())?;
        let report = match self {
            Screen::Loaded(report) => report,
            _ => {
                if let Some(message) = self.message() {
                    writeln!(f, "{message}")?;
                }
                return Ok(());
            }
        };

        if !report.updated.is_empty() {
            writeln!(f, "Updated {}", report.updated)?;
        }
        writeln!(f)?;
        writeln!(f, "{}", report.condition)?;
        for detail in &report.details {
            writeln!(f, "{:12}{}", format!("{}:", detail.label), detail.value)?;
        }
        writeln!(f, "{:12}{}", "Icon:", report.icon.url)?;

        for alert in &report.alerts {
            writeln!(f)?;
            writeln!(f, "{}", alert.headline)?;
            writeln!(f, "{:12}{}", "Severity:", alert.severity)?;
            writeln!(f, "{:12}{}", "Effective:", alert.effective)?;
            writeln!(f, "{}", alert.desc)?;
        }
        Ok(())
    }
}
