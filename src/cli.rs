use std::path::PathBuf;

use clap::builder::{styling::AnsiColor, Styles};
use clap::{ArgAction, Parser};

const ABOUT: &str = "Current weather and alerts from WeatherAPI.com";

const LONG_ABOUT: &str = "
TUI for viewing the current conditions and active weather alerts for a single location, sourced
from WeatherAPI.com.

The user supplies a WeatherAPI.com key and the latitude/longitude to report on. North and east are
positive, south and west are negative (e.g. 48.3319 S is -48.3319, 0.7446 W is -0.7446).

Settings are read from the config file. Pass --save to store the current location, key and display
preferences there, so subsequent runs of `wxnow` need no arguments.
";

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default())
    .usage(AnsiColor::Green.on_default())
    .literal(AnsiColor::Green.on_default())
    .placeholder(AnsiColor::Green.on_default());

#[derive(Parser, Debug, Default)]
#[command(version, styles=STYLES, about=ABOUT, long_about = LONG_ABOUT)]
pub struct Args {
    #[arg(long, allow_negative_numbers = true, help = "Latitude, north positive (e.g. 51.3616)")]
    pub lat: Option<f64>,

    #[arg(long, allow_negative_numbers = true, help = "Longitude, east positive (e.g. -0.1900)")]
    pub lon: Option<f64>,

    #[arg(
        long,
        env = "WEATHERAPI_KEY",
        hide_env_values = true,
        help = "WeatherAPI.com API key"
    )]
    pub api_key: Option<String>,

    #[arg(long, help = "Do not request weather alerts")]
    pub no_alerts: bool,

    #[arg(long, help = "Show temperatures in °F and wind in mph")]
    pub imperial: bool,

    #[arg(long, help = "Print the report once as plain text instead of starting the TUI")]
    pub once: bool,

    #[arg(long, value_name = "MINUTES", help = "Reload interval for the TUI, 0 disables")]
    pub refresh: Option<u64>,

    #[arg(long, value_name = "PATH", help = "Config file to use instead of the default")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Save the effective settings to the config file")]
    pub save: bool,

    #[arg(short, long, action = ArgAction::Count, help = "Increase log verbosity (-v, -vv)")]
    pub verbose: u8,
}
