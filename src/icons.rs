//! WeatherAPI condition codes to Bas Milius weather icon names.

const ICON_BASE_URL: &str =
    "https://cdn.jsdelivr.net/gh/basmilius/weather-icons@dev/production/fill/svg";

pub const NOT_AVAILABLE: &str = "not-available";

/// Icon file name (without extension) for a WeatherAPI condition code.
///
/// Codes without an icon fall back to [`NOT_AVAILABLE`].
pub fn icon_file_name(code: u16, is_day: bool) -> &'static str {
    let day_night = |day, night| if is_day { day } else { night };

    match code {
        1000 => day_night("clear-day", "clear-night"),
        1003 => day_night("partly-cloudy-day", "partly-cloudy-night"),
        1063 => day_night("partly-cloudy-day-drizzle", "partly-cloudy-night-drizzle"),
        1066 => day_night("partly-cloudy-day-snow", "partly-cloudy-night-snow"),
        1069 => day_night("partly-cloudy-day-sleet", "partly-cloudy-night-sleet"),
        1006 => "cloudy",
        1009 => "overcast",
        1030 => "mist",
        1087 => "thunderstorms",
        1114 => "wind-snow",
        1117 => "blizzard",
        1135 | 1147 => "fog",
        1072 | 1150 | 1153 | 1168 | 1171 => "drizzle",
        1180 | 1183 | 1186 | 1189 | 1192 | 1195 | 1240 | 1243 | 1246 => "rain",
        1198 | 1201 | 1204 | 1207 | 1249 | 1252 => "sleet",
        1210 | 1213 | 1216 | 1219 | 1222 | 1225 | 1255 | 1258 => "snow",
        1237 | 1261 | 1264 => "hail",
        1273 | 1276 => "thunderstorms-rain",
        1279 | 1282 => "thunderstorms-snow",
        _ => NOT_AVAILABLE,
    }
}

pub fn icon_url(name: &str) -> String {
    format!("{ICON_BASE_URL}/{name}.svg")
}
