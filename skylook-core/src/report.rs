//! Text rendering of a [`NormalizedWeather`].

use std::fmt;

use crate::{
    format::{capitalize_first_letter, round_temperature, to_one_decimal_place},
    model::NormalizedWeather,
};

/// Headline plus labelled result rows, as shown after a search.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub headline: String,
    pub rows: Vec<(&'static str, String)>,
}

impl Report {
    pub fn new(weather: &NormalizedWeather) -> Self {
        let description = capitalize_first_letter(&weather.description)
            .unwrap_or_else(|| weather.main.clone());
        let place = if weather.city_name.is_empty() {
            weather.lat_long.to_string()
        } else {
            weather.city_name.clone()
        };
        let headline = format!(
            "Current weather in {place}, {}: {description}.",
            weather.country_label()
        );

        let mut rows = vec![
            (
                "Temperature",
                format!("{}˚C", round_temperature(weather.temperature_in_celsius)),
            ),
            ("Cloud cover", format!("{}%", weather.cloud_percentage)),
            ("Humidity", format!("{}%", weather.humidity_percentage)),
            (
                "Wind speed",
                format!(
                    "{} miles per hour",
                    to_one_decimal_place(weather.wind_speed_in_miles_per_hour())
                ),
            ),
        ];
        if let Some(visibility) = weather.visibility_in_meters {
            rows.push(("Visibility", format!("{visibility} metres")));
        }
        if let Some(rain) = weather.rain_volume_from_last_hour_in_millimeters {
            rows.push(("Rain (last hour)", format!("{rain} mm")));
        }
        if let Some(snow) = weather.snow_volume_from_last_hour_in_millimeters {
            rows.push(("Snow (last hour)", format!("{snow} mm")));
        }

        Self { headline, rows }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.headline)?;
        let width = self.rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
        for (label, value) in &self.rows {
            writeln!(f, "  {label:<width$}  {value}")?;
        }
        Ok(())
    }
}

/// Single-line `key: value, key: value` dump of every present field.
pub fn summary_line(weather: &NormalizedWeather) -> String {
    let mut fields = vec![
        ("cityName", weather.city_name.clone()),
        ("countryName", weather.country_label().to_string()),
        ("latLong", weather.lat_long.to_string()),
        ("main", weather.main.clone()),
        ("description", weather.description.clone()),
        ("temperatureInCelsius", weather.temperature_in_celsius.to_string()),
        ("humidityPercentage", weather.humidity_percentage.to_string()),
    ];
    if let Some(visibility) = weather.visibility_in_meters {
        fields.push(("visibilityInMeters", visibility.to_string()));
    }
    fields.push(("cloudPercentage", weather.cloud_percentage.to_string()));
    fields.push((
        "windSpeedInMetersPerSecond",
        weather.wind_speed_in_meters_per_second.to_string(),
    ));
    if let Some(rain) = weather.rain_volume_from_last_hour_in_millimeters {
        fields.push(("rainVolumeFromLastHourInMillimeters", rain.to_string()));
    }
    if let Some(snow) = weather.snow_volume_from_last_hour_in_millimeters {
        fields.push(("snowVolumeFromLastHourInMillimeters", snow.to_string()));
    }

    fields
        .iter()
        .map(|(key, value)| format!("{key}: {value}"))
        .collect::<Vec<_>>()
        .join(", ")
}
