use chrono::DateTime;

use crate::{
    country::CountryTable,
    error::WeatherError,
    model::{NormalizedWeather, ProviderResponse},
};

const KELVIN_OFFSET: f64 = 273.15;

pub fn kelvin_to_celsius(kelvin: f64) -> f64 {
    kelvin - KELVIN_OFFSET
}

/// Map a provider payload onto the application record.
///
/// Fails only when the payload carries no weather condition at all.
pub fn normalize(
    response: &ProviderResponse,
    countries: &CountryTable,
) -> Result<NormalizedWeather, WeatherError> {
    let condition = response
        .weather
        .first()
        .ok_or_else(|| WeatherError::Malformed("response contained no weather condition".into()))?;

    let country_code = response.sys.country.clone();
    let country_name = country_code
        .as_deref()
        .and_then(|code| countries.name_for(code))
        .map(str::to_owned);

    Ok(NormalizedWeather {
        city_name: response.name.clone(),
        country_name,
        country_code,
        lat_long: response.coord,
        main: condition.main.clone(),
        description: condition.description.clone(),
        temperature_in_celsius: kelvin_to_celsius(response.main.temp),
        humidity_percentage: response.main.humidity,
        visibility_in_meters: response.visibility,
        cloud_percentage: response.clouds.all,
        wind_speed_in_meters_per_second: response.wind.speed,
        rain_volume_from_last_hour_in_millimeters: response.rain.as_ref().and_then(|r| r.last_hour),
        snow_volume_from_last_hour_in_millimeters: response.snow.as_ref().and_then(|s| s.last_hour),
        observed_at: response.dt.and_then(|ts| DateTime::from_timestamp(ts, 0)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn london() -> serde_json::Value {
        json!({
            "coord": {"lon": -0.1257, "lat": 51.5085},
            "weather": [{"id": 500, "main": "Rain", "description": "light rain", "icon": "10d"}],
            "base": "stations",
            "main": {"temp": 285.5, "feels_like": 284.9, "pressure": 1012, "humidity": 81},
            "visibility": 10000,
            "wind": {"speed": 4.12, "deg": 250},
            "clouds": {"all": 75},
            "dt": 1_700_000_000,
            "sys": {"country": "GB", "sunrise": 1_699_968_000, "sunset": 1_700_000_400},
            "name": "London",
            "cod": 200
        })
    }

    fn parse(value: serde_json::Value) -> ProviderResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn kelvin_offset_is_exact() {
        for k in [0.0, 273.15, 285.5, 310.928] {
            assert_eq!(kelvin_to_celsius(k), k - 273.15);
        }
    }

    #[test]
    fn maps_all_fields() {
        let weather = normalize(&parse(london()), CountryTable::global()).unwrap();

        assert_eq!(weather.city_name, "London");
        assert_eq!(weather.country_name.as_deref(), Some("United Kingdom"));
        assert_eq!(weather.lat_long.lat, 51.5085);
        assert_eq!(weather.lat_long.lng, -0.1257);
        assert_eq!(weather.main, "Rain");
        assert_eq!(weather.description, "light rain");
        assert_eq!(weather.temperature_in_celsius, 285.5 - 273.15);
        assert_eq!(weather.humidity_percentage, 81);
        assert_eq!(weather.visibility_in_meters, Some(10000));
        assert_eq!(weather.cloud_percentage, 75);
        assert_eq!(weather.wind_speed_in_meters_per_second, 4.12);
        assert_eq!(weather.rain_volume_from_last_hour_in_millimeters, None);
        assert_eq!(weather.snow_volume_from_last_hour_in_millimeters, None);
        assert_eq!(weather.observed_at.map(|t| t.timestamp()), Some(1_700_000_000));
    }

    #[test]
    fn rain_last_hour_is_carried_when_present() {
        let mut raw = london();
        raw["rain"] = json!({"1h": 2.5});
        let weather = normalize(&parse(raw), CountryTable::global()).unwrap();

        assert_eq!(weather.rain_volume_from_last_hour_in_millimeters, Some(2.5));
        assert_eq!(weather.snow_volume_from_last_hour_in_millimeters, None);
    }

    #[test]
    fn snow_without_last_hour_key_stays_absent() {
        let mut raw = london();
        raw["snow"] = json!({"3h": 1.0});
        let weather = normalize(&parse(raw), CountryTable::global()).unwrap();

        assert_eq!(weather.snow_volume_from_last_hour_in_millimeters, None);
    }

    #[test]
    fn absent_precipitation_is_omitted_from_json() {
        let weather = normalize(&parse(london()), CountryTable::global()).unwrap();
        let json = serde_json::to_value(&weather).unwrap();

        assert!(json.get("rainVolumeFromLastHourInMillimeters").is_none());
        assert!(json.get("snowVolumeFromLastHourInMillimeters").is_none());
        assert_eq!(json["cityName"], "London");
        assert_eq!(json["countryName"], "United Kingdom");
    }

    #[test]
    fn open_sea_has_no_country() {
        let mut raw = london();
        raw["sys"] = json!({});
        raw["name"] = json!("");
        let weather = normalize(&parse(raw), CountryTable::global()).unwrap();

        assert_eq!(weather.country_name, None);
        assert_eq!(weather.country_label(), "unknown country");
    }

    #[test]
    fn unknown_country_code_falls_back_to_code_label() {
        let mut raw = london();
        raw["sys"] = json!({"country": "ZZ"});
        let weather = normalize(&parse(raw), CountryTable::global()).unwrap();

        assert_eq!(weather.country_name, None);
        assert_eq!(weather.country_label(), "ZZ");
    }

    #[test]
    fn empty_weather_list_is_malformed() {
        let mut raw = london();
        raw["weather"] = json!([]);
        let err = normalize(&parse(raw), CountryTable::global()).unwrap_err();

        assert!(matches!(err, WeatherError::Malformed(_)));
    }

    #[test]
    fn missing_required_field_fails_to_parse() {
        let mut raw = london();
        raw.as_object_mut().unwrap().remove("main");

        assert!(serde_json::from_value::<ProviderResponse>(raw).is_err());
    }

    #[test]
    fn wind_speed_converts_to_miles_per_hour() {
        let weather = normalize(&parse(london()), CountryTable::global()).unwrap();
        let mph = weather.wind_speed_in_miles_per_hour();

        assert!((mph - 9.216).abs() < 0.001);
    }
}
