use crate::errors::WeatherError;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Number;
use utoipa::ToSchema;

/// A validated request for current conditions in one city.
#[derive(Debug, Clone)]
pub struct WeatherQuery {
    pub city: String,
    pub api_key: SecretString,
}

impl WeatherQuery {
    /// Both the client-supplied city and the configured provider key must be present and
    /// non-empty; a missing key is reported the same way as a missing city.
    pub fn new(city: Option<String>, api_key: Option<&SecretString>) -> Result<Self, WeatherError> {
        let city = city.filter(|c| !c.is_empty());
        let api_key = api_key.filter(|k| !k.expose_secret().is_empty()).cloned();

        match (city, api_key) {
            (Some(city), Some(api_key)) => Ok(Self { city, api_key }),
            _ => Err(WeatherError::MissingCityOrApiKey),
        }
    }
}

/// Reduced view of the provider's current-conditions document. Field names and nesting follow
/// the provider, and numbers are copied without conversion.
#[derive(Debug, Clone, PartialEq, Eq, ToSchema, Serialize)]
#[schema(example = json!({
    "name": "London",
    "sys": {"country": "GB"},
    "main": {"temp": 15.0, "feels_like": 14.2, "humidity": 70, "pressure": 1012},
    "weather": [{"main": "Clouds", "description": "overcast clouds"}],
    "wind": {"speed": 3.1},
    "visibility": 10000
}))]
pub struct WeatherResult {
    pub name: String,
    pub sys: Sys,
    pub main: MainReadings,

    /// Only the provider's first condition is kept.
    #[schema(value_type = Vec<Condition>)]
    pub weather: [Condition; 1],

    pub wind: Wind,

    #[schema(value_type = f64)]
    pub visibility: Number,
}

#[derive(Debug, Clone, PartialEq, Eq, ToSchema, Serialize, Deserialize)]
pub struct Sys {
    #[schema(example = "GB")]
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Eq, ToSchema, Serialize, Deserialize)]
pub struct MainReadings {
    #[schema(value_type = f64)]
    pub temp: Number,

    #[schema(value_type = f64)]
    pub feels_like: Number,

    #[schema(value_type = f64)]
    pub humidity: Number,

    #[schema(value_type = f64)]
    pub pressure: Number,
}

#[derive(Debug, Clone, PartialEq, Eq, ToSchema, Serialize, Deserialize)]
pub struct Condition {
    #[schema(example = "Clouds")]
    pub main: String,

    #[schema(example = "overcast clouds")]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, ToSchema, Serialize, Deserialize)]
pub struct Wind {
    #[schema(value_type = f64)]
    pub speed: Number,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use serde_json::json;

    proptest! {
        #[test]
        fn test_query_accepts_any_non_empty_inputs(city in ".+", key in "[a-f0-9]{1,32}") {
            let api_key = SecretString::new(key.clone());
            let query = WeatherQuery::new(Some(city.clone()), Some(&api_key));
            prop_assert!(query.is_ok());
            let query = query.unwrap();
            prop_assert_eq!(query.city, city);
            prop_assert_eq!(query.api_key.expose_secret(), &key);
        }

        #[test]
        fn test_query_rejects_missing_key_for_any_city(city in ".*") {
            prop_assert!(matches!(
                WeatherQuery::new(Some(city), None),
                Err(WeatherError::MissingCityOrApiKey)
            ));
        }
    }

    #[test]
    fn test_query_rejects_missing_or_empty_city() {
        let api_key = SecretString::new("abc123".to_string());
        assert!(matches!(
            WeatherQuery::new(None, Some(&api_key)),
            Err(WeatherError::MissingCityOrApiKey)
        ));
        assert!(matches!(
            WeatherQuery::new(Some(String::new()), Some(&api_key)),
            Err(WeatherError::MissingCityOrApiKey)
        ));
    }

    #[test]
    fn test_query_rejects_empty_key() {
        let api_key = SecretString::new(String::new());
        assert!(matches!(
            WeatherQuery::new(Some("London".to_string()), Some(&api_key)),
            Err(WeatherError::MissingCityOrApiKey)
        ));
    }

    #[test]
    fn test_query_debug_redacts_key() {
        let api_key = SecretString::new("super-secret".to_string());
        let query = WeatherQuery::new(Some("Paris".to_string()), Some(&api_key)).unwrap();
        let rendered = format!("{query:?}");
        assert!(rendered.contains("Paris"));
        assert!(!rendered.contains("super-secret"));
    }

    #[test]
    fn test_result_serializes_with_provider_nesting() {
        let result = WeatherResult {
            name: "London".to_string(),
            sys: Sys { country: "GB".to_string() },
            main: MainReadings {
                temp: Number::from_f64(15.0).unwrap(),
                feels_like: Number::from_f64(14.2).unwrap(),
                humidity: 70.into(),
                pressure: 1012.into(),
            },
            weather: [Condition {
                main: "Clouds".to_string(),
                description: "overcast clouds".to_string(),
            }],
            wind: Wind { speed: Number::from_f64(3.1).unwrap() },
            visibility: 10000.into(),
        };

        let actual = serde_json::to_value(&result).unwrap();
        assert_eq!(
            actual,
            json!({
                "name": "London",
                "sys": {"country": "GB"},
                "main": {"temp": 15.0, "feels_like": 14.2, "humidity": 70, "pressure": 1012},
                "weather": [{"main": "Clouds", "description": "overcast clouds"}],
                "wind": {"speed": 3.1},
                "visibility": 10000
            })
        );
    }
}
