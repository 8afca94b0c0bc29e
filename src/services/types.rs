use serde::{Deserialize, Serialize};
use std::fmt;

/// Geographic coordinates in decimal degrees
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lon)
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lat, self.lon)
    }
}

/// A member record from the directory service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Member {
    pub name: String,
    pub gender: String,
    pub style: String,
    pub location: String,
}

/// Current and hourly temperatures for one location
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReport {
    pub current_temp: f64,
    pub hourly_temps: Vec<f64>,
}

impl WeatherReport {
    pub const MIDNIGHT: usize = 0;
    pub const NOON: usize = 12;
    pub const EVENING: usize = 18;

    /// Temperature for hour index `hour`, if the series reaches that far
    pub fn at_hour(&self, hour: usize) -> Option<f64> {
        self.hourly_temps.get(hour).copied()
    }
}

/// What to ask the text generation service for
#[derive(Debug, Clone, PartialEq)]
pub enum AdviceRequest {
    /// Outfit advice and a short greeting for the fixed location
    Weather { temperature: f64, place: String },

    /// A fashion-editor style recommendation for a member
    Outfit {
        temperature: f64,
        location: String,
        style: String,
        gender: String,
    },
}

impl AdviceRequest {
    pub fn temperature(&self) -> f64 {
        match self {
            AdviceRequest::Weather { temperature, .. } => *temperature,
            AdviceRequest::Outfit { temperature, .. } => *temperature,
        }
    }

    /// Natural-language prompt sent to the model
    pub fn prompt(&self) -> String {
        match self {
            AdviceRequest::Weather { temperature, place } => format!(
                "The current temperature in {place} is {temperature}°C.\n\
                 Kindly suggest an outfit that suits this weather, along with a short greeting.\n\
                 Answer in three sentences or fewer."
            ),
            AdviceRequest::Outfit {
                temperature,
                location,
                style,
                gender,
            } => format!(
                "You are a professional fashion editor. Based on the information below, propose the perfect outfit for today.\n\
                 - Place: {location} (current temperature {temperature}°C)\n\
                 - Preferred style: {style}\n\
                 - Gender: {gender}\n\
                 \n\
                 [Requests]\n\
                 1. Write in a refined, professional tone, like a fashion magazine article.\n\
                 2. Recommend concrete items: top, bottom, shoes and optionally accessories.\n\
                 3. Explain whether the look is comfortable for the current temperature.\n\
                 4. Summarise the key point of the overall look.\n\
                 5. Keep it polite yet stylish, in about 4-5 sentences."
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinates_validity() {
        assert!(Coordinates::new(35.1, 129.0).is_valid());
        assert!(!Coordinates::new(91.0, 0.0).is_valid());
        assert!(!Coordinates::new(0.0, -181.0).is_valid());
    }

    #[test]
    fn test_weather_report_slots() {
        let report = WeatherReport {
            current_temp: 7.0,
            hourly_temps: (0..24).map(|h| h as f64).collect(),
        };
        assert_eq!(report.at_hour(WeatherReport::MIDNIGHT), Some(0.0));
        assert_eq!(report.at_hour(WeatherReport::NOON), Some(12.0));
        assert_eq!(report.at_hour(WeatherReport::EVENING), Some(18.0));
        assert_eq!(report.at_hour(24), None);
    }

    #[test]
    fn test_weather_report_serializes_camel_case() {
        let report = WeatherReport {
            current_temp: 1.5,
            hourly_temps: vec![1.0],
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["currentTemp"], 1.5);
        assert_eq!(json["hourlyTemps"][0], 1.0);
    }

    #[test]
    fn test_weather_prompt_mentions_place_and_temperature() {
        let prompt = AdviceRequest::Weather {
            temperature: 7.0,
            place: "Seoul".into(),
        }
        .prompt();
        assert!(prompt.contains("Seoul"));
        assert!(prompt.contains("7°C"));
    }

    #[test]
    fn test_outfit_prompt_mentions_member_attributes() {
        let request = AdviceRequest::Outfit {
            temperature: 12.0,
            location: "Busan".into(),
            style: "casual".into(),
            gender: "f".into(),
        };
        let prompt = request.prompt();
        assert!(prompt.contains("Busan"));
        assert!(prompt.contains("12°C"));
        assert!(prompt.contains("casual"));
        assert!(prompt.contains("Gender: f"));
        assert_eq!(request.temperature(), 12.0);
    }
}
