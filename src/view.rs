//! Presentation projections of runner state
//!
//! Pure functions from a [`RunState`] snapshot to what a screen shows.
//! Missing or mis-shaped bag entries project to `None` rather than errors.

use crate::pipeline::stages::{keys, CurrentWeather};
use crate::pipeline::{RunState, RunStatus};
use crate::services::{Member, WeatherReport};
use serde::Serialize;

pub const ADVICE_PLACEHOLDER: &str = "Choosing an outfit for this weather…";
pub const LOAD_LABEL: &str = "Load weather";
pub const LOADING_LABEL: &str = "Loading…";
pub const REFRESH_LABEL: &str = "Refresh";

/// What the weather widget renders
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherView {
    pub loading: bool,
    pub error: Option<String>,
    pub current_temp: Option<f64>,
    pub midnight_temp: Option<f64>,
    pub noon_temp: Option<f64>,
    pub evening_temp: Option<f64>,
    /// Advice text, or a placeholder while the temperature is known but advice is not
    pub advice: Option<String>,
    pub button_label: &'static str,
    pub button_disabled: bool,
}

impl WeatherView {
    pub fn project(state: &RunState) -> Self {
        let bag = &state.result_bag;
        let loading = state.is_busy();
        let current_temp = bag.get_number(keys::CURRENT_TEMP).ok();
        let hourly: Vec<f64> = bag.get(keys::HOURLY_TEMPS).unwrap_or_default();
        let report = WeatherReport {
            current_temp: current_temp.unwrap_or_default(),
            hourly_temps: hourly,
        };

        let advice = match (bag.get_string(keys::ADVICE).ok(), current_temp) {
            (Some(text), _) if !text.is_empty() => Some(text),
            (_, Some(_)) if loading => Some(ADVICE_PLACEHOLDER.to_string()),
            _ => None,
        };

        let button_label = if loading {
            LOADING_LABEL
        } else if current_temp.is_some() {
            REFRESH_LABEL
        } else {
            LOAD_LABEL
        };

        Self {
            loading,
            error: failure_message(state),
            current_temp,
            midnight_temp: current_temp.and(report.at_hour(WeatherReport::MIDNIGHT)),
            noon_temp: current_temp.and(report.at_hour(WeatherReport::NOON)),
            evening_temp: current_temp.and(report.at_hour(WeatherReport::EVENING)),
            advice,
            button_label,
            button_disabled: loading,
        }
    }
}

/// What the recommendation page renders
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationView {
    /// Nothing selected; the page shows its prompt to pick a member
    pub idle: bool,
    pub loading: bool,
    pub select_disabled: bool,
    pub error: Option<String>,
    pub member: Option<Member>,
    /// `"{location} • {temp}°C"`, once the weather is known
    pub weather_badge: Option<String>,
    /// Recommendation text split into paragraphs
    pub recommendation_lines: Vec<String>,
}

impl RecommendationView {
    pub fn project(state: &RunState) -> Self {
        let bag = &state.result_bag;
        let member: Option<Member> = bag.get(keys::ENTITY).ok();
        let weather: Option<CurrentWeather> = bag.get(keys::WEATHER).ok();

        let weather_badge = match (&member, weather) {
            (Some(member), Some(weather)) => {
                Some(format!("{} • {}°C", member.location, weather.temp))
            }
            _ => None,
        };

        let recommendation_lines = if state.is_busy() {
            Vec::new()
        } else {
            bag.get_string(keys::RECOMMENDATION)
                .map(|text| text.lines().map(str::to_string).collect())
                .unwrap_or_default()
        };

        Self {
            idle: state.status == RunStatus::Idle,
            loading: state.is_busy(),
            select_disabled: state.is_busy(),
            error: failure_message(state),
            member,
            weather_badge,
            recommendation_lines,
        }
    }
}

fn failure_message(state: &RunState) -> Option<String> {
    match state.status {
        RunStatus::Failed => state.error.as_ref().map(|e| e.message.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{ResultBag, RunError};

    fn state(status: RunStatus, bag: ResultBag) -> RunState {
        RunState {
            run_id: 1,
            status,
            stage_index: Some(0),
            result_bag: bag,
            error: None,
        }
    }

    #[test]
    fn test_weather_view_before_first_load() {
        let view = WeatherView::project(&RunState::default());
        assert!(!view.loading);
        assert_eq!(view.button_label, LOAD_LABEL);
        assert!(view.current_temp.is_none());
        assert!(view.advice.is_none());
        assert!(view.error.is_none());
    }

    #[test]
    fn test_weather_view_waiting_for_advice() {
        let mut bag = ResultBag::new();
        bag.insert(keys::CURRENT_TEMP, &7.0).unwrap();
        bag.insert(keys::HOURLY_TEMPS, &(0..24).map(f64::from).collect::<Vec<_>>())
            .unwrap();

        let view = WeatherView::project(&state(RunStatus::Running, bag));

        assert!(view.loading);
        assert!(view.button_disabled);
        assert_eq!(view.button_label, LOADING_LABEL);
        assert_eq!(view.current_temp, Some(7.0));
        assert_eq!(view.midnight_temp, Some(0.0));
        assert_eq!(view.noon_temp, Some(12.0));
        assert_eq!(view.evening_temp, Some(18.0));
        assert_eq!(view.advice.as_deref(), Some(ADVICE_PLACEHOLDER));
    }

    #[test]
    fn test_weather_view_succeeded() {
        let mut bag = ResultBag::new();
        bag.insert(keys::CURRENT_TEMP, &7.0).unwrap();
        bag.insert(keys::HOURLY_TEMPS, &Vec::<f64>::new()).unwrap();
        bag.insert(keys::ADVICE, "Wear a coat.").unwrap();

        let view = WeatherView::project(&state(RunStatus::Succeeded, bag));

        assert_eq!(view.button_label, REFRESH_LABEL);
        assert_eq!(view.advice.as_deref(), Some("Wear a coat."));
        assert!(view.noon_temp.is_none());
    }

    #[test]
    fn test_weather_view_failed() {
        let mut failed = state(RunStatus::Failed, ResultBag::new());
        failed.error = Some(RunError {
            stage: "fetch_weather".into(),
            message: "Something went wrong while fetching the weather.".into(),
        });

        let view = WeatherView::project(&failed);

        assert!(!view.loading);
        assert_eq!(
            view.error.as_deref(),
            Some("Something went wrong while fetching the weather.")
        );
        assert_eq!(view.button_label, LOAD_LABEL);
    }

    #[test]
    fn test_recommendation_view_badge_and_lines() {
        let member = Member {
            name: "Alice".into(),
            gender: "f".into(),
            style: "casual".into(),
            location: "Busan".into(),
        };
        let mut bag = ResultBag::new();
        bag.insert(keys::ENTITY, &member).unwrap();
        bag.insert(keys::WEATHER, &CurrentWeather { temp: 12.0 }).unwrap();
        bag.insert(keys::RECOMMENDATION, "First line.\nSecond line.").unwrap();

        let view = RecommendationView::project(&state(RunStatus::Succeeded, bag));

        assert!(!view.select_disabled);
        assert_eq!(view.member, Some(member));
        assert_eq!(view.weather_badge.as_deref(), Some("Busan • 12°C"));
        assert_eq!(view.recommendation_lines, vec!["First line.", "Second line."]);
    }

    #[test]
    fn test_recommendation_view_while_running() {
        let member = Member {
            name: "Bob".into(),
            gender: "m".into(),
            style: "street".into(),
            location: "Atlantis".into(),
        };
        let bag = ResultBag::single(keys::ENTITY, &member).unwrap();

        let view = RecommendationView::project(&state(RunStatus::Running, bag));

        assert!(view.loading);
        assert!(view.select_disabled);
        assert_eq!(view.member.map(|m| m.name), Some("Bob".to_string()));
        assert!(view.weather_badge.is_none());
        assert!(view.recommendation_lines.is_empty());
    }

    #[test]
    fn test_recommendation_view_idle() {
        let view = RecommendationView::project(&RunState::idle(3));
        assert!(view.idle);
        assert!(!view.loading);
        assert!(view.member.is_none());
    }
}
