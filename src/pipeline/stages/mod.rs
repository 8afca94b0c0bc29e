//! Concrete stages of the weather and recommendation pipelines
//!
//! Weather pipeline:
//! 1. FetchForecastStage - current and hourly temperatures at a fixed location
//! 2. FetchAdviceStage - outfit advice for the current temperature (falls back)
//!
//! Recommendation pipeline:
//! 1. FetchMemberStage - the selected member's record
//! 2. ResolveCoordinatesStage - member location to coordinates
//! 3. FetchCurrentWeatherStage - current temperature at those coordinates
//! 4. FetchRecommendationStage - member-specific outfit advice (falls back)

pub mod advice;
pub mod coordinates;
pub mod current_weather;
pub mod forecast;
pub mod member;
pub mod recommendation;

/// Result bag keys shared by the stages and the view projections
pub mod keys {
    /// Run input: the selected member key
    pub const MEMBER_KEY: &str = "key";

    pub const CURRENT_TEMP: &str = "currentTemp";
    pub const HOURLY_TEMPS: &str = "hourlyTemps";
    pub const ADVICE: &str = "advice";

    pub const ENTITY: &str = "entity";
    pub const COORDINATES: &str = "coordinates";
    pub const WEATHER: &str = "weather";
    pub const RECOMMENDATION: &str = "recommendation";
}

// Re-export stages
pub use advice::{FetchAdviceStage, ADVICE_FALLBACK};
pub use coordinates::ResolveCoordinatesStage;
pub use current_weather::{CurrentWeather, FetchCurrentWeatherStage};
pub use forecast::FetchForecastStage;
pub use member::FetchMemberStage;
pub use recommendation::{FetchRecommendationStage, RECOMMENDATION_FALLBACK};
