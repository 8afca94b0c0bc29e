use super::{
    AdviceRequest, AdviceService, Coordinates, DirectoryService, Member, WeatherReport,
    WeatherService,
};
use crate::error::{StylecastError, StylecastResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;
use tokio::time::{sleep, Duration};

/// In-memory services for development and testing
///
/// These implementations simulate the external services without any
/// network calls. Each one supports:
/// - a simulated network delay
/// - failure injection
/// - gates: a call blocks until the test releases it
/// - call counting

async fn simulate_delay(delay_ms: u64) {
    if delay_ms > 0 {
        sleep(Duration::from_millis(delay_ms)).await;
    }
}

/// Mock member directory
#[derive(Default)]
pub struct MockDirectory {
    keys: Vec<String>,
    members: HashMap<String, Member>,
    gates: HashMap<String, Arc<Notify>>,
    unavailable: bool,
    delay_ms: u64,
    calls: AtomicUsize,
}

impl MockDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a member under `key`, keeping insertion order for listings
    pub fn with_member(mut self, key: impl Into<String>, member: Member) -> Self {
        let key = key.into();
        if !self.members.contains_key(&key) {
            self.keys.push(key.clone());
        }
        self.members.insert(key, member);
        self
    }

    /// Every call fails with `Unavailable`
    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// Lookups of `key` wait until the returned handle is notified
    pub fn gate(&mut self, key: impl Into<String>) -> Arc<Notify> {
        self.gates
            .entry(key.into())
            .or_insert_with(|| Arc::new(Notify::new()))
            .clone()
    }

    /// Number of calls made, listings included
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DirectoryService for MockDirectory {
    async fn list_members(&self) -> StylecastResult<Vec<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        simulate_delay(self.delay_ms).await;
        if self.unavailable {
            return Err(StylecastError::Unavailable("mock directory is down".to_string()));
        }
        Ok(self.keys.clone())
    }

    async fn member(&self, key: &str) -> StylecastResult<Member> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = self.gates.get(key) {
            gate.notified().await;
        }
        simulate_delay(self.delay_ms).await;
        if self.unavailable {
            return Err(StylecastError::Unavailable("mock directory is down".to_string()));
        }
        self.members
            .get(key)
            .cloned()
            .ok_or_else(|| StylecastError::NotFound(format!("member '{}'", key)))
    }
}

/// Mock forecast service
pub struct MockWeather {
    default_report: Option<WeatherReport>,
    reports: Vec<(Coordinates, WeatherReport)>,
    gate: Option<Arc<Notify>>,
    delay_ms: u64,
    calls: AtomicUsize,
    requested: Mutex<Vec<Coordinates>>,
}

impl MockWeather {
    /// Answer every request with `report`
    pub fn new(report: WeatherReport) -> Self {
        Self {
            default_report: Some(report),
            reports: Vec::new(),
            gate: None,
            delay_ms: 0,
            calls: AtomicUsize::new(0),
            requested: Mutex::new(Vec::new()),
        }
    }

    /// Current temperature only, no hourly series
    pub fn current(temp: f64) -> Self {
        Self::new(WeatherReport {
            current_temp: temp,
            hourly_temps: Vec::new(),
        })
    }

    /// A full day of hourly values, all at `temp`
    pub fn full_day(temp: f64) -> Self {
        Self::new(WeatherReport {
            current_temp: temp,
            hourly_temps: vec![temp; 24],
        })
    }

    /// Every call fails with `Unavailable`
    pub fn unavailable() -> Self {
        Self {
            default_report: None,
            ..Self::new(WeatherReport {
                current_temp: 0.0,
                hourly_temps: Vec::new(),
            })
        }
    }

    /// Answer requests for `at` with `report` instead of the default
    pub fn with_report_at(mut self, at: Coordinates, report: WeatherReport) -> Self {
        self.reports.push((at, report));
        self
    }

    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// Calls wait until the returned handle is notified, once per call
    pub fn gate(&mut self) -> Arc<Notify> {
        self.gate.get_or_insert_with(|| Arc::new(Notify::new())).clone()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Coordinates of every request, in call order
    pub fn requested(&self) -> Vec<Coordinates> {
        self.requested.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl WeatherService for MockWeather {
    async fn forecast(&self, at: Coordinates) -> StylecastResult<WeatherReport> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requested.lock()?.push(at);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        simulate_delay(self.delay_ms).await;

        if let Some((_, report)) = self.reports.iter().find(|(c, _)| *c == at) {
            return Ok(report.clone());
        }
        self.default_report
            .clone()
            .ok_or_else(|| StylecastError::Unavailable("mock weather is down".to_string()))
    }
}

/// Mock text generation service
pub struct MockAdvice {
    text: Option<String>,
    delay_ms: u64,
    calls: AtomicUsize,
    requests: Mutex<Vec<AdviceRequest>>,
}

impl MockAdvice {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            delay_ms: 0,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Every call fails with `Unavailable`
    pub fn unavailable() -> Self {
        Self {
            text: None,
            ..Self::new("")
        }
    }

    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Requests received, in call order
    pub fn requests(&self) -> Vec<AdviceRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl AdviceService for MockAdvice {
    async fn advise(&self, request: &AdviceRequest) -> StylecastResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock()?.push(request.clone());
        simulate_delay(self.delay_ms).await;
        self.text
            .clone()
            .ok_or_else(|| StylecastError::Unavailable("mock advice is down".to_string()))
    }
}
