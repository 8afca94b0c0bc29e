use crate::error::{StylecastError, StylecastResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Accumulating map from result key to a stage's output
///
/// Stages return a partial bag; the runner merges it into the run's bag.
/// Values are stored as JSON so heterogeneous stage outputs fit one map.
///
/// # Example
/// ```
/// use stylecast::pipeline::ResultBag;
///
/// let mut bag = ResultBag::new();
/// bag.insert("currentTemp", &7.0).unwrap();
/// bag.merge(ResultBag::single("advice", &"Wear a coat.").unwrap());
///
/// assert_eq!(bag.get::<f64>("currentTemp").unwrap(), 7.0);
/// assert_eq!(bag.get_string("advice").unwrap(), "Wear a coat.");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultBag {
    data: BTreeMap<String, Value>,
}

impl ResultBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// A bag holding one serialized value
    pub fn single<T: Serialize + ?Sized>(key: impl Into<String>, value: &T) -> StylecastResult<Self> {
        let mut bag = Self::new();
        bag.insert(key, value)?;
        Ok(bag)
    }

    /// Serialize `value` under `key`, replacing any previous value
    pub fn insert<T: Serialize + ?Sized>(
        &mut self,
        key: impl Into<String>,
        value: &T,
    ) -> StylecastResult<()> {
        self.data.insert(key.into(), serde_json::to_value(value)?);
        Ok(())
    }

    /// Set a raw JSON value
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.data.insert(key.into(), value);
    }

    /// Get a raw JSON value
    pub fn get_raw(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Deserialize the value under `key`
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> StylecastResult<T> {
        let value = self
            .data
            .get(key)
            .ok_or_else(|| StylecastError::MissingResult(key.to_string()))?;
        serde_json::from_value(value.clone()).map_err(|e| {
            StylecastError::PipelineError(format!("Result '{}' has an unexpected shape: {}", key, e))
        })
    }

    pub fn get_string(&self, key: &str) -> StylecastResult<String> {
        match self.data.get(key) {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(_) => Err(StylecastError::PipelineError(format!(
                "Result '{}' is not a string",
                key
            ))),
            None => Err(StylecastError::MissingResult(key.to_string())),
        }
    }

    pub fn get_number(&self, key: &str) -> StylecastResult<f64> {
        match self.data.get(key) {
            Some(Value::Number(n)) => n.as_f64().ok_or_else(|| {
                StylecastError::PipelineError(format!("Result '{}' is not a valid number", key))
            }),
            Some(_) => Err(StylecastError::PipelineError(format!(
                "Result '{}' is not a number",
                key
            ))),
            None => Err(StylecastError::MissingResult(key.to_string())),
        }
    }

    /// Fold `other` into this bag. Existing keys are overwritten.
    pub fn merge(&mut self, other: ResultBag) {
        self.data.extend(other.data);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Keys in sorted order
    pub fn keys(&self) -> Vec<&str> {
        self.data.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// What a stage sees while it runs: the run's input and the bag so far
#[derive(Debug, Clone)]
pub struct RunContext {
    run_id: u64,
    input: ResultBag,
    bag: ResultBag,
}

impl RunContext {
    pub fn new(run_id: u64, input: ResultBag) -> Self {
        Self {
            run_id,
            input,
            bag: ResultBag::new(),
        }
    }

    pub fn run_id(&self) -> u64 {
        self.run_id
    }

    /// Values supplied when the run was started
    pub fn input(&self) -> &ResultBag {
        &self.input
    }

    /// Outputs of the stages completed so far
    pub fn bag(&self) -> &ResultBag {
        &self.bag
    }

    pub(crate) fn merge(&mut self, partial: ResultBag) {
        self.bag.merge(partial);
    }
}
