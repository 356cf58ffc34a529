//! Host attribute snapshot handed to every callback

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::engine::{Deadline, Op, Timeouts};
use crate::error::{Error, Result};

/// Id, attributes and timeouts of one resource as the host sees it.
///
/// During create/update `attributes` holds the planned values; during
/// read/delete it holds the last stored state. `prior` is the stored state an
/// update is diffed against.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceData {
    #[serde(default)]
    id: String,
    #[serde(default)]
    attributes: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    prior: Option<Map<String, Value>>,
    #[serde(skip)]
    timeouts: Timeouts,
}

impl ResourceData {
    /// Snapshot for a create (or data source read)
    pub fn new(attributes: Map<String, Value>) -> Self {
        Self {
            attributes,
            ..Default::default()
        }
    }

    /// Snapshot of stored state, for read/delete/import
    pub fn from_state(id: impl Into<String>, attributes: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            attributes,
            ..Default::default()
        }
    }

    /// Planned attributes diffed against the stored ones
    pub fn for_update(
        id: impl Into<String>,
        planned: Map<String, Value>,
        prior: Map<String, Value>,
    ) -> Self {
        Self {
            id: id.into(),
            attributes: planned,
            prior: Some(prior),
            ..Default::default()
        }
    }

    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }

    /// Tell the host the resource is gone
    pub fn clear_id(&mut self) {
        self.id.clear();
    }

    pub fn is_gone(&self) -> bool {
        self.id.is_empty()
    }

    pub fn require_id(&self) -> Result<String> {
        if self.id.is_empty() {
            return Err(Error::validation("resource id is required"));
        }
        Ok(self.id.clone())
    }

    pub fn timeouts(&self) -> &Timeouts {
        &self.timeouts
    }

    /// Engine budget for `op` (host timeout minus the safety margin)
    pub fn budget(&self, op: Op) -> std::time::Duration {
        self.timeouts.budget(op)
    }

    /// Deadline for one `op` callback, starting now
    pub fn deadline(&self, op: Op) -> Deadline {
        Deadline::after(self.budget(op))
    }

    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    pub fn into_attributes(self) -> Map<String, Value> {
        self.attributes
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key).filter(|v| !v.is_null())
    }

    /// Non-empty string attribute
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
    }

    pub fn require_str(&self, key: &str) -> Result<&str> {
        self.get_str(key)
            .ok_or_else(|| Error::validation(format!("\"{key}\" is required")))
    }

    /// String attribute, empty when unset
    pub fn get_string(&self, key: &str) -> String {
        self.get_str(key).unwrap_or_default().to_string()
    }

    pub fn get_bool(&self, key: &str) -> bool {
        self.get(key).and_then(Value::as_bool).unwrap_or(false)
    }

    pub fn get_u32(&self, key: &str) -> Result<Option<u32>> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => value
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .map(Some)
                .ok_or_else(|| {
                    Error::validation(format!("\"{key}\" must be a non-negative integer"))
                }),
        }
    }

    pub fn require_u32(&self, key: &str) -> Result<u32> {
        self.get_u32(key)?
            .ok_or_else(|| Error::validation(format!("\"{key}\" is required")))
    }

    /// Decode a nested block (object or list of objects)
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        self.get(key)
            .map(|value| {
                serde_json::from_value(value.clone())
                    .map_err(|err| Error::validation(format!("invalid \"{key}\": {err}")))
            })
            .transpose()
    }

    /// Set an attribute; `None` stores null
    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.attributes.insert(key.to_string(), value.into());
    }

    /// Serialize a nested value into an attribute
    pub fn set_as<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
        self.attributes.insert(key.to_string(), serde_json::to_value(value)?);
        Ok(())
    }

    /// Copy every field of a flattened view into the attributes
    pub fn merge_from<T: Serialize>(&mut self, state: &T) -> Result<()> {
        match serde_json::to_value(state)? {
            Value::Object(fields) => {
                self.attributes.extend(fields);
                Ok(())
            }
            other => Err(Error::validation(format!("expected an attribute object, got {other}"))),
        }
    }

    /// Whether `key` differs from the prior state. Without a prior
    /// snapshot every set attribute counts as changed.
    pub fn has_change(&self, key: &str) -> bool {
        match &self.prior {
            Some(prior) => normalized(prior.get(key)) != normalized(self.attributes.get(key)),
            None => self.get(key).is_some(),
        }
    }

    pub fn has_changes(&self, keys: &[&str]) -> bool {
        keys.iter().any(|key| self.has_change(key))
    }
}

fn normalized(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}
