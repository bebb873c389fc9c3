//! # Values
//!
//! What travels along the host's graph edges. The host has already
//! type-checked inputs against the registry; the readers here only turn a
//! mismatch into an error instead of a panic.

use std::collections::HashMap;

use crate::core::{LoraStack, PackError, PackResult, Settings, SettingsList};

/// A value on a graph edge
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Unconnected optional input
    None,
    Settings(Settings),
    SettingsList(SettingsList),
    LoraStack(LoraStack),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Value {
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::None => "none",
            Value::Settings(_) => "settings",
            Value::SettingsList(_) => "settings list",
            Value::LoraStack(_) => "lora stack",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
        }
    }
}

impl From<Settings> for Value {
    fn from(v: Settings) -> Self {
        Value::Settings(v)
    }
}

impl From<SettingsList> for Value {
    fn from(v: SettingsList) -> Self {
        Value::SettingsList(v)
    }
}

impl From<Option<LoraStack>> for Value {
    fn from(v: Option<LoraStack>) -> Self {
        v.map_or(Value::None, Value::LoraStack)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

/// Saturates at `i64::MAX`
impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Value::Int(i64::try_from(v).unwrap_or(i64::MAX))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

/// Named inputs of one node activation
pub type Inputs = HashMap<String, Value>;

/// Typed access to `Inputs`
///
/// Required readers fail with `MissingField` when the input is absent or
/// `Value::None`; optional readers return `Ok(None)` instead.
pub(crate) struct InputReader<'a> {
    inputs: &'a Inputs,
}

impl<'a> InputReader<'a> {
    pub(crate) fn new(inputs: &'a Inputs) -> Self {
        Self { inputs }
    }

    fn get(&self, name: &str) -> Option<&'a Value> {
        self.inputs.get(name).filter(|v| !v.is_none())
    }

    fn need(&self, name: &str) -> PackResult<&'a Value> {
        self.get(name).ok_or_else(|| PackError::missing(name))
    }

    fn mismatch(name: &str, expected: &'static str) -> PackError {
        PackError::TypeMismatch { field: name.to_string(), expected }
    }

    pub(crate) fn settings(&self, name: &str) -> PackResult<&'a Settings> {
        match self.need(name)? {
            Value::Settings(s) => Ok(s),
            _ => Err(Self::mismatch(name, "settings")),
        }
    }

    pub(crate) fn opt_settings(&self, name: &str) -> PackResult<Option<&'a Settings>> {
        match self.get(name) {
            None => Ok(None),
            Some(Value::Settings(s)) => Ok(Some(s)),
            Some(_) => Err(Self::mismatch(name, "settings")),
        }
    }

    pub(crate) fn settings_list(&self, name: &str) -> PackResult<&'a SettingsList> {
        match self.need(name)? {
            Value::SettingsList(l) => Ok(l),
            _ => Err(Self::mismatch(name, "settings list")),
        }
    }

    pub(crate) fn opt_settings_list(&self, name: &str) -> PackResult<Option<&'a SettingsList>> {
        match self.get(name) {
            None => Ok(None),
            Some(Value::SettingsList(l)) => Ok(Some(l)),
            Some(_) => Err(Self::mismatch(name, "settings list")),
        }
    }

    pub(crate) fn opt_lora_stack(&self, name: &str) -> PackResult<Option<LoraStack>> {
        match self.get(name) {
            None => Ok(None),
            Some(Value::LoraStack(s)) => Ok(Some(s.clone())),
            Some(_) => Err(Self::mismatch(name, "lora stack")),
        }
    }

    pub(crate) fn int(&self, name: &str) -> PackResult<i64> {
        match self.need(name)? {
            Value::Int(i) => Ok(*i),
            _ => Err(Self::mismatch(name, "int")),
        }
    }

    /// Ints are accepted where a float is expected
    pub(crate) fn float(&self, name: &str) -> PackResult<f64> {
        match self.need(name)? {
            Value::Float(f) => Ok(*f),
            Value::Int(i) => Ok(*i as f64),
            _ => Err(Self::mismatch(name, "float")),
        }
    }

    pub(crate) fn string(&self, name: &str) -> PackResult<&'a str> {
        match self.need(name)? {
            Value::Str(s) => Ok(s),
            _ => Err(Self::mismatch(name, "string")),
        }
    }

    pub(crate) fn opt_string(&self, name: &str) -> PackResult<Option<&'a str>> {
        match self.get(name) {
            None => Ok(None),
            Some(Value::Str(s)) => Ok(Some(s)),
            Some(_) => Err(Self::mismatch(name, "string")),
        }
    }

    /// A seed must be a non-negative int
    pub(crate) fn seed(&self, name: &str) -> PackResult<u64> {
        let raw = self.int(name)?;
        u64::try_from(raw).map_err(|_| PackError::Range(format!("seed {} is negative", raw)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(pairs: Vec<(&str, Value)>) -> Inputs {
        pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
    }

    #[test]
    fn test_required_missing_and_none() {
        let map = inputs(vec![("a", Value::None)]);
        let r = InputReader::new(&map);
        assert_eq!(r.int("a"), Err(PackError::missing("a")));
        assert_eq!(r.int("b"), Err(PackError::missing("b")));
    }

    #[test]
    fn test_type_mismatch() {
        let map = inputs(vec![("steps", Value::from("twenty"))]);
        let r = InputReader::new(&map);
        assert_eq!(
            r.int("steps"),
            Err(PackError::TypeMismatch { field: "steps".into(), expected: "int" })
        );
    }

    #[test]
    fn test_from_usize() {
        assert_eq!(Value::from(3usize), Value::Int(3));
        #[cfg(target_pointer_width = "64")]
        assert_eq!(Value::from(usize::MAX), Value::Int(i64::MAX));
    }

    #[test]
    fn test_float_accepts_int() {
        let map = inputs(vec![("cfg", Value::Int(8))]);
        assert_eq!(InputReader::new(&map).float("cfg").unwrap(), 8.0);
    }

    #[test]
    fn test_optional_readers() {
        let map = inputs(vec![("base", Value::None)]);
        let r = InputReader::new(&map);
        assert_eq!(r.opt_settings_list("base").unwrap(), None);
        assert_eq!(r.opt_settings("missing").unwrap(), None);
        assert_eq!(r.opt_lora_stack("missing").unwrap(), None);
    }

    #[test]
    fn test_seed() {
        let map = inputs(vec![("ok", Value::Int(42)), ("neg", Value::Int(-1))]);
        let r = InputReader::new(&map);
        assert_eq!(r.seed("ok").unwrap(), 42);
        assert!(matches!(r.seed("neg"), Err(PackError::Range(_))));
    }

    #[test]
    fn test_value_from() {
        assert_eq!(Value::from(3usize), Value::Int(3));
        assert_eq!(Value::from(None::<LoraStack>), Value::None);
        assert_eq!(Value::from(Settings::Absent).type_name(), "settings");
    }
}
