//! Untrusted form input and typed accessors that validate it.

use std::net::Ipv4Addr;
use std::ops::RangeInclusive;

use indexmap::IndexMap;
use log::warn;
use serde::{Deserialize, Serialize};

use super::validate::is_contiguous_mask;
use crate::error::ValidationError;
use crate::ledger::Color;

type Result<T> = std::result::Result<T, ValidationError>;

/// One form value as typed by the form layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl ParamValue {
    /// Text form, trimmed. Booleans and integers are rendered.
    fn text(&self) -> String {
        match self {
            ParamValue::Bool(b) => b.to_string(),
            ParamValue::Int(i) => i.to_string(),
            ParamValue::Text(s) => s.trim().to_string(),
        }
    }

    fn is_blank(&self) -> bool {
        matches!(self, ParamValue::Text(s) if s.trim().is_empty())
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        ParamValue::Int(i64::from(value))
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

/// Field name → value, as submitted by the form layer.
///
/// Nothing in here is trusted; every accessor validates and reports a
/// [`ValidationError`] naming the field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterSet {
    values: IndexMap<String, ParamValue>,
}

impl ParameterSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(field, value);
        self
    }

    /// Insert or replace a value.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<ParamValue>) {
        self.values.insert(field.into(), value.into());
    }

    /// Raw value, if any.
    pub fn get(&self, field: &str) -> Option<&ParamValue> {
        self.values.get(field)
    }

    /// The value when present and not blank.
    pub fn present(&self, field: &str) -> Option<&ParamValue> {
        self.values.get(field).filter(|v| !v.is_blank())
    }

    /// Required text.
    pub fn text(&self, field: &str) -> Result<String> {
        self.opt_text(field)
            .ok_or_else(|| ValidationError::required(field))
    }

    /// Optional text.
    pub fn opt_text(&self, field: &str) -> Option<String> {
        self.present(field).map(ParamValue::text)
    }

    /// Required integer within `range`.
    pub fn int(&self, field: &str, range: RangeInclusive<i64>) -> Result<i64> {
        self.opt_int(field, range)?
            .ok_or_else(|| ValidationError::required(field))
    }

    /// Optional integer within `range`.
    pub fn opt_int(&self, field: &str, range: RangeInclusive<i64>) -> Result<Option<i64>> {
        let value = match self.present(field) {
            None => return Ok(None),
            Some(ParamValue::Int(i)) => *i,
            Some(ParamValue::Text(s)) => s
                .trim()
                .parse::<i64>()
                .map_err(|_| ValidationError::new(format!("{field} must be a number")))?,
            Some(ParamValue::Bool(_)) => {
                return Err(ValidationError::new(format!("{field} must be a number")));
            }
        };
        if !range.contains(&value) {
            return Err(ValidationError::new(format!(
                "{field} must be between {} and {}",
                range.start(),
                range.end()
            )));
        }
        Ok(Some(value))
    }

    /// Checkbox value; missing means unchecked.
    pub fn flag(&self, field: &str) -> Result<bool> {
        match self.present(field) {
            None => Ok(false),
            Some(ParamValue::Bool(b)) => Ok(*b),
            Some(ParamValue::Int(0)) => Ok(false),
            Some(ParamValue::Int(1)) => Ok(true),
            Some(ParamValue::Text(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => Ok(true),
                "false" | "no" | "off" | "0" => Ok(false),
                _ => Err(ValidationError::new(format!("{field} must be yes or no"))),
            },
            Some(ParamValue::Int(_)) => {
                Err(ValidationError::new(format!("{field} must be yes or no")))
            }
        }
    }

    /// Required dotted-quad IPv4 address.
    pub fn ipv4(&self, field: &str) -> Result<Ipv4Addr> {
        self.opt_ipv4(field)?
            .ok_or_else(|| ValidationError::required(field))
    }

    /// Optional dotted-quad IPv4 address.
    pub fn opt_ipv4(&self, field: &str) -> Result<Option<Ipv4Addr>> {
        self.opt_text(field)
            .map(|s| {
                s.parse::<Ipv4Addr>().map_err(|_| {
                    ValidationError::new(format!("{field} must be a valid IPv4 address"))
                })
            })
            .transpose()
    }

    /// Required contiguous subnet mask.
    pub fn netmask(&self, field: &str) -> Result<Ipv4Addr> {
        self.opt_netmask(field)?
            .ok_or_else(|| ValidationError::required(field))
    }

    /// Optional contiguous subnet mask.
    pub fn opt_netmask(&self, field: &str) -> Result<Option<Ipv4Addr>> {
        let Some(mask) = self.opt_ipv4(field)? else {
            return Ok(None);
        };
        if !is_contiguous_mask(mask) {
            return Err(ValidationError::new(format!(
                "{field} must be a valid subnet mask"
            )));
        }
        Ok(Some(mask))
    }

    /// Required choice; matching ignores case and the canonical option is returned.
    pub fn choice(&self, field: &str, options: &[&'static str]) -> Result<&'static str> {
        let value = self.text(field)?;
        options
            .iter()
            .copied()
            .find(|o| o.eq_ignore_ascii_case(&value))
            .ok_or_else(|| {
                ValidationError::new(format!(
                    "{field} must be one of: {}",
                    options.join(", ")
                ))
            })
    }

    /// Cosmetic color; anything but `#RRGGBB` falls back to `default`.
    pub fn color(&self, field: &str, default: Color) -> Color {
        match self.opt_text(field) {
            None => default,
            Some(raw) => Color::parse(&raw).unwrap_or_else(|| {
                warn!("Ignoring invalid {field} '{raw}', using {default}");
                default
            }),
        }
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for ParameterSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = ParameterSet::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}
