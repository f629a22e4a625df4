//! Request body validation with per-field error collection.

use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::OnceLock;

pub const NON_FIELD_ERRORS: &str = "non_field_errors";

const REQUIRED: &str = "This field is required.";
const NOT_NULL: &str = "This field may not be null.";
const NOT_BLANK: &str = "This field may not be blank.";

/// Field name to list of messages. Serializes as a plain JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::default();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn messages(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Walks a JSON object field by field, recording every failure instead of stopping at the first.
/// Accessors return a placeholder for invalid fields; `finish` discards the built value if anything failed.
pub struct Fields<'a> {
    body: &'a Map<String, Value>,
    errors: FieldErrors,
}

impl<'a> Fields<'a> {
    pub fn new(body: &'a Value) -> Result<Self, FieldErrors> {
        match body {
            Value::Object(map) => Ok(Fields {
                body: map,
                errors: FieldErrors::default(),
            }),
            other => Err(FieldErrors::single(
                NON_FIELD_ERRORS,
                format!(
                    "Invalid data. Expected a dictionary, but got {}.",
                    json_type_name(other)
                ),
            )),
        }
    }

    fn present(&mut self, name: &str) -> Option<&'a Value> {
        match self.body.get(name) {
            None => {
                self.errors.add(name, REQUIRED);
                None
            }
            Some(Value::Null) => {
                self.errors.add(name, NOT_NULL);
                None
            }
            Some(v) => Some(v),
        }
    }

    /// Required, non-blank string of at most `max_length` characters. Surrounding whitespace is trimmed.
    pub fn string(&mut self, name: &str, max_length: usize) -> String {
        self.text(name, Some(max_length), true)
    }

    /// Required, non-blank trimmed string with no length limit.
    pub fn unbounded_string(&mut self, name: &str) -> String {
        self.text(name, None, true)
    }

    /// Required, non-empty string taken exactly as sent.
    pub fn raw_string(&mut self, name: &str) -> String {
        self.text(name, None, false)
    }

    fn text(&mut self, name: &str, max_length: Option<usize>, trim: bool) -> String {
        let Some(value) = self.present(name) else {
            return String::new();
        };
        let raw = match value {
            Value::String(s) if trim => s.trim().to_string(),
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => {
                self.errors.add(name, "Not a valid string.");
                return String::new();
            }
        };
        if raw.is_empty() {
            self.errors.add(name, NOT_BLANK);
        } else if let Some(max) = max_length.filter(|max| raw.chars().count() > *max) {
            self.errors.add(
                name,
                format!("Ensure this field has no more than {} characters.", max),
            );
        }
        raw
    }

    /// Required string holding a plausible email address.
    pub fn email(&mut self, name: &str, max_length: usize) -> String {
        let before = self.errors.contains(name);
        let value = self.string(name, max_length);
        if !before && !self.errors.contains(name) && !is_email(&value) {
            self.errors.add(name, "Enter a valid email address.");
        }
        value
    }

    /// Required integer within `[min, max]`. Accepts JSON numbers with no fractional part and numeric strings.
    pub fn integer(&mut self, name: &str, min: i64, max: i64) -> i64 {
        let Some(value) = self.present(name) else {
            return 0;
        };
        let parsed = match value {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        };
        let Some(n) = parsed else {
            self.errors.add(name, "A valid integer is required.");
            return 0;
        };
        if n < min {
            self.errors.add(
                name,
                format!("Ensure this value is greater than or equal to {}.", min),
            );
        } else if n > max {
            self.errors.add(
                name,
                format!("Ensure this value is less than or equal to {}.", max),
            );
        }
        n
    }

    /// Required string that must parse into one of `T`'s choices.
    pub fn choice<T: FromStr + Default>(&mut self, name: &str) -> T {
        let Some(value) = self.present(name) else {
            return T::default();
        };
        let shown = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        match value.as_str().map(str::parse::<T>) {
            Some(Ok(v)) => v,
            _ => {
                self.errors.add(name, format!("\"{}\" is not a valid choice.", shown));
                T::default()
            }
        }
    }

    pub fn finish<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(self.errors)
        }
    }
}

fn json_type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn is_email(s: &str) -> bool {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s.]+$").ok())
        .as_ref()
        .is_some_and(|re| re.is_match(s))
}
