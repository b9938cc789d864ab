use std::collections::HashMap;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

use serde::{Deserialize, Serialize, Serializer};

use crate::core::OError;
use crate::operators::Comparator;

/// The tag recorded with a [`DataValue`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataValueType {
    Integer,
    Real,
    Bool,
    Text,
    Comparator,
}

impl Display for DataValueType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataValueType::Integer => "an integer",
            DataValueType::Real => "a real",
            DataValueType::Bool => "a boolean",
            DataValueType::Text => "a string",
            DataValueType::Comparator => "a comparator",
        };
        f.write_str(name)
    }
}

/// A value with its type, used to configure operators and to exchange the input and output
/// parameters of an algorithm.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum DataValue {
    /// The value for an integer number. This is an i64.
    Integer(i64),
    /// The value for a floating-point number. This is a f64.
    Real(f64),
    /// A boolean flag.
    Bool(bool),
    /// A string (for example the name of a differential evolution variant).
    Text(String),
    /// A comparator used by a selection operator or an algorithm.
    #[serde(skip_deserializing)]
    Comparator(Arc<dyn Comparator>),
}

impl Serialize for DataValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            DataValue::Integer(v) => serializer.serialize_i64(*v),
            DataValue::Real(v) => serializer.serialize_f64(*v),
            DataValue::Bool(v) => serializer.serialize_bool(*v),
            DataValue::Text(v) => serializer.serialize_str(v),
            DataValue::Comparator(c) => serializer.serialize_str(&c.name()),
        }
    }
}

impl PartialEq for DataValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (DataValue::Real(s), DataValue::Real(o)) => (s.is_nan() && o.is_nan()) || (*s == *o),
            (DataValue::Integer(s), DataValue::Integer(o)) => s == o,
            (DataValue::Bool(s), DataValue::Bool(o)) => s == o,
            (DataValue::Text(s), DataValue::Text(o)) => s == o,
            (DataValue::Comparator(s), DataValue::Comparator(o)) => Arc::ptr_eq(s, o),
            _ => false,
        }
    }
}

impl Display for DataValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            DataValue::Integer(v) => write!(f, "{v}"),
            DataValue::Real(v) => write!(f, "{v}"),
            DataValue::Bool(v) => write!(f, "{v}"),
            DataValue::Text(v) => write!(f, "{v}"),
            DataValue::Comparator(c) => write!(f, "{}", c.name()),
        }
    }
}

impl DataValue {
    /// The type recorded with the value.
    ///
    /// returns: `DataValueType`
    pub fn value_type(&self) -> DataValueType {
        match self {
            DataValue::Integer(_) => DataValueType::Integer,
            DataValue::Real(_) => DataValueType::Real,
            DataValue::Bool(_) => DataValueType::Bool,
            DataValue::Text(_) => DataValueType::Text,
            DataValue::Comparator(_) => DataValueType::Comparator,
        }
    }

    /// Get the value if the data is of real type. Integers are widened to real numbers. This
    /// returns `None` for any other type.
    ///
    /// returns: `Option<f64>`
    pub fn as_real(&self) -> Option<f64> {
        match self {
            DataValue::Real(v) => Some(*v),
            DataValue::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Get the value if the data is of integer type.
    ///
    /// returns: `Option<i64>`
    pub fn as_integer(&self) -> Option<i64> {
        if let DataValue::Integer(v) = self {
            Some(*v)
        } else {
            None
        }
    }

    /// Get the value if the data is a boolean.
    ///
    /// returns: `Option<bool>`
    pub fn as_bool(&self) -> Option<bool> {
        if let DataValue::Bool(v) = self {
            Some(*v)
        } else {
            None
        }
    }

    /// Get the value if the data is a string.
    ///
    /// returns: `Option<&str>`
    pub fn as_text(&self) -> Option<&str> {
        if let DataValue::Text(v) = self {
            Some(v.as_str())
        } else {
            None
        }
    }

    /// Get the comparator if the data stores one.
    ///
    /// returns: `Option<Arc<dyn Comparator>>`
    pub fn as_comparator(&self) -> Option<Arc<dyn Comparator>> {
        if let DataValue::Comparator(c) = self {
            Some(c.clone())
        } else {
            None
        }
    }
}

impl From<f64> for DataValue {
    fn from(value: f64) -> Self {
        DataValue::Real(value)
    }
}

impl From<i32> for DataValue {
    fn from(value: i32) -> Self {
        DataValue::Integer(value as i64)
    }
}

impl From<i64> for DataValue {
    fn from(value: i64) -> Self {
        DataValue::Integer(value)
    }
}

impl From<usize> for DataValue {
    fn from(value: usize) -> Self {
        DataValue::Integer(value as i64)
    }
}

impl From<bool> for DataValue {
    fn from(value: bool) -> Self {
        DataValue::Bool(value)
    }
}

impl From<&str> for DataValue {
    fn from(value: &str) -> Self {
        DataValue::Text(value.to_string())
    }
}

impl From<Arc<dyn Comparator>> for DataValue {
    fn from(value: Arc<dyn Comparator>) -> Self {
        DataValue::Comparator(value)
    }
}

/// A map of named parameters. Operators and algorithms read their settings from this map: keys
/// they do not recognise are ignored and missing keys fall back to the documented defaults.
/// A key set with a value of the wrong type is an error.
///
/// # Example
/// ```
/// use optipop::core::Parameters;
///
/// let mut parameters = Parameters::new();
/// parameters.set("CR", 0.9).set("DE_VARIANT", "rand/1/exp");
/// assert_eq!(parameters.real_or("CR", 0.5).unwrap(), 0.9);
/// assert_eq!(parameters.real_or("F", 0.5).unwrap(), 0.5);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Parameters(HashMap<String, DataValue>);

impl Parameters {
    /// Create an empty parameter map.
    ///
    /// returns: `Parameters`
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the parameters from a JSON object. Comparators cannot be loaded from JSON and must
    /// be set with [`Parameters::set`].
    ///
    /// # Arguments
    ///
    /// * `json`: The JSON object (for example `{"populationSize": 100, "CR": 0.5}`).
    ///
    /// returns: `Result<Parameters, OError>`
    pub fn from_json(json: &str) -> Result<Self, OError> {
        serde_json::from_str(json).map_err(|e| OError::ParameterParsing(e.to_string()))
    }

    /// Set or replace a parameter.
    ///
    /// # Arguments
    ///
    /// * `name`: The parameter name.
    /// * `value`: The value.
    ///
    /// returns: `&mut Parameters`
    pub fn set<V: Into<DataValue>>(&mut self, name: &str, value: V) -> &mut Self {
        self.0.insert(name.to_string(), value.into());
        self
    }

    /// Get a parameter by name.
    ///
    /// returns: `Option<&DataValue>`
    pub fn get(&self, name: &str) -> Option<&DataValue> {
        self.0.get(name)
    }

    /// Whether the parameter exists.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// The number of parameters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the map has no parameters.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the parameter names and values.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &DataValue)> {
        self.0.iter()
    }

    /// Copy all the parameters of `other` into this map, replacing the existing ones.
    ///
    /// # Arguments
    ///
    /// * `other`: The parameters to copy.
    pub fn extend(&mut self, other: &Parameters) {
        for (name, value) in other.iter() {
            self.0.insert(name.clone(), value.clone());
        }
    }

    /// Get a real parameter or its default when it is not set. This returns an error if the
    /// parameter exists but is not a number.
    ///
    /// # Arguments
    ///
    /// * `name`: The parameter name.
    /// * `default`: The value to use when the parameter is missing.
    ///
    /// returns: `Result<f64, OError>`
    pub fn real_or(&self, name: &str, default: f64) -> Result<f64, OError> {
        self.optional_real(name).map(|v| v.unwrap_or(default))
    }

    /// Get a real parameter if it is set. This returns an error if the parameter exists but is
    /// not a number.
    ///
    /// returns: `Result<Option<f64>, OError>`
    pub fn optional_real(&self, name: &str) -> Result<Option<f64>, OError> {
        match self.0.get(name) {
            None => Ok(None),
            Some(v) => v
                .as_real()
                .map(Some)
                .ok_or_else(|| Self::wrong_type(name, DataValueType::Real)),
        }
    }

    /// Get an integer parameter or its default when it is not set.
    ///
    /// returns: `Result<i64, OError>`
    pub fn integer_or(&self, name: &str, default: i64) -> Result<i64, OError> {
        match self.0.get(name) {
            None => Ok(default),
            Some(v) => v
                .as_integer()
                .ok_or_else(|| Self::wrong_type(name, DataValueType::Integer)),
        }
    }

    /// Get a non-negative integer parameter or its default when it is not set. This returns an
    /// error if the value is negative.
    ///
    /// returns: `Result<usize, OError>`
    pub fn usize_or(&self, name: &str, default: usize) -> Result<usize, OError> {
        let value = self.integer_or(name, default as i64)?;
        usize::try_from(value).map_err(|_| {
            OError::InvalidParameter(
                name.to_string(),
                format!("the value {value} must be a positive integer"),
            )
        })
    }

    /// Get a boolean parameter or its default when it is not set.
    ///
    /// returns: `Result<bool, OError>`
    pub fn bool_or(&self, name: &str, default: bool) -> Result<bool, OError> {
        match self.0.get(name) {
            None => Ok(default),
            Some(v) => v
                .as_bool()
                .ok_or_else(|| Self::wrong_type(name, DataValueType::Bool)),
        }
    }

    /// Get a string parameter or its default when it is not set.
    ///
    /// returns: `Result<String, OError>`
    pub fn text_or(&self, name: &str, default: &str) -> Result<String, OError> {
        match self.0.get(name) {
            None => Ok(default.to_string()),
            Some(v) => v
                .as_text()
                .map(|t| t.to_string())
                .ok_or_else(|| Self::wrong_type(name, DataValueType::Text)),
        }
    }

    /// Get a comparator parameter or the comparator returned by `default` when it is not set.
    ///
    /// returns: `Result<Arc<dyn Comparator>, OError>`
    pub fn comparator_or<F>(&self, name: &str, default: F) -> Result<Arc<dyn Comparator>, OError>
    where
        F: FnOnce() -> Arc<dyn Comparator>,
    {
        match self.0.get(name) {
            None => Ok(default()),
            Some(v) => v
                .as_comparator()
                .ok_or_else(|| Self::wrong_type(name, DataValueType::Comparator)),
        }
    }

    fn wrong_type(name: &str, expected: DataValueType) -> OError {
        OError::WrongDataType(name.to_string(), expected.to_string())
    }
}

impl Display for Parameters {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.0.keys().collect();
        names.sort();
        let items: Vec<String> = names
            .into_iter()
            .map(|name| format!("{name}={}", self.0[name]))
            .collect();
        write!(f, "{{{}}}", items.join(", "))
    }
}
