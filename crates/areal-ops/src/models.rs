use std::fmt;
use std::str::FromStr;

use areal_core::config::{ExecutionMode, LayeredConfig, DEFAULT_AREA_EPSILON, DEFAULT_JOIN_SUFFIX};
use areal_core::error::{ArealError, Result};
use areal_core::models::{AttributeValue, ValidityMode};

use crate::fields::numeric_value;

/// Tunables shared by every operation
#[derive(Debug, Clone, PartialEq)]
pub struct OpsOptions {
    /// Suffix for right-hand join columns whose names collide with left columns
    pub join_suffix: String,

    /// Source polygons with area at or below this are rejected by interpolation
    pub area_epsilon: f64,

    pub validity: ValidityMode,

    pub execution: ExecutionMode,
}

impl Default for OpsOptions {
    fn default() -> Self {
        Self {
            join_suffix: DEFAULT_JOIN_SUFFIX.to_string(),
            area_epsilon: DEFAULT_AREA_EPSILON,
            validity: ValidityMode::Strict,
            execution: ExecutionMode::Sequential,
        }
    }
}

impl OpsOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_join_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.join_suffix = suffix.into();
        self
    }

    pub fn with_area_epsilon(mut self, epsilon: f64) -> Self {
        self.area_epsilon = epsilon;
        self
    }

    pub fn with_validity(mut self, validity: ValidityMode) -> Self {
        self.validity = validity;
        self
    }

    pub fn with_execution(mut self, execution: ExecutionMode) -> Self {
        self.execution = execution;
        self
    }
}

impl From<&LayeredConfig> for OpsOptions {
    fn from(config: &LayeredConfig) -> Self {
        Self {
            join_suffix: config.join_suffix.value.clone(),
            area_epsilon: config.area_epsilon.value,
            validity: config.geometry_validity.value,
            execution: config.execution_mode(),
        }
    }
}

/// Row semantics of a spatial join
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinMode {
    /// Every left feature yields at least one row; unmatched rows carry nulls
    #[default]
    Left,
    /// Only matched left features yield rows
    Inner,
}

impl fmt::Display for JoinMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinMode::Left => write!(f, "left"),
            JoinMode::Inner => write!(f, "inner"),
        }
    }
}

impl FromStr for JoinMode {
    type Err = ArealError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "left" => Ok(JoinMode::Left),
            "inner" => Ok(JoinMode::Inner),
            _ => Err(ArealError::ConfigInvalid {
                key: "join_mode".to_string(),
                reason: format!("Invalid join mode: {}. Use left or inner", s),
            }),
        }
    }
}

/// Fields to interpolate from source polygons onto target polygons
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AreaInterpolation {
    /// Totals (counts, populations); distributed by overlap share of the source
    pub extensive: Vec<String>,

    /// Densities and rates; averaged by overlap area
    pub intensive: Vec<String>,
}

impl AreaInterpolation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add extensive fields
    pub fn extensive(mut self, fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.extensive.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Add intensive fields
    pub fn intensive(mut self, fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.intensive.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.extensive.is_empty() && self.intensive.is_empty()
    }

    /// All requested field names, extensive first
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.extensive.iter().chain(self.intensive.iter()).map(String::as_str)
    }
}

/// Reduction applied to one field over the members of a group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reducer {
    Mean,
    Sum,
    Min,
    Max,
    /// Number of non-null values
    Count,
    /// First non-null value in input order
    First,
}

impl Reducer {
    /// Reduce `(feature index, value)` pairs; nulls are ignored.
    ///
    /// Mean, min, max and first of no values are null, sum is 0 and count is 0.
    pub fn reduce(&self, field: &str, values: &[(usize, &AttributeValue)]) -> Result<AttributeValue> {
        let numbers = || {
            values
                .iter()
                .filter_map(|(index, value)| numeric_value(field, *index, value).transpose())
                .collect::<Result<Vec<f64>>>()
        };

        let reduced = match self {
            Reducer::Count => {
                AttributeValue::Integer(values.iter().filter(|(_, v)| !v.is_null()).count() as i64)
            }
            Reducer::First => values
                .iter()
                .find(|(_, v)| !v.is_null())
                .map(|(_, v)| (*v).clone())
                .unwrap_or_default(),
            Reducer::Sum => AttributeValue::Float(numbers()?.iter().sum()),
            Reducer::Mean => {
                let numbers = numbers()?;
                if numbers.is_empty() {
                    AttributeValue::Null
                } else {
                    AttributeValue::Float(numbers.iter().sum::<f64>() / numbers.len() as f64)
                }
            }
            Reducer::Min => {
                numbers()?.into_iter().reduce(f64::min).map(AttributeValue::Float).unwrap_or_default()
            }
            Reducer::Max => {
                numbers()?.into_iter().reduce(f64::max).map(AttributeValue::Float).unwrap_or_default()
            }
        };

        Ok(reduced)
    }
}

impl fmt::Display for Reducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Reducer::Mean => "mean",
            Reducer::Sum => "sum",
            Reducer::Min => "min",
            Reducer::Max => "max",
            Reducer::Count => "count",
            Reducer::First => "first",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Reducer {
    type Err = ArealError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "mean" | "avg" => Ok(Reducer::Mean),
            "sum" => Ok(Reducer::Sum),
            "min" => Ok(Reducer::Min),
            "max" => Ok(Reducer::Max),
            "count" => Ok(Reducer::Count),
            "first" => Ok(Reducer::First),
            _ => Err(ArealError::ConfigInvalid {
                key: "reducer".to_string(),
                reason: format!("Unknown reducer '{}'. Use mean, sum, min, max, count, or first", s),
            }),
        }
    }
}

/// A reducer bound to an input field and an output column name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldReducer {
    pub field: String,
    pub reducer: Reducer,
    pub alias: Option<String>,
}

impl FieldReducer {
    pub fn new(field: impl Into<String>, reducer: Reducer) -> Self {
        Self { field: field.into(), reducer, alias: None }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Output column name; defaults to the input field name
    pub fn output_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.field)
    }
}

impl FromStr for FieldReducer {
    type Err = ArealError;

    /// Parse `field:reducer` or `field:reducer:alias`
    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(':').collect();
        match parts.as_slice() {
            [field, reducer] if !field.is_empty() => Ok(FieldReducer::new(*field, reducer.parse()?)),
            [field, reducer, alias] if !field.is_empty() && !alias.is_empty() => {
                Ok(FieldReducer::new(*field, reducer.parse()?).with_alias(*alias))
            }
            _ => Err(ArealError::ConfigInvalid {
                key: "reducer".to_string(),
                reason: format!("Invalid reducer spec '{}'. Use field:reducer[:alias]", s),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(raw: &[AttributeValue]) -> Vec<(usize, &AttributeValue)> {
        raw.iter().enumerate().collect()
    }

    #[test]
    fn test_reducers_ignore_nulls() {
        let raw = vec![
            AttributeValue::Integer(2),
            AttributeValue::Null,
            AttributeValue::Float(4.0),
        ];
        let values = values(&raw);

        assert_eq!(Reducer::Mean.reduce("v", &values).unwrap(), AttributeValue::Float(3.0));
        assert_eq!(Reducer::Sum.reduce("v", &values).unwrap(), AttributeValue::Float(6.0));
        assert_eq!(Reducer::Min.reduce("v", &values).unwrap(), AttributeValue::Float(2.0));
        assert_eq!(Reducer::Max.reduce("v", &values).unwrap(), AttributeValue::Float(4.0));
        assert_eq!(Reducer::Count.reduce("v", &values).unwrap(), AttributeValue::Integer(2));
        assert_eq!(Reducer::First.reduce("v", &values).unwrap(), AttributeValue::Integer(2));
    }

    #[test]
    fn test_reducers_over_nothing() {
        let raw = vec![AttributeValue::Null];
        let values = values(&raw);

        assert_eq!(Reducer::Mean.reduce("v", &values).unwrap(), AttributeValue::Null);
        assert_eq!(Reducer::Sum.reduce("v", &values).unwrap(), AttributeValue::Float(0.0));
        assert_eq!(Reducer::Min.reduce("v", &values).unwrap(), AttributeValue::Null);
        assert_eq!(Reducer::Count.reduce("v", &values).unwrap(), AttributeValue::Integer(0));
        assert_eq!(Reducer::First.reduce("v", &values).unwrap(), AttributeValue::Null);
    }

    #[test]
    fn test_numeric_reducer_rejects_text() {
        let raw = vec![AttributeValue::Integer(1), AttributeValue::Text("n/a".to_string())];
        let err = Reducer::Mean.reduce("v", &values(&raw)).unwrap_err();
        assert!(matches!(err, ArealError::NonNumericAttribute { index: 1, .. }));

        // Count and First accept any scalar
        assert_eq!(Reducer::Count.reduce("v", &values(&raw)).unwrap(), AttributeValue::Integer(2));
    }

    #[test]
    fn test_parse_field_reducer() {
        let spec: FieldReducer = "pop:sum".parse().unwrap();
        assert_eq!(spec, FieldReducer::new("pop", Reducer::Sum));
        assert_eq!(spec.output_name(), "pop");

        let aliased: FieldReducer = "pop:mean:avg_pop".parse().unwrap();
        assert_eq!(aliased.output_name(), "avg_pop");

        assert!("pop".parse::<FieldReducer>().is_err());
        assert!("pop:median".parse::<FieldReducer>().is_err());
        assert!(":sum".parse::<FieldReducer>().is_err());
    }

    #[test]
    fn test_join_mode_parse() {
        assert_eq!("LEFT".parse::<JoinMode>().unwrap(), JoinMode::Left);
        assert_eq!("inner".parse::<JoinMode>().unwrap(), JoinMode::Inner);
        assert!("outer".parse::<JoinMode>().is_err());
    }

    #[test]
    fn test_options_from_config() {
        let mut config = LayeredConfig::with_defaults();
        config.update_from_cli(areal_core::config::CliConfigOverrides {
            join_suffix: Some("_zone".to_string()),
            execution: Some(ExecutionMode::Parallel),
            threads: Some(3),
            ..Default::default()
        });

        let options = OpsOptions::from(&config);
        assert_eq!(options.join_suffix, "_zone");
        assert_eq!(options.execution, ExecutionMode::ParallelWith(3));
        assert_eq!(options.validity, ValidityMode::Strict);
    }
}
