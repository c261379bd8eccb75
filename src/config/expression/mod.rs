//! Environment expressions embedded in configuration values.
//!
//! A configuration scalar destined for a container's environment is parsed
//! once into an [`EnvironmentExpression`] and evaluated later against a
//! snapshot of the host's environment variables. Supported forms, matched
//! against the whole value in this order:
//!
//! 1. `${NAME:-DEFAULT}`: reference with a fallback (the fallback may be empty)
//! 2. `${NAME}`: reference without a fallback
//! 3. `$NAME`: reference; everything after `$` is the variable name
//! 4. non-empty literal text, where a leading `\$` is unescaped to `$`
//!
//! Evaluation failures are deferred until [`EnvironmentExpression::evaluate`]
//! so that a configuration file can be loaded on a host that lacks some of the
//! referenced variables.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use tracing::debug;

use crate::error::ExpressionError;

const REFERENCE_PREFIX: char = '$';
const BRACED_OPEN: &str = "${";
const BRACED_CLOSE: char = '}';
const DEFAULT_SEPARATOR: &str = ":-";
const ESCAPED_PREFIX: &str = "\\$";

/// A parsed environment value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvironmentExpression {
    /// Text passed to the container verbatim.
    Literal {
        /// The literal value.
        value: String,
    },

    /// A reference to a host environment variable.
    Reference {
        /// The host variable to read.
        name: String,
        /// The value used when the host variable is unset.
        default: Option<String>,
    },
}

/// Attempts to match the whole source text as one expression form.
type Matcher = fn(&str) -> Option<EnvironmentExpression>;

/// Expression forms in priority order. The braced form with a default must be
/// tried before the plain braced form, which must be tried before the bare
/// form.
const PATTERNS: &[(&str, Matcher)] = &[
    ("braced reference with default", match_braced_with_default),
    ("braced reference", match_braced),
    ("bare reference", match_bare),
    ("literal", match_literal),
];

impl EnvironmentExpression {
    /// Creates a literal expression.
    #[must_use]
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal {
            value: value.into(),
        }
    }

    /// Creates a reference expression.
    #[must_use]
    pub fn reference(name: impl Into<String>, default: Option<&str>) -> Self {
        Self::Reference {
            name: name.into(),
            default: default.map(String::from),
        }
    }

    /// Parses configuration text into an expression.
    ///
    /// # Errors
    ///
    /// Returns `ExpressionError::InvalidExpression` when the text matches none
    /// of the supported forms, for example `$` alone or `${FOO`.
    pub fn parse(source: &str) -> Result<Self, ExpressionError> {
        PATTERNS
            .iter()
            .find_map(|(form, matcher)| {
                matcher(source).inspect(|_| debug!(source, form, "parsed environment expression"))
            })
            .ok_or_else(|| ExpressionError::InvalidExpression {
                source_text: String::from(source),
            })
    }

    /// Converts an integer scalar into a literal of its decimal form.
    #[must_use]
    pub fn from_integer(value: i64) -> Self {
        Self::literal(value.to_string())
    }

    /// Evaluates the expression against the host environment.
    ///
    /// # Errors
    ///
    /// Returns `ExpressionError::UnresolvedVariable` when a referenced variable
    /// is unset and the reference carries no default.
    pub fn evaluate<E: mockable::Env>(&self, host: &E) -> Result<String, ExpressionError> {
        match self {
            Self::Literal { value } => Ok(value.clone()),
            Self::Reference { name, default } => host
                .string(name)
                .or_else(|| default.clone())
                .ok_or_else(|| ExpressionError::UnresolvedVariable { name: name.clone() }),
        }
    }
}

fn match_braced_with_default(source: &str) -> Option<EnvironmentExpression> {
    let inner = source
        .strip_prefix(BRACED_OPEN)?
        .strip_suffix(BRACED_CLOSE)?;
    // The name takes everything up to the last separator.
    let (name, default) = inner.rsplit_once(DEFAULT_SEPARATOR)?;
    if name.is_empty() {
        return None;
    }
    Some(EnvironmentExpression::reference(name, Some(default)))
}

fn match_braced(source: &str) -> Option<EnvironmentExpression> {
    let name = source
        .strip_prefix(BRACED_OPEN)?
        .strip_suffix(BRACED_CLOSE)?;
    if name.is_empty() || name.contains(':') {
        return None;
    }
    Some(EnvironmentExpression::reference(name, None))
}

fn match_bare(source: &str) -> Option<EnvironmentExpression> {
    let name = source.strip_prefix(REFERENCE_PREFIX)?;
    let mut chars = name.chars();
    let first = chars.next()?;
    if first == '{' {
        return None;
    }
    // A multi-character name must not end in a closing brace.
    if chars.next_back().is_some_and(|last| last == BRACED_CLOSE) {
        return None;
    }
    Some(EnvironmentExpression::reference(name, None))
}

fn match_literal(source: &str) -> Option<EnvironmentExpression> {
    if source.is_empty() || source.starts_with(REFERENCE_PREFIX) {
        return None;
    }
    let value = if source.starts_with(ESCAPED_PREFIX) {
        source.get(1..).unwrap_or_default()
    } else {
        source
    };
    Some(EnvironmentExpression::literal(value))
}

impl fmt::Display for EnvironmentExpression {
    /// Writes the expression in the textual form it parses from.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal { value } if value.starts_with(REFERENCE_PREFIX) => write!(f, "\\{value}"),
            Self::Literal { value } => f.write_str(value),
            Self::Reference {
                name,
                default: Some(default),
            } => write!(f, "${{{name}:-{default}}}"),
            Self::Reference {
                name,
                default: None,
            } if is_bare_name(name) => write!(f, "${name}"),
            Self::Reference {
                name,
                default: None,
            } => write!(f, "${{{name}}}"),
        }
    }
}

/// Whether `name` survives being written in the bare `$NAME` form.
fn is_bare_name(name: &str) -> bool {
    !name.is_empty() && !name.starts_with('{') && !name.ends_with(BRACED_CLOSE)
}

impl Serialize for EnvironmentExpression {
    /// Fails for values that no configuration text parses back to, such as
    /// an empty literal or a literal beginning with `\$`.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let text = self.to_string();
        if Self::parse(&text).ok().as_ref() != Some(self) {
            return Err(serde::ser::Error::custom(format!(
                "environment value {self:?} has no configuration text form"
            )));
        }
        serializer.serialize_str(&text)
    }
}

impl<'de> Deserialize<'de> for EnvironmentExpression {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ExpressionVisitor)
    }
}

/// Accepts strings and integers; rejects scalars whose textual form is lost.
struct ExpressionVisitor;

impl Visitor<'_> for ExpressionVisitor {
    type Value = EnvironmentExpression;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a string or integer environment value")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        EnvironmentExpression::parse(value).map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
        Ok(EnvironmentExpression::from_integer(value))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
        Ok(EnvironmentExpression::literal(value.to_string()))
    }

    fn visit_bool<E: de::Error>(self, _value: bool) -> Result<Self::Value, E> {
        Err(E::custom(ExpressionError::ConfigurationType { kind: "boolean" }))
    }

    fn visit_f64<E: de::Error>(self, _value: f64) -> Result<Self::Value, E> {
        Err(E::custom(ExpressionError::ConfigurationType {
            kind: "floating-point number",
        }))
    }
}

/// Evaluates every container variable in `expressions` against `host`.
///
/// Variables are evaluated in name order and the first failure is reported
/// with the container variable's name attached.
///
/// # Errors
///
/// Returns `ExpressionError::ContainerVariable` wrapping the first
/// evaluation failure.
pub fn evaluate_environment<E: mockable::Env>(
    expressions: &BTreeMap<String, EnvironmentExpression>,
    host: &E,
) -> Result<BTreeMap<String, String>, ExpressionError> {
    expressions
        .iter()
        .map(|(variable, expression)| {
            expression
                .evaluate(host)
                .map(|value| (variable.clone(), value))
                .map_err(|error| ExpressionError::ContainerVariable {
                    variable: variable.clone(),
                    source: Box::new(error),
                })
        })
        .collect()
}
