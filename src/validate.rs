//! Pre-flight validation of request parameters.
//!
//! Each write and search operation has a static [`Schema`] describing its
//! field constraints. Parameters are checked against the schema before any
//! network I/O, so input the remote API would reject never costs a
//! round-trip. Checking stops at the first failing field in
//! schema-declaration order; only that one message is surfaced.

use crate::{Error, Params, Result};
use std::collections::HashMap;
use std::net::IpAddr;

/// The date-time pattern the remote API accepts, e.g. `2024-05-01 13:30:00`.
const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single declarative constraint on one field.
#[derive(Debug, Clone, Copy)]
pub enum Rule {
    /// The field must be present and non-empty.
    Required,
    /// The field must parse as a number.
    Numeric,
    /// The field is free-form text. Parameters are strings by construction,
    /// so this rule constrains nothing; it keeps schemas aligned with the
    /// remote API's documented contracts.
    Str,
    /// The field must be one of the listed values.
    In(&'static [&'static str]),
    /// The field is required exactly when the named other field equals the
    /// sentinel value.
    RequiredIf(&'static str, &'static str),
    /// The field must be a valid IPv4 or IPv6 address.
    Ip,
    /// The field must match `YYYY-MM-DD HH:MM:SS`.
    DateTime,
    /// The field must satisfy the named custom format from the
    /// [`FormatRegistry`].
    Format(&'static str),
}

/// Named custom format checks, e.g. `csv_numeric` for batch filter fields
/// like `forums=1,2,3`.
///
/// The registry ships with `csv_numeric` and `csv_alphanumeric`. New
/// formats are registered once at client construction via
/// [`ClientBuilder::format`](crate::ClientBuilder::format); schemas
/// reference them by name with [`Rule::Format`].
#[derive(Debug, Clone)]
pub struct FormatRegistry {
    checks: HashMap<&'static str, fn(&str) -> bool>,
}

impl Default for FormatRegistry {
    fn default() -> Self {
        let mut registry = Self {
            checks: HashMap::new(),
        };
        registry.register("csv_numeric", is_csv_numeric);
        registry.register("csv_alphanumeric", is_csv_alphanumeric);
        registry
    }
}

impl FormatRegistry {
    /// Registers a custom format check under a name, replacing any existing
    /// check with that name.
    pub fn register(&mut self, name: &'static str, check: fn(&str) -> bool) {
        self.checks.insert(name, check);
    }

    fn get(&self, name: &str) -> Option<fn(&str) -> bool> {
        self.checks.get(name).copied()
    }
}

fn is_csv_numeric(value: &str) -> bool {
    !value.is_empty()
        && value
            .split(',')
            .all(|token| !token.is_empty() && token.chars().all(|c| c.is_ascii_digit()))
}

fn is_csv_alphanumeric(value: &str) -> bool {
    !value.is_empty()
        && value
            .split(',')
            .all(|token| !token.is_empty() && token.chars().all(|c| c.is_ascii_alphanumeric()))
}

/// An ordered set of per-field constraints for one operation.
///
/// Schemas are static: defined once per operation and reused across calls.
/// Field declaration order decides which violation is reported when several
/// fields are invalid.
///
/// # Examples
///
/// ```
/// use ipboard::{FormatRegistry, Params, Rule, Schema};
///
/// let schema = Schema::new()
///     .field("topic", &[Rule::Required, Rule::Numeric])
///     .field("hidden", &[Rule::In(&["-1", "0", "1"])]);
///
/// let params = Params::new().set("topic", "42");
/// assert!(schema.check(&params, &FormatRegistry::default()).is_ok());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<(&'static str, &'static [Rule])>,
}

impl Schema {
    /// Creates an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares the rules for a field. Declaration order is significant.
    pub fn field(mut self, name: &'static str, rules: &'static [Rule]) -> Self {
        self.fields.push((name, rules));
        self
    }

    /// Checks `params` against the schema.
    ///
    /// Returns `Ok(())` when every rule holds, or
    /// [`Error::Validation`] carrying the first violation message.
    /// Rules other than `Required`/`RequiredIf` are skipped for absent
    /// fields.
    pub fn check(&self, params: &Params, formats: &FormatRegistry) -> Result<()> {
        for (field, rules) in &self.fields {
            for rule in *rules {
                if let Some(message) = violation(field, rule, params, formats)? {
                    return Err(Error::Validation(message));
                }
            }
        }
        Ok(())
    }
}

fn violation(
    field: &str,
    rule: &Rule,
    params: &Params,
    formats: &FormatRegistry,
) -> Result<Option<String>> {
    // Empty strings count as absent, as the remote API treats them.
    let value = params.get(field).filter(|v| !v.is_empty());

    let message = match rule {
        Rule::Required => value
            .is_none()
            .then(|| format!("The {field} field is required.")),
        Rule::RequiredIf(other, sentinel) => {
            (params.get(other) == Some(*sentinel) && value.is_none())
                .then(|| format!("The {field} field is required when {other} is {sentinel}."))
        }
        _ => match value {
            None => None,
            Some(value) => match rule {
                Rule::Numeric => {
                    // f64 parsing admits "NaN" and "inf"; the remote API
                    // only accepts finite numbers.
                    let numeric = value.parse::<f64>().map(f64::is_finite).unwrap_or(false);
                    (!numeric).then(|| format!("The {field} field must be numeric."))
                }
                Rule::Str => None,
                Rule::In(options) => (!options.contains(&value)).then(|| {
                    format!("The {field} field must be one of {}.", options.join(", "))
                }),
                Rule::Ip => value
                    .parse::<IpAddr>()
                    .is_err()
                    .then(|| format!("The {field} field must be a valid IP address.")),
                Rule::DateTime => chrono::NaiveDateTime::parse_from_str(value, DATE_TIME_FORMAT)
                    .is_err()
                    .then(|| {
                        format!("The {field} field must match the format YYYY-MM-DD HH:MM:SS.")
                    }),
                Rule::Format(name) => {
                    let check = formats.get(name).ok_or_else(|| {
                        Error::Configuration(format!("unknown format rule `{name}`"))
                    })?;
                    (!check(value)).then(|| format_message(field, name))
                }
                Rule::Required | Rule::RequiredIf(..) => None,
            },
        },
    };

    Ok(message)
}

fn format_message(field: &str, format: &str) -> String {
    match format {
        "csv_numeric" => format!("The {field} field must be a comma separated string of IDs."),
        "csv_alphanumeric" => format!("The {field} field must be a comma separated string."),
        _ => format!("The {field} field is not a valid {format}."),
    }
}

/// The shared schema for the posts and topics search listings.
pub(crate) fn search_listing() -> &'static Schema {
    static SCHEMA: std::sync::LazyLock<Schema> = std::sync::LazyLock::new(|| {
        Schema::new()
            .field("forums", &[Rule::Str, Rule::Format("csv_numeric")])
            .field("authors", &[Rule::Str, Rule::Format("csv_numeric")])
            .field("hasBestAnswer", &[Rule::In(&["1", "0"])])
            .field("hasPoll", &[Rule::In(&["1", "0"])])
            .field("locked", &[Rule::In(&["1", "0"])])
            .field("hidden", &[Rule::In(&["1", "0"])])
            .field("pinned", &[Rule::In(&["1", "0"])])
            .field("featured", &[Rule::In(&["1", "0"])])
            .field("archived", &[Rule::In(&["1", "0"])])
            .field("sortBy", &[Rule::In(&["id", "date", "title"])])
            .field("sortDir", &[Rule::In(&["asc", "desc"])])
    });
    &SCHEMA
}
