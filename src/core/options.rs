//! Build options
//!
//! CMake cache variables passed to the configure step as `-D<name>=<value>`.
//! Options keep their insertion order so generated commands are
//! deterministic. Names and values are validated only for characters that
//! would break command-line quoting; any variable name is accepted.

use crate::error::OptionError;

/// Characters rejected in option values
///
/// A manifest must render the same under `sh` and `cmd`; these end a
/// double-quoted argument or are expanded inside one (`%VAR%` by `cmd`).
pub const UNSAFE_CHARACTERS: &[char] = &['"', '`', '$', '\\', '%'];

/// Ordered option map
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildOptions {
    entries: Vec<(String, String)>,
}

impl BuildOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an option
    ///
    /// Setting an existing name replaces its value without changing its
    /// position.
    pub fn set(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), OptionError> {
        let name = name.into();
        let value = value.into();
        validate_name(&name)?;
        validate_value(&name, &value)?;

        if let Some(entry) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            entry.1 = value;
        } else {
            self.entries.push((name, value));
        }
        Ok(())
    }

    /// Look up an option value
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Options in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Flatten into `-D<name>=<value>` arguments
    pub fn to_defines(&self) -> Vec<String> {
        self.iter()
            .map(|(name, value)| format!("-D{name}={value}"))
            .collect()
    }

    /// Build options from a manifest table
    ///
    /// Strings are taken verbatim, booleans become `ON`/`OFF` and numbers
    /// their decimal form. Arrays, tables and datetimes are rejected.
    pub fn from_table(table: &toml::Table) -> Result<Self, OptionError> {
        let mut options = Self::new();
        for (name, value) in table {
            options.set(name.as_str(), option_value_string(name, value)?)?;
        }
        Ok(options)
    }
}

/// Convert a manifest value to its command-line form
pub fn option_value_string(name: &str, value: &toml::Value) -> Result<String, OptionError> {
    match value {
        toml::Value::String(s) => Ok(s.clone()),
        toml::Value::Boolean(true) => Ok("ON".to_string()),
        toml::Value::Boolean(false) => Ok("OFF".to_string()),
        toml::Value::Integer(i) => Ok(i.to_string()),
        toml::Value::Float(f) => Ok(f.to_string()),
        other => Err(OptionError::UnsupportedValue {
            name: name.to_string(),
            kind: other.type_str().to_string(),
        }),
    }
}

/// Validate an option name
///
/// The name may carry a CMake type suffix (`NAME:BOOL`), but cannot be empty
/// or contain `=`, whitespace, control characters or unsafe characters.
pub fn validate_name(name: &str) -> Result<(), OptionError> {
    if name.is_empty() {
        return Err(OptionError::EmptyName);
    }
    if let Some(character) = name
        .chars()
        .find(|c| *c == '=' || c.is_whitespace() || c.is_control() || UNSAFE_CHARACTERS.contains(c))
    {
        return Err(OptionError::InvalidName {
            name: name.to_string(),
            character,
        });
    }
    Ok(())
}

/// Validate an option value
///
/// Spaces are allowed; the value is quoted when rendered.
pub fn validate_value(name: &str, value: &str) -> Result<(), OptionError> {
    if let Some(character) = value
        .chars()
        .find(|c| c.is_control() || UNSAFE_CHARACTERS.contains(c))
    {
        return Err(OptionError::UnsafeValue {
            name: name.to_string(),
            value: value.to_string(),
            character,
        });
    }
    Ok(())
}
