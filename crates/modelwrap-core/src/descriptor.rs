//! Plain-mapping representation of a component's constructor arguments.

use crate::error::DescriptorError;
use serde::{Deserialize, Serialize};
use toml::{Table, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentDescriptor {
    #[serde(rename = "type")]
    pub type_name: String,

    #[serde(default)]
    pub init_parameters: Table,
}

impl ComponentDescriptor {
    pub fn new(type_name: impl Into<String>, init_parameters: Table) -> Self {
        Self {
            type_name: type_name.into(),
            init_parameters,
        }
    }

    pub fn to_toml_string(&self) -> Result<String, DescriptorError> {
        Ok(toml::to_string(self)?)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, DescriptorError> {
        Ok(toml::from_str(s)?)
    }

    pub fn expect_type(&self, expected: &str) -> Result<(), DescriptorError> {
        if self.type_name == expected {
            Ok(())
        } else {
            Err(DescriptorError::TypeMismatch {
                expected: expected.to_string(),
                found: self.type_name.clone(),
            })
        }
    }

    pub fn str_param(&self, name: &str) -> Result<&str, DescriptorError> {
        self.optional_str_param(name)?
            .ok_or_else(|| DescriptorError::MissingParameter(name.to_string()))
    }

    pub fn optional_str_param(&self, name: &str) -> Result<Option<&str>, DescriptorError> {
        match self.init_parameters.get(name) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(_) => Err(DescriptorError::InvalidParameter {
                name: name.to_string(),
                expected: "a string",
            }),
        }
    }

    /// Table parameter; absent means empty.
    pub fn table_param(&self, name: &str) -> Result<Table, DescriptorError> {
        match self.init_parameters.get(name) {
            None => Ok(Table::new()),
            Some(Value::Table(t)) => Ok(t.clone()),
            Some(_) => Err(DescriptorError::InvalidParameter {
                name: name.to_string(),
                expected: "a table",
            }),
        }
    }
}

/// Components that can be persisted as a [`ComponentDescriptor`] and rebuilt.
///
/// Rebuilding needs a `Registry` to turn the stored backend name back into a
/// backend instance. A round trip yields the same constructor arguments; a
/// rebuilt component starts unloaded.
pub trait Describe: Sized {
    const TYPE_NAME: &'static str;
    type Registry;

    fn to_descriptor(&self) -> ComponentDescriptor;

    fn from_descriptor(
        descriptor: &ComponentDescriptor,
        registry: &Self::Registry,
    ) -> Result<Self, DescriptorError>;
}
