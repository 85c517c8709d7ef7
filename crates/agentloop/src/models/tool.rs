use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The declared type and purpose of one tool parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertySchema {
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
}

impl PropertySchema {
    pub fn string<D: Into<String>>(description: D) -> Self {
        Self {
            kind: "string".to_string(),
            description: description.into(),
        }
    }

    pub fn integer<D: Into<String>>(description: D) -> Self {
        Self {
            kind: "integer".to_string(),
            description: description.into(),
        }
    }
}

/// The parameters a tool accepts. Always an object schema on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSchema {
    pub properties: BTreeMap<String, PropertySchema>,
    pub required: Vec<String>,
}

impl InputSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an optional property
    pub fn property<N: Into<String>>(mut self, name: N, schema: PropertySchema) -> Self {
        self.properties.insert(name.into(), schema);
        self
    }

    /// Declare a property and mark it as required. Repeated names are kept once.
    pub fn required_property<N: Into<String>>(mut self, name: N, schema: PropertySchema) -> Self {
        let name = name.into();
        if !self.required.contains(&name) {
            self.required.push(name.clone());
        }
        self.properties.insert(name, schema);
        self
    }

    /// The declared description of a parameter, if any
    pub fn describe(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(|p| p.description.as_str())
    }
}

/// What the model sees of a tool. Immutable once registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// The name of the tool, unique within a registry
    pub name: String,
    /// A description guiding when and how the model should use the tool
    pub description: String,
    /// Parameters that the tool accepts
    pub input_schema: InputSchema,
}

impl ToolDescriptor {
    pub fn new<N, D>(name: N, description: D, input_schema: InputSchema) -> Self
    where
        N: Into<String>,
        D: Into<String>,
    {
        ToolDescriptor {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }
}
