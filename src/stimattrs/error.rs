use thiserror::Error;

#[derive(Error, Debug)]
pub enum StimulusError {
    /// A named-property reference could not be resolved on the component.
    #[error("Unknown property `{name}` on {component}")]
    UnknownProperty {
        component: &'static str,
        name: String,
    },

    #[error("Attribute key resolved to a blank string (key spec: {key})")]
    BlankKey { key: String },

    #[error("Computation failed: {0}")]
    Computation(String),

    #[error("Invalid declaration: {0}")]
    InvalidDeclaration(String),

    #[error("Manifest error: {0}")]
    Manifest(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StimulusError {
    /// Convenience for deferred computations that fail with a message.
    pub fn computation(message: impl Into<String>) -> Self {
        StimulusError::Computation(message.into())
    }
}

pub type Result<T> = std::result::Result<T, StimulusError>;
