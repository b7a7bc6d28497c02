use thiserror::Error;

/// Errors raised while reading engine vocabulary from text (CLI flags, replay entries).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown {kind} {value:?}")]
    UnknownName { kind: &'static str, value: String },
    #[error("decision entry {entry:?} is missing its {field}")]
    MissingField { entry: String, field: &'static str },
    #[error("decision entry {entry:?} has an invalid {field}: {value:?}")]
    InvalidField {
        entry: String,
        field: &'static str,
        value: String,
    },
}

impl ParseError {
    pub(crate) fn unknown(kind: &'static str, value: &str) -> Self {
        Self::UnknownName {
            kind,
            value: value.to_string(),
        }
    }
}
