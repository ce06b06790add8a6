use crate::builder::AUTHOR_RESOURCE_TYPES;

#[derive(Debug, thiserror::Error)]
pub enum RulerError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error(
        "invalid author reference '{0}': must start with one of {types}",
        types = AUTHOR_RESOURCE_TYPES.join(", ")
    )]
    InvalidAuthor(String),
    #[error("type must carry exactly one coding, found {0}")]
    TypeCodingCount(usize),
    #[error("invalid resource id '{0}'")]
    InvalidId(String),

    #[error("FHIR error: {0}")]
    Fhir(#[from] fhir::FhirError),

    #[error("failed to read config file: {0}")]
    ConfigRead(std::io::Error),
    #[error("invalid config: {0}")]
    Config(String),
}

pub type RulerResult<T> = std::result::Result<T, RulerError>;
