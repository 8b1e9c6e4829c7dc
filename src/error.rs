use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum HmdbError {
    #[error("record {}: missing mandatory field `{field}`", .accession.as_deref().unwrap_or("<unknown>"))]
    MissingField {
        field: String,
        accession: Option<String>,
    },

    #[error("invalid metabolite accession: {0:?}")]
    InvalidAccession(String),

    #[error("invalid ChemOnt identifier: {0}")]
    InvalidChemontId(String),

    #[error("missing required input: {0}")]
    #[diagnostic(help("pass --{0} or set `{0}` in the config file"))]
    MissingInput(String),

    #[error("failed to read config file at {0}")]
    ConfigRead(PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),

    #[error("failed to read {path}: {message}")]
    InputRead { path: String, message: String },

    #[error("malformed XML document: {0}")]
    XmlParse(String),

    #[error("failed to write output: {0}")]
    Output(String),
}
