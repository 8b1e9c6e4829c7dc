pub mod app;
pub mod chemont;
pub mod config;
pub mod domain;
pub mod error;
pub mod fs_util;
pub mod ontology;
pub mod output;
pub mod record;
pub mod turtle;
