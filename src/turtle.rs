use std::io::Write;

use crate::error::HmdbError;

pub const PREFIXES: &[(&str, &str)] = &[
    ("", "https://hmdb.ca/metabolites/"),
    ("ont", "http://purl.jp/hmdb/ontology/"),
    ("m2r", "http://med2rdf.org/ontology/med2rdf#"),
    ("rdfs", "http://www.w3.org/2000/01/rdf-schema#"),
    ("dct", "http://purl.org/dc/terms/"),
    ("identifiers", "http://identifiers.org/"),
    ("skos", "http://www.w3.org/2004/02/skos/core#"),
    ("obo", "http://purl.obolibrary.org/obo/"),
    ("taxon", "http://identifiers.org/taxonomy/"),
    ("sio", "http://semanticscience.org/resource/"),
    ("up", "http://purl.uniprot.org/uniprot/"),
    ("xsd", "http://www.w3.org/2001/XMLSchema#"),
    ("pubmed", "http://rdf.ncbi.nlm.nih.gov/pubmed/"),
    ("chemont", "http://classyfire.wishartlab.com/tax_nodes/"),
];

/// One output statement. Tokens are already formatted Turtle terms.
///
/// Blank-node blocks are spelled as `BlockOpen`, any number of
/// `BlockFragment`s, then `BlockClose`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Simple {
        subject: String,
        predicate: String,
        object: String,
    },
    BlockOpen {
        subject: String,
        predicate: String,
    },
    BlockFragment {
        predicate: String,
        object: String,
    },
    BlockClose,
}

impl Statement {
    pub fn simple(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Statement::Simple {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }

    pub fn block_open(subject: impl Into<String>, predicate: impl Into<String>) -> Self {
        Statement::BlockOpen {
            subject: subject.into(),
            predicate: predicate.into(),
        }
    }

    pub fn fragment(predicate: impl Into<String>, object: impl Into<String>) -> Self {
        Statement::BlockFragment {
            predicate: predicate.into(),
            object: object.into(),
        }
    }
}

pub trait StatementSink {
    fn emit(&mut self, statement: &Statement) -> Result<(), HmdbError>;
}

impl StatementSink for Vec<Statement> {
    fn emit(&mut self, statement: &Statement) -> Result<(), HmdbError> {
        self.push(statement.clone());
        Ok(())
    }
}

pub struct TurtleWriter<W: Write> {
    out: W,
}

impl<W: Write> TurtleWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn write_prefixes(&mut self) -> Result<(), HmdbError> {
        for (prefix, iri) in PREFIXES {
            writeln!(self.out, "@prefix {prefix}: <{iri}> .").map_err(output_error)?;
        }
        writeln!(self.out).map_err(output_error)
    }

    pub fn flush(&mut self) -> Result<(), HmdbError> {
        self.out.flush().map_err(output_error)
    }
}

impl<W: Write> StatementSink for TurtleWriter<W> {
    fn emit(&mut self, statement: &Statement) -> Result<(), HmdbError> {
        match statement {
            Statement::Simple {
                subject,
                predicate,
                object,
            } => writeln!(self.out, "{subject} {predicate} {object} ."),
            Statement::BlockOpen { subject, predicate } => {
                writeln!(self.out, "{subject} {predicate} [")
            }
            Statement::BlockFragment { predicate, object } => {
                writeln!(self.out, "{predicate} {object} ;")
            }
            Statement::BlockClose => writeln!(self.out, "] ."),
        }
        .map_err(output_error)
    }
}

fn output_error(err: std::io::Error) -> HmdbError {
    HmdbError::Output(err.to_string())
}

fn escape_into(buf: &mut String, value: &str) {
    for ch in value.chars() {
        match ch {
            '\\' => buf.push_str("\\\\"),
            '"' => buf.push_str("\\\""),
            '\n' => buf.push_str("\\n"),
            '\r' => buf.push_str("\\r"),
            '\t' => buf.push_str("\\t"),
            _ => buf.push(ch),
        }
    }
}

/// `"value"`
pub fn literal(value: &str) -> String {
    let mut buf = String::with_capacity(value.len() + 2);
    buf.push('"');
    escape_into(&mut buf, value);
    buf.push('"');
    buf
}

/// `"value"@en`
pub fn english(value: &str) -> String {
    let mut buf = literal(value);
    buf.push_str("@en");
    buf
}

/// `"""value"""@en`, keeps line breaks.
pub fn long_english(value: &str) -> String {
    let mut buf = String::with_capacity(value.len() + 9);
    buf.push_str("\"\"\"");
    for ch in value.chars() {
        match ch {
            '\\' => buf.push_str("\\\\"),
            '"' => buf.push_str("\\\""),
            _ => buf.push(ch),
        }
    }
    buf.push_str("\"\"\"@en");
    buf
}

/// `"value"^^xsd:date`
pub fn date(value: &str) -> String {
    let mut buf = literal(value);
    buf.push_str("^^xsd:date");
    buf
}

/// Prefixed name with Turtle reserved characters escaped in the local part.
pub fn prefixed(prefix: &str, local: &str) -> String {
    let mut buf = String::with_capacity(prefix.len() + local.len() + 1);
    buf.push_str(prefix);
    buf.push(':');
    for ch in local.chars() {
        match ch {
            '~' | '.' | '!' | '$' | '&' | '\'' | '(' | ')' | '*' | '+' | ',' | ';' | '='
            | '/' | '?' | '#' | '@' | '%' => {
                buf.push('\\');
                buf.push(ch);
            }
            _ => buf.push(ch),
        }
    }
    buf
}
