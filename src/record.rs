use std::fmt;

use roxmltree::{Document, Node};

use crate::chemont::ChemontLookup;
use crate::domain::{Accession, DateValue, normalize_date};
use crate::error::HmdbError;
use crate::turtle::{self, Statement};

const CONCENTRATION_FIELDS: &[&str] = &[
    "biospecimen",
    "concentration_value",
    "concentration_units",
    "subject_condition",
    "subject_age",
    "subject_sex",
];

/// Iterates the top-level record elements of an HMDB document.
pub struct RecordStream<'a, 'input> {
    records: roxmltree::Children<'a, 'input>,
}

impl<'a, 'input> RecordStream<'a, 'input> {
    pub fn new(document: &'a Document<'input>) -> Self {
        Self {
            records: document.root_element().children(),
        }
    }
}

impl<'a, 'input> Iterator for RecordStream<'a, 'input> {
    type Item = MetaboliteRecord<'a, 'input>;

    fn next(&mut self) -> Option<Self::Item> {
        self.records
            .by_ref()
            .find(Node::is_element)
            .map(|node| MetaboliteRecord { node })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionWarning {
    UnresolvedClassification { label: String },
    MalformedDate { field: &'static str, value: String },
}

impl fmt::Display for ExtractionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionWarning::UnresolvedClassification { label } => {
                write!(f, "direct parent {label:?} has no ChemOnt identifier")
            }
            ExtractionWarning::MalformedDate { field, value } => {
                write!(f, "{field} {value:?} is not a YYYY-MM-DD date")
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExtractedRecord {
    pub accession: Accession,
    pub statements: Vec<Statement>,
    pub warnings: Vec<ExtractionWarning>,
}

#[derive(Debug, Clone, Copy)]
pub struct MetaboliteRecord<'a, 'input> {
    node: Node<'a, 'input>,
}

impl<'a, 'input> MetaboliteRecord<'a, 'input> {
    pub fn new(node: Node<'a, 'input>) -> Self {
        Self { node }
    }

    pub fn accession(&self) -> Result<Accession, HmdbError> {
        let node = child(self.node, "accession").ok_or_else(|| HmdbError::MissingField {
            field: "accession".to_string(),
            accession: None,
        })?;
        text(node).parse()
    }

    /// The record's classification fragment, folded into the term table.
    pub fn ontology(&self) -> Option<Node<'a, 'input>> {
        child(self.node, "ontology")
    }

    /// Produces the record's statements in output order. Without a lookup
    /// no chemical-classification statement is produced.
    pub fn extract(&self, lookup: Option<&ChemontLookup>) -> Result<ExtractedRecord, HmdbError> {
        let accession = self.accession()?;
        let mut extraction = Extraction {
            node: self.node,
            subject: turtle::prefixed("", accession.as_str()),
            accession,
            statements: Vec::new(),
            warnings: Vec::new(),
        };

        extraction.record_information()?;
        extraction.identification()?;
        if let Some(lookup) = lookup {
            extraction.chemical_taxonomy(lookup);
        }
        extraction.concentrations();

        Ok(ExtractedRecord {
            accession: extraction.accession,
            statements: extraction.statements,
            warnings: extraction.warnings,
        })
    }
}

struct Extraction<'a, 'input> {
    node: Node<'a, 'input>,
    accession: Accession,
    subject: String,
    statements: Vec<Statement>,
    warnings: Vec<ExtractionWarning>,
}

impl<'a, 'input> Extraction<'a, 'input> {
    fn required(&self, field: &str) -> Result<Node<'a, 'input>, HmdbError> {
        child(self.node, field).ok_or_else(|| HmdbError::MissingField {
            field: field.to_string(),
            accession: Some(self.accession.to_string()),
        })
    }

    fn push(&mut self, predicate: &str, object: String) {
        self.statements
            .push(Statement::simple(self.subject.clone(), predicate, object));
    }

    fn record_information(&mut self) -> Result<(), HmdbError> {
        let version = text(self.required("version")?);
        let status = text(self.required("status")?);
        let created = text(self.required("creation_date")?);
        let modified = text(self.required("update_date")?);
        let secondary = self.required("secondary_accessions")?;

        self.push("dct:identifier", turtle::literal(self.accession.as_str()));
        self.push("ont:version", turtle::literal(version));
        self.push("ont:status", turtle::literal(status));
        let created = self.date("creation_date", created);
        self.push("dct:created", turtle::date(created));
        let modified = self.date("update_date", modified);
        self.push("dct:modified", turtle::date(modified));
        for accession in elements(secondary) {
            self.push("ont:secondary_accession", turtle::literal(text(accession)));
        }
        Ok(())
    }

    fn identification(&mut self) -> Result<(), HmdbError> {
        let name = text(self.required("name")?);
        let description = text(self.required("description")?);
        let synonyms = self.required("synonyms")?;

        self.push("rdfs:label", turtle::literal(name));
        self.push("skos:description", turtle::long_english(description));
        for synonym in elements(synonyms) {
            self.push("skos:altLabel", turtle::english(text(synonym)));
        }
        Ok(())
    }

    fn chemical_taxonomy(&mut self, lookup: &ChemontLookup) {
        let Some(label) = child(self.node, "taxonomy")
            .and_then(|taxonomy| child(taxonomy, "direct_parent"))
            .map(text)
            .filter(|label| !label.is_empty())
        else {
            return;
        };
        let object = match lookup.resolve(label) {
            Some(id) => turtle::prefixed("chemont", id.as_str()),
            None => {
                self.warnings.push(ExtractionWarning::UnresolvedClassification {
                    label: label.to_string(),
                });
                "chemont:".to_string()
            }
        };
        self.push("a", object);
    }

    fn concentrations(&mut self) {
        let Some(block) = child(self.node, "normal_concentrations") else {
            return;
        };
        for concentration in elements(block) {
            self.statements.push(Statement::block_open(
                self.subject.clone(),
                "ont:concentration",
            ));
            for field in elements(concentration) {
                let name = field.tag_name().name();
                let value = text(field);
                if CONCENTRATION_FIELDS.contains(&name) && !value.is_empty() {
                    self.statements.push(Statement::fragment(
                        format!("ont:{name}"),
                        turtle::literal(value),
                    ));
                }
            }
            for reference in child(concentration, "references").into_iter().flat_map(elements) {
                let pubmed_id = child(reference, "pubmed_id").map(text).unwrap_or_default();
                if !pubmed_id.is_empty() {
                    self.statements.push(Statement::fragment(
                        "dct:references",
                        turtle::prefixed("pubmed", pubmed_id),
                    ));
                }
            }
            self.statements.push(Statement::BlockClose);
        }
    }

    fn date<'v>(&mut self, field: &'static str, value: &'v str) -> &'v str {
        let normalized = normalize_date(value);
        if let DateValue::PassThrough(raw) = normalized {
            self.warnings.push(ExtractionWarning::MalformedDate {
                field,
                value: raw.to_string(),
            });
        }
        normalized.as_str()
    }
}

pub(crate) fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|n| n.is_element() && n.tag_name().name() == name)
}

pub(crate) fn elements<'a, 'input>(
    node: Node<'a, 'input>,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(Node::is_element)
}

pub(crate) fn text<'a>(node: Node<'a, '_>) -> &'a str {
    node.text().unwrap_or_default()
}
