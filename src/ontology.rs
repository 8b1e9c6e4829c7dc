//! Deduplicated ontology term table.
//!
//! Every HMDB record repeats its own copy of the ontology tree. Folding all of
//! them into one [`TermTable`] keeps the first value seen for each attribute
//! of each term and ignores every later occurrence, so folding the same
//! fragment any number of times yields the same table.

use std::collections::HashMap;

use roxmltree::Node;
use tracing::debug;

use crate::domain::TermKey;
use crate::error::HmdbError;
use crate::record::elements;
use crate::turtle::{self, Statement, StatementSink};

/// Child element kinds of an ontology node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Term,
    Definition,
    ParentId,
    Level,
    Type,
    Synonyms,
    Descendants,
    Unknown,
}

impl FieldKind {
    pub fn from_tag(name: &str) -> Self {
        match name {
            "term" => FieldKind::Term,
            "definition" => FieldKind::Definition,
            "parent_id" => FieldKind::ParentId,
            "level" => FieldKind::Level,
            "type" => FieldKind::Type,
            "synonyms" => FieldKind::Synonyms,
            "descendants" => FieldKind::Descendants,
            _ => FieldKind::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermEntry {
    pub key: TermKey,
    pub label: String,
    pub definition: Option<String>,
    pub external_id: Option<String>,
    pub sub_class_of: Option<TermKey>,
    /// `Some(vec![])` still counts as set: later blocks are ignored.
    pub synonyms: Option<Vec<String>>,
}

impl TermEntry {
    fn new(key: TermKey, label: &str, parent: &TermKey) -> Self {
        Self {
            key,
            label: label.to_string(),
            definition: None,
            external_id: None,
            sub_class_of: Some(parent.clone()),
            synonyms: None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SerializeOptions {
    /// Emit `rdfs:subClassOf ont:root` for top-level terms.
    pub include_root_links: bool,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self {
            include_root_links: true,
        }
    }
}

/// Insertion-ordered map from term key to merged term metadata.
#[derive(Debug, Clone, Default)]
pub struct TermTable {
    entries: Vec<TermEntry>,
    index: HashMap<TermKey, usize>,
}

impl TermTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &TermKey) -> Option<&TermEntry> {
        self.index.get(key).map(|&idx| &self.entries[idx])
    }

    fn get_mut(&mut self, key: &TermKey) -> Option<&mut TermEntry> {
        self.index.get(key).map(|&idx| &mut self.entries[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = &TermEntry> {
        self.entries.iter()
    }

    /// Returns false when the key was already present.
    fn insert_if_absent(&mut self, key: &TermKey, label: &str, parent: &TermKey) -> bool {
        if self.index.contains_key(key) {
            return false;
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push(TermEntry::new(key.clone(), label, parent));
        true
    }

    /// Writes every entry in insertion order and returns the statement count.
    pub fn serialize<S>(&self, sink: &mut S, options: &SerializeOptions) -> Result<usize, HmdbError>
    where
        S: StatementSink + ?Sized,
    {
        let mut count = 0;
        let mut emit = |statement: Statement| -> Result<(), HmdbError> {
            sink.emit(&statement)?;
            count += 1;
            Ok(())
        };

        for entry in &self.entries {
            let subject = turtle::prefixed("ont", entry.key.as_str());
            emit(Statement::simple(
                subject.clone(),
                "rdfs:label",
                turtle::english(&entry.label),
            ))?;
            if let Some(definition) = &entry.definition {
                emit(Statement::simple(
                    subject.clone(),
                    "skos:definition",
                    turtle::english(definition),
                ))?;
            }
            if let Some(id) = &entry.external_id {
                emit(Statement::simple(
                    subject.clone(),
                    "dct:identifier",
                    turtle::literal(id),
                ))?;
            }
            if let Some(parent) = &entry.sub_class_of {
                if options.include_root_links || !parent.is_root() {
                    emit(Statement::simple(
                        subject.clone(),
                        "rdfs:subClassOf",
                        turtle::prefixed("ont", parent.as_str()),
                    ))?;
                }
            }
            for synonym in entry.synonyms.iter().flatten() {
                emit(Statement::simple(
                    subject.clone(),
                    "skos:altLabel",
                    turtle::english(synonym),
                ))?;
            }
        }
        Ok(count)
    }
}

/// Folds a record's `ontology` element: each top-level node hangs off the
/// root sentinel.
pub fn fold_fragment(table: &mut TermTable, fragment: Node<'_, '_>) {
    let root = TermKey::root();
    for node in elements(fragment) {
        fold(table, node, &root);
    }
}

/// Folds one ontology node, and recursively its descendants, into `table`.
pub fn fold(table: &mut TermTable, node: Node<'_, '_>, parent: &TermKey) {
    let mut current: Option<TermKey> = None;

    for field in elements(node) {
        match FieldKind::from_tag(field.tag_name().name()) {
            FieldKind::Term => {
                let Some(label) = field.text() else {
                    continue;
                };
                let key = TermKey::normalize(label);
                if table.insert_if_absent(&key, label, parent) {
                    debug!(term = %key, parent = %parent, "new ontology term");
                }
                current = Some(key);
            }
            FieldKind::Definition => {
                let Some(definition) = field.text() else {
                    continue;
                };
                if let Some(entry) = current.as_ref().and_then(|key| table.get_mut(key)) {
                    entry
                        .definition
                        .get_or_insert_with(|| definition.to_string());
                }
            }
            FieldKind::ParentId => {
                let Some(id) = field.text() else {
                    continue;
                };
                // The id belongs to the enclosing term, not to this node.
                if let Some(entry) = table.get_mut(parent) {
                    entry.external_id.get_or_insert_with(|| id.to_string());
                    entry.sub_class_of.get_or_insert_with(|| parent.clone());
                }
            }
            FieldKind::Synonyms => {
                if !field.has_children() {
                    continue;
                }
                if let Some(entry) = current.as_ref().and_then(|key| table.get_mut(key)) {
                    entry.synonyms.get_or_insert_with(|| {
                        elements(field)
                            .filter_map(|synonym| synonym.text())
                            .map(str::to_string)
                            .collect()
                    });
                }
            }
            FieldKind::Descendants => {
                let Some(key) = current.clone() else {
                    debug!("descendants before any term, skipped");
                    continue;
                };
                for child in elements(field) {
                    fold(table, child, &key);
                }
            }
            FieldKind::Level | FieldKind::Type | FieldKind::Unknown => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use roxmltree::Document;

    use super::*;

    #[test]
    fn field_kind_absorbs_unknown_tags() {
        assert_eq!(FieldKind::from_tag("term"), FieldKind::Term);
        assert_eq!(FieldKind::from_tag("descendants"), FieldKind::Descendants);
        assert_eq!(FieldKind::from_tag("comment"), FieldKind::Unknown);
    }

    #[test]
    fn parent_id_on_top_level_node_is_ignored() {
        let xml = "<ontology><root><term>Disposition</term><parent_id>9</parent_id></root></ontology>";
        let doc = Document::parse(xml).unwrap();
        let mut table = TermTable::new();
        fold_fragment(&mut table, doc.root_element());

        let entry = table.get(&TermKey::normalize("Disposition")).unwrap();
        assert_eq!(entry.external_id, None);
        assert_eq!(entry.sub_class_of, Some(TermKey::root()));
    }
}
