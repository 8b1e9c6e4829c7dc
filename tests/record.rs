use std::fs;

use assert_matches::assert_matches;
use roxmltree::Document;

use hmdb_rdf::chemont::ChemontLookup;
use hmdb_rdf::domain::ChemontId;
use hmdb_rdf::error::HmdbError;
use hmdb_rdf::record::{ExtractedRecord, ExtractionWarning, RecordStream};
use hmdb_rdf::turtle::Statement;

fn lookup() -> ChemontLookup {
    ChemontLookup::from_pairs([(
        "Histidine and derivatives",
        "CHEMONTID:0000013".parse::<ChemontId>().unwrap(),
    )])
}

fn extract_all(xml: &str, lookup: Option<&ChemontLookup>) -> Vec<ExtractedRecord> {
    let doc = Document::parse(xml).unwrap();
    RecordStream::new(&doc)
        .map(|record| record.extract(lookup).unwrap())
        .collect()
}

fn objects<'a>(record: &'a ExtractedRecord, wanted: &str) -> Vec<&'a str> {
    record
        .statements
        .iter()
        .filter_map(|statement| match statement {
            Statement::Simple {
                predicate, object, ..
            } if predicate == wanted => Some(object.as_str()),
            _ => None,
        })
        .collect()
}

fn minimal(body: &str) -> String {
    format!(
        "<hmdb><metabolite>\
         <accession>HMDB0000123</accession><version>5.0</version><status>detected</status>\
         <creation_date>2014-03-11T00:00:00Z</creation_date><update_date>2014-03-12</update_date>\
         <secondary_accessions/><name>Glycine</name><description>Amino acid.</description>\
         <synonyms/>{body}</metabolite></hmdb>"
    )
}

#[test]
fn fixture_record_statements_in_order() {
    let xml = fs::read_to_string("tests/fixtures/metabolites.xml").unwrap();
    let lookup = lookup();
    let records = extract_all(&xml, Some(&lookup));
    assert_eq!(records.len(), 2);

    let first = &records[0];
    assert_eq!(first.accession.as_str(), "HMDB0000001");
    assert!(first.warnings.is_empty());

    let predicates: Vec<&str> = first
        .statements
        .iter()
        .take(12)
        .map(|statement| match statement {
            Statement::Simple { predicate, .. } => predicate.as_str(),
            other => panic!("unexpected statement {other:?}"),
        })
        .collect();
    assert_eq!(
        predicates,
        [
            "dct:identifier",
            "ont:version",
            "ont:status",
            "dct:created",
            "dct:modified",
            "ont:secondary_accession",
            "ont:secondary_accession",
            "rdfs:label",
            "skos:description",
            "skos:altLabel",
            "skos:altLabel",
            "a",
        ]
    );
    assert_eq!(
        first.statements[0],
        Statement::simple(":HMDB0000001", "dct:identifier", "\"HMDB0000001\"")
    );
    assert_eq!(objects(first, "dct:created"), ["\"2005-11-16\"^^xsd:date"]);
    assert_eq!(objects(first, "dct:modified"), ["\"2021-09-14\"^^xsd:date"]);
    assert_eq!(
        objects(first, "ont:secondary_accession"),
        ["\"HMDB00001\"", "\"HMDB0004935\""]
    );
    assert_eq!(objects(first, "rdfs:label"), ["\"1-Methylhistidine\""]);
    assert_eq!(
        objects(first, "skos:description"),
        ["\"\"\"1-Methylhistidine, also known as \\\"1-MHis\\\", is a product of anserine.\"\"\"@en"]
    );
    assert_eq!(
        objects(first, "skos:altLabel"),
        ["\"1 Methylhistidine\"@en", "\"Pi-methylhistidine\"@en"]
    );
    assert_eq!(objects(first, "a"), ["chemont:C0000013"]);
}

#[test]
fn fixture_concentration_block() {
    let xml = fs::read_to_string("tests/fixtures/metabolites.xml").unwrap();
    let records = extract_all(&xml, None);
    let block = &records[0].statements[11..];

    assert_eq!(
        block,
        [
            Statement::block_open(":HMDB0000001", "ont:concentration"),
            Statement::fragment("ont:biospecimen", "\"Blood\""),
            Statement::fragment("ont:concentration_value", "\"9.8 +/- 3.6\""),
            Statement::fragment("ont:concentration_units", "\"uM\""),
            Statement::fragment("ont:subject_age", "\"Adult (>18 years old)\""),
            Statement::fragment("ont:subject_sex", "\"Both\""),
            Statement::fragment("ont:subject_condition", "\"Normal\""),
            Statement::fragment("dct:references", "pubmed:17202168"),
            Statement::BlockClose,
        ]
    );
}

#[test]
fn concentration_with_two_fields() {
    let xml = minimal(
        "<normal_concentrations><concentration>\
         <biospecimen>Urine</biospecimen><concentration_value>12</concentration_value>\
         <references><reference><reference_text>none</reference_text></reference></references>\
         </concentration></normal_concentrations>",
    );
    let records = extract_all(&xml, None);
    let statements = &records[0].statements;
    let start = statements
        .iter()
        .position(|statement| matches!(statement, Statement::BlockOpen { .. }))
        .unwrap();

    assert_eq!(
        statements[start..],
        [
            Statement::block_open(":HMDB0000123", "ont:concentration"),
            Statement::fragment("ont:biospecimen", "\"Urine\""),
            Statement::fragment("ont:concentration_value", "\"12\""),
            Statement::BlockClose,
        ]
    );
}

#[test]
fn unresolved_classification_emits_empty_object() {
    let xml = minimal("<taxonomy><direct_parent>Carboxylic acids</direct_parent></taxonomy>");
    let lookup = lookup();
    let records = extract_all(&xml, Some(&lookup));

    assert_eq!(objects(&records[0], "a"), ["chemont:"]);
    assert_eq!(
        records[0].warnings,
        [ExtractionWarning::UnresolvedClassification {
            label: "Carboxylic acids".to_string()
        }]
    );
}

#[test]
fn classification_skipped_without_lookup() {
    let xml = minimal("<taxonomy><direct_parent>Carboxylic acids</direct_parent></taxonomy>");
    let records = extract_all(&xml, None);
    assert!(objects(&records[0], "a").is_empty());
    assert!(records[0].warnings.is_empty());
}

#[test]
fn malformed_date_passes_through_with_warning() {
    let xml = fs::read_to_string("tests/fixtures/metabolites.xml").unwrap();
    let records = extract_all(&xml, None);
    let second = &records[1];

    assert_eq!(objects(second, "dct:created"), ["\"unspecified\"^^xsd:date"]);
    assert_eq!(
        second.warnings,
        [ExtractionWarning::MalformedDate {
            field: "creation_date",
            value: "unspecified".to_string()
        }]
    );
    assert!(objects(second, "ont:secondary_accession").is_empty());
    assert!(objects(second, "skos:altLabel").is_empty());
}

#[test]
fn missing_mandatory_field_names_record() {
    let xml = "<hmdb><metabolite><accession>HMDB0000042</accession><version>5.0</version>\
               <status>quantified</status><creation_date>2014-03-11</creation_date>\
               <update_date>2014-03-11</update_date><secondary_accessions/>\
               <description>d</description><synonyms/></metabolite></hmdb>";
    let doc = Document::parse(xml).unwrap();
    let record = RecordStream::new(&doc).next().unwrap();
    let err = record.extract(None).unwrap_err();

    assert_matches!(
        &err,
        HmdbError::MissingField { field, accession: Some(acc) }
            if field == "name" && acc == "HMDB0000042"
    );
    assert_eq!(
        err.to_string(),
        "record HMDB0000042: missing mandatory field `name`"
    );
}
