use camino::Utf8Path;

use hmdb_rdf::chemont::ChemontLookup;
use hmdb_rdf::domain::ChemontId;
use hmdb_rdf::fs_util;

#[test]
fn fixture_lookup() {
    let lookup = fs_util::load_chemont(Utf8Path::new("tests/fixtures/chemont.obo")).unwrap();
    assert_eq!(lookup.len(), 2);
    assert_eq!(
        lookup.resolve("Organic compounds").map(ChemontId::as_str),
        Some("C0000000")
    );
    assert_eq!(
        lookup.resolve("Histidine and derivatives").map(ChemontId::as_str),
        Some("C0000013")
    );
    assert!(lookup.resolve("part of").is_none());
}

#[test]
fn name_without_preceding_id_is_ignored() {
    let obo = "[Term]\nname: Orphan\nid: CHEMONTID:0000123\nname: Carboxylic acids\r\n";
    let lookup = ChemontLookup::from_reader(obo.as_bytes()).unwrap();
    assert!(lookup.resolve("Orphan").is_none());
    assert_eq!(
        lookup.resolve("Carboxylic acids").map(ChemontId::as_str),
        Some("C0000123")
    );
}

#[test]
fn later_duplicate_label_wins() {
    let obo = "[Term]\nid: CHEMONTID:0000001\nname: Lipids\n\n[Term]\nid: CHEMONTID:0000002\nname: Lipids\n";
    let lookup = ChemontLookup::from_reader(obo.as_bytes()).unwrap();
    assert_eq!(lookup.len(), 1);
    assert_eq!(
        lookup.resolve("Lipids").map(ChemontId::as_str),
        Some("C0000002")
    );
}
