//! Scenario B (projected round-trip) and Scenario C (independently repeated
//! rejection) from the accompanying design doc.

use dremel_columnar::assembly::assemble_records;
use dremel_columnar::error::DremelError;
use dremel_columnar::record::DynamicRecordFactory;
use dremel_columnar::scan::scan;

use super::{build_storage, document_schema, r1, r2};

const PROJECTION: [&str; 3] = ["doc_id", "links.backward", "name.language.code"];

#[test]
fn projected_assembly_keeps_doc_id_and_surviving_subtrees() {
    let storage = build_storage(document_schema(), &[r1(), r2()], Some(&PROJECTION));
    let factory = DynamicRecordFactory;
    let records = assemble_records(&storage, Some(&PROJECTION), &factory).unwrap();

    assert_eq!(records.len(), 2);

    assert_eq!(records[0].scalar("doc_id"), Some(&dremel_columnar::record::Value::Int64(10)));
    assert_eq!(records[1].scalar("doc_id"), Some(&dremel_columnar::record::Value::Int64(20)));

    // `links.forward`, `name.url` and `name.language.country` are absent:
    // they weren't in the projection, so the writer never emitted them and
    // the builder never materializes their slots.
    let r1_links = records[0].message("links").expect("links.backward survived, so links itself does");
    assert!(r1_links.scalar_repeated("backward").is_empty());
    assert!(r1_links.scalar_repeated("forward").is_empty());

    let r2_links = records[1].message("links").unwrap();
    assert_eq!(
        r2_links.scalar_repeated("backward"),
        &[dremel_columnar::record::Value::Int64(10), dremel_columnar::record::Value::Int64(30)]
    );

    // `name` (and `name.language`) still materialize, shaped by whichever
    // `language.code` occurrences survived, with no `url` slot.
    let r1_names = records[0].message_repeated("name");
    assert_eq!(r1_names.len(), 3);
    assert!(r1_names[0].scalar("url").is_none());
    let r1_name0_langs = r1_names[0].message_repeated("language");
    assert_eq!(r1_name0_langs.len(), 2);
    assert_eq!(
        r1_name0_langs[0].scalar("code"),
        Some(&dremel_columnar::record::Value::Str("en-us".to_string()))
    );
    assert!(r1_name0_langs[0].scalar("country").is_none());
}

#[test]
fn assembly_accepts_independently_repeated_leaves_that_scan_rejects() {
    // `name.url` and `links.backward` are independently repeated (§4.2): no
    // shared repeated ancestor, so a flat tuple-per-row scan can't align
    // them unambiguously (see `scanning_independently_repeated_leaves_is_rejected`
    // below). Tree assembly has no such issue — `name` keeps its own list,
    // `links` keeps its own — so the same pair assembles cleanly.
    let projection = ["name.url", "links.backward"];
    let storage = build_storage(document_schema(), &[r1(), r2()], None);
    let factory = DynamicRecordFactory;
    let records = assemble_records(&storage, Some(&projection), &factory).unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].message_repeated("name").len(), 3);
    assert!(records[0].message("links").unwrap().scalar_repeated("backward").is_empty());
    assert_eq!(
        records[1].message("links").unwrap().scalar_repeated("backward"),
        &[dremel_columnar::record::Value::Int64(10), dremel_columnar::record::Value::Int64(30)]
    );
}

#[test]
fn scanning_independently_repeated_leaves_is_rejected() {
    let storage = build_storage(document_schema(), &[r1(), r2()], None);
    let err = scan(&storage, &["name.url", "links.backward"]).unwrap_err();
    assert!(matches!(err, DremelError::IndependentlyRepeated(_)));
}

#[test]
fn scanning_an_unknown_field_is_rejected() {
    let storage = build_storage(document_schema(), &[r1(), r2()], None);
    let err = scan(&storage, &["not.a.field"]).unwrap_err();
    assert!(matches!(err, DremelError::UnknownField(_)));
}
