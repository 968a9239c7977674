//! Scenario A (column-triple shape) and Scenario D (empty repeated vs
//! absent message) from the accompanying design doc: shred the paper's two
//! documents and check every leaf column against the tabulated triples.

use dremel_columnar::record::{DynamicRecord, Record, Value};

use super::{build_storage, document_schema, r1, r2, read_all_triples};

fn int(v: i64) -> Option<Value> {
    Some(Value::Int64(v))
}

fn s(v: &str) -> Option<Value> {
    Some(Value::Str(v.to_string()))
}

#[test]
fn doc_id_column_has_one_triple_per_record_at_r_zero() {
    let storage = build_storage(document_schema(), &[r1(), r2()], None);
    assert_eq!(
        read_all_triples(&storage, "doc_id"),
        vec![(0, 0, int(10)), (0, 0, int(20))]
    );
}

#[test]
fn name_url_column_matches_the_paper_tabulation() {
    let storage = build_storage(document_schema(), &[r1(), r2()], None);
    assert_eq!(
        read_all_triples(&storage, "name.url"),
        vec![
            (0, 2, s("http://A")),
            (1, 2, s("http://B")),
            (1, 1, None),
            (0, 2, s("http://C")),
        ]
    );
}

#[test]
fn links_forward_column_matches_the_paper_tabulation() {
    let storage = build_storage(document_schema(), &[r1(), r2()], None);
    assert_eq!(
        read_all_triples(&storage, "links.forward"),
        vec![(0, 2, int(20)), (1, 2, int(40)), (1, 2, int(60)), (0, 2, int(80))]
    );
}

#[test]
fn links_backward_column_matches_the_paper_tabulation() {
    let storage = build_storage(document_schema(), &[r1(), r2()], None);
    assert_eq!(
        read_all_triples(&storage, "links.backward"),
        vec![(0, 1, None), (0, 2, int(10)), (1, 2, int(30))]
    );
}

#[test]
fn name_language_code_column_matches_the_paper_tabulation() {
    let storage = build_storage(document_schema(), &[r1(), r2()], None);
    assert_eq!(
        read_all_triples(&storage, "name.language.code"),
        vec![
            (0, 2, s("en-us")),
            (2, 2, s("en")),
            (1, 1, None),
            (1, 2, s("en-gb")),
            (0, 1, None),
        ]
    );
}

#[test]
fn name_language_country_column_matches_the_paper_tabulation() {
    let storage = build_storage(document_schema(), &[r1(), r2()], None);
    assert_eq!(
        read_all_triples(&storage, "name.language.country"),
        vec![
            (0, 3, s("us")),
            (2, 2, None),
            (1, 1, None),
            (1, 3, s("gb")),
            (0, 1, None),
        ]
    );
}

#[test]
fn empty_repeated_field_under_a_present_message_nulls_at_depth_one() {
    // `links` present (has `forward`) but `backward` never appended: one
    // placeholder triple at d=1 (the message itself is present, the
    // repeated field within it is empty).
    let storage = build_storage(document_schema(), &[r1()], None);
    assert_eq!(read_all_triples(&storage, "links.backward"), vec![(0, 1, None)]);
}

#[test]
fn absent_optional_message_nulls_its_repeated_descendants_at_depth_zero() {
    let mut rec = DynamicRecord::new();
    rec.set_scalar("doc_id", Value::Int64(99));
    // `links` never touched at all.
    let storage = build_storage(document_schema(), &[rec], None);
    assert_eq!(read_all_triples(&storage, "links.backward"), vec![(0, 0, None)]);
    assert_eq!(read_all_triples(&storage, "links.forward"), vec![(0, 0, None)]);
}
