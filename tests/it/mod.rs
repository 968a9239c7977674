//! Shared fixtures for the integration tests: the Dremel paper's two-document
//! `Document` schema (doc_id / links.{backward,forward} /
//! name.language.{code,country} / name.url) and its `r1`/`r2` sample records
//! (§8 of the accompanying design doc), plus small helpers the scenario
//! modules build on.

mod assembly;
mod projection;
mod shredding;

use dremel_columnar::column::MemoryFieldStorage;
use dremel_columnar::record::{DynamicRecord, Record, Value};
use dremel_columnar::schema::{FieldDescriptor, FieldGraph, FieldKind, Label, PhysicalType};

/// Builds the `Document` schema graph from the Dremel paper.
pub fn document_schema() -> FieldGraph {
    let descriptors = vec![
        FieldDescriptor::root(),
        FieldDescriptor::new(
            "__root__.doc_id",
            FieldKind::Scalar(PhysicalType::Int64),
            Label::Required,
            0,
            0,
        ),
        FieldDescriptor::new("__root__.links", FieldKind::Group, Label::Optional, 0, 1),
        FieldDescriptor::new(
            "__root__.links.backward",
            FieldKind::Scalar(PhysicalType::Int64),
            Label::Repeated,
            1,
            2,
        ),
        FieldDescriptor::new(
            "__root__.links.forward",
            FieldKind::Scalar(PhysicalType::Int64),
            Label::Repeated,
            1,
            2,
        ),
        FieldDescriptor::new("__root__.name", FieldKind::Group, Label::Repeated, 1, 1),
        FieldDescriptor::new("__root__.name.language", FieldKind::Group, Label::Repeated, 2, 2),
        FieldDescriptor::new(
            "__root__.name.language.code",
            FieldKind::Scalar(PhysicalType::ByteArray),
            Label::Required,
            2,
            2,
        ),
        FieldDescriptor::new(
            "__root__.name.language.country",
            FieldKind::Scalar(PhysicalType::ByteArray),
            Label::Optional,
            2,
            3,
        ),
        FieldDescriptor::new(
            "__root__.name.url",
            FieldKind::Scalar(PhysicalType::ByteArray),
            Label::Optional,
            1,
            2,
        ),
    ];
    let edges = vec![
        (
            "__root__".to_string(),
            vec!["__root__.doc_id".to_string(), "__root__.links".to_string(), "__root__.name".to_string()],
        ),
        (
            "__root__.links".to_string(),
            vec!["__root__.links.backward".to_string(), "__root__.links.forward".to_string()],
        ),
        (
            "__root__.name".to_string(),
            vec!["__root__.name.language".to_string(), "__root__.name.url".to_string()],
        ),
        (
            "__root__.name.language".to_string(),
            vec!["__root__.name.language.code".to_string(), "__root__.name.language.country".to_string()],
        ),
    ];
    FieldGraph::build(descriptors, edges).unwrap()
}

fn str(s: &str) -> Value {
    Value::Str(s.to_string())
}

/// The paper's `r1`: doc_id 10, three `name` entries (two with `language`
/// sub-entries, one with none), `links.forward` only.
pub fn r1() -> DynamicRecord {
    let mut r = DynamicRecord::new();
    r.set_scalar("doc_id", Value::Int64(10));
    r.enter_message("links").append_scalar("forward", Value::Int64(20));
    r.enter_message("links").append_scalar("forward", Value::Int64(40));
    r.enter_message("links").append_scalar("forward", Value::Int64(60));

    {
        let name0 = r.append_message("name");
        {
            let lang0 = name0.append_message("language");
            lang0.set_scalar("code", str("en-us"));
        }
        {
            let lang1 = name0.append_message("language");
            lang1.set_scalar("code", str("en"));
            lang1.set_scalar("country", str("us"));
        }
        name0.set_scalar("url", str("http://A"));
    }
    {
        let name1 = r.append_message("name");
        name1.set_scalar("url", str("http://B"));
    }
    {
        let name2 = r.append_message("name");
        let lang2 = name2.append_message("language");
        lang2.set_scalar("code", str("en-gb"));
        lang2.set_scalar("country", str("gb"));
    }
    r
}

/// The paper's `r2`: doc_id 20, `links.backward` and a single `links.forward`,
/// one `name` entry with a `url` and no `language`.
pub fn r2() -> DynamicRecord {
    let mut r = DynamicRecord::new();
    r.set_scalar("doc_id", Value::Int64(20));
    r.enter_message("links").append_scalar("backward", Value::Int64(10));
    r.enter_message("links").append_scalar("backward", Value::Int64(30));
    r.enter_message("links").append_scalar("forward", Value::Int64(80));
    {
        let name = r.append_message("name");
        name.set_scalar("url", str("http://C"));
    }
    r
}

/// Builds the reference in-memory storage for `records` against `graph`,
/// optionally pruned to `projection`.
pub fn build_storage(graph: FieldGraph, records: &[DynamicRecord], projection: Option<&[&str]>) -> MemoryFieldStorage {
    MemoryFieldStorage::build(graph, records, projection).unwrap()
}

/// Reads every triple of one column to completion, as `(r, d, value)`.
pub fn read_all_triples(storage: &MemoryFieldStorage, path: &str) -> Vec<(usize, usize, Option<Value>)> {
    use dremel_columnar::column::FieldReader;
    let mut reader = storage.create_field_reader(path).unwrap();
    let mut out = Vec::new();
    loop {
        reader.next().unwrap();
        if reader.done() {
            break;
        }
        out.push((
            reader.repetition_level().unwrap(),
            reader.definition_level().unwrap(),
            reader.value().unwrap(),
        ));
    }
    out
}

/// Order-independent structural comparison of two records: every scalar,
/// repeated-scalar, message, and repeated-message slot the left side has
/// must match on the right, and vice versa. Used instead of
/// `DynamicRecord`'s derived `PartialEq` (which is sensitive to slot
/// insertion order, an implementation detail orthogonal to record identity)
/// whenever a test builds its expectation independently of assembly order.
pub fn records_equivalent(a: &DynamicRecord, b: &DynamicRecord) -> bool {
    fn names(r: &DynamicRecord) -> Vec<&str> {
        // `DynamicRecord` does not expose its field name list directly;
        // reconstruct membership through `has_field` over the known
        // Document-schema field names used across these tests.
        ["doc_id", "links", "name", "backward", "forward", "language", "code", "country", "url"]
            .into_iter()
            .filter(|n| r.has_field(n))
            .collect()
    }

    let mut a_names = names(a);
    let mut b_names = names(b);
    a_names.sort_unstable();
    b_names.sort_unstable();
    if a_names != b_names {
        return false;
    }

    for name in a_names {
        if a.scalar(name) != b.scalar(name) {
            return false;
        }
        if a.scalar_repeated(name) != b.scalar_repeated(name) {
            return false;
        }
        match (a.message(name), b.message(name)) {
            (Some(am), Some(bm)) => {
                if !records_equivalent(am, bm) {
                    return false;
                }
            }
            (None, None) => {}
            _ => return false,
        }
        let (ar, br) = (a.message_repeated(name), b.message_repeated(name));
        if ar.len() != br.len() {
            return false;
        }
        for (x, y) in ar.iter().zip(br.iter()) {
            if !records_equivalent(x, y) {
                return false;
            }
        }
    }
    true
}
