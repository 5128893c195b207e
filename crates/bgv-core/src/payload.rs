//! Shaping a section into the JSON body of its save request
//!
//! Values are snapshotted first, then staged files are encoded one after another.
//! Attachments that are already uploaded are left out of the body.

use serde_json::{Map, Value};

use crate::draft::SectionData;
use crate::error::BgvResult;
use crate::field::{wire_name, FieldAccess, FieldValue};
use crate::section::RowList;

type Snapshot = Vec<(String, FieldValue)>;

fn snapshot(record: &dyn FieldAccess) -> Snapshot {
    record
        .field_names()
        .iter()
        .filter_map(|f| record.get(f).map(|v| (wire_name(f), v)))
        .collect()
}

/// Serialize one section for its save endpoint
pub async fn section_payload(data: &SectionData) -> BgvResult<Value> {
    let top = snapshot(data.fields());
    let mut lists: Vec<(RowList, Vec<Snapshot>)> = Vec::new();
    for &list in data.section().row_lists() {
        let rows = data.rows(list)?.into_iter().map(snapshot).collect();
        lists.push((list, rows));
    }

    let mut encoded = 0usize;
    let mut body = encode_record(top, &mut encoded).await?;
    for (list, rows) in lists {
        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            items.push(Value::Object(encode_record(row, &mut encoded).await?));
        }
        body.insert(list.wire_name().to_string(), Value::Array(items));
    }

    tracing::debug!(section = %data.section(), files = encoded, "section payload shaped");
    Ok(Value::Object(body))
}

async fn encode_record(values: Snapshot, encoded: &mut usize) -> BgvResult<Map<String, Value>> {
    let mut out = Map::new();
    for (path, value) in values {
        let json = match value {
            FieldValue::Empty => continue,
            FieldValue::Text(s) => Value::String(s),
            FieldValue::Flag(b) => Value::Bool(b),
            FieldValue::File(att) => match att.materialize().await? {
                Some(payload) => {
                    *encoded += 1;
                    serde_json::to_value(payload)?
                }
                None => continue,
            },
        };
        insert_path(&mut out, &path, json);
    }
    Ok(out)
}

fn insert_path(map: &mut Map<String, Value>, path: &str, value: Value) {
    match path.split_once('.') {
        None => {
            map.insert(path.to_string(), value);
        }
        Some((head, rest)) => {
            let child = map
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !child.is_object() {
                *child = Value::Object(Map::new());
            }
            if let Value::Object(child) = child {
                insert_path(child, rest, value);
            }
        }
    }
}
