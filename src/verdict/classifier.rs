//! Envelope classification.
//!
//! The services under test answer with one of several incompatible
//! envelope conventions. This module recovers an explicit tagged union
//! from the untyped JSON so the evaluator can match on it exhaustively
//! instead of probing the document ad hoc.

use serde_json::Value;

/// Top-level keys that mark a list-keyed batch envelope.
pub const BATCH_KEYS: [&str; 4] = ["errors", "addErrors", "delErrors", "updateErrors"];

/// One element of a batch substructure, reduced to the two fields the
/// evaluator compares against. For nested-result records the `index`
/// field fills the `status` slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchRecord {
    pub status: Option<i64>,
    pub code: Option<i64>,
}

/// Which batch convention (if any) the envelope follows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultShape {
    /// No recognized batch substructure (includes non-object bodies).
    None,
    /// A top-level key from [`BATCH_KEYS`] mapping to an array of records.
    ListKeyed { key: String, records: Vec<BatchRecord> },
    /// A top-level `result` key mapping to an object with a `count` and
    /// optionally an `errors` array.
    NestedDict {
        count: Option<i64>,
        errors: Option<Vec<BatchRecord>>,
    },
    /// A top-level `result` key mapping to anything that is not an
    /// object. Always a failure signal downstream.
    NestedNonDict,
}

/// The verdict-relevant facts extracted from one decoded response body.
///
/// Built fresh per HTTP call, consulted once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    primary_status: Option<i64>,
    shape: ResultShape,
}

impl Envelope {
    /// Classify a decoded JSON body.
    ///
    /// Never fails: absent or malformed data degenerates to "no match",
    /// which the evaluator turns into a failed verdict.
    pub fn classify(body: &Value) -> Self {
        let Some(map) = body.as_object() else {
            return Self {
                primary_status: None,
                shape: ResultShape::None,
            };
        };

        Self {
            primary_status: map.get("status").and_then(Value::as_i64),
            shape: classify_shape(map),
        }
    }

    /// The top-level `status` field, or `None` when the body is not an
    /// object or lacks it.
    pub fn primary_status(&self) -> Option<i64> {
        self.primary_status
    }

    /// Which batch convention matched.
    pub fn result_shape(&self) -> &ResultShape {
        &self.shape
    }

    /// The batch records of whichever shape matched, in envelope order.
    /// Empty when no recognized batch substructure is present.
    pub fn batch_records(&self) -> &[BatchRecord] {
        match &self.shape {
            ResultShape::ListKeyed { records, .. } => records,
            ResultShape::NestedDict {
                errors: Some(records),
                ..
            } => records,
            _ => &[],
        }
    }
}

fn classify_shape(map: &serde_json::Map<String, Value>) -> ResultShape {
    // List-keyed detection requires both the key membership and an array
    // value. Only the first matching key (in envelope order) is honored;
    // envelopes never carry more than one populated batch key in practice.
    for (key, value) in map {
        if !BATCH_KEYS.contains(&key.as_str()) {
            continue;
        }
        if let Some(items) = value.as_array() {
            let records = items
                .iter()
                .map(|item| BatchRecord {
                    status: field_i64(item, "status"),
                    code: field_i64(item, "code"),
                })
                .collect();
            return ResultShape::ListKeyed {
                key: key.clone(),
                records,
            };
        }
    }

    match map.get("result") {
        Some(Value::Object(result)) => {
            let errors = result.get("errors").and_then(Value::as_array).map(|items| {
                items
                    .iter()
                    .map(|item| BatchRecord {
                        status: field_i64(item, "index"),
                        code: field_i64(item, "code"),
                    })
                    .collect()
            });
            ResultShape::NestedDict {
                count: result.get("count").and_then(Value::as_i64),
                errors,
            }
        }
        Some(_) => ResultShape::NestedNonDict,
        None => ResultShape::None,
    }
}

fn field_i64(record: &Value, field: &str) -> Option<i64> {
    record.get(field).and_then(Value::as_i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flat_envelope_exposes_primary_status() {
        let envelope = Envelope::classify(&json!({"status": 7}));
        assert_eq!(envelope.primary_status(), Some(7));
        assert_eq!(*envelope.result_shape(), ResultShape::None);
        assert!(envelope.batch_records().is_empty());
    }

    #[test]
    fn non_object_body_classifies_as_none() {
        for body in [json!(null), json!(3), json!("ok"), json!([1, 2])] {
            let envelope = Envelope::classify(&body);
            assert_eq!(envelope.primary_status(), None);
            assert_eq!(*envelope.result_shape(), ResultShape::None);
            assert!(envelope.batch_records().is_empty());
        }
    }

    #[test]
    fn list_keyed_batch_is_recognized() {
        let envelope = Envelope::classify(&json!({
            "status": 7,
            "errors": [{"id": 14, "status": 1}, {"id": 7, "status": 163}],
        }));

        match envelope.result_shape() {
            ResultShape::ListKeyed { key, records } => {
                assert_eq!(key, "errors");
                assert_eq!(records.len(), 2);
                assert_eq!(records[1].status, Some(163));
                assert_eq!(records[1].code, None);
            }
            other => panic!("unexpected shape: {other:?}"),
        }
    }

    #[test]
    fn batch_key_with_non_array_value_is_ignored() {
        // e.g. {'status': 0, 'addErrors': None, 'delErrors': None}
        let envelope = Envelope::classify(&json!({
            "status": 0,
            "addErrors": null,
            "delErrors": null,
            "updateErrors": null,
        }));
        assert_eq!(*envelope.result_shape(), ResultShape::None);
    }

    #[test]
    fn only_first_batch_key_is_honored() {
        let envelope = Envelope::classify(&json!({
            "status": 7,
            "delErrors": [{"code": 11}],
            "addErrors": [{"code": 22}],
        }));

        match envelope.result_shape() {
            ResultShape::ListKeyed { key, records } => {
                assert_eq!(key, "delErrors");
                assert_eq!(records, &[BatchRecord { status: None, code: Some(11) }]);
            }
            other => panic!("unexpected shape: {other:?}"),
        }
    }

    #[test]
    fn nested_result_dict_exposes_count_and_errors() {
        let envelope = Envelope::classify(&json!({
            "status": 4,
            "result": {"count": 4, "errors": [{"index": 5, "code": 251}]},
        }));

        match envelope.result_shape() {
            ResultShape::NestedDict { count, errors } => {
                assert_eq!(*count, Some(4));
                let errors = errors.as_deref().unwrap();
                assert_eq!(errors[0].status, Some(5));
                assert_eq!(errors[0].code, Some(251));
            }
            other => panic!("unexpected shape: {other:?}"),
        }
    }

    #[test]
    fn nested_result_without_errors_list() {
        let envelope = Envelope::classify(&json!({"status": 4, "result": {"count": 2}}));
        assert_eq!(
            *envelope.result_shape(),
            ResultShape::NestedDict {
                count: Some(2),
                errors: None,
            }
        );
        assert!(envelope.batch_records().is_empty());
    }

    #[test]
    fn non_dict_result_is_flagged() {
        for body in [
            json!({"status": 3, "result": null}),
            json!({"status": 3, "result": "oops"}),
            json!({"status": 3, "result": [1, 2]}),
        ] {
            let envelope = Envelope::classify(&body);
            assert_eq!(*envelope.result_shape(), ResultShape::NestedNonDict);
        }
    }

    #[test]
    fn non_numeric_status_reads_as_absent() {
        let envelope = Envelope::classify(&json!({"status": "seven"}));
        assert_eq!(envelope.primary_status(), None);
    }
}
