use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

use rowcast_core::{CompileConfig, DataFormat, compile, decode};
use rowcast_model::{Declaration, FieldDecl, TypeTag, Value};

fn schema() -> rowcast_core::Schema {
    let decl = Declaration::new(vec![
        FieldDecl::plain("name"),
        FieldDecl::tagged("count", TypeTag::Int),
        FieldDecl::plain("-note"),
    ]);
    compile("prop-service", &decl, &CompileConfig::default()).expect("compile")
}

// Tokens free of delimiter/quote/terminator characters, so rows can be
// assembled by plain joining.
fn plain_token() -> impl proptest::strategy::Strategy<Value = String> {
    "[a-zA-Z0-9 _.-]{1,16}"
}

proptest! {
    #[test]
    fn decoding_is_deterministic(name in plain_token(), count in -10_000i64..10_000, note in plain_token()) {
        let schema = schema();
        let payload = format!("{name},{count},{note}");
        let first = decode(&payload, DataFormat::Csv, &schema).expect("decode");
        let second = decode(&payload, DataFormat::Csv, &schema).expect("decode");
        prop_assert_eq!(first, second);
    }

    #[test]
    fn n_rows_yield_n_records_in_order(counts in proptest::collection::vec(0i64..1000, 1..20)) {
        let schema = schema();
        let payload: Vec<String> = counts
            .iter()
            .enumerate()
            .map(|(idx, count)| format!("row{idx},{count},"))
            .collect();
        let records = decode(&payload.join("\n"), DataFormat::Csv, &schema).expect("decode");
        prop_assert_eq!(records.len(), counts.len());
        for (idx, record) in records.iter().enumerate() {
            prop_assert_eq!(record.row_index(), idx);
            prop_assert_eq!(record.get("count"), Some(&Value::Int(counts[idx])));
            // Optional, sent empty on every row.
            prop_assert_eq!(record.get("note"), Some(&Value::Absent));
        }
    }

    #[test]
    fn required_empty_string_never_becomes_absent(count in 0i64..100) {
        let schema = schema();
        let payload = format!(",{count},x");
        let records = decode(&payload, DataFormat::Csv, &schema).expect("decode");
        let value = records[0].get("name").expect("name value");
        prop_assert_eq!(value, &Value::Str(String::new()));
        prop_assert!(!value.is_absent());
    }
}
