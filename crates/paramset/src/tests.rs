//! End-to-end schema tests and property tests.

use crate::prelude::*;
use serde_json::json;

fn user_schema() -> Schema {
    Schema::builder("UserParams")
        .field("id", UuidStrField::new().required())
        .field(
            "name",
            WordField::new()
                .length((1, 8))
                .required()
                .describe("name should be a 1~8 length word, and is required"),
        )
        .field(
            "email",
            EmailField::new()
                .required()
                .describe("email should be a valid email format, and is required"),
        )
        .field(
            "age",
            IntegerField::new()
                .min(10)
                .max(30)
                .describe("age should be a 10~30 int"),
        )
        .build()
}

#[test]
fn user_schema_error_counts() {
    let cases = [
        (
            json!({
                "id": "216edfae-19c0-11e3-9e93-10604b8a89ab",
                "name": "asuka",
                "email": "asuka@nerv.com",
            }),
            0,
        ),
        (
            json!({
                "id": "123",
                "name": "lilith",
                "email": "l@eva.com",
                "age": 10,
            }),
            1,
        ),
        (
            json!({
                "id": "a3",
                "name": "ayanami",
                "email": "rei@nerv.com",
                "age": "unknown",
            }),
            2,
        ),
        (
            json!({
                "id": "b3",
                "name": "shinjigivebackmyayanami",
                "email": "yikali@nerv",
                "age": 30,
            }),
            3,
        ),
        (
            json!({
                "id": "c4",
                "name": "wtfissooooolong",
                "email": "eva@god",
                "age": 0,
            }),
            4,
        ),
        (json!({}), 3),
    ];

    let schema = user_schema();
    for (raw, expected) in cases {
        let params = schema.bind(raw.clone());
        assert_eq!(
            params.errors().len(),
            expected,
            "{raw} -> {:?}",
            params.errors()
        );
    }
}

#[test]
fn described_field_reports_its_description() {
    let schema = user_schema();
    let params = schema.bind(json!({
        "id": "216edfae-19c0-11e3-9e93-10604b8a89ab",
        "name": "asuka",
        "email": "asuka@nerv.com",
        "age": 31,
    }));
    assert_eq!(params.errors().len(), 1);
    assert_eq!(params.errors()[0].error.message, "age should be a 10~30 int");
    assert_eq!(params.errors()[0].error.code, "range");
}

#[test]
fn mixed_base_fields_error_counts() {
    let schema = Schema::builder("FakeParams")
        .field("id", IntegerField::new().min(0).required())
        .field("name", WordField::new().length((1, 8)).required())
        .field("email", EmailField::new().required())
        .field("content", StringField::new().length((1, 20)))
        .build();

    let long_content = "Gainax launched a project to create a movie ending \
                        for the series in 1997.";
    let cases = [
        (json!({"id": "0", "name": "asuka", "email": "asuka@nerv.com"}), 0),
        (
            json!({"id": "2", "name": "lilith", "email": "l@eva.com", "content": "with adon"}),
            0,
        ),
        (json!({"id": "a3", "name": "ayanami", "email": "rei@nerv.com"}), 1),
        (
            json!({"id": "b3", "name": "shinjigivebackmyayanami", "email": "yikali@nerv.com"}),
            2,
        ),
        (
            json!({"id": "c4", "name": "E V A", "email": "eva@god", "content": long_content}),
            4,
        ),
        (json!({}), 3),
        (json!({"id": "d5"}), 3),
        (json!({"id": "999"}), 2),
        (json!({"content": long_content}), 4),
    ];

    for (raw, expected) in cases {
        let params = schema.bind(raw.clone());
        assert_eq!(
            params.errors().len(),
            expected,
            "{raw} -> {:?}",
            params.errors()
        );
    }
}

#[test]
fn null_value_passes_choices_field() {
    // An empty string short-circuits as null before the choices check
    let schema = Schema::builder("FooParams")
        .field("bar", WordField::new().choices(["a", "b", "c"]))
        .field("quz", AnyField::new())
        .build();

    let params = schema.bind(json!({"bar": "", "quz": "QUZ"}));
    assert!(params.is_valid(), "{:?}", params.errors());
    assert!(params.has("bar"));
    assert_eq!(params.get("bar"), Some(&Value::Null));
    // Null values stay out of the export unless asked for
    let out = params.to_map(false);
    assert!(!out.contains_key("bar"));
    assert_eq!(out["quz"], Value::from("QUZ"));
}

#[test]
fn required_and_optional_given_empty_input() {
    let schema = Schema::builder("S")
        .field("must", StringField::new().required())
        .field("may", StringField::new())
        .build();

    let params = schema.bind(json!({}));
    assert_eq!(params.errors().len(), 1);
    assert_eq!(params.errors()[0].key.as_deref(), Some("must"));
    assert_eq!(params.errors()[0].error.code, "required");
    assert!(params.data().is_empty());
}

#[test]
fn object_hook_rejects_inconsistent_fields() {
    let schema = Schema::builder("UserParams")
        .field("name", WordField::new().required())
        .field("email", EmailField::new().required())
        .check_object("name_with_email", |params| {
            match (params.get_str("name"), params.get_str("email")) {
                (Some(name), Some(email)) if !email.contains(name) => Err(FieldError::new(
                    "object",
                    format!("name \"{name}\" must appear in email"),
                )),
                _ => Ok(()),
            }
        })
        .build();

    let params = schema.bind(json!({"name": "ayanami", "email": "rei@nerv.com"}));
    assert_eq!(params.errors().len(), 1);
    assert!(params.errors()[0].key.is_none());
    assert_eq!(params.errors()[0].error.code, "object");

    let ok = schema.bind(json!({"name": "rei", "email": "rei@nerv.com"}));
    assert!(ok.is_valid());
}

#[test]
fn field_hook_transforms_stored_value() {
    let schema = Schema::builder("S")
        .field("name", WordField::new())
        .check("name", |value| {
            let upper = value.as_str().map(str::to_uppercase);
            Ok(match upper {
                Some(s) => Value::from(s),
                None => value,
            })
        })
        .build();

    let params = schema.bind(json!({"name": "asuka"}));
    assert!(params.is_valid());
    assert_eq!(params.get_str("name"), Some("ASUKA"));
}

#[test]
fn field_hook_failure_keeps_value_and_records_error() {
    let schema = Schema::builder("S")
        .field("name", WordField::new())
        .check("name", |value| {
            Err(FieldError::new("taken", format!("{value} is already taken")))
        })
        .build();

    let params = schema.bind(json!({"name": "asuka"}));
    assert_eq!(params.errors().len(), 1);
    assert_eq!(params.errors()[0].key.as_deref(), Some("name"));
    assert_eq!(params.get_str("name"), Some("asuka"));
}

#[test]
fn field_hook_skipped_when_key_absent() {
    let schema = Schema::builder("S")
        .field("name", WordField::new())
        .check("name", |_| {
            Err(FieldError::new("boom", "hook should not run"))
        })
        .build();

    let params = schema.bind(json!({}));
    assert!(params.is_valid());
}

#[test]
#[should_panic(expected = "returned null")]
fn field_hook_returning_null_on_non_null_field_panics() {
    let schema = Schema::builder("S")
        .field("name", WordField::new().null(false))
        .check("name", |_| Ok(Value::Null))
        .build();

    let _ = schema.bind(json!({"name": "asuka"}));
}

#[test]
fn error_order_is_fields_then_hooks() {
    let schema = Schema::builder("S")
        .field("a", IntegerField::new().max(0))
        .field("b", IntegerField::new().max(0))
        .check("b", |v| Ok(v))
        .check_object("always_fails", |_| {
            Err(FieldError::new("object", "nope"))
        })
        .build();

    let params = schema.bind(json!({"a": 1, "b": 1}));
    let keys: Vec<Option<&str>> = params.errors().iter().map(|e| e.key.as_deref()).collect();
    assert_eq!(keys, vec![Some("a"), Some("b"), None]);
}

#[test]
fn convert_flag_forwards_to_fields() {
    let schema = Schema::builder("S")
        .field("active", BooleanField::new())
        .build();

    let strict = schema.bind(json!({"active": "true"}));
    assert_eq!(strict.errors().len(), 1);

    let converted = schema.bind_with(json!({"active": "true"}), BindOptions::converting());
    assert!(converted.is_valid());
    assert_eq!(converted.get_bool("active"), Some(true));
}

#[test]
fn force_convert_field_ignores_bind_flag() {
    let schema = Schema::builder("S")
        .field("active", BooleanField::new().force_convert())
        .build();

    let params = schema.bind(json!({"active": "1"}));
    assert!(params.is_valid());
    assert_eq!(params.get_bool("active"), Some(true));
}

#[test]
fn list_of_integers_through_schema() {
    let schema = Schema::builder("S")
        .field(
            "scores",
            ListField::new().item(IntegerField::new().min(1).max(9)),
        )
        .build();

    let params = schema.bind(json!({"scores": ["1", "2", "3"]}));
    assert!(params.is_valid());
    assert_eq!(
        params.get_list("scores"),
        Some(&[Value::Int(1), Value::Int(2), Value::Int(3)][..])
    );

    let bad = schema.bind(json!({"scores": ["0", "1", "2"]}));
    assert_eq!(bad.errors().len(), 1);
    assert_eq!(bad.errors()[0].error.code, "item");
}

#[test]
fn datetime_through_schema() {
    let schema = Schema::builder("S")
        .field("since", DatetimeField::new("%Y-%m-%d %H:%M:%S"))
        .build();

    let params = schema.bind(json!({"since": "2014-03-01 12:30:00"}));
    assert!(params.is_valid());
    assert_eq!(
        params.get_datetime("since").map(ToString::to_string),
        Some("2014-03-01 12:30:00".to_string())
    );
}

#[test]
fn validate_raises_aggregate_error() {
    let schema = user_schema();
    let err = schema.validate(json!({})).unwrap_err();
    assert_eq!(err.len(), 3);
    assert!(err.to_string().starts_with("Invalid params: "));

    let body = err.to_json();
    assert_eq!(body["error"]["type"], "invalid_params");
    assert_eq!(body["error"]["fields"].as_array().unwrap().len(), 3);
}

#[test]
fn spawned_field_registers_under_new_name() {
    let prototype = WordField::new().length((1, 8)).key("shared");
    let schema = Schema::builder("S")
        .field("first", prototype.clone())
        .field("second", prototype.spawn().required())
        .build();

    // The spawned copy lost the template's key, so it binds under its own
    // name instead of colliding
    assert_eq!(schema.keys(), vec!["shared", "second"]);

    let params = schema.bind(json!({"shared": "a"}));
    assert_eq!(params.errors().len(), 1);
    assert_eq!(params.errors()[0].key.as_deref(), Some("second"));
}

#[test]
fn idempotent_validation_of_converted_values() {
    let schema = Schema::builder("S")
        .field("age", IntegerField::new())
        .field("active", BooleanField::new())
        .build();

    let first = schema.bind_with(
        json!({"age": "14", "active": "true"}),
        BindOptions::converting(),
    );
    assert!(first.is_valid());

    // Re-binding the already-converted export yields the same data
    let again = schema.bind_with(first.to_json(false), BindOptions::converting());
    assert!(again.is_valid());
    assert_eq!(again.data(), first.data());

    let plain = schema.bind(first.to_json(false));
    assert!(plain.is_valid());
    assert_eq!(plain.data(), first.data());
}

mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        // Validating an already-converted integer, with conversion on or
        // off, yields the same value.
        #[test]
        fn integer_validation_is_idempotent(n in any::<i64>()) {
            let field = IntegerField::new();
            let plain = field.validate(&Value::Int(n)).unwrap();
            let converted = field.validate_with(&Value::Int(n), true).unwrap();
            prop_assert_eq!(&plain, &converted);
            prop_assert_eq!(plain, Value::Int(n));
        }

        #[test]
        fn integer_text_round_trips(n in any::<i64>()) {
            let field = IntegerField::new();
            let v = field.validate(&Value::from(n.to_string())).unwrap();
            prop_assert_eq!(v, Value::Int(n));
        }

        #[test]
        fn length_range_accepts_exactly_in_bounds(s in "[a-z]{0,6}") {
            let field = StringField::new().length((2, 4)).null(false);
            let result = field.validate(&Value::from(s.as_str()));
            let in_bounds = (2..=4).contains(&s.chars().count());
            if s.is_empty() {
                // Null-set value on a non-null field
                prop_assert_eq!(result.unwrap_err().code, "null");
            } else if in_bounds {
                prop_assert!(result.is_ok());
            } else {
                prop_assert_eq!(result.unwrap_err().code, "length");
            }
        }

        #[test]
        fn word_field_accepts_word_characters(s in "[A-Za-z0-9_]{1,12}") {
            let field = WordField::new();
            prop_assert!(field.validate(&Value::from(s.as_str())).is_ok());
        }

        #[test]
        fn word_field_rejects_embedded_space(a in "[a-z]{1,4}", b in "[a-z]{1,4}") {
            let field = WordField::new();
            let spaced = format!("{a} {b}");
            prop_assert!(field.validate(&Value::from(spaced.as_str())).is_err());
        }

        #[test]
        fn bounded_integer_agrees_with_range(n in -100i64..100) {
            let field = IntegerField::new().min(-10).max(10);
            let result = field.validate(&Value::Int(n));
            prop_assert_eq!(result.is_ok(), (-10..=10).contains(&n));
        }
    }
}
