// tests/classifier_tests.rs
use std::sync::Arc;

use encrypted_field_vault::core::{
    AnnotationSource, DecodedStateRegistry, FieldAnnotations, FieldClassifier, TransitionEngine,
};
use encrypted_field_vault::error::{AccessorKind, CoreError};

mod support;
use support::{annotations, test_cipher, Account, Note, User, SSN};

fn missing_accessor(err: CoreError) -> (&'static str, String, AccessorKind) {
    match err {
        CoreError::MissingAccessor {
            type_name,
            field,
            missing,
        } => (type_name, field, missing),
        other => panic!("expected MissingAccessor, got {other:?}"),
    }
}

#[test]
fn test_fields_follow_declaration_order() {
    // marked in reverse order on purpose
    let classifier = FieldClassifier::new(FieldAnnotations::new().with("User", ["email", "ssn"]));

    let fields = classifier.fields_of::<User>().unwrap();
    let names: Vec<_> = fields.iter().map(|f| f.name()).collect();

    assert_eq!(names, ["ssn", "email"]);
}

#[test]
fn test_accessor_pair_reads_and_writes() {
    let classifier = FieldClassifier::new(annotations());
    let fields = classifier.fields_of::<User>().unwrap();
    let ssn = &fields[0];
    let mut user = User::sample();

    assert_eq!(ssn.read(&user).as_deref(), Some(SSN));
    ssn.write(&mut user, None);
    assert_eq!(user.ssn, None);
}

#[test]
fn test_unmarked_type_has_no_fields() {
    let classifier = FieldClassifier::new(annotations());

    assert_eq!(classifier.register::<Note>().unwrap(), 0);
    assert_eq!(classifier.register::<User>().unwrap(), 2);
}

#[test]
fn test_classification_is_cached() {
    let classifier = FieldClassifier::new(annotations());

    let first = classifier.fields_of::<User>().unwrap();
    let second = classifier.fields_of::<User>().unwrap();

    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_marked_read_only_property_is_rejected() {
    let classifier = FieldClassifier::new(FieldAnnotations::new().with("Account", ["iban"]));

    let (type_name, field, missing) =
        missing_accessor(classifier.register::<Account>().unwrap_err());

    assert_eq!(type_name, "Account");
    assert_eq!(field, "iban");
    assert_eq!(missing, AccessorKind::Mutator);
}

#[test]
fn test_marked_write_only_property_is_rejected() {
    let classifier = FieldClassifier::new(FieldAnnotations::new().with("Account", ["pin"]));

    let (_, field, missing) = missing_accessor(classifier.register::<Account>().unwrap_err());

    assert_eq!(field, "pin");
    assert_eq!(missing, AccessorKind::Accessor);
}

#[test]
fn test_marked_undeclared_field_is_rejected() {
    let classifier =
        FieldClassifier::new(FieldAnnotations::new().with("User", ["ssn", "passport"]));

    let err = classifier.register::<User>().unwrap_err();
    assert_eq!(
        err.to_string(),
        "Sensitive field `User.passport` has no accessor or mutator"
    );
    let (_, field, missing) = missing_accessor(err);
    assert_eq!(field, "passport");
    assert_eq!(missing, AccessorKind::Both);
}

#[test]
fn test_engine_surfaces_classification_errors() {
    let classifier = FieldClassifier::new(FieldAnnotations::new().with("Account", ["iban"]));
    let engine = TransitionEngine::new(
        Arc::new(test_cipher()),
        Arc::new(classifier),
        Arc::new(DecodedStateRegistry::new()),
    );
    let mut account = Account {
        code: Some("ACC-1".into()),
        country: "DE".into(),
        number: "0001".into(),
        pin: None,
    };

    let err = engine.encrypt(&mut account, true).unwrap_err();

    assert!(matches!(err, CoreError::MissingAccessor { .. }));
    assert_eq!(account.pin, None);
}

#[test]
fn test_annotation_source_lookup() {
    let marks = FieldAnnotations::new()
        .with("User", ["ssn"])
        .with("User", ["email", "ssn"]);

    assert!(marks.is_marked_sensitive("User", "ssn"));
    assert!(!marks.is_marked_sensitive("User", "name"));
    assert!(!marks.is_marked_sensitive("Note", "ssn"));
    assert_eq!(marks.marked_fields("User"), ["ssn", "email"]);
    assert!(marks.marked_fields("Note").is_empty());
}

/// Any source works, not only the built-in one
struct SuffixConvention;

impl AnnotationSource for SuffixConvention {
    fn is_marked_sensitive(&self, _type_name: &str, field: &str) -> bool {
        field == "ssn" || field.ends_with("_secret")
    }

    fn marked_fields(&self, _type_name: &str) -> Vec<String> {
        Vec::new()
    }
}

#[test]
fn test_custom_annotation_source() {
    let classifier = FieldClassifier::new(SuffixConvention);

    let fields = classifier.fields_of::<User>().unwrap();

    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].name(), "ssn");
}
