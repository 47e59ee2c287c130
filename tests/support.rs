// tests/support.rs
//! Test fixtures: entities, ciphers and engine wiring shared by the suites

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use encrypted_field_vault::core::{
    Changeset, DecodedStateRegistry, EngineSettings, Entity, EntityId, FieldAnnotations,
    FieldClassifier, MemorySink, Property, TrackedIdentity, TransitionEngine,
};
use encrypted_field_vault::crypto::{accept, Aes256GcmCipher, CipherResult, CipherStrategy};
use encrypted_field_vault::{CipherError, FieldEncryptionListener, FieldVault, Record};
use zeroize::Zeroizing;

pub const TEST_SECRET: &str = "test-field-secret-2025";
pub const SSN: &str = "123-45-6789";
pub const EMAIL: &str = "ada@example.com";

#[allow(dead_code)]
pub fn test_cipher() -> Aes256GcmCipher {
    Aes256GcmCipher::new(&Zeroizing::new(TEST_SECRET.to_owned()))
}

/// `ssn` and `email` are sensitive, `name` is not
pub fn annotations() -> FieldAnnotations {
    FieldAnnotations::new().with("User", ["ssn", "email"])
}

// ──────────────────────────────────────────────────────────────
// Entities
// ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct User {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub ssn: Option<String>,
    pub email: Option<String>,
}

#[allow(dead_code)]
impl User {
    pub fn sample() -> Self {
        Self {
            id: None,
            name: Some("Ada".into()),
            ssn: Some(SSN.into()),
            email: Some(EMAIL.into()),
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }
}

impl Entity for User {
    const TYPE_NAME: &'static str = "User";

    fn primary_key(&self) -> Option<EntityId> {
        self.id.map(EntityId::from)
    }

    fn properties() -> Vec<Property<Self>> {
        vec![
            Property::new(
                "name",
                |u: &User| u.name.clone(),
                |u: &mut User, v: Option<String>| u.name = v,
            ),
            Property::new(
                "ssn",
                |u: &User| u.ssn.clone(),
                |u: &mut User, v: Option<String>| u.ssn = v,
            ),
            Property::new(
                "email",
                |u: &User| u.email.clone(),
                |u: &mut User, v: Option<String>| u.email = v,
            ),
            Property::read_only("display_name", |u: &User| {
                u.name.as_ref().map(|n| format!("<{n}>"))
            }),
        ]
    }
}

impl Record for User {
    const TABLE: &'static str = "users";
    const COLUMNS: &'static [&'static str] = &["name", "ssn", "email"];

    fn row_id(&self) -> Option<i64> {
        self.id
    }

    fn assign_row_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn to_columns(&self) -> Changeset {
        [
            ("name", self.name.clone()),
            ("ssn", self.ssn.clone()),
            ("email", self.email.clone()),
        ]
        .into_iter()
        .collect()
    }

    fn from_columns(id: i64, columns: &Changeset) -> Self {
        let column = |name: &str| columns.get(name).cloned().flatten();
        Self {
            id: Some(id),
            name: column("name"),
            ssn: column("ssn"),
            email: column("email"),
        }
    }
}

/// No sensitive fields at all
#[allow(dead_code)]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Note {
    pub id: Option<i64>,
    pub body: Option<String>,
}

impl Entity for Note {
    const TYPE_NAME: &'static str = "Note";

    fn primary_key(&self) -> Option<EntityId> {
        self.id.map(EntityId::from)
    }

    fn properties() -> Vec<Property<Self>> {
        vec![Property::new(
            "body",
            |n: &Note| n.body.clone(),
            |n: &mut Note, v: Option<String>| n.body = v,
        )]
    }
}

/// `iban` is computed (no mutator), `pin` can only be written
#[allow(dead_code)]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Account {
    pub code: Option<String>,
    pub country: String,
    pub number: String,
    pub pin: Option<String>,
}

impl Entity for Account {
    const TYPE_NAME: &'static str = "Account";

    fn primary_key(&self) -> Option<EntityId> {
        self.code.clone().map(EntityId::from)
    }

    fn properties() -> Vec<Property<Self>> {
        vec![
            Property::read_only("iban", |a: &Account| {
                Some(format!("{}{}", a.country, a.number))
            }),
            Property::write_only("pin", |a: &mut Account, v: Option<String>| a.pin = v),
        ]
    }
}

// ──────────────────────────────────────────────────────────────
// Ciphers
// ──────────────────────────────────────────────────────────────

/// Real AES-GCM underneath, counting every call; optionally refuses to
/// encrypt one specific value
pub struct CountingCipher {
    inner: Aes256GcmCipher,
    encrypts: AtomicUsize,
    decrypts: AtomicUsize,
    poison: Option<&'static str>,
}

#[allow(dead_code)]
impl CountingCipher {
    pub fn new() -> Self {
        Self {
            inner: test_cipher(),
            encrypts: AtomicUsize::new(0),
            decrypts: AtomicUsize::new(0),
            poison: None,
        }
    }

    pub fn failing_on(value: &'static str) -> Self {
        Self {
            poison: Some(value),
            ..Self::new()
        }
    }

    pub fn encrypts(&self) -> usize {
        self.encrypts.load(Ordering::SeqCst)
    }

    pub fn decrypts(&self) -> usize {
        self.decrypts.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> usize {
        self.encrypts() + self.decrypts()
    }
}

impl CipherStrategy for CountingCipher {
    fn name(&self) -> &str {
        "counting"
    }

    fn encrypt(&self, plaintext: &str) -> CipherResult<String> {
        self.encrypts.fetch_add(1, Ordering::SeqCst);
        if self.poison == Some(plaintext) {
            return Err(CipherError::Other("refusing poisoned value".into()));
        }
        self.inner.encrypt(plaintext)
    }

    fn decrypt(&self, ciphertext: &str) -> CipherResult<String> {
        self.decrypts.fetch_add(1, Ordering::SeqCst);
        self.inner.decrypt(ciphertext)
    }
}

// ──────────────────────────────────────────────────────────────
// Wiring
// ──────────────────────────────────────────────────────────────

/// Engine with a counting cipher, an in-memory sink and its own registry
#[allow(dead_code)]
pub struct Harness {
    pub cipher: Arc<CountingCipher>,
    pub sink: Arc<MemorySink>,
    pub registry: Arc<DecodedStateRegistry>,
    pub engine: Arc<TransitionEngine>,
}

#[allow(dead_code)]
impl Harness {
    pub fn new() -> Self {
        Self::with(CountingCipher::new(), EngineSettings::default())
    }

    pub fn with_settings(settings: EngineSettings) -> Self {
        Self::with(CountingCipher::new(), settings)
    }

    pub fn with(cipher: CountingCipher, settings: EngineSettings) -> Self {
        let cipher = Arc::new(cipher);
        let sink = Arc::new(MemorySink::new());
        let registry = Arc::new(DecodedStateRegistry::new());
        let classifier = Arc::new(FieldClassifier::new(annotations()));
        let engine = TransitionEngine::new(cipher.clone(), classifier, registry.clone())
            .with_sink(sink.clone())
            .with_settings(settings);
        Self {
            cipher,
            sink,
            registry,
            engine: Arc::new(engine),
        }
    }

    pub fn listener(&self) -> FieldEncryptionListener {
        FieldEncryptionListener::new(self.engine.clone())
    }

    pub fn user_identity(id: i64) -> TrackedIdentity {
        TrackedIdentity::new("User", id)
    }
}

/// Vault over the real AES-GCM cipher, diagnostics into `sink`
#[allow(dead_code)]
pub fn vault(settings: EngineSettings, sink: Arc<MemorySink>) -> FieldVault {
    let cipher = accept(test_cipher()).expect("test cipher passes the capability check");
    let classifier = Arc::new(FieldClassifier::new(annotations()));
    FieldVault::new(cipher, classifier)
        .with_sink(sink)
        .with_settings(settings)
}
