//! Enum-or-raw-string extraction.
//!
//! Upstream records carry coded fields twice: a typed enum variant when the
//! source recognized the code, or a raw string fallback when it did not.
//! [`EnumExtractor`] resolves the pair into a single [`EnumResult`] so the
//! field engine can validate one value.

/// Implemented by wire enums that map variants to canonical string codes.
pub trait CanonicalEnum {
    /// Canonical string for this variant, or `None` for the unrecognized
    /// sentinel variant.
    fn canonical(&self) -> Option<&'static str>;
}

/// Outcome of resolving an enum/raw-string field pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnumResult {
    /// Neither the enum nor the raw string was set.
    NoValue,
    /// The enum was set to the unrecognized sentinel.
    InvalidValue,
    /// A usable string value, from the enum's canonical code or the raw field.
    Value(String),
}

type Accessor<M, T> = Box<dyn Fn(&M) -> T + Send + Sync>;

/// Extracts one coded field from messages of type `M`.
///
/// The enum accessor takes priority; the raw-string accessor is consulted only
/// when no enum variant is set.
pub struct EnumExtractor<M, E> {
    has_enum: Accessor<M, bool>,
    enum_value: Accessor<M, E>,
    has_raw: Accessor<M, bool>,
    raw_value: Accessor<M, String>,
}

impl<M, E: CanonicalEnum> EnumExtractor<M, E> {
    pub fn new(
        has_enum: impl Fn(&M) -> bool + Send + Sync + 'static,
        enum_value: impl Fn(&M) -> E + Send + Sync + 'static,
        has_raw: impl Fn(&M) -> bool + Send + Sync + 'static,
        raw_value: impl Fn(&M) -> String + Send + Sync + 'static,
    ) -> Self {
        Self {
            has_enum: Box::new(has_enum),
            enum_value: Box::new(enum_value),
            has_raw: Box::new(has_raw),
            raw_value: Box::new(raw_value),
        }
    }

    pub fn extract(&self, message: &M) -> EnumResult {
        if (self.has_enum)(message) {
            match (self.enum_value)(message).canonical() {
                Some(code) => EnumResult::Value(code.to_string()),
                None => EnumResult::InvalidValue,
            }
        } else if (self.has_raw)(message) {
            EnumResult::Value((self.raw_value)(message))
        } else {
            EnumResult::NoValue
        }
    }
}
