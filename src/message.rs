//! The translatable message value handed to a localizer.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// A message to translate: its id plus optional template data and plural count.
///
/// # Example
///
/// ```rust
/// use lingo::Message;
/// use serde_json::json;
///
/// let message = Message::new("unread")
///     .with_data(json!({ "name": "Ada" }))
///     .with_plural_count(3u64);
/// assert_eq!(message.id, "unread");
/// ```
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct Message {
    /// Message identifier; must be non-empty when translated.
    pub id: String,

    /// Template context, usually a JSON object keyed by field name.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub data: Option<Value>,

    /// Count used to pick a plural form.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub plural_count: Option<Number>,
}

impl Message {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            data: None,
            plural_count: None,
        }
    }

    /// Sets the template data.
    pub fn with_data(mut self, data: impl Into<Value>) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Sets the plural count.
    pub fn with_plural_count(mut self, count: impl Into<Number>) -> Self {
        self.plural_count = Some(count.into());
        self
    }

    /// Sets a fractional plural count such as `1.5`.
    ///
    /// NaN and infinite values cannot be represented and leave the count unset.
    pub fn with_plural_count_f64(mut self, count: f64) -> Self {
        self.plural_count = Number::from_f64(count);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_message_has_only_id() {
        let message = Message::new("test.id");
        assert_eq!(message.id, "test.id");
        assert!(message.data.is_none());
        assert!(message.plural_count.is_none());
    }

    #[test]
    fn test_builder_chaining() {
        let message = Message::new("test.id")
            .with_data(json!({ "name": "John" }))
            .with_plural_count(3u32);

        assert_eq!(message.data, Some(json!({ "name": "John" })));
        assert_eq!(message.plural_count, Some(Number::from(3u32)));
    }

    #[test]
    fn test_with_data_accepts_plain_values() {
        assert_eq!(Message::new("a").with_data("hello").data, Some(json!("hello")));
        assert_eq!(Message::new("a").with_data(42).data, Some(json!(42)));
        assert_eq!(
            Message::new("a").with_data(vec!["a", "b"]).data,
            Some(json!(["a", "b"]))
        );
    }

    #[test]
    fn test_with_plural_count_accepts_floats() {
        let message = Message::new("a").with_plural_count_f64(42.5);
        assert_eq!(message.plural_count, Number::from_f64(42.5));
        assert_eq!(message.plural_count.unwrap().as_f64(), Some(42.5));
    }

    #[test]
    fn test_with_plural_count_f64_ignores_non_finite() {
        assert!(Message::new("a").with_plural_count_f64(f64::NAN).plural_count.is_none());
        assert!(
            Message::new("a")
                .with_plural_count(2u8)
                .with_plural_count_f64(f64::INFINITY)
                .plural_count
                .is_none()
        );
    }

    #[test]
    fn test_message_serde() {
        let message = Message::new("hello").with_data(json!({ "name": "World" }));
        let encoded = serde_json::to_string(&message).unwrap();
        assert_eq!(encoded, r#"{"id":"hello","data":{"name":"World"}}"#);
    }
}
