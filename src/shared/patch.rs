/**
 * Tri-state Field Updates
 *
 * Partial updates need to tell three situations apart for nullable columns:
 * the field was left out of the payload, the field was sent as `null`, and
 * the field was sent with a value. `Option<T>` alone cannot carry that.
 *
 * `Patch<T>` deserializes from JSON as follows (with `#[serde(default)]` on
 * the field):
 *
 * - field absent      -> `Patch::Unset`
 * - `"field": null`   -> `Patch::Clear`
 * - `"field": value`  -> `Patch::Set(value)`
 */

use serde::{Deserialize, Deserializer};

/// A partial-update instruction for a single nullable field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    /// Leave the stored value untouched
    Unset,
    /// Clear the stored value
    Clear,
    /// Replace the stored value
    Set(T),
}

impl<T> Patch<T> {
    /// Apply this patch to the current value
    pub fn apply(self, current: Option<T>) -> Option<T> {
        match self {
            Patch::Unset => current,
            Patch::Clear => None,
            Patch::Set(value) => Some(value),
        }
    }
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Unset
    }
}

impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Patch::Set(value),
            None => Patch::Clear,
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Patch::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Deserialize)]
    struct Payload {
        #[serde(default)]
        bio: Patch<String>,
    }

    #[test]
    fn test_absent_field_is_unset() {
        let payload: Payload = serde_json::from_str("{}").unwrap();
        assert_eq!(payload.bio, Patch::Unset);
    }

    #[test]
    fn test_null_field_is_clear() {
        let payload: Payload = serde_json::from_str(r#"{"bio": null}"#).unwrap();
        assert_eq!(payload.bio, Patch::Clear);
    }

    #[test]
    fn test_value_field_is_set() {
        let payload: Payload = serde_json::from_str(r#"{"bio": "hello"}"#).unwrap();
        assert_eq!(payload.bio, Patch::Set("hello".to_string()));
    }

    #[test]
    fn test_apply() {
        let current = Some("old".to_string());
        assert_eq!(Patch::Unset.apply(current.clone()), Some("old".to_string()));
        assert_eq!(Patch::<String>::Clear.apply(current.clone()), None);
        assert_eq!(
            Patch::Set("new".to_string()).apply(current),
            Some("new".to_string())
        );
    }
}
