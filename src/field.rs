//! A single key/value pair within an [`crate::entry::Entry`].

use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// `key` is text; `value` is an arbitrary byte string (it may carry null
/// bytes, high bytes, anything). Fields are logically immutable once
/// added — [`crate::entry::Entry::update_field`] replaces the value rather
/// than mutating it in place, and zeroes the superseded bytes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    pub(crate) key: String,
    #[serde(with = "serde_bytes")]
    pub(crate) value: Vec<u8>,
}

impl Field {
    pub(crate) fn new(key: String, value: Vec<u8>) -> Self {
        Self { key, value }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &[u8] {
        &self.value
    }

    /// Replaces the value in place, zeroing the bytes it displaces before
    /// they are dropped.
    pub(crate) fn replace_value(&mut self, mut new_value: Vec<u8>) {
        std::mem::swap(&mut self.value, &mut new_value);
        new_value.zeroize();
    }
}

impl Drop for Field {
    fn drop(&mut self) {
        self.value.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_value_zeroes_old_bytes() {
        let mut field = Field::new("k".into(), vec![1, 2, 3, 4]);
        field.replace_value(vec![9, 9]);
        assert_eq!(field.value(), &[9, 9]);
    }

    #[test]
    fn value_round_trips_arbitrary_bytes() {
        let value = vec![0u8, 0xff, 1, 2, 3, 0, 255];
        let field = Field::new("k".into(), value.clone());
        assert_eq!(field.value(), value.as_slice());
    }
}
