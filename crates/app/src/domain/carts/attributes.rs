//! Selected attribute sets.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::domain::products::records::{AttributeUuid, AttributeValueUuid};

/// One chosen value of a product attribute, e.g. size "50ml".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedAttribute {
    pub attribute_uuid: AttributeUuid,
    pub value_uuid: AttributeValueUuid,
}

/// Attribute selections of a cart or order line, kept sorted by `(attribute, value)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<SelectedAttribute>")]
pub struct SelectedAttributes(SmallVec<[SelectedAttribute; 4]>);

impl SelectedAttributes {
    #[must_use]
    pub fn new(selected: impl IntoIterator<Item = SelectedAttribute>) -> Self {
        let mut selected: SmallVec<[SelectedAttribute; 4]> = selected.into_iter().collect();

        selected.sort_unstable();

        Self(selected)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SelectedAttribute> {
        self.0.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[SelectedAttribute] {
        &self.0
    }

    /// Whether the same attribute was selected more than once.
    #[must_use]
    pub fn has_repeated_attribute(&self) -> bool {
        self.0
            .windows(2)
            .any(|pair| matches!(pair, [a, b] if a.attribute_uuid == b.attribute_uuid))
    }

    /// Canonical text form used by the unique index on active cart lines.
    #[must_use]
    pub fn key(&self) -> String {
        self.0
            .iter()
            .map(|selected| format!("{}={}", selected.attribute_uuid, selected.value_uuid))
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl From<Vec<SelectedAttribute>> for SelectedAttributes {
    fn from(selected: Vec<SelectedAttribute>) -> Self {
        Self::new(selected)
    }
}

impl FromIterator<SelectedAttribute> for SelectedAttributes {
    fn from_iter<I: IntoIterator<Item = SelectedAttribute>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Order-independent equality of two selections. Absent and empty selections are equal.
#[must_use]
pub fn attributes_equal(existing: &[SelectedAttribute], incoming: &[SelectedAttribute]) -> bool {
    if existing.len() != incoming.len() {
        return false;
    }

    let mut existing = existing.to_vec();
    let mut incoming = incoming.to_vec();

    existing.sort_unstable();
    incoming.sort_unstable();

    existing == incoming
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pick() -> SelectedAttribute {
        SelectedAttribute {
            attribute_uuid: AttributeUuid::new(),
            value_uuid: AttributeValueUuid::new(),
        }
    }

    #[test]
    fn equality_ignores_order() {
        let size = pick();
        let colour = pick();

        assert!(attributes_equal(&[size, colour], &[colour, size]));
    }

    #[test]
    fn different_values_for_same_attribute_are_not_equal() {
        let size = pick();
        let other_size = SelectedAttribute {
            attribute_uuid: size.attribute_uuid,
            value_uuid: AttributeValueUuid::new(),
        };

        assert!(!attributes_equal(&[size], &[other_size]));
    }

    #[test]
    fn length_mismatch_is_not_equal() {
        let size = pick();

        assert!(!attributes_equal(&[size], &[size, pick()]));
        assert!(!attributes_equal(&[], &[size]));
    }

    #[test]
    fn empty_selections_are_equal() {
        assert!(attributes_equal(&[], &[]));
        assert_eq!(SelectedAttributes::default(), SelectedAttributes::new([]));
    }

    #[test]
    fn key_is_independent_of_input_order() {
        let size = pick();
        let colour = pick();

        let forwards = SelectedAttributes::new([size, colour]);
        let backwards = SelectedAttributes::new([colour, size]);

        assert_eq!(forwards.key(), backwards.key());
        assert_eq!(forwards, backwards);
        assert_eq!(SelectedAttributes::default().key(), "");
    }

    #[test]
    fn key_lists_sorted_pairs_separated_by_commas() {
        let first = pick();
        let second = pick();
        let (low, high) = if first <= second {
            (first, second)
        } else {
            (second, first)
        };

        let key = SelectedAttributes::new([high, low]).key();

        assert_eq!(
            key,
            format!(
                "{}={},{}={}",
                low.attribute_uuid, low.value_uuid, high.attribute_uuid, high.value_uuid
            )
        );
    }

    #[test]
    fn repeated_attribute_is_detected() {
        let size = pick();
        let other_size = SelectedAttribute {
            attribute_uuid: size.attribute_uuid,
            value_uuid: AttributeValueUuid::new(),
        };

        assert!(SelectedAttributes::new([size, other_size]).has_repeated_attribute());
        assert!(!SelectedAttributes::new([size, pick()]).has_repeated_attribute());
    }

    #[test]
    fn deserialising_sorts_the_selection() -> testresult::TestResult {
        let size = pick();
        let colour = pick();

        let json = serde_json::to_value([colour, size])?;
        let parsed: SelectedAttributes = serde_json::from_value(json)?;

        assert_eq!(parsed, SelectedAttributes::new([size, colour]));

        Ok(())
    }
}
