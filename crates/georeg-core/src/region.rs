//! Jurisdiction label resolution.

/// Labels offered for interactive region selection.
pub const KNOWN_LABELS: &[&str] = &["EU/EEA", "US-CA", "US-UT", "US-FL", "US"];

/// An optional restriction of classification to one jurisdiction.
///
/// Absence of a constraint is represented by `None` codes, never by an
/// empty list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RegionConstraint {
    label: Option<String>,
    codes: Option<Vec<String>>,
}

impl RegionConstraint {
    /// No constraint: the backend infers regions itself.
    pub fn none() -> Self {
        Self::default()
    }

    /// Constrain to the jurisdiction named by a user-facing label.
    ///
    /// The composite "EU/EEA" label resolves to the single backend code
    /// "EU"; any other non-empty label is assumed to already be a valid
    /// backend region code (e.g. "US-UT") and passes through verbatim.
    /// An empty label means no constraint.
    pub fn assume(label: &str) -> Self {
        let label = label.trim();
        if label.is_empty() {
            return Self::none();
        }
        let code = if label == "EU/EEA" { "EU" } else { label };
        Self {
            label: Some(label.to_string()),
            codes: Some(vec![code.to_string()]),
        }
    }

    /// The user-facing label, used for the single-request assumption
    /// annotation.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn codes(&self) -> Option<&[String]> {
        self.codes.as_deref()
    }

    /// Owned copy of the resolved codes for a request payload.
    pub fn to_codes(&self) -> Option<Vec<String>> {
        self.codes.clone()
    }

    pub fn is_active(&self) -> bool {
        self.codes.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_label_means_no_constraint() {
        assert_eq!(RegionConstraint::none().to_codes(), None);
        assert!(!RegionConstraint::none().is_active());
    }

    #[test]
    fn empty_label_means_no_constraint() {
        assert_eq!(RegionConstraint::assume("").to_codes(), None);
        assert_eq!(RegionConstraint::assume("   ").to_codes(), None);
    }

    #[test]
    fn eu_eea_resolves_to_eu() {
        let constraint = RegionConstraint::assume("EU/EEA");
        assert_eq!(constraint.to_codes(), Some(vec!["EU".to_string()]));
        assert_eq!(constraint.label(), Some("EU/EEA"));
    }

    #[test]
    fn other_labels_pass_through_verbatim() {
        assert_eq!(
            RegionConstraint::assume("US-UT").to_codes(),
            Some(vec!["US-UT".to_string()])
        );
    }

    #[test]
    fn codes_are_never_an_empty_list() {
        for label in ["", " ", "EU/EEA", "US-CA", "whatever"] {
            let constraint = RegionConstraint::assume(label);
            if let Some(codes) = constraint.codes() {
                assert!(!codes.is_empty());
            }
        }
    }
}
