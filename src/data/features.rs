//! Feature Catalog Module
//! Fixed mapping from dropdown labels to dataset columns.

use thiserror::Error;

/// Raised when a selector label has no catalog entry. The dropdowns only
/// offer catalog labels, so hitting this means a wiring bug, not bad input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("no dataset field is mapped to '{0}'")]
pub struct UnknownFeature(pub String);

/// How a field is filtered and charted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Numeric with a wide value range: range slider, histogram.
    Continuous,
    /// Everything else, regardless of cardinality: multiselect, pie/grouping.
    Categorical,
}

/// One selectable field: display label, backing column, classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Feature {
    pub label: &'static str,
    pub column: &'static str,
    pub kind: FieldKind,
}

/// Selector catalog, in dropdown order. Continuous is exactly
/// {Income, Age, Days After Last Purchase}.
pub static FEATURES: [Feature; 8] = [
    Feature {
        label: "Education Level",
        column: "Education",
        kind: FieldKind::Categorical,
    },
    Feature {
        label: "Marital Status",
        column: "Marital_Status",
        kind: FieldKind::Categorical,
    },
    Feature {
        label: "Income",
        column: "Income",
        kind: FieldKind::Continuous,
    },
    Feature {
        label: "Nos of Kid",
        column: "Kidhome",
        kind: FieldKind::Categorical,
    },
    Feature {
        label: "Nos of Teen",
        column: "Teenhome",
        kind: FieldKind::Categorical,
    },
    Feature {
        label: "Years of Enrollment",
        column: "nos_year_enroll",
        kind: FieldKind::Categorical,
    },
    Feature {
        label: "Days After Last Purchase",
        column: "Recency",
        kind: FieldKind::Continuous,
    },
    Feature {
        label: "Age",
        column: "Age",
        kind: FieldKind::Continuous,
    },
];

/// Spend columns with display labels, in 3x2 grid order.
pub const SPEND_ITEMS: [(&str, &str); 6] = [
    ("MntWines", "Wines"),
    ("MntFruits", "Fruits"),
    ("MntMeatProducts", "Meat Products"),
    ("MntFishProducts", "Fish Products"),
    ("MntSweetProducts", "Sweet Products"),
    ("MntGoldProds", "Gold Products"),
];

/// Campaign acceptance flag columns.
pub const CAMPAIGNS: [&str; 5] = [
    "AcceptedCmp1",
    "AcceptedCmp2",
    "AcceptedCmp3",
    "AcceptedCmp4",
    "AcceptedCmp5",
];

/// Resolve a dropdown label to its catalog entry.
pub fn feature_by_label(label: &str) -> Result<&'static Feature, UnknownFeature> {
    FEATURES
        .iter()
        .find(|f| f.label == label)
        .ok_or_else(|| UnknownFeature(label.to_string()))
}

/// Labels for the category and filter dropdowns, in display order.
pub fn feature_options() -> Vec<&'static str> {
    FEATURES.iter().map(|f| f.label).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn continuous_fields_are_exactly_three() {
        let continuous: Vec<&str> = FEATURES
            .iter()
            .filter(|f| f.kind == FieldKind::Continuous)
            .map(|f| f.label)
            .collect();
        assert_eq!(
            continuous,
            vec!["Income", "Days After Last Purchase", "Age"]
        );
    }

    #[test]
    fn every_label_resolves() {
        for label in feature_options() {
            let feature = feature_by_label(label).unwrap();
            assert_eq!(feature.label, label);
        }
    }

    #[test]
    fn unknown_label_is_an_error() {
        let err = feature_by_label("Shoe Size").unwrap_err();
        assert_eq!(err, UnknownFeature("Shoe Size".to_string()));
    }

    #[test]
    fn derived_columns_are_in_the_catalog() {
        assert!(FEATURES.iter().any(|f| f.column == "Age"));
        assert!(FEATURES.iter().any(|f| f.column == "nos_year_enroll"));
    }
}
