//! aiorc-capability
#![deny(unsafe_code)]
#![warn(missing_docs)]
//!
//! Maps a [`Category`] to the [`FeatureFlags`] it requires, and checks
//! whether a given [`CapabilityDescriptor`] satisfies a category. Used by
//! the Provider Registry's `select_auto` (spec §4.2) to filter candidates
//! before ranking by intelligence score.

use aiorc_core::{Category, FeatureFlags};

/// A single required flag, named for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredFlag {
    /// Flag name, e.g. `"supports_images"`.
    pub name: &'static str,
    /// Accessor for the flag's value on a [`FeatureFlags`] instance.
    pub get: fn(&FeatureFlags) -> bool,
}

/// Why a descriptor failed to satisfy a category's requirements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsatisfiedRequirement {
    /// The flag that was required but missing.
    pub flag: &'static str,
}

/// Return the flags a [`Category`] requires. Categories with no special
/// requirement (fast, reasoning, coding, long_context, general) return an
/// empty list — any registered model is eligible on capability grounds
/// alone, subject to availability and restriction-policy filtering done
/// elsewhere.
#[must_use]
pub fn required_flags(category: Category) -> &'static [RequiredFlag] {
    const VISION: &[RequiredFlag] = &[RequiredFlag {
        name: "supports_images",
        get: |f| f.supports_images,
    }];
    const NONE: &[RequiredFlag] = &[];

    match category {
        Category::Vision => VISION,
        Category::Fast
        | Category::Reasoning
        | Category::Coding
        | Category::LongContext
        | Category::General => NONE,
    }
}

/// Check whether `features` satisfies every flag required by `category`.
#[must_use]
pub fn satisfies_category(features: &FeatureFlags, category: Category) -> bool {
    unsatisfied(features, category).is_empty()
}

/// Return every requirement of `category` that `features` fails to meet.
/// An empty result means `features` satisfies the category.
#[must_use]
pub fn unsatisfied(features: &FeatureFlags, category: Category) -> Vec<UnsatisfiedRequirement> {
    required_flags(category)
        .iter()
        .filter(|req| !(req.get)(features))
        .map(|req| UnsatisfiedRequirement { flag: req.name })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(supports_images: bool) -> FeatureFlags {
        FeatureFlags {
            supports_images,
            ..FeatureFlags::default()
        }
    }

    #[test]
    fn vision_requires_supports_images() {
        assert!(!satisfies_category(&flags(false), Category::Vision));
        assert!(satisfies_category(&flags(true), Category::Vision));
    }

    #[test]
    fn non_vision_categories_have_no_requirement() {
        for cat in [
            Category::Fast,
            Category::Reasoning,
            Category::Coding,
            Category::LongContext,
            Category::General,
        ] {
            assert!(satisfies_category(&flags(false), cat));
        }
    }

    #[test]
    fn unsatisfied_names_the_missing_flag() {
        let missing = unsatisfied(&flags(false), Category::Vision);
        assert_eq!(missing, vec![UnsatisfiedRequirement { flag: "supports_images" }]);
    }
}
