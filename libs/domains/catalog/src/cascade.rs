//! Status cascade policy and results.
//!
//! Deactivating a catalog node propagates down the hierarchy. How far it
//! propagates is a deployment decision, not a hardcoded behavior: the policy
//! is injected into [`crate::service::CatalogService`] at construction.
//!
//! The traversal itself is an explicit worklist over the tree (no recursion)
//! and runs inside a single database transaction per top-level call, so a
//! failure partway never leaves a half-cascaded tree.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Category, SubCategory};

/// How deep a deactivation cascade reaches.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CascadeDepth {
    /// Flip only the node itself
    CategoryOnly,
    /// Flip the node and its subcategories, leave products untouched
    Subcategories,
    /// Flip the node, its subcategories and their products
    #[default]
    FullDepth,
}

impl CascadeDepth {
    /// Whether a category deactivation touches its subcategories.
    pub fn includes_subcategories(&self) -> bool {
        !matches!(self, CascadeDepth::CategoryOnly)
    }

    /// Whether a deactivation reaches down to products.
    pub fn includes_products(&self) -> bool {
        matches!(self, CascadeDepth::FullDepth)
    }
}

/// Cascade configuration injected into the catalog service.
///
/// Ordering (flip-parent-first vs. cascade-during-validation) varied across
/// earlier revisions of this system; with the whole traversal inside one
/// transaction the two are indistinguishable, so only depth remains
/// configurable.
#[derive(Debug, Clone, Copy, Default)]
pub struct CascadePolicy {
    pub depth: CascadeDepth,
}

impl CascadePolicy {
    pub fn new(depth: CascadeDepth) -> Self {
        Self { depth }
    }
}

/// Nodes flipped by a category deactivation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CascadeReport {
    /// The category, after the flip
    pub category: Category,
    /// Subcategories deactivated by the walk
    pub deactivated_subcategories: Vec<Uuid>,
    /// Products deactivated by the walk
    pub deactivated_products: Vec<Uuid>,
}

impl CascadeReport {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            deactivated_subcategories: Vec::new(),
            deactivated_products: Vec::new(),
        }
    }
}

/// Nodes flipped by a subcategory deactivation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubCategoryCascadeReport {
    /// The subcategory, after the flip
    pub sub_category: SubCategory,
    /// Products deactivated by the walk
    pub deactivated_products: Vec<Uuid>,
}

impl SubCategoryCascadeReport {
    pub fn new(sub_category: SubCategory) -> Self {
        Self {
            sub_category,
            deactivated_products: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_depth_category_only_touches_nothing_below() {
        let depth = CascadeDepth::CategoryOnly;
        assert!(!depth.includes_subcategories());
        assert!(!depth.includes_products());
    }

    #[test]
    fn test_depth_subcategories_stops_above_products() {
        let depth = CascadeDepth::Subcategories;
        assert!(depth.includes_subcategories());
        assert!(!depth.includes_products());
    }

    #[test]
    fn test_depth_full_reaches_products() {
        let depth = CascadeDepth::FullDepth;
        assert!(depth.includes_subcategories());
        assert!(depth.includes_products());
    }

    #[test]
    fn test_default_depth_is_full() {
        assert_eq!(CascadeDepth::default(), CascadeDepth::FullDepth);
    }

    #[test]
    fn test_depth_parses_from_snake_case() {
        assert_eq!(
            CascadeDepth::from_str("category_only").unwrap(),
            CascadeDepth::CategoryOnly
        );
        assert_eq!(
            CascadeDepth::from_str("subcategories").unwrap(),
            CascadeDepth::Subcategories
        );
        assert_eq!(
            CascadeDepth::from_str("full_depth").unwrap(),
            CascadeDepth::FullDepth
        );
        assert!(CascadeDepth::from_str("everything").is_err());
    }
}
