//! Shared test utilities for domain testing
//!
//! This crate provides reusable test infrastructure for all domain crates:
//! - `TestDataBuilder`: Deterministic test data generation
//!
//! # Usage
//!
//! ```rust
//! use test_utils::TestDataBuilder;
//!
//! let builder = TestDataBuilder::from_test_name("my_test");
//!
//! let user_id = builder.user_id();
//! let category_name = builder.name("category", "main");
//! ```

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use uuid::Uuid;

/// Builder for test data with deterministic randomization
///
/// This ensures tests are reproducible by deriving all data from a seed, and
/// that parallel tests don't collide on unique columns by deriving the seed
/// from the test name.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    /// Derive a builder from the test name
    pub fn from_test_name(name: &str) -> Self {
        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self {
            seed: hasher.finish(),
        }
    }

    /// A unique, reproducible name for an entity
    pub fn name(&self, kind: &str, label: &str) -> String {
        format!("{}-{}-{:08x}", kind, label, self.seed as u32)
    }

    /// A unique, reproducible email address
    pub fn email(&self, label: &str) -> String {
        format!("{}-{:08x}@example.com", label, self.seed as u32)
    }

    /// A reproducible user ID
    pub fn user_id(&self) -> Uuid {
        Uuid::from_u64_pair(self.seed, self.seed.rotate_left(17))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_name_same_data() {
        let a = TestDataBuilder::from_test_name("alpha");
        let b = TestDataBuilder::from_test_name("alpha");
        assert_eq!(a.user_id(), b.user_id());
        assert_eq!(a.name("x", "y"), b.name("x", "y"));
        assert_eq!(a.email("buyer"), b.email("buyer"));
    }

    #[test]
    fn test_different_names_differ() {
        let a = TestDataBuilder::from_test_name("alpha");
        let b = TestDataBuilder::from_test_name("beta");
        assert_ne!(a.user_id(), b.user_id());
        assert_ne!(a.name("x", "y"), b.name("x", "y"));
    }
}
