// SPDX-FileCopyrightText: 2026 Kyupi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Canonical ordering of user pairs and the tagged mutuality result.
//!
//! Every reader and writer of match rows goes through [`CanonicalPair`], so
//! `(a, b)` and `(b, a)` always resolve to the same storage key.

use std::cmp::Ordering;

use crate::error::KyupiError;
use crate::types::UserId;

/// An unordered pair of distinct users stored as `(low, high)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CanonicalPair {
    low: UserId,
    high: UserId,
}

impl CanonicalPair {
    /// Order two identities. Fails with [`KyupiError::InvalidPair`] when they are equal.
    pub fn new(a: UserId, b: UserId) -> Result<Self, KyupiError> {
        match a.cmp(&b) {
            Ordering::Less => Ok(Self { low: a, high: b }),
            Ordering::Greater => Ok(Self { low: b, high: a }),
            Ordering::Equal => Err(KyupiError::InvalidPair),
        }
    }

    pub fn low(&self) -> UserId {
        self.low
    }

    pub fn high(&self) -> UserId {
        self.high
    }

    /// Whether `user` is one of the two members.
    pub fn contains(&self, user: &UserId) -> bool {
        self.low == *user || self.high == *user
    }

    /// Storage key columns as text, in `(user_low, user_high)` order.
    pub fn key(&self) -> (String, String) {
        (self.low.to_string(), self.high.to_string())
    }
}

/// Outcome of looking up the reciprocal like.
///
/// `Indeterminate` keeps the lookup failure so it can never be mistaken for
/// `NotMutual`.
#[derive(Debug)]
pub enum Mutuality {
    Mutual,
    NotMutual,
    Indeterminate(KyupiError),
}

impl Mutuality {
    /// Classify the result of a reciprocal-like lookup.
    pub fn from_lookup(lookup: Result<bool, KyupiError>) -> Self {
        match lookup {
            Ok(true) => Mutuality::Mutual,
            Ok(false) => Mutuality::NotMutual,
            Err(e) => Mutuality::Indeterminate(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use uuid::Uuid;

    fn user(bytes: [u8; 16]) -> UserId {
        UserId(Uuid::from_bytes(bytes))
    }

    #[test]
    fn self_pair_is_rejected() {
        let a = UserId::new();
        assert!(matches!(
            CanonicalPair::new(a, a),
            Err(KyupiError::InvalidPair)
        ));
    }

    #[test]
    fn low_is_strictly_less_than_high() {
        let a = user([1; 16]);
        let b = user([2; 16]);
        let pair = CanonicalPair::new(b, a).unwrap();
        assert_eq!(pair.low(), a);
        assert_eq!(pair.high(), b);
        assert!(pair.contains(&a));
        assert!(pair.contains(&b));
        assert!(!pair.contains(&user([3; 16])));
    }

    #[test]
    fn mutuality_keeps_lookup_errors() {
        assert!(matches!(Mutuality::from_lookup(Ok(true)), Mutuality::Mutual));
        assert!(matches!(
            Mutuality::from_lookup(Ok(false)),
            Mutuality::NotMutual
        ));
        let failed = Mutuality::from_lookup(Err(KyupiError::storage("disk gone")));
        assert!(matches!(
            failed,
            Mutuality::Indeterminate(KyupiError::StorageUnavailable { .. })
        ));
    }

    proptest! {
        #[test]
        fn canonicalization_is_symmetric(a in any::<[u8; 16]>(), b in any::<[u8; 16]>()) {
            prop_assume!(a != b);
            let (a, b) = (user(a), user(b));
            prop_assert_eq!(CanonicalPair::new(a, b).unwrap(), CanonicalPair::new(b, a).unwrap());
        }

        // The SQL layer compares the text columns, so the in-memory order must agree.
        #[test]
        fn order_agrees_with_stored_text(a in any::<[u8; 16]>(), b in any::<[u8; 16]>()) {
            prop_assume!(a != b);
            let pair = CanonicalPair::new(user(a), user(b)).unwrap();
            let (low, high) = pair.key();
            prop_assert!(low < high);
        }
    }
}
