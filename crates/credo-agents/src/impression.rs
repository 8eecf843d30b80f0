//! Per-agent impression tracking.
//!
//! An [`ImpressionLedger`] starts with no tracked affiliations. Each
//! encounter is folded in through [`ImpressionLedger::observe`]:
//!
//! - **First contact** with an affiliation starts tracking it with an
//!   impression of 0 and a contact count of 1. The triggering encounter's
//!   intensity is discarded.
//! - **Later contacts** add the encounter intensity (doubled for active
//!   encounters) and increment the count.
//!
//! Tracked affiliations keep their first-contact order, which is also the
//! order in which conversion checkpoints are evaluated.

use serde::{Deserialize, Serialize};

use credo_types::{AffiliationId, Encounter};

/// Accumulated impression of a single affiliation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackedAffiliation {
    /// The affiliation being tracked.
    pub affiliation_id: AffiliationId,
    /// Running impression score. Unbounded.
    pub impression: f64,
    /// Number of contacts, including post-decision increments.
    pub contacts: u32,
}

/// Impression scores and contact counts for every affiliation an agent has
/// encountered since its last conversion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImpressionLedger {
    entries: Vec<TrackedAffiliation>,
}

impl ImpressionLedger {
    /// Create an empty ledger.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Fold an encounter with `affiliation_id` into the ledger.
    pub fn observe(&mut self, affiliation_id: AffiliationId, encounter: &Encounter) {
        if let Some(entry) = self.entry_mut(affiliation_id) {
            entry.impression += encounter.weighted_intensity();
            entry.contacts = entry.contacts.saturating_add(1);
        } else {
            self.entries.push(TrackedAffiliation {
                affiliation_id,
                impression: 0.0,
                contacts: 1,
            });
        }
    }

    /// Impression score for an affiliation, if it is tracked.
    pub fn impression(&self, affiliation_id: AffiliationId) -> Option<f64> {
        self.entry(affiliation_id).map(|e| e.impression)
    }

    /// Contact count for an affiliation, if it is tracked.
    pub fn contacts(&self, affiliation_id: AffiliationId) -> Option<u32> {
        self.entry(affiliation_id).map(|e| e.contacts)
    }

    /// Whether the affiliation has been encountered since the last reset.
    pub fn is_tracked(&self, affiliation_id: AffiliationId) -> bool {
        self.entry(affiliation_id).is_some()
    }

    /// Tracked affiliations in first-contact order.
    pub fn iter(&self) -> impl Iterator<Item = &TrackedAffiliation> {
        self.entries.iter()
    }

    /// Number of tracked affiliations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no affiliation is tracked.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reset the impression of a tracked affiliation to zero.
    ///
    /// Returns `false` if the affiliation is not tracked.
    pub fn reset_impression(&mut self, affiliation_id: AffiliationId) -> bool {
        let Some(entry) = self.entry_mut(affiliation_id) else {
            return false;
        };
        entry.impression = 0.0;
        true
    }

    /// Halve the impression of a tracked affiliation.
    ///
    /// Returns `false` if the affiliation is not tracked.
    pub fn halve_impression(&mut self, affiliation_id: AffiliationId) -> bool {
        let Some(entry) = self.entry_mut(affiliation_id) else {
            return false;
        };
        entry.impression /= 2.0;
        true
    }

    /// Add one contact outside of an encounter, moving the count off a
    /// checkpoint after a decision.
    ///
    /// Returns `false` if the affiliation is not tracked.
    pub fn bump_contacts(&mut self, affiliation_id: AffiliationId) -> bool {
        let Some(entry) = self.entry_mut(affiliation_id) else {
            return false;
        };
        entry.contacts = entry.contacts.saturating_add(1);
        true
    }

    /// Forget every tracked affiliation.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn entry(&self, affiliation_id: AffiliationId) -> Option<&TrackedAffiliation> {
        self.entries
            .iter()
            .find(|e| e.affiliation_id == affiliation_id)
    }

    fn entry_mut(&mut self, affiliation_id: AffiliationId) -> Option<&mut TrackedAffiliation> {
        self.entries
            .iter_mut()
            .find(|e| e.affiliation_id == affiliation_id)
    }
}

#[cfg(test)]
mod tests {
    use credo_types::EncounterKind;

    use super::*;

    fn encounter(kind: EncounterKind, intensity: f64) -> Encounter {
        Encounter { kind, intensity }
    }

    #[test]
    fn first_contact_discards_intensity() {
        let mut ledger = ImpressionLedger::new();
        let target = AffiliationId::new();

        ledger.observe(target, &encounter(EncounterKind::Active, 7.5));

        assert_eq!(ledger.contacts(target), Some(1));
        assert_eq!(ledger.impression(target), Some(0.0));
    }

    #[test]
    fn later_contacts_accumulate_weighted_intensity() {
        let mut ledger = ImpressionLedger::new();
        let target = AffiliationId::new();

        ledger.observe(target, &encounter(EncounterKind::Passive, 1.0));
        ledger.observe(target, &encounter(EncounterKind::Passive, 1.5));
        ledger.observe(target, &encounter(EncounterKind::Active, 2.0));

        assert_eq!(ledger.contacts(target), Some(3));
        let impression = ledger.impression(target).unwrap_or(f64::NAN);
        assert!((impression - 5.5).abs() < 1e-12);
    }

    #[test]
    fn negative_intensity_lowers_impression() {
        let mut ledger = ImpressionLedger::new();
        let target = AffiliationId::new();

        ledger.observe(target, &encounter(EncounterKind::Passive, 0.0));
        ledger.observe(target, &encounter(EncounterKind::Active, -1.0));

        let impression = ledger.impression(target).unwrap_or(f64::NAN);
        assert!((impression + 2.0).abs() < 1e-12);
    }

    #[test]
    fn untracked_affiliation_is_none() {
        let ledger = ImpressionLedger::new();
        let target = AffiliationId::new();
        assert!(ledger.is_empty());
        assert!(!ledger.is_tracked(target));
        assert_eq!(ledger.impression(target), None);
        assert_eq!(ledger.contacts(target), None);
    }

    #[test]
    fn keeps_first_contact_order() {
        let mut ledger = ImpressionLedger::new();
        let first = AffiliationId::new();
        let second = AffiliationId::new();

        ledger.observe(second, &encounter(EncounterKind::Passive, 1.0));
        ledger.observe(first, &encounter(EncounterKind::Passive, 1.0));
        ledger.observe(second, &encounter(EncounterKind::Passive, 1.0));

        let order: Vec<AffiliationId> = ledger.iter().map(|e| e.affiliation_id).collect();
        assert_eq!(order, vec![second, first]);
    }

    #[test]
    fn decision_adjustments() {
        let mut ledger = ImpressionLedger::new();
        let target = AffiliationId::new();
        ledger.observe(target, &encounter(EncounterKind::Passive, 0.0));
        ledger.observe(target, &encounter(EncounterKind::Passive, 4.0));

        assert!(ledger.halve_impression(target));
        assert_eq!(ledger.impression(target), Some(2.0));

        assert!(ledger.bump_contacts(target));
        assert_eq!(ledger.contacts(target), Some(3));

        assert!(ledger.reset_impression(target));
        assert_eq!(ledger.impression(target), Some(0.0));

        assert!(!ledger.halve_impression(AffiliationId::new()));

        ledger.clear();
        assert!(ledger.is_empty());
    }
}
