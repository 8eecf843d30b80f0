//! Affiliation registry and the exclusive membership partition.
//!
//! The [`AffiliationRegistry`] owns every affiliation's static attributes
//! together with its member set. All membership changes go through
//! [`enroll`](AffiliationRegistry::enroll) and
//! [`transfer`](AffiliationRegistry::transfer), which keep the invariant
//! that every agent belongs to exactly one affiliation.
//!
//! Statistics over a roster read from
//! [`snapshot_members`](AffiliationRegistry::snapshot_members), a copy that
//! later transfers cannot disturb.

use std::collections::{BTreeMap, BTreeSet};

use credo_types::{Affiliation, AffiliationId, AgentId};

use crate::error::RegistryError;

/// Owner of all affiliations and their member sets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AffiliationRegistry {
    /// Affiliations in registration order.
    affiliations: Vec<Affiliation>,
    /// Member set per affiliation.
    members: BTreeMap<AffiliationId, BTreeSet<AgentId>>,
    /// Reverse index: agent to its single affiliation.
    homes: BTreeMap<AgentId, AffiliationId>,
}

impl AffiliationRegistry {
    /// Create an empty registry.
    pub const fn new() -> Self {
        Self {
            affiliations: Vec::new(),
            members: BTreeMap::new(),
            homes: BTreeMap::new(),
        }
    }

    /// Register an affiliation with an empty member set.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateName`] if the name is taken.
    pub fn register(&mut self, affiliation: Affiliation) -> Result<AffiliationId, RegistryError> {
        if self.find_by_name(&affiliation.name).is_some() {
            return Err(RegistryError::DuplicateName(affiliation.name));
        }
        let id = affiliation.id;
        self.members.insert(id, BTreeSet::new());
        self.affiliations.push(affiliation);
        Ok(id)
    }

    /// Add an agent that does not yet belong anywhere to an affiliation.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::AffiliationNotFound`] for an unknown
    /// affiliation or [`RegistryError::AlreadyEnrolled`] if the agent is
    /// already a member somewhere.
    pub fn enroll(
        &mut self,
        agent_id: AgentId,
        affiliation_id: AffiliationId,
    ) -> Result<(), RegistryError> {
        if let Some(existing) = self.homes.get(&agent_id) {
            return Err(RegistryError::AlreadyEnrolled {
                agent_id,
                affiliation_id: *existing,
            });
        }
        let members = self
            .members
            .get_mut(&affiliation_id)
            .ok_or(RegistryError::AffiliationNotFound(affiliation_id))?;
        members.insert(agent_id);
        self.homes.insert(agent_id, affiliation_id);
        Ok(())
    }

    /// Move an agent from one affiliation to another in a single step.
    ///
    /// Nothing changes if any check fails.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::AffiliationNotFound`] if either affiliation
    /// is unknown, or [`RegistryError::NotAMember`] if the agent does not
    /// currently belong to `from`.
    pub fn transfer(
        &mut self,
        agent_id: AgentId,
        from: AffiliationId,
        to: AffiliationId,
    ) -> Result<(), RegistryError> {
        if !self.members.contains_key(&to) {
            return Err(RegistryError::AffiliationNotFound(to));
        }
        let source = self
            .members
            .get_mut(&from)
            .ok_or(RegistryError::AffiliationNotFound(from))?;
        if !source.remove(&agent_id) {
            return Err(RegistryError::NotAMember {
                agent_id,
                affiliation_id: from,
            });
        }
        if let Some(target) = self.members.get_mut(&to) {
            target.insert(agent_id);
        }
        self.homes.insert(agent_id, to);
        Ok(())
    }

    /// Copy of an affiliation's current member set.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::AffiliationNotFound`] for an unknown
    /// affiliation.
    pub fn snapshot_members(
        &self,
        affiliation_id: AffiliationId,
    ) -> Result<BTreeSet<AgentId>, RegistryError> {
        self.members
            .get(&affiliation_id)
            .cloned()
            .ok_or(RegistryError::AffiliationNotFound(affiliation_id))
    }

    /// Number of members of an affiliation (0 if unknown).
    pub fn member_count(&self, affiliation_id: AffiliationId) -> usize {
        self.members.get(&affiliation_id).map_or(0, BTreeSet::len)
    }

    /// Whether the agent currently belongs to the affiliation.
    pub fn is_member(&self, agent_id: AgentId, affiliation_id: AffiliationId) -> bool {
        self.homes.get(&agent_id) == Some(&affiliation_id)
    }

    /// The affiliation an agent belongs to.
    pub fn home_of(&self, agent_id: AgentId) -> Option<AffiliationId> {
        self.homes.get(&agent_id).copied()
    }

    /// Look up an affiliation's attributes.
    pub fn get(&self, affiliation_id: AffiliationId) -> Option<&Affiliation> {
        self.affiliations.iter().find(|a| a.id == affiliation_id)
    }

    /// Look up an affiliation by name.
    pub fn find_by_name(&self, name: &str) -> Option<&Affiliation> {
        self.affiliations.iter().find(|a| a.name == name)
    }

    /// Affiliations in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Affiliation> {
        self.affiliations.iter()
    }

    /// Affiliation IDs in registration order.
    pub fn ids(&self) -> Vec<AffiliationId> {
        self.affiliations.iter().map(|a| a.id).collect()
    }

    /// Number of registered affiliations.
    pub fn len(&self) -> usize {
        self.affiliations.len()
    }

    /// Whether no affiliation is registered.
    pub fn is_empty(&self) -> bool {
        self.affiliations.is_empty()
    }

    /// Verify that `agents` is partitioned exactly by the member sets.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::PartitionViolated`] if an agent is missing,
    /// belongs to more than one affiliation, or an unknown agent is a member.
    pub fn check_partition<'a, I>(&self, agents: I) -> Result<(), RegistryError>
    where
        I: IntoIterator<Item = &'a AgentId>,
    {
        let expected: BTreeSet<AgentId> = agents.into_iter().copied().collect();
        let mut seen: BTreeSet<AgentId> = BTreeSet::new();

        for (affiliation_id, members) in &self.members {
            for agent_id in members {
                if !seen.insert(*agent_id) {
                    return Err(RegistryError::PartitionViolated {
                        reason: format!("agent {agent_id} appears in more than one member set"),
                    });
                }
                if !expected.contains(agent_id) {
                    return Err(RegistryError::PartitionViolated {
                        reason: format!("unknown agent {agent_id} is a member of {affiliation_id}"),
                    });
                }
                if self.homes.get(agent_id) != Some(affiliation_id) {
                    return Err(RegistryError::PartitionViolated {
                        reason: format!("home index for {agent_id} disagrees with member sets"),
                    });
                }
            }
        }

        if let Some(missing) = expected.difference(&seen).next() {
            return Err(RegistryError::PartitionViolated {
                reason: format!("agent {missing} belongs to no affiliation"),
            });
        }
        Ok(())
    }
}
