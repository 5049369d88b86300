//! Identifiers carried between steps

use std::fmt;

/// Name of one identifier slot in [`SharedState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateKey {
    FarmerId,
    BuyerId,
    ListingId,
    ProposalId,
    ContractId,
}

impl StateKey {
    /// All keys, in the order steps produce them
    pub const ALL: [StateKey; 5] = [
        StateKey::FarmerId,
        StateKey::BuyerId,
        StateKey::ListingId,
        StateKey::ProposalId,
        StateKey::ContractId,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StateKey::FarmerId => "farmer_id",
            StateKey::BuyerId => "buyer_id",
            StateKey::ListingId => "listing_id",
            StateKey::ProposalId => "proposal_id",
            StateKey::ContractId => "contract_id",
        }
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifiers returned by the server, filled in as steps succeed
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SharedState {
    pub farmer_id: Option<String>,
    pub buyer_id: Option<String>,
    pub listing_id: Option<String>,
    pub proposal_id: Option<String>,
    pub contract_id: Option<String>,
}

impl SharedState {
    pub fn get(&self, key: StateKey) -> Option<&str> {
        self.slot(key).as_deref()
    }

    pub fn set(&mut self, key: StateKey, value: impl Into<String>) {
        *self.slot_mut(key) = Some(value.into());
    }

    /// Keys from `required` that have not been populated yet
    pub fn missing(&self, required: &[StateKey]) -> Vec<StateKey> {
        required
            .iter()
            .copied()
            .filter(|key| self.get(*key).is_none())
            .collect()
    }

    /// Populated keys with their values, in production order
    pub fn entries(&self) -> Vec<(StateKey, &str)> {
        StateKey::ALL
            .iter()
            .filter_map(|key| self.get(*key).map(|value| (*key, value)))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    fn slot(&self, key: StateKey) -> &Option<String> {
        match key {
            StateKey::FarmerId => &self.farmer_id,
            StateKey::BuyerId => &self.buyer_id,
            StateKey::ListingId => &self.listing_id,
            StateKey::ProposalId => &self.proposal_id,
            StateKey::ContractId => &self.contract_id,
        }
    }

    fn slot_mut(&mut self, key: StateKey) -> &mut Option<String> {
        match key {
            StateKey::FarmerId => &mut self.farmer_id,
            StateKey::BuyerId => &mut self.buyer_id,
            StateKey::ListingId => &mut self.listing_id,
            StateKey::ProposalId => &mut self.proposal_id,
            StateKey::ContractId => &mut self.contract_id,
        }
    }
}
