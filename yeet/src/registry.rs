//! Dense, order-agnostic set of eligible recipients
//!
//! An append-only backing array plus a slot map. Removal swaps the target
//! with the last live element and truncates, then fixes up the moved
//! element's recorded slot, so membership tests, insertion and removal are
//! all O(1) and the array never has gaps.

use arcade_core::Address;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{Result, YeetError};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EligibilitySet {
    members: Vec<Address>,
    slots: HashMap<Address, usize>,
}

impl EligibilitySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, principal: &str) -> Result<()> {
        if self.slots.contains_key(principal) {
            return Err(YeetError::AlreadyEligible(principal.to_string()));
        }
        self.slots.insert(principal.to_string(), self.members.len());
        self.members.push(principal.to_string());
        Ok(())
    }

    pub fn remove(&mut self, principal: &str) -> Result<()> {
        let slot = self
            .slots
            .remove(principal)
            .ok_or_else(|| YeetError::NotEligible(principal.to_string()))?;
        let last = self.members.len() - 1;
        self.members.swap(slot, last);
        self.members.pop();
        if slot < self.members.len() {
            self.slots.insert(self.members[slot].clone(), slot);
        }
        Ok(())
    }

    pub fn contains(&self, principal: &str) -> bool {
        self.slots.contains_key(principal)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn get(&self, slot: usize) -> Option<&str> {
        self.members.get(slot).map(String::as_str)
    }

    pub fn members(&self) -> &[Address] {
        &self.members
    }
}
