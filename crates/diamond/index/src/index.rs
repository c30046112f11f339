use std::collections::HashMap;

use diamond_types::{FacetAddress, Selector, SLOT_CAPACITY};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::IndexError;

type Slot = [Selector; SLOT_CAPACITY];

/// Where an assigned selector lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorRecord {
    pub facet: FacetAddress,
    pub slot: u32,
    pub position: u8,
}

/// Arena key for one packed slot of a facet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotKey {
    pub facet: FacetAddress,
    pub slot: u32,
}

#[derive(Clone, Copy, Debug)]
struct FacetEntry {
    selector_count: u32,
    /// Position in `facet_order`.
    order: usize,
}

/// Split a facet-local selector index into (slot number, position in slot).
fn locate(index: usize) -> (u32, usize) {
    ((index / SLOT_CAPACITY) as u32, index % SLOT_CAPACITY)
}

fn corrupted(msg: impl Into<String>) -> IndexError {
    IndexError::Corrupted(msg.into())
}

/// Packed selector index.
///
/// Mutations are only issued by the cut engine, which stages them on a clone
/// so a failed batch never leaves a partially applied index behind.
#[derive(Clone, Debug, Default)]
pub struct SelectorIndex {
    records: HashMap<Selector, SelectorRecord>,
    slots: HashMap<SlotKey, Slot>,
    facets: HashMap<FacetAddress, FacetEntry>,
    /// Facets with at least one selector, in first-assigned order.
    facet_order: Vec<FacetAddress>,
}

impl SelectorIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Facet currently implementing `selector`.
    pub fn lookup(&self, selector: &Selector) -> Option<FacetAddress> {
        self.records.get(selector).map(|r| r.facet)
    }

    pub fn record(&self, selector: &Selector) -> Option<&SelectorRecord> {
        self.records.get(selector)
    }

    pub fn contains(&self, selector: &Selector) -> bool {
        self.records.contains_key(selector)
    }

    /// Selectors of `facet` in slot order. Empty for unknown facets.
    pub fn selectors_of(&self, facet: &FacetAddress) -> Vec<Selector> {
        let Some(entry) = self.facets.get(facet) else {
            return Vec::new();
        };
        let count = entry.selector_count as usize;
        let mut out = Vec::with_capacity(count);
        for slot in 0..count.div_ceil(SLOT_CAPACITY) {
            let key = SlotKey {
                facet: *facet,
                slot: slot as u32,
            };
            if let Some(packed) = self.slots.get(&key) {
                let filled = (count - slot * SLOT_CAPACITY).min(SLOT_CAPACITY);
                out.extend_from_slice(&packed[..filled]);
            }
        }
        out
    }

    /// Facets owning at least one selector.
    pub fn facets(&self) -> &[FacetAddress] {
        &self.facet_order
    }

    pub fn selector_count(&self, facet: &FacetAddress) -> usize {
        self.facets
            .get(facet)
            .map_or(0, |e| e.selector_count as usize)
    }

    pub fn slot_count(&self, facet: &FacetAddress) -> usize {
        self.slots.keys().filter(|k| k.facet == *facet).count()
    }

    /// Every assigned selector, grouped by facet in enumeration order.
    pub fn all_selectors(&self) -> Vec<Selector> {
        self.facet_order
            .iter()
            .flat_map(|f| self.selectors_of(f))
            .collect()
    }

    /// Total number of assigned selectors.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Bind an unassigned selector to `facet`, appending to its last slot.
    pub fn assign(&mut self, selector: Selector, facet: FacetAddress) -> Result<(), IndexError> {
        if facet.is_zero() {
            return Err(IndexError::ZeroFacet(selector));
        }
        if let Some(existing) = self.records.get(&selector) {
            return Err(IndexError::AlreadyAssigned {
                selector,
                facet: existing.facet,
            });
        }
        self.append(selector, facet);
        debug!(selector = %selector, facet = %facet, "Selector assigned");
        Ok(())
    }

    /// Move an assigned selector to a different facet. Returns the previous facet.
    ///
    /// The selector leaves the old facet's slots (compacting them) and is
    /// appended to the new facet's slots within this one call.
    pub fn reassign(
        &mut self,
        selector: Selector,
        facet: FacetAddress,
    ) -> Result<FacetAddress, IndexError> {
        if facet.is_zero() {
            return Err(IndexError::ZeroFacet(selector));
        }
        let previous = self
            .records
            .get(&selector)
            .map(|r| r.facet)
            .ok_or(IndexError::NotAssigned(selector))?;
        if previous == facet {
            return Err(IndexError::SameFacet { selector, facet });
        }
        self.detach(selector)?;
        self.append(selector, facet);
        debug!(selector = %selector, from = %previous, to = %facet, "Selector reassigned");
        Ok(previous)
    }

    /// Unbind a selector. Returns the facet it belonged to.
    pub fn unassign(&mut self, selector: Selector) -> Result<FacetAddress, IndexError> {
        let facet = self.detach(selector)?;
        debug!(selector = %selector, facet = %facet, "Selector unassigned");
        Ok(facet)
    }

    fn append(&mut self, selector: Selector, facet: FacetAddress) {
        let order = &mut self.facet_order;
        let entry = self.facets.entry(facet).or_insert_with(|| {
            order.push(facet);
            FacetEntry {
                selector_count: 0,
                order: order.len() - 1,
            }
        });
        let (slot, position) = locate(entry.selector_count as usize);
        entry.selector_count += 1;

        self.slots
            .entry(SlotKey { facet, slot })
            .or_insert([Selector::ZERO; SLOT_CAPACITY])[position] = selector;
        self.records.insert(
            selector,
            SelectorRecord {
                facet,
                slot,
                position: position as u8,
            },
        );
    }

    /// Remove `selector` from its facet's slots.
    ///
    /// The facet's final selector moves into the freed position; the final
    /// slot is dropped once empty. When the freed position already is the
    /// final one nothing moves. Every lookup happens before the first write.
    fn detach(&mut self, selector: Selector) -> Result<FacetAddress, IndexError> {
        let record = *self
            .records
            .get(&selector)
            .ok_or(IndexError::NotAssigned(selector))?;
        let facet = record.facet;
        let count = self
            .facets
            .get(&facet)
            .map(|e| e.selector_count as usize)
            .filter(|&n| n > 0)
            .ok_or_else(|| corrupted(format!("facet {facet} has no selector count")))?;

        let (last_slot, last_position) = locate(count - 1);
        let last_key = SlotKey {
            facet,
            slot: last_slot,
        };
        let freed_is_last =
            record.slot == last_slot && record.position as usize == last_position;

        let moved = if freed_is_last {
            None
        } else {
            let tail = self
                .slots
                .get(&last_key)
                .map(|s| s[last_position])
                .ok_or_else(|| corrupted(format!("facet {facet} missing final slot {last_slot}")))?;
            if !self.records.contains_key(&tail) {
                return Err(corrupted(format!("slot entry {tail} has no record")));
            }
            let freed_key = SlotKey {
                facet,
                slot: record.slot,
            };
            if !self.slots.contains_key(&freed_key) {
                return Err(corrupted(format!("facet {facet} missing slot {}", record.slot)));
            }
            Some((tail, freed_key))
        };

        if let Some((tail, freed_key)) = moved {
            if let Some(slot) = self.slots.get_mut(&freed_key) {
                slot[record.position as usize] = tail;
            }
            if let Some(tail_record) = self.records.get_mut(&tail) {
                tail_record.slot = record.slot;
                tail_record.position = record.position;
            }
        }

        if last_position == 0 {
            self.slots.remove(&last_key);
        } else if let Some(slot) = self.slots.get_mut(&last_key) {
            slot[last_position] = Selector::ZERO;
        }

        self.records.remove(&selector);
        if count == 1 {
            self.drop_facet(facet);
        } else if let Some(entry) = self.facets.get_mut(&facet) {
            entry.selector_count -= 1;
        }
        Ok(facet)
    }

    fn drop_facet(&mut self, facet: FacetAddress) {
        let Some(entry) = self.facets.remove(&facet) else {
            return;
        };
        self.facet_order.swap_remove(entry.order);
        if let Some(moved) = self.facet_order.get(entry.order) {
            if let Some(moved_entry) = self.facets.get_mut(moved) {
                moved_entry.order = entry.order;
            }
        }
    }

    /// Check every structural invariant of the packed layout.
    pub fn verify_integrity(&self) -> Result<(), IndexError> {
        if self.facet_order.len() != self.facets.len() {
            return Err(corrupted(format!(
                "facet order holds {} facets, map holds {}",
                self.facet_order.len(),
                self.facets.len()
            )));
        }

        let mut expected_slots = 0usize;
        let mut expected_records = 0usize;
        for (facet, entry) in &self.facets {
            if facet.is_zero() {
                return Err(corrupted("zero facet owns selectors"));
            }
            if entry.selector_count == 0 {
                return Err(corrupted(format!("facet {facet} listed with no selectors")));
            }
            if self.facet_order.get(entry.order) != Some(facet) {
                return Err(corrupted(format!("facet {facet} order pointer is stale")));
            }

            let count = entry.selector_count as usize;
            let slot_count = count.div_ceil(SLOT_CAPACITY);
            for index in 0..count {
                let (slot, position) = locate(index);
                let key = SlotKey {
                    facet: *facet,
                    slot,
                };
                let packed = self
                    .slots
                    .get(&key)
                    .ok_or_else(|| corrupted(format!("facet {facet} missing slot {slot}")))?;
                let selector = packed[position];
                let expected = SelectorRecord {
                    facet: *facet,
                    slot,
                    position: position as u8,
                };
                if self.records.get(&selector) != Some(&expected) {
                    return Err(corrupted(format!(
                        "selector {selector} at {facet}[{slot}][{position}] has a stale record"
                    )));
                }
            }
            if self.slots.contains_key(&SlotKey {
                facet: *facet,
                slot: slot_count as u32,
            }) {
                return Err(corrupted(format!("facet {facet} has a slot past its last")));
            }
            expected_slots += slot_count;
            expected_records += count;
        }

        if self.slots.len() != expected_slots {
            return Err(corrupted(format!(
                "{} slots allocated, {} expected",
                self.slots.len(),
                expected_slots
            )));
        }
        if self.records.len() != expected_records {
            return Err(corrupted(format!(
                "{} records, {} selectors in slots",
                self.records.len(),
                expected_records
            )));
        }
        Ok(())
    }
}
