use indexmap::IndexMap;
use model::vehicle::{VehicleId, VehicleState, VehicleStatus, VehicleUpdate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Created,
    Updated,
    /// The vehicle already completed its trip and is waiting to be removed.
    Ignored,
}

/// Identifies one scheduled removal. A ticket only matches the vehicle
/// incarnation it was issued for, so a stale ticket can not remove a vehicle
/// that has been cleared and re-created in the meantime.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RemovalTicket {
    pub vehicle_id: VehicleId,
    generation: u64,
}

#[derive(Debug, Clone)]
struct Slot {
    state: VehicleState,
    generation: u64,
}

/// All tracked vehicles in the order they were first seen.
#[derive(Debug, Clone, Default)]
pub struct VehicleTable {
    vehicles: IndexMap<VehicleId, Slot>,
    next_generation: u64,
}

impl VehicleTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert(&mut self, update: &VehicleUpdate) -> Upsert {
        if let Some(slot) = self.vehicles.get_mut(&update.vehicle_id) {
            if !slot.state.is_active() {
                return Upsert::Ignored;
            }
            slot.state.apply(update);
            return Upsert::Updated;
        }

        let generation = self.next_generation;
        self.next_generation += 1;
        self.vehicles.insert(
            update.vehicle_id.clone(),
            Slot {
                state: VehicleState::from_update(update),
                generation,
            },
        );
        Upsert::Created
    }

    /// Marks the vehicle as completed. Returns the ticket for its removal, or
    /// `None` if the vehicle is unknown or was completed before.
    pub fn complete(&mut self, id: &VehicleId) -> Option<RemovalTicket> {
        let slot = self.vehicles.get_mut(id)?;
        if !slot.state.is_active() {
            return None;
        }
        slot.state.status = VehicleStatus::Completed;
        Some(RemovalTicket {
            vehicle_id: id.clone(),
            generation: slot.generation,
        })
    }

    /// Removes the vehicle the ticket was issued for, if it is still there.
    pub fn expire(&mut self, ticket: &RemovalTicket) -> Option<VehicleState> {
        let matches = self
            .vehicles
            .get(&ticket.vehicle_id)
            .is_some_and(|slot| slot.generation == ticket.generation);
        if !matches {
            return None;
        }
        self.vehicles
            .shift_remove(&ticket.vehicle_id)
            .map(|slot| slot.state)
    }

    pub fn clear(&mut self) -> Vec<VehicleId> {
        self.vehicles.drain(..).map(|(id, _)| id).collect()
    }

    pub fn get(&self, id: &VehicleId) -> Option<&VehicleState> {
        self.vehicles.get(id).map(|slot| &slot.state)
    }

    pub fn iter(&self) -> impl Iterator<Item = &VehicleState> {
        self.vehicles.values().map(|slot| &slot.state)
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.iter().filter(|vehicle| vehicle.is_active()).count()
    }
}
