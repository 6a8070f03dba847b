use crate::concepts::route::{HopEntry, NextHopSet};
use crate::feedback::RoutingError;
use crate::framework::{CostUpdate, RoutingSystem};
use crate::router::INF;
use crate::util::clamp_inf;
use educe::Educe;
use log::trace;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "serde")]
use serde_with::serde_as;
use std::collections::HashMap;

/// Per-destination candidate sets plus the cost of every port ever seen.
///
/// Nothing is ever removed: dead ports and the routes through them are driven to INF,
/// so a later link-up can re-arm them.
#[cfg_attr(feature = "serde", serde_as)]
#[derive(Educe)]
#[educe(Clone(bound()), Debug(bound()))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(bound = ""))]
pub struct RoutingTable<T: RoutingSystem + ?Sized> {
    /// Port, link cost (INF if the link is down or unconfirmed)
    #[cfg_attr(feature = "serde", serde_as(as = "Vec<(_, _)>"))]
    port_costs: HashMap<T::Port, u16>,
    /// Destination, candidates
    #[cfg_attr(feature = "serde", serde_as(as = "Vec<(_, _)>"))]
    routes: HashMap<T::NodeAddress, NextHopSet<T>>,
    cost_update: CostUpdate,
}

impl<T: RoutingSystem + ?Sized> Default for RoutingTable<T> {
    fn default() -> Self {
        Self::new(CostUpdate::default())
    }
}

impl<T: RoutingSystem + ?Sized> RoutingTable<T> {
    pub fn new(cost_update: CostUpdate) -> Self {
        Self {
            port_costs: HashMap::new(),
            routes: HashMap::new(),
            cost_update,
        }
    }

    /// Registers or overwrites the cost of a port, without touching routes through it
    pub fn add_port(&mut self, port: T::Port, cost: u16) {
        self.port_costs.insert(port, clamp_inf(cost));
    }

    /// Changes the cost of a link and carries the change into every candidate on it
    pub fn adjust_port_cost(&mut self, port: T::Port, new_cost: u16) {
        let new_cost = clamp_inf(new_cost);
        match self.port_costs.get(&port).copied() {
            Some(INF) => {
                // the port was unreachable, cached totals carry nothing of the old cost
                for hops in self.routes.values_mut() {
                    hops.reprice(&port, new_cost);
                }
            }
            Some(old_cost) => match self.cost_update {
                CostUpdate::Rederive => {
                    for hops in self.routes.values_mut() {
                        hops.reprice(&port, new_cost);
                    }
                }
                CostUpdate::Delta => {
                    let delta = old_cost as i32 - new_cost as i32;
                    for hops in self.routes.values_mut() {
                        hops.adjust(&port, delta);
                    }
                }
            },
            // no candidate can reference a port without a cost
            None => {}
        }
        self.add_port(port, new_cost);
    }

    /// Poisons the port and every candidate on it, keeping the bookkeeping
    pub fn remove_port(&mut self, port: T::Port) {
        self.port_costs.insert(port, INF);
        for hops in self.routes.values_mut() {
            hops.set_cost(&port, INF);
        }
    }

    /// Relaxation step: records that `dest` is `advertised_cost` away from the neighbour on `port`.
    /// A worse candidate is kept alongside the others, `best_route` picks the cheapest.
    pub fn add_destination_entry(
        &mut self,
        dest: T::NodeAddress,
        port: T::Port,
        advertised_cost: u16,
    ) -> Result<(), RoutingError<T>> {
        let port_cost = *self
            .port_costs
            .get(&port)
            .ok_or(RoutingError::UnknownPort { port })?;
        let entry = HopEntry::new(port, port_cost, clamp_inf(advertised_cost));
        trace!("candidate for {dest:?} via {port:?}: cost {}", entry.cost);

        if let Some(hops) = self.routes.get_mut(&dest) {
            hops.upsert(entry);
        } else {
            self.routes.insert(dest, NextHopSet::new(entry));
        }
        Ok(())
    }

    pub fn best_route(&self, dest: &T::NodeAddress) -> Result<&HopEntry<T>, RoutingError<T>> {
        self.routes
            .get(dest)
            .map(NextHopSet::minimum)
            .ok_or_else(|| RoutingError::RouteNotFound { dest: dest.clone() })
    }

    /// Every destination with at least one candidate, in no particular order
    pub fn known_destinations(&self) -> impl Iterator<Item = &T::NodeAddress> {
        self.routes.keys()
    }

    pub fn next_hops(&self, dest: &T::NodeAddress) -> Option<&NextHopSet<T>> {
        self.routes.get(dest)
    }

    pub fn port_cost(&self, port: &T::Port) -> Option<u16> {
        self.port_costs.get(port).copied()
    }

    pub fn is_port_known(&self, port: &T::Port) -> bool {
        self.port_costs.contains_key(port)
    }

    pub fn is_dest_known(&self, dest: &T::NodeAddress) -> bool {
        self.routes.contains_key(dest)
    }
}
