use crate::framework::RoutingSystem;
use crate::util::{shift_clamped, sum_inf};
use educe::Educe;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// A single candidate for reaching a destination
#[derive(Educe)]
#[educe(Clone(bound()), Debug(bound()), PartialEq(bound()), Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(bound = ""))]
pub struct HopEntry<T: RoutingSystem + ?Sized> {
    /// the local port the advertisement arrived on
    pub port: T::Port,
    /// the distance the neighbour on `port` advertised for the destination
    pub advertised: u16,
    /// total cost through `port`, always in [0, INF]
    pub cost: u16,
}

impl<T: RoutingSystem + ?Sized> HopEntry<T> {
    pub fn new(port: T::Port, port_cost: u16, advertised: u16) -> Self {
        Self {
            port,
            advertised,
            cost: sum_inf(port_cost, advertised),
        }
    }
}

/// Heap ordering: the cheapest entry is the greatest, ties go to the lowest port
#[derive(Educe)]
#[educe(Clone(bound()), Debug(bound()))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(bound = "", transparent))]
struct Ranked<T: RoutingSystem + ?Sized>(HopEntry<T>);

impl<T: RoutingSystem + ?Sized> Ord for Ranked<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        other.0.cost.cmp(&self.0.cost)
            .then_with(|| other.0.port.cmp(&self.0.port))
    }
}
impl<T: RoutingSystem + ?Sized> PartialOrd for Ranked<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl<T: RoutingSystem + ?Sized> PartialEq for Ranked<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl<T: RoutingSystem + ?Sized> Eq for Ranked<T> {}

/// All candidates for one destination, at most one per port.
///
/// A set is only ever created with a candidate and candidates are never removed,
/// so it is never empty. Mutations rebuild the heap in O(n), which is fine since
/// the set is bounded by the number of local ports.
#[derive(Educe)]
#[educe(Clone(bound()), Debug(bound()))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(bound = ""))]
pub struct NextHopSet<T: RoutingSystem + ?Sized> {
    heap: BinaryHeap<Ranked<T>>,
}

impl<T: RoutingSystem + ?Sized> NextHopSet<T> {
    pub fn new(entry: HopEntry<T>) -> Self {
        let mut heap = BinaryHeap::new();
        heap.push(Ranked(entry));
        Self { heap }
    }

    /// Overwrites the candidate on `entry.port`, or inserts it if the port has none
    pub fn upsert(&mut self, entry: HopEntry<T>) {
        let port = entry.port;
        if self.get(&port).is_none() {
            self.heap.push(Ranked(entry));
            return;
        }
        self.rebuild(&port, |existing| *existing = entry.clone());
    }

    /// Adds `delta` to the cost of the candidate on `port`, clamped to [0, INF]. No-op if absent
    pub fn adjust(&mut self, port: &T::Port, delta: i32) {
        self.rebuild(port, |entry| entry.cost = shift_clamped(entry.cost, delta));
    }

    /// Overwrites the cost of the candidate on `port`. No-op if absent
    pub fn set_cost(&mut self, port: &T::Port, cost: u16) {
        self.rebuild(port, |entry| entry.cost = cost);
    }

    /// Recomputes the cost of the candidate on `port` from its advertised distance
    pub fn reprice(&mut self, port: &T::Port, port_cost: u16) {
        self.rebuild(port, |entry| entry.cost = sum_inf(port_cost, entry.advertised));
    }

    /// The cheapest candidate, lowest port on ties
    pub fn minimum(&self) -> &HopEntry<T> {
        // construction always pushes a candidate and nothing pops
        &self.heap.peek().expect("NextHopSet is never empty").0
    }

    pub fn get(&self, port: &T::Port) -> Option<&HopEntry<T>> {
        self.iter().find(|entry| entry.port == *port)
    }

    pub fn iter(&self) -> impl Iterator<Item = &HopEntry<T>> {
        self.heap.iter().map(|ranked| &ranked.0)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    fn rebuild(&mut self, port: &T::Port, mut update: impl FnMut(&mut HopEntry<T>)) {
        if self.get(port).is_none() {
            return;
        }
        let mut entries = std::mem::take(&mut self.heap).into_vec();
        for Ranked(entry) in entries.iter_mut() {
            if entry.port == *port {
                update(entry);
            }
        }
        self.heap = BinaryHeap::from(entries);
    }
}
