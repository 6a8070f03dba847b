use crate::concepts::event::Event;
use crate::concepts::packet::{OutboundPacket, Packet};
use crate::feedback::RoutingError;
use crate::framework::{AdvertiseMode, ProtocolParams, RoutingSystem};
use crate::table::RoutingTable;
use log::{debug, trace, warn};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, VecDeque};
use std::time::Duration;

/// Largest representable distance, a destination at INF is unreachable
pub const INF: u16 = 16;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(bound = ""))]
pub struct Router<T: RoutingSystem + ?Sized> {
    table: RoutingTable<T>,
    /// ports whose link is currently up
    ports: BTreeSet<T::Port>,
    /// events waiting for `process_events`
    events: VecDeque<Event<T>>,
    pub outbound_packets: Vec<OutboundPacket<T>>,
    params: ProtocolParams,
}

impl<T: RoutingSystem> Default for Router<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: RoutingSystem> Router<T> {
    pub fn new() -> Self {
        Self::with_params(T::config())
    }

    pub fn with_params(params: ProtocolParams) -> Self {
        Self {
            table: RoutingTable::new(params.cost_update),
            ports: BTreeSet::new(),
            events: VecDeque::new(),
            outbound_packets: Vec::new(),
            params,
        }
    }

    // region Interface
    pub fn table(&self) -> &RoutingTable<T> {
        &self.table
    }

    pub fn params(&self) -> &ProtocolParams {
        &self.params
    }

    /// how often the substrate should deliver `Event::TimerFired`
    pub fn timer_interval(&self) -> Duration {
        self.params.timer_interval
    }

    pub fn active_ports(&self) -> impl Iterator<Item = &T::Port> {
        self.ports.iter()
    }

    /// queues an event for `process_events`
    pub fn push_event(&mut self, event: Event<T>) {
        self.events.push_back(event);
    }

    /// handles every queued event in order. A failing event is dropped and logged,
    /// processing continues with the next one
    pub fn process_events(&mut self) -> Vec<RoutingError<T>> {
        let mut failures = Vec::new();
        while let Some(event) = self.events.pop_front() {
            if let Err(err) = self.handle_event(event) {
                warn!("Dropped event: {err}");
                failures.push(err);
            }
        }
        failures
    }

    /// takes every packet the router wants sent since the last drain
    pub fn drain_outbound(&mut self) -> Vec<OutboundPacket<T>> {
        std::mem::take(&mut self.outbound_packets)
    }

    /// writes a packet to the outbound packet queue
    fn write_packet(&mut self, packet: Packet<T>, port: T::Port) {
        self.outbound_packets.push(OutboundPacket { port, packet });
    }
    // endregion

    // region Events
    pub fn handle_event(&mut self, event: Event<T>) -> Result<(), RoutingError<T>> {
        match event {
            Event::LinkUp { port, latency } => self.handle_link_up(port, latency),
            Event::LinkDown { port } => self.handle_link_down(port),
            Event::Receive { packet, port } => return self.handle_packet(packet, port),
            Event::TimerFired => self.handle_timer(),
        }
        Ok(())
    }

    pub fn handle_link_up(&mut self, port: T::Port, latency: u16) {
        if latency >= INF {
            warn!("Latency {latency} on port {port:?} reaches INF, link treated as unreachable");
        }
        debug!("link up on {port:?}, latency {latency}");
        self.table.adjust_port_cost(port, latency);
        self.ports.insert(port);
        self.broadcast_routes();
    }

    pub fn handle_link_down(&mut self, port: T::Port) {
        debug!("link down on {port:?}");
        self.table.remove_port(port);
        self.ports.remove(&port);
        self.broadcast_routes();
    }

    /// handle a single packet received on `port`
    pub fn handle_packet(&mut self, packet: Packet<T>, port: T::Port) -> Result<(), RoutingError<T>> {
        match packet {
            Packet::RouteAdvertisement { destination, cost } => {
                self.table.add_destination_entry(destination, port, cost)?;
            }
            Packet::NeighborDiscovery { src } => {
                if !self.table.is_port_known(&port) {
                    // known but unreachable until link-up supplies the latency
                    self.table.add_port(port, INF);
                }
                // the neighbour is directly attached, so it is zero past the port
                self.table.add_destination_entry(src, port, 0)?;
            }
            Packet::Data { src, dst, payload } => {
                if src == dst {
                    trace!("dropping self-addressed packet from {src:?}");
                    return Ok(());
                }
                let next_hop = self.table.best_route(&dst)?;
                if next_hop.cost >= INF {
                    return Err(RoutingError::RouteNotFound { dest: dst });
                }
                let out = next_hop.port;
                trace!("forwarding {src:?} -> {dst:?} out of {out:?}");
                self.write_packet(Packet::Data { src, dst, payload }, out);
            }
        }
        Ok(())
    }

    pub fn handle_timer(&mut self) {
        self.broadcast_routes();
    }
    // endregion

    /// advertises the best cost of every known destination out of every active port
    pub fn broadcast_routes(&mut self) {
        let mut dests: Vec<&T::NodeAddress> = self.table.known_destinations().collect();
        dests.sort();

        let mut packets = Vec::new();
        for dest in dests {
            let Ok(best) = self.table.best_route(dest) else {
                continue;
            };
            for port in &self.ports {
                let cost = if *port != best.port {
                    best.cost
                } else {
                    match self.params.advertise {
                        AdvertiseMode::Everywhere => best.cost,
                        AdvertiseMode::SplitHorizon => continue,
                        AdvertiseMode::PoisonReverse => INF,
                    }
                };
                packets.push(OutboundPacket {
                    port: *port,
                    packet: Packet::RouteAdvertisement {
                        destination: dest.clone(),
                        cost,
                    },
                });
            }
        }
        self.outbound_packets.extend(packets);
    }
}
