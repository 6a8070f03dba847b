use std::collections::{BTreeMap, BTreeSet};
use serde::{Deserialize, Serialize};
use distvec::concepts::event::Event;
use distvec::concepts::packet::Packet;
use distvec::feedback::RoutingError;
use distvec::framework::{ProtocolParams, RoutingSystem};
use distvec::router::Router;

#[derive(Serialize, Deserialize, Clone)]
pub struct VirtualLink {
    pub a: String,
    pub b: String,
    pub latency: u16,
    pub up: bool,
}

/// Routers and hosts joined by point-to-point links. Both ends of a link use the link id as port.
/// Every tick delivers the packets in flight, then fires every router's timer.
#[derive(Serialize, Deserialize)]
pub struct VirtualSystem {
    pub routers: BTreeMap<String, Router<VirtualSystem>>,
    pub hosts: BTreeSet<String>,
    pub links: BTreeMap<u8, VirtualLink>,
    /// (receiving node, port, packet)
    pub in_flight: Vec<(String, u8, Packet<VirtualSystem>)>,
    /// (host, packet) for every data packet that reached a host
    pub delivered: Vec<(String, Packet<VirtualSystem>)>,
    #[serde(skip)]
    pub failures: Vec<(String, RoutingError<VirtualSystem>)>,
}

impl VirtualSystem {
    pub fn create(routers: &[&str], hosts: &[&str], links: &[(u8, &str, &str, u16)]) -> VirtualSystem {
        Self::create_with(routers, hosts, links, ProtocolParams::default())
    }

    pub fn create_with(
        routers: &[&str],
        hosts: &[&str],
        links: &[(u8, &str, &str, u16)],
        params: ProtocolParams,
    ) -> VirtualSystem {
        let mut network = VirtualSystem {
            routers: routers
                .iter()
                .map(|id| (id.to_string(), Router::with_params(params.clone())))
                .collect(),
            hosts: hosts.iter().map(|id| id.to_string()).collect(),
            links: BTreeMap::new(),
            in_flight: Vec::new(),
            delivered: Vec::new(),
            failures: Vec::new(),
        };
        for (lid, a, b, latency) in links {
            network.links.insert(*lid, VirtualLink {
                a: a.to_string(),
                b: b.to_string(),
                latency: *latency,
                up: false,
            });
            network.link_up(*lid, *latency);
        }
        network
    }

    /// brings a link up, or changes its latency if it is already up
    pub fn link_up(&mut self, link: u8, latency: u16) {
        let ends = {
            let l = self.links.get_mut(&link).unwrap_or_else(|| panic!("No link {link}"));
            l.latency = latency;
            l.up = true;
            [(l.a.clone(), l.b.clone()), (l.b.clone(), l.a.clone())]
        };
        for (node, other) in ends {
            if let Some(router) = self.routers.get_mut(&node) {
                router.push_event(Event::LinkUp { port: link, latency });
            } else if self.hosts.contains(&node) {
                // hosts announce themselves to whatever they are plugged into
                self.in_flight.push((other, link, Packet::NeighborDiscovery { src: node }));
            }
        }
        self.process_all();
        self.flush_packets();
    }

    pub fn link_down(&mut self, link: u8) {
        let ends = {
            let l = self.links.get_mut(&link).unwrap_or_else(|| panic!("No link {link}"));
            l.up = false;
            [l.a.clone(), l.b.clone()]
        };
        for node in ends {
            if let Some(router) = self.routers.get_mut(&node) {
                router.push_event(Event::LinkDown { port: link });
            }
        }
        self.process_all();
        self.flush_packets();
    }

    /// injects a data packet at `host`, it travels from the next tick on
    pub fn send_data(&mut self, host: &str, dst: &str, payload: &str) {
        let (link, other) = self
            .links
            .iter()
            .filter(|(_, l)| l.up)
            .find_map(|(lid, l)| {
                if l.a == host {
                    Some((*lid, l.b.clone()))
                } else if l.b == host {
                    Some((*lid, l.a.clone()))
                } else {
                    None
                }
            })
            .unwrap_or_else(|| panic!("Host {host} is not attached"));
        self.in_flight.push((other, link, Packet::Data {
            src: host.to_string(),
            dst: dst.to_string(),
            payload: payload.to_string(),
        }));
    }

    pub fn get_node(&self, node: &str) -> &Router<Self> {
        self.routers.get(node).unwrap_or_else(|| panic!("No node {node} found"))
    }

    /// name of the neighbour the best route from `cur` to `dest` goes through
    pub fn get_next_hop(&self, cur: &str, dest: &str) -> String {
        let port = self.get_node(cur).table().best_route(&dest.to_string())
            .unwrap_or_else(|_| panic!("No route found to {dest}")).port;
        let link = &self.links[&port];
        if link.a == cur { link.b.clone() } else { link.a.clone() }
    }

    pub fn get_metric_to(&self, cur: &str, dest: &str) -> u16 {
        self.get_node(cur).table().best_route(&dest.to_string())
            .unwrap_or_else(|_| panic!("No route found to {dest}")).cost
    }

    fn process_all(&mut self) {
        for (id, router) in &mut self.routers {
            for err in router.process_events() {
                self.failures.push((id.clone(), err));
            }
        }
    }

    /// moves every router's outbound packets onto the links they were sent on
    pub fn flush_packets(&mut self) {
        for (id, router) in &mut self.routers {
            for packet in router.drain_outbound() {
                let Some(link) = self.links.get(&packet.port) else { continue };
                if !link.up {
                    continue;
                }
                let other = if link.a == *id { link.b.clone() } else { link.a.clone() };
                if self.hosts.contains(&other) {
                    if let Packet::Data { .. } = packet.packet {
                        self.delivered.push((other, packet.packet));
                    }
                } else {
                    self.in_flight.push((other, packet.port, packet.packet));
                }
            }
        }
    }

    pub fn tick(&mut self) {
        for (node, port, packet) in std::mem::take(&mut self.in_flight) {
            if let Some(router) = self.routers.get_mut(&node) {
                router.push_event(Event::Receive { packet, port });
            }
        }
        for router in self.routers.values_mut() {
            router.push_event(Event::TimerFired);
        }
        self.process_all();
        self.flush_packets()
    }

    pub fn tick_n(&mut self, times: i32) {
        for _ in 0..times {
            self.tick();
        }
    }

    pub fn freeze(&mut self) -> String {
        serde_json::to_string(&self).unwrap()
    }

    pub fn restore(state: String) -> VirtualSystem {
        serde_json::from_str(&state).unwrap()
    }
}

impl RoutingSystem for VirtualSystem {
    type NodeAddress = String;
    type Port = u8;
    type Payload = String;
}
