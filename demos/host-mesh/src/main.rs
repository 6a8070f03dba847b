use std::collections::BTreeMap;
use anyhow::{anyhow, Context};
use log::{info, warn, LevelFilter};
use serde_json::json;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use distvec::concepts::event::Event;
use distvec::concepts::packet::{OutboundPacket, Packet};
use distvec::framework::RoutingSystem;
use distvec::router::Router;

struct MeshSystem {} // just a type to inform distvec of our address types
impl RoutingSystem for MeshSystem {
    type NodeAddress = String; // hosts have string names
    type Port = u32; // both ends of a link use the link id as port
    type Payload = String;
}

// link id, a, b, latency
const LINKS: &[(u32, &str, &str, u16)] = &[
    (1, "alice", "r1", 1),
    (2, "r1", "r2", 2),
    (3, "r2", "r3", 2),
    (4, "r1", "r3", 7),
    (5, "r3", "bob", 1),
];
const ROUTERS: &[&str] = &["r1", "r2", "r3"];

struct Mesh {
    routers: BTreeMap<&'static str, Router<MeshSystem>>,
    down: Vec<u32>,
}

impl Mesh {
    fn peer(&self, node: &str, port: u32) -> Option<&'static str> {
        if self.down.contains(&port) {
            return None;
        }
        let (_, a, b, _) = LINKS.iter().find(|(id, ..)| *id == port)?;
        Some(if *a == node { *b } else { *a })
    }

    /// delivers everything the routers sent, then fires every timer
    fn step(&mut self) {
        let mut deliveries = Vec::new();
        for (id, router) in &mut self.routers {
            for OutboundPacket { port, packet } in router.drain_outbound() {
                deliveries.push((*id, port, packet));
            }
        }
        for (from, port, packet) in deliveries {
            let Some(to) = self.peer(from, port) else { continue };
            match self.routers.get_mut(to) {
                Some(router) => router.push_event(Event::Receive { packet, port }),
                None => {
                    if let Packet::Data { src, payload, .. } = packet {
                        info!("{to} received \"{payload}\" from {src}");
                    }
                }
            }
        }
        for router in self.routers.values_mut() {
            router.push_event(Event::TimerFired);
            for err in router.process_events() {
                warn!("{err}");
            }
        }
    }

    fn link_down(&mut self, link: u32) {
        self.down.push(link);
        for (id, a, b, _) in LINKS {
            if *id != link {
                continue;
            }
            for node in [a, b] {
                if let Some(router) = self.routers.get_mut(node) {
                    router.push_event(Event::LinkDown { port: link });
                    for err in router.process_events() {
                        warn!("{err}");
                    }
                }
            }
        }
    }

    fn send(&mut self, from_host: &str, to_host: &str, payload: &str) -> anyhow::Result<()> {
        let (port, router) = LINKS
            .iter()
            .find_map(|(id, a, b, _)| if *a == from_host { Some((*id, *b)) } else { None })
            .ok_or_else(|| anyhow!("{from_host} is not attached"))?;
        self.routers
            .get_mut(router)
            .context("host is attached to an unknown router")?
            .push_event(Event::Receive {
                packet: Packet::Data {
                    src: from_host.to_string(),
                    dst: to_host.to_string(),
                    payload: payload.to_string(),
                },
                port,
            });
        Ok(())
    }

    fn print_tables(&self) -> anyhow::Result<()> {
        for (id, router) in &self.routers {
            let mut routes = BTreeMap::new();
            for dest in router.table().known_destinations() {
                let hop = router.table().best_route(dest)?;
                routes.insert(dest.clone(), json!({ "port": hop.port, "cost": hop.cost }));
            }
            info!("{id}: {}", serde_json::to_string(&routes)?);
        }
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    TermLogger::init(LevelFilter::Info, Config::default(), TerminalMode::Mixed, ColorChoice::Auto)?;

    let mut mesh = Mesh {
        routers: ROUTERS.iter().map(|id| (*id, Router::new())).collect(),
        down: Vec::new(),
    };

    // bring every link up, hosts announce themselves to their router
    for (id, a, b, latency) in LINKS {
        for (node, other) in [(a, b), (b, a)] {
            if let Some(router) = mesh.routers.get_mut(node) {
                router.push_event(Event::LinkUp { port: *id, latency: *latency });
            } else if let Some(router) = mesh.routers.get_mut(other) {
                router.push_event(Event::Receive {
                    packet: Packet::NeighborDiscovery { src: node.to_string() },
                    port: *id,
                });
            }
        }
    }

    for _ in 0..5 {
        mesh.step();
    }
    info!("converged:");
    mesh.print_tables()?;

    mesh.send("alice", "bob", "hello bob")?;
    for _ in 0..4 {
        mesh.step();
    }

    info!("taking down r1 <-> r2");
    mesh.link_down(2);
    for _ in 0..8 {
        mesh.step();
    }
    mesh.print_tables()?;

    mesh.send("alice", "bob", "still there?")?;
    for _ in 0..4 {
        mesh.step();
    }
    Ok(())
}
