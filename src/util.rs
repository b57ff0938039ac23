use std::net::{IpAddr, Ipv4Addr};

const HOSTMONITOR_PORT: &str = "HOSTMONITOR_PORT";

const DEFAULT_PORT: u16 = 8085;

pub fn get_port() -> u16 {
    let port_from_env = std::env::var(HOSTMONITOR_PORT);
    port_from_env.map_or(DEFAULT_PORT, |res| res.parse().unwrap_or(DEFAULT_PORT))
}

const HOSTMONITOR_ADDR: &str = "HOSTMONITOR_ADDR";

const DEFAULT_ADDR: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

pub fn get_addr() -> IpAddr {
    let addr_from_env = std::env::var(HOSTMONITOR_ADDR);
    addr_from_env.map_or(DEFAULT_ADDR, |res| res.parse().unwrap_or(DEFAULT_ADDR))
}
