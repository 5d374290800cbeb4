// SPDX-License-Identifier: Apache-2.0

use std::{net::Ipv4Addr, time::Duration};

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use ethping::{
    ChecksumMode, FrameSummary, PingConfig, PingError, PingSender,
    RawEthSocket,
};

const APP_NAME: &str = "ethping";

const ARG_IFNAME: &str = "ifname";
const ARG_COUNT: &str = "count";
const ARG_INTERVAL: &str = "interval-ms";
const ARG_SRC_MAC: &str = "src-mac";
const ARG_DST_MAC: &str = "dst-mac";
const ARG_SRC_IP: &str = "src-ip";
const ARG_DST_IP: &str = "dst-ip";
const ARG_SRC_PORT: &str = "src-port";
const ARG_DST_PORT: &str = "dst-port";
const ARG_TTL: &str = "ttl";
const ARG_MARKER: &str = "marker";
const ARG_PADDING: &str = "padding";
const ARG_CHECKSUM: &str = "checksum";
const ARG_VERBOSE: &str = "verbose";

const DEFAULT_IFNAME: &str = "tap0";
const DEFAULT_INTERVAL_MS: &str = "1000";
const DEFAULT_MARKER: &str = "PING";
const DEFAULT_PADDING: &str = "128";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = build_cli().get_matches();
    init_log(matches.get_count(ARG_VERBOSE));

    let config = config_from_matches(&matches)?;
    let socket = RawEthSocket::new(config.iface_name())?;
    let sender = PingSender::new(config, socket)?;
    println!("{}", FrameSummary::parse(sender.frame())?);

    let stats = sender
        .run(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                log::error!("Failed to listen for Ctrl-C: {e}");
                std::future::pending::<()>().await;
            }
        })
        .await?;
    println!("{stats}");
    Ok(())
}

fn init_log(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter(Some("ethping"), level)
        .init();
}

fn build_cli() -> Command {
    Command::new(APP_NAME)
        .version(env!("CARGO_PKG_VERSION"))
        .about(
            "Send a hand-assembled Ethernet/IPv4/UDP frame over a raw socket \
             at a fixed interval",
        )
        .arg(
            Arg::new(ARG_IFNAME)
                .index(1)
                .help("Interface name")
                .default_value(DEFAULT_IFNAME),
        )
        .arg(
            Arg::new(ARG_COUNT)
                .long(ARG_COUNT)
                .short('c')
                .help("Stop after sending this many frames")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new(ARG_INTERVAL)
                .long(ARG_INTERVAL)
                .short('i')
                .help("Milliseconds between frames")
                .value_parser(value_parser!(u64))
                .default_value(DEFAULT_INTERVAL_MS),
        )
        .arg(
            Arg::new(ARG_SRC_MAC)
                .long(ARG_SRC_MAC)
                .help("Source MAC address, default c0:47:0e:6b:84:79"),
        )
        .arg(
            Arg::new(ARG_DST_MAC)
                .long(ARG_DST_MAC)
                .help("Destination MAC address, default 52:54:00:12:34:56"),
        )
        .arg(
            Arg::new(ARG_SRC_IP)
                .long(ARG_SRC_IP)
                .help("Source IPv4 address, default 192.168.1.1")
                .value_parser(value_parser!(Ipv4Addr)),
        )
        .arg(
            Arg::new(ARG_DST_IP)
                .long(ARG_DST_IP)
                .help("Destination IPv4 address, default 192.168.179.1")
                .value_parser(value_parser!(Ipv4Addr)),
        )
        .arg(
            Arg::new(ARG_SRC_PORT)
                .long(ARG_SRC_PORT)
                .help("Source UDP port, default 12345")
                .value_parser(value_parser!(u16)),
        )
        .arg(
            Arg::new(ARG_DST_PORT)
                .long(ARG_DST_PORT)
                .help("Destination UDP port, default 80")
                .value_parser(value_parser!(u16)),
        )
        .arg(
            Arg::new(ARG_TTL)
                .long(ARG_TTL)
                .help("IPv4 time to live, default 64")
                .value_parser(value_parser!(u8)),
        )
        .arg(
            Arg::new(ARG_MARKER)
                .long(ARG_MARKER)
                .help("Text at the start of the payload")
                .default_value(DEFAULT_MARKER),
        )
        .arg(
            Arg::new(ARG_PADDING)
                .long(ARG_PADDING)
                .help("Zero bytes appended after the marker")
                .value_parser(value_parser!(usize))
                .default_value(DEFAULT_PADDING),
        )
        .arg(
            Arg::new(ARG_CHECKSUM)
                .long(ARG_CHECKSUM)
                .help("Compute IPv4 and UDP checksums instead of sending zero")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new(ARG_VERBOSE)
                .long(ARG_VERBOSE)
                .short('v')
                .help("Increase log verbosity")
                .action(ArgAction::Count),
        )
}

fn config_from_matches(matches: &ArgMatches) -> Result<PingConfig, PingError> {
    let iface_name = matches
        .get_one::<String>(ARG_IFNAME)
        .map(String::as_str)
        .unwrap_or(DEFAULT_IFNAME);
    let mut config = PingConfig::new(iface_name);

    config.set_count(matches.get_one::<u64>(ARG_COUNT).copied());
    if let Some(ms) = matches.get_one::<u64>(ARG_INTERVAL) {
        config.set_interval(Duration::from_millis(*ms));
    }
    if let Some(mac) = matches.get_one::<String>(ARG_SRC_MAC) {
        config.set_src_mac_str(mac)?;
    }
    if let Some(mac) = matches.get_one::<String>(ARG_DST_MAC) {
        config.set_dst_mac_str(mac)?;
    }
    if let Some(ip) = matches.get_one::<Ipv4Addr>(ARG_SRC_IP) {
        config.set_src_ip(*ip);
    }
    if let Some(ip) = matches.get_one::<Ipv4Addr>(ARG_DST_IP) {
        config.set_dst_ip(*ip);
    }
    if let Some(port) = matches.get_one::<u16>(ARG_SRC_PORT) {
        config.set_src_port(*port);
    }
    if let Some(port) = matches.get_one::<u16>(ARG_DST_PORT) {
        config.set_dst_port(*port);
    }
    if let Some(ttl) = matches.get_one::<u8>(ARG_TTL) {
        config.set_ttl(*ttl);
    }
    let marker = matches
        .get_one::<String>(ARG_MARKER)
        .map(String::as_str)
        .unwrap_or(DEFAULT_MARKER);
    let padding = matches.get_one::<usize>(ARG_PADDING).copied().unwrap_or(0);
    config.set_marker_payload(marker.as_bytes(), padding);
    if matches.get_flag(ARG_CHECKSUM) {
        config.set_checksum_mode(ChecksumMode::Compute);
    }

    config.validate()?;
    Ok(config)
}
