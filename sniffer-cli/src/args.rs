//! CLI argument parsing

use clap::Parser;
use sniffer_capture::writer::SNAPLEN;
use sniffer_capture::{CaptureConfig, ProtocolFilter};
use std::path::PathBuf;
use tracing::Level;

use crate::sniffer::SnifferConfig;

#[derive(Parser, Debug)]
#[command(name = "sniffer")]
#[command(
    version,
    about = "Capture network traffic, display it and save it in pcap format",
    long_about = "Capture network traffic, display it and save it in pcap format.\n\
                  Capturing requires superuser privileges (or CAP_NET_RAW).\n\
                  Stop the sniffer with Ctrl+C."
)]
pub struct Cli {
    /// Name of the interface to capture traffic on
    #[arg(short, long)]
    pub interface: Option<String>,

    /// Only keep frames of this protocol (tcp, udp, ipv4, ipv6)
    #[arg(short, long, value_name = "PROTOCOL", value_parser = parse_filter)]
    pub filter: Option<ProtocolFilter>,

    /// File to save traffic to in pcap format
    #[arg(short, long, value_name = "FILE")]
    pub out: Option<PathBuf>,

    /// Maximum number of frames to catch
    #[arg(short = 'n', long, value_name = "COUNT")]
    pub number: Option<usize>,

    /// List available network interfaces and exit
    #[arg(short = 'l', long)]
    pub list_interfaces: bool,

    /// Verbose output (-v, -vv, -vvv for increasing verbosity)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Do not put the interface into promiscuous mode
    #[arg(long)]
    pub no_promisc: bool,

    /// Maximum bytes captured per frame (at most the snapshot length the
    /// capture file declares)
    #[arg(
        long,
        value_name = "BYTES",
        default_value_t = 65535,
        value_parser = clap::value_parser!(i32).range(1..=i64::from(SNAPLEN))
    )]
    pub snaplen: i32,

    /// Capture read timeout in milliseconds
    #[arg(long, value_name = "MS", default_value_t = 1000)]
    pub timeout: i32,
}

fn parse_filter(s: &str) -> Result<ProtocolFilter, String> {
    match s.parse::<ProtocolFilter>() {
        Ok(ProtocolFilter::Any) | Err(_) => Err(format!(
            "expected one of: {}",
            ProtocolFilter::choices().join(", ")
        )),
        Ok(filter) => Ok(filter),
    }
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Tracing level selected by the `-v` count
    pub fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }

    /// libpcap settings for the live source
    pub fn capture_config(&self) -> CaptureConfig {
        CaptureConfig {
            snaplen: self.snaplen,
            timeout_ms: self.timeout,
            promiscuous: !self.no_promisc,
            ..CaptureConfig::default()
        }
    }

    /// Settings for the capture loop
    pub fn sniffer_config(&self) -> SnifferConfig {
        SnifferConfig {
            filter: self.filter.unwrap_or_default(),
            max_frames: self.number,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sniffer_core::Protocol;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["sniffer"]).unwrap();
        assert!(cli.interface.is_none());
        assert!(cli.out.is_none());
        assert_eq!(cli.log_level(), Level::WARN);

        let config = cli.sniffer_config();
        assert_eq!(config.filter, ProtocolFilter::Any);
        assert_eq!(config.max_frames, None);

        let capture = cli.capture_config();
        assert_eq!(capture.snaplen, 65535);
        assert_eq!(capture.timeout_ms, 1000);
        assert!(capture.promiscuous);
    }

    #[test]
    fn test_full_command_line() {
        let cli = Cli::try_parse_from([
            "sniffer", "-i", "eth0", "-f", "tcp", "-o", "out.pcap", "-n", "5", "-vv",
            "--no-promisc",
        ])
        .unwrap();

        assert_eq!(cli.interface.as_deref(), Some("eth0"));
        assert_eq!(cli.out, Some(PathBuf::from("out.pcap")));
        assert_eq!(cli.log_level(), Level::DEBUG);
        assert!(!cli.capture_config().promiscuous);

        let config = cli.sniffer_config();
        assert_eq!(config.filter, ProtocolFilter::Only(Protocol::Tcp));
        assert_eq!(config.max_frames, Some(5));
    }

    #[test]
    fn test_filter_choices() {
        for (name, protocol) in [
            ("ipv4", Protocol::Ipv4),
            ("ipv6", Protocol::Ipv6),
            ("udp", Protocol::Udp),
        ] {
            let cli = Cli::try_parse_from(["sniffer", "--filter", name]).unwrap();
            assert_eq!(cli.filter, Some(ProtocolFilter::Only(protocol)));
        }

        assert!(Cli::try_parse_from(["sniffer", "-f", "arp"]).is_err());
        assert!(Cli::try_parse_from(["sniffer", "-f", "ethernet"]).is_err());
        assert!(Cli::try_parse_from(["sniffer", "-f", ""]).is_err());
    }

    #[test]
    fn test_snaplen_bounded_by_file_header() {
        let cli = Cli::try_parse_from(["sniffer", "--snaplen", "1514"]).unwrap();
        assert_eq!(cli.capture_config().snaplen, 1514);

        let cli = Cli::try_parse_from(["sniffer", "--snaplen", "65535"]).unwrap();
        assert_eq!(cli.capture_config().snaplen, SNAPLEN as i32);

        assert!(Cli::try_parse_from(["sniffer", "--snaplen", "262144"]).is_err());
        assert!(Cli::try_parse_from(["sniffer", "--snaplen", "0"]).is_err());
    }

    #[test]
    fn test_rejects_negative_count() {
        assert!(Cli::try_parse_from(["sniffer", "-n", "-1"]).is_err());
    }
}
