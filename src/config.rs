use crate::geometry::LinkGeometry;
use crate::protocol::{DEFAULT_ADDR, DEFAULT_PORT};
use crate::{ArmkinError, Result};
use std::net::{SocketAddr, ToSocketAddrs};
use std::time::Duration;

pub const ENV_ADDR: &str = "ARMKIN_ADDR";
pub const ENV_PORT: &str = "ARMKIN_PORT";
pub const ENV_CYCLES: &str = "ARMKIN_CYCLES";
pub const ENV_RECV_TIMEOUT_MS: &str = "ARMKIN_RECV_TIMEOUT_MS";
pub const ENV_GEOMETRY: &str = "ARMKIN_GEOMETRY";

pub const DEFAULT_CYCLES: u32 = 5;
pub const DEFAULT_RECV_TIMEOUT: Duration = Duration::from_millis(1000);

/// Telemetry endpoint and engine settings.
#[derive(Debug, Clone)]
pub struct Config {
    /// Host name or IP of the arm controller.
    pub addr: String,
    pub port: u16,
    /// Number of measurements a host program processes before exiting.
    pub cycles: u32,
    /// Socket read timeout for one-shot reads. A [`PoseStream`] replaces it
    /// with its own short poll interval.
    ///
    /// [`PoseStream`]: crate::stream::PoseStream
    pub recv_timeout: Duration,
    pub geometry: LinkGeometry,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            port: DEFAULT_PORT,
            cycles: DEFAULT_CYCLES,
            recv_timeout: DEFAULT_RECV_TIMEOUT,
            geometry: LinkGeometry::default(),
        }
    }
}

impl Config {
    /// Build a config from `ARMKIN_*` environment variables.
    ///
    /// Unparseable numbers fall back to their defaults. An unparseable
    /// `ARMKIN_GEOMETRY` is an error.
    pub fn from_env() -> Result<Config> {
        let geometry = match read_env_raw(ENV_GEOMETRY) {
            Some(spec) => spec.parse::<LinkGeometry>()?,
            None => LinkGeometry::default(),
        };

        let config = Config {
            addr: read_env_string(ENV_ADDR, DEFAULT_ADDR),
            port: read_env_parse(ENV_PORT, DEFAULT_PORT),
            cycles: read_env_parse(ENV_CYCLES, DEFAULT_CYCLES),
            recv_timeout: Duration::from_millis(read_env_parse(
                ENV_RECV_TIMEOUT_MS,
                DEFAULT_RECV_TIMEOUT.as_millis() as u64,
            )),
            geometry,
        };

        log::debug!(
            "Config: endpoint={}:{} cycles={} recv_timeout={:?}",
            config.addr,
            config.port,
            config.cycles,
            config.recv_timeout
        );

        Ok(config)
    }

    pub fn with_endpoint(mut self, addr: impl Into<String>, port: u16) -> Self {
        self.addr = addr.into();
        self.port = port;
        self
    }

    pub fn with_geometry(mut self, geometry: LinkGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn with_recv_timeout(mut self, timeout: Duration) -> Self {
        self.recv_timeout = timeout;
        self
    }

    /// Resolve the configured endpoint to a socket address.
    pub fn endpoint(&self) -> Result<SocketAddr> {
        (self.addr.as_str(), self.port)
            .to_socket_addrs()
            .map_err(|e| {
                ArmkinError::InvalidConfig(format!("{}:{}: {}", self.addr, self.port, e))
            })?
            .next()
            .ok_or_else(|| {
                ArmkinError::InvalidConfig(format!(
                    "{}:{} resolved to no addresses",
                    self.addr, self.port
                ))
            })
    }
}

fn read_env_raw(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn read_env_string(name: &str, default: &str) -> String {
    read_env_raw(name).unwrap_or_else(|| default.to_string())
}

fn read_env_parse<T>(name: &str, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display,
{
    match read_env_raw(name) {
        Some(v) => v.parse::<T>().unwrap_or_else(|_| {
            log::warn!("Ignoring {}='{}', using default {}", name, v, default);
            default
        }),
        None => default,
    }
}
