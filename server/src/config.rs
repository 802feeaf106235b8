//! Process configuration, from flags or the environment.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use clap::Parser;

/// `todo-server` arguments.
#[derive(Debug, Clone, Parser)]
#[command(name = "todo-server", about = "JSON API over a single todo list", version)]
pub struct ServerConfig {
    /// Address to listen on.
    #[arg(long, env = "TODO_HOST", default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    pub host: IpAddr,

    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// JSON snapshot backing the document store. In-memory only when omitted.
    #[arg(long = "data-file", env = "TODO_DATA_FILE", value_name = "path")]
    pub data_file: Option<PathBuf>,
}

impl ServerConfig {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
