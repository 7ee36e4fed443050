//! HAProxy configuration rendering
//!
//! Output is a pure function of the store: listeners are visited by IP then
//! port, routes by hostname, certificates by name and servers by name, so
//! identical input always yields byte-identical text.

use crate::listener::{ListenAddress, Listener};
use crate::ConfigurationStore;
use router_api::{Backend, BackendServer, Mode};

const INDENT: &str = "    ";

/// Render every frontend, then every backend
pub fn render(store: &ConfigurationStore) -> String {
    let mut config = String::new();

    for (address, listener) in store.listeners() {
        render_frontend(&mut config, address, listener);
    }

    for (_, listener) in store.listeners() {
        for (_, backend) in listener.backends() {
            render_backend(&mut config, listener.mode, backend);
        }
    }

    config
}

fn render_frontend(config: &mut String, address: &ListenAddress, listener: &Listener) {
    config.push_str(&format!("frontend {}\n", listener.name));
    line(config, &format!("mode {}", listener.mode));

    let mut bind = format!("bind {}", address);
    if listener.use_ssl {
        bind.push_str(" ssl");
        for certificate in listener.certificates() {
            bind.push_str(" crt ");
            bind.push_str(certificate);
        }
    }
    line(config, &bind);

    if listener.use_ssl && listener.mode == Mode::Http {
        line(config, "reqadd x-forwarded-proto:\\ https");
    }
    config.push('\n');

    match listener.mode {
        Mode::Http => {
            for (hostname, backend) in listener.backends() {
                line(config, &format!("# Set up backend selection for {}", hostname));
                line(
                    config,
                    &format!("use_backend {} if {{ hdr(host) -i {} }}", backend.name, hostname),
                );
                line(
                    config,
                    &format!(
                        "use_backend {} if {{ hdr(host) -i {}:{} }}",
                        backend.name, hostname, address.port
                    ),
                );
            }
        }
        Mode::Tcp => {
            // A tcp listener is only ever created together with its backend
            if let Some(backend) = listener.default_backend() {
                line(config, "# Set up default_backend");
                line(config, &format!("default_backend {}", backend.name));
            }
        }
    }
    config.push('\n');
}

fn render_backend(config: &mut String, mode: Mode, backend: &Backend) {
    config.push_str(&format!("backend {}\n", backend.name));
    line(config, &format!("mode {}", mode));
    line(config, &format!("balance {}", backend.balance_method));
    config.push('\n');

    line(config, "# Backend Servers");
    let mut servers: Vec<&BackendServer> = backend.servers.iter().collect();
    servers.sort_by(|a, b| a.name.cmp(&b.name));
    for server in servers {
        let mut entry = format!("server {} {}:{} check", server.name, server.ip, server.port);
        if backend.use_ssl {
            entry.push_str(" ssl");
            if !backend.verify_ssl {
                entry.push_str(" verify none");
            }
        }
        line(config, &entry);
    }
    config.push('\n');
}

fn line(config: &mut String, content: &str) {
    config.push_str(INDENT);
    config.push_str(content);
    config.push('\n');
}

impl ConfigurationStore {
    /// Render this store as an HAProxy configuration
    pub fn render(&self) -> String {
        render(self)
    }
}
