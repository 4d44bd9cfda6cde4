//! Server endpoint.
//!
//! Users name a server by its HTTP origin (`http://localhost:12345`), the
//! same address a Socket.IO server is reached at from a browser. The
//! WebSocket transport lives at a fixed path below that origin; a path on the
//! origin itself names the namespace, as `io("http://host:port/agent")` does.

use std::{fmt, str::FromStr};

use parley_proto::{DEFAULT_NAMESPACE, ENGINE_IO_VERSION};
use url::Url;

use crate::{SessionConfig, error::EndpointError};

/// Path a Socket.IO server serves its Engine.IO transport on.
const SOCKET_IO_PATH: &str = "/socket.io/";

/// A Socket.IO server origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    origin: Url,
    websocket: Url,
    namespace: String,
}

impl Endpoint {
    /// Parse an `http://host:port` (or `ws://host:port`) origin.
    ///
    /// A non-root path becomes the namespace (`http://host:port/agent` joins
    /// `/agent`); query and fragment are dropped.
    ///
    /// # Errors
    ///
    /// - `EndpointError::InvalidUrl` if `origin` is not a URL
    /// - `EndpointError::TlsUnsupported` for `https`/`wss`
    /// - `EndpointError::UnsupportedScheme` for any other scheme
    /// - `EndpointError::MissingHost` if the URL has no host
    pub fn parse(origin: &str) -> Result<Self, EndpointError> {
        let origin = Url::parse(origin)?;

        match origin.scheme() {
            "http" | "ws" => {},
            "https" | "wss" => return Err(EndpointError::TlsUnsupported),
            other => return Err(EndpointError::UnsupportedScheme(other.to_string())),
        }
        if origin.host_str().is_none() {
            return Err(EndpointError::MissingHost);
        }

        let namespace = match origin.path().trim_end_matches('/') {
            "" => DEFAULT_NAMESPACE.to_string(),
            path => path.to_string(),
        };

        let mut websocket = origin.clone();
        websocket
            .set_scheme("ws")
            .map_err(|()| EndpointError::UnsupportedScheme(origin.scheme().to_string()))?;
        websocket.set_path(SOCKET_IO_PATH);
        websocket.set_query(Some(&format!("EIO={ENGINE_IO_VERSION}&transport=websocket")));
        websocket.set_fragment(None);

        Ok(Self { origin, websocket, namespace })
    }

    /// URL the WebSocket transport is dialed at.
    pub fn websocket_url(&self) -> &Url {
        &self.websocket
    }

    /// Namespace named by the origin path.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Default session settings joining this endpoint's namespace.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig { namespace: self.namespace.clone(), ..SessionConfig::default() }
    }
}

impl FromStr for Endpoint {
    type Err = EndpointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.origin.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_origin_maps_to_engine_io_websocket() {
        let endpoint = Endpoint::parse("http://localhost:12345").unwrap();
        assert_eq!(
            endpoint.websocket_url().as_str(),
            "ws://localhost:12345/socket.io/?EIO=4&transport=websocket"
        );
    }

    #[test]
    fn root_origin_joins_default_namespace() {
        let endpoint = Endpoint::parse("http://localhost:12345/").unwrap();
        assert_eq!(endpoint.namespace(), "/");
        assert_eq!(endpoint.session_config(), SessionConfig::default());
    }

    #[test]
    fn origin_path_names_the_namespace() {
        let endpoint = Endpoint::parse("ws://10.0.0.2:8080/chat/?x=1#top").unwrap();
        assert_eq!(
            endpoint.websocket_url().as_str(),
            "ws://10.0.0.2:8080/socket.io/?EIO=4&transport=websocket"
        );
        assert_eq!(endpoint.namespace(), "/chat");
        assert_eq!(endpoint.session_config().namespace, "/chat");

        let root = Endpoint::parse("ws://10.0.0.2:8080").unwrap();
        assert_ne!(endpoint, root);
        assert_eq!(root.namespace(), "/");
    }

    #[test]
    fn rejects_unusable_origins() {
        assert!(matches!(Endpoint::parse("localhost"), Err(EndpointError::InvalidUrl(_))));
        assert_eq!(Endpoint::parse("https://example.com"), Err(EndpointError::TlsUnsupported));
        assert_eq!(
            Endpoint::parse("ftp://example.com"),
            Err(EndpointError::UnsupportedScheme("ftp".into()))
        );
    }

    #[test]
    fn displays_origin() {
        let endpoint: Endpoint = "http://localhost:12345".parse().unwrap();
        assert_eq!(endpoint.to_string(), "http://localhost:12345/");
    }
}
