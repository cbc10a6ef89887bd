use std::convert::Infallible;
use std::net::IpAddr;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_client_ip::ClientIp;
use ipnet::IpNet;

/// Best-effort client IP address.
///
/// Resolved by [`ClientIp`] from the `ClientIpSource` configured on the
/// router. Never rejects: a missing source or an unresolvable address yields
/// `None`, since the address is only recorded for auditing.
#[must_use]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClientAddress(pub Option<IpAddr>);

impl ClientAddress {
    #[inline]
    pub fn ip(&self) -> Option<IpAddr> {
        self.0
    }

    /// Returns the address as a host network for storage.
    #[inline]
    pub fn ip_net(&self) -> Option<IpNet> {
        self.0.map(IpNet::from)
    }
}

impl<S> FromRequestParts<S> for ClientAddress
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let ip = ClientIp::from_request_parts(parts, state)
            .await
            .ok()
            .map(|ClientIp(ip)| ip);

        Ok(Self(ip))
    }
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use super::*;

    #[test]
    fn ip_net_is_a_host_network() {
        let address = ClientAddress(Some(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 7))));
        let net = address.ip_net().map(|n| n.to_string());
        assert_eq!(net.as_deref(), Some("10.0.0.7/32"));
        assert_eq!(ClientAddress::default().ip_net(), None);
    }
}
