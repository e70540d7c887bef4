//! Listen address parsing.

use libp2p::Multiaddr;

use crate::AddrError;

/// An ordered, non-empty set of validated listen addresses.
///
/// Order is preserved from the configuration string; it determines which
/// addresses are advertised to peers first, so it is not incidental.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenAddrs(Vec<Multiaddr>);

impl ListenAddrs {
    /// Parses a comma-separated list of multiaddrs.
    ///
    /// Tokens are expected pre-trimmed; the split does not eat whitespace.
    /// The first malformed token aborts the whole call, leaving no partial set.
    pub fn parse(raw: &str) -> Result<Self, AddrError> {
        if raw.is_empty() {
            return Err(AddrError::Empty);
        }

        let mut addrs = Vec::new();
        for (position, token) in raw.split(',').enumerate() {
            if token.is_empty() {
                return Err(AddrError::EmptyAddress(position));
            }
            let addr = token
                .parse::<Multiaddr>()
                .map_err(|source| AddrError::InvalidAddress {
                    addr: token.to_string(),
                    source,
                })?;
            addrs.push(addr);
        }

        Ok(Self(addrs))
    }

    pub fn as_slice(&self) -> &[Multiaddr] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false for a parsed set; present for completeness.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Multiaddr> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a ListenAddrs {
    type Item = &'a Multiaddr;
    type IntoIter = std::slice::Iter<'a, Multiaddr>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl std::fmt::Display for ListenAddrs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for addr in &self.0 {
            if !first {
                f.write_str(",")?;
            }
            write!(f, "{addr}")?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_an_ordered_two_address_list() {
        let addrs =
            ListenAddrs::parse("/ip4/0.0.0.0/tcp/4040,/ip4/0.0.0.0/udp/4141/quic-v1").unwrap();
        assert_eq!(addrs.len(), 2);
        assert_eq!(addrs.as_slice()[0].to_string(), "/ip4/0.0.0.0/tcp/4040");
        assert_eq!(
            addrs.as_slice()[1].to_string(),
            "/ip4/0.0.0.0/udp/4141/quic-v1"
        );
    }

    #[test]
    fn legacy_quic_token_still_parses() {
        let addrs = ListenAddrs::parse("/ip4/0.0.0.0/udp/4141/quic").unwrap();
        assert_eq!(addrs.len(), 1);
    }

    #[test]
    fn rejects_a_malformed_token_and_names_it() {
        let err = ListenAddrs::parse("not-an-address").unwrap_err();
        match err {
            AddrError::InvalidAddress { addr, .. } => assert_eq!(addr, "not-an-address"),
            other => panic!("expected InvalidAddress, got {other:?}"),
        }
    }

    #[test]
    fn first_bad_token_fails_the_whole_set() {
        let err =
            ListenAddrs::parse("/ip4/127.0.0.1/tcp/1,bogus,/ip4/127.0.0.1/tcp/2").unwrap_err();
        assert!(matches!(err, AddrError::InvalidAddress { addr, .. } if addr == "bogus"));
    }

    #[test]
    fn rejects_empty_input() {
        assert!(matches!(ListenAddrs::parse(""), Err(AddrError::Empty)));
    }

    #[test]
    fn rejects_an_empty_token() {
        let err = ListenAddrs::parse("/ip4/0.0.0.0/tcp/4040,").unwrap_err();
        assert!(matches!(err, AddrError::EmptyAddress(1)));
    }

    #[test]
    fn tokens_are_not_trimmed() {
        let err = ListenAddrs::parse(" /ip4/0.0.0.0/tcp/4040").unwrap_err();
        assert!(matches!(err, AddrError::InvalidAddress { .. }));
    }
}
