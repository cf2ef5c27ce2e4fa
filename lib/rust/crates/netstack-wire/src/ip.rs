// Copyright 2018 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! IP protocol numbers.

/// Default IPv4 TTL.
pub const DEFAULT_TTL: u8 = 64;

create_net_enum! {
    /// An IP protocol carried in the IPv4 protocol field.
    ///
    /// Only the protocols this stack knows how to build headers for are
    /// listed; see [`Ipv4Proto`] for a value that can also hold any other
    /// protocol number.
    pub IpProto,
    /// Internet Control Message Protocol.
    Icmp: ICMP = 1,
    /// Transmission Control Protocol.
    Tcp: TCP = 6,
    /// User Datagram Protocol.
    Udp: UDP = 17,
}

/// The contents of an IPv4 protocol field.
///
/// Parsing never fails on an unknown protocol number; it is carried as
/// `Other` and written back out unchanged. Build values with `From<u8>` so
/// that known numbers always land in `Proto`.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub enum Ipv4Proto {
    /// A recognized protocol.
    Proto(IpProto),
    /// An unrecognized protocol number.
    Other(u8),
}

impl From<u8> for Ipv4Proto {
    fn from(u: u8) -> Ipv4Proto {
        match IpProto::from_u8(u) {
            Some(proto) => Ipv4Proto::Proto(proto),
            None => Ipv4Proto::Other(u),
        }
    }
}

impl From<Ipv4Proto> for u8 {
    fn from(proto: Ipv4Proto) -> u8 {
        match proto {
            Ipv4Proto::Proto(proto) => proto.into(),
            Ipv4Proto::Other(u) => u,
        }
    }
}

impl From<IpProto> for Ipv4Proto {
    fn from(proto: IpProto) -> Ipv4Proto {
        Ipv4Proto::Proto(proto)
    }
}

#[cfg(test)]
mod tests {
    use core::convert::TryFrom;

    use super::*;

    #[test]
    fn test_proto_numbers() {
        assert_eq!(u8::from(IpProto::Icmp), 1);
        assert_eq!(u8::from(IpProto::Tcp), 6);
        assert_eq!(u8::from(IpProto::Udp), 17);
        assert_eq!(IpProto::try_from(17), Ok(IpProto::Udp));
        assert_eq!(IpProto::try_from(41), Err(()));
    }

    #[test]
    fn test_ipv4_proto_passthrough() {
        for u in 0..=u8::MAX {
            let proto = Ipv4Proto::from(u);
            assert_eq!(u8::from(proto), u);
            match u {
                1 | 6 | 17 => assert!(matches!(proto, Ipv4Proto::Proto(_))),
                _ => assert_eq!(proto, Ipv4Proto::Other(u)),
            }
        }
        assert_eq!(Ipv4Proto::from(6), Ipv4Proto::from(IpProto::Tcp));
    }
}
