// Copyright 2018 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Parsing and serialization of IPv4 headers.

use core::convert::Infallible;
use core::ops::Deref;
use std::net::Ipv4Addr;

use log::{debug, trace};
use zerocopy::byteorder::{NetworkEndian, U16};
use zerocopy::{AsBytes, ByteSlice, FromBytes, LayoutVerified, Unaligned};

use crate::error::{Ipv4Error, Ipv4Result};
use crate::ip::{IpProto, Ipv4Proto};
use crate::wire::records::{OptionImpl, OptionImplErr, OptionIter};
use crate::wire::util::{fits_in_u16, padded_len};

const HEADER_PREFIX_SIZE: usize = 20;
const MAX_HEADER_SIZE: usize = 60;
const IP_VERSION: u8 = 4;

/// The length of an IPv4 pseudo-header.
pub const PSEUDO_HEADER_LEN: usize = 12;

// HeaderPrefix has the same memory layout (thanks to repr(C)) as the fixed
// part of an IPv4 header. Every field is a u8, a byte array, or a
// byte-order-aware integer, so the struct has no alignment requirement and
// no padding, and can be read directly out of the bytes of a packet.
#[derive(FromBytes, AsBytes, Unaligned)]
#[repr(C)]
struct HeaderPrefix {
    version_ihl: u8,
    dscp_ecn: u8,
    total_len: U16<NetworkEndian>,
    id: U16<NetworkEndian>,
    flags_frag_off: [u8; 2],
    ttl: u8,
    proto: u8,
    hdr_checksum: [u8; 2],
    src_ip: [u8; 4],
    dst_ip: [u8; 4],
}

impl HeaderPrefix {
    fn header_len(&self) -> usize {
        usize::from(self.version_ihl & 0xF) * 4
    }
}

#[derive(FromBytes, AsBytes, Unaligned)]
#[repr(C)]
struct PseudoHeader {
    src_ip: [u8; 4],
    dst_ip: [u8; 4],
    zero: u8,
    proto: u8,
    upper_layer_len: U16<NetworkEndian>,
}

/// An IPv4 header.
///
/// An `Ipv4Header` produced by [`Ipv4Header::parse`] shares its options with
/// the byte slice it was parsed from, meaning that no copying or extra
/// allocation is necessary. Headers are immutable once constructed.
///
/// Type of service, identification, flags, fragment offset, and checksum are
/// not represented; they are ignored when parsing and written as zero when
/// serializing.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Ipv4Header<B> {
    src: Ipv4Addr,
    dst: Ipv4Addr,
    proto: Ipv4Proto,
    ttl: u8,
    options: B,
}

impl<B: ByteSlice> Ipv4Header<B> {
    /// Parse an IPv4 header from the front of `bytes`.
    ///
    /// On success, returns the header along with the packet's payload, which
    /// is sized by the header's total length field. Any bytes past the total
    /// length are ignored.
    ///
    /// The header length field is validated first, then the total length
    /// field, and only then are the remaining fields read.
    pub fn parse(bytes: B) -> Ipv4Result<(Ipv4Header<B>, B)> {
        // See for details: https://en.wikipedia.org/wiki/IPv4#Header
        let available = bytes.len();
        let header_len = match bytes.first() {
            Some(version_ihl) => usize::from(version_ihl & 0xF) * 4,
            None => {
                debug!("ipv4: empty buffer");
                return Err(Ipv4Error::MalformedHeaderLength { header_len: 0 });
            }
        };
        if header_len < HEADER_PREFIX_SIZE {
            debug!("ipv4: header length {} is below the minimum", header_len);
            return Err(Ipv4Error::MalformedHeaderLength { header_len });
        }
        if available < header_len {
            debug!("ipv4: {} byte buffer is shorter than {} byte header", available, header_len);
            return Err(Ipv4Error::BufferTooShort { required: header_len, available });
        }

        let (hdr_prefix, rest) = LayoutVerified::<B, HeaderPrefix>::new_unaligned_from_prefix(bytes)
            .ok_or(Ipv4Error::BufferTooShort { required: HEADER_PREFIX_SIZE, available })?;
        debug_assert_eq!(hdr_prefix.header_len(), header_len);
        let total_len = usize::from(hdr_prefix.total_len.get());
        if total_len < header_len {
            debug!("ipv4: total length {} is below header length {}", total_len, header_len);
            return Err(Ipv4Error::MalformedTotalLength { total_len, header_len });
        }
        if available < total_len {
            debug!("ipv4: {} byte buffer is shorter than {} byte packet", available, total_len);
            return Err(Ipv4Error::BufferTooShort { required: total_len, available });
        }

        let header_prefix = &*hdr_prefix;
        if header_prefix.version_ihl >> 4 != IP_VERSION {
            trace!("ipv4: version field is {}", header_prefix.version_ihl >> 4);
        }
        let src = Ipv4Addr::from(header_prefix.src_ip);
        let dst = Ipv4Addr::from(header_prefix.dst_ip);
        let proto = Ipv4Proto::from(header_prefix.proto);
        let ttl = header_prefix.ttl;

        let (options, rest) = rest.split_at(header_len - HEADER_PREFIX_SIZE);
        let (body, _) = rest.split_at(total_len - header_len);
        trace!(
            "ipv4: parsed header src={} dst={} proto={:?} ttl={} options={} body={}",
            src,
            dst,
            proto,
            ttl,
            options.len(),
            body.len()
        );
        Ok((Ipv4Header { src, dst, proto, ttl, options }, body))
    }
}

impl<B: Deref<Target = [u8]>> Ipv4Header<B> {
    /// The largest options blob an IPv4 header can carry.
    pub const MAX_OPTIONS_LEN: usize = MAX_HEADER_SIZE - HEADER_PREFIX_SIZE;

    /// The length of a header with no options.
    pub const MIN_HEADER_LEN: usize = HEADER_PREFIX_SIZE;

    /// The length of a header with the largest options.
    pub const MAX_HEADER_LEN: usize = MAX_HEADER_SIZE;

    /// Construct a new header.
    ///
    /// `options` is written verbatim after the fixed header when serializing,
    /// zero-padded to a multiple of 4 bytes. It fails with
    /// [`Ipv4Error::OptionsTooLong`] if it is longer than 40 bytes.
    pub fn new(
        src: Ipv4Addr,
        dst: Ipv4Addr,
        proto: Ipv4Proto,
        ttl: u8,
        options: B,
    ) -> Ipv4Result<Ipv4Header<B>> {
        if options.len() > Self::MAX_OPTIONS_LEN {
            return Err(Ipv4Error::OptionsTooLong { len: options.len() });
        }
        Ok(Ipv4Header { src, dst, proto, ttl, options })
    }

    /// The source address.
    pub fn src(&self) -> Ipv4Addr {
        self.src
    }

    /// The destination address.
    pub fn dst(&self) -> Ipv4Addr {
        self.dst
    }

    /// The protocol carried in the payload.
    pub fn proto(&self) -> Ipv4Proto {
        self.proto
    }

    /// The time to live.
    pub fn ttl(&self) -> u8 {
        self.ttl
    }

    /// The raw options, without any padding added by serialization.
    pub fn options(&self) -> &[u8] {
        &self.options
    }

    /// Iterate over the options.
    ///
    /// Iteration stops at an End of Options List marker or at the first
    /// option whose length is malformed. NOPs are skipped.
    pub fn iter_options(&self) -> impl Iterator<Item = Ipv4Option<'_>> {
        OptionIter::<Ipv4OptionImpl>::new(&self.options).filter_map(Result::ok)
    }

    /// The length of the serialized header, including option padding.
    pub fn header_len(&self) -> usize {
        HEADER_PREFIX_SIZE + padded_len(self.options.len())
    }

    /// Serialize this header into the front of `buffer`.
    ///
    /// The total length field is set to the header length, describing a
    /// packet with an empty payload. Returns the number of bytes written.
    ///
    /// Fails with [`Ipv4Error::BufferTooShort`] if `buffer` cannot hold the
    /// header, in which case `buffer` is not modified.
    pub fn serialize_into(&self, buffer: &mut [u8]) -> Ipv4Result<usize> {
        let header_len = self.header_len();
        if buffer.len() < header_len {
            return Err(Ipv4Error::BufferTooShort { required: header_len, available: buffer.len() });
        }
        self.write(&mut buffer[..header_len], header_len);
        Ok(header_len)
    }

    /// Serialize this header into a newly-allocated buffer.
    ///
    /// The total length field is set to the header length, describing a
    /// packet with an empty payload.
    pub fn serialize(&self) -> Vec<u8> {
        let header_len = self.header_len();
        let mut buffer = vec![0; header_len];
        self.write(&mut buffer, header_len);
        buffer
    }

    /// Serialize this header followed by `body` into a newly-allocated
    /// buffer.
    ///
    /// The total length field covers both header and body. Fails with
    /// [`Ipv4Error::PacketTooLong`] if that length does not fit in 16 bits.
    pub fn serialize_with_body(&self, body: &[u8]) -> Ipv4Result<Vec<u8>> {
        let header_len = self.header_len();
        let total_len = header_len + body.len();
        if !fits_in_u16(total_len) {
            return Err(Ipv4Error::PacketTooLong { len: total_len });
        }
        let mut buffer = vec![0; total_len];
        let (header, rest) = buffer.split_at_mut(header_len);
        self.write(header, total_len);
        rest.copy_from_slice(body);
        Ok(buffer)
    }

    // Writes the header into `header`, which must be exactly `header_len()`
    // bytes long. `total_len` must fit in a u16.
    fn write(&self, header: &mut [u8], total_len: usize) {
        debug_assert_eq!(header.len(), self.header_len());
        debug_assert!(fits_in_u16(total_len));
        let header_len = header.len();
        let hdr_prefix = HeaderPrefix {
            version_ihl: (IP_VERSION << 4) | (header_len / 4) as u8,
            dscp_ecn: 0,
            total_len: U16::new(total_len as u16),
            id: U16::new(0),
            flags_frag_off: [0; 2],
            ttl: self.ttl,
            proto: self.proto.into(),
            hdr_checksum: [0; 2],
            src_ip: self.src.octets(),
            dst_ip: self.dst.octets(),
        };
        let (prefix, options) = header.split_at_mut(HEADER_PREFIX_SIZE);
        prefix.copy_from_slice(hdr_prefix.as_bytes());
        let (options, padding) = options.split_at_mut(self.options.len());
        options.copy_from_slice(&self.options);
        for b in padding {
            *b = 0;
        }
        trace!("ipv4: serialized {} byte header, total length {}", header_len, total_len);
    }
}

/// Build the pseudo-header used by upper-layer protocols to compute their
/// checksums.
///
/// The pseudo-header is laid out as source address, destination address, a
/// zero byte, the protocol number, and the upper-layer length in network
/// byte order.
pub fn pseudo_header(
    src: Ipv4Addr,
    dst: Ipv4Addr,
    proto: IpProto,
    upper_layer_len: u16,
) -> [u8; PSEUDO_HEADER_LEN] {
    let header = PseudoHeader {
        src_ip: src.octets(),
        dst_ip: dst.octets(),
        zero: 0,
        proto: proto.into(),
        upper_layer_len: U16::new(upper_layer_len),
    };
    let mut bytes = [0; PSEUDO_HEADER_LEN];
    bytes.copy_from_slice(header.as_bytes());
    bytes
}

/// An IPv4 header option.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct Ipv4Option<'a> {
    /// Whether the option is copied into every fragment.
    pub copied: bool,
    /// The option kind.
    pub kind: u8,
    /// The option data, not including the kind and length bytes.
    pub data: &'a [u8],
}

struct Ipv4OptionImpl;

impl OptionImplErr for Ipv4OptionImpl {
    type Error = Infallible;
}

impl<'a> OptionImpl<'a> for Ipv4OptionImpl {
    type Output = Ipv4Option<'a>;

    fn parse(kind: u8, data: &'a [u8]) -> Result<Option<Ipv4Option<'a>>, Infallible> {
        Ok(Some(Ipv4Option { copied: kind & (1 << 7) != 0, kind, data }))
    }
}
