// Copyright 2018 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Custom error types for the wire formats.

use thiserror::Error;

/// Results returned from IPv4 header parsing and serialization.
pub type Ipv4Result<T> = core::result::Result<T, Ipv4Error>;

/// Results returned from TCP option parsing and serialization.
pub type TcpOptionResult<T> = core::result::Result<T, TcpOptionError>;

/// Error type for IPv4 header parsing and serialization.
///
/// Length checks are performed before any other header field is read, so a
/// header that fails with one of the length errors has not been trusted for
/// anything else.
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum Ipv4Error {
    /// The header length field describes fewer than the 20 bytes of a
    /// minimal IPv4 header.
    ///
    /// An empty buffer, which has no header length field at all, is reported
    /// with a `header_len` of 0.
    #[error("malformed header length: {header_len} bytes")]
    MalformedHeaderLength {
        /// The header length in bytes, as computed from the IHL field.
        header_len: usize,
    },
    /// The total length field is smaller than the header length.
    #[error("total length {total_len} is shorter than header length {header_len}")]
    MalformedTotalLength {
        /// The value of the total length field.
        total_len: usize,
        /// The header length in bytes, as computed from the IHL field.
        header_len: usize,
    },
    /// A buffer is shorter than the length claimed by the header, or a
    /// destination buffer is too small to hold the serialized header.
    #[error("buffer shorter than claimed length: need {required} bytes, have {available}")]
    BufferTooShort {
        /// The number of bytes needed.
        required: usize,
        /// The number of bytes available.
        available: usize,
    },
    /// The options do not fit in the 40 bytes an IPv4 header can carry.
    #[error("options too long: {len} bytes")]
    OptionsTooLong {
        /// The length of the rejected options.
        len: usize,
    },
    /// The header and body together exceed the 16-bit total length field.
    #[error("packet too long: {len} bytes")]
    PacketTooLong {
        /// The length of header plus body.
        len: usize,
    },
}

/// Error type for TCP option parsing and serialization.
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum TcpOptionError {
    /// A Maximum Segment Size option declares a length other than 4.
    ///
    /// Unlike other malformed option framing, which only ends the option
    /// list, this aborts the whole parse.
    #[error("MSS size is unreasonable")]
    UnreasonableMss {
        /// The declared length of the option, including kind and length bytes.
        len: usize,
    },
    /// A destination buffer cannot hold the unpadded options.
    #[error("buffer too short: need {required} bytes, have {available}")]
    BufferTooShort {
        /// The number of bytes needed.
        required: usize,
        /// The number of bytes available.
        available: usize,
    },
    /// An option's encoded length does not fit in its length byte.
    #[error("option {kind} too long: {len} bytes")]
    OptionTooLong {
        /// The option kind.
        kind: u8,
        /// The encoded length of the option.
        len: usize,
    },
}
