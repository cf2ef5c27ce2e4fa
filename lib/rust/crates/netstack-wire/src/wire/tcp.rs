// Copyright 2018 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Parsing and serialization of TCP options.
//!
//! Options are parsed in a single pass, in order. Framing that cannot be
//! trusted (a missing length byte, a length below 2, a length that runs past
//! the end of the buffer, or a SACK Permitted or Timestamp option of the
//! wrong size) ends the option list; everything parsed before that point is
//! still returned. A Maximum Segment Size option of the wrong size is the
//! exception: it fails the whole parse.

use byteorder::{ByteOrder, NetworkEndian};
use log::trace;

use crate::error::{TcpOptionError, TcpOptionResult};
use crate::wire::records::{OptionImpl, OptionImplErr, OptionIter, END_OF_OPTIONS, NOP};
use crate::wire::util::padded_len;

const OPTION_KIND_MSS: u8 = 2;
const OPTION_KIND_SACK_PERMITTED: u8 = 4;
const OPTION_KIND_TIMESTAMP: u8 = 8;

const OPTION_LEN_MSS: usize = 4;
const OPTION_LEN_SACK_PERMITTED: usize = 2;
const OPTION_LEN_TIMESTAMP: usize = 10;

/// A TCP header option.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum TcpOption {
    /// No Operation, a single byte used to align the options that follow.
    NoOp,
    /// End of Options List.
    ///
    /// Never produced by [`parse_options`], which stops at this marker.
    EndOfList,
    /// Maximum Segment Size.
    MaxSegmentSize(u16),
    /// Selective Acknowledgement Permitted.
    SackPermitted,
    /// Timestamps.
    Timestamp {
        /// The sender's timestamp value.
        ts_val: u32,
        /// The timestamp being echoed back to the peer.
        ts_echo_reply: u32,
    },
    /// Any other option, kept verbatim.
    Unknown {
        /// The option kind.
        kind: u8,
        /// The option data, not including the kind and length bytes.
        data: Vec<u8>,
    },
}

impl TcpOption {
    /// The number of bytes this option occupies on the wire.
    pub fn encoded_len(&self) -> usize {
        match self {
            TcpOption::NoOp | TcpOption::EndOfList => 1,
            TcpOption::MaxSegmentSize(_) => OPTION_LEN_MSS,
            TcpOption::SackPermitted => OPTION_LEN_SACK_PERMITTED,
            TcpOption::Timestamp { .. } => OPTION_LEN_TIMESTAMP,
            TcpOption::Unknown { data, .. } => 2 + data.len(),
        }
    }

    // Writes this option to the front of `bytes`, which must be at least
    // `encoded_len()` bytes long, and returns the number of bytes written.
    fn serialize(&self, bytes: &mut [u8]) -> usize {
        let len = self.encoded_len();
        let bytes = &mut bytes[..len];
        match self {
            TcpOption::NoOp => bytes[0] = NOP,
            TcpOption::EndOfList => bytes[0] = END_OF_OPTIONS,
            TcpOption::MaxSegmentSize(mss) => {
                bytes[..2].copy_from_slice(&[OPTION_KIND_MSS, OPTION_LEN_MSS as u8]);
                NetworkEndian::write_u16(&mut bytes[2..], *mss);
            }
            TcpOption::SackPermitted => {
                bytes.copy_from_slice(&[OPTION_KIND_SACK_PERMITTED, OPTION_LEN_SACK_PERMITTED as u8]);
            }
            TcpOption::Timestamp { ts_val, ts_echo_reply } => {
                bytes[..2].copy_from_slice(&[OPTION_KIND_TIMESTAMP, OPTION_LEN_TIMESTAMP as u8]);
                NetworkEndian::write_u32(&mut bytes[2..6], *ts_val);
                NetworkEndian::write_u32(&mut bytes[6..], *ts_echo_reply);
            }
            TcpOption::Unknown { kind, data } => {
                bytes[0] = *kind;
                bytes[1] = len as u8;
                bytes[2..].copy_from_slice(data);
            }
        }
        len
    }
}

/// The number of bytes `options` occupy on the wire, before padding.
pub fn options_encoded_len(options: &[TcpOption]) -> usize {
    options.iter().map(TcpOption::encoded_len).sum()
}

/// Parse a sequence of TCP options.
///
/// Returns the options in the order they appear in `bytes`, stopping at an
/// End of Options List marker or at the end of the buffer. NOPs are
/// included in the output. Malformed framing ends the list without an
/// error; only a Maximum Segment Size option whose length is not 4 fails
/// with [`TcpOptionError::UnreasonableMss`].
pub fn parse_options(bytes: &[u8]) -> TcpOptionResult<Vec<TcpOption>> {
    let options = OptionIter::<TcpOptionImpl>::new(bytes).collect::<Result<Vec<_>, _>>()?;
    trace!("tcp: parsed {} options from {} bytes", options.len(), bytes.len());
    Ok(options)
}

/// Serialize a sequence of TCP options into the front of `buffer`.
///
/// Options are written in order, then zero-padded up to a multiple of 4
/// bytes. Padding is only written as far as `buffer` extends, and no byte
/// past the padded length is touched. An empty sequence writes nothing.
/// Returns the number of bytes written, including padding.
///
/// Fails with [`TcpOptionError::BufferTooShort`] if `buffer` cannot hold the
/// unpadded options, or [`TcpOptionError::OptionTooLong`] if an unknown
/// option's data does not fit its length byte. Nothing is written on
/// failure.
pub fn serialize_options(options: &[TcpOption], buffer: &mut [u8]) -> TcpOptionResult<usize> {
    for option in options {
        if let TcpOption::Unknown { kind, .. } = option {
            let len = option.encoded_len();
            if len > usize::from(u8::MAX) {
                return Err(TcpOptionError::OptionTooLong { kind: *kind, len });
            }
        }
    }
    let len = options_encoded_len(options);
    if buffer.len() < len {
        return Err(TcpOptionError::BufferTooShort { required: len, available: buffer.len() });
    }

    let mut idx = 0;
    for option in options {
        idx += option.serialize(&mut buffer[idx..]);
    }
    debug_assert_eq!(idx, len);
    let padded = core::cmp::min(padded_len(len), buffer.len());
    for b in &mut buffer[len..padded] {
        *b = 0;
    }
    trace!("tcp: serialized {} options into {} bytes", options.len(), padded);
    Ok(padded)
}

struct TcpOptionImpl;

impl OptionImplErr for TcpOptionImpl {
    type Error = TcpOptionError;
}

impl<'a> OptionImpl<'a> for TcpOptionImpl {
    type Output = TcpOption;

    fn nop() -> Option<TcpOption> {
        Some(TcpOption::NoOp)
    }

    fn parse(kind: u8, data: &'a [u8]) -> Result<Option<TcpOption>, TcpOptionError> {
        match kind {
            OPTION_KIND_MSS => {
                if data.len() != OPTION_LEN_MSS - 2 {
                    Err(TcpOptionError::UnreasonableMss { len: data.len() + 2 })
                } else {
                    Ok(Some(TcpOption::MaxSegmentSize(NetworkEndian::read_u16(data))))
                }
            }
            OPTION_KIND_SACK_PERMITTED => {
                if data.is_empty() {
                    Ok(Some(TcpOption::SackPermitted))
                } else {
                    Ok(None)
                }
            }
            OPTION_KIND_TIMESTAMP => {
                if data.len() != OPTION_LEN_TIMESTAMP - 2 {
                    Ok(None)
                } else {
                    Ok(Some(TcpOption::Timestamp {
                        ts_val: NetworkEndian::read_u32(data),
                        ts_echo_reply: NetworkEndian::read_u32(&data[4..]),
                    }))
                }
            }
            kind => Ok(Some(TcpOption::Unknown { kind, data: data.to_vec() })),
        }
    }
}
