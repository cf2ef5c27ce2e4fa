// Copyright 2018 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Wire formats for the network stack.
//!
//! This crate converts between raw byte buffers and structured IPv4 headers
//! and TCP option lists. It performs no I/O and keeps no state; every
//! function is a bounded, single-pass transformation over the buffers it is
//! given. Checksums, routing, and fragmentation are handled by other layers.

#![deny(missing_docs, unreachable_patterns)]

#[macro_use]
mod macros;

pub mod error;
pub mod ip;
#[cfg(test)]
mod testutil;
pub mod wire;

pub use crate::error::{Ipv4Error, TcpOptionError};
pub use crate::ip::{IpProto, Ipv4Proto, DEFAULT_TTL};
pub use crate::wire::ipv4::{pseudo_header, Ipv4Header, Ipv4Option, PSEUDO_HEADER_LEN};
pub use crate::wire::tcp::{options_encoded_len, parse_options, serialize_options, TcpOption};
