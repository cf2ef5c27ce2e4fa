// Copyright 2018 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

/// Whether `size` fits in a `u16`.
pub(crate) fn fits_in_u16(size: usize) -> bool {
    size < 1 << 16
}

/// Round `len` up to the next multiple of 4.
///
/// Both IPv4 header options and TCP options must end on a 32-bit boundary.
pub(crate) fn padded_len(len: usize) -> usize {
    (len + 3) & !3
}
