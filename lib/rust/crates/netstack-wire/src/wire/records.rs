// Copyright 2018 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Option records as laid out in IPv4 and TCP headers.
//!
//! Each option is either a single kind byte or a kind byte, a length byte,
//! and length - 2 data bytes. In both IPv4 and TCP, the only single-byte
//! options are End of Options List (EOL) and No Operation (NOP), both of
//! which are handled here, so an `OptionImpl` only needs to be able to parse
//! multi-byte options.
//!
//! Malformed framing (a missing length byte, a length smaller than 2, or a
//! length that runs past the end of the buffer) is treated as the end of the
//! options. Options already produced are kept. Only an error returned by
//! `OptionImpl::parse` is reported to the caller.

use core::marker::PhantomData;

use log::debug;

/// End of Options List in both IPv4 and TCP.
pub(crate) const END_OF_OPTIONS: u8 = 0;

/// NOP in both IPv4 and TCP.
pub(crate) const NOP: u8 = 1;

/// An implementation of an options parser which can return errors.
///
/// This is split from the `OptionImpl` trait so that the associated `Error`
/// type does not depend on the lifetime parameter to `OptionImpl`.
pub(crate) trait OptionImplErr {
    type Error;
}

/// An implementation of an options parser.
pub(crate) trait OptionImpl<'a>: OptionImplErr {
    /// The type of an option; the output from the `parse` function.
    type Output;

    /// The value to produce for a NOP, if NOPs are visible to the caller.
    fn nop() -> Option<Self::Output> {
        None
    }

    /// Parse an option.
    ///
    /// `parse` takes a kind byte and the variable-length data associated with
    /// it and returns `Ok(Some(o))` if the option parsed as `o`, `Ok(None)` if
    /// the data does not fit the kind and the options should end here, and
    /// `Err(err)` if the whole set of options must be rejected.
    fn parse(kind: u8, data: &'a [u8]) -> Result<Option<Self::Output>, Self::Error>;
}

/// An iterator over header options.
///
/// `OptionIter` yields each option in the order it appears in the buffer.
/// After yielding an error, or reaching the end of the options, it yields
/// nothing further.
pub(crate) struct OptionIter<'a, O> {
    bytes: &'a [u8],
    idx: usize,
    done: bool,
    _marker: PhantomData<O>,
}

impl<'a, O> OptionIter<'a, O> {
    pub(crate) fn new(bytes: &'a [u8]) -> OptionIter<'a, O> {
        OptionIter { bytes, idx: 0, done: false, _marker: PhantomData }
    }
}

impl<'a, O> Iterator for OptionIter<'a, O>
where
    O: OptionImpl<'a>,
{
    type Item = Result<O::Output, O::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match next::<O>(self.bytes, &mut self.idx) {
            Ok(Some(o)) => Some(Ok(o)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

fn next<'a, O>(bytes: &'a [u8], idx: &mut usize) -> Result<Option<O::Output>, O::Error>
where
    O: OptionImpl<'a>,
{
    loop {
        let bytes = &bytes[*idx..];
        match bytes {
            [] | [END_OF_OPTIONS, ..] => return Ok(None),
            [NOP, ..] => {
                *idx += 1;
                if let Some(o) = O::nop() {
                    return Ok(Some(o));
                }
            }
            [kind, len, ..] => {
                let len = usize::from(*len);
                if len < 2 || len > bytes.len() {
                    debug!(
                        "option {} at offset {} has bad length {} ({} bytes left), ending options",
                        kind,
                        *idx,
                        len,
                        bytes.len()
                    );
                    return Ok(None);
                }
                let start = *idx;
                *idx += len;
                return match O::parse(*kind, &bytes[2..len])? {
                    Some(o) => Ok(Some(o)),
                    None => {
                        debug!(
                            "option {} at offset {} has unexpected length {}, ending options",
                            kind, start, len
                        );
                        Ok(None)
                    }
                };
            }
            [kind] => {
                debug!("option {} at offset {} has no length byte, ending options", kind, *idx);
                return Ok(None);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct DummyOptionImpl;

    impl OptionImplErr for DummyOptionImpl {
        type Error = ();
    }
    impl<'a> OptionImpl<'a> for DummyOptionImpl {
        type Output = (u8, Vec<u8>);

        fn parse(kind: u8, data: &'a [u8]) -> Result<Option<Self::Output>, Self::Error> {
            Ok(Some((kind, data.to_vec())))
        }
    }

    struct AlwaysErrOptionImpl;

    impl OptionImplErr for AlwaysErrOptionImpl {
        type Error = ();
    }
    impl<'a> OptionImpl<'a> for AlwaysErrOptionImpl {
        type Output = ();

        fn parse(_kind: u8, _data: &'a [u8]) -> Result<Option<()>, ()> {
            Err(())
        }
    }

    fn collect<'a, O: OptionImpl<'a>>(bytes: &'a [u8]) -> Result<Vec<O::Output>, O::Error> {
        OptionIter::<O>::new(bytes).collect()
    }

    #[test]
    fn test_empty_options() {
        // all END_OF_OPTIONS
        let bytes = [END_OF_OPTIONS; 64];
        assert_eq!(collect::<DummyOptionImpl>(&bytes[..]), Ok(vec![]));

        // all NOP, which DummyOptionImpl does not surface
        let bytes = [NOP; 64];
        assert_eq!(collect::<DummyOptionImpl>(&bytes[..]), Ok(vec![]));

        assert_eq!(collect::<DummyOptionImpl>(&[]), Ok(vec![]));
    }

    #[test]
    fn test_parse() {
        // Construct byte sequences in the pattern [3, 2], [4, 3, 2], [5, 4,
        // 3, 2], etc. The second byte is the length byte, so these are all
        // valid options (with data [], [2], [3, 2], etc).
        let mut bytes = Vec::new();
        for i in 4..16 {
            // from the user's perspective, these NOPs should be transparent
            bytes.push(NOP);
            for j in (2..i).rev() {
                bytes.push(j);
            }
            bytes.push(NOP);
        }

        let options = collect::<DummyOptionImpl>(bytes.as_slice()).unwrap();
        assert_eq!(options.len(), 12);
        for (idx, (kind, data)) in options.into_iter().enumerate() {
            assert_eq!(kind as usize, idx + 3);
            let expected: Vec<u8> = (2..(idx as u8 + 2)).rev().collect();
            assert_eq!(data, expected);
        }

        // AlwaysErrOptionImpl::parse is never called for NOPs.
        let bytes = [NOP; 64];
        assert_eq!(collect::<AlwaysErrOptionImpl>(&bytes[..]), Ok(vec![]));
    }

    #[test]
    fn test_bad_framing_ends_options() {
        // the length byte is too short
        assert_eq!(collect::<DummyOptionImpl>(&[2, 1]), Ok(vec![]));

        // the length byte is 0 (worth explicitly testing since this was a
        // bug in the Linux kernel:
        // https://bugzilla.redhat.com/show_bug.cgi?id=1622404)
        assert_eq!(collect::<DummyOptionImpl>(&[2, 0]), Ok(vec![]));

        // the length byte is too long
        assert_eq!(collect::<DummyOptionImpl>(&[2, 3]), Ok(vec![]));

        // there is no length byte
        assert_eq!(collect::<DummyOptionImpl>(&[2]), Ok(vec![]));

        // options before the bad one are kept
        assert_eq!(collect::<DummyOptionImpl>(&[5, 3, 9, 7, 40]), Ok(vec![(5, vec![9])]));

        // nothing after the end of options is looked at
        assert_eq!(collect::<AlwaysErrOptionImpl>(&[END_OF_OPTIONS, 2, 2]), Ok(vec![]));
    }

    #[test]
    fn test_parse_err() {
        // the buffer is fine, but the implementation returns a parse error
        assert_eq!(collect::<AlwaysErrOptionImpl>(&[2, 2]), Err(()));

        // the iterator stops after the error
        let mut iter = OptionIter::<AlwaysErrOptionImpl>::new(&[2, 2, 3, 2]);
        assert_eq!(iter.next(), Some(Err(())));
        assert_eq!(iter.next(), None);
    }
}
