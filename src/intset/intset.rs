use std::fmt;

use rand::Rng;
use tracing::{debug, warn};

use crate::intset::error::IntSetError;
use crate::intset::lib::{decode, element_offset, encode, read_u32, write_u32, Encoding};
use crate::intset::INTSET_HEADER_SIZE;

/// Sorted, duplicate free set of `i64` backed by one packed blob.
///
/// `contents` always holds the full serialized form: the 8 byte header
/// followed by `length` elements of `encoding.width()` bytes. Mutating calls
/// take the set by value and hand back the (possibly reallocated) new one.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct IntSet {
    encoding: Encoding,
    length: u32,
    contents: Vec<u8>,
}

impl Default for IntSet {
    fn default() -> Self {
        Self::new()
    }
}

impl IntSet {
    pub fn new() -> Self {
        let mut contents = vec![0u8; INTSET_HEADER_SIZE];
        write_u32(&mut contents, 0, Encoding::Int16.as_u32());
        Self {
            encoding: Encoding::Int16,
            length: 0,
            contents,
        }
    }

    /// Loads a set from its serialized blob, checking the header and the
    /// element order first.
    pub fn from_blob(blob: &[u8]) -> Result<Self, IntSetError> {
        Self::validate_integrity(blob, true)?;
        let encoding = Encoding::from_u32(read_u32(blob, 0))
            .ok_or_else(|| IntSetError::InvalidEncoding(read_u32(blob, 0)))?;
        let length = read_u32(blob, 4);
        Ok(Self {
            encoding,
            length,
            contents: blob.to_vec(),
        })
    }

    /// Checks that `blob` is a well formed serialized set.
    ///
    /// The header must name a known width and the blob size must match the
    /// element count exactly. Empty sets are never persisted, so they are
    /// rejected. With `deep` the elements must also be strictly ascending.
    pub fn validate_integrity(blob: &[u8], deep: bool) -> Result<(), IntSetError> {
        let res = Self::check_blob(blob, deep);
        if let Err(e) = &res {
            warn!(cause = %e, size = blob.len(), "intset blob rejected");
        }
        res
    }

    fn check_blob(blob: &[u8], deep: bool) -> Result<(), IntSetError> {
        if blob.len() < INTSET_HEADER_SIZE {
            return Err(IntSetError::TooShort(blob.len()));
        }
        let raw = read_u32(blob, 0);
        let encoding = Encoding::from_u32(raw).ok_or(IntSetError::InvalidEncoding(raw))?;
        let count = read_u32(blob, 4) as usize;

        let expected = count
            .checked_mul(encoding.width())
            .and_then(|n| n.checked_add(INTSET_HEADER_SIZE))
            .unwrap_or(usize::MAX);
        if expected != blob.len() {
            return Err(IntSetError::LengthMismatch {
                expected,
                actual: blob.len(),
            });
        }
        if count == 0 {
            return Err(IntSetError::Empty);
        }
        if !deep {
            return Ok(());
        }

        let mut prev = decode(blob, 0, encoding);
        for i in 1..count {
            let cur = decode(blob, i, encoding);
            if cur <= prev {
                return Err(IntSetError::Unordered(i));
            }
            prev = cur;
        }
        Ok(())
    }

    /// Reallocates to hold exactly `len` elements at the current encoding.
    fn resize(&mut self, len: u32) {
        let width = self.encoding.width();
        assert!(
            (len as usize) <= (usize::MAX - INTSET_HEADER_SIZE) / width,
            "intset size overflow"
        );
        self.contents.resize(INTSET_HEADER_SIZE + len as usize * width, 0);
        self.contents.shrink_to_fit();
    }

    fn sync_header(&mut self) {
        write_u32(&mut self.contents, 0, self.encoding.as_u32());
        write_u32(&mut self.contents, 4, self.length);
    }

    #[inline]
    fn get_unchecked(&self, pos: usize) -> i64 {
        decode(&self.contents, pos, self.encoding)
    }

    /// Binary search for `value`.
    ///
    /// Returns `(true, index)` when present, otherwise `(false, pos)` where
    /// `pos` is the index the value would have to be inserted at.
    pub fn search(&self, value: i64) -> (bool, usize) {
        let length = self.length as usize;
        if length == 0 {
            return (false, 0);
        }
        // common case for appends
        if value > self.get_unchecked(length - 1) {
            return (false, length);
        } else if value < self.get_unchecked(0) {
            return (false, 0);
        }

        let mut min = 0;
        let mut max = length;
        while min < max {
            let mid = min + (max - min) / 2;
            let cur = self.get_unchecked(mid);
            if value > cur {
                min = mid + 1;
            } else if value < cur {
                max = mid;
            } else {
                return (true, mid);
            }
        }
        (false, min)
    }

    /// Moves every element from `from` to the end so it starts at `to`.
    /// The buffer must already be large enough for the destination.
    fn move_tail(&mut self, from: usize, to: usize) {
        let bytes = (self.length as usize - from) * self.encoding.width();
        let src = element_offset(from, self.encoding);
        let dst = element_offset(to, self.encoding);
        self.contents.copy_within(src..src + bytes, dst);
    }

    // The new value is outside the current range, so it is either the new
    // minimum (negative) or the new maximum.
    fn upgrade_and_add(mut self, value: i64) -> Self {
        let cur_encoding = self.encoding;
        let new_encoding = Encoding::for_value(value);
        let length = self.length as usize;
        let prepend = usize::from(value < 0);

        self.encoding = new_encoding;
        self.resize(self.length + 1);

        // back to front so no unread element gets overwritten
        for i in (0..length).rev() {
            let v = decode(&self.contents, i, cur_encoding);
            encode(&mut self.contents, i + prepend, new_encoding, v);
        }

        if prepend == 1 {
            encode(&mut self.contents, 0, new_encoding, value);
        } else {
            encode(&mut self.contents, length, new_encoding, value);
        }
        self.length += 1;
        self.sync_header();
        debug!(from = %cur_encoding, to = %new_encoding, length = self.length, "intset upgraded");
        self
    }

    /// Inserts `value`. The flag is false when it was already present, in
    /// which case the set is returned untouched.
    pub fn add(mut self, value: i64) -> (Self, bool) {
        assert!(self.length < u32::MAX, "intset is full");
        if Encoding::for_value(value) > self.encoding {
            return (self.upgrade_and_add(value), true);
        }

        let (found, pos) = self.search(value);
        if found {
            return (self, false);
        }

        self.resize(self.length + 1);
        if pos < self.length as usize {
            self.move_tail(pos, pos + 1);
        }
        encode(&mut self.contents, pos, self.encoding, value);
        self.length += 1;
        self.sync_header();
        (self, true)
    }

    /// Deletes `value`. The encoding is left as is even when no remaining
    /// element needs it.
    pub fn remove(mut self, value: i64) -> (Self, bool) {
        if Encoding::for_value(value) > self.encoding {
            return (self, false);
        }

        let (found, pos) = self.search(value);
        if !found {
            return (self, false);
        }

        let length = self.length as usize;
        if pos < length - 1 {
            self.move_tail(pos + 1, pos);
        }
        self.resize(self.length - 1);
        self.length -= 1;
        self.sync_header();
        (self, true)
    }

    pub fn find(&self, value: i64) -> bool {
        Encoding::for_value(value) <= self.encoding && self.search(value).0
    }

    /// Element at logical index `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos >= self.len()`.
    pub fn get(&self, pos: usize) -> i64 {
        assert!(
            pos < self.length as usize,
            "intset index {} out of range for length {}",
            pos,
            self.length
        );
        self.get_unchecked(pos)
    }

    pub fn try_get(&self, pos: usize) -> Option<i64> {
        if pos < self.length as usize {
            return Some(self.get_unchecked(pos));
        }
        None
    }

    /// Uniformly chosen element.
    ///
    /// # Panics
    ///
    /// Panics on an empty set.
    pub fn random(&self) -> i64 {
        self.random_with(&mut rand::rng())
    }

    pub fn random_with<R: Rng + ?Sized>(&self, rng: &mut R) -> i64 {
        assert!(self.length > 0, "random member of an empty intset");
        self.get_unchecked(rng.random_range(0..self.length as usize))
    }

    pub fn min(&self) -> Option<i64> {
        self.try_get(0)
    }

    pub fn max(&self) -> Option<i64> {
        (self.length as usize).checked_sub(1).map(|pos| self.get_unchecked(pos))
    }

    pub fn len(&self) -> usize {
        self.length as usize
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Size of the serialized blob, header included.
    pub fn blob_len(&self) -> usize {
        self.contents.len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.contents
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.contents
    }
}

impl FromIterator<i64> for IntSet {
    fn from_iter<T: IntoIterator<Item = i64>>(iter: T) -> Self {
        iter.into_iter()
            .fold(IntSet::new(), |set, value| set.add(value).0)
    }
}

impl fmt::Display for IntSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", value)?;
        }
        Ok(())
    }
}

impl fmt::Debug for IntSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntSet")
            .field("encoding", &self.encoding)
            .field("length", &self.length)
            .field("elements", &self.iter().collect::<Vec<_>>())
            .finish()
    }
}
