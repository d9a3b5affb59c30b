//! The 32-byte word, the unit of the ABI wire format.

use crate::abi::AbiError;
use crate::types::{I256, U256};
use std::fmt;
use std::ops::{Deref, DerefMut};

/// Size of an ABI word in bytes.
pub const WORD_LEN: usize = 32;

/// Returns the number of words required to hold `len` bytes.
pub fn required_words(len: usize) -> usize {
    if len == 0 {
        0
    } else {
        1 + (len - 1) / WORD_LEN
    }
}

/// A single 32-byte ABI word.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Word(pub [u8; WORD_LEN]);

impl Word {
    /// The all-zero word.
    pub const ZERO: Self = Self([0u8; WORD_LEN]);

    /// Returns `true` if every byte is zero.
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    /// Builds a word with `bytes` right-aligned and the front zero-padded.
    ///
    /// Fails with `OutOfRange` if more than 32 bytes are given.
    pub fn left_padded(bytes: &[u8]) -> Result<Self, AbiError> {
        if bytes.len() > WORD_LEN {
            return Err(AbiError::out_of_range(format!(
                "{} bytes do not fit in a word",
                bytes.len()
            )))
        }
        let mut word = Self::ZERO;
        word.0[WORD_LEN - bytes.len()..].copy_from_slice(bytes);
        Ok(word)
    }

    /// Builds a word with `bytes` left-aligned and the back zero-padded.
    ///
    /// Fails with `OutOfRange` if more than 32 bytes are given.
    pub fn right_padded(bytes: &[u8]) -> Result<Self, AbiError> {
        if bytes.len() > WORD_LEN {
            return Err(AbiError::out_of_range(format!(
                "{} bytes do not fit in a word",
                bytes.len()
            )))
        }
        let mut word = Self::ZERO;
        word.0[..bytes.len()].copy_from_slice(bytes);
        Ok(word)
    }

    /// Builds a word holding an unsigned 256-bit integer, big-endian.
    pub fn from_uint(value: U256) -> Self {
        let mut word = Self::ZERO;
        value.to_big_endian(&mut word.0);
        word
    }

    /// Builds a word holding a signed 256-bit integer as two's complement.
    pub fn from_int(value: I256) -> Self {
        Self::from_uint(value.into_raw())
    }

    /// Reads the word as an unsigned 256-bit integer.
    pub fn to_uint(&self) -> U256 {
        U256::from_big_endian(&self.0)
    }

    /// Reads the word as a signed 256-bit integer (two's-complement
    /// interpretation).
    pub fn to_int(&self) -> I256 {
        I256::from_raw(self.to_uint())
    }

    /// Reads the word as a `usize`, failing with `OutOfRange` on overflow.
    ///
    /// Used for offsets and lengths.
    pub fn to_usize(&self) -> Result<usize, AbiError> {
        let value = self.to_uint();
        if value > U256::from(usize::MAX) {
            return Err(AbiError::out_of_range(format!("{value} does not fit in usize")))
        }
        Ok(value.low_u64() as usize)
    }
}

impl From<[u8; WORD_LEN]> for Word {
    fn from(bytes: [u8; WORD_LEN]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Word {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Word(0x{})", hex::encode(self.0))
    }
}

/// An ordered sequence of ABI words.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Words(Vec<Word>);

impl Words {
    /// Creates an empty word sequence.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Creates an empty word sequence with room for `cap` words.
    pub fn with_capacity(cap: usize) -> Self {
        Self(Vec::with_capacity(cap))
    }

    /// Builds a word sequence from a byte slice, rounding the length up to a
    /// multiple of 32 and right-padding the final partial word with zeros.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut words = Self::with_capacity(required_words(bytes.len()));
        words.append_bytes(bytes);
        words
    }

    /// Appends `bytes`, right-padding the final partial word with zeros.
    pub fn append_bytes(&mut self, bytes: &[u8]) {
        let mut chunks = bytes.chunks_exact(WORD_LEN);
        for chunk in &mut chunks {
            let mut word = Word::ZERO;
            word.0.copy_from_slice(chunk);
            self.0.push(word);
        }
        let tail = chunks.remainder();
        if !tail.is_empty() {
            let mut word = Word::ZERO;
            word.0[..tail.len()].copy_from_slice(tail);
            self.0.push(word);
        }
    }

    /// Appends the words of `other`.
    pub fn extend(&mut self, other: Words) {
        self.0.extend(other.0);
    }

    /// Appends a single word.
    pub fn push(&mut self, word: Word) {
        self.0.push(word);
    }

    /// Total length in bytes.
    pub fn byte_len(&self) -> usize {
        self.0.len() * WORD_LEN
    }

    /// Flat byte extraction.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.byte_len());
        for word in &self.0 {
            out.extend_from_slice(&word.0);
        }
        out
    }
}

impl Deref for Words {
    type Target = [Word];

    fn deref(&self) -> &[Word] {
        &self.0
    }
}

impl DerefMut for Words {
    fn deref_mut(&mut self) -> &mut [Word] {
        &mut self.0
    }
}

impl From<Vec<Word>> for Words {
    fn from(words: Vec<Word>) -> Self {
        Self(words)
    }
}

impl fmt::Debug for Words {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}
