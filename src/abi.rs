//! Contract ABI Codec
//!
//! Solidity ABI encoding for the two diary entry points:
//!
//! - `addEntry(uint16,uint32,uint16,uint16,string)`
//! - `getMyEntries() returns (tuple(uint256,uint16,uint32,uint16,uint16,string)[])`
//!
//! Plus the fixed-size hex values (`Address`, `TxHash`) that travel over JSON-RPC.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::diary::{DiaryError, DiaryResult, Entry, NewEntry};

/// ABI word size in bytes
const WORD: usize = 32;

/// `bytes4(keccak256("addEntry(uint16,uint32,uint16,uint16,string)"))`
pub const ADD_ENTRY_SELECTOR: [u8; 4] = [0x56, 0x40, 0x47, 0x34];

/// `bytes4(keccak256("getMyEntries()"))`
pub const GET_MY_ENTRIES_SELECTOR: [u8; 4] = [0x13, 0x19, 0x1a, 0x6e];

/// Number of head words in one encoded entry tuple
const ENTRY_HEAD_WORDS: usize = 6;

// ============================================
// Hex values
// ============================================

fn decode_fixed_hex<const N: usize>(s: &str) -> DiaryResult<[u8; N]> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    let mut out = [0u8; N];
    hex::decode_to_slice(digits, &mut out)?;
    Ok(out)
}

/// 20-byte account or contract address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// Abbreviated form for display, e.g. `0xde65…b0bd`
    pub fn short(&self) -> String {
        let full = self.to_string();
        format!("{}…{}", &full[..6], &full[full.len() - 4..])
    }
}

impl FromStr for Address {
    type Err = DiaryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_fixed_hex(s.trim())
            .map(Address)
            .map_err(|_| DiaryError::Decode(format!("invalid address: {}", s)))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// 32-byte transaction hash
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TxHash(pub [u8; 32]);

impl FromStr for TxHash {
    type Err = DiaryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_fixed_hex(s.trim())
            .map(TxHash)
            .map_err(|_| DiaryError::Decode(format!("invalid transaction hash: {}", s)))
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// `0x`-prefixed hex encoding of arbitrary bytes (call data)
pub fn to_hex_data(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Decode `0x`-prefixed hex data; `0x` alone is empty data
pub fn from_hex_data(s: &str) -> DiaryResult<Vec<u8>> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    Ok(hex::decode(digits)?)
}

/// Parse a JSON-RPC quantity such as `0x1a`
pub fn parse_quantity(s: &str) -> DiaryResult<u64> {
    let digits = s
        .strip_prefix("0x")
        .ok_or_else(|| DiaryError::Decode(format!("quantity without 0x prefix: {}", s)))?;
    if digits.is_empty() {
        return Err(DiaryError::Decode("empty quantity".to_string()));
    }
    u64::from_str_radix(digits, 16)
        .map_err(|e| DiaryError::Decode(format!("invalid quantity {}: {}", s, e)))
}

// ============================================
// Encoding
// ============================================

fn uint_word(value: u64) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    word[WORD - 8..].copy_from_slice(&value.to_be_bytes());
    word
}

fn padded_len(len: usize) -> usize {
    len.div_ceil(WORD) * WORD
}

/// Call data for `addEntry`
pub fn encode_add_entry(entry: &NewEntry) -> Vec<u8> {
    let note = entry.note.as_bytes();
    let mut data = Vec::with_capacity(4 + WORD * 7 + padded_len(note.len()));

    data.extend_from_slice(&ADD_ENTRY_SELECTOR);
    data.extend_from_slice(&uint_word(entry.weight_kg as u64));
    data.extend_from_slice(&uint_word(entry.steps as u64));
    data.extend_from_slice(&uint_word(entry.calories_in as u64));
    data.extend_from_slice(&uint_word(entry.calories_out as u64));
    // The string lives in the tail, right after the five head words
    data.extend_from_slice(&uint_word((5 * WORD) as u64));
    data.extend_from_slice(&uint_word(note.len() as u64));
    data.extend_from_slice(note);
    data.resize(data.len() + padded_len(note.len()) - note.len(), 0);

    data
}

/// Call data for `getMyEntries`
pub fn encode_get_my_entries() -> Vec<u8> {
    GET_MY_ENTRIES_SELECTOR.to_vec()
}

// ============================================
// Decoding
// ============================================

/// Bounds-checked view over ABI return data
struct Reader<'a> {
    data: &'a [u8],
}

impl<'a> Reader<'a> {
    fn word(&self, offset: usize) -> DiaryResult<&'a [u8]> {
        offset
            .checked_add(WORD)
            .and_then(|end| self.data.get(offset..end))
            .ok_or_else(|| {
                DiaryError::Decode(format!(
                    "word at offset {} is past the end of {} bytes",
                    offset,
                    self.data.len()
                ))
            })
    }

    /// Read an unsigned integer that must fit in `bits`
    fn uint(&self, offset: usize, bits: u32) -> DiaryResult<u64> {
        let word = self.word(offset)?;
        if word[..WORD - 8].iter().any(|b| *b != 0) {
            return Err(DiaryError::Decode(format!(
                "integer at offset {} does not fit in {} bits",
                offset, bits
            )));
        }
        let mut low = [0u8; 8];
        low.copy_from_slice(&word[WORD - 8..]);
        let value = u64::from_be_bytes(low);
        if bits < 64 && value >> bits != 0 {
            return Err(DiaryError::Decode(format!(
                "integer {} at offset {} does not fit in {} bits",
                value, offset, bits
            )));
        }
        Ok(value)
    }

    /// Read an offset or length word and convert it to `usize`
    fn size(&self, offset: usize) -> DiaryResult<usize> {
        let value = self.uint(offset, 64)?;
        usize::try_from(value)
            .map_err(|_| DiaryError::Decode(format!("size {} is too large", value)))
    }

    fn string(&self, offset: usize) -> DiaryResult<String> {
        let len = self.size(offset)?;
        let start = offset + WORD;
        let bytes = start
            .checked_add(len)
            .and_then(|end| self.data.get(start..end))
            .ok_or_else(|| DiaryError::Decode(format!("string of {} bytes is truncated", len)))?;
        String::from_utf8(bytes.to_vec())
            .map_err(|e| DiaryError::Decode(format!("note is not valid UTF-8: {}", e)))
    }

    /// Offset of the `index`-th head word of a tuple starting at `base`
    fn field(base: usize, index: usize) -> DiaryResult<usize> {
        index
            .checked_mul(WORD)
            .and_then(|n| base.checked_add(n))
            .ok_or_else(|| DiaryError::Decode(format!("tuple at offset {} overflows", base)))
    }

    fn entry(&self, base: usize) -> DiaryResult<Entry> {
        let note_offset = self.size(Self::field(base, 5)?)?;
        let note_at = base
            .checked_add(note_offset)
            .ok_or_else(|| DiaryError::Decode("note offset overflows".to_string()))?;

        Ok(Entry {
            timestamp: self.uint(base, 64)?,
            weight_kg: self.uint(Self::field(base, 1)?, 16)? as u16,
            steps: self.uint(Self::field(base, 2)?, 32)? as u32,
            calories_in: self.uint(Self::field(base, 3)?, 16)? as u16,
            calories_out: self.uint(Self::field(base, 4)?, 16)? as u16,
            note: self.string(note_at)?,
        })
    }
}

/// Decode the return data of `getMyEntries`, preserving contract order
pub fn decode_entries(data: &[u8]) -> DiaryResult<Vec<Entry>> {
    let reader = Reader { data };

    let array_at = reader.size(0)?;
    let count = reader.size(array_at)?;
    // Tuple offsets are relative to the first word after the length
    let items_at = array_at + WORD;

    // Each element needs at least an offset word and its head; reject
    // absurd counts before allocating
    let min_len = count
        .checked_mul(WORD * (1 + ENTRY_HEAD_WORDS + 1))
        .and_then(|n| n.checked_add(items_at));
    if min_len.map_or(true, |n| n > data.len()) {
        return Err(DiaryError::Decode(format!(
            "{} entries cannot fit in {} bytes",
            count,
            data.len()
        )));
    }

    let mut entries = Vec::with_capacity(count);
    for i in 0..count {
        let relative = reader.size(items_at + i * WORD)?;
        let base = items_at
            .checked_add(relative)
            .ok_or_else(|| DiaryError::Decode("entry offset overflows".to_string()))?;
        entries.push(reader.entry(base)?);
    }

    Ok(entries)
}
