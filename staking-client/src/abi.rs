//! Minimal ABI codec for the handful of call shapes the staking contracts use.
//!
//! Every integer the client handles fits in 128 bits. Return words with any
//! of their upper 16 bytes set are rejected rather than truncated.

use {
    crate::{
        error::{ClientError, Result},
        primitives::Address,
    },
    sha3::{Digest, Keccak256},
};

const WORD: usize = 32;

/// Number of words in an ABI-encoded `Stake` tuple.
const STAKE_WORDS: usize = 5;

/// A call argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Any `uintN` argument, including `uint8`.
    Uint(u128),
    Address(Address),
    AddressArray(Vec<Address>),
}

/// First four bytes of the Keccak-256 hash of a function signature.
pub fn selector(signature: &str) -> [u8; 4] {
    let digest = Keccak256::digest(signature.as_bytes());
    let mut out = [0u8; 4];
    out.copy_from_slice(&digest[..4]);
    out
}

/// Calldata for `signature` applied to `tokens`.
pub fn encode_call(signature: &str, tokens: &[Token]) -> Vec<u8> {
    let mut out = selector(signature).to_vec();
    out.extend(encode_tokens(tokens));
    out
}

fn encode_tokens(tokens: &[Token]) -> Vec<u8> {
    let head_len = tokens.len().saturating_mul(WORD);
    let mut head = Vec::with_capacity(head_len);
    let mut tail = Vec::new();
    for token in tokens {
        match token {
            Token::Uint(value) => head.extend_from_slice(&uint_word(*value)),
            Token::Address(address) => head.extend_from_slice(&address_word(address)),
            Token::AddressArray(items) => {
                let offset = head_len.saturating_add(tail.len());
                head.extend_from_slice(&uint_word(offset as u128));
                tail.extend_from_slice(&uint_word(items.len() as u128));
                for item in items {
                    tail.extend_from_slice(&address_word(item));
                }
            }
        }
    }
    head.extend(tail);
    head
}

fn uint_word(value: u128) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    word[16..].copy_from_slice(&value.to_be_bytes());
    word
}

fn address_word(address: &Address) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    word[12..].copy_from_slice(address.as_bytes());
    word
}

/// Reads words out of return data with bounds checks.
struct Decoder<'a> {
    data: &'a [u8],
}

impl<'a> Decoder<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    fn word_at(&self, offset: usize) -> Result<&'a [u8]> {
        let end = offset
            .checked_add(WORD)
            .ok_or_else(|| ClientError::Decode("offset overflow".to_string()))?;
        self.data.get(offset..end).ok_or_else(|| {
            ClientError::Decode(format!(
                "return data too short: need {end} bytes, have {}",
                self.data.len()
            ))
        })
    }

    fn uint_at(&self, offset: usize) -> Result<u128> {
        let word = self.word_at(offset)?;
        if word[..16].iter().any(|b| *b != 0) {
            return Err(ClientError::Decode(format!(
                "value at byte {offset} does not fit in 128 bits"
            )));
        }
        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(&word[16..]);
        Ok(u128::from_be_bytes(bytes))
    }

    fn usize_at(&self, offset: usize) -> Result<usize> {
        let value = self.uint_at(offset)?;
        usize::try_from(value)
            .map_err(|_| ClientError::Decode(format!("length or offset {value} out of range")))
    }

    fn address_at(&self, offset: usize) -> Result<Address> {
        let word = self.word_at(offset)?;
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&word[12..]);
        Ok(Address::new(bytes))
    }

    /// Location and element count of the dynamic value referenced by the head
    /// word at `head_offset`.
    fn dynamic_at(&self, head_offset: usize) -> Result<(usize, usize)> {
        let start = self.usize_at(head_offset)?;
        let len = self.usize_at(start)?;
        Ok((start.saturating_add(WORD), len))
    }

    fn uint_array_at(&self, head_offset: usize, words_per_item: usize) -> Result<Vec<Vec<u128>>> {
        let (start, len) = self.dynamic_at(head_offset)?;
        let item_size = words_per_item.saturating_mul(WORD);
        let needed = len
            .checked_mul(item_size)
            .and_then(|size| size.checked_add(start))
            .ok_or_else(|| ClientError::Decode(format!("array length {len} out of range")))?;
        if needed > self.data.len() {
            return Err(ClientError::Decode(format!(
                "array of {len} items exceeds return data"
            )));
        }
        (0..len)
            .map(|index| {
                let base = start.saturating_add(index.saturating_mul(item_size));
                (0..words_per_item)
                    .map(|word| self.uint_at(base.saturating_add(word.saturating_mul(WORD))))
                    .collect()
            })
            .collect()
    }
}

pub fn decode_uint(data: &[u8]) -> Result<u128> {
    Decoder::new(data).uint_at(0)
}

pub fn decode_u64(data: &[u8]) -> Result<u64> {
    let value = decode_uint(data)?;
    u64::try_from(value).map_err(|_| ClientError::Decode(format!("{value} does not fit in 64 bits")))
}

pub fn decode_u8(data: &[u8]) -> Result<u8> {
    let value = decode_uint(data)?;
    u8::try_from(value).map_err(|_| ClientError::Decode(format!("{value} does not fit in 8 bits")))
}

pub fn decode_address(data: &[u8]) -> Result<Address> {
    Decoder::new(data).address_at(0)
}

pub fn decode_string(data: &[u8]) -> Result<String> {
    let decoder = Decoder::new(data);
    let (start, len) = decoder.dynamic_at(0)?;
    let bytes = start
        .checked_add(len)
        .and_then(|end| data.get(start..end))
        .ok_or_else(|| ClientError::Decode(format!("string of {len} bytes exceeds return data")))?;
    String::from_utf8(bytes.to_vec())
        .map_err(|err| ClientError::Decode(format!("string is not utf-8: {err}")))
}

pub fn decode_uint_array(data: &[u8]) -> Result<Vec<u128>> {
    Ok(Decoder::new(data)
        .uint_array_at(0, 1)?
        .into_iter()
        .flatten()
        .collect())
}

/// `uint256[]` of durations in seconds.
pub fn decode_thresholds(data: &[u8]) -> Result<Vec<u64>> {
    decode_uint_array(data)?
        .into_iter()
        .map(|value| {
            u64::try_from(value)
                .map_err(|_| ClientError::Decode(format!("threshold {value} out of range")))
        })
        .collect()
}

/// A stake as stored by the pool, before it is tagged with its chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawStake {
    pub staked_amount: u128,
    pub minimum_stake_timestamp: u64,
    pub duration: u64,
    pub reward_per_token_paid: u128,
    pub rewards: u128,
}

/// Return data of `getUserStakes(address)`: a dynamic array of static
/// five-word tuples.
pub fn decode_stakes(data: &[u8]) -> Result<Vec<RawStake>> {
    Decoder::new(data)
        .uint_array_at(0, STAKE_WORDS)?
        .into_iter()
        .map(|words| {
            let timestamp = |value: u128| {
                u64::try_from(value)
                    .map_err(|_| ClientError::Decode(format!("timestamp {value} out of range")))
            };
            Ok(RawStake {
                staked_amount: words[0],
                minimum_stake_timestamp: timestamp(words[1])?,
                duration: timestamp(words[2])?,
                reward_per_token_paid: words[3],
                rewards: words[4],
            })
        })
        .collect()
}
