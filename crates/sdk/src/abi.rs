use ubet_model::Address;

use crate::Error;

/// Size of an ABI word.
pub const WORD: usize = 32;

const ADDRESS_LEN: usize = 20;

/// Function selectors of the referral registry.
pub mod selector {
    /// `getAllRegistered()`.
    pub const GET_ALL_REGISTERED: [u8; 4] = [0xc8, 0x5c, 0x0d, 0x35];
    /// `getReferrerOf(address)`.
    pub const GET_REFERRER_OF: [u8; 4] = [0xbc, 0x7f, 0x25, 0xe4];
    /// `totalRegistered()`.
    pub const TOTAL_REGISTERED: [u8; 4] = [0x92, 0x74, 0x16, 0xc0];
    /// `checkIfRegistered(address)`.
    pub const CHECK_IF_REGISTERED: [u8; 4] = [0xaf, 0x64, 0xe7, 0x35];
}

/// Encode a call with static arguments.
pub fn encode_call(selector: [u8; 4], args: &[[u8; WORD]]) -> Vec<u8> {
    let mut data = Vec::with_capacity(4 + args.len() * WORD);
    data.extend_from_slice(&selector);
    for arg in args {
        data.extend_from_slice(arg);
    }
    data
}

/// Encode an address as a left-padded word.
pub fn encode_address(address: &Address) -> crate::Result<[u8; WORD]> {
    let address = Address::parse_evm(address.as_str())?;
    let mut raw = [0u8; ADDRESS_LEN];
    hex::decode_to_slice(&address.as_str()[2..], &mut raw)?;
    let mut word = [0u8; WORD];
    word[WORD - ADDRESS_LEN..].copy_from_slice(&raw);
    Ok(word)
}

/// Decode `0x`-prefixed hex returned by the node.
pub fn decode_hex(data: &str) -> crate::Result<Vec<u8>> {
    let data = data.strip_prefix("0x").unwrap_or(data);
    Ok(hex::decode(data)?)
}

fn word(data: &[u8], index: usize) -> crate::Result<&[u8]> {
    let end = index
        .checked_add(1)
        .and_then(|n| n.checked_mul(WORD))
        .ok_or(Error::Abi("word index overflow"))?;
    data.get(end - WORD..end)
        .ok_or(Error::Abi("unexpected end of return data"))
}

fn word_to_address(word: &[u8]) -> crate::Result<Address> {
    let (padding, raw) = word.split_at(WORD - ADDRESS_LEN);
    if padding.iter().any(|b| *b != 0) {
        return Err(Error::Abi("dirty address padding"));
    }
    let raw: &[u8; ADDRESS_LEN] = raw
        .try_into()
        .map_err(|_| Error::Abi("invalid address length"))?;
    Ok(Address::from_evm_bytes(raw))
}

fn word_to_u64(word: &[u8]) -> crate::Result<u64> {
    let (high, low) = word.split_at(WORD - 8);
    if high.iter().any(|b| *b != 0) {
        return Err(Error::Abi("uint256 does not fit in u64"));
    }
    let low: [u8; 8] = low.try_into().map_err(|_| Error::Abi("invalid word"))?;
    Ok(u64::from_be_bytes(low))
}

fn word_to_usize(word: &[u8]) -> crate::Result<usize> {
    usize::try_from(word_to_u64(word)?).map_err(|_| Error::Abi("value does not fit in usize"))
}

/// Decode a single `address` return value.
pub fn decode_address(data: &[u8]) -> crate::Result<Address> {
    word_to_address(word(data, 0)?)
}

/// Decode a single `uint256` return value that must fit in a `u64`.
pub fn decode_u64(data: &[u8]) -> crate::Result<u64> {
    word_to_u64(word(data, 0)?)
}

/// Decode a single `bool` return value.
pub fn decode_bool(data: &[u8]) -> crate::Result<bool> {
    match decode_u64(data)? {
        0 => Ok(false),
        1 => Ok(true),
        _ => Err(Error::Abi("invalid bool")),
    }
}

/// Decode a single `address[]` return value.
pub fn decode_address_array(data: &[u8]) -> crate::Result<Vec<Address>> {
    let offset = word_to_usize(word(data, 0)?)?;
    if offset % WORD != 0 {
        return Err(Error::Abi("unaligned array offset"));
    }
    let head = offset / WORD;
    let len = word_to_usize(word(data, head)?)?;
    let remaining = data.len().saturating_sub(offset.saturating_add(WORD)) / WORD;
    if len > remaining {
        return Err(Error::Abi("array length exceeds return data"));
    }
    (0..len)
        .map(|idx| word_to_address(word(data, head + 1 + idx)?))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address_word(last: u8) -> [u8; WORD] {
        let mut word = [0u8; WORD];
        word[WORD - 1] = last;
        word[WORD - ADDRESS_LEN] = 0xaa;
        word
    }

    fn u64_word(value: u64) -> [u8; WORD] {
        let mut word = [0u8; WORD];
        word[WORD - 8..].copy_from_slice(&value.to_be_bytes());
        word
    }

    #[test]
    fn encode_get_referrer_of() {
        let user = Address::new("0x6EDbcb1df05E09cceB74cb4239b3856B33a292aF");
        let data = encode_call(selector::GET_REFERRER_OF, &[encode_address(&user).unwrap()]);
        assert_eq!(
            hex::encode(data),
            "bc7f25e4\
             0000000000000000000000006edbcb1df05e09cceb74cb4239b3856b33a292af"
        );
    }

    #[test]
    fn encode_rejects_non_evm_address() {
        assert!(matches!(
            encode_address(&Address::new("alice")),
            Err(Error::Model(_))
        ));
    }

    #[test]
    fn decode_address_array_of_two() {
        let mut data = Vec::new();
        data.extend_from_slice(&u64_word(32));
        data.extend_from_slice(&u64_word(2));
        data.extend_from_slice(&address_word(1));
        data.extend_from_slice(&address_word(2));
        let users = decode_address_array(&data).unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(
            users[1].as_str(),
            "0xaa00000000000000000000000000000000000002"
        );
    }

    #[test]
    fn decode_empty_address_array() {
        let mut data = Vec::new();
        data.extend_from_slice(&u64_word(32));
        data.extend_from_slice(&u64_word(0));
        assert!(decode_address_array(&data).unwrap().is_empty());
    }

    #[test]
    fn decode_truncated_address_array() {
        let mut data = Vec::new();
        data.extend_from_slice(&u64_word(32));
        data.extend_from_slice(&u64_word(3));
        data.extend_from_slice(&address_word(1));
        assert!(matches!(decode_address_array(&data), Err(Error::Abi(_))));
    }

    #[test]
    fn decode_zero_referrer() {
        let address = decode_address(&[0u8; WORD]).unwrap();
        assert!(address.is_zero());
    }

    #[test]
    fn decode_scalars() {
        assert_eq!(decode_u64(&u64_word(42)).unwrap(), 42);
        assert!(decode_bool(&u64_word(1)).unwrap());
        assert!(!decode_bool(&u64_word(0)).unwrap());
        assert!(matches!(decode_bool(&u64_word(2)), Err(Error::Abi(_))));
        let mut big = [0u8; WORD];
        big[0] = 1;
        assert!(matches!(decode_u64(&big), Err(Error::Abi(_))));
        assert!(matches!(decode_u64(&[0u8; 4]), Err(Error::Abi(_))));
    }

    #[test]
    fn decode_hex_with_prefix() {
        assert_eq!(decode_hex("0x0102").unwrap(), vec![1, 2]);
        assert_eq!(decode_hex("0102").unwrap(), vec![1, 2]);
        assert!(decode_hex("0x0").is_err());
    }
}
