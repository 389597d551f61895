//! Address parsing, validation and SS58 formatting
use crate::error::{CrowdloanError, Result};
use sp_core::crypto::{AccountId32, Ss58AddressFormat, Ss58Codec};

/// Payload lengths accepted in either encoding: account indices (1, 2, 4, 8),
/// account ids and sr25519/ed25519 keys (32), compressed ecdsa keys (33)
const VALID_PAYLOAD_LENGTHS: [usize; 6] = [1, 2, 4, 8, 32, 33];

const SS58_CHECKSUM_PREFIX: &[u8] = b"SS58PRE";

/// Returns the SS58 address format for the given network prefix
#[inline]
pub fn ss58_format(prefix: u16) -> Ss58AddressFormat {
	Ss58AddressFormat::custom(prefix)
}

/// Check whether `address` is a `0x` hex public key or a valid SS58 address
///
/// Never fails: any decoding error yields `false`.
pub fn is_valid_address(address: &str) -> bool {
	if is_hex(address) {
		return decode_hex(address)
			.map(|bytes| VALID_PAYLOAD_LENGTHS.contains(&bytes.len()))
			.unwrap_or(false);
	}

	decode_ss58(address).is_some()
}

/// Decode an SS58 string into its network prefix and payload
///
/// Returns `None` on a bad alphabet, a reserved or malformed prefix, an
/// unsupported payload length or a checksum mismatch.
pub fn decode_ss58(address: &str) -> Option<(u16, Vec<u8>)> {
	let data = bs58::decode(address).into_vec().ok()?;
	let first = *data.first()?;

	// Prefixes 64..127 take two bytes, 128 and above are reserved
	let (prefix, prefix_len) = match first {
		0..=63 => (first as u16, 1),
		64..=127 => {
			let second = *data.get(1)?;
			let lower = (first << 2) | (second >> 6);
			let upper = second & 0b0011_1111;
			(lower as u16 | (upper as u16) << 8, 2)
		},
		_ => return None,
	};

	// Keys carry a two byte checksum, account indices a single byte
	let checksum_len = if data.len() == prefix_len + 32 + 2 || data.len() == prefix_len + 33 + 2 {
		2
	} else {
		1
	};
	let body_len = data.len().checked_sub(checksum_len)?;
	let payload = data.get(prefix_len..body_len)?;
	if !VALID_PAYLOAD_LENGTHS.contains(&payload.len()) {
		return None;
	}

	let hash = ss58_hash(&data[..body_len]);
	if data[body_len..] != hash[..checksum_len] {
		return None;
	}

	Some((prefix, payload.to_vec()))
}

fn ss58_hash(body: &[u8]) -> [u8; 64] {
	let mut preimage = Vec::with_capacity(SS58_CHECKSUM_PREFIX.len() + body.len());
	preimage.extend_from_slice(SS58_CHECKSUM_PREFIX);
	preimage.extend_from_slice(body);
	sp_crypto_hashing::blake2_512(&preimage)
}

/// Parse an account id from SS58 or 32 byte `0x` hex form
pub fn parse_account(address: &str) -> Result<AccountId32> {
	let invalid = |reason: String| CrowdloanError::InvalidAddress {
		address: address.to_string(),
		reason,
	};

	if is_hex(address) {
		let bytes = decode_hex(address).map_err(|e| invalid(format!("{e}")))?;
		let bytes: [u8; 32] = bytes
			.try_into()
			.map_err(|b: Vec<u8>| invalid(format!("expected 32 bytes, got {}", b.len())))?;
		return Ok(AccountId32::from(bytes));
	}

	AccountId32::from_ss58check_with_version(address)
		.map(|(account, _version)| account)
		.map_err(|e| invalid(format!("{e:?}")))
}

/// Encode an account id with the given SS58 prefix
pub fn to_ss58(account: &AccountId32, prefix: u16) -> String {
	account.to_ss58check_with_version(ss58_format(prefix))
}

fn is_hex(value: &str) -> bool {
	value.starts_with("0x")
}

fn decode_hex(value: &str) -> std::result::Result<Vec<u8>, hex::FromHexError> {
	hex::decode(value.trim_start_matches("0x"))
}

#[cfg(test)]
mod tests {
	use super::*;

	// Alice, generic substrate prefix
	const ALICE_SS58: &str = "5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY";
	const ALICE_HEX: &str = "0xd43593c715fdd31c61141abd04a99fd6822c8558854ccde39a5684e7a56da27d";

	#[test]
	fn test_valid_ss58_address() {
		assert!(is_valid_address(ALICE_SS58));
	}

	#[test]
	fn test_valid_hex_address() {
		assert!(is_valid_address(ALICE_HEX));
	}

	#[test]
	fn test_malformed_hex_is_invalid() {
		assert!(!is_valid_address("0xzz"));
		assert!(!is_valid_address("0x123"));
		// 3 bytes is not a public key length
		assert!(!is_valid_address("0xabcdef"));
	}

	#[test]
	fn test_malformed_ss58_is_invalid() {
		assert!(!is_valid_address(""));
		assert!(!is_valid_address("not an address"));
		// Broken checksum
		assert!(!is_valid_address("5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQZ"));
	}

	#[test]
	fn test_parse_account_both_forms_agree() {
		let from_ss58 = parse_account(ALICE_SS58).unwrap();
		let from_hex = parse_account(ALICE_HEX).unwrap();
		assert_eq!(from_ss58, from_hex);
	}

	#[test]
	fn test_parse_account_rejects_short_hex() {
		let err = parse_account("0xabcd").unwrap_err();
		assert!(err.to_string().contains("expected 32 bytes"));
	}

	fn encode_ss58(prefix: u8, payload: &[u8]) -> String {
		let mut data = vec![prefix];
		data.extend_from_slice(payload);
		let checksum_len = if payload.len() >= 32 { 2 } else { 1 };
		let hash = ss58_hash(&data);
		data.extend_from_slice(&hash[..checksum_len]);
		bs58::encode(data).into_string()
	}

	#[test]
	fn test_ss58_account_indices_are_valid() {
		for len in [1usize, 2, 4, 8] {
			let payload = vec![7u8; len];
			let encoded = encode_ss58(42, &payload);
			assert!(is_valid_address(&encoded), "{len} byte index should be valid");
			assert_eq!(decode_ss58(&encoded), Some((42, payload)));
		}
	}

	#[test]
	fn test_ss58_rejects_unsupported_length_and_bad_checksum() {
		assert!(!is_valid_address(&encode_ss58(42, &[7u8; 3])));

		let mut data = bs58::decode(encode_ss58(0, &[7u8; 4])).into_vec().unwrap();
		let last = data.len() - 1;
		data[last] ^= 0xff;
		assert!(!is_valid_address(&bs58::encode(data).into_string()));
	}

	#[test]
	fn test_decode_ss58_matches_account_encoding() {
		let alice = parse_account(ALICE_SS58).unwrap();
		let alice_bytes: &[u8] = alice.as_ref();
		assert_eq!(decode_ss58(ALICE_SS58), Some((42, alice_bytes.to_vec())));

		// Two byte network prefix
		let (prefix, payload) = decode_ss58(&to_ss58(&alice, 2007)).unwrap();
		assert_eq!(prefix, 2007);
		assert_eq!(payload, alice_bytes);
	}

	#[test]
	fn test_to_ss58_polkadot_prefix() {
		let alice = parse_account(ALICE_SS58).unwrap();
		let polkadot = to_ss58(&alice, 0);
		assert!(polkadot.starts_with('1'));
		assert_eq!(parse_account(&polkadot).unwrap(), alice);
	}
}
