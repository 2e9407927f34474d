//! Fixed-layout encoding of campaign records.
//!
//! Every record occupies exactly [`Campaign::SIZE`] bytes. The description is
//! stored as a `u32` length followed by [`MAX_DESCRIPTION_LEN`] reserved bytes,
//! zero padded, so a record never changes size across writes.
//!
//! Layout (little-endian):
//!
//! | offset | size | field |
//! |-------:|-----:|-------|
//! | 0   | 8   | discriminator |
//! | 8   | 1   | layout version |
//! | 9   | 32  | owner |
//! | 41  | 4   | description length |
//! | 45  | 200 | description bytes |
//! | 245 | 8   | target |
//! | 253 | 8   | balance |
//! | 261 | 32  | token_mint |
//! | 293 | 32  | receiving_account |
//! | 325 | 1   | status |
//! | 326 | 1   | address_salt |

use bytes::{Buf, BufMut, BytesMut};

use crate::campaign::{Campaign, CampaignStatus, MAX_DESCRIPTION_LEN};
use crate::error::CoreError;
use crate::types::Address;

/// Current record layout version.
pub const RECORD_VERSION: u8 = 1;

/// First 8 bytes of every campaign record.
pub fn discriminator() -> [u8; 8] {
    let hash = blake3::hash(b"account:Campaign");
    let mut out = [0u8; 8];
    out.copy_from_slice(&hash.as_bytes()[..8]);
    out
}

/// Encode a campaign into its fixed-size record.
pub fn encode_campaign(campaign: &Campaign) -> Result<Vec<u8>, CoreError> {
    let description = campaign.description.as_bytes();
    if description.len() > MAX_DESCRIPTION_LEN {
        return Err(CoreError::EncodingError(format!(
            "description is {} bytes, reserved space is {}",
            description.len(),
            MAX_DESCRIPTION_LEN
        )));
    }

    let mut buf = BytesMut::with_capacity(Campaign::SIZE);
    buf.put_slice(&discriminator());
    buf.put_u8(RECORD_VERSION);
    buf.put_slice(&campaign.owner.0);
    buf.put_u32_le(description.len() as u32);
    buf.put_slice(description);
    buf.put_bytes(0, MAX_DESCRIPTION_LEN - description.len());
    buf.put_u64_le(campaign.target);
    buf.put_u64_le(campaign.balance);
    buf.put_slice(&campaign.token_mint.0);
    buf.put_slice(&campaign.receiving_account.0);
    buf.put_u8(campaign.status.to_u8());
    buf.put_u8(campaign.address_salt);

    debug_assert_eq!(buf.len(), Campaign::SIZE);
    Ok(buf.to_vec())
}

fn get_address(buf: &mut &[u8]) -> Address {
    let mut arr = [0u8; 32];
    buf.copy_to_slice(&mut arr);
    Address(arr)
}

/// Decode a fixed-size campaign record.
pub fn decode_campaign(data: &[u8]) -> Result<Campaign, CoreError> {
    if data.len() != Campaign::SIZE {
        return Err(CoreError::SizeMismatch {
            expected: Campaign::SIZE,
            actual: data.len(),
        });
    }

    let mut buf = data;

    let mut disc = [0u8; 8];
    buf.copy_to_slice(&mut disc);
    if disc != discriminator() {
        return Err(CoreError::WrongDiscriminator);
    }

    let version = buf.get_u8();
    if version != RECORD_VERSION {
        return Err(CoreError::UnsupportedVersion(version));
    }

    let owner = get_address(&mut buf);

    let len = buf.get_u32_le() as usize;
    if len > MAX_DESCRIPTION_LEN {
        return Err(CoreError::MalformedRecord(format!(
            "description length {} exceeds {}",
            len, MAX_DESCRIPTION_LEN
        )));
    }
    let reserved = &buf[..MAX_DESCRIPTION_LEN];
    let description = std::str::from_utf8(&reserved[..len])
        .map_err(|e| CoreError::MalformedRecord(format!("description is not UTF-8: {}", e)))?
        .to_string();
    buf.advance(MAX_DESCRIPTION_LEN);

    let target = buf.get_u64_le();
    let balance = buf.get_u64_le();
    let token_mint = get_address(&mut buf);
    let receiving_account = get_address(&mut buf);

    let status_byte = buf.get_u8();
    let status = CampaignStatus::from_u8(status_byte)
        .ok_or_else(|| CoreError::MalformedRecord(format!("unknown status {}", status_byte)))?;

    let address_salt = buf.get_u8();

    Ok(Campaign {
        owner,
        description,
        target,
        balance,
        token_mint,
        receiving_account,
        status,
        address_salt,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample() -> Campaign {
        Campaign::new(
            Address::from_bytes([0x01; 32]),
            "new roof for the shelter",
            5_000,
            Address::from_bytes([0x02; 32]),
            Address::from_bytes([0x03; 32]),
            253,
        )
        .unwrap()
    }

    #[test]
    fn test_size_is_fixed() {
        assert_eq!(Campaign::SIZE, 327);

        let short = sample();
        let mut long = sample();
        long.description = "x".repeat(MAX_DESCRIPTION_LEN);

        assert_eq!(encode_campaign(&short).unwrap().len(), Campaign::SIZE);
        assert_eq!(encode_campaign(&long).unwrap().len(), Campaign::SIZE);
    }

    #[test]
    fn test_field_offsets() {
        let mut c = sample();
        c.balance = 0x0102;
        c.status = CampaignStatus::Funded;
        let bytes = encode_campaign(&c).unwrap();

        assert_eq!(&bytes[0..8], &discriminator());
        assert_eq!(bytes[8], RECORD_VERSION);
        assert_eq!(&bytes[9..41], &[0x01; 32]);
        assert_eq!(&bytes[41..45], &(c.description.len() as u32).to_le_bytes());
        assert_eq!(&bytes[245..253], &5_000u64.to_le_bytes());
        assert_eq!(&bytes[253..261], &0x0102u64.to_le_bytes());
        assert_eq!(&bytes[261..293], &[0x02; 32]);
        assert_eq!(&bytes[293..325], &[0x03; 32]);
        assert_eq!(bytes[325], 1);
        assert_eq!(bytes[326], 253);
    }

    #[test]
    fn test_padding_is_zeroed() {
        let bytes = encode_campaign(&sample()).unwrap();
        let len = sample().description.len();
        assert!(bytes[45 + len..245].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_decode_rejects_wrong_size() {
        let result = decode_campaign(&[0u8; 10]);
        assert!(matches!(
            result,
            Err(CoreError::SizeMismatch { expected: 327, actual: 10 })
        ));
    }

    #[test]
    fn test_decode_rejects_wrong_discriminator() {
        let mut bytes = encode_campaign(&sample()).unwrap();
        bytes[0] ^= 0xff;
        assert!(matches!(decode_campaign(&bytes), Err(CoreError::WrongDiscriminator)));
    }

    #[test]
    fn test_decode_rejects_unknown_status() {
        let mut bytes = encode_campaign(&sample()).unwrap();
        bytes[325] = 9;
        assert!(matches!(decode_campaign(&bytes), Err(CoreError::MalformedRecord(_))));
    }

    #[test]
    fn test_decode_rejects_oversized_length() {
        let mut bytes = encode_campaign(&sample()).unwrap();
        bytes[41..45].copy_from_slice(&201u32.to_le_bytes());
        assert!(matches!(decode_campaign(&bytes), Err(CoreError::MalformedRecord(_))));
    }

    #[test]
    fn test_encode_rejects_oversized_description() {
        let mut c = sample();
        c.description = "y".repeat(MAX_DESCRIPTION_LEN + 1);
        assert!(matches!(encode_campaign(&c), Err(CoreError::EncodingError(_))));
    }

    proptest! {
        #[test]
        fn prop_decode_inverts_encode(
            description in "[ -~]{0,200}",
            target in 1u64..,
            balance in any::<u64>(),
            funded in any::<bool>(),
            salt in any::<u8>(),
        ) {
            let c = Campaign {
                owner: Address::from_bytes([7; 32]),
                description,
                target,
                balance,
                token_mint: Address::from_bytes([8; 32]),
                receiving_account: Address::from_bytes([9; 32]),
                status: if funded { CampaignStatus::Funded } else { CampaignStatus::Active },
                address_salt: salt,
            };
            let bytes = encode_campaign(&c).unwrap();
            prop_assert_eq!(bytes.len(), Campaign::SIZE);
            prop_assert_eq!(decode_campaign(&bytes).unwrap(), c);
        }
    }
}
