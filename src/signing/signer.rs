//! Message signing and signer recovery.
//!
//! The signed bytes are a fixed verification payload built from four envelope
//! fields, hashed with the EIP-191 personal-message scheme:
//!
//! ```text
//! payload = chain "\n" sender "\n" type "\n" item_hash
//! digest  = keccak256("\x19Ethereum Signed Message:\n" ++ len(payload) ++ payload)
//! wire    = 0x ++ hex(r ++ s ++ (recovery_id + 27))
//! ```

use alloy::primitives::{eip191_hash_message, hex, Address, B256, U256};
use alloy::signers::Signature;

use crate::error::{MessageError, MessageResult};
use crate::message::types::{Chain, MessageType};
use crate::signing::account::Account;

/// Offset added to the recovery id on the wire (recovery ids become 27 or 28).
pub const RECOVERY_ID_OFFSET: u8 = 27;

/// Length of an encoded `r || s || v` signature.
pub const SIGNATURE_LENGTH: usize = 65;

/// Build the verification payload for the given envelope fields.
pub fn verification_payload(
    chain: Chain,
    sender: &str,
    message_type: MessageType,
    item_hash: &str,
) -> String {
    format!("{}\n{}\n{}\n{}", chain, sender, message_type, item_hash)
}

/// Personal-message digest of a verification payload.
pub fn personal_digest(payload: &[u8]) -> B256 {
    eip191_hash_message(payload)
}

/// Sign the verification payload of an envelope.
///
/// `sender` must be the address of `account`; anything else could never
/// verify and is rejected with [`MessageError::SignatureInvalid`].
pub fn sign(
    account: &Account,
    chain: Chain,
    sender: &str,
    message_type: MessageType,
    item_hash: &str,
) -> MessageResult<String> {
    let signer_address = account.address_string();
    if !signer_address.eq_ignore_ascii_case(sender) {
        return Err(MessageError::SignatureInvalid {
            expected: sender.to_string(),
            recovered: signer_address,
        });
    }

    let payload = verification_payload(chain, sender, message_type, item_hash);
    let signature = account.sign_digest(&personal_digest(payload.as_bytes()))?;

    Ok(encode_signature(&signature))
}

/// Recover the address that produced `signature` over the envelope fields.
pub fn recover(
    signature: &str,
    chain: Chain,
    sender: &str,
    message_type: MessageType,
    item_hash: &str,
) -> MessageResult<Address> {
    let signature = decode_signature(signature)?;
    let payload = verification_payload(chain, sender, message_type, item_hash);

    signature
        .recover_address_from_prehash(&personal_digest(payload.as_bytes()))
        .map_err(|e| MessageError::SignatureInvalid {
            expected: sender.to_string(),
            recovered: format!("no key ({})", e),
        })
}

/// Check that `signature` recovers to `sender`.
pub fn verify(
    signature: &str,
    chain: Chain,
    sender: &str,
    message_type: MessageType,
    item_hash: &str,
) -> MessageResult<()> {
    let recovered = recover(signature, chain, sender, message_type, item_hash)?;
    let sender_address: Address = sender
        .parse()
        .map_err(|e| MessageError::Decode(format!("Invalid sender address '{}': {}", sender, e)))?;

    if recovered != sender_address {
        return Err(MessageError::SignatureInvalid {
            expected: sender.to_string(),
            recovered: recovered.to_checksum(None),
        });
    }
    Ok(())
}

/// Encode a signature as `0x`-prefixed hex with the recovery id shifted by 27.
pub fn encode_signature(signature: &Signature) -> String {
    let mut bytes = [0u8; SIGNATURE_LENGTH];
    bytes[..32].copy_from_slice(&signature.r().to_be_bytes::<32>());
    bytes[32..64].copy_from_slice(&signature.s().to_be_bytes::<32>());
    bytes[64] = signature.v() as u8 + RECOVERY_ID_OFFSET;
    hex::encode_prefixed(bytes)
}

/// Decode a wire signature, undoing the recovery id shift.
pub fn decode_signature(signature: &str) -> MessageResult<Signature> {
    let bytes = hex::decode(signature.trim())
        .map_err(|e| MessageError::Decode(format!("Invalid signature hex: {}", e)))?;

    if bytes.len() != SIGNATURE_LENGTH {
        return Err(MessageError::Decode(format!(
            "Signature must be {} bytes, got {}",
            SIGNATURE_LENGTH,
            bytes.len()
        )));
    }

    let y_parity = match bytes[64].checked_sub(RECOVERY_ID_OFFSET) {
        Some(0) => false,
        Some(1) => true,
        _ => {
            return Err(MessageError::SignatureInvalid {
                expected: "recovery id 27 or 28".to_string(),
                recovered: format!("recovery id {}", bytes[64]),
            })
        }
    };

    Ok(Signature::new(
        U256::from_be_slice(&bytes[..32]),
        U256::from_be_slice(&bytes[32..64]),
        y_parity,
    ))
}
