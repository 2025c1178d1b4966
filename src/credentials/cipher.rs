//! Passphrase encryption of stored tokens.
//!
//! ## Envelope Layout
//!
//! ```text
//! ┌───────────┬─────────┬───────────┬────────────────────────┐
//! │   Magic   │ Version │   Nonce   │   Ciphertext + Tag     │
//! │  4 bytes  │ 1 byte  │ 12 bytes  │       N bytes          │
//! └───────────┴─────────┴───────────┴────────────────────────┘
//!          ↑__________________↑
//!            AAD (authenticated but not encrypted)
//! ```
//!
//! The key is derived from the passphrase with PBKDF2-HMAC-SHA256 over a
//! machine-derived salt, so a credential file copied to another machine
//! does not decrypt there. The whole header is authenticated as AAD; any
//! tampering with it is detected on decryption. The envelope is base64
//! encoded for storage inside the JSON credential file.

use aes_gcm::aead::{Aead, KeyInit, OsRng, Payload};
use aes_gcm::{AeadCore, Aes256Gcm, Key, Nonce};
use base64::prelude::*;
use ohno::app_err;
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Magic bytes identifying an encrypted token envelope.
const MAGIC: &[u8; 4] = b"ESG\x00";

/// Current envelope format version.
const VERSION: u8 = 0x01;

const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;
const KEY_LEN: usize = 32;
const HEADER_LEN: usize = 4 + 1 + NONCE_LEN;
const MIN_ENVELOPE_LEN: usize = HEADER_LEN + TAG_LEN;

const PBKDF2_ROUNDS: u32 = 100_000;

/// Key material derived from the passphrase, zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
struct DerivedKey([u8; KEY_LEN]);

/// Stable machine fingerprint used as the key-derivation salt. The exact
/// composition is an implementation detail; it only needs to be stable on
/// one machine and unlikely to repeat on another.
fn machine_salt() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_default();
    format!("{}:{}:{user}", std::env::consts::OS, std::env::consts::ARCH)
}

fn derive_key(passphrase: &str) -> DerivedKey {
    let mut key = DerivedKey([0u8; KEY_LEN]);
    pbkdf2_hmac::<Sha256>(
        passphrase.as_bytes(),
        machine_salt().as_bytes(),
        PBKDF2_ROUNDS,
        &mut key.0,
    );
    key
}

/// Encrypt a token under a passphrase, returning the base64 envelope.
pub fn encrypt_token(token: &str, passphrase: &str) -> crate::Result<String> {
    let key = derive_key(passphrase);
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key.0));
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let mut header = [0u8; HEADER_LEN];
    header[..4].copy_from_slice(MAGIC);
    header[4] = VERSION;
    header[5..].copy_from_slice(&nonce);

    let ciphertext = cipher
        .encrypt(&nonce, Payload { msg: token.as_bytes(), aad: &header })
        .map_err(|_| app_err!("token encryption failed"))?;

    let mut envelope = Vec::with_capacity(HEADER_LEN + ciphertext.len());
    envelope.extend_from_slice(&header);
    envelope.extend_from_slice(&ciphertext);
    Ok(BASE64_STANDARD.encode(envelope))
}

/// Decrypt a base64 token envelope produced by [`encrypt_token`].
///
/// # Errors
///
/// Fails when the envelope is malformed, was produced on another machine,
/// or the passphrase is wrong; the error does not distinguish the latter
/// two cases.
pub fn decrypt_token(encoded: &str, passphrase: &str) -> crate::Result<String> {
    let envelope = BASE64_STANDARD
        .decode(encoded.trim())
        .map_err(|e| app_err!("credential data is not valid base64: {e}"))?;
    if envelope.len() < MIN_ENVELOPE_LEN {
        return Err(app_err!("credential data is too short to be an encrypted token"));
    }

    let (header, ciphertext) = envelope.split_at(HEADER_LEN);
    if &header[..4] != MAGIC {
        return Err(app_err!("credential data is not an encrypted token envelope"));
    }
    if header[4] != VERSION {
        return Err(app_err!("unsupported credential envelope version {}", header[4]));
    }

    let key = derive_key(passphrase);
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key.0));
    let nonce = Nonce::from_slice(&header[5..]);

    let plaintext = cipher
        .decrypt(nonce, Payload { msg: ciphertext, aad: header })
        .map_err(|_| app_err!("invalid passphrase or corrupted credential data"))?;
    String::from_utf8(plaintext).map_err(|_| app_err!("decrypted token is not valid UTF-8"))
}
