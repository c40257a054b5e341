//! Sealing of stored account credentials.
//!
//! Identity and password are encrypted with AES-256-GCM. The key is a
//! 32 character passphrase kept base64-encoded in a separate secret file,
//! so the config file alone does not reveal the account.
//!
//! Sealed values are `base64(nonce || ciphertext)` with a 12-byte nonce.

use std::path::Path;

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::{Error, Result};

/// Required passphrase length in characters (and key length in bytes).
pub const PASSPHRASE_LEN: usize = 32;

/// Shortest password accepted for the space-track account.
pub const MIN_PASSWORD_LEN: usize = 4;

const NONCE_LEN: usize = 12;

/// Generate a random alphanumeric passphrase of `PASSPHRASE_LEN` characters.
pub fn generate_passphrase() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(PASSPHRASE_LEN)
        .map(char::from)
        .collect()
}

pub fn check_passphrase(passphrase: &str) -> Result<()> {
    if passphrase.len() != PASSPHRASE_LEN {
        return Err(Error::Credentials(format!(
            "passphrase must be exactly {} bytes, got {}",
            PASSPHRASE_LEN,
            passphrase.len()
        )));
    }
    Ok(())
}

pub fn check_password(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(Error::Credentials(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

fn cipher(passphrase: &str) -> Result<Aes256Gcm> {
    check_passphrase(passphrase)?;
    Aes256Gcm::new_from_slice(passphrase.as_bytes())
        .map_err(|e| Error::Credentials(format!("invalid key: {}", e)))
}

/// Encrypt `plaintext` with the passphrase.
pub fn seal(passphrase: &str, plaintext: &str) -> Result<String> {
    let cipher = cipher(passphrase)?;
    let nonce_bytes: [u8; NONCE_LEN] = rand::random();
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce_bytes), plaintext.as_bytes())
        .map_err(|e| Error::Credentials(format!("encryption failed: {}", e)))?;

    let mut blob = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    blob.extend_from_slice(&nonce_bytes);
    blob.extend_from_slice(&ciphertext);
    Ok(BASE64.encode(&blob))
}

/// Decrypt a value produced by [`seal`].
pub fn open(passphrase: &str, sealed: &str) -> Result<String> {
    let cipher = cipher(passphrase)?;
    let blob = BASE64
        .decode(sealed.trim())
        .map_err(|e| Error::Credentials(format!("sealed value is not base64: {}", e)))?;
    if blob.len() <= NONCE_LEN {
        return Err(Error::Credentials("sealed value is too short".to_string()));
    }

    let (nonce, ciphertext) = blob.split_at(NONCE_LEN);
    let plaintext = cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| Error::Credentials("wrong passphrase or corrupted value".to_string()))?;
    String::from_utf8(plaintext)
        .map_err(|_| Error::Credentials("decrypted value is not UTF-8".to_string()))
}

/// Read a base64-encoded passphrase from the secret file.
pub fn read_passphrase_file(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(Error::NotFound(format!("secret file {}", path.display())));
    }
    let encoded = std::fs::read_to_string(path)?;
    let decoded = BASE64
        .decode(encoded.trim())
        .map_err(|e| Error::Credentials(format!("secret file is not base64: {}", e)))?;
    let passphrase = String::from_utf8(decoded)
        .map_err(|_| Error::Credentials("secret file does not hold text".to_string()))?;
    check_passphrase(&passphrase)?;
    Ok(passphrase)
}

/// Write the passphrase base64-encoded, readable only by the owner.
pub fn write_passphrase_file(path: &Path, passphrase: &str) -> Result<()> {
    check_passphrase(passphrase)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, BASE64.encode(passphrase.as_bytes()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    }
    Ok(())
}
