//! # Pairing Codes
//!
//! Alphabet, TTL, and generation of pairing codes.
//!
//! ## Code Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Pairing Code Lifecycle                                │
//! │                                                                         │
//! │   NoActiveCode                                                         │
//! │        │  rotate_code()                                                │
//! │        ▼                                                                │
//! │   ActiveCode(code, expires_at = now + 15 min)                          │
//! │        │                          │                                     │
//! │        │ rotate_code()            │ now >= expires_at                  │
//! │        ▼                          ▼                                     │
//! │   (old row deleted,          Expired (checked lazily at join;          │
//! │    new ActiveCode)            row stays until next rotation)           │
//! │                                                                         │
//! │   Joining does NOT consume a code: several devices may scan the        │
//! │   same code within its window.                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Collision Handling
//! Codes are globally unique at creation time. The store enforces this with a
//! primary key on `code`; on a collision the coordinator simply asks the
//! generator for a fresh code and retries, up to [`MAX_CODE_ATTEMPTS`] times.

use rand::Rng;

// =============================================================================
// Constants
// =============================================================================

/// Number of characters in a pairing code.
pub const PAIRING_CODE_LEN: usize = 6;

/// Characters a pairing code may contain.
///
/// Uppercase alphanumeric only: easy to read off a screen and type on a
/// phone keyboard. 36^6 ≈ 2.2 billion combinations.
pub const PAIRING_CODE_ALPHABET: &[u8; 36] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// How long a freshly issued code stays valid.
pub const PAIRING_CODE_TTL_MINUTES: i64 = 15;

/// How often the coordinator retries on a code collision before giving up.
pub const MAX_CODE_ATTEMPTS: u32 = 5;

/// Validity window as a chrono duration.
pub fn pairing_code_ttl() -> chrono::Duration {
    chrono::Duration::minutes(PAIRING_CODE_TTL_MINUTES)
}

// =============================================================================
// Generator
// =============================================================================

/// Produces candidate pairing codes.
///
/// A trait so tests can script collisions; production uses
/// [`RandomCodeGenerator`].
pub trait CodeGenerator: Send + Sync {
    /// Returns a candidate code of [`PAIRING_CODE_LEN`] characters drawn from
    /// [`PAIRING_CODE_ALPHABET`].
    fn generate(&self) -> String;
}

/// Thread-local RNG backed generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomCodeGenerator;

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> String {
        let mut rng = rand::thread_rng();
        (0..PAIRING_CODE_LEN)
            .map(|_| {
                let idx = rng.gen_range(0..PAIRING_CODE_ALPHABET.len());
                PAIRING_CODE_ALPHABET[idx] as char
            })
            .collect()
    }
}

/// Checks that a string looks like a pairing code.
///
/// Used to reject obviously malformed input before hitting the store.
pub fn is_valid_code_format(code: &str) -> bool {
    code.len() == PAIRING_CODE_LEN && code.bytes().all(|b| PAIRING_CODE_ALPHABET.contains(&b))
}

// =============================================================================
// Unit Tests
// =============================================================================
