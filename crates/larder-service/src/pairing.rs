//! # Pairing Coordinator
//!
//! Orchestrates installation creation, code issuance/rotation, and
//! join-by-code resolution.
//!
//! ## Pairing Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Two-Device Pairing                                 │
//! │                                                                         │
//! │  Device A                 Coordinator                Device B          │
//! │     │                         │                         │              │
//! │     │ create_installation()   │                         │              │
//! │     │────────────────────────►│                         │              │
//! │     │ {id, "K7Q2MZ", expiry}  │                         │              │
//! │     │◄────────────────────────│                         │              │
//! │     │                         │                         │              │
//! │     │   shows "K7Q2MZ"  ──────────────────────────────► │ (reads it)   │
//! │     │                         │                         │              │
//! │     │                         │   join_by_code("K7Q2MZ")│              │
//! │     │                         │◄────────────────────────│              │
//! │     │                         │   installation id       │              │
//! │     │                         │────────────────────────►│              │
//! │     │                         │                         │              │
//! │     │  Both devices now scope every call by that id.    │              │
//! │     │  More devices may join with the same code until   │              │
//! │     │  it expires or is rotated.                        │              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariant: One Live Code
//! Rotation hands the store a fresh code through its atomic `replace`; the
//! superseded code is deleted, not expired. A device holding the old code
//! gets `InvalidPairingCode` even if the old expiry was still in the future.

use tracing::{debug, info, warn};
use uuid::Uuid;

use larder_core::clock::Clock;
use larder_core::code::{
    is_valid_code_format, pairing_code_ttl, CodeGenerator, MAX_CODE_ATTEMPTS,
};
use larder_core::store::{InstallationStore, PairingCodeStore};
use larder_core::{CoreError, CoreResult, Installation, PairingCode, PairingResponse};

/// Coordinates the installation/pairing-code lifecycle.
///
/// Generic over its collaborators so tests can pin the clock and script the
/// generator. The coordinator is the only writer of pairing codes.
pub struct PairingCoordinator<I, P, C, G> {
    installations: I,
    codes: P,
    clock: C,
    generator: G,
}

impl<I, P, C, G> PairingCoordinator<I, P, C, G>
where
    I: InstallationStore,
    P: PairingCodeStore,
    C: Clock,
    G: CodeGenerator,
{
    /// Creates a new coordinator over the given stores.
    pub fn new(installations: I, codes: P, clock: C, generator: G) -> Self {
        PairingCoordinator {
            installations,
            codes,
            clock,
            generator,
        }
    }

    /// Creates a new installation and issues its first pairing code.
    ///
    /// No precondition; always succeeds unless the store fails.
    pub async fn create_installation(&self) -> CoreResult<PairingResponse> {
        let installation = Installation::new(self.clock.now());
        self.installations.insert(&installation).await?;

        info!(installation_id = %installation.id, "Created installation");

        self.issue_code(installation.id).await
    }

    /// Rotates the installation's pairing code.
    ///
    /// Supersedes whatever code any device was shown previously: after this
    /// returns, the old code cannot be used to join even if unexpired.
    ///
    /// ## Errors
    /// * `CoreError::InstallationNotFound` - no such installation
    pub async fn rotate_code(&self, installation_id: Uuid) -> CoreResult<PairingResponse> {
        if !self.installations.exists(installation_id).await? {
            return Err(CoreError::InstallationNotFound(installation_id));
        }

        self.issue_code(installation_id).await
    }

    /// Resolves a pairing code to its installation id.
    ///
    /// Joining does not consume the code: several devices may use it within
    /// its window. Input is trimmed and uppercased before lookup so codes
    /// typed by hand still match.
    ///
    /// ## Errors
    /// * `CoreError::InvalidPairingCode` - absent (mistyped or rotated away)
    /// * `CoreError::PairingCodeExpired` - present but `now >= expires_at`
    pub async fn join_by_code(&self, code: &str) -> CoreResult<Uuid> {
        let code = code.trim().to_uppercase();

        if !is_valid_code_format(&code) {
            debug!("Rejecting malformed pairing code");
            return Err(CoreError::InvalidPairingCode);
        }

        let pairing = self
            .codes
            .find_by_code(&code)
            .await?
            .ok_or(CoreError::InvalidPairingCode)?;

        let now = self.clock.now();
        if pairing.is_expired(now) {
            warn!(installation_id = %pairing.installation_id, "Join attempt with expired code");
            return Err(CoreError::PairingCodeExpired {
                expired_at: pairing.expires_at,
            });
        }

        info!(installation_id = %pairing.installation_id, "Device joined by code");
        Ok(pairing.installation_id)
    }

    /// Generates and persists a fresh code for the installation.
    ///
    /// Collisions with live codes of other installations surface as store
    /// conflicts; the generator simply tries again with a new code.
    async fn issue_code(&self, installation_id: Uuid) -> CoreResult<PairingResponse> {
        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let now = self.clock.now();
            let code = PairingCode {
                code: self.generator.generate(),
                installation_id,
                expires_at: now + pairing_code_ttl(),
            };

            match self.codes.replace(installation_id, &code).await {
                Ok(()) => {
                    info!(
                        installation_id = %installation_id,
                        expires_at = %code.expires_at,
                        "Issued pairing code"
                    );
                    return Ok(PairingResponse {
                        installation_id,
                        pairing_code: code.code,
                        expires_at: code.expires_at,
                    });
                }
                Err(err) if err.is_conflict() => {
                    warn!(attempt, "Pairing code collision, regenerating");
                    continue;
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(CoreError::CodeGenerationExhausted {
            attempts: MAX_CODE_ATTEMPTS,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryInstallationStore, MemoryPairingCodeStore};
    use chrono::{Duration, TimeZone, Utc};
    use larder_core::clock::FixedClock;
    use larder_core::code::RandomCodeGenerator;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Generator that plays back a fixed sequence of codes.
    struct ScriptedGenerator {
        codes: Mutex<VecDeque<&'static str>>,
    }

    impl ScriptedGenerator {
        fn new(codes: &[&'static str]) -> Self {
            ScriptedGenerator {
                codes: Mutex::new(codes.iter().copied().collect()),
            }
        }
    }

    impl CodeGenerator for ScriptedGenerator {
        fn generate(&self) -> String {
            self.codes
                .lock()
                .unwrap()
                .pop_front()
                .expect("scripted generator ran out of codes")
                .to_string()
        }
    }

    fn coordinator<G: CodeGenerator>(
        generator: G,
    ) -> PairingCoordinator<MemoryInstallationStore, MemoryPairingCodeStore, FixedClock, G> {
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap());
        PairingCoordinator::new(
            MemoryInstallationStore::new(),
            MemoryPairingCodeStore::new(),
            clock,
            generator,
        )
    }

    #[tokio::test]
    async fn test_create_then_join() {
        let coordinator = coordinator(RandomCodeGenerator);

        let created = coordinator.create_installation().await.unwrap();
        let joined = coordinator.join_by_code(&created.pairing_code).await.unwrap();

        assert_eq!(joined, created.installation_id);
    }

    #[tokio::test]
    async fn test_code_valid_for_exactly_the_ttl() {
        let coordinator = coordinator(RandomCodeGenerator);

        let created = coordinator.create_installation().await.unwrap();
        let issued_at = coordinator.clock.now();
        assert_eq!(created.expires_at, issued_at + Duration::minutes(15));
    }

    #[tokio::test]
    async fn test_join_is_reusable_within_window() {
        let coordinator = coordinator(RandomCodeGenerator);
        let created = coordinator.create_installation().await.unwrap();

        // Multiple peers scan the same code
        for _ in 0..3 {
            let joined = coordinator.join_by_code(&created.pairing_code).await.unwrap();
            assert_eq!(joined, created.installation_id);
        }
    }

    #[tokio::test]
    async fn test_expiry_boundary_is_at_or_after() {
        let coordinator = coordinator(RandomCodeGenerator);
        let created = coordinator.create_installation().await.unwrap();

        // One second before expiry: still valid
        coordinator
            .clock
            .set(created.expires_at - Duration::seconds(1));
        assert!(coordinator.join_by_code(&created.pairing_code).await.is_ok());

        // Exactly at expiry: already dead, and Expired (not Invalid) - the
        // row still exists until the next rotation
        coordinator.clock.set(created.expires_at);
        let err = coordinator
            .join_by_code(&created.pairing_code)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::PairingCodeExpired { .. }));
    }

    #[tokio::test]
    async fn test_rotation_invalidates_old_code() {
        let coordinator = coordinator(RandomCodeGenerator);
        let created = coordinator.create_installation().await.unwrap();

        let rotated = coordinator
            .rotate_code(created.installation_id)
            .await
            .unwrap();
        assert_ne!(rotated.pairing_code, created.pairing_code);

        // New code joins
        let joined = coordinator.join_by_code(&rotated.pairing_code).await.unwrap();
        assert_eq!(joined, created.installation_id);

        // Old code is gone, not merely expired
        let err = coordinator
            .join_by_code(&created.pairing_code)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidPairingCode));
    }

    #[tokio::test]
    async fn test_rotate_unknown_installation() {
        let coordinator = coordinator(RandomCodeGenerator);

        let missing = Uuid::new_v4();
        let err = coordinator.rotate_code(missing).await.unwrap_err();
        assert!(matches!(err, CoreError::InstallationNotFound(id) if id == missing));
    }

    #[tokio::test]
    async fn test_join_rejects_malformed_input() {
        let coordinator = coordinator(RandomCodeGenerator);
        coordinator.create_installation().await.unwrap();

        for input in ["", "AB12C", "AB12CD7", "AB-2CD"] {
            let err = coordinator.join_by_code(input).await.unwrap_err();
            assert!(matches!(err, CoreError::InvalidPairingCode));
        }
    }

    #[tokio::test]
    async fn test_join_normalizes_typed_input() {
        let coordinator = coordinator(ScriptedGenerator::new(&["K7Q2MZ"]));
        let created = coordinator.create_installation().await.unwrap();

        let joined = coordinator.join_by_code("  k7q2mz ").await.unwrap();
        assert_eq!(joined, created.installation_id);
    }

    #[tokio::test]
    async fn test_collision_retries_with_fresh_code() {
        // First installation takes "SAME00"; the second collides once and
        // retries with "OTHER1"
        let coordinator = coordinator(ScriptedGenerator::new(&["SAME00", "SAME00", "OTHER1"]));

        let first = coordinator.create_installation().await.unwrap();
        assert_eq!(first.pairing_code, "SAME00");

        let second = coordinator.create_installation().await.unwrap();
        assert_eq!(second.pairing_code, "OTHER1");

        // Both codes resolve to their own installations
        assert_eq!(
            coordinator.join_by_code("SAME00").await.unwrap(),
            first.installation_id
        );
        assert_eq!(
            coordinator.join_by_code("OTHER1").await.unwrap(),
            second.installation_id
        );
    }

    #[tokio::test]
    async fn test_collision_exhaustion_surfaces() {
        let codes: Vec<&'static str> = std::iter::repeat("SAME00")
            .take(1 + MAX_CODE_ATTEMPTS as usize)
            .collect();
        let coordinator = coordinator(ScriptedGenerator::new(&codes));

        coordinator.create_installation().await.unwrap();
        let err = coordinator.create_installation().await.unwrap_err();
        assert!(matches!(err, CoreError::CodeGenerationExhausted { .. }));
    }
}
