use argon2::{
    Algorithm, Argon2, Params, ParamsBuilder, Version,
    password_hash::{
        PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
    },
};
use password_hash::Error as PasswordHashError;
use rand::{TryRngCore, rngs::OsRng};
use std::fmt;
use thiserror::Error;
use tracing::debug;
use zeroize::Zeroizing;

/// Argon2id password hashing with a random salt and optional server pepper.
///
/// Digests are PHC strings, so the parameters used at hash time travel with
/// the digest and verification keeps working after a parameter change.
pub struct PasswordHasher {
    argon2: Argon2<'static>,
    pepper: Zeroizing<Vec<u8>>,
}

impl fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordHasher")
            .field("peppered", &!self.pepper.is_empty())
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Error)]
pub enum HasherError {
    #[error("invalid Argon2 parameters: {0}")]
    InvalidParams(String),
    #[error("password hashing error: {0}")]
    Hash(String),
}

impl From<PasswordHashError> for HasherError {
    fn from(err: PasswordHashError) -> Self {
        HasherError::Hash(err.to_string())
    }
}

impl PasswordHasher {
    /// ~64 MiB and 3 passes; a sane baseline for servers without tuning.
    const DEFAULT_MEMORY_KIB: u32 = 64 * 1024;
    const DEFAULT_ITERATIONS: u32 = 3;
    const DEFAULT_PARALLELISM: u32 = 1;
    const SALT_LENGTH: usize = password_hash::Salt::RECOMMENDED_LENGTH;

    pub fn new(pepper: Option<&[u8]>) -> Result<Self, HasherError> {
        Self::with_params(
            pepper,
            ParamsBuilder::new()
                .m_cost(Self::DEFAULT_MEMORY_KIB)
                .t_cost(Self::DEFAULT_ITERATIONS)
                .p_cost(Self::DEFAULT_PARALLELISM)
                .output_len(32)
                .build()
                .map_err(|err| HasherError::InvalidParams(err.to_string()))?,
        )
    }

    /// Caller-chosen Argon2 parameters (tests, constrained hosts).
    pub fn with_params(pepper: Option<&[u8]>, params: Params) -> Result<Self, HasherError> {
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::default(), params);

        Ok(Self {
            argon2,
            pepper: Zeroizing::new(pepper.map(<[u8]>::to_vec).unwrap_or_default()),
        })
    }

    /// Cheapest parameters Argon2 accepts. Only for tests.
    pub fn insecure_fast() -> Self {
        let params = Params::new(Params::MIN_M_COST, 1, 1, None)
            .unwrap_or_else(|_| Params::default());
        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::default(), params),
            pepper: Zeroizing::new(Vec::new()),
        }
    }

    pub fn hash(&self, secret: &str) -> Result<String, HasherError> {
        let material = self.material(secret);

        let mut salt_bytes = [0u8; Self::SALT_LENGTH];
        OsRng
            .try_fill_bytes(&mut salt_bytes)
            .map_err(|err| HasherError::Hash(err.to_string()))?;
        let salt = SaltString::encode_b64(&salt_bytes)?;

        Ok(self.argon2.hash_password(&material, &salt)?.to_string())
    }

    /// Any failure, including an unparseable digest, reads as "not verified".
    pub fn verify(&self, secret: &str, digest: &str) -> bool {
        let parsed = match PasswordHash::new(digest) {
            Ok(parsed) => parsed,
            Err(err) => {
                debug!(error = %err, "stored password digest is not a PHC string");
                return false;
            }
        };

        let material = self.material(secret);
        self.argon2.verify_password(&material, &parsed).is_ok()
    }

    fn material(&self, secret: &str) -> Zeroizing<Vec<u8>> {
        let mut material =
            Zeroizing::new(Vec::with_capacity(secret.len() + self.pepper.len()));
        material.extend_from_slice(secret.as_bytes());
        material.extend_from_slice(&self.pepper);
        material
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashes_and_verifies() {
        let hasher = PasswordHasher::insecure_fast();
        let digest = hasher.hash("pw1234").unwrap();
        assert!(hasher.verify("pw1234", &digest));
        assert!(!hasher.verify("wrong", &digest));
    }

    #[test]
    fn digest_is_salted_and_not_plaintext() {
        let hasher = PasswordHasher::insecure_fast();
        let first = hasher.hash("pw1234").unwrap();
        let second = hasher.hash("pw1234").unwrap();
        assert_ne!(first, second);
        assert!(first.starts_with("$argon2id$"));
        assert!(!first.contains("pw1234"));
    }

    #[test]
    fn malformed_digest_is_not_verified() {
        let hasher = PasswordHasher::insecure_fast();
        assert!(!hasher.verify("pw1234", "not-a-phc-string"));
        assert!(!hasher.verify("pw1234", ""));
    }

    #[test]
    fn pepper_is_part_of_the_digest() {
        let params = Params::new(Params::MIN_M_COST, 1, 1, None).unwrap();
        let peppered = PasswordHasher::with_params(Some(b"pepper"), params.clone()).unwrap();
        let plain = PasswordHasher::with_params(None, params).unwrap();

        let digest = peppered.hash("pw1234").unwrap();
        assert!(peppered.verify("pw1234", &digest));
        assert!(!plain.verify("pw1234", &digest));
    }
}
