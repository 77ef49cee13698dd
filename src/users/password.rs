use tracing::error;

/// bcrypt work factor for stored credentials.
pub const HASH_COST: u32 = 10;

/// Salts and hashes `plain` with bcrypt at [`HASH_COST`].
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    bcrypt::hash(plain, HASH_COST).map_err(|e| {
        error!(error = %e, "bcrypt hash error");
        anyhow::anyhow!(e.to_string())
    })
}

/// `Ok(false)` on mismatch; `Err` only when `hash` is not a bcrypt hash.
pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    bcrypt::verify(plain, hash).map_err(|e| {
        error!(error = %e, "bcrypt verify error");
        anyhow::anyhow!(e.to_string())
    })
}
