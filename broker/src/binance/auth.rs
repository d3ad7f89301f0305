//! Request signing for Binance SIGNED endpoints (HMAC-SHA256 over the query).

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::BrokerError;

type HmacSha256 = Hmac<Sha256>;

/// Signs query strings with the account's secret key.
///
/// The keyed MAC is built once; each signature starts from a clone of it.
#[derive(Clone)]
pub struct Signer {
    mac: HmacSha256,
}

impl Signer {
    pub fn new(secret_key: &str) -> Result<Self, BrokerError> {
        let mac = HmacSha256::new_from_slice(secret_key.as_bytes())
            .map_err(|e| BrokerError::Auth(format!("unusable secret key: {e}")))?;
        Ok(Self { mac })
    }

    /// Hex signature of `query`.
    pub fn signature(&self, query: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(query.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// `query` with `&signature=<hex>` appended, ready to send.
    pub fn sign_query(&self, query: &str) -> String {
        format!("{query}&signature={}", self.signature(query))
    }
}

impl std::fmt::Debug for Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Signer(..)")
    }
}
