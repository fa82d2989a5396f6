//! Confirmation token integrity
//!
//! Routing decisions are stored server-side keyed by token; the checksum
//! binds the stored decision to the fields a confirmation acts on, so a
//! rewritten store entry cannot silently redirect an order.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// HMAC-SHA256 checksum service for decision bindings
#[derive(Clone)]
pub struct TokenService {
	secret: Vec<u8>,
}

impl TokenService {
	pub fn new(secret: impl AsRef<[u8]>) -> Self {
		Self {
			secret: secret.as_ref().to_vec(),
		}
	}

	/// Hex-encoded HMAC over the canonical payload
	pub fn checksum(&self, payload: &str) -> String {
		let mut mac = HmacSha256::new_from_slice(&self.secret)
			.expect("HMAC accepts keys of any length");
		mac.update(payload.as_bytes());
		hex::encode(mac.finalize().into_bytes())
	}

	/// Constant-time verification of a previously issued checksum
	pub fn verify(&self, payload: &str, checksum: &str) -> bool {
		let Ok(expected) = hex::decode(checksum) else {
			return false;
		};

		let mut mac = HmacSha256::new_from_slice(&self.secret)
			.expect("HMAC accepts keys of any length");
		mac.update(payload.as_bytes());
		mac.verify_slice(&expected).is_ok()
	}
}
