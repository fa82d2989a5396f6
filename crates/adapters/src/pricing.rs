//! Deterministic mock-mode pricing
//!
//! Mock quotes must be a pure function of cart contents so provider
//! comparison tests are reproducible: the same cart always prices the same,
//! and distinct item names spread across the price range.

use grocer_types::{AvailabilityStatus, Cart, CartItem, ItemAvailability};

/// Stable, platform-independent hash of an item name
pub fn name_hash(name: &str) -> u64 {
	// FNV-1a, fixed parameters
	let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
	for byte in name.to_ascii_lowercase().bytes() {
		hash ^= byte as u64;
		hash = hash.wrapping_mul(0x1000_0000_01b3);
	}
	hash
}

/// Unit price in minor units derived from the item name
pub fn unit_price_minor(name: &str, base_minor: i64, spread_minor: i64) -> i64 {
	base_minor + (name_hash(name) % spread_minor as u64) as i64
}

/// Fee schedule for one mock catalog
#[derive(Debug, Clone, Copy)]
pub struct FeeSchedule {
	/// Delivery/service fee in minor units
	pub fee_minor: i64,
	/// Subtotal at which the fee is waived; `None` means the fee always applies
	pub free_fee_threshold_minor: Option<i64>,
	/// Tax rate applied to the subtotal
	pub tax_rate: f64,
}

impl FeeSchedule {
	pub fn fee_for(&self, subtotal_minor: i64) -> i64 {
		match self.free_fee_threshold_minor {
			Some(threshold) if subtotal_minor >= threshold => 0,
			_ => self.fee_minor,
		}
	}

	pub fn tax_for(&self, subtotal_minor: i64) -> i64 {
		(subtotal_minor as f64 * self.tax_rate).round() as i64
	}
}

/// A mock provider catalog: pricing parameters plus availability behavior
#[derive(Debug, Clone, Copy)]
pub struct MockCatalog {
	pub base_price_minor: i64,
	pub price_spread_minor: i64,
	pub fees: FeeSchedule,
	/// Every n-th name-hash bucket is offered as a substitution
	pub substitution_modulus: u64,
	/// Every n-th name-hash bucket is out of stock
	pub stockout_modulus: u64,
}

impl MockCatalog {
	pub fn availability_for(&self, item: &CartItem) -> ItemAvailability {
		let hash = name_hash(&item.name);
		let unit = unit_price_minor(&item.name, self.base_price_minor, self.price_spread_minor);

		if hash % self.stockout_modulus == 0 {
			ItemAvailability::out_of_stock(item.id.clone())
		} else if hash % self.substitution_modulus == 0 {
			ItemAvailability::substituted(
				item.id.clone(),
				format!("Store Brand {}", item.name),
				unit,
			)
		} else {
			ItemAvailability::found(item.id.clone(), unit)
		}
	}

	/// Price the cart: (subtotal, fees, tax, per-item availability).
	///
	/// Out-of-stock items contribute nothing to the subtotal but still get an
	/// availability entry, keeping the entry count equal to the cart size.
	pub fn price_cart(&self, cart: &Cart) -> (i64, i64, i64, Vec<ItemAvailability>) {
		let mut subtotal = 0i64;
		let mut availability = Vec::with_capacity(cart.items.len());

		for item in &cart.items {
			let entry = self.availability_for(item);
			if entry.status != AvailabilityStatus::OutOfStock {
				if let Some(unit) = entry.unit_price_minor {
					subtotal += unit * item.quantity as i64;
				}
			}
			availability.push(entry);
		}

		let fees = self.fees.fee_for(subtotal);
		let tax = self.fees.tax_for(subtotal);
		(subtotal, fees, tax, availability)
	}
}
