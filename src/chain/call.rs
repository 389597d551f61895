//! Relay chain calls submitted by the client
//!
//! Calls are kept as plain data so they can be inspected (and asserted on in
//! tests) before being turned into a dynamic subxt payload.
use sp_core::crypto::AccountId32;
use subxt::{dynamic::Value, ext::scale_value::Composite, tx::DynamicPayload};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayCall {
	/// `Crowdloan::contribute(index, value, signature: None)`
	Contribute { fund_id: u32, value: u128 },
	/// `System::remark(remark)`
	Remark { data: Vec<u8> },
	/// `Utility::batch_all(calls)`, all or nothing
	BatchAll(Vec<RelayCall>),
	/// `Balances::transfer_allow_death(MultiAddress::Id(dest), value)`
	Transfer { dest: AccountId32, value: u128 },
	/// `SalpLite::contribute_fund(index, first_slot, last_slot)`
	ContributeFund { fund_id: u32, first_slot: u32, last_slot: u32 },
}

impl RelayCall {
	pub fn pallet(&self) -> &'static str {
		match self {
			RelayCall::Contribute { .. } => "Crowdloan",
			RelayCall::Remark { .. } => "System",
			RelayCall::BatchAll(_) => "Utility",
			RelayCall::Transfer { .. } => "Balances",
			RelayCall::ContributeFund { .. } => "SalpLite",
		}
	}

	pub fn name(&self) -> &'static str {
		match self {
			RelayCall::Contribute { .. } => "contribute",
			RelayCall::Remark { .. } => "remark",
			RelayCall::BatchAll(_) => "batch_all",
			RelayCall::Transfer { .. } => "transfer_allow_death",
			RelayCall::ContributeFund { .. } => "contribute_fund",
		}
	}

	fn fields(&self) -> Vec<(&'static str, Value)> {
		match self {
			RelayCall::Contribute { fund_id, value } => vec![
				("index", Value::u128(*fund_id as u128)),
				("value", Value::u128(*value)),
				("signature", Value::unnamed_variant("None", [])),
			],
			RelayCall::Remark { data } => vec![("remark", Value::from_bytes(data))],
			RelayCall::BatchAll(calls) => vec![(
				"calls",
				Value::unnamed_composite(calls.iter().map(RelayCall::to_value)),
			)],
			RelayCall::Transfer { dest, value } => {
				let dest: &[u8] = dest.as_ref();
				vec![
					("dest", Value::unnamed_variant("Id", [Value::from_bytes(dest)])),
					("value", Value::u128(*value)),
				]
			},
			RelayCall::ContributeFund { fund_id, first_slot, last_slot } => vec![
				("index", Value::u128(*fund_id as u128)),
				("first_slot", Value::u128(*first_slot as u128)),
				("last_slot", Value::u128(*last_slot as u128)),
			],
		}
	}

	/// The call as a `RuntimeCall` value, for nesting inside another call
	pub fn to_value(&self) -> Value {
		Value::unnamed_variant(
			self.pallet(),
			[Value::named_variant(self.name(), self.fields())],
		)
	}

	/// Dynamic payload ready to be signed and submitted
	pub fn to_payload(&self) -> DynamicPayload {
		subxt::dynamic::tx(self.pallet(), self.name(), Composite::named(self.fields()))
	}

	/// Number of calls executed, counting batch members
	pub fn call_count(&self) -> usize {
		match self {
			RelayCall::BatchAll(calls) => calls.iter().map(RelayCall::call_count).sum(),
			_ => 1,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use subxt::ext::scale_value::{At, ValueDef};

	#[test]
	fn test_call_names() {
		let call = RelayCall::Contribute { fund_id: 2000, value: 1 };
		assert_eq!((call.pallet(), call.name()), ("Crowdloan", "contribute"));

		let call = RelayCall::ContributeFund { fund_id: 2000, first_slot: 1, last_slot: 8 };
		assert_eq!((call.pallet(), call.name()), ("SalpLite", "contribute_fund"));
	}

	#[test]
	fn test_contribute_value_shape() {
		let value = RelayCall::Contribute { fund_id: 2000, value: 5 }.to_value();
		let ValueDef::Variant(pallet) = &value.value else { panic!("expected pallet variant") };
		assert_eq!(pallet.name, "Crowdloan");

		let call = pallet.values.values().next().expect("call variant");
		assert_eq!(call.at("index").and_then(|v| v.as_u128()), Some(2000));
		assert_eq!(call.at("value").and_then(|v| v.as_u128()), Some(5));
	}

	#[test]
	fn test_batch_call_count() {
		let batch = RelayCall::BatchAll(vec![
			RelayCall::Contribute { fund_id: 1, value: 1 },
			RelayCall::Remark { data: b"ref".to_vec() },
		]);
		assert_eq!(batch.call_count(), 2);
		assert_eq!(RelayCall::Remark { data: vec![] }.call_count(), 1);
	}

	#[test]
	fn test_payload_targets_call() {
		let payload = RelayCall::Remark { data: b"hello".to_vec() }.to_payload();
		assert_eq!(payload.pallet_name(), "System");
		assert_eq!(payload.call_name(), "remark");
	}
}
