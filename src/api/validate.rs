//! Field checks run before any cache or network access.
//!
//! Rules operate on the serialized JSON body, so typed payloads and raw [`Value`] bodies are
//! held to the same constraints. Lengths are counted in characters.

// self
use crate::{_prelude::*, error::ValidationError};

type Fields = serde_json::Map<String, Value>;

const DELIVERY_TYPES: [i64; 2] = [48, 12];
const ITEM_TYPES: [i64; 2] = [1, 2];
const DELIVERY_TYPE_MESSAGE: &str = "delivery_type must be 48 (Normal) or 12 (On Demand)";
const ITEM_TYPE_MESSAGE: &str = "item_type must be 1 (Document) or 2 (Parcel)";
const ITEM_WEIGHT_MESSAGE: &str = "item_weight must be between 0.5 and 10 kg";

/// Checks an order body.
pub fn order(body: &Value) -> Result<(), ValidationError> {
	let fields = object(body)?;

	require(
		fields,
		&[
			"store_id",
			"recipient_name",
			"recipient_phone",
			"recipient_address",
			"delivery_type",
			"item_type",
			"item_quantity",
			"item_weight",
			"amount_to_collect",
		],
	)?;
	text_length(
		fields,
		"recipient_name",
		3..=100,
		"recipient_name must be between 3 and 100 characters",
	)?;
	phone(fields, "recipient_phone", "recipient_phone must be exactly 11 characters")?;
	text_length(
		fields,
		"recipient_address",
		10..=220,
		"recipient_address must be between 10 and 220 characters",
	)?;
	item_weight(fields)?;
	one_of(fields, "delivery_type", &DELIVERY_TYPES, DELIVERY_TYPE_MESSAGE)?;
	one_of(fields, "item_type", &ITEM_TYPES, ITEM_TYPE_MESSAGE)
}

/// Checks a store body.
pub fn store(body: &Value) -> Result<(), ValidationError> {
	let fields = object(body)?;

	require(
		fields,
		&["name", "contact_name", "contact_number", "address", "city_id", "zone_id", "area_id"],
	)?;
	text_length(fields, "name", 3..=50, "Store name must be between 3 and 50 characters")?;
	text_length(fields, "contact_name", 3..=50, "Contact name must be between 3 and 50 characters")?;
	phone(fields, "contact_number", "Contact number must be exactly 11 characters")?;
	text_length(fields, "address", 15..=120, "Address must be between 15 and 120 characters")
}

/// Checks a price-plan body (after the default store has been filled in).
pub fn price(body: &Value) -> Result<(), ValidationError> {
	let fields = object(body)?;

	require(
		fields,
		&["store_id", "item_type", "delivery_type", "item_weight", "recipient_city", "recipient_zone"],
	)?;
	item_weight(fields)?;
	one_of(fields, "delivery_type", &DELIVERY_TYPES, DELIVERY_TYPE_MESSAGE)?;
	one_of(fields, "item_type", &ITEM_TYPES, ITEM_TYPE_MESSAGE)
}

/// Checks that a consignment id can be embedded as one path segment.
pub fn consignment_id(id: &str) -> Result<(), ValidationError> {
	if id.trim().is_empty() {
		return Err(ValidationError::MissingField { field: "consignment_id" });
	}
	if id.contains(['/', '?', '#']) {
		return Err(ValidationError::invalid(
			"consignment_id",
			"consignment_id must not contain '/', '?' or '#'",
		));
	}

	Ok(())
}

pub(crate) fn object(body: &Value) -> Result<&Fields, ValidationError> {
	body.as_object()
		.ok_or_else(|| ValidationError::invalid("body", "Request body must be a JSON object"))
}

fn require(fields: &Fields, names: &[&'static str]) -> Result<(), ValidationError> {
	match names.iter().find(|name| fields.get(**name).is_none_or(Value::is_null)) {
		Some(field) => Err(ValidationError::MissingField { field: *field }),
		None => Ok(()),
	}
}

fn text_length(
	fields: &Fields,
	field: &'static str,
	range: std::ops::RangeInclusive<usize>,
	message: &str,
) -> Result<(), ValidationError> {
	let length = fields.get(field).map(|v| as_text(v).chars().count()).unwrap_or(0);

	if range.contains(&length) { Ok(()) } else { Err(ValidationError::invalid(field, message)) }
}

fn phone(fields: &Fields, field: &'static str, message: &str) -> Result<(), ValidationError> {
	let digits = fields
		.get(field)
		.map(|v| as_text(v).chars().filter(char::is_ascii_digit).count())
		.unwrap_or(0);

	if digits == 11 { Ok(()) } else { Err(ValidationError::invalid(field, message)) }
}

fn item_weight(fields: &Fields) -> Result<(), ValidationError> {
	let weight = fields.get("item_weight").and_then(as_number).unwrap_or(0.);

	if (0.5..=10.).contains(&weight) {
		Ok(())
	} else {
		Err(ValidationError::invalid("item_weight", ITEM_WEIGHT_MESSAGE))
	}
}

fn one_of(
	fields: &Fields,
	field: &'static str,
	allowed: &[i64],
	message: &str,
) -> Result<(), ValidationError> {
	let matches = fields
		.get(field)
		.and_then(as_number)
		.is_some_and(|n| allowed.iter().any(|a| *a as f64 == n));

	if matches { Ok(()) } else { Err(ValidationError::invalid(field, message)) }
}

fn as_text(value: &Value) -> String {
	match value {
		Value::String(s) => s.clone(),
		Value::Null => String::new(),
		other => other.to_string(),
	}
}

fn as_number(value: &Value) -> Option<f64> {
	match value {
		Value::Number(n) => n.as_f64(),
		Value::String(s) => s.trim().parse().ok(),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	fn valid_order() -> Value {
		json!({
			"store_id": 149,
			"recipient_name": "Rahim Uddin",
			"recipient_phone": "017-1234-5678",
			"recipient_address": "House 12, Road 5, Dhanmondi, Dhaka",
			"delivery_type": 48,
			"item_type": 2,
			"item_quantity": 1,
			"item_weight": 0.5,
			"amount_to_collect": 900
		})
	}

	fn with(mut body: Value, field: &str, value: Value) -> Value {
		body[field] = value;

		body
	}

	#[test]
	fn valid_order_passes() {
		order(&valid_order()).expect("Fixture order should validate.");
	}

	#[test]
	fn missing_fields_are_named() {
		let mut body = valid_order();

		if let Some(fields) = body.as_object_mut() {
			fields.remove("item_quantity");
		}

		let err = order(&body).expect_err("Missing item_quantity must fail.");

		assert_eq!(err.to_string(), "Required field 'item_quantity' is missing");

		let err = order(&with(valid_order(), "store_id", Value::Null))
			.expect_err("Null store_id counts as missing.");

		assert_eq!(err.field(), "store_id");
	}

	#[test]
	fn phone_counts_digits_only() {
		let err = order(&with(valid_order(), "recipient_phone", json!("0171234567")))
			.expect_err("Ten digits must fail.");

		assert_eq!(err.to_string(), "recipient_phone must be exactly 11 characters");

		order(&with(valid_order(), "recipient_phone", json!("+8801712345678")))
			.expect_err("Thirteen digits must fail.");
		order(&with(valid_order(), "recipient_phone", json!("(017) 1234 5678")))
			.expect("Formatting characters are ignored.");
	}

	#[test]
	fn weight_bounds_are_inclusive() {
		order(&with(valid_order(), "item_weight", json!(10))).expect("10 kg is allowed.");
		order(&with(valid_order(), "item_weight", json!("2.5"))).expect("Numeric strings are allowed.");

		for weight in [json!(0.49), json!(10.01), json!("heavy")] {
			let err = order(&with(valid_order(), "item_weight", weight))
				.expect_err("Out-of-range weights must fail.");

			assert_eq!(err.to_string(), ITEM_WEIGHT_MESSAGE);
		}
	}

	#[test]
	fn enumerated_types_are_checked() {
		let err = order(&with(valid_order(), "delivery_type", json!(24)))
			.expect_err("Unknown delivery_type must fail.");

		assert_eq!(err.to_string(), DELIVERY_TYPE_MESSAGE);

		order(&with(valid_order(), "delivery_type", json!("12"))).expect("Numeric strings match.");

		let err = order(&with(valid_order(), "item_type", json!(3)))
			.expect_err("Unknown item_type must fail.");

		assert_eq!(err.to_string(), ITEM_TYPE_MESSAGE);
	}

	#[test]
	fn lengths_count_characters() {
		order(&with(valid_order(), "recipient_name", json!("রহিম"))).expect("Four characters pass.");

		let err = order(&with(valid_order(), "recipient_address", json!("Dhaka")))
			.expect_err("Short addresses must fail.");

		assert_eq!(err.field(), "recipient_address");
	}

	#[test]
	fn store_rules_apply() {
		let body = json!({
			"name": "Main Store",
			"contact_name": "Karim",
			"contact_number": "01712345678",
			"address": "Plot 7, Gulshan Avenue, Dhaka",
			"city_id": 1,
			"zone_id": 2,
			"area_id": 3
		});

		store(&body).expect("Fixture store should validate.");

		let err = store(&with(body.clone(), "address", json!("Too short")))
			.expect_err("Short store address must fail.");

		assert_eq!(err.to_string(), "Address must be between 15 and 120 characters");

		let err = store(&with(body, "area_id", Value::Null)).expect_err("area_id is required.");

		assert_eq!(err.to_string(), "Required field 'area_id' is missing");
	}

	#[test]
	fn price_requires_store_and_destination() {
		let body = json!({
			"item_type": 2,
			"delivery_type": 48,
			"item_weight": 1,
			"recipient_city": 1,
			"recipient_zone": 2
		});
		let err = price(&body).expect_err("Price query without a store must fail.");

		assert_eq!(err.to_string(), "Required field 'store_id' is missing");

		price(&with(body, "store_id", json!(149))).expect("Complete price query should validate.");
	}

	#[test]
	fn consignment_ids_must_be_single_segments() {
		consignment_id("DL121224VS8TTJ").expect("Plain ids pass.");

		assert!(matches!(consignment_id(""), Err(ValidationError::MissingField { .. })));
		assert!(consignment_id("../stores").is_err());
		assert!(consignment_id("abc?x=1").is_err());
		assert!(consignment_id("abc#frag").is_err());
	}

	#[test]
	fn non_object_bodies_are_rejected() {
		let err = order(&json!([1, 2])).expect_err("Arrays are not order bodies.");

		assert_eq!(err.field(), "body");
	}
}
