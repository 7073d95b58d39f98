//! Resource clients layered over the [`RequestExecutor`](crate::executor::RequestExecutor).
//!
//! Each client borrows the executor, validates input locally, and returns the API's JSON
//! response unchanged. Methods accept any [`Serialize`] payload: the typed structs in this
//! module, or a raw [`Value`] when a field is not modelled here.

pub mod area;
pub mod order;
pub mod price;
pub mod stores;
pub mod validate;

pub use area::AreaApi;
pub use order::{NewOrder, OrderApi};
pub use price::{PriceApi, PriceQuery};
pub use stores::{NewStore, StoreApi};

// self
use crate::{_prelude::*, error::ValidationError};

/// Normal (48 hour) delivery.
pub const DELIVERY_NORMAL: u32 = 48;
/// On-demand (12 hour) delivery.
pub const DELIVERY_ON_DEMAND: u32 = 12;
/// Document shipment.
pub const ITEM_DOCUMENT: u32 = 1;
/// Parcel shipment.
pub const ITEM_PARCEL: u32 = 2;

pub(crate) const API_PREFIX: &str = "/aladdin/api/v1";

pub(crate) fn to_body<T>(payload: &T) -> Result<Value>
where
	T: ?Sized + Serialize,
{
	serde_json::to_value(payload).map_err(|e| {
		ValidationError::invalid("body", format!("Request body could not be serialized: {e}"))
			.into()
	})
}
