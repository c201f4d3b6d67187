// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Unit conversion core: the conversion engine, formula tables, and bounded
//! history/favorites persistence behind a key-value storage port.
//! Keeps UI/runtime adapters thin and framework-agnostic.

pub mod category;
pub mod convert;
pub mod formula;
pub mod persist;
pub mod record;
pub mod store;

pub use category::{default_pair, units_for, ConversionCategory, UnitOption, UnknownCategory};
pub use convert::{
    convert, convert_length, convert_raw, convert_temperature, convert_weight, is_valid_number,
    round_to_4, ConversionError, RawValue,
};
pub use formula::formula_for;
pub use persist::{Persistence, StorageLayout};
pub use record::{now_millis, ConversionRecord, FavoritePair};
pub use store::{KvStore, StoreError};
