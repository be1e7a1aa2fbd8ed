//! Handle-based storage used by device backends

pub use slotmap::{DefaultKey, Key, KeyData, SlotMap};

/// Generational map; removed slots invalidate every outstanding key
pub type HandleMap<T> = SlotMap<DefaultKey, T>;

/// Flatten a key into the opaque `u64` carried by device handles
pub fn key_to_raw(key: DefaultKey) -> u64 {
    key.data().as_ffi()
}

/// Rebuild a key from a raw handle value
///
/// Garbage input yields a key that simply fails lookups.
pub fn raw_to_key(raw: u64) -> DefaultKey {
    KeyData::from_ffi(raw).into()
}
