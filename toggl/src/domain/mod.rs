mod project;
mod start_entry;
mod time_entry;
mod user_profile;

pub use project::*;
pub use start_entry::*;
pub use time_entry::*;
pub use user_profile::*;

use serde::{Deserialize, Deserializer};

/// Every Toggl v8 response wraps its payload in `{ "data": ... }`.
#[derive(Debug, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

impl<T> DataEnvelope<T> {
    pub fn into_inner(self) -> T {
        self.data
    }
}

/// Treats an explicit `null` the same as a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
