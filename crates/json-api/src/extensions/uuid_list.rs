//! Comma-separated uuid query values.

use salvo::prelude::StatusError;
use uuid::Uuid;

use crate::extensions::*;

/// Parse `a,b,c` into uuids, ignoring blank entries.
pub(crate) fn parse_uuid_list(value: &str, name: &str) -> Result<Vec<Uuid>, StatusError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(Uuid::parse_str)
        .collect::<Result<Vec<_>, _>>()
        .or_400(&format!("could not parse \"{name}\" query parameter"))
}
