pub mod book;
pub mod person;

use crate::error::ApiError;

/// Parse a path segment into a record id, rejecting anything that is not a
/// plain integer with a 400 rather than a routing miss.
pub(crate) fn parse_id(raw: &str) -> Result<i32, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::bad_request(format!("invalid id '{}'", raw)))
}
