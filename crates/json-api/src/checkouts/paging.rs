//! Order listing query parameters.

use salvo::prelude::StatusError;

use storefront_app::domain::checkouts::data::{CheckoutListQuery, CheckoutSort, SortDirection};

use crate::extensions::*;

/// Build a listing query from raw `sort`, `direction`, `limit` and `offset` parameters.
pub(crate) fn list_query(
    sort: Option<String>,
    direction: Option<String>,
    limit: Option<u64>,
    offset: Option<u64>,
) -> Result<CheckoutListQuery, StatusError> {
    let sort = sort
        .map(|value| value.parse::<CheckoutSort>())
        .transpose()
        .or_400("could not parse \"sort\" query parameter")?
        .unwrap_or_default();

    let direction = direction
        .map(|value| value.parse::<SortDirection>())
        .transpose()
        .or_400("could not parse \"direction\" query parameter")?
        .unwrap_or_default();

    Ok(CheckoutListQuery::new().sort(sort, direction).page(
        limit.unwrap_or(CheckoutListQuery::DEFAULT_LIMIT),
        offset.unwrap_or(0),
    ))
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn missing_parameters_give_the_default_query() -> TestResult {
        assert_eq!(
            list_query(None, None, None, None)?,
            CheckoutListQuery::default()
        );

        Ok(())
    }

    #[test]
    fn unknown_direction_is_a_bad_request() {
        let result = list_query(None, Some("sideways".to_string()), None, None);

        assert!(result.is_err(), "expected sideways to be rejected");
    }
}
