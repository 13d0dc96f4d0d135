use indexmap::IndexMap;
use serde::Serialize;

use super::ApiClientError;
use super::param::{self, InvalidParam, ParamSlot, ParamValue};

/// Query string parameters, kept in insertion order.
///
/// `null` values (e.g. `None`) are left out, so optional filters can be
/// passed through unconditionally.
///
/// # Examples
///
/// ```rust
/// use c8y_core::CallQuery;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let device: Option<&str> = None;
/// let query = CallQuery::new()
///     .add_param("source", device)
///     .add_param("status", "ACTIVE")
///     .with_paging(50, 2);
///
/// assert_eq!(query.to_query_string()?, "status=ACTIVE&pageSize=50&currentPage=2");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct CallQuery {
    params: IndexMap<String, ParamSlot>,
}

impl CallQuery {
    /// Creates an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a query parameter, replacing any previous value with the same name.
    pub fn add_param<T: Serialize>(
        mut self,
        name: impl Into<String>,
        param: impl Into<ParamValue<T>>,
    ) -> Self {
        let name = name.into();
        let param = param.into();
        let slot = param.resolve(&name);
        let _ = self.params.insert(name, slot);
        self
    }

    /// Sets the `pageSize` and `currentPage` paging parameters.
    pub fn with_paging(self, page_size: u32, current_page: u32) -> Self {
        self.add_param("pageSize", page_size)
            .add_param("currentPage", current_page)
    }

    /// Asks the platform to include the total page count in the statistics.
    pub fn with_total_pages(self) -> Self {
        self.add_param("withTotalPages", true)
    }

    /// Merges another query into this one; its values win on conflicts.
    pub fn merge(mut self, other: Self) -> Self {
        self.params.extend(other.params);
        self
    }

    /// Returns `true` if there is no parameter to send.
    pub fn is_empty(&self) -> bool {
        self.params.values().all(param::is_absent)
    }

    /// Encodes the parameters as `application/x-www-form-urlencoded`.
    ///
    /// # Errors
    ///
    /// Returns an error for values that could not be serialized, object
    /// values and nested arrays.
    pub fn to_query_string(&self) -> Result<String, ApiClientError> {
        let mut pairs = Vec::with_capacity(self.params.len());
        for (name, slot) in &self.params {
            let resolved = slot.as_ref().map_err(InvalidParam::to_error)?;
            if resolved.is_absent() {
                continue;
            }
            for value in resolved.to_query_values()? {
                pairs.push((name.as_str(), value));
            }
        }

        let query = serde_urlencoded::to_string(pairs)?;
        Ok(query)
    }
}
