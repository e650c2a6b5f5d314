//! Pagination and proof options shared by the read-only query surface.

use ibc_proto::cosmos::base::query::v1beta1::{
    PageRequest as RawPageRequest, PageResponse as RawPageResponse,
};
use serde::{Deserialize, Serialize};

use crate::core::ics04_channel::error::Error;

/// Page size used when a request leaves `limit` at zero.
pub const DEFAULT_LIMIT: u64 = 100;

/// Whether a query response should carry a proof of the returned value.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum IncludeProof {
    Yes,
    No,
}

impl IncludeProof {
    pub fn to_bool(&self) -> bool {
        *self == IncludeProof::Yes
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// key is a value returned in PageResponse.next_key to begin
    /// querying the next page most efficiently. Only one of offset or key
    /// should be set.
    pub key: Vec<u8>,
    /// offset is a numeric offset that can be used when key is unavailable.
    /// It is less efficient than using key. Only one of offset or key should
    /// be set.
    pub offset: u64,
    /// limit is the total number of results to be returned in the result page.
    /// If left empty it defaults to [`DEFAULT_LIMIT`] and the total is counted.
    pub limit: u64,
    /// count_total is set to true  to indicate that the result set should include
    /// a count of the total number of items available for pagination in UIs.
    /// count_total is only respected when offset is used. It is ignored when key
    /// is set.
    pub count_total: bool,
    /// reverse is set to true if results are to be returned in the descending order.
    pub reverse: bool,
}

impl PageRequest {
    pub fn all() -> PageRequest {
        PageRequest {
            limit: u64::MAX,
            ..Default::default()
        }
    }
}

impl From<RawPageRequest> for PageRequest {
    fn from(raw: RawPageRequest) -> Self {
        PageRequest {
            key: raw.key,
            offset: raw.offset,
            limit: raw.limit,
            count_total: raw.count_total,
            reverse: raw.reverse,
        }
    }
}

impl From<PageRequest> for RawPageRequest {
    fn from(request: PageRequest) -> Self {
        RawPageRequest {
            key: request.key,
            offset: request.offset,
            limit: request.limit,
            count_total: request.count_total,
            reverse: request.reverse,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResponse {
    /// Key of the first entry of the next page, empty on the last page.
    pub next_key: Vec<u8>,
    /// Total number of entries, when requested and computable.
    pub total: u64,
}

impl From<PageResponse> for RawPageResponse {
    fn from(response: PageResponse) -> Self {
        RawPageResponse {
            next_key: response.next_key,
            total: response.total,
        }
    }
}

/// Cuts one page out of `entries`, which must be sorted by ascending key.
///
/// A request without pagination returns the first [`DEFAULT_LIMIT`] entries.
pub fn paginate<T>(
    mut entries: Vec<(Vec<u8>, T)>,
    request: Option<&PageRequest>,
) -> Result<(Vec<T>, PageResponse), Error> {
    let request = request.cloned().unwrap_or_default();

    if request.offset > 0 && !request.key.is_empty() {
        return Err(Error::invalid_pagination(
            "either offset or key is expected, got both".to_string(),
        ));
    }

    let (limit, count_total) = if request.limit == 0 {
        (DEFAULT_LIMIT, true)
    } else {
        (request.limit, request.count_total)
    };

    if request.reverse {
        entries.reverse();
    }

    let start = if request.key.is_empty() {
        usize::try_from(request.offset)
            .unwrap_or(usize::MAX)
            .min(entries.len())
    } else {
        entries
            .iter()
            .position(|(key, _)| {
                if request.reverse {
                    *key <= request.key
                } else {
                    *key >= request.key
                }
            })
            .unwrap_or(entries.len())
    };
    let end = start
        .saturating_add(usize::try_from(limit).unwrap_or(usize::MAX))
        .min(entries.len());

    let total = if count_total && request.key.is_empty() {
        entries.len() as u64
    } else {
        0
    };
    let next_key = entries
        .get(end)
        .map(|(key, _)| key.clone())
        .unwrap_or_default();

    let page = entries
        .into_iter()
        .skip(start)
        .take(end - start)
        .map(|(_, value)| value)
        .collect();

    Ok((page, PageResponse { next_key, total }))
}
