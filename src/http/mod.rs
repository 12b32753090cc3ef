//! HTTP layer for SES.
//!
//! ```text
//! SesHttpClient   signing, retries
//!      |
//! Transport       reqwest by default
//! ```
//!
//! The same client serves the v2 REST/JSON API (`/v2/email/...`) and the v1
//! Query API (`POST /` with a form body), since both live on the same host and
//! sign under the `ses` service name.

mod client;
mod request;
mod response;
mod transport;

pub use client::SesHttpClient;
pub use request::{
    encode_path_segment, HttpMethod, SesRequest, FORM_CONTENT_TYPE, JSON_CONTENT_TYPE,
    QUERY_API_VERSION,
};
pub use response::SesResponse;
pub use transport::{ReqwestTransport, Transport};

use async_trait::async_trait;
use crate::error::SesResult;

/// Anything that can send an [`SesRequest`].
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Send a request, returning the response or the mapped SES error for
    /// non-2xx statuses.
    async fn send_request(&self, request: SesRequest) -> SesResult<SesResponse>;

    fn endpoint(&self) -> &str;

    fn region(&self) -> &str;
}
