//! SES identity management for CloudFormation, as AWS Lambda handlers.
//!
//! # Handlers
//!
//! - **Identity** ([`handlers::IdentityHandler`]): custom resource that makes
//!   sure an SES email or domain identity exists. Domain identities report
//!   `DkimTokens` and `VerificationToken` as resource data; email identities
//!   are sent verification emails until verified and get their sending policy
//!   upserted.
//! - **Rule set** ([`handlers::RuleSetHandler`]): custom resource that
//!   activates a receipt rule set.
//! - **Verification link** ([`handlers::VerificationLinkHandler`]): SNS
//!   subscriber that follows the link in SES verification emails.
//! - **Sample** ([`handlers::sample`]): echoes the event.
//!
//! Custom-resource handlers never fail the invocation: errors are reported to
//! CloudFormation as `Status=FAILED` with the error as `Reason`.
//!
//! # SES client
//!
//! [`SesClient`] talks to both SES APIs on `email.<region>.amazonaws.com`:
//! the v2 REST/JSON API for identities and policies and the v1 Query API for
//! verification attributes, verification emails and receipt rule sets. Every
//! request is SigV4 signed; throttling and 5xx responses are retried with
//! exponential backoff.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use ses_identity::cfn::{CustomResourceDispatcher, HttpResponseSender};
//! use ses_identity::handlers::IdentityHandler;
//! use ses_identity::SesClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = SesClient::from_env()?;
//! let dispatcher = CustomResourceDispatcher::new(
//!     IdentityHandler::from_client(&client),
//!     Arc::new(HttpResponseSender::new()?),
//! );
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `LOG_LEVEL` | `INFO` | `DEBUG`, `INFO`, `WARNING`, `ERROR`, `CRITICAL` |
//! | `MAX_WORKERS` | `4` | blocking worker pool size |
//! | `_HANDLER` | `sample` | `sample`, `identity`, `ruleset` or `verification` |
//! | `AWS_REGION` | | SES region (falls back to `AWS_DEFAULT_REGION`) |
//! | `SES_ENDPOINT` | | endpoint override |

#![deny(unsafe_code)]

pub mod aio;
pub mod cfn;
pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod handlers;
pub mod http;
pub mod logging;
pub mod poller;
pub mod services;
pub mod signing;
pub mod types;
pub mod utils;
pub mod xml;

pub use client::SesClient;
pub use config::{HandlerConfig, HandlerKind, RetryConfig, SesConfig};
pub use credentials::{
    AwsCredentials, CachedCredentialProvider, ChainCredentialProvider,
    ContainerCredentialProvider, CredentialError, CredentialProvider, DefaultCredentialProvider,
    EnvironmentCredentialProvider, StaticCredentialProvider,
};
pub use error::{SesError, SesResult};
pub use handlers::{HandlerError, HandlerResult};
