//! Lambda handlers.
//!
//! - [`identity`]: SES identity custom resource
//! - [`ruleset`]: active receipt rule set custom resource
//! - [`verification_link`]: SNS subscriber that follows verification links
//! - [`sample`]: echo handler

mod error;
pub mod identity;
pub mod ruleset;
pub mod sample;
pub mod verification_link;

pub use error::{HandlerError, HandlerResult};
pub use identity::IdentityHandler;
pub use ruleset::RuleSetHandler;
pub use verification_link::{HttpLinkFetcher, LinkFetcher, VerificationLinkHandler};
