//! Wire types for the SES operations this crate calls.

mod identity;

pub use identity::{
    DkimAttributes, EmailIdentity, IdentityInfo, IdentityType, VerificationAttributes,
    VerificationStatus,
};
