//! EquiChain notary - eligibility notarization engine
//!
//! Anchors welfare-scheme eligibility decisions on an append-only public
//! ledger and lets any third party re-verify them through a short opaque
//! token code.
//!
//! ## Components
//!
//! - **codec**: reversible text-to-hex payload embedding
//! - **scorer**: identity match scoring against the trusted record dataset
//! - **schemes**: welfare scheme registry and criteria
//! - **chain**: fee estimation, signing, broadcast, confirmation waiting
//! - **ledger**: durable append-only claim store
//! - **service**: the submission pipeline tying it all together
//! - **api**: thin HTTP surface for surrounding application code

pub mod api;
pub mod chain;
pub mod codec;
pub mod config;
pub mod extract;
pub mod ledger;
pub mod schemes;
pub mod scorer;
pub mod service;
pub mod token;
pub mod types;

pub use config::Args;
pub use service::{ClaimDraft, ClaimReceipt, EligibilityVerdict, NotaryService, PipelineConfig};
pub use types::{NotaryError, Result};
