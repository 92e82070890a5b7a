//! Response-body rewriting for apps served off a non-root prefix.
//!
//! Backends that embed root-absolute URLs (`src="/main.js"`, `/api/...`)
//! break once they are moved under `/<prefix>/`. The rewrite strategy pairs
//! prefix stripping on the way in with these substitutions on the way out.
//!
//! # Design Decisions
//! - Rules are plain literals, never regexes
//! - Order is significant and fixed
//! - One pass, non-overlapping: replaced text is not scanned again

pub mod rules;

pub use rules::{apply, content_rules, SubstitutionRule, REWRITTEN_CONTENT_TYPES};
