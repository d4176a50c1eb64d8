#![warn(clippy::pedantic, clippy::nursery, clippy::cargo)]
#![deny(missing_docs)]

//! This crate provides a frecency ranking cache: it records which resources
//! (typically files) are accessed and keeps them ordered by a score blending
//! how often and how recently each one was used.
//!
//! Every access adds a fixed weight to a resource's rank. Once the combined
//! rank of all resources passes a threshold, every rank is decayed by a
//! constant factor and resources that fall below one are forgotten. Resources
//! in regular use therefore stay near the top indefinitely, while ones that
//! are no longer touched fade out on their own.
//!
//! The store is meant for a single owner tracking hundreds to low thousands
//! of resources. It is kept sorted after every mutation, so reading the
//! ranking is a linear walk. Persistence is a whole-store snapshot written
//! atomically, see [`codec`].
//!
//! ```
//! use frecent::{ExclusionFilter, RankingStore};
//!
//! let filter = ExclusionFilter::new([r"COMMIT_EDITMSG$"])?;
//! let mut store = RankingStore::new();
//!
//! for id in ["/src/main.rs", "/src/lib.rs", "/.git/COMMIT_EDITMSG", "/src/lib.rs"] {
//!     if !filter.is_excluded(id) {
//!         store.record_access(id)?;
//!     }
//! }
//!
//! assert_eq!(
//!     store.list_ranked().collect::<Vec<_>>(),
//!     ["/src/lib.rs", "/src/main.rs"]
//! );
//! # Ok::<(), frecent::Error>(())
//! ```

mod atomic;
pub mod codec;
mod config;
mod error;
mod exclude;
mod iter;
mod score;
mod store;
mod tracker;

pub use config::Config;
pub use error::{Error, Result};
pub use exclude::{is_excluded, ExclusionFilter};
pub use iter::{IntoIter, Iter, Ranked, RankedWithScore};
pub use score::{AccessHistory, Scorer, VisitWeighted};
pub use store::{AgingPolicy, RankingStore};
pub use tracker::Tracker;
