//! Indexed ordered collections for Rust.
//!
//! This crate provides [`RankTreeMap`] and [`RankTreeSet`], ordered
//! collections in the style of the standard library's `BTreeMap` and
//! `BTreeSet` with additional O(log n) order-statistic operations:
//!
//! - [`get_by_rank`](RankTreeMap::get_by_rank) - Get the entry at a given
//!   sorted position
//! - [`rank_of`](RankTreeMap::rank_of) - Get the sorted position of a key
//! - Indexing by [`Rank`] - e.g., `map[Rank(0)]` for the first element
//!
//! Beyond ranks, the collections offer live bounded views ([`SubMap`],
//! [`SubSet`]) with view-relative ranks in O(log n), and fail-fast cursors
//! ([`Cursor`], [`SetCursor`]) that detect structural modification of the
//! collection they traverse.
//!
//! # Example
//!
//! ```
//! use rank_tree::{Rank, RankTreeSet};
//!
//! let mut percentiles = RankTreeSet::new();
//! for sample in [182, 150, 96, 205, 171, 133] {
//!     percentiles.insert(sample);
//! }
//!
//! // the median in O(log n)
//! assert_eq!(percentiles.get_by_rank(percentiles.len() / 2), Some(&171));
//!
//! // how many samples rank below 182?
//! assert_eq!(percentiles.rank_of(&182), Some(4));
//!
//! // smallest and largest by index
//! assert_eq!(percentiles[Rank(0)], 96);
//! assert_eq!(percentiles[Rank(5)], 205);
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library
//!   dependency
//! - **O(log n) rank operations** - Efficient order-statistic queries via
//!   subtree weight augmentation
//! - **O(n) bulk load** - [`RankTreeMap::from_sorted`] builds a valid tree
//!   from pre-sorted input without rebalancing
//! - **`serde_support`** - Optional `Serialize`/`Deserialize` that verifies
//!   key order on the way in
//!
//! # Implementation
//!
//! The collections are backed by a red-black tree whose nodes live in a
//! slot arena and carry a subtree weight. Rank queries descend the tree
//! guided by the weights; every structural mutation (including the
//! rotations inside the red-black fixups) maintains them, so rank and
//! select never traverse more than one root-to-leaf path.

#![no_std]
#![deny(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]

extern crate alloc;

mod cursor;
mod error;
mod rank;
mod raw;
mod view;

pub mod map;
pub mod set;

#[cfg(feature = "serde_support")]
mod serde_impls;

pub use cursor::{Cursor, SetCursor};
pub use error::Error;
pub use map::RankTreeMap;
pub use rank::Rank;
pub use set::RankTreeSet;
pub use view::{SetViewIter, SubMap, SubSet, ViewIter};
