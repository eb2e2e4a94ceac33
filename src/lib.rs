//! Compact sorted set of signed integers for a Redis-style key-value engine.
//!
//! ```
//! use redis_intset::intset::intset::IntSet;
//! use redis_intset::intset::lib::Encoding;
//!
//! let (set, _) = IntSet::new().add(100);
//! let (set, added) = set.add(40000);
//! assert!(added);
//! assert_eq!(set.encoding(), Encoding::Int32);
//! assert_eq!(set.iter().collect::<Vec<_>>(), vec![100, 40000]);
//! ```

pub mod config;
pub mod intset;
pub mod stress;

pub use intset::error::IntSetError;
pub use intset::intset::IntSet;
pub use intset::lib::Encoding;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Result<T> = std::result::Result<T, Error>;
