//! # park-core
//!
//! Primitives for sharing parking spots over time.
//!
//! This crate provides:
//!
//! - [`Period`]: Hour-granular time interval with containment, overlap,
//!   adjacency, union and difference operations
//! - [`Zone`]: The closed set of parking zones
//! - [`Party`]: A spot owner or a requestor
//! - [`Spot`]: A parking spot in a zone, owned by a party
//! - [`Clock`]: Source of "now" for anything that needs a default horizon
//!
//! # Example
//!
//! ```rust
//! use park_core::{Period, parse_hour};
//!
//! let morning = Period::parse("2018-01-02T04", "2018-01-02T12").unwrap();
//! let errand = Period::parse("2018-01-02T05", "2018-01-02T11").unwrap();
//!
//! assert!(morning.contains(&errand));
//! assert_eq!(morning.before(&errand).map(|p| p.length()), Some(1));
//! assert_eq!(morning.after(&errand).map(|p| p.begin()), parse_hour("2018-01-02T11").ok());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod clock;
pub mod error;
pub mod party;
pub mod period;
pub mod spot;
pub mod time;
pub mod zone;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{ParkError, Result};
pub use party::{Party, PartyKey};
pub use period::Period;
pub use spot::{Spot, SpotKey};
pub use time::{floor_to_hour, format_hour, parse_hour, HOUR_FORMAT};
pub use zone::Zone;
