//! K2List - converts third-party block/allow lists into canonical rule text.
//!
//! Public lists come in many ad-hoc shapes: hosts-style files, plain domain
//! lists, CSV exports, IP feeds with ports or CIDR suffixes. This crate turns
//! each line into one of two canonical forms that the k2rule compiler reads:
//!
//! - **Domain-suffix rule**: `+.example.com` (the domain and all subdomains)
//! - **IP-CIDR rule**: `1.2.3.0/24`, `2001:db8::/32`
//!
//! # Quick Start
//!
//! ```
//! use k2list::{DriverOptions, StreamDriver};
//!
//! let list = concat!(
//!     "# Title: example blocklist\n",
//!     "ads.example.com\n",
//!     "1.2.3.4:8080\n",
//!     "[2001:db8::1]:443\n",
//!     "# this comment is dropped\n",
//! );
//!
//! let driver = StreamDriver::new(DriverOptions::default());
//! let mut domains = Vec::new();
//! let mut ips = Vec::new();
//! driver.mixed(list.as_bytes(), &mut domains, &mut ips).unwrap();
//!
//! assert_eq!(
//!     String::from_utf8(domains).unwrap(),
//!     "# Title: example blocklist\n+.ads.example.com\n"
//! );
//! assert_eq!(
//!     String::from_utf8(ips).unwrap(),
//!     "1.2.3.4/32\n2001:db8::1/128\n"
//! );
//! ```
//!
//! # Line Handling
//!
//! - Blank lines are dropped.
//! - Comment lines before the first data line are copied verbatim.
//! - Comment lines after the first data line are dropped.
//! - Data lines are split on the field separator; only the first column
//!   is used, with any inline `#` comment removed.
//! - Lines that match neither grammar are silently dropped.
//!
//! # Batch Conversion
//!
//! Many lists can be converted in one run with a YAML [`BatchConfig`]. See
//! the [`config`] module for the file format.

mod error;
mod mode;
mod separator;

pub mod config;
pub mod driver;
pub mod line;
pub mod normalize;
pub mod stream;

// Re-export core types
pub use error::{Error, Result};
pub use mode::{Grammar, HeaderPolicy, Mode};
pub use separator::FieldSeparator;

// Re-export pipeline types
pub use config::{BatchConfig, ListOutputs, ListReport, ListSource};
pub use driver::{DriveStats, DriverOptions, StreamDriver};
pub use line::{host_token, LineKind, ParserState};
pub use normalize::{DomainNormalizer, IpNormalizer, Normalizer};
