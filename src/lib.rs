//! bwpairs - per-flow bandwidth attribution
//!
//! This library classifies directional bandwidth records (`vc->serviceA-7f3a9c21`)
//! into anchor/service pairs, sums bandwidth per pair, derives the management
//! host's residual bucket, and merges many files into one report.
//!
//! ```
//! use bwpairs::{config::HostIdentity, pipeline::process_records, record::Record};
//!
//! let identity = HostIdentity::new("10.0.0.5", "10.0.0.6").unwrap();
//! let records = vec![
//!     Record::new("vc->serviceA-ab12cd34", 50.0),
//!     Record::new("serviceA->vc", 20.0),
//! ];
//! let outcome = process_records("esx01.csv", &records, &identity);
//! assert_eq!(outcome.result.get("vc_serviceA"), Some(70.0));
//! ```

pub mod aggregate;
pub mod batch;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod csv_output;
pub mod json_output;
pub mod normalize;
pub mod pipeline;
pub mod record;
pub mod report;
pub mod residual;
pub mod text_output;
