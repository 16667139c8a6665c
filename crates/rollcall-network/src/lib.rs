//! HTTP clients for the holder directory and the attendance ledger.
//!
//! Both collections live on the same service. Each call is a single request
//! with a transport timeout; there is no retry, no queue and no cache.
//!
//! - [`DirectoryResolver`] implements [`HolderDirectory`]: credential to holder.
//! - [`AttendanceRecorder`] implements [`AttendanceLedger`]: holder to stored event.
//!
//! ```no_run
//! use rollcall_core::{CredentialId, FixedClock};
//! use rollcall_network::{
//!     AttendanceLedger, AttendanceRecorder, ClientConfig, DirectoryResolver, HolderDirectory,
//! };
//!
//! # async fn run() -> rollcall_network::Result<()> {
//! let config = ClientConfig::default();
//! let http = config.build_client()?;
//! let directory = DirectoryResolver::with_client(http.clone(), &config);
//! let ledger = AttendanceRecorder::with_client(http, &config, FixedClock::unavailable());
//!
//! let id: CredentialId = "04ABCDEF".parse().unwrap();
//! let holder = directory.resolve(&id).await?;
//! let delivery = ledger.record(&holder).await?;
//! println!("{}", delivery.outcome());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod directory;
pub mod error;
pub mod ledger;

pub use client::ClientConfig;
pub use directory::{DirectoryResolver, HolderDirectory};
pub use error::{NetworkError, Result};
pub use ledger::{AttendanceLedger, AttendanceRecorder, Delivery};
