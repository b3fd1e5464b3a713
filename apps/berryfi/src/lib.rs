//! # berryfi
//!
//! Fibery workspace client - THE CLIENT.
//!
//! Wraps [`berryfi_core`] with an HTTP command executor, layered
//! configuration and a schema-owning client object.
//!
//! ```no_run
//! use berryfi::{Berryfi, BerryfiConfig};
//! use serde_json::{Map, json};
//!
//! # async fn run() -> Result<(), berryfi_core::BerryfiError> {
//! let config = BerryfiConfig::new("acme", "token");
//! let mut client = Berryfi::new(&config)?;
//! client.load().await?;
//!
//! let executor = client.executor();
//! if let Some(people) = client.workspace_mut().lookup_type_mut("Person") {
//!     let person = people.make_entity(Map::new())?;
//!     person.set_field("name", json!("Ann"))?;
//!     person.insert(executor.as_ref()).await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod http;

pub use client::Berryfi;
pub use config::{BerryfiConfig, PartialConfig};
pub use http::{ClientError, HttpExecutor};
