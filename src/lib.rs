//! Asynchronous client for the Victron Energy VRM portal API.
//!
//! Authentication works in one of three modes (credentials, the public
//! demo account, or a pre-issued access token); typed namespaces cover
//! site listings, consumption statistics, and user/access-token
//! management, and [`VrmClient::request`] reaches any other endpoint.
//!
//! ```no_run
//! use vrm_rs::{VrmClient, DEMO_SITE_ID, DEMO_USER_ID};
//!
//! # async fn run() -> Result<(), vrm_rs::Error> {
//! let mut client = VrmClient::builder().demo().build()?;
//! client.connect().await?;
//!
//! for site in client.users().get_installations(DEMO_USER_ID).await? {
//!     println!("{}: {}", site.id_site, site.name);
//! }
//! let stats = client
//!     .installations()
//!     .get_consumption_stats(DEMO_SITE_ID, None, None)
//!     .await?;
//! println!("grid data available: {}", !stats.records.gc.is_unavailable());
//!
//! client.disconnect().await?;
//! # Ok(())
//! # }
//! ```

#[macro_use]
extern crate lazy_static;

pub mod api;
pub mod client;
pub mod error;
pub mod routes;
pub mod schema;
pub mod utils;

pub use api::{Expiry, InstallationsApi, UsersApi};
pub use client::{AuthMode, VrmClient, VrmClientBuilder};
pub use error::Error;
pub use reqwest::Method;
pub use routes::Routes;

/// The demo account's user id. The demo login endpoint does not report a
/// usable one, so the session pins this value.
pub const DEMO_USER_ID: i64 = 22;

/// An installation visible to the demo account.
pub const DEMO_SITE_ID: i64 = 151734;

pub const DEFAULT_BASE_URL: &str = "https://vrmapi.victronenergy.com/v2";
