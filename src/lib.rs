//! # ipboard - a typed client for the IPS Community Suite REST API
//!
//! This crate talks to an IPBoard (Invision Community) installation's REST
//! API: members, forums, topics and posts. It is built on `reqwest` and
//! focuses on the parts that are easy to get wrong by hand:
//!
//! - **Pre-flight validation** - request parameters are checked against
//!   per-operation schemas before any network call, so input the server
//!   would reject never costs a round-trip.
//! - **Typed errors** - the vendor's error codes (`"1C292/4"` and friends)
//!   and bare HTTP statuses are translated into a closed
//!   [`ApiErrorKind`] taxonomy callers can match on.
//! - **Page aggregation** - cursor-free paged listings are walked page by
//!   page and concatenated in server order.
//!
//! Calls are issued one at a time with a fixed per-request timeout and no
//! retries; a failed call surfaces immediately as exactly one [`Error`].
//!
//! ## Quick start
//!
//! ```no_run
//! use ipboard::{Client, Params};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ipboard::Error> {
//!     let client = Client::builder()
//!         .base_url("https://forum.example.com/api/")?
//!         .api_key("0123456789abcdef")
//!         .timeout(Duration::from_secs(2))
//!         .build()?;
//!
//!     // Who are we talking to?
//!     let instance = client.hello().await?;
//!     println!("instance: {:?}", instance.data);
//!
//!     // Every post in forums 1-3, newest first, across all pages.
//!     let criteria = Params::new()
//!         .set("forums", "1,2,3")
//!         .set("sortBy", "date")
//!         .set("sortDir", "desc");
//!     let posts = client.posts().search_all(&criteria).await?;
//!     println!("{} posts", posts.len());
//!
//!     // Post as a guest; author 0 requires an author_name.
//!     client
//!         .posts()
//!         .create(42, 0, "<p>hello</p>", Params::new().set("author_name", "Guest"))
//!         .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Error handling
//!
//! ```no_run
//! use ipboard::{ApiErrorKind, Client, Error};
//!
//! # async fn example(client: Client) -> Result<(), Error> {
//! match client.members().create("alice", "alice@example.com", "hunter2", None).await {
//!     Ok(response) => println!("created: {:?}", response.data),
//!     Err(e) if e.api_kind() == Some(ApiErrorKind::MemberUsernameExists) => {
//!         eprintln!("that username is taken");
//!     }
//!     Err(e) if e.api_kind() == Some(ApiErrorKind::Throttled) => {
//!         eprintln!("rate limited; slow down");
//!     }
//!     Err(e) => return Err(e),
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod forums;
mod members;
pub mod pages;
mod posts;
pub mod request;
mod response;
mod topics;
pub mod validate;

pub use client::{Client, ClientBuilder};
pub use error::{ApiErrorKind, Error, Result};
pub use forums::Forums;
pub use members::Members;
pub use pages::{fetch_all_pages, Page};
pub use posts::Posts;
pub use request::{Params, RequestSpec};
pub use response::Response;
pub use topics::Topics;
pub use validate::{FormatRegistry, Rule, Schema};
