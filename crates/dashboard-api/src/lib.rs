//! Admin dashboard backend access
//!
//! Builds a [`dashboard_http::HttpClient`] wired with the dashboard's session
//! policy and exposes the authority endpoints as typed calls.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use dashboard_api::{AdminApi, LogRedirector, MemoryTokenStore, PageQuery, Settings, TracingNotifier};
//!
//! async fn example() -> Result<(), dashboard_api::Error> {
//!     let settings = Settings::new::<&str>(None).from_env();
//!     let api = AdminApi::new(
//!         &settings,
//!         Arc::new(MemoryTokenStore::new()),
//!         Arc::new(TracingNotifier),
//!         Arc::new(LogRedirector),
//!     )?;
//!
//!     api.login("admin", "secret").await?;
//!     let users = api.user_page(&PageQuery::new(1, 20)).await?;
//!     if users.is_success() {
//!         println!("{} users", users.data.map(|page| page.total).unwrap_or_default());
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
mod error;
pub mod notify;
pub mod session;
pub mod settings;
pub mod store;

pub use api::{
    AdminApi, LoginRequest, LoginResult, Menu, MenuForm, PageData, PageQuery, User, UserForm,
    UserInfo,
};
pub use error::Error;
pub use notify::{Notifier, TracingNotifier};
pub use session::{Locale, LogRedirector, Redirector, RouterMode, SessionInterceptors};
pub use settings::Settings;
pub use store::{MemoryTokenStore, TokenStore, TOKEN_KEY};
