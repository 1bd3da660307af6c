//! Account models and the account store used by tokengate.
//!
//! The token core only needs two things from the system of record: the
//! password hash of an account at login, and its current roles on every
//! authenticated request. Both come through [`account::store::AccountStore`].
//!
//! # Usage
//!
//! ```rust
//! use tg_auth::identity::Identity;
//! use tg_models::account::{
//!     AccountRecord,
//!     memory::MemoryAccountStore,
//!     store::AccountStore,
//! };
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = MemoryAccountStore::new();
//! let identity = Identity::new("user@example.com")?;
//! store.insert(AccountRecord::new_user(identity.clone(), "$argon2id$...".into())).await?;
//!
//! let roles = store.load_roles(&identity).await?;
//! assert_eq!(roles.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod account;
pub mod auth;
pub mod error;
pub mod prelude;
