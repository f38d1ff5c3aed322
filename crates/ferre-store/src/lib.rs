//! Keyed JSON repository for Ferretería Online.
//!
//! Carts and order drafts are persisted by key through a small CRUD
//! interface with automatic JSON serialization. The cart engine never
//! depends on this crate; the storefront does.
//!
//! # Example
//!
//! ```rust,ignore
//! use ferre_store::prelude::*;
//!
//! let repo = JsonFileRepository::open(".ferre")?;
//!
//! // Store a value
//! repo.put(&repo_key!("cart", "default"), &cart)?;
//!
//! // Retrieve a value
//! let cart: Option<Cart> = repo.get("cart:default")?;
//!
//! // Versioned read-modify-write
//! let carts = Records::<_, Cart>::new(&repo, "cart");
//! carts.update("default", |cart| cart.cleared())?;
//! ```

mod error;
mod file;
mod record;
mod repository;

pub use error::StoreError;
pub use file::JsonFileRepository;
pub use record::{Records, Versioned};
pub use repository::{validate_key, MemoryRepository, Repository, RepositoryExt};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::repo_key;
    pub use crate::{
        JsonFileRepository, MemoryRepository, Records, Repository, RepositoryExt, StoreError,
        Versioned,
    };
}
