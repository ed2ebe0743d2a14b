//! Factory/builder engine for layered, sequential test fixtures.
//!
//! A [`Factory`] owns the identity of one record kind: a global sequence
//! position shared by every builder derived from it, the last record it
//! produced, and optional build/insert hooks. A [`Builder`] is a recipe on top
//! of a factory that composes override layers in a fixed order:
//!
//! 1. zero-valued record
//! 2. blueprint output for the global position (non-zero fields only)
//! 3. traits, in list order (overlay, then the trait's zero list)
//! 4. the per-position layer for the builder's local position
//! 5. the `set` overlay
//! 6. the builder's zero list
//!
//! Zero-valued fields in an overlay never overwrite; only zero lists blank a
//! field.
//!
//! # Example
//!
//! ```rust
//! use fixture_core::impl_record;
//! use fixture_factory::{Blueprint, Factory, Trait};
//!
//! #[derive(Debug, Clone, Default)]
//! struct Post {
//!     id: i64,
//!     status: String,
//! }
//!
//! impl_record!(Post { id, status });
//!
//! let factory = Factory::new(Post::default());
//! let blueprint = Blueprint::new(|seq, _prev: &Post| Post {
//!     id: seq as i64 + 1,
//!     status: "open".to_string(),
//! });
//! let draft = Trait::new(Post {
//!     status: "draft".to_string(),
//!     ..Default::default()
//! });
//!
//! let posts = factory
//!     .new_builder(Some(blueprint), vec![draft])
//!     .unwrap()
//!     .build_list(2)
//!     .unwrap();
//! assert_eq!(posts[1].id, 2);
//! assert_eq!(posts[1].status, "draft");
//! ```
//!
//! Records declared in a YAML schema file are built through [`Fixture`],
//! which compiles field generators into a blueprint and named traits into
//! layers.

pub mod builder;
pub mod error;
pub mod factory;
pub mod fixture;
pub mod generators;
pub mod layers;
pub mod merge;

pub use builder::Builder;
pub use error::{BatchError, FactoryError, HookKind};
pub use factory::Factory;
pub use fixture::Fixture;
pub use generators::FieldGenerator;
pub use layers::{Blueprint, BuildContext, Hook, Trait};
