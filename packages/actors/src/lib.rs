//! Actor-owned stores for the tracker's collections.
//!
//! Each collection (jobs, customers) lives in exactly one Ractor actor,
//! so every read and write goes through that actor's mailbox and
//! mutations never interleave.
//!
//! # Architecture
//!
//! - `Collection` - The in-memory map and its pure operations
//! - `StoreActor` - Owns one collection and rewrites its file after each change
//! - `StoreHandle` - Request/reply facade used by the HTTP layer
//!
//! # Usage
//!
//! ```ignore
//! use actors::{JobStore, spawn_store};
//!
//! let (jobs, _handle) = spawn_store::<Job>(storage.clone()).await?;
//! let job = jobs.add(NewJob::default()).await?;
//! ```

mod collection;
mod handle;
mod messages;
mod store_actor;

pub use collection::Collection;
pub use handle::{CustomerStore, JobStore, StoreHandle, spawn_store};
pub use messages::{RecordFilter, StoreError, StoreMessage};
pub use store_actor::{StoreActor, StoreArgs, collection_file};

/// Re-export ractor types for convenience.
pub use ractor::{Actor, ActorRef, RpcReplyPort, concurrency};
