//! Avatr composes profile avatars from pre-authored SVG parts.
//!
//! A request names 13 part variants and a color palette. The edge-facing half
//! ([`edge::handle`]) validates the request, mints a free storage key, and
//! hands the job off without waiting for it. The backend half
//! ([`CompositionWorker`]) fetches the 13 fragments, merges them into one SVG
//! document with the palette applied as CSS, rasterizes a 256x256 PNG, and
//! stores it under the minted key.
#![forbid(unsafe_code)]

mod foundation;

pub mod compose;
pub mod dispatch;
pub mod edge;
pub mod keys;
pub mod parts;
pub mod render;
pub mod schema;
pub mod store;
pub mod worker;

pub use crate::foundation::error::{AvatrError, AvatrResult};

pub use crate::compose::{SvgTemplate, compose_document, style_block};
pub use crate::dispatch::{JobDispatcher, QueueDispatcher, spawn_worker};
pub use crate::edge::{EdgeBody, EdgeRequest, EdgeResponse, handle};
pub use crate::keys::mint_key;
pub use crate::parts::{PartFragment, SLOT_NAMES, fragment_path, parse_fragment};
pub use crate::render::{RASTER_SIZE, rasterize_png};
pub use crate::schema::{AvatarRequest, JobRequest, PALETTE_SLOTS, PART_COUNT, PaletteEntry};
pub use crate::store::{DirStore, MemoryStore, ObjectStore, StoredObject};
pub use crate::worker::CompositionWorker;
