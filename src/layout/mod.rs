//! Incremental semantic layout: embedding vectors in, non-overlapping marker
//! positions out.

pub mod engine;
pub mod normalize;
pub mod reduce;
pub mod resolve;
pub mod store;
pub mod sync;

pub use engine::{Canvas, Committed, LayoutEngine, LayoutFrame};
pub use normalize::{drawable_rect, normalize, to_screen};
pub use reduce::{PcaReducer, Reducer};
pub use resolve::{OverlapResolver, boxes_overlap};
pub use store::{Item, ItemId, VectorStore};
pub use sync::{Marker, MarkerSet, MarkerStyle, MarkerUpdate, SyncPlan, TextMeasure, marker_size};
