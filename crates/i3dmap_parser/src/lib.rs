//! # i3dmap_parser
//!
//! Read-side model of GIANTS i3d scene documents.
//!
//! - [`SceneForest`]: arena of scene nodes parsed from the `<Scene>` element,
//!   with deterministic pre-order traversal and byte-preserving serialization
//! - [`Address`]: positional node addresses (`0>0|1|2`) and their codec
//! - [`Reference`]: classification of attribute values that point at nodes
//! - [`TextEdits`]: disjoint byte-range splicing used by every rewrite
//!
//! ## Example
//!
//! ```rust
//! use i3dmap_parser::{Address, SceneForest};
//!
//! let forest = SceneForest::parse(
//!     r#"<i3D><Scene><TransformGroup name="root"><Shape name="body"/></TransformGroup></Scene></i3D>"#,
//! )?;
//! let body = forest.node_at(&Address::decode("0>0")?).expect("body exists");
//! assert_eq!(forest.node(body).name(), Some("body"));
//! # Ok::<(), i3dmap_error::I3dMapError>(())
//! ```

pub mod address;
pub mod edits;
pub mod reference;
pub mod scene;
pub mod xml;

pub use address::{Address, looks_positional};
pub use edits::{TextEdit, TextEdits};
/// Canonical result type for this crate
pub use i3dmap_error::Result;
pub use reference::Reference;
pub use scene::{NodeId, Preorder, SceneForest, SceneNode};
