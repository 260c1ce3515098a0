//! Draw descriptors for a sprite renderer
//!
//! Nothing here touches a GPU: the game state is flattened into instance
//! records and text labels that any batcher can upload as-is.

pub mod draw_list;
pub mod instance;

pub use draw_list::{DrawList, Label, build, dust_stretch};
pub use instance::{DrawInstance, Sprite, colors};
