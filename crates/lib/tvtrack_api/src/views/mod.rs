//! Server-rendered HTML views.

pub mod episode_list;
pub mod format;

pub use episode_list::{Breakpoint, EpisodeListProps, EpisodeListView};
