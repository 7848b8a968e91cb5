mod auth;
mod cache;
mod state;
mod tracks;

pub use auth::TokenStore;
pub use cache::{ContentCache, Namespace};
pub use state::StateError;
pub use tracks::TrackIndex;
