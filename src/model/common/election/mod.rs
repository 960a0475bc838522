mod state;

pub use state::ElectionState;
