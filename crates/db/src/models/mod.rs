pub mod invitation;
pub mod invitation_response;

pub use invitation::*;
pub use invitation_response::*;
