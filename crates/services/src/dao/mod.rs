pub mod base;
pub mod invitation;

pub use base::BaseDao;
pub use invitation::{InvitationDao, NewInvitation};
