pub mod dao;
pub mod event_date;
pub mod invite_id;

pub use dao::*;
pub use event_date::parse_event_date;
pub use invite_id::generate_invite_id;
