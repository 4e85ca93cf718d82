pub mod activity_memberships;
pub mod trophy_memberships;

pub use activity_memberships::ActivityMembershipRow;
pub use trophy_memberships::TrophyMembershipRow;
