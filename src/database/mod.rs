pub mod activity_memberships_repo;
pub mod trophies_repo;
