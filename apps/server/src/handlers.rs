pub mod applications;
pub mod embedded;
pub mod health;
pub mod permissions;
