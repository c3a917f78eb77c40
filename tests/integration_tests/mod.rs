// The mock glab is a shell script
#![cfg(unix)]

pub mod clone;
pub mod issue_create;
pub mod mr_create;
pub mod project_create;
pub mod project_users;
