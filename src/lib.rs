//! GitLab merge requests and issues from a local git checkout.
//!
//! `lab` is a CLI; the library behind it is what the binary calls and is not
//! a stable API. The interesting part is [`merge_request::create`], which
//! reconciles local branches with two possibly different remotes, checks
//! the commit range, composes an editable message and submits exactly one
//! merge request. GitLab itself is reached through [`gitlab::GitLabApi`].

pub mod config;
pub mod git;
pub mod gitlab;
pub mod issue;
pub mod merge_request;
pub mod project;
pub mod shell_exec;
pub mod styling;

#[cfg(test)]
mod testing;
