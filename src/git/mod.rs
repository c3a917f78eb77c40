//! Git primitives used by `lab`.
//!
//! Everything here shells out to `git` through [`Repository`]; nothing talks
//! to GitLab.

mod editor;
mod error;
mod repository;
mod url;

pub use editor::{EditorSession, resolve_editor};
pub use error::{GitError, MessageKind};
pub use repository::{Repository, set_base_path};
pub use url::GitRemoteUrl;
