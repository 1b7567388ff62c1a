//! Host adapter for the Scenery variation model.
//!
//! [`hooks::Scenery`] reacts to host lifecycle events, [`form::ConfigForm`] is
//! the GM's editing session, and [`world`] provides a filesystem-backed host
//! for the `scenery` binary.

pub mod config;
pub mod directory;
pub mod form;
pub mod hooks;
pub mod host;
pub mod i18n;
pub mod world;

pub use config::SceneryConfig;
pub use form::{ConfigForm, FormError, Submitted};
pub use hooks::{HookError, HookResponse, HostContext, HostEvent, Scenery};
pub use host::{SceneDocument, SceneRepository, Viewer};
