//! Use cases: one unit of work per operation.
//!
//! Every operation loads an aggregate, mutates it, saves it and commits.
//! Only after the commit succeeds are events handed to the session buffers:
//! facts returned by the aggregate go to the domain buffer, notifications for
//! outside consumers go to the infra buffer.

pub mod subdivision;
pub mod tenant;
pub mod user;

use domain::LicensingEvent;
use messagebus::EventBuffers;

pub use subdivision::SubdivisionService;
pub use tenant::TenantService;
pub use user::UserService;

/// The session buffers use cases write into.
pub type Events = EventBuffers<LicensingEvent>;
