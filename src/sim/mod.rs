//! Deterministic simulation module
//!
//! All ball and obstacle logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by ball index, then obstacle index)
//! - No rendering or platform dependencies

pub mod collision;
pub mod layout;
pub mod shape;
pub mod state;
pub mod sweep;
pub mod tick;

pub use collision::{CollisionInfo, bounce, check_contact, check_contacts, reflect_velocity};
pub use layout::Layout;
pub use shape::{Contact, Layer, Shape, ShapeKind, contact_info, intersects};
pub use state::{Ball, BallPhase, SimEvent, TickStats, World};
pub use sweep::{SweepHit, earliest_hit, sweep_shape};
pub use tick::{MAX_CONTACTS_PER_TICK, TickInput, tick};
