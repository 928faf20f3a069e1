//! Render data extraction
//!
//! Turns world state into instance buffers for an external instanced
//! renderer. Nothing here touches a graphics API.

pub mod instance;

pub use instance::{
    BallInstance, BoxInstance, MAX_INSTANCES_PER_BATCH, ball_batches, colors, obstacle_instances,
};
