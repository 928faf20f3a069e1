//! Instance types for 2D rendering
//!
//! One quad mesh is drawn per batch; every ball and obstacle is a single
//! plain-old-data instance record uploaded as-is.

use bytemuck::{Pod, Zeroable};

use crate::sim::{Layer, Shape, World};

/// Instances per draw call
pub const MAX_INSTANCES_PER_BATCH: usize = 1023;

/// A ball: unit circle scaled by `radius`, translated to `center`
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct BallInstance {
    pub center: [f32; 2],
    pub radius: f32,
    pub _pad: f32,
    pub color: [f32; 4],
}

/// A box obstacle: unit quad scaled by `half_extents`
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct BoxInstance {
    pub center: [f32; 2],
    pub half_extents: [f32; 2],
    pub color: [f32; 4],
}

impl BoxInstance {
    pub fn from_shape(shape: &Shape) -> Self {
        Self {
            center: shape.center().to_array(),
            half_extents: shape.half_extents().to_array(),
            color: colors::for_layer(shape.layer),
        }
    }
}

/// Colors for arena elements
pub mod colors {
    use crate::sim::Layer;

    pub const WALL: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const BRICK: [f32; 4] = [0.4, 0.7, 1.0, 1.0];
    pub const PADDLE: [f32; 4] = [0.2, 0.8, 0.4, 1.0];
    pub const BALL: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

    pub fn for_layer(layer: Layer) -> [f32; 4] {
        match layer {
            Layer::Wall => WALL,
            Layer::Brick => BRICK,
            Layer::Paddle => PADDLE,
            Layer::Ball => BALL,
        }
    }
}

/// Visible balls, split into draw-sized batches
pub fn ball_batches(world: &World) -> Vec<Vec<BallInstance>> {
    world
        .balls()
        .chunks(MAX_INSTANCES_PER_BATCH)
        .map(|chunk| {
            chunk
                .iter()
                .filter(|b| b.visible)
                .map(|b| BallInstance {
                    center: b.pos.to_array(),
                    radius: b.radius,
                    _pad: 0.0,
                    color: b.color,
                })
                .collect()
        })
        .collect()
}

/// Active obstacles; destroyed bricks are skipped
pub fn obstacle_instances(world: &World) -> Vec<BoxInstance> {
    world
        .obstacles()
        .iter()
        .filter(|s| s.active && s.layer != Layer::Ball)
        .map(BoxInstance::from_shape)
        .collect()
}
