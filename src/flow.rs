//! Looping animation tasks driven by the host's render loop.
//!
//! Nothing here runs on its own: the owner of a scene calls `advance` with
//! the time elapsed since the previous frame and applies the result to its
//! nodes. A task lives exactly as long as the scene that owns it, so dropping
//! the scene is all it takes to stop it.

use instant::Duration;

use cgmath::{InnerSpace, Rotation3};

use crate::data_structures::{instance::Instance, scene_graph::Node};
use crate::resources::animation::sample_clip;

/// A full turn around `axis` every `period`, repeated forever.
#[derive(Clone, Debug, PartialEq)]
pub struct Spin {
    axis: cgmath::Vector3<f32>,
    period: Duration,
    elapsed: Duration,
}

impl Spin {
    /// A zero axis or a zero period yields a spin that stays at rest.
    pub fn new(axis: cgmath::Vector3<f32>, period: Duration) -> Self {
        Self {
            axis,
            period,
            elapsed: Duration::ZERO,
        }
    }

    pub fn axis(&self) -> cgmath::Vector3<f32> {
        self.axis
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn advance(&mut self, dt: Duration) {
        if self.period.is_zero() {
            return;
        }
        let period = self.period.as_secs_f64();
        let elapsed = (self.elapsed + dt).as_secs_f64().rem_euclid(period);
        self.elapsed = Duration::from_secs_f64(elapsed);
    }

    pub fn angle(&self) -> cgmath::Rad<f32> {
        if self.period.is_zero() {
            return cgmath::Rad(0.0);
        }
        let fraction = self.elapsed.as_secs_f64() / self.period.as_secs_f64();
        cgmath::Rad((std::f64::consts::TAU * fraction) as f32)
    }

    /// Rotation reached after the elapsed part of the current revolution.
    pub fn rotation(&self) -> cgmath::Quaternion<f32> {
        if self.axis.magnitude2() == 0.0 {
            return cgmath::Quaternion::from_angle_y(cgmath::Rad(0.0));
        }
        cgmath::Quaternion::from_axis_angle(self.axis.normalize(), self.angle())
    }

    /// Applies the spin on top of `rest`, the node's orientation before spinning.
    pub fn apply(&self, rest: &Instance, transform: &mut Instance) {
        transform.rotation = rest.rotation * self.rotation();
    }
}

/// Samples every embedded clip of `node`'s descendants at scene time `time`.
///
/// The first clip of each node wins; `node` itself is left alone because its
/// transform is owned by whoever placed it.
pub fn play_embedded_clips(node: &mut Node, time: Duration) {
    let time = time.as_secs_f32();
    for child in &mut node.children {
        child.walk_mut(&mut |descendant| {
            if let Some(clip) = descendant.animations.first() {
                sample_clip(clip, time, &mut descendant.transform);
            }
        });
    }
}
