use std::ops::{Add, Mul};

use cgmath::{InnerSpace, VectorSpace};

use crate::data_structures::{
    instance::Instance,
    scene_graph::{AnimationClip, Channel, Repeat},
};

#[derive(Clone, Debug, PartialEq)]
pub enum Keyframes {
    Translation(Vec<cgmath::Vector3<f32>>),
    Rotation(Vec<cgmath::Quaternion<f32>>),
    Scale(Vec<cgmath::Vector3<f32>>),
    Other,
}

/// How values between two keyframes are computed.
///
/// `CubicSpline` keyframes are stored as `[in-tangent, value, out-tangent]`
/// triples, exactly as they come out of the asset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Interpolation {
    #[default]
    Linear,
    Step,
    CubicSpline,
}

/// Maps scene time onto clip time according to the clip's repeat mode.
pub fn clip_time(clip: &AnimationClip, time: f32) -> f32 {
    let duration = clip.duration();
    if duration <= 0.0 {
        return 0.0;
    }
    match clip.repeat {
        Repeat::Forever => time.rem_euclid(duration),
        Repeat::Once => time.clamp(0.0, duration),
    }
}

/**
 * Finds the keyframe pair surrounding `time` and the blend factor between them.
 *
 * Times before the first keyframe hold the first value, times after the last
 * hold the last value.
 */
fn bracket(timestamps: &[f32], time: f32) -> Option<(usize, usize, f32)> {
    let last = timestamps.len().checked_sub(1)?;
    if time <= timestamps[0] {
        return Some((0, 0, 0.0));
    }
    if time >= timestamps[last] {
        return Some((last, last, 0.0));
    }
    // Zero only when the times are not ordered, e.g. a NaN first key
    let next = timestamps.partition_point(|&t| t <= time);
    let prev = next.checked_sub(1)?;
    let span = timestamps[next] - timestamps[prev];
    let factor = if span > 0.0 {
        (time - timestamps[prev]) / span
    } else {
        0.0
    };
    Some((prev, next, factor))
}

/// The stretch of a channel that contains the sampled time.
struct Segment {
    prev: usize,
    next: usize,
    factor: f32,
    span: f32,
    interpolation: Interpolation,
}

impl Segment {
    fn sample<T>(&self, frames: &[T], lerp: impl Fn(T, T, f32) -> T) -> Option<T>
    where
        T: Copy + Add<Output = T> + Mul<f32, Output = T>,
    {
        match self.interpolation {
            Interpolation::Step => frames.get(self.prev).copied(),
            Interpolation::Linear => Some(lerp(*frames.get(self.prev)?, *frames.get(self.next)?, self.factor)),
            Interpolation::CubicSpline => {
                let p0 = *frames.get(self.prev * 3 + 1)?;
                let m0 = *frames.get(self.prev * 3 + 2)? * self.span;
                let p1 = *frames.get(self.next * 3 + 1)?;
                let m1 = *frames.get(self.next * 3)? * self.span;
                let t = self.factor;
                let (t2, t3) = (t * t, t * t * t);
                Some(
                    p0 * (2.0 * t3 - 3.0 * t2 + 1.0)
                        + m0 * (t3 - 2.0 * t2 + t)
                        + p1 * (-2.0 * t3 + 3.0 * t2)
                        + m1 * (t3 - t2),
                )
            }
        }
    }
}

fn sample_channel(channel: &Channel, time: f32, transform: &mut Instance) {
    let Some((prev, next, factor)) = bracket(&channel.timestamps, time) else {
        return;
    };
    let segment = Segment {
        prev,
        next,
        factor,
        span: channel.timestamps[next] - channel.timestamps[prev],
        interpolation: channel.interpolation,
    };
    match &channel.keyframes {
        Keyframes::Translation(frames) => {
            if let Some(position) = segment.sample(frames, |a, b, f| a.lerp(b, f)) {
                transform.position = position;
            }
        }
        Keyframes::Rotation(frames) => {
            let rotation = segment.sample(frames, |a, b, f| {
                // keep the shortest path between the two keys
                let b = if a.dot(b) < 0.0 { -b } else { b };
                a.nlerp(b, f)
            });
            if let Some(rotation) = rotation.filter(|r| r.magnitude2() > 0.0) {
                transform.rotation = rotation.normalize();
            }
        }
        Keyframes::Scale(frames) => {
            if let Some(scale) = segment.sample(frames, |a, b, f| a.lerp(b, f)) {
                transform.scale = scale;
            }
        }
        Keyframes::Other => {}
    }
}

/// Writes the state of `clip` at scene time `time` into `transform`.
///
/// Properties without a channel in the clip keep their current value.
pub fn sample_clip(clip: &AnimationClip, time: f32, transform: &mut Instance) {
    let time = clip_time(clip, time);
    for channel in &clip.channels {
        sample_channel(channel, time, transform);
    }
}
