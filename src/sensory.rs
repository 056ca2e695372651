use std::ops::RangeInclusive;

use crate::robot::{heading_direction, Pose};
use crate::world::{RayHit, World};

/// One range-sensor slot: distance to the first hit and what was hit.
pub type SensorReading = RayHit;

/// Fixed fan of `2n + 1` range sensors, `n = floor(90 / visual_angle)`.
///
/// Ray `i` (for `i` in `-n..=n`) points at `heading - i * visual_angle`, so
/// index 0 looks straight ahead and negative indices look left. Readings are
/// overwritten on each refresh, never accumulated. A non-positive or
/// non-finite `visual_angle` leaves only the straight-ahead ray.
pub struct SensorArray {
    visual_range: f32,
    visual_angle: f32,
    granularity: f32,
    half_count: i32,
    readings: Vec<SensorReading>,
}

impl SensorArray {
    pub fn new(visual_range: f32, visual_angle: f32, granularity: f32) -> Self {
        let half_count = if visual_angle.is_finite() && visual_angle > 0.0 {
            (90.0 / visual_angle).floor() as i32
        } else {
            0
        };
        let ray_count = (2 * half_count + 1) as usize;
        Self {
            visual_range,
            visual_angle,
            granularity,
            half_count,
            readings: vec![RayHit::nothing(visual_range); ray_count],
        }
    }

    pub fn ray_count(&self) -> usize {
        self.readings.len()
    }

    pub fn ray_indices(&self) -> RangeInclusive<i32> {
        -self.half_count..=self.half_count
    }

    /// Absolute heading in degrees of ray `index` for a robot facing `heading`.
    pub fn ray_heading(&self, heading: f32, index: i32) -> f32 {
        heading - index as f32 * self.visual_angle
    }

    pub fn refresh(&mut self, pose: &Pose, world: &World) {
        for index in self.ray_indices() {
            let direction = heading_direction(self.ray_heading(pose.heading, index));
            let hit = world.query_first_along_ray(
                pose.center,
                direction,
                self.visual_range,
                self.granularity,
            );
            self.readings[(index + self.half_count) as usize] = hit;
        }
    }

    /// Snapshot of the last refresh, ordered from index `-n` to `n`.
    pub fn readings(&self) -> &[SensorReading] {
        &self.readings
    }

    pub fn reading(&self, index: i32) -> Option<&SensorReading> {
        if self.ray_indices().contains(&index) {
            self.readings.get((index + self.half_count) as usize)
        } else {
            None
        }
    }

    pub fn distances(&self) -> Vec<f32> {
        self.readings.iter().map(|r| r.distance).collect()
    }

    pub fn straight_ahead(&self) -> SensorReading {
        self.readings[self.half_count as usize]
    }

    /// Mean distance over the left (negative index) and right (positive index) rays.
    pub fn side_openness(&self) -> (f32, f32) {
        let n = self.half_count as usize;
        if n == 0 {
            let d = self.readings[0].distance;
            return (d, d);
        }
        let left = self.readings[..n].iter().map(|r| r.distance).sum::<f32>() / n as f32;
        let right = self.readings[n + 1..].iter().map(|r| r.distance).sum::<f32>() / n as f32;
        (left, right)
    }

    /// Shortest reading of the fan.
    pub fn nearest(&self) -> SensorReading {
        self.readings
            .iter()
            .copied()
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
            .unwrap_or_else(|| RayHit::nothing(self.visual_range))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config;
    use crate::world::Tag;
    use macroquad::prelude::*;

    fn default_array() -> SensorArray {
        SensorArray::new(
            config::VISUAL_RANGE,
            config::VISUAL_ANGLE,
            config::VISUAL_GRANULARITY,
        )
    }

    #[test]
    fn fan_size_follows_visual_angle() {
        assert_eq!(default_array().ray_count(), 13);
        assert_eq!(SensorArray::new(200.0, 30.0, 5.0).ray_count(), 7);
        assert_eq!(SensorArray::new(200.0, 90.0, 5.0).ray_count(), 3);
        // 40 does not divide 90: the fan stops short at ±80°.
        let uneven = SensorArray::new(200.0, 40.0, 5.0);
        assert_eq!(uneven.ray_count(), 5);
        assert_eq!(uneven.ray_heading(0.0, 2), -80.0);
    }

    #[test]
    fn degenerate_visual_angle_keeps_one_ray() {
        assert_eq!(SensorArray::new(200.0, 0.0, 5.0).ray_count(), 1);
        assert_eq!(SensorArray::new(200.0, -15.0, 5.0).ray_count(), 1);
        assert_eq!(SensorArray::new(200.0, f32::NAN, 5.0).ray_count(), 1);
    }

    #[test]
    fn readings_start_empty_at_full_range() {
        let sensors = default_array();
        assert!(sensors
            .readings()
            .iter()
            .all(|r| *r == RayHit::nothing(config::VISUAL_RANGE)));
    }

    #[test]
    fn ray_aimed_at_obstacle_reports_its_distance_and_tag() {
        let mut world = World::new(1000.0, 1000.0);
        world.add_obstacle(Rect::new(400.0, 480.0, 20.0, 40.0), Tag::Block);

        let mut sensors = default_array();
        // Heading -90 faces +x; the block's left face is 100 px ahead.
        let pose = Pose::new(vec2(300.0, 500.0), -90.0);
        sensors.refresh(&pose, &world);

        let ahead = sensors.straight_ahead();
        assert_eq!(ahead.distance, 100.0);
        assert_eq!(ahead.tag, Some(Tag::Block));

        // Rays at ±90° look into open space.
        assert_eq!(*sensors.reading(-6).unwrap(), RayHit::nothing(200.0));
        assert_eq!(*sensors.reading(6).unwrap(), RayHit::nothing(200.0));
        assert!(sensors.reading(7).is_none());
        assert_eq!(sensors.nearest().tag, Some(Tag::Block));
    }

    #[test]
    fn refresh_overwrites_previous_readings() {
        let mut world = World::new(1000.0, 1000.0);
        world.add_obstacle(Rect::new(400.0, 480.0, 20.0, 40.0), Tag::Block);
        let mut sensors = default_array();

        sensors.refresh(&Pose::new(vec2(300.0, 500.0), -90.0), &world);
        assert_eq!(sensors.straight_ahead().tag, Some(Tag::Block));

        sensors.refresh(&Pose::new(vec2(300.0, 500.0), 90.0), &world);
        assert_eq!(sensors.straight_ahead(), RayHit::nothing(200.0));
        assert_eq!(sensors.readings().len(), 13);
    }

    #[test]
    fn negative_indices_look_left() {
        let mut world = World::new(1000.0, 1000.0);
        // Wall to the robot's left when facing up.
        world.add_obstacle(Rect::new(440.0, 0.0, 10.0, 1000.0), Tag::Boundary);
        let mut sensors = default_array();
        sensors.refresh(&Pose::new(vec2(500.0, 500.0), 0.0), &world);

        let left = sensors.reading(-6).unwrap();
        assert_eq!(left.tag, Some(Tag::Boundary));
        assert_eq!(left.distance, 55.0);
        assert_eq!(sensors.reading(6).unwrap().tag, None);

        let (left_open, right_open) = sensors.side_openness();
        assert!(left_open < right_open);
    }
}
