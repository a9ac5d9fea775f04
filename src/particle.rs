use rand::Rng;

/// A point of the particle field with its per-frame velocity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: [f64; 3],
    pub velocity: [f64; 3],
}

impl Particle {
    /// Random position inside `±bounds` and a random velocity in `±speed / 2` per axis
    pub fn random<R: Rng + ?Sized>(rng: &mut R, bounds: [f64; 3], speed: f64) -> Self {
        let mut position = [0.0; 3];
        let mut velocity = [0.0; 3];
        for axis in 0..3 {
            position[axis] = if bounds[axis] > 0.0 {
                rng.gen_range(-bounds[axis]..=bounds[axis])
            } else {
                0.0
            };
            velocity[axis] = (rng.gen::<f64>() - 0.5) * speed;
        }
        Particle { position, velocity }
    }

    /// Moves by one frame of velocity, then flips the velocity on every axis
    /// whose coordinate lies outside `±bounds`
    pub fn step(&mut self, bounds: [f64; 3]) {
        for axis in 0..3 {
            self.position[axis] += self.velocity[axis];
            if self.position[axis].abs() > bounds[axis] {
                self.velocity[axis] = -self.velocity[axis];
            }
        }
    }
}
