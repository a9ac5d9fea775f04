use crate::color::Rgb;
use crate::config::FieldConfig;
use crate::math::{distance, group_rotation};
use crate::particle::Particle;
use crate::render::{Camera, Canvas};
use crate::transition::{ColorPair, ColorTransition};
use log::{debug, info};
use rand::Rng;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

/// Receiver of color-change requests
pub trait ColorSink {
    /// Animates particles to `particle` and edges to `edge` (or `particle`
    /// when absent) over `duration`
    fn change_color(&self, particle: Rgb, edge: Option<Rgb>, duration: Duration);
}

#[derive(Debug, Clone, Copy)]
struct ColorCommand {
    particle: Rgb,
    edge: Option<Rgb>,
    duration: Duration,
    issued: Instant,
}

/// Cloneable handle for sending color commands to a [`ParticleField`]
#[derive(Debug, Clone)]
pub struct ColorHandle {
    tx: Sender<ColorCommand>,
}

impl ColorSink for ColorHandle {
    fn change_color(&self, particle: Rgb, edge: Option<Rgb>, duration: Duration) {
        let command = ColorCommand {
            particle,
            edge,
            duration,
            issued: Instant::now(),
        };
        if self.tx.send(command).is_err() {
            debug!("Particle field is gone, dropping color change to {}", particle);
        }
    }
}

/// The animated particle field behind every screen. Other parts of the
/// program change its colors only through a [`ColorHandle`], whose commands
/// are applied at the start of the next frame.
pub struct ParticleField {
    config: FieldConfig,
    particles: Vec<Particle>,
    /// Endpoints of every connection of the current frame, six floats per edge
    edges: Vec<f64>,
    /// Group rotation around X and Y
    angle: [f64; 2],
    colors: ColorTransition,
    commands: Receiver<ColorCommand>,
    sender: Sender<ColorCommand>,
    camera: Camera,
    paused: bool,
    frames: u64,
}

impl ParticleField {
    /// Builds a field for a `cols` x `rows` viewport and the handle that
    /// drives its colors
    pub fn new<R: Rng + ?Sized>(
        config: FieldConfig,
        viewport: (u16, u16),
        rng: &mut R,
    ) -> (Self, ColorHandle) {
        let (sender, commands) = mpsc::channel();
        let colors = ColorTransition::new(ColorPair::new(
            config.particle_color,
            config.connection_color,
        ));
        let mut field = ParticleField {
            config: config.clone(),
            particles: Vec::new(),
            edges: Vec::new(),
            angle: [0.0, 0.0],
            colors,
            commands,
            sender,
            camera: Camera::new(viewport.0, viewport.1),
            paused: false,
            frames: 0,
        };
        field.rebuild(config, rng);
        let handle = field.handle();
        (field, handle)
    }

    /// Another handle to this field's color commands
    pub fn handle(&self) -> ColorHandle {
        ColorHandle {
            tx: self.sender.clone(),
        }
    }

    /// Starts over with a new configuration. Particles, edges and rotation
    /// are rebuilt from scratch; colors and outstanding handles carry over.
    pub fn rebuild<R: Rng + ?Sized>(&mut self, config: FieldConfig, rng: &mut R) {
        let bounds = config.bounds();
        self.particles = (0..config.particle_count)
            .map(|_| Particle::random(rng, bounds, config.particle_speed))
            .collect();
        info!(
            "Particle field built: {} particles, connections {}",
            self.particles.len(),
            if config.show_connections { "on" } else { "off" }
        );
        self.config = config;
        self.angle = [0.0, 0.0];
        self.frames = 0;
        self.update_connections();
    }

    /// Advances one frame: pending color commands, motion, connections and
    /// the color animation
    pub fn step(&mut self, now: Instant) {
        self.apply_commands();
        if !self.paused {
            self.angle[0] += self.config.rotation_speed;
            self.angle[1] += self.config.rotation_speed * 0.5;
            let bounds = self.config.bounds();
            for particle in &mut self.particles {
                particle.step(bounds);
            }
            self.update_connections();
        }
        self.colors.advance(now);
        self.frames += 1;
    }

    fn apply_commands(&mut self) {
        while let Ok(command) = self.commands.try_recv() {
            debug!(
                "Color change to {} over {:?}",
                command.particle, command.duration
            );
            self.colors
                .start(command.particle, command.edge, command.duration, command.issued);
        }
    }

    fn update_connections(&mut self) {
        if self.config.show_connections {
            collect_connections(&self.particles, self.config.connection_distance, &mut self.edges);
        } else {
            self.edges.clear();
        }
    }

    /// Updates the projection for a new viewport size
    pub fn resize(&mut self, cols: u16, rows: u16) {
        debug!("Viewport resized to {}x{}", cols, rows);
        self.camera.resize(cols, rows);
    }

    /// Draws edges, then particles, into `canvas`
    pub fn render(&self, canvas: &mut Canvas) {
        let colors = self.colors.displayed();
        let background = canvas.background();
        let rotation = group_rotation(self.angle[0], self.angle[1]);

        if self.config.show_connections {
            let edge_color = colors.edge.over(background, self.config.connection_opacity);
            for edge in self.edges.chunks_exact(6) {
                let a = self.camera.project(&rotation, [edge[0], edge[1], edge[2]]);
                let b = self.camera.project(&rotation, [edge[3], edge[4], edge[5]]);
                if let (Some(a), Some(b)) = (a, b) {
                    canvas.draw_line(a.screen, b.screen, '·', edge_color);
                }
            }
        }

        let particle_color = colors.particle.over(background, self.config.particle_opacity);
        for particle in &self.particles {
            if let Some(p) = self.camera.project(&rotation, particle.position) {
                let radius = self.camera.projected_radius(self.config.particle_size, p.depth);
                canvas.plot(p.screen, p.depth, particle_glyph(radius), particle_color);
            }
        }
    }

    /// Releases the particle and edge buffers. Handles still alive after
    /// this only drop their commands.
    pub fn teardown(self) {
        info!(
            "Particle field torn down after {} frames ({} particles, {} edges)",
            self.frames,
            self.particles.len(),
            self.edge_count()
        );
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    #[cfg(test)]
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len() / 6
    }

    pub fn angle(&self) -> [f64; 2] {
        self.angle
    }

    pub fn colors(&self) -> ColorPair {
        self.colors.displayed()
    }

    /// True while a color transition is in flight
    pub fn is_fading(&self) -> bool {
        self.colors.is_animating()
    }
}

/// Writes the endpoints of every particle pair closer than `max_distance`
/// into `out`, replacing its contents. Checks all pairs, so this is meant for
/// a few hundred particles at most.
pub fn collect_connections(particles: &[Particle], max_distance: f64, out: &mut Vec<f64>) {
    out.clear();
    for (i, a) in particles.iter().enumerate() {
        for b in &particles[i + 1..] {
            if distance(&a.position, &b.position) < max_distance {
                out.extend_from_slice(&a.position);
                out.extend_from_slice(&b.position);
            }
        }
    }
}

/// Glyph for a particle covering `radius` terminal rows
fn particle_glyph(radius: f64) -> char {
    if radius >= 0.5 {
        '●'
    } else if radius >= 0.25 {
        '•'
    } else if radius >= 0.1 {
        '∙'
    } else {
        '.'
    }
}
