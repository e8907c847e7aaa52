/// Configuration handed to the external confetti capability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfettiConfig {
    pub particle_count: u32,
    pub spread: f32,
    pub origin: Origin,
}

/// Launch origin in normalized window coordinates, both axes in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Origin {
    pub x: f32,
    pub y: f32,
}

/// The one configuration the celebrate button fires with.
pub const BURST: ConfettiConfig = ConfettiConfig {
    particle_count: 150,
    spread: 70.0,
    origin: Origin { x: 0.5, y: 0.6 },
};

/// Boundary to the confetti renderer. The rendering itself is an external
/// collaborator; the app only delegates a launch with a fixed config.
pub trait Launcher: Send {
    fn launch(&self, config: &ConfettiConfig);
}

/// Default launcher used until a renderer is plugged in: reports the launch.
#[derive(Debug, Default)]
pub struct LogLauncher;

impl Launcher for LogLauncher {
    fn launch(&self, config: &ConfettiConfig) {
        tracing::info!(
            particles = config.particle_count,
            spread = config.spread,
            origin_x = config.origin.x,
            origin_y = config.origin.y,
            "confetti launched"
        );
    }
}
