// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Particle background.
//!
//! The preferred background is the third-party particle library, configured
//! with [`ParticlesConfig::portfolio`]. With the `serde` feature the config
//! serializes to exactly the JSON shape the library expects.
//!
//! When the library or its container is missing, the page falls back to
//! [`CssParticle`]s: plain elements drifting down the hero section with
//! randomized CSS animations. Randomness is injected so the fallback is
//! deterministic under test.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::time::{Duration, HostTime};

/// Id of the element the particle library draws into.
pub const CONTAINER_ID: &str = "particles-js";
/// Number of fallback particles.
pub const FALLBACK_COUNT: usize = 50;
/// Grace period before looking for the library, so a deferred script tag
/// has loaded by then.
pub const LIBRARY_WAIT_MS: u64 = 100;

/// Which background to install.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Background {
    /// Hand the config to the particle library.
    Library,
    /// Synthesize CSS particles.
    CssFallback,
}

impl Background {
    /// The library is only used when both its container and its entry point
    /// exist.
    #[must_use]
    pub const fn choose(container_present: bool, library_present: bool) -> Self {
        if container_present && library_present {
            Self::Library
        } else {
            Self::CssFallback
        }
    }
}

/// Holds the background choice back until the library has had time to load.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LibraryWait {
    due: Option<HostTime>,
}

impl LibraryWait {
    /// Starts waiting at `now`.
    #[must_use]
    pub const fn starting(now: HostTime) -> Self {
        Self {
            due: Some(now.saturating_add(Duration::from_millis(LIBRARY_WAIT_MS))),
        }
    }

    /// Returns `true` exactly once: on the first call at or after the end of
    /// the grace period.
    pub fn take_due(&mut self, now: HostTime) -> bool {
        if self.due.is_some_and(|due| now >= due) {
            self.due = None;
            true
        } else {
            false
        }
    }

    /// Returns `true` once the background has been chosen.
    #[must_use]
    pub const fn is_done(&self) -> bool {
        self.due.is_none()
    }
}

/// Top-level particle library configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ParticlesConfig {
    /// Particle appearance and motion.
    pub particles: Particles,
    /// Pointer interaction.
    pub interactivity: Interactivity,
    /// Scale for high-density displays.
    pub retina_detect: bool,
}

/// Particle appearance and motion.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Particles {
    /// How many.
    pub number: Number,
    /// Fill colors.
    pub color: Color,
    /// Shape and outline.
    pub shape: Shape,
    /// Opacity.
    pub opacity: Animated,
    /// Radius in px.
    pub size: Animated,
    /// Links between neighbors.
    pub line_linked: LineLinked,
    /// Motion, serialized as `move`.
    #[cfg_attr(feature = "serde", serde(rename = "move"))]
    pub movement: Movement,
}

/// Particle count.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Number {
    /// Particles at the reference density.
    pub value: u32,
    /// Density scaling.
    pub density: Density,
}

/// Density scaling for [`Number`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Density {
    /// Scale the count with the canvas area.
    pub enable: bool,
    /// Canvas area holding `value` particles.
    pub value_area: u32,
}

/// Particle colors, one picked per particle.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Color {
    /// CSS hex colors.
    pub value: Vec<&'static str>,
}

/// Particle shape.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Shape {
    /// Shape name.
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: &'static str,
    /// Outline.
    pub stroke: Stroke,
}

/// Particle outline.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Stroke {
    /// Width in px.
    pub width: f64,
    /// CSS color.
    pub color: &'static str,
}

/// A randomizable, optionally animated value (opacity or size).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Animated {
    /// Base value.
    pub value: f64,
    /// Randomize per particle.
    pub random: bool,
    /// Oscillation.
    pub anim: Oscillation,
}

/// Oscillation of an [`Animated`] value.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Oscillation {
    /// Oscillate at all.
    pub enable: bool,
    /// Oscillation speed.
    pub speed: f64,
    /// Lower bound, serialized as `opacity_min` or `size_min`.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub min: OscillationMin,
    /// Oscillate all particles in phase.
    pub sync: bool,
}

/// Lower bound of an [`Oscillation`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum OscillationMin {
    /// Minimum opacity.
    #[cfg_attr(feature = "serde", serde(rename = "opacity_min"))]
    Opacity(f64),
    /// Minimum size.
    #[cfg_attr(feature = "serde", serde(rename = "size_min"))]
    Size(f64),
}

/// Lines drawn between nearby particles.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct LineLinked {
    /// Draw links.
    pub enable: bool,
    /// Maximum link length in px.
    pub distance: f64,
    /// CSS color.
    pub color: &'static str,
    /// Link opacity.
    pub opacity: f64,
    /// Link width in px.
    pub width: f64,
}

/// Particle motion.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Movement {
    /// Move at all.
    pub enable: bool,
    /// Speed.
    pub speed: f64,
    /// Drift direction.
    pub direction: &'static str,
    /// Randomize speed.
    pub random: bool,
    /// Move in straight lines.
    pub straight: bool,
    /// What happens at the canvas edge.
    pub out_mode: &'static str,
    /// Bounce off other particles.
    pub bounce: bool,
    /// Attraction between particles.
    pub attract: Attract,
}

/// Attraction between particles.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Attract {
    /// Attract at all.
    pub enable: bool,
    /// Horizontal rotation.
    #[cfg_attr(feature = "serde", serde(rename = "rotateX"))]
    pub rotate_x: f64,
    /// Vertical rotation.
    #[cfg_attr(feature = "serde", serde(rename = "rotateY"))]
    pub rotate_y: f64,
}

/// Pointer interaction.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Interactivity {
    /// Element that receives pointer events.
    pub detect_on: &'static str,
    /// Enabled interactions.
    pub events: Events,
    /// Interaction parameters.
    pub modes: Modes,
}

/// Enabled interactions.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Events {
    /// Hover interaction.
    pub onhover: Trigger,
    /// Click interaction.
    pub onclick: Trigger,
    /// Re-layout on resize.
    pub resize: bool,
}

/// An interaction and its mode.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Trigger {
    /// Enabled.
    pub enable: bool,
    /// Mode name.
    pub mode: &'static str,
}

/// Interaction parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Modes {
    /// `grab` mode.
    pub grab: Grab,
    /// `push` mode.
    pub push: ParticleCount,
    /// `remove` mode.
    pub remove: ParticleCount,
}

/// `grab` mode parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Grab {
    /// Reach in px.
    pub distance: f64,
    /// Link style while grabbing.
    pub line_linked: GrabLink,
}

/// Link style while grabbing.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct GrabLink {
    /// Link opacity.
    pub opacity: f64,
}

/// Particles added or removed per click.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ParticleCount {
    /// Count.
    pub particles_nb: u32,
}

impl ParticlesConfig {
    /// The portfolio hero background.
    #[must_use]
    pub fn portfolio() -> Self {
        Self {
            particles: Particles {
                number: Number {
                    value: 80,
                    density: Density {
                        enable: true,
                        value_area: 800,
                    },
                },
                color: Color {
                    value: alloc::vec!["#00d4ff", "#6366f1", "#667eea", "#764ba2"],
                },
                shape: Shape {
                    kind: "circle",
                    stroke: Stroke {
                        width: 0.0,
                        color: "#000000",
                    },
                },
                opacity: Animated {
                    value: 0.5,
                    random: true,
                    anim: Oscillation {
                        enable: true,
                        speed: 1.0,
                        min: OscillationMin::Opacity(0.1),
                        sync: false,
                    },
                },
                size: Animated {
                    value: 3.0,
                    random: true,
                    anim: Oscillation {
                        enable: true,
                        speed: 2.0,
                        min: OscillationMin::Size(0.1),
                        sync: false,
                    },
                },
                line_linked: LineLinked {
                    enable: true,
                    distance: 150.0,
                    color: "#00d4ff",
                    opacity: 0.2,
                    width: 1.0,
                },
                movement: Movement {
                    enable: true,
                    speed: 2.0,
                    direction: "none",
                    random: false,
                    straight: false,
                    out_mode: "out",
                    bounce: false,
                    attract: Attract {
                        enable: false,
                        rotate_x: 600.0,
                        rotate_y: 1200.0,
                    },
                },
            },
            interactivity: Interactivity {
                detect_on: "canvas",
                events: Events {
                    onhover: Trigger {
                        enable: true,
                        mode: "grab",
                    },
                    onclick: Trigger {
                        enable: true,
                        mode: "push",
                    },
                    resize: true,
                },
                modes: Modes {
                    grab: Grab {
                        distance: 140.0,
                        line_linked: GrabLink { opacity: 0.5 },
                    },
                    push: ParticleCount { particles_nb: 4 },
                    remove: ParticleCount { particles_nb: 2 },
                },
            },
            retina_detect: true,
        }
    }
}

/// Inline style of the fallback particle container.
pub const FALLBACK_CONTAINER_STYLE: &str = "position: absolute; top: 0; left: 0; \
    width: 100%; height: 100%; overflow: hidden; pointer-events: none; z-index: 1;";

/// One fallback particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CssParticle {
    /// Diameter in px, `1.0..5.0`.
    pub size: f64,
    /// Horizontal position in percent, `0.0..100.0`.
    pub left: f64,
    /// Animation delay in seconds, `0.0..5.0`.
    pub delay: f64,
    /// Animation duration in seconds, `10.0..30.0`.
    pub duration: f64,
}

impl CssParticle {
    /// Draws a particle from `random`, which yields values in `0.0..1.0`.
    pub fn generate(random: &mut impl FnMut() -> f64) -> Self {
        Self {
            size: random() * 4.0 + 1.0,
            left: random() * 100.0,
            delay: random() * 5.0,
            duration: random() * 20.0 + 10.0,
        }
    }

    /// The particle's inline style.
    #[must_use]
    pub fn style(&self) -> String {
        format!(
            "position: absolute; width: {size}px; height: {size}px; \
             background: rgba(0, 212, 255, 0.5); border-radius: 50%; left: {left}%; \
             top: -10px; animation: float {duration}s linear {delay}s infinite; \
             box-shadow: 0 0 {glow}px rgba(0, 212, 255, 0.5);",
            size = self.size,
            left = self.left,
            duration = self.duration,
            delay = self.delay,
            glow = self.size * 2.0,
        )
    }
}

/// Draws `count` fallback particles.
pub fn css_particles(count: usize, mut random: impl FnMut() -> f64) -> Vec<CssParticle> {
    (0..count).map(|_| CssParticle::generate(&mut random)).collect()
}

/// The fallback keyframes, with a horizontal drift of `drift` px
/// (`-50.0..50.0`).
#[must_use]
pub fn fallback_keyframes(drift: f64) -> String {
    format!(
        "@keyframes floatParticle {{ \
           0% {{ transform: translateY(0) translateX(0); opacity: 0; }} \
           10% {{ opacity: 1; }} \
           90% {{ opacity: 1; }} \
           100% {{ transform: translateY(100vh) translateX({drift}px); opacity: 0; }} \
         }} \
         .particle {{ animation-name: floatParticle !important; }}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn library_needs_container_and_entry_point() {
        assert_eq!(Background::choose(true, true), Background::Library);
        assert_eq!(Background::choose(true, false), Background::CssFallback);
        assert_eq!(Background::choose(false, true), Background::CssFallback);
    }

    #[test]
    fn library_lookup_waits_once() {
        let mut wait = LibraryWait::starting(HostTime::from_millis(40));
        assert!(!wait.take_due(HostTime::from_millis(40)));
        assert!(!wait.take_due(HostTime::from_millis(139)));
        assert!(wait.take_due(HostTime::from_millis(140)));
        assert!(wait.is_done());
        assert!(!wait.take_due(HostTime::from_millis(500)));
    }

    #[test]
    fn fallback_particles_stay_in_range() {
        let mut seed = 0_u32;
        // Small LCG; good enough to sweep the unit interval.
        let random = move || {
            seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            f64::from(seed >> 8) / f64::from(1_u32 << 24)
        };
        let particles = css_particles(FALLBACK_COUNT, random);
        assert_eq!(particles.len(), 50);
        for p in &particles {
            assert!((1.0..5.0).contains(&p.size));
            assert!((0.0..100.0).contains(&p.left));
            assert!((0.0..5.0).contains(&p.delay));
            assert!((10.0..30.0).contains(&p.duration));
        }
    }

    #[test]
    fn particle_style_uses_generated_values() {
        let mut values = [0.5, 0.25, 0.0, 0.5].into_iter();
        let p = CssParticle::generate(&mut || values.next().unwrap_or(0.0));
        assert_eq!(
            p,
            CssParticle {
                size: 3.0,
                left: 25.0,
                delay: 0.0,
                duration: 20.0
            }
        );
        let style = p.style();
        assert!(style.contains("width: 3px"));
        assert!(style.contains("left: 25%"));
        assert!(style.contains("animation: float 20s linear 0s infinite"));
        assert!(style.contains("0 0 6px"));
    }

    #[test]
    fn portfolio_config_values() {
        let config = ParticlesConfig::portfolio();
        assert_eq!(config.particles.number.value, 80);
        assert_eq!(config.particles.color.value.len(), 4);
        assert_eq!(config.interactivity.modes.grab.distance, 140.0);
        assert_eq!(config.interactivity.modes.push.particles_nb, 4);
    }
}
