//! Surface-constrained body integrator.
//!
//! Steps a body along an analytic height field with semi-implicit Euler.
//! Each tick is split into substeps; per substep the body is classified
//! against a narrow contact band around the surface:
//!
//! - inside the band: gravity is projected onto the tangent plane, lateral
//!   velocity is damped, and the body is kept from leaving the strip
//! - penetrating: the lowest point snaps back to the surface and the
//!   into-surface velocity component is removed
//! - otherwise: plain vertical gravity (a `z` outside the profile's span is
//!   the airborne signal, not an error)

use nalgebra::Vector3;
use ramp_collision::CollisionProxy;
use ramp_mesh::HeightProfile;

use crate::body::DynamicBody;
use crate::config::SimulationConfig;

/// Borrowed view of an analytic (height-field) collision proxy.
#[derive(Debug, Clone, Copy)]
pub struct AnalyticSurface<'a> {
    /// Height function `z -> y`.
    pub profile: &'a HeightProfile,
    /// Lateral center of the strip.
    pub center_x: f64,
    /// Half the strip width.
    pub half_width: f64,
}

impl<'a> AnalyticSurface<'a> {
    /// View an analytic proxy; `None` for trimesh proxies.
    #[must_use]
    pub fn from_proxy(proxy: &'a CollisionProxy) -> Option<Self> {
        match proxy {
            CollisionProxy::HeightField {
                profile,
                center_x,
                half_width,
            } => Some(Self {
                profile,
                center_x: *center_x,
                half_width: *half_width,
            }),
            CollisionProxy::Trimesh { .. } => None,
        }
    }

    /// Whether a lateral position is over the strip.
    #[must_use]
    pub fn covers_x(&self, x: f64) -> bool {
        (x - self.center_x).abs() <= self.half_width
    }

    /// Whether a point is over the strip in both axes.
    #[must_use]
    pub fn covers(&self, x: f64, z: f64) -> bool {
        self.covers_x(x) && self.profile.contains_z(z)
    }
}

/// Contact classification after the last substep of a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactState {
    /// Not touching the surface; vertical gravity applies.
    Airborne,
    /// Within the contact band, sliding along the tangent plane.
    Sliding,
    /// Snapped onto the surface this substep.
    Resting,
}

/// Advance a body one tick against an analytic surface.
///
/// Returns the contact state after the final substep. Deterministic:
/// identical inputs always produce identical states.
pub fn step_on_surface(
    body: &mut DynamicBody,
    surface: &AnalyticSurface<'_>,
    config: &SimulationConfig,
) -> ContactState {
    let h = config.substep();
    let mut state = ContactState::Airborne;

    for _ in 0..config.substeps {
        state = substep(body, surface, config, h);
    }
    state
}

fn substep(
    body: &mut DynamicBody,
    surface: &AnalyticSurface<'_>,
    config: &SimulationConfig,
    h: f64,
) -> ContactState {
    let z = body.position.z;
    let over_strip = surface.covers(body.position.x, z);

    let mut state = ContactState::Airborne;
    if over_strip {
        let y_surface = surface.profile.height(z);
        let slope = surface.profile.slope(z);
        let normal = Vector3::new(0.0, 1.0, -slope).normalize();
        let lower = body.lower_extent();

        let in_band = lower <= y_surface + config.contact_band_above
            && lower >= y_surface - config.contact_band_below;
        if in_band {
            let gravity = Vector3::new(0.0, -config.gravity, 0.0);
            let tangential = gravity - normal * gravity.dot(&normal);
            body.velocity += tangential * h;
            body.velocity.x *= config.lateral_damping;
            state = ContactState::Sliding;

            if lower <= y_surface + config.rest_offset {
                body.position.y = y_surface + config.rest_offset + body.shape.lower_offset();
                let into_surface = body.velocity.dot(&normal);
                if into_surface < 0.0 {
                    body.velocity -= normal * into_surface;
                }
                state = ContactState::Resting;
            }
        }
    }

    if state == ContactState::Airborne {
        body.velocity.y -= config.gravity * h;
    }

    body.position += body.velocity * h;

    // Keep a contacting body on the strip: clamp to the edge exactly and
    // zero the outward drift.
    if state != ContactState::Airborne {
        let dx = body.position.x - surface.center_x;
        if dx.abs() > surface.half_width {
            body.position.x = surface.center_x + dx.signum() * surface.half_width;
            body.velocity.x = 0.0;
        }
    }
    state
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    use crate::body::{BodyId, BodyShape};

    fn surface(profile: &HeightProfile) -> AnalyticSurface<'_> {
        AnalyticSurface {
            profile,
            center_x: 0.0,
            half_width: 2.0,
        }
    }

    fn resting_sphere(profile: &HeightProfile, z: f64) -> DynamicBody {
        let y = profile.height(z) + 0.01 + 0.5;
        DynamicBody::new(
            BodyId(1),
            BodyShape::Sphere { radius: 0.5 },
            Point3::new(0.0, y, z),
        )
    }

    #[test]
    fn descends_and_gains_speed_on_an_incline() {
        let profile = HeightProfile::linear(5.0, 2.0, -5.0, -4.0);
        let surface = surface(&profile);
        let config = SimulationConfig::realtime();
        let mut body = resting_sphere(&profile, 4.0);

        let mut last_z = body.position.z;
        let mut last_speed = body.velocity.norm();
        for _ in 0..30 {
            let state = step_on_surface(&mut body, &surface, &config);
            assert_ne!(state, ContactState::Airborne);
            assert!(body.position.z < last_z, "must descend toward -z");
            let speed = body.velocity.norm();
            assert!(speed > last_speed, "must accelerate while sliding");
            last_z = body.position.z;
            last_speed = speed;
        }
    }

    #[test]
    fn stays_within_the_contact_band() {
        let profile = HeightProfile::tanh(5.0, 2.0, -5.0, -4.0);
        let surface = surface(&profile);
        let config = SimulationConfig::realtime();
        let mut body = resting_sphere(&profile, 4.5);

        for _ in 0..120 {
            step_on_surface(&mut body, &surface, &config);
            if !surface.covers(body.position.x, body.position.z) {
                break;
            }
            let y_surface = profile.height(body.position.z);
            assert!(
                body.lower_extent() >= y_surface - config.contact_band_below - 1e-9,
                "must not sink through the surface"
            );
        }
    }

    #[test]
    fn airborne_body_free_falls() {
        let profile = HeightProfile::linear(5.0, 2.0, -5.0, -4.0);
        let surface = surface(&profile);
        let config = SimulationConfig::realtime();
        // Well above the band.
        let mut body = DynamicBody::new(
            BodyId(1),
            BodyShape::Sphere { radius: 0.5 },
            Point3::new(0.0, 10.0, 0.0),
        );
        let state = step_on_surface(&mut body, &surface, &config);
        assert_eq!(state, ContactState::Airborne);
        assert_relative_eq!(
            body.velocity.y,
            -config.gravity * config.timestep,
            epsilon = 1e-9
        );
    }

    #[test]
    fn out_of_domain_is_airborne_not_an_error() {
        let profile = HeightProfile::linear(5.0, 2.0, -5.0, -4.0);
        let surface = surface(&profile);
        let config = SimulationConfig::realtime();
        let mut body = resting_sphere(&profile, 4.0);
        body.position.z = 20.0;
        assert_eq!(
            step_on_surface(&mut body, &surface, &config),
            ContactState::Airborne
        );
    }

    #[test]
    fn lateral_drift_is_clamped_to_the_edge() {
        let profile = HeightProfile::linear(5.0, 2.0, -5.0, -4.0);
        let surface = surface(&profile);
        let config = SimulationConfig::realtime();
        let mut body = resting_sphere(&profile, 4.0);
        body.position.x = 1.95;
        body.velocity.x = 50.0;

        step_on_surface(&mut body, &surface, &config);
        assert_relative_eq!(body.position.x, 2.0);
        assert_relative_eq!(body.velocity.x, 0.0);
    }

    #[test]
    fn penetration_snaps_back_to_the_surface() {
        let profile = HeightProfile::linear(5.0, 2.0, -5.0, -4.0);
        let surface = surface(&profile);
        let config = SimulationConfig::realtime();
        let mut body = resting_sphere(&profile, 4.0);
        body.position.y -= 0.08;
        body.velocity.y = -1.0;

        let state = step_on_surface(&mut body, &surface, &config);
        assert_eq!(state, ContactState::Resting);
        let y_surface = profile.height(body.position.z);
        assert!(body.lower_extent() >= y_surface - 1e-9);
    }

    #[test]
    fn determinism() {
        let profile = HeightProfile::wave(5.0, 2.0, -5.0, -4.0);
        let surface = surface(&profile);
        let config = SimulationConfig::realtime();
        let mut a = resting_sphere(&profile, 4.0);
        let mut b = a.clone();
        for _ in 0..60 {
            step_on_surface(&mut a, &surface, &config);
            step_on_surface(&mut b, &surface, &config);
        }
        assert_eq!(a, b);
    }
}
