//! The simulation world: platforms, ramps, bodies and the tick loop.

use nalgebra::{Isometry3, Point3, Translation3, UnitQuaternion, Vector3};
use ramp_collision::CollisionProxy;
use ramp_mesh::{generate, Aabb, SurfaceMesh};
use ramp_types::{LaneSet, RampKind, RampSpec};
use tracing::{debug, info, warn};

use crate::body::{BodyId, BodyShape, DynamicBody};
use crate::config::SimulationConfig;
use crate::error::{SimError, SimResult};
use crate::input::{InputSnapshot, SpawnPlatform, NUDGE_STEP};
use crate::integrator::{step_on_surface, AnalyticSurface};
use crate::race::{FinishLine, RaceTracker};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Stable identifier for a ramp within one world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RampId(pub u64);

impl std::fmt::Display for RampId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ramp#{}", self.0)
    }
}

/// Who moves a body while it is over a given ramp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MotionStrategy {
    /// The surface-constrained integrator steps the body.
    Analytic,
    /// An external collision engine owns the body and reports poses back
    /// through [`SimulationWorld::set_body_state`].
    External,
}

/// A static spawn/landing slab.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Platform {
    /// Slab center.
    pub center: Point3<f64>,
    /// Half-extents along the world axes.
    pub half_extents: Vector3<f64>,
}

impl Platform {
    /// The upper platform bodies spawn on.
    #[must_use]
    pub fn top() -> Self {
        Self {
            center: Point3::new(0.0, 0.1, 7.8),
            half_extents: Vector3::new(6.0, 0.1, 6.0),
        }
    }

    /// The lower platform bodies land on; the finish line sits at its center.
    #[must_use]
    pub fn bottom() -> Self {
        Self {
            center: Point3::new(0.0, -2.1, -7.8),
            half_extents: Vector3::new(6.0, 0.1, 6.0),
        }
    }

    /// Height of the walkable top face.
    #[must_use]
    pub fn surface_y(&self) -> f64 {
        self.center.y + self.half_extents.y
    }

    /// Whether an `(x, z)` position is over the slab.
    #[must_use]
    pub fn covers_xz(&self, x: f64, z: f64) -> bool {
        (x - self.center.x).abs() <= self.half_extents.x
            && (z - self.center.z).abs() <= self.half_extents.z
    }
}

/// One installed ramp: spec, render mesh, collision proxy and strategy.
///
/// All four are rebuilt together; the proxy can never outlive or lag the
/// mesh it was derived from.
#[derive(Debug, Clone)]
pub struct RampInstance {
    /// World-unique identifier.
    pub id: RampId,
    /// The parameters everything else derives from.
    pub spec: RampSpec,
    /// Render buffers.
    pub mesh: SurfaceMesh,
    /// Collidable representation.
    pub proxy: CollisionProxy,
    /// Who integrates bodies over this ramp.
    pub strategy: MotionStrategy,
    /// Cached mesh bounds, used to route bodies to the external engine.
    pub bounds: Aabb,
}

/// The preset ramp bridging the two platforms at a lane offset.
///
/// Matches the interactive scene: the strip leaves the top platform at its
/// surface height and meets the bottom platform at its surface height.
/// Spirals wind around the lane centerline instead.
#[must_use]
pub fn preset_spec(kind: RampKind, lane_offset: f64) -> RampSpec {
    let x = lane_offset;
    let top_y = Platform::top().surface_y();
    let bottom_y = Platform::bottom().surface_y();
    let start = Point3::new(x, top_y, 5.0);
    let end = Point3::new(x, bottom_y, -5.0);
    match kind {
        RampKind::Straight => RampSpec::straight(start, end, 4.0, 0.3, 1),
        RampKind::Curved => RampSpec::curved(start, end, 4.0, 0.3, 32),
        RampKind::Wave => RampSpec::wave(start, end, 1.2, 0.3, 32),
        RampKind::Spiral => RampSpec::spiral(
            Point3::new(x, top_y, 6.0),
            Point3::new(x, bottom_y, -7.8),
            Point3::new(x, 0.0, 0.0),
            2.5,
            2.0,
            0.3,
            96,
        ),
    }
}

/// Everything one simulation owns.
///
/// All mutation flows through `&mut self`; a tick is a pure function of the
/// world state and one [`InputSnapshot`]. Within a tick the order is fixed:
/// input (construction) happens-before integration happens-before transform
/// sync happens-before finish checks.
#[derive(Debug)]
pub struct SimulationWorld {
    config: SimulationConfig,
    lanes: LaneSet,
    platforms: [Platform; 2],
    ramps: Vec<RampInstance>,
    bodies: Vec<DynamicBody>,
    tracker: RaceTracker,
    transforms: Vec<(BodyId, Isometry3<f64>)>,
    held: Option<BodyId>,
    next_ramp: u64,
    next_body: u64,
    tick_count: u64,
    time: f64,
}

impl SimulationWorld {
    /// Create a world with the default lanes and platforms.
    ///
    /// # Errors
    ///
    /// Returns config validation errors.
    pub fn new(config: SimulationConfig) -> SimResult<Self> {
        config.validate()?;
        let platforms = [Platform::top(), Platform::bottom()];
        let finish = FinishLine {
            z: platforms[1].center.z,
            half_width: platforms[1].half_extents.x,
        };
        let lanes = LaneSet::default();
        Ok(Self {
            config,
            tracker: RaceTracker::new(finish, lanes.clone()),
            lanes,
            platforms,
            ramps: Vec::new(),
            bodies: Vec::new(),
            transforms: Vec::new(),
            held: None,
            next_ramp: 1,
            next_body: 1,
            tick_count: 0,
            time: 0.0,
        })
    }

    /// Install a ramp: validate, generate the mesh, build the proxy, store.
    ///
    /// # Errors
    ///
    /// Surfaces generation and proxy errors; the world is unchanged on
    /// failure.
    pub fn add_ramp(&mut self, spec: RampSpec) -> SimResult<RampId> {
        let mesh = generate(&spec)?;
        let proxy = ramp_collision::build(&spec, &mesh)?;
        let strategy = if proxy.is_analytic() {
            MotionStrategy::Analytic
        } else {
            MotionStrategy::External
        };
        let id = RampId(self.next_ramp);
        self.next_ramp += 1;
        let bounds = mesh.bounds();
        info!(%id, kind = %spec.kind, ?strategy, "installed ramp");
        self.ramps.push(RampInstance {
            id,
            spec,
            mesh,
            proxy,
            strategy,
            bounds,
        });
        Ok(id)
    }

    /// Remove a ramp, retracting its proxy before the next integration.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::UnknownRamp`] if no such ramp is installed.
    pub fn remove_ramp(&mut self, id: RampId) -> SimResult<()> {
        let index = self
            .ramps
            .iter()
            .position(|r| r.id == id)
            .ok_or(SimError::UnknownRamp(id))?;
        self.ramps.remove(index);
        debug!(%id, "retracted ramp");
        Ok(())
    }

    /// Spawn a held body resting on a platform at a lane centerline.
    ///
    /// The body stays pinned (and nudgeable) until the next release.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::UnknownLane`] for an unconfigured lane label.
    pub fn spawn_body(
        &mut self,
        shape: BodyShape,
        lane: &str,
        platform: SpawnPlatform,
    ) -> SimResult<BodyId> {
        let lane = self
            .lanes
            .by_label(lane)
            .ok_or_else(|| SimError::UnknownLane(lane.to_string()))?
            .clone();
        let slab = match platform {
            SpawnPlatform::Top => self.platforms[0],
            SpawnPlatform::Bottom => self.platforms[1],
        };
        let id = BodyId(self.next_body);
        self.next_body += 1;
        let position = Point3::new(
            lane.offset,
            slab.surface_y() + shape.lower_offset(),
            slab.center.z,
        );
        let mut body = DynamicBody::new(id, shape, position);
        body.lane = Some(lane.label.clone());
        info!(%id, lane = %lane.label, ?platform, "spawned body");
        self.bodies.push(body);
        self.tracker.track(id);
        self.held = Some(id);
        Ok(id)
    }

    /// Release every held body and start the race clock.
    pub fn release(&mut self) {
        for body in &mut self.bodies {
            body.released = true;
        }
        self.tracker.release(self.time);
        self.held = None;
    }

    /// Drop all bodies and race records. Installed ramps survive.
    pub fn reset(&mut self) {
        info!(bodies = self.bodies.len(), "reset");
        self.bodies.clear();
        self.transforms.clear();
        self.tracker.reset();
        self.held = None;
    }

    /// Overwrite a body's pose, as reported by the external collision engine.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::UnknownBody`] for an unknown id and
    /// [`SimError::NonFiniteState`] for NaN or infinite components; the body
    /// is unchanged in the latter case.
    pub fn set_body_state(
        &mut self,
        id: BodyId,
        position: Point3<f64>,
        velocity: Vector3<f64>,
    ) -> SimResult<()> {
        if !position.coords.iter().all(|c| c.is_finite())
            || !velocity.iter().all(|c| c.is_finite())
        {
            return Err(SimError::NonFiniteState(id));
        }
        let body = self
            .bodies
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(SimError::UnknownBody(id))?;
        body.position = position;
        body.velocity = velocity;
        Ok(())
    }

    /// Advance the world one tick.
    ///
    /// # Errors
    ///
    /// Propagates spawn and ramp-construction failures; the integration
    /// phases themselves never fail.
    pub fn tick(&mut self, input: &InputSnapshot) -> SimResult<()> {
        if input.reset {
            self.reset();
        }
        if input.add_ramp {
            let offset = self
                .lanes
                .by_label(&input.lane)
                .ok_or_else(|| SimError::UnknownLane(input.lane.clone()))?
                .offset;
            self.add_ramp(preset_spec(input.ramp_kind, offset))?;
        }
        if input.spawn {
            self.spawn_body(input.shape, &input.lane, input.spawn_platform)?;
        }
        self.nudge_held(input);
        if input.release {
            self.release();
        }

        self.integrate();
        self.sync_transforms();
        for body in &self.bodies {
            if body.released {
                self.tracker.check_finish(body.id, &body.position, self.time);
            }
        }

        self.time += self.config.timestep;
        self.tick_count += 1;
        Ok(())
    }

    /// Move the most recently spawned, still-held body by [`NUDGE_STEP`].
    fn nudge_held(&mut self, input: &InputSnapshot) {
        let Some(id) = self.held else { return };
        let Some(body) = self.bodies.iter_mut().find(|b| b.id == id && !b.released) else {
            return;
        };
        if input.nudge_forward {
            body.position.z -= NUDGE_STEP;
        }
        if input.nudge_back {
            body.position.z += NUDGE_STEP;
        }
        if input.nudge_left {
            body.position.x -= NUDGE_STEP;
        }
        if input.nudge_right {
            body.position.x += NUDGE_STEP;
        }
        body.velocity = Vector3::zeros();
    }

    fn integrate(&mut self) {
        // Diverged bodies are removed before anything references them.
        let mut diverged = Vec::new();
        self.bodies.retain(|body| {
            if body.is_finite() {
                true
            } else {
                warn!(id = %body.id, "removing diverged body");
                diverged.push(body.id);
                false
            }
        });
        for id in diverged {
            self.tracker.untrack(id);
        }

        let ramps = &self.ramps;
        let platforms = &self.platforms;
        let config = &self.config;
        for body in &mut self.bodies {
            if !body.released {
                continue;
            }
            let analytic = ramps.iter().find_map(|ramp| {
                AnalyticSurface::from_proxy(&ramp.proxy)
                    .filter(|s| s.covers(body.position.x, body.position.z))
            });
            if let Some(surface) = analytic {
                step_on_surface(body, &surface, config);
            } else if over_external_ramp(ramps, body) {
                // The external collision engine owns this body; its pose
                // arrives through set_body_state.
            } else {
                fall_onto_platforms(body, platforms, config);
            }
        }
    }

    fn sync_transforms(&mut self) {
        self.transforms.clear();
        self.transforms.extend(self.bodies.iter().map(|body| {
            (
                body.id,
                Isometry3::from_parts(
                    Translation3::from(body.position.coords),
                    UnitQuaternion::identity(),
                ),
            )
        }));
    }

    /// Per-body isometries for the rendering collaborator, refreshed by the
    /// last tick.
    #[must_use]
    pub fn render_transforms(&self) -> &[(BodyId, Isometry3<f64>)] {
        &self.transforms
    }

    /// Installed ramps.
    #[must_use]
    pub fn ramps(&self) -> &[RampInstance] {
        &self.ramps
    }

    /// Look up one ramp.
    #[must_use]
    pub fn ramp(&self, id: RampId) -> Option<&RampInstance> {
        self.ramps.iter().find(|r| r.id == id)
    }

    /// Live bodies.
    #[must_use]
    pub fn bodies(&self) -> &[DynamicBody] {
        &self.bodies
    }

    /// Look up one body.
    #[must_use]
    pub fn body(&self, id: BodyId) -> Option<&DynamicBody> {
        self.bodies.iter().find(|b| b.id == id)
    }

    /// Race state and records.
    #[must_use]
    pub fn tracker(&self) -> &RaceTracker {
        &self.tracker
    }

    /// The configured lanes.
    #[must_use]
    pub fn lanes(&self) -> &LaneSet {
        &self.lanes
    }

    /// Ticks advanced so far.
    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Simulated seconds elapsed.
    #[must_use]
    pub fn time(&self) -> f64 {
        self.time
    }
}

fn over_external_ramp(ramps: &[RampInstance], body: &DynamicBody) -> bool {
    ramps.iter().any(|ramp| {
        ramp.strategy == MotionStrategy::External
            && body.position.x >= ramp.bounds.min.x
            && body.position.x <= ramp.bounds.max.x
            && body.position.z >= ramp.bounds.min.z
            && body.position.z <= ramp.bounds.max.z
    })
}

/// Freefall with platform rest: vertical gravity, snapping onto whichever
/// slab the body is over.
fn fall_onto_platforms(body: &mut DynamicBody, platforms: &[Platform], config: &SimulationConfig) {
    let h = config.substep();
    for _ in 0..config.substeps {
        body.velocity.y -= config.gravity * h;
        body.position += body.velocity * h;
        for slab in platforms {
            if !slab.covers_xz(body.position.x, body.position.z) {
                continue;
            }
            let floor = slab.surface_y();
            if body.lower_extent() <= floor + config.rest_offset && body.velocity.y <= 0.0 {
                body.position.y = floor + config.rest_offset + body.shape.lower_offset();
                body.velocity.y = 0.0;
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn world() -> SimulationWorld {
        SimulationWorld::new(SimulationConfig::realtime()).unwrap()
    }

    fn nudge_forward() -> InputSnapshot {
        InputSnapshot {
            nudge_forward: true,
            ..InputSnapshot::idle()
        }
    }

    #[test]
    fn add_ramp_failure_leaves_world_unchanged() {
        let mut w = world();
        let mut spec = preset_spec(RampKind::Straight, 0.0);
        spec.width = 0.0;
        assert!(w.add_ramp(spec).is_err());
        assert!(w.ramps().is_empty());
    }

    #[test]
    fn ramp_strategy_follows_the_proxy() {
        let mut w = world();
        let curved = w.add_ramp(preset_spec(RampKind::Curved, 0.0)).unwrap();
        let wave = w.add_ramp(preset_spec(RampKind::Wave, 4.0)).unwrap();
        assert_eq!(w.ramp(curved).unwrap().strategy, MotionStrategy::Analytic);
        assert_eq!(w.ramp(wave).unwrap().strategy, MotionStrategy::External);
    }

    #[test]
    fn remove_ramp_retracts_the_proxy() {
        let mut w = world();
        let id = w.add_ramp(preset_spec(RampKind::Straight, 0.0)).unwrap();
        w.remove_ramp(id).unwrap();
        assert!(w.ramps().is_empty());
        assert_eq!(w.remove_ramp(id), Err(SimError::UnknownRamp(id)));
    }

    #[test]
    fn spawned_body_rests_on_the_platform() {
        let mut w = world();
        let id = w
            .spawn_body(BodyShape::Sphere { radius: 0.5 }, "left", SpawnPlatform::Top)
            .unwrap();
        let body = w.body(id).unwrap();
        assert_relative_eq!(body.position.x, -4.0);
        assert_relative_eq!(body.position.y, 0.2 + 0.5);
        assert_relative_eq!(body.position.z, 7.8);
        assert!(!body.released);
    }

    #[test]
    fn unknown_lane_is_rejected() {
        let mut w = world();
        assert!(matches!(
            w.spawn_body(BodyShape::default(), "outer", SpawnPlatform::Top),
            Err(SimError::UnknownLane(_))
        ));
    }

    #[test]
    fn held_body_ignores_gravity_until_release() {
        let mut w = world();
        let id = w
            .spawn_body(BodyShape::default(), "center", SpawnPlatform::Top)
            .unwrap();
        for _ in 0..10 {
            w.tick(&InputSnapshot::idle()).unwrap();
        }
        let body = w.body(id).unwrap();
        assert_relative_eq!(body.position.y, 0.7);
        assert_relative_eq!(body.velocity.norm(), 0.0);
    }

    #[test]
    fn nudges_move_only_the_held_body() {
        let mut w = world();
        let id = w
            .spawn_body(BodyShape::default(), "center", SpawnPlatform::Top)
            .unwrap();
        w.tick(&nudge_forward()).unwrap();
        assert_relative_eq!(w.body(id).unwrap().position.z, 7.7);

        w.release();
        w.tick(&nudge_forward()).unwrap();
        // Released bodies no longer respond to nudges.
        let z = w.body(id).unwrap().position.z;
        assert!((z - 7.7).abs() < 1e-6);
    }

    #[test]
    fn released_body_rests_on_the_platform_under_gravity() {
        let mut w = world();
        let id = w
            .spawn_body(BodyShape::default(), "center", SpawnPlatform::Top)
            .unwrap();
        w.release();
        for _ in 0..60 {
            w.tick(&InputSnapshot::idle()).unwrap();
        }
        let body = w.body(id).unwrap();
        // Still on the top platform, held by the contact snap.
        assert!(body.lower_extent() >= 0.2 - 1e-9);
        assert!(body.position.y < 0.8);
    }

    #[test]
    fn set_body_state_rejects_non_finite_poses() {
        let mut w = world();
        let id = w
            .spawn_body(BodyShape::default(), "center", SpawnPlatform::Top)
            .unwrap();
        let err = w.set_body_state(id, Point3::new(f64::NAN, 0.0, 0.0), Vector3::zeros());
        assert_eq!(err, Err(SimError::NonFiniteState(id)));
        // Unchanged.
        assert!(w.body(id).unwrap().is_finite());

        assert_eq!(
            w.set_body_state(BodyId(99), Point3::origin(), Vector3::zeros()),
            Err(SimError::UnknownBody(BodyId(99)))
        );
    }

    #[test]
    fn external_ramp_bodies_are_left_to_the_collision_engine() {
        let mut w = world();
        w.add_ramp(preset_spec(RampKind::Wave, 0.0)).unwrap();
        let id = w
            .spawn_body(BodyShape::default(), "center", SpawnPlatform::Top)
            .unwrap();
        // Park the body over the wave ramp, then release.
        for _ in 0..40 {
            w.tick(&nudge_forward()).unwrap();
        }
        let parked = w.body(id).unwrap().position;
        w.release();
        for _ in 0..10 {
            w.tick(&InputSnapshot::idle()).unwrap();
        }
        // The world did not integrate it; the external engine owns it.
        assert_eq!(w.body(id).unwrap().position, parked);

        // Poses arrive via set_body_state.
        let reported = Point3::new(0.0, -1.0, -2.0);
        w.set_body_state(id, reported, Vector3::new(0.0, 0.0, -3.0))
            .unwrap();
        assert_eq!(w.body(id).unwrap().position, reported);
    }

    #[test]
    fn sphere_races_down_a_curved_ramp_to_the_finish() {
        let mut w = world();
        w.add_ramp(preset_spec(RampKind::Curved, 0.0)).unwrap();
        let id = w
            .spawn_body(BodyShape::Sphere { radius: 0.5 }, "center", SpawnPlatform::Top)
            .unwrap();
        // Walk the held body from the platform onto the ramp mouth.
        for _ in 0..31 {
            w.tick(&nudge_forward()).unwrap();
        }
        w.release();

        let mut finished = false;
        for _ in 0..2400 {
            w.tick(&InputSnapshot::idle()).unwrap();
            if !w.tracker().records().is_empty() {
                finished = true;
                break;
            }
            assert!(w.body(id).unwrap().is_finite());
        }
        assert!(finished, "sphere must reach the finish line");
        let record = &w.tracker().records()[0];
        assert_eq!(record.body, id);
        assert_eq!(record.lane, "center");
        assert!(record.elapsed > 0.0);
    }

    #[test]
    fn two_lane_race_produces_ranked_standings() {
        let mut w = world();
        w.add_ramp(preset_spec(RampKind::Curved, -4.0)).unwrap();
        w.add_ramp(preset_spec(RampKind::Curved, 0.0)).unwrap();

        let first = w
            .spawn_body(BodyShape::Sphere { radius: 0.5 }, "left", SpawnPlatform::Top)
            .unwrap();
        for _ in 0..32 {
            w.tick(&nudge_forward()).unwrap();
        }
        let second = w
            .spawn_body(BodyShape::Sphere { radius: 0.5 }, "center", SpawnPlatform::Top)
            .unwrap();
        for _ in 0..30 {
            w.tick(&nudge_forward()).unwrap();
        }

        w.release();
        for _ in 0..3600 {
            w.tick(&InputSnapshot::idle()).unwrap();
            if w.tracker().records().len() == 2 {
                break;
            }
        }

        let standings = w.tracker().standings();
        assert_eq!(standings.len(), 2, "both bodies must finish");
        // The body with the head start wins.
        assert_eq!(w.tracker().winner().map(|r| r.body), Some(first));
        assert_eq!(w.tracker().loser().map(|r| r.body), Some(second));
        assert_eq!(standings[0].lane, "left");
    }

    #[test]
    fn reset_clears_bodies_but_keeps_ramps() {
        let mut w = world();
        w.add_ramp(preset_spec(RampKind::Straight, 0.0)).unwrap();
        w.spawn_body(BodyShape::default(), "center", SpawnPlatform::Top)
            .unwrap();
        w.tick(&InputSnapshot {
            reset: true,
            ..InputSnapshot::idle()
        })
        .unwrap();
        assert!(w.bodies().is_empty());
        assert!(w.render_transforms().is_empty());
        assert_eq!(w.ramps().len(), 1);
    }

    #[test]
    fn transforms_are_synced_each_tick() {
        let mut w = world();
        let id = w
            .spawn_body(BodyShape::default(), "center", SpawnPlatform::Top)
            .unwrap();
        w.tick(&InputSnapshot::idle()).unwrap();
        let transforms = w.render_transforms();
        assert_eq!(transforms.len(), 1);
        assert_eq!(transforms[0].0, id);
        let t = transforms[0].1.translation.vector;
        assert_relative_eq!(t.y, 0.7);
        assert_relative_eq!(t.z, 7.8);
    }

    #[test]
    fn tick_input_can_install_ramps_and_spawn() {
        let mut w = world();
        w.tick(&InputSnapshot {
            add_ramp: true,
            spawn: true,
            ramp_kind: RampKind::Spiral,
            lane: "right".to_string(),
            ..InputSnapshot::idle()
        })
        .unwrap();
        assert_eq!(w.ramps().len(), 1);
        assert_eq!(w.bodies().len(), 1);
        assert_eq!(w.ramps()[0].strategy, MotionStrategy::External);
        assert_relative_eq!(w.bodies()[0].position.x, 4.0);
    }
}
