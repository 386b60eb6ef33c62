use crate::aero::assembly::SystemLayout;
use crate::aero::border::{accumulate, border_velocities};
use crate::aero::impulse::{group_impulse, is_available, Impulse};
use crate::aero::influence::{cross_influence, self_influence_blocks};
use crate::aero::kernel::{Cutoffs, FilamentBatch};
use crate::aero::panel::{PerSurface, Surface, SurfaceGeometry, VortexRing, WingGroup};
use crate::aero::wake::{corner_velocities, wake_filaments, wake_normal_velocity, WakeRow, WakeSheet};
use crate::config::{SimulationConfig, VehicleConfig};
use crate::error::{SimError, SimResult};
use crate::physics::frames::WingPlacement;
use crate::physics::kinematics::{Kinematics, WingAngles};
use crate::physics::solver::LinearSolver;
use crate::sim::record::{write_circulation, write_impulses, StepRecord};
use nalgebra::DMatrix;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Self-influence blocks built, no step taken yet
    Setup,
    Running,
    Finished,
}

/// Mutable state threaded from one step to the next.
#[derive(Debug, Clone, Default)]
pub struct SimulationContext {
    pub step: usize,
    pub time: f64,
    pub wakes: PerSurface<WakeSheet>,
    pub circulation: PerSurface<Vec<f64>>,
}

/// Time-marching vortex-lattice solver for the four wings.
pub struct Simulator {
    config: SimulationConfig,
    placement: WingPlacement,
    kinematics: Box<dyn Kinematics>,
    cutoffs: Cutoffs,
    layout: SystemLayout,
    self_blocks: PerSurface<DMatrix<f64>>,
    solver: LinearSolver,
    context: SimulationContext,
    records: Vec<StepRecord>,
    phase: Phase,
}

impl Simulator {
    /// Validate both configurations, scale the vehicle and build the
    /// self-influence blocks. Nothing is assembled if validation fails.
    pub fn new(vehicle: &VehicleConfig, config: SimulationConfig) -> SimResult<Self> {
        config.validate()?;
        let scaled = vehicle.nondimensionalize()?;
        vehicle.log_summary();
        let lcut = config.lcut.unwrap_or_else(|| scaled.default_lcut());
        let kinematics = Box::new(scaled.kinematics());
        Self::from_parts(scaled.placement, kinematics, config, lcut)
    }

    /// Like [`Self::new`] with a custom motion in place of the vehicle's strokes.
    pub fn with_kinematics(
        vehicle: &VehicleConfig,
        config: SimulationConfig,
        kinematics: Box<dyn Kinematics>,
    ) -> SimResult<Self> {
        config.validate()?;
        let scaled = vehicle.nondimensionalize()?;
        vehicle.log_summary();
        let lcut = config.lcut.unwrap_or_else(|| scaled.default_lcut());
        Self::from_parts(scaled.placement, kinematics, config, lcut)
    }

    /// Start from an already non-dimensional placement.
    pub fn from_parts(
        placement: WingPlacement,
        kinematics: Box<dyn Kinematics>,
        config: SimulationConfig,
        lcut: f64,
    ) -> SimResult<Self> {
        config.validate()?;
        if !(lcut > 0.0) {
            return Err(SimError::config("lcut", format!("must be positive, got {lcut}")));
        }
        let cutoffs = Cutoffs::new(config.rcut, lcut);

        let reference = PerSurface::from_fn(|s| placement.reference_geometry(s));
        let layout = SystemLayout::new(&reference.map(|_, g| g.panel_count()));
        let self_blocks = self_influence_blocks(&reference, &cutoffs);
        info!(
            unknowns = layout.total(),
            nstep = config.nstep,
            dt = config.dt,
            final_time = config.final_time(),
            rcut = cutoffs.rcut,
            lcut = cutoffs.lcut,
            free_wake = config.free_wake,
            "setup complete"
        );

        Ok(Self {
            solver: LinearSolver::new(config.max_condition),
            context: SimulationContext {
                circulation: reference.map(|_, g| vec![0.0; g.panel_count()]),
                ..SimulationContext::default()
            },
            config,
            placement,
            kinematics,
            cutoffs,
            layout,
            self_blocks,
            records: Vec::new(),
            phase: Phase::Setup,
        })
    }

    /// Advance one step. Returns `Ok(false)` once all steps are done.
    pub fn step(&mut self) -> SimResult<bool> {
        if self.phase == Phase::Finished {
            return Ok(false);
        }
        self.phase = Phase::Running;

        let k = self.context.step;
        let t = k as f64 * self.config.dt;
        let parallel = self.config.parallel;
        let cutoffs = self.cutoffs;

        let angles = PerSurface::from_fn(|s| self.kinematics.angles(s, t));
        let (geometries, kinematic) = PerSurface::par_from_fn(parallel, |s| {
            let placed = self.placement.place(s, &angles[s], t);
            (placed.geometry, placed.kinematic_normal)
        })
        .unzip();

        let cross = cross_influence(&geometries, &cutoffs, parallel);
        let matrix = self.layout.assemble(&self.self_blocks, &cross)?;

        let wakes = &self.context.wakes;
        let wake_normal =
            PerSurface::par_from_fn(parallel, |s| wake_normal_velocity(k, &geometries[s], wakes, &cutoffs));

        let rhs_kinematic = self.layout.stack(&kinematic)?;
        let rhs_wake = self.layout.stack(&wake_normal)?;
        let gamma = match self.solver.solve(k, &matrix, &rhs_kinematic, &rhs_wake) {
            Ok(gamma) => gamma,
            Err(err) => {
                warn!(step = k, time = t, error = %err, "solve failed, aborting march");
                self.phase = Phase::Finished;
                return Err(err);
            }
        };
        let circulation = self.layout.split(&gamma);

        let impulse = is_available(k).then(|| self.impulses(&geometries, &circulation, t));

        if let Err(err) = self.shed_and_convect(&geometries, &circulation) {
            self.phase = Phase::Finished;
            return Err(err);
        }

        let record = StepRecord {
            step: k,
            time: t,
            angles,
            circulation: circulation.clone(),
            impulse,
        };
        debug!(
            step = k,
            time = t,
            max_gamma = record.max_circulation(),
            wake_rows = self.context.wakes.front_right.len(),
            "step complete"
        );
        self.records.push(record);

        self.context.circulation = circulation;
        self.context.step = k + 1;
        self.context.time = (k + 1) as f64 * self.config.dt;

        if self.context.step >= self.config.nstep {
            self.phase = Phase::Finished;
            self.finish();
            return Ok(false);
        }
        Ok(true)
    }

    pub fn run(&mut self) -> SimResult<()> {
        while self.step()? {}
        Ok(())
    }

    fn impulses(
        &self,
        geometries: &PerSurface<SurfaceGeometry>,
        circulation: &PerSurface<Vec<f64>>,
        t: f64,
    ) -> PerSurface<Impulse> {
        let origin = self.placement.body_origin(t);
        let wakes = &self.context.wakes;
        let [front_right, front_left] = group_impulse(WingGroup::Front, geometries, circulation, wakes, origin);
        let [rear_right, rear_left] = group_impulse(WingGroup::Rear, geometries, circulation, wakes, origin);
        PerSurface {
            front_right,
            front_left,
            rear_right,
            rear_left,
        }
    }

    /// Convect the existing wake and append one row per surface, shed from
    /// the border panels. All velocities are evaluated before anything moves.
    fn shed_and_convect(
        &mut self,
        geometries: &PerSurface<SurfaceGeometry>,
        circulation: &PerSurface<Vec<f64>>,
    ) -> SimResult<()> {
        let parallel = self.config.parallel;
        let free_wake = self.config.free_wake;
        let cutoffs = self.cutoffs;
        let dt = self.config.dt;
        let step = self.context.step;

        let wake_batch = if free_wake && step > 0 {
            Some(wake_filaments(&self.context.wakes))
        } else {
            None
        };

        let mut border = border_velocities(geometries, circulation, &cutoffs, parallel);
        if let Some(batch) = &wake_batch {
            for s in Surface::ALL {
                let extra = corner_velocities(geometries[s].border_panels(), batch, &cutoffs, parallel);
                accumulate(&mut border[s], &extra);
            }
        }

        if step > 0 {
            let mut bound = FilamentBatch::default();
            for (s, g) in geometries.iter() {
                bound.extend(g.rings(&circulation[s]));
            }
            let wakes = &self.context.wakes;
            let velocities = PerSurface::from_fn(|s| {
                let corners = wakes[s].corners();
                let mut v = corner_velocities(&corners, &bound, &cutoffs, parallel);
                if let Some(batch) = &wake_batch {
                    accumulate(&mut v, &corner_velocities(&corners, batch, &cutoffs, parallel));
                }
                v
            });
            for s in Surface::ALL {
                self.context.wakes[s].convect(&velocities[s], dt)?;
            }
        }

        for s in Surface::ALL {
            let g = &geometries[s];
            let rings = g
                .border_panels()
                .iter()
                .zip(&border[s])
                .zip(&circulation[s][g.border_range()])
                .map(|((panel, v), &gamma)| {
                    let mut corners = *panel;
                    for (c, vc) in corners.iter_mut().zip(v) {
                        *c = *c + *vc * dt;
                    }
                    VortexRing::new(corners, gamma)
                })
                .collect();
            self.context.wakes[s].push(WakeRow { step, rings });
        }
        Ok(())
    }

    fn finish(&self) {
        let impulse_steps = self.records.iter().filter(|r| r.impulse.is_some()).count();
        let wake_rings: usize = self.context.wakes.iter().map(|(_, w)| w.ring_count()).sum();
        info!(
            steps = self.context.step,
            time = self.context.time,
            impulse_steps,
            wake_rings,
            "simulation completed"
        );
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn cutoffs(&self) -> Cutoffs {
        self.cutoffs
    }

    pub fn layout(&self) -> &SystemLayout {
        &self.layout
    }

    pub fn placement(&self) -> &WingPlacement {
        &self.placement
    }

    pub fn self_blocks(&self) -> &PerSurface<DMatrix<f64>> {
        &self.self_blocks
    }

    pub fn context(&self) -> &SimulationContext {
        &self.context
    }

    pub fn wakes(&self) -> &PerSurface<WakeSheet> {
        &self.context.wakes
    }

    pub fn records(&self) -> &[StepRecord] {
        &self.records
    }

    /// Angles the kinematics provider gives at time `t`.
    pub fn angles_at(&self, t: f64) -> PerSurface<WingAngles> {
        PerSurface::from_fn(|s| self.kinematics.angles(s, t))
    }

    pub fn export_impulses(&self, path: impl AsRef<Path>) -> SimResult<()> {
        let path = path.as_ref();
        let mut out = BufWriter::new(File::create(path)?);
        write_impulses(&mut out, &self.records)?;
        out.flush()?;
        info!(path = %path.display(), "impulses exported");
        Ok(())
    }

    pub fn export_circulation(&self, path: impl AsRef<Path>) -> SimResult<()> {
        let path = path.as_ref();
        let mut out = BufWriter::new(File::create(path)?);
        write_circulation(&mut out, &self.records)?;
        out.flush()?;
        info!(path = %path.display(), "circulation exported");
        Ok(())
    }
}
