use crate::aero::impulse::Impulse;
use crate::aero::panel::PerSurface;
use crate::math::Vec3;
use crate::physics::kinematics::WingAngles;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};

/// Outputs of one completed step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub step: usize,
    pub time: f64,
    pub angles: PerSurface<WingAngles>,
    pub circulation: PerSurface<Vec<f64>>,
    /// `None` until enough wake history exists
    pub impulse: Option<PerSurface<Impulse>>,
}

impl StepRecord {
    pub fn max_circulation(&self) -> f64 {
        self.circulation
            .iter()
            .flat_map(|(_, g)| g.iter())
            .fold(0.0, |m, g| m.max(g.abs()))
    }
}

fn write_vec(out: &mut impl Write, v: &Vec3) -> io::Result<()> {
    write!(out, ",{},{},{}", v.x, v.y, v.z)
}

pub fn write_impulses(out: &mut impl Write, records: &[StepRecord]) -> io::Result<()> {
    writeln!(
        out,
        "step,time,surface,\
         bound_lx,bound_ly,bound_lz,bound_ax,bound_ay,bound_az,\
         wake_lx,wake_ly,wake_lz,wake_ax,wake_ay,wake_az"
    )?;
    for record in records {
        let Some(impulse) = &record.impulse else {
            continue;
        };
        for (surface, imp) in impulse.iter() {
            write!(out, "{},{},{}", record.step, record.time, surface.name())?;
            for v in [&imp.bound_linear, &imp.bound_angular, &imp.wake_linear, &imp.wake_angular] {
                write_vec(out, v)?;
            }
            writeln!(out)?;
        }
    }
    Ok(())
}

pub fn write_circulation(out: &mut impl Write, records: &[StepRecord]) -> io::Result<()> {
    writeln!(out, "step,time,surface,panel,gamma")?;
    for record in records {
        for (surface, gamma) in record.circulation.iter() {
            for (panel, g) in gamma.iter().enumerate() {
                writeln!(out, "{},{},{},{},{}", record.step, record.time, surface.name(), panel, g)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(step: usize, with_impulse: bool) -> StepRecord {
        StepRecord {
            step,
            time: step as f64 * 0.5,
            angles: PerSurface::default(),
            circulation: PerSurface::from_fn(|s| vec![s.index() as f64, -2.0]),
            impulse: with_impulse.then(|| {
                PerSurface::from_fn(|_| Impulse {
                    bound_linear: Vec3::new(1.0, 2.0, 3.0),
                    ..Impulse::default()
                })
            }),
        }
    }

    #[test]
    fn impulse_csv_skips_unavailable_steps() {
        let mut buf = Vec::new();
        write_impulses(&mut buf, &[record(3, false), record(4, true)]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 1 + 4);
        assert!(lines[1].starts_with("4,2,front_right,1,2,3,0,0,0"));
        assert_eq!(lines[1].split(',').count(), 15);
    }

    #[test]
    fn circulation_csv_has_one_row_per_panel() {
        let mut buf = Vec::new();
        write_circulation(&mut buf, &[record(0, false)]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 1 + 4 * 2);
        assert!(text.contains("0,0,rear_left,0,3"));
    }

    #[test]
    fn max_circulation_uses_magnitude() {
        assert_eq!(record(0, false).max_circulation(), 3.0);
    }
}
