use flapwing::aero::Surface;
use flapwing::{SimulationConfig, Simulator, VehicleConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let vehicle = VehicleConfig::dragonfly();
    let config = SimulationConfig {
        nstep: 40,
        dt: 0.025,
        ..SimulationConfig::default()
    };

    let mut simulator = Simulator::new(&vehicle, config)?;
    simulator.run()?;

    println!("step,time,surface,Lx,Ly,Lz,Ax,Ay,Az");
    for record in simulator.records().iter().step_by(4) {
        let Some(impulse) = &record.impulse else {
            continue;
        };
        for surface in Surface::ALL {
            let imp = &impulse[surface];
            let l = imp.total_linear();
            let a = imp.total_angular();
            println!(
                "{},{:.3},{},{:.5},{:.5},{:.5},{:.5},{:.5},{:.5}",
                record.step,
                record.time,
                surface.name(),
                l.x, l.y, l.z,
                a.x, a.y, a.z
            );
        }
    }

    let last = simulator.records().last().ok_or("no steps recorded")?;
    eprintln!("\nDragonfly run:");
    eprintln!("Steps: {}", simulator.records().len());
    eprintln!("Peak |circulation| at final step: {:.4}", last.max_circulation());
    for (surface, wake) in simulator.wakes().iter() {
        eprintln!("{:>12}: {} wake rows, {} rings", surface.name(), wake.len(), wake.ring_count());
    }
    Ok(())
}
