use anyhow::{Context, Result};
use clap::Parser;
use guard_patrol::{obstruction, Part2Args};

fn main() -> Result<()> {
    let args = Part2Args::parse();
    if let Some(jobs) = args.jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .with_context(|| format!("Failed to start {} worker thread(s).", jobs))?;
    }

    let mut lab = guard_patrol::read_lab(&args.input_path).with_context(|| {
        format!(
            "Failed to read laboratory from given file({}).",
            args.input_path.display()
        )
    })?;

    let loop_positions = if args.in_place {
        obstruction::loop_obstructions_in_place(&mut lab, args.candidates)?
    } else {
        obstruction::loop_obstructions(&lab, args.candidates)?
    };

    println!(
        "There is(are) {} location(s) which can make guard loops in given laboratory.",
        loop_positions.len()
    );

    Ok(())
}
