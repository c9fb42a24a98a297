use anyhow::{Context, Result};
use clap::Parser;
use guard_patrol::{patrol::PatrolOutcome, Part1Args};

fn main() -> Result<()> {
    let args = Part1Args::parse();
    let lab = guard_patrol::read_lab(&args.input_path).with_context(|| {
        format!(
            "Failed to read laboratory from given file({}).",
            args.input_path.display()
        )
    })?;

    let record = lab.patrol_positions()?;
    if record.outcome() == PatrolOutcome::Looped {
        eprintln!("The guard never leaves given laboratory, only counting position(s) of one round.");
    }

    if args.draw {
        println!("{}\n", lab.render_patrol(record.positions()));
    }

    println!(
        "The guard will visit {} position(s) before leaving given laboratory.",
        record.positions().len()
    );

    Ok(())
}
