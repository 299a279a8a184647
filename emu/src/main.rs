mod dump;
mod machine;

use clap::Parser;
use color_print::cprintln;

use machine::Machine;

const HELP_TEMPLATE: &str = "\
{before-help}{bin} {version}
  {about}

{usage-heading}
{tab}{usage}

{all-args}{after-help}";

#[derive(Debug, Parser)]
#[clap(author, version, about, help_template = HELP_TEMPLATE)]
struct Args {
    /// Input image file
    input: String,

    /// Maximum number of steps to execute
    #[clap(short = 't', long)]
    tmax: Option<u64>,

    /// Suppress the per-step trace
    #[clap(short, long)]
    quiet: bool,
}

fn main() {
    let args = Args::parse();
    println!("NDR Emulator");
    println!("  < {}", args.input);

    let bytes = match std::fs::read(&args.input) {
        Ok(bytes) => bytes,
        Err(err) => {
            cprintln!("<red,bold>error</>: failed to read file: {}: {}", args.input, err);
            std::process::exit(1);
        }
    };

    let mut machine = Machine::new(&bytes);
    let mut steps: u64 = 0;
    while let Some(trace) = machine.step() {
        if !args.quiet {
            cprintln!(
                "AC: <yellow>{:02X}</> PC: <yellow>{:03X}</> FZ: {:<5} FN: {:<5} OP: {} DATA: <yellow>{:02X}</>",
                trace.ac,
                trace.pc,
                trace.zero,
                trace.neg,
                trace.op.cformat(),
                trace.operand
            );
        }
        steps += 1;
        if args.tmax.is_some_and(|tmax| steps >= tmax) {
            break;
        }
    }

    dump::print_dump(machine.mem());
}
