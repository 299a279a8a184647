use clap::Parser;
use color_print::cprintln;

use ndrasm::assembler::Assembler;
use ndrasm::error::Error;
use ndrasm::lexer;

const HELP_TEMPLATE: &str = "\
{before-help}{bin} {version}
  {about}

{usage-heading}
{tab}{usage}

{all-args}{after-help}";

#[derive(Debug, Parser)]
#[clap(author, version, about, help_template = HELP_TEMPLATE)]
struct Args {
    /// Input assembly file
    input: String,

    /// Output image file
    #[clap(short, long, default_value = "output.mem")]
    output: String,

    /// Dump the symbol table and entry PC
    #[clap(short, long)]
    dump: bool,
}

fn main() {
    let args = Args::parse();
    println!("NDR Assembler");

    if let Err(err) = run(&args) {
        cprintln!("<red,bold>error</>: {}", err);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Error> {
    println!("1. Read File and Tokenize");
    println!("  < {}", args.input);
    let src = std::fs::read_to_string(&args.input)
        .map_err(|e| Error::FileRead(args.input.clone(), e))?;
    let tokens = lexer::tokenize(&src);

    println!("2. Resolve Labels & Generate Image");
    let mut asm = Assembler::new(&tokens);
    asm.first_pass()?;
    let mem = asm.second_pass()?;

    if args.dump {
        cprintln!("  entry pc: <y>0x{:02X}</>", asm.start_pc());
        for (name, addr) in asm.labels().iter() {
            cprintln!("  <g>{:<12}</> @ <y>0x{:02X}</>", name, addr);
        }
    }

    println!("  > {}", args.output);
    std::fs::write(&args.output, mem.serialize())
        .map_err(|e| Error::FileWrite(args.output.clone(), e))?;
    Ok(())
}
