use argh::FromArgs;
use seqsh::Interpreter;
use seqsh::input::{Interactive, LineSource, Reader};
use std::fs::File;
use std::io::{self, BufReader, IsTerminal};
use std::path::PathBuf;

#[derive(FromArgs)]
/// A minimal command shell: runs programs sequentially (';') or in the
/// background ('&'), with cd and exit builtins.
struct ShellArgs {
    #[argh(positional)]
    /// file to read commands from instead of standard input
    script: Option<PathBuf>,
}

fn main() {
    let args: ShellArgs = argh::from_env();
    std::process::exit(run(args));
}

fn run(args: ShellArgs) -> i32 {
    let mut source = match open_source(args) {
        Ok(source) => source,
        Err(code) => return code,
    };
    match Interpreter::default().repl(source.as_mut()) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Unable to read command line: {e:#}");
            2
        }
    }
}

/// Pick the line source: a script file when one was given, otherwise the
/// terminal (with line editing) or plain standard input.
fn open_source(args: ShellArgs) -> Result<Box<dyn LineSource>, i32> {
    match args.script {
        Some(path) => {
            let file = match File::open(&path) {
                Ok(file) => file,
                Err(_) => {
                    eprintln!("Failed to open input file {}", path.display());
                    return Err(1);
                }
            };
            // Opening a directory succeeds on Linux; reading it would not.
            if file.metadata().map(|m| m.is_dir()).unwrap_or(true) {
                eprintln!("Failed to set new file as input");
                return Err(2);
            }
            Ok(Box::new(Reader::new(BufReader::new(file))))
        }
        None if io::stdin().is_terminal() => match Interactive::new() {
            Ok(editor) => Ok(Box::new(editor)),
            Err(e) => {
                eprintln!("Unable to read command line: {e:#}");
                Err(2)
            }
        },
        None => Ok(Box::new(Reader::new(io::stdin().lock()))),
    }
}
