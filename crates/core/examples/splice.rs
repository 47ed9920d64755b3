use std::{fs, path::PathBuf};

use clap::Parser;
use yaml_edit::{Op, Span, Status, Transformer};

#[derive(Parser, Debug)]
#[command(name = "splice")]
#[command(about = "Apply rune-indexed span replacements to a file via the streaming transformer", long_about = None)]
struct Args {
    /// Path to the source file to transform
    input: PathBuf,

    /// Output path for transformed source (defaults to stdout)
    #[arg(long, short)]
    out: Option<PathBuf>,

    /// A `start:end=replacement` operation; may be given multiple times
    #[arg(long = "replace", value_name = "START:END=TEXT")]
    replacements: Vec<String>,

    /// Destination chunk size, to exercise the short_dst pause/resume path
    #[arg(long, default_value_t = 4096)]
    dst_chunk: usize,

    /// Source chunk size, to exercise the short_src pause/resume path
    #[arg(long, default_value_t = 4096)]
    src_chunk: usize,
}

fn parse_op(raw: &str) -> Result<Op, Box<dyn std::error::Error + Send + Sync>> {
    let (range, replacement) = raw
        .split_once('=')
        .ok_or("expected START:END=TEXT")?;
    let (start, end) = range
        .split_once(':')
        .ok_or("expected START:END=TEXT")?;
    let start: usize = start.parse()?;
    let end: usize = end.parse()?;
    Ok(Span::new(start, end)?.with(replacement))
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();

    let source = fs::read_to_string(&args.input)?;
    let ops = args
        .replacements
        .iter()
        .map(|raw| parse_op(raw))
        .collect::<Result<Vec<_>, _>>()?;

    let mut transformer = Transformer::new(ops)?;
    let mut out = Vec::with_capacity(source.len());
    let mut dst = vec![0u8; args.dst_chunk.max(4)];
    let src_bytes = source.as_bytes();
    let mut src_pos = 0usize;

    loop {
        let chunk_end = (src_pos + args.src_chunk).min(src_bytes.len());
        let at_eof = chunk_end == src_bytes.len();
        let (n_dst, n_src, status) =
            transformer.transform(&mut dst, &src_bytes[src_pos..chunk_end], at_eof)?;
        out.extend_from_slice(&dst[..n_dst]);
        src_pos += n_src;
        match status {
            Status::Done => break,
            Status::ShortDst | Status::ShortSrc => continue,
        }
    }

    let out = String::from_utf8(out)?;
    match &args.out {
        None => print!("{out}"),
        Some(path) => fs::write(path, out)?,
    }

    Ok(())
}
