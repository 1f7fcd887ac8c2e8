//! Offline octree builder — packs a raw volume scan into a flat octree file.
//!
//! Usage: cargo run --release --bin build_octree -- [OPTIONS]
//!
//! Options:
//!   --input <PATH>      Raw volume file (headerless, raster order) [required]
//!   --output <PATH>     Output file for the packed f32 buffer [required]
//!   --dim <N>           Cubic edge length, power of two [required]
//!   --bits <8|16>       Bits per sample in the raw file (default: 8)
//!   --aggregate <MODE>  Parent aggregation: mean or max (default: mean)
//!   --max-elements <N>  Buffer capacity in f32 elements (default: 33554432)
//!   --jobs <N>          Worker threads for level construction (default: all cores)
//!
//! The output file holds the same scalar sequence a renderer would upload:
//! (value, child offset) pairs, root first, native-endian f32.

use std::path::PathBuf;
use std::time::Instant;

use voxtree::core::error::Error;
use voxtree::core::types::Result;
use voxtree::gpu::GpuTarget;
use voxtree::octree::builder::Aggregate;
use voxtree::octree::packer::LinearOctreeBuffer;
use voxtree::octree::pipeline::build_from_file_with;

/// Stand-in upload target that writes the packed buffer to disk
struct FileTarget {
    path: PathBuf,
    max_elements: usize,
}

impl GpuTarget for FileTarget {
    fn max_buffer_elements(&self) -> usize {
        self.max_elements
    }

    fn upload(&mut self, buffer: &LinearOctreeBuffer) -> Result<()> {
        std::fs::write(&self.path, buffer.as_bytes()).map_err(|source| Error::Io {
            path: self.path.clone(),
            source,
        })
    }
}

fn main() {
    voxtree::core::logging::init();

    let args: Vec<String> = std::env::args().collect();
    let input = parse_str_arg(&args, "--input").unwrap_or_else(|| usage("missing --input"));
    let output = parse_str_arg(&args, "--output").unwrap_or_else(|| usage("missing --output"));
    let dim = parse_u32_arg(&args, "--dim").unwrap_or_else(|| usage("missing --dim"));
    let bits = parse_u32_arg(&args, "--bits").unwrap_or(8);
    let max_elements = parse_usize_arg(&args, "--max-elements").unwrap_or(1 << 25);
    let aggregate = match parse_str_arg(&args, "--aggregate").as_deref() {
        None | Some("mean") => Aggregate::Mean,
        Some("max") => Aggregate::Max,
        Some(other) => usage(&format!("unknown aggregate mode '{}'", other)),
    };

    if let Some(jobs) = parse_usize_arg(&args, "--jobs") {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .expect("Failed to configure thread pool");
    }

    let mut target = FileTarget {
        path: PathBuf::from(&output),
        max_elements,
    };

    let start = Instant::now();
    match build_from_file_with(&input, bits, dim, aggregate, &mut target) {
        Ok(buffer) => {
            log::info!(
                "wrote {} ({} nodes, {} scalars) in {:.2?}",
                output,
                buffer.node_count(),
                buffer.len(),
                start.elapsed()
            );
        }
        Err(e) => {
            log::error!("octree build failed: {}", e);
            std::process::exit(1);
        }
    }
}

fn usage(reason: &str) -> ! {
    eprintln!("error: {}", reason);
    eprintln!(
        "usage: build_octree --input <PATH> --output <PATH> --dim <N> \
         [--bits <8|16>] [--aggregate <mean|max>] [--max-elements <N>] [--jobs <N>]"
    );
    std::process::exit(1);
}

fn parse_str_arg(args: &[String], name: &str) -> Option<String> {
    args.iter()
        .position(|a| a == name)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn parse_u32_arg(args: &[String], name: &str) -> Option<u32> {
    parse_str_arg(args, name).and_then(|v| v.parse().ok())
}

fn parse_usize_arg(args: &[String], name: &str) -> Option<usize> {
    parse_str_arg(args, name).and_then(|v| v.parse().ok())
}
