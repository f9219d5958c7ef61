use amazeing::{GenerationParams, generate_maze};

/// Generates and solves a large imperfect maze repeatedly.
fn main() -> std::io::Result<()> {
    let mut args = std::env::args();
    args.next(); // Skip executable name
    let num_iters = args.next().and_then(|s| s.parse::<u64>().ok()).unwrap_or(10);

    let (width, height) = (1000, 1000);
    let start = std::time::Instant::now();
    for seed in 0..num_iters {
        let params = GenerationParams::new(width, height, (0, 0), (width - 1, height - 1), seed)
            .with_perfect(false);
        let generated = generate_maze(params).map_err(std::io::Error::other)?;
        let path = generated.solve().map_err(std::io::Error::other)?;
        println!(
            "seed {seed}: {} loops, path length {}",
            generated.loops_added,
            path.len()
        );
    }
    println!("{num_iters} runs in {:?}", start.elapsed());
    Ok(())
}
