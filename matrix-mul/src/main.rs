mod config;

use std::io;

use clap::Parser;
use log_collector::{Sink, Tee, TracingSink, WriterSink};
use matrix_mul::{
    Coordinator, CpuLoadPolicy, Dimensions, Matrix, Outcome, Prompter, TextFile, pipeline,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();
    let cli = config::Cli::parse();

    let sink: Box<dyn Sink + Send> = match &cli.log_file {
        Some(path) => Box::new(Tee::new(TracingSink, WriterSink::append_to(path)?)),
        None => Box::new(TracingSink),
    };

    let logged = pipeline::with_log_collector(sink, "coordinator", move |logger| async move {
        let request = tokio::task::block_in_place(|| {
            let mut prompter = Prompter::new(io::stdin().lock(), io::stdout());
            cli.resolve(&mut prompter, &CpuLoadPolicy::default())
        });
        let request = match request {
            Ok(request) => request,
            Err(e) => {
                logger.error(format!("invalid operator input: {e}"));
                return Err(e);
            }
        };
        if request.workers != request.requested {
            logger.warn(format!(
                "requested {} workers, using {} given current CPU load",
                request.requested, request.workers
            ));
        }

        let seed = cli.seed;
        let generate = move |dims: Dimensions| {
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let a = Matrix::random(dims.rows1, dims.cols1, &mut rng);
            let b = Matrix::random(dims.rows2, dims.cols2, &mut rng);
            (a, b)
        };

        let mut coordinator =
            Coordinator::new(logger, TextFile::new(&cli.output_dir)).with_options(cli.options());
        coordinator.run_with(request.dims, generate, request.workers).await
    })
    .await;

    if let Err(e) = &logged.drained {
        eprintln!("Log output incomplete: {e}");
    }
    match logged.result {
        Ok(Outcome { file: Some(path), .. }) => {
            println!("Matrix multiplication complete. Result saved to {}", path.display());
        }
        Ok(Outcome { file: None, .. }) => {
            println!("Matrix multiplication finished, but the result could not be saved.");
        }
        Err(e) => {
            eprintln!("Matrix multiplication failed: {e}");
            std::process::exit(1);
        }
    }

    Ok(())
}
