use anyhow::{Context, Result};

fn main() -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let result = runtime.block_on(parley::run());
    // The blocking stdin reader cannot be cancelled, so don't wait for it on the way out.
    runtime.shutdown_background();
    result
}
