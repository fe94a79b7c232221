//! Entry-point for the `oxi-field` binary.
use clap::Parser;
use oxi_field_cli::Cli;
use oxi_field_cli::run_main;

fn main() -> anyhow::Result<()> {
    // The field is driven from one loop; a single thread is enough.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(async {
        let cli = Cli::parse();
        run_main(cli).await?;
        Ok(())
    })
}
