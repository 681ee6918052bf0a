use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = jotter_api::Args::parse();

	jotter_api::run(args).await
}
