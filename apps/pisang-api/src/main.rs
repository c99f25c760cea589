use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = pisang_api::Args::parse();

	pisang_api::run(args).await
}
