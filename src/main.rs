use clap::Parser;

use gitlab_release_note::{
    Args, Command, Result, command, forge::factory::ForgeFactory,
};

fn initialize_logger(debug: bool) -> Result<()> {
    let filter = if debug {
        simplelog::LevelFilter::Debug
    } else {
        simplelog::LevelFilter::Info
    };

    let config = simplelog::ConfigBuilder::new()
        .add_filter_allow_str("gitlab_release_note")
        .build();

    simplelog::TermLogger::init(
        filter,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli_args = Args::parse();

    initialize_logger(cli_args.debug)?;

    let remote_config = cli_args.remote_config()?;
    let release_config = cli_args.release_config()?;
    let forge_manager =
        ForgeFactory::create(&remote_config, cli_args.forge_options())?;

    match cli_args.command {
        Command::Release => {
            command::release::execute(&forge_manager, &release_config).await?;
        }
        Command::Show { json } => {
            command::show::execute(&forge_manager, &release_config, json)
                .await?;
        }
    }

    Ok(())
}
