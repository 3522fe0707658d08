mod arg_parser;
mod device;
mod flash_cli;
mod logging;
mod project;
mod transcript;
mod uniflash;

use arg_parser::{ArgParser, SubCommand};
use device::Probe;
use flash_cli::FlashCli;

use anyhow::Result;
use clap::Parser;
use std::time::Duration;
use supervisor::SupervisorConfig;

#[tokio::main]
async fn main() {
    let args = ArgParser::parse();
    if let Err(err) = logging::init_logging(args.log_level) {
        eprintln!("dsflash: {:#}", err);
    }

    match run(args.sub_command).await {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("dsflash error: {:#}", err);
            std::process::exit(1);
        }
    }
}

async fn run(sub_command: SubCommand) -> Result<i32> {
    match sub_command {
        SubCommand::Flash {
            dir,
            tool,
            args,
            save_output,
            terminate_grace,
        } => {
            let dir = match dir {
                Some(dir) => project::validate(&dir, &tool)?,
                None => project::auto_detect(&std::env::current_dir()?, &tool)?,
            };
            let config = SupervisorConfig {
                terminate_grace: Duration::from_secs(terminate_grace),
                ..SupervisorConfig::default()
            };
            let mut cli = FlashCli::new(config);
            let status = cli.flash(&dir, &tool, args).await?;
            tracing::debug!(lines = cli.transcript().output().len(), %status, "flash session finished");
            if let Some(path) = save_output {
                cli.save_output(&path)?;
            }
            Ok(flash_cli::exit_code(&status))
        }
        SubCommand::Locate { tool } => {
            let dir = project::auto_detect(&std::env::current_dir()?, &tool)?;
            println!("{}", dir.display());
            Ok(0)
        }
        SubCommand::DetectDevice { timeout } => match device::detect(Duration::from_secs(timeout)).await {
            Probe::Found(name) => {
                println!("Device detected: {}", name);
                Ok(0)
            }
            Probe::NotFound => {
                println!("No debug probe detected. Check the USB connection, the probe drivers and the board's power LED.");
                Ok(1)
            }
            Probe::Unavailable(reason) => {
                println!("Device detection unavailable: {}", reason);
                Ok(2)
            }
        },
        SubCommand::OpenUniflash => match uniflash::find_launcher(&uniflash::default_installs())? {
            Some(launcher) => {
                uniflash::launch(&launcher)?;
                println!("Opening TI UniFlash...");
                Ok(0)
            }
            None => {
                println!("Could not find TI UniFlash installation.");
                println!("Please open UniFlash manually and create a standalone project.");
                Ok(1)
            }
        },
    }
}
