use clap::{ArgEnum, Parser, Subcommand};
use std::path::PathBuf;

/// Flash firmware through a TI UniFlash standalone project folder
#[derive(Debug, Parser)]
#[clap(name = "dsflash", version)]
pub struct ArgParser {
    /// Log level; falls back to DSFLASH_LOG, then info
    #[clap(long, arg_enum, global = true)]
    pub log_level: Option<LogLevel>,
    /// The sub-command to use
    #[clap(subcommand)]
    pub sub_command: SubCommand,
}

#[derive(Clone, Debug, PartialEq, Eq, Subcommand)]
pub enum SubCommand {
    /// run the project's flashing tool and stream its output
    Flash {
        #[clap(long, env = "DSFLASH_DIR")]
        /// UniFlash standalone project folder, auto-detected when omitted
        dir: Option<PathBuf>,

        #[clap(long, env = "DSFLASH_TOOL", default_value = "dslite.bat")]
        /// flashing tool inside the project folder
        tool: String,

        #[clap(long, multiple_values = true, allow_hyphen_values = true)]
        /// extra arguments for the flashing tool
        args: Vec<String>,

        #[clap(long, env = "DSFLASH_SAVE_OUTPUT")]
        /// write the output and activity log to this file afterwards
        save_output: Option<PathBuf>,

        #[clap(long, env = "DSFLASH_TERMINATE_GRACE", default_value = "3")]
        /// seconds a cancelled tool gets to exit before it is killed
        terminate_grace: u64,
    },
    /// print the auto-detected project folder
    Locate {
        #[clap(long, env = "DSFLASH_TOOL", default_value = "dslite.bat")]
        /// flashing tool the folder must contain
        tool: String,
    },
    /// look for a connected XDS110 / LaunchPad debug probe
    DetectDevice {
        #[clap(long, default_value = "10")]
        /// seconds to wait for the device query
        timeout: u64,
    },
    /// open the TI UniFlash desktop application, if installed
    OpenUniflash,
}

/// Log level as exposed on the command line.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ArgEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flash_defaults() {
        let parsed = ArgParser::try_parse_from(["dsflash", "flash", "--dir", "single_flash"]).unwrap();
        match parsed.sub_command {
            SubCommand::Flash {
                dir,
                tool,
                args,
                save_output,
                terminate_grace,
            } => {
                assert_eq!(dir, Some(PathBuf::from("single_flash")));
                assert_eq!(tool, "dslite.bat");
                assert!(args.is_empty());
                assert_eq!(save_output, None);
                assert_eq!(terminate_grace, 3);
            }
            other => panic!("unexpected sub-command {:?}", other),
        }
        assert_eq!(parsed.log_level, None);
    }

    #[test]
    fn tool_args_may_look_like_flags() {
        let parsed = ArgParser::try_parse_from([
            "dsflash",
            "--log-level",
            "debug",
            "flash",
            "--args",
            "--mode",
            "flash",
            "-e",
        ])
        .unwrap();
        assert_eq!(parsed.log_level, Some(LogLevel::Debug));
        match parsed.sub_command {
            SubCommand::Flash { args, .. } => assert_eq!(args, vec!["--mode", "flash", "-e"]),
            other => panic!("unexpected sub-command {:?}", other),
        }
    }

    #[test]
    fn detect_device_timeout() {
        let parsed = ArgParser::try_parse_from(["dsflash", "detect-device", "--timeout", "4"]).unwrap();
        assert_eq!(parsed.sub_command, SubCommand::DetectDevice { timeout: 4 });
    }

    #[test]
    fn open_uniflash_takes_no_arguments() {
        let parsed = ArgParser::try_parse_from(["dsflash", "open-uniflash"]).unwrap();
        assert_eq!(parsed.sub_command, SubCommand::OpenUniflash);
        assert!(ArgParser::try_parse_from(["dsflash", "open-uniflash", "extra"]).is_err());
    }

    #[test]
    fn sub_command_is_required() {
        assert!(ArgParser::try_parse_from(["dsflash"]).is_err());
    }
}
