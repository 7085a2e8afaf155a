//! Configuration loading helpers for the CLI.
//!
//! Leading configuration flags are routed to `ortho_config`; everything from
//! the first other token onwards is parsed as the command.

use std::ffi::{OsStr, OsString};

use netbeans_config::Config;

use crate::AppError;

/// Flags recognised by the configuration loader. They must precede the
/// subcommand. `sorted_scan` is left to the file and environment layers.
pub(crate) const CONFIG_CLI_FLAGS: &[&str] = &[
    "--config-path",
    "--search-root",
    "--catalog-url",
    "--scratch-dir",
    "--log-filter",
    "--log-format",
];

pub(crate) trait ConfigLoader {
    /// Loads and validates configuration from the filtered arguments.
    fn load(&self, args: &[OsString]) -> Result<Config, AppError>;
}

pub(crate) struct OrthoConfigLoader;

impl ConfigLoader for OrthoConfigLoader {
    fn load(&self, args: &[OsString]) -> Result<Config, AppError> {
        Config::load_validated_from(args.iter().cloned()).map_err(AppError::from)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlagAction {
    Include { needs_value: bool },
    Skip,
}

fn classify_flag(argument: &OsStr) -> FlagAction {
    let text = argument.to_string_lossy();
    let (flag, inline_value) = match text.split_once('=') {
        Some((name, _)) => (name, true),
        None => (&*text, false),
    };
    if CONFIG_CLI_FLAGS.contains(&flag) {
        FlagAction::Include {
            needs_value: !inline_value,
        }
    } else {
        FlagAction::Skip
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ConfigArgumentSplit {
    pub(crate) config_arguments: Vec<OsString>,
    pub(crate) command_arguments: Vec<OsString>,
}

/// Splits `args` into the loader's arguments and clap's arguments. Both
/// halves keep the program name in first position.
pub(crate) fn split_config_arguments(args: &[OsString]) -> ConfigArgumentSplit {
    let Some((program, rest)) = args.split_first() else {
        return ConfigArgumentSplit {
            config_arguments: Vec::new(),
            command_arguments: Vec::new(),
        };
    };

    let mut config_arguments = vec![program.clone()];
    let mut consumed = 0;
    let mut expecting_value = false;
    for argument in rest {
        if expecting_value {
            expecting_value = false;
        } else {
            match classify_flag(argument) {
                FlagAction::Include { needs_value } => expecting_value = needs_value,
                FlagAction::Skip => break,
            }
        }
        config_arguments.push(argument.clone());
        consumed += 1;
    }

    let mut command_arguments = vec![program.clone()];
    command_arguments.extend(rest.iter().skip(consumed).cloned());
    ConfigArgumentSplit {
        config_arguments,
        command_arguments,
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn os_args(values: &[&str]) -> Vec<OsString> {
        values.iter().map(OsString::from).collect()
    }

    #[rstest]
    #[case::separate_value("--search-root", FlagAction::Include { needs_value: true })]
    #[case::inline_value("--log-filter=debug", FlagAction::Include { needs_value: false })]
    #[case::subcommand("locate", FlagAction::Skip)]
    #[case::command_flag("--root", FlagAction::Skip)]
    fn flags_are_classified(#[case] argument: &str, #[case] expected: FlagAction) {
        assert_eq!(classify_flag(OsStr::new(argument)), expected);
    }

    #[test]
    fn leading_config_flags_are_routed_to_loader() {
        let split = split_config_arguments(&os_args(&[
            "nbctl",
            "--search-root",
            "/opt",
            "--log-format=json",
            "locate",
            "12.6",
            "--root",
            "/srv",
        ]));
        assert_eq!(
            split.config_arguments,
            os_args(&["nbctl", "--search-root", "/opt", "--log-format=json"])
        );
        assert_eq!(
            split.command_arguments,
            os_args(&["nbctl", "locate", "12.6", "--root", "/srv"])
        );
    }

    #[test]
    fn config_flags_after_subcommand_stay_with_command() {
        let split = split_config_arguments(&os_args(&["nbctl", "versions", "--catalog-url", "x"]));
        assert_eq!(split.config_arguments, os_args(&["nbctl"]));
        assert_eq!(
            split.command_arguments,
            os_args(&["nbctl", "versions", "--catalog-url", "x"])
        );
    }

    #[test]
    fn empty_arguments_split_into_nothing() {
        let split = split_config_arguments(&[]);
        assert!(split.config_arguments.is_empty());
        assert!(split.command_arguments.is_empty());
    }
}
