use clap::{CommandFactory, Parser};
use std::ffi::{OsStr, OsString};
use std::path::PathBuf;

use pyrelease::{Actions, ConfigOverrides};

use super::errors::AppError;

/// Build, upload and reinstall the package.
///
/// Actions always run in this order: create, upload to test, upload,
/// uninstall, install from test, install.
#[derive(Parser, Debug, Default)]
#[command(
    name = "pyrelease",
    version,
    about = "Build, upload and reinstall a Python package",
    disable_help_flag = true,
    args_override_self = true
)]
pub struct CliArgs {
    /// Print this usage text
    #[arg(short = 'h', long = "help")]
    pub help: bool,

    /// Remove the distribution directory and build a fresh sdist
    #[arg(short = 'c', long = "create")]
    pub create: bool,

    /// Upload the distribution directory to the test index
    #[arg(short = 'u')]
    pub upload_test: bool,

    /// Upload the distribution directory to the production index
    #[arg(long = "upload")]
    pub upload: bool,

    /// Uninstall, then install from the test index
    #[arg(short = 'i')]
    pub install_test: bool,

    /// Uninstall, then install from the production index
    #[arg(long = "install")]
    pub install: bool,

    /// Uninstall the package (also accepted as -un)
    #[arg(long = "uninstall")]
    pub uninstall: bool,

    /// JSON file with release settings
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Distribution directory (default: dist)
    #[arg(long, value_name = "DIR")]
    pub dist_dir: Option<PathBuf>,

    /// Package to install and uninstall (default: pyverilator-mm)
    #[arg(long, value_name = "NAME")]
    pub package_name: Option<String>,

    /// Package manager executable (default: pip3)
    #[arg(long, value_name = "PROGRAM")]
    pub pip_executable: Option<String>,

    /// Enable logging
    #[arg(long, default_value_t = false)]
    pub log: bool,
}

/// `-un` is a two-letter short flag, which clap would read as `-u -n`.
const UNINSTALL_SHORT: &str = "-un";

fn unknown(token: &OsStr) -> AppError {
    AppError::UnknownFlag {
        flag: token.to_string_lossy().into_owned(),
    }
}

impl CliArgs {
    /// Every flag spelling clap knows, and whether it consumes the next token.
    fn known_flags() -> Vec<(String, bool)> {
        let mut cmd = Self::command();
        cmd.build();
        let mut flags = vec![(UNINSTALL_SHORT.to_string(), false)];
        for arg in cmd.get_arguments() {
            let takes_value = arg.get_action().takes_values();
            if let Some(short) = arg.get_short() {
                flags.push((format!("-{short}"), takes_value));
            }
            if let Some(long) = arg.get_long() {
                flags.push((format!("--{long}"), takes_value));
            }
        }
        flags
    }

    /// Check that every token is a flag spelled exactly as listed in the usage
    /// (no clusters such as `-ci`), or the value of an option. `-un` becomes
    /// `--uninstall`.
    pub fn normalize<I, S>(tokens: I) -> Result<Vec<OsString>, AppError>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let flags = Self::known_flags();
        let mut expects_value = false;
        let mut normalized = Vec::new();

        for token in tokens.into_iter().map(Into::into) {
            if std::mem::take(&mut expects_value) {
                normalized.push(token);
                continue;
            }
            let text = token.to_str().ok_or_else(|| unknown(&token))?;
            let (name, inline_value) = match text.split_once('=') {
                Some((name, _)) if name.starts_with("--") => (name, true),
                _ => (text, false),
            };
            let takes_value = flags
                .iter()
                .find(|(flag, _)| flag == name)
                .map(|&(_, takes_value)| takes_value)
                .ok_or_else(|| unknown(&token))?;
            expects_value = takes_value && !inline_value;

            if text == UNINSTALL_SHORT {
                normalized.push(OsString::from("--uninstall"));
            } else {
                normalized.push(token);
            }
        }
        Ok(normalized)
    }

    /// Parse normalized command-line tokens (without the program name).
    pub fn try_parse_tokens(tokens: Vec<OsString>) -> Result<Self, clap::Error> {
        let argv = std::iter::once(OsString::from("pyrelease")).chain(tokens);
        Self::try_parse_from(argv)
    }

    pub fn actions(&self) -> Actions {
        Actions {
            help: self.help,
            create: self.create,
            upload_test: self.upload_test,
            upload: self.upload,
            install_test: self.install_test,
            install: self.install,
            uninstall: self.uninstall,
        }
    }

    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            dist_dir: self.dist_dir.clone(),
            package_name: self.package_name.clone(),
            pip_executable: self.pip_executable.clone(),
        }
    }

    pub fn usage() -> String {
        Self::command().render_help().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_args(tokens: &[&str]) -> CliArgs {
        let tokens = CliArgs::normalize(tokens.iter().copied()).unwrap();
        CliArgs::try_parse_tokens(tokens).unwrap()
    }

    fn parse(tokens: &[&str]) -> Actions {
        parse_args(tokens).actions()
    }

    fn rejected(tokens: &[&str]) -> String {
        match CliArgs::normalize(tokens.iter().copied()) {
            Err(AppError::UnknownFlag { flag }) => flag,
            other => panic!("expected {tokens:?} to be rejected, got {other:?}"),
        }
    }

    #[test]
    fn each_flag_sets_only_its_action() {
        let cases: [(&[&str], Actions); 10] = [
            (&["-h"], Actions { help: true, ..Default::default() }),
            (&["--help"], Actions { help: true, ..Default::default() }),
            (&["-c"], Actions { create: true, ..Default::default() }),
            (&["--create"], Actions { create: true, ..Default::default() }),
            (&["-u"], Actions { upload_test: true, ..Default::default() }),
            (&["--upload"], Actions { upload: true, ..Default::default() }),
            (&["-i"], Actions { install_test: true, ..Default::default() }),
            (&["--install"], Actions { install: true, ..Default::default() }),
            (&["-un"], Actions { uninstall: true, ..Default::default() }),
            (&["--uninstall"], Actions { uninstall: true, ..Default::default() }),
        ];
        for (tokens, expected) in cases {
            assert_eq!(parse(tokens), expected, "tokens {tokens:?}");
        }
    }

    #[test]
    fn flag_order_does_not_matter() {
        assert_eq!(parse(&["--upload", "-c"]), parse(&["-c", "--upload"]));
        assert_eq!(parse(&["-un", "-i"]), parse(&["-i", "-un"]));
    }

    #[test]
    fn repeated_flags_are_accepted() {
        let actions = parse(&["-c", "-c", "--create"]);
        assert_eq!(actions, Actions { create: true, ..Default::default() });
    }

    #[test]
    fn unknown_flag_is_rejected() {
        assert_eq!(rejected(&["--bogus"]), "--bogus");
        assert_eq!(rejected(&["-c", "-x"]), "-x");
        assert_eq!(rejected(&["upload"]), "upload");
        assert_eq!(rejected(&["-i", "--"]), "--");
    }

    #[test]
    fn clustered_short_flags_are_rejected() {
        for cluster in ["-ci", "-cu", "-uc", "-hc", "-ui", "-unc"] {
            assert_eq!(rejected(&[cluster]), cluster);
        }
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_token_is_rejected() {
        use std::os::unix::ffi::OsStringExt;

        let token = OsString::from_vec(vec![0xff]);
        match CliArgs::normalize([token]) {
            Err(AppError::UnknownFlag { flag }) => assert_eq!(flag, "\u{FFFD}"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn option_values_are_not_checked_as_flags() {
        let tokens = CliArgs::normalize(["--package-name", "upload", "--dist-dir=out", "-un"]);
        assert_eq!(
            tokens.unwrap(),
            ["--package-name", "upload", "--dist-dir=out", "--uninstall"]
        );
    }

    #[test]
    fn config_overrides_are_collected() {
        let args = parse_args(&[
            "--dist-dir",
            "out",
            "--package-name",
            "mypkg",
            "--pip-executable",
            "pip",
        ]);
        let overrides = args.overrides();
        assert_eq!(overrides.dist_dir, Some(PathBuf::from("out")));
        assert_eq!(overrides.package_name.as_deref(), Some("mypkg"));
        assert_eq!(overrides.pip_executable.as_deref(), Some("pip"));
        assert_eq!(args.actions(), Actions::default());
    }

    #[test]
    fn version_flag_is_known() {
        let tokens = CliArgs::normalize(["-V"]).unwrap();
        let err = CliArgs::try_parse_tokens(tokens).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn usage_mentions_every_flag() {
        let usage = CliArgs::usage();
        for flag in ["--help", "--create", "-u", "--upload", "-i", "--install", "--uninstall"] {
            assert!(usage.contains(flag), "usage is missing {flag}");
        }
    }
}
