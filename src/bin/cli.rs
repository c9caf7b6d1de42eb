use std::ffi::OsString;
use std::io::Write;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{Arg, ArgAction, ArgGroup, ArgMatches, Command, value_parser};
use filterlog::{
    Axis, Caller, EnvConfig, Logger, Request, ResolveCaller, Setting, Settings, Severity,
    app_name, report,
};

/// Exit status for a rejected `check`.
const REJECTED_EXIT_CODE: u8 = 1;
/// Exit status for command-line usage errors.
const USAGE_EXIT_CODE: u8 = 2;

/// Call site named on the command line.
struct CommandLineSite {
    file: String,
    line: u32,
}

impl ResolveCaller for CommandLineSite {
    fn resolve_caller(&self, _skip_frames: usize) -> Option<Caller<'_>> {
        Some(Caller {
            file: &self.file,
            line: self.line,
            function: "filterlog",
        })
    }
}

fn parse_level(value: &str) -> Result<Severity, String> {
    Severity::parse(value)
        .filter(|severity| Severity::EMITTABLE.contains(severity))
        .ok_or_else(|| {
            format!("expected one of CRITICAL, ERROR, WARN, INFO, DEBUG, got {value:?}")
        })
}

fn request_args() -> [Arg; 2] {
    [
        Arg::new("level")
            .long("level")
            .value_name("NAME")
            .value_parser(parse_level)
            .help("Severity of the call (CRITICAL, ERROR, WARN, INFO, DEBUG)"),
        Arg::new("depth")
            .long("depth")
            .value_name("N")
            .value_parser(value_parser!(i32))
            .allow_negative_numbers(true)
            .help("Trace depth of the call"),
    ]
}

fn request_group() -> ArgGroup {
    ArgGroup::new("request")
        .args(["level", "depth"])
        .required(true)
}

fn file_arg() -> Arg {
    Arg::new("file")
        .long("file")
        .value_name("PATH")
        .help("Source file of the simulated call site")
}

fn clap_command() -> Command {
    Command::new("filterlog")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Inspect and exercise filterlog configuration")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("prefix")
                .long("prefix")
                .value_name("PREFIX")
                .global(true)
                .help("Prefix of the setting names, e.g. MYAPP_"),
        )
        .subcommand(
            Command::new("check")
                .about("Print whether a call from FILE would be logged")
                .arg(file_arg().required(true))
                .args(request_args())
                .group(request_group()),
        )
        .subcommand(
            Command::new("emit")
                .about("Log MESSAGE as if called from FILE")
                .arg(file_arg().default_value("src/main.rs"))
                .arg(
                    Arg::new("line")
                        .long("line")
                        .value_name("N")
                        .value_parser(value_parser!(u32))
                        .default_value("0")
                        .help("Source line of the simulated call site"),
                )
                .args(request_args())
                .group(request_group())
                .arg(
                    Arg::new("message")
                        .value_name("MESSAGE")
                        .action(ArgAction::Append)
                        .num_args(1..)
                        .required(true),
                ),
        )
        .subcommand(
            Command::new("show").about("Print the merged configuration and compiled rules"),
        )
}

/// Parses `args` and runs the selected subcommand.
pub fn run_with<I, Out, ErrOut>(args: I, stdout: &mut Out, stderr: &mut ErrOut) -> ExitCode
where
    I: IntoIterator,
    I::Item: Into<OsString> + Clone,
    Out: Write,
    ErrOut: Write,
{
    let matches = match clap_command().try_get_matches_from(args) {
        Ok(matches) => matches,
        Err(error) => {
            let rendered = error.render().to_string();
            return match error.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    let _ = stdout.write_all(rendered.as_bytes());
                    ExitCode::SUCCESS
                }
                _ => {
                    let _ = stderr.write_all(rendered.as_bytes());
                    ExitCode::from(USAGE_EXIT_CODE)
                }
            };
        }
    };

    let prefix = matches
        .get_one::<String>("prefix")
        .map_or("", String::as_str);
    let config = EnvConfig::from_env_with_prefix(prefix);

    match matches.subcommand() {
        Some(("check", sub)) => check(sub, config, prefix, stdout, stderr),
        Some(("emit", sub)) => emit(sub, config, prefix, stderr),
        Some(("show", _)) => show(config, prefix, stdout, stderr),
        _ => ExitCode::from(USAGE_EXIT_CODE),
    }
}

fn request_from(matches: &ArgMatches) -> Option<Request> {
    if let Some(severity) = matches.get_one::<Severity>("level") {
        return Some(Request::Level(*severity));
    }
    matches.get_one::<i32>("depth").map(|depth| Request::Trace(*depth))
}

fn site_from(matches: &ArgMatches) -> CommandLineSite {
    CommandLineSite {
        file: matches.get_one::<String>("file").cloned().unwrap_or_default(),
        line: matches.get_one::<u32>("line").copied().unwrap_or(0),
    }
}

fn check<Out, ErrOut>(
    matches: &ArgMatches,
    config: EnvConfig,
    prefix: &str,
    stdout: &mut Out,
    stderr: &mut ErrOut,
) -> ExitCode
where
    Out: Write,
    ErrOut: Write,
{
    let Some(request) = request_from(matches) else {
        return ExitCode::from(USAGE_EXIT_CODE);
    };
    let (settings, diagnostics) = Settings::load(config, &app_name(), prefix);
    report(&diagnostics, stderr);

    let site = site_from(matches);
    let decision = settings.gate().should_emit(&site, request);
    let verdict = if decision.emit { "accept" } else { "reject" };
    let _ = writeln!(stdout, "{verdict}");
    if decision.emit {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(REJECTED_EXIT_CODE)
    }
}

fn emit<ErrOut>(
    matches: &ArgMatches,
    config: EnvConfig,
    prefix: &str,
    stderr: &mut ErrOut,
) -> ExitCode
where
    ErrOut: Write,
{
    let Some(request) = request_from(matches) else {
        return ExitCode::from(USAGE_EXIT_CODE);
    };
    let message = matches
        .get_many::<String>("message")
        .map(|words| words.map(String::as_str).collect::<Vec<_>>().join(" "))
        .unwrap_or_default();

    let logger = Logger::with_diagnostics(config, &app_name(), prefix, stderr);
    logger.log(&site_from(matches), request, &message);
    ExitCode::SUCCESS
}

fn show<Out, ErrOut>(
    config: EnvConfig,
    prefix: &str,
    stdout: &mut Out,
    stderr: &mut ErrOut,
) -> ExitCode
where
    Out: Write,
    ErrOut: Write,
{
    let app = app_name();
    let path = config.config_path(&app);
    let (settings, diagnostics) = Settings::load(config, &app, prefix);
    report(&diagnostics, stderr);

    let _ = writeln!(stdout, "config file: {}", path.display());
    for setting in Setting::ALL {
        let _ = writeln!(
            stdout,
            "{}={}",
            setting.key(prefix),
            settings.config().get(setting)
        );
    }
    for (title, axis) in [("log rules", Axis::Log), ("trace rules", Axis::Trace)] {
        let _ = writeln!(stdout, "{title}:");
        let rules = settings.gate().spec(axis).rules();
        if rules.is_empty() {
            let _ = writeln!(stdout, "  (none)");
        }
        for rule in rules {
            let pattern = if rule.is_global() { "*" } else { rule.pattern() };
            let threshold = threshold_label(axis, rule.threshold());
            let _ = writeln!(stdout, "  {pattern} <= {threshold}");
        }
    }
    ExitCode::SUCCESS
}

fn threshold_label(axis: Axis, threshold: i32) -> String {
    match axis {
        Axis::Log => Severity::from_number(threshold)
            .map_or_else(|| threshold.to_string(), |severity| severity.name().to_owned()),
        Axis::Trace => threshold.to_string(),
    }
}
