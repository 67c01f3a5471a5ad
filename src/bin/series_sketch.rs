use chrono::FixedOffset;
use serde::Deserialize;
use series_sketch::canvas::DrawingCanvas;
use series_sketch::capture::{SeriesCapture, SeriesReport};
use series_sketch::config::{SessionSettings, SettingField, parse_constants};
use series_sketch::core::{Viewport, parse_offset};
use series_sketch::error::{SketchError, SketchResult};
use series_sketch::interaction::{ClickSource, PointerEvent, SeriesScript, parse_click_line};
use series_sketch::prompt::{PromptRequest, Prompter};
use series_sketch::render::NullRenderer;
use series_sketch::reshape::{GroupingSpec, MeasurementGroup, ordinal, reshape};
use series_sketch::table::{LongTable, WideTable};
use series_sketch::telemetry::init_default_tracing;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

const USAGE: &str = "usage: series_sketch <draw|reshape> [options]
  draw:    [--config <json>] [--start <time>] [--end <time>] [--timezone <tz>]
           [--period <dur>] [--y-min <n>] [--y-max <n>] [--time-col <name>]
           [--constants <k=v,...>] [--defaults] [--script <json>]
           [--wide-output <csv>] [--grouping <json>] [--long-output <csv>]
  reshape: [--input <csv>] [--time-col <name>] [--timezone <tz>]
           [--constants <k=v,...>] [--grouping <json>] [--output <csv>]";

const CANVAS_VIEWPORT: Viewport = Viewport {
    width: 1200,
    height: 600,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommandKind {
    Draw,
    Reshape,
}

#[derive(Debug, Default)]
struct CliArgs {
    settings: SessionSettings,
    config_path: Option<PathBuf>,
    use_defaults: bool,
    script: Option<PathBuf>,
    input: Option<PathBuf>,
    wide_output: Option<PathBuf>,
    grouping: Option<PathBuf>,
    long_output: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct GroupingFile {
    grouping_col: String,
    #[serde(flatten)]
    spec: GroupingSpec,
}

fn main() {
    let _ = init_default_tracing();
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let (command, args) = parse_args()?;
    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), io::stdout());
    let result = match command {
        CommandKind::Draw => run_draw(&args, &mut prompter),
        CommandKind::Reshape => run_reshape(&args, &mut prompter),
    };
    result.map_err(|err| err.to_string())
}

fn parse_args() -> Result<(CommandKind, CliArgs), String> {
    let mut args = std::env::args().skip(1);
    let command = match args.next().as_deref() {
        Some("draw") => CommandKind::Draw,
        Some("reshape") => CommandKind::Reshape,
        _ => return Err(USAGE.to_owned()),
    };

    let mut parsed = CliArgs::default();
    while let Some(flag) = args.next() {
        if flag == "--defaults" {
            parsed.use_defaults = true;
            continue;
        }
        let value = args
            .next()
            .ok_or_else(|| format!("missing value for {flag}"))?;
        let setting = match flag.as_str() {
            "--start" => Some(SettingField::Start),
            "--end" => Some(SettingField::End),
            "--timezone" => Some(SettingField::Timezone),
            "--period" => Some(SettingField::Period),
            "--y-min" => Some(SettingField::YMin),
            "--y-max" => Some(SettingField::YMax),
            "--time-col" => Some(SettingField::TimeCol),
            "--constants" => Some(SettingField::Constants),
            _ => None,
        };
        if let Some(field) = setting {
            parsed.settings.set(field, value);
            continue;
        }
        let path = Some(PathBuf::from(value));
        match flag.as_str() {
            "--config" => parsed.config_path = path,
            "--script" => parsed.script = path,
            "--input" => parsed.input = path,
            "--wide-output" => parsed.wide_output = path,
            "--grouping" => parsed.grouping = path,
            "--long-output" | "--output" => parsed.long_output = path,
            _ => return Err(format!("unknown flag: {flag}\n{USAGE}")),
        }
    }

    Ok((command, parsed))
}

fn run_draw<R: BufRead, W: Write>(
    args: &CliArgs,
    prompter: &mut Prompter<R, W>,
) -> SketchResult<()> {
    let interactive = args.script.is_none();
    prompter.say("=".repeat(55))?;
    prompter.say("Welcome to the Mock Data Generator!")?;
    prompter.say("Draw series on a time grid and save them as tabular data.")?;
    prompter.say("=".repeat(55))?;

    let mut settings = args.settings.clone();
    if let Some(path) = &args.config_path {
        settings = settings.or(SessionSettings::from_json(&read_text(path)?)?);
    }
    if !args.use_defaults {
        for field in settings.missing() {
            let answer = prompter
                .response(PromptRequest::new(field.prompt()).with_default(field.default_value()))?;
            settings.set(field, answer);
        }
    }
    let config = settings.resolve()?;
    let offset = config.grid.offset();

    let capture = SeriesCapture::from_config(&config);
    let mut canvas = DrawingCanvas::new(NullRenderer::default(), CANVAS_VIEWPORT, capture)?;
    prompter.say(format!("{}\nStarting Drawing Session\n{}", "-".repeat(55), "-".repeat(55)))?;

    if let Some(path) = &args.script {
        for script in SeriesScript::load_all(&read_text(path)?)? {
            let mut clicks = script.to_clicks(offset)?;
            let report = canvas.draw_series(&script.name, &mut clicks)?;
            print_report(prompter, &report)?;
        }
    } else {
        loop {
            let name = prompter.response_where(
                PromptRequest::new("Enter Series Name: ").required(),
                |name| !canvas.capture().table().is_name_taken(name.trim()),
            )?;
            let mut source = ConsoleClicks {
                prompter: &mut *prompter,
                offset,
            };
            let report = canvas.draw_series(&name, &mut source)?;
            print_report(prompter, &report)?;

            if !prompter.ask_yes_no("Draw another series? [y/n]: ")? {
                break;
            }
            if prompter.ask_yes_no("Change Y range? [y/n]: ")? {
                let y_min = ask_number(prompter, "Enter new Y min: ")?;
                let y_max = ask_number(prompter, "Enter new Y max: ")?;
                if let Err(err) = canvas.set_value_range(y_min, y_max) {
                    prompter.say(format!("Keeping the previous Y range: {err}"))?;
                }
            }
        }
    }

    let mut capture = canvas.into_capture();
    capture.export_constants(&config.constants)?;
    let wide = capture.into_table();

    if let Some(path) = &args.wide_output {
        save_wide(prompter, &wide, path)?;
    } else if interactive
        && prompter.ask_yes_no("Save data in wide format (one column per series)? [y/n]: ")?
    {
        let path = ask_path(prompter)?;
        save_wide(prompter, &wide, &path)?;
    }

    if let Some(path) = &args.grouping {
        let grouping: GroupingFile = serde_json::from_str(&read_text(path)?)?;
        let long = reshape(
            &wide,
            wide.time_col(),
            &grouping.grouping_col,
            &grouping.spec,
        )?;
        emit_long(prompter, &long, args.long_output.as_deref(), interactive)?;
    } else if interactive
        && prompter.ask_yes_no("Reshape data to long format (group like columns)? [y/n]: ")?
    {
        let (grouping_col, spec) = ask_grouping(prompter, &wide)?;
        let long = reshape(&wide, wide.time_col(), &grouping_col, &spec)?;
        emit_long(prompter, &long, args.long_output.as_deref(), interactive)?;
    }
    Ok(())
}

fn run_reshape<R: BufRead, W: Write>(
    args: &CliArgs,
    prompter: &mut Prompter<R, W>,
) -> SketchResult<()> {
    let interactive = args.grouping.is_none();
    let input = match &args.input {
        Some(path) => path.clone(),
        None => PathBuf::from(prompter.response(
            PromptRequest::new("Enter the path to the CSV file: ").required(),
        )?),
    };
    let timezone = args
        .settings
        .get(SettingField::Timezone)
        .unwrap_or(SettingField::Timezone.default_value());
    let offset = parse_offset(timezone)
        .ok_or_else(|| SketchError::InvalidConfig(format!("timezone `{timezone}`")))?;

    let mut wide = WideTable::read_csv(
        fs::File::open(&input)?,
        args.settings.get(SettingField::TimeCol),
        offset,
    )?;
    if let Some(raw) = args.settings.get(SettingField::Constants) {
        for (name, value) in parse_constants(raw)? {
            wide.set_constant(name, value)?;
        }
    }

    let (grouping_col, spec) = match &args.grouping {
        Some(path) => {
            let grouping: GroupingFile = serde_json::from_str(&read_text(path)?)?;
            (grouping.grouping_col, grouping.spec)
        }
        None => ask_grouping(prompter, &wide)?,
    };
    let long = reshape(&wide, wide.time_col(), &grouping_col, &spec)?;
    emit_long(prompter, &long, args.long_output.as_deref(), interactive)
}

/// Reads `TIME VALUE` lines; an empty line ends the series.
struct ConsoleClicks<'p, R, W> {
    prompter: &'p mut Prompter<R, W>,
    offset: FixedOffset,
}

impl<R: BufRead, W: Write> ClickSource for ConsoleClicks<'_, R, W> {
    fn next_event(&mut self) -> SketchResult<PointerEvent> {
        loop {
            let line = self.prompter.response(PromptRequest::new(
                "Click [TIME VALUE, empty line to finish]: ",
            ))?;
            if line.is_empty() {
                return Ok(PointerEvent::EndOfInput);
            }
            let parsed = parse_click_line(&line, self.offset);
            match parsed {
                Some(event) => return Ok(event),
                None => self.prompter.say("Expected a time followed by a finite value")?,
            }
        }
    }
}

fn ask_grouping<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    wide: &WideTable,
) -> SketchResult<(String, GroupingSpec)> {
    let sets = prompter.response_where(
        PromptRequest::new("Enter the number of sets of measurements: ").required(),
        |answer| answer.parse::<usize>().is_ok_and(|count| count > 0),
    )?;
    let sets: usize = sets
        .parse()
        .map_err(|_| SketchError::InvalidData(format!("`{sets}` is not a count")))?;
    let grouping_col = prompter.response(
        PromptRequest::new("Enter the name for the grouping column (e.g. sensor_index): ")
            .required(),
    )?;

    let mut measurements = Vec::with_capacity(sets);
    for set in 1..=sets {
        let message = format!(
            "Enter the destination name for the {} measurement column (e.g. avg_voltage): ",
            ordinal(set)
        );
        let value_column = prompter.response(PromptRequest::new(&message).required())?;

        let message = format!(
            "Enter the comma-separated names of the columns that correspond to {value_column} (e.g. v1, v2): "
        );
        let columns = prompter.response_where(PromptRequest::new(&message).required(), |answer| {
            split_columns(answer)
                .iter()
                .all(|column| wide.column(column).is_some())
        })?;

        let mut group = MeasurementGroup::new(value_column);
        for column in split_columns(&columns) {
            let message = format!("What {grouping_col} does {column} correspond to: ");
            let group_id = prompter.response(PromptRequest::new(&message).required())?;
            group = group.with_column(column, group_id);
        }
        measurements.push(group);
    }
    Ok((grouping_col, GroupingSpec::new(measurements)))
}

fn split_columns(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|column| !column.is_empty())
        .map(str::to_owned)
        .collect()
}

fn ask_number<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    message: &str,
) -> SketchResult<f64> {
    let answer = prompter.response_where(PromptRequest::new(message).required(), |answer| {
        answer.parse::<f64>().is_ok_and(f64::is_finite)
    })?;
    answer
        .parse()
        .map_err(|_| SketchError::InvalidData(format!("`{answer}` is not a number")))
}

fn ask_path<R: BufRead, W: Write>(prompter: &mut Prompter<R, W>) -> SketchResult<PathBuf> {
    let answer = prompter.response(
        PromptRequest::new("Enter destination file path (absolute or in output dir): ")
            .required(),
    )?;
    Ok(PathBuf::from(answer))
}

fn print_report<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    report: &SeriesReport,
) -> SketchResult<()> {
    if !report.validation.is_valid() {
        prompter.say(format!(
            "Received invalid points for `{}`: {}",
            report.name, report.validation
        ))?;
    }
    prompter.say(format!(
        "Committed `{}` ({}) with {}",
        report.name, report.color.name, report.validation
    ))
}

fn save_wide<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    wide: &WideTable,
    path: &Path,
) -> SketchResult<()> {
    let path = resolve_output_path(path)?;
    wide.write_csv(fs::File::create(&path)?)?;
    prompter.say(format!("Data saved to {}", path.display()))
}

fn emit_long<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    long: &LongTable,
    path: Option<&Path>,
    interactive: bool,
) -> SketchResult<()> {
    let path = if let Some(path) = path {
        Some(path.to_path_buf())
    } else if !interactive {
        prompter.say(long.to_csv_string()?.trim_end())?;
        None
    } else if prompter.ask_yes_no("Do you want to save the reshaped data to a file? [y/n]: ")? {
        Some(ask_path(prompter)?)
    } else {
        None
    };
    if let Some(path) = path {
        let path = resolve_output_path(&path)?;
        long.write_csv(fs::File::create(&path)?)?;
        prompter.say(format!("Data saved to {}", path.display()))?;
    }
    Ok(())
}

/// Relative paths land under `./output/`; parent directories are created.
fn resolve_output_path(path: &Path) -> SketchResult<PathBuf> {
    let path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        Path::new("output").join(path)
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(path)
}

fn read_text(path: &Path) -> SketchResult<String> {
    Ok(fs::read_to_string(path)?)
}
