use std::io::{IsTerminal, Write};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use inquire::{CustomUserError, Select, Text, validator::Validation};
use predictor_core::{
    Condition, Config, FormField, FormState, PredictionService, SubmissionController,
    TextOptions, render, service_from_config,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "predictor", version, about = "Weather temperature predictor")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Ask the prediction service for a temperature.
    Predict(PredictArgs),

    /// Interactively set the prediction endpoint.
    Configure,

    /// Print the config file location and its current values.
    Config,
}

/// Observation parameters. Anything left out is prompted for.
#[derive(Debug, Args)]
pub struct PredictArgs {
    /// Latitude, -90 to 90.
    #[arg(long, allow_hyphen_values = true)]
    pub latitude: Option<String>,

    /// Longitude, -180 to 180.
    #[arg(long, allow_hyphen_values = true)]
    pub longitude: Option<String>,

    /// Wind speed in mph, 0 to 100.
    #[arg(long = "wind-mph")]
    pub wind_mph: Option<String>,

    /// Pressure in mb, 900 to 1100.
    #[arg(long = "pressure-mb")]
    pub pressure_mb: Option<String>,

    /// Relative humidity in percent.
    #[arg(long)]
    pub humidity: Option<String>,

    /// Cloud cover in percent.
    #[arg(long)]
    pub cloud: Option<String>,

    /// Visibility in km, 0 to 50.
    #[arg(long = "visibility-km")]
    pub visibility_km: Option<String>,

    /// Gust speed in mph, 0 to 150.
    #[arg(long = "gust-mph")]
    pub gust_mph: Option<String>,

    /// Sunny, "Partly cloudy", Cloudy or Overcast.
    #[arg(long)]
    pub condition: Option<String>,

    /// Override the configured endpoint for this call.
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Never prompt; missing fields are sent empty.
    #[arg(long)]
    pub no_input: bool,
}

impl PredictArgs {
    fn given(&self, field: FormField) -> Option<&str> {
        match field {
            FormField::Latitude => self.latitude.as_deref(),
            FormField::Longitude => self.longitude.as_deref(),
            FormField::WindMph => self.wind_mph.as_deref(),
            FormField::PressureMb => self.pressure_mb.as_deref(),
            FormField::Humidity => self.humidity.as_deref(),
            FormField::Cloud => self.cloud.as_deref(),
            FormField::VisibilityKm => self.visibility_km.as_deref(),
            FormField::GustMph => self.gust_mph.as_deref(),
            FormField::Condition => self.condition.as_deref(),
        }
    }
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Predict(args) => predict(args).await,
            Command::Configure => configure(),
            Command::Config => show_config(),
        }
    }
}

async fn predict(args: PredictArgs) -> Result<()> {
    let mut config = Config::load()?;
    if let Some(endpoint) = &args.endpoint {
        config.set_endpoint(endpoint)?;
    }

    let service = service_from_config(&config);
    let stdout = std::io::stdout();
    let color = stdout.is_terminal();
    run_predict(&args, &config, service.as_ref(), color, &mut stdout.lock()).await
}

/// Fill the form, submit it once and write the rendered result to `out`.
///
/// A failed prediction is rendered, not returned as an error.
async fn run_predict(
    args: &PredictArgs,
    config: &Config,
    service: &dyn PredictionService,
    color: bool,
    out: &mut impl Write,
) -> Result<()> {
    let mut controller = SubmissionController::from_config(config);
    for field in FormField::all() {
        let value = match args.given(*field) {
            Some(v) if *field == FormField::Condition => {
                Condition::try_from(v)?.as_str().to_string()
            }
            Some(v) => v.to_string(),
            None if args.no_input => continue,
            None => prompt_field(*field, controller.form())?,
        };
        controller.edit(*field, value);
    }

    for (field, problem) in controller.form().advisory_violations() {
        tracing::warn!(field = %field, %problem, "value outside the form's input constraints");
    }

    let opts = TextOptions { width: config.chart_width(), color };

    let ticket = controller.begin_submit();
    writeln!(out, "{}", render(controller.outcome(), controller.form()).submit_label)?;
    let result = service.predict(ticket.form()).await;
    controller.resolve(ticket, result);

    write!(out, "{}", render(controller.outcome(), controller.form()).to_text(opts))?;
    Ok(())
}

fn prompt_field(field: FormField, form: &FormState) -> Result<String> {
    if field == FormField::Condition {
        let current = Condition::try_from(form.get(field)).unwrap_or_default();
        let start = Condition::all().iter().position(|c| *c == current).unwrap_or(0);
        let picked = Select::new(field.label(), Condition::all().to_vec())
            .with_starting_cursor(start)
            .prompt()
            .context("Condition selection was cancelled")?;
        return Ok(picked.as_str().to_string());
    }

    let validator = move |input: &str| -> Result<Validation, CustomUserError> {
        Ok(match field.check(input) {
            Ok(()) => Validation::Valid,
            Err(err) => Validation::Invalid(err.to_string().into()),
        })
    };

    let mut prompt = Text::new(field.label()).with_validator(validator);
    if let Some(placeholder) = field.placeholder() {
        prompt = prompt.with_placeholder(placeholder);
    }

    prompt.prompt().with_context(|| format!("Input for {field} was cancelled"))
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;

    let endpoint = Text::new("Prediction endpoint (blank for default):")
        .with_initial_value(config.endpoint.as_deref().unwrap_or_default())
        .with_placeholder(predictor_core::config::DEFAULT_ENDPOINT)
        .prompt()
        .context("Endpoint input was cancelled")?;
    config.set_endpoint(&endpoint)?;

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    println!("Predictions will be sent to {}", config.endpoint());
    Ok(())
}

fn show_config() -> Result<()> {
    let path = Config::config_file_path()?;
    let config = Config::load()?;

    println!("Config file: {}", path.display());
    println!("endpoint        = {}", config.endpoint());
    println!("stale_responses = {}", config.stale_responses);
    println!("chart_width     = {}", config.chart_width());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use predictor_core::PredictError;
    use std::sync::Mutex;

    #[derive(Debug)]
    struct ScriptedService {
        answer: Result<f64, PredictError>,
        seen: Mutex<Vec<FormState>>,
    }

    impl ScriptedService {
        fn new(answer: Result<f64, PredictError>) -> Self {
            Self { answer, seen: Mutex::new(Vec::new()) }
        }
    }

    #[async_trait]
    impl PredictionService for ScriptedService {
        async fn predict(&self, form: &FormState) -> Result<f64, PredictError> {
            self.seen.lock().unwrap().push(form.clone());
            self.answer.clone()
        }
    }

    fn predict_args(extra: &[&str]) -> PredictArgs {
        let argv = ["predictor", "predict"].iter().chain(extra.iter()).copied();
        match Cli::try_parse_from(argv).unwrap().command {
            Command::Predict(args) => args,
            other => panic!("expected predict command, got {other:?}"),
        }
    }

    async fn run(args: &PredictArgs, service: &ScriptedService) -> (Result<()>, String) {
        let mut out = Vec::new();
        let result = run_predict(args, &Config::default(), service, false, &mut out).await;
        (result, String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn no_input_sends_empty_numbers_and_sunny() {
        let service = ScriptedService::new(Ok(12.0));
        let (result, _) = run(&predict_args(&["--no-input"]), &service).await;
        result.unwrap();

        let seen = service.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        for (field, value) in seen[0].fields() {
            if field == FormField::Condition {
                assert_eq!(value, "Sunny");
            } else {
                assert_eq!(value, "", "{field} should be empty");
            }
        }
    }

    #[tokio::test]
    async fn prints_busy_label_then_prediction_and_chart() {
        let service = ScriptedService::new(Ok(21.5));
        let args = predict_args(&["--wind-mph", "10", "--humidity", "70", "--no-input"]);
        let (result, text) = run(&args, &service).await;
        result.unwrap();

        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("Predicting..."));
        assert_eq!(lines.next(), Some("Predicted Temperature: 21.5°C"));
        assert!(text.contains("Weather Parameters and Predicted Temperature"));
        assert!(!text.contains('\x1b'));
    }

    #[tokio::test]
    async fn failed_prediction_is_rendered_not_returned() {
        let service = ScriptedService::new(Err(PredictError::Transport("refused".into())));
        let (result, text) = run(&predict_args(&["--no-input"]), &service).await;

        assert!(result.is_ok());
        assert_eq!(text, "Predicting...\nError: Failed to connect to the server\n");
    }

    #[tokio::test]
    async fn unknown_condition_flag_stops_before_submitting() {
        let service = ScriptedService::new(Ok(1.0));
        let (result, text) = run(&predict_args(&["--condition", "Rain", "--no-input"]), &service).await;

        assert!(result.unwrap_err().to_string().contains("Unknown condition"));
        assert!(text.is_empty());
        assert!(service.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn condition_flag_is_normalised() {
        let service = ScriptedService::new(Ok(1.0));
        let (result, _) = run(&predict_args(&["--condition", "partly cloudy", "--no-input"]), &service).await;
        result.unwrap();

        assert_eq!(service.seen.lock().unwrap()[0].get(FormField::Condition), "Partly cloudy");
    }

    #[test]
    fn parses_predict_flags_with_negative_coordinates() {
        let cli = Cli::try_parse_from([
            "predictor",
            "predict",
            "--latitude",
            "40.7128",
            "--longitude",
            "-74.0060",
            "--wind-mph",
            "10",
            "--condition",
            "Partly cloudy",
            "--no-input",
        ])
        .unwrap();

        let Command::Predict(args) = cli.command else {
            panic!("expected predict command");
        };
        assert_eq!(args.given(FormField::Longitude), Some("-74.0060"));
        assert_eq!(args.given(FormField::WindMph), Some("10"));
        assert_eq!(args.given(FormField::Condition), Some("Partly cloudy"));
        assert_eq!(args.given(FormField::Humidity), None);
        assert!(args.no_input);
    }

    #[test]
    fn config_subcommands_parse() {
        assert!(matches!(
            Cli::try_parse_from(["predictor", "configure"]).unwrap().command,
            Command::Configure
        ));
        assert!(matches!(Cli::try_parse_from(["predictor", "config"]).unwrap().command, Command::Config));
    }
}
