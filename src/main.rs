//! Mobile Price Range CLI
//!
//! Collects phone hardware attributes and predicts the price range with a
//! pre-trained classifier.

use clap::{Args, Parser, Subcommand};
use phone_price::features::{Feature, RawValue, FEATURE_COUNT};
use phone_price::{Config, Result};

#[derive(Parser)]
#[command(name = "phone-price")]
#[command(about = "Mobile phone price range classifier", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict the price range from flags or a JSON file
    Predict(PredictArgs),
    /// Fill in the feature form interactively
    Form,
    /// Show the input feature schema
    Schema {
        /// Output format
        #[arg(long, default_value = "table")]
        format: OutputFormat,
    },
    /// Model management commands
    Model {
        #[command(subcommand)]
        action: ModelCommands,
    },
    /// Initialize a new project with default config
    Init,
}

#[derive(Subcommand)]
enum ModelCommands {
    /// Show model information
    Info,
}

#[derive(Args)]
struct PredictArgs {
    /// Input file (JSON object or array of objects keyed by feature name)
    #[arg(long, conflicts_with_all = Feature::ALL.map(Feature::name))]
    input: Option<String>,

    /// Fail instead of prompting for missing features
    #[arg(long)]
    no_prompt: bool,

    /// Output format
    #[arg(long, default_value = "table")]
    format: OutputFormat,

    #[arg(long, value_parser = field_parser(Feature::BatteryPower), help = field_help(Feature::BatteryPower))]
    battery_power: Option<RawValue>,
    #[arg(long, value_parser = field_parser(Feature::Blue), help = field_help(Feature::Blue))]
    blue: Option<RawValue>,
    #[arg(long, value_parser = field_parser(Feature::ClockSpeed), help = field_help(Feature::ClockSpeed))]
    clock_speed: Option<RawValue>,
    #[arg(long, value_parser = field_parser(Feature::DualSim), help = field_help(Feature::DualSim))]
    dual_sim: Option<RawValue>,
    #[arg(long, value_parser = field_parser(Feature::FrontCamera), help = field_help(Feature::FrontCamera))]
    fc: Option<RawValue>,
    #[arg(long, value_parser = field_parser(Feature::FourG), help = field_help(Feature::FourG))]
    four_g: Option<RawValue>,
    #[arg(long, value_parser = field_parser(Feature::IntMemory), help = field_help(Feature::IntMemory))]
    int_memory: Option<RawValue>,
    #[arg(long, value_parser = field_parser(Feature::MobileDepth), help = field_help(Feature::MobileDepth))]
    m_dep: Option<RawValue>,
    #[arg(long, value_parser = field_parser(Feature::MobileWeight), help = field_help(Feature::MobileWeight))]
    mobile_wt: Option<RawValue>,
    #[arg(long, value_parser = field_parser(Feature::NCores), help = field_help(Feature::NCores))]
    n_cores: Option<RawValue>,
    #[arg(long, value_parser = field_parser(Feature::PrimaryCamera), help = field_help(Feature::PrimaryCamera))]
    pc: Option<RawValue>,
    #[arg(long, value_parser = field_parser(Feature::PxHeight), help = field_help(Feature::PxHeight))]
    px_height: Option<RawValue>,
    #[arg(long, value_parser = field_parser(Feature::PxWidth), help = field_help(Feature::PxWidth))]
    px_width: Option<RawValue>,
    #[arg(long, value_parser = field_parser(Feature::Ram), help = field_help(Feature::Ram))]
    ram: Option<RawValue>,
    #[arg(long, value_parser = field_parser(Feature::ScreenHeight), help = field_help(Feature::ScreenHeight))]
    sc_h: Option<RawValue>,
    #[arg(long, value_parser = field_parser(Feature::ScreenWidth), help = field_help(Feature::ScreenWidth))]
    sc_w: Option<RawValue>,
    #[arg(long, value_parser = field_parser(Feature::TalkTime), help = field_help(Feature::TalkTime))]
    talk_time: Option<RawValue>,
    #[arg(long, value_parser = field_parser(Feature::ThreeG), help = field_help(Feature::ThreeG))]
    three_g: Option<RawValue>,
    #[arg(long, value_parser = field_parser(Feature::TouchScreen), help = field_help(Feature::TouchScreen))]
    touch_screen: Option<RawValue>,
    #[arg(long, value_parser = field_parser(Feature::Wifi), help = field_help(Feature::Wifi))]
    wifi: Option<RawValue>,
}

impl PredictArgs {
    /// Flag values in schema order
    fn answers(&self) -> [(Feature, Option<RawValue>); FEATURE_COUNT] {
        [
            (Feature::BatteryPower, self.battery_power),
            (Feature::Blue, self.blue),
            (Feature::ClockSpeed, self.clock_speed),
            (Feature::DualSim, self.dual_sim),
            (Feature::FrontCamera, self.fc),
            (Feature::FourG, self.four_g),
            (Feature::IntMemory, self.int_memory),
            (Feature::MobileDepth, self.m_dep),
            (Feature::MobileWeight, self.mobile_wt),
            (Feature::NCores, self.n_cores),
            (Feature::PrimaryCamera, self.pc),
            (Feature::PxHeight, self.px_height),
            (Feature::PxWidth, self.px_width),
            (Feature::Ram, self.ram),
            (Feature::ScreenHeight, self.sc_h),
            (Feature::ScreenWidth, self.sc_w),
            (Feature::TalkTime, self.talk_time),
            (Feature::ThreeG, self.three_g),
            (Feature::TouchScreen, self.touch_screen),
            (Feature::Wifi, self.wifi),
        ]
    }
}

/// Value parser enforcing a field's declared bounds or choices
fn field_parser(
    feature: Feature,
) -> impl Fn(&str) -> std::result::Result<RawValue, String> + Clone + Send + Sync + 'static {
    move |s: &str| feature.spec().parse(s)
}

fn field_help(feature: Feature) -> String {
    let spec = feature.spec();
    format!("{} [{}] {}", spec.label, spec.domain(), spec.description)
}

#[derive(Clone, Debug)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown format: {}. Use table, json, or csv.", s)),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Load or create config
    let config = if std::path::Path::new(&cli.config).exists() {
        match Config::load(&cli.config) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        Config::default()
    };

    // Run command
    let result = match cli.command {
        Commands::Predict(args) => commands::predict(&config, args),
        Commands::Form => commands::form(&config),
        Commands::Schema { format } => commands::schema(format),
        Commands::Model { action } => match action {
            ModelCommands::Info => commands::model_info(&config),
        },
        Commands::Init => commands::init(&cli.config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

mod commands {
    use super::*;
    use burn::backend::NdArray;
    use burn::module::Module;
    use phone_price::features::collector::load_forms;
    use phone_price::features::{FormCollector, RawInput, FEATURE_SCHEMA};
    use phone_price::model::PriceNetConfig;
    use phone_price::predict::inference::format_prediction;
    use phone_price::predict::{MlpClassifier, PriceClassifier, Predictor};
    use phone_price::{PriceError, PricePrediction};
    use std::io::{BufRead, Write};

    type MyBackend = NdArray<f32>;

    /// Load the classifier once; every request in this process shares it
    fn load_predictor(config: &Config) -> Result<Predictor<MlpClassifier<MyBackend>>> {
        let device = Default::default();
        let model_config = PriceNetConfig::from_model_config(&config.model);
        let classifier =
            MlpClassifier::<MyBackend>::load(device, &config.model.artifact_path, model_config)?;
        Ok(Predictor::new(classifier))
    }

    fn print_header<W: Write>(config: &Config, writer: &mut W) -> Result<()> {
        writeln!(writer, "Mobile Price Range Classifier")?;
        writeln!(writer, "───────────────────────────────")?;
        let image = std::path::Path::new(&config.display.image_path);
        if image.exists() {
            writeln!(
                writer,
                "  Image: {} ({})",
                image.display(),
                config.display.image_caption
            )?;
        } else {
            log::warn!("Image asset not found: {}", image.display());
        }
        writeln!(writer)?;
        Ok(())
    }

    pub fn init(config_path: &str) -> Result<()> {
        let config = Config::default();
        config.save(config_path)?;
        println!("Created default config at {}", config_path);

        std::fs::create_dir_all("data/images")?;
        std::fs::create_dir_all("model")?;
        println!("Created data/images/ and model/ directories");

        println!("\nNext steps:");
        println!("  1. Edit {} to customize settings", config_path);
        println!("  2. Copy the trained model to {}", config.model_file());
        println!("  3. Run 'phone-price form' to enter a phone and predict its price range");

        Ok(())
    }

    pub fn predict(config: &Config, args: PredictArgs) -> Result<()> {
        let predictor = load_predictor(config)?;

        let stdin = std::io::stdin();
        let inputs = collect_inputs(config, &args, &mut stdin.lock(), &mut std::io::stdout())?;
        let results = predict_inputs(&predictor, inputs);

        render(
            &results,
            &args.format,
            &mut std::io::stdout().lock(),
            &mut std::io::stderr(),
        )
    }

    /// Gather the inputs for `predict`, one result per phone
    ///
    /// Flag input is a single phone and any collection error is fatal. With
    /// `--input` each element stands alone: an invalid element fails only
    /// its own entry, and incomplete elements are prompted for unless
    /// `--no-prompt` is set.
    pub(super) fn collect_inputs<R: BufRead, W: Write>(
        config: &Config,
        args: &PredictArgs,
        reader: &mut R,
        writer: &mut W,
    ) -> Result<Vec<Result<RawInput>>> {
        let Some(path) = &args.input else {
            let mut form = FormCollector::new();
            for (feature, value) in args.answers() {
                if let Some(value) = value {
                    form.set(feature, value);
                }
            }
            if !form.is_complete() && !args.no_prompt {
                print_header(config, writer)?;
                form.prompt_missing(reader, writer)?;
            }
            return Ok(vec![Ok(form.finish()?)]);
        };

        let forms = load_forms(path)?;
        log::info!("Loaded {} input(s) from {}", forms.len(), path);

        let mut inputs = Vec::with_capacity(forms.len());
        for (i, form) in forms.into_iter().enumerate() {
            let input = form.and_then(|mut form| {
                if !form.is_complete() && !args.no_prompt {
                    let missing = form.missing().len();
                    writeln!(writer, "Phone {} is missing {} field(s)", i + 1, missing)?;
                    form.prompt_missing(reader, writer)?;
                }
                form.finish()
            });
            if let Err(e) = &input {
                log::warn!("Input {} rejected: {}", i + 1, e);
            }
            inputs.push(input);
        }
        Ok(inputs)
    }

    /// Run every collected input; rejected inputs keep their error
    pub(super) fn predict_inputs<C: PriceClassifier>(
        predictor: &Predictor<C>,
        inputs: Vec<Result<RawInput>>,
    ) -> Vec<Result<PricePrediction>> {
        inputs
            .into_iter()
            .map(|input| input.and_then(|input| predictor.predict(&input)))
            .collect()
    }

    pub fn form(config: &Config) -> Result<()> {
        let predictor = load_predictor(config)?;
        let stdin = std::io::stdin();
        let mut reader = stdin.lock();
        let mut writer = std::io::stdout();

        loop {
            print_header(config, &mut writer)?;
            let mut form = FormCollector::new();
            form.prompt_missing(&mut reader, &mut writer)?;
            let input = form.finish()?;

            print_summary(&input);
            if !confirm(&mut reader, &mut writer, "Predict? [Y/n] ", true)? {
                return Ok(());
            }

            let prediction = predictor.predict(&input)?;
            print!("{}", format_prediction(&prediction));

            if !confirm(&mut reader, &mut writer, "Predict another phone? [y/N] ", false)? {
                return Ok(());
            }
        }
    }

    fn print_summary(input: &RawInput) {
        println!("\nFeature Selection");
        println!("───────────────────────────────");
        for (feature, value) in input.iter() {
            println!("  {:<28} {}", feature.spec().label, value);
        }
        println!();
    }

    fn confirm<R: BufRead, W: Write>(
        reader: &mut R,
        writer: &mut W,
        question: &str,
        default: bool,
    ) -> Result<bool> {
        write!(writer, "{}", question)?;
        writer.flush()?;

        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            return Ok(false);
        }
        Ok(match line.trim().to_lowercase().as_str() {
            "" => default,
            "y" | "yes" => true,
            _ => false,
        })
    }

    /// Write predictions to `out` and per-input errors to `err`
    ///
    /// Fails when any input failed so the process exits non-zero.
    pub(super) fn render<O: Write, E: Write>(
        results: &[Result<PricePrediction>],
        format: &OutputFormat,
        out: &mut O,
        err: &mut E,
    ) -> Result<()> {
        match format {
            OutputFormat::Table => {
                for result in results {
                    match result {
                        Ok(prediction) => write!(out, "{}", format_prediction(prediction))?,
                        Err(e) => writeln!(err, "Error: {}", e)?,
                    }
                }
            }
            OutputFormat::Json => {
                let items: Vec<serde_json::Value> = results
                    .iter()
                    .map(|result| match result {
                        Ok(prediction) => serde_json::to_value(prediction),
                        Err(e) => Ok(serde_json::json!({ "error": e.to_string() })),
                    })
                    .collect::<std::result::Result<_, _>>()?;
                let json = match items.as_slice() {
                    [single] => serde_json::to_string_pretty(single)?,
                    _ => serde_json::to_string_pretty(&items)?,
                };
                writeln!(out, "{}", json)?;
            }
            OutputFormat::Csv => {
                let names: Vec<&str> = FEATURE_SCHEMA.iter().map(|s| s.name).collect();
                writeln!(out, "class_index,label,confidence,{}", names.join(","))?;
                for result in results {
                    match result {
                        Ok(p) => {
                            let values: Vec<String> =
                                p.record.values().iter().map(|v| v.to_string()).collect();
                            let confidence =
                                p.confidence().map(|c| format!("{:.3}", c)).unwrap_or_default();
                            writeln!(
                                out,
                                "{},{},{},{}",
                                p.class_index,
                                p.label,
                                confidence,
                                values.join(",")
                            )?;
                        }
                        Err(e) => writeln!(err, "Error: {}", e)?,
                    }
                }
            }
        }

        let failed = results.iter().filter(|r| r.is_err()).count();
        if failed > 0 {
            return Err(PriceError::Inference(format!(
                "{} of {} predictions failed",
                failed,
                results.len()
            )));
        }
        Ok(())
    }

    pub fn schema(format: OutputFormat) -> Result<()> {
        match format {
            OutputFormat::Json => {
                let fields: Vec<serde_json::Value> = FEATURE_SCHEMA
                    .iter()
                    .map(|spec| {
                        serde_json::json!({
                            "name": spec.name,
                            "label": spec.label,
                            "binary": spec.is_binary(),
                            "min": spec.min(),
                            "max": spec.max(),
                            "description": spec.description,
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&fields)?);
            }
            OutputFormat::Csv => {
                println!("name,label,min,max,binary");
                for spec in &FEATURE_SCHEMA {
                    println!(
                        "{},\"{}\",{},{},{}",
                        spec.name,
                        spec.label,
                        spec.min(),
                        spec.max(),
                        spec.is_binary()
                    );
                }
            }
            OutputFormat::Table => {
                println!("Feature Schema");
                println!("───────────────────────────────");
                for (i, spec) in FEATURE_SCHEMA.iter().enumerate() {
                    println!(
                        "  {:>2}  {:<14} {:<28} {:<12} {}",
                        i,
                        spec.name,
                        spec.label,
                        spec.domain(),
                        spec.description
                    );
                }
            }
        }
        Ok(())
    }

    pub fn model_info(config: &Config) -> Result<()> {
        let predictor = load_predictor(config)?;
        let classifier = predictor.classifier();

        println!("Model Information");
        println!("───────────────────────────────");
        println!("  Path:         {}", config.model_file());
        println!("  Inputs:       {}", classifier.config().input_dim);
        println!("  Hidden dims:  {:?}", classifier.config().hidden_dims);
        println!("  Classes:      {}", classifier.config().num_classes);
        println!("  Parameters:   {}", classifier.model().num_params());

        Ok(())
    }
}
